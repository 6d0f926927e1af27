use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;

use hotbuild_config::{
    DEFAULT_ASSEMBLIES_DIR, DEFAULT_BUILD_MODE, DEFAULT_BUILD_TEMPLATE, DEFAULT_FALLBACK_FOLDER,
    DEFAULT_WATCHER_INTERVAL_MS, SETTINGS_FILE_NAME, STATE_DIR_NAME,
};

const QUALIFIER: &str = "com";
const ORG: &str = "hotbuild";
const APP: &str = "hotbuild";

fn default_mode() -> String {
    DEFAULT_BUILD_MODE.to_string()
}

fn default_build_template() -> String {
    DEFAULT_BUILD_TEMPLATE.to_string()
}

fn default_fallback_folder() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_FALLBACK_FOLDER)
}

fn default_assemblies_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_ASSEMBLIES_DIR)
}

fn default_watcher_interval_ms() -> u64 {
    DEFAULT_WATCHER_INTERVAL_MS
}

/// Per-project settings. Relative paths are resolved against the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSettings {
    /// Solution to build. Discovered in the project root when unset.
    #[serde(default)]
    pub solution: Option<Utf8PathBuf>,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default = "default_build_template")]
    pub build_template: String,
    /// Bundled offline packages. Defaults to the user data directory.
    #[serde(default)]
    pub bundled_packages: Option<Utf8PathBuf>,
    #[serde(default = "default_fallback_folder")]
    pub fallback_folder: Utf8PathBuf,
    #[serde(default = "default_assemblies_dir")]
    pub assemblies_dir: Utf8PathBuf,
    #[serde(default)]
    pub debugger_endpoint: Option<String>,
    #[serde(default = "default_watcher_interval_ms")]
    pub watcher_interval_ms: u64,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            solution: None,
            mode: default_mode(),
            build_template: default_build_template(),
            bundled_packages: None,
            fallback_folder: default_fallback_folder(),
            assemblies_dir: default_assemblies_dir(),
            debugger_endpoint: None,
            watcher_interval_ms: default_watcher_interval_ms(),
        }
    }
}

/// Joins `path` onto `root` unless it is already absolute.
pub fn resolve_path(root: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// User-level directory holding bundled offline packages.
pub fn user_packages_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = ProjectDirs::from(QUALIFIER, ORG, APP)?;
    Utf8PathBuf::from_path_buf(proj_dirs.data_dir().join("packages")).ok()
}

pub struct SettingsStore {
    project_root: Utf8PathBuf,
}

impl SettingsStore {
    pub fn new(project_root: Utf8PathBuf) -> Self {
        Self { project_root }
    }

    pub fn project_root(&self) -> &Utf8Path {
        &self.project_root
    }

    pub fn state_dir(&self) -> Utf8PathBuf {
        self.project_root.join(STATE_DIR_NAME)
    }

    pub fn settings_path(&self) -> Utf8PathBuf {
        self.state_dir().join(SETTINGS_FILE_NAME)
    }

    pub fn load(&self) -> Result<HostSettings> {
        let path = self.settings_path();
        if !path.exists() {
            return Ok(HostSettings::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings from {path}"))?;
        let settings: HostSettings = serde_json::from_str(&content)
            .with_context(|| format!("Settings file {path} is not valid"))?;
        Ok(settings)
    }

    pub fn save(&self, settings: &HostSettings) -> Result<()> {
        let dir = self.state_dir();
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {dir}"))?;
        let json = serde_json::to_string_pretty(settings)?;
        atomic_write(&self.settings_path(), json.as_bytes())?;
        Ok(())
    }
}

/// Stages `contents` in `<path>.tmp` and renames it over `path`.
fn atomic_write(path: &Utf8Path, contents: &[u8]) -> Result<()> {
    let staging = Utf8PathBuf::from(format!("{path}.tmp"));

    let mut file = fs::File::create(&staging)
        .with_context(|| format!("Failed to stage settings at {staging}"))?;
    file.write_all(contents)
        .and_then(|()| file.sync_all())
        .with_context(|| format!("Failed to flush staged settings {staging}"))?;
    drop(file);

    if let Err(e) = fs::rename(&staging, path) {
        if e.kind() != std::io::ErrorKind::AlreadyExists {
            let _ = fs::remove_file(&staging);
            return Err(e).with_context(|| format!("Failed to move settings into {path}"));
        }
        fs::remove_file(path).with_context(|| format!("Failed to replace settings {path}"))?;
        fs::rename(&staging, path)
            .with_context(|| format!("Failed to move settings into {path}"))?;
    }
    Ok(())
}
