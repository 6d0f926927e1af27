use camino::{Utf8Path, Utf8PathBuf};
use hotbuild_core::ProvisionError;
use walkdir::WalkDir;

const PACKAGE_EXTENSION: &str = "nupkg";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProvisionSummary {
    pub staged: usize,
    pub skipped: usize,
}

/// Copies bundled offline packages into the fallback folder the build tool
/// resolves from when package sources are unreachable.
pub struct FallbackFolderProvisioner {
    source: Utf8PathBuf,
    fallback: Utf8PathBuf,
}

impl FallbackFolderProvisioner {
    pub fn new(source: Utf8PathBuf, fallback: Utf8PathBuf) -> Self {
        Self { source, fallback }
    }

    pub fn fallback_folder(&self) -> &Utf8Path {
        &self.fallback
    }

    pub fn provision(&self) -> Result<ProvisionSummary, ProvisionError> {
        if !self.source.is_dir() {
            return Err(ProvisionError::MissingSource(self.source.clone()));
        }

        std::fs::create_dir_all(&self.fallback)?;

        let mut summary = ProvisionSummary::default();
        for entry in WalkDir::new(&self.source).min_depth(1) {
            let entry = entry.map_err(|e| ProvisionError::Walk(e.to_string()))?;
            if !entry.file_type().is_file() || !is_package(entry.path()) {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().to_string();
            let dest = self.fallback.join(&file_name);

            let src_len = entry
                .metadata()
                .map_err(|e| ProvisionError::Walk(e.to_string()))?
                .len();
            let up_to_date = std::fs::metadata(&dest)
                .map(|m| m.is_file() && m.len() == src_len)
                .unwrap_or(false);
            if up_to_date {
                summary.skipped += 1;
                continue;
            }

            std::fs::copy(entry.path(), &dest).map_err(|source| ProvisionError::Stage {
                package: file_name.clone(),
                source,
            })?;
            tracing::debug!(package = %file_name, dest = %dest, "Staged offline package");
            summary.staged += 1;
        }

        tracing::debug!(
            staged = summary.staged,
            skipped = summary.skipped,
            fallback = %self.fallback,
            "Offline packages ready"
        );
        Ok(summary)
    }
}

fn is_package(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(PACKAGE_EXTENSION))
}
