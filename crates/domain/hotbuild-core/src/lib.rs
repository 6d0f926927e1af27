use serde::{Deserialize, Serialize};

pub mod error;
pub mod menu;

pub use error::{DispatchError, ProvisionError};
pub use menu::BuildMenuOption;

pub const REBUILD_TARGET: &str = "Rebuild";
pub const CLEAN_TARGET: &str = "Clean";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildCommand {
    Build,
    Rebuild,
    Clean,
}

impl BuildCommand {
    /// Target list and mode handed to the build invoker for this command.
    pub fn target_spec(self, mode: &str) -> BuildTargetSpec {
        let targets = match self {
            BuildCommand::Build => Vec::new(),
            BuildCommand::Rebuild => vec![REBUILD_TARGET.to_string()],
            BuildCommand::Clean => vec![CLEAN_TARGET.to_string()],
        };
        BuildTargetSpec {
            mode: mode.to_string(),
            targets,
        }
    }

    /// Whether offline packages are staged before invoking the build.
    pub fn provisions_packages(self) -> bool {
        !matches!(self, BuildCommand::Clean)
    }

    /// Whether a successful run is followed by the reload sequence.
    pub fn reloads_on_success(self) -> bool {
        !matches!(self, BuildCommand::Clean)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BuildCommand::Build => "build",
            BuildCommand::Rebuild => "rebuild",
            BuildCommand::Clean => "clean",
        }
    }
}

impl std::fmt::Display for BuildCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mode plus an ordered target list. An empty list means the project's default target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTargetSpec {
    pub mode: String,
    pub targets: Vec<String>,
}

impl BuildTargetSpec {
    pub fn uses_default_target(&self) -> bool {
        self.targets.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOutcome {
    pub succeeded: bool,
}

impl BuildOutcome {
    pub const SUCCEEDED: BuildOutcome = BuildOutcome { succeeded: true };
    pub const FAILED: BuildOutcome = BuildOutcome { succeeded: false };

    pub fn from_success(succeeded: bool) -> Self {
        Self { succeeded }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_uses_default_target() {
        let spec = BuildCommand::Build.target_spec("Debug");
        assert_eq!(spec.mode, "Debug");
        assert!(spec.uses_default_target());
    }

    #[test]
    fn rebuild_and_clean_name_their_target() {
        assert_eq!(
            BuildCommand::Rebuild.target_spec("Debug").targets,
            vec!["Rebuild".to_string()]
        );
        assert_eq!(
            BuildCommand::Clean.target_spec("Release"),
            BuildTargetSpec {
                mode: "Release".into(),
                targets: vec!["Clean".into()],
            }
        );
    }

    #[test]
    fn clean_neither_provisions_nor_reloads() {
        assert!(!BuildCommand::Clean.provisions_packages());
        assert!(!BuildCommand::Clean.reloads_on_success());
        for cmd in [BuildCommand::Build, BuildCommand::Rebuild] {
            assert!(cmd.provisions_packages());
            assert!(cmd.reloads_on_success());
        }
    }
}
