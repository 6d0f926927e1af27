use hotbuild_core::{BuildCommand, BuildOutcome};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandOutcome {
    /// No project at the expected location; nothing was attempted.
    NoProject,
    BuildFailed,
    Built { reloaded: bool },
    Cleaned(BuildOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandReport {
    pub command: BuildCommand,
    pub outcome: CommandOutcome,
    pub provision_warning: Option<String>,
}

impl CommandReport {
    pub(crate) fn new(command: BuildCommand, outcome: CommandOutcome) -> Self {
        Self {
            command,
            outcome,
            provision_warning: None,
        }
    }

    /// False only when the external build ran and failed.
    pub fn is_success(&self) -> bool {
        match self.outcome {
            CommandOutcome::NoProject | CommandOutcome::Built { .. } => true,
            CommandOutcome::BuildFailed => false,
            CommandOutcome::Cleaned(outcome) => outcome.succeeded,
        }
    }
}
