use serde::{Deserialize, Serialize};

use crate::{BuildCommand, DispatchError};

/// Entries of the build menu, keyed by the integer id the menu surface reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum BuildMenuOption {
    BuildSolution = 0,
    RebuildSolution = 1,
    CleanSolution = 2,
}

impl BuildMenuOption {
    pub const ALL: [BuildMenuOption; 3] = [
        BuildMenuOption::BuildSolution,
        BuildMenuOption::RebuildSolution,
        BuildMenuOption::CleanSolution,
    ];

    pub fn id(self) -> i32 {
        self as i32
    }

    pub fn label(self) -> &'static str {
        match self {
            BuildMenuOption::BuildSolution => "Build Solution",
            BuildMenuOption::RebuildSolution => "Rebuild Solution",
            BuildMenuOption::CleanSolution => "Clean Solution",
        }
    }

    pub fn command(self) -> BuildCommand {
        match self {
            BuildMenuOption::BuildSolution => BuildCommand::Build,
            BuildMenuOption::RebuildSolution => BuildCommand::Rebuild,
            BuildMenuOption::CleanSolution => BuildCommand::Clean,
        }
    }
}

impl TryFrom<i32> for BuildMenuOption {
    type Error = DispatchError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(BuildMenuOption::BuildSolution),
            1 => Ok(BuildMenuOption::RebuildSolution),
            2 => Ok(BuildMenuOption::CleanSolution),
            other => Err(DispatchError::InvalidMenuOption(other)),
        }
    }
}
