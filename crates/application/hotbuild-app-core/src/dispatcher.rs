use std::sync::Arc;

use hotbuild_core::{BuildMenuOption, DispatchError};

use crate::orchestrator::BuildOrchestrator;
use crate::ports::{BuildInvoker, HostServices, PackageProvisioner, ProjectProbe};
use crate::report::CommandReport;

/// Routes build menu selections to the orchestrator.
pub struct CommandDispatcher<P, V, I, H> {
    orchestrator: Arc<BuildOrchestrator<P, V, I, H>>,
}

impl<P, V, I, H> CommandDispatcher<P, V, I, H>
where
    P: ProjectProbe,
    V: PackageProvisioner,
    I: BuildInvoker,
    H: HostServices,
{
    pub fn new(orchestrator: Arc<BuildOrchestrator<P, V, I, H>>) -> Self {
        Self { orchestrator }
    }

    /// Menu entries in display order.
    pub fn menu() -> Vec<(i32, &'static str)> {
        BuildMenuOption::ALL
            .iter()
            .map(|o| (o.id(), o.label()))
            .collect()
    }

    pub fn dispatch(&self, option: BuildMenuOption) -> CommandReport {
        match option {
            BuildMenuOption::BuildSolution => self.orchestrator.execute_build(),
            BuildMenuOption::RebuildSolution => self.orchestrator.execute_rebuild(),
            BuildMenuOption::CleanSolution => self.orchestrator.execute_clean(),
        }
    }

    /// Dispatches a raw menu id. An id outside the menu is a caller bug and is
    /// reported instead of falling back to any command.
    pub fn dispatch_id(&self, id: i32) -> Result<CommandReport, DispatchError> {
        let option = BuildMenuOption::try_from(id).inspect_err(|e| {
            tracing::error!("{e}");
        })?;
        Ok(self.dispatch(option))
    }
}
