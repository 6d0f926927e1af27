use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use hotbuild_core::BuildCommand;

use crate::notifier::ReloadNotifier;
use crate::ports::{BuildInvoker, HostServices, PackageProvisioner, ProjectProbe};
use crate::report::{CommandOutcome, CommandReport};

/// Runs build, rebuild and clean against a single project and drives the
/// reload sequence after successful builds.
///
/// Commands block the calling thread until the external build finishes. The
/// orchestrator does not guard against overlapping commands; callers that can
/// issue commands concurrently should go through [`crate::BuildWorker`].
pub struct BuildOrchestrator<P, V, I, H> {
    project_path: Utf8PathBuf,
    mode: String,
    probe: Arc<P>,
    provisioner: Arc<V>,
    invoker: Arc<I>,
    notifier: ReloadNotifier<H>,
}

impl<P, V, I, H> BuildOrchestrator<P, V, I, H>
where
    P: ProjectProbe,
    V: PackageProvisioner,
    I: BuildInvoker,
    H: HostServices,
{
    pub fn new(
        project_path: Utf8PathBuf,
        mode: impl Into<String>,
        probe: P,
        provisioner: V,
        invoker: I,
        host: H,
    ) -> Self {
        Self {
            project_path,
            mode: mode.into(),
            probe: Arc::new(probe),
            provisioner: Arc::new(provisioner),
            invoker: Arc::new(invoker),
            notifier: ReloadNotifier::new(Arc::new(host)),
        }
    }

    pub fn project_path(&self) -> &Utf8Path {
        &self.project_path
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn host(&self) -> &H {
        self.notifier.host()
    }

    pub fn execute(&self, command: BuildCommand) -> CommandReport {
        match command {
            BuildCommand::Build => self.execute_build(),
            BuildCommand::Rebuild => self.execute_rebuild(),
            BuildCommand::Clean => self.execute_clean(),
        }
    }

    pub fn execute_build(&self) -> CommandReport {
        self.build_and_reload(BuildCommand::Build)
    }

    pub fn execute_rebuild(&self) -> CommandReport {
        self.build_and_reload(BuildCommand::Rebuild)
    }

    pub fn execute_clean(&self) -> CommandReport {
        let command = BuildCommand::Clean;
        if !self.project_exists() {
            return CommandReport::new(command, CommandOutcome::NoProject);
        }

        let spec = command.target_spec(&self.mode);
        tracing::info!(project = %self.project_path, targets = ?spec.targets, "Cleaning");
        let outcome = self.invoker.invoke(&spec.mode, &spec.targets);
        if !outcome.succeeded {
            tracing::warn!(project = %self.project_path, "Clean failed");
        }

        CommandReport::new(command, CommandOutcome::Cleaned(outcome))
    }

    fn build_and_reload(&self, command: BuildCommand) -> CommandReport {
        if !self.project_exists() {
            return CommandReport::new(command, CommandOutcome::NoProject);
        }

        let provision_warning = match self.provisioner.provision() {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!("Failed to set up offline packages: {e}");
                Some(format!("Failed to set up offline packages: {e}"))
            }
        };

        let spec = command.target_spec(&self.mode);
        tracing::info!(
            project = %self.project_path,
            mode = %spec.mode,
            targets = ?spec.targets,
            "Starting {command}"
        );

        let outcome = self.invoker.invoke(&spec.mode, &spec.targets);
        let outcome = if outcome.succeeded {
            tracing::info!("{command} succeeded");
            CommandOutcome::Built {
                reloaded: self.notifier.run(),
            }
        } else {
            tracing::warn!(project = %self.project_path, "{command} failed");
            CommandOutcome::BuildFailed
        };

        CommandReport {
            command,
            outcome,
            provision_warning,
        }
    }

    fn project_exists(&self) -> bool {
        let exists = self.probe.exists(&self.project_path);
        if !exists {
            tracing::debug!(project = %self.project_path, "No project to build");
        }
        exists
    }
}
