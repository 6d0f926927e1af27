use camino::Utf8Path;
use hotbuild_core::{BuildOutcome, ProvisionError};
use hotbuild_infra::{FallbackFolderProvisioner, FileHost, FsProjectProbe, ProcessBuildInvoker};

use crate::orchestrator::BuildOrchestrator;
use crate::ports::{BuildInvoker, HostServices, PackageProvisioner, ProjectProbe};

/// Orchestrator wired to the filesystem, the build tool process and the file-backed host.
pub type FileOrchestrator =
    BuildOrchestrator<FsProjectProbe, FallbackFolderProvisioner, ProcessBuildInvoker, FileHost>;

impl ProjectProbe for FsProjectProbe {
    fn exists(&self, path: &Utf8Path) -> bool {
        FsProjectProbe::exists(self, path)
    }
}

impl PackageProvisioner for FallbackFolderProvisioner {
    fn provision(&self) -> Result<(), ProvisionError> {
        FallbackFolderProvisioner::provision(self).map(|_summary| ())
    }
}

impl BuildInvoker for ProcessBuildInvoker {
    fn invoke(&self, mode: &str, targets: &[String]) -> BuildOutcome {
        match self.run(mode, targets) {
            Ok(succeeded) => BuildOutcome::from_success(succeeded),
            Err(e) => {
                tracing::error!(solution = %self.solution(), "Failed to run build tool: {e}");
                BuildOutcome::FAILED
            }
        }
    }
}

impl HostServices for FileHost {
    fn notify_scripts_reloaded(&self) {
        self.notify_debugger();
    }

    fn restart_timer(&self) {
        self.watcher.restart();
    }

    fn is_reload_needed(&self) -> bool {
        self.gate.is_reload_needed()
    }

    fn reload_assemblies(&self, soft: bool) {
        if let Err(e) = self.gate.reload_assemblies(soft) {
            tracing::error!(stamp = %self.gate.stamp_path(), "Failed to record assembly reload: {e}");
        }
    }
}
