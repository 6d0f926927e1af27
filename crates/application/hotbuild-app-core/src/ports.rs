use camino::Utf8Path;
use hotbuild_core::{BuildOutcome, ProvisionError};

pub trait ProjectProbe: Send + Sync + 'static {
    /// Whether a buildable project exists at `path`.
    fn exists(&self, path: &Utf8Path) -> bool;
}

pub trait PackageProvisioner: Send + Sync + 'static {
    fn provision(&self) -> Result<(), ProvisionError>;
}

pub trait BuildInvoker: Send + Sync + 'static {
    /// Runs the external build and blocks until it terminates.
    fn invoke(&self, mode: &str, targets: &[String]) -> BuildOutcome;
}

/// Services of the running host that react to freshly compiled code.
pub trait HostServices: Send + Sync + 'static {
    /// Asks any attached running instance to reload its scripts. Does not wait for an answer.
    fn notify_scripts_reloaded(&self);
    fn restart_timer(&self);
    fn is_reload_needed(&self) -> bool;
    fn reload_assemblies(&self, soft: bool);
}
