use std::sync::Arc;

use crate::ports::HostServices;

/// Post-build sequence that lets the host pick up new assemblies.
///
/// The debugger notification and the watcher restart always happen before the
/// reload gate is consulted, since a full reload may tear down state those two
/// calls rely on.
pub struct ReloadNotifier<H> {
    host: Arc<H>,
}

impl<H> Clone for ReloadNotifier<H> {
    fn clone(&self) -> Self {
        Self {
            host: self.host.clone(),
        }
    }
}

impl<H: HostServices> ReloadNotifier<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Returns whether an assembly reload was performed.
    pub fn run(&self) -> bool {
        self.host.notify_scripts_reloaded();
        self.host.restart_timer();

        if !self.host.is_reload_needed() {
            tracing::debug!("Assemblies are current; skipping reload");
            return false;
        }

        tracing::info!("Reloading assemblies");
        self.host.reload_assemblies(false);
        true
    }
}
