use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use hotbuild_core::BuildCommand;
use tokio::sync::mpsc;

use crate::orchestrator::BuildOrchestrator;
use crate::ports::{BuildInvoker, HostServices, PackageProvisioner, ProjectProbe};
use crate::report::CommandReport;

pub type BuildRunId = uuid::Uuid;

#[derive(Debug, Clone)]
pub enum BuildEvent {
    Started {
        run_id: BuildRunId,
        command: BuildCommand,
    },
    Finished {
        run_id: BuildRunId,
        report: CommandReport,
    },
}

impl BuildEvent {
    pub fn run_id(&self) -> BuildRunId {
        match self {
            BuildEvent::Started { run_id, .. } | BuildEvent::Finished { run_id, .. } => *run_id,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("a build command is already running")]
    Busy,
    #[error("failed to spawn build worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Runs orchestrator commands on a dedicated thread, one at a time.
///
/// Progress is reported as [`BuildEvent`]s that the host drains with
/// [`BuildWorker::drain_events`] from its own loop. The channel is unbounded
/// so a host that drains rarely never stalls the build thread.
pub struct BuildWorker<P, V, I, H> {
    orchestrator: Arc<BuildOrchestrator<P, V, I, H>>,
    busy: Arc<AtomicBool>,
    // Held while flipping `busy` and publishing, so one run's `Finished`
    // is always queued before the next run's `Started`.
    publish: Arc<Mutex<()>>,
    tx: mpsc::UnboundedSender<BuildEvent>,
    rx: mpsc::UnboundedReceiver<BuildEvent>,
}

struct BusyGuard {
    busy: Arc<AtomicBool>,
    armed: bool,
}

impl BusyGuard {
    fn release(&mut self) {
        if self.armed {
            self.armed = false;
            self.busy.store(false, Ordering::Release);
        }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.release();
    }
}

impl<P, V, I, H> BuildWorker<P, V, I, H>
where
    P: ProjectProbe,
    V: PackageProvisioner,
    I: BuildInvoker,
    H: HostServices,
{
    pub fn new(orchestrator: Arc<BuildOrchestrator<P, V, I, H>>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            orchestrator,
            busy: Arc::new(AtomicBool::new(false)),
            publish: Arc::new(Mutex::new(())),
            tx,
            rx,
        }
    }

    /// True while a command is in flight. Hosts use this to disable their build triggers.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Starts `command` on the build thread. Once the previous run's
    /// `Finished` event has been published, the worker is already idle.
    pub fn start(&self, command: BuildCommand) -> Result<BuildRunId, WorkerError> {
        let _order = self.publish.lock().unwrap_or_else(PoisonError::into_inner);
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("Ignoring {command}: another build command is running");
            return Err(WorkerError::Busy);
        }

        let run_id: BuildRunId = uuid::Uuid::new_v4();
        let mut guard = BusyGuard {
            busy: self.busy.clone(),
            armed: true,
        };
        let orchestrator = self.orchestrator.clone();
        let publish = self.publish.clone();
        let tx = self.tx.clone();

        std::thread::Builder::new()
            .name("hotbuild-build".into())
            .spawn(move || {
                let report = orchestrator.execute(command);
                let _order = publish.lock().unwrap_or_else(PoisonError::into_inner);
                guard.release();
                let _ = tx.send(BuildEvent::Finished { run_id, report });
            })?;

        let _ = self.tx.send(BuildEvent::Started { run_id, command });
        Ok(run_id)
    }

    /// Collects every event published so far without blocking.
    pub fn drain_events(&mut self) -> Vec<BuildEvent> {
        let mut events = Vec::new();
        while let Ok(ev) = self.rx.try_recv() {
            events.push(ev);
        }
        events
    }

    /// Blocks until the next event arrives. Must not be called from inside an async runtime.
    pub fn next_event_blocking(&mut self) -> Option<BuildEvent> {
        self.rx.blocking_recv()
    }
}
