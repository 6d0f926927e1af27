mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::{orchestrator, Scenario};
use hotbuild_app_core::{BuildEvent, BuildWorker, CommandOutcome};
use hotbuild_core::BuildCommand;

fn wait_until_idle<P, V, I, H>(worker: &BuildWorker<P, V, I, H>)
where
    P: hotbuild_app_core::ProjectProbe,
    V: hotbuild_app_core::PackageProvisioner,
    I: hotbuild_app_core::BuildInvoker,
    H: hotbuild_app_core::HostServices,
{
    let deadline = Instant::now() + Duration::from_secs(3);
    while worker.is_busy() {
        assert!(Instant::now() < deadline, "worker never became idle");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn worker_reports_start_and_finish_for_one_run() {
    let (orch, _log) = orchestrator(Scenario::default());
    let mut worker = BuildWorker::new(Arc::new(orch));

    let run_id = worker.start(BuildCommand::Rebuild).expect("worker starts");

    match worker.next_event_blocking() {
        Some(BuildEvent::Started { run_id: id, command }) => {
            assert_eq!(id, run_id);
            assert_eq!(command, BuildCommand::Rebuild);
        }
        other => panic!("expected Started, got {other:?}"),
    }

    match worker.next_event_blocking() {
        Some(BuildEvent::Finished { run_id: id, report }) => {
            assert_eq!(id, run_id);
            assert_eq!(report.outcome, CommandOutcome::Built { reloaded: true });
        }
        other => panic!("expected Finished, got {other:?}"),
    }

    wait_until_idle(&worker);
    assert!(worker.drain_events().is_empty());
}

#[test]
fn worker_accepts_a_new_command_once_idle() {
    let (orch, log) = orchestrator(Scenario::default());
    let mut worker = BuildWorker::new(Arc::new(orch));

    let first = worker.start(BuildCommand::Build).expect("first run");
    wait_until_idle(&worker);
    let second = worker.start(BuildCommand::Clean).expect("second run");
    wait_until_idle(&worker);

    assert_ne!(first, second);
    let events = worker.drain_events();
    assert_eq!(events.len(), 4);
    assert!(events[..2].iter().all(|e| e.run_id() == first));
    assert!(events[2..].iter().all(|e| e.run_id() == second));
    assert_eq!(
        log.count(|c| matches!(c, common::Call::Invoke { .. })),
        2
    );
}

struct GatedInvoker {
    release: std::sync::Mutex<std::sync::mpsc::Receiver<()>>,
}

impl hotbuild_app_core::BuildInvoker for GatedInvoker {
    fn invoke(&self, _mode: &str, _targets: &[String]) -> hotbuild_core::BuildOutcome {
        let _ = self.release.lock().unwrap().recv();
        hotbuild_core::BuildOutcome::SUCCEEDED
    }
}

#[test]
fn overlapping_start_is_rejected_while_a_build_runs() {
    let log = common::CallLog::default();
    let (release_tx, release_rx) = std::sync::mpsc::channel();
    let orch = hotbuild_app_core::BuildOrchestrator::new(
        camino::Utf8PathBuf::from("/project/Game.sln"),
        "Debug",
        common::FakeProbe {
            log: log.clone(),
            exists: true,
        },
        common::FakeProvisioner {
            log: log.clone(),
            fail: false,
        },
        GatedInvoker {
            release: std::sync::Mutex::new(release_rx),
        },
        common::FakeHost {
            log: log.clone(),
            reload_needed: false,
        },
    );
    let mut worker = BuildWorker::new(Arc::new(orch));

    worker.start(BuildCommand::Build).expect("first run");
    assert!(worker.is_busy());
    assert!(matches!(
        worker.start(BuildCommand::Clean),
        Err(hotbuild_app_core::WorkerError::Busy)
    ));

    release_tx.send(()).unwrap();
    wait_until_idle(&worker);

    let finished = worker
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, BuildEvent::Finished { .. }))
        .count();
    assert_eq!(finished, 1);
}

#[test]
fn host_can_restart_as_soon_as_finished_arrives() {
    let (orch, _log) = orchestrator(Scenario::default());
    let mut worker = BuildWorker::new(Arc::new(orch));

    for _ in 0..200 {
        let run_id = worker.start(BuildCommand::Build).expect("worker idle after Finished");
        loop {
            match worker.next_event_blocking() {
                Some(BuildEvent::Finished { run_id: id, .. }) => {
                    assert_eq!(id, run_id);
                    break;
                }
                Some(BuildEvent::Started { .. }) => continue,
                None => panic!("event channel closed"),
            }
        }
        assert!(!worker.is_busy());
    }
}

#[test]
fn undrained_events_never_stall_the_worker() {
    let (orch, log) = orchestrator(Scenario::default());
    let mut worker = BuildWorker::new(Arc::new(orch));

    for _ in 0..120 {
        worker.start(BuildCommand::Clean).expect("worker starts");
        wait_until_idle(&worker);
    }

    let events = worker.drain_events();
    assert_eq!(events.len(), 240);
    assert_eq!(
        log.count(|c| matches!(c, common::Call::Invoke { .. })),
        120
    );
    for pair in events.chunks(2) {
        assert!(matches!(pair[0], BuildEvent::Started { .. }));
        assert!(matches!(pair[1], BuildEvent::Finished { .. }));
        assert_eq!(pair[0].run_id(), pair[1].run_id());
    }
}
