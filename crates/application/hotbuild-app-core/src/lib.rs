pub mod adapters;
pub mod dispatcher;
pub mod notifier;
pub mod orchestrator;
pub mod ports;
pub mod report;
pub mod worker;

pub use adapters::FileOrchestrator;
pub use dispatcher::CommandDispatcher;
pub use notifier::ReloadNotifier;
pub use orchestrator::BuildOrchestrator;
pub use ports::*;
pub use report::{CommandOutcome, CommandReport};
pub use worker::{BuildEvent, BuildRunId, BuildWorker, WorkerError};
