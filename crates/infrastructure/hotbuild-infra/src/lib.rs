pub mod host;
pub mod invoker;
pub mod packages;
pub mod project;

// Re-exports for convenience
pub use host::{AssemblyStampGate, FileHost, HttpDebuggerBridge, WatcherTimer};
pub use invoker::{InvokeError, ProcessBuildInvoker};
pub use packages::{FallbackFolderProvisioner, ProvisionSummary};
pub use project::{find_solution, FsProjectProbe};
