// Application Layer - The cluster controller and its collaborators

pub mod cluster;
pub mod constants;
pub mod controller;
pub mod registry;
pub mod shutdown;
pub mod snapshot;

// Re-exports
pub use cluster::ClusterState;
pub use controller::{ClusterController, ControllerConfig, ExecutionTicket};
pub use registry::ExecutorRegistry;
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
pub use snapshot::ClusterSnapshot;
