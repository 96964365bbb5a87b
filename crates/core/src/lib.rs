// Gridsim Core - Domain Logic & Ports
// NO adapter dependencies: job executors, telemetry probes and the HTTP
// surface live in their own crates and plug in through the port layer.

pub mod application;
pub mod domain;
pub mod port;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
