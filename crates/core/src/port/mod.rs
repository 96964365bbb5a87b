// Port Layer - Interfaces for external dependencies

pub mod job_executor;
pub mod random_source;
pub mod telemetry_source;
pub mod time_provider;

// Re-exports
pub use job_executor::{ExecutionError, JobExecutor};
pub use random_source::{RandomSource, SeededRandom, ThreadRngSource};
pub use telemetry_source::{GpuSystemInfo, TelemetrySource};
pub use time_provider::TimeProvider;
