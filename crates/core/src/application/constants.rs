// Controller cadences and defaults (no magic values in the loops)

use std::time::Duration;

/// Generator tick: one emission roll per second
pub const GENERATOR_TICK: Duration = Duration::from_secs(1);

/// Scheduler tick
pub const SCHEDULER_TICK: Duration = Duration::from_millis(500);

/// Executor runner tick
pub const RUNNER_TICK: Duration = Duration::from_secs(1);

/// Fault injector tick
pub const FAULT_INJECTOR_TICK: Duration = Duration::from_secs(5);

/// Heartbeat monitor tick
pub const HEARTBEAT_TICK: Duration = Duration::from_secs(10);

/// Telemetry refresh tick
pub const TELEMETRY_TICK: Duration = Duration::from_secs(1);

/// Default job generation rate (jobs per minute)
pub const DEFAULT_JOB_GENERATION_RATE: f64 = 2.0;

/// Accepted range for runtime rate updates (jobs per minute)
pub const MIN_JOB_GENERATION_RATE: f64 = 0.1;
pub const MAX_JOB_GENERATION_RATE: f64 = 50.0;

/// Default cluster-wide failure rate knob (informational, per hour)
pub const DEFAULT_FAILURE_RATE: f64 = 0.1;

/// Default worker recovery delay
pub const DEFAULT_RECOVERY_SECS: u64 = 30;

/// Spontaneous failure chance per heartbeat check
pub const HEARTBEAT_FAILURE_CHANCE: f64 = 0.001;

/// Terminal message for jobs that exhaust their retry budget
pub const MAX_RETRIES_MESSAGE: &str = "Max retries exceeded due to worker failures";
