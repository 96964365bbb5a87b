// Gridsim Adapters - simulated workloads and telemetry probes
// Plug into gridsim-core through the JobExecutor and TelemetrySource ports.

pub mod executors;
pub mod telemetry;

pub use executors::{
    default_registry, ComputeJobExecutor, FaultInjectionJobExecutor, MatrixJobExecutor,
    SleepJobExecutor,
};
pub use telemetry::{GpuDevice, HostTelemetry, SyntheticTelemetry};
