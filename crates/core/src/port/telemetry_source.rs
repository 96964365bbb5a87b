// Telemetry Source Port
//
// Opaque provider of cluster-wide GPU resource information. The controller
// only reads aggregated snapshots; it never schedules against telemetry.

use async_trait::async_trait;
use serde::Serialize;

/// Aggregated GPU system information, serialized into the status snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpuSystemInfo {
    pub total_gpus: usize,
    pub available_gpus: usize,
    pub total_memory: u64,
    pub used_memory: u64,
    /// Fraction of total memory in use, in [0, 1]
    pub memory_usage_percent: f64,
    pub avg_utilization: f64,
    pub avg_temperature: f64,
    pub nvml_available: bool,
}

impl Default for GpuSystemInfo {
    fn default() -> Self {
        Self {
            total_gpus: 0,
            available_gpus: 0,
            total_memory: 0,
            used_memory: 0,
            memory_usage_percent: 0.0,
            avg_utilization: 0.0,
            avg_temperature: 0.0,
            nvml_available: false,
        }
    }
}

/// Telemetry source port
///
/// Implementations cache their readings internally: `refresh` is driven by
/// the controller's telemetry loop, `system_info` is a cheap read that the
/// snapshot exporter can call without blocking on a probe.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Refresh cached readings. Probe failures must be absorbed here
    /// (degrade, never propagate).
    async fn refresh(&self);

    /// Last aggregated reading.
    fn system_info(&self) -> GpuSystemInfo;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;

    /// Telemetry source that returns a fixed reading
    pub struct StaticTelemetry {
        info: GpuSystemInfo,
    }

    impl StaticTelemetry {
        pub fn new(info: GpuSystemInfo) -> Self {
            Self { info }
        }
    }

    impl Default for StaticTelemetry {
        fn default() -> Self {
            Self::new(GpuSystemInfo::default())
        }
    }

    #[async_trait]
    impl TelemetrySource for StaticTelemetry {
        async fn refresh(&self) {}

        fn system_info(&self) -> GpuSystemInfo {
            self.info.clone()
        }
    }
}
