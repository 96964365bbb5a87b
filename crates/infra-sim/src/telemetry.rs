// Telemetry Probes
//
// Two TelemetrySource implementations: a synthetic generator that models
// a fleet of 8 GiB cards, and a host probe that samples the real machine
// via sysinfo and degrades to synthetic data for any tick where sampling
// fails.

use async_trait::async_trait;
use gridsim_core::port::{GpuSystemInfo, RandomSource, TelemetrySource, TimeProvider};
use std::sync::{Arc, Mutex};
use sysinfo::{Components, System};
use tracing::debug;

/// Memory of one synthetic card (8 GiB)
const SYNTHETIC_GPU_MEMORY: u64 = 8 * 1024 * 1024 * 1024;

/// One simulated or probed GPU device
#[derive(Debug, Clone)]
pub struct GpuDevice {
    pub gpu_id: usize,
    pub name: String,
    pub memory_total: u64,
    pub memory_used: u64,
    pub memory_free: u64,
    pub utilization_gpu: f64,
    pub utilization_memory: f64,
    pub temperature: f64,
    pub power_usage: f64,
    pub last_updated: i64,
}

impl GpuDevice {
    pub fn memory_usage_percent(&self) -> f64 {
        if self.memory_total == 0 {
            return 0.0;
        }
        self.memory_used as f64 / self.memory_total as f64
    }

    /// Below 90 % memory usage the device can take new work.
    pub fn is_available(&self) -> bool {
        self.memory_usage_percent() < 0.9
    }
}

/// Aggregate per-device readings into the snapshot block.
fn aggregate(devices: &[GpuDevice], nvml_available: bool) -> GpuSystemInfo {
    let total_gpus = devices.len();
    let available_gpus = devices.iter().filter(|d| d.is_available()).count();
    let total_memory: u64 = devices.iter().map(|d| d.memory_total).sum();
    let used_memory: u64 = devices.iter().map(|d| d.memory_used).sum();
    let denom = total_gpus.max(1) as f64;

    GpuSystemInfo {
        total_gpus,
        available_gpus,
        total_memory,
        used_memory,
        memory_usage_percent: used_memory as f64 / total_memory.max(1) as f64,
        avg_utilization: devices.iter().map(|d| d.utilization_gpu).sum::<f64>() / denom,
        avg_temperature: devices.iter().map(|d| d.temperature).sum::<f64>() / denom,
        nvml_available,
    }
}

/// Synthetic GPU fleet with randomized load
pub struct SyntheticTelemetry {
    num_gpus: usize,
    random: Arc<dyn RandomSource>,
    time: Arc<dyn TimeProvider>,
    devices: Mutex<Vec<GpuDevice>>,
}

impl SyntheticTelemetry {
    pub fn new(
        num_gpus: usize,
        random: Arc<dyn RandomSource>,
        time: Arc<dyn TimeProvider>,
    ) -> Self {
        let source = Self {
            num_gpus,
            random,
            time,
            devices: Mutex::new(Vec::new()),
        };
        source.regenerate();
        source
    }

    fn regenerate(&self) {
        let now = self.time.now_millis();
        let devices: Vec<GpuDevice> = (0..self.num_gpus)
            .map(|gpu_id| {
                let memory_used = self
                    .random
                    .int_in(0, (SYNTHETIC_GPU_MEMORY as f64 * 0.7) as i64)
                    as u64;
                GpuDevice {
                    gpu_id,
                    name: format!("Simulated GPU {}", gpu_id),
                    memory_total: SYNTHETIC_GPU_MEMORY,
                    memory_used,
                    memory_free: SYNTHETIC_GPU_MEMORY - memory_used,
                    utilization_gpu: self.random.float_in(0.0, 100.0),
                    utilization_memory: self.random.float_in(0.0, 100.0),
                    temperature: self.random.float_in(30.0, 80.0),
                    power_usage: self.random.float_in(50.0, 200.0),
                    last_updated: now,
                }
            })
            .collect();
        *self.devices.lock().unwrap() = devices;
    }

    pub fn devices(&self) -> Vec<GpuDevice> {
        self.devices.lock().unwrap().clone()
    }
}

#[async_trait]
impl TelemetrySource for SyntheticTelemetry {
    async fn refresh(&self) {
        self.regenerate();
    }

    fn system_info(&self) -> GpuSystemInfo {
        aggregate(&self.devices.lock().unwrap(), false)
    }
}

/// Host probe: samples real machine memory, CPU load and temperatures and
/// partitions them across a fixed device count, so the dashboard tracks
/// the box the simulator runs on.
pub struct HostTelemetry {
    num_gpus: usize,
    system: Mutex<System>,
    synthetic: SyntheticTelemetry,
    time: Arc<dyn TimeProvider>,
    info: Mutex<GpuSystemInfo>,
}

impl HostTelemetry {
    pub fn new(
        num_gpus: usize,
        random: Arc<dyn RandomSource>,
        time: Arc<dyn TimeProvider>,
    ) -> Self {
        let synthetic = SyntheticTelemetry::new(num_gpus, random, Arc::clone(&time));
        let info = Mutex::new(synthetic.system_info());
        Self {
            num_gpus,
            system: Mutex::new(System::new_all()),
            synthetic,
            time,
            info,
        }
    }

    fn probe(&self) -> Option<Vec<GpuDevice>> {
        let now = self.time.now_millis();
        let (total, used, cpu) = {
            let mut system = self.system.lock().unwrap();
            system.refresh_all();
            (
                system.total_memory(),
                system.used_memory(),
                system.global_cpu_info().cpu_usage() as f64,
            )
        };
        if total == 0 || self.num_gpus == 0 {
            return None;
        }

        let components = Components::new_with_refreshed_list();
        let temps: Vec<f64> = components
            .iter()
            .map(|c| c.temperature() as f64)
            .collect();
        let temperature = if temps.is_empty() {
            40.0
        } else {
            temps.iter().sum::<f64>() / temps.len() as f64
        };

        let per_total = total / self.num_gpus as u64;
        let per_used = (used / self.num_gpus as u64).min(per_total);
        Some(
            (0..self.num_gpus)
                .map(|gpu_id| GpuDevice {
                    gpu_id,
                    name: format!("Host slice {}", gpu_id),
                    memory_total: per_total,
                    memory_used: per_used,
                    memory_free: per_total - per_used,
                    utilization_gpu: cpu,
                    utilization_memory: if per_total == 0 {
                        0.0
                    } else {
                        per_used as f64 / per_total as f64 * 100.0
                    },
                    temperature,
                    power_usage: 0.0,
                    last_updated: now,
                })
                .collect(),
        )
    }
}

#[async_trait]
impl TelemetrySource for HostTelemetry {
    async fn refresh(&self) {
        let info = match self.probe() {
            Some(devices) => aggregate(&devices, false),
            None => {
                debug!("Host probe unavailable, serving synthetic telemetry");
                self.synthetic.refresh().await;
                self.synthetic.system_info()
            }
        };
        *self.info.lock().unwrap() = info;
    }

    fn system_info(&self) -> GpuSystemInfo {
        self.info.lock().unwrap().clone()
    }
}
