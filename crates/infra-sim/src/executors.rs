// Simulated Workload Executors
//
// Each executor stands in for a class of GPU work: blocking waits,
// accumulation loops, dense matrix multiplies, and deliberate failures.
// CPU-heavy bodies run on the blocking pool so they never stall the
// controller's activities.

use async_trait::async_trait;
use gridsim_core::application::ExecutorRegistry;
use gridsim_core::domain::{Job, JobType};
use gridsim_core::port::{ExecutionError, JobExecutor, RandomSource};
use ndarray::Array2;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

/// Largest matrix edge multiplied for real; bigger requests take the
/// bounded fallback path.
const MATRIX_DENSE_LIMIT: usize = 2048;

fn param_f64(job: &Job, key: &str, default: f64) -> f64 {
    job.parameters
        .get(key)
        .and_then(Value::as_f64)
        .unwrap_or(default)
}

fn param_usize(job: &Job, key: &str, default: usize) -> usize {
    job.parameters
        .get(key)
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .unwrap_or(default)
}

/// Render a duration the way it was provided: integer parameters without
/// a trailing fraction.
fn display_seconds(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Blocking wait, the stand-in for IO-bound work.
pub struct SleepJobExecutor;

#[async_trait]
impl JobExecutor for SleepJobExecutor {
    fn can_execute(&self, job: &Job) -> bool {
        job.job_type == JobType::Sleep
    }

    async fn execute(&self, job: &Job) -> Result<Value, ExecutionError> {
        let duration = param_f64(job, "duration", 5.0).max(0.0);
        tokio::time::sleep(Duration::from_secs_f64(duration)).await;
        Ok(json!(format!(
            "Sleep job completed after {} seconds",
            display_seconds(duration)
        )))
    }
}

/// Accumulation loop, the stand-in for raw computation. No failure path.
pub struct ComputeJobExecutor {
    random: Arc<dyn RandomSource>,
}

impl ComputeJobExecutor {
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self { random }
    }
}

#[async_trait]
impl JobExecutor for ComputeJobExecutor {
    fn can_execute(&self, job: &Job) -> bool {
        job.job_type == JobType::Compute
    }

    async fn execute(&self, job: &Job) -> Result<Value, ExecutionError> {
        let iterations = param_usize(job, "iterations", 1_000_000);
        let random = Arc::clone(&self.random);
        let result = tokio::task::spawn_blocking(move || {
            let mut acc = 0.0_f64;
            for i in 0..iterations {
                acc += i as f64 * random.next_f64();
            }
            acc
        })
        .await
        .map_err(|e| ExecutionError::Failed(format!("compute task aborted: {e}")))?;

        Ok(json!(format!("Compute job completed: {:.2}", result)))
    }
}

/// Dense matrix multiply, the stand-in for linear-algebra workloads.
pub struct MatrixJobExecutor {
    random: Arc<dyn RandomSource>,
}

impl MatrixJobExecutor {
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self { random }
    }
}

#[async_trait]
impl JobExecutor for MatrixJobExecutor {
    fn can_execute(&self, job: &Job) -> bool {
        job.job_type == JobType::Matrix
    }

    async fn execute(&self, job: &Job) -> Result<Value, ExecutionError> {
        let size = param_usize(job, "matrix_size", 1000);

        if size <= MATRIX_DENSE_LIMIT {
            let random = Arc::clone(&self.random);
            let shape = tokio::task::spawn_blocking(move || {
                let a = Array2::from_shape_fn((size, size), |_| random.next_f64());
                let b = Array2::from_shape_fn((size, size), |_| random.next_f64());
                a.dot(&b).dim()
            })
            .await
            .map_err(|e| ExecutionError::Failed(format!("matrix task aborted: {e}")))?;

            Ok(json!(format!(
                "Matrix multiplication completed: ({}, {})",
                shape.0, shape.1
            )))
        } else {
            // Bounded simulation for sizes we refuse to multiply densely
            let bound = size.min(100);
            let mut acc: u64 = 0;
            for i in 0..bound {
                for j in 0..bound {
                    acc += ((i * j) % 1000) as u64;
                }
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(json!(format!(
                "Matrix simulation completed (fallback): {} (size: {}x{})",
                acc, bound, bound
            )))
        }
    }
}

/// Executor that fails on purpose to exercise recovery paths.
pub struct FaultInjectionJobExecutor {
    random: Arc<dyn RandomSource>,
}

impl FaultInjectionJobExecutor {
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self { random }
    }
}

#[async_trait]
impl JobExecutor for FaultInjectionJobExecutor {
    fn can_execute(&self, job: &Job) -> bool {
        job.job_type == JobType::FaultInjection
    }

    async fn execute(&self, job: &Job) -> Result<Value, ExecutionError> {
        let failure_rate = param_f64(job, "failure_rate", 0.1);
        if self.random.next_f64() < failure_rate {
            return Err(ExecutionError::Failed(format!(
                "Simulated failure in job {}",
                job.job_id
            )));
        }

        let duration = param_f64(job, "duration", 3.0).max(0.0);
        tokio::time::sleep(Duration::from_secs_f64(duration)).await;
        Ok(json!(format!(
            "Fault injection job completed after {} seconds",
            display_seconds(duration)
        )))
    }
}

/// Registry with the four built-in executors in their canonical order.
pub fn default_registry(random: &Arc<dyn RandomSource>) -> ExecutorRegistry {
    let mut registry = ExecutorRegistry::new();
    registry.register(Arc::new(SleepJobExecutor));
    registry.register(Arc::new(ComputeJobExecutor::new(Arc::clone(random))));
    registry.register(Arc::new(MatrixJobExecutor::new(Arc::clone(random))));
    registry.register(Arc::new(FaultInjectionJobExecutor::new(Arc::clone(random))));
    registry
}
