// Executor Registry
//
// Linear scan in registration order; the first executor whose
// `can_execute` claims the job wins.

use crate::domain::Job;
use crate::port::{ExecutionError, JobExecutor};
use std::sync::Arc;

#[derive(Default)]
pub struct ExecutorRegistry {
    executors: Vec<Arc<dyn JobExecutor>>,
}

impl ExecutorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an executor. Registration order is dispatch order.
    pub fn register(&mut self, executor: Arc<dyn JobExecutor>) {
        self.executors.push(executor);
    }

    fn executor_for(&self, job: &Job) -> Option<&Arc<dyn JobExecutor>> {
        self.executors.iter().find(|e| e.can_execute(job))
    }

    /// Execute a job with the first matching executor.
    pub async fn execute(&self, job: &Job) -> Result<serde_json::Value, ExecutionError> {
        let executor = self
            .executor_for(job)
            .ok_or_else(|| ExecutionError::NoExecutor(job.job_type.as_str().to_string()))?;
        executor.execute(job).await
    }
}
