// Job Executor Port
//
// Executors are pure from the controller's point of view: they consume a
// job and produce a result value or a failure. Bodies may block for
// seconds, so the runner dispatches them outside the cluster lock.

use crate::domain::Job;
use async_trait::async_trait;
use thiserror::Error;

/// Execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// Executor body failed; the message lands in `job.error_message`.
    #[error("{0}")]
    Failed(String),

    /// No registered executor claims the job type.
    #[error("No executor found for job type: {0}")]
    NoExecutor(String),
}

/// Job executor capability
#[async_trait]
pub trait JobExecutor: Send + Sync {
    /// Whether this executor handles the given job.
    fn can_execute(&self, job: &Job) -> bool;

    /// Execute the job and return its result value.
    async fn execute(&self, job: &Job) -> Result<serde_json::Value, ExecutionError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::domain::JobType;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Mock executor behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Succeed immediately with the given value
        Success(serde_json::Value),
        /// Fail with the given message
        Fail(String),
        /// Sleep, then succeed (for in-flight displacement tests)
        SleepMs(u64),
    }

    /// Mock executor claiming one job type
    pub struct MockExecutor {
        job_type: JobType,
        behavior: MockBehavior,
        call_count: AtomicUsize,
    }

    impl MockExecutor {
        pub fn new(job_type: JobType, behavior: MockBehavior) -> Self {
            Self {
                job_type,
                behavior,
                call_count: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl JobExecutor for MockExecutor {
        fn can_execute(&self, job: &Job) -> bool {
            job.job_type == self.job_type
        }

        async fn execute(&self, _job: &Job) -> Result<serde_json::Value, ExecutionError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                MockBehavior::Success(value) => Ok(value.clone()),
                MockBehavior::Fail(message) => Err(ExecutionError::Failed(message.clone())),
                MockBehavior::SleepMs(ms) => {
                    tokio::time::sleep(Duration::from_millis(*ms)).await;
                    Ok(serde_json::json!("slept"))
                }
            }
        }
    }
}
