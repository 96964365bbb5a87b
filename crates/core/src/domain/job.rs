// Job Domain Model

use serde::{Deserialize, Serialize, Serializer};

/// Job ID (human-readable, unique within the controller)
pub type JobId = String;

/// Job parameters (JSON object, keys depend on the job type)
pub type JobParameters = serde_json::Map<String, serde_json::Value>;

/// Default retry budget for generated jobs
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Job status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
            JobStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Job priority; higher ordinal is dispatched first.
/// Serializes as its ordinal value (LOW=1 .. CRITICAL=4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum JobPriority {
    Low = 1,
    Normal = 2,
    High = 3,
    Critical = 4,
}

impl JobPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobPriority::Low => "low",
            JobPriority::Normal => "normal",
            JobPriority::High => "high",
            JobPriority::Critical => "critical",
        }
    }
}

impl Serialize for JobPriority {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_i32(*self as i32)
    }
}

impl std::fmt::Display for JobPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Job type (closed set of simulated workloads)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    Sleep,
    Compute,
    Matrix,
    FaultInjection,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Sleep => "sleep",
            JobType::Compute => "compute",
            JobType::Matrix => "matrix",
            JobType::FaultInjection => "fault_injection",
        }
    }
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Job entity
///
/// Timestamps are epoch milliseconds from the injected `TimeProvider`;
/// snapshot views render them as ISO-8601.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub job_id: JobId,
    pub job_type: JobType,
    pub priority: JobPriority,
    pub status: JobStatus,

    pub created_at: i64, // epoch ms
    pub started_at: Option<i64>,
    pub completed_at: Option<i64>,

    pub worker_id: Option<String>,
    pub parameters: JobParameters,

    pub result: Option<serde_json::Value>,
    pub error_message: Option<String>,

    pub retry_count: u32,
    pub max_retries: u32,
}

impl Job {
    /// Create a new PENDING job.
    ///
    /// `job_id` and `created_at` are injected, not generated; production
    /// code goes through the generator with its id/time providers.
    pub fn new(
        job_id: impl Into<String>,
        job_type: JobType,
        priority: JobPriority,
        parameters: JobParameters,
        created_at: i64,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            job_type,
            priority,
            status: JobStatus::Pending,
            created_at,
            started_at: None,
            completed_at: None,
            worker_id: None,
            parameters,
            result: None,
            error_message: None,
            retry_count: 0,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Duration in seconds, derived from started/completed timestamps.
    pub fn duration_seconds(&self) -> Option<f64> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some((end - start) as f64 / 1000.0),
            _ => None,
        }
    }

    /// Transition to RUNNING on assignment to a worker.
    pub fn start(
        &mut self,
        worker_id: impl Into<String>,
        now_millis: i64,
    ) -> crate::domain::error::Result<()> {
        if self.status != JobStatus::Pending {
            return Err(crate::domain::error::DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: "running".to_string(),
            });
        }
        self.status = JobStatus::Running;
        self.started_at = Some(now_millis);
        self.worker_id = Some(worker_id.into());
        Ok(())
    }

    /// Transition to COMPLETED with a result value.
    pub fn complete(
        &mut self,
        result: serde_json::Value,
        now_millis: i64,
    ) -> crate::domain::error::Result<()> {
        if self.status != JobStatus::Running {
            return Err(crate::domain::error::DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: "completed".to_string(),
            });
        }
        self.status = JobStatus::Completed;
        self.completed_at = Some(now_millis);
        self.result = Some(result);
        Ok(())
    }

    /// Mark as FAILED with an error message.
    pub fn fail(&mut self, message: impl Into<String>, now_millis: i64) {
        self.status = JobStatus::Failed;
        self.completed_at = Some(now_millis);
        self.error_message = Some(message.into());
    }

    /// Put a displaced job back into PENDING and burn one retry.
    ///
    /// Only called when `retry_count < max_retries`; the caller decides
    /// between requeue and terminal failure before touching the counter.
    pub fn requeue(&mut self) {
        self.status = JobStatus::Pending;
        self.worker_id = None;
        self.started_at = None;
        self.retry_count += 1;
    }

    /// Detach a displaced job from its worker without requeuing it.
    pub fn displace(&mut self) {
        self.worker_id = None;
        self.started_at = None;
    }
}
