// Worker Domain Model

use crate::domain::job::JobId;
use serde::{Deserialize, Serialize};

/// Worker ID
pub type WorkerId = String;

/// Worker status
///
/// `Offline` is reserved for an administratively drained node; nothing in
/// the controller produces it today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerStatus {
    Online,
    Busy,
    Failed,
    Offline,
}

impl std::fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerStatus::Online => write!(f, "online"),
            WorkerStatus::Busy => write!(f, "busy"),
            WorkerStatus::Failed => write!(f, "failed"),
            WorkerStatus::Offline => write!(f, "offline"),
        }
    }
}

/// Worker node
///
/// `current_job` is non-null iff the worker is BUSY; the referenced job's
/// `worker_id` points back at this worker.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerNode {
    pub worker_id: WorkerId,
    pub status: WorkerStatus,
    pub current_job: Option<JobId>,
    pub last_heartbeat: i64, // epoch ms
    /// Per-minute hazard rate in [0, 1]
    pub failure_probability: f64,
    pub recovery_time_seconds: u64,
}

impl WorkerNode {
    pub fn new(
        worker_id: impl Into<String>,
        failure_probability: f64,
        recovery_time_seconds: u64,
        now_millis: i64,
    ) -> Self {
        Self {
            worker_id: worker_id.into(),
            status: WorkerStatus::Online,
            current_job: None,
            last_heartbeat: now_millis,
            failure_probability,
            recovery_time_seconds,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == WorkerStatus::Online && self.current_job.is_none()
    }
}
