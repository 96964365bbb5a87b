// Snapshot Exporter
//
// Deep-copied, serialization-ready view of the whole controller state.
// Captured under the cluster lock so the returned structures are
// internally consistent; never mutates state.

use crate::application::cluster::ClusterState;
use crate::domain::{Job, JobPriority, JobStatus, JobType, WorkerNode, WorkerStatus};
use crate::port::GpuSystemInfo;
use serde::Serialize;
use std::collections::BTreeMap;

/// Render epoch milliseconds as an ISO-8601 timestamp.
fn iso(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|t| t.to_rfc3339())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationInfo {
    /// Seconds since controller construction
    pub uptime: f64,
    pub job_generation_rate: f64,
    pub failure_rate: f64,
    pub recovery_time: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobView {
    pub job_id: String,
    pub job_type: JobType,
    pub priority: JobPriority,
    pub status: JobStatus,
    pub created_at: String,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
    pub worker_id: Option<String>,
    pub parameters: serde_json::Map<String, serde_json::Value>,
    pub result: Option<serde_json::Value>,
    pub error_message: Option<String>,
    pub retry_count: u32,
    pub max_retries: u32,
    pub duration: Option<f64>,
}

impl JobView {
    fn from_job(job: &Job) -> Self {
        Self {
            job_id: job.job_id.clone(),
            job_type: job.job_type,
            priority: job.priority,
            status: job.status,
            created_at: iso(job.created_at),
            started_at: job.started_at.map(iso),
            completed_at: job.completed_at.map(iso),
            worker_id: job.worker_id.clone(),
            parameters: job.parameters.clone(),
            result: job.result.clone(),
            error_message: job.error_message.clone(),
            retry_count: job.retry_count,
            max_retries: job.max_retries,
            duration: job.duration_seconds(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerView {
    pub worker_id: String,
    pub status: WorkerStatus,
    pub failure_probability: f64,
    pub current_job: Option<JobView>,
    pub is_available: bool,
    pub last_heartbeat: String,
}

impl WorkerView {
    fn from_worker(worker: &WorkerNode, state: &ClusterState) -> Self {
        let current_job = worker
            .current_job
            .as_ref()
            .and_then(|id| state.jobs.get(id))
            .map(JobView::from_job);
        Self {
            worker_id: worker.worker_id.clone(),
            status: worker.status,
            failure_probability: worker.failure_probability,
            current_job,
            is_available: worker.is_available(),
            last_heartbeat: iso(worker.last_heartbeat),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsView {
    pub total_jobs: u64,
    pub completed_jobs: u64,
    pub failed_jobs: u64,
    pub worker_failures: u64,
    pub worker_recoveries: u64,
    pub active_workers: i64,
    pub simulation_start: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSnapshot {
    pub simulation_info: SimulationInfo,
    pub workers: BTreeMap<String, WorkerView>,
    pub jobs: BTreeMap<String, JobView>,
    pub job_queue: Vec<JobView>,
    pub stats: StatsView,
    pub gpu_info: GpuSystemInfo,
}

impl ClusterSnapshot {
    pub(crate) fn capture(state: &ClusterState, gpu_info: GpuSystemInfo, now_millis: i64) -> Self {
        let workers = state
            .workers
            .values()
            .map(|w| (w.worker_id.clone(), WorkerView::from_worker(w, state)))
            .collect();

        let jobs = state
            .jobs
            .values()
            .map(|j| (j.job_id.clone(), JobView::from_job(j)))
            .collect();

        let job_queue = state
            .queue
            .iter()
            .filter_map(|id| state.jobs.get(id))
            .map(JobView::from_job)
            .collect();

        Self {
            simulation_info: SimulationInfo {
                uptime: (now_millis - state.stats.simulation_start) as f64 / 1000.0,
                job_generation_rate: state.job_generation_rate,
                failure_rate: state.failure_rate,
                recovery_time: state.recovery_time_secs,
            },
            workers,
            jobs,
            job_queue,
            stats: StatsView {
                total_jobs: state.stats.total_jobs,
                completed_jobs: state.stats.completed_jobs,
                failed_jobs: state.stats.failed_jobs,
                worker_failures: state.stats.worker_failures,
                worker_recoveries: state.stats.worker_recoveries,
                active_workers: state.stats.active_workers,
                simulation_start: iso(state.stats.simulation_start),
            },
            gpu_info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_renders_rfc3339() {
        let rendered = iso(1_700_000_000_000);
        assert!(rendered.starts_with("2023-11-14T"));
        assert!(chrono::DateTime::parse_from_rfc3339(&rendered).is_ok());
    }

    #[test]
    fn test_job_view_null_timestamps_serialize_as_null() {
        let job = Job::new(
            "calc-standard-1234",
            JobType::Compute,
            JobPriority::Normal,
            serde_json::Map::new(),
            1_700_000_000_000,
        );
        let value = serde_json::to_value(JobView::from_job(&job)).unwrap();
        assert!(value["started_at"].is_null());
        assert!(value["completed_at"].is_null());
        assert!(value["duration"].is_null());
        assert_eq!(value["status"], "pending");
        assert_eq!(value["priority"], 2);
        assert_eq!(value["job_type"], "compute");
    }
}
