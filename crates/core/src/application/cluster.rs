// Cluster State
//
// The single authoritative in-memory store of workers, jobs and the
// pending queue. One mutex (owned by the controller) protects the whole
// struct; nothing here performs IO or sleeps.

use crate::domain::{ClusterStats, Job, JobId, JobPriority, WorkerId, WorkerNode};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use super::constants::{DEFAULT_FAILURE_RATE, DEFAULT_JOB_GENERATION_RATE, DEFAULT_RECOVERY_SECS};

#[derive(Debug)]
pub struct ClusterState {
    /// All jobs ever seen by the controller, keyed by id. The jobs map is
    /// the single owner of job values; the queue and workers hold ids.
    pub jobs: HashMap<JobId, Job>,

    /// PENDING jobs in arrival order; re-sorted by priority each
    /// scheduler tick.
    pub queue: Vec<JobId>,

    /// Worker fleet. BTreeMap keeps tick iteration order deterministic.
    pub workers: BTreeMap<WorkerId, WorkerNode>,

    pub stats: ClusterStats,

    // Simulation knobs
    pub job_generation_rate: f64,
    pub failure_rate: f64,
    pub recovery_time_secs: u64,

    /// Executions dispatched but not yet recorded, keyed by job id with
    /// the retry_count of the dispatched attempt. Guards against double
    /// dispatch and stale completions after a displacement.
    pub in_flight: HashMap<JobId, u32>,
}

impl ClusterState {
    pub fn new(now_millis: i64) -> Self {
        Self {
            jobs: HashMap::new(),
            queue: Vec::new(),
            workers: BTreeMap::new(),
            stats: ClusterStats::new(now_millis),
            job_generation_rate: DEFAULT_JOB_GENERATION_RATE,
            failure_rate: DEFAULT_FAILURE_RATE,
            recovery_time_secs: DEFAULT_RECOVERY_SECS,
            in_flight: HashMap::new(),
        }
    }

    /// Stable-sort the queue by priority descending; ties keep arrival
    /// order, which approximates FIFO within a priority class.
    pub fn sort_queue(&mut self) {
        let jobs = &self.jobs;
        self.queue.sort_by_key(|id| {
            Reverse(
                jobs.get(id)
                    .map(|job| job.priority)
                    .unwrap_or(JobPriority::Low),
            )
        });
    }

    /// Ids of workers that can take a job right now.
    pub fn available_worker_ids(&self) -> Vec<WorkerId> {
        self.workers
            .values()
            .filter(|worker| worker.is_available())
            .map(|worker| worker.worker_id.clone())
            .collect()
    }
}
