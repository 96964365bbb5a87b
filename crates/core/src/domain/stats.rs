// Cluster Statistics

/// Controller counters
///
/// All counters are monotonic except `active_workers`, which oscillates
/// with failures and recoveries.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterStats {
    pub total_jobs: u64,
    pub completed_jobs: u64,
    pub failed_jobs: u64,
    pub worker_failures: u64,
    pub worker_recoveries: u64,
    pub active_workers: i64,
    pub simulation_start: i64, // epoch ms
}

impl ClusterStats {
    pub fn new(now_millis: i64) -> Self {
        Self {
            total_jobs: 0,
            completed_jobs: 0,
            failed_jobs: 0,
            worker_failures: 0,
            worker_recoveries: 0,
            active_workers: 0,
            simulation_start: now_millis,
        }
    }
}
