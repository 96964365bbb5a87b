// Worker Failure & Recovery
//
// Fault injector and heartbeat monitor ticks, plus the failure/recovery
// state machine they drive. Recovery runs in its own short-lived task per
// failure and is idempotent against a worker that already came back.

use super::ClusterController;
use crate::application::constants::{HEARTBEAT_FAILURE_CHANCE, MAX_RETRIES_MESSAGE};
use crate::domain::{JobStatus, WorkerId, WorkerStatus};
use std::time::Duration;
use tracing::{error, info, warn};

impl ClusterController {
    /// Fault injector tick: roll the per-minute hazard for every worker
    /// that is not already FAILED. Busy workers are eligible; displacing
    /// their running job is the point of the exercise.
    pub fn fault_tick(&self) {
        let mut doomed: Vec<WorkerId> = Vec::new();
        {
            let state = self.lock_state();
            for worker in state.workers.values() {
                if !matches!(worker.status, WorkerStatus::Online | WorkerStatus::Busy) {
                    continue;
                }
                if self.random().next_f64() < worker.failure_probability / 60.0 {
                    doomed.push(worker.worker_id.clone());
                }
            }
        }
        for worker_id in doomed {
            self.fail_worker(&worker_id);
        }
    }

    /// Heartbeat monitor tick: refresh liveness for ONLINE workers, with a
    /// rare spontaneous failure.
    pub fn heartbeat_tick(&self) {
        let now = self.time().now_millis();
        let mut doomed: Vec<WorkerId> = Vec::new();
        {
            let mut state = self.lock_state();
            let online: Vec<WorkerId> = state
                .workers
                .values()
                .filter(|worker| worker.status == WorkerStatus::Online)
                .map(|worker| worker.worker_id.clone())
                .collect();

            for worker_id in online {
                if self.random().next_f64() < HEARTBEAT_FAILURE_CHANCE {
                    doomed.push(worker_id);
                } else if let Some(worker) = state.workers.get_mut(&worker_id) {
                    worker.last_heartbeat = now;
                }
            }
        }
        for worker_id in doomed {
            self.fail_worker(&worker_id);
        }
    }

    /// Fail a worker: displace its in-flight job per the retry budget and
    /// schedule recovery. Returns false for an unknown or already FAILED
    /// worker.
    pub fn fail_worker(&self, worker_id: &str) -> bool {
        let now = self.time().now_millis();
        let recovery_secs;
        {
            let mut state = self.lock_state();

            let displaced = {
                let Some(worker) = state.workers.get_mut(worker_id) else {
                    return false;
                };
                if worker.status == WorkerStatus::Failed {
                    return false;
                }
                worker.status = WorkerStatus::Failed;
                recovery_secs = worker.recovery_time_seconds;
                worker.current_job.take()
            };

            warn!(worker_id = %worker_id, "Worker failure");
            state.stats.worker_failures += 1;
            state.stats.active_workers -= 1;

            if let Some(job_id) = displaced {
                let mut requeued_retry = None;
                let mut exhausted = false;
                if let Some(job) = state.jobs.get_mut(&job_id) {
                    // Only in-flight RUNNING jobs are displaced; a job that
                    // already reached a terminal state keeps it.
                    if job.status == JobStatus::Running {
                        if job.retry_count < job.max_retries {
                            job.requeue();
                            requeued_retry = Some(job.retry_count);
                        } else {
                            job.displace();
                            job.fail(MAX_RETRIES_MESSAGE, now);
                            exhausted = true;
                        }
                    }
                }
                if let Some(retry) = requeued_retry {
                    state.queue.push(job_id.clone());
                    info!(
                        job_id = %job_id,
                        retry = retry,
                        "Job requeued after worker failure"
                    );
                } else if exhausted {
                    state.stats.failed_jobs += 1;
                    error!(job_id = %job_id, "Job failed after max retries");
                }
            }
        }

        // Schedule recovery outside the lock.
        if let Some(controller) = self.strong() {
            let worker_id = worker_id.to_string();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(recovery_secs)).await;
                controller.recover_worker(&worker_id);
            });
        }
        true
    }

    /// Bring a FAILED worker back ONLINE. Idempotent: a second invocation
    /// for the same failure event is a no-op.
    pub fn recover_worker(&self, worker_id: &str) -> bool {
        let now = self.time().now_millis();
        let mut state = self.lock_state();

        let recovered = match state.workers.get_mut(worker_id) {
            Some(worker) if worker.status == WorkerStatus::Failed => {
                worker.status = WorkerStatus::Online;
                worker.last_heartbeat = now;
                true
            }
            _ => false,
        };

        if recovered {
            state.stats.worker_recoveries += 1;
            state.stats.active_workers += 1;
            info!(worker_id = %worker_id, "Worker recovered and back online");
        }
        recovered
    }
}
