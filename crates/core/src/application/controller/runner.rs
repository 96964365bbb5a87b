// Executor Runner
//
// Advances RUNNING jobs to a terminal status. The runner is a harness,
// not a bottleneck: each (worker, job) assignment is dispatched to its
// own task, and the cluster lock is only taken to snapshot assignments
// and to record completions.

use super::ClusterController;
use crate::domain::{Job, JobStatus, WorkerId, WorkerStatus};
use crate::port::ExecutionError;
use std::sync::Arc;
use tracing::{debug, error, info};

/// A dispatched (worker, job) execution.
///
/// `attempt` pins the job's retry_count at dispatch time so a completion
/// arriving after the job was displaced and retried is recognized as
/// stale and discarded.
#[derive(Debug, Clone)]
pub struct ExecutionTicket {
    pub job: Job,
    pub worker_id: WorkerId,
    pub attempt: u32,
}

impl ClusterController {
    /// One runner tick: dispatch every assigned-but-undispatched job to
    /// its own execution context.
    pub fn runner_tick(&self) {
        let Some(controller) = self.strong() else {
            return;
        };
        for ticket in self.begin_executions() {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move {
                controller.execute_assignment(ticket).await;
            });
        }
    }

    /// Snapshot the (worker, job) pairs that are RUNNING but not yet
    /// dispatched, marking them in-flight. Holds the lock only for the
    /// snapshot; the returned tickets are executed without it.
    pub fn begin_executions(&self) -> Vec<ExecutionTicket> {
        let mut state = self.lock_state();

        let pending: Vec<(WorkerId, String, u32)> = state
            .workers
            .values()
            .filter(|worker| worker.status == WorkerStatus::Busy)
            .filter_map(|worker| {
                let job_id = worker.current_job.as_ref()?;
                let job = state.jobs.get(job_id)?;
                if job.status != JobStatus::Running {
                    return None;
                }
                if state.in_flight.get(job_id) == Some(&job.retry_count) {
                    return None; // this attempt is already executing
                }
                Some((worker.worker_id.clone(), job_id.clone(), job.retry_count))
            })
            .collect();

        let mut tickets = Vec::with_capacity(pending.len());
        for (worker_id, job_id, attempt) in pending {
            state.in_flight.insert(job_id.clone(), attempt);
            if let Some(job) = state.jobs.get(&job_id) {
                tickets.push(ExecutionTicket {
                    job: job.clone(),
                    worker_id,
                    attempt,
                });
            }
        }
        tickets
    }

    /// Run one dispatched execution to its natural end and record the
    /// outcome. The executor body runs with no lock held.
    pub async fn execute_assignment(&self, ticket: ExecutionTicket) {
        let outcome = self.registry().execute(&ticket.job).await;
        self.record_completion(&ticket, outcome);
    }

    fn record_completion(
        &self,
        ticket: &ExecutionTicket,
        outcome: Result<serde_json::Value, ExecutionError>,
    ) {
        let now = self.time().now_millis();
        let mut state = self.lock_state();

        if state.in_flight.get(&ticket.job.job_id) == Some(&ticket.attempt) {
            state.in_flight.remove(&ticket.job.job_id);
        }

        let mut completed = false;
        let mut failure: Option<String> = None;
        {
            let Some(job) = state.jobs.get_mut(&ticket.job.job_id) else {
                return;
            };
            let fresh = job.status == JobStatus::Running
                && job.retry_count == ticket.attempt
                && job.worker_id.as_deref() == Some(ticket.worker_id.as_str());
            if !fresh {
                debug!(
                    job_id = %ticket.job.job_id,
                    "Discarding stale execution result"
                );
                return;
            }

            match outcome {
                Ok(result) => {
                    if job.complete(result, now).is_ok() {
                        completed = true;
                    }
                }
                Err(err) => {
                    let message = err.to_string();
                    job.fail(message.clone(), now);
                    failure = Some(message);
                }
            }
        }

        if completed {
            state.stats.completed_jobs += 1;
            info!(
                job_id = %ticket.job.job_id,
                worker_id = %ticket.worker_id,
                "Job completed"
            );
        } else if let Some(message) = failure {
            state.stats.failed_jobs += 1;
            error!(
                job_id = %ticket.job.job_id,
                worker_id = %ticket.worker_id,
                error = %message,
                "Job failed"
            );
        }

        // Free the worker; it may have failed (and been handled) meanwhile.
        if let Some(worker) = state.workers.get_mut(&ticket.worker_id) {
            if worker.current_job.as_deref() == Some(ticket.job.job_id.as_str()) {
                worker.current_job = None;
                worker.status = WorkerStatus::Online;
            }
        }
    }
}
