// Priority Dispatcher
//
// Matches queued jobs to available workers, strictly highest priority
// first. The queue is re-sorted every tick to accommodate dynamic
// insertions; the worker is picked uniformly at random to avoid
// hot-spotting across near-identical nodes.

use super::ClusterController;
use crate::domain::WorkerStatus;
use tracing::{info, warn};

impl ClusterController {
    /// One scheduler tick. A single tick may dispatch several jobs when
    /// many workers are free.
    pub fn scheduler_tick(&self) {
        let now = self.time().now_millis();
        let mut state = self.lock_state();

        if state.queue.is_empty() {
            return;
        }

        state.sort_queue();
        let mut available = state.available_worker_ids();

        while !state.queue.is_empty() && !available.is_empty() {
            let job_id = state.queue.remove(0);

            let Some(job) = state.jobs.get_mut(&job_id) else {
                warn!(job_id = %job_id, "Queued job missing from jobs map, dropping");
                continue;
            };

            let index = if available.len() == 1 {
                0
            } else {
                self.random().int_in(0, available.len() as i64 - 1) as usize
            };
            let worker_id = available[index].clone();

            if let Err(error) = job.start(worker_id.clone(), now) {
                warn!(job_id = %job_id, error = %error, "Skipping non-pending job in queue");
                continue;
            }
            available.swap_remove(index);

            if let Some(worker) = state.workers.get_mut(&worker_id) {
                worker.current_job = Some(job_id.clone());
                worker.status = WorkerStatus::Busy;
            }

            info!(job_id = %job_id, worker_id = %worker_id, "Job assigned to worker");
        }
    }
}
