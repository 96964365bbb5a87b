// Job Generator
//
// Emits roughly `job_generation_rate` jobs per minute: one uniform roll
// per one-second tick, compared against rate / 60.

use super::ClusterController;
use crate::application::cluster::ClusterState;
use crate::domain::{Job, JobParameters, JobPriority, JobType};
use crate::port::random_source::weighted_choice;
use crate::port::RandomSource;
use serde_json::json;
use tracing::info;

const JOB_TYPE_WEIGHTS: [(JobType, f64); 4] = [
    (JobType::Sleep, 0.3),
    (JobType::Compute, 0.4),
    (JobType::Matrix, 0.2),
    (JobType::FaultInjection, 0.1),
];

const PRIORITY_WEIGHTS: [(JobPriority, f64); 4] = [
    (JobPriority::Low, 0.2),
    (JobPriority::Normal, 0.5),
    (JobPriority::High, 0.2),
    (JobPriority::Critical, 0.1),
];

impl ClusterController {
    /// One generator tick: roll against the configured rate and, on a hit,
    /// synthesize a job and enqueue it atomically.
    pub fn generator_tick(&self) {
        let now = self.time().now_millis();
        let mut state = self.lock_state();

        if self.random().next_f64() >= state.job_generation_rate / 60.0 {
            return;
        }

        let job_type = *weighted_choice(self.random(), &JOB_TYPE_WEIGHTS);
        let parameters = self.sample_parameters(job_type);
        let priority = *weighted_choice(self.random(), &PRIORITY_WEIGHTS);
        let job_id = self.fresh_job_id(&state, job_type, priority);

        let job = Job::new(job_id.clone(), job_type, priority, parameters, now);
        state.jobs.insert(job_id.clone(), job);
        state.queue.push(job_id.clone());
        state.stats.total_jobs += 1;

        info!(
            job_id = %job_id,
            job_type = %job_type,
            priority = %priority,
            "Auto-generated job"
        );
    }

    fn sample_parameters(&self, job_type: JobType) -> JobParameters {
        let mut parameters = JobParameters::new();
        match job_type {
            JobType::Sleep => {
                parameters.insert("duration".into(), json!(self.random().int_in(1, 5)));
            }
            JobType::Compute => {
                parameters.insert(
                    "iterations".into(),
                    json!(self.random().int_in(100_000, 1_000_000)),
                );
            }
            JobType::Matrix => {
                parameters.insert(
                    "matrix_size".into(),
                    json!(self.random().int_in(500, 2000)),
                );
            }
            JobType::FaultInjection => {
                parameters.insert(
                    "failure_rate".into(),
                    json!(self.random().float_in(0.05, 0.2)),
                );
                parameters.insert("duration".into(), json!(self.random().int_in(2, 8)));
            }
        }
        parameters
    }

    /// Descriptive id, unique within the jobs map. A run of collisions is
    /// salted with a uuid fragment.
    fn fresh_job_id(
        &self,
        state: &ClusterState,
        job_type: JobType,
        priority: JobPriority,
    ) -> String {
        for _ in 0..4 {
            let candidate = descriptive_job_id(self.random(), job_type, priority);
            if !state.jobs.contains_key(&candidate) {
                return candidate;
            }
        }
        let base = descriptive_job_id(self.random(), job_type, priority);
        let salt = uuid::Uuid::new_v4().simple().to_string();
        format!("{}-{}", base, &salt[..8])
    }
}

/// Human-readable job id flavoured by type and priority,
/// e.g. `calc-standard-4821`, `gpu-tensor-3310`, `inject-test-9907`.
fn descriptive_job_id(
    random: &dyn RandomSource,
    job_type: JobType,
    priority: JobPriority,
) -> String {
    const SLEEP_PREFIXES: [&str; 5] = ["io", "wait", "idle", "pause", "delay"];
    const COMPUTE_PREFIXES: [&str; 5] = ["calc", "process", "analyze", "compute", "run"];
    const MATRIX_PREFIXES: [&str; 5] = ["matrix", "gpu", "tensor", "linear", "algebra"];
    const FAULT_PREFIXES: [&str; 5] = ["test", "check", "verify", "validate", "inject"];

    const LOW_SUFFIXES: [&str; 3] = ["batch", "background", "low-priority"];
    const NORMAL_SUFFIXES: [&str; 3] = ["standard", "regular", "normal"];
    const HIGH_SUFFIXES: [&str; 3] = ["urgent", "priority", "important"];
    const CRITICAL_SUFFIXES: [&str; 3] = ["critical", "emergency", "immediate"];

    let pick = |items: &[&'static str]| -> &'static str {
        items[random.int_in(0, items.len() as i64 - 1) as usize]
    };

    let prefixes: &[&'static str] = match job_type {
        JobType::Sleep => &SLEEP_PREFIXES,
        JobType::Compute => &COMPUTE_PREFIXES,
        JobType::Matrix => &MATRIX_PREFIXES,
        JobType::FaultInjection => &FAULT_PREFIXES,
    };

    let prefix = pick(prefixes);
    let number = random.int_in(1000, 9999);

    match job_type {
        JobType::Matrix => format!("gpu-{}-{}", prefix, number),
        JobType::FaultInjection => format!("{}-test-{}", prefix, number),
        _ => {
            let suffixes: &[&'static str] = match priority {
                JobPriority::Low => &LOW_SUFFIXES,
                JobPriority::Normal => &NORMAL_SUFFIXES,
                JobPriority::High => &HIGH_SUFFIXES,
                JobPriority::Critical => &CRITICAL_SUFFIXES,
            };
            format!("{}-{}-{}", prefix, pick(suffixes), number)
        }
    }
}
