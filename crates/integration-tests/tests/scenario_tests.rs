// End-to-End Scenarios
// The reference walkthroughs: dispatch, priority precedence, failure with
// retry, retry exhaustion, and the fault-injection workload.

use gridsim_core::application::{ClusterController, ControllerConfig, ExecutorRegistry};
use gridsim_core::domain::{Job, JobParameters, JobPriority, JobStatus, JobType, WorkerStatus};
use gridsim_core::port::random_source::mocks::ScriptedRandom;
use gridsim_core::port::telemetry_source::mocks::StaticTelemetry;
use gridsim_core::port::time_provider::mocks::MockClock;
use gridsim_core::port::RandomSource;
use gridsim_infra_sim::default_registry;
use serde_json::json;
use std::sync::Arc;

const T0: i64 = 1_700_000_000_000;

fn controller_with(
    registry: ExecutorRegistry,
    random: Arc<dyn RandomSource>,
    recovery_secs: u64,
) -> Arc<ClusterController> {
    ClusterController::new(
        ControllerConfig {
            job_generation_rate: 2.0,
            failure_rate: 0.1,
            recovery_time_secs: recovery_secs,
        },
        Arc::new(registry),
        Arc::new(MockClock::new(T0)),
        random,
        Arc::new(StaticTelemetry::default()),
    )
}

fn job_with(job_id: &str, job_type: JobType, priority: JobPriority, params: serde_json::Value) -> Job {
    let parameters: JobParameters = params.as_object().cloned().unwrap_or_default();
    Job::new(job_id, job_type, priority, parameters, T0)
}

async fn drive_executions(controller: &ClusterController) {
    for ticket in controller.begin_executions() {
        controller.execute_assignment(ticket).await;
    }
}

/// Scenario 1: single worker, single sleep job runs to completion.
#[tokio::test]
async fn test_single_worker_completes_sleep_job() {
    let random: Arc<dyn RandomSource> = Arc::new(ScriptedRandom::always(0.5));
    let controller = controller_with(default_registry(&random), random, 30);
    controller.add_worker("w1", 0.0);

    controller.submit_job(job_with(
        "io-standard-1000",
        JobType::Sleep,
        JobPriority::Normal,
        json!({"duration": 1}),
    ));

    let started = std::time::Instant::now();
    controller.scheduler_tick();
    drive_executions(&controller).await;
    assert!(started.elapsed().as_secs_f64() <= 2.0);

    controller.inspect(|state| {
        let job = &state.jobs["io-standard-1000"];
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(
            job.result,
            Some(json!("Sleep job completed after 1 seconds"))
        );
        assert_eq!(state.workers["w1"].status, WorkerStatus::Online);
        assert!(state.workers["w1"].current_job.is_none());
        assert_eq!(state.stats.completed_jobs, 1);
    });
}

/// Scenario 2: with two free workers, the CRITICAL and NORMAL jobs are
/// dispatched ahead of the LOW one queued first.
#[tokio::test]
async fn test_priority_precedence_on_one_tick() {
    let random: Arc<dyn RandomSource> = Arc::new(ScriptedRandom::always(0.0));
    let controller = controller_with(ExecutorRegistry::new(), random, 30);
    controller.add_worker("w1", 0.0);
    controller.add_worker("w2", 0.0);

    controller.submit_job(job_with("j1", JobType::Sleep, JobPriority::Low, json!({})));
    controller.submit_job(job_with("j2", JobType::Sleep, JobPriority::Critical, json!({})));
    controller.submit_job(job_with("j3", JobType::Sleep, JobPriority::Normal, json!({})));

    controller.scheduler_tick();

    controller.inspect(|state| {
        assert_eq!(state.jobs["j2"].status, JobStatus::Running);
        assert_eq!(state.jobs["j3"].status, JobStatus::Running);
        assert_eq!(state.jobs["j1"].status, JobStatus::Pending);
        assert_eq!(state.queue, vec!["j1".to_string()]);
    });
}

/// Scenario 3: a failure while holding a long job requeues it with one
/// retry; the worker recovers and the job re-dispatches.
#[tokio::test]
async fn test_failure_with_retry_and_redispatch() {
    let random: Arc<dyn RandomSource> = Arc::new(ScriptedRandom::always(0.5));
    let controller = controller_with(ExecutorRegistry::new(), random, 0);
    controller.add_worker("w1", 1.0);

    controller.submit_job(job_with(
        "io-standard-1000",
        JobType::Sleep,
        JobPriority::Normal,
        json!({"duration": 100}),
    ));
    controller.scheduler_tick();

    assert!(controller.fail_worker("w1"));
    controller.inspect(|state| {
        let job = &state.jobs["io-standard-1000"];
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.retry_count, 1);
        assert_eq!(state.queue.len(), 1);
        assert_eq!(state.workers["w1"].status, WorkerStatus::Failed);
    });

    // recovery_time 0: the recovery task brings the worker back
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    controller.scheduler_tick();

    controller.inspect(|state| {
        let job = &state.jobs["io-standard-1000"];
        assert_eq!(job.status, JobStatus::Running);
        assert_eq!(job.worker_id.as_deref(), Some("w1"));
        assert_eq!(job.retry_count, 1);
        assert_eq!(state.workers["w1"].status, WorkerStatus::Busy);
        assert_eq!(state.stats.worker_recoveries, 1);
    });
}

/// Scenario 4: a failure while holding a job that already used its whole
/// retry budget fails the job terminally.
#[tokio::test]
async fn test_retry_exhaustion_fails_terminally() {
    let random: Arc<dyn RandomSource> = Arc::new(ScriptedRandom::always(0.5));
    let controller = controller_with(ExecutorRegistry::new(), random, 1000);
    controller.add_worker("w1", 1.0);

    let mut job = job_with(
        "io-standard-1000",
        JobType::Sleep,
        JobPriority::Normal,
        json!({"duration": 100}),
    );
    job.retry_count = 3;
    controller.submit_job(job);
    controller.scheduler_tick();

    assert!(controller.fail_worker("w1"));

    controller.inspect(|state| {
        let job = &state.jobs["io-standard-1000"];
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(
            job.error_message.as_deref(),
            Some("Max retries exceeded due to worker failures")
        );
        assert_eq!(state.stats.failed_jobs, 1);
        assert!(state.queue.is_empty());
    });
}

/// Scenario 6: a fault_injection job at full failure rate fails with the
/// job id in its message and frees the worker.
#[tokio::test]
async fn test_fault_injection_executor_fails_with_job_id() {
    let random: Arc<dyn RandomSource> = Arc::new(ScriptedRandom::always(0.0));
    let controller = controller_with(default_registry(&random), random, 30);
    controller.add_worker("w1", 0.0);

    controller.submit_job(job_with(
        "inject-test-9907",
        JobType::FaultInjection,
        JobPriority::Normal,
        json!({"failure_rate": 1.0, "duration": 1}),
    ));
    controller.scheduler_tick();
    drive_executions(&controller).await;

    controller.inspect(|state| {
        let job = &state.jobs["inject-test-9907"];
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(
            job.error_message.as_deref(),
            Some("Simulated failure in job inject-test-9907")
        );
        assert_eq!(state.workers["w1"].status, WorkerStatus::Online);
        assert_eq!(state.stats.failed_jobs, 1);
    });
}

/// A job type nobody claims is marked FAILED with the registry message;
/// the controller keeps going.
#[tokio::test]
async fn test_unclaimed_job_type_fails_with_registry_message() {
    let random: Arc<dyn RandomSource> = Arc::new(ScriptedRandom::always(0.5));
    let controller = controller_with(ExecutorRegistry::new(), random, 30);
    controller.add_worker("w1", 0.0);

    controller.submit_job(job_with(
        "calc-standard-1000",
        JobType::Compute,
        JobPriority::Normal,
        json!({}),
    ));
    controller.scheduler_tick();
    drive_executions(&controller).await;

    controller.inspect(|state| {
        let job = &state.jobs["calc-standard-1000"];
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(
            job.error_message.as_deref(),
            Some("No executor found for job type: compute")
        );
        assert_eq!(state.workers["w1"].status, WorkerStatus::Online);
    });
}
