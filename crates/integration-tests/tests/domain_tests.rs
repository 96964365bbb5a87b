// Domain Layer Tests
// Job lifecycle, worker availability, derived fields

use gridsim_core::domain::{
    Job, JobParameters, JobPriority, JobStatus, JobType, WorkerNode, WorkerStatus,
};

fn job(job_id: &str) -> Job {
    Job::new(
        job_id,
        JobType::Sleep,
        JobPriority::Normal,
        JobParameters::new(),
        1000,
    )
}

#[test]
fn test_job_creation_defaults() {
    let job = job("io-standard-1001");

    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(job.retry_count, 0);
    assert_eq!(job.max_retries, 3);
    assert!(job.worker_id.is_none());
    assert!(job.started_at.is_none());
    assert!(job.completed_at.is_none());
    assert!(job.duration_seconds().is_none());
}

#[test]
fn test_job_lifecycle() {
    let mut job = job("io-standard-1002");

    assert!(job.start("gpu-node-01", 2000).is_ok());
    assert_eq!(job.status, JobStatus::Running);
    assert_eq!(job.worker_id.as_deref(), Some("gpu-node-01"));
    assert_eq!(job.started_at, Some(2000));

    assert!(job.complete(serde_json::json!("done"), 4500).is_ok());
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.completed_at, Some(4500));
    assert_eq!(job.duration_seconds(), Some(2.5));
}

#[test]
fn test_invalid_state_transitions() {
    let mut job = job("io-standard-1003");

    // Cannot complete a job that never started
    assert!(job.complete(serde_json::json!("x"), 2000).is_err());

    assert!(job.start("w1", 2000).is_ok());
    // Cannot start twice
    assert!(job.start("w2", 3000).is_err());
}

#[test]
fn test_requeue_resets_assignment_and_burns_a_retry() {
    let mut job = job("io-standard-1004");
    job.start("w1", 2000).unwrap();

    job.requeue();
    assert_eq!(job.status, JobStatus::Pending);
    assert!(job.worker_id.is_none());
    assert!(job.started_at.is_none());
    assert_eq!(job.retry_count, 1);
}

#[test]
fn test_failed_job_keeps_error_message() {
    let mut job = job("io-standard-1005");
    job.start("w1", 2000).unwrap();

    job.fail("something broke", 3000);
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.error_message.as_deref(), Some("something broke"));
    assert_eq!(job.completed_at, Some(3000));
}

#[test]
fn test_priority_ordering() {
    assert!(JobPriority::Critical > JobPriority::High);
    assert!(JobPriority::High > JobPriority::Normal);
    assert!(JobPriority::Normal > JobPriority::Low);
    assert_eq!(JobPriority::Low as i32, 1);
    assert_eq!(JobPriority::Critical as i32, 4);
}

#[test]
fn test_status_serializes_lowercase() {
    assert_eq!(
        serde_json::to_value(JobStatus::Pending).unwrap(),
        serde_json::json!("pending")
    );
    assert_eq!(
        serde_json::to_value(JobType::FaultInjection).unwrap(),
        serde_json::json!("fault_injection")
    );
    assert_eq!(
        serde_json::to_value(JobPriority::High).unwrap(),
        serde_json::json!(3)
    );
}

#[test]
fn test_worker_availability() {
    let mut worker = WorkerNode::new("gpu-node-01", 0.05, 30, 1000);
    assert!(worker.is_available());

    worker.status = WorkerStatus::Busy;
    worker.current_job = Some("io-standard-1001".to_string());
    assert!(!worker.is_available());

    worker.status = WorkerStatus::Failed;
    worker.current_job = None;
    assert!(!worker.is_available());

    worker.status = WorkerStatus::Online;
    assert!(worker.is_available());
}
