// HTTP Surface Tests
// Status snapshot shape, rate-limit clamping, error envelopes, and the
// SSE push endpoint.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use gridsim_api_http::{app_state, router};
use gridsim_core::application::{ClusterController, ControllerConfig, ExecutorRegistry};
use gridsim_core::domain::{Job, JobParameters, JobPriority, JobType};
use gridsim_core::port::random_source::mocks::ScriptedRandom;
use gridsim_core::port::telemetry_source::mocks::StaticTelemetry;
use gridsim_core::port::time_provider::mocks::MockClock;
use gridsim_core::port::{GpuSystemInfo, RandomSource};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const T0: i64 = 1_700_000_000_000;

fn test_controller() -> Arc<ClusterController> {
    let random: Arc<dyn RandomSource> = Arc::new(ScriptedRandom::always(0.5));
    ClusterController::new(
        ControllerConfig::default(),
        Arc::new(ExecutorRegistry::new()),
        Arc::new(MockClock::new(T0)),
        random,
        Arc::new(StaticTelemetry::new(GpuSystemInfo {
            total_gpus: 8,
            available_gpus: 6,
            total_memory: 64,
            used_memory: 32,
            memory_usage_percent: 0.5,
            avg_utilization: 42.0,
            avg_temperature: 55.0,
            nvml_available: false,
        })),
    )
}

fn test_router(controller: &Arc<ClusterController>) -> axum::Router {
    router(app_state(Arc::clone(controller)))
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_rate(app: axum::Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/update-job-rate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    (status, json_body(response).await)
}

#[tokio::test]
async fn test_status_snapshot_shape() {
    let controller = test_controller();
    controller.add_worker("gpu-node-01", 0.05);

    let mut parameters = JobParameters::new();
    parameters.insert("duration".into(), json!(3));
    controller.submit_job(Job::new(
        "io-standard-1000",
        JobType::Sleep,
        JobPriority::High,
        parameters,
        T0,
    ));

    let response = test_router(&controller)
        .oneshot(
            Request::builder()
                .uri("/api/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let status = json_body(response).await;

    let info = &status["simulation_info"];
    assert_eq!(info["job_generation_rate"], json!(2.0));
    assert_eq!(info["recovery_time"], json!(30));
    assert!(info["uptime"].is_number());

    let worker = &status["workers"]["gpu-node-01"];
    assert_eq!(worker["status"], json!("online"));
    assert_eq!(worker["is_available"], json!(true));
    assert_eq!(worker["failure_probability"], json!(0.05));
    assert!(worker["current_job"].is_null());
    chrono::DateTime::parse_from_rfc3339(worker["last_heartbeat"].as_str().unwrap()).unwrap();

    let job = &status["jobs"]["io-standard-1000"];
    assert_eq!(job["job_type"], json!("sleep"));
    assert_eq!(job["priority"], json!(3));
    assert_eq!(job["status"], json!("pending"));
    assert_eq!(job["parameters"]["duration"], json!(3));
    assert!(job["started_at"].is_null());
    assert!(job["completed_at"].is_null());
    assert!(job["worker_id"].is_null());
    assert!(job["duration"].is_null());
    assert_eq!(job["retry_count"], json!(0));
    assert_eq!(job["max_retries"], json!(3));
    chrono::DateTime::parse_from_rfc3339(job["created_at"].as_str().unwrap()).unwrap();

    assert_eq!(status["job_queue"].as_array().unwrap().len(), 1);
    assert_eq!(status["job_queue"][0]["job_id"], json!("io-standard-1000"));

    let stats = &status["stats"];
    assert_eq!(stats["active_workers"], json!(1));
    chrono::DateTime::parse_from_rfc3339(stats["simulation_start"].as_str().unwrap()).unwrap();

    let gpu = &status["gpu_info"];
    assert_eq!(gpu["total_gpus"], json!(8));
    assert_eq!(gpu["available_gpus"], json!(6));
    assert_eq!(gpu["nvml_available"], json!(false));
}

#[tokio::test]
async fn test_rate_update_clamps_high_and_low() {
    let controller = test_controller();

    let (status, body) = post_rate(test_router(&controller), r#"{"rate": 999}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["new_rate"], json!(50.0));

    let (status, body) = post_rate(test_router(&controller), r#"{"rate": 0}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["new_rate"], json!(0.1));

    controller.inspect(|state| assert_eq!(state.job_generation_rate, 0.1));
}

#[tokio::test]
async fn test_rate_update_accepts_numeric_string() {
    let controller = test_controller();
    let (status, body) = post_rate(test_router(&controller), r#"{"rate": "7.5"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["new_rate"], json!(7.5));
}

#[tokio::test]
async fn test_rate_update_rejects_non_numeric_rate() {
    let controller = test_controller();
    let (status, body) = post_rate(test_router(&controller), r#"{"rate": "abc"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("rate"));

    // The configured rate is untouched
    controller.inspect(|state| assert_eq!(state.job_generation_rate, 2.0));
}

#[tokio::test]
async fn test_rate_update_rejects_malformed_body() {
    let controller = test_controller();
    let (status, body) = post_rate(test_router(&controller), "this is not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_rate_update_defaults_when_rate_is_absent() {
    let controller = test_controller();
    controller.set_job_generation_rate(9.0);

    let (status, body) = post_rate(test_router(&controller), r#"{}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["new_rate"], json!(2.0));
}

#[tokio::test]
async fn test_dashboard_serves_html() {
    let controller = test_controller();
    let response = test_router(&controller)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.starts_with("text/html"));
}

#[tokio::test]
async fn test_stream_endpoint_is_server_sent_events() {
    let controller = test_controller();
    let response = test_router(&controller)
        .oneshot(
            Request::builder()
                .uri("/api/stream")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.starts_with("text/event-stream"));
}

#[tokio::test]
async fn test_consecutive_snapshots_are_equal_without_changes() {
    let controller = test_controller();
    controller.add_worker("gpu-node-01", 0.05);

    // Frozen clock, no intervening mutation: snapshots compare equal
    let first = controller.snapshot();
    let second = controller.snapshot();
    assert_eq!(first, second);
}
