//! Gridsim Daemon - Main Entry Point
//! Wires the controller, the simulated adapters and the HTTP surface.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gridsim_api_http::{serve, HttpServerConfig};
use gridsim_core::application::{shutdown_channel, ClusterController, ControllerConfig};
use gridsim_core::port::time_provider::SystemTimeProvider;
use gridsim_core::port::{RandomSource, SeededRandom, TelemetrySource, ThreadRngSource, TimeProvider};
use gridsim_infra_sim::{default_registry, HostTelemetry, SyntheticTelemetry};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_HTTP_PORT: u16 = 8080;
const SYNTHETIC_GPU_COUNT: usize = 8;
const SHUTDOWN_GRACE: std::time::Duration = std::time::Duration::from_secs(5);

/// Reference fleet: eight nodes with staggered failure hazards
const WORKER_FIXTURE: [(&str, f64); 8] = [
    ("gpu-node-01", 0.05),
    ("gpu-node-02", 0.08),
    ("gpu-node-03", 0.12),
    ("gpu-node-04", 0.06),
    ("gpu-node-05", 0.10),
    ("gpu-node-06", 0.07),
    ("gpu-node-07", 0.09),
    ("gpu-node-08", 0.11),
];

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging (pretty for development, json for production)
    let log_format = std::env::var("GRIDSIM_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("gridsim=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Gridsim cluster simulator v{} starting...", VERSION);

    // 2. Load configuration
    let http_port: u16 = env_parse("GRIDSIM_HTTP_PORT").unwrap_or(DEFAULT_HTTP_PORT);
    let config = ControllerConfig {
        job_generation_rate: env_parse("GRIDSIM_JOB_RATE").unwrap_or(2.0),
        failure_rate: env_parse("GRIDSIM_FAILURE_RATE").unwrap_or(0.1),
        recovery_time_secs: env_parse("GRIDSIM_RECOVERY_SECS").unwrap_or(30),
    };

    // 3. Setup dependencies (DI wiring)
    let time: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
    let random: Arc<dyn RandomSource> = match env_parse::<u64>("GRIDSIM_SEED") {
        Some(seed) => {
            info!(seed = seed, "Using seeded random source");
            Arc::new(SeededRandom::new(seed))
        }
        None => Arc::new(ThreadRngSource),
    };
    let registry = Arc::new(default_registry(&random));

    let telemetry: Arc<dyn TelemetrySource> = match std::env::var("GRIDSIM_TELEMETRY").as_deref() {
        Ok("host") => Arc::new(HostTelemetry::new(
            SYNTHETIC_GPU_COUNT,
            Arc::clone(&random),
            Arc::clone(&time),
        )),
        _ => Arc::new(SyntheticTelemetry::new(
            SYNTHETIC_GPU_COUNT,
            Arc::clone(&random),
            Arc::clone(&time),
        )),
    };

    // 4. Controller + reference fleet
    let controller = ClusterController::new(config, registry, time, random, telemetry);
    for (worker_id, failure_probability) in WORKER_FIXTURE {
        controller.add_worker(worker_id, failure_probability);
    }

    // 5. Start activities and the HTTP surface
    let tasks = controller.start();

    let (http_shutdown, http_token) = shutdown_channel();
    let http_config = HttpServerConfig {
        port: http_port,
        ..Default::default()
    };
    let http_controller = Arc::clone(&controller);
    let http_handle = tokio::spawn(async move {
        if let Err(error) = serve(http_config, http_controller, http_token).await {
            tracing::error!(error = %error, "HTTP server failed");
        }
    });

    info!("System ready. Dashboard at http://localhost:{}/", http_port);
    info!("Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting gracefully...");

    // 7. Graceful shutdown
    controller.stop();
    http_shutdown.shutdown();
    for task in tasks {
        let _ = tokio::time::timeout(SHUTDOWN_GRACE, task).await;
    }
    let _ = tokio::time::timeout(SHUTDOWN_GRACE, http_handle).await;

    info!("Shutdown complete.");
    Ok(())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}
