// Cluster Controller
//
// Concurrent orchestrator: five periodic activities (generator,
// scheduler, runner, fault injector, heartbeat monitor) plus a telemetry
// refresh loop share one cluster mutex. Tick bodies are synchronous and
// short; executor bodies run outside the lock in their own tasks.

mod faults;
mod generator;
mod runner;
mod scheduler;

pub use runner::ExecutionTicket;

use crate::application::cluster::ClusterState;
use crate::application::constants::{
    DEFAULT_FAILURE_RATE, DEFAULT_JOB_GENERATION_RATE, DEFAULT_RECOVERY_SECS,
    FAULT_INJECTOR_TICK, GENERATOR_TICK, HEARTBEAT_TICK, MAX_JOB_GENERATION_RATE,
    MIN_JOB_GENERATION_RATE, RUNNER_TICK, SCHEDULER_TICK, TELEMETRY_TICK,
};
use crate::application::registry::ExecutorRegistry;
use crate::application::shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
use crate::application::snapshot::ClusterSnapshot;
use crate::domain::{Job, WorkerNode};
use crate::port::{RandomSource, TelemetrySource, TimeProvider};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Startup knobs for the controller
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub job_generation_rate: f64,
    pub failure_rate: f64,
    pub recovery_time_secs: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            job_generation_rate: DEFAULT_JOB_GENERATION_RATE,
            failure_rate: DEFAULT_FAILURE_RATE,
            recovery_time_secs: DEFAULT_RECOVERY_SECS,
        }
    }
}

/// The autonomous cluster controller
pub struct ClusterController {
    state: Mutex<ClusterState>,
    registry: Arc<ExecutorRegistry>,
    time: Arc<dyn TimeProvider>,
    random: Arc<dyn RandomSource>,
    telemetry: Arc<dyn TelemetrySource>,
    running: AtomicBool,
    shutdown: Mutex<Option<ShutdownSender>>,
    /// Back-reference for activities that spawn tasks (runner dispatch,
    /// recovery timers) from `&self`.
    this: Weak<ClusterController>,
}

impl ClusterController {
    pub fn new(
        config: ControllerConfig,
        registry: Arc<ExecutorRegistry>,
        time: Arc<dyn TimeProvider>,
        random: Arc<dyn RandomSource>,
        telemetry: Arc<dyn TelemetrySource>,
    ) -> Arc<Self> {
        let now = time.now_millis();
        let mut state = ClusterState::new(now);
        state.job_generation_rate = config
            .job_generation_rate
            .clamp(MIN_JOB_GENERATION_RATE, MAX_JOB_GENERATION_RATE);
        state.failure_rate = config.failure_rate;
        state.recovery_time_secs = config.recovery_time_secs;

        info!("Cluster controller initialized");
        Arc::new_cyclic(|this| Self {
            state: Mutex::new(state),
            registry,
            time,
            random,
            telemetry,
            running: AtomicBool::new(false),
            shutdown: Mutex::new(None),
            this: this.clone(),
        })
    }

    pub(crate) fn lock_state(&self) -> std::sync::MutexGuard<'_, ClusterState> {
        self.state.lock().unwrap()
    }

    pub(crate) fn time(&self) -> &Arc<dyn TimeProvider> {
        &self.time
    }

    pub(crate) fn random(&self) -> &dyn RandomSource {
        self.random.as_ref()
    }

    pub(crate) fn registry(&self) -> &ExecutorRegistry {
        &self.registry
    }

    pub(crate) fn strong(&self) -> Option<Arc<ClusterController>> {
        self.this.upgrade()
    }

    /// Read-only access to cluster state for assertions and diagnostics.
    pub fn inspect<R>(&self, f: impl FnOnce(&ClusterState) -> R) -> R {
        let state = self.lock_state();
        f(&state)
    }

    /// Register a worker node with its per-minute failure hazard.
    pub fn add_worker(&self, worker_id: impl Into<String>, failure_probability: f64) {
        let now = self.time.now_millis();
        let worker_id = worker_id.into();
        let mut state = self.lock_state();
        if state.workers.contains_key(&worker_id) {
            warn!(worker_id = %worker_id, "Worker already registered, ignoring");
            return;
        }
        let recovery = state.recovery_time_secs;
        state.workers.insert(
            worker_id.clone(),
            WorkerNode::new(worker_id.clone(), failure_probability, recovery, now),
        );
        state.stats.active_workers += 1;
        info!(
            worker_id = %worker_id,
            failure_probability = failure_probability,
            "Worker added"
        );
    }

    /// Insert an externally constructed PENDING job and enqueue it.
    ///
    /// Generated jobs are counted in `stats.total_jobs` by the generator;
    /// externally submitted jobs are not.
    pub fn submit_job(&self, job: Job) {
        let mut state = self.lock_state();
        let job_id = job.job_id.clone();
        state.queue.push(job_id.clone());
        state.jobs.insert(job_id, job);
    }

    /// Clamp the requested rate into the accepted range and apply it.
    /// Takes effect on the next generator tick. Returns the applied rate.
    pub fn set_job_generation_rate(&self, rate: f64) -> f64 {
        let clamped = rate.clamp(MIN_JOB_GENERATION_RATE, MAX_JOB_GENERATION_RATE);
        let mut state = self.lock_state();
        state.job_generation_rate = clamped;
        info!(rate = clamped, "Job generation rate updated");
        clamped
    }

    /// Export an immutable, internally consistent view of the cluster.
    pub fn snapshot(&self) -> ClusterSnapshot {
        let gpu_info = self.telemetry.system_info();
        let now = self.time.now_millis();
        let state = self.lock_state();
        ClusterSnapshot::capture(&state, gpu_info, now)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start all controller activities. Returns their task handles so the
    /// composition root can await them after `stop`.
    pub fn start(&self) -> Vec<JoinHandle<()>> {
        let token = {
            let mut guard = self.shutdown.lock().unwrap();
            if guard.is_some() {
                warn!("Controller already started");
                return Vec::new();
            }
            let (tx, token) = shutdown_channel();
            *guard = Some(tx);
            token
        };
        self.running.store(true, Ordering::SeqCst);

        let tasks = vec![
            self.spawn_tick_loop("job-generator", GENERATOR_TICK, token.clone(), |c| {
                c.generator_tick()
            }),
            self.spawn_tick_loop("scheduler", SCHEDULER_TICK, token.clone(), |c| {
                c.scheduler_tick()
            }),
            self.spawn_tick_loop("executor-runner", RUNNER_TICK, token.clone(), |c| {
                c.runner_tick()
            }),
            self.spawn_tick_loop("fault-injector", FAULT_INJECTOR_TICK, token.clone(), |c| {
                c.fault_tick()
            }),
            self.spawn_tick_loop("heartbeat-monitor", HEARTBEAT_TICK, token.clone(), |c| {
                c.heartbeat_tick()
            }),
            self.spawn_telemetry_loop(token),
        ];

        info!("Cluster controller started");
        tasks
    }

    /// Stop the controller: activities observe the signal on their next
    /// tick and exit. In-flight executions run to their natural end; their
    /// results may or may not be recorded.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(tx) = self.shutdown.lock().unwrap().take() {
            tx.shutdown();
        }
        info!("Cluster controller stopped");
    }

    fn spawn_tick_loop<F>(
        &self,
        name: &'static str,
        interval: Duration,
        mut shutdown: ShutdownToken,
        tick: F,
    ) -> JoinHandle<()>
    where
        F: Fn(&ClusterController) + Send + Sync + 'static,
    {
        let Some(controller) = self.strong() else {
            return tokio::spawn(async {});
        };
        tokio::spawn(async move {
            debug!(activity = name, "Controller activity started");
            loop {
                tokio::select! {
                    _ = sleep(interval) => tick(&controller),
                    _ = shutdown.wait() => break,
                }
            }
            debug!(activity = name, "Controller activity stopped");
        })
    }

    fn spawn_telemetry_loop(&self, mut shutdown: ShutdownToken) -> JoinHandle<()> {
        let telemetry = Arc::clone(&self.telemetry);
        tokio::spawn(async move {
            debug!("Telemetry updater started");
            loop {
                tokio::select! {
                    _ = sleep(TELEMETRY_TICK) => telemetry.refresh().await,
                    _ = shutdown.wait() => break,
                }
            }
            debug!("Telemetry updater stopped");
        })
    }
}
