// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tokio worker pool draining the job queue.
//!
//! Jobs arrive on two lanes: a high-priority manual lane and the scheduled
//! lane. A merger task forwards them to the workers with a biased select,
//! so pending manual jobs always run before scheduled ones. Each worker
//! runs one job to completion before pulling the next; retryable failures
//! get bounded retries with exponential backoff.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use stayward::{JobPayload, JobResult};
use stayward_persistence::Persistence;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Maximum dispatch attempts per job, including the first.
const MAX_ATTEMPTS: u32 = 3;

/// Backoff before attempt n+1 is `BACKOFF_BASE * 2^(n-1)`.
const BACKOFF_BASE: Duration = Duration::from_millis(500);

/// Soft execution-time budget; exceeding it flags the job as stalled.
const SOFT_TIME_BUDGET: Duration = Duration::from_secs(60);

#[derive(Default)]
struct Counters {
    waiting: AtomicU64,
    active: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

/// Point-in-time queue counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueMetrics {
    pub waiting: u64,
    pub active: u64,
    pub completed: u64,
    pub failed: u64,
}

/// Producer half of the job queue; cheap to clone.
#[derive(Clone)]
pub struct JobQueue {
    manual_tx: mpsc::UnboundedSender<JobPayload>,
    scheduled_tx: mpsc::UnboundedSender<JobPayload>,
    counters: Arc<Counters>,
}

/// Consumer half of the job queue, handed to the worker pool.
pub struct QueueLanes {
    pub manual: mpsc::UnboundedReceiver<JobPayload>,
    pub scheduled: mpsc::UnboundedReceiver<JobPayload>,
    counters: Arc<Counters>,
}

impl JobQueue {
    /// Creates the queue and its consumer lanes.
    #[must_use]
    pub fn new() -> (Self, QueueLanes) {
        let (manual_tx, manual) = mpsc::unbounded_channel();
        let (scheduled_tx, scheduled) = mpsc::unbounded_channel();
        let counters = Arc::new(Counters::default());
        (
            Self {
                manual_tx,
                scheduled_tx,
                counters: Arc::clone(&counters),
            },
            QueueLanes {
                manual,
                scheduled,
                counters,
            },
        )
    }

    /// Enqueues onto the high-priority manual lane.
    pub fn enqueue_manual(&self, payload: JobPayload) {
        self.counters.waiting.fetch_add(1, Ordering::SeqCst);
        if self.manual_tx.send(payload).is_err() {
            warn!("manual lane closed; job dropped during shutdown");
            self.counters.waiting.fetch_sub(1, Ordering::SeqCst);
        }
    }

    /// Enqueues onto the scheduled lane.
    pub fn enqueue_scheduled(&self, payload: JobPayload) {
        self.counters.waiting.fetch_add(1, Ordering::SeqCst);
        if self.scheduled_tx.send(payload).is_err() {
            warn!("scheduled lane closed; job dropped during shutdown");
            self.counters.waiting.fetch_sub(1, Ordering::SeqCst);
        }
    }

    /// Current queue counters.
    #[must_use]
    pub fn metrics(&self) -> QueueMetrics {
        QueueMetrics {
            waiting: self.counters.waiting.load(Ordering::SeqCst),
            active: self.counters.active.load(Ordering::SeqCst),
            completed: self.counters.completed.load(Ordering::SeqCst),
            failed: self.counters.failed.load(Ordering::SeqCst),
        }
    }
}

/// Terminal report for one job, emitted after all attempts.
#[derive(Debug, Clone, PartialEq)]
pub struct JobOutcome {
    pub property_id: i64,
    pub job: String,
    pub attempts: u32,
    pub success: bool,
    pub result: Option<JobResult>,
    pub error: Option<String>,
}

/// Worker pool handle.
pub struct WorkerPool {
    merger: JoinHandle<()>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns the merger and `workers` worker tasks.
    ///
    /// Each finished job is reported on `outcomes`.
    #[must_use]
    pub fn spawn(
        workers: usize,
        store: Arc<Mutex<Persistence>>,
        lanes: QueueLanes,
        outcomes: mpsc::UnboundedSender<JobOutcome>,
    ) -> Self {
        // Capacity 1 keeps prefetch minimal so a manual job enqueued later
        // still overtakes scheduled jobs that have not been pulled yet.
        let (work_tx, work_rx) = mpsc::channel::<JobPayload>(1);
        let counters = Arc::clone(&lanes.counters);
        let merger = tokio::spawn(merge_lanes(lanes, work_tx));

        let work_rx = Arc::new(Mutex::new(work_rx));
        let handles = (0..workers.max(1))
            .map(|worker_id| {
                tokio::spawn(worker_loop(
                    worker_id,
                    Arc::clone(&store),
                    Arc::clone(&work_rx),
                    Arc::clone(&counters),
                    outcomes.clone(),
                ))
            })
            .collect();

        Self {
            merger,
            workers: handles,
        }
    }

    /// Waits for the merger and all workers to drain and exit.
    ///
    /// Both queue lanes must be closed first (drop every `JobQueue` clone).
    pub async fn shutdown(self) {
        let _ = self.merger.await;
        for handle in self.workers {
            let _ = handle.await;
        }
    }
}

/// Forwards jobs to the workers, manual lane first.
async fn merge_lanes(mut lanes: QueueLanes, work_tx: mpsc::Sender<JobPayload>) {
    let mut manual_open = true;
    let mut scheduled_open = true;
    while manual_open || scheduled_open {
        let payload = tokio::select! {
            biased;
            maybe = lanes.manual.recv(), if manual_open => {
                match maybe {
                    Some(payload) => Some(payload),
                    None => {
                        manual_open = false;
                        None
                    }
                }
            }
            maybe = lanes.scheduled.recv(), if scheduled_open => {
                match maybe {
                    Some(payload) => Some(payload),
                    None => {
                        scheduled_open = false;
                        None
                    }
                }
            }
        };
        if let Some(payload) = payload
            && work_tx.send(payload).await.is_err()
        {
            return;
        }
    }
}

async fn worker_loop(
    worker_id: usize,
    store: Arc<Mutex<Persistence>>,
    work_rx: Arc<Mutex<mpsc::Receiver<JobPayload>>>,
    counters: Arc<Counters>,
    outcomes: mpsc::UnboundedSender<JobOutcome>,
) {
    loop {
        let payload = {
            let mut rx = work_rx.lock().await;
            rx.recv().await
        };
        let Some(payload) = payload else {
            info!(worker_id, "worker shutting down");
            return;
        };
        let outcome = run_job(&store, &counters, payload).await;
        let _ = outcomes.send(outcome);
    }
}

/// Runs one job to completion, retrying retryable failures.
async fn run_job(
    store: &Arc<Mutex<Persistence>>,
    counters: &Counters,
    payload: JobPayload,
) -> JobOutcome {
    counters.waiting.fetch_sub(1, Ordering::SeqCst);
    counters.active.fetch_add(1, Ordering::SeqCst);

    let property_id = payload.context.property_id;
    let job = payload.kind.tag().to_string();
    let mut attempts: u32 = 0;

    let final_result = loop {
        attempts += 1;
        let started = Instant::now();
        let attempt = {
            let mut engine_store = store.lock().await;
            stayward::dispatch(&mut *engine_store, &payload)
        };
        let elapsed = started.elapsed();
        if elapsed > SOFT_TIME_BUDGET {
            warn!(
                property_id,
                job = %job,
                elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                "job exceeded its soft time budget"
            );
        }

        match attempt {
            Ok(result) => break Ok(result),
            Err(e) if e.is_retryable() && attempts < MAX_ATTEMPTS => {
                let backoff = BACKOFF_BASE * 2_u32.saturating_pow(attempts - 1);
                warn!(
                    property_id,
                    job = %job,
                    attempt = attempts,
                    backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
                    error = %e,
                    "retrying job after transient failure"
                );
                tokio::time::sleep(backoff).await;
            }
            Err(e) => break Err(e),
        }
    };

    counters.active.fetch_sub(1, Ordering::SeqCst);
    match final_result {
        Ok(result) => {
            counters.completed.fetch_add(1, Ordering::SeqCst);
            info!(
                property_id,
                job = %job,
                attempts,
                processed = result.processed_count,
                updated = result.details.reservations_updated.len(),
                "job completed"
            );
            JobOutcome {
                property_id,
                job,
                attempts,
                success: true,
                result: Some(result),
                error: None,
            }
        }
        Err(e) => {
            counters.failed.fetch_add(1, Ordering::SeqCst);
            JobOutcome {
                property_id,
                job,
                attempts,
                success: false,
                result: None,
                error: Some(e.to_string()),
            }
        }
    }
}
