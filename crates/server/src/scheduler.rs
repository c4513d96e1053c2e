// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Recurring job registration and manual triggering.
//!
//! Every property gets one repeating registration per sweep kind, keyed
//! `"{property_id}:{kind}"` so re-registering a property replaces its jobs
//! instead of duplicating them. Cadences depend on the environment:
//! development runs every few minutes for fast feedback, production every
//! few hours.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use clap::ValueEnum;
use std::collections::BTreeMap;
use std::time::Duration;
use stayward::{EngineError, JobContext, JobKind, JobPayload};
use tokio::task::JoinHandle;
use tracing::info;

use crate::worker::JobQueue;

/// Deployment environment; selects sweep cadences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    Development,
    Production,
}

/// The three sweeps registered for every property.
const SWEEP_KINDS: [&str; 3] = ["no_show_sweep", "late_checkout_sweep", "stale_cleanup"];

/// Cadence of one repeating registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    period: Duration,
    /// Human-readable cron pattern shown in status output.
    pattern: &'static str,
}

impl Cadence {
    const fn new(period: Duration, pattern: &'static str) -> Self {
        Self { period, pattern }
    }

    /// Cadence for a sweep tag in the given environment.
    fn for_tag(environment: Environment, tag: &str) -> Self {
        match (environment, tag) {
            (Environment::Development, "no_show_sweep") => {
                Self::new(Duration::from_secs(5 * 60), "*/5 * * * *")
            }
            (Environment::Development, "late_checkout_sweep") => {
                Self::new(Duration::from_secs(10 * 60), "*/10 * * * *")
            }
            (Environment::Development, _) => {
                Self::new(Duration::from_secs(15 * 60), "*/15 * * * *")
            }
            (Environment::Production, "no_show_sweep") => {
                Self::new(Duration::from_secs(60 * 60), "0 * * * *")
            }
            (Environment::Production, "late_checkout_sweep") => {
                Self::new(Duration::from_secs(60 * 60), "30 * * * *")
            }
            (Environment::Production, _) => {
                Self::new(Duration::from_secs(6 * 60 * 60), "0 */6 * * *")
            }
        }
    }
}

/// Options carried by a manual trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualOptions {
    pub dry_run: bool,
    pub triggered_by: Option<String>,
}

struct Registration {
    property_id: i64,
    pattern: &'static str,
    period: Duration,
    registered_at: DateTime<Utc>,
    ticker: JoinHandle<()>,
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.ticker.abort();
    }
}

/// Status of one repeating registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatus {
    pub id: String,
    pub pattern: String,
    pub next_fire: DateTime<Utc>,
}

/// Scheduler introspection snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerStatus {
    pub repeatable_count: usize,
    pub waiting: u64,
    pub active: u64,
    pub completed: u64,
    pub failed: u64,
    pub jobs: Vec<JobStatus>,
}

/// Owns the repeating registrations and feeds the worker queue.
pub struct JobScheduler {
    environment: Environment,
    queue: JobQueue,
    registrations: BTreeMap<String, Registration>,
}

impl JobScheduler {
    #[must_use]
    pub const fn new(environment: Environment, queue: JobQueue) -> Self {
        Self {
            environment,
            queue,
            registrations: BTreeMap::new(),
        }
    }

    /// Registers the three repeating sweeps for a property.
    ///
    /// Existing registrations under the same keys are replaced, so calling
    /// this again for the same property is idempotent rather than
    /// duplicating jobs.
    pub fn schedule_jobs_for_property(&mut self, property_id: i64) {
        for tag in SWEEP_KINDS {
            let key = job_key(property_id, tag);
            let cadence = Cadence::for_tag(self.environment, tag);
            let ticker = spawn_ticker(self.queue.clone(), property_id, tag, cadence.period);

            info!(
                key = %key,
                pattern = cadence.pattern,
                "registered repeating job"
            );
            // Replacing drops (and thereby aborts) any previous ticker.
            self.registrations.insert(
                key,
                Registration {
                    property_id,
                    pattern: cadence.pattern,
                    period: cadence.period,
                    registered_at: Utc::now(),
                    ticker,
                },
            );
        }
    }

    /// Deregisters every repeating job keyed to a property.
    ///
    /// Called when a property is deactivated.
    pub fn remove_property_jobs(&mut self, property_id: i64) {
        let prefix = format!("{property_id}:");
        let keys: Vec<String> = self
            .registrations
            .keys()
            .filter(|k| k.starts_with(&prefix))
            .cloned()
            .collect();
        for key in keys {
            info!(key = %key, "removed repeating job");
            self.registrations.remove(&key);
        }
    }

    /// Enqueues a single immediate, high-priority invocation of a sweep.
    ///
    /// The payload has the same shape a scheduled run would use, with the
    /// dry-run and triggered-by overrides applied.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownJobType` for an unrecognized tag; the
    /// job is never enqueued and is not retried.
    pub fn trigger_manual_job(
        &self,
        tag: &str,
        property_id: i64,
        options: ManualOptions,
    ) -> Result<(), EngineError> {
        let kind = JobKind::parse_sweep_tag(tag)?;
        let payload = JobPayload {
            context: JobContext {
                property_id,
                dry_run: options.dry_run,
                triggered_by: options.triggered_by,
                timestamp: Utc::now(),
            },
            kind,
        };
        info!(
            property_id,
            job = tag,
            dry_run = payload.context.dry_run,
            "manual job triggered"
        );
        self.queue.enqueue_manual(payload);
        Ok(())
    }

    /// Enqueues a payment event at normal priority.
    ///
    /// Payments arrive from the gateway webhook path, not from a repeating
    /// registration.
    pub fn enqueue_payment(
        &self,
        property_id: i64,
        reservation_id: i64,
        amount: f64,
        gateway_reference: Option<String>,
    ) {
        let payload = JobPayload {
            context: JobContext::scheduled(property_id, Utc::now()),
            kind: JobKind::PaymentReceived {
                reservation_id,
                amount,
                gateway_reference,
            },
        };
        self.queue.enqueue_scheduled(payload);
    }

    /// Snapshot of registrations and queue counters.
    #[must_use]
    pub fn status(&self) -> SchedulerStatus {
        let now = Utc::now();
        let jobs = self
            .registrations
            .iter()
            .map(|(key, reg)| JobStatus {
                id: key.clone(),
                pattern: reg.pattern.to_string(),
                next_fire: next_fire(reg, now),
            })
            .collect();
        let metrics = self.queue.metrics();

        SchedulerStatus {
            repeatable_count: self.registrations.len(),
            waiting: metrics.waiting,
            active: metrics.active,
            completed: metrics.completed,
            failed: metrics.failed,
            jobs,
        }
    }

    /// Property ids with at least one registration.
    #[must_use]
    pub fn registered_properties(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self
            .registrations
            .values()
            .map(|reg| reg.property_id)
            .collect();
        ids.dedup();
        ids
    }
}

fn job_key(property_id: i64, tag: &str) -> String {
    format!("{property_id}:{tag}")
}

/// Next tick strictly after `now`, derived from the registration instant.
fn next_fire(reg: &Registration, now: DateTime<Utc>) -> DateTime<Utc> {
    let period = ChronoDuration::from_std(reg.period).unwrap_or(ChronoDuration::MAX);
    let mut next = reg.registered_at + period;
    while next <= now {
        next += period;
    }
    next
}

fn spawn_ticker(
    queue: JobQueue,
    property_id: i64,
    tag: &'static str,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick of a tokio interval fires immediately; skip it so
        // registration does not also mean "run now".
        interval.tick().await;
        loop {
            interval.tick().await;
            // The tag comes from SWEEP_KINDS, so parsing cannot fail.
            let Ok(kind) = JobKind::parse_sweep_tag(tag) else {
                return;
            };
            let payload = JobPayload {
                context: JobContext::scheduled(property_id, Utc::now()),
                kind,
            };
            queue.enqueue_scheduled(payload);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::JobQueue;

    fn scheduler() -> JobScheduler {
        let (queue, _lanes) = JobQueue::new();
        JobScheduler::new(Environment::Development, queue)
    }

    #[tokio::test]
    async fn test_registration_is_idempotent() {
        let mut scheduler = scheduler();
        scheduler.schedule_jobs_for_property(7);
        scheduler.schedule_jobs_for_property(7);

        let status = scheduler.status();
        assert_eq!(status.repeatable_count, 3);
        let ids: Vec<&str> = status.jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["7:late_checkout_sweep", "7:no_show_sweep", "7:stale_cleanup"]
        );
    }

    #[tokio::test]
    async fn test_remove_property_jobs_by_prefix() {
        let mut scheduler = scheduler();
        scheduler.schedule_jobs_for_property(7);
        scheduler.schedule_jobs_for_property(71);

        scheduler.remove_property_jobs(7);

        let status = scheduler.status();
        assert_eq!(status.repeatable_count, 3);
        assert!(status.jobs.iter().all(|j| j.id.starts_with("71:")));
    }

    #[tokio::test]
    async fn test_status_reports_patterns_and_future_fire() {
        let mut scheduler = scheduler();
        scheduler.schedule_jobs_for_property(7);

        let status = scheduler.status();
        let no_show = status
            .jobs
            .iter()
            .find(|j| j.id == "7:no_show_sweep")
            .unwrap();
        assert_eq!(no_show.pattern, "*/5 * * * *");
        assert!(no_show.next_fire > Utc::now());
    }

    #[tokio::test]
    async fn test_manual_trigger_rejects_unknown_tag() {
        let scheduler = scheduler();
        let err = scheduler
            .trigger_manual_job("minibar_audit", 7, ManualOptions::default())
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownJobType(tag) if tag == "minibar_audit"));
    }

    #[tokio::test]
    async fn test_manual_trigger_enqueues_high_priority() {
        let (queue, mut lanes) = JobQueue::new();
        let scheduler = JobScheduler::new(Environment::Development, queue);

        scheduler
            .trigger_manual_job(
                "no_show_sweep",
                7,
                ManualOptions {
                    dry_run: true,
                    triggered_by: Some("frontdesk-anna".to_string()),
                },
            )
            .unwrap();

        let payload = lanes.manual.recv().await.unwrap();
        assert_eq!(payload.context.property_id, 7);
        assert!(payload.context.dry_run);
        assert_eq!(
            payload.context.triggered_by.as_deref(),
            Some("frontdesk-anna")
        );
        assert_eq!(payload.kind, JobKind::NoShowSweep { grace_hours: None });
    }
}
