// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Stale-reservation cleanup.
//!
//! A composite sweep of independent sub-operations. The transitioning
//! sub-operations (confirmation timeout, checkout due) route through the
//! authority like any other automation; the reporting sub-operations
//! (orphaned data, audit archive, performance) only count and note, since
//! history rows are never deleted by the engine. Zero findings is success.

use super::domain_to_engine;
use crate::authority::{TransitionRequest, transition};
use crate::error::EngineError;
use crate::job::{CleanupScope, JobContext};
use crate::ports::{CandidateDateField, CandidateQuery, EngineStore};
use crate::result::JobResult;
use chrono::Duration;
use stayward_domain::{
    AutomationSettings, DEFAULT_DAY_START_HOUR, PaymentStatus, ReservationStatus,
    operational_day_end, operational_day_start,
};

/// How far back the confirmation-timeout scan reaches for stale rows.
const CONFIRMATION_SCAN_HORIZON_DAYS: i64 = 365;

/// Runs the cleanup sweep for one property.
///
/// # Errors
///
/// Returns configuration and store-level failures; per-reservation
/// transition failures are recorded in the result instead.
pub fn run<S: EngineStore + ?Sized>(
    store: &mut S,
    ctx: &JobContext,
    scope: CleanupScope,
) -> Result<JobResult, EngineError> {
    let settings = store.get_settings(ctx.property_id)?;
    let mut result = JobResult::default();

    match scope {
        CleanupScope::Full => {
            result.absorb(confirmation_timeout(store, ctx, &settings)?);
            result.absorb(checkout_due(store, ctx)?);
            result.absorb(orphaned_data(store, ctx)?);
            result.absorb(audit_archive(store, ctx, &settings)?);
            result.absorb(performance(ctx));
        }
        CleanupScope::ConfirmationTimeout => {
            result.absorb(confirmation_timeout(store, ctx, &settings)?);
        }
        CleanupScope::CheckoutDue => result.absorb(checkout_due(store, ctx)?),
        CleanupScope::OrphanedData => result.absorb(orphaned_data(store, ctx)?),
        CleanupScope::AuditArchive => result.absorb(audit_archive(store, ctx, &settings)?),
        CleanupScope::Performance => result.absorb(performance(ctx)),
    }

    tracing::info!(
        property_id = ctx.property_id,
        scope = scope.as_str(),
        processed = result.processed_count,
        dry_run = ctx.dry_run,
        "cleanup sweep complete"
    );
    Ok(result)
}

/// Cancels reservations stuck in confirmation-pending past the timeout.
fn confirmation_timeout<S: EngineStore + ?Sized>(
    store: &mut S,
    ctx: &JobContext,
    settings: &AutomationSettings,
) -> Result<JobResult, EngineError> {
    let now = ctx.timestamp;
    let timeout_hours = settings.confirmation_pending_timeout_hours;
    let cutoff = now - Duration::hours(i64::from(timeout_hours));

    let candidates = store.find_candidates(&CandidateQuery {
        property_id: ctx.property_id,
        statuses: vec![ReservationStatus::ConfirmationPending],
        date_field: CandidateDateField::CreatedAt,
        range_start: now - Duration::days(CONFIRMATION_SCAN_HORIZON_DAYS),
        range_end: cutoff,
    })?;

    let mut result = JobResult::default();
    for reservation in candidates {
        let id = reservation.reservation_id;
        if ctx.dry_run {
            result.record_skipped(id, true);
            result.note(format!(
                "[DRY RUN] would cancel reservation {id} (unconfirmed for over {timeout_hours}h)"
            ));
            continue;
        }

        let request = TransitionRequest::automated(
            id,
            ctx.property_id,
            ReservationStatus::Cancelled,
            format!("Automated cleanup: confirmation pending for more than {timeout_hours}h"),
        );
        match transition(store, request, now) {
            Ok(_) => {
                result.record_updated(id);
                result.note(format!("reservation {id} cancelled after confirmation timeout"));
            }
            Err(
                e @ (EngineError::IllegalTransition { .. }
                | EngineError::ConcurrentModification(_)),
            ) => {
                tracing::warn!(reservation_id = id, error = %e, "timeout cancellation skipped");
                result.record_error(e.to_string());
            }
            Err(e) => return Err(e),
        }
    }
    Ok(result)
}

/// Promotes fully paid in-house stays checking out today to checkout-due.
fn checkout_due<S: EngineStore + ?Sized>(
    store: &mut S,
    ctx: &JobContext,
) -> Result<JobResult, EngineError> {
    let now = ctx.timestamp;
    let timezone = store.property_timezone(ctx.property_id)?;
    let day_start = operational_day_start(now, &timezone, DEFAULT_DAY_START_HOUR)
        .map_err(domain_to_engine)?;
    let day_end =
        operational_day_end(now, &timezone, DEFAULT_DAY_START_HOUR).map_err(domain_to_engine)?;

    let candidates = store.find_candidates(&CandidateQuery {
        property_id: ctx.property_id,
        statuses: vec![ReservationStatus::InHouse],
        date_field: CandidateDateField::CheckOut,
        range_start: day_start,
        range_end: day_end,
    })?;

    let mut result = JobResult::default();
    for reservation in candidates {
        // Unsettled folios stay in-house; the front desk resolves payment first
        if reservation.payment_status != PaymentStatus::Paid {
            continue;
        }

        let id = reservation.reservation_id;
        if ctx.dry_run {
            result.record_skipped(id, true);
            result.note(format!(
                "[DRY RUN] would mark reservation {id} as checkout-due"
            ));
            continue;
        }

        let request = TransitionRequest::automated(
            id,
            ctx.property_id,
            ReservationStatus::CheckoutDue,
            "Automated cleanup: checkout scheduled today and balance settled".to_string(),
        );
        match transition(store, request, now) {
            Ok(_) => result.record_updated(id),
            Err(
                e @ (EngineError::IllegalTransition { .. }
                | EngineError::ConcurrentModification(_)),
            ) => {
                tracing::warn!(reservation_id = id, error = %e, "checkout-due promotion skipped");
                result.record_error(e.to_string());
            }
            Err(e) => return Err(e),
        }
    }
    Ok(result)
}

/// Reports history entries whose reservation no longer exists.
fn orphaned_data<S: EngineStore + ?Sized>(
    store: &mut S,
    ctx: &JobContext,
) -> Result<JobResult, EngineError> {
    let count = store.count_orphaned_entries(ctx.property_id)?;
    let mut result = JobResult::default();
    if count == 0 {
        result.note("no orphaned status history entries found".to_string());
    } else {
        // Should be unreachable with cascading deletes in place
        tracing::warn!(property_id = ctx.property_id, count, "orphaned history entries detected");
        result.note(format!("{count} orphaned status history entries detected"));
    }
    Ok(result)
}

/// Reports history entries past the retention window.
///
/// Physical archival is handled outside the engine; this sub-operation only
/// surfaces the backlog size.
fn audit_archive<S: EngineStore + ?Sized>(
    store: &mut S,
    ctx: &JobContext,
    settings: &AutomationSettings,
) -> Result<JobResult, EngineError> {
    let retention_days = settings.audit_log_retention_days;
    let cutoff = ctx.timestamp - Duration::days(i64::from(retention_days));
    let count = store.count_entries_older_than(ctx.property_id, cutoff)?;

    let mut result = JobResult::default();
    result.note(format!(
        "{count} status history entries older than the {retention_days}-day retention window"
    ));
    Ok(result)
}

/// Storage maintenance hook.
fn performance(ctx: &JobContext) -> JobResult {
    let mut result = JobResult::default();
    result.note(format!(
        "storage maintenance: nothing to do for property {}",
        ctx.property_id
    ));
    result
}
