// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! No-show detection.
//!
//! A confirmed reservation becomes a no-show when the guest has not arrived
//! within the grace period after the scheduled check-in time, and either the
//! arrival date has passed entirely or money is on the folio (an unpaid
//! same-day arrival may still walk in; a paid one overdue past grace is
//! worth flagging).

use super::domain_to_engine;
use crate::authority::{TransitionRequest, transition};
use crate::error::EngineError;
use crate::job::JobContext;
use crate::ports::{CandidateDateField, CandidateQuery, EngineStore};
use crate::result::JobResult;
use chrono::Duration;
use stayward_domain::{
    AutomationType, Reservation, ReservationStatus, operational_date, wall_clock_instant,
};

/// Runs the no-show sweep for one property.
///
/// # Errors
///
/// Returns configuration and store-level failures; per-reservation
/// transition failures are recorded in the result instead.
pub fn run<S: EngineStore + ?Sized>(
    store: &mut S,
    ctx: &JobContext,
    grace_override: Option<u32>,
) -> Result<JobResult, EngineError> {
    let settings = store.get_settings(ctx.property_id)?;
    if !settings.is_enabled(AutomationType::NoShowDetection) {
        return Ok(JobResult::skipped(format!(
            "no-show detection is disabled for property {}",
            ctx.property_id
        )));
    }

    let timezone = store.property_timezone(ctx.property_id)?;
    let now = ctx.timestamp;
    let grace_hours = grace_override.unwrap_or(settings.no_show_grace_hours);

    let candidates = store.find_candidates(&CandidateQuery {
        property_id: ctx.property_id,
        statuses: vec![ReservationStatus::Confirmed],
        date_field: CandidateDateField::CheckIn,
        range_start: now - Duration::days(i64::from(settings.no_show_lookback_days)),
        range_end: now,
    })?;

    // Local calendar date, not the operational date: a reservation for
    // yesterday is past-date even before the 06:00 rollover.
    let today = operational_date(now, &timezone, 0).map_err(domain_to_engine)?;
    let mut result = JobResult::default();

    for reservation in candidates {
        let scheduled_check_in =
            wall_clock_instant(reservation.check_in, settings.check_in_time, &timezone)
                .map_err(domain_to_engine)?;
        let due = scheduled_check_in + Duration::hours(i64::from(grace_hours));
        if now < due {
            continue;
        }

        let arrival_date = operational_date(reservation.check_in, &timezone, 0)
            .map_err(domain_to_engine)?;
        let past_arrival_date = arrival_date < today;
        let has_payment = reservation.paid_amount > 0.0;
        if !past_arrival_date && !has_payment {
            continue;
        }

        let id = reservation.reservation_id;
        if ctx.dry_run {
            result.record_skipped(id, true);
            result.note(format!(
                "[DRY RUN] would mark reservation {id} as no-show ({grace_hours}h grace elapsed)"
            ));
            continue;
        }

        let reason = format!(
            "Automated no-show: guest did not arrive within {grace_hours}h of scheduled check-in on {arrival_date}"
        );
        let request = TransitionRequest::automated(
            id,
            ctx.property_id,
            ReservationStatus::NoShow,
            reason,
        );
        match transition(store, request, now) {
            Ok(updated) => {
                result.record_updated(id);
                side_actions(&updated, &mut result);
            }
            Err(
                e @ (EngineError::IllegalTransition { .. }
                | EngineError::ConcurrentModification(_)),
            ) => {
                tracing::warn!(reservation_id = id, error = %e, "no-show transition skipped");
                result.record_error(e.to_string());
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        property_id = ctx.property_id,
        processed = result.processed_count,
        dry_run = ctx.dry_run,
        "no-show sweep complete"
    );
    Ok(result)
}

/// Best-effort follow-ups after a no-show is recorded.
fn side_actions(reservation: &Reservation, result: &mut JobResult) {
    let id = reservation.reservation_id;
    if reservation.paid_amount > 0.0 {
        result.note(format!(
            "deposit of {:.2} held for review on no-show reservation {id}",
            reservation.paid_amount
        ));
    }
    result.note(format!("front desk notified of no-show for reservation {id}"));
    result.note(format!("room released to availability for reservation {id}"));
}
