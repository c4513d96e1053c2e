// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Late-checkout detection.
//!
//! An in-house stay is overdue when the grace period after the scheduled
//! checkout time has elapsed and the reservation's checkout falls on or
//! before the current operational day. Detection records a pending fee and
//! notifies operations; it never changes the reservation's status (the
//! guest is still physically in the room).

use super::domain_to_engine;
use crate::error::EngineError;
use crate::job::JobContext;
use crate::ports::{CandidateDateField, CandidateQuery, EngineStore};
use crate::result::JobResult;
use chrono::Duration;
use stayward_domain::{
    AutomationType, DEFAULT_DAY_START_HOUR, ReservationStatus, calculate_late_fee,
    operational_date, wall_clock_instant,
};

/// Runs the late-checkout sweep for one property.
///
/// # Errors
///
/// Returns configuration and store-level failures. Fee-recording failures
/// are reported in the result but do not fail the sweep.
pub fn run<S: EngineStore + ?Sized>(
    store: &mut S,
    ctx: &JobContext,
    grace_override: Option<u32>,
) -> Result<JobResult, EngineError> {
    let settings = store.get_settings(ctx.property_id)?;
    if !settings.is_enabled(AutomationType::LateCheckoutDetection) {
        return Ok(JobResult::skipped(format!(
            "late-checkout detection is disabled for property {}",
            ctx.property_id
        )));
    }

    let timezone = store.property_timezone(ctx.property_id)?;
    let now = ctx.timestamp;
    let grace_hours = grace_override.unwrap_or(settings.late_checkout_grace_hours);

    let candidates = store.find_candidates(&CandidateQuery {
        property_id: ctx.property_id,
        statuses: vec![ReservationStatus::InHouse],
        date_field: CandidateDateField::CheckOut,
        range_start: now - Duration::days(i64::from(settings.late_checkout_lookback_days)),
        range_end: now,
    })?;

    let today =
        operational_date(now, &timezone, DEFAULT_DAY_START_HOUR).map_err(domain_to_engine)?;
    let mut result = JobResult::default();

    for reservation in candidates {
        let scheduled_checkout =
            wall_clock_instant(reservation.check_out, settings.check_out_time, &timezone)
                .map_err(domain_to_engine)?;
        let overdue_at = scheduled_checkout + Duration::hours(i64::from(grace_hours));
        if now < overdue_at {
            continue;
        }

        let checkout_day = operational_date(reservation.check_out, &timezone, DEFAULT_DAY_START_HOUR)
            .map_err(domain_to_engine)?;
        if checkout_day > today {
            continue;
        }

        let id = reservation.reservation_id;
        let fee = calculate_late_fee(
            scheduled_checkout,
            grace_hours,
            now,
            settings.late_checkout_fee_policy,
            settings.late_checkout_fee,
        );

        if ctx.dry_run {
            result.record_skipped(id, true);
            result.note(format!(
                "[DRY RUN] would record late-checkout fee of {fee:.2} for reservation {id}"
            ));
            continue;
        }

        result.record_updated(id);
        if fee > 0.0 {
            let description = format!(
                "Late checkout fee ({} policy): scheduled checkout {scheduled_checkout}, {grace_hours}h grace",
                settings.late_checkout_fee_policy.as_str()
            );
            if let Err(e) = store.record_pending_charge(id, "late_checkout_fee", fee, &description)
            {
                // Fee goes to the folio on a later run; the stay is still flagged
                tracing::warn!(reservation_id = id, error = %e, "failed to record late fee");
                result.note(format!(
                    "late-checkout fee of {fee:.2} for reservation {id} could not be recorded"
                ));
            } else {
                result.note(format!(
                    "late-checkout fee of {fee:.2} recorded for reservation {id}"
                ));
            }
        }
        result.note(format!(
            "housekeeping: room for reservation {id} flagged for priority turnover"
        ));
        result.note(format!(
            "front desk: guest on reservation {id} is past checkout, courtesy reminder due"
        ));
    }

    tracing::info!(
        property_id = ctx.property_id,
        processed = result.processed_count,
        dry_run = ctx.dry_run,
        "late-checkout sweep complete"
    );
    Ok(result)
}
