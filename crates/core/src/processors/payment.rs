// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment-triggered confirmation.
//!
//! Applies a received payment to a reservation and, when the reservation is
//! awaiting confirmation and the cumulative payment qualifies (full payment,
//! deposit, or past the property threshold), confirms it. The paid amount is
//! recorded in every branch, and when a confirmation fires the amount and
//! status are written in the same atomic transition.

use crate::authority::{TransitionRequest, transition};
use crate::error::EngineError;
use crate::job::JobContext;
use crate::ports::{EngineStore, TransitionFields};
use crate::result::JobResult;
use stayward_domain::{
    AutomationType, PaymentStatus, PaymentType, ReservationStatus, nights, operational_date,
    payment_percentage, round_to_cents, total_booking_amount,
};

/// Processes one received payment.
///
/// # Errors
///
/// Returns `EngineError::ReservationNotFound` for unknown or cross-property
/// reservations; transition failures propagate to the task runner, which
/// retries the payment job (the CAS makes a duplicate confirmation
/// impossible).
pub fn run<S: EngineStore + ?Sized>(
    store: &mut S,
    ctx: &JobContext,
    reservation_id: i64,
    amount: f64,
    gateway_reference: Option<&str>,
) -> Result<JobResult, EngineError> {
    let settings = store.get_settings(ctx.property_id)?;
    let timezone = store.property_timezone(ctx.property_id)?;
    let reservation = store
        .get_reservation(reservation_id)?
        .ok_or(EngineError::ReservationNotFound(reservation_id))?;
    if reservation.property_id != ctx.property_id {
        return Err(EngineError::ReservationNotFound(reservation_id));
    }

    let night_count = nights(reservation.check_in, reservation.check_out);
    let total = total_booking_amount(reservation.room_rate, night_count);
    let new_paid = round_to_cents(reservation.paid_amount + amount);
    let percentage = payment_percentage(new_paid, total);
    let payment_type = PaymentType::classify(percentage);

    let new_payment_status = if percentage >= 100.0 {
        PaymentStatus::Paid
    } else if new_paid > 0.0 {
        PaymentStatus::PartiallyPaid
    } else {
        PaymentStatus::Unpaid
    };
    let fields = TransitionFields {
        paid_amount: Some(new_paid),
        payment_status: Some(new_payment_status),
        payment_reference: gateway_reference.map(str::to_string),
    };

    let qualifies = matches!(payment_type, PaymentType::Full | PaymentType::Deposit)
        || percentage >= settings.auto_confirm_threshold;
    let confirmable = reservation.status == ReservationStatus::ConfirmationPending
        && settings.is_enabled(AutomationType::AutoConfirmation)
        && qualifies;

    let mut result = JobResult::default();

    if ctx.dry_run {
        result.record_skipped(reservation_id, true);
        if confirmable {
            result.note(format!(
                "[DRY RUN] would confirm reservation {reservation_id} ({payment_type} payment, {percentage:.0}% of {total:.2})"
            ));
        } else {
            result.note(format!(
                "[DRY RUN] would record payment of {amount:.2} on reservation {reservation_id} without confirmation"
            ));
        }
        return Ok(result);
    }

    if confirmable {
        let reason = format!(
            "Automated confirmation: {payment_type} payment of {amount:.2} brings paid amount to {percentage:.0}% of {total:.2}"
        );
        let request = TransitionRequest {
            reservation_id,
            property_id: ctx.property_id,
            new_status: ReservationStatus::Confirmed,
            reason,
            actor: None,
            fields,
        };
        transition(store, request, ctx.timestamp)?;
        result.record_updated(reservation_id);
        result.note(format!(
            "reservation {reservation_id} confirmed after {payment_type} payment"
        ));
        return Ok(result);
    }

    store.update_payment(reservation_id, &fields)?;
    result.record_updated(reservation_id);

    match reservation.status {
        ReservationStatus::ConfirmationPending => {
            if settings.is_enabled(AutomationType::AutoConfirmation) {
                result.note(format!(
                    "payment of {amount:.2} recorded; {percentage:.0}% paid is below the {threshold:.0}% confirmation threshold",
                    threshold = settings.auto_confirm_threshold
                ));
            } else {
                result.note(format!(
                    "payment of {amount:.2} recorded; auto-confirmation is disabled for property {}",
                    ctx.property_id
                ));
            }
        }
        ReservationStatus::Confirmed => {
            let arrival = operational_date(reservation.check_in, &timezone, 0);
            let today = operational_date(ctx.timestamp, &timezone, 0);
            if percentage >= 100.0 && arrival.is_ok() && arrival == today {
                result.note(format!(
                    "reservation {reservation_id} fully paid and arriving today: express check-in available"
                ));
            } else {
                result.note(format!(
                    "payment of {amount:.2} recorded on confirmed reservation {reservation_id}"
                ));
            }
        }
        _ => {
            result.note(format!(
                "payment of {amount:.2} recorded on {} reservation {reservation_id}",
                reservation.status
            ));
        }
    }

    tracing::info!(
        property_id = ctx.property_id,
        reservation_id,
        amount,
        percentage,
        "payment processed"
    );
    Ok(result)
}
