// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{Connection, SqliteConnection};
use stayward::TransitionFields;
use stayward_audit::NewStatusHistoryEntry;
use stayward_domain::{Reservation, ReservationStatus};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{
    NewReservation, NewReservationRow, NewStatusHistoryRow, PaymentChanges, TransitionChanges,
    format_instant,
};
use crate::diesel_schema::{reservations, status_history};
use crate::error::PersistenceError;
use crate::queries;

/// Applies a status transition atomically.
///
/// The status update is conditional on the reservation still holding
/// `expected_previous`; the history insert runs in the same transaction.
/// Either both writes commit or neither does.
///
/// # Errors
///
/// Returns `ConcurrentModification` when the conditional update matches no
/// row because another writer moved the status first, and
/// `ReservationNotFound` when the reservation is gone or soft-deleted.
pub fn apply_transition(
    conn: &mut SqliteConnection,
    expected_previous: ReservationStatus,
    new_status: ReservationStatus,
    fields: &TransitionFields,
    entry: &NewStatusHistoryEntry,
) -> Result<Reservation, PersistenceError> {
    conn.transaction::<Reservation, PersistenceError, _>(|conn| {
        let changes = TransitionChanges {
            status: new_status.as_str().to_string(),
            paid_amount: fields.paid_amount,
            payment_status: fields.payment_status.map(|s| s.as_str().to_string()),
            payment_reference: fields.payment_reference.clone(),
            status_change_reason: entry.change_reason.clone(),
            status_updated_by: entry.changed_by.clone(),
            status_updated_at: format_instant(entry.changed_at),
        };

        let updated = diesel::update(
            reservations::table
                .filter(reservations::reservation_id.eq(entry.reservation_id))
                .filter(reservations::property_id.eq(entry.property_id))
                .filter(reservations::status.eq(expected_previous.as_str()))
                .filter(reservations::is_deleted.eq(0)),
        )
        .set(&changes)
        .execute(conn)?;

        if updated == 0 {
            // Distinguish a lost race from a vanished reservation.
            let exists: i64 = reservations::table
                .filter(reservations::reservation_id.eq(entry.reservation_id))
                .filter(reservations::property_id.eq(entry.property_id))
                .filter(reservations::is_deleted.eq(0))
                .count()
                .get_result(conn)?;
            return Err(if exists == 0 {
                PersistenceError::ReservationNotFound(entry.reservation_id)
            } else {
                PersistenceError::ConcurrentModification(entry.reservation_id)
            });
        }

        let row = NewStatusHistoryRow::from(entry);
        diesel::insert_into(status_history::table)
            .values(&row)
            .execute(conn)?;

        queries::reservations::get_reservation(conn, entry.reservation_id)?
            .ok_or(PersistenceError::ReservationNotFound(entry.reservation_id))
    })
}

/// Updates payment columns without a status change.
///
/// No history entry is written.
///
/// # Errors
///
/// Returns `ReservationNotFound` when the reservation is gone or
/// soft-deleted.
pub fn update_payment(
    conn: &mut SqliteConnection,
    reservation_id: i64,
    fields: &TransitionFields,
) -> Result<Reservation, PersistenceError> {
    if !fields.is_empty() {
        let changes = PaymentChanges {
            paid_amount: fields.paid_amount,
            payment_status: fields.payment_status.map(|s| s.as_str().to_string()),
            payment_reference: fields.payment_reference.clone(),
        };

        let updated = diesel::update(
            reservations::table
                .filter(reservations::reservation_id.eq(reservation_id))
                .filter(reservations::is_deleted.eq(0)),
        )
        .set(&changes)
        .execute(conn)?;

        if updated == 0 {
            return Err(PersistenceError::ReservationNotFound(reservation_id));
        }
    }

    queries::reservations::get_reservation(conn, reservation_id)?
        .ok_or(PersistenceError::ReservationNotFound(reservation_id))
}

/// Inserts a new reservation and returns its assigned identifier.
///
/// # Errors
///
/// Returns an error if the insert fails (for example, an unknown property).
pub fn insert_reservation(
    conn: &mut SqliteConnection,
    reservation: &NewReservation,
    created_at: String,
) -> Result<i64, PersistenceError> {
    let row = NewReservationRow::from_new(reservation, created_at);
    diesel::insert_into(reservations::table)
        .values(&row)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}
