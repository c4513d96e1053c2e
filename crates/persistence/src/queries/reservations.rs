// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use stayward::{CandidateDateField, CandidateQuery};
use stayward_domain::{AutomationOverride, Reservation, ReservationStatus};

use crate::data_models::{ReservationRow, format_instant};
use crate::diesel_schema::reservations;
use crate::error::PersistenceError;

/// Scans one property for reservations matching the candidate query.
///
/// Soft-deleted reservations and reservations with any automation override
/// other than `none` are excluded here, per the repository contract.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row cannot be mapped.
pub fn find_candidates(
    conn: &mut SqliteConnection,
    query: &CandidateQuery,
) -> Result<Vec<Reservation>, PersistenceError> {
    let statuses: Vec<&str> = query
        .statuses
        .iter()
        .map(ReservationStatus::as_str)
        .collect();
    let range_start = format_instant(query.range_start);
    let range_end = format_instant(query.range_end);

    let mut scan = reservations::table
        .filter(reservations::property_id.eq(query.property_id))
        .filter(reservations::is_deleted.eq(0))
        .filter(reservations::automation_override.eq(AutomationOverride::None.as_str()))
        .filter(reservations::status.eq_any(statuses))
        .into_boxed();

    scan = match query.date_field {
        CandidateDateField::CheckIn => {
            scan.filter(reservations::check_in.between(range_start, range_end))
        }
        CandidateDateField::CheckOut => {
            scan.filter(reservations::check_out.between(range_start, range_end))
        }
        CandidateDateField::CreatedAt => {
            scan.filter(reservations::created_at.between(range_start, range_end))
        }
    };

    let rows: Vec<ReservationRow> = scan
        .order(reservations::reservation_id.asc())
        .load(conn)?;
    rows.into_iter().map(ReservationRow::into_domain).collect()
}

/// Fetches a reservation by identifier.
///
/// Returns `None` when the reservation is absent or soft-deleted.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row cannot be mapped.
pub fn get_reservation(
    conn: &mut SqliteConnection,
    reservation_id: i64,
) -> Result<Option<Reservation>, PersistenceError> {
    let row: Option<ReservationRow> = reservations::table
        .filter(reservations::reservation_id.eq(reservation_id))
        .filter(reservations::is_deleted.eq(0))
        .first(conn)
        .optional()?;
    row.map(ReservationRow::into_domain).transpose()
}
