// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, Utc};
use diesel::SqliteConnection;
use diesel::prelude::*;
use stayward_audit::StatusHistoryEntry;

use crate::data_models::{StatusHistoryRow, format_instant};
use crate::diesel_schema::{reservations, status_history};
use crate::error::PersistenceError;

/// Returns a reservation's full timeline ordered by change time, then
/// entry id.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row cannot be mapped.
pub fn history_for_reservation(
    conn: &mut SqliteConnection,
    reservation_id: i64,
) -> Result<Vec<StatusHistoryEntry>, PersistenceError> {
    let rows: Vec<StatusHistoryRow> = status_history::table
        .filter(status_history::reservation_id.eq(reservation_id))
        .order((
            status_history::changed_at.asc(),
            status_history::history_id.asc(),
        ))
        .load(conn)?;
    rows.into_iter()
        .map(StatusHistoryRow::into_domain)
        .collect()
}

/// Counts history entries whose reservation no longer exists.
///
/// Cascading deletes make this structurally zero; the cleanup sweep reports
/// the count as a consistency check.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_orphaned_entries(
    conn: &mut SqliteConnection,
    property_id: i64,
) -> Result<u64, PersistenceError> {
    let count: i64 = status_history::table
        .filter(status_history::property_id.eq(property_id))
        .filter(
            status_history::reservation_id
                .ne_all(reservations::table.select(reservations::reservation_id)),
        )
        .count()
        .get_result(conn)?;
    Ok(u64::try_from(count).unwrap_or(0))
}

/// Counts history entries older than `cutoff` for a property.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_entries_older_than(
    conn: &mut SqliteConnection,
    property_id: i64,
    cutoff: DateTime<Utc>,
) -> Result<u64, PersistenceError> {
    let count: i64 = status_history::table
        .filter(status_history::property_id.eq(property_id))
        .filter(status_history::changed_at.lt(format_instant(cutoff)))
        .count()
        .get_result(conn)?;
    Ok(u64::try_from(count).unwrap_or(0))
}
