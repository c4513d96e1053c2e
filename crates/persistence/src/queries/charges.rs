// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::{PendingChargeRecord, PendingChargeRow};
use crate::diesel_schema::pending_charges;
use crate::error::PersistenceError;

/// Lists the pending charges recorded against a reservation, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row cannot be mapped.
pub fn charges_for_reservation(
    conn: &mut SqliteConnection,
    reservation_id: i64,
) -> Result<Vec<PendingChargeRecord>, PersistenceError> {
    let rows: Vec<PendingChargeRow> = pending_charges::table
        .filter(pending_charges::reservation_id.eq(reservation_id))
        .order(pending_charges::charge_id.asc())
        .load(conn)?;
    rows.into_iter().map(PendingChargeRow::into_record).collect()
}
