// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::NewPendingChargeRow;
use crate::diesel_schema::pending_charges;
use crate::error::PersistenceError;

/// Records a pending charge against a reservation's folio.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn record_pending_charge(
    conn: &mut SqliteConnection,
    reservation_id: i64,
    charge_type: &str,
    amount: f64,
    description: &str,
    created_at: String,
) -> Result<i64, PersistenceError> {
    let row = NewPendingChargeRow {
        reservation_id,
        charge_type: charge_type.to_string(),
        amount,
        description: description.to_string(),
        created_at,
    };
    diesel::insert_into(pending_charges::table)
        .values(&row)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}
