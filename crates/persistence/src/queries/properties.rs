// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::{PropertyRecord, PropertyRow};
use crate::diesel_schema::properties;
use crate::error::PersistenceError;

/// Loads an active property row.
///
/// # Errors
///
/// Returns `PropertyNotFound` when the property does not exist or is
/// inactive.
pub(crate) fn load_active_property(
    conn: &mut SqliteConnection,
    property_id: i64,
) -> Result<PropertyRow, PersistenceError> {
    properties::table
        .filter(properties::property_id.eq(property_id))
        .filter(properties::is_active.eq(1))
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::PropertyNotFound(property_id))
}

/// Lists all active properties ordered by identifier.
///
/// The scheduler registers sweep jobs from this list at startup.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_active_properties(
    conn: &mut SqliteConnection,
) -> Result<Vec<PropertyRecord>, PersistenceError> {
    let rows: Vec<PropertyRow> = properties::table
        .filter(properties::is_active.eq(1))
        .order(properties::property_id.asc())
        .load(conn)?;
    Ok(rows.into_iter().map(PropertyRecord::from).collect())
}
