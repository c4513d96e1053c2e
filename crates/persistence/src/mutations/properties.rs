// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::properties;
use crate::error::PersistenceError;

/// Creates a property and returns its assigned identifier.
///
/// The timezone must be an IANA zone name; it is validated when operational
/// day math first runs against it, not here.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_property(
    conn: &mut SqliteConnection,
    name: &str,
    timezone: &str,
    created_at: String,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(properties::table)
        .values((
            properties::name.eq(name),
            properties::timezone.eq(timezone),
            properties::is_active.eq(1),
            properties::created_at.eq(created_at),
        ))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Marks a property inactive.
///
/// Inactive properties are skipped by scheduling and settings lookups.
///
/// # Errors
///
/// Returns `PropertyNotFound` if no such property exists.
pub fn deactivate_property(
    conn: &mut SqliteConnection,
    property_id: i64,
) -> Result<(), PersistenceError> {
    let updated = diesel::update(
        properties::table.filter(properties::property_id.eq(property_id)),
    )
    .set(properties::is_active.eq(0))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::PropertyNotFound(property_id));
    }
    Ok(())
}
