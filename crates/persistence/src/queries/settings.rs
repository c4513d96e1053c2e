// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use stayward_domain::AutomationSettings;

use crate::data_models::SettingsRow;
use crate::diesel_schema::automation_settings;
use crate::error::PersistenceError;
use crate::queries::properties::load_active_property;

/// Resolves a property's automation settings.
///
/// Stored overrides are applied on top of the defaults; a property with no
/// settings row gets the defaults unchanged.
///
/// # Errors
///
/// Returns `PropertyNotFound` when the property does not exist or is
/// inactive, and `InvalidRow` when a stored override fails validation.
pub fn get_settings(
    conn: &mut SqliteConnection,
    property_id: i64,
) -> Result<AutomationSettings, PersistenceError> {
    load_active_property(conn, property_id)?;

    let row: Option<SettingsRow> = automation_settings::table
        .filter(automation_settings::property_id.eq(property_id))
        .first(conn)
        .optional()?;

    let Some(row) = row else {
        return Ok(AutomationSettings::default());
    };
    let patch = row.into_patch()?;
    AutomationSettings::default()
        .with_patch(&patch)
        .map_err(|e| PersistenceError::InvalidRow(e.to_string()))
}

/// Returns the property's declared IANA timezone.
///
/// # Errors
///
/// Returns `PropertyNotFound` when the property does not exist or is
/// inactive.
pub fn property_timezone(
    conn: &mut SqliteConnection,
    property_id: i64,
) -> Result<String, PersistenceError> {
    Ok(load_active_property(conn, property_id)?.timezone)
}
