// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use stayward_domain::SettingsPatch;

use crate::data_models::SettingsRow;
use crate::diesel_schema::automation_settings;
use crate::error::PersistenceError;

/// Replaces a property's stored settings overrides.
///
/// The whole row is replaced, so `None` fields in the patch clear any
/// previously stored override back to the default.
///
/// # Errors
///
/// Returns an error if the write fails (for example, an unknown property).
pub fn replace_settings(
    conn: &mut SqliteConnection,
    property_id: i64,
    patch: &SettingsPatch,
) -> Result<(), PersistenceError> {
    let row = SettingsRow::from_patch(property_id, patch);
    diesel::replace_into(automation_settings::table)
        .values(&row)
        .execute(conn)?;
    Ok(())
}
