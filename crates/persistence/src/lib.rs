// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Stayward reservation automation engine.
//!
//! This crate provides the production implementation of the engine's storage
//! ports on Diesel and `SQLite`. `SQLite` is the only backend: it covers
//! single-node production deployments, development, and fast in-memory
//! testing with no external infrastructure.
//!
//! ## Storage conventions
//!
//! - Timestamps are RFC 3339 text in UTC, so lexicographic and chronological
//!   ordering agree for range filters.
//! - Enumerations are stored via their domain string forms and re-validated
//!   on the way out.
//! - Foreign key enforcement is verified at startup; status history rows
//!   cascade with their reservation.
//!
//! ## Testing
//!
//! Tests run against unique shared in-memory databases. Each
//! [`Persistence::new_in_memory`] call receives its own database instance
//! via an atomic counter, so tests are isolated without time-based naming.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use chrono::{DateTime, Utc};
use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use stayward::{
    CandidateQuery, ChargeRecorder, EngineError, ReservationRepository, SettingsProvider,
    StatusHistoryStore, TransitionFields, TransitionStore,
};
use stayward_audit::{NewStatusHistoryEntry, StatusHistoryEntry};
use stayward_domain::{AutomationSettings, Reservation, ReservationStatus, SettingsPatch};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{NewReservation, PendingChargeRecord, PropertyRecord};
pub use error::PersistenceError;

use data_models::format_instant;

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based
/// collisions. Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter backed by `SQLite`.
///
/// Implements the engine's storage ports; the engine itself performs no I/O.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        // Unique shared in-memory database name per call so tests are isolated.
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_test_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;

        // WAL for better read concurrency on file-based databases
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Properties & Settings
    // ========================================================================

    /// Creates a property and returns its assigned identifier.
    ///
    /// # Arguments
    ///
    /// * `name` - The property's display name
    /// * `timezone` - The property's IANA timezone (e.g., `America/Denver`)
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_property(
        &mut self,
        name: &str,
        timezone: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::properties::create_property(
            &mut self.conn,
            name,
            timezone,
            format_instant(Utc::now()),
        )
    }

    /// Marks a property inactive, removing it from scheduling and lookups.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::PropertyNotFound` if no such property
    /// exists.
    pub fn deactivate_property(&mut self, property_id: i64) -> Result<(), PersistenceError> {
        mutations::properties::deactivate_property(&mut self.conn, property_id)
    }

    /// Lists all active properties ordered by identifier.
    ///
    /// The scheduler registers sweep jobs from this list at startup.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_active_properties(&mut self) -> Result<Vec<PropertyRecord>, PersistenceError> {
        queries::properties::list_active_properties(&mut self.conn)
    }

    /// Replaces a property's stored settings overrides.
    ///
    /// The whole row is replaced, so `None` fields in the patch clear any
    /// previously stored override back to the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn replace_settings(
        &mut self,
        property_id: i64,
        patch: &SettingsPatch,
    ) -> Result<(), PersistenceError> {
        mutations::settings::replace_settings(&mut self.conn, property_id, patch)
    }

    // ========================================================================
    // Reservations & Charges
    // ========================================================================

    /// Inserts a new reservation and returns its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (for example, an unknown
    /// property).
    pub fn create_reservation(
        &mut self,
        reservation: &NewReservation,
    ) -> Result<i64, PersistenceError> {
        mutations::reservations::insert_reservation(
            &mut self.conn,
            reservation,
            format_instant(Utc::now()),
        )
    }

    /// Lists the pending charges recorded against a reservation, oldest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn charges_for_reservation(
        &mut self,
        reservation_id: i64,
    ) -> Result<Vec<PendingChargeRecord>, PersistenceError> {
        queries::charges::charges_for_reservation(&mut self.conn, reservation_id)
    }
}

impl ReservationRepository for Persistence {
    fn find_candidates(
        &mut self,
        query: &CandidateQuery,
    ) -> Result<Vec<Reservation>, EngineError> {
        Ok(queries::reservations::find_candidates(&mut self.conn, query)?)
    }

    fn get_reservation(
        &mut self,
        reservation_id: i64,
    ) -> Result<Option<Reservation>, EngineError> {
        Ok(queries::reservations::get_reservation(
            &mut self.conn,
            reservation_id,
        )?)
    }
}

impl TransitionStore for Persistence {
    fn apply_transition(
        &mut self,
        expected_previous: ReservationStatus,
        new_status: ReservationStatus,
        fields: &TransitionFields,
        entry: &NewStatusHistoryEntry,
    ) -> Result<Reservation, EngineError> {
        Ok(mutations::reservations::apply_transition(
            &mut self.conn,
            expected_previous,
            new_status,
            fields,
            entry,
        )?)
    }

    fn update_payment(
        &mut self,
        reservation_id: i64,
        fields: &TransitionFields,
    ) -> Result<Reservation, EngineError> {
        Ok(mutations::reservations::update_payment(
            &mut self.conn,
            reservation_id,
            fields,
        )?)
    }
}

impl StatusHistoryStore for Persistence {
    fn history_for_reservation(
        &mut self,
        reservation_id: i64,
    ) -> Result<Vec<StatusHistoryEntry>, EngineError> {
        Ok(queries::history::history_for_reservation(
            &mut self.conn,
            reservation_id,
        )?)
    }

    fn count_orphaned_entries(&mut self, property_id: i64) -> Result<u64, EngineError> {
        Ok(queries::history::count_orphaned_entries(
            &mut self.conn,
            property_id,
        )?)
    }

    fn count_entries_older_than(
        &mut self,
        property_id: i64,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, EngineError> {
        Ok(queries::history::count_entries_older_than(
            &mut self.conn,
            property_id,
            cutoff,
        )?)
    }
}

impl SettingsProvider for Persistence {
    fn get_settings(&mut self, property_id: i64) -> Result<AutomationSettings, EngineError> {
        Ok(queries::settings::get_settings(&mut self.conn, property_id)?)
    }

    fn property_timezone(&mut self, property_id: i64) -> Result<String, EngineError> {
        Ok(queries::settings::property_timezone(
            &mut self.conn,
            property_id,
        )?)
    }
}

impl ChargeRecorder for Persistence {
    fn record_pending_charge(
        &mut self,
        reservation_id: i64,
        charge_type: &str,
        amount: f64,
        description: &str,
    ) -> Result<(), EngineError> {
        mutations::charges::record_pending_charge(
            &mut self.conn,
            reservation_id,
            charge_type,
            amount,
            description,
            format_instant(Utc::now()),
        )?;
        Ok(())
    }
}
