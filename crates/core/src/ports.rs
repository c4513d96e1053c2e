// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Storage and side-effect interfaces the engine is written against.
//!
//! The persistence crate provides the production implementation; tests use
//! an in-memory fake. All methods are synchronous; the engine performs no
//! I/O of its own.

use crate::error::EngineError;
use chrono::{DateTime, Utc};
use stayward_audit::{NewStatusHistoryEntry, StatusHistoryEntry};
use stayward_domain::{AutomationSettings, PaymentStatus, Reservation, ReservationStatus};

/// Which reservation timestamp a candidate scan ranges over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateDateField {
    CheckIn,
    CheckOut,
    CreatedAt,
}

/// A candidate scan for one property.
///
/// Implementations must exclude soft-deleted reservations and reservations
/// whose automation override is anything other than `none`; processors rely
/// on that contract instead of re-filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateQuery {
    pub property_id: i64,
    /// Statuses to match (any of).
    pub statuses: Vec<ReservationStatus>,
    /// Timestamp column the range applies to.
    pub date_field: CandidateDateField,
    /// Inclusive range start.
    pub range_start: DateTime<Utc>,
    /// Inclusive range end.
    pub range_end: DateTime<Utc>,
}

/// Payment-related column updates carried alongside a transition.
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionFields {
    pub paid_amount: Option<f64>,
    pub payment_status: Option<PaymentStatus>,
    pub payment_reference: Option<String>,
}

impl TransitionFields {
    /// Returns true if no field would be written.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.paid_amount.is_none()
            && self.payment_status.is_none()
            && self.payment_reference.is_none()
    }
}

/// Read access to reservations.
pub trait ReservationRepository {
    /// Scans one property for reservations matching the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the scan fails.
    fn find_candidates(&mut self, query: &CandidateQuery)
    -> Result<Vec<Reservation>, EngineError>;

    /// Fetches a reservation by identifier, `None` when absent or
    /// soft-deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn get_reservation(&mut self, reservation_id: i64)
    -> Result<Option<Reservation>, EngineError>;
}

/// The paired status-write + history-append operation.
pub trait TransitionStore {
    /// Applies a status transition atomically.
    ///
    /// The status update is conditional on the reservation still being in
    /// `expected_previous`; the history insert happens in the same
    /// transaction. Either both writes commit or neither does.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::ConcurrentModification` when the conditional
    /// update matches no row because another writer moved the status first,
    /// and `EngineError::ReservationNotFound` when the reservation is gone.
    fn apply_transition(
        &mut self,
        expected_previous: ReservationStatus,
        new_status: ReservationStatus,
        fields: &TransitionFields,
        entry: &NewStatusHistoryEntry,
    ) -> Result<Reservation, EngineError>;

    /// Updates payment columns without a status change.
    ///
    /// Used when a payment arrives that does not (or may not) confirm the
    /// reservation; no history entry is written.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::ReservationNotFound` when the reservation is
    /// gone.
    fn update_payment(
        &mut self,
        reservation_id: i64,
        fields: &TransitionFields,
    ) -> Result<Reservation, EngineError>;
}

/// Read access to the status history table.
pub trait StatusHistoryStore {
    /// Returns a reservation's full timeline ordered by change time, then
    /// entry id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn history_for_reservation(
        &mut self,
        reservation_id: i64,
    ) -> Result<Vec<StatusHistoryEntry>, EngineError>;

    /// Counts history entries whose reservation no longer exists.
    ///
    /// Cascading deletes make this structurally zero; the cleanup sweep
    /// reports the count as a consistency check.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn count_orphaned_entries(&mut self, property_id: i64) -> Result<u64, EngineError>;

    /// Counts history entries older than `cutoff` for a property.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn count_entries_older_than(
        &mut self,
        property_id: i64,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, EngineError>;
}

/// Per-property configuration access.
pub trait SettingsProvider {
    /// Resolves the property's automation settings (stored overrides on top
    /// of defaults).
    ///
    /// # Errors
    ///
    /// Returns `EngineError::PropertyNotFound` when the property does not
    /// exist or is inactive.
    fn get_settings(&mut self, property_id: i64) -> Result<AutomationSettings, EngineError>;

    /// Returns the property's declared IANA timezone.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::PropertyNotFound` when the property does not
    /// exist or is inactive.
    fn property_timezone(&mut self, property_id: i64) -> Result<String, EngineError>;
}

/// Billing hand-off for fees discovered by automation.
///
/// Call sites treat this as best-effort: a recording failure is logged and
/// reported but never fails the sweep.
pub trait ChargeRecorder {
    /// Records a pending charge against a reservation's folio.
    ///
    /// # Errors
    ///
    /// Returns an error if the charge could not be recorded.
    fn record_pending_charge(
        &mut self,
        reservation_id: i64,
        charge_type: &str,
        amount: f64,
        description: &str,
    ) -> Result<(), EngineError>;
}

/// Everything a processor needs from storage.
pub trait EngineStore:
    ReservationRepository + TransitionStore + StatusHistoryStore + SettingsProvider + ChargeRecorder
{
}

impl<T> EngineStore for T where
    T: ReservationRepository
        + TransitionStore
        + StatusHistoryStore
        + SettingsProvider
        + ChargeRecorder
{
}
