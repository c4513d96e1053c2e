// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The status transition authority.
//!
//! Every status change flows through [`transition`]: it reads the current
//! status, validates the lifecycle edge, builds the history entry, and hands
//! the paired write to the store. The store's conditional update guarantees
//! the history entry's `previous_status` is the status actually replaced.

use crate::error::EngineError;
use crate::ports::{EngineStore, TransitionFields};
use chrono::{DateTime, Utc};
use stayward_audit::NewStatusHistoryEntry;
use stayward_domain::{Reservation, ReservationStatus};

/// A requested status change.
#[derive(Debug, Clone)]
pub struct TransitionRequest {
    pub reservation_id: i64,
    /// Property the caller believes owns the reservation; a mismatch is
    /// treated as not-found rather than leaking cross-property data.
    pub property_id: i64,
    pub new_status: ReservationStatus,
    /// Recorded verbatim as the history entry's change reason.
    pub reason: String,
    /// Staff identifier for manual transitions; `None` means automation.
    pub actor: Option<String>,
    /// Payment columns written atomically with the status.
    pub fields: TransitionFields,
}

impl TransitionRequest {
    /// An automation-initiated transition with no payment field updates.
    #[must_use]
    pub const fn automated(
        reservation_id: i64,
        property_id: i64,
        new_status: ReservationStatus,
        reason: String,
    ) -> Self {
        Self {
            reservation_id,
            property_id,
            new_status,
            reason,
            actor: None,
            fields: TransitionFields {
                paid_amount: None,
                payment_status: None,
                payment_reference: None,
            },
        }
    }
}

/// Applies a validated status transition.
///
/// # Arguments
///
/// * `store` - Storage the transition is applied against
/// * `request` - The requested change
/// * `now` - Instant recorded on the history entry
///
/// # Returns
///
/// The reservation as stored after the transition.
///
/// # Errors
///
/// * `EngineError::ReservationNotFound` - missing, soft-deleted, or owned by
///   a different property
/// * `EngineError::IllegalTransition` - the lifecycle graph forbids the edge
/// * `EngineError::ConcurrentModification` - another writer moved the status
///   between read and write
pub fn transition<S: EngineStore + ?Sized>(
    store: &mut S,
    request: TransitionRequest,
    now: DateTime<Utc>,
) -> Result<Reservation, EngineError> {
    let current = store
        .get_reservation(request.reservation_id)?
        .ok_or(EngineError::ReservationNotFound(request.reservation_id))?;

    if current.property_id != request.property_id {
        return Err(EngineError::ReservationNotFound(request.reservation_id));
    }

    let manual = request.actor.is_some();
    current
        .status
        .validate_transition(request.new_status, manual)
        .map_err(|e| EngineError::IllegalTransition {
            reservation_id: request.reservation_id,
            detail: e.to_string(),
        })?;

    let entry = match request.actor {
        Some(actor) => NewStatusHistoryEntry::manual(
            request.reservation_id,
            request.property_id,
            Some(current.status),
            request.new_status,
            actor,
            request.reason,
            now,
        ),
        None => NewStatusHistoryEntry::automated(
            request.reservation_id,
            request.property_id,
            Some(current.status),
            request.new_status,
            request.reason,
            now,
        ),
    };

    tracing::debug!(
        reservation_id = request.reservation_id,
        from = current.status.as_str(),
        to = request.new_status.as_str(),
        actor = %entry.changed_by,
        "applying status transition"
    );

    store.apply_transition(current.status, request.new_status, &request.fields, &entry)
}
