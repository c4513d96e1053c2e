// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

//! Status history types.
//!
//! Every successful status transition produces exactly one history entry.
//! Entries are immutable once created and capture who changed the status,
//! why, and when. The engine never updates or deletes a history row.

use chrono::{DateTime, Utc};
use stayward_domain::ReservationStatus;

/// Actor recorded on history entries written by the automation engine.
pub const SYSTEM_ACTOR: &str = "system-automation";

/// A persisted status history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusHistoryEntry {
    /// The entry's unique identifier.
    pub history_id: i64,
    /// The reservation whose status changed.
    pub reservation_id: i64,
    /// The property owning the reservation.
    pub property_id: i64,
    /// The status before the transition; `None` for the creation entry.
    pub previous_status: Option<ReservationStatus>,
    /// The status after the transition.
    pub new_status: ReservationStatus,
    /// Who initiated the change (staff identifier or [`SYSTEM_ACTOR`]).
    pub changed_by: String,
    /// Why the change was made.
    pub change_reason: String,
    /// When the change was made.
    pub changed_at: DateTime<Utc>,
    /// Whether the change was made by automation rather than staff.
    pub is_automatic: bool,
}

/// A status history entry pending insertion.
///
/// The history identifier is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStatusHistoryEntry {
    pub reservation_id: i64,
    pub property_id: i64,
    pub previous_status: Option<ReservationStatus>,
    pub new_status: ReservationStatus,
    pub changed_by: String,
    pub change_reason: String,
    pub changed_at: DateTime<Utc>,
    pub is_automatic: bool,
}

impl NewStatusHistoryEntry {
    /// Creates an entry for an automation-initiated transition.
    ///
    /// # Arguments
    ///
    /// * `reservation_id` - The reservation whose status changed
    /// * `property_id` - The owning property
    /// * `previous_status` - The status read before the transition
    /// * `new_status` - The status after the transition
    /// * `change_reason` - Why automation made the change
    /// * `changed_at` - When the change was made
    #[must_use]
    pub fn automated(
        reservation_id: i64,
        property_id: i64,
        previous_status: Option<ReservationStatus>,
        new_status: ReservationStatus,
        change_reason: String,
        changed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            reservation_id,
            property_id,
            previous_status,
            new_status,
            changed_by: SYSTEM_ACTOR.to_string(),
            change_reason,
            changed_at,
            is_automatic: true,
        }
    }

    /// Creates an entry for a staff-initiated transition.
    #[must_use]
    pub const fn manual(
        reservation_id: i64,
        property_id: i64,
        previous_status: Option<ReservationStatus>,
        new_status: ReservationStatus,
        changed_by: String,
        change_reason: String,
        changed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            reservation_id,
            property_id,
            previous_status,
            new_status,
            changed_by,
            change_reason,
            changed_at,
            is_automatic: false,
        }
    }
}

/// Average time a reservation spent in `status` across its timeline.
///
/// `entries` must be the reservation's history ordered by `changed_at` (the
/// order the history store returns). Each visit to `status` is measured from
/// the entry that entered it to the entry that left it; an open final visit
/// is ignored. Returns `None` when the timeline never leaves `status`.
#[must_use]
pub fn average_time_in_status(
    entries: &[StatusHistoryEntry],
    status: ReservationStatus,
) -> Option<chrono::Duration> {
    let mut entered_at: Option<DateTime<Utc>> = None;
    let mut total = chrono::Duration::zero();
    let mut visits: i32 = 0;

    for entry in entries {
        if let Some(start) = entered_at
            && entry.previous_status == Some(status)
        {
            total += entry.changed_at - start;
            visits += 1;
            entered_at = None;
        }
        if entry.new_status == status {
            entered_at = Some(entry.changed_at);
        }
    }

    if visits == 0 {
        return None;
    }
    Some(total / visits)
}
