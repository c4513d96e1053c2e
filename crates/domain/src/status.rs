// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reservation status tracking and transition logic.
//!
//! This module defines reservation lifecycle states and valid transitions.
//! Two recovery edges (`NoShow` -> `Confirmed` and `Cancelled` -> `Confirmed`)
//! exist for front-desk corrections and are valid only when the transition is
//! manually initiated; automation never walks them.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Reservation lifecycle states.
///
/// Status is tracked per reservation; every change is recorded in the
/// status history table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Booked but payment has not yet confirmed the stay
    ConfirmationPending,
    /// Stay is confirmed; guest is expected
    Confirmed,
    /// Guest has checked in and occupies the room
    InHouse,
    /// Checkout is scheduled today and the balance is settled
    CheckoutDue,
    /// Guest has departed; folio is closed
    CheckedOut,
    /// Guest never arrived within the grace period
    NoShow,
    /// Reservation was cancelled before arrival
    Cancelled,
}

impl ReservationStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and job payload serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ConfirmationPending => "confirmation_pending",
            Self::Confirmed => "confirmed",
            Self::InHouse => "in_house",
            Self::CheckoutDue => "checkout_due",
            Self::CheckedOut => "checked_out",
            Self::NoShow => "no_show",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatus` if the string is not a valid status.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "confirmation_pending" => Ok(Self::ConfirmationPending),
            "confirmed" => Ok(Self::Confirmed),
            "in_house" => Ok(Self::InHouse),
            "checkout_due" => Ok(Self::CheckoutDue),
            "checked_out" => Ok(Self::CheckedOut),
            "no_show" => Ok(Self::NoShow),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidStatus {
                status: s.to_string(),
            }),
        }
    }

    /// Returns true if this status is terminal (cannot transition to another state).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::CheckedOut)
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// `manual` distinguishes staff-initiated transitions from automated ones:
    /// the recovery edges out of `NoShow` and `Cancelled` are only open to
    /// staff.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self, manual: bool) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "cannot transition from terminal state".to_string(),
            });
        }

        let valid = match self {
            Self::ConfirmationPending => {
                matches!(new_status, Self::Confirmed | Self::Cancelled)
            }
            Self::Confirmed => {
                matches!(new_status, Self::InHouse | Self::NoShow | Self::Cancelled)
            }
            Self::InHouse => matches!(new_status, Self::CheckoutDue | Self::CheckedOut),
            Self::CheckoutDue => matches!(new_status, Self::CheckedOut),
            // Recovery edges are staff-only
            Self::NoShow | Self::Cancelled => manual && matches!(new_status, Self::Confirmed),
            Self::CheckedOut => false,
        };

        if valid {
            Ok(())
        } else {
            let reason = if matches!(self, Self::NoShow | Self::Cancelled)
                && matches!(new_status, Self::Confirmed)
            {
                "recovery to confirmed requires a manual transition".to_string()
            } else {
                "transition not permitted by reservation lifecycle rules".to_string()
            };
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason,
            })
        }
    }
}

impl FromStr for ReservationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ReservationStatus; 7] = [
        ReservationStatus::ConfirmationPending,
        ReservationStatus::Confirmed,
        ReservationStatus::InHouse,
        ReservationStatus::CheckoutDue,
        ReservationStatus::CheckedOut,
        ReservationStatus::NoShow,
        ReservationStatus::Cancelled,
    ];

    #[test]
    fn test_status_string_round_trip() {
        for status in ALL {
            let s = status.as_str();
            match ReservationStatus::parse_str(s) {
                Ok(parsed) => assert_eq!(status, parsed),
                Err(e) => panic!("Failed to parse status string: {s}: {e}"),
            }
        }
    }

    #[test]
    fn test_invalid_status_string() {
        let result = ReservationStatus::parse_str("occupied");
        assert!(result.is_err());
    }

    #[test]
    fn test_checked_out_is_the_only_terminal_state() {
        for status in ALL {
            assert_eq!(
                status.is_terminal(),
                status == ReservationStatus::CheckedOut,
                "unexpected terminality for {status}"
            );
        }
    }

    #[test]
    fn test_valid_transitions_from_confirmation_pending() {
        let current = ReservationStatus::ConfirmationPending;

        assert!(
            current
                .validate_transition(ReservationStatus::Confirmed, false)
                .is_ok()
        );
        assert!(
            current
                .validate_transition(ReservationStatus::Cancelled, false)
                .is_ok()
        );
        assert!(
            current
                .validate_transition(ReservationStatus::InHouse, false)
                .is_err()
        );
    }

    #[test]
    fn test_valid_transitions_from_confirmed() {
        let current = ReservationStatus::Confirmed;

        assert!(
            current
                .validate_transition(ReservationStatus::InHouse, false)
                .is_ok()
        );
        assert!(
            current
                .validate_transition(ReservationStatus::NoShow, false)
                .is_ok()
        );
        assert!(
            current
                .validate_transition(ReservationStatus::Cancelled, false)
                .is_ok()
        );
        assert!(
            current
                .validate_transition(ReservationStatus::CheckedOut, false)
                .is_err()
        );
    }

    #[test]
    fn test_valid_transitions_from_in_house() {
        let current = ReservationStatus::InHouse;

        assert!(
            current
                .validate_transition(ReservationStatus::CheckoutDue, false)
                .is_ok()
        );
        assert!(
            current
                .validate_transition(ReservationStatus::CheckedOut, false)
                .is_ok()
        );
        assert!(
            current
                .validate_transition(ReservationStatus::NoShow, false)
                .is_err()
        );
    }

    #[test]
    fn test_checkout_due_only_advances_to_checked_out() {
        let current = ReservationStatus::CheckoutDue;

        assert!(
            current
                .validate_transition(ReservationStatus::CheckedOut, false)
                .is_ok()
        );
        assert!(
            current
                .validate_transition(ReservationStatus::InHouse, false)
                .is_err()
        );
        assert!(
            current
                .validate_transition(ReservationStatus::Cancelled, true)
                .is_err()
        );
    }

    #[test]
    fn test_no_transitions_from_checked_out() {
        for target in ALL {
            assert!(
                ReservationStatus::CheckedOut
                    .validate_transition(target, true)
                    .is_err()
            );
        }
    }

    #[test]
    fn test_recovery_edges_require_manual() {
        for recoverable in [ReservationStatus::NoShow, ReservationStatus::Cancelled] {
            assert!(
                recoverable
                    .validate_transition(ReservationStatus::Confirmed, true)
                    .is_ok()
            );
            assert!(
                recoverable
                    .validate_transition(ReservationStatus::Confirmed, false)
                    .is_err()
            );
            assert!(
                recoverable
                    .validate_transition(ReservationStatus::InHouse, true)
                    .is_err()
            );
        }
    }
}
