// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reservation records as seen by the automation engine.

use crate::error::DomainError;
use crate::status::ReservationStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Per-reservation automation opt-out.
///
/// Stored as an explicit column; candidate queries exclude any reservation
/// whose override is not [`AutomationOverride::None`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomationOverride {
    /// Automation applies normally
    #[default]
    None,
    /// Staff disabled automation for this reservation
    Disabled,
    /// Staff placed the reservation under manual handling
    ManualOverride,
}

impl AutomationOverride {
    /// Returns the string representation of the override.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Disabled => "disabled",
            Self::ManualOverride => "manual_override",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "none" => Ok(Self::None),
            "disabled" => Ok(Self::Disabled),
            "manual_override" => Ok(Self::ManualOverride),
            _ => Err(DomainError::InvalidAutomationOverride(s.to_string())),
        }
    }

    /// Returns true if this override excludes the reservation from automation.
    #[must_use]
    pub const fn blocks_automation(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl FromStr for AutomationOverride {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// Payment state of a reservation's folio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Nothing has been paid
    Unpaid,
    /// Some but not all of the booking amount has been paid
    PartiallyPaid,
    /// The booking amount is fully covered
    Paid,
}

impl PaymentStatus {
    /// Returns the string representation of the payment status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::PartiallyPaid => "partially_paid",
            Self::Paid => "paid",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "unpaid" => Ok(Self::Unpaid),
            "partially_paid" => Ok(Self::PartiallyPaid),
            "paid" => Ok(Self::Paid),
            _ => Err(DomainError::InvalidPaymentStatus(s.to_string())),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// A reservation as the engine reads and writes it.
///
/// Stay boundaries are UTC instants; wall-clock interpretation happens
/// against the owning property's timezone. The last-transition metadata
/// mirrors the most recent status history row.
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub reservation_id: i64,
    pub property_id: i64,
    pub guest_name: String,
    /// Nightly rate; `None` falls back to the engine's default for totals.
    pub room_rate: Option<f64>,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub status: ReservationStatus,
    pub paid_amount: f64,
    pub total_booking_amount: f64,
    pub payment_status: PaymentStatus,
    /// Gateway reference of the most recent payment, when known.
    pub payment_reference: Option<String>,
    pub status_change_reason: Option<String>,
    pub status_updated_by: Option<String>,
    pub status_updated_at: Option<DateTime<Utc>>,
    pub automation_override: AutomationOverride,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// Validates the stay window.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStayWindow` if check-out is not after
    /// check-in.
    pub fn validate_stay_window(&self) -> Result<(), DomainError> {
        if self.check_out > self.check_in {
            Ok(())
        } else {
            Err(DomainError::InvalidStayWindow {
                reason: format!(
                    "check-out {} is not after check-in {}",
                    self.check_out, self.check_in
                ),
            })
        }
    }
}
