// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Timezone identifier is not a valid IANA zone name.
    InvalidTimezone(String),
    /// Reservation status string is not recognized.
    InvalidStatus {
        /// The unrecognized status string.
        status: String,
    },
    /// The requested status transition is not permitted by the lifecycle graph.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition is rejected.
        reason: String,
    },
    /// Wall-clock time string or hour value is invalid.
    InvalidTimeOfDay(String),
    /// Late fee policy string is not recognized.
    InvalidFeePolicy(String),
    /// Automation override string is not recognized.
    InvalidAutomationOverride(String),
    /// Payment status string is not recognized.
    InvalidPaymentStatus(String),
    /// The stay window is malformed (check-out not after check-in).
    InvalidStayWindow {
        /// Description of the validation error.
        reason: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone: {tz}"),
            Self::InvalidStatus { status } => {
                write!(f, "Invalid reservation status: {status}")
            }
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Invalid status transition from {from} to {to}: {reason}")
            }
            Self::InvalidTimeOfDay(msg) => write!(f, "Invalid time of day: {msg}"),
            Self::InvalidFeePolicy(msg) => write!(f, "Invalid late fee policy: {msg}"),
            Self::InvalidAutomationOverride(msg) => {
                write!(f, "Invalid automation override: {msg}")
            }
            Self::InvalidPaymentStatus(msg) => write!(f, "Invalid payment status: {msg}"),
            Self::InvalidStayWindow { reason } => write!(f, "Invalid stay window: {reason}"),
        }
    }
}

impl std::error::Error for DomainError {}
