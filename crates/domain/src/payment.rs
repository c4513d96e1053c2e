// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment math for reservation confirmation decisions.
//!
//! Totals are derived from the nightly rate and stay length; when room
//! pricing is missing the fallback nightly rate keeps the percentage math
//! defined. Payment classification drives auto-confirmation: full payments
//! and deposits qualify outright, partials are compared against the
//! property's threshold.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Nightly rate assumed when a reservation carries no room pricing.
pub const FALLBACK_NIGHTLY_RATE: f64 = 100.0;

/// Number of nights a stay spans.
///
/// Partial nights round up, and every stay bills at least one night.
#[must_use]
pub fn nights(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> i64 {
    let seconds = (check_out - check_in).num_seconds();
    if seconds <= 0 {
        return 1;
    }
    seconds.div_ceil(24 * 3600).max(1)
}

/// Total booking amount for a stay.
///
/// `room_rate` of `None` falls back to [`FALLBACK_NIGHTLY_RATE`].
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn total_booking_amount(room_rate: Option<f64>, night_count: i64) -> f64 {
    let rate = room_rate.unwrap_or(FALLBACK_NIGHTLY_RATE);
    crate::fees::round_to_cents(rate * night_count as f64)
}

/// Percentage of the booking total covered by `paid`.
///
/// A non-positive total yields zero rather than a division by zero.
#[must_use]
pub fn payment_percentage(paid: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    (paid / total) * 100.0
}

/// Classification of a cumulative payment against the booking total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// Covers the full booking amount
    Full,
    /// Covers at least half the booking amount
    Deposit,
    /// Covers less than half the booking amount
    Partial,
}

impl PaymentType {
    /// Classifies a payment percentage.
    #[must_use]
    pub fn classify(percentage: f64) -> Self {
        if percentage >= 100.0 {
            Self::Full
        } else if percentage >= 50.0 {
            Self::Deposit
        } else {
            Self::Partial
        }
    }

    /// Returns the string representation of the classification.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Deposit => "deposit",
            Self::Partial => "partial",
        }
    }
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_nights_rounds_partial_nights_up() {
        // 15:00 check-in to 11:00 check-out two days later: 44 hours -> 2 nights
        assert_eq!(nights(utc(10, 15), utc(12, 11)), 2);
    }

    #[test]
    fn test_nights_minimum_is_one() {
        // Same-day stay still bills one night
        assert_eq!(nights(utc(10, 15), utc(10, 18)), 1);
        // Degenerate window clamps rather than underflows
        assert_eq!(nights(utc(10, 15), utc(10, 15)), 1);
        assert_eq!(nights(utc(12, 15), utc(10, 15)), 1);
    }

    #[test]
    fn test_nights_exact_multiple() {
        assert_eq!(nights(utc(10, 15), utc(13, 15)), 3);
    }

    #[test]
    fn test_total_uses_rate_when_present() {
        let total = total_booking_amount(Some(120.0), 3);
        assert!((total - 360.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_total_falls_back_when_rate_missing() {
        let total = total_booking_amount(None, 2);
        assert!((total - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_payment_percentage() {
        assert!((payment_percentage(50.0, 200.0) - 25.0).abs() < f64::EPSILON);
        assert!((payment_percentage(200.0, 200.0) - 100.0).abs() < f64::EPSILON);
        assert!((payment_percentage(50.0, 0.0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_payment_classification_boundaries() {
        assert_eq!(PaymentType::classify(100.0), PaymentType::Full);
        assert_eq!(PaymentType::classify(120.0), PaymentType::Full);
        assert_eq!(PaymentType::classify(99.9), PaymentType::Deposit);
        assert_eq!(PaymentType::classify(50.0), PaymentType::Deposit);
        assert_eq!(PaymentType::classify(49.9), PaymentType::Partial);
        assert_eq!(PaymentType::classify(0.0), PaymentType::Partial);
    }
}
