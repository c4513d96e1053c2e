// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Late-checkout fee policies.
//!
//! Fees are computed from the scheduled checkout instant, the property's
//! grace period, and a configured base amount. Overage is billed in whole
//! hours, rounded up. The percentage policies currently fall back to the
//! flat amount because the fee calculation has no access to folio totals;
//! the policy names are preserved so stored settings keep their meaning.

use crate::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a late-checkout fee is derived from the configured base amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LateFeePolicy {
    /// One fixed charge regardless of overage length
    FlatRate,
    /// Base amount per started hour of overage
    Hourly,
    /// Percentage of the room rate (falls back to the flat amount)
    PercentageOfRoomRate,
    /// Percentage of the total bill (falls back to the flat amount)
    PercentageOfTotalBill,
}

impl LateFeePolicy {
    /// Returns the string representation of the policy.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FlatRate => "flat_rate",
            Self::Hourly => "hourly",
            Self::PercentageOfRoomRate => "percentage_of_room_rate",
            Self::PercentageOfTotalBill => "percentage_of_total_bill",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "flat_rate" => Ok(Self::FlatRate),
            "hourly" => Ok(Self::Hourly),
            "percentage_of_room_rate" => Ok(Self::PercentageOfRoomRate),
            "percentage_of_total_bill" => Ok(Self::PercentageOfTotalBill),
            _ => Err(DomainError::InvalidFeePolicy(s.to_string())),
        }
    }
}

impl FromStr for LateFeePolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// Rounds a currency amount to two decimal places.
#[must_use]
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Calculates the late-checkout fee owed at `now`.
///
/// # Arguments
///
/// * `scheduled_checkout` - The checkout instant the guest was held to
/// * `grace_hours` - Free hours past the scheduled checkout
/// * `now` - The evaluation instant
/// * `policy` - How the base amount scales with overage
/// * `base_amount` - The configured fee amount
///
/// # Returns
///
/// Zero while `now` is within the grace period; otherwise the policy-scaled
/// fee, rounded to cents. Overage is counted in whole started hours.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn calculate_late_fee(
    scheduled_checkout: DateTime<Utc>,
    grace_hours: u32,
    now: DateTime<Utc>,
    policy: LateFeePolicy,
    base_amount: f64,
) -> f64 {
    let grace_end = scheduled_checkout + chrono::Duration::hours(i64::from(grace_hours));
    let overage_seconds = (now - grace_end).num_seconds();
    if overage_seconds <= 0 {
        return 0.0;
    }

    // Whole started hours
    let overage_hours = overage_seconds.div_ceil(3600);

    let fee = match policy {
        LateFeePolicy::Hourly => base_amount * overage_hours as f64,
        LateFeePolicy::FlatRate
        | LateFeePolicy::PercentageOfRoomRate
        | LateFeePolicy::PercentageOfTotalBill => base_amount,
    };

    round_to_cents(fee)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 10, h, mi, 0).unwrap()
    }

    #[test]
    fn test_policy_string_round_trip() {
        for policy in [
            LateFeePolicy::FlatRate,
            LateFeePolicy::Hourly,
            LateFeePolicy::PercentageOfRoomRate,
            LateFeePolicy::PercentageOfTotalBill,
        ] {
            assert_eq!(
                LateFeePolicy::parse_str(policy.as_str()).unwrap(),
                policy
            );
        }
        assert!(LateFeePolicy::parse_str("per_minute").is_err());
    }

    #[test]
    fn test_no_fee_within_grace_period() {
        // Checkout 11:00, one hour grace, evaluated 11:30
        let fee = calculate_late_fee(utc(11, 0), 1, utc(11, 30), LateFeePolicy::Hourly, 20.0);
        assert!((fee - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_no_fee_exactly_at_grace_end() {
        let fee = calculate_late_fee(utc(11, 0), 1, utc(12, 0), LateFeePolicy::FlatRate, 50.0);
        assert!((fee - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hourly_fee_rounds_overage_up() {
        // Grace ends at 12:00; 2h05m of overage bills as 3 hours
        let fee = calculate_late_fee(utc(11, 0), 1, utc(14, 5), LateFeePolicy::Hourly, 20.0);
        assert!((fee - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_flat_fee_ignores_overage_length() {
        let short = calculate_late_fee(utc(11, 0), 1, utc(12, 1), LateFeePolicy::FlatRate, 50.0);
        let long = calculate_late_fee(utc(11, 0), 1, utc(23, 0), LateFeePolicy::FlatRate, 50.0);
        assert!((short - 50.0).abs() < f64::EPSILON);
        assert!((long - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_percentage_policies_fall_back_to_flat_amount() {
        for policy in [
            LateFeePolicy::PercentageOfRoomRate,
            LateFeePolicy::PercentageOfTotalBill,
        ] {
            let fee = calculate_late_fee(utc(11, 0), 1, utc(15, 0), policy, 50.0);
            assert!((fee - 50.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_fee_is_rounded_to_cents() {
        let fee = calculate_late_fee(utc(11, 0), 0, utc(13, 0), LateFeePolicy::Hourly, 9.999);
        assert!((fee - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_round_to_cents() {
        assert!((round_to_cents(10.006) - 10.01).abs() < f64::EPSILON);
        assert!((round_to_cents(10.004) - 10.0).abs() < f64::EPSILON);
    }
}
