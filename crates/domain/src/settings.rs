// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-property automation settings.
//!
//! Settings are stored sparsely: a property row may override any subset of
//! fields, and unset fields fall back to the documented defaults. Resolution
//! happens field by field through [`SettingsPatch`], so a property that only
//! customizes its check-out time still gets default grace periods.

use crate::error::DomainError;
use crate::fees::LateFeePolicy;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Automation features that can be toggled per property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutomationType {
    /// Mark confirmed reservations as no-shows past the grace period
    NoShowDetection,
    /// Detect overdue in-house stays and record late fees
    LateCheckoutDetection,
    /// Promote paid reservations to in-house on arrival day
    AutoCheckin,
    /// Confirm pending reservations when qualifying payment arrives
    AutoConfirmation,
}

/// Parses a `HH:MM` wall-clock string.
///
/// # Errors
///
/// Returns `DomainError::InvalidTimeOfDay` if the string is not a valid
/// 24-hour `HH:MM` time.
pub fn parse_wall_clock(s: &str) -> Result<NaiveTime, DomainError> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| DomainError::InvalidTimeOfDay(s.to_string()))
}

/// Resolved automation settings for a single property.
///
/// Constructed from [`AutomationSettings::default`] plus a stored
/// [`SettingsPatch`]; processors never see unset fields.
#[derive(Debug, Clone, PartialEq)]
pub struct AutomationSettings {
    /// Standard check-in wall-clock time.
    pub check_in_time: NaiveTime,
    /// Standard check-out wall-clock time.
    pub check_out_time: NaiveTime,
    /// Hours past scheduled check-in before a no-show is declared.
    pub no_show_grace_hours: u32,
    /// Hours past scheduled check-out before a stay is overdue.
    pub late_checkout_grace_hours: u32,
    /// Hours a reservation may sit in confirmation-pending before cleanup
    /// cancels it.
    pub confirmation_pending_timeout_hours: u32,
    /// Minimum payment percentage that auto-confirms a pending reservation.
    pub auto_confirm_threshold: f64,
    /// How many days back the no-show sweep scans for candidates.
    pub no_show_lookback_days: u32,
    /// How many days back the late-checkout sweep scans for candidates.
    pub late_checkout_lookback_days: u32,
    /// How long status history rows stay before they are archive-eligible.
    pub audit_log_retention_days: u32,
    /// Base late-checkout fee amount (flat, hourly rate, or fallback).
    pub late_checkout_fee: f64,
    /// How the late-checkout fee is computed from the base amount.
    pub late_checkout_fee_policy: LateFeePolicy,
    /// Feature flag: no-show detection.
    pub enable_no_show_detection: bool,
    /// Feature flag: late checkout detection.
    pub enable_late_checkout_detection: bool,
    /// Feature flag: automatic check-in.
    pub enable_auto_checkin: bool,
    /// Feature flag: payment-triggered confirmation.
    pub enable_auto_confirmation: bool,
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            // 15:00 and 11:00 are always representable
            check_in_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap_or_default(),
            check_out_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap_or_default(),
            no_show_grace_hours: 6,
            late_checkout_grace_hours: 1,
            confirmation_pending_timeout_hours: 24,
            auto_confirm_threshold: 50.0,
            no_show_lookback_days: 3,
            late_checkout_lookback_days: 2,
            audit_log_retention_days: 365,
            late_checkout_fee: 50.0,
            late_checkout_fee_policy: LateFeePolicy::FlatRate,
            enable_no_show_detection: true,
            enable_late_checkout_detection: true,
            enable_auto_checkin: true,
            enable_auto_confirmation: true,
        }
    }
}

impl AutomationSettings {
    /// Returns whether the given automation feature is enabled.
    #[must_use]
    pub const fn is_enabled(&self, automation: AutomationType) -> bool {
        match automation {
            AutomationType::NoShowDetection => self.enable_no_show_detection,
            AutomationType::LateCheckoutDetection => self.enable_late_checkout_detection,
            AutomationType::AutoCheckin => self.enable_auto_checkin,
            AutomationType::AutoConfirmation => self.enable_auto_confirmation,
        }
    }

    /// Applies a stored override patch on top of these settings.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimeOfDay` for malformed wall-clock
    /// strings and `DomainError::InvalidFeePolicy` for unrecognized policy
    /// names in the patch.
    pub fn with_patch(mut self, patch: &SettingsPatch) -> Result<Self, DomainError> {
        if let Some(s) = &patch.check_in_time {
            self.check_in_time = parse_wall_clock(s)?;
        }
        if let Some(s) = &patch.check_out_time {
            self.check_out_time = parse_wall_clock(s)?;
        }
        if let Some(v) = patch.no_show_grace_hours {
            self.no_show_grace_hours = v;
        }
        if let Some(v) = patch.late_checkout_grace_hours {
            self.late_checkout_grace_hours = v;
        }
        if let Some(v) = patch.confirmation_pending_timeout_hours {
            self.confirmation_pending_timeout_hours = v;
        }
        if let Some(v) = patch.auto_confirm_threshold {
            self.auto_confirm_threshold = v;
        }
        if let Some(v) = patch.no_show_lookback_days {
            self.no_show_lookback_days = v;
        }
        if let Some(v) = patch.late_checkout_lookback_days {
            self.late_checkout_lookback_days = v;
        }
        if let Some(v) = patch.audit_log_retention_days {
            self.audit_log_retention_days = v;
        }
        if let Some(v) = patch.late_checkout_fee {
            self.late_checkout_fee = v;
        }
        if let Some(s) = &patch.late_checkout_fee_policy {
            self.late_checkout_fee_policy = s.parse()?;
        }
        if let Some(v) = patch.enable_no_show_detection {
            self.enable_no_show_detection = v;
        }
        if let Some(v) = patch.enable_late_checkout_detection {
            self.enable_late_checkout_detection = v;
        }
        if let Some(v) = patch.enable_auto_checkin {
            self.enable_auto_checkin = v;
        }
        if let Some(v) = patch.enable_auto_confirmation {
            self.enable_auto_confirmation = v;
        }
        Ok(self)
    }
}

/// Sparse per-property settings overrides as stored.
///
/// `None` means "use the default". Wall-clock times and fee policies are kept
/// in their stored string form and validated during resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPatch {
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub no_show_grace_hours: Option<u32>,
    pub late_checkout_grace_hours: Option<u32>,
    pub confirmation_pending_timeout_hours: Option<u32>,
    pub auto_confirm_threshold: Option<f64>,
    pub no_show_lookback_days: Option<u32>,
    pub late_checkout_lookback_days: Option<u32>,
    pub audit_log_retention_days: Option<u32>,
    pub late_checkout_fee: Option<f64>,
    pub late_checkout_fee_policy: Option<String>,
    pub enable_no_show_detection: Option<bool>,
    pub enable_late_checkout_detection: Option<bool>,
    pub enable_auto_checkin: Option<bool>,
    pub enable_auto_confirmation: Option<bool>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let settings = AutomationSettings::default();
        assert_eq!(
            settings.check_in_time,
            NaiveTime::from_hms_opt(15, 0, 0).unwrap()
        );
        assert_eq!(
            settings.check_out_time,
            NaiveTime::from_hms_opt(11, 0, 0).unwrap()
        );
        assert_eq!(settings.no_show_grace_hours, 6);
        assert_eq!(settings.late_checkout_grace_hours, 1);
        assert!((settings.auto_confirm_threshold - 50.0).abs() < f64::EPSILON);
        assert!(settings.is_enabled(AutomationType::NoShowDetection));
        assert!(settings.is_enabled(AutomationType::LateCheckoutDetection));
        assert!(settings.is_enabled(AutomationType::AutoCheckin));
        assert!(settings.is_enabled(AutomationType::AutoConfirmation));
    }

    #[test]
    fn test_patch_overrides_only_set_fields() {
        let patch = SettingsPatch {
            check_out_time: Some("12:30".to_string()),
            no_show_grace_hours: Some(2),
            enable_auto_confirmation: Some(false),
            ..SettingsPatch::default()
        };

        let settings = AutomationSettings::default().with_patch(&patch).unwrap();

        assert_eq!(
            settings.check_out_time,
            NaiveTime::from_hms_opt(12, 30, 0).unwrap()
        );
        assert_eq!(settings.no_show_grace_hours, 2);
        assert!(!settings.is_enabled(AutomationType::AutoConfirmation));
        // Untouched fields keep their defaults
        assert_eq!(
            settings.check_in_time,
            NaiveTime::from_hms_opt(15, 0, 0).unwrap()
        );
        assert_eq!(settings.late_checkout_grace_hours, 1);
    }

    #[test]
    fn test_patch_rejects_malformed_wall_clock() {
        let patch = SettingsPatch {
            check_in_time: Some("3 pm".to_string()),
            ..SettingsPatch::default()
        };
        let result = AutomationSettings::default().with_patch(&patch);
        assert!(matches!(result, Err(DomainError::InvalidTimeOfDay(_))));
    }

    #[test]
    fn test_patch_rejects_unknown_fee_policy() {
        let patch = SettingsPatch {
            late_checkout_fee_policy: Some("per_minute".to_string()),
            ..SettingsPatch::default()
        };
        let result = AutomationSettings::default().with_patch(&patch);
        assert!(matches!(result, Err(DomainError::InvalidFeePolicy(_))));
    }

    #[test]
    fn test_parse_wall_clock() {
        assert_eq!(
            parse_wall_clock("09:45").unwrap(),
            NaiveTime::from_hms_opt(9, 45, 0).unwrap()
        );
        assert!(parse_wall_clock("25:00").is_err());
        assert!(parse_wall_clock("").is_err());
    }
}
