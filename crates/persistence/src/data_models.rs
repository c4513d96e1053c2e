// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs and row-to-domain mapping.
//!
//! Timestamps are stored as RFC 3339 text in UTC, which keeps lexicographic
//! and chronological ordering identical for range filters. Enumerations are
//! stored via their domain string forms and re-validated on the way out.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use std::str::FromStr;
use stayward_audit::{NewStatusHistoryEntry, StatusHistoryEntry};
use stayward_domain::{
    AutomationOverride, PaymentStatus, Reservation, ReservationStatus, SettingsPatch,
};

use crate::diesel_schema::{automation_settings, pending_charges, reservations, status_history};
use crate::error::PersistenceError;

/// Formats a UTC instant for storage.
pub(crate) fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339()
}

/// Parses a stored RFC 3339 timestamp back to a UTC instant.
pub(crate) fn parse_instant(stored: &str) -> Result<DateTime<Utc>, PersistenceError> {
    DateTime::parse_from_rfc3339(stored)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| PersistenceError::InvalidRow(format!("bad timestamp {stored:?}: {e}")))
}

fn opt_u32(value: Option<i32>, column: &str) -> Result<Option<u32>, PersistenceError> {
    value
        .map(|v| {
            u32::try_from(v)
                .map_err(|_| PersistenceError::InvalidRow(format!("negative {column}: {v}")))
        })
        .transpose()
}

const fn opt_flag(value: Option<i32>) -> Option<bool> {
    match value {
        Some(v) => Some(v != 0),
        None => None,
    }
}

/// A property as stored.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct PropertyRow {
    pub property_id: i64,
    pub name: String,
    pub timezone: String,
    pub is_active: i32,
    pub created_at: String,
}

/// A property as exposed to callers (for example the scheduler bootstrap).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRecord {
    pub property_id: i64,
    pub name: String,
    pub timezone: String,
    pub is_active: bool,
}

impl From<PropertyRow> for PropertyRecord {
    fn from(row: PropertyRow) -> Self {
        Self {
            property_id: row.property_id,
            name: row.name,
            timezone: row.timezone,
            is_active: row.is_active != 0,
        }
    }
}

/// A reservation row in storage order.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct ReservationRow {
    pub reservation_id: i64,
    pub property_id: i64,
    pub guest_name: String,
    pub room_rate: Option<f64>,
    pub check_in: String,
    pub check_out: String,
    pub status: String,
    pub paid_amount: f64,
    pub total_booking_amount: f64,
    pub payment_status: String,
    pub payment_reference: Option<String>,
    pub status_change_reason: Option<String>,
    pub status_updated_by: Option<String>,
    pub status_updated_at: Option<String>,
    pub automation_override: String,
    pub is_deleted: i32,
    pub created_at: String,
}

impl ReservationRow {
    pub(crate) fn into_domain(self) -> Result<Reservation, PersistenceError> {
        let status = ReservationStatus::from_str(&self.status)
            .map_err(|e| PersistenceError::InvalidRow(e.to_string()))?;
        let payment_status = PaymentStatus::from_str(&self.payment_status)
            .map_err(|e| PersistenceError::InvalidRow(e.to_string()))?;
        let automation_override = AutomationOverride::from_str(&self.automation_override)
            .map_err(|e| PersistenceError::InvalidRow(e.to_string()))?;
        let status_updated_at = self
            .status_updated_at
            .as_deref()
            .map(parse_instant)
            .transpose()?;

        Ok(Reservation {
            reservation_id: self.reservation_id,
            property_id: self.property_id,
            guest_name: self.guest_name,
            room_rate: self.room_rate,
            check_in: parse_instant(&self.check_in)?,
            check_out: parse_instant(&self.check_out)?,
            status,
            paid_amount: self.paid_amount,
            total_booking_amount: self.total_booking_amount,
            payment_status,
            payment_reference: self.payment_reference,
            status_change_reason: self.status_change_reason,
            status_updated_by: self.status_updated_by,
            status_updated_at,
            automation_override,
            is_deleted: self.is_deleted != 0,
            created_at: parse_instant(&self.created_at)?,
        })
    }
}

/// A reservation pending insertion; the identifier is assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReservation {
    pub property_id: i64,
    pub guest_name: String,
    pub room_rate: Option<f64>,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub status: ReservationStatus,
    pub paid_amount: f64,
    pub total_booking_amount: f64,
    pub payment_status: PaymentStatus,
    pub automation_override: AutomationOverride,
}

#[derive(Insertable)]
#[diesel(table_name = reservations)]
pub(crate) struct NewReservationRow {
    pub property_id: i64,
    pub guest_name: String,
    pub room_rate: Option<f64>,
    pub check_in: String,
    pub check_out: String,
    pub status: String,
    pub paid_amount: f64,
    pub total_booking_amount: f64,
    pub payment_status: String,
    pub automation_override: String,
    pub is_deleted: i32,
    pub created_at: String,
}

impl NewReservationRow {
    pub(crate) fn from_new(reservation: &NewReservation, created_at: String) -> Self {
        Self {
            property_id: reservation.property_id,
            guest_name: reservation.guest_name.clone(),
            room_rate: reservation.room_rate,
            check_in: format_instant(reservation.check_in),
            check_out: format_instant(reservation.check_out),
            status: reservation.status.as_str().to_string(),
            paid_amount: reservation.paid_amount,
            total_booking_amount: reservation.total_booking_amount,
            payment_status: reservation.payment_status.as_str().to_string(),
            automation_override: reservation.automation_override.as_str().to_string(),
            is_deleted: 0,
            created_at,
        }
    }
}

/// Column writes applied by a status transition.
#[derive(AsChangeset)]
#[diesel(table_name = reservations)]
pub(crate) struct TransitionChanges {
    pub status: String,
    pub paid_amount: Option<f64>,
    pub payment_status: Option<String>,
    pub payment_reference: Option<String>,
    pub status_change_reason: String,
    pub status_updated_by: String,
    pub status_updated_at: String,
}

/// Payment column writes with no status change.
#[derive(AsChangeset)]
#[diesel(table_name = reservations)]
pub(crate) struct PaymentChanges {
    pub paid_amount: Option<f64>,
    pub payment_status: Option<String>,
    pub payment_reference: Option<String>,
}

/// A status history row in storage order.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct StatusHistoryRow {
    pub history_id: i64,
    pub reservation_id: i64,
    pub property_id: i64,
    pub previous_status: Option<String>,
    pub new_status: String,
    pub changed_by: String,
    pub change_reason: String,
    pub changed_at: String,
    pub is_automatic: i32,
}

impl StatusHistoryRow {
    pub(crate) fn into_domain(self) -> Result<StatusHistoryEntry, PersistenceError> {
        let previous_status = self
            .previous_status
            .as_deref()
            .map(ReservationStatus::from_str)
            .transpose()
            .map_err(|e| PersistenceError::InvalidRow(e.to_string()))?;
        let new_status = ReservationStatus::from_str(&self.new_status)
            .map_err(|e| PersistenceError::InvalidRow(e.to_string()))?;

        Ok(StatusHistoryEntry {
            history_id: self.history_id,
            reservation_id: self.reservation_id,
            property_id: self.property_id,
            previous_status,
            new_status,
            changed_by: self.changed_by,
            change_reason: self.change_reason,
            changed_at: parse_instant(&self.changed_at)?,
            is_automatic: self.is_automatic != 0,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = status_history)]
pub(crate) struct NewStatusHistoryRow {
    pub reservation_id: i64,
    pub property_id: i64,
    pub previous_status: Option<String>,
    pub new_status: String,
    pub changed_by: String,
    pub change_reason: String,
    pub changed_at: String,
    pub is_automatic: i32,
}

impl From<&NewStatusHistoryEntry> for NewStatusHistoryRow {
    fn from(entry: &NewStatusHistoryEntry) -> Self {
        Self {
            reservation_id: entry.reservation_id,
            property_id: entry.property_id,
            previous_status: entry.previous_status.map(|s| s.as_str().to_string()),
            new_status: entry.new_status.as_str().to_string(),
            changed_by: entry.changed_by.clone(),
            change_reason: entry.change_reason.clone(),
            changed_at: format_instant(entry.changed_at),
            is_automatic: i32::from(entry.is_automatic),
        }
    }
}

/// Sparse settings overrides as stored; one row per property.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = automation_settings)]
pub(crate) struct SettingsRow {
    pub property_id: i64,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub no_show_grace_hours: Option<i32>,
    pub late_checkout_grace_hours: Option<i32>,
    pub confirmation_pending_timeout_hours: Option<i32>,
    pub auto_confirm_threshold: Option<f64>,
    pub no_show_lookback_days: Option<i32>,
    pub late_checkout_lookback_days: Option<i32>,
    pub audit_log_retention_days: Option<i32>,
    pub late_checkout_fee: Option<f64>,
    pub late_checkout_fee_policy: Option<String>,
    pub enable_no_show_detection: Option<i32>,
    pub enable_late_checkout_detection: Option<i32>,
    pub enable_auto_checkin: Option<i32>,
    pub enable_auto_confirmation: Option<i32>,
}

impl SettingsRow {
    pub(crate) fn into_patch(self) -> Result<SettingsPatch, PersistenceError> {
        Ok(SettingsPatch {
            check_in_time: self.check_in_time,
            check_out_time: self.check_out_time,
            no_show_grace_hours: opt_u32(self.no_show_grace_hours, "no_show_grace_hours")?,
            late_checkout_grace_hours: opt_u32(
                self.late_checkout_grace_hours,
                "late_checkout_grace_hours",
            )?,
            confirmation_pending_timeout_hours: opt_u32(
                self.confirmation_pending_timeout_hours,
                "confirmation_pending_timeout_hours",
            )?,
            auto_confirm_threshold: self.auto_confirm_threshold,
            no_show_lookback_days: opt_u32(self.no_show_lookback_days, "no_show_lookback_days")?,
            late_checkout_lookback_days: opt_u32(
                self.late_checkout_lookback_days,
                "late_checkout_lookback_days",
            )?,
            audit_log_retention_days: opt_u32(
                self.audit_log_retention_days,
                "audit_log_retention_days",
            )?,
            late_checkout_fee: self.late_checkout_fee,
            late_checkout_fee_policy: self.late_checkout_fee_policy,
            enable_no_show_detection: opt_flag(self.enable_no_show_detection),
            enable_late_checkout_detection: opt_flag(self.enable_late_checkout_detection),
            enable_auto_checkin: opt_flag(self.enable_auto_checkin),
            enable_auto_confirmation: opt_flag(self.enable_auto_confirmation),
        })
    }

    pub(crate) fn from_patch(property_id: i64, patch: &SettingsPatch) -> Self {
        fn stored_u32(value: Option<u32>) -> Option<i32> {
            value.map(|v| i32::try_from(v).unwrap_or(i32::MAX))
        }

        Self {
            property_id,
            check_in_time: patch.check_in_time.clone(),
            check_out_time: patch.check_out_time.clone(),
            no_show_grace_hours: stored_u32(patch.no_show_grace_hours),
            late_checkout_grace_hours: stored_u32(patch.late_checkout_grace_hours),
            confirmation_pending_timeout_hours: stored_u32(
                patch.confirmation_pending_timeout_hours,
            ),
            auto_confirm_threshold: patch.auto_confirm_threshold,
            no_show_lookback_days: stored_u32(patch.no_show_lookback_days),
            late_checkout_lookback_days: stored_u32(patch.late_checkout_lookback_days),
            audit_log_retention_days: stored_u32(patch.audit_log_retention_days),
            late_checkout_fee: patch.late_checkout_fee,
            late_checkout_fee_policy: patch.late_checkout_fee_policy.clone(),
            enable_no_show_detection: patch.enable_no_show_detection.map(i32::from),
            enable_late_checkout_detection: patch.enable_late_checkout_detection.map(i32::from),
            enable_auto_checkin: patch.enable_auto_checkin.map(i32::from),
            enable_auto_confirmation: patch.enable_auto_confirmation.map(i32::from),
        }
    }
}

/// A recorded pending charge.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingChargeRecord {
    pub charge_id: i64,
    pub reservation_id: i64,
    pub charge_type: String,
    pub amount: f64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A pending charge row in storage order.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct PendingChargeRow {
    pub charge_id: i64,
    pub reservation_id: i64,
    pub charge_type: String,
    pub amount: f64,
    pub description: String,
    pub created_at: String,
}

impl PendingChargeRow {
    pub(crate) fn into_record(self) -> Result<PendingChargeRecord, PersistenceError> {
        Ok(PendingChargeRecord {
            charge_id: self.charge_id,
            reservation_id: self.reservation_id,
            charge_type: self.charge_type,
            amount: self.amount,
            description: self.description,
            created_at: parse_instant(&self.created_at)?,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = pending_charges)]
pub(crate) struct NewPendingChargeRow {
    pub reservation_id: i64,
    pub charge_type: String,
    pub amount: f64,
    pub description: String,
    pub created_at: String,
}
