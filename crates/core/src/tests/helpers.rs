// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    CandidateDateField, CandidateQuery, ChargeRecorder, EngineError, ReservationRepository,
    SettingsProvider, StatusHistoryStore, TransitionFields, TransitionStore,
};
use chrono::{DateTime, TimeZone, Utc};
use stayward_audit::{NewStatusHistoryEntry, StatusHistoryEntry};
use stayward_domain::{
    AutomationOverride, AutomationSettings, PaymentStatus, Reservation, ReservationStatus,
};
use std::collections::{HashMap, HashSet};

/// A recorded pending charge.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCharge {
    pub reservation_id: i64,
    pub charge_type: String,
    pub amount: f64,
    pub description: String,
}

/// In-memory store fake used by the processor and authority tests.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    pub reservations: Vec<Reservation>,
    pub history: Vec<StatusHistoryEntry>,
    pub settings: HashMap<i64, AutomationSettings>,
    pub timezones: HashMap<i64, String>,
    pub charges: Vec<RecordedCharge>,
    pub orphaned_count: u64,
    /// Reservation ids whose next transition loses the CAS.
    pub concurrent_losers: HashSet<i64>,
    /// When true, charge recording fails.
    pub fail_charges: bool,
    next_history_id: i64,
}

impl InMemoryStore {
    pub fn with_property(property_id: i64, timezone: &str) -> Self {
        let mut store = Self::default();
        store
            .settings
            .insert(property_id, AutomationSettings::default());
        store
            .timezones
            .insert(property_id, timezone.to_string());
        store
    }

    pub fn push(&mut self, reservation: Reservation) {
        self.reservations.push(reservation);
    }

    pub fn reservation(&self, reservation_id: i64) -> &Reservation {
        self.reservations
            .iter()
            .find(|r| r.reservation_id == reservation_id)
            .expect("reservation should exist")
    }

    pub fn history_for(&self, reservation_id: i64) -> Vec<&StatusHistoryEntry> {
        self.history
            .iter()
            .filter(|h| h.reservation_id == reservation_id)
            .collect()
    }

    fn apply_fields(reservation: &mut Reservation, fields: &TransitionFields) {
        if let Some(paid) = fields.paid_amount {
            reservation.paid_amount = paid;
        }
        if let Some(status) = fields.payment_status {
            reservation.payment_status = status;
        }
        if let Some(reference) = &fields.payment_reference {
            reservation.payment_reference = Some(reference.clone());
        }
    }
}

impl ReservationRepository for InMemoryStore {
    fn find_candidates(
        &mut self,
        query: &CandidateQuery,
    ) -> Result<Vec<Reservation>, EngineError> {
        let mut matches: Vec<Reservation> = self
            .reservations
            .iter()
            .filter(|r| {
                let field = match query.date_field {
                    CandidateDateField::CheckIn => r.check_in,
                    CandidateDateField::CheckOut => r.check_out,
                    CandidateDateField::CreatedAt => r.created_at,
                };
                r.property_id == query.property_id
                    && !r.is_deleted
                    && r.automation_override == AutomationOverride::None
                    && query.statuses.contains(&r.status)
                    && field >= query.range_start
                    && field <= query.range_end
            })
            .cloned()
            .collect();
        matches.sort_by_key(|r| r.reservation_id);
        Ok(matches)
    }

    fn get_reservation(
        &mut self,
        reservation_id: i64,
    ) -> Result<Option<Reservation>, EngineError> {
        Ok(self
            .reservations
            .iter()
            .find(|r| r.reservation_id == reservation_id && !r.is_deleted)
            .cloned())
    }
}

impl TransitionStore for InMemoryStore {
    fn apply_transition(
        &mut self,
        expected_previous: ReservationStatus,
        new_status: ReservationStatus,
        fields: &TransitionFields,
        entry: &NewStatusHistoryEntry,
    ) -> Result<Reservation, EngineError> {
        if self.concurrent_losers.remove(&entry.reservation_id) {
            return Err(EngineError::ConcurrentModification(entry.reservation_id));
        }

        let history_id = self.next_history_id + 1;
        let reservation = self
            .reservations
            .iter_mut()
            .find(|r| r.reservation_id == entry.reservation_id && !r.is_deleted)
            .ok_or(EngineError::ReservationNotFound(entry.reservation_id))?;
        if reservation.status != expected_previous {
            return Err(EngineError::ConcurrentModification(entry.reservation_id));
        }

        reservation.status = new_status;
        reservation.status_change_reason = Some(entry.change_reason.clone());
        reservation.status_updated_by = Some(entry.changed_by.clone());
        reservation.status_updated_at = Some(entry.changed_at);
        Self::apply_fields(reservation, fields);
        let updated = reservation.clone();

        self.next_history_id = history_id;
        self.history.push(StatusHistoryEntry {
            history_id,
            reservation_id: entry.reservation_id,
            property_id: entry.property_id,
            previous_status: entry.previous_status,
            new_status: entry.new_status,
            changed_by: entry.changed_by.clone(),
            change_reason: entry.change_reason.clone(),
            changed_at: entry.changed_at,
            is_automatic: entry.is_automatic,
        });
        Ok(updated)
    }

    fn update_payment(
        &mut self,
        reservation_id: i64,
        fields: &TransitionFields,
    ) -> Result<Reservation, EngineError> {
        let reservation = self
            .reservations
            .iter_mut()
            .find(|r| r.reservation_id == reservation_id && !r.is_deleted)
            .ok_or(EngineError::ReservationNotFound(reservation_id))?;
        Self::apply_fields(reservation, fields);
        Ok(reservation.clone())
    }
}

impl StatusHistoryStore for InMemoryStore {
    fn history_for_reservation(
        &mut self,
        reservation_id: i64,
    ) -> Result<Vec<StatusHistoryEntry>, EngineError> {
        let mut entries: Vec<StatusHistoryEntry> = self
            .history
            .iter()
            .filter(|h| h.reservation_id == reservation_id)
            .cloned()
            .collect();
        entries.sort_by_key(|h| (h.changed_at, h.history_id));
        Ok(entries)
    }

    fn count_orphaned_entries(&mut self, _property_id: i64) -> Result<u64, EngineError> {
        Ok(self.orphaned_count)
    }

    fn count_entries_older_than(
        &mut self,
        property_id: i64,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, EngineError> {
        let count = self
            .history
            .iter()
            .filter(|h| h.property_id == property_id && h.changed_at < cutoff)
            .count();
        Ok(count.try_into().unwrap_or(u64::MAX))
    }
}

impl SettingsProvider for InMemoryStore {
    fn get_settings(&mut self, property_id: i64) -> Result<AutomationSettings, EngineError> {
        self.settings
            .get(&property_id)
            .cloned()
            .ok_or(EngineError::PropertyNotFound(property_id))
    }

    fn property_timezone(&mut self, property_id: i64) -> Result<String, EngineError> {
        self.timezones
            .get(&property_id)
            .cloned()
            .ok_or(EngineError::PropertyNotFound(property_id))
    }
}

impl ChargeRecorder for InMemoryStore {
    fn record_pending_charge(
        &mut self,
        reservation_id: i64,
        charge_type: &str,
        amount: f64,
        description: &str,
    ) -> Result<(), EngineError> {
        if self.fail_charges {
            return Err(EngineError::Store("charge ledger unavailable".to_string()));
        }
        self.charges.push(RecordedCharge {
            reservation_id,
            charge_type: charge_type.to_string(),
            amount,
            description: description.to_string(),
        });
        Ok(())
    }
}

pub const PROPERTY: i64 = 7;

pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

/// A confirmed, unpaid reservation with sensible defaults.
pub fn base_reservation(
    reservation_id: i64,
    status: ReservationStatus,
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
) -> Reservation {
    Reservation {
        reservation_id,
        property_id: PROPERTY,
        guest_name: format!("Guest {reservation_id}"),
        room_rate: Some(100.0),
        check_in,
        check_out,
        status,
        paid_amount: 0.0,
        total_booking_amount: 0.0,
        payment_status: PaymentStatus::Unpaid,
        payment_reference: None,
        status_change_reason: None,
        status_updated_by: None,
        status_updated_at: None,
        automation_override: AutomationOverride::None,
        is_deleted: false,
        created_at: check_in - chrono::Duration::days(7),
    }
}
