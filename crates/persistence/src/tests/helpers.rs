// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared fixtures for persistence tests.

use chrono::{DateTime, TimeZone, Utc};
use stayward_domain::{AutomationOverride, PaymentStatus, ReservationStatus};

use crate::{NewReservation, Persistence};

/// Fresh in-memory store with one active property in `America/Denver`.
pub fn store_with_property() -> (Persistence, i64) {
    let mut store = Persistence::new_in_memory().expect("in-memory store");
    let property_id = store
        .create_property("Alpine Gate Lodge", "America/Denver")
        .expect("create property");
    (store, property_id)
}

pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .unwrap()
}

pub fn new_reservation(
    property_id: i64,
    status: ReservationStatus,
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
) -> NewReservation {
    NewReservation {
        property_id,
        guest_name: "Avery Guest".to_string(),
        room_rate: Some(150.0),
        check_in,
        check_out,
        status,
        paid_amount: 0.0,
        total_booking_amount: 300.0,
        payment_status: PaymentStatus::Unpaid,
        automation_override: AutomationOverride::None,
    }
}
