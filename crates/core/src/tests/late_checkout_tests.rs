// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{InMemoryStore, PROPERTY, base_reservation, utc};
use crate::{JobContext, processors};
use stayward_domain::{LateFeePolicy, ReservationStatus};

// Default settings: check-out 11:00, 1h grace, flat 50.00 fee.
fn ctx(now: chrono::DateTime<chrono::Utc>) -> JobContext {
    JobContext::scheduled(PROPERTY, now)
}

fn in_house_checking_out_today(id: i64) -> stayward_domain::Reservation {
    base_reservation(
        id,
        ReservationStatus::InHouse,
        utc(2026, 7, 8, 15, 0),
        utc(2026, 7, 10, 11, 0),
    )
}

#[test]
fn test_stay_within_grace_is_not_flagged() {
    let mut store = InMemoryStore::with_property(PROPERTY, "UTC");
    store.push(in_house_checking_out_today(1));

    let result =
        processors::late_checkout::run(&mut store, &ctx(utc(2026, 7, 10, 11, 30)), None).unwrap();

    assert!(result.success);
    assert_eq!(result.processed_count, 0);
    assert!(store.charges.is_empty());
}

#[test]
fn test_overdue_stay_gets_flat_fee_and_keeps_status() {
    let mut store = InMemoryStore::with_property(PROPERTY, "UTC");
    store.push(in_house_checking_out_today(1));

    let result =
        processors::late_checkout::run(&mut store, &ctx(utc(2026, 7, 10, 12, 30)), None).unwrap();

    assert_eq!(result.processed_count, 1);
    assert_eq!(result.details.reservations_updated, vec![1]);
    // Detection never changes the status; the guest is still in the room
    assert_eq!(store.reservation(1).status, ReservationStatus::InHouse);
    assert!(store.history_for(1).is_empty());

    assert_eq!(store.charges.len(), 1);
    assert_eq!(store.charges[0].reservation_id, 1);
    assert_eq!(store.charges[0].charge_type, "late_checkout_fee");
    assert!((store.charges[0].amount - 50.0).abs() < f64::EPSILON);
}

#[test]
fn test_hourly_fee_bills_started_hours() {
    let mut store = InMemoryStore::with_property(PROPERTY, "UTC");
    if let Some(settings) = store.settings.get_mut(&PROPERTY) {
        settings.late_checkout_fee_policy = LateFeePolicy::Hourly;
        settings.late_checkout_fee = 20.0;
    }
    store.push(in_house_checking_out_today(1));

    // Grace ends 12:00; 2h05m overage bills as 3 hours at 20.00
    let result =
        processors::late_checkout::run(&mut store, &ctx(utc(2026, 7, 10, 14, 5)), None).unwrap();

    assert_eq!(result.processed_count, 1);
    assert_eq!(store.charges.len(), 1);
    assert!((store.charges[0].amount - 60.0).abs() < f64::EPSILON);
}

#[test]
fn test_charge_failure_does_not_fail_the_sweep() {
    let mut store = InMemoryStore::with_property(PROPERTY, "UTC");
    store.fail_charges = true;
    store.push(in_house_checking_out_today(1));

    let result =
        processors::late_checkout::run(&mut store, &ctx(utc(2026, 7, 10, 13, 0)), None).unwrap();

    assert!(result.success);
    assert_eq!(result.processed_count, 1);
    assert!(store.charges.is_empty());
    assert!(
        result
            .details
            .notifications
            .iter()
            .any(|n| n.contains("could not be recorded"))
    );
}

#[test]
fn test_dry_run_previews_the_fee_without_recording() {
    let mut store = InMemoryStore::with_property(PROPERTY, "UTC");
    store.push(in_house_checking_out_today(1));

    let mut context = ctx(utc(2026, 7, 10, 12, 30));
    context.dry_run = true;
    let result = processors::late_checkout::run(&mut store, &context, None).unwrap();

    assert_eq!(result.processed_count, 1);
    assert!(result.details.reservations_updated.is_empty());
    assert!(store.charges.is_empty());
    assert!(
        result.details.notifications[0].starts_with("[DRY RUN]")
            && result.details.notifications[0].contains("50.00")
    );
}

#[test]
fn test_grace_override_is_honored() {
    let mut store = InMemoryStore::with_property(PROPERTY, "UTC");
    store.push(in_house_checking_out_today(1));

    // With a 3h grace the 12:30 check is still in the free window
    let result =
        processors::late_checkout::run(&mut store, &ctx(utc(2026, 7, 10, 12, 30)), Some(3))
            .unwrap();

    assert_eq!(result.processed_count, 0);
}

#[test]
fn test_disabled_feature_is_a_successful_no_op() {
    let mut store = InMemoryStore::with_property(PROPERTY, "UTC");
    if let Some(settings) = store.settings.get_mut(&PROPERTY) {
        settings.enable_late_checkout_detection = false;
    }
    store.push(in_house_checking_out_today(1));

    let result =
        processors::late_checkout::run(&mut store, &ctx(utc(2026, 7, 10, 13, 0)), None).unwrap();

    assert!(result.success);
    assert_eq!(result.processed_count, 0);
    assert!(store.charges.is_empty());
}

#[test]
fn test_future_checkout_is_outside_the_scan_window() {
    let mut store = InMemoryStore::with_property(PROPERTY, "UTC");
    store.push(base_reservation(
        1,
        ReservationStatus::InHouse,
        utc(2026, 7, 9, 15, 0),
        utc(2026, 7, 11, 11, 0),
    ));

    let result =
        processors::late_checkout::run(&mut store, &ctx(utc(2026, 7, 10, 13, 0)), None).unwrap();

    assert_eq!(result.processed_count, 0);
}
