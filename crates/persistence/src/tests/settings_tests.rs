// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::NaiveTime;
use stayward::{EngineError, SettingsProvider};
use stayward_domain::SettingsPatch;

use super::helpers::store_with_property;

#[test]
fn test_defaults_when_no_settings_row() {
    let (mut store, property_id) = store_with_property();
    let settings = store.get_settings(property_id).unwrap();

    assert_eq!(settings.no_show_grace_hours, 6);
    assert_eq!(settings.late_checkout_grace_hours, 1);
    assert!(settings.enable_auto_confirmation);
}

#[test]
fn test_stored_overrides_applied_over_defaults() {
    let (mut store, property_id) = store_with_property();
    store
        .replace_settings(
            property_id,
            &SettingsPatch {
                check_out_time: Some("12:00".to_string()),
                no_show_grace_hours: Some(2),
                enable_auto_confirmation: Some(false),
                ..SettingsPatch::default()
            },
        )
        .unwrap();

    let settings = store.get_settings(property_id).unwrap();
    assert_eq!(
        settings.check_out_time,
        NaiveTime::from_hms_opt(12, 0, 0).unwrap()
    );
    assert_eq!(settings.no_show_grace_hours, 2);
    assert!(!settings.enable_auto_confirmation);
    // Untouched fields keep their defaults
    assert_eq!(
        settings.check_in_time,
        NaiveTime::from_hms_opt(15, 0, 0).unwrap()
    );
    assert_eq!(settings.late_checkout_grace_hours, 1);
}

#[test]
fn test_replace_clears_previous_overrides() {
    let (mut store, property_id) = store_with_property();
    store
        .replace_settings(
            property_id,
            &SettingsPatch {
                no_show_grace_hours: Some(2),
                ..SettingsPatch::default()
            },
        )
        .unwrap();
    store
        .replace_settings(
            property_id,
            &SettingsPatch {
                late_checkout_fee: Some(75.0),
                ..SettingsPatch::default()
            },
        )
        .unwrap();

    let settings = store.get_settings(property_id).unwrap();
    assert_eq!(settings.no_show_grace_hours, 6);
    assert!((settings.late_checkout_fee - 75.0).abs() < f64::EPSILON);
}

#[test]
fn test_unknown_property_is_reported() {
    let (mut store, _property_id) = store_with_property();
    assert!(matches!(
        store.get_settings(404),
        Err(EngineError::PropertyNotFound(404))
    ));
    assert!(matches!(
        store.property_timezone(404),
        Err(EngineError::PropertyNotFound(404))
    ));
}

#[test]
fn test_inactive_property_is_reported() {
    let (mut store, property_id) = store_with_property();
    store.deactivate_property(property_id).unwrap();

    assert!(matches!(
        store.get_settings(property_id),
        Err(EngineError::PropertyNotFound(missing)) if missing == property_id
    ));
    assert!(store.list_active_properties().unwrap().is_empty());
}

#[test]
fn test_property_timezone() {
    let (mut store, property_id) = store_with_property();
    assert_eq!(
        store.property_timezone(property_id).unwrap(),
        "America/Denver"
    );
}
