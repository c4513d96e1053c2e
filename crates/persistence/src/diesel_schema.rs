// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

diesel::table! {
    properties (property_id) {
        property_id -> BigInt,
        name -> Text,
        timezone -> Text,
        is_active -> Integer,
        created_at -> Text,
    }
}

diesel::table! {
    reservations (reservation_id) {
        reservation_id -> BigInt,
        property_id -> BigInt,
        guest_name -> Text,
        room_rate -> Nullable<Double>,
        check_in -> Text,
        check_out -> Text,
        status -> Text,
        paid_amount -> Double,
        total_booking_amount -> Double,
        payment_status -> Text,
        payment_reference -> Nullable<Text>,
        status_change_reason -> Nullable<Text>,
        status_updated_by -> Nullable<Text>,
        status_updated_at -> Nullable<Text>,
        automation_override -> Text,
        is_deleted -> Integer,
        created_at -> Text,
    }
}

diesel::table! {
    status_history (history_id) {
        history_id -> BigInt,
        reservation_id -> BigInt,
        property_id -> BigInt,
        previous_status -> Nullable<Text>,
        new_status -> Text,
        changed_by -> Text,
        change_reason -> Text,
        changed_at -> Text,
        is_automatic -> Integer,
    }
}

diesel::table! {
    automation_settings (property_id) {
        property_id -> BigInt,
        check_in_time -> Nullable<Text>,
        check_out_time -> Nullable<Text>,
        no_show_grace_hours -> Nullable<Integer>,
        late_checkout_grace_hours -> Nullable<Integer>,
        confirmation_pending_timeout_hours -> Nullable<Integer>,
        auto_confirm_threshold -> Nullable<Double>,
        no_show_lookback_days -> Nullable<Integer>,
        late_checkout_lookback_days -> Nullable<Integer>,
        audit_log_retention_days -> Nullable<Integer>,
        late_checkout_fee -> Nullable<Double>,
        late_checkout_fee_policy -> Nullable<Text>,
        enable_no_show_detection -> Nullable<Integer>,
        enable_late_checkout_detection -> Nullable<Integer>,
        enable_auto_checkin -> Nullable<Integer>,
        enable_auto_confirmation -> Nullable<Integer>,
    }
}

diesel::table! {
    pending_charges (charge_id) {
        charge_id -> BigInt,
        reservation_id -> BigInt,
        charge_type -> Text,
        amount -> Double,
        description -> Text,
        created_at -> Text,
    }
}

diesel::joinable!(reservations -> properties (property_id));
diesel::joinable!(status_history -> reservations (reservation_id));
diesel::joinable!(automation_settings -> properties (property_id));
diesel::joinable!(pending_charges -> reservations (reservation_id));

diesel::allow_tables_to_appear_in_same_query!(
    automation_settings,
    pending_charges,
    properties,
    reservations,
    status_history,
);
