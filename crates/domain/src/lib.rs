// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![feature(int_roundings)]
#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod calendar;
mod error;
mod fees;
mod payment;
mod reservation;
mod settings;
mod status;

pub use calendar::{
    DEFAULT_DAY_START_HOUR, operational_date, operational_day_end, operational_day_start,
    wall_clock_instant,
};
pub use error::DomainError;
pub use fees::{LateFeePolicy, calculate_late_fee, round_to_cents};
pub use payment::{
    FALLBACK_NIGHTLY_RATE, PaymentType, nights, payment_percentage, total_booking_amount,
};
pub use reservation::{AutomationOverride, PaymentStatus, Reservation};
pub use settings::{AutomationSettings, AutomationType, SettingsPatch, parse_wall_clock};
pub use status::ReservationStatus;
