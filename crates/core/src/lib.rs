// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

//! The Stayward automation engine.
//!
//! This crate owns the reservation lifecycle rules: which reservations a
//! sweep considers, when a transition fires, and the single choke point
//! through which every status change flows. Storage and scheduling live
//! behind the traits in [`ports`]; the engine itself is synchronous and
//! never suspends mid-algorithm.

mod authority;
mod dispatch;
mod error;
mod job;
mod ports;
mod processors;
mod result;

#[cfg(test)]
mod tests;

pub use authority::{TransitionRequest, transition};
pub use dispatch::dispatch;
pub use error::EngineError;
pub use job::{CleanupScope, JobContext, JobKind, JobPayload};
pub use ports::{
    CandidateDateField, CandidateQuery, ChargeRecorder, EngineStore, ReservationRepository,
    SettingsProvider, StatusHistoryStore, TransitionFields, TransitionStore,
};
pub use result::{JobDetails, JobResult};
