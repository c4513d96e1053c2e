// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Detection processors, one per automation.
//!
//! Processors share a shape: load settings, bail out successfully when the
//! feature is disabled, scan candidates through the repository contract
//! (soft-deleted and override-flagged reservations never reach a processor),
//! apply per-reservation filters, and route every status change through the
//! transition authority. Per-reservation failures are recorded and the sweep
//! continues; configuration failures abort the job.

pub mod cleanup;
pub mod late_checkout;
pub mod no_show;
pub mod payment;

use crate::error::EngineError;
use stayward_domain::DomainError;

/// Lifts calendar failures to the engine error taxonomy.
pub(crate) fn domain_to_engine(e: DomainError) -> EngineError {
    match e {
        DomainError::InvalidTimezone(tz) => EngineError::InvalidTimezone(tz),
        other => EngineError::Domain(other),
    }
}
