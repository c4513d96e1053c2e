// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use stayward_domain::DomainError;
use thiserror::Error;

/// Errors surfaced by the automation engine.
///
/// Per-reservation failures (`IllegalTransition`, `ConcurrentModification`)
/// are recovered inside a sweep: the reservation is skipped or its error is
/// recorded, and the batch continues. Configuration failures
/// (`PropertyNotFound`, `InvalidTimezone`, `UnknownJobType`) fail the whole
/// job.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The property does not exist or is inactive.
    #[error("Property {0} not found")]
    PropertyNotFound(i64),

    /// The reservation does not exist, is soft-deleted, or belongs to a
    /// different property.
    #[error("Reservation {0} not found")]
    ReservationNotFound(i64),

    /// The property's declared timezone is not a valid IANA zone.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// The requested transition violates the lifecycle graph.
    #[error("Illegal status transition for reservation {reservation_id}: {detail}")]
    IllegalTransition {
        reservation_id: i64,
        detail: String,
    },

    /// Another writer changed the reservation between read and write.
    #[error("Concurrent modification of reservation {0}")]
    ConcurrentModification(i64),

    /// The job payload named an automation type the engine does not know.
    #[error("Unknown job type: {0}")]
    UnknownJobType(String),

    /// The backing store failed.
    #[error("Store error: {0}")]
    Store(String),

    /// A domain rule was violated outside the transition path.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl EngineError {
    /// Returns true if a retry of the same job could succeed.
    ///
    /// Unknown job types and lifecycle violations are deterministic; the
    /// task runner must not retry them.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(_) | Self::ConcurrentModification(_))
    }
}
