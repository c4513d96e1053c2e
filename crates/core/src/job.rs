// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Job payloads handed from the scheduler to the engine.

use crate::error::EngineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Execution context common to every job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobContext {
    /// The property the job runs against.
    pub property_id: i64,
    /// When true, report what would happen without writing.
    pub dry_run: bool,
    /// Staff identifier for manually triggered runs; `None` for scheduled
    /// runs.
    pub triggered_by: Option<String>,
    /// The evaluation instant ("now" for every time comparison in the job).
    pub timestamp: DateTime<Utc>,
}

impl JobContext {
    /// Context for a scheduled (non-manual) run at `timestamp`.
    #[must_use]
    pub const fn scheduled(property_id: i64, timestamp: DateTime<Utc>) -> Self {
        Self {
            property_id,
            dry_run: false,
            triggered_by: None,
            timestamp,
        }
    }
}

/// Scope selector for the stale-reservation cleanup sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupScope {
    /// Run every sub-operation in order.
    Full,
    /// Cancel reservations stuck in confirmation-pending.
    ConfirmationTimeout,
    /// Promote paid in-house stays checking out today.
    CheckoutDue,
    /// Report history entries whose reservation is gone.
    OrphanedData,
    /// Report history entries past the retention window.
    AuditArchive,
    /// Storage maintenance hook.
    Performance,
}

impl CleanupScope {
    /// Returns the string representation of the scope.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::ConfirmationTimeout => "confirmation_timeout",
            Self::CheckoutDue => "checkout_due",
            Self::OrphanedData => "orphaned_data",
            Self::AuditArchive => "audit_archive",
            Self::Performance => "performance",
        }
    }
}

/// The automation a job performs.
///
/// Serialized with a `type` tag; an unrecognized tag fails deserialization
/// and the job is rejected as [`EngineError::UnknownJobType`] without retry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobKind {
    /// Mark overdue confirmed arrivals as no-shows.
    NoShowSweep {
        /// Grace override in hours; `None` uses property settings.
        grace_hours: Option<u32>,
    },
    /// Detect overdue in-house stays and record late fees.
    LateCheckoutSweep {
        /// Grace override in hours; `None` uses property settings.
        grace_hours: Option<u32>,
    },
    /// Clean up stale reservations and report audit health.
    StaleCleanup { scope: CleanupScope },
    /// Apply a received payment and possibly confirm the reservation.
    PaymentReceived {
        reservation_id: i64,
        amount: f64,
        gateway_reference: Option<String>,
    },
}

impl JobKind {
    /// Returns the job's wire tag.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::NoShowSweep { .. } => "no_show_sweep",
            Self::LateCheckoutSweep { .. } => "late_checkout_sweep",
            Self::StaleCleanup { .. } => "stale_cleanup",
            Self::PaymentReceived { .. } => "payment_received",
        }
    }

    /// Builds a sweep job from its wire tag.
    ///
    /// Payment jobs carry mandatory parameters and are constructed directly
    /// rather than parsed, so only sweep tags are accepted here.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::UnknownJobType` for any other tag.
    pub fn parse_sweep_tag(tag: &str) -> Result<Self, EngineError> {
        match tag {
            "no_show_sweep" => Ok(Self::NoShowSweep { grace_hours: None }),
            "late_checkout_sweep" => Ok(Self::LateCheckoutSweep { grace_hours: None }),
            "stale_cleanup" => Ok(Self::StaleCleanup {
                scope: CleanupScope::Full,
            }),
            _ => Err(EngineError::UnknownJobType(tag.to_string())),
        }
    }
}

/// A complete job as queued for execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPayload {
    pub context: JobContext,
    #[serde(flatten)]
    pub kind: JobKind,
}
