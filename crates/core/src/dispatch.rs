// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Job routing.

use crate::error::EngineError;
use crate::job::{JobKind, JobPayload};
use crate::ports::EngineStore;
use crate::processors;
use crate::result::JobResult;

/// Routes a job payload to its processor.
///
/// # Errors
///
/// Propagates processor failures so the task runner can apply its retry
/// policy; callers that need a `JobResult` for a failed run can build one
/// with [`JobResult::failed`] from the error's display form.
pub fn dispatch<S: EngineStore + ?Sized>(
    store: &mut S,
    payload: &JobPayload,
) -> Result<JobResult, EngineError> {
    let ctx = &payload.context;
    tracing::debug!(
        property_id = ctx.property_id,
        job = payload.kind.tag(),
        dry_run = ctx.dry_run,
        triggered_by = ctx.triggered_by.as_deref(),
        "dispatching job"
    );

    let outcome = match &payload.kind {
        JobKind::NoShowSweep { grace_hours } => {
            processors::no_show::run(store, ctx, *grace_hours)
        }
        JobKind::LateCheckoutSweep { grace_hours } => {
            processors::late_checkout::run(store, ctx, *grace_hours)
        }
        JobKind::StaleCleanup { scope } => processors::cleanup::run(store, ctx, *scope),
        JobKind::PaymentReceived {
            reservation_id,
            amount,
            gateway_reference,
        } => processors::payment::run(
            store,
            ctx,
            *reservation_id,
            *amount,
            gateway_reference.as_deref(),
        ),
    };

    if let Err(e) = &outcome {
        tracing::error!(
            property_id = ctx.property_id,
            job = payload.kind.tag(),
            error = %e,
            "job failed"
        );
    }
    outcome
}
