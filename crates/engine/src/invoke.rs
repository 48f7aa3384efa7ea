// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle invocation for a single work unit.
//!
//! The pause gate is checked immediately before every stage; an engaged
//! gate aborts the remainder of the dispatch without side effects. A stage
//! returning `Ok(false)` invokes `failure()` exactly once. Errors do not
//! reach `failure()` at all: they either unwind silently
//! ([`ChoreError::Ignored`]) or are logged and classified as a failed
//! outcome by [`classify`].

use hs_core::{Chore, ChoreError, Envelope, Outcome, PauseGate, Routine, Work};
use hs_world::WarnSink;

/// Run one unit's full lifecycle. `Err` means a stage errored out before
/// reaching a verdict; `failure()` has already run for `Ok(false)` stages.
pub(crate) async fn run_unit(
    gate: &PauseGate,
    routine: &dyn Routine,
) -> Result<Outcome, ChoreError> {
    if gate.is_engaged() {
        return Ok(Outcome::Interrupted);
    }
    if !routine.validate().await? {
        return Ok(Outcome::Stale);
    }

    if gate.is_engaged() {
        return Ok(Outcome::Interrupted);
    }
    if !routine.prepare().await? {
        routine.failure().await;
        return Ok(Outcome::Failed);
    }

    if gate.is_engaged() {
        return Ok(Outcome::Interrupted);
    }
    if !routine.execute().await? {
        routine.failure().await;
        return Ok(Outcome::Failed);
    }

    if gate.is_engaged() {
        return Ok(Outcome::Interrupted);
    }
    if !routine.finalize().await? {
        routine.failure().await;
        return Ok(Outcome::Failed);
    }
    Ok(Outcome::Done)
}

/// Open a batch envelope: `validate` then `prepare`.
pub(crate) async fn open_envelope(
    gate: &PauseGate,
    envelope: &dyn Envelope,
) -> Result<Outcome, ChoreError> {
    if gate.is_engaged() {
        return Ok(Outcome::Interrupted);
    }
    if !envelope.validate().await? {
        return Ok(Outcome::Stale);
    }

    if gate.is_engaged() {
        return Ok(Outcome::Interrupted);
    }
    if !envelope.prepare().await? {
        envelope.failure().await;
        return Ok(Outcome::Failed);
    }
    Ok(Outcome::Done)
}

/// Close a batch envelope: `finalize` with full failure handling.
pub(crate) async fn close_envelope(
    gate: &PauseGate,
    envelope: &dyn Envelope,
) -> Result<Outcome, ChoreError> {
    if gate.is_engaged() {
        return Ok(Outcome::Interrupted);
    }
    if !envelope.finalize().await? {
        envelope.failure().await;
        return Ok(Outcome::Failed);
    }
    Ok(Outcome::Done)
}

/// Finalize what a preempted chore holds open, swallowing every kind of
/// trouble — a declined or erroring finalize must not abort the handover.
///
/// `whole` is the force-interrupt teardown: a batch's envelope is closed
/// too and the batch must re-run `prepare` when it resumes. Without it
/// only the minimal unit in flight is finalized.
pub(crate) async fn finalize_paused(chore: &Chore, whole: bool) {
    match &chore.work {
        Work::Single(routine) => quiet(routine.finalize().await, chore),
        Work::Batch(batch) => {
            if !batch.is_opened() {
                // abandoned while (or before) the envelope was opening;
                // nothing is held yet
                return;
            }
            if let Some(unit) = batch.current() {
                quiet(unit.routine.finalize().await, chore);
            }
            if whole {
                if let Some(envelope) = batch.envelope() {
                    quiet(envelope.finalize().await, chore);
                }
                batch.reopen();
            }
        }
    }
}

/// Close a leaving batch's envelope, swallowing trouble. Used when a
/// failed unit removes the batch outside the normal exhaustion path.
pub(crate) async fn close_envelope_quietly(chore: &Chore) {
    if let Work::Batch(batch) = &chore.work {
        if batch.is_opened() {
            if let Some(envelope) = batch.envelope() {
                quiet(envelope.finalize().await, chore);
            }
        }
    }
}

fn quiet(result: Result<bool, ChoreError>, chore: &Chore) {
    match result {
        Ok(true) => {}
        Ok(false) => {
            tracing::debug!(chore = %chore.id, "finalize declined during teardown")
        }
        Err(err) => {
            tracing::debug!(chore = %chore.id, error = %err, "finalize errored during teardown")
        }
    }
}

/// Run an interrupting chore start to finish, bypassing cycle granularity.
/// Batch interrupters run every remaining unit in one go.
pub(crate) async fn run_to_completion(chore: &Chore) -> Result<Outcome, ChoreError> {
    match &chore.work {
        Work::Single(routine) => run_unit(chore.pause(), routine.as_ref()).await,
        Work::Batch(batch) => {
            if let Some(envelope) = batch.envelope() {
                let opened = open_envelope(chore.pause(), envelope).await?;
                if opened != Outcome::Done {
                    return Ok(opened);
                }
            }
            while let Some(unit) = batch.current() {
                let outcome = run_unit(chore.pause(), unit.routine.as_ref()).await?;
                match outcome {
                    Outcome::Done | Outcome::Stale => batch.advance(),
                    other => return Ok(other),
                }
            }
            match batch.envelope() {
                Some(envelope) => close_envelope(chore.pause(), envelope).await,
                None => Ok(Outcome::Done),
            }
        }
    }
}

/// Map a stage error onto an outcome per the error taxonomy: `Ignored`
/// unwinds silently; anything else is logged once, warned about, and
/// counts as a failure without touching `failure()`.
pub(crate) fn classify(err: ChoreError, chore: &Chore, warn: &dyn WarnSink) -> Outcome {
    if err.is_ignored() {
        return Outcome::Failed;
    }
    tracing::error!(chore = %chore.id, error = %err, "chore stage error");
    warn.warn(&format!("chore '{}' errored: {err}", chore.display_name));
    Outcome::Failed
}

#[cfg(test)]
#[path = "invoke_tests.rs"]
mod tests;
