// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completion classification for a single chore dispatch.

use serde::Serialize;

/// How one dispatch of a chore (or batch sub-unit) ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Every stage ran and returned true.
    Done,
    /// `validate` declined: the work is no longer relevant. Dropped
    /// silently — no `failure()`, no log.
    Stale,
    /// A stage returned false or errored. `failure()` has been invoked
    /// for the false case (never for errors, and never twice).
    Failed,
    /// The pause gate was engaged at a stage boundary; remaining stages
    /// were skipped. Not an error and not a failure.
    Interrupted,
}

impl Outcome {
    /// Whether the dispatched work ran all its stages successfully.
    pub fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }

    /// Done and Stale both settle as "remove from the queue".
    pub fn settles(self) -> bool {
        matches!(self, Self::Done | Self::Stale)
    }
}

crate::simple_display! {
    Outcome {
        Done => "done",
        Stale => "stale",
        Failed => "failed",
        Interrupted => "interrupted",
    }
}
