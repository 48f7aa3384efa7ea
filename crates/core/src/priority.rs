// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chore priority domain.

use serde::{Deserialize, Serialize};

/// Priority of a chore. Higher wins; ties dequeue in insertion order.
///
/// The two interrupt levels never enter the pending queue: they take the
/// interruption fast path and run to completion ahead of everything else.
/// Either way the preempted chore is paused at its next stage boundary and
/// finalized before the interrupter starts; the difference is how much of
/// it is torn down:
///
/// - `SoftInterrupt` — only the minimal unit of work in flight is
///   finalized; a batch keeps its envelope open and resumes at its cursor.
/// - `ForceInterrupt` — the whole chore is torn down: a batch's envelope
///   is finalized too and must re-run `prepare` when it resumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Only when there is nothing else at all to do.
    Whenever = 1,
    /// Idle-time work (between duties).
    FreeTime = 2,
    /// Ordinary duty.
    Plain = 3,
    /// Needs doing now, but without abandoning a unit of work mid-flight.
    Foreground = 4,
    /// Preempt the active chore at its next stage boundary.
    SoftInterrupt = 101,
    /// Drop everything and run this immediately.
    ForceInterrupt = 102,
}

impl Priority {
    /// Interrupt-class priorities bypass the queue entirely.
    pub fn is_interrupt(self) -> bool {
        matches!(self, Self::SoftInterrupt | Self::ForceInterrupt)
    }
}

crate::simple_display! {
    Priority {
        Whenever => "whenever",
        FreeTime => "free-time",
        Plain => "plain",
        Foreground => "foreground",
        SoftInterrupt => "soft-interrupt",
        ForceInterrupt => "force-interrupt",
    }
}

#[cfg(test)]
#[path = "priority_tests.rs"]
mod tests;
