// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pause gate: the cancellation token installed on a preempted chore.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Transient suspension signal for a chore.
///
/// The scheduler engages the gate when a higher-priority chore preempts the
/// owner and releases it once the interruption completes. Every lifecycle
/// stage checks the gate immediately before running; an engaged gate makes
/// the remainder of the dispatch short-circuit with
/// [`Outcome::Interrupted`](crate::Outcome::Interrupted) — no `failure()`,
/// no error.
///
/// Unlike a one-shot cancellation token the gate is reusable: release wakes
/// any `resumed()` waiters and the owner runs again on a later cycle.
#[derive(Clone, Default)]
pub struct PauseGate {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    engaged: AtomicBool,
    resumed: Notify,
}

impl PauseGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suspend the owning chore. Idempotent.
    pub fn engage(&self) {
        self.inner.engaged.store(true, Ordering::SeqCst);
    }

    /// Lift the suspension and wake anything waiting in [`resumed`](Self::resumed).
    pub fn release(&self) {
        self.inner.engaged.store(false, Ordering::SeqCst);
        self.inner.resumed.notify_waiters();
    }

    pub fn is_engaged(&self) -> bool {
        self.inner.engaged.load(Ordering::SeqCst)
    }

    /// Wait until the gate is released. Returns immediately if not engaged.
    pub async fn resumed(&self) {
        loop {
            // Register before re-checking so a release between the check and
            // the await cannot be missed.
            let notified = self.inner.resumed.notified();
            if !self.is_engaged() {
                return;
            }
            notified.await;
        }
    }
}

impl fmt::Debug for PauseGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PauseGate").field("engaged", &self.is_engaged()).finish()
    }
}

#[cfg(test)]
#[path = "pause_tests.rs"]
mod tests;
