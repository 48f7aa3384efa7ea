// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chore model: lifecycle hook traits and the queued entity.

use crate::{ChoreError, ChoreId, ChoreKey, PauseGate, Priority};
use async_trait::async_trait;
use smol_str::SmolStr;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Shared lifecycle hooks: everything except `execute`.
///
/// Every method defaults to a no-op success so implementors only write the
/// stages they care about. `Ok(false)` from `validate` means "no longer
/// relevant, drop me silently"; `Ok(false)` from `prepare`/`finalize` is a
/// failure and triggers `failure()` exactly once.
#[async_trait]
pub trait Envelope: Send + Sync {
    /// Is this work still worth doing?
    async fn validate(&self) -> Result<bool, ChoreError> {
        Ok(true)
    }

    /// Acquire whatever the work needs (walk somewhere, fetch tools).
    async fn prepare(&self) -> Result<bool, ChoreError> {
        Ok(true)
    }

    /// Release resources when the work ends or is preempted.
    async fn finalize(&self) -> Result<bool, ChoreError> {
        Ok(true)
    }

    /// Called once when any stage reports failure.
    async fn failure(&self) {}
}

/// A runnable unit of work: [`Envelope`] plus the mandatory `execute` stage.
#[async_trait]
pub trait Routine: Envelope {
    async fn execute(&self) -> Result<bool, ChoreError>;
}

/// One labeled sub-unit of a [`Batch`].
pub struct WorkUnit {
    pub label: SmolStr,
    pub routine: Box<dyn Routine>,
}

impl WorkUnit {
    pub fn new(label: impl AsRef<str>, routine: impl Routine + 'static) -> Self {
        Self { label: SmolStr::new(label.as_ref()), routine: Box::new(routine) }
    }
}

/// Ordered composite of work units sharing one envelope.
///
/// The scheduler runs exactly one unit per cycle. The envelope's
/// `validate`/`prepare` run once before the first unit; its `finalize`
/// runs once when the batch leaves the queue.
pub struct Batch {
    envelope: Option<Box<dyn Envelope>>,
    opened: AtomicBool,
    cursor: AtomicUsize,
    units: Vec<WorkUnit>,
}

impl Batch {
    pub fn new(units: Vec<WorkUnit>) -> Self {
        Self {
            envelope: None,
            opened: AtomicBool::new(false),
            cursor: AtomicUsize::new(0),
            units,
        }
    }

    /// Attach a shared envelope (one `prepare`/`finalize` for all units).
    pub fn with_envelope(mut self, envelope: impl Envelope + 'static) -> Self {
        self.envelope = Some(Box::new(envelope));
        self
    }

    pub fn envelope(&self) -> Option<&dyn Envelope> {
        self.envelope.as_deref()
    }

    /// Index of the next unit to dispatch. Always `<= len()`.
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// True once the cursor has passed the last unit.
    pub fn is_exhausted(&self) -> bool {
        self.cursor() >= self.units.len()
    }

    /// The unit at the cursor, if any remain.
    pub fn current(&self) -> Option<&WorkUnit> {
        self.units.get(self.cursor())
    }

    /// Move the cursor past the current unit. Scheduler use only.
    pub fn advance(&self) {
        self.cursor.fetch_add(1, Ordering::SeqCst);
    }

    /// Whether the envelope's `validate`/`prepare` have already run.
    pub fn is_opened(&self) -> bool {
        self.opened.load(Ordering::SeqCst)
    }

    /// Record that the envelope opened successfully. Scheduler use only.
    pub fn mark_opened(&self) {
        self.opened.store(true, Ordering::SeqCst);
    }

    /// Make the envelope `prepare` run again before the next unit, after a
    /// force interruption tore the whole batch down. Scheduler use only.
    pub fn reopen(&self) {
        self.opened.store(false, Ordering::SeqCst);
    }
}

/// The two shapes of schedulable work, as an explicit tagged variant.
pub enum Work {
    /// A minimal unit: one full lifecycle per dispatch.
    Single(Box<dyn Routine>),
    /// A composite: one sub-unit lifecycle per dispatch.
    Batch(Batch),
}

impl Work {
    pub fn is_batch(&self) -> bool {
        matches!(self, Self::Batch(_))
    }
}

/// A scheduled entity: metadata plus its [`Work`].
pub struct Chore {
    pub id: ChoreId,
    /// Uniqueness key; `Some` enforces at-most-one instance in the queue.
    pub key: Option<ChoreKey>,
    /// For status displays and logs only; no behavioral effect.
    pub display_name: SmolStr,
    /// Clock stamp at construction; diagnostic only.
    pub created_at_ms: u64,
    pub priority: Priority,
    /// Keep the chore queued after a failed `execute`/`finalize`.
    pub retry_after_fail: bool,
    pause: PauseGate,
    pub work: Work,
}

impl Chore {
    /// Start building a chore with the given display name.
    pub fn build(display_name: impl AsRef<str>) -> ChoreBuilder {
        ChoreBuilder {
            key: None,
            display_name: SmolStr::new(display_name.as_ref()),
            created_at_ms: 0,
            priority: Priority::Plain,
            retry_after_fail: false,
        }
    }

    /// The suspension gate the scheduler checks between stages.
    pub fn pause(&self) -> &PauseGate {
        &self.pause
    }

    pub fn is_batch(&self) -> bool {
        self.work.is_batch()
    }
}

impl fmt::Debug for Chore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match &self.work {
            Work::Single(_) => "single".to_string(),
            Work::Batch(b) => format!("batch {}/{}", b.cursor(), b.len()),
        };
        f.debug_struct("Chore")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("display_name", &self.display_name)
            .field("priority", &self.priority)
            .field("work", &shape)
            .field("paused", &self.pause.is_engaged())
            .finish()
    }
}

/// Builder for [`Chore`]; finish with [`single`](Self::single) or
/// [`batch`](Self::batch).
pub struct ChoreBuilder {
    key: Option<ChoreKey>,
    display_name: SmolStr,
    created_at_ms: u64,
    priority: Priority,
    retry_after_fail: bool,
}

impl ChoreBuilder {
    pub fn key(mut self, key: impl Into<ChoreKey>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn created_at_ms(mut self, epoch_ms: u64) -> Self {
        self.created_at_ms = epoch_ms;
        self
    }

    pub fn retry_after_fail(mut self, retry: bool) -> Self {
        self.retry_after_fail = retry;
        self
    }

    pub fn single(self, routine: impl Routine + 'static) -> Chore {
        self.work(Work::Single(Box::new(routine)))
    }

    pub fn batch(self, batch: Batch) -> Chore {
        self.work(Work::Batch(batch))
    }

    fn work(self, work: Work) -> Chore {
        Chore {
            id: ChoreId::new(),
            key: self.key,
            display_name: self.display_name,
            created_at_ms: self.created_at_ms,
            priority: self.priority,
            retry_after_fail: self.retry_after_fail,
            pause: PauseGate::new(),
            work,
        }
    }
}

#[cfg(test)]
#[path = "chore_tests.rs"]
mod tests;
