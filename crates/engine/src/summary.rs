// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only snapshots of queue state for dashboards and tests.

use hs_core::{Chore, Priority, Work};
use serde::Serialize;

/// Snapshot of one queued chore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoreSummary {
    pub id: String,
    pub key: Option<String>,
    pub display_name: String,
    pub priority: Priority,
    pub created_at_ms: u64,
    pub paused: bool,
    /// Present for batches: how far the cursor has come.
    pub batch: Option<BatchProgress>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchProgress {
    pub cursor: usize,
    pub len: usize,
}

/// Snapshot of the leaf unit a chore is currently dispatching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitSummary {
    pub chore_id: String,
    pub label: String,
    /// Batch cursor index; `None` for single chores.
    pub index: Option<usize>,
}

impl From<&Chore> for ChoreSummary {
    fn from(chore: &Chore) -> Self {
        let batch = match &chore.work {
            Work::Single(_) => None,
            Work::Batch(b) => Some(BatchProgress { cursor: b.cursor(), len: b.len() }),
        };
        Self {
            id: chore.id.to_string(),
            key: chore.key.as_ref().map(|k| k.to_string()),
            display_name: chore.display_name.to_string(),
            priority: chore.priority,
            created_at_ms: chore.created_at_ms,
            paused: chore.pause().is_engaged(),
            batch,
        }
    }
}

/// Resolve through a batch to the unit the cursor points at. `None` when a
/// batch is exhausted.
pub(crate) fn unit_summary(chore: &Chore) -> Option<UnitSummary> {
    match &chore.work {
        Work::Single(_) => Some(UnitSummary {
            chore_id: chore.id.to_string(),
            label: chore.display_name.to_string(),
            index: None,
        }),
        Work::Batch(batch) => batch.current().map(|unit| UnitSummary {
            chore_id: chore.id.to_string(),
            label: unit.label.to_string(),
            index: Some(batch.cursor()),
        }),
    }
}
