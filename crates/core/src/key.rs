// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chore uniqueness keys.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// Opaque key marking a chore as unique within the pending queue.
///
/// While a chore carrying `Some(key)` is queued, assigning another chore
/// with the same key is a no-op. Chores without a key may coexist freely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChoreKey(SmolStr);

impl ChoreKey {
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(SmolStr::new(key.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChoreKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ChoreKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
