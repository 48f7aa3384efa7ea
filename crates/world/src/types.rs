// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared world types.

use hs_core::ChoreError;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;
use thiserror::Error;

/// Integer block coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A named stack of items somewhere in an inventory or container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub name: SmolStr,
    pub count: u32,
}

impl ItemStack {
    pub fn new(name: impl AsRef<str>, count: u32) -> Self {
        Self { name: SmolStr::new(name.as_ref()), count }
    }
}

/// Errors from world operations.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("cannot reach {0}")]
    Unreachable(Position),

    #[error("no block at {0}")]
    MissingBlock(Position),

    #[error("no '{0}' in inventory")]
    NoItem(String),

    #[error("nothing to withdraw from container at {0}")]
    ContainerEmpty(Position),

    #[error("protocol: {0}")]
    Protocol(String),
}

impl From<WorldError> for ChoreError {
    fn from(err: WorldError) -> Self {
        ChoreError::World(err.to_string())
    }
}
