// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Async world actions.

use crate::types::{ItemStack, Position, WorldError};
use async_trait::async_trait;

/// Everything a chore can *do* to the world.
///
/// Implemented by the game-protocol client; opaque to the scheduler. Every
/// method may suspend for as long as the world needs (pathfinding, chest
/// animations, chewing) — that suspension is the only place a chore stage
/// blocks, and it always runs to completion before an interruption can
/// take effect.
#[async_trait]
pub trait Actuator: Send + Sync {
    /// Walk to within interaction range of `target`.
    async fn go_to(&self, target: Position) -> Result<(), WorldError>;

    /// Put the named item in hand.
    async fn equip(&self, item: &str) -> Result<(), WorldError>;

    /// Empty the hand.
    async fn unequip(&self) -> Result<(), WorldError>;

    /// Consume the held item (eat/drink) and wait for it to finish.
    async fn consume_held(&self) -> Result<(), WorldError>;

    /// Lie down in the bed at `bed`.
    async fn sleep_in(&self, bed: Position) -> Result<(), WorldError>;

    /// Get out of bed.
    async fn wake_up(&self) -> Result<(), WorldError>;

    /// Open the container at `at` and list its contents.
    async fn open_container(&self, at: Position) -> Result<Vec<ItemStack>, WorldError>;

    /// Move up to `count` of `item` from the container at `from` into the
    /// inventory. Returns how many were actually taken.
    async fn withdraw(&self, from: Position, item: &str, count: u32) -> Result<u32, WorldError>;

    /// Move up to `count` of `item` from the inventory into the container
    /// at `into`. Returns how many were actually stored.
    async fn deposit(&self, into: Position, item: &str, count: u32) -> Result<u32, WorldError>;

    /// Use the held item on the block at `target` (till, plant, ...).
    async fn use_held_on(&self, target: Position) -> Result<(), WorldError>;

    /// Say something in chat.
    async fn say(&self, message: &str) -> Result<(), WorldError>;
}
