// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Synchronous world queries.

use crate::types::{ItemStack, Position};
use smol_str::SmolStr;

/// Everything a chore or instinct can *ask* about the world.
///
/// Answers come from the client's local world model, so queries are cheap
/// and synchronous.
pub trait Perception: Send + Sync {
    /// Food saturation, 0.0 (starving) and up.
    fn saturation(&self) -> f32;

    /// World time in ticks within the current day.
    fn time_of_day(&self) -> u32;

    /// Own position.
    fn position(&self) -> Position;

    /// Current inventory contents.
    fn inventory(&self) -> Vec<ItemStack>;

    /// Block name at `pos`, if the chunk is loaded.
    fn block_at(&self, pos: Position) -> Option<SmolStr>;

    /// Last known position of a nearby player.
    fn player_position(&self, name: &str) -> Option<Position>;
}
