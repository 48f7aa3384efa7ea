// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hs-instincts: behavior modules that watch the world and assign chores.
//!
//! Each instinct holds its injected dependencies (foreman handle, world
//! capabilities, warning sink, clock, config slice), polls on its own
//! cadence, and submits chores; it never drives a lifecycle itself.

pub mod chat;
pub mod eat;
pub mod farm;
pub mod sleep;

pub use chat::{ChatCommand, ChatInstinct};
pub use eat::{EatConfig, EatInstinct};
pub use farm::{FarmConfig, FarmInstinct};
pub use sleep::{SleepConfig, SleepInstinct, NIGHT_START_TICKS};
