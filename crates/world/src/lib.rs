// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hs-world: narrow interfaces to the game-side collaborators.
//!
//! The scheduler never touches these; they are reachable only from a
//! chore's own lifecycle hooks. Concrete implementations live with the
//! game-protocol client; tests use [`FakeWorld`].

pub mod actuator;
pub mod perception;
pub mod types;
pub mod warn;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use actuator::Actuator;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeWorld;
pub use perception::Perception;
pub use types::{ItemStack, Position, WorldError};
#[cfg(any(test, feature = "test-support"))]
pub use warn::RecordingWarnSink;
pub use warn::{TracingWarnSink, WarnSink};
