// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hs-core: Chore model for the Homestead agent controller

pub mod macros;

pub mod chore;
pub mod clock;
pub mod error;
pub mod id;
pub mod key;
pub mod outcome;
pub mod pause;
pub mod priority;

pub use chore::{Batch, Chore, ChoreBuilder, Envelope, Routine, Work, WorkUnit};
pub use clock::{Clock, FakeClock, SystemClock};
pub use error::ChoreError;
pub use id::ChoreId;
pub use key::ChoreKey;
pub use outcome::Outcome;
pub use pause::PauseGate;
pub use priority::Priority;
