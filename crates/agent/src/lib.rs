// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hs-agent: bootstrap facade wiring the scheduler, instincts, and the
//! narrow interfaces the external collaborators consume.

pub mod config;
mod error;
pub mod persist;
pub mod status;

pub use config::{AgentConfig, EatSection, FarmSection, SleepSection};
pub use error::AgentError;
pub use persist::{NoopPersister, Persister};
pub use status::AgentStatus;

use hs_core::SystemClock;
use hs_engine::{Foreman, ForemanDriver};
use hs_instincts::{ChatCommand, ChatInstinct, EatInstinct, FarmInstinct, SleepInstinct};
use hs_world::{Actuator, Perception, TracingWarnSink, WarnSink};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const CHAT_CHANNEL_CAPACITY: usize = 32;

/// The assembled agent. Construct, [`start`](Self::start), feed chat
/// commands through [`chat_sender`](Self::chat_sender), and eventually
/// [`shutdown`](Self::shutdown).
pub struct Agent {
    foreman: Foreman,
    driver: Option<ForemanDriver>,
    instincts: Option<Instincts>,
    driver_task: Option<JoinHandle<()>>,
    tasks: Vec<JoinHandle<()>>,
    chat_tx: mpsc::Sender<ChatCommand>,
    persister: Arc<dyn Persister>,
}

struct Instincts {
    eat: Option<EatInstinct<SystemClock>>,
    sleep: Option<SleepInstinct<SystemClock>>,
    farm: Option<FarmInstinct<SystemClock>>,
    chat: ChatInstinct<SystemClock>,
}

impl Agent {
    /// Assemble with the default warning sink and persistence hook.
    pub fn new(
        config: AgentConfig,
        actuator: Arc<dyn Actuator>,
        perception: Arc<dyn Perception>,
    ) -> Self {
        Self::with_hooks(
            config,
            actuator,
            perception,
            Arc::new(TracingWarnSink),
            Arc::new(NoopPersister),
        )
    }

    /// Assemble with explicit warning and persistence hooks.
    pub fn with_hooks(
        config: AgentConfig,
        actuator: Arc<dyn Actuator>,
        perception: Arc<dyn Perception>,
        warn: Arc<dyn WarnSink>,
        persister: Arc<dyn Persister>,
    ) -> Self {
        let (foreman, driver) = Foreman::new(warn.clone());
        let (chat_tx, chat_rx) = mpsc::channel(CHAT_CHANNEL_CAPACITY);
        let clock = SystemClock;

        let eat = config.eat.enabled.then(|| {
            EatInstinct::new(
                foreman.clone(),
                actuator.clone(),
                perception.clone(),
                clock.clone(),
                config.eat_config(),
            )
        });
        let sleep = config.sleep.enabled.then(|| {
            SleepInstinct::new(
                foreman.clone(),
                actuator.clone(),
                perception.clone(),
                warn.clone(),
                clock.clone(),
                config.sleep_config(),
            )
        });
        let farm = config.farm.enabled.then(|| {
            FarmInstinct::new(
                foreman.clone(),
                actuator.clone(),
                perception.clone(),
                warn.clone(),
                clock.clone(),
                config.farm_config(),
            )
        });
        let chat = ChatInstinct::new(
            foreman.clone(),
            actuator,
            perception,
            warn,
            clock,
            chat_rx,
        );

        Self {
            foreman,
            driver: Some(driver),
            instincts: Some(Instincts { eat, sleep, farm, chat }),
            driver_task: None,
            tasks: Vec::new(),
            chat_tx,
            persister,
        }
    }

    /// Spawn the scheduler driver and the instinct timers. Idempotent.
    pub fn start(&mut self) {
        if let Some(driver) = self.driver.take() {
            self.driver_task = Some(tokio::spawn(driver.run()));
        }
        if let Some(instincts) = self.instincts.take() {
            if let Some(eat) = instincts.eat {
                self.tasks.push(eat.spawn());
            }
            if let Some(sleep) = instincts.sleep {
                self.tasks.push(sleep.spawn());
            }
            if let Some(farm) = instincts.farm {
                self.tasks.push(farm.spawn());
            }
            self.tasks.push(instincts.chat.spawn());
        }
    }

    /// Handle for the game-protocol layer to feed chat commands into.
    pub fn chat_sender(&self) -> mpsc::Sender<ChatCommand> {
        self.chat_tx.clone()
    }

    /// Scheduler handle, for embedders submitting their own chores.
    pub fn foreman(&self) -> &Foreman {
        &self.foreman
    }

    /// Snapshot for the dashboard collaborator.
    pub fn status(&self) -> AgentStatus {
        AgentStatus {
            phase: self.foreman.phase().to_string(),
            settled: self.foreman.is_settled(),
            current: self.foreman.current(),
            current_unit: self.foreman.current_unit(),
            queue: self.foreman.queue(),
        }
    }

    /// Graceful shutdown: stop producing work, let what is queued settle,
    /// persist, then park the scheduler.
    pub async fn shutdown(mut self) -> Result<(), AgentError> {
        tracing::info!("Shutting down agent...");

        // 1. Stop the instinct timers so no new chores arrive
        for task in self.tasks.drain(..) {
            task.abort();
        }

        // 2. Wait for every queued chore to settle
        self.foreman.settled().await;

        // 3. Persist through the injected hook
        self.persister.persist().await?;

        // 4. Park the driver
        self.foreman.stop();
        if let Some(task) = self.driver_task.take() {
            let _ = task.await;
        }

        tracing::info!("Agent shutdown complete");
        Ok(())
    }
}

/// Initialize tracing with an env-filter directive; later calls are no-ops.
pub fn init_tracing(filter: &str) {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
