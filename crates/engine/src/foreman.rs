// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The foreman: queue management, the single-consumer run loop, and the
//! interruption protocol.
//!
//! Exactly one lifecycle stage is ever in flight. Instincts submit chores
//! through [`Foreman::assign`] from any task; the [`ForemanDriver`] — which
//! can exist only once per foreman — pulls the highest-priority chore and
//! drives its lifecycle. Interrupt-class chores, and chores outranking the
//! one currently executing, bypass the queue: the active chore is paused at
//! its next stage boundary, the interrupter runs to completion, and the
//! paused chore resumes.

use crate::invoke;
use crate::summary::{unit_summary, ChoreSummary, UnitSummary};
use hs_core::{Chore, Outcome, Priority, Work};
use hs_world::WarnSink;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};

/// How many times an erroring interrupting chore is re-invoked before the
/// foreman gives up on it.
pub const MAX_INTERRUPT_ATTEMPTS: u32 = 3;

const INTERRUPT_RETRY_BACKOFF: Duration = Duration::from_millis(50);

/// Scheduler state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Queue empty, driver parked.
    Idle,
    /// Driving the head of the queue.
    Running,
    /// An interrupting chore is in flight.
    Interrupting,
}

hs_core::simple_display! {
    Phase {
        Idle => "idle",
        Running => "running",
        Interrupting => "interrupting",
    }
}

struct Entry {
    seq: u64,
    chore: Arc<Chore>,
}

struct State {
    queue: Vec<Entry>,
    /// Interruption requests, strictly in arrival order.
    interrupts: VecDeque<Arc<Chore>>,
    /// The chore whose lifecycle is being driven (also the queue head).
    /// Survives a pause so the interruption handler can finalize and
    /// resume it.
    active: Option<Arc<Chore>>,
    phase: Phase,
    next_seq: u64,
    stopping: bool,
}

impl State {
    /// Descending priority, insertion order on ties.
    fn sort(&mut self) {
        self.queue
            .sort_by(|a, b| b.chore.priority.cmp(&a.chore.priority).then(a.seq.cmp(&b.seq)));
    }

    fn remove(&mut self, chore: &Arc<Chore>) {
        self.queue.retain(|e| !Arc::ptr_eq(&e.chore, chore));
    }
}

struct Shared {
    state: Mutex<State>,
    wake: Notify,
    settled_tx: watch::Sender<bool>,
    settled_rx: watch::Receiver<bool>,
    warn: Arc<dyn WarnSink>,
}

/// Cloneable handle for submitting chores and inspecting the queue.
#[derive(Clone)]
pub struct Foreman {
    shared: Arc<Shared>,
}

/// The single consumer. Constructed exactly once per foreman;
/// [`run`](Self::run) consumes it, so a second run loop cannot exist.
pub struct ForemanDriver {
    shared: Arc<Shared>,
}

impl Foreman {
    pub fn new(warn: Arc<dyn WarnSink>) -> (Self, ForemanDriver) {
        let (settled_tx, settled_rx) = watch::channel(true);
        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                queue: Vec::new(),
                interrupts: VecDeque::new(),
                active: None,
                phase: Phase::Idle,
                next_seq: 0,
                stopping: false,
            }),
            wake: Notify::new(),
            settled_tx,
            settled_rx,
            warn,
        });
        (Self { shared: shared.clone() }, ForemanDriver { shared })
    }

    /// Submit a chore.
    ///
    /// A duplicate uniqueness key is a no-op. An interrupt-class priority,
    /// or one exceeding the actively executing chore's, starts the
    /// interruption protocol instead of enqueueing.
    pub fn assign(&self, chore: Chore) {
        let chore = Arc::new(chore);
        {
            let mut state = self.shared.state.lock();
            if let Some(key) = &chore.key {
                let already_queued = state.queue.iter().any(|e| e.chore.key.as_ref() == Some(key))
                    || state.interrupts.iter().any(|c| c.key.as_ref() == Some(key));
                if already_queued {
                    tracing::debug!(key = %key, "chore key already queued, ignoring");
                    return;
                }
            }
            let outranks_active =
                state.active.as_ref().is_some_and(|a| chore.priority > a.priority);
            if chore.priority.is_interrupt() || outranks_active {
                tracing::debug!(
                    chore = %chore.id,
                    priority = %chore.priority,
                    "interruption requested"
                );
                // Pause the active chore right away so its next stage
                // boundary short-circuits; the driver does the rest.
                if let Some(active) = &state.active {
                    active.pause().engage();
                }
                state.interrupts.push_back(chore);
                state.phase = Phase::Interrupting;
            } else {
                let seq = state.next_seq;
                state.next_seq += 1;
                state.queue.push(Entry { seq, chore });
                state.sort();
            }
            // Under the lock, so the driver's settled flip cannot interleave.
            self.shared.settled_tx.send_replace(false);
        }
        self.shared.wake.notify_one();
    }

    /// Head of the queue.
    pub fn current(&self) -> Option<ChoreSummary> {
        let state = self.shared.state.lock();
        state.queue.first().map(|e| ChoreSummary::from(e.chore.as_ref()))
    }

    /// Leaf unit the head is currently dispatching (resolves through a
    /// batch to the unit at the cursor).
    pub fn current_unit(&self) -> Option<UnitSummary> {
        let state = self.shared.state.lock();
        state.queue.first().and_then(|e| unit_summary(e.chore.as_ref()))
    }

    /// Snapshot of the whole queue in dispatch order.
    pub fn queue(&self) -> Vec<ChoreSummary> {
        let state = self.shared.state.lock();
        state.queue.iter().map(|e| ChoreSummary::from(e.chore.as_ref())).collect()
    }

    pub fn queue_len(&self) -> usize {
        self.shared.state.lock().queue.len()
    }

    pub fn phase(&self) -> Phase {
        self.shared.state.lock().phase
    }

    /// True when the queue is empty, no interruption is in flight, and the
    /// driver is parked.
    pub fn is_settled(&self) -> bool {
        *self.shared.settled_rx.borrow()
    }

    /// Wait until every assigned chore has settled. The graceful-shutdown
    /// path waits on this before persisting state.
    pub async fn settled(&self) {
        let mut rx = self.shared.settled_rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Ask the driver to exit at the next stage boundary.
    pub fn stop(&self) {
        {
            let mut state = self.shared.state.lock();
            state.stopping = true;
            if let Some(active) = &state.active {
                active.pause().engage();
            }
        }
        self.shared.wake.notify_one();
    }
}

/// One dispatch cycle's effect on the queue.
enum Cycle {
    /// Chore-level completion; settle per outcome rules.
    Finished(Outcome),
    /// A batch advanced; the chore stays at its position.
    Progress,
    /// Pause gate observed; the chore stays for the interruption handler.
    Paused,
}

enum Step {
    Dispatch(Arc<Chore>),
    Idle,
    Stop,
}

impl ForemanDriver {
    /// Drive the queue until [`Foreman::stop`] is called.
    pub async fn run(self) {
        loop {
            // Interruptions first, strictly in arrival order.
            loop {
                let next = self.shared.state.lock().interrupts.pop_front();
                match next {
                    Some(intr) => self.handle_interruption(intr).await,
                    None => break,
                }
            }

            let step = {
                let mut state = self.shared.state.lock();
                if state.stopping {
                    Step::Stop
                } else {
                    state.sort();
                    match state.queue.first() {
                        Some(entry) => {
                            let head = entry.chore.clone();
                            state.phase = Phase::Running;
                            state.active = Some(head.clone());
                            Step::Dispatch(head)
                        }
                        None => {
                            state.phase = Phase::Idle;
                            state.active = None;
                            Step::Idle
                        }
                    }
                }
            };

            match step {
                Step::Stop => break,
                Step::Idle => {
                    // Register for wakeup before the emptiness re-check so
                    // an assign in between cannot be missed.
                    let wakeup = self.shared.wake.notified();
                    let busy = {
                        let state = self.shared.state.lock();
                        let busy = state.stopping
                            || !state.queue.is_empty()
                            || !state.interrupts.is_empty();
                        if !busy {
                            self.shared.settled_tx.send_replace(true);
                        }
                        busy
                    };
                    if busy {
                        continue;
                    }
                    wakeup.await;
                }
                Step::Dispatch(chore) => {
                    let cycle = self.dispatch_cycle(&chore).await;
                    self.settle(&chore, cycle);
                }
            }
        }
        let mut state = self.shared.state.lock();
        state.phase = Phase::Idle;
        state.active = None;
    }

    /// Run one cycle for the queue head: a whole single chore, or one
    /// sub-unit of a batch.
    async fn dispatch_cycle(&self, chore: &Arc<Chore>) -> Cycle {
        let warn = self.shared.warn.as_ref();
        match &chore.work {
            Work::Single(routine) => {
                let outcome = match invoke::run_unit(chore.pause(), routine.as_ref()).await {
                    Ok(outcome) => outcome,
                    Err(err) => invoke::classify(err, chore, warn),
                };
                match outcome {
                    Outcome::Interrupted => Cycle::Paused,
                    other => Cycle::Finished(other),
                }
            }
            Work::Batch(batch) => {
                if !batch.is_opened() {
                    if let Some(envelope) = batch.envelope() {
                        let opened =
                            match invoke::open_envelope(chore.pause(), envelope).await {
                                Ok(outcome) => outcome,
                                Err(err) => invoke::classify(err, chore, warn),
                            };
                        match opened {
                            Outcome::Done => {}
                            Outcome::Interrupted => return Cycle::Paused,
                            // Envelope never opened, so nothing to close.
                            other => return Cycle::Finished(other),
                        }
                    }
                    batch.mark_opened();
                }

                if batch.is_exhausted() {
                    let closed = match batch.envelope() {
                        Some(envelope) => {
                            match invoke::close_envelope(chore.pause(), envelope).await {
                                Ok(outcome) => outcome,
                                Err(err) => invoke::classify(err, chore, warn),
                            }
                        }
                        None => Outcome::Done,
                    };
                    return match closed {
                        Outcome::Interrupted => Cycle::Paused,
                        other => Cycle::Finished(other),
                    };
                }

                let Some(unit) = batch.current() else {
                    return Cycle::Finished(Outcome::Done);
                };
                let outcome =
                    match invoke::run_unit(chore.pause(), unit.routine.as_ref()).await {
                        Ok(outcome) => outcome,
                        Err(err) => invoke::classify(err, chore, warn),
                    };
                match outcome {
                    // A stale unit is skipped, not fatal to the batch.
                    Outcome::Done | Outcome::Stale => {
                        batch.advance();
                        Cycle::Progress
                    }
                    Outcome::Interrupted => Cycle::Paused,
                    Outcome::Failed => {
                        if !chore.retry_after_fail {
                            // The batch is leaving the queue; give the
                            // envelope its finalize.
                            invoke::close_envelope_quietly(chore).await;
                        }
                        Cycle::Finished(Outcome::Failed)
                    }
                }
            }
        }
    }

    fn settle(&self, chore: &Arc<Chore>, cycle: Cycle) {
        let mut state = self.shared.state.lock();
        match cycle {
            Cycle::Progress => {
                state.active = None;
            }
            // Keep `active` so the interruption handler can finalize and
            // resume the paused chore.
            Cycle::Paused => {}
            Cycle::Finished(outcome) => {
                state.active = None;
                let remove = match outcome {
                    Outcome::Done | Outcome::Stale => true,
                    Outcome::Failed => !chore.retry_after_fail,
                    Outcome::Interrupted => false,
                };
                if remove {
                    state.remove(chore);
                }
            }
        }
    }

    /// The interruption protocol: pause, finalize per policy, run the
    /// interrupter to completion with bounded retries, resume.
    async fn handle_interruption(&self, intr: Arc<Chore>) {
        let paused = {
            let mut state = self.shared.state.lock();
            state.phase = Phase::Interrupting;
            state.active.clone()
        };

        if let Some(active) = &paused {
            active.pause().engage();
            // The preempted chore releases what it holds before the
            // interrupter starts. A force interrupt tears down the whole
            // chore; anything else only the unit in flight.
            invoke::finalize_paused(active, intr.priority == Priority::ForceInterrupt).await;
        }

        tracing::info!(chore = %intr.id, name = %intr.display_name, "running interrupting chore");
        let mut attempts = 0;
        loop {
            attempts += 1;
            match invoke::run_to_completion(&intr).await {
                Ok(outcome) => {
                    tracing::debug!(chore = %intr.id, outcome = %outcome, "interrupting chore settled");
                    break;
                }
                Err(err) if err.is_ignored() => break,
                Err(err) => {
                    tracing::error!(chore = %intr.id, error = %err, attempts, "interrupting chore errored");
                    if attempts >= MAX_INTERRUPT_ATTEMPTS {
                        self.shared.warn.warn(&format!(
                            "interrupting chore '{}' kept erroring; gave up after {attempts} attempts",
                            intr.display_name
                        ));
                        break;
                    }
                    tokio::time::sleep(INTERRUPT_RETRY_BACKOFF).await;
                }
            }
        }

        if let Some(active) = &paused {
            active.pause().release();
        }

        let mut state = self.shared.state.lock();
        if state.interrupts.is_empty() {
            state.phase = if state.queue.is_empty() { Phase::Idle } else { Phase::Running };
        }
    }
}

#[cfg(test)]
#[path = "foreman_tests.rs"]
mod tests;
