// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::summary::BatchProgress;
use crate::test_probe::{entries, new_log, Log, Probe};
use hs_core::{Batch, WorkUnit};
use hs_world::RecordingWarnSink;
use std::time::Duration;

fn new_foreman() -> (Foreman, ForemanDriver, RecordingWarnSink) {
    let warn = RecordingWarnSink::new();
    let (foreman, driver) = Foreman::new(Arc::new(warn.clone()));
    (foreman, driver, warn)
}

async fn wait_for(log: &Log, needle: &str) {
    let deadline = std::time::Instant::now() + Duration::from_secs(2);
    loop {
        if entries(log).iter().any(|e| e == needle) {
            return;
        }
        assert!(
            std::time::Instant::now() < deadline,
            "timed out waiting for {needle}: {:?}",
            entries(log)
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

async fn settled_within(foreman: &Foreman) {
    tokio::time::timeout(Duration::from_secs(2), foreman.settled())
        .await
        .unwrap();
}

fn index_of(log: &[String], needle: &str) -> usize {
    log.iter().position(|e| e == needle).unwrap()
}

fn count_of(log: &[String], needle: &str) -> usize {
    log.iter().filter(|e| *e == needle).count()
}

#[tokio::test]
async fn dequeues_by_priority_with_stable_ties() {
    let (foreman, driver, _) = new_foreman();
    let log = new_log();
    foreman.assign(Chore::build("free").priority(Priority::FreeTime).single(Probe::new("free", &log)));
    foreman.assign(Chore::build("p1").priority(Priority::Plain).single(Probe::new("p1", &log)));
    foreman.assign(Chore::build("when").priority(Priority::Whenever).single(Probe::new("when", &log)));
    foreman.assign(Chore::build("p2").priority(Priority::Plain).single(Probe::new("p2", &log)));

    tokio::spawn(driver.run());
    settled_within(&foreman).await;

    let log = entries(&log);
    let order: Vec<usize> = ["p1:execute", "p2:execute", "free:execute", "when:execute"]
        .iter()
        .map(|needle| index_of(&log, needle))
        .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]), "wrong order: {log:?}");
}

#[tokio::test]
async fn duplicate_key_is_a_noop() {
    let (foreman, driver, _) = new_foreman();
    let log = new_log();
    foreman.assign(Chore::build("first").key("water").single(Probe::new("a", &log)));
    foreman.assign(Chore::build("second").key("water").single(Probe::new("b", &log)));
    assert_eq!(foreman.queue_len(), 1);

    tokio::spawn(driver.run());
    settled_within(&foreman).await;

    let log = entries(&log);
    assert_eq!(count_of(&log, "a:execute"), 1);
    assert_eq!(count_of(&log, "b:execute"), 0);
}

#[tokio::test]
async fn same_key_may_requeue_after_completion() {
    let (foreman, driver, _) = new_foreman();
    let log = new_log();
    tokio::spawn(driver.run());

    foreman.assign(Chore::build("first").key("water").single(Probe::new("a", &log)));
    settled_within(&foreman).await;
    foreman.assign(Chore::build("again").key("water").single(Probe::new("b", &log)));
    settled_within(&foreman).await;

    let log = entries(&log);
    assert_eq!(count_of(&log, "a:execute"), 1);
    assert_eq!(count_of(&log, "b:execute"), 1);
}

#[tokio::test]
async fn stale_chore_is_dropped_silently() {
    let (foreman, driver, warn) = new_foreman();
    let log = new_log();
    foreman.assign(
        Chore::build("stale").single(Probe { validate_ok: false, ..Probe::new("a", &log) }),
    );

    tokio::spawn(driver.run());
    settled_within(&foreman).await;

    assert_eq!(entries(&log), vec!["a:validate"]);
    assert!(warn.is_empty());
    assert_eq!(foreman.queue_len(), 0);
}

#[tokio::test]
async fn failed_execute_calls_failure_once_and_removes() {
    let (foreman, driver, _) = new_foreman();
    let log = new_log();
    foreman.assign(
        Chore::build("doomed").single(Probe { execute_ok: false, ..Probe::new("a", &log) }),
    );

    tokio::spawn(driver.run());
    settled_within(&foreman).await;

    let log = entries(&log);
    assert_eq!(count_of(&log, "a:failure"), 1);
    assert_eq!(count_of(&log, "a:execute"), 1);
    assert_eq!(foreman.queue_len(), 0);
}

#[tokio::test]
async fn retry_after_fail_keeps_chore_queued() {
    let (foreman, driver, _) = new_foreman();
    let log = new_log();
    foreman.assign(
        Chore::build("stubborn")
            .retry_after_fail(true)
            .single(Probe::new("a", &log).script_execute(&[false, true])),
    );

    tokio::spawn(driver.run());
    settled_within(&foreman).await;

    let log = entries(&log);
    assert_eq!(count_of(&log, "a:execute"), 2);
    assert_eq!(count_of(&log, "a:failure"), 1);
    assert_eq!(foreman.queue_len(), 0);
}

#[tokio::test]
async fn batch_runs_units_in_order_inside_one_envelope() {
    let (foreman, driver, _) = new_foreman();
    let log = new_log();
    foreman.assign(
        Chore::build("field work").batch(
            Batch::new(vec![
                WorkUnit::new("plot 0", Probe::new("u0", &log)),
                WorkUnit::new("plot 1", Probe::new("u1", &log)),
                WorkUnit::new("plot 2", Probe::new("u2", &log)),
            ])
            .with_envelope(Probe::new("env", &log)),
        ),
    );

    tokio::spawn(driver.run());
    settled_within(&foreman).await;

    let log = entries(&log);
    assert_eq!(count_of(&log, "env:prepare"), 1);
    assert_eq!(count_of(&log, "env:finalize"), 1);
    let order: Vec<usize> =
        ["env:prepare", "u0:execute", "u1:execute", "u2:execute", "env:finalize"]
            .iter()
            .map(|needle| index_of(&log, needle))
            .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]), "wrong order: {log:?}");
    assert_eq!(foreman.queue_len(), 0);
}

#[tokio::test]
async fn batch_skips_stale_units() {
    let (foreman, driver, _) = new_foreman();
    let log = new_log();
    foreman.assign(
        Chore::build("field work").batch(Batch::new(vec![
            WorkUnit::new("done already", Probe { validate_ok: false, ..Probe::new("u0", &log) }),
            WorkUnit::new("todo", Probe::new("u1", &log)),
        ])),
    );

    tokio::spawn(driver.run());
    settled_within(&foreman).await;

    let log = entries(&log);
    assert_eq!(count_of(&log, "u0:execute"), 0);
    assert_eq!(count_of(&log, "u0:failure"), 0);
    assert_eq!(count_of(&log, "u1:execute"), 1);
}

#[tokio::test]
async fn batch_unit_failure_fails_the_batch_and_closes_envelope() {
    let (foreman, driver, _) = new_foreman();
    let log = new_log();
    foreman.assign(
        Chore::build("field work").batch(
            Batch::new(vec![
                WorkUnit::new("bad", Probe { execute_ok: false, ..Probe::new("u0", &log) }),
                WorkUnit::new("never", Probe::new("u1", &log)),
            ])
            .with_envelope(Probe::new("env", &log)),
        ),
    );

    tokio::spawn(driver.run());
    settled_within(&foreman).await;

    let log = entries(&log);
    assert_eq!(count_of(&log, "u0:failure"), 1);
    assert_eq!(count_of(&log, "u1:execute"), 0);
    // the envelope still gets its finalize when the batch leaves the queue
    assert_eq!(count_of(&log, "env:finalize"), 1);
    assert_eq!(foreman.queue_len(), 0);
}

#[tokio::test]
async fn force_interrupt_preempts_then_resumes() {
    let (foreman, driver, _) = new_foreman();
    let log = new_log();
    foreman.assign(Chore::build("slow").single(Probe {
        execute_delay: Duration::from_millis(100),
        ..Probe::new("a", &log)
    }));

    tokio::spawn(driver.run());
    wait_for(&log, "a:execute").await;
    foreman.assign(
        Chore::build("urgent").priority(Priority::ForceInterrupt).single(Probe::new("b", &log)),
    );
    settled_within(&foreman).await;

    let log = entries(&log);
    // the in-flight execute ran to completion; the abandonment happened at
    // the next stage boundary, so the first pass never reached finalize
    assert!(index_of(&log, "b:validate") > index_of(&log, "a:execute"));
    // the paused chore released its resources before the interrupter ran
    assert!(index_of(&log, "a:finalize") < index_of(&log, "b:validate"));
    // the paused chore resumed and completed
    assert_eq!(count_of(&log, "a:execute"), 2);
    assert_eq!(count_of(&log, "a:failure"), 0);
    assert_eq!(foreman.queue_len(), 0);
}

#[tokio::test]
async fn soft_interrupt_keeps_the_batch_envelope_open() {
    let (foreman, driver, _) = new_foreman();
    let log = new_log();
    foreman.assign(
        Chore::build("field work").batch(
            Batch::new(vec![
                WorkUnit::new(
                    "slow plot",
                    Probe { execute_delay: Duration::from_millis(100), ..Probe::new("u0", &log) },
                ),
                WorkUnit::new("next plot", Probe::new("u1", &log)),
            ])
            .with_envelope(Probe::new("env", &log)),
        ),
    );

    tokio::spawn(driver.run());
    wait_for(&log, "u0:execute").await;
    foreman.assign(
        Chore::build("ping").priority(Priority::SoftInterrupt).single(Probe::new("b", &log)),
    );
    settled_within(&foreman).await;

    let log = entries(&log);
    // only the unit in flight was finalized before the interrupter
    assert!(index_of(&log, "u0:finalize") < index_of(&log, "b:validate"));
    // the envelope stayed open across the interruption
    assert_eq!(count_of(&log, "env:prepare"), 1);
    assert_eq!(count_of(&log, "env:finalize"), 1);
    assert_eq!(count_of(&log, "u1:execute"), 1);
}

#[tokio::test]
async fn force_interrupt_tears_down_the_whole_batch() {
    let (foreman, driver, _) = new_foreman();
    let log = new_log();
    foreman.assign(
        Chore::build("field work").batch(
            Batch::new(vec![
                WorkUnit::new(
                    "slow plot",
                    Probe { execute_delay: Duration::from_millis(100), ..Probe::new("u0", &log) },
                ),
                WorkUnit::new("next plot", Probe::new("u1", &log)),
            ])
            .with_envelope(Probe::new("env", &log)),
        ),
    );

    tokio::spawn(driver.run());
    wait_for(&log, "u0:execute").await;
    foreman.assign(
        Chore::build("urgent").priority(Priority::ForceInterrupt).single(Probe::new("b", &log)),
    );
    settled_within(&foreman).await;

    let log = entries(&log);
    // unit and envelope both released before the interrupter
    assert!(index_of(&log, "u0:finalize") < index_of(&log, "b:validate"));
    assert!(index_of(&log, "env:finalize") < index_of(&log, "b:validate"));
    // the batch re-prepared its envelope when it resumed
    assert_eq!(count_of(&log, "env:prepare"), 2);
    assert_eq!(count_of(&log, "env:finalize"), 2);
    assert_eq!(count_of(&log, "u1:execute"), 1);
}

#[tokio::test]
async fn soft_interrupt_finalizes_active_first() {
    let (foreman, driver, _) = new_foreman();
    let log = new_log();
    foreman.assign(Chore::build("slow").single(Probe {
        execute_delay: Duration::from_millis(100),
        ..Probe::new("a", &log)
    }));

    tokio::spawn(driver.run());
    wait_for(&log, "a:execute").await;
    foreman.assign(
        Chore::build("urgent").priority(Priority::SoftInterrupt).single(Probe::new("b", &log)),
    );
    settled_within(&foreman).await;

    let log = entries(&log);
    // soft policy: the paused chore hands over resources before the
    // interrupter starts
    assert!(index_of(&log, "a:finalize") < index_of(&log, "b:validate"));
    assert_eq!(count_of(&log, "a:execute"), 2);
}

#[tokio::test]
async fn higher_ordinary_priority_preempts_like_soft() {
    let (foreman, driver, _) = new_foreman();
    let log = new_log();
    foreman.assign(Chore::build("slow").single(Probe {
        execute_delay: Duration::from_millis(100),
        ..Probe::new("a", &log)
    }));

    tokio::spawn(driver.run());
    wait_for(&log, "a:execute").await;
    foreman.assign(
        Chore::build("pressing").priority(Priority::Foreground).single(Probe::new("fg", &log)),
    );
    settled_within(&foreman).await;

    let log = entries(&log);
    assert!(index_of(&log, "a:finalize") < index_of(&log, "fg:validate"));
    assert_eq!(count_of(&log, "fg:execute"), 1);
    assert_eq!(count_of(&log, "a:execute"), 2);
}

#[tokio::test]
async fn equal_priority_does_not_preempt() {
    let (foreman, driver, _) = new_foreman();
    let log = new_log();
    foreman.assign(Chore::build("slow").single(Probe {
        execute_delay: Duration::from_millis(50),
        ..Probe::new("a", &log)
    }));

    tokio::spawn(driver.run());
    wait_for(&log, "a:execute").await;
    foreman.assign(Chore::build("peer").priority(Priority::Plain).single(Probe::new("b", &log)));
    settled_within(&foreman).await;

    let log = entries(&log);
    // no pause: a ran exactly once, b strictly after
    assert_eq!(count_of(&log, "a:execute"), 1);
    assert!(index_of(&log, "b:validate") > index_of(&log, "a:finalize"));
}

#[tokio::test]
async fn interrupt_while_idle_runs_immediately_and_bypasses_queue() {
    let (foreman, driver, _) = new_foreman();
    let log = new_log();
    tokio::spawn(driver.run());

    foreman.assign(
        Chore::build("urgent").priority(Priority::ForceInterrupt).single(Probe::new("b", &log)),
    );
    settled_within(&foreman).await;

    let log = entries(&log);
    assert_eq!(
        log,
        vec!["b:validate", "b:prepare", "b:execute", "b:finalize"]
    );
    assert_eq!(foreman.queue_len(), 0);
    assert_eq!(foreman.phase(), Phase::Idle);
}

#[tokio::test]
async fn erroring_interrupter_is_retried_a_bounded_number_of_times() {
    let (foreman, driver, warn) = new_foreman();
    let log = new_log();
    tokio::spawn(driver.run());

    foreman.assign(
        Chore::build("cursed")
            .priority(Priority::ForceInterrupt)
            .single(Probe { execute_err: Some("boom"), ..Probe::new("b", &log) }),
    );
    settled_within(&foreman).await;

    let log = entries(&log);
    assert_eq!(count_of(&log, "b:execute"), MAX_INTERRUPT_ATTEMPTS as usize);
    let messages = warn.messages();
    assert!(messages.iter().any(|m| m.contains("gave up")), "{messages:?}");
}

#[tokio::test]
async fn ignored_error_from_interrupter_ends_it_silently() {
    let (foreman, driver, warn) = new_foreman();
    let log = new_log();
    tokio::spawn(driver.run());

    foreman.assign(
        Chore::build("withdrawn")
            .priority(Priority::ForceInterrupt)
            .single(Probe { execute_err: Some("ignored"), ..Probe::new("b", &log) }),
    );
    settled_within(&foreman).await;

    let log = entries(&log);
    assert_eq!(count_of(&log, "b:execute"), 1);
    assert_eq!(count_of(&log, "b:failure"), 0);
    assert!(warn.is_empty());
}

#[tokio::test]
async fn ignored_error_from_ordinary_chore_is_silent() {
    let (foreman, driver, warn) = new_foreman();
    let log = new_log();
    foreman.assign(
        Chore::build("withdrawn").single(Probe { execute_err: Some("ignored"), ..Probe::new("a", &log) }),
    );

    tokio::spawn(driver.run());
    settled_within(&foreman).await;

    let log = entries(&log);
    assert_eq!(count_of(&log, "a:failure"), 0);
    assert!(warn.is_empty());
    assert_eq!(foreman.queue_len(), 0);
}

#[tokio::test]
async fn unexpected_error_is_warned_and_does_not_call_failure() {
    let (foreman, driver, warn) = new_foreman();
    let log = new_log();
    foreman.assign(
        Chore::build("broken").single(Probe { execute_err: Some("boom"), ..Probe::new("a", &log) }),
    );

    tokio::spawn(driver.run());
    settled_within(&foreman).await;

    let log = entries(&log);
    assert_eq!(count_of(&log, "a:failure"), 0);
    assert!(warn.messages().iter().any(|m| m.contains("boom")));
    assert_eq!(foreman.queue_len(), 0);
}

#[tokio::test]
async fn settled_flag_tracks_queue_state() {
    let (foreman, driver, _) = new_foreman();
    let log = new_log();
    assert!(foreman.is_settled());
    foreman.assign(Chore::build("slow").single(Probe {
        execute_delay: Duration::from_millis(50),
        ..Probe::new("a", &log)
    }));
    assert!(!foreman.is_settled());

    tokio::spawn(driver.run());
    settled_within(&foreman).await;
    assert!(foreman.is_settled());
}

#[tokio::test]
async fn introspection_resolves_batches_to_leaf_units() {
    let (foreman, driver, _) = new_foreman();
    let log = new_log();
    foreman.assign(
        Chore::build("field work").key("farm").batch(Batch::new(vec![
            WorkUnit::new("plot 0", Probe::new("u0", &log)),
            WorkUnit::new("plot 1", Probe::new("u1", &log)),
        ])),
    );

    let current = foreman.current().unwrap();
    assert_eq!(current.display_name, "field work");
    assert_eq!(current.key.as_deref(), Some("farm"));
    assert_eq!(current.batch, Some(BatchProgress { cursor: 0, len: 2 }));

    let unit = foreman.current_unit().unwrap();
    assert_eq!(unit.label, "plot 0");
    assert_eq!(unit.index, Some(0));

    tokio::spawn(driver.run());
    settled_within(&foreman).await;
    assert!(foreman.current().is_none());
    assert!(foreman.current_unit().is_none());
}

#[tokio::test]
async fn stop_parks_the_driver_without_draining() {
    let (foreman, driver, _) = new_foreman();
    let log = new_log();
    foreman.assign(Chore::build("slow").single(Probe {
        execute_delay: Duration::from_millis(100),
        ..Probe::new("a", &log)
    }));
    foreman.assign(Chore::build("waiting").single(Probe::new("b", &log)));

    let handle = tokio::spawn(driver.run());
    wait_for(&log, "a:execute").await;
    foreman.stop();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .unwrap()
        .unwrap();

    // the second chore never ran and both are still queued
    let log = entries(&log);
    assert_eq!(count_of(&log, "b:execute"), 0);
    assert_eq!(foreman.queue_len(), 2);
    assert_eq!(foreman.phase(), Phase::Idle);
}
