// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mcb_core::{Clock, FakeClock};

fn bot(id: &str) -> BotId {
    BotId::new(id)
}

#[test]
fn scheduler_timer_lifecycle() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();
    let id = TimerId::reconnect(&bot("b1"), 1);

    scheduler.set_timer(id.clone(), Duration::from_secs(10), clock.now());
    assert!(scheduler.has_timers());
    assert!(scheduler.is_scheduled(&id));

    clock.advance(Duration::from_secs(5));
    assert!(scheduler.fired_timers(clock.now()).is_empty());
    assert!(scheduler.has_timers());

    clock.advance(Duration::from_secs(10));
    assert_eq!(scheduler.fired_timers(clock.now()), vec![id]);
    assert!(!scheduler.has_timers());
}

#[test]
fn scheduler_cancel_timer() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();
    let id = TimerId::handshake(&bot("b1"), 2);

    scheduler.set_timer(id.clone(), Duration::from_secs(10), clock.now());
    scheduler.cancel_timer(&id);

    clock.advance(Duration::from_secs(15));
    assert!(scheduler.fired_timers(clock.now()).is_empty());
}

#[test]
fn scheduler_fires_earliest_first() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();
    let slow = TimerId::reconnect(&bot("a"), 1);
    let fast = TimerId::reconnect(&bot("z"), 1);

    scheduler.set_timer(slow.clone(), Duration::from_secs(8), clock.now());
    scheduler.set_timer(fast.clone(), Duration::from_secs(3), clock.now());

    clock.advance(Duration::from_secs(10));
    assert_eq!(scheduler.fired_timers(clock.now()), vec![fast, slow]);
}

#[test]
fn scheduler_cancel_bot_timers_spares_other_bots() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();

    scheduler.set_timer(TimerId::reconnect(&bot("b1"), 1), Duration::from_secs(1), clock.now());
    scheduler.set_timer(TimerId::handshake(&bot("b1"), 2), Duration::from_secs(1), clock.now());
    scheduler.set_timer(TimerId::reconnect(&bot("b10"), 1), Duration::from_secs(1), clock.now());

    scheduler.cancel_bot_timers(&bot("b1"));

    clock.advance(Duration::from_secs(2));
    assert_eq!(
        scheduler.fired_timers(clock.now()),
        vec![TimerId::reconnect(&bot("b10"), 1)]
    );
}

#[test]
fn scheduler_set_timer_replaces_deadline() {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();
    let id = TimerId::reconnect(&bot("b1"), 1);

    scheduler.set_timer(id.clone(), Duration::from_secs(1), clock.now());
    scheduler.set_timer(id.clone(), Duration::from_secs(30), clock.now());

    assert_eq!(
        scheduler.next_deadline(),
        Some(clock.now() + Duration::from_secs(30))
    );
}

#[yare::parameterized(
    reconnect = { TimerId::reconnect(&BotId::new("b1"), 3) },
    handshake = { TimerId::handshake(&BotId::new("b1"), 3) },
)]
fn scheduler_cancel_bot_timers_covers_every_kind(id: TimerId) {
    let clock = FakeClock::new();
    let mut scheduler = Scheduler::new();
    scheduler.set_timer(id.clone(), Duration::from_secs(1), clock.now());

    scheduler.cancel_bot_timers(&bot("b1"));

    assert!(!scheduler.is_scheduled(&id));
    assert_eq!(scheduler.next_deadline(), None);
}
