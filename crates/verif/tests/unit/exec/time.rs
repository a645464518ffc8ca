//! Delay and timeout combinator tests.

use pretty_assertions::assert_eq;
use veritb_core::exec::{Elapsed, Scheduler, timeout};

#[test]
fn timeout_passes_through_a_fast_future() {
    let mut scheduler = Scheduler::new();
    let ctx = scheduler.ctx();
    let task_ctx = ctx.clone();
    let handle = ctx.spawn(async move {
        let inner = task_ctx.delay(5);
        timeout(&task_ctx, 10, inner).await
    });
    scheduler.run();
    assert_eq!(handle.try_take(), Some(Ok(())));
    assert_eq!(scheduler.now(), 5);
}

#[test]
fn timeout_expires_on_a_slow_future() {
    let mut scheduler = Scheduler::new();
    let ctx = scheduler.ctx();
    let task_ctx = ctx.clone();
    let handle = ctx.spawn(async move {
        let inner = task_ctx.delay(50);
        timeout(&task_ctx, 10, inner).await
    });
    scheduler.run();
    assert_eq!(handle.try_take(), Some(Err(Elapsed(10))));
}

#[test]
fn inner_future_wins_a_deadline_tie() {
    let mut scheduler = Scheduler::new();
    let ctx = scheduler.ctx();
    let task_ctx = ctx.clone();
    let handle = ctx.spawn(async move {
        let inner = task_ctx.delay(10);
        timeout(&task_ctx, 10, inner).await
    });
    scheduler.run();
    assert_eq!(handle.try_take(), Some(Ok(())));
}

#[test]
fn delay_reports_absolute_deadline() {
    let scheduler = Scheduler::new();
    let ctx = scheduler.ctx();
    assert_eq!(ctx.delay(25).deadline(), 25);
}

#[test]
fn timeout_on_a_stalled_future_expires() {
    // A future that never completes: waiting on an event nobody sets.
    let mut scheduler = Scheduler::new();
    let ctx = scheduler.ctx();
    let event = veritb_core::exec::Event::new();
    let waiter = event.clone();
    let task_ctx = ctx.clone();
    let handle = ctx.spawn(async move {
        timeout(&task_ctx, 40, async move { waiter.wait().await }).await
    });
    scheduler.run();
    assert_eq!(handle.try_take(), Some(Err(Elapsed(40))));
    assert_eq!(scheduler.now(), 40);
}
