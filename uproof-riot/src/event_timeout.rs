// UPROOF - uproof-riot
// Module: Event Timeout Model
// SW-REQ-ID: REQ_RIOT_003
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! `sys/event/timeout_ztimer.c` against the symbolic heap.
//!
//! Every member access goes through the [`ProofContext`], so an access
//! through a bad `event_timeout_t *` is reported where the C code would
//! perform it. Timer and queue operations are delegated to the
//! [`TimerScheduler`] and [`EventPoster`] capabilities.

use uproof_foundation::{Halt, ProofContext, Ptr};

use crate::{
    deps::{EventPoster, TimerScheduler},
    layouts::{
        EVENT_TIMEOUT_CLOCK, EVENT_TIMEOUT_EVENT, EVENT_TIMEOUT_QUEUE, EVENT_TIMEOUT_TIMER,
        ZTIMER_ARG, ZTIMER_CALLBACK,
    },
};

pub const COVER_INIT: &str = "event_timeout_ztimer_init:init";
pub const COVER_SET: &str = "event_timeout_set:arm";
pub const COVER_CLEAR_REMOVE: &str = "event_timeout_clear:remove";
pub const COVER_CLEAR_IDLE: &str = "event_timeout_clear:idle";
pub const COVER_CALLBACK: &str = "event_timeout_callback:post";

/// Name of the expiry callback installed in the embedded timer
pub const CALLBACK_SYMBOL: &str = "_event_timeout_callback";

/// `event_timeout_ztimer_init()`
pub fn event_timeout_ztimer_init(
    cx: &mut ProofContext<'_>,
    event_timeout: Ptr,
    clock: Ptr,
    queue: Ptr,
    event: Ptr,
) -> Result<(), Halt> {
    const SITE: &str = "event_timeout_ztimer_init";
    let timer = event_timeout.field_address(&EVENT_TIMEOUT_TIMER);
    cx.store_ptr(event_timeout, &EVENT_TIMEOUT_CLOCK, clock, SITE)?;
    cx.store_ptr(timer, &ZTIMER_CALLBACK, Ptr::Function(CALLBACK_SYMBOL), SITE)?;
    cx.store_ptr(timer, &ZTIMER_ARG, event_timeout, SITE)?;
    cx.store_ptr(event_timeout, &EVENT_TIMEOUT_QUEUE, queue, SITE)?;
    cx.store_ptr(event_timeout, &EVENT_TIMEOUT_EVENT, event, SITE)?;
    cx.cover(COVER_INIT);
    Ok(())
}

/// `event_timeout_set()`: arm the embedded timer on the stored clock.
pub fn event_timeout_set(
    cx: &mut ProofContext<'_>,
    timers: &mut dyn TimerScheduler,
    event_timeout: Ptr,
    timeout: u32,
) -> Result<(), Halt> {
    let clock = cx.load_ptr(event_timeout, &EVENT_TIMEOUT_CLOCK, "event_timeout_set")?;
    let timer = event_timeout.field_address(&EVENT_TIMEOUT_TIMER);
    cx.cover(COVER_SET);
    // the current time ztimer_set returns is discarded
    timers.set(&mut cx.stubs(), clock, timer, timeout)?;
    Ok(())
}

/// `event_timeout_clear()`: disarm the timer if a clock was ever assigned.
pub fn event_timeout_clear(
    cx: &mut ProofContext<'_>,
    timers: &mut dyn TimerScheduler,
    event_timeout: Ptr,
) -> Result<(), Halt> {
    let clock = cx.load_ptr(event_timeout, &EVENT_TIMEOUT_CLOCK, "event_timeout_clear")?;
    if clock.is_null() {
        cx.cover(COVER_CLEAR_IDLE);
        return Ok(());
    }
    let timer = event_timeout.field_address(&EVENT_TIMEOUT_TIMER);
    cx.cover(COVER_CLEAR_REMOVE);
    timers.remove(&mut cx.stubs(), clock, timer)?;
    Ok(())
}

/// `_event_timeout_callback()`: `arg` is the `event_timeout_t *` stored by
/// init.
pub fn event_timeout_callback(
    cx: &mut ProofContext<'_>,
    poster: &mut dyn EventPoster,
    arg: Ptr,
) -> Result<(), Halt> {
    const SITE: &str = "_event_timeout_callback";
    let queue = cx.load_ptr(arg, &EVENT_TIMEOUT_QUEUE, SITE)?;
    let event = cx.load_ptr(arg, &EVENT_TIMEOUT_EVENT, SITE)?;
    cx.cover(COVER_CALLBACK);
    poster.post(&mut cx.stubs(), queue, event)
}
