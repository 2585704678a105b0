// UPROOF - uproof-riot
// Module: Proof Harnesses
// SW-REQ-ID: REQ_RIOT_005
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Harnesses for the event-timeout and USBUS targets.
//!
//! Each harness follows the same order: allocate the target structures,
//! declare the free scalars, build the structural preconditions, then call
//! the target once.

use uproof_foundation::{
    Halt, Harness, HarnessRegistry, Nullability, ProofContext, Ptr, ShapeBuilder, StubRegistry,
    Symbolic,
};

use crate::{
    deps::{event_timeout_stubs, NondetEventPoster, NondetTimer, TrackingTimer},
    event_timeout::{
        event_timeout_callback, event_timeout_clear, event_timeout_set, event_timeout_ztimer_init,
        COVER_CALLBACK, COVER_CLEAR_IDLE, COVER_CLEAR_REMOVE, COVER_INIT, COVER_SET,
    },
    layouts::{
        EVENT_TIMEOUT_T, EVENT_TIMEOUT_TIMER, HANDLER_NEXT, USBUS_HANDLERS, USBUS_HANDLER_T, USBUS_T,
        ZTIMER_ARG,
    },
    usbus::{usbus_register_event_handler, COVER_APPEND, COVER_EMPTY, COVER_WALK},
};

const HARNESS_SITE: &str = "harness";

/// Model installed for `ztimer_set` / `ztimer_remove`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerModel {
    /// Every return value unconstrained
    #[default]
    Nondet,
    /// `ztimer_remove` reports true only for armed timers
    Tracking,
}

impl TimerModel {
    fn stubs(self) -> StubRegistry {
        match self {
            Self::Nondet => event_timeout_stubs(),
            Self::Tracking => TrackingTimer::stubs(),
        }
    }
}

/// The timeout passed to `event_timeout_set`; any restriction on it reduces
/// the proof's coverage.
pub fn timeout_symbol() -> Symbolic<u32> {
    Symbolic::new("timeout").must_stay_free()
}

/// `event_timeout_set` on a non-null, symbolically sized descriptor with a
/// fully free timeout.
#[derive(Debug, Clone)]
pub struct EventTimeoutSet {
    timers:  TimerModel,
    timeout: Symbolic<u32>,
}

impl Default for EventTimeoutSet {
    fn default() -> Self {
        Self::new()
    }
}

impl EventTimeoutSet {
    pub fn new() -> Self {
        Self {
            timers:  TimerModel::Nondet,
            timeout: timeout_symbol(),
        }
    }

    pub fn with_timers(mut self, timers: TimerModel) -> Self {
        self.timers = timers;
        self
    }

    /// Replace the timeout declaration. Whatever symbol is supplied stays
    /// free; any domain or constraint on it is reported as a coverage
    /// reduction.
    pub fn with_timeout(mut self, timeout: Symbolic<u32>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Harness for EventTimeoutSet {
    fn name(&self) -> &'static str {
        "event_timeout_set"
    }

    fn target(&self) -> &'static str {
        "event_timeout_set"
    }

    fn description(&self) -> &'static str {
        "Arm an event timeout with an arbitrary timeout value"
    }

    fn stubs(&self) -> StubRegistry {
        self.timers.stubs()
    }

    fn coverage_points(&self) -> &'static [&'static str] {
        &[COVER_SET]
    }

    fn run(&self, cx: &mut ProofContext<'_>) -> Result<(), Halt> {
        let event_timeout = cx.alloc_at_least("event_timeout", &EVENT_TIMEOUT_T, Nullability::NonNull)?;
        cx.declare_free(self.timeout.name());
        let timeout = cx.draw(&self.timeout)?;
        match self.timers {
            TimerModel::Nondet => event_timeout_set(cx, &mut NondetTimer, event_timeout, timeout),
            TimerModel::Tracking => {
                event_timeout_set(cx, &mut TrackingTimer::new(), event_timeout, timeout)
            },
        }
    }
}

/// `event_timeout_clear` on a descriptor whose clock may or may not be set.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventTimeoutClear;

impl Harness for EventTimeoutClear {
    fn name(&self) -> &'static str {
        "event_timeout_clear"
    }

    fn target(&self) -> &'static str {
        "event_timeout_clear"
    }

    fn stubs(&self) -> StubRegistry {
        event_timeout_stubs()
    }

    fn coverage_points(&self) -> &'static [&'static str] {
        &[COVER_CLEAR_REMOVE, COVER_CLEAR_IDLE]
    }

    fn run(&self, cx: &mut ProofContext<'_>) -> Result<(), Halt> {
        let event_timeout = cx.alloc_at_least("event_timeout", &EVENT_TIMEOUT_T, Nullability::NonNull)?;
        event_timeout_clear(cx, &mut NondetTimer, event_timeout)
    }
}

/// The expiry callback with an arbitrary descriptor as its argument.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventTimeoutCallback;

impl Harness for EventTimeoutCallback {
    fn name(&self) -> &'static str {
        "event_timeout_callback"
    }

    fn target(&self) -> &'static str {
        "_event_timeout_callback"
    }

    fn stubs(&self) -> StubRegistry {
        event_timeout_stubs()
    }

    fn coverage_points(&self) -> &'static [&'static str] {
        &[COVER_CALLBACK]
    }

    fn run(&self, cx: &mut ProofContext<'_>) -> Result<(), Halt> {
        let event_timeout = cx.alloc_at_least("event_timeout", &EVENT_TIMEOUT_T, Nullability::NonNull)?;
        event_timeout_callback(cx, &mut NondetEventPoster, event_timeout)
    }
}

/// Init, set, clear and expiry on one descriptor, with `ztimer_remove`
/// answering consistently with the earlier `ztimer_set`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventTimeoutLifecycle;

impl Harness for EventTimeoutLifecycle {
    fn name(&self) -> &'static str {
        "event_timeout_lifecycle"
    }

    fn target(&self) -> &'static str {
        "event_timeout_ztimer_init"
    }

    fn description(&self) -> &'static str {
        "Initialize, arm, clear and fire an event timeout"
    }

    fn stubs(&self) -> StubRegistry {
        TrackingTimer::stubs()
    }

    fn coverage_points(&self) -> &'static [&'static str] {
        &[
            COVER_INIT,
            COVER_SET,
            COVER_CLEAR_REMOVE,
            COVER_CLEAR_IDLE,
            COVER_CALLBACK,
        ]
    }

    fn run(&self, cx: &mut ProofContext<'_>) -> Result<(), Halt> {
        let event_timeout = cx.alloc_exact("event_timeout", &EVENT_TIMEOUT_T, Nullability::NonNull)?;
        let clock = cx.any_ptr("clock")?;
        let queue = cx.any_ptr("queue")?;
        let event = cx.any_ptr("event")?;
        event_timeout_ztimer_init(cx, event_timeout, clock, queue, event)?;

        let timeout = cx.draw(&timeout_symbol())?;
        let mut timers = TrackingTimer::new();
        event_timeout_set(cx, &mut timers, event_timeout, timeout)?;
        event_timeout_clear(cx, &mut timers, event_timeout)?;

        // ztimer hands the stored argument to the callback
        let timer = event_timeout.field_address(&EVENT_TIMEOUT_TIMER);
        let arg = cx.load_ptr(timer, &ZTIMER_ARG, HARNESS_SITE)?;
        event_timeout_callback(cx, &mut NondetEventPoster, arg)
    }
}

/// Non-null bus whose handler list is empty or holds one well-formed node,
/// plus a handler argument that may be `NULL`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsbusRegisterEventHandler;

impl Harness for UsbusRegisterEventHandler {
    fn name(&self) -> &'static str {
        "usbus_register_event_handler"
    }

    fn target(&self) -> &'static str {
        "usbus_register_event_handler"
    }

    fn description(&self) -> &'static str {
        "Register a possibly-null handler on an empty or one-node list"
    }

    fn coverage_points(&self) -> &'static [&'static str] {
        &[COVER_EMPTY, COVER_WALK, COVER_APPEND]
    }

    fn run(&self, cx: &mut ProofContext<'_>) -> Result<(), Halt> {
        let usbus = existing_handlers(cx)?;
        let handler = cx.alloc_at_least("handler", &USBUS_HANDLER_T, Nullability::MayFail)?;
        usbus_register_event_handler(cx, usbus, handler)
    }
}

/// Two registrations in a row. The first handler's `next` is never
/// initialized by the caller, so the second walk follows garbage; this
/// harness is expected to fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsbusRegisterEventHandlerTwice;

impl Harness for UsbusRegisterEventHandlerTwice {
    fn name(&self) -> &'static str {
        "usbus_register_event_handler_twice"
    }

    fn target(&self) -> &'static str {
        "usbus_register_event_handler"
    }

    fn description(&self) -> &'static str {
        "Register two handlers whose next links are left uninitialized"
    }

    fn coverage_points(&self) -> &'static [&'static str] {
        &[COVER_EMPTY, COVER_WALK, COVER_APPEND]
    }

    fn run(&self, cx: &mut ProofContext<'_>) -> Result<(), Halt> {
        let usbus = existing_handlers(cx)?;
        let first = cx.alloc_at_least("first_handler", &USBUS_HANDLER_T, Nullability::MayFail)?;
        usbus_register_event_handler(cx, usbus, first)?;
        let second = cx.alloc_at_least("second_handler", &USBUS_HANDLER_T, Nullability::MayFail)?;
        usbus_register_event_handler(cx, usbus, second)
    }
}

/// Allocate the bus and give it an empty or one-node handler list.
fn existing_handlers(cx: &mut ProofContext<'_>) -> Result<Ptr, Halt> {
    let usbus = cx.alloc_at_least("usbus", &USBUS_T, Nullability::NonNull)?;
    let existing = ShapeBuilder::list("has_existing_handler", &USBUS_HANDLER_T, &HANDLER_NEXT)
        .max_nodes(1)
        .build(cx)?;
    cx.store_ptr(usbus, &USBUS_HANDLERS, existing.head, HARNESS_SITE)?;
    Ok(usbus)
}

/// Every harness in this crate
pub fn registry() -> HarnessRegistry {
    HarnessRegistry::new()
        .with(EventTimeoutSet::new())
        .with(EventTimeoutClear)
        .with(EventTimeoutCallback)
        .with(EventTimeoutLifecycle)
        .with(UsbusRegisterEventHandler)
        .with(UsbusRegisterEventHandlerTwice)
}
