// UPROOF - uproof-riot
// Module: Dependency Interfaces and Stubs
// SW-REQ-ID: REQ_RIOT_002
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Capability interfaces for the external functions the event-timeout code
//! calls, with nondeterministic stubs for proofs and deterministic
//! implementations for scenario tests.
//!
//! Stub methods take a [`StubCx`] instead of the proof context, so they have
//! no way to dereference the pointers they are given.

use std::collections::BTreeSet;

use uproof_foundation::{Halt, Ptr, ReturnModel, StubCx, StubDescriptor, StubRegistry};

pub const EVENT_POST: StubDescriptor = StubDescriptor::new(
    "event_post",
    "void event_post(event_queue_t *queue, event_t *event)",
    ReturnModel::Unit,
);

pub const ZTIMER_SET: StubDescriptor = StubDescriptor::new(
    "ztimer_set",
    "uint32_t ztimer_set(ztimer_clock_t *clock, ztimer_t *timer, uint32_t val)",
    ReturnModel::Unconstrained { type_name: "uint32_t" },
);

pub const ZTIMER_REMOVE: StubDescriptor = StubDescriptor::new(
    "ztimer_remove",
    "bool ztimer_remove(ztimer_clock_t *clock, ztimer_t *timer)",
    ReturnModel::Unconstrained { type_name: "bool" },
);

pub const ZTIMER_REMOVE_TRACKING: StubDescriptor = StubDescriptor::new(
    "ztimer_remove",
    "bool ztimer_remove(ztimer_clock_t *clock, ztimer_t *timer)",
    ReturnModel::Consistent {
        rule: "true iff the timer is armed",
    },
);

/// Stubs every event-timeout harness installs
pub fn event_timeout_stubs() -> StubRegistry {
    StubRegistry::new()
        .with(EVENT_POST)
        .with(ZTIMER_SET)
        .with(ZTIMER_REMOVE)
}

/// `ztimer_set` / `ztimer_remove`
pub trait TimerScheduler {
    /// Arm `timer` on `clock` to fire after `offset` ticks; returns the
    /// clock's current time.
    fn set(&mut self, cx: &mut StubCx<'_>, clock: Ptr, timer: Ptr, offset: u32) -> Result<u32, Halt>;

    /// Disarm `timer`; returns whether it was armed.
    fn remove(&mut self, cx: &mut StubCx<'_>, clock: Ptr, timer: Ptr) -> Result<bool, Halt>;
}

/// `event_post`
pub trait EventPoster {
    fn post(&mut self, cx: &mut StubCx<'_>, queue: Ptr, event: Ptr) -> Result<(), Halt>;
}

/// Ignores its arguments and returns unconstrained values.
#[derive(Debug, Clone, Copy, Default)]
pub struct NondetTimer;

impl TimerScheduler for NondetTimer {
    fn set(&mut self, cx: &mut StubCx<'_>, _clock: Ptr, _timer: Ptr, _offset: u32) -> Result<u32, Halt> {
        cx.enter(ZTIMER_SET.name);
        cx.unconstrained(ZTIMER_SET.name)
    }

    fn remove(&mut self, cx: &mut StubCx<'_>, _clock: Ptr, _timer: Ptr) -> Result<bool, Halt> {
        cx.enter(ZTIMER_REMOVE.name);
        cx.unconstrained(ZTIMER_REMOVE.name)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NondetEventPoster;

impl EventPoster for NondetEventPoster {
    fn post(&mut self, cx: &mut StubCx<'_>, _queue: Ptr, _event: Ptr) -> Result<(), Halt> {
        cx.enter(EVENT_POST.name);
        Ok(())
    }
}

/// Remembers which timers are armed, so `remove` answers consistently with
/// earlier calls. The current time stays nondeterministic.
#[derive(Debug, Clone, Default)]
pub struct TrackingTimer {
    armed: BTreeSet<Ptr>,
}

impl TrackingTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self, timer: Ptr) -> bool {
        self.armed.contains(&timer)
    }

    pub fn armed_count(&self) -> usize {
        self.armed.len()
    }

    pub fn stubs() -> StubRegistry {
        StubRegistry::new()
            .with(EVENT_POST)
            .with(ZTIMER_SET)
            .with(ZTIMER_REMOVE_TRACKING)
    }
}

impl TimerScheduler for TrackingTimer {
    fn set(&mut self, cx: &mut StubCx<'_>, _clock: Ptr, timer: Ptr, _offset: u32) -> Result<u32, Halt> {
        cx.enter(ZTIMER_SET.name);
        self.armed.insert(timer);
        cx.unconstrained(ZTIMER_SET.name)
    }

    fn remove(&mut self, cx: &mut StubCx<'_>, _clock: Ptr, timer: Ptr) -> Result<bool, Halt> {
        cx.enter(ZTIMER_REMOVE.name);
        Ok(self.armed.remove(&timer))
    }
}

/// Records every posted `(queue, event)` pair.
#[derive(Debug, Clone, Default)]
pub struct RecordingPoster {
    posted: Vec<(Ptr, Ptr)>,
}

impl RecordingPoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posted(&self) -> &[(Ptr, Ptr)] {
        &self.posted
    }
}

impl EventPoster for RecordingPoster {
    fn post(&mut self, cx: &mut StubCx<'_>, queue: Ptr, event: Ptr) -> Result<(), Halt> {
        cx.enter(EVENT_POST.name);
        self.posted.push((queue, event));
        Ok(())
    }
}
