// UPROOF - uproof-riot
// Module: Kani Proofs
// SW-REQ-ID: REQ_RIOT_005
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! The harnesses as Kani proofs. Run with
//! `cargo kani -p uproof-riot --features kani`.

use uproof_foundation::explore::kani_check;

use crate::harnesses::{
    EventTimeoutCallback, EventTimeoutClear, EventTimeoutLifecycle, EventTimeoutSet,
    UsbusRegisterEventHandler,
};

#[kani::proof]
#[kani::unwind(3)]
fn event_timeout_set() {
    kani_check(&EventTimeoutSet::new(), 2);
}

#[kani::proof]
#[kani::unwind(3)]
fn event_timeout_clear() {
    kani_check(&EventTimeoutClear, 2);
}

#[kani::proof]
#[kani::unwind(3)]
fn event_timeout_callback() {
    kani_check(&EventTimeoutCallback, 2);
}

#[kani::proof]
#[kani::unwind(3)]
fn event_timeout_lifecycle() {
    kani_check(&EventTimeoutLifecycle, 2);
}

#[kani::proof]
#[kani::unwind(3)]
fn usbus_register_event_handler() {
    kani_check(&UsbusRegisterEventHandler, 2);
}
