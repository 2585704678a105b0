// UPROOF - uproof-riot
// Module: RIOT Structure Layouts
// SW-REQ-ID: REQ_RIOT_001
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! LP64 layouts of the RIOT structures the harnesses allocate.
//!
//! Only the members the modelled functions touch are named; the remaining
//! bytes are covered by the structure size.

use uproof_foundation::{FieldDef, StructLayout};

// ztimer_t: ztimer_base_t { next, offset } followed by callback and arg
pub const ZTIMER_NEXT: FieldDef = FieldDef::pointer("base.next", 0);
pub const ZTIMER_OFFSET: FieldDef = FieldDef::scalar("base.offset", 8, 4);
pub const ZTIMER_CALLBACK: FieldDef = FieldDef::pointer("callback", 16);
pub const ZTIMER_ARG: FieldDef = FieldDef::pointer("arg", 24);

pub static ZTIMER_T: StructLayout = StructLayout {
    name:   "ztimer_t",
    size:   32,
    align:  8,
    fields: &[ZTIMER_NEXT, ZTIMER_OFFSET, ZTIMER_CALLBACK, ZTIMER_ARG],
};

// event_timeout_t
pub static EVENT_TIMEOUT_TIMER: FieldDef = FieldDef::nested("timer", 0, &ZTIMER_T);
pub const EVENT_TIMEOUT_CLOCK: FieldDef = FieldDef::pointer("clock", 32);
pub const EVENT_TIMEOUT_QUEUE: FieldDef = FieldDef::pointer("queue", 40);
pub const EVENT_TIMEOUT_EVENT: FieldDef = FieldDef::pointer("event", 48);

pub static EVENT_TIMEOUT_T: StructLayout = StructLayout {
    name:   "event_timeout_t",
    size:   56,
    align:  8,
    fields: &[
        FieldDef::nested("timer", 0, &ZTIMER_T),
        EVENT_TIMEOUT_CLOCK,
        EVENT_TIMEOUT_QUEUE,
        EVENT_TIMEOUT_EVENT,
    ],
};

// usbus_handler_t
pub const HANDLER_NEXT: FieldDef = FieldDef::pointer("next", 0);
pub const HANDLER_DRIVER: FieldDef = FieldDef::pointer("driver", 8);
pub const HANDLER_IFACE: FieldDef = FieldDef::pointer("iface", 16);
pub const HANDLER_FLAGS: FieldDef = FieldDef::scalar("flags", 24, 4);

pub static USBUS_HANDLER_T: StructLayout = StructLayout {
    name:   "usbus_handler_t",
    size:   32,
    align:  8,
    fields: &[HANDLER_NEXT, HANDLER_DRIVER, HANDLER_IFACE, HANDLER_FLAGS],
};

// usbus_t, reduced to the members the registration path can reach
pub const USBUS_DEV: FieldDef = FieldDef::pointer("dev", 0);
pub const USBUS_CONTROL: FieldDef = FieldDef::pointer("control", 8);
pub const USBUS_HANDLERS: FieldDef = FieldDef::pointer("handlers", 16);
pub const USBUS_IFACES: FieldDef = FieldDef::pointer("iface", 24);
pub const USBUS_ADDR: FieldDef = FieldDef::scalar("addr", 32, 2);
pub const USBUS_STATE: FieldDef = FieldDef::scalar("state", 36, 4);

pub static USBUS_T: StructLayout = StructLayout {
    name:   "usbus_t",
    size:   48,
    align:  8,
    fields: &[
        USBUS_DEV,
        USBUS_CONTROL,
        USBUS_HANDLERS,
        USBUS_IFACES,
        USBUS_ADDR,
        USBUS_STATE,
    ],
};

/// Every layout the harnesses use
pub fn all() -> [&'static StructLayout; 4] {
    [&ZTIMER_T, &EVENT_TIMEOUT_T, &USBUS_HANDLER_T, &USBUS_T]
}
