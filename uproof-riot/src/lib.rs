// UPROOF - uproof-riot
// SW-REQ-ID: REQ_RIOT_001
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Memory-safety harnesses for two RIOT routines.
//!
//! - `event_timeout_set()` from `sys/event/timeout_ztimer.c`, together with
//!   the other event-timeout entry points it shares a descriptor with
//! - `usbus_register_event_handler()` from `sys/usb/usbus/usbus.c`
//!
//! The targets are modelled in [`event_timeout`] and [`usbus`] on top of the
//! checked heap of `uproof-foundation`; their external dependencies are the
//! capability traits in [`deps`]. [`harnesses::registry`] lists every
//! harness by name.
//!
//! ```
//! use uproof_foundation::{Explorer, ProofOutcome};
//! use uproof_riot::harnesses::UsbusRegisterEventHandler;
//!
//! let report = Explorer::default().explore(&UsbusRegisterEventHandler);
//! assert_eq!(report.outcome, ProofOutcome::Verified);
//! ```

#![forbid(unsafe_code)]

pub mod deps;
pub mod event_timeout;
pub mod harnesses;
pub mod layouts;
pub mod usbus;

#[cfg(kani)]
mod verify;

use tracing::{info, warn};
use uproof_foundation::{Explorer, ProofReport};

pub use crate::harnesses::{registry, TimerModel};

/// Explore every registered harness whose name is in `only` (all of them
/// when `only` is empty).
pub fn explore_all(explorer: &Explorer, only: &[&str]) -> Vec<ProofReport> {
    let registry = registry();
    let mut reports = Vec::new();
    for harness in registry.iter() {
        if !only.is_empty() && !only.contains(&harness.name()) {
            continue;
        }
        let report = explorer.explore(harness);
        if report.is_verified() {
            info!(harness = report.harness, paths = report.stats.paths_explored, "verified");
        } else if let Some(error) = report.error() {
            warn!(harness = report.harness, outcome = %report.outcome, %error, "not verified");
        }
        reports.push(report);
    }
    reports
}
