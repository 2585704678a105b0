// UPROOF - uproof-foundation
// Module: Harness Interface
// SW-REQ-ID: REQ_VERIFY_001
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! The proof harness interface and a registry of harnesses.

use uproof_error::{Error, Result as UproofResult};

use crate::{
    context::{Halt, ProofContext},
    stub::StubRegistry,
};

/// A proof harness for one target function.
///
/// `run` declares the symbolic inputs, records its assumptions, builds any
/// structural preconditions and then calls the target exactly once. Returning
/// a [`Halt::Violation`] fails the proof; [`Halt::Pruned`] marks a path that
/// does not satisfy the assumptions.
pub trait Harness: Send + Sync {
    /// Unique harness name
    fn name(&self) -> &'static str;

    /// Function under verification
    fn target(&self) -> &'static str;

    fn description(&self) -> &'static str {
        ""
    }

    /// Stubs installed for the target's dependencies
    fn stubs(&self) -> StubRegistry {
        StubRegistry::new()
    }

    /// Coverage points of the target model this harness should reach
    fn coverage_points(&self) -> &'static [&'static str];

    fn run(&self, cx: &mut ProofContext<'_>) -> Result<(), Halt>;
}

#[derive(Default)]
pub struct HarnessRegistry {
    harnesses: Vec<Box<dyn Harness>>,
}

impl core::fmt::Debug for HarnessRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.harnesses.iter().map(|harness| harness.name())).finish()
    }
}

impl HarnessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a harness; a harness with the same name is replaced.
    pub fn register(&mut self, harness: Box<dyn Harness>) {
        self.harnesses.retain(|existing| existing.name() != harness.name());
        self.harnesses.push(harness);
    }

    pub fn with(mut self, harness: impl Harness + 'static) -> Self {
        self.register(Box::new(harness));
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn Harness> {
        self.harnesses
            .iter()
            .find(|harness| harness.name() == name)
            .map(Box::as_ref)
    }

    /// Like [`get`](Self::get), failing with an unknown-harness error
    pub fn require(&self, name: &str) -> UproofResult<&dyn Harness> {
        self.get(name)
            .ok_or(Error::unknown_harness("No harness registered under that name"))
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Harness> {
        self.harnesses.iter().map(Box::as_ref)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.harnesses.iter().map(|harness| harness.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.harnesses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.harnesses.is_empty()
    }
}
