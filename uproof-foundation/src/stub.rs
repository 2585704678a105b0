// UPROOF - uproof-foundation
// Module: Dependency Stubs
// SW-REQ-ID: REQ_VERIFY_003
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Support for nondeterministic stand-ins of a target's dependencies.
//!
//! A stub implements the same capability interface as the real dependency,
//! ignores its arguments and returns an unconstrained value. Stubs only get a
//! [`StubCx`]: it can draw nondeterministic values and log the call, but it
//! has no access to the symbolic heap, so a stub cannot dereference the
//! pointers it is handed.
//!
//! Every stub a harness installs is declared with a [`StubDescriptor`] in a
//! [`StubRegistry`] for auditing and metrics.

use core::fmt;

use crate::{
    context::Halt,
    source::SymbolicSource,
    symbolic::{Domain, Scalar},
};

/// What a stub returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnModel {
    /// `void`
    Unit,
    /// Any value of the named return type
    Unconstrained { type_name: &'static str },
    /// Deterministic and consistent with earlier calls
    Consistent { rule: &'static str },
}

impl fmt::Display for ReturnModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => f.write_str("void"),
            Self::Unconstrained { type_name } => write!(f, "nondet {type_name}"),
            Self::Consistent { rule } => write!(f, "consistent: {rule}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StubDescriptor {
    pub name:      &'static str,
    pub signature: &'static str,
    pub returns:   ReturnModel,
}

impl StubDescriptor {
    pub const fn new(name: &'static str, signature: &'static str, returns: ReturnModel) -> Self {
        Self {
            name,
            signature,
            returns,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StubRegistry {
    stubs: Vec<StubDescriptor>,
}

impl StubRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor; a second registration of the same name replaces the
    /// first.
    pub fn register(&mut self, descriptor: StubDescriptor) {
        match self.stubs.iter_mut().find(|stub| stub.name == descriptor.name) {
            Some(existing) => *existing = descriptor,
            None => self.stubs.push(descriptor),
        }
    }

    pub fn with(mut self, descriptor: StubDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    pub fn get(&self, name: &str) -> Option<&StubDescriptor> {
        self.stubs.iter().find(|stub| stub.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StubDescriptor> {
        self.stubs.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.stubs.iter().map(|stub| stub.name).collect()
    }

    pub fn len(&self) -> usize {
        self.stubs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stubs.is_empty()
    }
}

/// One logged stub invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StubCall {
    pub stub:    &'static str,
    /// Position among all calls of this stub in the run, starting at 0
    pub ordinal: usize,
}

/// Stub-side view of a run
pub struct StubCx<'a> {
    source: &'a mut dyn SymbolicSource,
    calls:  &'a mut Vec<StubCall>,
}

impl fmt::Debug for StubCx<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StubCx").field("calls", &self.calls).finish_non_exhaustive()
    }
}

impl<'a> StubCx<'a> {
    pub fn new(source: &'a mut dyn SymbolicSource, calls: &'a mut Vec<StubCall>) -> Self {
        Self { source, calls }
    }

    /// Log a call to `stub` and return its ordinal
    pub fn enter(&mut self, stub: &'static str) -> usize {
        let ordinal = self.calls.iter().filter(|call| call.stub == stub).count();
        self.calls.push(StubCall { stub, ordinal });
        ordinal
    }

    /// Unconstrained return value for the call logged last by `enter`.
    /// The choice point is `{stub}#{ordinal}`.
    pub fn unconstrained<T: Scalar>(&mut self, stub: &'static str) -> Result<T, Halt> {
        let ordinal = self
            .calls
            .iter()
            .filter(|call| call.stub == stub)
            .count()
            .saturating_sub(1);
        let bits = self.source.choose(&format!("{stub}#{ordinal}"), &Domain::full::<T>())?;
        Ok(T::from_bits(bits))
    }

    pub fn calls(&self) -> &[StubCall] {
        &self.calls[..]
    }
}
