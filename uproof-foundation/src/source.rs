// UPROOF - uproof-foundation
// Module: Nondeterminism Sources
// SW-REQ-ID: REQ_VERIFY_001
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Where nondeterministic values come from.
//!
//! Harness code never asks for a value directly; it asks the
//! [`ProofContext`](crate::context::ProofContext), which forwards every choice
//! point to a [`SymbolicSource`]. Three sources exist:
//!
//! - [`ExhaustiveSource`] replays a prefix of choice indices and takes the
//!   first representative after it. The [explorer](crate::explore) uses it to
//!   walk the whole choice tree one path at a time.
//! - [`ScriptedSource`] returns concrete values by choice-point name, for
//!   replaying counterexamples and writing scenario tests.
//! - `KaniSource` (only under `cfg(kani)`) hands every choice to the model
//!   checker.

use std::collections::BTreeMap;

use crate::{context::Halt, symbolic::Domain};

/// One choice made during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceRecord {
    /// Choice-point name
    pub point:      String,
    /// Chosen bit pattern
    pub value:      u64,
    /// Index of the value among the domain's representatives
    pub index:      usize,
    /// Number of representatives of the domain
    pub arity:      usize,
    /// Whether the representatives cover the whole domain
    pub enumerated: bool,
}

/// Provider of nondeterministic values
pub trait SymbolicSource {
    /// Pick a value from `domain` for the named choice point
    fn choose(&mut self, point: &str, domain: &Domain) -> Result<u64, Halt>;

    /// Inform the source of an assumption. The context prunes the path
    /// itself when `holds` is false; checkers with native assumptions hook
    /// in here.
    fn assume(&mut self, holds: bool) {
        let _ = holds;
    }

    /// Choices made so far, in order
    fn choices(&self) -> &[ChoiceRecord] {
        &[]
    }
}

/// Replays a prefix of choice indices, then always takes index 0.
#[derive(Debug, Clone, Default)]
pub struct ExhaustiveSource {
    prefix:    Vec<usize>,
    max_depth: usize,
    records:   Vec<ChoiceRecord>,
}

impl ExhaustiveSource {
    pub fn new(prefix: Vec<usize>, max_depth: usize) -> Self {
        Self {
            prefix,
            max_depth,
            records: Vec::new(),
        }
    }

    pub fn into_choices(self) -> Vec<ChoiceRecord> {
        self.records
    }
}

impl SymbolicSource for ExhaustiveSource {
    fn choose(&mut self, point: &str, domain: &Domain) -> Result<u64, Halt> {
        let depth = self.records.len();
        if depth >= self.max_depth {
            return Err(Halt::DepthExceeded { limit: self.max_depth });
        }
        let representatives = domain.representatives();
        if representatives.is_empty() {
            return Err(Halt::Pruned {
                assumption: format!("{point} has an empty domain"),
            });
        }
        let index = self.prefix.get(depth).copied().unwrap_or(0);
        let value = *representatives.get(index).ok_or_else(|| Halt::Diverged {
            point: point.to_owned(),
        })?;
        self.records.push(ChoiceRecord {
            point: point.to_owned(),
            value,
            index,
            arity: representatives.len(),
            enumerated: domain.is_enumerable(),
        });
        Ok(value)
    }

    fn choices(&self) -> &[ChoiceRecord] {
        &self.records
    }
}

/// Concrete values by choice-point name.
///
/// Unscripted points take the smallest value of their domain. A scripted value
/// outside the declared domain prunes the run: the scenario itself violates
/// the harness assumptions.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    script:  BTreeMap<String, u64>,
    used:    Vec<String>,
    records: Vec<ChoiceRecord>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a value for a choice point
    pub fn with(mut self, point: impl Into<String>, value: u64) -> Self {
        self.set(point, value);
        self
    }

    pub fn set(&mut self, point: impl Into<String>, value: u64) {
        self.script.insert(point.into(), value);
    }

    /// Script every assignment of a previous run, e.g. a counterexample trace
    pub fn from_assignments<'a>(assignments: impl IntoIterator<Item = (&'a str, u64)>) -> Self {
        let mut source = Self::new();
        for (point, value) in assignments {
            source.set(point, value);
        }
        source
    }

    /// Scripted points no choice consumed
    pub fn unused_points(&self) -> Vec<&str> {
        self.script
            .keys()
            .filter(|point| !self.used.contains(point))
            .map(String::as_str)
            .collect()
    }

    pub fn into_choices(self) -> Vec<ChoiceRecord> {
        self.records
    }
}

impl SymbolicSource for ScriptedSource {
    fn choose(&mut self, point: &str, domain: &Domain) -> Result<u64, Halt> {
        let value = match self.script.get(point) {
            Some(&value) => {
                self.used.push(point.to_owned());
                if !domain.contains(value) {
                    return Err(Halt::Pruned {
                        assumption: format!("scripted {point} = {value} is outside its domain"),
                    });
                }
                value
            },
            None => domain.min().ok_or_else(|| Halt::Pruned {
                assumption: format!("{point} has an empty domain"),
            })?,
        };
        let representatives = domain.representatives();
        self.records.push(ChoiceRecord {
            point: point.to_owned(),
            value,
            index: representatives.iter().position(|rep| *rep == value).unwrap_or(0),
            arity: representatives.len(),
            enumerated: domain.is_enumerable(),
        });
        Ok(value)
    }

    fn choices(&self) -> &[ChoiceRecord] {
        &self.records
    }
}

/// Source backed by the Kani model checker
#[cfg(kani)]
#[derive(Debug, Clone, Copy, Default)]
pub struct KaniSource;

#[cfg(kani)]
impl SymbolicSource for KaniSource {
    fn choose(&mut self, _point: &str, domain: &Domain) -> Result<u64, Halt> {
        let value: u64 = kani::any();
        kani::assume(domain.contains(value));
        Ok(value)
    }

    fn assume(&mut self, holds: bool) {
        kani::assume(holds);
    }
}
