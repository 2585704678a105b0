// UPROOF - uproof-foundation
// Module: Assumption Ledger
// SW-REQ-ID: REQ_VERIFY_002
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Record of every precondition a harness places on its inputs.
//!
//! A `Verified` outcome only holds under the assumptions that were in force,
//! so each one is logged here together with where it came from. Subjects that
//! were declared *must stay free* are watched: restricting one of them is not
//! an error, but it narrows what the proof covers and is reported as a
//! [`CoverageReduction`].

use std::collections::BTreeSet;

/// Mechanism that introduced an assumption
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssumptionOrigin {
    /// Declared domain of a symbolic value
    Domain,
    /// Named predicate attached to a symbolic value
    Constraint,
    /// Lower bound on an allocation length
    AllocationSize,
    /// Non-null requirement on an allocation
    NonNull,
    /// Structural shape of a data structure
    Shape,
    /// Explicit call to `ProofContext::assume`
    Explicit,
}

impl AssumptionOrigin {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Constraint => "constraint",
            Self::AllocationSize => "allocation-size",
            Self::NonNull => "non-null",
            Self::Shape => "shape",
            Self::Explicit => "explicit",
        }
    }
}

/// One recorded precondition
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Assumption {
    pub subject:     String,
    pub description: String,
    pub origin:      AssumptionOrigin,
}

/// Assumption placed on a subject that was declared must-stay-free
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoverageReduction {
    pub subject:     String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct AssumptionLedger {
    entries:    Vec<Assumption>,
    seen:       BTreeSet<Assumption>,
    free:       BTreeSet<String>,
    reductions: Vec<CoverageReduction>,
}

impl AssumptionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that no assumption may be placed on `subject`
    pub fn declare_free(&mut self, subject: impl Into<String>) {
        self.free.insert(subject.into());
    }

    pub fn is_free(&self, subject: &str) -> bool {
        self.free.contains(subject)
    }

    /// Record an assumption. Duplicates are kept once.
    pub fn record(
        &mut self,
        subject: impl Into<String>,
        description: impl Into<String>,
        origin: AssumptionOrigin,
    ) {
        let assumption = Assumption {
            subject: subject.into(),
            description: description.into(),
            origin,
        };
        if !self.seen.insert(assumption.clone()) {
            return;
        }
        if self.free.contains(&assumption.subject) {
            self.reductions.push(CoverageReduction {
                subject: assumption.subject.clone(),
                description: assumption.description.clone(),
            });
        }
        self.entries.push(assumption);
    }

    pub fn entries(&self) -> &[Assumption] {
        &self.entries
    }

    pub fn reductions(&self) -> &[CoverageReduction] {
        &self.reductions
    }

    pub fn free_subjects(&self) -> impl Iterator<Item = &str> {
        self.free.iter().map(String::as_str)
    }

    /// Number of distinct preconditions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fold another run's ledger into this one
    pub fn merge(&mut self, other: &Self) {
        for subject in &other.free {
            self.free.insert(subject.clone());
        }
        for entry in &other.entries {
            self.record(entry.subject.clone(), entry.description.clone(), entry.origin);
        }
    }
}
