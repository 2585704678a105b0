// UPROOF - uproof-foundation
// Module: Proof Context
// SW-REQ-ID: REQ_VERIFY_001
// SW-REQ-ID: REQ_MEM_SAFETY_001
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! State of one harness run.
//!
//! A [`ProofContext`] ties together the nondeterminism source, the symbolic
//! heap, the assumption ledger, the stub-call log and the coverage points hit
//! so far. Harnesses and target models receive it as `&mut` and thread every
//! choice, assumption and memory access through it. It is created fresh for
//! every explored path and consumed by [`ProofContext::finish`].

use core::fmt;
use std::collections::BTreeSet;

use uproof_error::{Error, Violation};

use crate::{
    assume::{AssumptionLedger, AssumptionOrigin},
    heap::{Contents, Loaded, Nullability, Ptr, SymbolicHeap, Value},
    layout::{FieldDef, FieldKind, StructLayout},
    source::SymbolicSource,
    stub::{StubCall, StubCx},
    symbolic::{Domain, Scalar, Symbolic},
};

/// Why a run stopped before the harness returned normally
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Halt {
    /// Memory-safety violation; the proof fails
    Violation(Violation),
    /// An assumption did not hold; the path is vacuous
    Pruned { assumption: String },
    /// More choice points than the exploration depth allows
    DepthExceeded { limit: usize },
    /// A bounded loop or shape needs more iterations than the unwind limit
    UnwindExceeded { site: String, limit: usize },
    /// Replay asked for a choice the source cannot provide
    Diverged { point: String },
    /// Harness or layout misuse
    Fault(Error),
}

impl Halt {
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Self::Violation(violation) => Some(violation),
            _ => None,
        }
    }

    pub fn is_pruned(&self) -> bool {
        matches!(self, Self::Pruned { .. })
    }

    /// Stopped by an exploration limit rather than by the program
    pub fn is_bound(&self) -> bool {
        matches!(self, Self::DepthExceeded { .. } | Self::UnwindExceeded { .. })
    }
}

impl From<Violation> for Halt {
    fn from(violation: Violation) -> Self {
        Self::Violation(violation)
    }
}

impl From<Error> for Halt {
    fn from(error: Error) -> Self {
        Self::Fault(error)
    }
}

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Violation(violation) => write!(f, "{violation}"),
            Self::Pruned { assumption } => write!(f, "assumption failed: {assumption}"),
            Self::DepthExceeded { limit } => write!(f, "more than {limit} choice points"),
            Self::UnwindExceeded { site, limit } => {
                write!(f, "{site} needs more than {limit} iterations")
            },
            Self::Diverged { point } => write!(f, "replay diverged at {point}"),
            Self::Fault(error) => write!(f, "{error}"),
        }
    }
}

/// Everything a finished run leaves behind
#[derive(Debug, Clone, Default)]
pub struct RunArtifacts {
    pub heap:       SymbolicHeap,
    pub ledger:     AssumptionLedger,
    pub coverage:   BTreeSet<&'static str>,
    pub stub_calls: Vec<StubCall>,
}

pub struct ProofContext<'s> {
    source:     &'s mut dyn SymbolicSource,
    heap:       SymbolicHeap,
    ledger:     AssumptionLedger,
    coverage:   BTreeSet<&'static str>,
    stub_calls: Vec<StubCall>,
    unwind:     usize,
}

impl fmt::Debug for ProofContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProofContext")
            .field("allocations", &self.heap.len())
            .field("assumptions", &self.ledger.len())
            .field("coverage", &self.coverage)
            .field("unwind", &self.unwind)
            .finish_non_exhaustive()
    }
}

impl<'s> ProofContext<'s> {
    pub fn new(source: &'s mut dyn SymbolicSource, unwind: usize) -> Self {
        Self {
            source,
            heap: SymbolicHeap::new(),
            ledger: AssumptionLedger::new(),
            coverage: BTreeSet::new(),
            stub_calls: Vec::new(),
            unwind,
        }
    }

    /// Draw a value for `symbol`, recording its domain and constraints.
    pub fn draw<T: Scalar>(&mut self, symbol: &Symbolic<T>) -> Result<T, Halt> {
        let name = symbol.name();
        if symbol.is_must_stay_free() {
            self.ledger.declare_free(name);
        }
        if let Some(text) = symbol.domain().describe(name, T::MAX_BITS) {
            self.ledger.record(name, text, AssumptionOrigin::Domain);
        }
        let value = T::from_bits(self.source.choose(name, symbol.domain())?);
        for constraint in symbol.constraints() {
            self.assume_as(
                (constraint.predicate)(value),
                name,
                constraint.label,
                AssumptionOrigin::Constraint,
            )?;
        }
        Ok(value)
    }

    /// Mark `subject` as a value no assumption may narrow
    pub fn declare_free(&mut self, subject: &str) {
        self.ledger.declare_free(subject);
    }

    /// Unconstrained value of type `T`
    pub fn any<T: Scalar>(&mut self, name: &str) -> Result<T, Halt> {
        let bits = self.source.choose(name, &Domain::full::<T>())?;
        Ok(T::from_bits(bits))
    }

    /// Pointer argument the harness does not model: `NULL` or wild
    pub fn any_ptr(&mut self, name: &str) -> Result<Ptr, Halt> {
        let is_null: bool = self.any(name)?;
        Ok(if is_null { Ptr::Null } else { Ptr::Wild })
    }

    /// Nondeterministic index in `0..count`
    pub fn choose(&mut self, name: &str, count: usize) -> Result<usize, Halt> {
        if count == 0 {
            return Err(Halt::Fault(Error::EMPTY_DOMAIN));
        }
        let bits = self.source.choose(name, &Domain::range(0usize, count - 1))?;
        Ok(usize::from_bits(bits))
    }

    /// Assume `holds`; the path is pruned when it does not.
    pub fn assume(&mut self, holds: bool, subject: &str, description: &str) -> Result<(), Halt> {
        self.assume_as(holds, subject, description, AssumptionOrigin::Explicit)
    }

    pub(crate) fn assume_as(
        &mut self,
        holds: bool,
        subject: &str,
        description: &str,
        origin: AssumptionOrigin,
    ) -> Result<(), Halt> {
        self.ledger.record(subject, description, origin);
        self.source.assume(holds);
        if holds {
            Ok(())
        } else {
            Err(Halt::Pruned {
                assumption: format!("{subject}: {description}"),
            })
        }
    }

    /// `malloc(len)` with a symbolic `len >= sizeof(layout)`.
    ///
    /// The length is drawn from choice point `{site}_len`, the outcome from
    /// `{site}_allocated`. With [`Nullability::NonNull`] the failed outcome
    /// is pruned and `ptr != NULL` recorded.
    pub fn alloc_at_least(
        &mut self,
        site: &str,
        layout: &'static StructLayout,
        nullability: Nullability,
    ) -> Result<Ptr, Halt> {
        let len = Symbolic::at_least(format!("{site}_len"), layout.size);
        self.alloc_with(site, layout, Some(&len), nullability, Contents::Havoc)
    }

    /// `malloc(sizeof(layout))`
    pub fn alloc_exact(
        &mut self,
        site: &str,
        layout: &'static StructLayout,
        nullability: Nullability,
    ) -> Result<Ptr, Halt> {
        self.alloc_with(site, layout, None, nullability, Contents::Havoc)
    }

    /// General allocation. Without a length symbol the block is exactly
    /// `layout.size` bytes.
    pub fn alloc_with(
        &mut self,
        site: &str,
        layout: &'static StructLayout,
        len: Option<&Symbolic<usize>>,
        nullability: Nullability,
        contents: Contents,
    ) -> Result<Ptr, Halt> {
        let len = match len {
            Some(symbol) => {
                let len = self.draw(symbol)?;
                // a domain starting at or above the size already implies the bound
                if symbol.domain().min().is_none_or(|min| min < layout.size as u64) {
                    self.assume_as(
                        len >= layout.size,
                        symbol.name(),
                        &format!("{} >= sizeof({})", symbol.name(), layout.name),
                        AssumptionOrigin::AllocationSize,
                    )?;
                }
                len
            },
            None => layout.size,
        };
        let allocated: bool = self.any(&format!("{site}_allocated"))?;
        if nullability == Nullability::NonNull {
            self.assume_as(allocated, site, &format!("{site} != NULL"), AssumptionOrigin::NonNull)?;
        }
        if !allocated {
            return Ok(Ptr::Null);
        }
        Ok(self.heap.allocate(site, layout, len, contents))
    }

    /// Load a pointer field. Nondeterministic memory yields either `NULL` or a
    /// wild pointer (choice point `{object}->{field}`), and the choice is
    /// written back so later loads agree.
    pub fn load_ptr(&mut self, base: Ptr, field: &FieldDef, site: &'static str) -> Result<Ptr, Halt> {
        if field.kind != FieldKind::Pointer {
            return Err(Halt::Fault(Error::layout_mismatch("Field is not a pointer")));
        }
        match self.heap.load(base, field, site)? {
            Loaded::Value(value) => Ok(value.as_ptr()),
            Loaded::Havoc => {
                let point = self.havoc_point(base, field);
                let is_null: bool = self.any(&point)?;
                let ptr = if is_null { Ptr::Null } else { Ptr::Wild };
                self.heap.store(base, field, Value::Pointer(ptr), site)?;
                Ok(ptr)
            },
        }
    }

    /// Load a scalar field; nondeterministic memory yields any value of the
    /// field's width and is written back.
    pub fn load_scalar(&mut self, base: Ptr, field: &FieldDef, site: &'static str) -> Result<u64, Halt> {
        let FieldKind::Scalar { width } = field.kind else {
            return Err(Halt::Fault(Error::layout_mismatch("Field is not a scalar")));
        };
        match self.heap.load(base, field, site)? {
            Loaded::Value(Value::Scalar(bits)) => Ok(bits),
            Loaded::Value(Value::Pointer(_)) => {
                Err(Halt::Fault(Error::layout_mismatch("Scalar load of a stored pointer")))
            },
            Loaded::Havoc => {
                let max = if width >= 8 { u64::MAX } else { (1u64 << (width * 8)) - 1 };
                let point = self.havoc_point(base, field);
                let bits = self.source.choose(&point, &Domain::Range { min: 0, max })?;
                self.heap.store(base, field, Value::Scalar(bits), site)?;
                Ok(bits)
            },
        }
    }

    pub fn store_ptr(
        &mut self,
        base: Ptr,
        field: &FieldDef,
        value: Ptr,
        site: &'static str,
    ) -> Result<(), Halt> {
        self.heap.store(base, field, Value::Pointer(value), site)
    }

    pub fn store_scalar(
        &mut self,
        base: Ptr,
        field: &FieldDef,
        value: u64,
        site: &'static str,
    ) -> Result<(), Halt> {
        self.heap.store(base, field, Value::Scalar(value), site)
    }

    fn havoc_point(&self, base: Ptr, field: &FieldDef) -> String {
        let object = base
            .object()
            .and_then(|id| self.heap.allocation(id))
            .map_or("?", |allocation| allocation.site());
        format!("{object}->{}", field.name)
    }

    /// Mark a coverage point as reached
    pub fn cover(&mut self, point: &'static str) {
        self.coverage.insert(point);
    }

    /// Stub-side view of this context: nondeterminism and the call log, but
    /// no heap.
    pub fn stubs(&mut self) -> StubCx<'_> {
        StubCx::new(&mut *self.source, &mut self.stub_calls)
    }

    pub fn heap(&self) -> &SymbolicHeap {
        &self.heap
    }

    pub fn ledger(&self) -> &AssumptionLedger {
        &self.ledger
    }

    pub fn coverage(&self) -> &BTreeSet<&'static str> {
        &self.coverage
    }

    pub fn stub_calls(&self) -> &[StubCall] {
        &self.stub_calls
    }

    /// Loop bound for shapes and traversals
    pub fn unwind(&self) -> usize {
        self.unwind
    }

    pub(crate) fn record_assumption(&mut self, subject: &str, description: &str, origin: AssumptionOrigin) {
        self.ledger.record(subject, description, origin);
    }

    pub fn finish(self) -> RunArtifacts {
        RunArtifacts {
            heap:       self.heap,
            ledger:     self.ledger,
            coverage:   self.coverage,
            stub_calls: self.stub_calls,
        }
    }
}
