// UPROOF - uproof-foundation
// SW-REQ-ID: REQ_VERIFY_001
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Building blocks for bounded-model-checking proof harnesses.
//!
//! A harness checks one function for memory safety. It declares symbolic
//! inputs, records the assumptions it makes about them, allocates the
//! structures the function needs with symbolic sizes, replaces the function's
//! dependencies by nondeterministic stubs and calls the function once. This
//! crate provides each of those steps:
//!
//! - [`symbolic`]: nondeterministic scalars with declared domains
//! - [`source`]: where values come from (explorer, scripted replay, Kani)
//! - [`assume`]: the assumption ledger
//! - [`layout`] and [`heap`]: structure layouts and the checked symbolic heap
//! - [`context`]: the per-run [`ProofContext`] and allocation wrapper
//! - [`stub`]: stub descriptors and the heap-less stub context
//! - [`shape`]: well-formed linked structures
//! - [`harness`]: the [`Harness`] trait
//! - [`explore`] and [`report`]: bounded exploration and its results
//!
//! # Feature Flags
//!
//! - `std`: standard library support (default)
//! - `tracing`: structured logging of exploration (default)
//! - `kani`: Kani proofs and the `KaniSource` backend

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod assume;
pub mod context;
pub mod explore;
pub mod harness;
pub mod heap;
pub mod layout;
pub mod report;
pub mod shape;
pub mod source;
pub mod stub;
pub mod symbolic;
pub mod trace;

#[cfg(kani)]
mod verify;

// Re-export error related types for convenience
pub use uproof_error::{codes, kinds, Error, ErrorCategory, Result};

pub use crate::{
    assume::{Assumption, AssumptionLedger, AssumptionOrigin, CoverageReduction},
    context::{Halt, ProofContext, RunArtifacts},
    explore::{ExplorationConfig, Explorer, Replay},
    harness::{Harness, HarnessRegistry},
    heap::{AllocId, Allocation, Contents, ListDefect, Loaded, Nullability, Ptr, SymbolicHeap, Value},
    layout::{FieldDef, FieldKind, StructLayout, POINTER_WIDTH},
    report::{
        Assignment, Counterexample, CoverageReport, ExplorationStats, ProofOutcome, ProofReport,
    },
    shape::{ListShape, ShapeBuilder},
    source::{ChoiceRecord, ExhaustiveSource, ScriptedSource, SymbolicSource},
    stub::{ReturnModel, StubCall, StubCx, StubDescriptor, StubRegistry},
    symbolic::{Domain, Scalar, Symbolic},
};

/// Version of the foundation crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
