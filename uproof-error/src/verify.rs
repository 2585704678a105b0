// UPROOF - uproof-error
// Module: UPROOF Error Verification
// SW-REQ-ID: REQ_004
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Formal verification for the error taxonomy using Kani.
//!
//! These proofs only run with `cargo kani`.

use crate::{
    kinds::{AccessKind, Violation, ViolationKind},
    Error,
    ErrorCategory,
};

/// Every violation code maps back to exactly the kind it came from
#[kani::proof]
fn verify_violation_codes_are_injective() {
    let index: usize = kani::any();
    kani::assume(index < ViolationKind::ALL.len());
    let kind = ViolationKind::ALL[index];
    assert_eq!(ViolationKind::from_code(kind.code()), Some(kind));
}

/// Converting any violation yields a memory-category error flagged as a violation
#[kani::proof]
fn verify_violation_conversion_category() {
    let index: usize = kani::any();
    kani::assume(index < ViolationKind::ALL.len());
    let offset: usize = kani::any();
    let width: usize = kani::any();
    let violation = Violation::detached(
        ViolationKind::ALL[index],
        AccessKind::Read,
        "site",
        "field",
        offset,
        width,
    );
    let error = Error::from(violation);
    assert_eq!(error.category, ErrorCategory::Memory);
    assert!(error.is_violation());
}
