// UPROOF - uproof-foundation
// Module: Foundation Verification
// SW-REQ-ID: REQ_VERIFY_005
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Kani proofs for the symbolic heap and allocation wrapper.
//!
//! Run with `cargo kani -p uproof-foundation`.

use crate::{
    context::{Halt, ProofContext},
    heap::{Contents, Nullability, SymbolicHeap},
    layout::{FieldDef, StructLayout},
    source::KaniSource,
    symbolic::{Domain, Symbolic},
};

static PAIR_FIELDS: [FieldDef; 2] = [FieldDef::pointer("first", 0), FieldDef::pointer("second", 8)];
static PAIR: StructLayout = StructLayout {
    name:   "pair_t",
    size:   16,
    align:  8,
    fields: &PAIR_FIELDS,
};

/// Any block at least as large as the layout admits every field access
#[kani::proof]
fn verify_fields_in_bounds_of_sufficient_block() {
    let len = kani::any_where(|len: &usize| *len >= PAIR.size && *len < 1 << 20);
    let mut heap = SymbolicHeap::new();
    let ptr = heap.allocate("pair", &PAIR, len, Contents::Havoc);
    for field in &PAIR_FIELDS {
        assert!(heap.load(ptr, field, "verify").is_ok());
    }
}

/// A block shorter than the layout faults on its last field
#[kani::proof]
fn verify_short_block_is_out_of_bounds() {
    let len = kani::any_where(|len: &usize| *len < PAIR.size);
    let mut heap = SymbolicHeap::new();
    let ptr = heap.allocate("pair", &PAIR, len, Contents::Havoc);
    assert!(matches!(
        heap.load(ptr, &PAIR_FIELDS[1], "verify"),
        Err(Halt::Violation(_))
    ));
}

/// The allocation wrapper never hands out a non-null block below the size
#[kani::proof]
#[kani::unwind(4)]
fn verify_alloc_at_least_respects_size() {
    let mut source = KaniSource;
    let mut cx = ProofContext::new(&mut source, 2);
    if let Ok(ptr) = cx.alloc_at_least("pair", &PAIR, Nullability::MayFail) {
        if let Some(id) = ptr.object() {
            let len = cx.heap().allocation(id).map_or(0, |allocation| allocation.len());
            assert!(len >= PAIR.size);
        }
    }
}

/// Range membership agrees with the bounds
#[kani::proof]
fn verify_range_contains() {
    let min: u32 = kani::any();
    let max: u32 = kani::any();
    let value: u32 = kani::any();
    let domain = Domain::range(min, max);
    assert_eq!(
        domain.contains(u64::from(value)),
        min <= max && min <= value && value <= max
    );
    let _ = Symbolic::<u32>::with_domain("value", domain);
}
