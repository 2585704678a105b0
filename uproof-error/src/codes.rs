// UPROOF - uproof-error
// Module: UPROOF Error Codes
// SW-REQ-ID: REQ_004
// SW-REQ-ID: REQ_ERROR_001
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Error codes for UPROOF

// Memory-safety error codes (4000-4099)
/// Dereference of a null pointer
pub const NULL_DEREFERENCE: u16 = 4000;
/// Dereference of a pointer that does not point into a live allocation
pub const INVALID_POINTER: u16 = 4001;
/// Access outside the bounds of the pointed-to allocation
pub const OUT_OF_BOUNDS: u16 = 4002;
/// Read of memory that was never written
pub const UNINITIALIZED_READ: u16 = 4003;

// Symbolic heap error codes (4100-4199)
/// Field is not part of the accessed layout or cannot be loaded as a value
pub const LAYOUT_MISMATCH: u16 = 4101;
/// Layout declares overlapping or out-of-range fields
pub const INVALID_LAYOUT: u16 = 4102;

// Validation error codes (5000-5099)
/// Invalid suite configuration
pub const INVALID_CONFIG: u16 = 5000;
/// No harness registered under the requested name
pub const UNKNOWN_HARNESS: u16 = 5001;
/// Symbolic domain is empty
pub const EMPTY_DOMAIN: u16 = 5003;

// Verification error codes (7000-7099)
/// A proof found at least one violation
pub const VERIFICATION_FAILED: u16 = 7000;
/// Exploration stopped at a configured bound
pub const EXPLORATION_BOUND_REACHED: u16 = 7001;
/// Every explored path was pruned by an assumption
pub const VACUOUS_PROOF: u16 = 7002;
/// A replayed choice did not match the recorded choice tree
pub const REPLAY_DIVERGED: u16 = 7003;
