// UPROOF - uproof-error
// Module: UPROOF Error Prelude
// SW-REQ-ID: REQ_004
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Prelude module for uproof-error
//!
//! Re-exports the error types and traits most modules need so that dependent
//! crates can pull them in with a single glob import.

pub use crate::{
    codes,
    errors::{Error, ErrorCategory},
    kinds::{AccessKind, Violation, ViolationKind},
    FromError,
    Result,
    ToErrorCategory,
};
