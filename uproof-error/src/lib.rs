// UPROOF - uproof-error
// Module: UPROOF Error Handling
// SW-REQ-ID: REQ_004
// SW-REQ-ID: REQ_ERROR_001
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! UPROOF error handling library
//!
//! This library provides the error handling system shared by the UPROOF
//! crates. Two very different things can go wrong while checking a proof
//! harness, and they are kept apart on purpose:
//!
//! - **Infrastructure errors** ([`Error`]): a bad configuration, an unknown
//!   harness, a misused layout. These abort the tool or end a proof as an
//!   error.
//! - **Memory-safety violations** ([`Violation`]): the harnessed function
//!   dereferenced null, read past the end of a block, and so on. These are
//!   proof *results* and end up in a counterexample.
//!
//! # Error Categories
//!
//! ## Memory Errors (4000-4199)
//! - Null dereference, invalid pointer, out-of-bounds access
//! - Uninitialized reads
//! - Layout mismatches and invalid layouts
//!
//! ## Validation Errors (5000-5099)
//! - Invalid suite configuration
//! - Unknown harness names
//!
//! ## Verification Errors (7000-7099)
//! - Failed proofs
//! - Exploration bounds reached
//! - Vacuous proofs and diverged replays
//!
//! # Usage
//!
//! ```
//! use uproof_error::{codes, kinds::ViolationKind, Error, ErrorCategory};
//!
//! let error = Error::new(
//!     ErrorCategory::Validation,
//!     codes::UNKNOWN_HARNESS,
//!     "No harness registered under this name",
//! );
//! assert!(error.is_validation_error());
//!
//! assert_eq!(ViolationKind::NullDereference.code(), codes::NULL_DEREFERENCE);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

/// Error codes for uproof
pub mod codes;
/// Error and error handling types
pub mod errors;
/// Memory-safety violation kinds
pub mod kinds;

pub mod prelude;

#[cfg(kani)]
mod verify;

// Re-export key types
pub use errors::{Error, ErrorCategory};
pub use kinds::{AccessKind, Violation, ViolationKind};

/// A specialized `Result` type for UPROOF operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error conversion trait for converting between error types
///
/// This trait provides a standardized way to convert foreign error types into
/// the UPROOF error type across crates.
pub trait FromError<E> {
    /// Convert from the source error type to the target error type
    fn from_error(error: E) -> Self;
}

/// Trait for types that can be mapped onto an [`ErrorCategory`]
pub trait ToErrorCategory {
    /// Convert the error to a specific category
    fn to_category(&self) -> ErrorCategory;
}
