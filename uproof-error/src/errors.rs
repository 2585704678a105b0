// UPROOF - uproof-error
// Module: UPROOF Error Types
// SW-REQ-ID: REQ_004
// SW-REQ-ID: REQ_ERROR_001
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Unified infrastructure error type for UPROOF.

use core::fmt;

use crate::{
    codes,
    kinds::{Violation, ViolationKind},
    FromError,
    ToErrorCategory,
};

/// `Error` categories for UPROOF operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum ErrorCategory {
    /// Core library errors
    Core         = 1,
    /// Memory-safety and symbolic heap errors
    Memory       = 4,
    /// Validation errors (configuration, arguments)
    Validation   = 5,
    /// Harness definition errors
    Harness      = 6,
    /// Verification outcome errors
    Verification = 7,
}

impl ErrorCategory {
    /// Human readable name of the category
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Memory => "memory",
            Self::Validation => "validation",
            Self::Harness => "harness",
            Self::Verification => "verification",
        }
    }
}

/// UPROOF `Error` type
///
/// Categorized error with a numeric code and a static message. The type is
/// `Copy` so it can travel through `no_std` code and Kani proofs unchanged.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Error {
    /// `Error` category
    pub category: ErrorCategory,
    /// `Error` code
    pub code:     u16,
    /// `Error` message
    pub message:  &'static str,
}

impl Error {
    /// Every explored path was pruned by an assumption
    pub const VACUOUS_PROOF: Self = Self::new(
        ErrorCategory::Verification,
        codes::VACUOUS_PROOF,
        "All explored paths violate the harness assumptions",
    );
    /// A replayed choice did not match the recorded choice tree
    pub const REPLAY_DIVERGED: Self = Self::new(
        ErrorCategory::Verification,
        codes::REPLAY_DIVERGED,
        "Harness made different choices when replayed",
    );
    /// Empty symbolic domain
    pub const EMPTY_DOMAIN: Self = Self::new(
        ErrorCategory::Validation,
        codes::EMPTY_DOMAIN,
        "Symbolic domain contains no values",
    );

    /// Create a new error.
    #[must_use]
    pub const fn new(category: ErrorCategory, code: u16, message: &'static str) -> Self {
        Self {
            category,
            code,
            message,
        }
    }

    /// Create a configuration validation error
    #[must_use]
    pub const fn invalid_config(message: &'static str) -> Self {
        Self::new(ErrorCategory::Validation, codes::INVALID_CONFIG, message)
    }

    /// Create an unknown harness error
    #[must_use]
    pub const fn unknown_harness(message: &'static str) -> Self {
        Self::new(ErrorCategory::Validation, codes::UNKNOWN_HARNESS, message)
    }

    /// Create a layout mismatch error
    #[must_use]
    pub const fn layout_mismatch(message: &'static str) -> Self {
        Self::new(ErrorCategory::Memory, codes::LAYOUT_MISMATCH, message)
    }

    /// Create an invalid layout error
    #[must_use]
    pub const fn invalid_layout(message: &'static str) -> Self {
        Self::new(ErrorCategory::Memory, codes::INVALID_LAYOUT, message)
    }

    /// Create a verification failure error
    #[must_use]
    pub const fn verification_failed(message: &'static str) -> Self {
        Self::new(ErrorCategory::Verification, codes::VERIFICATION_FAILED, message)
    }

    /// Create an exploration-bound error
    #[must_use]
    pub const fn bound_reached(message: &'static str) -> Self {
        Self::new(
            ErrorCategory::Verification,
            codes::EXPLORATION_BOUND_REACHED,
            message,
        )
    }

    /// Check if this is a memory error
    #[must_use]
    pub fn is_memory_error(&self) -> bool {
        self.category == ErrorCategory::Memory
    }

    /// Check if this is a validation error
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        self.category == ErrorCategory::Validation
    }

    /// Check if this is a verification error
    #[must_use]
    pub fn is_verification_error(&self) -> bool {
        self.category == ErrorCategory::Verification
    }

    /// Check if this error was produced from a memory-safety violation
    #[must_use]
    pub fn is_violation(&self) -> bool {
        ViolationKind::from_code(self.code).is_some()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}][E{:04}] {}", self.category.as_str(), self.code, self.message)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl ToErrorCategory for Error {
    fn to_category(&self) -> ErrorCategory {
        self.category
    }
}

impl FromError<Self> for Error {
    fn from_error(error: Self) -> Self {
        error
    }
}

impl From<Violation> for Error {
    fn from(violation: Violation) -> Self {
        Self::new(
            ErrorCategory::Memory,
            violation.kind.code(),
            violation.kind.description(),
        )
    }
}

impl From<ViolationKind> for Error {
    fn from(kind: ViolationKind) -> Self {
        Self::new(ErrorCategory::Memory, kind.code(), kind.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category_and_code() {
        let error = Error::unknown_harness("missing");
        #[cfg(feature = "std")]
        {
            let text = std::format!("{error}");
            assert_eq!(text, "[validation][E5001] missing");
        }
        assert_eq!(error.to_category(), ErrorCategory::Validation);
    }

    #[test]
    fn violation_converts_to_memory_error() {
        let error: Error = ViolationKind::OutOfBounds.into();
        assert!(error.is_memory_error());
        assert!(error.is_violation());
        assert_eq!(error.code, codes::OUT_OF_BOUNDS);
        assert!(!Error::invalid_config("x").is_violation());
    }
}
