// UPROOF - uproof-error
// Module: Memory-Safety Violation Kinds
// SW-REQ-ID: REQ_004
//
// Copyright (c) 2024 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Memory-safety violations detected while executing a harnessed function.
//!
//! A [`Violation`] is what a proof fails *with*. It records which check
//! tripped, where the access happened and what memory it touched, without
//! depending on the symbolic heap types so that it can be shared by every
//! crate in the workspace.

use core::fmt;

use crate::codes;

/// The memory-safety check that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ViolationKind {
    /// Load or store through a null pointer
    NullDereference,
    /// Load or store through a pointer that does not designate a live object
    InvalidPointer,
    /// Access that extends past the end of the designated object
    OutOfBounds,
    /// Load of bytes that were never written
    UninitializedRead,
}

impl ViolationKind {
    /// All kinds, in code order
    pub const ALL: [Self; 4] = [
        Self::NullDereference,
        Self::InvalidPointer,
        Self::OutOfBounds,
        Self::UninitializedRead,
    ];

    /// Numeric error code of this kind
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::NullDereference => codes::NULL_DEREFERENCE,
            Self::InvalidPointer => codes::INVALID_POINTER,
            Self::OutOfBounds => codes::OUT_OF_BOUNDS,
            Self::UninitializedRead => codes::UNINITIALIZED_READ,
        }
    }

    /// Look a kind up by its error code
    #[must_use]
    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            codes::NULL_DEREFERENCE => Some(Self::NullDereference),
            codes::INVALID_POINTER => Some(Self::InvalidPointer),
            codes::OUT_OF_BOUNDS => Some(Self::OutOfBounds),
            codes::UNINITIALIZED_READ => Some(Self::UninitializedRead),
            _ => None,
        }
    }

    /// Stable identifier used in reports and metrics
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NullDereference => "null-dereference",
            Self::InvalidPointer => "invalid-pointer",
            Self::OutOfBounds => "out-of-bounds",
            Self::UninitializedRead => "uninitialized-read",
        }
    }

    /// One-line description
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::NullDereference => "Dereference of a null pointer",
            Self::InvalidPointer => "Dereference of a pointer outside any live object",
            Self::OutOfBounds => "Memory access out of object bounds",
            Self::UninitializedRead => "Read of uninitialized memory",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a memory access
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccessKind {
    /// Load
    Read,
    /// Store
    Write,
}

impl AccessKind {
    /// Lower-case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

/// A single memory-safety violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Violation {
    /// Which check failed
    pub kind:      ViolationKind,
    /// Load or store
    pub access:    AccessKind,
    /// Function performing the access
    pub site:      &'static str,
    /// Field being accessed
    pub field:     &'static str,
    /// Allocation the pointer designates, if any
    pub object:    Option<usize>,
    /// Byte offset of the access within the object
    pub offset:    usize,
    /// Width of the access in bytes
    pub width:     usize,
    /// Length of the designated object, if any
    pub block_len: Option<usize>,
}

impl Violation {
    /// Violation that does not involve a live object (null or wild pointers)
    #[must_use]
    pub const fn detached(
        kind: ViolationKind,
        access: AccessKind,
        site: &'static str,
        field: &'static str,
        offset: usize,
        width: usize,
    ) -> Self {
        Self {
            kind,
            access,
            site,
            field,
            object: None,
            offset,
            width,
            block_len: None,
        }
    }

    /// Identity used to deduplicate counterexamples: same check, same place
    #[must_use]
    pub const fn key(&self) -> (ViolationKind, &'static str, &'static str) {
        (self.kind, self.site, self.field)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {} of `{}` in {} (offset {}, width {}",
            self.kind,
            self.access.as_str(),
            self.field,
            self.site,
            self.offset,
            self.width
        )?;
        match (self.object, self.block_len) {
            (Some(object), Some(len)) => write!(f, ", object #{object} of {len} bytes)"),
            _ => f.write_str(")"),
        }
    }
}
