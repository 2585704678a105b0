// UPROOF - uproof-foundation
// Module: Structure Layouts
// SW-REQ-ID: REQ_MEM_SAFETY_001
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Byte layouts of the C structures a harness allocates.
//!
//! Layouts are plain `static` data: a name, a size, an alignment and the
//! fields with their offsets. The symbolic heap uses them to bounds-check
//! every field access, so a layout must describe the target ABI (LP64 here).

use uproof_error::{Error, Result};

/// Width of a data pointer in bytes
pub const POINTER_WIDTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Data or function pointer
    Pointer,
    /// Unsigned integer of the given width
    Scalar { width: usize },
    /// Embedded structure; only its address can be taken
    Struct(&'static StructLayout),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name:   &'static str,
    pub offset: usize,
    pub kind:   FieldKind,
}

impl FieldDef {
    pub const fn pointer(name: &'static str, offset: usize) -> Self {
        Self {
            name,
            offset,
            kind: FieldKind::Pointer,
        }
    }

    pub const fn scalar(name: &'static str, offset: usize, width: usize) -> Self {
        Self {
            name,
            offset,
            kind: FieldKind::Scalar { width },
        }
    }

    pub const fn nested(name: &'static str, offset: usize, layout: &'static StructLayout) -> Self {
        Self {
            name,
            offset,
            kind: FieldKind::Struct(layout),
        }
    }

    /// Size of the field in bytes
    pub const fn width(&self) -> usize {
        match self.kind {
            FieldKind::Pointer => POINTER_WIDTH,
            FieldKind::Scalar { width } => width,
            FieldKind::Struct(layout) => layout.size,
        }
    }

    /// One past the last byte of the field
    pub const fn end(&self) -> usize {
        self.offset + self.width()
    }

    /// Same field shifted by the offset of an enclosing member
    pub const fn within(&self, base: usize) -> Self {
        Self {
            name:   self.name,
            offset: base + self.offset,
            kind:   self.kind,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct StructLayout {
    pub name:   &'static str,
    pub size:   usize,
    pub align:  usize,
    pub fields: &'static [FieldDef],
}

impl StructLayout {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Reject layouts whose fields overlap or leave the structure.
    pub fn validate(&self) -> Result<()> {
        if self.align == 0 || !self.align.is_power_of_two() {
            return Err(Error::invalid_layout("Alignment must be a power of two"));
        }
        if self.size % self.align != 0 {
            return Err(Error::invalid_layout("Size must be a multiple of the alignment"));
        }
        let mut spans: Vec<(usize, usize)> = Vec::with_capacity(self.fields.len());
        for field in self.fields {
            if field.width() == 0 || field.end() > self.size {
                return Err(Error::invalid_layout("Field lies outside the structure"));
            }
            spans.push((field.offset, field.end()));
        }
        spans.sort_unstable();
        if spans.windows(2).any(|pair| pair[0].1 > pair[1].0) {
            return Err(Error::invalid_layout("Fields overlap"));
        }
        Ok(())
    }
}
