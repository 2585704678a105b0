// UPROOF - uproof-foundation
// Module: Symbolic Heap
// SW-REQ-ID: REQ_MEM_SAFETY_001
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Arena of allocations made during one harness run.
//!
//! Every allocation is keyed by the site that requested it and carries its
//! length, layout and content policy. Memory is tracked per field-sized cell
//! rather than per byte: a store writes a cell, a load of exactly that cell
//! returns the stored value, and anything else falls back to the content
//! policy of the block. Every access is checked, which is where null
//! dereferences, wild pointers, out-of-bounds accesses and uninitialized reads
//! are detected.
//!
//! The heap is owned by a single run and dropped with it. Nothing is ever
//! freed.

use core::fmt;
use std::collections::{BTreeMap, BTreeSet};

use uproof_error::{AccessKind, Error, Violation, ViolationKind};

use crate::{
    context::Halt,
    layout::{FieldDef, FieldKind, StructLayout},
};

/// Index of an allocation in its heap
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AllocId(pub usize);

/// Symbolic pointer value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Ptr {
    Null,
    /// Unconstrained garbage, e.g. read from nondeterministic memory
    Wild,
    /// Points `offset` bytes into a live allocation
    Object { alloc: AllocId, offset: usize },
    /// Address of a named function; never dereferenceable as data
    Function(&'static str),
}

impl Ptr {
    pub const fn is_null(self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn object(self) -> Option<AllocId> {
        match self {
            Self::Object { alloc, .. } => Some(alloc),
            _ => None,
        }
    }

    /// Pointer arithmetic; only object pointers move
    pub const fn offset_by(self, delta: usize) -> Self {
        match self {
            Self::Object { alloc, offset } => Self::Object {
                alloc,
                offset: offset.wrapping_add(delta),
            },
            other => other,
        }
    }

    /// Address of `field` inside the object this pointer designates
    pub const fn field_address(self, field: &FieldDef) -> Self {
        self.offset_by(field.offset)
    }
}

impl fmt::Display for Ptr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Wild => f.write_str("<wild>"),
            Self::Object { alloc, offset: 0 } => write!(f, "#{}", alloc.0),
            Self::Object { alloc, offset } => write!(f, "#{}+{}", alloc.0, offset),
            Self::Function(name) => write!(f, "&{name}"),
        }
    }
}

/// Initial contents of a fresh allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Contents {
    /// Every byte nondeterministic (model-checker `malloc` semantics)
    #[default]
    Havoc,
    /// Reads before writes are violations
    Uninit,
    /// Every byte zero (`calloc`)
    Zeroed,
}

/// Whether an allocation site may return `NULL`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nullability {
    /// The harness assumes the allocation succeeds
    NonNull,
    /// Both the null and the non-null outcome are explored
    MayFail,
}

/// Value stored in a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Pointer(Ptr),
    Scalar(u64),
}

impl Value {
    /// Interpret the value as a pointer
    pub const fn as_ptr(self) -> Ptr {
        match self {
            Self::Pointer(ptr) => ptr,
            Self::Scalar(0) => Ptr::Null,
            Self::Scalar(_) => Ptr::Wild,
        }
    }
}

/// Result of a successful load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loaded {
    Value(Value),
    /// Nondeterministic bytes; the caller decides what they stand for
    Havoc,
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    width: usize,
    value: Value,
}

enum CellRead {
    Value(Value),
    Havoc,
    Uninit,
}

#[derive(Debug, Clone)]
pub struct Allocation {
    id:       AllocId,
    site:     String,
    layout:   &'static StructLayout,
    len:      usize,
    contents: Contents,
    cells:    BTreeMap<usize, Cell>,
}

impl Allocation {
    pub fn id(&self) -> AllocId {
        self.id
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn layout(&self) -> &'static StructLayout {
        self.layout
    }

    /// Length of the block in bytes
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contents(&self) -> Contents {
        self.contents
    }

    /// Pointer to the first byte
    pub fn base(&self) -> Ptr {
        Ptr::Object {
            alloc:  self.id,
            offset: 0,
        }
    }

    /// Number of cells written so far
    pub fn written_cells(&self) -> usize {
        self.cells.len()
    }

    fn read(&self, offset: usize, width: usize, is_pointer: bool) -> CellRead {
        let end = offset + width;
        if let Some(cell) = self.cells.get(&offset) {
            if cell.width == width {
                return CellRead::Value(cell.value);
            }
        }
        let overlapping = self
            .cells
            .range(..end)
            .any(|(start, cell)| start + cell.width > offset);
        if overlapping {
            return CellRead::Havoc;
        }
        match self.contents {
            Contents::Havoc => CellRead::Havoc,
            Contents::Uninit => CellRead::Uninit,
            Contents::Zeroed if is_pointer => CellRead::Value(Value::Pointer(Ptr::Null)),
            Contents::Zeroed => CellRead::Value(Value::Scalar(0)),
        }
    }

    fn write(&mut self, offset: usize, width: usize, value: Value) {
        let end = offset + width;
        let stale: Vec<usize> = self
            .cells
            .range(..end)
            .filter(|(start, cell)| *start + cell.width > offset)
            .map(|(start, _)| *start)
            .collect();
        for start in stale {
            self.cells.remove(&start);
        }
        self.cells.insert(offset, Cell { width, value });
    }
}

/// Defect found while walking a linked list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListDefect {
    /// A node was reached twice
    Cycle { at: AllocId },
    /// A link is neither `NULL` nor a readable node
    InvalidLink { ptr: Ptr },
    /// More nodes than the walk bound
    BoundExceeded { bound: usize },
}

#[derive(Debug, Clone, Default)]
pub struct SymbolicHeap {
    allocations: Vec<Allocation>,
}

impl SymbolicHeap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block of `len` bytes and return a pointer to its start
    pub fn allocate(
        &mut self,
        site: impl Into<String>,
        layout: &'static StructLayout,
        len: usize,
        contents: Contents,
    ) -> Ptr {
        let id = AllocId(self.allocations.len());
        self.allocations.push(Allocation {
            id,
            site: site.into(),
            layout,
            len,
            contents,
            cells: BTreeMap::new(),
        });
        Ptr::Object { alloc: id, offset: 0 }
    }

    pub fn allocation(&self, id: AllocId) -> Option<&Allocation> {
        self.allocations.get(id.0)
    }

    /// First allocation made by `site`
    pub fn by_site(&self, site: &str) -> Option<&Allocation> {
        self.allocations.iter().find(|allocation| allocation.site == site)
    }

    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }

    pub fn len(&self) -> usize {
        self.allocations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }

    /// Check an access of `field` through `ptr`; returns the allocation index
    /// and the absolute offset of the access.
    fn resolve(
        &self,
        ptr: Ptr,
        field: &FieldDef,
        access: AccessKind,
        site: &'static str,
    ) -> Result<(usize, usize), Halt> {
        if let FieldKind::Struct(_) = field.kind {
            return Err(Halt::Fault(Error::layout_mismatch(
                "Embedded structures cannot be loaded or stored as a value",
            )));
        }
        let width = field.width();
        let detached = |kind| Violation::detached(kind, access, site, field.name, field.offset, width);
        let (alloc, base) = match ptr {
            Ptr::Null => return Err(detached(ViolationKind::NullDereference).into()),
            Ptr::Wild | Ptr::Function(_) => {
                return Err(detached(ViolationKind::InvalidPointer).into());
            },
            Ptr::Object { alloc, offset } => (alloc, offset),
        };
        let Some(allocation) = self.allocations.get(alloc.0) else {
            return Err(detached(ViolationKind::InvalidPointer).into());
        };
        let start = base.checked_add(field.offset);
        let end = start.and_then(|start| start.checked_add(width));
        match (start, end) {
            (Some(start), Some(end)) if end <= allocation.len => Ok((alloc.0, start)),
            _ => Err(Violation {
                kind: ViolationKind::OutOfBounds,
                access,
                site,
                field: field.name,
                object: Some(alloc.0),
                offset: base.wrapping_add(field.offset),
                width,
                block_len: Some(allocation.len),
            }
            .into()),
        }
    }

    /// Load `field` of the object `ptr` designates
    pub fn load(&self, ptr: Ptr, field: &FieldDef, site: &'static str) -> Result<Loaded, Halt> {
        let (index, offset) = self.resolve(ptr, field, AccessKind::Read, site)?;
        let allocation = &self.allocations[index];
        match allocation.read(offset, field.width(), field.kind == FieldKind::Pointer) {
            CellRead::Value(value) => Ok(Loaded::Value(value)),
            CellRead::Havoc => Ok(Loaded::Havoc),
            CellRead::Uninit => Err(Violation {
                kind: ViolationKind::UninitializedRead,
                access: AccessKind::Read,
                site,
                field: field.name,
                object: Some(index),
                offset,
                width: field.width(),
                block_len: Some(allocation.len),
            }
            .into()),
        }
    }

    /// Store `value` into `field` of the object `ptr` designates
    pub fn store(
        &mut self,
        ptr: Ptr,
        field: &FieldDef,
        value: Value,
        site: &'static str,
    ) -> Result<(), Halt> {
        let (index, offset) = self.resolve(ptr, field, AccessKind::Write, site)?;
        self.allocations[index].write(offset, field.width(), value);
        Ok(())
    }

    /// Follow `next` links from `head` until `NULL`, visiting at most `bound`
    /// nodes. Returns the visited allocations in order.
    pub fn walk_list(
        &self,
        head: Ptr,
        next: &FieldDef,
        bound: usize,
    ) -> Result<Vec<AllocId>, ListDefect> {
        let mut nodes = Vec::new();
        let mut visited = BTreeSet::new();
        let mut cursor = head;
        loop {
            let alloc = match cursor {
                Ptr::Null => return Ok(nodes),
                Ptr::Object { alloc, .. } => alloc,
                ptr => return Err(ListDefect::InvalidLink { ptr }),
            };
            if !visited.insert(alloc) {
                return Err(ListDefect::Cycle { at: alloc });
            }
            if nodes.len() >= bound {
                return Err(ListDefect::BoundExceeded { bound });
            }
            cursor = match self.load(cursor, next, "walk_list") {
                Ok(Loaded::Value(value)) => value.as_ptr(),
                Ok(Loaded::Havoc) => Ptr::Wild,
                Err(_) => return Err(ListDefect::InvalidLink { ptr: cursor }),
            };
            nodes.push(alloc);
        }
    }
}
