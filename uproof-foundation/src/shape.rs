// UPROOF - uproof-foundation
// Module: Structural Preconditions
// SW-REQ-ID: REQ_VERIFY_002
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! Builders for well-formed pointer structures.
//!
//! Fully nondeterministic memory makes pointer fields wild, which says
//! nothing useful about code that walks a list. A shape builder instead picks
//! one of an enumerated set of well-formed structures and materializes it in
//! the symbolic heap, so the harness starts from a state the target's
//! contract actually allows.

use crate::{
    assume::AssumptionOrigin,
    context::{Halt, ProofContext},
    heap::{Nullability, Ptr},
    layout::{FieldDef, StructLayout},
};

/// A materialized singly linked list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListShape {
    /// First node, `NULL` for the empty list
    pub head:  Ptr,
    /// Every node in link order
    pub nodes: Vec<Ptr>,
}

impl ListShape {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Entry point for shape builders
#[derive(Debug, Clone, Copy)]
pub struct ShapeBuilder;

impl ShapeBuilder {
    /// Singly linked list of `node` structures chained through `next`
    pub fn list(
        site: &'static str,
        node: &'static StructLayout,
        next: &'static FieldDef,
    ) -> ListShapeBuilder {
        ListShapeBuilder {
            site,
            node,
            next,
            max_nodes: 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListShapeBuilder {
    site:      &'static str,
    node:      &'static StructLayout,
    next:      &'static FieldDef,
    max_nodes: usize,
}

impl ListShapeBuilder {
    /// Largest list length explored (default 1)
    pub fn max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Choose a length `n` in `0..=max_nodes` (choice point named after the
    /// site), allocate `n` non-null nodes and link them, ending in `NULL`.
    pub fn build(&self, cx: &mut ProofContext<'_>) -> Result<ListShape, Halt> {
        if self.max_nodes > cx.unwind() {
            return Err(Halt::UnwindExceeded {
                site:  self.site.to_owned(),
                limit: cx.unwind(),
            });
        }
        cx.record_assumption(
            self.site,
            &format!(
                "acyclic list of 0..={} {} nodes, last {} == NULL",
                self.max_nodes, self.node.name, self.next.name
            ),
            AssumptionOrigin::Shape,
        );
        let count = cx.choose(self.site, self.max_nodes + 1)?;
        let mut nodes = Vec::with_capacity(count);
        for index in 0..count {
            let site = format!("{}_node{index}", self.site);
            nodes.push(cx.alloc_exact(&site, self.node, Nullability::NonNull)?);
        }
        for (index, node) in nodes.iter().enumerate() {
            let successor = nodes.get(index + 1).copied().unwrap_or(Ptr::Null);
            cx.store_ptr(*node, self.next, successor, "list_shape")?;
        }
        Ok(ListShape {
            head: nodes.first().copied().unwrap_or(Ptr::Null),
            nodes,
        })
    }
}
