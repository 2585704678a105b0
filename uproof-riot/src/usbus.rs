// UPROOF - uproof-riot
// Module: USBUS Handler Registration Model
// SW-REQ-ID: REQ_RIOT_004
//
// Copyright (c) 2025 Ralf Anton Beier
// Licensed under the MIT license.
// SPDX-License-Identifier: MIT

//! `usbus_register_event_handler()` from `sys/usb/usbus/usbus.c`.
//!
//! The handler is appended: the routine follows `next` links from
//! `usbus->handlers` to the terminating `NULL` and stores the handler there.
//! An empty list therefore has its head initialized, a non-empty one gets the
//! handler linked behind its last node. The handler itself is never
//! dereferenced.

use uproof_foundation::{Halt, ProofContext, Ptr};

use crate::layouts::{HANDLER_NEXT, USBUS_HANDLERS};

pub const COVER_EMPTY: &str = "usbus_register_event_handler:empty";
pub const COVER_WALK: &str = "usbus_register_event_handler:walk";
pub const COVER_APPEND: &str = "usbus_register_event_handler:append";

const SITE: &str = "usbus_register_event_handler";

/// Append `handler` to the handler list of `usbus`.
///
/// The walk is bounded by the context's unwind limit; a longer list stops the
/// path with [`Halt::UnwindExceeded`]. The link that crosses the bound is
/// still checked, so a dangling link ends as the violation it leads to.
pub fn usbus_register_event_handler(
    cx: &mut ProofContext<'_>,
    usbus: Ptr,
    handler: Ptr,
) -> Result<(), Halt> {
    let mut last = usbus;
    let mut link = &USBUS_HANDLERS;
    let mut steps = 0;
    loop {
        let next = cx.load_ptr(last, link, SITE)?;
        if next.is_null() {
            break;
        }
        cx.cover(COVER_WALK);
        steps += 1;
        if steps > cx.unwind() {
            cx.heap().load(next, &HANDLER_NEXT, SITE)?;
            return Err(Halt::UnwindExceeded {
                site:  SITE.to_owned(),
                limit: cx.unwind(),
            });
        }
        last = next;
        link = &HANDLER_NEXT;
    }
    cx.cover(if steps == 0 { COVER_EMPTY } else { COVER_APPEND });
    cx.store_ptr(last, link, handler, SITE)
}

#[cfg(test)]
mod tests {
    use uproof_error::ViolationKind;
    use uproof_foundation::{Nullability, ScriptedSource, ShapeBuilder};

    use super::*;
    use crate::layouts::{USBUS_HANDLER_T, USBUS_T};

    fn setup(cx: &mut ProofContext<'_>, nodes: usize) -> (Ptr, Vec<Ptr>) {
        let usbus = cx.alloc_exact("usbus", &USBUS_T, Nullability::NonNull).unwrap();
        let shape = ShapeBuilder::list("handlers", &USBUS_HANDLER_T, &HANDLER_NEXT)
            .max_nodes(nodes)
            .build(cx)
            .unwrap();
        cx.store_ptr(usbus, &USBUS_HANDLERS, shape.head, "test").unwrap();
        (usbus, shape.nodes)
    }

    fn script(nodes: u64) -> ScriptedSource {
        ScriptedSource::new()
            .with("usbus_allocated", 1)
            .with("handlers", nodes)
            .with("handlers_node0_allocated", 1)
            .with("handlers_node1_allocated", 1)
    }

    #[test]
    fn empty_list_gets_its_head_initialized() {
        let mut source = script(0);
        let mut cx = ProofContext::new(&mut source, 2);
        let (usbus, _) = setup(&mut cx, 1);
        usbus_register_event_handler(&mut cx, usbus, Ptr::Null).unwrap();
        assert_eq!(cx.load_ptr(usbus, &USBUS_HANDLERS, "test"), Ok(Ptr::Null));
        assert!(cx.coverage().contains(COVER_EMPTY));
    }

    #[test]
    fn handler_is_linked_behind_last_node() {
        let mut source = script(2).with("handler_allocated", 1);
        let mut cx = ProofContext::new(&mut source, 2);
        let (usbus, nodes) = setup(&mut cx, 2);
        let handler = cx.alloc_exact("handler", &USBUS_HANDLER_T, Nullability::NonNull).unwrap();
        usbus_register_event_handler(&mut cx, usbus, handler).unwrap();
        assert_eq!(cx.load_ptr(nodes[1], &HANDLER_NEXT, "test"), Ok(handler));
        assert!(cx.coverage().contains(COVER_WALK));
        assert!(cx.coverage().contains(COVER_APPEND));
    }

    #[test]
    fn long_list_exceeds_unwind() {
        let mut source = script(2);
        let mut cx = ProofContext::new(&mut source, 2);
        let (usbus, nodes) = setup(&mut cx, 2);
        cx.store_ptr(nodes[1], &HANDLER_NEXT, nodes[0], "test").unwrap();
        assert!(matches!(
            usbus_register_event_handler(&mut cx, usbus, Ptr::Null),
            Err(Halt::UnwindExceeded { limit: 2, .. })
        ));
    }

    #[test]
    fn garbage_link_is_invalid_pointer() {
        let mut source = script(1);
        let mut cx = ProofContext::new(&mut source, 2);
        let (usbus, nodes) = setup(&mut cx, 1);
        cx.store_ptr(nodes[0], &HANDLER_NEXT, Ptr::Wild, "test").unwrap();
        let halt = usbus_register_event_handler(&mut cx, usbus, Ptr::Null).unwrap_err();
        assert_eq!(
            halt.violation().map(|violation| violation.kind),
            Some(ViolationKind::InvalidPointer)
        );
    }

    #[test]
    fn dangling_link_past_the_bound_is_invalid_pointer() {
        let mut source = script(2);
        let mut cx = ProofContext::new(&mut source, 2);
        let (usbus, nodes) = setup(&mut cx, 2);
        cx.store_ptr(nodes[1], &HANDLER_NEXT, Ptr::Wild, "test").unwrap();
        let halt = usbus_register_event_handler(&mut cx, usbus, Ptr::Null).unwrap_err();
        assert_eq!(
            halt.violation().map(|violation| violation.kind),
            Some(ViolationKind::InvalidPointer)
        );
    }
}
