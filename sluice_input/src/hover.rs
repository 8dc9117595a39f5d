// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover and active chains.
//!
//! The hover chain is page-wide: one root→leaf path from the main document
//! through frame owners down to the node under the mouse. Moving it emits, in
//! order:
//!
//! 1. `mouseout` at each frame's old innermost node, inner frames first;
//! 2. `mouseleave` leaf→root for nodes no longer on the chain;
//! 3. `mouseover` at each frame's new innermost node, outer frames first;
//! 4. `mouseenter` root→leaf for nodes new on the chain.
//!
//! `mouseenter`/`mouseleave` go only to nodes that listen for them directly,
//! unless some node on the chain has a capturing listener for that kind, which
//! widens delivery to the whole changed part of the chain. When no node on the
//! page listens for a kind at all the walk is skipped.

use sluice_responder::adapters::page::boundary_path;
use sluice_responder::hover::HoverEvent;
use sluice_tree::{FrameId, ListenerFlags, NodeId, NodeState, Page};
use smallvec::SmallVec;

use crate::dom_event::EventKind;
use crate::error::Result;
use crate::handler::{Cx, EventHandler, PointerInput};

/// Innermost node of each frame on a cross-frame path, outermost frame first.
fn frame_leaves(page: &Page, path: &[NodeId]) -> SmallVec<[(FrameId, NodeId); 4]> {
    let mut out: SmallVec<[(FrameId, NodeId); 4]> = SmallVec::new();
    for &node in path {
        let Some(frame) = page.frame_of(node) else {
            continue;
        };
        match out.last_mut() {
            Some((f, leaf)) if *f == frame => *leaf = node,
            _ => out.push((frame, node)),
        }
    }
    out
}

fn leaf_in(leaves: &[(FrameId, NodeId)], frame: FrameId) -> Option<NodeId> {
    leaves.iter().find(|(f, _)| *f == frame).map(|(_, n)| *n)
}

fn dispatch_boundary(
    cx: &mut Cx<'_>,
    chain: &[NodeId],
    transitions: &[HoverEvent<NodeId>],
    enter: bool,
    input: &PointerInput,
) {
    let (direct, capturing, kind) = if enter {
        (ListenerFlags::ENTER, ListenerFlags::CAPTURE_ENTER, EventKind::MouseEnter)
    } else {
        (ListenerFlags::LEAVE, ListenerFlags::CAPTURE_LEAVE, EventKind::MouseLeave)
    };
    if !cx.page.has_listener_anywhere(direct | capturing) {
        return;
    }
    let widen = chain
        .iter()
        .any(|n| cx.page.listeners(*n).contains(capturing));
    for t in transitions {
        let node = match (*t, enter) {
            (HoverEvent::Enter(n), true) | (HoverEvent::Leave(n), false) => n,
            _ => continue,
        };
        if !widen && !cx.page.listeners(node).contains(direct) {
            continue;
        }
        let mut ev = input.event(kind, cx.page, node);
        ev.related_target = None;
        cx.dispatch(node, &mut ev);
    }
}

impl EventHandler {
    /// Move the page-wide hover chain to `node`.
    pub(crate) fn update_hover(
        &mut self,
        cx: &mut Cx<'_>,
        node: Option<NodeId>,
        input: &PointerInput,
    ) -> Result<()> {
        if self.hover.leaf() == node {
            return Ok(());
        }
        let new_path = boundary_path(cx.page, node);
        let old_path = self.hover.current_path().to_vec();
        let transitions = self.hover.update_path(&new_path);
        tracing::trace!(from = ?old_path.last(), to = ?node, "hover moved");

        for t in &transitions {
            match *t {
                HoverEvent::Leave(n) => cx.page.set_state(n, NodeState::HOVER, false),
                HoverEvent::Enter(n) => cx.page.set_state(n, NodeState::HOVER, true),
            }
        }

        let old_leaves = frame_leaves(cx.page, &old_path);
        let new_leaves = frame_leaves(cx.page, &new_path);

        for &(frame, old) in old_leaves.iter().rev() {
            let new = leaf_in(&new_leaves, frame);
            if new == Some(old) {
                continue;
            }
            let mut ev = input.event(EventKind::MouseOut, cx.page, old);
            ev.related_target = new;
            cx.dispatch(old, &mut ev);
        }

        dispatch_boundary(cx, &old_path, &transitions, false, input);

        for &(frame, new) in &new_leaves {
            let old = leaf_in(&old_leaves, frame);
            if old == Some(new) {
                continue;
            }
            let mut ev = input.event(EventKind::MouseOver, cx.page, new);
            ev.related_target = old.filter(|o| cx.page.is_alive(*o));
            cx.dispatch(new, &mut ev);
        }

        dispatch_boundary(cx, &new_path, &transitions, true, input);

        // Listeners may have removed hovered nodes.
        self.hover.truncate_dead(|n| cx.page.is_alive(n));
        Ok(())
    }

    /// Move the active chain to `node` (or clear it).
    pub(crate) fn set_active(&mut self, page: &mut Page, node: Option<NodeId>) {
        let path = boundary_path(page, node);
        for t in self.active.update_path(&path) {
            match t {
                HoverEvent::Enter(n) => page.set_state(n, NodeState::ACTIVE, true),
                HoverEvent::Leave(n) => page.set_state(n, NodeState::ACTIVE, false),
            }
        }
    }

    /// Drop hover and active chains without boundary events.
    pub(crate) fn clear_chain_states(&mut self, cx: &mut Cx<'_>) {
        for t in self.hover.clear() {
            if let HoverEvent::Leave(n) = t {
                cx.page.set_state(n, NodeState::HOVER, false);
            }
        }
        self.set_active(cx.page, None);
    }
}
