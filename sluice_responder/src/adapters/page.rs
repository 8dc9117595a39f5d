// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter helpers for the Sluice page model.
//!
//! ## Feature
//!
//! Enable with `page_adapter` (on by default).
//!
//! ## Notes
//!
//! DOM propagation paths stay inside one frame: an event dispatched in a child
//! frame's document never reaches the owner element in the parent frame. Hover
//! and focus-within chains on the other hand span frames, so the page-wide chain
//! is built with [`Page::cross_frame_path`].

use alloc::vec::Vec;

use sluice_tree::{FrameId, NodeId, Page};

use crate::dispatcher;
use crate::types::{Dispatch, ParentLookup};

impl ParentLookup<NodeId> for Page {
    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        self.parent(*node)
    }
}

/// Propagation sequence for an event targeted at `target`, within its frame.
///
/// Returns an empty sequence for stale targets.
pub fn dispatch_for(page: &Page, target: NodeId, bubbles: bool) -> Vec<Dispatch<NodeId>> {
    if !page.is_alive(target) {
        return Vec::new();
    }
    dispatcher::sequence(&page.path_to_root(target), bubbles)
}

/// Page-wide hover/focus chain for `node`, root document first.
pub fn boundary_path(page: &Page, node: Option<NodeId>) -> Vec<NodeId> {
    node.map(|n| page.cross_frame_path(n)).unwrap_or_default()
}

/// Tree navigation for sequential focus.
///
/// Traversal is document order within one frame and wraps around.
pub mod navigation {
    use super::*;

    /// Next node after `current` in document order that satisfies `pred`, wrapping.
    ///
    /// With `current == None` the search starts at the document. Returns `None` when
    /// nothing matches or the frame is gone.
    pub fn next_filtered(
        page: &Page,
        frame: FrameId,
        current: Option<NodeId>,
        pred: impl Fn(&Page, NodeId) -> bool,
    ) -> Option<NodeId> {
        step(page, frame, current, pred, false)
    }

    /// Previous node before `current` in document order that satisfies `pred`, wrapping.
    pub fn prev_filtered(
        page: &Page,
        frame: FrameId,
        current: Option<NodeId>,
        pred: impl Fn(&Page, NodeId) -> bool,
    ) -> Option<NodeId> {
        step(page, frame, current, pred, true)
    }

    fn step(
        page: &Page,
        frame: FrameId,
        current: Option<NodeId>,
        pred: impl Fn(&Page, NodeId) -> bool,
        backward: bool,
    ) -> Option<NodeId> {
        let mut order = page.document_order(frame);
        if order.is_empty() {
            return None;
        }
        if backward {
            order.reverse();
        }
        let start = current
            .and_then(|c| order.iter().position(|n| *n == c))
            .map_or(0, |i| i + 1);
        let len = order.len();
        (0..len)
            .map(|i| order[(start + i) % len])
            .find(|n| Some(*n) != current && pred(page, *n))
    }
}

#[cfg(test)]
mod tests {
    use super::navigation::{next_filtered, prev_filtered};
    use super::*;
    use crate::types::Phase;
    use kurbo::{Rect, Size};
    use sluice_tree::{FrameDesc, ElementKind, NodeDesc, NodeFlags};

    #[test]
    fn dispatch_stays_within_frame() {
        let mut page = Page::new(Size::new(100.0, 100.0));
        let doc = page.document(page.main_frame()).unwrap();
        let owner = page
            .insert(
                doc,
                NodeDesc::of_kind(ElementKind::FrameOwner, Rect::new(0.0, 0.0, 50.0, 50.0)),
            )
            .unwrap();
        let child = page.attach_frame(owner, FrameDesc::new(Size::new(50.0, 50.0))).unwrap();
        let child_doc = page.document(child).unwrap();
        let inner = page.insert(child_doc, NodeDesc::default()).unwrap();

        let seq = dispatch_for(&page, inner, true);
        let steps: Vec<(Phase, NodeId)> = seq.iter().map(|d| (d.phase, d.node)).collect();
        assert_eq!(
            steps,
            alloc::vec![
                (Phase::Capture, child_doc),
                (Phase::Target, inner),
                (Phase::Bubble, child_doc),
            ]
        );
        assert_eq!(boundary_path(&page, Some(inner)), alloc::vec![doc, owner, child_doc, inner]);
        page.remove(inner);
        assert!(dispatch_for(&page, inner, true).is_empty());
    }

    #[test]
    fn focus_navigation_wraps() {
        let mut page = Page::new(Size::new(100.0, 100.0));
        let frame = page.main_frame();
        let doc = page.document(frame).unwrap();
        let a = page
            .insert(doc, NodeDesc::default().with_flags(NodeFlags::FOCUSABLE))
            .unwrap();
        let _plain = page.insert(doc, NodeDesc::default()).unwrap();
        let b = page
            .insert(doc, NodeDesc::default().with_flags(NodeFlags::FOCUSABLE))
            .unwrap();
        let focusable = |p: &Page, n: NodeId| p.is_focusable(n);

        assert_eq!(next_filtered(&page, frame, None, focusable), Some(a));
        assert_eq!(next_filtered(&page, frame, Some(a), focusable), Some(b));
        assert_eq!(next_filtered(&page, frame, Some(b), focusable), Some(a));
        assert_eq!(prev_filtered(&page, frame, Some(a), focusable), Some(b));
        assert_eq!(prev_filtered(&page, frame, None, focusable), Some(b));
    }
}
