// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus changes driven by input.
//!
//! Focus is page-wide. `blur` fires at the old node before `focus` fires at the
//! new one, and the `FOCUS_WITHIN` state follows the cross-frame focus path.

use sluice_responder::adapters::page::boundary_path;
use sluice_tree::{FrameId, NodeId, NodeState, Page};

use crate::dom_event::{DomEvent, EventKind};
use crate::error::{InputError, Result};
use crate::handler::{Cx, EventHandler};

/// Node a press on `target` focuses: the nearest focusable inclusive ancestor,
/// else the editing host containing it.
pub(crate) fn focus_candidate(page: &Page, target: NodeId) -> Option<NodeId> {
    page.ancestors(target)
        .find(|n| page.is_focusable(*n))
        .or_else(|| page.editable_root(target))
}

impl EventHandler {
    /// Move focus for a press on `target` in `frame`.
    ///
    /// Fails when a focus listener removed the target or detached the frame;
    /// the press is then swallowed.
    pub(crate) fn focus_for_press(
        &mut self,
        cx: &mut Cx<'_>,
        target: NodeId,
        frame: FrameId,
    ) -> Result<()> {
        let candidate = focus_candidate(cx.page, target);
        self.set_focus(cx, candidate, frame)?;
        cx.ensure_frame(frame)?;
        cx.ensure_node(target)
    }

    /// Focus `node` (or clear focus) with `frame` becoming the focused frame.
    pub(crate) fn set_focus(
        &mut self,
        cx: &mut Cx<'_>,
        node: Option<NodeId>,
        frame: FrameId,
    ) -> Result<()> {
        let path = boundary_path(cx.page, node);
        let change = self.focus.focus_path(&path);
        self.focused_frame = node.and_then(|n| cx.page.frame_of(n)).or(Some(frame));
        if change.is_empty() {
            return Ok(());
        }
        tracing::debug!(from = ?change.blurred, to = ?change.focused, "focus moved");
        for n in &change.left {
            cx.page.set_state(*n, NodeState::FOCUS_WITHIN, false);
        }
        for n in &change.entered {
            cx.page.set_state(*n, NodeState::FOCUS_WITHIN, true);
        }
        if let Some(old) = change.blurred {
            cx.page.set_state(old, NodeState::FOCUS, false);
            let mut ev = DomEvent::new(EventKind::Blur);
            ev.timestamp = self.now;
            cx.dispatch(old, &mut ev);
        }
        if let Some(new) = change.focused {
            if !cx.page.is_alive(new) {
                return Err(InputError::StaleNode(new));
            }
            if self.focus.focused() != Some(new) {
                // A blur listener moved focus elsewhere.
                return Ok(());
            }
            cx.page.set_state(new, NodeState::FOCUS, true);
            let mut ev = DomEvent::new(EventKind::Focus);
            ev.timestamp = self.now;
            cx.dispatch(new, &mut ev);
        }
        Ok(())
    }

    /// Forget focus if any node on the focus path was removed.
    pub(crate) fn forget_dead_focus(&mut self, page: &mut Page) {
        if self.focus.current_path().iter().all(|n| page.is_alive(*n)) {
            if self.focused_frame.is_some_and(|f| !page.is_frame_attached(f)) {
                self.focused_frame = None;
            }
            return;
        }
        tracing::debug!("focused node removed; clearing focus");
        self.drop_focus_path(page);
        if self.focused_frame.is_some_and(|f| !page.is_frame_attached(f)) {
            self.focused_frame = None;
        }
    }

    /// Clear focus without `blur`.
    pub(crate) fn clear_focus_silently(&mut self, cx: &mut Cx<'_>) {
        self.drop_focus_path(cx.page);
        self.focused_frame = None;
    }

    fn drop_focus_path(&mut self, page: &mut Page) {
        let change = self.focus.clear();
        for n in change.left {
            page.set_state(n, NodeState::FOCUS | NodeState::FOCUS_WITHIN, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Rect, Size};
    use sluice_tree::{ElementKind, NodeDesc, NodeFlags};

    #[test]
    fn candidate_prefers_focusable_ancestor_then_editing_host() {
        let mut page = Page::new(Size::new(100.0, 100.0));
        let doc = page.document(page.main_frame()).unwrap();
        let link = page
            .insert(doc, NodeDesc::of_kind(ElementKind::Link, Rect::new(0.0, 0.0, 50.0, 50.0)))
            .unwrap();
        let span = page
            .insert(link, NodeDesc::element(Rect::new(0.0, 0.0, 10.0, 10.0)))
            .unwrap();
        assert_eq!(focus_candidate(&page, span), Some(link));

        let host = page
            .insert(
                doc,
                NodeDesc::element(Rect::new(50.0, 0.0, 90.0, 40.0)).with_flags(NodeFlags::EDITABLE),
            )
            .unwrap();
        let text = page.insert(host, NodeDesc::text(Rect::new(50.0, 0.0, 60.0, 10.0))).unwrap();
        assert_eq!(focus_candidate(&page, text), Some(host));

        let plain = page
            .insert(doc, NodeDesc::element(Rect::new(0.0, 60.0, 10.0, 70.0)))
            .unwrap();
        assert_eq!(focus_candidate(&page, plain), None);
    }
}
