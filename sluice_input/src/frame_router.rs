// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cross-frame routing helpers.
//!
//! Every hit test starts at the main frame (the tree re-routes sub-frame
//! queries there) so results are never occluded by content stacked above the
//! querying frame. A frame hands an event to a child frame when the node under
//! the point is an owner element whose content frame is local and laid out;
//! the child then handles the event on its own and the parent does nothing
//! more with it.

use kurbo::Point;
use sluice_tree::{ElementKind, FrameId, HitTestRequest, HitTestResult, NodeId, Page};

use crate::error::{InputError, Result};

/// Content frame of `node` if events can be forwarded into it.
pub(crate) fn local_content_frame(page: &Page, node: NodeId) -> Option<FrameId> {
    if page.element_kind(node) != Some(ElementKind::FrameOwner) {
        return None;
    }
    page.content_frame(node)
        .filter(|f| !page.is_remote(*f) && page.is_layout_ready(*f))
}

/// Child frame to forward to, if the hit stopped at a forwardable owner (and
/// not on its scrollbar).
pub(crate) fn forward_target(page: &Page, hit: &HitTestResult) -> Option<FrameId> {
    if !hit.over_widget || hit.scrollbar.is_some() {
        return None;
    }
    local_content_frame(page, hit.inner_node?)
}

/// Hit test a main-frame point on behalf of `frame`.
///
/// Fails with [`InputError::NoTarget`] while the frame has no layout. A point
/// that resolves outside the frame's own document (occluded by an ancestor
/// frame's content or outside the viewport) targets the frame's document.
pub(crate) fn hit_in_frame(
    page: &Page,
    frame: FrameId,
    root: Point,
    request: HitTestRequest,
) -> Result<HitTestResult> {
    if !page.is_frame_attached(frame) {
        return Err(InputError::FrameDetached(frame));
    }
    if !page.is_layout_ready(frame) {
        tracing::trace!(?frame, "frame has no layout yet");
        return Err(InputError::NoTarget);
    }
    let point = page
        .point_from_root(frame, root)
        .ok_or(InputError::FrameDetached(frame))?;
    let hit = page.hit_test(frame, point, request, 0.0);
    if hit.frame == Some(frame) && hit.inner_node.is_some() {
        return Ok(hit);
    }
    let mut own = HitTestResult::empty(point, request);
    own.frame = Some(frame);
    own.inner_node = page.document(frame);
    Ok(own)
}

/// Hit test the whole page, descending into every local frame.
pub(crate) fn deepest_hit(
    page: &Page,
    root: Point,
    request: HitTestRequest,
    padding: f64,
) -> HitTestResult {
    page.hit_test(
        page.main_frame(),
        root,
        request | HitTestRequest::ALLOW_CHILD_FRAME_CONTENT,
        padding,
    )
}

/// Node that receives DOM events for a hit: text runs deliver to their element.
pub(crate) fn event_target(page: &Page, node: NodeId) -> NodeId {
    if page.is_text(node) {
        page.parent(node).unwrap_or(node)
    } else {
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Rect, Size};
    use sluice_tree::{FrameDesc, NodeDesc};

    fn nested() -> (Page, NodeId, FrameId, NodeId) {
        let mut page = Page::new(Size::new(300.0, 300.0));
        let doc = page.document(page.main_frame()).unwrap();
        let owner = page
            .insert(
                doc,
                NodeDesc::of_kind(ElementKind::FrameOwner, Rect::new(100.0, 100.0, 200.0, 200.0)),
            )
            .unwrap();
        let child = page
            .attach_frame(owner, FrameDesc::new(Size::new(100.0, 100.0)))
            .unwrap();
        let child_doc = page.document(child).unwrap();
        let inner = page
            .insert(child_doc, NodeDesc::element(Rect::new(10.0, 10.0, 40.0, 40.0)))
            .unwrap();
        (page, owner, child, inner)
    }

    #[test]
    fn forwards_only_into_local_laid_out_frames() {
        let (mut page, owner, child, _) = nested();
        assert_eq!(local_content_frame(&page, owner), Some(child));
        page.set_remote(child, true);
        assert_eq!(local_content_frame(&page, owner), None);
        page.set_remote(child, false);
        page.set_layout_ready(child, false);
        assert_eq!(local_content_frame(&page, owner), None);
    }

    #[test]
    fn frame_hit_falls_back_to_the_document_outside_the_frame() {
        let (page, _, child, inner) = nested();
        let hit =
            hit_in_frame(&page, child, Point::new(120.0, 120.0), HitTestRequest::MOVE).unwrap();
        assert_eq!(hit.inner_node, Some(inner));
        assert_eq!(hit.local_point, Point::new(20.0, 20.0));

        let outside =
            hit_in_frame(&page, child, Point::new(10.0, 10.0), HitTestRequest::MOVE).unwrap();
        assert_eq!(outside.inner_node, page.document(child));
        assert_eq!(outside.frame, Some(child));
    }

    #[test]
    fn forwards_only_from_hits_that_stopped_at_an_owner() {
        let (mut page, owner, child, _) = nested();
        let main = page.main_frame();
        let at_owner =
            hit_in_frame(&page, main, Point::new(150.0, 150.0), HitTestRequest::MOVE).unwrap();
        assert_eq!(at_owner.inner_node, Some(owner));
        assert!(at_owner.over_widget);
        assert_eq!(forward_target(&page, &at_owner), Some(child));

        let descended = deepest_hit(&page, Point::new(150.0, 150.0), HitTestRequest::MOVE, 0.0);
        assert!(!descended.over_widget);
        assert_eq!(forward_target(&page, &descended), None);

        let doc = page.document(main).unwrap();
        let plugin = page
            .insert(
                doc,
                NodeDesc::of_kind(ElementKind::Plugin, Rect::new(0.0, 0.0, 50.0, 50.0)),
            )
            .unwrap();
        let at_plugin =
            hit_in_frame(&page, main, Point::new(10.0, 10.0), HitTestRequest::MOVE).unwrap();
        assert_eq!(at_plugin.inner_node, Some(plugin));
        assert!(at_plugin.over_widget);
        assert_eq!(forward_target(&page, &at_plugin), None);
    }

    #[test]
    fn deepest_hit_descends() {
        let (page, _, child, inner) = nested();
        let hit = deepest_hit(&page, Point::new(120.0, 120.0), HitTestRequest::READ_ONLY, 0.0);
        assert_eq!(hit.frame, Some(child));
        assert_eq!(hit.inner_node, Some(inner));
    }
}
