// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit testing: point and padded (list-based) queries over a [`Page`].
//!
//! Queries always run from the main frame downward. A query that names a
//! sub-frame as its origin is re-routed to the main frame first and then walks
//! back down, so content stacked above the origin frame occludes it the same
//! way it does on screen. Descent stops at the origin frame unless
//! [`HitTestRequest::ALLOW_CHILD_FRAME_CONTENT`] is set.
//!
//! A frame that has not finished its first layout yields an empty result.

use alloc::vec::Vec;

use kurbo::{Point, Rect};
use smallvec::SmallVec;

use crate::page::Page;
use crate::types::{ElementKind, FrameId, NodeFlags, NodeId};

bitflags::bitflags! {
    /// Flags describing why a hit test is performed and how far it may go.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct HitTestRequest: u8 {
        /// Query only; callers must not update hover or active state from the result.
        const READ_ONLY                  = 1 << 0;
        /// Press phase; the active chain may update.
        const ACTIVE                     = 1 << 1;
        /// Move phase; the hover chain may update.
        const MOVE                       = 1 << 2;
        /// Release phase.
        const RELEASE                    = 1 << 3;
        /// Collect every candidate intersecting the padded area.
        const LIST_BASED                 = 1 << 4;
        /// Descend into same-process child frames.
        const ALLOW_CHILD_FRAME_CONTENT  = 1 << 5;
        /// Ignore `CLIPS` on ancestors.
        const IGNORE_CLIPPING            = 1 << 6;
    }
}

/// The outcome of a hit test.
///
/// Results are values: they are never updated after the query returns. Touch
/// adjustment resolves a list-based result by hit testing again at the
/// adjusted point.
#[derive(Clone, Debug, PartialEq)]
pub struct HitTestResult {
    /// Frame whose document contains `inner_node` (the deepest frame reached).
    pub frame: Option<FrameId>,
    /// Innermost node under the point.
    pub inner_node: Option<NodeId>,
    /// The query point in `frame` coordinates.
    pub local_point: Point,
    /// Scroll container whose scrollbar is under the point.
    pub scrollbar: Option<NodeId>,
    /// The point is over an embedded frame or plugin that was not descended into.
    pub over_widget: bool,
    /// Candidates intersecting the padded area, topmost first (list-based only).
    pub candidates: SmallVec<[NodeId; 8]>,
    /// Request used for the query.
    pub request: HitTestRequest,
}

impl HitTestResult {
    /// An empty result.
    pub fn empty(point: Point, request: HitTestRequest) -> Self {
        Self {
            frame: None,
            inner_node: None,
            local_point: point,
            scrollbar: None,
            over_widget: false,
            candidates: SmallVec::new(),
            request,
        }
    }

    /// Whether nothing was hit.
    pub fn is_empty(&self) -> bool {
        self.inner_node.is_none()
    }

    /// Whether this is a list-based result that still has to be resolved.
    pub fn is_list_based(&self) -> bool {
        self.request.contains(HitTestRequest::LIST_BASED)
    }
}

impl Page {
    /// Hit test `point` given in `origin` frame coordinates.
    ///
    /// A positive `padding` makes the query list-based over the square of that
    /// radius around `point`; the point hit is still reported in `inner_node`.
    pub fn hit_test(
        &self,
        origin: FrameId,
        point: Point,
        mut request: HitTestRequest,
        padding: f64,
    ) -> HitTestResult {
        if padding > 0.0 {
            request |= HitTestRequest::LIST_BASED;
        }
        if !self.is_layout_ready(origin) {
            return HitTestResult::empty(point, request);
        }
        let (start, start_point) = if self.is_locally_reachable(origin) {
            match self.point_to_root(origin, point) {
                Some(p) => (self.main_frame(), p),
                None => (origin, point),
            }
        } else {
            (origin, point)
        };
        let mut result = HitTestResult::empty(start_point, request);
        self.hit_test_frame(start, start_point, origin, request, padding, &mut result);
        result
    }

    fn hit_test_frame(
        &self,
        frame: FrameId,
        point: Point,
        origin: FrameId,
        request: HitTestRequest,
        padding: f64,
        out: &mut HitTestResult,
    ) {
        if !self.is_layout_ready(frame) {
            return;
        }
        let Some(doc) = self.document(frame) else {
            return;
        };
        out.frame = Some(frame);
        out.local_point = point;
        out.inner_node = None;
        out.scrollbar = None;
        out.over_widget = false;
        out.candidates.clear();

        let ignore_clip = request.contains(HitTestRequest::IGNORE_CLIPPING);
        let Some((node, on_scrollbar)) = self.hit_node(doc, point, ignore_clip) else {
            return;
        };
        out.inner_node = Some(node);
        if on_scrollbar {
            out.scrollbar = Some(node);
        }

        match self.element_kind(node) {
            Some(ElementKind::FrameOwner) if !on_scrollbar => {
                let child = self
                    .content_frame(node)
                    .filter(|c| !self.is_remote(*c) && self.is_layout_ready(*c));
                if let Some(child) = child {
                    // Without child content we still walk down toward the origin frame.
                    let descend = request.contains(HitTestRequest::ALLOW_CHILD_FRAME_CONTENT)
                        || self.is_frame_ancestor_or_self(child, origin);
                    if descend && let Some(child_point) = self.point_in_child_frame(node, point) {
                        self.hit_test_frame(child, child_point, origin, request, padding, out);
                        return;
                    }
                }
                out.over_widget = true;
            }
            Some(ElementKind::Plugin) => out.over_widget = true,
            _ => {}
        }

        if request.contains(HitTestRequest::LIST_BASED) && padding > 0.0 {
            let area = Rect::new(
                point.x - padding,
                point.y - padding,
                point.x + padding,
                point.y + padding,
            );
            let mut painted = Vec::new();
            self.collect_in_rect(doc, area, ignore_clip, &mut painted);
            out.candidates.extend(painted.into_iter().rev());
        }
    }

    /// Topmost pickable node under `point` in the subtree of `id`, and whether the
    /// point lies on that node's scrollbar.
    fn hit_node(&self, id: NodeId, point: Point, ignore_clip: bool) -> Option<(NodeId, bool)> {
        let flags = self.flags(id);
        if !flags.contains(NodeFlags::VISIBLE) {
            return None;
        }
        let rect = self.visual_rect(id)?;
        let inside = rect.contains(point);
        if flags.contains(NodeFlags::CLIPS) && !ignore_clip && !inside {
            return None;
        }
        let pickable = flags.contains(NodeFlags::PICKABLE);
        // Scrollbars paint above the container's content.
        if pickable
            && let Some(bar) = self.scroll(id).and_then(|s| s.scrollbar)
            && (bar + rect.origin().to_vec2()).contains(point)
        {
            return Some((id, true));
        }
        for child in self.children_topmost_first(id) {
            if let Some(hit) = self.hit_node(child, point, ignore_clip) {
                return Some(hit);
            }
        }
        (pickable && inside).then_some((id, false))
    }

    /// Pickable nodes intersecting `area`, in paint order (bottom first).
    fn collect_in_rect(&self, id: NodeId, area: Rect, ignore_clip: bool, out: &mut Vec<NodeId>) {
        let flags = self.flags(id);
        if !flags.contains(NodeFlags::VISIBLE) {
            return;
        }
        let Some(rect) = self.visual_rect(id) else {
            return;
        };
        let overlaps = {
            let i = rect.intersect(area);
            i.width() > 0.0 && i.height() > 0.0
        };
        if flags.contains(NodeFlags::CLIPS) && !ignore_clip && !overlaps {
            return;
        }
        if flags.contains(NodeFlags::PICKABLE) && overlaps {
            out.push(id);
        }
        let mut kids = self.children_topmost_first(id);
        kids.reverse();
        for child in kids {
            self.collect_in_rect(child, area, ignore_clip, out);
        }
    }
}
