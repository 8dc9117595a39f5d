// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wheel, gesture and scrollbar scrolling.
//!
//! Wheel input is tested frame by frame along the containment chain: the
//! innermost frame gets the `wheel` event and scrolls its own containers; only
//! if it consumed nothing does the parent frame dispatch at the owner element
//! and try its containers.
//!
//! A gesture scroll computes its scroll chain once, at scroll begin: every
//! scroll container from the hit node outward across frame boundaries, sub
//! frame viewports included, the main viewport excluded. Updates hand the delta
//! down that chain, innermost first, and finally to the main viewport. Delta
//! nobody consumed is summed and reported as overscroll when the gesture ends.

use kurbo::{Point, Vec2};
use sluice_tree::{FrameId, HitTestRequest, ListenerFlags, NodeId, Page};

use crate::config::ScrollConfig;
use crate::dom_event::{DomEvent, EventKind};
use crate::error::{InputError, Result};
use crate::event::{WheelDelta, WheelEvent};
use crate::frame_router::{deepest_hit, event_target, forward_target, hit_in_frame};
use crate::handler::{Cx, EventHandler};

/// The cached scroll chain and bookkeeping of one gesture scroll.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ScrollGesture {
    /// Scroll containers, innermost first.
    pub(crate) chain: Vec<NodeId>,
    /// All delta requested so far.
    pub(crate) accumulated: Vec2,
    /// Delta nothing consumed.
    pub(crate) unused: Vec2,
}

fn is_zero(v: Vec2) -> bool {
    v.x == 0.0 && v.y == 0.0
}

/// Apply `delta` along `chain`, innermost first. Returns what is left.
pub(crate) fn distribute_scroll(page: &mut Page, chain: &[NodeId], delta: Vec2) -> Vec2 {
    let mut remaining = delta;
    for &node in chain {
        if is_zero(remaining) {
            break;
        }
        let applied = page.scroll_by(node, remaining);
        if !is_zero(applied) {
            tracing::trace!(?node, ?applied, "scrolled");
        }
        remaining -= applied;
    }
    remaining
}

/// Scroll containers from `node` outward, crossing into ancestor frames, not
/// including the main frame's document.
pub(crate) fn scroll_chain(page: &Page, node: NodeId) -> Vec<NodeId> {
    let main_doc = page.document(page.main_frame());
    let mut chain = Vec::new();
    let mut cur = page.is_alive(node).then_some(node);
    while let Some(n) = cur {
        if Some(n) != main_doc && page.scroll(n).is_some_and(|s| s.is_scrollable()) {
            chain.push(n);
        }
        cur = page.parent_across_frames(n);
    }
    chain
}

/// Drop delta components below the noise floor.
fn filter_overscroll(unused: Vec2, config: &ScrollConfig) -> Vec2 {
    let keep = |v: f64| if v.abs() < config.overscroll_min_delta { 0.0 } else { v };
    Vec2::new(keep(unused.x), keep(unused.y))
}

impl EventHandler {
    pub(crate) fn wheel(&mut self, cx: &mut Cx<'_>, ev: &WheelEvent) -> Result<bool> {
        let root = cx.root_point(ev.position);
        let delta = match ev.delta {
            WheelDelta::Pixels(d) => d,
            WheelDelta::Lines(l) => l * self.config.scroll.line_step,
        };
        self.remember_position(root, ev.modifiers);
        let main = cx.page.main_frame();
        self.wheel_in(cx, main, root, delta, ev)
    }

    fn wheel_in(
        &mut self,
        cx: &mut Cx<'_>,
        frame: FrameId,
        root: Point,
        delta: Vec2,
        ev: &WheelEvent,
    ) -> Result<bool> {
        let hit = hit_in_frame(cx.page, frame, root, HitTestRequest::READ_ONLY)?;
        if let Some(child) = forward_target(cx.page, &hit) {
            match self.wheel_in(cx, child, root, delta, ev) {
                Ok(true) => return Ok(true),
                Ok(false) => {}
                Err(err) => tracing::debug!(?child, %err, "subframe wheel handling aborted"),
            }
            cx.ensure_frame(frame)?;
            tracing::trace!(?child, "subframe declined the wheel");
        }
        let target = hit
            .inner_node
            .filter(|n| cx.page.is_alive(*n))
            .map(|n| event_target(cx.page, n))
            .ok_or(InputError::NoTarget)?;

        if cx.page.has_listener_anywhere(ListenerFlags::WHEEL) {
            let frame_point = cx.frame_point(frame, root)?;
            let mut dom = DomEvent::new(EventKind::Wheel).at(frame_point, root);
            dom.delta = delta;
            dom.modifiers = ev.modifiers;
            dom.timestamp = ev.timestamp;
            let prevented = cx.dispatch(target, &mut dom);
            cx.ensure_frame(frame)?;
            if prevented {
                tracing::debug!(?target, "wheel canceled by the page");
                return Ok(true);
            }
            cx.ensure_node(target)?;
        }

        let chain: Vec<NodeId> = cx
            .page
            .ancestors(target)
            .filter(|n| cx.page.scroll(*n).is_some_and(|s| s.is_scrollable()))
            .collect();
        let remaining = distribute_scroll(cx.page, &chain, delta);
        let consumed = remaining != delta;
        if consumed {
            self.fake_move_pending = true;
        }
        Ok(consumed)
    }

    /// Build the scroll chain for a gesture starting at `root`.
    pub(crate) fn begin_scroll_gesture(&mut self, cx: &mut Cx<'_>, root: Point) -> bool {
        let hit = deepest_hit(cx.page, root, HitTestRequest::READ_ONLY, 0.0);
        let chain = hit
            .inner_node
            .map(|n| scroll_chain(cx.page, n))
            .unwrap_or_default();
        tracing::debug!(len = chain.len(), "scroll chain computed");
        self.scroll_gesture = Some(ScrollGesture {
            chain,
            ..ScrollGesture::default()
        });
        true
    }

    /// Hand a gesture delta down the cached chain, then to the main viewport.
    pub(crate) fn update_scroll_gesture(
        &mut self,
        cx: &mut Cx<'_>,
        root: Point,
        delta: Vec2,
    ) -> bool {
        if self.scroll_gesture.is_none() {
            tracing::debug!("scroll update without begin; computing chain now");
            self.begin_scroll_gesture(cx, root);
        }
        let scale = cx.page.page_scale();
        let delta = delta / scale;
        let main_doc = cx.page.document(cx.page.main_frame());
        let Some(gesture) = self.scroll_gesture.as_mut() else {
            return false;
        };
        let mut remaining = distribute_scroll(cx.page, &gesture.chain, delta);
        if let Some(doc) = main_doc {
            remaining = distribute_scroll(cx.page, &[doc], remaining);
        }
        gesture.accumulated += delta;
        gesture.unused += remaining;
        let consumed = remaining != delta;
        if consumed {
            self.fake_move_pending = true;
        }
        consumed
    }

    /// Finish the gesture and report overscroll.
    pub(crate) fn end_scroll_gesture(&mut self, cx: &mut Cx<'_>) -> bool {
        let Some(gesture) = self.scroll_gesture.take() else {
            return false;
        };
        let unused = filter_overscroll(gesture.unused, &self.config.scroll);
        if !is_zero(unused) {
            tracing::debug!(?unused, "overscroll");
            cx.host.did_overscroll(unused, gesture.accumulated);
        }
        true
    }

    /// Move a scrollbar thumb with the pointer.
    pub(crate) fn drag_scrollbar(
        &mut self,
        cx: &mut Cx<'_>,
        frame: FrameId,
        bar: NodeId,
        point: Point,
    ) -> Result<bool> {
        cx.ensure_node(bar)?;
        let Some(moved) = self.frame_state(frame).mouse.drag.update(point) else {
            return Ok(false);
        };
        let (Some(scroll), Some(bounds)) = (cx.page.scroll(bar).copied(), cx.page.bounds(bar))
        else {
            return Ok(false);
        };
        let Some(track) = scroll.scrollbar else {
            return Ok(false);
        };
        // Thumb travel maps onto the whole content extent.
        let delta = if track.height() >= track.width() {
            let content = scroll.max_offset.y + bounds.height();
            Vec2::new(0.0, moved.y * content / track.height().max(1.0))
        } else {
            let content = scroll.max_offset.x + bounds.width();
            Vec2::new(moved.x * content / track.width().max(1.0), 0.0)
        };
        let applied = cx.page.scroll_by(bar, delta);
        tracing::trace!(?bar, ?applied, "scrollbar dragged");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Rect, Size};
    use sluice_tree::{ElementKind, FrameDesc, NodeDesc, ScrollState};

    #[test]
    fn delta_spills_outward_along_the_chain() {
        let mut page = Page::new(Size::new(100.0, 100.0));
        let doc = page.document(page.main_frame()).unwrap();
        let outer = page
            .insert(
                doc,
                NodeDesc::element(Rect::new(0.0, 0.0, 100.0, 100.0))
                    .with_scroll(ScrollState::with_max(Vec2::new(0.0, 100.0))),
            )
            .unwrap();
        let inner = page
            .insert(
                outer,
                NodeDesc::element(Rect::new(0.0, 0.0, 50.0, 50.0))
                    .with_scroll(ScrollState::with_max(Vec2::new(0.0, 30.0))),
            )
            .unwrap();
        let left = distribute_scroll(&mut page, &[inner, outer], Vec2::new(0.0, 50.0));
        assert_eq!(left, Vec2::ZERO);
        assert_eq!(page.scroll(inner).unwrap().offset, Vec2::new(0.0, 30.0));
        assert_eq!(page.scroll(outer).unwrap().offset, Vec2::new(0.0, 20.0));
    }

    #[test]
    fn chain_crosses_frames_and_skips_the_main_viewport() {
        let mut page = Page::with_main_frame(
            FrameDesc::new(Size::new(200.0, 200.0)).with_scroll_max(Vec2::new(0.0, 500.0)),
        );
        let doc = page.document(page.main_frame()).unwrap();
        let owner = page
            .insert(
                doc,
                NodeDesc::of_kind(ElementKind::FrameOwner, Rect::new(0.0, 0.0, 100.0, 100.0)),
            )
            .unwrap();
        let child = page
            .attach_frame(
                owner,
                FrameDesc::new(Size::new(100.0, 100.0)).with_scroll_max(Vec2::new(0.0, 50.0)),
            )
            .unwrap();
        let child_doc = page.document(child).unwrap();
        let leaf = page
            .insert(child_doc, NodeDesc::element(Rect::new(0.0, 0.0, 10.0, 10.0)))
            .unwrap();
        assert_eq!(scroll_chain(&page, leaf), vec![child_doc]);
    }

    #[test]
    fn tiny_overscroll_is_dropped() {
        let cfg = ScrollConfig::default();
        assert_eq!(
            filter_overscroll(Vec2::new(0.05, -3.0), &cfg),
            Vec2::new(0.0, -3.0)
        );
    }
}
