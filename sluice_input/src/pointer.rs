// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mouse press → move → release.
//!
//! A sequence starts in the frame whose content is under the press. Parent
//! frames remember which child took the press and forward the rest of the
//! sequence there, so a drag that leaves the child's bounds still reaches it.
//! Within the handling frame:
//!
//! - **press**: hover follows the pointer, the active chain is set, a possible
//!   drag source is found (but not committed), `mousedown` is dispatched, focus
//!   moves, and then the default action runs unless `mousedown` was canceled:
//!   scrollbar interaction, context menu or text selection.
//! - **move**: capture wins over hit testing; otherwise hover follows the
//!   pointer. While pressed, the drag hysteresis check runs and, once
//!   exceeded, starts the drag; without a drag candidate the selection extends.
//! - **release**: `mouseup`, implicit capture release, then `click` at the
//!   common ancestor of press and release targets if neither was swallowed.

use kurbo::Point;
use sluice_event_state::capture::CaptureChange;
use sluice_event_state::click::{ClickResult, Press};
use sluice_event_state::drag::DragSourceKind;
use sluice_tree::{FrameId, HitTestRequest, NodeFlags, NodeId};

use crate::dom_event::EventKind;
use crate::drag::{DragOrigin, starts_selection};
use crate::error::{InputError, Result};
use crate::event::{PointerButton, PointerId};
use crate::frame_router::{event_target, forward_target, hit_in_frame};
use crate::frame_state::PointerPhase;
use crate::handler::{Cx, EventHandler, PointerInput};
use crate::host::Granularity;

const MOUSE: PointerId = PointerId::MOUSE;

impl EventHandler {
    pub(crate) fn mouse_down(&mut self, cx: &mut Cx<'_>, input: PointerInput) -> Result<bool> {
        let main = cx.page.main_frame();
        self.mouse_down_in(cx, main, input)
    }

    fn mouse_down_in(
        &mut self,
        cx: &mut Cx<'_>,
        frame: FrameId,
        input: PointerInput,
    ) -> Result<bool> {
        let hit = hit_in_frame(cx.page, frame, input.root, HitTestRequest::ACTIVE)?;
        if let Some(child) = forward_target(cx.page, &hit) {
            tracing::trace!(?child, "press forwarded to subframe");
            self.frame_state(frame).capturing_subframe = Some(child);
            return self.mouse_down_in(cx, child, input);
        }
        let raw = hit.inner_node.ok_or(InputError::NoTarget)?;
        let target = event_target(cx.page, raw);
        let point = hit.local_point;
        self.cursor_node = Some(raw);
        self.over_scrollbar = hit.scrollbar.is_some();

        self.update_hover(cx, Some(target), &input)?;
        cx.ensure_frame(frame)?;
        cx.ensure_node(target)?;
        self.set_active(cx.page, Some(target));

        let button = input.button.unwrap_or(PointerButton::Primary);
        let primary = button == PointerButton::Primary;
        let in_selection = primary && cx.host.selection_contains(cx.page, frame, point);
        let candidate = if primary && input.click_count <= 1 && hit.scrollbar.is_none() {
            self.draggable_node(cx, raw, frame, point, in_selection)
        } else {
            None
        };
        let may_start_select = primary
            && hit.scrollbar.is_none()
            && starts_selection(&*cx.host, cx.page, raw);
        {
            let state = self.frame_state(frame);
            state.mouse.reset();
            state.mouse.phase = PointerPhase::Pressed;
            state.mouse.press_node = Some(target);
            state.mouse.press_point = point;
            state.mouse.button = Some(button);
            state.mouse.granularity = Some(Granularity::from_click_count(input.click_count));
            state.mouse.drag.start(point);
            state.mouse.drag_candidate = candidate;
            state.mouse.may_start_select = may_start_select;
            state.mouse.press_in_selection = in_selection;
            state.clicks.on_down(
                MOUSE,
                Press::new(target, point, input.click_count, input.timestamp),
            );
        }
        if let Some((node, kind)) = candidate {
            tracing::trace!(?node, ?kind, "press may start a drag");
        }

        let mut ev = input.event(EventKind::MouseDown, cx.page, target);
        let prevented = cx.dispatch(target, &mut ev);
        cx.ensure_frame(frame)?;
        if prevented {
            tracing::trace!("mousedown canceled");
            self.frame_state(frame).clicks.swallow(MOUSE);
        }
        cx.ensure_node(target)?;

        if cx.page.flags(target).contains(NodeFlags::CAPTURES_POINTER) {
            let change = self.frame_state(frame).capture.set_now(MOUSE, target);
            self.dispatch_capture_change(cx, frame, change, &input)?;
        }

        // Focus moves even when mousedown was canceled.
        if let Err(err) = self.focus_for_press(cx, target, frame) {
            tracing::debug!(%err, "focus change swallowed the press");
            cx.ensure_frame(frame)?;
            let state = self.frame_state(frame);
            state.clicks.swallow(MOUSE);
            state.mouse.drag_candidate = None;
            state.mouse.may_start_select = false;
            return Ok(true);
        }
        if prevented {
            let state = self.frame_state(frame);
            state.mouse.drag_candidate = None;
            state.mouse.may_start_select = false;
            return Ok(true);
        }

        if let Some(bar) = hit.scrollbar {
            tracing::trace!(?bar, "scrollbar press");
            self.frame_state(frame).mouse.phase = PointerPhase::ScrollbarDrag(bar);
            return Ok(true);
        }
        match button {
            PointerButton::Secondary => self.context_menu(cx, target, &input),
            PointerButton::Primary => {
                if in_selection && candidate.is_some() {
                    // Leave the selection alone: it may be dragged, or collapsed on release.
                    return Ok(true);
                }
                if may_start_select {
                    let granularity = Granularity::from_click_count(input.click_count);
                    cx.host.select_at(cx.page, raw, point, granularity);
                    return Ok(true);
                }
                if !in_selection {
                    cx.host.clear_selection(frame);
                }
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    /// Dispatch `contextmenu` and, unless the page handles it, show the menu.
    pub(crate) fn context_menu(
        &mut self,
        cx: &mut Cx<'_>,
        target: NodeId,
        input: &PointerInput,
    ) -> Result<bool> {
        let mut ev = input.event(EventKind::ContextMenu, cx.page, target);
        if cx.dispatch(target, &mut ev) {
            tracing::debug!("contextmenu canceled by the page");
            return Ok(true);
        }
        cx.ensure_node(target)?;
        cx.host.show_context_menu(cx.page, target, input.root);
        Ok(true)
    }

    /// Deliver `lostpointercapture` then `gotpointercapture`.
    pub(crate) fn dispatch_capture_change(
        &mut self,
        cx: &mut Cx<'_>,
        frame: FrameId,
        change: CaptureChange<NodeId>,
        input: &PointerInput,
    ) -> Result<()> {
        if change.is_empty() {
            return Ok(());
        }
        tracing::debug!(lost = ?change.lost, got = ?change.got, "pointer capture changed");
        if let Some(lost) = change.lost {
            let mut ev = input.event(EventKind::LostPointerCapture, cx.page, lost);
            cx.dispatch(lost, &mut ev);
            cx.ensure_frame(frame)?;
        }
        if let Some(got) = change.got {
            let mut ev = input.event(EventKind::GotPointerCapture, cx.page, got);
            cx.dispatch(got, &mut ev);
            cx.ensure_frame(frame)?;
        }
        Ok(())
    }

    pub(crate) fn mouse_move(&mut self, cx: &mut Cx<'_>, input: PointerInput) -> Result<bool> {
        let main = cx.page.main_frame();
        self.mouse_move_in(cx, main, input)
    }

    fn mouse_move_in(
        &mut self,
        cx: &mut Cx<'_>,
        frame: FrameId,
        input: PointerInput,
    ) -> Result<bool> {
        cx.ensure_frame(frame)?;
        let point = cx.frame_point(frame, input.root)?;
        if let PointerPhase::ScrollbarDrag(bar) = self.frame_state(frame).mouse.phase {
            return self.drag_scrollbar(cx, frame, bar, point);
        }

        let change = self.frame_state(frame).capture.commit(MOUSE);
        self.dispatch_capture_change(cx, frame, change, &input)?;

        if let Some(child) = self.frame_state(frame).capturing_subframe {
            if cx.page.is_frame_attached(child) {
                return self.mouse_move_in(cx, child, input);
            }
            self.frame_state(frame).capturing_subframe = None;
        }

        let pressed = self.frame_state(frame).mouse.is_pressed();
        let captured = self.frame_state(frame).capture.target(MOUSE);
        let request = if pressed {
            HitTestRequest::MOVE | HitTestRequest::ACTIVE
        } else {
            HitTestRequest::MOVE
        };
        let hit = hit_in_frame(cx.page, frame, input.root, request)?;
        if !pressed
            && captured.is_none()
            && let Some(child) = forward_target(cx.page, &hit)
        {
            return self.mouse_move_in(cx, child, input);
        }

        self.cursor_node = hit.inner_node;
        self.over_scrollbar = hit.scrollbar.is_some();
        let target = captured.or_else(|| hit.inner_node.map(|n| event_target(cx.page, n)));
        self.update_hover(cx, target, &input)?;
        cx.ensure_frame(frame)?;
        self.cursor_timer.schedule(self.now);

        let Some(target) = target.filter(|t| cx.page.is_alive(*t)) else {
            return Ok(false);
        };
        let mut ev = input.event(EventKind::MouseMove, cx.page, target);
        let prevented = cx.dispatch(target, &mut ev);
        cx.ensure_frame(frame)?;
        if !pressed || prevented {
            return Ok(prevented);
        }
        let over = hit.inner_node.filter(|n| cx.page.is_alive(*n));
        self.continue_press(cx, frame, point, over, &input)
    }

    /// Hysteresis check, drag start, or selection extension for a held button.
    fn continue_press(
        &mut self,
        cx: &mut Cx<'_>,
        frame: FrameId,
        point: Point,
        over: Option<NodeId>,
        input: &PointerInput,
    ) -> Result<bool> {
        let state = self.frame_state(frame);
        if state.clicks.press(MOUSE).is_none_or(|p| p.swallowed) {
            return Ok(false);
        }
        if let Some((source, kind)) = state.mouse.drag_candidate {
            let threshold = self.config.drag.thresholds.for_kind(kind);
            let state = self.frame_state(frame);
            if !state.mouse.drag.exceeds(point, threshold) {
                return Ok(false);
            }
            let origin = DragOrigin {
                frame,
                source,
                kind,
                press_point: state.mouse.press_point,
                from_touch: false,
            };
            match self.start_drag(cx, origin, input) {
                Ok(()) => return Ok(true),
                Err(err) => {
                    tracing::debug!(%err, "drag did not start");
                    cx.ensure_frame(frame)?;
                    let state = self.frame_state(frame);
                    state.mouse.drag_candidate = None;
                    if kind == DragSourceKind::Selection {
                        return Ok(false);
                    }
                }
            }
        }
        let state = self.frame_state(frame);
        let Some(node) = over.or(state.mouse.press_node) else {
            return Ok(false);
        };
        if !state.mouse.may_start_select {
            return Ok(false);
        }
        state.mouse.phase = PointerPhase::Selecting;
        cx.host.extend_selection(cx.page, node, point);
        Ok(true)
    }

    pub(crate) fn mouse_up(&mut self, cx: &mut Cx<'_>, input: PointerInput) -> Result<bool> {
        let main = cx.page.main_frame();
        let result = self.mouse_up_in(cx, main, input);
        self.end_mouse_sequence(cx);
        result
    }

    fn mouse_up_in(
        &mut self,
        cx: &mut Cx<'_>,
        frame: FrameId,
        input: PointerInput,
    ) -> Result<bool> {
        cx.ensure_frame(frame)?;
        let point = cx.frame_point(frame, input.root)?;
        if let PointerPhase::ScrollbarDrag(_) = self.frame_state(frame).mouse.phase {
            let state = self.frame_state(frame);
            state.mouse.reset();
            state.clicks.cancel(MOUSE);
            return Ok(true);
        }

        if let Some(child) = self.frame_state(frame).capturing_subframe.take()
            && cx.page.is_frame_attached(child)
        {
            let handled = self.mouse_up_in(cx, child, input)?;
            if !handled {
                tracing::trace!(?child, "subframe declined the release");
                self.frame_state(frame).mouse.reset();
            }
            return Ok(handled);
        }

        let change = self.frame_state(frame).capture.commit(MOUSE);
        self.dispatch_capture_change(cx, frame, change, &input)?;

        let pressed = self.frame_state(frame).mouse.is_pressed();
        let captured = self.frame_state(frame).capture.target(MOUSE);
        let hit = hit_in_frame(cx.page, frame, input.root, HitTestRequest::RELEASE)?;
        if !pressed
            && captured.is_none()
            && let Some(child) = forward_target(cx.page, &hit)
        {
            return self.mouse_up_in(cx, child, input);
        }
        let target = captured
            .or_else(|| hit.inner_node.map(|n| event_target(cx.page, n)))
            .filter(|t| cx.page.is_alive(*t));
        let Some(target) = target else {
            self.frame_state(frame).clicks.cancel(MOUSE);
            return Err(InputError::NoTarget);
        };

        let mut ev = input.event(EventKind::MouseUp, cx.page, target);
        let prevented = cx.dispatch(target, &mut ev);
        cx.ensure_frame(frame)?;

        if let Some(holder) = self.frame_state(frame).capture.clear(MOUSE) {
            let mut lost = input.event(EventKind::LostPointerCapture, cx.page, holder);
            cx.dispatch(holder, &mut lost);
            cx.ensure_frame(frame)?;
        }

        let mut consumed = prevented;
        match self.frame_state(frame).clicks.on_up(MOUSE, prevented) {
            ClickResult::Click(press) => {
                consumed |= self.dispatch_click(cx, frame, &press, target, &input)?;
            }
            ClickResult::Suppressed(why) => tracing::trace!(?why, "no click"),
        }

        let state = self.frame_state(frame);
        if state.mouse.press_in_selection && state.mouse.phase == PointerPhase::Pressed {
            // A press inside the selection that never became a drag collapses it.
            cx.host.clear_selection(frame);
            if let Some(raw) = hit.inner_node.filter(|n| cx.page.is_alive(*n))
                && cx.host.can_start_selection(cx.page, raw)
            {
                cx.host.select_at(cx.page, raw, point, Granularity::Character);
            }
        }
        self.frame_state(frame).mouse.reset();
        Ok(consumed)
    }

    /// Fire `click` (and `dblclick` for a second click) at the common ancestor
    /// of the press and release targets.
    fn dispatch_click(
        &mut self,
        cx: &mut Cx<'_>,
        frame: FrameId,
        press: &Press<NodeId>,
        release_target: NodeId,
        input: &PointerInput,
    ) -> Result<bool> {
        cx.ensure_node(press.target)?;
        cx.ensure_node(release_target)?;
        let Some(click_target) = cx.page.common_ancestor(press.target, release_target) else {
            tracing::trace!("press and release in different documents; no click");
            return Ok(false);
        };
        let mut ev = input.event(EventKind::Click, cx.page, click_target);
        ev.click_count = press.click_count;
        let mut consumed = cx.dispatch(click_target, &mut ev);
        cx.ensure_frame(frame)?;
        if press.click_count == 2 && cx.page.is_alive(click_target) {
            let mut dbl = input.event(EventKind::DblClick, cx.page, click_target);
            dbl.click_count = 2;
            consumed |= cx.dispatch(click_target, &mut dbl);
            cx.ensure_frame(frame)?;
        }
        Ok(consumed)
    }

    /// Reset every frame's press sequence and the active chain.
    pub(crate) fn end_mouse_sequence(&mut self, cx: &mut Cx<'_>) {
        for state in self.frames.values_mut() {
            state.mouse.reset();
            state.capturing_subframe = None;
            state.capture.clear(MOUSE);
            state.clicks.cancel(MOUSE);
        }
        self.set_active(cx.page, None);
        self.cursor_timer.schedule(self.now);
    }
}
