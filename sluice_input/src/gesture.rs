// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recognized gestures.
//!
//! Scroll gestures walk the cached scroll chain (see [`scroll`](crate::scroll)).
//! Every other gesture is resolved to one point first: a gesture carrying a
//! finger-sized area goes through touch adjustment, and the adjusted point is
//! then hit tested precisely. A tap becomes a synthetic mouse move, press and
//! release at that point, each hit testing again so DOM changes made by the
//! previous step are seen. A long press tries to start a drag (when drag from
//! touch is enabled), then selects the word under the finger, then falls back
//! to a context menu.

use kurbo::{Point, Rect, Size};
use sluice_tree::HitTestRequest;

use crate::drag::{DragOrigin, starts_selection};
use crate::error::{InputError, Result};
use crate::event::{GestureEvent, GestureKind, PointerButton, PointerButtons};
use crate::frame_router::{deepest_hit, event_target};
use crate::handler::{Cx, EventHandler, PointerInput};
use crate::host::Granularity;
use crate::touch_adjust::{
    AdjustKind, adjusted_point, best_target, find_touch_targets, retain_good,
};

/// Where an imprecise gesture lands.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Adjusted {
    /// Continue at this main-frame point.
    At(Point),
    /// The chrome is showing a disambiguation popup; the gesture is done.
    Popup,
}

impl EventHandler {
    pub(crate) fn gesture(&mut self, cx: &mut Cx<'_>, ev: &GestureEvent) -> Result<bool> {
        let root = cx.root_point(ev.position);
        match ev.kind {
            GestureKind::ScrollBegin => Ok(self.begin_scroll_gesture(cx, root)),
            GestureKind::ScrollUpdate { delta } => Ok(self.update_scroll_gesture(cx, root, delta)),
            GestureKind::ScrollEnd => Ok(self.end_scroll_gesture(cx)),
            GestureKind::PinchBegin => {
                self.pinching = true;
                Ok(true)
            }
            GestureKind::PinchUpdate { scale } => Ok(self.pinch(cx, scale)),
            GestureKind::PinchEnd => {
                self.pinching = false;
                Ok(true)
            }
            GestureKind::TapDown => Ok(false),
            GestureKind::ShowPress => self.show_press(cx, root, ev),
            GestureKind::TapCancel => {
                self.set_active(cx.page, None);
                Ok(false)
            }
            GestureKind::Tap { tap_count } => self.tap(cx, root, ev, tap_count),
            GestureKind::LongPress => self.long_press(cx, root, ev),
            GestureKind::LongTap => self.long_tap(cx, root, ev),
            GestureKind::TwoFingerTap => self.gesture_context_menu(cx, root, ev),
        }
    }

    /// Resolve a gesture area to a single point.
    fn adjust(&mut self, cx: &mut Cx<'_>, root: Point, area: Size, kind: AdjustKind) -> Adjusted {
        let area = Size::new(area.width.max(0.0), area.height.max(0.0));
        if area.width == 0.0 && area.height == 0.0 {
            return Adjusted::At(root);
        }
        let scale = cx.page.page_scale();
        let area = Size::new(area.width / scale, area.height / scale);
        let padding = (area.width + area.height) / 4.0;
        let hit = deepest_hit(cx.page, root, HitTestRequest::READ_ONLY, padding);
        let targets = find_touch_targets(cx.page, &hit, root, padding, kind);
        let targets = retain_good(targets, self.config.touch.ambiguity_ratio);
        if kind == AdjustKind::Tap
            && targets.len() > 1
            && self.config.touch.disambiguation_popup
            && cx
                .host
                .show_disambiguation_popup(Rect::from_center_size(root, area), &targets)
        {
            tracing::debug!(targets = targets.len(), "ambiguous tap; disambiguation popup shown");
            return Adjusted::Popup;
        }
        match best_target(&targets) {
            Some(best) => {
                let point = adjusted_point(root, best.rect);
                tracing::trace!(node = ?best.node, score = best.score, ?point, "touch adjusted");
                Adjusted::At(point)
            }
            None => Adjusted::At(root),
        }
    }

    fn show_press(&mut self, cx: &mut Cx<'_>, root: Point, ev: &GestureEvent) -> Result<bool> {
        let Adjusted::At(point) = self.adjust(cx, root, ev.area, AdjustKind::Tap) else {
            return Ok(true);
        };
        let hit = deepest_hit(cx.page, point, HitTestRequest::ACTIVE, 0.0);
        let target = hit
            .inner_node
            .map(|n| event_target(cx.page, n))
            .ok_or(InputError::NoTarget)?;
        self.set_active(cx.page, Some(target));
        Ok(true)
    }

    /// A tap: synthetic move, press and release at the adjusted point.
    fn tap(
        &mut self,
        cx: &mut Cx<'_>,
        root: Point,
        ev: &GestureEvent,
        tap_count: u8,
    ) -> Result<bool> {
        let Adjusted::At(point) = self.adjust(cx, root, ev.area, AdjustKind::Tap) else {
            return Ok(true);
        };
        let hover = PointerInput {
            root: point,
            button: None,
            buttons: PointerButtons::empty(),
            modifiers: ev.modifiers,
            click_count: 0,
            timestamp: ev.timestamp,
        };
        self.remember_position(point, ev.modifiers);
        if let Err(err) = self.mouse_move(cx, hover) {
            tracing::debug!(%err, "synthetic tap move aborted");
        }
        let press = PointerInput {
            button: Some(PointerButton::Primary),
            buttons: PointerButtons::PRIMARY,
            click_count: tap_count.max(1),
            ..hover
        };
        let down = self.mouse_down(cx, press);
        let release = PointerInput {
            buttons: PointerButtons::empty(),
            ..press
        };
        let up = self.mouse_up(cx, release);
        let down = down?;
        Ok(up? || down)
    }

    fn long_press(&mut self, cx: &mut Cx<'_>, root: Point, ev: &GestureEvent) -> Result<bool> {
        self.long_tap_context_menu = false;
        if self.config.drag.touch_drag_drop_enabled && self.try_touch_drag(cx, root, ev) {
            self.long_tap_context_menu = true;
            return Ok(true);
        }
        let Adjusted::At(point) = self.adjust(cx, root, ev.area, AdjustKind::ContextMenu) else {
            return Ok(true);
        };
        let hit = deepest_hit(cx.page, point, HitTestRequest::ACTIVE, 0.0);
        let (Some(raw), Some(frame)) = (hit.inner_node, hit.frame) else {
            return Err(InputError::NoTarget);
        };
        if cx.page.is_text(raw) && starts_selection(&*cx.host, cx.page, raw) {
            tracing::debug!(?raw, "long press selects a word");
            cx.host.clear_selection(frame);
            cx.host.select_at(cx.page, raw, hit.local_point, Granularity::Word);
            return Ok(true);
        }
        self.gesture_context_menu_at(cx, point, ev)
    }

    /// Start a drag from a long press. Returns whether one started.
    fn try_touch_drag(&mut self, cx: &mut Cx<'_>, root: Point, ev: &GestureEvent) -> bool {
        let hit = deepest_hit(cx.page, root, HitTestRequest::ACTIVE, 0.0);
        let (Some(raw), Some(frame)) = (hit.inner_node, hit.frame) else {
            return false;
        };
        let point = hit.local_point;
        let in_selection = cx.host.selection_contains(cx.page, frame, point);
        let Some((source, kind)) = self.draggable_node(cx, raw, frame, point, in_selection) else {
            tracing::trace!("nothing draggable under the long press");
            return false;
        };
        let input = PointerInput {
            root,
            button: Some(PointerButton::Primary),
            buttons: PointerButtons::PRIMARY,
            modifiers: ev.modifiers,
            click_count: 1,
            timestamp: ev.timestamp,
        };
        let origin = DragOrigin {
            frame,
            source,
            kind,
            press_point: point,
            from_touch: true,
        };
        match self.start_drag(cx, origin, &input) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(%err, "long press did not start a drag");
                false
            }
        }
    }

    /// Finger lifted after a long press. Shows the context menu the drag
    /// attempt deferred.
    fn long_tap(&mut self, cx: &mut Cx<'_>, root: Point, ev: &GestureEvent) -> Result<bool> {
        if !std::mem::take(&mut self.long_tap_context_menu) {
            return Ok(false);
        }
        if self.drag.as_ref().is_some_and(|s| s.from_touch()) {
            self.cancel_drag(cx)?;
        }
        self.gesture_context_menu(cx, root, ev)
    }

    fn gesture_context_menu(
        &mut self,
        cx: &mut Cx<'_>,
        root: Point,
        ev: &GestureEvent,
    ) -> Result<bool> {
        let Adjusted::At(point) = self.adjust(cx, root, ev.area, AdjustKind::ContextMenu) else {
            return Ok(true);
        };
        self.gesture_context_menu_at(cx, point, ev)
    }

    fn gesture_context_menu_at(
        &mut self,
        cx: &mut Cx<'_>,
        point: Point,
        ev: &GestureEvent,
    ) -> Result<bool> {
        let hit = deepest_hit(cx.page, point, HitTestRequest::ACTIVE, 0.0);
        let target = hit
            .inner_node
            .map(|n| event_target(cx.page, n))
            .ok_or(InputError::NoTarget)?;
        let input = PointerInput {
            root: point,
            button: Some(PointerButton::Secondary),
            buttons: PointerButtons::SECONDARY,
            modifiers: ev.modifiers,
            click_count: 1,
            timestamp: ev.timestamp,
        };
        self.context_menu(cx, target, &input)
    }

    /// Scale the page by `factor` within the configured bounds.
    fn pinch(&mut self, cx: &mut Cx<'_>, factor: f64) -> bool {
        if !self.pinching {
            tracing::debug!("pinch update without pinch begin");
        }
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let bounds = self.config.pinch;
        let old = cx.page.page_scale();
        let new = (old * factor).clamp(bounds.min_scale, bounds.max_scale);
        if new == old {
            return false;
        }
        tracing::debug!(from = old, to = new, "page scale changed");
        cx.page.set_page_scale(new);
        self.fake_move_pending = true;
        true
    }
}
