// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag and drop.
//!
//! A press records a *candidate* source; nothing is committed until the
//! pointer moves past the hysteresis threshold of the candidate's kind. Then
//! the payload is filled, `dragstart` runs (and may cancel), the payload turns
//! protected, and the platform takes over the drag.
//!
//! Every update re-hit-tests from the main frame. A frame whose target node
//! changed fires `dragenter` at the new node before `dragleave` at the old
//! one; when the node under the pointer is a local frame owner the whole
//! protocol runs inside that frame instead, so entering or leaving an iframe
//! produces exactly one enter/leave pair. Targets that do not cancel
//! `dragenter`/`dragover` may still accept through a declared drop zone on
//! themselves or an ancestor, or, for editable targets, through the editing
//! fallback.
//!
//! A drop dispatches `drop` at the current target (payload read-only). If the
//! page does not handle it and the target is editable, the richest fragment of
//! the payload is inserted, moving the selection instead when it comes from
//! the same editing host and the copy modifier is up. The source then gets
//! `dragend` carrying the operation performed.

use kurbo::Point;
use sluice_event_state::drag::DragSourceKind;
use sluice_tree::{ElementKind, FrameId, HitTestRequest, NodeFlags, NodeId, NodeState, Page};

use crate::config::DragSourceActions;
use crate::data_transfer::{DataTransfer, DataTransferAccess, DragOperation};
use crate::dom_event::{DomEvent, EventKind};
use crate::error::{InputError, Result};
use crate::event::{Modifiers, PointerId};
use crate::frame_router::{event_target, forward_target, hit_in_frame, local_content_frame};
use crate::frame_state::PointerPhase;
use crate::handler::{Cx, EventHandler, PointerInput};
use crate::host::Host;

/// Where a drag begins.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct DragOrigin {
    pub(crate) frame: FrameId,
    pub(crate) source: NodeId,
    pub(crate) kind: DragSourceKind,
    /// Press position in `frame` coordinates.
    pub(crate) press_point: Point,
    pub(crate) from_touch: bool,
}

/// An in-progress drag.
#[derive(Clone, Debug)]
pub struct DragSession {
    source: Option<NodeId>,
    source_frame: Option<FrameId>,
    kind: Option<DragSourceKind>,
    data: DataTransfer,
    root_point: Point,
    modifiers: Modifiers,
    operation: DragOperation,
    edit_accepted: bool,
    moved_selection: bool,
    from_touch: bool,
}

impl DragSession {
    pub(crate) fn external(data: DataTransfer) -> Self {
        Self {
            source: None,
            source_frame: None,
            kind: None,
            data,
            root_point: Point::ZERO,
            modifiers: Modifiers::default(),
            operation: DragOperation::empty(),
            edit_accepted: false,
            moved_selection: false,
            from_touch: false,
        }
    }

    /// Node being dragged; `None` for content dragged in from outside the page.
    pub fn source(&self) -> Option<NodeId> {
        self.source
    }

    /// Frame the drag started in.
    pub fn source_frame(&self) -> Option<FrameId> {
        self.source_frame
    }

    /// What is being dragged; `None` for external drags.
    pub fn kind(&self) -> Option<DragSourceKind> {
        self.kind
    }

    /// The payload.
    pub fn data(&self) -> &DataTransfer {
        &self.data
    }

    /// Operation the current target accepts.
    pub fn operation(&self) -> DragOperation {
        self.operation
    }

    /// Last pointer position, in main-frame coordinates.
    pub fn root_point(&self) -> Point {
        self.root_point
    }

    /// Whether the drag came from outside the page.
    pub fn is_external(&self) -> bool {
        self.source.is_none()
    }

    /// Whether a long press started the drag.
    pub fn from_touch(&self) -> bool {
        self.from_touch
    }
}

/// Whether a press on `node` starts a text selection. Link text does not.
pub(crate) fn starts_selection(host: &dyn Host, page: &Page, node: NodeId) -> bool {
    let in_link = page
        .ancestors(node)
        .any(|a| page.element_kind(a) == Some(ElementKind::Link) && page.url(a).is_some());
    (!in_link || page.is_editable(node)) && host.can_start_selection(page, node)
}

impl EventHandler {
    /// Draggable content under a press, walking out from the hit node.
    ///
    /// A press on selectable text outside the selection finds nothing, so the
    /// selection can start instead.
    pub(crate) fn draggable_node(
        &self,
        cx: &Cx<'_>,
        raw: NodeId,
        frame: FrameId,
        point: Point,
        in_selection: bool,
    ) -> Option<(NodeId, DragSourceKind)> {
        let page = &*cx.page;
        let drag = &self.config.drag;
        let permits = |k| drag.source_actions.contains(DragSourceActions::for_kind(k));
        let selection = in_selection && permits(DragSourceKind::Selection);
        for node in page.ancestors(raw) {
            if !selection && page.is_text(node) && starts_selection(&*cx.host, page, node) {
                return None;
            }
            if page.element_kind(node).is_none() {
                continue;
            }
            let flags = page.flags(node);
            if flags.contains(NodeFlags::DRAGGABLE) {
                if permits(DragSourceKind::Element) {
                    return Some((node, DragSourceKind::Element));
                }
                continue;
            }
            if flags.contains(NodeFlags::NO_DRAG) {
                continue;
            }
            match page.element_kind(node) {
                Some(ElementKind::Image)
                    if drag.images_enabled && permits(DragSourceKind::Image) =>
                {
                    return Some((node, DragSourceKind::Image));
                }
                Some(ElementKind::Link)
                    if page.url(node).is_some() && permits(DragSourceKind::Link) =>
                {
                    return Some((node, DragSourceKind::Link));
                }
                _ => {}
            }
        }
        if selection {
            tracing::trace!(?frame, ?point, "press inside the selection");
            return Some((event_target(page, raw), DragSourceKind::Selection));
        }
        None
    }

    /// Commit a drag: fill the payload, run `dragstart`, hand off to the platform.
    pub(crate) fn start_drag(
        &mut self,
        cx: &mut Cx<'_>,
        origin: DragOrigin,
        input: &PointerInput,
    ) -> Result<()> {
        if self.drag.is_some() {
            tracing::debug!("drag start rejected: a drag is already in progress");
            return Err(InputError::DragInProgress);
        }
        let DragOrigin {
            frame,
            source,
            kind,
            press_point,
            from_touch,
        } = origin;
        cx.ensure_frame(frame)?;
        cx.ensure_node(source)?;

        let mut data = DataTransfer::new(DataTransferAccess::ReadWrite);
        match kind {
            DragSourceKind::Selection => {
                let content = cx
                    .host
                    .selected_content(cx.page, frame)
                    .ok_or(InputError::DragSourceMissing)?;
                data.set_data("text/plain", content.text);
                if let Some(html) = content.html {
                    data.set_data("text/html", html);
                }
            }
            DragSourceKind::Link => {
                let url = cx.page.url(source).ok_or(InputError::DragSourceMissing)?.to_owned();
                data.set_data("text/uri-list", url.clone());
                data.set_data("text/plain", url);
            }
            DragSourceKind::Image => {
                if let Some(url) = cx.page.url(source) {
                    data.set_data("text/uri-list", url.to_owned());
                }
            }
            DragSourceKind::Element => {}
        }

        let root_press = cx
            .page
            .point_to_root(frame, press_point)
            .ok_or(InputError::FrameDetached(frame))?;
        let mut ev = DomEvent::new(EventKind::DragStart).at(press_point, root_press);
        ev.modifiers = input.modifiers;
        ev.buttons = input.buttons;
        ev.timestamp = input.timestamp;
        ev.data_transfer = Some(data);
        let prevented = cx.dispatch(source, &mut ev);
        cx.ensure_frame(frame)?;
        if prevented {
            tracing::debug!(?source, "dragstart canceled");
            return Err(InputError::DragSourceMissing);
        }
        cx.ensure_node(source)?;
        let mut data = ev.data_transfer.take().unwrap_or_default();
        data.set_access(DataTransferAccess::Protected);

        let image = cx.host.create_drag_image(cx.page, source, kind);
        if !cx.host.start_native_drag(image.as_ref(), &data, input.root, from_touch) {
            tracing::debug!("platform refused the drag");
            let mut end = DomEvent::new(EventKind::DragEnd).at(press_point, root_press);
            data.set_drop_effect(DragOperation::empty());
            end.data_transfer = Some(data);
            cx.dispatch(source, &mut end);
            return Err(InputError::DragSourceMissing);
        }

        let state = self.frame_state(frame);
        state.clicks.cancel(PointerId::MOUSE);
        state.mouse.drag_candidate = None;
        if state.mouse.is_pressed() {
            state.mouse.phase = PointerPhase::Dragging;
        }
        self.set_active(cx.page, None);
        self.drag = Some(DragSession {
            source: Some(source),
            source_frame: Some(frame),
            kind: Some(kind),
            data,
            root_point: input.root,
            modifiers: input.modifiers,
            operation: DragOperation::empty(),
            edit_accepted: false,
            moved_selection: false,
            from_touch,
        });
        tracing::debug!(?kind, ?source, from_touch, "drag started");

        if let Err(err) = self.drag_update(cx, input.root, input.modifiers) {
            tracing::debug!(%err, "first drag update failed; abandoning the drag");
            self.finish_drag(cx, DragOperation::empty());
            return Err(err);
        }
        Ok(())
    }

    /// Track the drag target at a main-frame point.
    pub(crate) fn drag_update(
        &mut self,
        cx: &mut Cx<'_>,
        root: Point,
        modifiers: Modifiers,
    ) -> Result<DragOperation> {
        let Some(session) = self.drag.as_mut() else {
            return Ok(DragOperation::empty());
        };
        session.root_point = root;
        session.modifiers = modifiers;
        let main = cx.page.main_frame();
        let op = self.update_drag_in(cx, main, root, modifiers)?;
        if let Some(session) = self.drag.as_mut() {
            session.operation = op;
        }
        tracing::trace!(?op, "drag updated");
        Ok(op)
    }

    fn update_drag_in(
        &mut self,
        cx: &mut Cx<'_>,
        frame: FrameId,
        root: Point,
        modifiers: Modifiers,
    ) -> Result<DragOperation> {
        let hit = hit_in_frame(cx.page, frame, root, HitTestRequest::READ_ONLY)?;
        let child = forward_target(cx.page, &hit);
        let new_target = hit.inner_node.map(|n| event_target(cx.page, n));
        let old_target = self.frame_state(frame).drag_target;

        if new_target == old_target {
            if let Some(child) = child {
                return self.update_drag_in(cx, child, root, modifiers);
            }
            let Some(target) = new_target else {
                return Ok(DragOperation::empty());
            };
            if !self.frame_state(frame).only_dragover {
                self.fire_source_drag(cx)?;
                cx.ensure_frame(frame)?;
            }
            let op = self.fire_target_event(cx, target, EventKind::DragOver)?;
            cx.ensure_frame(frame)?;
            self.frame_state(frame).only_dragover = false;
            return Ok(op);
        }

        let mut op = DragOperation::empty();
        if let Some(child) = child {
            op = self.update_drag_in(cx, child, root, modifiers)?;
        } else if let Some(target) = new_target {
            self.fire_source_drag(cx)?;
            cx.ensure_frame(frame)?;
            op = self.fire_target_event(cx, target, EventKind::DragEnter)?;
            cx.ensure_frame(frame)?;
        }
        if let Some(old) = old_target.filter(|o| cx.page.is_alive(*o)) {
            cx.page.set_state(old, NodeState::DRAG_OVER, false);
            if let Some(old_child) = local_content_frame(cx.page, old) {
                self.cancel_drag_in(cx, old_child)?;
            } else {
                self.dispatch_drag_event(
                    cx,
                    old,
                    EventKind::DragLeave,
                    DataTransferAccess::Protected,
                );
            }
            cx.ensure_frame(frame)?;
        }
        let new_target = new_target.filter(|n| cx.page.is_alive(*n));
        if let Some(new) = new_target
            && child.is_none()
        {
            cx.page.set_state(new, NodeState::DRAG_OVER, true);
        }
        let state = self.frame_state(frame);
        state.drag_target = new_target;
        state.only_dragover = new_target.is_some();
        Ok(op)
    }

    /// Fire `drag` at the source.
    fn fire_source_drag(&mut self, cx: &mut Cx<'_>) -> Result<()> {
        let Some(source) = self.drag.as_ref().and_then(|s| s.source) else {
            return Ok(());
        };
        if !cx.page.is_alive(source) {
            return Ok(());
        }
        self.dispatch_drag_event(cx, source, EventKind::Drag, DataTransferAccess::Protected);
        if self.drag.is_none() {
            return Err(InputError::DragSourceMissing);
        }
        Ok(())
    }

    /// Fire `dragenter`/`dragover` at `target` and work out what it accepts.
    fn fire_target_event(
        &mut self,
        cx: &mut Cx<'_>,
        target: NodeId,
        kind: EventKind,
    ) -> Result<DragOperation> {
        let prevented =
            self.dispatch_drag_event(cx, target, kind, DataTransferAccess::Protected);
        let modifiers = self.drag.as_ref().map(|s| s.modifiers).unwrap_or_default();
        let is_move = self.is_move_drop(cx.page, target, modifiers);
        let Some(session) = self.drag.as_mut() else {
            return Err(InputError::DragSourceMissing);
        };
        session.edit_accepted = false;
        if prevented {
            return Ok(session.data.negotiated_operation());
        }
        if !cx.page.is_alive(target) {
            return Ok(DragOperation::empty());
        }
        let allowed = session.data.effect_allowed;
        let zone_op = cx
            .page
            .ancestors(target)
            .filter_map(|n| cx.page.drop_zone(n))
            .find(|zone| session.data.matches_zone(zone))
            .map(|zone| DragOperation::from_zone(zone.operation))
            .filter(|op| allowed.contains(*op));
        if let Some(op) = zone_op {
            tracing::trace!(?op, "accepted by drop zone");
            return Ok(op);
        }
        if cx.page.is_editable(target) && session.data.richest_fragment().is_some() {
            session.edit_accepted = true;
            return Ok(if is_move {
                DragOperation::MOVE
            } else {
                DragOperation::COPY
            });
        }
        Ok(DragOperation::empty())
    }

    /// Dispatch a drag event carrying the session payload. Returns whether it
    /// was canceled.
    fn dispatch_drag_event(
        &mut self,
        cx: &mut Cx<'_>,
        target: NodeId,
        kind: EventKind,
        access: DataTransferAccess,
    ) -> bool {
        let Some(session) = self.drag.as_mut() else {
            return false;
        };
        let root = session.root_point;
        let mut data = std::mem::take(&mut session.data);
        data.set_access(access);
        if matches!(kind, EventKind::DragEnter | EventKind::DragOver) {
            data.reset_drop_effect();
        }
        let frame_point = cx
            .page
            .frame_of(target)
            .and_then(|f| cx.page.point_from_root(f, root))
            .unwrap_or(root);
        let mut ev = DomEvent::new(kind).at(frame_point, root);
        ev.modifiers = session.modifiers;
        ev.pointer_id = Some(PointerId::MOUSE);
        ev.timestamp = self.now;
        ev.data_transfer = Some(data);
        let prevented = cx.dispatch(target, &mut ev);
        if let Some(session) = self.drag.as_mut() {
            session.data = ev.data_transfer.take().unwrap_or_default();
            session.data.set_access(DataTransferAccess::Protected);
        }
        prevented
    }

    /// Whether an edit drop onto `target` moves the selection instead of copying.
    fn is_move_drop(&self, page: &Page, target: NodeId, modifiers: Modifiers) -> bool {
        let Some(session) = &self.drag else {
            return false;
        };
        let copy = self.config.drag.copy_modifier;
        if session.kind != Some(DragSourceKind::Selection)
            || (!copy.is_empty() && modifiers.contains(copy))
        {
            return false;
        }
        let Some(source) = session.source.filter(|s| page.is_alive(*s)) else {
            return false;
        };
        let root = page.editable_root(source);
        root.is_some()
            && page.frame_of(source) == page.frame_of(target)
            && root == page.editable_root(target)
    }

    /// Finish the drag at a main-frame point.
    pub(crate) fn drop_at(
        &mut self,
        cx: &mut Cx<'_>,
        root: Point,
        modifiers: Modifiers,
    ) -> Result<bool> {
        let Some(session) = self.drag.as_mut() else {
            return Ok(false);
        };
        session.root_point = root;
        session.modifiers = modifiers;
        let accepted = !session.operation.is_empty();
        let main = cx.page.main_frame();
        let result = if accepted {
            self.drop_in(cx, main, root, modifiers)
        } else {
            tracing::debug!("drop over a target that did not accept");
            self.cancel_drag_in(cx, main).map(|()| DragOperation::empty())
        };
        let performed = result.as_ref().map_or(DragOperation::empty(), |op| *op);
        self.finish_drag(cx, performed);
        result.map(|op| !op.is_empty())
    }

    fn drop_in(
        &mut self,
        cx: &mut Cx<'_>,
        frame: FrameId,
        root: Point,
        modifiers: Modifiers,
    ) -> Result<DragOperation> {
        cx.ensure_frame(frame)?;
        let tracked = self.frame_state(frame).drag_target;
        if let Some(child) = tracked.and_then(|t| local_content_frame(cx.page, t)) {
            self.frame_state(frame).clear_drag_state();
            return self.drop_in(cx, child, root, modifiers);
        }
        let target = match tracked.filter(|t| cx.page.is_alive(*t)) {
            Some(t) => t,
            None => {
                let hit = hit_in_frame(cx.page, frame, root, HitTestRequest::RELEASE)?;
                hit.inner_node
                    .map(|n| event_target(cx.page, n))
                    .ok_or(InputError::NoTarget)?
            }
        };
        let operation = self.drag.as_ref().map_or(DragOperation::empty(), |s| s.operation);
        let prevented =
            self.dispatch_drag_event(cx, target, EventKind::Drop, DataTransferAccess::ReadOnly);
        cx.ensure_frame(frame)?;
        cx.page.set_state(target, NodeState::DRAG_OVER, false);
        self.frame_state(frame).clear_drag_state();
        if prevented {
            tracing::debug!(?target, "drop handled by the page");
            return Ok(operation);
        }
        let edit_accepted = self.drag.as_ref().is_some_and(|s| s.edit_accepted);
        if !edit_accepted || !cx.page.is_alive(target) || !cx.page.is_editable(target) {
            return Ok(DragOperation::empty());
        }
        self.edit_drop(cx, frame, target, root, modifiers)
    }

    /// Insert the payload into an editable drop target.
    fn edit_drop(
        &mut self,
        cx: &mut Cx<'_>,
        frame: FrameId,
        target: NodeId,
        root: Point,
        modifiers: Modifiers,
    ) -> Result<DragOperation> {
        let is_move = self.is_move_drop(cx.page, target, modifiers);
        let Some(session) = self.drag.as_mut() else {
            return Ok(DragOperation::empty());
        };
        let Some(fragment) = session.data.richest_fragment() else {
            return Err(InputError::DragSourceMissing);
        };
        let point = cx.frame_point(frame, root)?;
        let smart = session.kind == Some(DragSourceKind::Selection);
        let done = if is_move {
            cx.host.move_selection(cx.page, target, point, &fragment, smart)
        } else {
            cx.host.apply_fragment(cx.page, target, point, &fragment, smart)
        };
        tracing::debug!(is_move, done, "edit drop");
        if !done {
            return Ok(DragOperation::empty());
        }
        if let Some(session) = self.drag.as_mut() {
            session.moved_selection = is_move;
        }
        Ok(if is_move {
            DragOperation::MOVE
        } else {
            DragOperation::COPY
        })
    }

    /// Fire `dragleave` at the frame's tracked target, recursing into frames.
    fn cancel_drag_in(&mut self, cx: &mut Cx<'_>, frame: FrameId) -> Result<()> {
        cx.ensure_frame(frame)?;
        let state = self.frame_state(frame);
        let old = state.drag_target.take();
        state.only_dragover = false;
        let Some(old) = old.filter(|o| cx.page.is_alive(*o)) else {
            return Ok(());
        };
        cx.page.set_state(old, NodeState::DRAG_OVER, false);
        if let Some(child) = local_content_frame(cx.page, old) {
            return self.cancel_drag_in(cx, child);
        }
        self.dispatch_drag_event(cx, old, EventKind::DragLeave, DataTransferAccess::Protected);
        cx.ensure_frame(frame)
    }

    /// `dragend` at the source, deferred selection delete, session teardown.
    fn finish_drag(&mut self, cx: &mut Cx<'_>, performed: DragOperation) {
        let Some(session) = self.drag.as_mut() else {
            return;
        };
        session.data.set_drop_effect(performed);
        let source = session.source.filter(|s| cx.page.is_alive(*s));
        let delete_from = (performed == DragOperation::MOVE
            && session.kind == Some(DragSourceKind::Selection)
            && !session.moved_selection)
            .then_some(session.source_frame)
            .flatten();
        if let Some(source) = source {
            self.dispatch_drag_event(cx, source, EventKind::DragEnd, DataTransferAccess::Protected);
        }
        if let Some(frame) = delete_from
            && cx.page.is_frame_attached(frame)
            && source.is_some_and(|s| cx.page.is_alive(s) && cx.page.is_editable(s))
        {
            cx.host.delete_selection(cx.page, frame);
        }
        tracing::debug!(?performed, "drag finished");
        self.end_drag_session(cx);
    }

    /// Cancel the drag: `dragleave` at the target, `dragend` with no operation.
    pub(crate) fn cancel_drag(&mut self, cx: &mut Cx<'_>) -> Result<()> {
        if self.drag.is_none() {
            return Ok(());
        }
        tracing::debug!("drag cancelled");
        let main = cx.page.main_frame();
        let result = self.cancel_drag_in(cx, main);
        self.finish_drag(cx, DragOperation::empty());
        result
    }

    /// The drag left the page: targets get `dragleave`; an external drag ends.
    pub(crate) fn drag_exit(&mut self, cx: &mut Cx<'_>) -> Result<()> {
        let Some(session) = self.drag.as_mut() else {
            return Ok(());
        };
        session.operation = DragOperation::empty();
        let external = session.is_external();
        let main = cx.page.main_frame();
        let result = self.cancel_drag_in(cx, main);
        if external {
            self.end_drag_session(cx);
        }
        result
    }

    /// Drop the session and every frame's drag and press state.
    pub(crate) fn end_drag_session(&mut self, cx: &mut Cx<'_>) {
        self.drag = None;
        for state in self.frames.values_mut() {
            if let Some(target) = state.drag_target {
                cx.page.set_state(target, NodeState::DRAG_OVER, false);
            }
            state.clear_drag_state();
            state.mouse.reset();
            state.capturing_subframe = None;
            state.clicks.cancel(PointerId::MOUSE);
        }
        self.set_active(cx.page, None);
    }
}
