// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The page-wide input handler.
//!
//! [`EventHandler`] is the single owner of page-wide input state: the hover and
//! active chains, focus, the drag session, touch targets, the scroll gesture
//! and the cursor timer. Frame-local state (press sequences, clicks, capture,
//! drag targets) lives in a lazily created per-frame record keyed by
//! [`FrameId`].
//!
//! Every public entry point returns whether the input was consumed. Internal
//! steps return [`Result`]; an error means "stop here", is logged, and turns
//! into `false`.

use hashbrown::HashMap;
use kurbo::Point;
use sluice_event_state::capture::CaptureMap;
use sluice_event_state::touch::TouchTargets;
use sluice_responder::focus::FocusState;
use sluice_responder::hover::HoverState;
use sluice_tree::{FrameId, NodeId, Page};

use crate::config::InputConfig;
use crate::cursor::{Cursor, CursorHints, CursorTimer, resolve_cursor};
use crate::data_transfer::{DataTransfer, DataTransferAccess, DragOperation};
use crate::dom_event::{DomEvent, EventKind};
use crate::drag::DragSession;
use crate::error::{InputError, Result};
use crate::event::{
    GestureEvent, KeyEvent, Modifiers, MouseEvent, PlatformInput, PointerButton, PointerButtons,
    PointerId, TouchEvent, WheelEvent,
};
use crate::frame_state::{FrameInput, PointerPhase};
use crate::host::Host;
use crate::scroll::ScrollGesture;

/// Collaborators borrowed for the duration of one input.
pub(crate) struct Cx<'a> {
    pub(crate) page: &'a mut Page,
    pub(crate) host: &'a mut dyn Host,
}

impl Cx<'_> {
    /// Dispatch a DOM event. Returns whether the default action was prevented.
    ///
    /// Dead targets are skipped. Callers re-validate whatever they hold afterwards.
    pub(crate) fn dispatch(&mut self, target: NodeId, event: &mut DomEvent) -> bool {
        if !self.page.is_alive(target) {
            tracing::trace!(event = event.kind.name(), ?target, "skipping dead target");
            return false;
        }
        tracing::trace!(event = event.kind.name(), ?target, "dispatch");
        self.host.dispatch_event(self.page, target, event);
        event.default_prevented()
    }

    pub(crate) fn ensure_frame(&self, frame: FrameId) -> Result<()> {
        if self.page.is_frame_attached(frame) {
            Ok(())
        } else {
            Err(InputError::FrameDetached(frame))
        }
    }

    pub(crate) fn ensure_node(&self, node: NodeId) -> Result<()> {
        if self.page.is_alive(node) {
            Ok(())
        } else {
            Err(InputError::StaleNode(node))
        }
    }

    /// Convert a window position to main-frame coordinates.
    pub(crate) fn root_point(&self, window: Point) -> Point {
        let scale = self.page.page_scale();
        Point::new(window.x / scale, window.y / scale)
    }

    /// Convert a main-frame point into `frame`.
    pub(crate) fn frame_point(&self, frame: FrameId, root: Point) -> Result<Point> {
        self.page
            .point_from_root(frame, root)
            .ok_or(InputError::FrameDetached(frame))
    }
}

/// Mouse-like input in main-frame coordinates, shared by real and synthetic
/// (tap) sequences.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct PointerInput {
    pub(crate) root: Point,
    pub(crate) button: Option<PointerButton>,
    pub(crate) buttons: PointerButtons,
    pub(crate) modifiers: Modifiers,
    pub(crate) click_count: u8,
    pub(crate) timestamp: u64,
}

impl PointerInput {
    pub(crate) fn from_mouse(cx: &Cx<'_>, ev: &MouseEvent) -> Self {
        Self {
            root: cx.root_point(ev.position),
            button: ev.button,
            buttons: ev.buttons,
            modifiers: ev.modifiers,
            click_count: ev.click_count,
            timestamp: ev.timestamp,
        }
    }

    /// Build a mouse DOM event for `target`, positioned in the target's frame.
    pub(crate) fn event(&self, kind: EventKind, page: &Page, target: NodeId) -> DomEvent {
        let frame_point = page
            .frame_of(target)
            .and_then(|f| page.point_from_root(f, self.root))
            .unwrap_or(self.root);
        let mut ev = DomEvent::new(kind).at(frame_point, self.root);
        ev.button = self.button;
        ev.buttons = self.buttons;
        ev.modifiers = self.modifiers;
        ev.click_count = self.click_count;
        ev.pointer_id = Some(PointerId::MOUSE);
        ev.timestamp = self.timestamp;
        ev
    }
}

/// Last known mouse position, for hover refresh and cursor updates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct LastMouse {
    pub(crate) root: Point,
    pub(crate) modifiers: Modifiers,
}

/// Routes platform input for one page.
///
/// ```
/// use kurbo::{Point, Rect, Size};
/// use sluice_input::{EventHandler, EventKind, InputConfig, ListenerRegistry, MouseEvent};
/// use sluice_input::{ChromeClient, DomEvent, DragClient, Editor, EventSink, Outcome};
/// use sluice_tree::{NodeDesc, NodeId, Page};
///
/// #[derive(Default)]
/// struct Host {
///     listeners: ListenerRegistry,
/// }
/// impl EventSink for Host {
///     fn dispatch_event(&mut self, page: &mut Page, target: NodeId, event: &mut DomEvent) {
///         self.listeners.dispatch_event(page, target, event);
///     }
/// }
/// impl Editor for Host {}
/// impl DragClient for Host {}
/// impl ChromeClient for Host {}
///
/// let mut page = Page::new(Size::new(200.0, 200.0));
/// let doc = page.document(page.main_frame()).unwrap();
/// let button = page.insert(doc, NodeDesc::element(Rect::new(10.0, 10.0, 60.0, 40.0))).unwrap();
///
/// let mut host = Host::default();
/// let clicks = std::rc::Rc::new(std::cell::Cell::new(0));
/// let seen = clicks.clone();
/// host.listeners.add(&mut page, button, EventKind::Click, false, move |_, _, _| {
///     seen.set(seen.get() + 1);
///     Outcome::Continue
/// });
///
/// let mut input = EventHandler::new(InputConfig::default());
/// let p = Point::new(20.0, 20.0);
/// input.handle_mouse_down(&mut page, &mut host, &MouseEvent::down(p));
/// input.handle_mouse_up(&mut page, &mut host, &MouseEvent::up(p));
/// assert_eq!(clicks.get(), 1);
/// ```
#[derive(Debug)]
pub struct EventHandler {
    pub(crate) config: InputConfig,
    pub(crate) frames: HashMap<FrameId, FrameInput>,
    pub(crate) hover: HoverState<NodeId>,
    pub(crate) active: HoverState<NodeId>,
    pub(crate) focus: FocusState<NodeId>,
    pub(crate) focused_frame: Option<FrameId>,
    pub(crate) drag: Option<DragSession>,
    pub(crate) touches: TouchTargets<NodeId>,
    pub(crate) cursor_timer: CursorTimer,
    pub(crate) last_cursor: Option<Cursor>,
    /// Raw node under the mouse (may be text), for cursor resolution.
    pub(crate) cursor_node: Option<NodeId>,
    pub(crate) over_scrollbar: bool,
    pub(crate) last_mouse: Option<LastMouse>,
    pub(crate) fake_move_pending: bool,
    pub(crate) scroll_gesture: Option<ScrollGesture>,
    pub(crate) pinching: bool,
    pub(crate) long_tap_context_menu: bool,
    pub(crate) now: u64,
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}

fn finish(what: &'static str, result: Result<bool>) -> bool {
    match result {
        Ok(consumed) => {
            tracing::debug!(what, consumed, "input handled");
            consumed
        }
        Err(err) => {
            tracing::debug!(what, %err, "input handling aborted");
            false
        }
    }
}

fn finish_quiet(what: &'static str, result: Result<bool>) -> bool {
    match result {
        Ok(consumed) => {
            tracing::trace!(what, consumed, "input handled");
            consumed
        }
        Err(err) => {
            tracing::debug!(what, %err, "input handling aborted");
            false
        }
    }
}

impl EventHandler {
    /// A handler with the given settings.
    pub fn new(config: InputConfig) -> Self {
        Self {
            cursor_timer: CursorTimer::new(config.cursor.update_interval_ms),
            config,
            frames: HashMap::new(),
            hover: HoverState::new(),
            active: HoverState::new(),
            focus: FocusState::new(),
            focused_frame: None,
            drag: None,
            touches: TouchTargets::new(),
            last_cursor: None,
            cursor_node: None,
            over_scrollbar: false,
            last_mouse: None,
            fake_move_pending: false,
            scroll_gesture: None,
            pinching: false,
            long_tap_context_menu: false,
            now: 0,
        }
    }

    /// Settings.
    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    /// Innermost hovered node, page-wide.
    pub fn hovered(&self) -> Option<NodeId> {
        self.hover.leaf()
    }

    /// Page-wide hover chain, main document first.
    pub fn hover_chain(&self) -> &[NodeId] {
        self.hover.current_path()
    }

    /// Page-wide active chain, main document first.
    pub fn active_chain(&self) -> &[NodeId] {
        self.active.current_path()
    }

    /// Focused node.
    pub fn focused(&self) -> Option<NodeId> {
        self.focus.focused()
    }

    /// The drag session, if one is in progress.
    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// The scroll chain of the current scroll gesture, innermost first.
    pub fn scroll_chain(&self) -> Option<&[NodeId]> {
        self.scroll_gesture.as_ref().map(|g| g.chain.as_slice())
    }

    /// Node holding capture of `pointer`, in any frame.
    pub fn pointer_capture(&self, pointer: PointerId) -> Option<NodeId> {
        self.frames.values().find_map(|f| f.capture.target(pointer))
    }

    /// Whether a mouse button is down in any frame.
    pub fn is_mouse_pressed(&self) -> bool {
        self.frames.values().any(|f| f.mouse.is_pressed())
    }

    /// Whether a hover refresh is waiting for [`EventHandler::tick`].
    pub fn has_pending_fake_move(&self) -> bool {
        self.fake_move_pending
    }

    pub(crate) fn frame_state(&mut self, frame: FrameId) -> &mut FrameInput {
        self.frames.entry(frame).or_default()
    }

    /// Per-input housekeeping: advance the clock and forget dead references.
    fn begin_input(&mut self, cx: &mut Cx<'_>, timestamp: u64) {
        self.now = self.now.max(timestamp);
        self.prune(cx);
    }

    /// Drop state of detached frames and references to removed nodes.
    pub(crate) fn prune(&mut self, cx: &mut Cx<'_>) {
        let page = &*cx.page;
        let before = self.frames.len();
        self.frames.retain(|f, _| page.is_frame_attached(*f));
        if self.frames.len() != before {
            tracing::debug!(
                dropped = before - self.frames.len(),
                "pruned input state of detached frames"
            );
        }
        for state in self.frames.values_mut() {
            state.forget_dead(|n| page.is_alive(n));
            if state
                .capturing_subframe
                .is_some_and(|f| !page.is_frame_attached(f))
            {
                state.capturing_subframe = None;
            }
        }
        self.hover.truncate_dead(|n| page.is_alive(n));
        self.active.truncate_dead(|n| page.is_alive(n));
        if self.cursor_node.is_some_and(|n| !page.is_alive(n)) {
            self.cursor_node = None;
        }
        if let Some(gesture) = &mut self.scroll_gesture {
            gesture.chain.retain(|n| page.is_alive(*n));
        }
        self.forget_dead_focus(cx.page);
        if self
            .drag
            .as_ref()
            .is_some_and(|s| s.source_frame().is_some_and(|f| !cx.page.is_frame_attached(f)))
        {
            tracing::debug!("drag source frame detached; dropping drag session");
            self.end_drag_session(cx);
        }
    }

    // --- public entry points ---

    /// Route any platform input.
    pub fn handle_platform_input(
        &mut self,
        page: &mut Page,
        host: &mut dyn Host,
        input: &PlatformInput,
    ) -> bool {
        match input {
            PlatformInput::MouseDown(ev) => self.handle_mouse_down(page, host, ev),
            PlatformInput::MouseMove(ev) => self.handle_mouse_move(page, host, ev),
            PlatformInput::MouseUp(ev) => self.handle_mouse_up(page, host, ev),
            PlatformInput::MouseLeave => self.handle_mouse_leave(page, host),
            PlatformInput::Wheel(ev) => self.handle_wheel(page, host, ev),
            PlatformInput::Gesture(ev) => self.handle_gesture(page, host, ev),
            PlatformInput::Touch(ev) => self.handle_touch(page, host, ev),
            PlatformInput::Key(ev) => self.handle_key(page, host, ev),
        }
    }

    /// A mouse button went down.
    pub fn handle_mouse_down(
        &mut self,
        page: &mut Page,
        host: &mut dyn Host,
        ev: &MouseEvent,
    ) -> bool {
        let mut cx = Cx { page, host };
        self.begin_input(&mut cx, ev.timestamp);
        let input = PointerInput::from_mouse(&cx, ev);
        self.remember_position(input.root, input.modifiers);
        let result = self.mouse_down(&mut cx, input);
        finish("mousedown", result)
    }

    /// The mouse moved.
    pub fn handle_mouse_move(
        &mut self,
        page: &mut Page,
        host: &mut dyn Host,
        ev: &MouseEvent,
    ) -> bool {
        let mut cx = Cx { page, host };
        self.begin_input(&mut cx, ev.timestamp);
        let input = PointerInput::from_mouse(&cx, ev);
        self.remember_position(input.root, input.modifiers);
        if self.drag.is_some() {
            let op = self.drag_update(&mut cx, input.root, input.modifiers);
            return finish_quiet("drag update", op.map(|op| !op.is_empty()));
        }
        let result = self.mouse_move(&mut cx, input);
        finish_quiet("mousemove", result)
    }

    /// A mouse button went up.
    pub fn handle_mouse_up(
        &mut self,
        page: &mut Page,
        host: &mut dyn Host,
        ev: &MouseEvent,
    ) -> bool {
        let mut cx = Cx { page, host };
        self.begin_input(&mut cx, ev.timestamp);
        let input = PointerInput::from_mouse(&cx, ev);
        self.remember_position(input.root, input.modifiers);
        if self.drag.is_some() {
            let result = self.drop_at(&mut cx, input.root, input.modifiers);
            return finish("drop", result);
        }
        let result = self.mouse_up(&mut cx, input);
        finish("mouseup", result)
    }

    /// The mouse left the window: hover is cleared and the cursor reset.
    pub fn handle_mouse_leave(&mut self, page: &mut Page, host: &mut dyn Host) -> bool {
        let mut cx = Cx { page, host };
        self.prune(&mut cx);
        if self.is_mouse_pressed() || self.drag.is_some() {
            tracing::trace!("mouse left the window during a press; keeping hover");
            return false;
        }
        let input = PointerInput {
            root: self.last_mouse.map_or(Point::ZERO, |m| m.root),
            button: None,
            buttons: PointerButtons::empty(),
            modifiers: self.last_mouse.map_or_else(Modifiers::default, |m| m.modifiers),
            click_count: 0,
            timestamp: self.now,
        };
        self.last_mouse = None;
        self.cursor_node = None;
        self.over_scrollbar = false;
        self.fake_move_pending = false;
        let result = self.update_hover(&mut cx, None, &input);
        self.cursor_timer.cancel();
        let cursor = Cursor::default();
        if self.last_cursor.as_ref() != Some(&cursor) {
            cx.host.set_cursor(&cursor);
            self.last_cursor = Some(cursor);
        }
        finish("mouseleave", result.map(|()| false))
    }

    /// A wheel rotated.
    pub fn handle_wheel(&mut self, page: &mut Page, host: &mut dyn Host, ev: &WheelEvent) -> bool {
        let mut cx = Cx { page, host };
        self.begin_input(&mut cx, ev.timestamp);
        let result = self.wheel(&mut cx, ev);
        finish("wheel", result)
    }

    /// A recognized gesture.
    pub fn handle_gesture(
        &mut self,
        page: &mut Page,
        host: &mut dyn Host,
        ev: &GestureEvent,
    ) -> bool {
        let mut cx = Cx { page, host };
        self.begin_input(&mut cx, ev.timestamp);
        let result = self.gesture(&mut cx, ev);
        if ev.kind.is_scroll() {
            finish_quiet("gesture scroll", result)
        } else {
            finish("gesture", result)
        }
    }

    /// Raw touch points.
    pub fn handle_touch(&mut self, page: &mut Page, host: &mut dyn Host, ev: &TouchEvent) -> bool {
        let mut cx = Cx { page, host };
        self.begin_input(&mut cx, ev.timestamp);
        let result = self.touch(&mut cx, ev);
        finish("touch", result)
    }

    /// A key went down or up.
    pub fn handle_key(&mut self, page: &mut Page, host: &mut dyn Host, ev: &KeyEvent) -> bool {
        let mut cx = Cx { page, host };
        self.begin_input(&mut cx, ev.timestamp);
        let result = self.key(&mut cx, ev);
        finish("key", result)
    }

    /// A drag moved to `position` (window coordinates). Returns the operation
    /// the target currently accepts; empty when nothing accepts.
    pub fn handle_drag_update(
        &mut self,
        page: &mut Page,
        host: &mut dyn Host,
        position: Point,
        modifiers: Modifiers,
    ) -> DragOperation {
        let mut cx = Cx { page, host };
        self.prune(&mut cx);
        let root = cx.root_point(position);
        match self.drag_update(&mut cx, root, modifiers) {
            Ok(op) => op,
            Err(err) => {
                tracing::debug!(%err, "drag update aborted");
                DragOperation::empty()
            }
        }
    }

    /// The drag was released at `position`. Returns whether a drop happened.
    pub fn handle_drop(
        &mut self,
        page: &mut Page,
        host: &mut dyn Host,
        position: Point,
        modifiers: Modifiers,
    ) -> bool {
        let mut cx = Cx { page, host };
        self.prune(&mut cx);
        let root = cx.root_point(position);
        let result = self.drop_at(&mut cx, root, modifiers);
        finish("drop", result)
    }

    /// The drag left the page.
    pub fn handle_drag_exit(&mut self, page: &mut Page, host: &mut dyn Host) {
        let mut cx = Cx { page, host };
        self.prune(&mut cx);
        if let Err(err) = self.drag_exit(&mut cx) {
            tracing::debug!(%err, "drag exit aborted");
        }
    }

    /// Start tracking content dragged in from outside the page.
    ///
    /// Fails with [`InputError::DragInProgress`] while another drag is active.
    pub fn begin_external_drag(&mut self, mut data: DataTransfer) -> Result<()> {
        if self.drag.is_some() {
            tracing::debug!("external drag rejected: a drag is already in progress");
            return Err(InputError::DragInProgress);
        }
        tracing::debug!(types = ?data.types(), "external drag entered");
        data.set_access(DataTransferAccess::Protected);
        self.drag = Some(DragSession::external(data));
        Ok(())
    }

    /// Request capture of `pointer` by `node`.
    ///
    /// Capture takes effect on the pointer's next event, which first delivers
    /// `lostpointercapture` to the old holder and then `gotpointercapture`.
    pub fn set_pointer_capture(
        &mut self,
        page: &Page,
        pointer: PointerId,
        node: NodeId,
    ) -> Result<()> {
        let frame = page.frame_of(node).ok_or(InputError::StaleNode(node))?;
        let down = if pointer.is_mouse() {
            self.is_mouse_pressed()
        } else {
            pointer
                .touch_id()
                .is_some_and(|id| self.touches.target(id).is_some())
        };
        if !down {
            tracing::debug!(?pointer, ?node, "capture refused: pointer is not down");
            return Err(InputError::CaptureNotAllowed(pointer));
        }
        self.frame_state(frame).capture.set(pointer, node);
        if pointer.is_mouse() {
            // Every ancestor frame forwards the sequence toward the capturing frame.
            let mut child = frame;
            while let Some(parent) = page.parent_frame(child) {
                self.frame_state(parent).capturing_subframe = Some(child);
                child = parent;
            }
        }
        tracing::debug!(?pointer, ?node, "pointer capture requested");
        Ok(())
    }

    /// Release capture of `pointer` held or requested by `node`.
    pub fn release_pointer_capture(
        &mut self,
        page: &Page,
        pointer: PointerId,
        node: NodeId,
    ) -> bool {
        let Some(frame) = page.frame_of(node) else {
            return false;
        };
        self.frames
            .get_mut(&frame)
            .is_some_and(|f| f.capture.release(pointer, node))
    }

    /// Ask for a cursor recomputation no sooner than the configured interval.
    pub fn schedule_cursor_update(&mut self, now: u64) {
        self.cursor_timer.schedule(now);
    }

    /// Recompute the cursor if an update is due. Returns whether it changed.
    pub fn update_cursor(&mut self, page: &mut Page, host: &mut dyn Host, now: u64) -> bool {
        self.now = self.now.max(now);
        if !self.cursor_timer.take_due(now) {
            return false;
        }
        let mut cx = Cx { page, host };
        self.prune(&mut cx);
        if self.drag.is_some() {
            return false;
        }
        let hints = CursorHints {
            over_scrollbar: self.over_scrollbar,
            selecting: self
                .frames
                .values()
                .any(|f| f.mouse.phase == PointerPhase::Selecting),
        };
        let cursor = resolve_cursor(cx.page, self.cursor_node, hints, &self.config.cursor);
        if self.last_cursor.as_ref() == Some(&cursor) {
            return false;
        }
        tracing::trace!(?cursor, "cursor changed");
        cx.host.set_cursor(&cursor);
        self.last_cursor = Some(cursor);
        true
    }

    /// Run deferred work: the hover refresh after scrolling and the coalesced
    /// cursor update.
    pub fn tick(&mut self, page: &mut Page, host: &mut dyn Host, now: u64) {
        self.now = self.now.max(now);
        if self.fake_move_pending && !self.is_mouse_pressed() && self.drag.is_none() {
            self.fake_move_pending = false;
            if let Some(last) = self.last_mouse {
                let mut cx = Cx {
                    page: &mut *page,
                    host: &mut *host,
                };
                self.prune(&mut cx);
                let input = PointerInput {
                    root: last.root,
                    button: None,
                    buttons: PointerButtons::empty(),
                    modifiers: last.modifiers,
                    click_count: 0,
                    timestamp: now,
                };
                let result = self.mouse_move(&mut cx, input);
                finish_quiet("fake mousemove", result);
            }
        }
        self.update_cursor(page, host, now);
    }

    /// Tear down every active sequence without completing it: no click, no
    /// drop. Capture, hover, drag and scroll gesture state are cleared.
    pub fn cancel_active_sequence(&mut self, page: &mut Page, host: &mut dyn Host) {
        let mut cx = Cx { page, host };
        self.prune(&mut cx);
        tracing::debug!("cancelling active input sequences");
        if self.drag.is_some()
            && let Err(err) = self.cancel_drag(&mut cx)
        {
            tracing::debug!(%err, "drag cancel aborted");
        }
        for state in self.frames.values_mut() {
            state.mouse.reset();
            state.clicks.clear();
            state.capture = CaptureMap::new();
            state.capturing_subframe = None;
            state.clear_drag_state();
        }
        self.clear_chain_states(&mut cx);
        self.touches.drain();
        self.scroll_gesture = None;
        self.pinching = false;
        self.long_tap_context_menu = false;
        self.fake_move_pending = false;
        self.cursor_node = None;
        self.over_scrollbar = false;
    }

    /// Cancel everything and drop all per-frame state, as on page shutdown.
    pub fn teardown(&mut self, page: &mut Page, host: &mut dyn Host) {
        self.cancel_active_sequence(page, host);
        let mut cx = Cx { page, host };
        self.clear_focus_silently(&mut cx);
        self.frames.clear();
        self.cursor_timer.cancel();
        self.last_cursor = None;
        self.last_mouse = None;
        tracing::debug!("input handler torn down");
    }

    pub(crate) fn remember_position(&mut self, root: Point, modifiers: Modifiers) {
        self.last_mouse = Some(LastMouse { root, modifiers });
    }
}
