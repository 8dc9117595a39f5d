// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame input state.
//!
//! Each frame that has seen input owns one [`FrameInput`]: the mouse press
//! sequence, click tracking, pointer capture, the subframe that captured the
//! mouse, and the frame's current drag target. Page-wide state (hover, focus,
//! the drag session) lives on the handler itself.

use kurbo::Point;
use sluice_event_state::capture::CaptureMap;
use sluice_event_state::click::ClickState;
use sluice_event_state::drag::{DragSourceKind, DragState};
use sluice_tree::{FrameId, NodeId};

use crate::event::{PointerButton, PointerId};
use crate::host::Granularity;

/// Where a mouse press sequence stands.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum PointerPhase {
    /// No button down in this frame.
    #[default]
    Idle,
    /// Button down; nothing decided yet.
    Pressed,
    /// A text selection is being extended.
    Selecting,
    /// A scrollbar of the node is being dragged.
    ScrollbarDrag(NodeId),
    /// The press turned into a drag session.
    Dragging,
}

/// The mouse press sequence of one frame.
#[derive(Clone, Debug, Default)]
pub(crate) struct MouseSequence {
    pub(crate) phase: PointerPhase,
    pub(crate) press_node: Option<NodeId>,
    /// Press position in frame coordinates.
    pub(crate) press_point: Point,
    pub(crate) button: Option<PointerButton>,
    pub(crate) granularity: Option<Granularity>,
    pub(crate) drag: DragState,
    /// Draggable content found under the press, re-checked when hysteresis is exceeded.
    pub(crate) drag_candidate: Option<(NodeId, DragSourceKind)>,
    pub(crate) may_start_select: bool,
    /// The press landed inside an existing selection.
    pub(crate) press_in_selection: bool,
}

impl MouseSequence {
    pub(crate) fn is_pressed(&self) -> bool {
        self.phase != PointerPhase::Idle
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Input state of one frame.
#[derive(Clone, Debug, Default)]
pub(crate) struct FrameInput {
    pub(crate) mouse: MouseSequence,
    pub(crate) clicks: ClickState<PointerId, NodeId>,
    pub(crate) capture: CaptureMap<PointerId, NodeId>,
    /// Child frame that received the press and gets the rest of the sequence.
    pub(crate) capturing_subframe: Option<FrameId>,
    pub(crate) drag_target: Option<NodeId>,
    /// The last drag update already fired `drag` at the source.
    pub(crate) only_dragover: bool,
}

impl FrameInput {
    /// Forget everything that refers to nodes for which `alive` is false.
    pub(crate) fn forget_dead(&mut self, alive: impl Fn(NodeId) -> bool) {
        self.capture.forget(|n| !alive(n));
        self.clicks.invalidate(|n| !alive(n));
        if self.mouse.press_node.is_some_and(|n| !alive(n)) {
            self.mouse.press_node = None;
        }
        if self.mouse.drag_candidate.is_some_and(|(n, _)| !alive(n)) {
            self.mouse.drag_candidate = None;
        }
        if let PointerPhase::ScrollbarDrag(n) = self.mouse.phase
            && !alive(n)
        {
            self.mouse.phase = PointerPhase::Idle;
        }
        if self.drag_target.is_some_and(|n| !alive(n)) {
            self.drag_target = None;
        }
    }

    /// Clear drag target tracking.
    pub(crate) fn clear_drag_state(&mut self) {
        self.drag_target = None;
        self.only_dragover = false;
    }
}
