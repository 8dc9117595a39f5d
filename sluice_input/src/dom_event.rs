// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM-level events handed to the [`EventSink`](crate::EventSink).

use kurbo::{Point, Vec2};
use sluice_tree::NodeId;

use crate::data_transfer::DataTransfer;
use crate::event::{Key, Modifiers, PointerButton, PointerButtons, PointerId};

/// Every DOM event type the input core dispatches.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `mousedown`
    MouseDown,
    /// `mouseup`
    MouseUp,
    /// `mousemove`
    MouseMove,
    /// `mouseover`
    MouseOver,
    /// `mouseout`
    MouseOut,
    /// `mouseenter`
    MouseEnter,
    /// `mouseleave`
    MouseLeave,
    /// `click`
    Click,
    /// `dblclick`
    DblClick,
    /// `contextmenu`
    ContextMenu,
    /// `wheel`
    Wheel,
    /// `touchstart`
    TouchStart,
    /// `touchmove`
    TouchMove,
    /// `touchend`
    TouchEnd,
    /// `touchcancel`
    TouchCancel,
    /// `gotpointercapture`
    GotPointerCapture,
    /// `lostpointercapture`
    LostPointerCapture,
    /// `dragstart`
    DragStart,
    /// `drag`
    Drag,
    /// `dragend`
    DragEnd,
    /// `dragenter`
    DragEnter,
    /// `dragover`
    DragOver,
    /// `dragleave`
    DragLeave,
    /// `drop`
    Drop,
    /// `focus`
    Focus,
    /// `blur`
    Blur,
    /// `keydown`
    KeyDown,
    /// `keypress`
    KeyPress,
    /// `keyup`
    KeyUp,
}

impl EventKind {
    /// Whether the event runs a bubble phase.
    pub fn bubbles(self) -> bool {
        !matches!(
            self,
            Self::MouseEnter
                | Self::MouseLeave
                | Self::Focus
                | Self::Blur
        )
    }

    /// Whether `prevent_default` has an effect.
    pub fn cancelable(self) -> bool {
        !matches!(
            self,
            Self::MouseEnter
                | Self::MouseLeave
                | Self::Focus
                | Self::Blur
                | Self::GotPointerCapture
                | Self::LostPointerCapture
                | Self::DragLeave
                | Self::DragEnd
                | Self::TouchCancel
        )
    }

    /// DOM event type name.
    pub fn name(self) -> &'static str {
        match self {
            Self::MouseDown => "mousedown",
            Self::MouseUp => "mouseup",
            Self::MouseMove => "mousemove",
            Self::MouseOver => "mouseover",
            Self::MouseOut => "mouseout",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
            Self::Click => "click",
            Self::DblClick => "dblclick",
            Self::ContextMenu => "contextmenu",
            Self::Wheel => "wheel",
            Self::TouchStart => "touchstart",
            Self::TouchMove => "touchmove",
            Self::TouchEnd => "touchend",
            Self::TouchCancel => "touchcancel",
            Self::GotPointerCapture => "gotpointercapture",
            Self::LostPointerCapture => "lostpointercapture",
            Self::DragStart => "dragstart",
            Self::Drag => "drag",
            Self::DragEnd => "dragend",
            Self::DragEnter => "dragenter",
            Self::DragOver => "dragover",
            Self::DragLeave => "dragleave",
            Self::Drop => "drop",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::KeyDown => "keydown",
            Self::KeyPress => "keypress",
            Self::KeyUp => "keyup",
        }
    }
}

/// A touch point as seen by `touch*` listeners.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TouchInfo {
    /// Platform touch id.
    pub id: u64,
    /// Position in the target's frame.
    pub point: Point,
    /// Node the touch went down on.
    pub target: NodeId,
}

/// A DOM event under dispatch.
///
/// Listeners read the public fields and call [`DomEvent::prevent_default`] to
/// cancel the default action.
#[derive(Clone, Debug, PartialEq)]
pub struct DomEvent {
    /// Event type.
    pub kind: EventKind,
    /// Position in the target's frame coordinates.
    pub frame_point: Point,
    /// Position in main-frame coordinates.
    pub root_point: Point,
    /// Button that changed, for press/release/click.
    pub button: Option<PointerButton>,
    /// Buttons held.
    pub buttons: PointerButtons,
    /// Keyboard modifiers.
    pub modifiers: Modifiers,
    /// Platform click count.
    pub click_count: u8,
    /// The other node of a boundary transition (`mouseover`/`mouseout`/...).
    pub related_target: Option<NodeId>,
    /// Wheel or scroll delta.
    pub delta: Vec2,
    /// Pointer the event belongs to.
    pub pointer_id: Option<PointerId>,
    /// Key, for keyboard events.
    pub key: Option<Key>,
    /// All touches down (touch events).
    pub touches: Vec<TouchInfo>,
    /// Touches that changed (touch events).
    pub changed_touches: Vec<TouchInfo>,
    /// Drag data (drag events).
    pub data_transfer: Option<DataTransfer>,
    /// Milliseconds, monotonic.
    pub timestamp: u64,
    default_prevented: bool,
}

impl DomEvent {
    /// A blank event of the given kind.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            frame_point: Point::ZERO,
            root_point: Point::ZERO,
            button: None,
            buttons: PointerButtons::empty(),
            modifiers: Modifiers::default(),
            click_count: 0,
            related_target: None,
            delta: Vec2::ZERO,
            pointer_id: None,
            key: None,
            touches: Vec::new(),
            changed_touches: Vec::new(),
            data_transfer: None,
            timestamp: 0,
            default_prevented: false,
        }
    }

    /// Set both frame and root positions.
    pub fn at(mut self, frame_point: Point, root_point: Point) -> Self {
        self.frame_point = frame_point;
        self.root_point = root_point;
        self
    }

    /// Cancel the default action, if the event is cancelable.
    pub fn prevent_default(&mut self) {
        if self.kind.cancelable() {
            self.default_prevented = true;
        }
    }

    /// Whether a listener canceled the default action.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_events_neither_bubble_nor_cancel() {
        for kind in [EventKind::MouseEnter, EventKind::MouseLeave] {
            assert!(!kind.bubbles(), "{}", kind.name());
            let mut ev = DomEvent::new(kind);
            ev.prevent_default();
            assert!(!ev.default_prevented(), "{}", kind.name());
        }
        assert!(EventKind::MouseOver.bubbles(), "mouseover bubbles");
    }

    #[test]
    fn cancelable_events_record_prevention() {
        let mut ev = DomEvent::new(EventKind::DragOver);
        ev.prevent_default();
        assert!(ev.default_prevented(), "dragover is cancelable");
    }
}
