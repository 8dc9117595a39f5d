// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Platform input delivered by the embedder.
//!
//! Positions are window coordinates in physical page units; the handler
//! divides them by the page scale before hit testing.

use kurbo::{Point, Size, Vec2};

pub use ui_events::keyboard::{Key, KeyState, Modifiers, NamedKey};
pub use ui_events::pointer::PointerButton;

/// Identity of an input point.
///
/// The mouse is a single implicit point; touch points use the platform touch id
/// offset past [`PointerId::MOUSE`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u64);

impl PointerId {
    /// The mouse.
    pub const MOUSE: Self = Self(1);

    /// Pointer id of a touch point.
    pub fn touch(id: u64) -> Self {
        Self(id.saturating_add(2))
    }

    /// Whether this is the mouse.
    pub fn is_mouse(self) -> bool {
        self == Self::MOUSE
    }

    /// Platform touch id, if this is a touch point.
    pub fn touch_id(self) -> Option<u64> {
        self.0.checked_sub(2)
    }
}

bitflags::bitflags! {
    /// Buttons held during a mouse event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PointerButtons: u8 {
        /// Primary (usually left).
        const PRIMARY   = 1 << 0;
        /// Secondary (usually right).
        const SECONDARY = 1 << 1;
        /// Auxiliary (usually middle).
        const AUXILIARY = 1 << 2;
    }
}

impl PointerButtons {
    /// Flag for a changed button. Buttons beyond the first three map to nothing.
    pub fn from_button(button: PointerButton) -> Self {
        match button {
            PointerButton::Primary => Self::PRIMARY,
            PointerButton::Secondary => Self::SECONDARY,
            PointerButton::Auxiliary => Self::AUXILIARY,
            _ => Self::empty(),
        }
    }
}

/// A mouse press, move, or release.
#[derive(Clone, Debug, PartialEq)]
pub struct MouseEvent {
    /// Window position.
    pub position: Point,
    /// Button that changed state, `None` for moves.
    pub button: Option<PointerButton>,
    /// Buttons held after the event.
    pub buttons: PointerButtons,
    /// Keyboard modifiers.
    pub modifiers: Modifiers,
    /// Platform click count; 0 for moves.
    pub click_count: u8,
    /// Milliseconds, monotonic.
    pub timestamp: u64,
}

impl MouseEvent {
    /// A primary-button press with click count 1.
    pub fn down(position: Point) -> Self {
        Self {
            position,
            button: Some(PointerButton::Primary),
            buttons: PointerButtons::PRIMARY,
            modifiers: Modifiers::default(),
            click_count: 1,
            timestamp: 0,
        }
    }

    /// A primary-button release with click count 1.
    pub fn up(position: Point) -> Self {
        Self {
            buttons: PointerButtons::empty(),
            ..Self::down(position)
        }
    }

    /// A move with no buttons held.
    pub fn moved(position: Point) -> Self {
        Self {
            position,
            button: None,
            buttons: PointerButtons::empty(),
            modifiers: Modifiers::default(),
            click_count: 0,
            timestamp: 0,
        }
    }

    /// Use another button for a press or release.
    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = Some(button);
        if !self.buttons.is_empty() {
            self.buttons = PointerButtons::from_button(button);
        }
        self
    }

    /// Set the held buttons.
    pub fn with_buttons(mut self, buttons: PointerButtons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Set the click count.
    pub fn with_click_count(mut self, count: u8) -> Self {
        self.click_count = count;
        self
    }

    /// Set modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the timestamp.
    pub fn at(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Wheel delta as reported by the platform.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum WheelDelta {
    /// Pixels; positive scrolls content toward larger offsets.
    Pixels(Vec2),
    /// Lines, converted with the configured line step.
    Lines(Vec2),
}

/// A wheel rotation.
#[derive(Clone, Debug, PartialEq)]
pub struct WheelEvent {
    /// Window position.
    pub position: Point,
    /// Scroll delta.
    pub delta: WheelDelta,
    /// Keyboard modifiers.
    pub modifiers: Modifiers,
    /// Milliseconds, monotonic.
    pub timestamp: u64,
}

impl WheelEvent {
    /// A pixel wheel event.
    pub fn pixels(position: Point, delta: Vec2) -> Self {
        Self {
            position,
            delta: WheelDelta::Pixels(delta),
            modifiers: Modifiers::default(),
            timestamp: 0,
        }
    }
}

/// Kind of a recognized gesture.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GestureKind {
    /// Finger went down; no action yet.
    TapDown,
    /// The press has lasted long enough to show press feedback.
    ShowPress,
    /// A completed tap.
    Tap {
        /// Number of taps in the sequence.
        tap_count: u8,
    },
    /// A tap that turned out not to be one.
    TapCancel,
    /// Finger held still.
    LongPress,
    /// Finger lifted after a long press.
    LongTap,
    /// Two fingers tapped.
    TwoFingerTap,
    /// A scroll gesture starts.
    ScrollBegin,
    /// A scroll gesture moves by `delta` (scroll-offset direction).
    ScrollUpdate {
        /// Offset delta.
        delta: Vec2,
    },
    /// A scroll gesture ends.
    ScrollEnd,
    /// A pinch starts.
    PinchBegin,
    /// A pinch changes scale by the factor `scale`.
    PinchUpdate {
        /// Multiplicative scale change.
        scale: f64,
    },
    /// A pinch ends.
    PinchEnd,
}

impl GestureKind {
    /// Whether this gesture is part of a scroll.
    pub fn is_scroll(self) -> bool {
        matches!(
            self,
            Self::ScrollBegin | Self::ScrollUpdate { .. } | Self::ScrollEnd
        )
    }
}

/// A recognized gesture.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureEvent {
    /// What happened.
    pub kind: GestureKind,
    /// Window position.
    pub position: Point,
    /// Touch area (finger size); empty for precise input.
    pub area: Size,
    /// Keyboard modifiers.
    pub modifiers: Modifiers,
    /// Milliseconds, monotonic.
    pub timestamp: u64,
}

impl GestureEvent {
    /// A precise gesture at `position`.
    pub fn new(kind: GestureKind, position: Point) -> Self {
        Self {
            kind,
            position,
            area: Size::ZERO,
            modifiers: Modifiers::default(),
            timestamp: 0,
        }
    }

    /// Set the touch area.
    pub fn with_area(mut self, area: Size) -> Self {
        self.area = area;
        self
    }

    /// Set the timestamp.
    pub fn at(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Per-point touch phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// The point went down.
    Pressed,
    /// The point moved.
    Moved,
    /// The point did not change.
    Stationary,
    /// The point went up.
    Released,
    /// The platform took the point away.
    Cancelled,
}

/// One touch point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TouchPoint {
    /// Platform touch id.
    pub id: u64,
    /// Window position.
    pub position: Point,
    /// Phase of this point in the event.
    pub phase: TouchPhase,
}

impl TouchPoint {
    /// A touch point.
    pub fn new(id: u64, position: Point, phase: TouchPhase) -> Self {
        Self {
            id,
            position,
            phase,
        }
    }
}

/// A touch event carrying every active point.
#[derive(Clone, Debug, PartialEq)]
pub struct TouchEvent {
    /// All points, changed or not.
    pub points: Vec<TouchPoint>,
    /// Keyboard modifiers.
    pub modifiers: Modifiers,
    /// Milliseconds, monotonic.
    pub timestamp: u64,
}

impl TouchEvent {
    /// A touch event with the given points.
    pub fn new(points: Vec<TouchPoint>) -> Self {
        Self {
            points,
            modifiers: Modifiers::default(),
            timestamp: 0,
        }
    }
}

/// A key press or release.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyEvent {
    /// Logical key.
    pub key: Key,
    /// Down or up.
    pub state: KeyState,
    /// Keyboard modifiers.
    pub modifiers: Modifiers,
    /// Auto-repeat.
    pub repeat: bool,
    /// Milliseconds, monotonic.
    pub timestamp: u64,
}

impl KeyEvent {
    /// A key press without modifiers.
    pub fn down(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Down,
            modifiers: Modifiers::default(),
            repeat: false,
            timestamp: 0,
        }
    }

    /// A key release without modifiers.
    pub fn up(key: Key) -> Self {
        Self {
            state: KeyState::Up,
            ..Self::down(key)
        }
    }

    /// Set modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Text the key produces, if any.
    pub fn text(&self) -> Option<&str> {
        match &self.key {
            Key::Character(s) => Some(s.as_str()),
            Key::Named(NamedKey::Enter) => Some("\r"),
            _ => None,
        }
    }
}

/// Any platform input.
#[derive(Clone, Debug, PartialEq)]
pub enum PlatformInput {
    /// Mouse button pressed.
    MouseDown(MouseEvent),
    /// Mouse moved.
    MouseMove(MouseEvent),
    /// Mouse button released.
    MouseUp(MouseEvent),
    /// Mouse left the window.
    MouseLeave,
    /// Wheel rotated.
    Wheel(WheelEvent),
    /// Recognized gesture.
    Gesture(GestureEvent),
    /// Raw touch points.
    Touch(TouchEvent),
    /// Keyboard.
    Key(KeyEvent),
}
