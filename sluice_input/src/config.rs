// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunable constants of the input core.
//!
//! Every empirically tuned number lives here: drag hysteresis, touch
//! adjustment ratios, overscroll filtering, cursor rate limiting and custom
//! cursor limits, pinch bounds.

use sluice_event_state::drag::{DragSourceKind, DragThresholds};
use ui_events::keyboard::Modifiers;

bitflags::bitflags! {
    /// Which kinds of content may start a drag.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct DragSourceActions: u8 {
        /// The text selection.
        const SELECTION = 1 << 0;
        /// Images.
        const IMAGE     = 1 << 1;
        /// Links.
        const LINK      = 1 << 2;
        /// Elements marked draggable.
        const ELEMENT   = 1 << 3;
    }
}

impl Default for DragSourceActions {
    fn default() -> Self {
        Self::all()
    }
}

impl DragSourceActions {
    /// The action flag for a source kind.
    pub fn for_kind(kind: DragSourceKind) -> Self {
        match kind {
            DragSourceKind::Selection => Self::SELECTION,
            DragSourceKind::Image => Self::IMAGE,
            DragSourceKind::Link => Self::LINK,
            DragSourceKind::Element => Self::ELEMENT,
        }
    }
}

/// Drag-and-drop settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragConfig {
    /// Hysteresis per source kind.
    pub thresholds: DragThresholds,
    /// Kinds of content allowed to start drags.
    pub source_actions: DragSourceActions,
    /// Whether images load automatically; image drags require it.
    pub images_enabled: bool,
    /// Whether a long press may start a drag.
    pub touch_drag_drop_enabled: bool,
    /// Modifier that turns a move into a copy.
    pub copy_modifier: Modifiers,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            thresholds: DragThresholds::default(),
            source_actions: DragSourceActions::default(),
            images_enabled: true,
            touch_drag_drop_enabled: false,
            copy_modifier: Modifiers::CONTROL,
        }
    }
}

impl DragConfig {
    /// Replace hysteresis thresholds.
    pub fn with_thresholds(mut self, thresholds: DragThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Allow or forbid drags started by long press.
    pub fn with_touch_drag_drop(mut self, enabled: bool) -> Self {
        self.touch_drag_drop_enabled = enabled;
        self
    }

    /// Restrict which content may be dragged.
    pub fn with_source_actions(mut self, actions: DragSourceActions) -> Self {
        self.source_actions = actions;
        self
    }
}

/// Touch adjustment settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchAdjustConfig {
    /// Candidates scoring below `best * ambiguity_ratio` are discarded.
    pub ambiguity_ratio: f64,
    /// Ask the chrome to disambiguate when several good targets remain.
    pub disambiguation_popup: bool,
}

impl Default for TouchAdjustConfig {
    fn default() -> Self {
        Self {
            ambiguity_ratio: 0.5,
            disambiguation_popup: false,
        }
    }
}

/// Scroll settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollConfig {
    /// Overscroll components smaller than this are reported as zero.
    pub overscroll_min_delta: f64,
    /// Pixels scrolled per wheel line.
    pub line_step: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            overscroll_min_delta: 0.1,
            line_step: 40.0,
        }
    }
}

/// Cursor settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorConfig {
    /// Minimum time between cursor recomputations (20 ms is 50 Hz).
    pub update_interval_ms: u64,
    /// Largest custom cursor accepted, in CSS pixels per side.
    pub max_custom_size: f64,
    /// Smallest image scale accepted for custom cursors.
    pub min_custom_scale: f64,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: 20,
            max_custom_size: 128.0,
            min_custom_scale: 0.001,
        }
    }
}

/// Pinch zoom bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinchConfig {
    /// Smallest page scale.
    pub min_scale: f64,
    /// Largest page scale.
    pub max_scale: f64,
}

impl Default for PinchConfig {
    fn default() -> Self {
        Self {
            min_scale: 1.0,
            max_scale: 5.0,
        }
    }
}

/// All input settings.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputConfig {
    /// Drag and drop.
    pub drag: DragConfig,
    /// Touch adjustment.
    pub touch: TouchAdjustConfig,
    /// Scrolling.
    pub scroll: ScrollConfig,
    /// Cursor updates.
    pub cursor: CursorConfig,
    /// Pinch zoom.
    pub pinch: PinchConfig,
}

impl InputConfig {
    /// Replace drag settings.
    pub fn with_drag(mut self, drag: DragConfig) -> Self {
        self.drag = drag;
        self
    }

    /// Replace touch adjustment settings.
    pub fn with_touch(mut self, touch: TouchAdjustConfig) -> Self {
        self.touch = touch;
        self
    }

    /// Replace scroll settings.
    pub fn with_scroll(mut self, scroll: ScrollConfig) -> Self {
        self.scroll = scroll;
        self
    }

    /// Replace cursor settings.
    pub fn with_cursor(mut self, cursor: CursorConfig) -> Self {
        self.cursor = cursor;
        self
    }

    /// Replace pinch settings.
    pub fn with_pinch(mut self, pinch: PinchConfig) -> Self {
        self.pinch = pinch;
        self
    }
}
