// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag state helper: hysteresis before a press-then-move becomes a drag, plus
//! movement deltas while it lasts.
//!
//! ## Usage
//!
//! 1) On press, call [`DragState::start`] with the press position.
//! 2) On each move, ask [`DragState::exceeds`] with the threshold for the kind of
//!    content under the press ([`DragThresholds::for_kind`]).
//! 3) Once the drag is under way, [`DragState::update`] yields per-move deltas.
//! 4) [`DragState::end`] resets.
//!
//! Hysteresis is checked per axis: a drag starts as soon as the pointer has moved
//! at least the threshold horizontally *or* vertically.
//!
//! ```
//! use kurbo::Point;
//! use sluice_event_state::drag::{DragSourceKind, DragState, DragThresholds};
//!
//! let thresholds = DragThresholds::default();
//! let mut drag = DragState::default();
//! drag.start(Point::new(10.0, 20.0));
//!
//! let image = thresholds.for_kind(DragSourceKind::Image);
//! assert!(!drag.exceeds(Point::new(10.0 + image - 1.0, 20.0), image));
//! assert!(drag.exceeds(Point::new(10.0, 20.0 + image), image));
//! ```

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};

/// What is being dragged.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DragSourceKind {
    /// The current text selection.
    Selection,
    /// An image element.
    Image,
    /// A link.
    Link,
    /// An element explicitly marked draggable.
    Element,
}

/// Hysteresis distance per source kind, in CSS pixels.
///
/// Text selection drags start soonest, explicit element drags last.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragThresholds {
    /// Threshold for dragging a text selection.
    pub selection: f64,
    /// Threshold for dragging an image.
    pub image: f64,
    /// Threshold for dragging a link.
    pub link: f64,
    /// Threshold for dragging an explicitly draggable element.
    pub element: f64,
}

impl Default for DragThresholds {
    fn default() -> Self {
        Self {
            selection: 3.0,
            image: 5.0,
            link: 40.0,
            element: 45.0,
        }
    }
}

impl DragThresholds {
    /// Threshold for a source kind.
    pub fn for_kind(&self, kind: DragSourceKind) -> f64 {
        match kind {
            DragSourceKind::Selection => self.selection,
            DragSourceKind::Image => self.image,
            DragSourceKind::Link => self.link,
            DragSourceKind::Element => self.element,
        }
    }
}

/// Tracks a press that may turn into a drag, and the drag once it does.
#[derive(Debug, Clone, Default, Copy, PartialEq)]
pub struct DragState {
    /// Press position.
    pub start_pos: Option<Point>,
    /// Last position seen by [`DragState::update`].
    pub last_pos: Option<Point>,
}

impl DragState {
    /// Start tracking from a press position.
    pub fn start(&mut self, pos: Point) {
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
    }

    /// Whether `pos` is at least `threshold` away from the start on either axis.
    pub fn exceeds(&self, pos: Point, threshold: f64) -> bool {
        self.start_pos.is_some_and(|start| {
            let d = pos - start;
            d.x.abs() >= threshold || d.y.abs() >= threshold
        })
    }

    /// Record a position and return the delta since the previous one.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        self.start_pos?;
        let delta = self.last_pos.map(|last| pos - last);
        self.last_pos = Some(pos);
        delta
    }

    /// Reset.
    pub fn end(&mut self) {
        self.start_pos = None;
        self.last_pos = None;
    }
}
