// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborators the input core calls out to.
//!
//! The core owns no DOM, no editing engine and no windowing. It talks to them
//! through four narrow traits, bundled as [`Host`]:
//!
//! - [`EventSink`]: DOM dispatch and script execution.
//! - [`Editor`]: selection and editing commands.
//! - [`DragClient`]: drag images and the platform drag.
//! - [`ChromeClient`]: cursor, context menus, overscroll effects, disambiguation UI.
//!
//! Every call that can run page code receives `&mut Page` and may mutate it.
//! The core re-validates frames and nodes after each such call.

use kurbo::{Point, Rect, Size, Vec2};
use sluice_event_state::drag::DragSourceKind;
use sluice_tree::{FrameId, NodeId, Page};

use crate::cursor::Cursor;
use crate::data_transfer::{DataTransfer, Fragment};
use crate::dom_event::DomEvent;
use crate::touch_adjust::TouchTarget;

/// Selection granularity chosen by the platform click count.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Granularity {
    /// Single click: caret or character range.
    Character,
    /// Double click: words.
    Word,
    /// Triple click and beyond: paragraphs.
    Paragraph,
}

impl Granularity {
    /// Granularity for a platform click count.
    pub fn from_click_count(count: u8) -> Self {
        match count {
            0 | 1 => Self::Character,
            2 => Self::Word,
            _ => Self::Paragraph,
        }
    }
}

/// DOM dispatch.
pub trait EventSink {
    /// Dispatch `event` at `target` through its frame's propagation path.
    ///
    /// Listeners cancel the default action with [`DomEvent::prevent_default`].
    fn dispatch_event(&mut self, page: &mut Page, target: NodeId, event: &mut DomEvent);
}

/// Selected content copied into a drag payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectedContent {
    /// Plain text.
    pub text: String,
    /// Markup, if the selection has any.
    pub html: Option<String>,
}

/// Selection and editing.
///
/// Every method has a conservative default so hosts without editing support
/// only implement what they have.
pub trait Editor {
    /// Whether a press on `node` may start a text selection.
    fn can_start_selection(&self, page: &Page, node: NodeId) -> bool {
        page.can_start_selection(node)
    }

    /// Place the selection at `point` (frame coordinates) with the given granularity.
    fn select_at(&mut self, page: &Page, node: NodeId, point: Point, granularity: Granularity) {
        let _ = (page, node, point, granularity);
    }

    /// Extend the selection toward `point`.
    fn extend_selection(&mut self, page: &Page, node: NodeId, point: Point) {
        let _ = (page, node, point);
    }

    /// Whether a non-collapsed selection in `frame` contains `point`.
    fn selection_contains(&self, page: &Page, frame: FrameId, point: Point) -> bool {
        let _ = (page, frame, point);
        false
    }

    /// Collapse the selection in `frame`.
    fn clear_selection(&mut self, frame: FrameId) {
        let _ = frame;
    }

    /// Content of the selection in `frame`.
    fn selected_content(&self, page: &Page, frame: FrameId) -> Option<SelectedContent> {
        let _ = (page, frame);
        None
    }

    /// Insert `fragment` at the drop point inside the editable `target`.
    fn apply_fragment(
        &mut self,
        page: &mut Page,
        target: NodeId,
        point: Point,
        fragment: &Fragment,
        smart_replace: bool,
    ) -> bool {
        let _ = (page, target, point, fragment, smart_replace);
        false
    }

    /// Move the current selection to the drop point inside `target`.
    fn move_selection(
        &mut self,
        page: &mut Page,
        target: NodeId,
        point: Point,
        fragment: &Fragment,
        smart_move: bool,
    ) -> bool {
        let _ = (page, target, point, fragment, smart_move);
        false
    }

    /// Delete the selection in `frame` after it was moved elsewhere.
    fn delete_selection(&mut self, page: &mut Page, frame: FrameId) {
        let _ = (page, frame);
    }
}

/// An image shown under the pointer during a drag.
#[derive(Clone, Debug, PartialEq)]
pub struct DragImage {
    /// Image size in CSS pixels.
    pub size: Size,
    /// Offset of the pointer from the image's top-left corner.
    pub offset: Vec2,
    /// Image reference understood by the embedder.
    pub url: Option<String>,
}

/// Platform drag.
pub trait DragClient {
    /// Build the image for a drag of `source`.
    fn create_drag_image(
        &mut self,
        page: &Page,
        source: NodeId,
        kind: DragSourceKind,
    ) -> Option<DragImage> {
        let _ = (page, source, kind);
        None
    }

    /// Hand the drag to the platform. Returning `false` aborts the drag.
    fn start_native_drag(
        &mut self,
        image: Option<&DragImage>,
        data: &DataTransfer,
        root_point: Point,
        from_touch: bool,
    ) -> bool {
        let _ = (image, data, root_point, from_touch);
        true
    }
}

/// Browser chrome.
pub trait ChromeClient {
    /// Show a cursor.
    fn set_cursor(&mut self, cursor: &Cursor) {
        let _ = cursor;
    }

    /// Show the context menu for `target` at a main-frame point.
    fn show_context_menu(&mut self, page: &Page, target: NodeId, root_point: Point) {
        let _ = (page, target, root_point);
    }

    /// Report scroll delta nothing consumed; feeds overscroll effects.
    fn did_overscroll(&mut self, unused: Vec2, accumulated: Vec2) {
        let _ = (unused, accumulated);
    }

    /// Offer a choice between ambiguous touch targets. Returning `true` consumes the tap.
    fn show_disambiguation_popup(&mut self, touch_area: Rect, targets: &[TouchTarget]) -> bool {
        let _ = (touch_area, targets);
        false
    }
}

/// Everything the input core needs from its embedder.
pub trait Host: EventSink + Editor + DragClient + ChromeClient {}

impl<T: EventSink + Editor + DragClient + ChromeClient> Host for T {}
