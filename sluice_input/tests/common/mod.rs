// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for input routing integration tests.

#![allow(
    missing_docs,
    reason = "Integration-test helper module; not part of the public API."
)]
#![allow(
    dead_code,
    reason = "Each test binary uses a different subset of the helpers."
)]

use kurbo::{Point, Rect, Size, Vec2};
use sluice_event_state::drag::DragSourceKind;
use sluice_input::{
    ChromeClient, Cursor, DataTransfer, DomEvent, DragClient, DragImage, Editor, EventKind,
    EventSink, Fragment, Granularity, ListenerRegistry, Outcome, PointerId, SelectedContent,
    TouchTarget,
};
use sluice_tree::{ElementKind, FrameDesc, FrameId, NodeDesc, NodeId, Page};

/// A host that records everything the input core asks of it.
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    pub(crate) listeners: ListenerRegistry,
    /// Every dispatched event, in order.
    pub(crate) log: Vec<(EventKind, NodeId)>,
    pub(crate) pointer_ids: Vec<(EventKind, Option<PointerId>)>,
    pub(crate) cursors: Vec<Cursor>,
    pub(crate) context_menus: Vec<NodeId>,
    pub(crate) overscroll: Vec<(Vec2, Vec2)>,
    pub(crate) popups: Vec<Vec<NodeId>>,
    pub(crate) accept_popup: bool,
    pub(crate) native_drags: Vec<(Point, bool)>,
    pub(crate) refuse_native_drag: bool,
    pub(crate) selections: Vec<(NodeId, Granularity)>,
    pub(crate) extended: usize,
    pub(crate) cleared_selections: usize,
    /// Selection reported to drag and press logic.
    pub(crate) selection: Option<(FrameId, Rect, SelectedContent)>,
    pub(crate) applied: Vec<(NodeId, Fragment, bool)>,
    pub(crate) moved: Vec<(NodeId, Fragment)>,
    pub(crate) deleted: Vec<FrameId>,
}

impl Recorder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Targets of every event of `kind`, in dispatch order.
    pub(crate) fn targets(&self, kind: EventKind) -> Vec<NodeId> {
        self.log
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, n)| *n)
            .collect()
    }

    /// How many events of `kind` were dispatched.
    pub(crate) fn count(&self, kind: EventKind) -> usize {
        self.log.iter().filter(|(k, _)| *k == kind).count()
    }

    /// Event kinds in dispatch order, restricted to `kinds`.
    pub(crate) fn sequence(&self, kinds: &[EventKind]) -> Vec<(EventKind, NodeId)> {
        self.log
            .iter()
            .filter(|(k, _)| kinds.contains(k))
            .copied()
            .collect()
    }

    pub(crate) fn clear_log(&mut self) {
        self.log.clear();
        self.pointer_ids.clear();
    }

    /// Register a listener that only makes the node "listen".
    pub(crate) fn listen(&mut self, page: &mut Page, node: NodeId, kind: EventKind) {
        self.listeners
            .add(page, node, kind, false, |_, _, _| Outcome::Continue);
    }

    /// Register a listener that cancels the default action.
    pub(crate) fn prevent(&mut self, page: &mut Page, node: NodeId, kind: EventKind) {
        self.listeners.add(page, node, kind, false, |_, ev, _| {
            ev.prevent_default();
            Outcome::Continue
        });
    }
}

impl EventSink for Recorder {
    fn dispatch_event(&mut self, page: &mut Page, target: NodeId, event: &mut DomEvent) {
        self.log.push((event.kind, target));
        self.pointer_ids.push((event.kind, event.pointer_id));
        self.listeners.dispatch_event(page, target, event);
    }
}

impl Editor for Recorder {
    fn select_at(&mut self, _: &Page, node: NodeId, _: Point, granularity: Granularity) {
        self.selections.push((node, granularity));
    }

    fn extend_selection(&mut self, _: &Page, _: NodeId, _: Point) {
        self.extended += 1;
    }

    fn selection_contains(&self, _: &Page, frame: FrameId, point: Point) -> bool {
        self.selection
            .as_ref()
            .is_some_and(|(f, r, _)| *f == frame && r.contains(point))
    }

    fn clear_selection(&mut self, _: FrameId) {
        self.cleared_selections += 1;
    }

    fn selected_content(&self, _: &Page, frame: FrameId) -> Option<SelectedContent> {
        self.selection
            .as_ref()
            .filter(|(f, _, _)| *f == frame)
            .map(|(_, _, c)| c.clone())
    }

    fn apply_fragment(
        &mut self,
        _: &mut Page,
        target: NodeId,
        _: Point,
        fragment: &Fragment,
        smart_replace: bool,
    ) -> bool {
        self.applied.push((target, fragment.clone(), smart_replace));
        true
    }

    fn move_selection(
        &mut self,
        _: &mut Page,
        target: NodeId,
        _: Point,
        fragment: &Fragment,
        _: bool,
    ) -> bool {
        self.moved.push((target, fragment.clone()));
        true
    }

    fn delete_selection(&mut self, _: &mut Page, frame: FrameId) {
        self.deleted.push(frame);
    }
}

impl DragClient for Recorder {
    fn create_drag_image(&mut self, _: &Page, _: NodeId, _: DragSourceKind) -> Option<DragImage> {
        Some(DragImage {
            size: Size::new(16.0, 16.0),
            offset: Vec2::ZERO,
            url: None,
        })
    }

    fn start_native_drag(
        &mut self,
        _: Option<&DragImage>,
        _: &DataTransfer,
        root_point: Point,
        from_touch: bool,
    ) -> bool {
        if self.refuse_native_drag {
            return false;
        }
        self.native_drags.push((root_point, from_touch));
        true
    }
}

impl ChromeClient for Recorder {
    fn set_cursor(&mut self, cursor: &Cursor) {
        self.cursors.push(cursor.clone());
    }

    fn show_context_menu(&mut self, _: &Page, target: NodeId, _: Point) {
        self.context_menus.push(target);
    }

    fn did_overscroll(&mut self, unused: Vec2, accumulated: Vec2) {
        self.overscroll.push((unused, accumulated));
    }

    fn show_disambiguation_popup(&mut self, _: Rect, targets: &[TouchTarget]) -> bool {
        self.popups.push(targets.iter().map(|t| t.node).collect());
        self.accept_popup
    }
}

/// A page with the given main viewport, and its document.
pub(crate) fn page(width: f64, height: f64) -> (Page, NodeId) {
    let page = Page::new(Size::new(width, height));
    let doc = page.document(page.main_frame()).unwrap();
    (page, doc)
}

/// Insert `desc` under `parent`.
pub(crate) fn add(page: &mut Page, parent: NodeId, desc: NodeDesc) -> NodeId {
    page.insert(parent, desc).unwrap()
}

/// Insert a frame owner at `bounds` with a local child frame of the same size.
/// Returns the owner, the child frame and its document.
pub(crate) fn iframe(page: &mut Page, parent: NodeId, bounds: Rect) -> (NodeId, FrameId, NodeId) {
    iframe_with(page, parent, bounds, FrameDesc::new(bounds.size()))
}

pub(crate) fn iframe_with(
    page: &mut Page,
    parent: NodeId,
    bounds: Rect,
    desc: FrameDesc,
) -> (NodeId, FrameId, NodeId) {
    let owner = add(
        page,
        parent,
        NodeDesc::of_kind(ElementKind::FrameOwner, bounds),
    );
    let frame = page.attach_frame(owner, desc).unwrap();
    let doc = page.document(frame).unwrap();
    (owner, frame, doc)
}
