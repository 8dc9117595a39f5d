// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The page arena: frames, nodes, ancestry, and geometry.

use alloc::vec::Vec;

use cursor_icon::CursorIcon;
use kurbo::{Point, Rect, Size, Vec2};
use smallvec::SmallVec;

use crate::types::{
    CursorStyle, DropZone, ElementKind, FrameDesc, FrameId, ListenerFlags, NodeDesc, NodeFlags,
    NodeId, NodeKind, NodeState, ScrollState,
};

#[derive(Clone, Debug)]
struct NodeRecord {
    desc: NodeDesc,
    frame: FrameId,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    state: NodeState,
    content_frame: Option<FrameId>,
}

#[derive(Clone, Debug)]
struct NodeSlot {
    generation: u32,
    record: Option<NodeRecord>,
}

#[derive(Clone, Debug)]
struct FrameRecord {
    document: NodeId,
    owner: Option<NodeId>,
    parent: Option<FrameId>,
    viewport: Size,
    remote: bool,
    layout_ready: bool,
}

#[derive(Clone, Debug)]
struct FrameSlot {
    generation: u32,
    record: Option<FrameRecord>,
}

/// A page: the main frame, its nested frames, and every node in them.
///
/// Nodes and frames live in generational arenas. Anything that runs listener
/// code may remove nodes or detach frames, so callers holding ids across such a
/// call re-check them with [`Page::is_alive`] and [`Page::is_frame_attached`].
///
/// ```
/// use kurbo::{Point, Rect, Size};
/// use sluice_tree::{HitTestRequest, NodeDesc, Page};
///
/// let mut page = Page::new(Size::new(200.0, 200.0));
/// let doc = page.document(page.main_frame()).unwrap();
/// let button = page.insert(doc, NodeDesc::element(Rect::new(10.0, 10.0, 50.0, 30.0))).unwrap();
///
/// let point = Point::new(20.0, 20.0);
/// let hit = page.hit_test(page.main_frame(), point, HitTestRequest::READ_ONLY, 0.0);
/// assert_eq!(hit.inner_node, Some(button));
///
/// page.remove(button);
/// assert!(!page.is_alive(button));
/// ```
#[derive(Clone, Debug)]
pub struct Page {
    nodes: Vec<NodeSlot>,
    free_nodes: Vec<u32>,
    frames: Vec<FrameSlot>,
    free_frames: Vec<u32>,
    main_frame: FrameId,
    listener_counts: [u32; ListenerFlags::COUNT],
    page_scale: f64,
}

impl Page {
    /// Create a page whose main frame has the given viewport.
    pub fn new(viewport: Size) -> Self {
        Self::with_main_frame(FrameDesc::new(viewport))
    }

    /// Create a page with a fully described main frame.
    pub fn with_main_frame(desc: FrameDesc) -> Self {
        let mut page = Self {
            nodes: Vec::new(),
            free_nodes: Vec::new(),
            frames: Vec::new(),
            free_frames: Vec::new(),
            main_frame: FrameId::new(0, 0),
            listener_counts: [0; ListenerFlags::COUNT],
            page_scale: 1.0,
        };
        page.main_frame = page.create_frame(None, None, desc);
        page
    }

    /// The top-level frame.
    pub fn main_frame(&self) -> FrameId {
        self.main_frame
    }

    /// Current page zoom applied by pinch gestures.
    pub fn page_scale(&self) -> f64 {
        self.page_scale
    }

    /// Set the page zoom. Non-positive values are ignored.
    pub fn set_page_scale(&mut self, scale: f64) {
        if scale > 0.0 {
            self.page_scale = scale;
        }
    }

    // --- arena plumbing ---

    fn node(&self, id: NodeId) -> Option<&NodeRecord> {
        let slot = self.nodes.get(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.record.as_ref()
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeRecord> {
        let slot = self.nodes.get_mut(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.record.as_mut()
    }

    fn frame(&self, id: FrameId) -> Option<&FrameRecord> {
        let slot = self.frames.get(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.record.as_ref()
    }

    fn frame_mut(&mut self, id: FrameId) -> Option<&mut FrameRecord> {
        let slot = self.frames.get_mut(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.record.as_mut()
    }

    fn alloc_node(&mut self, record: NodeRecord) -> NodeId {
        self.count_listeners(record.desc.listeners, true);
        if let Some(idx) = self.free_nodes.pop() {
            let slot = &mut self.nodes[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.record = Some(record);
            NodeId::new(idx, slot.generation)
        } else {
            let idx = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX);
            self.nodes.push(NodeSlot {
                generation: 1,
                record: Some(record),
            });
            NodeId::new(idx, 1)
        }
    }

    fn create_frame(
        &mut self,
        owner: Option<NodeId>,
        parent: Option<FrameId>,
        desc: FrameDesc,
    ) -> FrameId {
        let (idx, generation) = if let Some(idx) = self.free_frames.pop() {
            let slot = &mut self.frames[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            (idx, slot.generation)
        } else {
            let idx = u32::try_from(self.frames.len()).unwrap_or(u32::MAX);
            self.frames.push(FrameSlot {
                generation: 1,
                record: None,
            });
            (idx, 1)
        };
        let frame = FrameId::new(idx, generation);
        let document = self.alloc_node(NodeRecord {
            desc: NodeDesc {
                kind: NodeKind::Document,
                bounds: Rect::from_origin_size(Point::ZERO, desc.viewport),
                flags: NodeFlags::default() | NodeFlags::CLIPS,
                scroll: Some(ScrollState::with_max(desc.scroll_max)),
                ..NodeDesc::default()
            },
            frame,
            parent: None,
            children: Vec::new(),
            state: NodeState::empty(),
            content_frame: None,
        });
        self.frames[idx as usize].record = Some(FrameRecord {
            document,
            owner,
            parent,
            viewport: desc.viewport,
            remote: desc.remote,
            layout_ready: desc.layout_ready,
        });
        frame
    }

    fn count_listeners(&mut self, flags: ListenerFlags, add: bool) {
        for (bit, count) in self.listener_counts.iter_mut().enumerate() {
            if flags.bits() & (1 << bit) != 0 {
                if add {
                    *count += 1;
                } else {
                    *count = count.saturating_sub(1);
                }
            }
        }
    }

    // --- structure ---

    /// Insert a node as the last child of `parent`. Returns `None` if `parent` is stale
    /// or a `Document` kind is requested.
    pub fn insert(&mut self, parent: NodeId, desc: NodeDesc) -> Option<NodeId> {
        if desc.kind == NodeKind::Document {
            return None;
        }
        let frame = self.node(parent)?.frame;
        let id = self.alloc_node(NodeRecord {
            desc,
            frame,
            parent: Some(parent),
            children: Vec::new(),
            state: NodeState::empty(),
            content_frame: None,
        });
        self.node_mut(parent)?.children.push(id);
        Some(id)
    }

    /// Create a content frame for a frame-owner element.
    ///
    /// Returns `None` if `owner` is stale, not a frame owner, or already has a frame.
    pub fn attach_frame(&mut self, owner: NodeId, desc: FrameDesc) -> Option<FrameId> {
        let rec = self.node(owner)?;
        if rec.desc.kind != NodeKind::Element(ElementKind::FrameOwner)
            || rec.content_frame.is_some()
        {
            return None;
        }
        let parent = rec.frame;
        let frame = self.create_frame(Some(owner), Some(parent), desc);
        self.node_mut(owner)?.content_frame = Some(frame);
        Some(frame)
    }

    /// Remove a node and its subtree. Frames owned by removed nodes are detached.
    ///
    /// Removing a frame's document detaches the frame.
    pub fn remove(&mut self, id: NodeId) {
        let Some(rec) = self.node(id) else {
            return;
        };
        if rec.desc.kind == NodeKind::Document {
            let frame = rec.frame;
            self.detach_frame(frame);
            return;
        }
        if let Some(parent) = rec.parent
            && let Some(p) = self.node_mut(parent)
        {
            p.children.retain(|c| *c != id);
        }
        self.free_subtree(id);
    }

    fn free_subtree(&mut self, root: NodeId) {
        let mut stack = alloc::vec![root];
        while let Some(id) = stack.pop() {
            let Some(slot) = self.nodes.get_mut(id.idx()) else {
                continue;
            };
            if slot.generation != id.1 {
                continue;
            }
            let Some(rec) = slot.record.take() else {
                continue;
            };
            self.free_nodes.push(id.0);
            self.count_listeners(rec.desc.listeners, false);
            stack.extend(rec.children.iter().copied());
            if let Some(frame) = rec.content_frame {
                self.free_frame(frame);
            }
        }
    }

    /// Detach a frame: its document subtree and all nested frames go away and the
    /// owner element forgets it. The main frame can't be detached.
    pub fn detach_frame(&mut self, frame: FrameId) {
        if frame == self.main_frame {
            return;
        }
        let Some(rec) = self.frame(frame) else {
            return;
        };
        if let Some(owner) = rec.owner
            && let Some(o) = self.node_mut(owner)
        {
            o.content_frame = None;
        }
        self.free_frame(frame);
    }

    fn free_frame(&mut self, frame: FrameId) {
        let Some(slot) = self.frames.get_mut(frame.idx()) else {
            return;
        };
        if slot.generation != frame.1 {
            return;
        }
        let Some(rec) = slot.record.take() else {
            return;
        };
        self.free_frames.push(frame.0);
        self.free_subtree(rec.document);
    }

    /// Whether `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Whether `frame` is still attached to the page.
    pub fn is_frame_attached(&self, frame: FrameId) -> bool {
        self.frame(frame).is_some()
    }

    /// Number of live nodes, including documents.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|s| s.record.is_some()).count()
    }

    /// Whether the page has no nodes. Never true while the main frame exists.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // --- frames ---

    /// Document node of a frame.
    pub fn document(&self, frame: FrameId) -> Option<NodeId> {
        self.frame(frame).map(|f| f.document)
    }

    /// Frame a node lives in.
    pub fn frame_of(&self, node: NodeId) -> Option<FrameId> {
        self.node(node).map(|n| n.frame)
    }

    /// Parent frame, `None` for the main frame.
    pub fn parent_frame(&self, frame: FrameId) -> Option<FrameId> {
        self.frame(frame)?.parent
    }

    /// Owner element of a frame, `None` for the main frame.
    pub fn frame_owner(&self, frame: FrameId) -> Option<NodeId> {
        self.frame(frame)?.owner
    }

    /// Content frame of a frame-owner element.
    pub fn content_frame(&self, owner: NodeId) -> Option<FrameId> {
        self.node(owner)?.content_frame
    }

    /// Viewport size of a frame.
    pub fn viewport(&self, frame: FrameId) -> Option<Size> {
        self.frame(frame).map(|f| f.viewport)
    }

    /// Whether the frame lives out of process.
    pub fn is_remote(&self, frame: FrameId) -> bool {
        self.frame(frame).is_some_and(|f| f.remote)
    }

    /// Whether the frame has completed its first layout.
    pub fn is_layout_ready(&self, frame: FrameId) -> bool {
        self.frame(frame).is_some_and(|f| f.layout_ready)
    }

    /// Mark a frame's first layout as done (or not).
    pub fn set_layout_ready(&mut self, frame: FrameId, ready: bool) {
        if let Some(f) = self.frame_mut(frame) {
            f.layout_ready = ready;
        }
    }

    /// Mark a frame as living in another process.
    pub fn set_remote(&mut self, frame: FrameId, remote: bool) {
        if let Some(f) = self.frame_mut(frame) {
            f.remote = remote;
        }
    }

    /// Whether `ancestor` is `frame` or one of its ancestors.
    pub fn is_frame_ancestor_or_self(&self, ancestor: FrameId, frame: FrameId) -> bool {
        let mut cur = Some(frame);
        while let Some(f) = cur {
            if f == ancestor {
                return true;
            }
            cur = self.parent_frame(f);
        }
        false
    }

    /// Frames from the main frame down to `frame`, inclusive.
    pub fn frame_path(&self, frame: FrameId) -> Vec<FrameId> {
        let mut out = Vec::new();
        let mut cur = Some(frame);
        while let Some(f) = cur {
            if !self.is_frame_attached(f) {
                break;
            }
            out.push(f);
            cur = self.parent_frame(f);
        }
        out.reverse();
        out
    }

    /// The child of `ancestor` on the way down to `frame`, if `frame` is strictly below it.
    pub fn child_frame_toward(&self, ancestor: FrameId, frame: FrameId) -> Option<FrameId> {
        let mut cur = frame;
        while let Some(parent) = self.parent_frame(cur) {
            if parent == ancestor {
                return Some(cur);
            }
            cur = parent;
        }
        None
    }

    /// Whether this frame and every ancestor frame are local (same process).
    pub fn is_locally_reachable(&self, frame: FrameId) -> bool {
        self.frame_path(frame)
            .iter()
            .all(|f| !self.is_remote(*f))
    }

    // --- node data ---

    /// Node kind.
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).map(|n| n.desc.kind)
    }

    /// Element class, `None` for non-elements.
    pub fn element_kind(&self, id: NodeId) -> Option<ElementKind> {
        match self.kind(id)? {
            NodeKind::Element(k) => Some(k),
            _ => None,
        }
    }

    /// Whether the node is a text run.
    pub fn is_text(&self, id: NodeId) -> bool {
        self.kind(id) == Some(NodeKind::Text)
    }

    /// Static flags (empty for stale ids).
    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.node(id).map_or(NodeFlags::empty(), |n| n.desc.flags)
    }

    /// Replace static flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_mut(id) {
            n.desc.flags = flags;
        }
    }

    /// Layout bounds in frame content coordinates.
    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        self.node(id).map(|n| n.desc.bounds)
    }

    /// Replace layout bounds.
    pub fn set_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Some(n) = self.node_mut(id) {
            n.desc.bounds = bounds;
        }
    }

    /// Stacking order among siblings.
    pub fn z_index(&self, id: NodeId) -> Option<i32> {
        self.node(id).map(|n| n.desc.z_index)
    }

    /// Listener presence bits of a node.
    pub fn listeners(&self, id: NodeId) -> ListenerFlags {
        self.node(id)
            .map_or(ListenerFlags::empty(), |n| n.desc.listeners)
    }

    /// Replace listener presence bits, keeping the page-wide union current.
    pub fn set_listeners(&mut self, id: NodeId, listeners: ListenerFlags) {
        let Some(old) = self.node(id).map(|n| n.desc.listeners) else {
            return;
        };
        self.count_listeners(old, false);
        self.count_listeners(listeners, true);
        if let Some(n) = self.node_mut(id) {
            n.desc.listeners = listeners;
        }
    }

    /// Whether any live node has a listener of one of the given classes.
    pub fn has_listener_anywhere(&self, flags: ListenerFlags) -> bool {
        self.listener_counts
            .iter()
            .enumerate()
            .any(|(bit, count)| *count > 0 && flags.bits() & (1 << bit) != 0)
    }

    /// Scroll state of a scroll container.
    pub fn scroll(&self, id: NodeId) -> Option<&ScrollState> {
        self.node(id)?.desc.scroll.as_ref()
    }

    /// Scroll a container by `delta`, returning the applied part.
    pub fn scroll_by(&mut self, id: NodeId, delta: Vec2) -> Vec2 {
        self.node_mut(id)
            .and_then(|n| n.desc.scroll.as_mut())
            .map_or(Vec2::ZERO, |s| s.scroll_by(delta))
    }

    /// Set a container's scroll state.
    pub fn set_scroll(&mut self, id: NodeId, scroll: Option<ScrollState>) {
        if let Some(n) = self.node_mut(id) {
            n.desc.scroll = scroll;
        }
    }

    /// Author cursor style.
    pub fn cursor_style(&self, id: NodeId) -> Option<&CursorStyle> {
        self.node(id).map(|n| &n.desc.cursor)
    }

    /// Renderer-forced cursor.
    pub fn cursor_override(&self, id: NodeId) -> Option<CursorIcon> {
        self.node(id)?.desc.cursor_override
    }

    /// Force a cursor for a node.
    pub fn set_cursor_override(&mut self, id: NodeId, cursor: Option<CursorIcon>) {
        if let Some(n) = self.node_mut(id) {
            n.desc.cursor_override = cursor;
        }
    }

    /// Declared drop zone.
    pub fn drop_zone(&self, id: NodeId) -> Option<&DropZone> {
        self.node(id)?.desc.drop_zone.as_ref()
    }

    /// Link target or image source.
    pub fn url(&self, id: NodeId) -> Option<&str> {
        self.node(id)?.desc.url.as_deref()
    }

    /// Dynamic state bits.
    pub fn state(&self, id: NodeId) -> NodeState {
        self.node(id).map_or(NodeState::empty(), |n| n.state)
    }

    /// Set or clear dynamic state bits.
    pub fn set_state(&mut self, id: NodeId, state: NodeState, on: bool) {
        if let Some(n) = self.node_mut(id) {
            n.state.set(state, on);
        }
    }

    // --- ancestry ---

    /// Parent within the node's own frame (shadow roots report their host).
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Children in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Parent, continuing from a document to its frame's owner element.
    pub fn parent_across_frames(&self, id: NodeId) -> Option<NodeId> {
        let rec = self.node(id)?;
        match rec.parent {
            Some(p) => Some(p),
            None => self.frame(rec.frame)?.owner,
        }
    }

    /// Inclusive ancestors within the node's frame, innermost first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            page: self,
            next: self.is_alive(id).then_some(id),
        }
    }

    /// Root→node path within the node's frame.
    pub fn path_to_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut path: Vec<NodeId> = self.ancestors(id).collect();
        path.reverse();
        path
    }

    /// Root→node path from the main document through frame owners down to `id`.
    pub fn cross_frame_path(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut cur = self.is_alive(id).then_some(id);
        while let Some(n) = cur {
            path.push(n);
            cur = self.parent_across_frames(n);
        }
        path.reverse();
        path
    }

    /// Whether `ancestor` is `node` or an ancestor of it in the same frame.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|a| a == ancestor)
    }

    /// Deepest common inclusive ancestor of two nodes in the same frame.
    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        if self.frame_of(a)? != self.frame_of(b)? {
            return None;
        }
        let pa = self.path_to_root(a);
        let pb = self.path_to_root(b);
        pa.iter()
            .zip(pb.iter())
            .take_while(|(x, y)| x == y)
            .last()
            .map(|(x, _)| *x)
    }

    /// Next node in pre-order within the same frame.
    pub fn next_in_document_order(&self, id: NodeId) -> Option<NodeId> {
        if let Some(first) = self.children(id).first() {
            return Some(*first);
        }
        let mut cur = id;
        loop {
            let parent = self.parent(cur)?;
            let siblings = self.children(parent);
            let pos = siblings.iter().position(|c| *c == cur)?;
            if let Some(next) = siblings.get(pos + 1) {
                return Some(*next);
            }
            cur = parent;
        }
    }

    /// All nodes of a frame in pre-order.
    pub fn document_order(&self, frame: FrameId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let Some(doc) = self.document(frame) else {
            return out;
        };
        let mut stack = alloc::vec![doc];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    // --- editing / focus predicates ---

    /// Whether the node is inside an editing host (or is a text control).
    pub fn is_editable(&self, id: NodeId) -> bool {
        self.editable_root(id).is_some()
    }

    /// The outermost editing host containing `id` within its frame.
    pub fn editable_root(&self, id: NodeId) -> Option<NodeId> {
        let mut root = None;
        for a in self.ancestors(id) {
            let editable = self.flags(a).contains(NodeFlags::EDITABLE)
                || self.element_kind(a) == Some(ElementKind::TextControl);
            if editable {
                root = Some(a);
            } else if root.is_some() {
                break;
            }
        }
        root
    }

    /// Whether the node can take focus.
    pub fn is_focusable(&self, id: NodeId) -> bool {
        let flags = self.flags(id);
        flags.contains(NodeFlags::FOCUSABLE)
            || matches!(
                self.element_kind(id),
                Some(ElementKind::Link | ElementKind::TextControl)
            )
    }

    /// Whether a press on the node may start a text selection.
    pub fn can_start_selection(&self, id: NodeId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        if self
            .ancestors(id)
            .any(|a| self.flags(a).contains(NodeFlags::USER_SELECT_NONE))
        {
            return false;
        }
        self.is_text(id) || self.is_editable(id)
    }

    /// Whether the node would react to a click (for touch adjustment).
    pub fn responds_to_click(&self, id: NodeId) -> bool {
        self.flags(id).contains(NodeFlags::CLICKABLE)
            || self.element_kind(id) == Some(ElementKind::Link)
            || self.is_focusable(id)
            || self.flags(id).contains(NodeFlags::EDITABLE)
    }

    // --- geometry ---

    /// Visual rect of a node in its frame's viewport coordinates, after ancestor scrolling.
    pub fn visual_rect(&self, id: NodeId) -> Option<Rect> {
        let bounds = self.node(id)?.desc.bounds;
        let mut offset = Vec2::ZERO;
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            if let Some(s) = self.scroll(p) {
                offset += s.offset;
            }
            cur = self.parent(p);
        }
        Some(bounds - offset)
    }

    /// Origin of a frame's viewport in its parent frame's viewport coordinates.
    pub fn frame_origin_in_parent(&self, frame: FrameId) -> Option<Vec2> {
        let owner = self.frame(frame)?.owner?;
        Some(self.visual_rect(owner)?.origin().to_vec2())
    }

    /// Translate a point in an owner's frame into its content frame.
    pub fn point_in_child_frame(&self, owner: NodeId, point: Point) -> Option<Point> {
        let child = self.content_frame(owner)?;
        Some(point - self.frame_origin_in_parent(child)?)
    }

    /// Translate a point in `frame` to main-frame coordinates.
    pub fn point_to_root(&self, frame: FrameId, point: Point) -> Option<Point> {
        let mut p = point;
        let mut cur = frame;
        while let Some(parent) = self.parent_frame(cur) {
            p += self.frame_origin_in_parent(cur)?;
            cur = parent;
        }
        self.is_frame_attached(cur).then_some(p)
    }

    /// Translate a main-frame point into `frame`'s coordinates.
    pub fn point_from_root(&self, frame: FrameId, point: Point) -> Option<Point> {
        let root = self.point_to_root(frame, Point::ZERO)?;
        Some(point - root.to_vec2())
    }

    /// Ordering of a node's children for hit testing: topmost first.
    pub(crate) fn children_topmost_first(&self, id: NodeId) -> SmallVec<[NodeId; 8]> {
        let mut kids: SmallVec<[NodeId; 8]> = self.children(id).iter().copied().collect();
        // Stable sort keeps document order within equal z.
        kids.sort_by_key(|c| self.z_index(*c).unwrap_or(0));
        kids.reverse();
        kids
    }
}

/// Iterator over inclusive ancestors within a frame. See [`Page::ancestors`].
#[derive(Clone, Debug)]
pub struct Ancestors<'a> {
    page: &'a Page,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let cur = self.next?;
        self.next = self.page.parent(cur);
        Some(cur)
    }
}
