// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the page model: handles, node kinds, flags, and per-node data.

use alloc::string::String;
use alloc::vec::Vec;

use cursor_icon::CursorIcon;
use kurbo::{Rect, Size, Vec2};

/// Identifier for a node in a [`Page`](crate::Page).
///
/// This is a small, copyable handle made of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Stale ids never alias a different live node because the generation must match.
/// Use [`Page::is_alive`](crate::Page::is_alive) after anything that can run listener code.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Identifier for a frame (a document plus its viewport) in a [`Page`](crate::Page).
///
/// Generational like [`NodeId`]; a detached frame's id never becomes valid again.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub(crate) u32, pub(crate) u32);

impl FrameId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// What a node is, as far as input routing cares.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The root of a frame's document. Created by the page; never inserted directly.
    Document,
    /// A shadow root. Its parent is the shadow host, so composed ancestry is plain ancestry.
    ShadowRoot,
    /// A run of text.
    Text,
    /// An element.
    Element(ElementKind),
}

/// Element classes that change routing or default behavior.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Anything without special input behavior.
    #[default]
    Generic,
    /// A hyperlink. Draggable as a link, hand cursor.
    Link,
    /// An image. Draggable as an image when images load automatically.
    Image,
    /// An `iframe`-like element that may own a content frame.
    FrameOwner,
    /// An embedded plugin widget. Hits on it are "over a widget".
    Plugin,
    /// A text field. Always editable.
    TextControl,
}

bitflags::bitflags! {
    /// Static node flags provided by the embedder.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u16 {
        /// Node is visible (participates in rendering and hit testing of its subtree).
        const VISIBLE          = 1 << 0;
        /// Node itself can be hit. Children of a non-pickable node can still be hit.
        const PICKABLE         = 1 << 1;
        /// Node can receive focus.
        const FOCUSABLE        = 1 << 2;
        /// Node is an editing host; editability is inherited by descendants.
        const EDITABLE         = 1 << 3;
        /// `draggable=true`: node is a custom drag source.
        const DRAGGABLE        = 1 << 4;
        /// `draggable=false`: suppresses automatic image/link drags.
        const NO_DRAG          = 1 << 5;
        /// `user-select: none`; inherited by descendants.
        const USER_SELECT_NONE = 1 << 6;
        /// Node clips its descendants to its bounds.
        const CLIPS            = 1 << 7;
        /// Node responds to click events (has activation behavior or click listeners).
        const CLICKABLE        = 1 << 8;
        /// Node takes implicit pointer capture on press (sliders, plugins).
        const CAPTURES_POINTER = 1 << 9;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

bitflags::bitflags! {
    /// Dynamic state written by the input core for style and queries.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeState: u8 {
        /// In the hover chain.
        const HOVER        = 1 << 0;
        /// In the active chain.
        const ACTIVE       = 1 << 1;
        /// The focused node.
        const FOCUS        = 1 << 2;
        /// On the path to the focused node.
        const FOCUS_WITHIN = 1 << 3;
        /// Current drag-and-drop target.
        const DRAG_OVER    = 1 << 4;
    }
}

bitflags::bitflags! {
    /// Which listener classes are registered on a node.
    ///
    /// This is a presence hint used to prune boundary event dispatch. The page keeps a
    /// running union so "does anybody listen for this at all" is a constant-time query.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ListenerFlags: u16 {
        /// Non-capturing `mouseenter`.
        const ENTER         = 1 << 0;
        /// Non-capturing `mouseleave`.
        const LEAVE         = 1 << 1;
        /// Capturing `mouseenter`.
        const CAPTURE_ENTER = 1 << 2;
        /// Capturing `mouseleave`.
        const CAPTURE_LEAVE = 1 << 3;
        /// `mouseover` (either phase).
        const OVER          = 1 << 4;
        /// `mouseout` (either phase).
        const OUT           = 1 << 5;
        /// Touch listeners.
        const TOUCH         = 1 << 6;
        /// Wheel listeners.
        const WHEEL         = 1 << 7;
    }
}

impl ListenerFlags {
    pub(crate) const COUNT: usize = 8;
}

/// Scroll position and range of a scroll container.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollState {
    /// Current scroll offset.
    pub offset: Vec2,
    /// Maximum scroll offset per axis; minimum is zero.
    pub max_offset: Vec2,
    /// Scrollbar area relative to the node's bounds origin, if a scrollbar is shown.
    pub scrollbar: Option<Rect>,
}

impl ScrollState {
    /// A scroller with the given range and no visible scrollbar.
    pub fn with_max(max_offset: Vec2) -> Self {
        Self {
            offset: Vec2::ZERO,
            max_offset,
            scrollbar: None,
        }
    }

    /// Whether there is any range to scroll in.
    pub fn is_scrollable(&self) -> bool {
        self.max_offset.x > 0.0 || self.max_offset.y > 0.0
    }

    /// Whether some of `delta` could be applied right now.
    pub fn can_scroll(&self, delta: Vec2) -> bool {
        (delta.x > 0.0 && self.offset.x < self.max_offset.x)
            || (delta.x < 0.0 && self.offset.x > 0.0)
            || (delta.y > 0.0 && self.offset.y < self.max_offset.y)
            || (delta.y < 0.0 && self.offset.y > 0.0)
    }

    /// Apply as much of `delta` as the range allows and return the applied part.
    pub fn scroll_by(&mut self, delta: Vec2) -> Vec2 {
        let target = Vec2::new(
            (self.offset.x + delta.x).clamp(0.0, self.max_offset.x.max(0.0)),
            (self.offset.y + delta.y).clamp(0.0, self.max_offset.y.max(0.0)),
        );
        let applied = target - self.offset;
        self.offset = target;
        applied
    }
}

/// One entry of an author `cursor` list.
#[derive(Clone, Debug, PartialEq)]
pub struct CursorImage {
    /// Opaque image reference understood by the embedder.
    pub url: String,
    /// Intrinsic image size in image pixels.
    pub size: Size,
    /// Image pixels per CSS pixel.
    pub scale: f64,
    /// Hotspot in CSS pixels.
    pub hotspot: kurbo::Point,
}

/// Author cursor style; inherited by descendants when `keyword` is `None` and `images` is empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CursorStyle {
    /// Custom images, tried in order.
    pub images: Vec<CursorImage>,
    /// Keyword; `None` means `auto`.
    pub keyword: Option<CursorIcon>,
}

impl CursorStyle {
    /// Whether this style defers to the parent (neither images nor a keyword).
    pub fn is_inherit(&self) -> bool {
        self.images.is_empty() && self.keyword.is_none()
    }
}

/// Operation declared by a drop zone.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DropZoneOperation {
    /// Copy the dragged data.
    #[default]
    Copy,
    /// Move the dragged data.
    Move,
    /// Link to the dragged data.
    Link,
}

/// A declared drop zone: accepted tokens and the operation to use when one matches.
///
/// Tokens follow the `dropzone` attribute grammar: `string:<type>` matches string
/// items of that type, `file:<type>` matches dropped files of that type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DropZone {
    /// Operation used when a token matches.
    pub operation: DropZoneOperation,
    /// Accepted tokens.
    pub accepts: Vec<String>,
}

/// Embedder-provided description of a node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDesc {
    /// Kind of node.
    pub kind: NodeKind,
    /// Border box in frame content coordinates (before scroll offsets).
    pub bounds: Rect,
    /// Stacking order among siblings. Higher paints later (on top).
    pub z_index: i32,
    /// Static flags.
    pub flags: NodeFlags,
    /// Listener presence.
    pub listeners: ListenerFlags,
    /// Scroll state when the node is a scroll container.
    pub scroll: Option<ScrollState>,
    /// Author cursor style.
    pub cursor: CursorStyle,
    /// Cursor forced by the node's renderer (resize handles, plugins).
    pub cursor_override: Option<CursorIcon>,
    /// Declared drop zone.
    pub drop_zone: Option<DropZone>,
    /// Link target or image source.
    pub url: Option<String>,
}

impl Default for NodeDesc {
    fn default() -> Self {
        Self {
            kind: NodeKind::Element(ElementKind::Generic),
            bounds: Rect::ZERO,
            z_index: 0,
            flags: NodeFlags::default(),
            listeners: ListenerFlags::empty(),
            scroll: None,
            cursor: CursorStyle::default(),
            cursor_override: None,
            drop_zone: None,
            url: None,
        }
    }
}

impl NodeDesc {
    /// A generic element covering `bounds`.
    pub fn element(bounds: Rect) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }

    /// A text run covering `bounds`.
    pub fn text(bounds: Rect) -> Self {
        Self {
            kind: NodeKind::Text,
            bounds,
            ..Self::default()
        }
    }

    /// An element of the given class covering `bounds`.
    pub fn of_kind(kind: ElementKind, bounds: Rect) -> Self {
        Self {
            kind: NodeKind::Element(kind),
            bounds,
            ..Self::default()
        }
    }

    /// Add flags.
    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Set the z-index.
    pub fn with_z(mut self, z: i32) -> Self {
        self.z_index = z;
        self
    }

    /// Add listener presence bits.
    pub fn with_listeners(mut self, listeners: ListenerFlags) -> Self {
        self.listeners |= listeners;
        self
    }

    /// Make this a scroll container with the given range.
    pub fn with_scroll(mut self, scroll: ScrollState) -> Self {
        self.scroll = Some(scroll);
        self
    }

    /// Set the link target / image source.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the author cursor style.
    pub fn with_cursor(mut self, cursor: CursorStyle) -> Self {
        self.cursor = cursor;
        self
    }

    /// Declare a drop zone.
    pub fn with_drop_zone(mut self, zone: DropZone) -> Self {
        self.drop_zone = Some(zone);
        self
    }
}

/// Per-frame description.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameDesc {
    /// Viewport size in the frame's own coordinates.
    pub viewport: Size,
    /// Scroll range of the frame's document.
    pub scroll_max: Vec2,
    /// Whether the frame lives in another process and can't be recursed into.
    pub remote: bool,
    /// Whether the first layout has completed.
    pub layout_ready: bool,
}

impl FrameDesc {
    /// A local, laid out frame with the given viewport and no scroll range.
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            scroll_max: Vec2::ZERO,
            remote: false,
            layout_ready: true,
        }
    }

    /// Set the document scroll range.
    pub fn with_scroll_max(mut self, max: Vec2) -> Self {
        self.scroll_max = max;
        self
    }
}
