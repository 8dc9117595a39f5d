// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cursor shape resolution and the coalescing update timer.
//!
//! The cursor for a node is the first answer of:
//!
//! 1. the node's renderer override (resize handles, plugins);
//! 2. the author `cursor` style, inherited from the nearest ancestor that sets
//!    one: the first acceptable custom image, then the keyword;
//! 3. the user agent default for the node class: hand over links, I-beam over
//!    editable or selectable text and during a text selection drag;
//! 4. the default arrow.
//!
//! Custom images larger than [`CursorConfig::max_custom_size`] CSS pixels on a
//! side, or with a scale below [`CursorConfig::min_custom_scale`], are skipped.

use kurbo::{Point, Size};
use sluice_tree::{CursorIcon, CursorImage, ElementKind, NodeId, Page};

use crate::config::CursorConfig;

/// A cursor to show.
#[derive(Clone, Debug, PartialEq)]
pub enum Cursor {
    /// A system cursor.
    Icon(CursorIcon),
    /// An author image.
    Custom {
        /// Image reference.
        url: String,
        /// Hotspot in CSS pixels.
        hotspot: Point,
        /// Size in CSS pixels.
        size: Size,
    },
}

impl Default for Cursor {
    fn default() -> Self {
        Self::Icon(CursorIcon::Default)
    }
}

/// Interaction facts that change the default cursor.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CursorHints {
    /// The pointer is over a scrollbar.
    pub over_scrollbar: bool,
    /// A text selection drag is in progress.
    pub selecting: bool,
}

fn accept_image(image: &CursorImage, config: &CursorConfig) -> Option<Size> {
    if image.scale.is_nan() || image.scale < config.min_custom_scale {
        return None;
    }
    let css = Size::new(image.size.width / image.scale, image.size.height / image.scale);
    (css.width <= config.max_custom_size && css.height <= config.max_custom_size).then_some(css)
}

/// Resolve the cursor for the node under the pointer.
pub fn resolve_cursor(
    page: &Page,
    node: Option<NodeId>,
    hints: CursorHints,
    config: &CursorConfig,
) -> Cursor {
    let Some(node) = node.filter(|n| page.is_alive(*n)) else {
        return Cursor::default();
    };
    if hints.over_scrollbar {
        return Cursor::default();
    }
    if let Some(icon) = page.cursor_override(node) {
        return Cursor::Icon(icon);
    }
    let style = page
        .ancestors(node)
        .filter_map(|a| page.cursor_style(a))
        .find(|s| !s.is_inherit());
    if let Some(style) = style {
        for image in &style.images {
            if let Some(size) = accept_image(image, config) {
                return Cursor::Custom {
                    url: image.url.clone(),
                    hotspot: image.hotspot,
                    size,
                };
            }
            tracing::trace!(url = %image.url, "custom cursor rejected");
        }
        if let Some(keyword) = style.keyword {
            return Cursor::Icon(keyword);
        }
    }
    if hints.selecting {
        return Cursor::Icon(CursorIcon::Text);
    }
    let over_link = page
        .ancestors(node)
        .any(|a| page.element_kind(a) == Some(ElementKind::Link) && page.url(a).is_some());
    if over_link {
        return Cursor::Icon(CursorIcon::Pointer);
    }
    if page.is_editable(node) || (page.is_text(node) && page.can_start_selection(node)) {
        return Cursor::Icon(CursorIcon::Text);
    }
    Cursor::default()
}

/// One-shot timer that coalesces cursor updates.
///
/// Scheduling while an update is pending keeps the original deadline, so
/// updates happen at most once per interval no matter how many moves arrive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CursorTimer {
    interval: u64,
    due: Option<u64>,
}

impl CursorTimer {
    /// A timer with the given interval in milliseconds.
    pub fn new(interval: u64) -> Self {
        Self {
            interval,
            due: None,
        }
    }

    /// Request an update at `now + interval`, unless one is already pending.
    pub fn schedule(&mut self, now: u64) {
        if self.due.is_none() {
            self.due = Some(now.saturating_add(self.interval));
        }
    }

    /// Whether an update is pending.
    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    /// Consume the pending update if its deadline has passed.
    pub fn take_due(&mut self, now: u64) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }

    /// Drop a pending update.
    pub fn cancel(&mut self) {
        self.due = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;
    use sluice_tree::{CursorStyle, NodeDesc, NodeFlags};

    fn page() -> (Page, NodeId) {
        let page = Page::new(Size::new(200.0, 200.0));
        let doc = page.document(page.main_frame()).unwrap();
        (page, doc)
    }

    fn image(side: f64, scale: f64) -> CursorImage {
        CursorImage {
            url: format!("cursor-{side}"),
            size: Size::new(side, side),
            scale,
            hotspot: Point::new(1.0, 1.0),
        }
    }

    #[test]
    fn override_beats_author_style() {
        let (mut page, doc) = page();
        let style = CursorStyle {
            images: Vec::new(),
            keyword: Some(CursorIcon::Wait),
        };
        let n = page
            .insert(doc, NodeDesc::element(Rect::new(0.0, 0.0, 10.0, 10.0)).with_cursor(style))
            .unwrap();
        let cfg = CursorConfig::default();
        assert_eq!(
            resolve_cursor(&page, Some(n), CursorHints::default(), &cfg),
            Cursor::Icon(CursorIcon::Wait)
        );
        page.set_cursor_override(n, Some(CursorIcon::NsResize));
        assert_eq!(
            resolve_cursor(&page, Some(n), CursorHints::default(), &cfg),
            Cursor::Icon(CursorIcon::NsResize)
        );
    }

    #[test]
    fn oversized_and_tiny_scale_images_are_skipped() {
        let (mut page, doc) = page();
        let style = CursorStyle {
            images: vec![image(200.0, 1.0), image(10.0, 0.0001), image(64.0, 2.0)],
            keyword: Some(CursorIcon::Crosshair),
        };
        let parent = page
            .insert(doc, NodeDesc::element(Rect::new(0.0, 0.0, 50.0, 50.0)).with_cursor(style))
            .unwrap();
        let child = page
            .insert(parent, NodeDesc::element(Rect::new(0.0, 0.0, 10.0, 10.0)))
            .unwrap();
        let got = resolve_cursor(
            &page,
            Some(child),
            CursorHints::default(),
            &CursorConfig::default(),
        );
        assert_eq!(
            got,
            Cursor::Custom {
                url: "cursor-64".into(),
                hotspot: Point::new(1.0, 1.0),
                size: Size::new(32.0, 32.0),
            }
        );
    }

    #[test]
    fn user_agent_defaults_by_node_class() {
        let (mut page, doc) = page();
        let cfg = CursorConfig::default();
        let link = page
            .insert(
                doc,
                NodeDesc::of_kind(ElementKind::Link, Rect::new(0.0, 0.0, 10.0, 10.0)).with_url("a"),
            )
            .unwrap();
        let link_text = page.insert(link, NodeDesc::text(Rect::new(0.0, 0.0, 5.0, 5.0))).unwrap();
        let text = page.insert(doc, NodeDesc::text(Rect::new(20.0, 0.0, 30.0, 10.0))).unwrap();
        let editable = page
            .insert(
                doc,
                NodeDesc::element(Rect::new(40.0, 0.0, 60.0, 10.0)).with_flags(NodeFlags::EDITABLE),
            )
            .unwrap();
        let hints = CursorHints::default();
        assert_eq!(
            resolve_cursor(&page, Some(link_text), hints, &cfg),
            Cursor::Icon(CursorIcon::Pointer)
        );
        assert_eq!(resolve_cursor(&page, Some(text), hints, &cfg), Cursor::Icon(CursorIcon::Text));
        assert_eq!(
            resolve_cursor(&page, Some(editable), hints, &cfg),
            Cursor::Icon(CursorIcon::Text)
        );
        assert_eq!(resolve_cursor(&page, Some(doc), hints, &cfg), Cursor::default());
        let scrollbar = CursorHints {
            over_scrollbar: true,
            ..hints
        };
        assert_eq!(resolve_cursor(&page, Some(text), scrollbar, &cfg), Cursor::default());
        assert_eq!(resolve_cursor(&page, None, hints, &cfg), Cursor::default());
    }

    #[test]
    fn timer_coalesces_within_interval() {
        let mut t = CursorTimer::new(20);
        t.schedule(100);
        t.schedule(110);
        assert!(!t.take_due(119));
        assert!(t.take_due(120));
        assert!(!t.take_due(200), "one update per schedule");
        t.schedule(200);
        t.cancel();
        assert!(!t.is_pending());
    }
}
