// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=sluice_tree --heading-base-level=0

//! Sluice Tree: the page model that input routing runs against.
//!
//! A [`Page`] owns a main frame, any number of nested frames, and every node in
//! them, all addressed by small generational handles ([`NodeId`], [`FrameId`]).
//! Handles never dangle: after a node is removed or a frame is detached, queries
//! through the stale handle simply return `None`/`false`. Input code re-checks
//! handles with [`Page::is_alive`] and [`Page::is_frame_attached`] after every
//! call that may run listener code.
//!
//! ## Not a DOM or a layout engine
//!
//! Nodes carry exactly what input routing needs: a kind, border-box bounds in
//! frame content coordinates, a z-index among siblings, [`NodeFlags`],
//! listener presence ([`ListenerFlags`]), optional [`ScrollState`], cursor style,
//! drop zone, and a URL for links and images. Upstream code computes layout and
//! writes the results here.
//!
//! ## Frames
//!
//! Frame-owner elements ([`ElementKind::FrameOwner`]) may own a content frame.
//! Frames can be remote (out of process, never descended into) and can be
//! "not yet laid out", in which case hit tests return an empty result rather
//! than forcing layout. Coordinates translate between a frame and the main
//! frame through the owners' visual rects, including ancestor scroll offsets.
//!
//! ## Hit testing
//!
//! [`Page::hit_test`] always walks from the main frame down (see [`hit`] for
//! the exact policy). With a positive padding the query is list-based and the
//! result carries every candidate intersecting the padded square, topmost first.
//!
//! ```
//! use kurbo::{Point, Rect, Size};
//! use sluice_tree::{ElementKind, FrameDesc, HitTestRequest, NodeDesc, Page};
//!
//! let mut page = Page::new(Size::new(400.0, 300.0));
//! let doc = page.document(page.main_frame()).unwrap();
//! let owner_rect = Rect::new(100.0, 100.0, 300.0, 250.0);
//! let iframe = page
//!     .insert(doc, NodeDesc::of_kind(ElementKind::FrameOwner, owner_rect))
//!     .unwrap();
//! let child = page.attach_frame(iframe, FrameDesc::new(Size::new(200.0, 150.0))).unwrap();
//! let child_doc = page.document(child).unwrap();
//! let link = page
//!     .insert(child_doc, NodeDesc::of_kind(ElementKind::Link, Rect::new(0.0, 0.0, 40.0, 20.0)))
//!     .unwrap();
//!
//! let hit = page.hit_test(
//!     page.main_frame(),
//!     Point::new(110.0, 105.0),
//!     HitTestRequest::READ_ONLY | HitTestRequest::ALLOW_CHILD_FRAME_CONTENT,
//!     0.0,
//! );
//! assert_eq!(hit.frame, Some(child));
//! assert_eq!(hit.inner_node, Some(link));
//! assert_eq!(hit.local_point, Point::new(10.0, 5.0));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod hit;
mod page;
mod types;

pub use hit::{HitTestRequest, HitTestResult};
pub use page::{Ancestors, Page};
pub use types::{
    CursorImage, CursorStyle, DropZone, DropZoneOperation, ElementKind, FrameDesc, FrameId,
    ListenerFlags, NodeDesc, NodeFlags, NodeId, NodeKind, NodeState, ScrollState,
};

pub use cursor_icon::CursorIcon;
