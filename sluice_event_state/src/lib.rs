// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=sluice_event_state --heading-base-level=0

//! Sluice Event State: small state machines for input sequences.
//!
//! Each module handles one piece of per-input-point bookkeeping:
//!
//! - [`click`]: remember a press and decide whether the release completes a click
//! - [`drag`]: drag hysteresis per source kind and movement deltas
//! - [`capture`]: pointer capture with the pending → active handoff
//! - [`touch`]: the touch-id → pressed-node map
//!
//! ## Design
//!
//! The managers are generic over the pointer id and node key types and never
//! look at a tree. Callers feed them pre-computed facts (the node a press hit,
//! whether a dispatch was default-prevented) and act on the answers. Liveness
//! of node keys is the caller's job; the managers offer `invalidate`/`forget`
//! hooks to drop keys that died.
//!
//! ```rust
//! use kurbo::Point;
//! use sluice_event_state::click::{ClickResult, ClickState, Press};
//! use sluice_event_state::drag::{DragSourceKind, DragState, DragThresholds};
//!
//! let mut clicks: ClickState<u64, u32> = ClickState::new();
//! let mut drag = DragState::default();
//!
//! clicks.on_down(1, Press::new(7, Point::new(10.0, 10.0), 1, 0));
//! drag.start(Point::new(10.0, 10.0));
//!
//! // A small wobble doesn't make a link drag...
//! let link = DragThresholds::default().for_kind(DragSourceKind::Link);
//! assert!(!drag.exceeds(Point::new(12.0, 11.0), link));
//!
//! // ...so the release is a click.
//! assert!(matches!(clicks.on_up(1, false), ClickResult::Click(p) if p.target == 7));
//! ```
//!
//! This crate is `no_std` compatible (with `alloc`) for all modules.

#![no_std]

extern crate alloc;

pub mod capture;
pub mod click;
pub mod drag;
pub mod touch;
