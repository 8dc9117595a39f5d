// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=sluice_responder --heading-base-level=0

//! Sluice Responder: deterministic, `no_std` event propagation.
//!
//! ## Overview
//!
//! This crate computes *orderings*; it does not hit test and does not own any
//! listener storage.
//!
//! - [`dispatcher::sequence`] turns a root→target path into capture → target → bubble steps,
//!   and [`dispatcher::run`] walks them while honoring [`Outcome`](types::Outcome)s.
//! - [`hover::HoverState`] diffs root→leaf chains into leave (leaf first) and
//!   enter (outermost first) transitions. The same type tracks the active chain.
//! - [`focus::FocusState`] tracks the focused node and its focus-within path.
//!
//! ## Boundary transitions
//!
//! Hover chains are compared by their common prefix. Everything below the
//! common ancestor in the old chain is left, leaf first; everything below it in
//! the new chain is entered, outermost first. Replaying the transitions onto
//! an empty chain always reproduces the incrementally maintained one.
//!
//! ```
//! use sluice_responder::hover::{HoverEvent, HoverState};
//!
//! let mut hover: HoverState<u32> = HoverState::new();
//! hover.update_path(&[1, 2, 3]);
//! let events = hover.update_path(&[1, 2, 4]);
//! assert_eq!(events, vec![HoverEvent::Leave(3), HoverEvent::Enter(4)]);
//! ```
//!
//! ## Dispatcher
//!
//! ```
//! use sluice_responder::dispatcher;
//! use sluice_responder::types::{Outcome, Phase};
//!
//! let seq = dispatcher::sequence(&[1_u32, 2, 3], true);
//! let mut default_prevented = false;
//! let consumed = dispatcher::run(&seq, &mut default_prevented, |d, flag| {
//!     if matches!(d.phase, Phase::Target) {
//!         *flag = true;
//!     }
//!     Outcome::Continue
//! });
//! assert!(!consumed);
//! assert!(default_prevented);
//! ```
//!
//! ## Adapters
//!
//! - **Page adapter** (`page_adapter` feature, on by default): [`ParentLookup`](types::ParentLookup)
//!   for [`sluice_tree::Page`], per-frame dispatch sequences, page-wide boundary paths, and
//!   wrapping document-order navigation for sequential focus.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod dispatcher;
pub mod focus;
pub mod hover;
pub mod types;
