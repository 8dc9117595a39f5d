// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=sluice_input --heading-base-level=0

//! Sluice Input: routes platform input through a page of nested frames.
//!
//! ## Overview
//!
//! An [`EventHandler`] takes raw platform input (mouse, wheel, touch, gestures,
//! keys) and turns it into DOM-style events delivered through a [`Host`]:
//!
//! - **Hit testing and hover.** Every pointer event is hit tested from the main
//!   frame down. The hovered chain is kept page-wide, across frame boundaries,
//!   and boundary events (`mouseout`/`mouseleave`, then `mouseover`/`mouseenter`)
//!   are only dispatched to nodes with matching listeners.
//! - **Press sequences.** A mouse press is routed to one frame and stays there
//!   until release, even when the pointer leaves it. Clicks fire only when
//!   press and release share an ancestor; click counts come from the platform.
//! - **Capture.** [`EventHandler::set_pointer_capture`] retargets a pointer to a
//!   node from its next event on, with `gotpointercapture`/`lostpointercapture`.
//! - **Gestures.** Taps go through touch adjustment ([`touch_adjust`]) and turn
//!   into synthetic mouse sequences. Scroll gestures compute their scroll chain
//!   once and report overscroll at the end.
//! - **Drag and drop.** Drags start past a movement threshold, carry a
//!   [`DataTransfer`] whose access follows the drag phase, and track targets
//!   frame by frame. Drops into editable content fall back to the [`Editor`].
//! - **Cursor.** The cursor is recomputed at most once per interval and only
//!   sent to the chrome when it changes.
//!
//! The page itself lives in [`sluice_tree`]; propagation order and hover
//! diffing come from [`sluice_responder`]; press, click, capture and touch
//! bookkeeping from [`sluice_event_state`].
//!
//! ## Re-entrancy
//!
//! Event listeners run inside [`EventSink::dispatch_event`] with mutable access
//! to the page. They may remove nodes or detach frames. After every dispatch,
//! the handler re-checks the handles it is holding and stops the current input
//! when one went stale; public entry points then report "not consumed".
//!
//! ## Logging
//!
//! The crate logs through [`tracing`]: `debug` for routing decisions that end
//! an input early, `trace` for per-event detail, `warn` for inconsistent
//! platform input.

mod drag;
mod focus;
mod frame_router;
mod frame_state;
mod gesture;
mod handler;
mod hover;
mod keyboard;
mod pointer;
mod scroll;
mod touch;

pub mod config;
pub mod cursor;
pub mod data_transfer;
pub mod dom_event;
pub mod error;
pub mod event;
pub mod host;
pub mod listeners;
pub mod touch_adjust;

pub use config::{
    CursorConfig, DragConfig, InputConfig, PinchConfig, ScrollConfig, TouchAdjustConfig,
};
pub use cursor::{Cursor, CursorHints, resolve_cursor};
pub use data_transfer::{DataTransfer, DataTransferAccess, DragOperation, DroppedFile, Fragment};
pub use dom_event::{DomEvent, EventKind, TouchInfo};
pub use drag::DragSession;
pub use error::{InputError, Result};
pub use event::{
    GestureEvent, GestureKind, Key, KeyEvent, KeyState, Modifiers, MouseEvent, NamedKey,
    PlatformInput, PointerButton, PointerButtons, PointerId, TouchEvent, TouchPhase, TouchPoint,
    WheelDelta, WheelEvent,
};
pub use handler::EventHandler;
pub use host::{
    ChromeClient, DragClient, DragImage, Editor, EventSink, Granularity, Host, SelectedContent,
};
pub use listeners::{Listener, ListenerId, ListenerRegistry};
pub use sluice_responder::types::Outcome;
pub use touch_adjust::{AdjustKind, TouchTarget};
