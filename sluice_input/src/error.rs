// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reasons an input step stops early.
//!
//! None of these cross the public `handle_*` boundary: entry points log them and
//! report the event as not consumed.

use sluice_tree::{FrameId, NodeId};

use crate::event::PointerId;

/// Why the remaining steps of a handler were skipped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// A node held across a dispatch point was removed.
    #[error("node {0:?} is no longer alive")]
    StaleNode(NodeId),
    /// A frame was detached while its event was being handled.
    #[error("frame {0:?} was detached")]
    FrameDetached(FrameId),
    /// Hit testing found nothing to target.
    #[error("no target under the pointer")]
    NoTarget,
    /// A drag was attempted but nothing draggable is under the press.
    #[error("no draggable content at the press location")]
    DragSourceMissing,
    /// A drag session is already active.
    #[error("a drag session is already in progress")]
    DragInProgress,
    /// Capture was requested for a pointer that is not down, or a dead node.
    #[error("pointer capture not allowed for {0:?}")]
    CaptureNotAllowed(PointerId),
}

/// Result type used throughout the input core.
pub type Result<T, E = InputError> = core::result::Result<T, E>;
