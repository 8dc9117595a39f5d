// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch adjustment: turning a finger-sized touch area into one target.
//!
//! A padded, list-based hit test collects every node near the touch. Each
//! candidate resolves to its nearest ancestor that responds to the gesture.
//! Containers of responding candidates are blacklisted, so a clickable `<div>`
//! wrapping clickable children never competes with them. Survivors are scored
//! by how close their box is to the touch center, per axis, relative to the
//! padding radius; anything under `ambiguity_ratio` of the best score drops
//! out. The best target yields an adjusted point inside its box, which the
//! caller then hit tests precisely.

use hashbrown::HashSet;
use kurbo::{Point, Rect, Size};
use sluice_tree::{ElementKind, HitTestResult, NodeId, NodeKind, Page};

/// Which gesture the adjustment is for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AdjustKind {
    /// Nodes that respond to clicks.
    Tap,
    /// Nodes that contribute context menu items: links, images, editable and
    /// selectable content.
    ContextMenu,
}

/// A candidate target of an imprecise touch.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TouchTarget {
    /// The responding node.
    pub node: NodeId,
    /// Its box in main-frame coordinates.
    pub rect: Rect,
    /// Proximity score in `0.0..=1.0`.
    pub score: f64,
}

/// Score of a target box for a touch at `touch` with the given padding radius.
///
/// Each axis contributes `(padding - distance) / padding`, clamped at zero, where
/// distance is zero inside the box.
pub fn score_touch_target(touch: Point, padding: f64, rect: Rect) -> f64 {
    if padding <= 0.0 || rect.is_zero_area() {
        return 0.0;
    }
    let distance = |v: f64, lo: f64, hi: f64| {
        if v < lo {
            lo - v
        } else if v > hi {
            v - hi
        } else {
            0.0
        }
    };
    let axis = |d: f64| ((padding - d) / padding).max(0.0);
    axis(distance(touch.x, rect.x0, rect.x1)) * axis(distance(touch.y, rect.y0, rect.y1))
}

/// Drop targets scoring below `ratio` times the best score. Order is kept.
pub fn retain_good(mut targets: Vec<TouchTarget>, ratio: f64) -> Vec<TouchTarget> {
    let best = targets.iter().map(|t| t.score).fold(0.0, f64::max);
    targets.retain(|t| t.score >= best * ratio);
    targets
}

/// The highest scoring target; ties go to the earlier one.
pub fn best_target(targets: &[TouchTarget]) -> Option<&TouchTarget> {
    targets.iter().fold(None, |best: Option<&TouchTarget>, t| match best {
        Some(b) if b.score >= t.score => Some(b),
        _ => Some(t),
    })
}

/// A point inside `rect` as close as possible to `touch`.
///
/// A non-finite `rect` leaves the touch point unchanged.
pub fn adjusted_point(touch: Point, rect: Rect) -> Point {
    if !rect.is_finite() {
        return touch;
    }
    // Stay clear of the exclusive far edges.
    let inner = if rect.width() > 1.0 && rect.height() > 1.0 {
        rect.inset(-0.5)
    } else {
        Rect::from_center_size(rect.center(), Size::ZERO)
    };
    Point::new(
        touch.x.clamp(inner.x0, inner.x1),
        touch.y.clamp(inner.y0, inner.y1),
    )
}

fn responds(page: &Page, node: NodeId, kind: AdjustKind) -> bool {
    match kind {
        AdjustKind::Tap => page.responds_to_click(node),
        AdjustKind::ContextMenu => match page.element_kind(node) {
            Some(ElementKind::Link) => page.url(node).is_some(),
            Some(ElementKind::Image) => true,
            _ => page.is_editable(node) || (page.is_text(node) && page.can_start_selection(node)),
        },
    }
}

fn is_document(page: &Page, node: NodeId) -> bool {
    matches!(page.kind(node), Some(NodeKind::Document))
}

/// Box of `node` in main-frame coordinates.
pub(crate) fn root_rect(page: &Page, node: NodeId) -> Option<Rect> {
    let frame = page.frame_of(node)?;
    let origin = page.point_to_root(frame, Point::ZERO)?;
    Some(page.visual_rect(node)? + origin.to_vec2())
}

/// Good touch targets of a padded hit, in paint order (topmost first).
///
/// `touch` is the touch center in main-frame coordinates.
pub fn find_touch_targets(
    page: &Page,
    hit: &HitTestResult,
    touch: Point,
    padding: f64,
    kind: AdjustKind,
) -> Vec<TouchTarget> {
    let mut blacklist: HashSet<NodeId> = HashSet::new();
    for &candidate in &hit.candidates {
        if !responds(page, candidate, kind) {
            continue;
        }
        for container in page.ancestors(candidate).skip(1) {
            if !blacklist.insert(container) {
                break;
            }
        }
    }

    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut targets = Vec::new();
    for &candidate in &hit.candidates {
        let responder = page
            .ancestors(candidate)
            .filter(|n| !blacklist.contains(n))
            .take_while(|n| !is_document(page, *n))
            .find(|n| responds(page, *n, kind));
        let Some(node) = responder else {
            continue;
        };
        if !seen.insert(node) {
            continue;
        }
        let Some(rect) = root_rect(page, node) else {
            continue;
        };
        targets.push(TouchTarget {
            node,
            rect,
            score: score_touch_target(touch, padding, rect),
        });
    }
    tracing::trace!(candidates = hit.candidates.len(), targets = targets.len(), "touch targets");
    targets
}
