// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw touch points.
//!
//! A touch point is hit tested once, when it goes down; every later phase of
//! that point goes to the same node (or to the node capturing it). Changed
//! points are grouped per target and per phase, so one platform event turns
//! into at most one `touchend`, `touchstart`, `touchmove` and `touchcancel`
//! per target, in that order. Nothing is dispatched when no node on the page
//! listens for touch events.
//!
//! While a drag started from a long press is running, the finger drives the
//! drag instead.

use kurbo::Point;
use sluice_tree::{FrameId, HitTestRequest, ListenerFlags, NodeId, Page};
use smallvec::SmallVec;

use crate::dom_event::{DomEvent, EventKind, TouchInfo};
use crate::drag::DragSession;
use crate::error::Result;
use crate::event::{PointerId, TouchEvent, TouchPhase, TouchPoint};
use crate::frame_router::{deepest_hit, event_target};
use crate::handler::{Cx, EventHandler};

#[derive(Copy, Clone, Debug)]
struct Changed {
    point: TouchPoint,
    root: Point,
    target: NodeId,
}

fn point_in_frame_of(page: &Page, node: NodeId, root: Point) -> Point {
    page.frame_of(node)
        .and_then(|f| page.point_from_root(f, root))
        .unwrap_or(root)
}

fn event_kind(phase: TouchPhase) -> Option<EventKind> {
    match phase {
        TouchPhase::Pressed => Some(EventKind::TouchStart),
        TouchPhase::Moved => Some(EventKind::TouchMove),
        TouchPhase::Released => Some(EventKind::TouchEnd),
        TouchPhase::Cancelled => Some(EventKind::TouchCancel),
        TouchPhase::Stationary => None,
    }
}

fn is_ended(phase: TouchPhase) -> bool {
    matches!(phase, TouchPhase::Released | TouchPhase::Cancelled)
}

impl EventHandler {
    pub(crate) fn touch(&mut self, cx: &mut Cx<'_>, ev: &TouchEvent) -> Result<bool> {
        if self.drag.as_ref().is_some_and(DragSession::from_touch) {
            return self.touch_drag(cx, ev);
        }

        let mut changed: Vec<Changed> = Vec::new();
        for p in &ev.points {
            let root = cx.root_point(p.position);
            match p.phase {
                TouchPhase::Stationary => {}
                TouchPhase::Pressed => {
                    let hit = deepest_hit(cx.page, root, HitTestRequest::ACTIVE, 0.0);
                    let Some(target) = hit.inner_node.map(|n| event_target(cx.page, n)) else {
                        tracing::debug!(id = p.id, "touch press hit nothing");
                        continue;
                    };
                    if !self.touches.press(p.id, target) {
                        tracing::warn!(id = p.id, "touch pressed twice without release");
                        continue;
                    }
                    changed.push(Changed {
                        point: *p,
                        root,
                        target,
                    });
                }
                TouchPhase::Moved | TouchPhase::Released | TouchPhase::Cancelled => {
                    let Some(pressed) = self.touches.target(p.id) else {
                        tracing::warn!(id = p.id, phase = ?p.phase, "unknown touch point");
                        continue;
                    };
                    let pointer = PointerId::touch(p.id);
                    self.commit_touch_capture(cx, pointer, root);
                    let target = self.pointer_capture(pointer).unwrap_or(pressed);
                    if is_ended(p.phase) {
                        self.touches.release(p.id);
                    }
                    changed.push(Changed {
                        point: *p,
                        root,
                        target,
                    });
                }
            }
        }
        if changed.is_empty() {
            return Ok(false);
        }

        let mut prevented = false;
        if cx.page.has_listener_anywhere(ListenerFlags::TOUCH) {
            prevented = self.dispatch_touches(cx, ev, &changed);
        } else {
            tracing::trace!("no touch listeners on the page");
        }

        for c in changed.iter().filter(|c| is_ended(c.point.phase)) {
            self.release_touch_capture(cx, PointerId::touch(c.point.id), c.root);
        }
        Ok(prevented)
    }

    fn dispatch_touches(&mut self, cx: &mut Cx<'_>, ev: &TouchEvent, changed: &[Changed]) -> bool {
        let touches: Vec<TouchInfo> = ev
            .points
            .iter()
            .filter(|p| !is_ended(p.phase))
            .filter_map(|p| {
                let target = self.touches.target(p.id)?;
                let root = cx.root_point(p.position);
                Some(TouchInfo {
                    id: p.id,
                    point: point_in_frame_of(cx.page, target, root),
                    target,
                })
            })
            .collect();

        let mut prevented = false;
        for phase in [
            TouchPhase::Released,
            TouchPhase::Pressed,
            TouchPhase::Moved,
            TouchPhase::Cancelled,
        ] {
            let Some(kind) = event_kind(phase) else {
                continue;
            };
            let mut groups: SmallVec<[(NodeId, Point, Vec<TouchInfo>); 2]> = SmallVec::new();
            for c in changed.iter().filter(|c| c.point.phase == phase) {
                let info = TouchInfo {
                    id: c.point.id,
                    point: point_in_frame_of(cx.page, c.target, c.root),
                    target: c.target,
                };
                match groups.iter_mut().find(|(t, _, _)| *t == c.target) {
                    Some((_, _, infos)) => infos.push(info),
                    None => groups.push((c.target, c.root, vec![info])),
                }
            }
            for (target, root, infos) in groups {
                let Some(first) = infos.first().copied() else {
                    continue;
                };
                let mut dom = DomEvent::new(kind).at(first.point, root);
                dom.pointer_id = Some(PointerId::touch(first.id));
                dom.modifiers = ev.modifiers;
                dom.timestamp = ev.timestamp;
                dom.touches = touches.clone();
                dom.changed_touches = infos;
                prevented |= cx.dispatch(target, &mut dom);
            }
        }
        prevented
    }

    /// Activate pending capture of a touch pointer in whichever frame holds it.
    fn commit_touch_capture(&mut self, cx: &mut Cx<'_>, pointer: PointerId, root: Point) {
        let frames: SmallVec<[FrameId; 4]> = self.frames.keys().copied().collect();
        for frame in frames {
            let change = self.frame_state(frame).capture.commit(pointer);
            if change.is_empty() {
                continue;
            }
            tracing::debug!(
                ?pointer,
                lost = ?change.lost,
                got = ?change.got,
                "touch capture changed"
            );
            if let Some(lost) = change.lost {
                self.capture_event(cx, EventKind::LostPointerCapture, lost, pointer, root);
            }
            if let Some(got) = change.got {
                self.capture_event(cx, EventKind::GotPointerCapture, got, pointer, root);
            }
        }
    }

    fn release_touch_capture(&mut self, cx: &mut Cx<'_>, pointer: PointerId, root: Point) {
        let frames: SmallVec<[FrameId; 4]> = self.frames.keys().copied().collect();
        for frame in frames {
            if let Some(holder) = self.frame_state(frame).capture.clear(pointer) {
                self.capture_event(cx, EventKind::LostPointerCapture, holder, pointer, root);
            }
        }
    }

    fn capture_event(
        &self,
        cx: &mut Cx<'_>,
        kind: EventKind,
        node: NodeId,
        pointer: PointerId,
        root: Point,
    ) {
        let mut dom = DomEvent::new(kind).at(point_in_frame_of(cx.page, node, root), root);
        dom.pointer_id = Some(pointer);
        dom.timestamp = self.now;
        cx.dispatch(node, &mut dom);
    }

    /// The finger of a long-press drag moves, lifts or is taken away.
    fn touch_drag(&mut self, cx: &mut Cx<'_>, ev: &TouchEvent) -> Result<bool> {
        let Some(p) = ev.points.iter().find(|p| p.phase != TouchPhase::Stationary) else {
            return Ok(false);
        };
        let root = cx.root_point(p.position);
        match p.phase {
            TouchPhase::Moved => {
                self.drag_update(cx, root, ev.modifiers)?;
                Ok(true)
            }
            TouchPhase::Released => {
                self.touches.release(p.id);
                self.drop_at(cx, root, ev.modifiers)
            }
            TouchPhase::Cancelled => {
                self.touches.release(p.id);
                self.cancel_drag(cx)?;
                Ok(true)
            }
            TouchPhase::Pressed => {
                tracing::debug!(id = p.id, "extra finger ignored during a touch drag");
                Ok(true)
            }
            TouchPhase::Stationary => Ok(false),
        }
    }
}
