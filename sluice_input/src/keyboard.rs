// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard routing and key default actions.
//!
//! Keys go to the focused node, or to the focused frame's document when
//! nothing is focused. A `keydown` that is not canceled and produces text
//! without a command modifier is followed by `keypress` at whatever is focused
//! by then. Defaults: Escape cancels a drag, Tab and Shift+Tab move focus in
//! document order, Enter activates a focused link or clickable element.

use sluice_responder::adapters::page::navigation::{next_filtered, prev_filtered};
use sluice_tree::{ElementKind, FrameId, NodeFlags, NodeId, Page};

use crate::dom_event::{DomEvent, EventKind};
use crate::error::{InputError, Result};
use crate::event::{Key, KeyEvent, KeyState, Modifiers, NamedKey, PointerButton};
use crate::handler::{Cx, EventHandler};

fn key_event(kind: EventKind, ev: &KeyEvent) -> DomEvent {
    let mut dom = DomEvent::new(kind);
    dom.key = Some(ev.key.clone());
    dom.modifiers = ev.modifiers;
    dom.timestamp = ev.timestamp;
    dom
}

fn is_command(modifiers: Modifiers) -> bool {
    modifiers.intersects(Modifiers::CONTROL | Modifiers::META | Modifiers::ALT)
}

fn activates_on_enter(page: &Page, node: NodeId) -> bool {
    !page.is_editable(node)
        && (page.element_kind(node) == Some(ElementKind::Link)
            || page.flags(node).contains(NodeFlags::CLICKABLE))
}

impl EventHandler {
    fn key_frame(&self, page: &Page) -> FrameId {
        self.focused_frame
            .filter(|f| page.is_frame_attached(*f))
            .unwrap_or_else(|| page.main_frame())
    }

    fn key_target(&self, page: &Page, frame: FrameId) -> Result<NodeId> {
        self.focus
            .focused()
            .filter(|n| page.is_alive(*n))
            .or_else(|| page.document(frame))
            .ok_or(InputError::NoTarget)
    }

    pub(crate) fn key(&mut self, cx: &mut Cx<'_>, ev: &KeyEvent) -> Result<bool> {
        let frame = self.key_frame(cx.page);
        let target = self.key_target(cx.page, frame)?;
        match ev.state {
            KeyState::Down => self.key_down(cx, ev, frame, target),
            KeyState::Up => {
                let mut dom = key_event(EventKind::KeyUp, ev);
                Ok(cx.dispatch(target, &mut dom))
            }
        }
    }

    fn key_down(
        &mut self,
        cx: &mut Cx<'_>,
        ev: &KeyEvent,
        frame: FrameId,
        target: NodeId,
    ) -> Result<bool> {
        let mut dom = key_event(EventKind::KeyDown, ev);
        if cx.dispatch(target, &mut dom) {
            tracing::debug!(key = ?ev.key, "keydown canceled");
            return Ok(true);
        }
        cx.ensure_frame(frame)?;

        if ev.text().is_some() && !is_command(ev.modifiers) {
            // The keydown listener may have moved focus.
            let target = self.key_target(cx.page, frame)?;
            let mut press = key_event(EventKind::KeyPress, ev);
            if cx.dispatch(target, &mut press) {
                tracing::debug!(key = ?ev.key, "keypress canceled");
                return Ok(true);
            }
            cx.ensure_frame(frame)?;
        }
        self.key_default(cx, ev, frame)
    }

    fn key_default(&mut self, cx: &mut Cx<'_>, ev: &KeyEvent, frame: FrameId) -> Result<bool> {
        match &ev.key {
            Key::Named(NamedKey::Escape) if self.drag.is_some() => {
                self.cancel_drag(cx)?;
                Ok(true)
            }
            Key::Named(NamedKey::Tab) if !is_command(ev.modifiers) => {
                let current = self.focus.focused().filter(|n| cx.page.frame_of(*n) == Some(frame));
                let focusable = |page: &Page, n: NodeId| page.is_focusable(n);
                let next = if ev.modifiers.contains(Modifiers::SHIFT) {
                    prev_filtered(cx.page, frame, current, focusable)
                } else {
                    next_filtered(cx.page, frame, current, focusable)
                };
                let Some(next) = next else {
                    return Ok(false);
                };
                tracing::debug!(?next, "sequential focus navigation");
                self.set_focus(cx, Some(next), frame)?;
                Ok(true)
            }
            Key::Named(NamedKey::Enter) => {
                let Some(node) = self
                    .focus
                    .focused()
                    .filter(|n| cx.page.is_alive(*n) && activates_on_enter(cx.page, *n))
                else {
                    return Ok(false);
                };
                let mut click = DomEvent::new(EventKind::Click);
                click.button = Some(PointerButton::Primary);
                click.click_count = 1;
                click.modifiers = ev.modifiers;
                click.timestamp = ev.timestamp;
                cx.dispatch(node, &mut click);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
