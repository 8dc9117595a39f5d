// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A closure-backed [`EventSink`].
//!
//! [`ListenerRegistry`] keeps listeners per (node, event kind) and runs them
//! through the capture → target → bubble sequence of the target's frame. It
//! also keeps the page's listener presence bits current, which the hover
//! resolver uses to skip boundary events nobody listens to.
//!
//! ```
//! use kurbo::{Rect, Size};
//! use sluice_input::{DomEvent, EventKind, EventSink, ListenerRegistry};
//! use sluice_responder::types::Outcome;
//! use sluice_tree::{NodeDesc, Page};
//!
//! let mut page = Page::new(Size::new(100.0, 100.0));
//! let doc = page.document(page.main_frame()).unwrap();
//! let button = page.insert(doc, NodeDesc::element(Rect::new(0.0, 0.0, 10.0, 10.0))).unwrap();
//!
//! let mut listeners = ListenerRegistry::new();
//! listeners.add(&mut page, doc, EventKind::Click, false, |_, ev, _| {
//!     ev.prevent_default();
//!     Outcome::Continue
//! });
//!
//! let mut ev = DomEvent::new(EventKind::Click);
//! listeners.dispatch_event(&mut page, button, &mut ev);
//! assert!(ev.default_prevented());
//! ```

use core::fmt;

use hashbrown::HashMap;
use sluice_responder::adapters::page::dispatch_for;
use sluice_responder::dispatcher;
use sluice_responder::types::{Outcome, Phase};
use sluice_tree::{ListenerFlags, NodeId, Page};

use crate::dom_event::{DomEvent, EventKind};
use crate::host::EventSink;

/// Listener callback: page, event, current node.
pub type Listener = Box<dyn FnMut(&mut Page, &mut DomEvent, NodeId) -> Outcome>;

/// Handle for removing a listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Entry {
    id: ListenerId,
    capture: bool,
    callback: Listener,
}

/// Listeners keyed by node and event kind.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: HashMap<(NodeId, EventKind), Vec<Entry>>,
    next_id: u64,
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("keys", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

/// Presence bit a listener contributes.
fn presence(kind: EventKind, capture: bool) -> ListenerFlags {
    match (kind, capture) {
        (EventKind::MouseEnter, false) => ListenerFlags::ENTER,
        (EventKind::MouseEnter, true) => ListenerFlags::CAPTURE_ENTER,
        (EventKind::MouseLeave, false) => ListenerFlags::LEAVE,
        (EventKind::MouseLeave, true) => ListenerFlags::CAPTURE_LEAVE,
        (EventKind::MouseOver, _) => ListenerFlags::OVER,
        (EventKind::MouseOut, _) => ListenerFlags::OUT,
        (
            EventKind::TouchStart
            | EventKind::TouchMove
            | EventKind::TouchEnd
            | EventKind::TouchCancel,
            _,
        ) => ListenerFlags::TOUCH,
        (EventKind::Wheel, _) => ListenerFlags::WHEEL,
        _ => ListenerFlags::empty(),
    }
}

impl ListenerRegistry {
    /// No listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Capturing listeners run in the capture phase, the
    /// others in the bubble phase; both run at the target.
    pub fn add(
        &mut self,
        page: &mut Page,
        node: NodeId,
        kind: EventKind,
        capture: bool,
        callback: impl FnMut(&mut Page, &mut DomEvent, NodeId) -> Outcome + 'static,
    ) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.entry((node, kind)).or_default().push(Entry {
            id,
            capture,
            callback: Box::new(callback),
        });
        let bits = presence(kind, capture);
        if !bits.is_empty() {
            page.set_listeners(node, page.listeners(node) | bits);
        }
        id
    }

    /// Remove a listener. Returns whether it existed.
    pub fn remove(&mut self, page: &mut Page, id: ListenerId) -> bool {
        let mut owner = None;
        for ((node, _), entries) in &mut self.listeners {
            let before = entries.len();
            entries.retain(|e| e.id != id);
            if entries.len() != before {
                owner = Some(*node);
                break;
            }
        }
        self.listeners.retain(|_, v| !v.is_empty());
        let Some(node) = owner else {
            return false;
        };
        page.set_listeners(node, self.presence_of(node));
        true
    }

    /// Drop every listener of a node.
    pub fn clear_node(&mut self, page: &mut Page, node: NodeId) {
        self.listeners.retain(|(n, _), _| *n != node);
        page.set_listeners(node, ListenerFlags::empty());
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    fn presence_of(&self, node: NodeId) -> ListenerFlags {
        self.listeners
            .iter()
            .filter(|((n, _), _)| *n == node)
            .flat_map(|((_, kind), entries)| entries.iter().map(|e| presence(*kind, e.capture)))
            .fold(ListenerFlags::empty(), |acc, bits| acc | bits)
    }
}

impl EventSink for ListenerRegistry {
    fn dispatch_event(&mut self, page: &mut Page, target: NodeId, event: &mut DomEvent) {
        let kind = event.kind;
        let seq = dispatch_for(page, target, kind.bubbles());
        let listeners = &mut self.listeners;
        let consumed = dispatcher::run(&seq, event, |d, ev| {
            if !page.is_alive(d.node) {
                return Outcome::Continue;
            }
            let Some(entries) = listeners.get_mut(&(d.node, kind)) else {
                return Outcome::Continue;
            };
            let mut outcome = Outcome::Continue;
            for entry in entries.iter_mut() {
                let runs = match d.phase {
                    Phase::Capture => entry.capture,
                    Phase::Target => true,
                    Phase::Bubble => !entry.capture,
                };
                if !runs {
                    continue;
                }
                // Remaining listeners on the same node still run after a stop.
                match (entry.callback)(page, ev, d.node) {
                    Outcome::Continue => {}
                    Outcome::Stop if outcome == Outcome::Continue => outcome = Outcome::Stop,
                    Outcome::Stop => {}
                    Outcome::StopAndConsume => outcome = Outcome::StopAndConsume,
                }
            }
            outcome
        });
        if consumed {
            event.prevent_default();
        }
    }
}
