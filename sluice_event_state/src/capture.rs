// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer capture with a pending → active handoff.
//!
//! Capture requests made while an event is being dispatched don't take effect
//! immediately. They are recorded as *pending* and committed the next time the
//! input core processes an event for that pointer, which is when
//! `lostpointercapture` (old target) and then `gotpointercapture` (new target)
//! are delivered.
//!
//! ```
//! use sluice_event_state::capture::{CaptureChange, CaptureMap};
//!
//! let mut capture: CaptureMap<u64, u32> = CaptureMap::new();
//! capture.set(1, 10);
//! assert_eq!(capture.target(1), None);
//! assert_eq!(capture.commit(1), CaptureChange { lost: None, got: Some(10) });
//! assert_eq!(capture.target(1), Some(10));
//!
//! capture.set(1, 20);
//! assert_eq!(capture.commit(1), CaptureChange { lost: Some(10), got: Some(20) });
//! ```

use smallvec::SmallVec;

/// Transitions produced by committing pending capture.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CaptureChange<K> {
    /// Node that lost capture; gets `lostpointercapture` first.
    pub lost: Option<K>,
    /// Node that gained capture; gets `gotpointercapture` second.
    pub got: Option<K>,
}

impl<K> Default for CaptureChange<K> {
    fn default() -> Self {
        Self {
            lost: None,
            got: None,
        }
    }
}

impl<K> CaptureChange<K> {
    /// Whether nothing changed.
    pub fn is_empty(&self) -> bool {
        self.lost.is_none() && self.got.is_none()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Slot<P, K> {
    pointer: P,
    active: Option<K>,
    pending: Option<K>,
}

/// Capture targets per pointer.
#[derive(Clone, Debug)]
pub struct CaptureMap<P: Copy + Eq, K: Copy + Eq> {
    slots: SmallVec<[Slot<P, K>; 2]>,
}

impl<P: Copy + Eq, K: Copy + Eq> Default for CaptureMap<P, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Copy + Eq, K: Copy + Eq> CaptureMap<P, K> {
    /// No captures.
    pub fn new() -> Self {
        Self {
            slots: SmallVec::new(),
        }
    }

    fn slot_mut(&mut self, pointer: P) -> &mut Slot<P, K> {
        if let Some(i) = self.slots.iter().position(|s| s.pointer == pointer) {
            &mut self.slots[i]
        } else {
            self.slots.push(Slot {
                pointer,
                active: None,
                pending: None,
            });
            let last = self.slots.len() - 1;
            &mut self.slots[last]
        }
    }

    /// Request capture of `pointer` by `node`; takes effect on [`CaptureMap::commit`].
    pub fn set(&mut self, pointer: P, node: K) {
        self.slot_mut(pointer).pending = Some(node);
    }

    /// Capture immediately, as implicit capture on press does.
    ///
    /// Returns the change so the caller can deliver capture events right away.
    pub fn set_now(&mut self, pointer: P, node: K) -> CaptureChange<K> {
        self.set(pointer, node);
        self.commit(pointer)
    }

    /// Request release of `pointer`'s capture if `node` holds or requested it.
    pub fn release(&mut self, pointer: P, node: K) -> bool {
        let Some(slot) = self.slots.iter_mut().find(|s| s.pointer == pointer) else {
            return false;
        };
        let holds = slot.pending.or(slot.active) == Some(node);
        if holds {
            slot.pending = None;
        }
        holds
    }

    /// Active capture target of a pointer.
    pub fn target(&self, pointer: P) -> Option<K> {
        self.slots
            .iter()
            .find(|s| s.pointer == pointer)
            .and_then(|s| s.active)
    }

    /// Pending capture target of a pointer (what the next commit will install).
    pub fn pending(&self, pointer: P) -> Option<K> {
        self.slots
            .iter()
            .find(|s| s.pointer == pointer)
            .and_then(|s| s.pending)
    }

    /// Commit pending capture for `pointer`.
    pub fn commit(&mut self, pointer: P) -> CaptureChange<K> {
        let Some(i) = self.slots.iter().position(|s| s.pointer == pointer) else {
            return CaptureChange::default();
        };
        let slot = &mut self.slots[i];
        if slot.pending == slot.active {
            return CaptureChange::default();
        }
        let change = CaptureChange {
            lost: slot.active,
            got: slot.pending,
        };
        slot.active = slot.pending;
        if slot.active.is_none() {
            self.slots.remove(i);
        }
        change
    }

    /// Drop all capture state of `pointer` (release or cancel). Returns the node
    /// that held capture, which gets `lostpointercapture`.
    pub fn clear(&mut self, pointer: P) -> Option<K> {
        let i = self.slots.iter().position(|s| s.pointer == pointer)?;
        self.slots.remove(i).active
    }

    /// Forget every capture held or requested by nodes matching `dead`.
    pub fn forget(&mut self, mut dead: impl FnMut(K) -> bool) {
        for slot in &mut self.slots {
            if slot.active.is_some_and(&mut dead) {
                slot.active = None;
            }
            if slot.pending.is_some_and(&mut dead) {
                slot.pending = None;
            }
        }
        self.slots
            .retain(|s| s.active.is_some() || s.pending.is_some());
    }

    /// Whether any pointer is captured or has a pending capture.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_takes_effect_on_commit() {
        let mut c: CaptureMap<u8, u32> = CaptureMap::new();
        c.set_now(0, 5);
        assert!(!c.release(0, 6));
        assert!(c.release(0, 5));
        assert_eq!(c.target(0), Some(5));
        assert_eq!(c.commit(0), CaptureChange { lost: Some(5), got: None });
        assert_eq!(c.target(0), None);
        assert!(c.is_empty());
    }

    #[test]
    fn keys_need_not_have_a_default() {
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        struct Key(u32);

        let mut c: CaptureMap<u8, Key> = CaptureMap::new();
        assert!(c.commit(0).is_empty(), "unknown pointer");
        c.set(0, Key(1));
        assert_eq!(c.commit(0), CaptureChange { lost: None, got: Some(Key(1)) });
        assert_eq!(c.commit(0), CaptureChange::default());
    }

    #[test]
    fn repeated_commit_is_quiet() {
        let mut c: CaptureMap<u8, u32> = CaptureMap::new();
        c.set(0, 5);
        assert!(!c.commit(0).is_empty());
        assert!(c.commit(0).is_empty());
    }

    #[test]
    fn forget_drops_dead_nodes() {
        let mut c: CaptureMap<u8, u32> = CaptureMap::new();
        c.set_now(0, 5);
        c.set(1, 6);
        c.forget(|k| k == 5 || k == 6);
        assert_eq!(c.target(0), None);
        assert_eq!(c.pending(1), None);
        assert!(c.is_empty());
    }

    #[test]
    fn clear_reports_holder() {
        let mut c: CaptureMap<u8, u32> = CaptureMap::new();
        c.set_now(3, 9);
        assert_eq!(c.clear(3), Some(9));
        assert_eq!(c.clear(3), None);
    }
}
