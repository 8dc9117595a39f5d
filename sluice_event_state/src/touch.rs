// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch target map: the node a touch point hit when it went down.
//!
//! Touch targets are fixed at press. Moves look the target up instead of hit
//! testing again, and the entry is removed exactly once, on release or cancel.

use alloc::vec::Vec;

use smallvec::SmallVec;

/// Mapping from touch id to the node it pressed.
#[derive(Clone, Debug)]
pub struct TouchTargets<K: Copy + Eq> {
    entries: SmallVec<[(u64, K); 4]>,
}

impl<K: Copy + Eq> Default for TouchTargets<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq> TouchTargets<K> {
    /// Empty map.
    pub fn new() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }

    /// Record a press. Returns `false` (and keeps the original target) if the id is
    /// already down.
    pub fn press(&mut self, id: u64, target: K) -> bool {
        if self.entries.iter().any(|(i, _)| *i == id) {
            return false;
        }
        self.entries.push((id, target));
        true
    }

    /// Target of a touch that is down.
    pub fn target(&self, id: u64) -> Option<K> {
        self.entries
            .iter()
            .find(|(i, _)| *i == id)
            .map(|(_, k)| *k)
    }

    /// Remove and return the target of a touch that is released or cancelled.
    pub fn release(&mut self, id: u64) -> Option<K> {
        let pos = self.entries.iter().position(|(i, _)| *i == id)?;
        Some(self.entries.remove(pos).1)
    }

    /// Remove every entry, returning them in press order.
    pub fn drain(&mut self) -> Vec<(u64, K)> {
        self.entries.drain(..).collect()
    }

    /// Number of touches down.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no touch is down.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_removed_exactly_once() {
        let mut t: TouchTargets<u32> = TouchTargets::new();
        assert!(t.press(1, 10));
        assert_eq!(t.target(1), Some(10));
        assert_eq!(t.release(1), Some(10));
        assert_eq!(t.release(1), None);
        assert!(t.is_empty());
    }

    #[test]
    fn duplicate_press_keeps_original_target() {
        let mut t: TouchTargets<u32> = TouchTargets::new();
        assert!(t.press(1, 10));
        assert!(!t.press(1, 11));
        assert_eq!(t.len(), 1);
        assert_eq!(t.target(1), Some(10));
    }

    #[test]
    fn drain_empties_in_press_order() {
        let mut t: TouchTargets<u32> = TouchTargets::new();
        t.press(2, 20);
        t.press(1, 10);
        assert_eq!(t.drain(), alloc::vec![(2, 20), (1, 10)]);
        assert!(t.is_empty());
    }
}
