// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover state helper: diff root→leaf chains into leave/enter transitions.
//!
//! The stored chain is always a root→leaf ancestor path. Updating it to a new
//! path finds the shared prefix (the common ancestor) and emits:
//! - `Leave` for the old nodes below the common ancestor, leaf first;
//! - `Enter` for the new nodes below the common ancestor, outermost first.
//!
//! ```
//! use sluice_responder::hover::{HoverEvent, HoverState};
//!
//! let mut hover: HoverState<u32> = HoverState::new();
//! assert_eq!(hover.update_path(&[1, 2, 3]), vec![
//!     HoverEvent::Enter(1), HoverEvent::Enter(2), HoverEvent::Enter(3),
//! ]);
//! assert_eq!(hover.update_path(&[1, 4]), vec![
//!     HoverEvent::Leave(3), HoverEvent::Leave(2), HoverEvent::Enter(4),
//! ]);
//! assert_eq!(hover.leaf(), Some(4));
//! ```

use alloc::vec::Vec;

/// A hover (or active) chain.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HoverState<K: Copy + Eq> {
    current: Vec<K>,
}

/// A hover transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HoverEvent<K> {
    /// The pointer entered the node (outer→inner).
    Enter(K),
    /// The pointer left the node (inner→outer).
    Leave(K),
}

impl<K: Copy + Eq> HoverState<K> {
    /// An empty chain.
    pub fn new() -> Self {
        Self {
            current: Vec::new(),
        }
    }

    /// The current root→leaf chain.
    pub fn current_path(&self) -> &[K] {
        &self.current
    }

    /// The innermost hovered node.
    pub fn leaf(&self) -> Option<K> {
        self.current.last().copied()
    }

    /// Whether `node` is in the chain.
    pub fn contains(&self, node: K) -> bool {
        self.current.contains(&node)
    }

    /// Index of the first node shared with `new_path` that is not shared, i.e. the
    /// depth below the common ancestor.
    pub fn common_prefix_len(&self, new_path: &[K]) -> usize {
        self.current
            .iter()
            .zip(new_path)
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// Replace the chain and return the transitions.
    pub fn update_path(&mut self, new_path: &[K]) -> Vec<HoverEvent<K>> {
        let lca = self.common_prefix_len(new_path);
        let mut out = Vec::with_capacity(self.current.len() - lca + new_path.len() - lca);
        out.extend(self.current[lca..].iter().rev().map(|&k| HoverEvent::Leave(k)));
        out.extend(new_path[lca..].iter().map(|&k| HoverEvent::Enter(k)));
        self.current.clear();
        self.current.extend_from_slice(new_path);
        out
    }

    /// Clear the chain, returning leave transitions leaf first.
    pub fn clear(&mut self) -> Vec<HoverEvent<K>> {
        self.update_path(&[])
    }

    /// Cut the chain at the first node for which `alive` is false.
    ///
    /// Descendants of a removed node are gone too, so the remaining prefix is
    /// still a valid ancestor path. Returns the dropped nodes, leaf first; no
    /// events are generated for them since they can't receive any.
    pub fn truncate_dead(&mut self, mut alive: impl FnMut(K) -> bool) -> Vec<K> {
        let Some(cut) = self.current.iter().position(|&k| !alive(k)) else {
            return Vec::new();
        };
        let mut dropped: Vec<K> = self.current.drain(cut..).collect();
        dropped.reverse();
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    /// Rebuild a chain purely from transitions, as a consumer would.
    fn replay(chain: &mut Vec<u32>, events: &[HoverEvent<u32>]) {
        for e in events {
            match *e {
                HoverEvent::Leave(k) => {
                    assert_eq!(chain.pop(), Some(k), "leave must remove the current leaf");
                }
                HoverEvent::Enter(k) => chain.push(k),
            }
        }
    }

    #[test]
    fn incremental_chain_matches_rebuild() {
        let paths: [&[u32]; 7] = [
            &[1, 2, 3],
            &[1, 2, 4, 5],
            &[1, 6],
            &[],
            &[7, 8],
            &[1, 2, 3],
            &[1, 2, 3],
        ];
        let mut state = HoverState::new();
        let mut replayed = Vec::new();
        for p in paths {
            let events = state.update_path(p);
            replay(&mut replayed, &events);
            assert_eq!(replayed.as_slice(), p);
            assert_eq!(state.current_path(), p);
        }
    }

    #[test]
    fn leaves_precede_enters() {
        let mut state = HoverState::new();
        state.update_path(&[1, 2, 3]);
        let ev = state.update_path(&[1, 4, 5]);
        assert_eq!(
            ev,
            vec![
                HoverEvent::Leave(3),
                HoverEvent::Leave(2),
                HoverEvent::Enter(4),
                HoverEvent::Enter(5),
            ]
        );
    }

    #[test]
    fn same_path_has_no_transitions() {
        let mut state = HoverState::new();
        state.update_path(&[1, 2]);
        assert!(state.update_path(&[1, 2]).is_empty());
    }

    #[test]
    fn truncate_dead_keeps_live_prefix() {
        let mut state = HoverState::new();
        state.update_path(&[1, 2, 3, 4]);
        let dropped = state.truncate_dead(|k| k != 3);
        assert_eq!(dropped, vec![4, 3]);
        assert_eq!(state.current_path(), &[1, 2]);
        assert_eq!(state.clear(), vec![HoverEvent::Leave(2), HoverEvent::Leave(1)]);
    }
}
