// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for propagation: phases, handler outcomes, dispatch entries, and parent lookup.

use alloc::vec::Vec;

/// Propagation phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Root → target, excluding the target.
    Capture,
    /// At the target.
    Target,
    /// Target → root, excluding the target.
    Bubble,
}

/// Handler outcome controlling propagation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Outcome {
    /// Keep going.
    #[default]
    Continue,
    /// `stopPropagation`: finish nothing further.
    Stop,
    /// Stop and report the event as consumed.
    StopAndConsume,
}

/// One step of a propagation sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dispatch<K> {
    /// Phase of this step.
    pub phase: Phase,
    /// Node whose listeners run at this step.
    pub node: K,
}

impl<K> Dispatch<K> {
    /// A capture-phase step.
    pub fn capture(node: K) -> Self {
        Self {
            phase: Phase::Capture,
            node,
        }
    }

    /// The target step.
    pub fn target(node: K) -> Self {
        Self {
            phase: Phase::Target,
            node,
        }
    }

    /// A bubble-phase step.
    pub fn bubble(node: K) -> Self {
        Self {
            phase: Phase::Bubble,
            node,
        }
    }
}

/// Parent lookup used to reconstruct root→target paths.
pub trait ParentLookup<K> {
    /// Parent of `node`, or `None` at the root.
    fn parent_of(&self, node: &K) -> Option<K>;
}

/// Build the root→`node` path by repeatedly asking `lookup` for parents.
///
/// Stops after `limit` steps so a cyclic lookup can't spin forever.
pub fn path_to_root<K: Copy + Eq>(lookup: &impl ParentLookup<K>, node: K, limit: usize) -> Vec<K> {
    let mut path = alloc::vec![node];
    let mut cur = node;
    while path.len() < limit {
        match lookup.parent_of(&cur) {
            Some(p) if p != cur => {
                path.push(p);
                cur = p;
            }
            _ => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Chain;

    impl ParentLookup<u32> for Chain {
        fn parent_of(&self, node: &u32) -> Option<u32> {
            (*node > 1).then(|| node - 1)
        }
    }

    #[test]
    fn path_is_root_first() {
        assert_eq!(path_to_root(&Chain, 4, 64), alloc::vec![1, 2, 3, 4]);
    }

    #[test]
    fn limit_bounds_the_walk() {
        assert_eq!(path_to_root(&Chain, 10, 3), alloc::vec![8, 9, 10]);
    }
}
