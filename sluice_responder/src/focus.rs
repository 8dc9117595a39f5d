// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus state helper: track the focused node and its focus-within path.
//!
//! ## Usage
//! 1) Decide when focus changes (press on a focusable node, Tab navigation).
//! 2) Build the root→node path for the new focus (see
//!    [`Page::cross_frame_path`](sluice_tree::Page::cross_frame_path) with the `page_adapter` feature).
//! 3) Call [`FocusState::focus_path`] and act on the returned [`FocusChange`]:
//!    blur the old leaf, update focus-within on `left`/`entered`, then focus the new leaf.
//!
//! ```
//! use sluice_responder::focus::FocusState;
//!
//! let mut f: FocusState<u32> = FocusState::new();
//! let change = f.focus_path(&[1, 2]);
//! assert_eq!(change.blurred, None);
//! assert_eq!(change.focused, Some(2));
//!
//! let change = f.focus_path(&[1, 3]);
//! assert_eq!(change.blurred, Some(2));
//! assert_eq!(change.left, vec![2]);
//! assert_eq!(change.entered, vec![3]);
//! ```

use alloc::vec::Vec;

/// Result of moving focus.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FocusChange<K> {
    /// Previously focused node, if focus actually moved away from it.
    pub blurred: Option<K>,
    /// Newly focused node, if focus moved to it.
    pub focused: Option<K>,
    /// Nodes that are no longer on the focus path, inner→outer.
    pub left: Vec<K>,
    /// Nodes newly on the focus path, outer→inner.
    pub entered: Vec<K>,
}

impl<K> FocusChange<K> {
    /// Whether nothing changed.
    pub fn is_empty(&self) -> bool {
        self.blurred.is_none() && self.focused.is_none()
    }
}

/// Focus tracker over root→node paths.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FocusState<K: Copy + Eq> {
    path: Vec<K>,
}

impl<K: Copy + Eq> FocusState<K> {
    /// No focus.
    pub fn new() -> Self {
        Self { path: Vec::new() }
    }

    /// The focused node.
    pub fn focused(&self) -> Option<K> {
        self.path.last().copied()
    }

    /// Root→focused path.
    pub fn current_path(&self) -> &[K] {
        &self.path
    }

    /// Move focus to the last node of `new_path` (or clear it when empty).
    pub fn focus_path(&mut self, new_path: &[K]) -> FocusChange<K> {
        if self.path.as_slice() == new_path {
            return FocusChange {
                blurred: None,
                focused: None,
                left: Vec::new(),
                entered: Vec::new(),
            };
        }
        let lca = self
            .path
            .iter()
            .zip(new_path)
            .take_while(|(a, b)| a == b)
            .count();
        let change = FocusChange {
            blurred: self.focused(),
            focused: new_path.last().copied(),
            left: self.path[lca..].iter().rev().copied().collect(),
            entered: new_path[lca..].to_vec(),
        };
        self.path.clear();
        self.path.extend_from_slice(new_path);
        change
    }

    /// Clear focus.
    pub fn clear(&mut self) -> FocusChange<K> {
        self.focus_path(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn refocusing_same_node_is_a_no_op() {
        let mut f: FocusState<u32> = FocusState::new();
        f.focus_path(&[1, 2]);
        assert!(f.focus_path(&[1, 2]).is_empty());
    }

    #[test]
    fn focusing_an_ancestor_blurs_the_descendant() {
        let mut f: FocusState<u32> = FocusState::new();
        f.focus_path(&[1, 2, 3]);
        let change = f.focus_path(&[1, 2]);
        assert_eq!(change.blurred, Some(3));
        assert_eq!(change.focused, Some(2));
        assert_eq!(change.left, vec![3]);
        assert!(change.entered.is_empty());
    }

    #[test]
    fn clear_leaves_whole_path() {
        let mut f: FocusState<u32> = FocusState::new();
        f.focus_path(&[1, 2]);
        let change = f.clear();
        assert_eq!(change.blurred, Some(2));
        assert_eq!(change.focused, None);
        assert_eq!(change.left, vec![2, 1]);
        assert_eq!(f.focused(), None);
    }
}
