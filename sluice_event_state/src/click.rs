// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click state: remember what a press hit so the release can decide on a click.
//!
//! Click counts come from the platform and are not recomputed here. The state
//! machine only answers whether a release completes a click:
//!
//! - there must be a recorded press for the pointer;
//! - neither the press nor the release may have been swallowed (default prevented);
//! - the platform click count must be positive;
//! - the press target must not have been invalidated in between (for example removed).
//!
//! Choosing the click *target* (the common ancestor of press and release
//! targets) is left to the caller, which owns the tree.
//!
//! ```
//! use kurbo::Point;
//! use sluice_event_state::click::{ClickResult, ClickState, Press};
//!
//! let mut clicks: ClickState<u64, u32> = ClickState::new();
//! clicks.on_down(1, Press::new(42, Point::new(10.0, 20.0), 1, 1000));
//! match clicks.on_up(1, false) {
//!     ClickResult::Click(press) => assert_eq!(press.target, 42),
//!     other => panic!("expected a click, got {other:?}"),
//! }
//! ```

use kurbo::Point;
use smallvec::SmallVec;

/// What a press recorded.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Press<K> {
    /// Node hit by the press.
    pub target: K,
    /// Press position in the coordinates of the frame that handled it.
    pub position: Point,
    /// Platform click count (1 single, 2 double, ...).
    pub click_count: u8,
    /// Press timestamp.
    pub time: u64,
    /// The press was default-prevented.
    pub swallowed: bool,
}

impl<K> Press<K> {
    /// A fresh, unswallowed press.
    pub fn new(target: K, position: Point, click_count: u8, time: u64) -> Self {
        Self {
            target,
            position,
            click_count,
            time,
            swallowed: false,
        }
    }
}

/// Why a release did not produce a click.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Suppressed {
    /// No press was recorded for this pointer.
    NoPress,
    /// The press or the release was swallowed.
    Swallowed,
    /// The platform reported a zero click count.
    ZeroCount,
    /// The press target was invalidated.
    Invalidated,
}

/// Result of a release.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ClickResult<K> {
    /// The release completes a click of the recorded press.
    Click(Press<K>),
    /// No click.
    Suppressed(Suppressed),
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Entry<P, K> {
    pointer: P,
    press: Press<K>,
    invalidated: bool,
}

/// Per-pointer press tracking.
#[derive(Clone, Debug)]
pub struct ClickState<P: Copy + Eq, K: Copy + Eq> {
    entries: SmallVec<[Entry<P, K>; 2]>,
}

impl<P: Copy + Eq, K: Copy + Eq> Default for ClickState<P, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Copy + Eq, K: Copy + Eq> ClickState<P, K> {
    /// No presses.
    pub fn new() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }

    /// Record a press, replacing any earlier press of the same pointer.
    pub fn on_down(&mut self, pointer: P, press: Press<K>) {
        self.entries.retain(|e| e.pointer != pointer);
        self.entries.push(Entry {
            pointer,
            press,
            invalidated: false,
        });
    }

    /// The recorded press of a pointer.
    pub fn press(&self, pointer: P) -> Option<&Press<K>> {
        self.entries
            .iter()
            .find(|e| e.pointer == pointer && !e.invalidated)
            .map(|e| &e.press)
    }

    /// Mark the pointer's press as swallowed.
    pub fn swallow(&mut self, pointer: P) {
        if let Some(e) = self.entries.iter_mut().find(|e| e.pointer == pointer) {
            e.press.swallowed = true;
        }
    }

    /// Invalidate every press whose target matches `pred`.
    pub fn invalidate(&mut self, mut pred: impl FnMut(K) -> bool) {
        for e in &mut self.entries {
            if pred(e.press.target) {
                e.invalidated = true;
            }
        }
    }

    /// Release the pointer and decide whether that completes a click.
    pub fn on_up(&mut self, pointer: P, release_swallowed: bool) -> ClickResult<K> {
        let Some(pos) = self.entries.iter().position(|e| e.pointer == pointer) else {
            return ClickResult::Suppressed(Suppressed::NoPress);
        };
        let entry = self.entries.remove(pos);
        if entry.invalidated {
            ClickResult::Suppressed(Suppressed::Invalidated)
        } else if entry.press.swallowed || release_swallowed {
            ClickResult::Suppressed(Suppressed::Swallowed)
        } else if entry.press.click_count == 0 {
            ClickResult::Suppressed(Suppressed::ZeroCount)
        } else {
            ClickResult::Click(entry.press)
        }
    }

    /// Forget a pointer without deciding anything (cancel).
    pub fn cancel(&mut self, pointer: P) {
        self.entries.retain(|e| e.pointer != pointer);
    }

    /// Forget every pointer.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(target: u32, count: u8) -> Press<u32> {
        Press::new(target, Point::new(1.0, 1.0), count, 0)
    }

    #[test]
    fn click_requires_neither_side_swallowed() {
        for (down_swallowed, up_swallowed) in
            [(false, false), (true, false), (false, true), (true, true)]
        {
            let mut s: ClickState<u8, u32> = ClickState::new();
            s.on_down(0, press(7, 1));
            if down_swallowed {
                s.swallow(0);
            }
            let clicked = matches!(s.on_up(0, up_swallowed), ClickResult::Click(_));
            assert_eq!(clicked, !down_swallowed && !up_swallowed);
        }
    }

    #[test]
    fn zero_click_count_suppresses() {
        let mut s: ClickState<u8, u32> = ClickState::new();
        s.on_down(0, press(7, 0));
        assert_eq!(s.on_up(0, false), ClickResult::Suppressed(Suppressed::ZeroCount));
    }

    #[test]
    fn invalidated_target_suppresses() {
        let mut s: ClickState<u8, u32> = ClickState::new();
        s.on_down(0, press(7, 1));
        s.invalidate(|k| k == 7);
        assert!(s.press(0).is_none());
        assert_eq!(s.on_up(0, false), ClickResult::Suppressed(Suppressed::Invalidated));
    }

    #[test]
    fn release_consumes_the_press() {
        let mut s: ClickState<u8, u32> = ClickState::new();
        s.on_down(0, press(7, 2));
        assert!(matches!(s.on_up(0, false), ClickResult::Click(p) if p.click_count == 2));
        assert_eq!(s.on_up(0, false), ClickResult::Suppressed(Suppressed::NoPress));
    }

    #[test]
    fn pointers_are_independent() {
        let mut s: ClickState<u8, u32> = ClickState::new();
        s.on_down(0, press(1, 1));
        s.on_down(1, press(2, 1));
        s.cancel(0);
        assert_eq!(s.on_up(0, false), ClickResult::Suppressed(Suppressed::NoPress));
        assert!(matches!(s.on_up(1, false), ClickResult::Click(p) if p.target == 2));
    }
}
