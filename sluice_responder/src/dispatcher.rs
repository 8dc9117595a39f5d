// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher helpers: build a capture → target → bubble sequence and walk it.
//!
//! - [`sequence`] turns a root→target path into the ordered steps.
//! - [`run`] calls a handler per step and applies propagation rules:
//!   - [`Outcome::Stop`] aborts propagation immediately (no target/bubble if raised in capture).
//!   - [`Outcome::StopAndConsume`] aborts propagation and returns `true`.
//!   - Otherwise returns `false`.
//!
//! ## Minimal example
//!
//! ```
//! use sluice_responder::dispatcher;
//! use sluice_responder::types::{Outcome, Phase};
//!
//! let seq = dispatcher::sequence(&[1_u32, 2], true);
//! let mut handled: Vec<(Phase, u32)> = Vec::new();
//! let consumed = dispatcher::run(&seq, &mut (), |d, _| {
//!     handled.push((d.phase, d.node));
//!     Outcome::Continue
//! });
//!
//! assert!(!consumed);
//! assert_eq!(handled, vec![
//!     (Phase::Capture, 1),
//!     (Phase::Target, 2),
//!     (Phase::Bubble, 1),
//! ]);
//! ```

use alloc::vec::Vec;

use crate::types::{Dispatch, Outcome};

/// Build the propagation sequence for a root→target `path`.
///
/// Events that don't bubble get capture and target steps only.
pub fn sequence<K: Copy>(path: &[K], bubbles: bool) -> Vec<Dispatch<K>> {
    let Some((&target, ancestors)) = path.split_last() else {
        return Vec::new();
    };
    let mut seq = Vec::with_capacity(path.len() * 2);
    seq.extend(ancestors.iter().map(|&n| Dispatch::capture(n)));
    seq.push(Dispatch::target(target));
    if bubbles {
        seq.extend(ancestors.iter().rev().map(|&n| Dispatch::bubble(n)));
    }
    seq
}

/// Run a handler over a dispatch sequence and honor stop/consume outcomes.
///
/// - `event`: a mutable payload carried across handler calls; you own its shape.
/// - Default prevention: keep a flag on your event and set it in `handler`; check it after `run`.
///
/// ### stop propagation in capture (no target/bubble)
///
/// ```
/// use sluice_responder::dispatcher::{run, sequence};
/// use sluice_responder::types::{Outcome, Phase};
///
/// let seq = sequence(&[1_u32, 2], true);
/// let mut seen: Vec<(Phase, u32)> = Vec::new();
/// let consumed = run(&seq, &mut (), |d, _| {
///     seen.push((d.phase, d.node));
///     if d.phase == Phase::Capture { Outcome::Stop } else { Outcome::Continue }
/// });
///
/// assert!(!consumed);
/// assert_eq!(seen, vec![(Phase::Capture, 1)]);
/// ```
pub fn run<K, E>(
    seq: &[Dispatch<K>],
    event: &mut E,
    mut handler: impl FnMut(&Dispatch<K>, &mut E) -> Outcome,
) -> bool {
    for d in seq {
        match handler(d, event) {
            Outcome::Continue => {}
            Outcome::Stop => return false,
            Outcome::StopAndConsume => return true,
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Phase;
    use alloc::vec;

    #[test]
    fn sequence_orders_capture_target_bubble() {
        let seq = sequence(&[1_u32, 2, 3], true);
        let phases: Vec<(Phase, u32)> = seq.iter().map(|d| (d.phase, d.node)).collect();
        assert_eq!(
            phases,
            vec![
                (Phase::Capture, 1),
                (Phase::Capture, 2),
                (Phase::Target, 3),
                (Phase::Bubble, 2),
                (Phase::Bubble, 1),
            ]
        );
    }

    #[test]
    fn non_bubbling_sequence_ends_at_target() {
        let seq = sequence(&[1_u32, 2], false);
        assert_eq!(seq, vec![Dispatch::capture(1), Dispatch::target(2)]);
        assert!(sequence::<u32>(&[], true).is_empty());
    }

    #[test]
    fn default_prevention_pattern_sets_flag_at_target() {
        #[derive(Default)]
        struct Ev {
            default_prevented: bool,
            seen: Vec<(Phase, u32)>,
        }

        let seq = sequence(&[1_u32, 2], true);
        let mut ev = Ev::default();
        let consumed = run(&seq, &mut ev, |d, e| {
            e.seen.push((d.phase, d.node));
            if matches!(d.phase, Phase::Target) {
                e.default_prevented = true;
            }
            Outcome::Continue
        });

        assert!(!consumed);
        assert!(ev.default_prevented);
        assert_eq!(ev.seen.len(), 3);
    }

    #[test]
    fn stop_in_target_aborts_bubble_phase() {
        let seq = sequence(&[1_u32, 2], true);
        let mut seen: Vec<(Phase, u32)> = Vec::new();
        let consumed = run(&seq, &mut (), |d, _| {
            seen.push((d.phase, d.node));
            if matches!(d.phase, Phase::Target) {
                Outcome::Stop
            } else {
                Outcome::Continue
            }
        });
        assert!(!consumed);
        assert_eq!(seen, vec![(Phase::Capture, 1), (Phase::Target, 2)]);
    }

    #[test]
    fn stop_and_consume_reports_consumed() {
        let seq = sequence(&[1_u32, 2], true);
        let consumed = run(&seq, &mut (), |d, _| {
            if d.phase == Phase::Target {
                Outcome::StopAndConsume
            } else {
                Outcome::Continue
            }
        });
        assert!(consumed);
    }
}
