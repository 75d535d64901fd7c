//! Property-based invariant tests for surface attachment bookkeeping.
//!
//! ## Invariants
//!
//! 1. Membership reflects the most recent attach/detach per surface.
//! 2. `attach; attach` is equivalent to `attach`.
//! 3. `detach; detach` is equivalent to `detach`.
//! 4. The collaborator sees exactly one attach per actual insertion and one
//!    detach per actual removal.

use std::collections::HashMap;

use proptest::prelude::*;
use slidekit_core::{Rect, Size};
use slidekit_runtime::{ContainerId, ContentSurface, HeadlessSurface, SurfaceLifecycle};

const SURFACES: usize = 4;

#[derive(Debug, Clone, Copy)]
enum Op {
    Attach { surface: usize, index: usize },
    Detach { surface: usize },
}

// ── Strategies ────────────────────────────────────────────────────────────

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..SURFACES, 0usize..6).prop_map(|(surface, index)| Op::Attach { surface, index }),
        (0..SURFACES).prop_map(|surface| Op::Detach { surface }),
    ]
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(arb_op(), 0..64)
}

fn setup() -> (SurfaceLifecycle, Vec<HeadlessSurface>) {
    let life = SurfaceLifecycle::new(
        ContainerId::next(),
        Rect::from_size(Size::new(320.0, 480.0)),
    );
    let surfaces = (0..SURFACES).map(|_| HeadlessSurface::new()).collect();
    (life, surfaces)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn membership_tracks_last_call(ops in arb_ops()) {
        let (mut life, mut surfaces) = setup();
        let mut expected: HashMap<usize, bool> = HashMap::new();

        for op in &ops {
            match *op {
                Op::Attach { surface, index } => {
                    life.attach(&mut surfaces[surface], index);
                    expected.insert(surface, true);
                }
                Op::Detach { surface } => {
                    life.detach(&mut surfaces[surface]);
                    expected.insert(surface, false);
                }
            }
        }

        for (i, surface) in surfaces.iter().enumerate() {
            let want = expected.get(&i).copied().unwrap_or(false);
            prop_assert_eq!(life.is_attached(surface.id()), want, "surface {}", i);
            prop_assert_eq!(surface.is_in_tree(), want, "surface {} tree", i);
        }
        let attached = expected.values().filter(|&&v| v).count();
        prop_assert_eq!(life.attachments().len(), attached);
    }

    #[test]
    fn repeated_calls_are_idempotent(ops in arb_ops()) {
        let (mut once, mut a) = setup();
        let (mut twice, mut b) = setup();

        for op in &ops {
            match *op {
                Op::Attach { surface, index } => {
                    once.attach(&mut a[surface], index);
                    twice.attach(&mut b[surface], index);
                    twice.attach(&mut b[surface], index);
                }
                Op::Detach { surface } => {
                    once.detach(&mut a[surface]);
                    twice.detach(&mut b[surface]);
                    twice.detach(&mut b[surface]);
                }
            }
        }

        let positions = |life: &SurfaceLifecycle, surfaces: &[HeadlessSurface]| -> Vec<Option<usize>> {
            surfaces
                .iter()
                .map(|s| life.attachments().index_of(s.id()))
                .collect()
        };
        prop_assert_eq!(positions(&once, &a), positions(&twice, &b));
    }

    #[test]
    fn collaborator_calls_match_real_changes(ops in arb_ops()) {
        let (mut life, mut surfaces) = setup();
        let mut inserts = vec![0usize; SURFACES];
        let mut removals = vec![0usize; SURFACES];

        for op in &ops {
            match *op {
                Op::Attach { surface, index } => {
                    if life.attach(&mut surfaces[surface], index) {
                        inserts[surface] += 1;
                    }
                }
                Op::Detach { surface } => {
                    if life.detach(&mut surfaces[surface]) {
                        removals[surface] += 1;
                    }
                }
            }
        }

        for (i, surface) in surfaces.iter().enumerate() {
            prop_assert_eq!(surface.attach_calls(), inserts[i]);
            prop_assert_eq!(surface.detach_calls(), removals[i]);
            prop_assert!(inserts[i] - removals[i] <= 1);
        }
    }
}
