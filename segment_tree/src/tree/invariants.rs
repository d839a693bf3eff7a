/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Structural invariant checks.
//!
//! Gated behind the `unittest` feature flag (and always on in unit tests).
//! They run after every build to catch routing mistakes early.

use super::SegmentTree;
use crate::iter::DepthPreOrderDfsIterator;
use crate::{Constraint, IndexNode};

impl<D> SegmentTree<D> {
    /// Panics if `root` violates a routing or depth invariant.
    pub(crate) fn check_invariants(&self, root: &IndexNode<D>) {
        for (depth, node) in DepthPreOrderDfsIterator::new(root) {
            assert!(
                depth <= self.options.level_max,
                "node at depth {depth} exceeds level_max {}",
                self.options.level_max,
            );

            match node {
                IndexNode::Leaf(_) => {}
                IndexNode::Conjunction(conjunction) => {
                    assert_eq!(conjunction.level(), depth, "conjunction level mismatch");
                }
                IndexNode::BinarySplit(split) => {
                    assert_eq!(split.level(), depth, "binary split level mismatch");
                    let dimension = split.dimension();
                    for segment in split.left().into_iter().flat_map(subtree_segments) {
                        let Some(Constraint::Interval(interval)) = segment.region().get(dimension)
                        else {
                            panic!(
                                "left segment {} not constrained on {dimension}",
                                segment.region().key()
                            );
                        };
                        assert!(
                            interval.is_below(split.mid()),
                            "left segment {} does not end below {}",
                            segment.region().key(),
                            split.mid(),
                        );
                    }
                    for segment in split.right().into_iter().flat_map(subtree_segments) {
                        let Some(Constraint::Interval(interval)) = segment.region().get(dimension)
                        else {
                            panic!(
                                "right segment {} not constrained on {dimension}",
                                segment.region().key()
                            );
                        };
                        assert!(
                            interval.is_at_or_above(split.mid()),
                            "right segment {} does not start at or above {}",
                            segment.region().key(),
                            split.mid(),
                        );
                    }
                }
                IndexNode::HashSplit(split) => {
                    assert_eq!(split.level(), depth, "hash split level mismatch");
                    let dimension = split.dimension();
                    for (value, child) in split.sorted_buckets() {
                        for segment in subtree_segments(child) {
                            let accepted = matches!(
                                segment.region().get(dimension),
                                Some(Constraint::Discrete(set)) if set.contains(value)
                            );
                            assert!(
                                accepted,
                                "segment {} in bucket {value} does not accept it",
                                segment.region().key(),
                            );
                        }
                    }
                }
            }
        }
    }
}

fn subtree_segments<D>(
    node: &IndexNode<D>,
) -> impl Iterator<Item = &crate::segment::SharedSegment<D>> {
    node.iter().flat_map(IndexNode::segments)
}
