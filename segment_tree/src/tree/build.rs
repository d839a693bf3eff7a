/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Write path: rebuilding the root from the buffered segments.
//!
//! A build merges the buffer by region, then recursively partitions the
//! segment set. At each level the [`SplitSelector`] picks the dimension
//! that shrinks the worst-case branch the most; when none is worth it the
//! segments end up in a leaf, or in a conjunction node if that fallback is
//! enabled and cheaper.

use std::hash::Hash;
use std::sync::Arc;

use tracing::{debug, trace};

use super::SegmentTree;
use crate::segment::SharedSegment;
use crate::{
    BinarySplitNode, ConjunctionNode, HashSplitNode, IndexNode, SplitChoice, SplitKind,
    SplitSelector, merge_segments,
};

impl<D: Clone + Eq + Hash> SegmentTree<D> {
    /// Rebuild the root from every buffered segment and make it live.
    ///
    /// Segments with identical regions are merged, and the buffer is replaced
    /// by the merged set. An empty buffer is not an error: a tree that was
    /// never built stays unbuilt, and a live root left over from segments
    /// that [`remove`](Self::remove) has since emptied is cleared.
    pub fn build(&self) {
        let mut buffer = self.buffer.lock();
        if buffer.is_empty() {
            let previous = self.root.write().take();
            if previous.is_some() {
                let revision = self.bump_revision();
                debug!(tree = %self.unique_id, revision, "buffer emptied, cleared root");
            } else {
                debug!(tree = %self.unique_id, "empty buffer, skipping build");
            }
            drop(buffer);
            drop(previous);
            return;
        }

        let buffered = buffer.len();
        *buffer = merge_segments(std::mem::take(&mut *buffer));
        let segments: Vec<SharedSegment<D>> = buffer.iter().cloned().map(Arc::new).collect();
        let merged = segments.len();

        let root = self.build_node(segments, 1);

        #[cfg(any(test, feature = "unittest"))]
        if let Some(root) = &root {
            self.check_invariants(root);
        }

        let previous = std::mem::replace(&mut *self.root.write(), root);
        let revision = self.bump_revision();
        drop(buffer);
        // The old tree is freed outside both locks.
        drop(previous);

        debug!(
            tree = %self.unique_id,
            buffered,
            merged,
            revision,
            "built segment tree"
        );
    }

    /// Build the subtree for `segments` at `level`. The root is at level 1.
    ///
    /// Returns `None` for an empty segment set.
    pub(crate) fn build_node(
        &self,
        segments: Vec<SharedSegment<D>>,
        level: usize,
    ) -> Option<IndexNode<D>> {
        if segments.is_empty() {
            return None;
        }
        if segments.len() <= self.options.leaf_max || level >= self.options.level_max {
            trace!(level, size = segments.len(), "leaf");
            return Some(IndexNode::leaf(segments));
        }

        let selector =
            SplitSelector::new(&self.dimension_types, self.options.branching_decrease_min);
        let node = match selector.select(&segments) {
            Some(choice) => self.split(segments, choice, level),
            None => self.fallback(segments, level),
        };
        Some(node)
    }

    fn split(
        &self,
        segments: Vec<SharedSegment<D>>,
        choice: SplitChoice,
        level: usize,
    ) -> IndexNode<D> {
        let SplitChoice {
            dimension,
            kind,
            decrease_fraction,
            ..
        } = choice;

        match kind {
            SplitKind::Threshold(mid) => {
                debug!(
                    level,
                    %dimension,
                    %mid,
                    decrease = decrease_fraction,
                    size = segments.len(),
                    "binary split"
                );
                let (left, right, pass) = BinarySplitNode::partition(segments, &dimension, &mid);
                let mut node = BinarySplitNode::new(dimension, mid, decrease_fraction, level);
                node.left = self.build_node(left, level + 1).map(Box::new);
                node.right = self.build_node(right, level + 1).map(Box::new);
                node.pass = self.build_node(pass, level + 1).map(Box::new);
                IndexNode::BinarySplit(node)
            }
            SplitKind::Partition { hottest } => {
                debug!(
                    level,
                    %dimension,
                    %hottest,
                    decrease = decrease_fraction,
                    size = segments.len(),
                    "hash split"
                );
                let (buckets, pass) = HashSplitNode::partition(segments, &dimension);
                let mut node = HashSplitNode::new(dimension, decrease_fraction, level);
                for (value, bucket) in buckets {
                    if let Some(child) = self.build_node(bucket, level + 1) {
                        node.children.insert(value, child);
                    }
                }
                node.pass = self.build_node(pass, level + 1).map(Box::new);
                IndexNode::HashSplit(node)
            }
        }
    }

    /// No split is productive: use a conjunction node if enabled and cheaper
    /// than scanning, otherwise a leaf.
    fn fallback(&self, segments: Vec<SharedSegment<D>>, level: usize) -> IndexNode<D> {
        let Some(rate) = self.options.conjunction_target_rate_min else {
            trace!(level, size = segments.len(), "no productive split, leaf");
            return IndexNode::leaf(segments);
        };

        let leaf_cost: usize = segments.iter().map(|segment| segment.region().len()).sum();
        let node = ConjunctionNode::new(segments, &self.dimension_types, level);
        let cost = node.cost();
        let target = rate * node.len() as f64 * self.dimension_types.len() as f64;

        if (cost as f64) < target && cost < leaf_cost {
            debug!(
                level,
                cost,
                leaf_cost,
                target,
                size = node.len(),
                "conjunction"
            );
            IndexNode::Conjunction(node)
        } else {
            trace!(level, cost, leaf_cost, target, "conjunction rejected, leaf");
            IndexNode::leaf(node.into_segments())
        }
    }
}
