/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! IndexNode - a node in the segment tree.
//!
//! A node is one of four variants:
//!
//! - [`LeafNode`]: a short list of segments scanned linearly.
//! - [`BinarySplitNode`]: a threshold split on a continuous dimension.
//! - [`HashSplitNode`]: a per-value split on a discrete dimension.
//! - [`ConjunctionNode`]: per-dimension inverted indexes with AND-counting,
//!   used when no split is productive.
//!
//! Interior nodes own their children directly. Split nodes carry an optional
//! pass child holding the segments that cannot be routed to one side (those
//! unconstrained on the split dimension, or straddling the threshold); every
//! query visits it.

mod binary;
mod conjunction;
mod hash;
mod leaf;

pub use binary::BinarySplitNode;
pub use conjunction::ConjunctionNode;
pub use hash::HashSplitNode;
pub use leaf::LeafNode;

use std::collections::HashSet;
use std::hash::Hash;

use crate::segment::SharedSegment;
use crate::{Measure, Point, Region};

/// A node in the segment tree.
#[derive(Debug)]
pub enum IndexNode<D> {
    Leaf(LeafNode<D>),
    BinarySplit(BinarySplitNode<D>),
    HashSplit(HashSplitNode<D>),
    Conjunction(ConjunctionNode<D>),
}

/// Identifies which branch of its parent a child hangs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch<'a> {
    Left,
    Right,
    Bucket(&'a Measure),
    Pass,
}

impl<D> IndexNode<D> {
    /// Creates a leaf holding `segments`.
    pub const fn leaf(segments: Vec<SharedSegment<D>>) -> Self {
        Self::Leaf(LeafNode::new(segments))
    }

    /// Returns true if this is a leaf node.
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// A short name for the node kind.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Leaf(_) => "leaf",
            Self::BinarySplit(_) => "binary",
            Self::HashSplit(_) => "hash",
            Self::Conjunction(_) => "conjunction",
        }
    }

    /// The direct children of this node, labelled by branch.
    ///
    /// Order is deterministic: left, right, hash buckets in ascending value
    /// order, then pass.
    pub fn children(&self) -> Vec<(Branch<'_>, &IndexNode<D>)> {
        let mut children = Vec::new();
        match self {
            Self::Leaf(_) | Self::Conjunction(_) => return children,
            Self::BinarySplit(node) => {
                children.extend(node.left().map(|child| (Branch::Left, child)));
                children.extend(node.right().map(|child| (Branch::Right, child)));
                children.extend(node.pass().map(|child| (Branch::Pass, child)));
            }
            Self::HashSplit(node) => {
                children.extend(
                    node.sorted_buckets()
                        .into_iter()
                        .map(|(value, child)| (Branch::Bucket(value), child)),
                );
                children.extend(node.pass().map(|child| (Branch::Pass, child)));
            }
        }
        children
    }

    /// Iterate over this node and all its descendants, depth-first.
    pub fn iter(&self) -> crate::PreOrderDfsIterator<'_, D> {
        crate::PreOrderDfsIterator::new(self)
    }

    /// Segments held directly by this node. Split nodes hold none.
    pub fn segments(&self) -> &[SharedSegment<D>] {
        match self {
            Self::Leaf(leaf) => leaf.segments(),
            Self::Conjunction(conjunction) => conjunction.segments(),
            Self::BinarySplit(_) | Self::HashSplit(_) => &[],
        }
    }

    /// Number of segment references held directly by this node.
    pub fn num_segments(&self) -> usize {
        self.segments().len()
    }
}

impl<D: Clone + Eq + Hash> IndexNode<D> {
    /// Collect the payloads of every segment whose region the point satisfies.
    pub fn search(&self, point: &Point, out: &mut HashSet<D>) {
        match self {
            Self::Leaf(node) => node.search(point, out),
            Self::BinarySplit(node) => node.search(point, out),
            Self::HashSplit(node) => node.search(point, out),
            Self::Conjunction(node) => node.search(point, out),
        }
    }

    /// Collect the payloads of every segment whose region overlaps `region`.
    pub fn search_region(&self, region: &Region, out: &mut HashSet<D>) {
        match self {
            Self::Leaf(node) => node.search_region(region, out),
            Self::BinarySplit(node) => node.search_region(region, out),
            Self::HashSplit(node) => node.search_region(region, out),
            Self::Conjunction(node) => node.search_region(region, out),
        }
    }

    /// Thread a segment into this subtree without rebuilding it.
    pub fn insert(&mut self, segment: SharedSegment<D>) {
        match self {
            Self::Leaf(node) => node.insert(segment),
            Self::BinarySplit(node) => node.insert(segment),
            Self::HashSplit(node) => node.insert(segment),
            Self::Conjunction(node) => node.insert(segment),
        }
    }
}

/// Insert into an optional child, creating a leaf if the child is absent.
fn insert_into<D: Clone + Eq + Hash>(
    slot: &mut Option<Box<IndexNode<D>>>,
    segment: SharedSegment<D>,
) {
    match slot {
        Some(child) => child.insert(segment),
        None => *slot = Some(Box::new(IndexNode::leaf(vec![segment]))),
    }
}
