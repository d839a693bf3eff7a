/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! The segment tree: a segment buffer plus the live root built from it.
//!
//! The implementation is split into sub-modules by concern:
//! - [`build`]: Write path (merge pass, split selection, node construction)
//! - [`find`]: Read path (point and region queries)
//! - [`insert`]: Buffer mutations (add, incremental insert, remove)

mod build;
mod find;
mod insert;
#[cfg(any(test, feature = "unittest"))]
mod invariants;

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};

use crate::debug::TreeStats;
use crate::iter::DepthPreOrderDfsIterator;
use crate::unique_id::TreeUniqueId;
use crate::{DimensionTypes, IndexNode, Segment, TreeOptions};

/// An index over multi-dimensional segments.
///
/// Segments are buffered by [`add`](Self::add) and become searchable once
/// [`build`](Self::build) turns the buffer into a tree of [`IndexNode`]s.
/// [`insert`](Self::insert) additionally threads a segment into the live tree
/// without waiting for a rebuild.
///
/// # Locking
///
/// Two locks are involved:
///
/// - The mutation lock guards the buffer. `add`, `insert`, `remove` and
///   `build` serialize on it.
/// - The root lock guards the live root. Searches share it; `build` holds it
///   exclusively only while swapping in a freshly built root, so queries never
///   wait on tree construction.
///
/// A search therefore always sees a complete tree, either the one from before
/// or the one from after a concurrent build.
#[derive(Debug)]
pub struct SegmentTree<D> {
    dimension_types: DimensionTypes,
    options: TreeOptions,
    /// Every segment added so far. Merged by region on each build.
    buffer: Mutex<Vec<Segment<D>>>,
    /// The live root, `None` until the first build or insert.
    root: RwLock<Option<IndexNode<D>>>,
    /// Incremented on each root swap and each incremental insert.
    revision: AtomicU64,
    unique_id: TreeUniqueId,
}

impl<D> SegmentTree<D> {
    /// Create an empty tree over the declared dimensions.
    ///
    /// Out-of-range options are replaced by their defaults, see
    /// [`TreeOptions::normalized`].
    pub fn new(dimension_types: DimensionTypes, options: TreeOptions) -> Self {
        Self {
            dimension_types,
            options: options.normalized(),
            buffer: Mutex::new(Vec::new()),
            root: RwLock::new(None),
            revision: AtomicU64::new(0),
            unique_id: TreeUniqueId::next(),
        }
    }

    pub const fn dimension_types(&self) -> &DimensionTypes {
        &self.dimension_types
    }

    /// The options in effect, after normalization.
    pub const fn options(&self) -> &TreeOptions {
        &self.options
    }

    pub const fn unique_id(&self) -> TreeUniqueId {
        self.unique_id
    }

    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    fn bump_revision(&self) -> u64 {
        self.revision.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Number of buffered segments.
    ///
    /// Segments sharing a region are counted separately until the next build
    /// merges them.
    pub fn len(&self) -> usize {
        self.buffer.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    /// Returns true if a root is live.
    pub fn is_built(&self) -> bool {
        self.root.read().is_some()
    }

    /// Run `f` on the live root while holding the root lock for reading.
    ///
    /// Rebuilds wait for `f` to return before swapping the root.
    pub fn with_root<R>(&self, f: impl FnOnce(Option<&IndexNode<D>>) -> R) -> R {
        f(self.root.read().as_ref())
    }

    /// Structural statistics of the live tree.
    pub fn stats(&self) -> TreeStats {
        let root = self.root.read();
        let Some(root) = root.as_ref() else {
            return TreeStats::default();
        };

        let mut stats = TreeStats::default();
        for (depth, node) in DepthPreOrderDfsIterator::new(root) {
            stats.nodes += 1;
            stats.max_depth = stats.max_depth.max(depth);
            stats.indexed_segments += node.num_segments();
            match node {
                IndexNode::Leaf(_) => stats.leaves += 1,
                IndexNode::BinarySplit(_) => stats.binary_splits += 1,
                IndexNode::HashSplit(_) => stats.hash_splits += 1,
                IndexNode::Conjunction(_) => stats.conjunctions += 1,
            }
        }
        stats
    }
}
