/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Buffer mutations: add, incremental insert, and payload removal.

use std::hash::Hash;
use std::sync::Arc;

use tracing::trace;

use super::SegmentTree;
use crate::{IndexNode, Region, Segment, SegmentTreeError};

impl<D: Clone + Eq + Hash> SegmentTree<D> {
    /// Buffer a segment. It becomes searchable after the next [`build`](Self::build).
    ///
    /// # Errors
    ///
    /// Fails if the region constrains an undeclared dimension, uses the wrong
    /// constraint kind for a dimension, or has an interval with bounds of
    /// different measure kinds. Nothing is buffered in that case.
    pub fn add(&self, region: Region, value: D) -> Result<(), SegmentTreeError> {
        self.dimension_types.validate(&region)?;
        self.buffer.lock().push(Segment::new(region, value));
        Ok(())
    }

    /// Buffer a segment and thread it into the live tree right away.
    ///
    /// The segment follows the routing a build would give it, creating leaves
    /// and hash buckets where needed, but nothing is re-split. The tree may
    /// drift from the shape a full rebuild would produce; the next
    /// [`build`](Self::build) restores it.
    ///
    /// # Errors
    ///
    /// Same as [`add`](Self::add).
    pub fn insert(&self, region: Region, value: D) -> Result<(), SegmentTreeError> {
        self.dimension_types.validate(&region)?;
        let segment = Segment::new(region, value);

        let mut buffer = self.buffer.lock();
        buffer.push(segment.clone());

        let shared = Arc::new(segment);
        let mut root = self.root.write();
        match root.as_mut() {
            Some(node) => {
                trace!(tree = %self.unique_id, root = node.kind_name(), "incremental insert");
                node.insert(shared);
            }
            None => {
                trace!(tree = %self.unique_id, "incremental insert into empty tree");
                *root = Some(IndexNode::leaf(vec![shared]));
            }
        }
        self.bump_revision();
        Ok(())
    }

    /// Drop `value` from every buffered segment, discarding segments left
    /// without payload. Returns the number of segments that held it.
    ///
    /// The live tree keeps answering with `value` until the next
    /// [`build`](Self::build).
    pub fn remove(&self, value: &D) -> usize {
        let mut buffer = self.buffer.lock();
        let mut removed = 0;
        buffer.retain_mut(|segment| {
            if segment.remove_value(value) {
                removed += 1;
            }
            !segment.is_exhausted()
        });
        trace!(tree = %self.unique_id, removed, "removed payload value");
        removed
    }
}
