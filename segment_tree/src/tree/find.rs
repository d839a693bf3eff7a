/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Read path: point and region queries against the live root.

use std::collections::HashSet;
use std::hash::Hash;

use super::SegmentTree;
use crate::{Point, Region};

impl<D: Clone + Eq + Hash> SegmentTree<D> {
    /// Payloads of every segment whose region the point satisfies.
    ///
    /// A segment matches only if the point carries a value for each dimension
    /// the segment constrains. Returns an empty set if nothing was built yet.
    pub fn search(&self, point: &Point) -> HashSet<D> {
        let mut out = HashSet::new();
        if let Some(root) = self.root.read().as_ref() {
            root.search(point, &mut out);
        }
        out
    }

    /// Payloads of every segment whose region overlaps `region`.
    pub fn search_region(&self, region: &Region) -> HashSet<D> {
        let mut out = HashSet::new();
        if let Some(root) = self.root.read().as_ref() {
            root.search_region(region, &mut out);
        }
        out
    }
}
