/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Segments and the merge pass.

use std::collections::HashMap;
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

use crate::{Point, Region};

/// A region together with the payload values of every rule that shares it.
#[derive(Debug, Clone)]
pub struct Segment<D> {
    region: Region,
    payload: HashSet<D>,
}

/// Segments are shared between the buckets of a single tree, never between trees.
pub type SharedSegment<D> = Arc<Segment<D>>;

impl<D: Eq + Hash> Segment<D> {
    /// Create a segment holding a single payload value.
    pub fn new(region: Region, value: D) -> Self {
        Self {
            region,
            payload: HashSet::from([value]),
        }
    }

    /// Union `other`'s payload into this segment.
    pub(crate) fn absorb(&mut self, other: Segment<D>) {
        self.payload.extend(other.payload);
    }

    /// Drop `value` from the payload. Returns true if the value was present.
    pub(crate) fn remove_value(&mut self, value: &D) -> bool {
        self.payload.remove(value)
    }
}

impl<D: Clone + Eq + Hash> Segment<D> {
    /// Union a borrowed segment's payload into this segment.
    pub(crate) fn absorb_shared(&mut self, other: &Segment<D>) {
        self.payload.extend(other.payload.iter().cloned());
    }
}

impl<D> Segment<D> {
    pub const fn region(&self) -> &Region {
        &self.region
    }

    pub const fn payload(&self) -> &HashSet<D> {
        &self.payload
    }

    /// Returns true if the point satisfies this segment's region.
    pub fn matches_point(&self, point: &Point) -> bool {
        self.region.contains_point(point)
    }

    /// Returns true if the query region overlaps this segment's region.
    pub fn matches_region(&self, query: &Region) -> bool {
        self.region.overlaps(query)
    }

    /// Returns true if the payload is empty and the segment should be discarded.
    pub(crate) fn is_exhausted(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Merge segments with equal regions, unioning their payloads.
///
/// The first occurrence of each region keeps its position; later duplicates are
/// folded into it.
pub fn merge_segments<D: Eq + Hash>(segments: Vec<Segment<D>>) -> Vec<Segment<D>> {
    let mut merged: Vec<Segment<D>> = Vec::with_capacity(segments.len());
    let mut positions: HashMap<Region, usize> = HashMap::with_capacity(segments.len());

    for segment in segments {
        if let Some(&pos) = positions.get(&segment.region) {
            merged[pos].absorb(segment);
        } else {
            positions.insert(segment.region.clone(), merged.len());
            merged.push(segment);
        }
    }

    merged
}
