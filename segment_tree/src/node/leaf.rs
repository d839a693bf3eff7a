/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

use crate::segment::SharedSegment;
use crate::{Point, Region};

/// A leaf: a list of segments checked one by one.
///
/// Segments are merged by region before a leaf is built, so no two segments in
/// a leaf share a region.
#[derive(Debug)]
pub struct LeafNode<D> {
    segments: Vec<SharedSegment<D>>,
}

impl<D> LeafNode<D> {
    pub const fn new(segments: Vec<SharedSegment<D>>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[SharedSegment<D>] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl<D: Clone + Eq + Hash> LeafNode<D> {
    pub fn search(&self, point: &Point, out: &mut HashSet<D>) {
        for segment in &self.segments {
            if segment.matches_point(point) {
                out.extend(segment.payload().iter().cloned());
            }
        }
    }

    pub fn search_region(&self, region: &Region, out: &mut HashSet<D>) {
        for segment in &self.segments {
            if segment.matches_region(region) {
                out.extend(segment.payload().iter().cloned());
            }
        }
    }

    /// Append a segment, or fold its payload into a segment with the same region.
    pub fn insert(&mut self, segment: SharedSegment<D>) {
        match self
            .segments
            .iter_mut()
            .find(|existing| existing.region() == segment.region())
        {
            Some(existing) => Arc::make_mut(existing).absorb_shared(&segment),
            None => self.segments.push(segment),
        }
    }
}
