/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Per-value split on a discrete dimension.

use std::collections::HashMap;
use std::collections::HashSet;
use std::collections::hash_map::Entry;
use std::hash::Hash;

use tracing::warn;

use super::{IndexNode, insert_into};
use crate::segment::SharedSegment;
use crate::{Constraint, Dimension, Measure, Point, Region};

/// A hash split on a discrete dimension.
///
/// Each distinct value owns a child holding every segment whose set contains
/// that value. A segment accepting several values is shared by several
/// children; results are collected into a set, so it is reported once.
#[derive(Debug)]
pub struct HashSplitNode<D> {
    pub(crate) dimension: Dimension,
    pub(crate) decrease: f64,
    pub(crate) level: usize,
    pub(crate) children: HashMap<Measure, IndexNode<D>>,
    pub(crate) pass: Option<Box<IndexNode<D>>>,
}

/// Segments grouped by value, plus the segments that go to the pass child.
pub type Buckets<D> = (HashMap<Measure, Vec<SharedSegment<D>>>, Vec<SharedSegment<D>>);

impl<D> HashSplitNode<D> {
    pub fn new(dimension: Dimension, decrease: f64, level: usize) -> Self {
        Self {
            dimension,
            decrease,
            level,
            children: HashMap::new(),
            pass: None,
        }
    }

    /// Group `segments` by the values they accept on `dimension`.
    pub fn partition(segments: Vec<SharedSegment<D>>, dimension: &Dimension) -> Buckets<D> {
        let mut buckets: HashMap<Measure, Vec<SharedSegment<D>>> = HashMap::new();
        let mut pass = Vec::new();
        for segment in segments {
            match segment.region().get(dimension) {
                Some(Constraint::Discrete(set)) => {
                    for value in set.values() {
                        buckets
                            .entry(value.clone())
                            .or_default()
                            .push(SharedSegment::clone(&segment));
                    }
                }
                _ => pass.push(segment),
            }
        }
        (buckets, pass)
    }

    pub const fn dimension(&self) -> &Dimension {
        &self.dimension
    }

    pub const fn decrease(&self) -> f64 {
        self.decrease
    }

    pub const fn level(&self) -> usize {
        self.level
    }

    /// Number of value buckets.
    pub fn fan_out(&self) -> usize {
        self.children.len()
    }

    pub fn child(&self, value: &Measure) -> Option<&IndexNode<D>> {
        self.children.get(value)
    }

    pub fn pass(&self) -> Option<&IndexNode<D>> {
        self.pass.as_deref()
    }

    /// Buckets in ascending value order.
    pub fn sorted_buckets(&self) -> Vec<(&Measure, &IndexNode<D>)> {
        let mut buckets: Vec<_> = self.children.iter().collect();
        buckets.sort_by(|(a, _), (b, _)| a.total_cmp(b));
        buckets
    }
}

impl<D: Clone + Eq + Hash> HashSplitNode<D> {
    pub fn search(&self, point: &Point, out: &mut HashSet<D>) {
        if let Some(value) = point.get(&self.dimension)
            && let Some(child) = self.children.get(value)
        {
            child.search(point, out);
        }
        if let Some(pass) = &self.pass {
            pass.search(point, out);
        }
    }

    pub fn search_region(&self, region: &Region, out: &mut HashSet<D>) {
        match region.get(&self.dimension) {
            Some(Constraint::Discrete(set)) => {
                for value in set.values() {
                    if let Some(child) = self.children.get(value) {
                        child.search_region(region, out);
                    }
                }
            }
            Some(Constraint::Interval(interval)) => {
                for (value, child) in &self.children {
                    if interval.contains(value) {
                        child.search_region(region, out);
                    }
                }
            }
            None => {}
        }
        if let Some(pass) = &self.pass {
            pass.search_region(region, out);
        }
    }

    pub fn insert(&mut self, segment: SharedSegment<D>) {
        match segment.region().get(&self.dimension) {
            Some(Constraint::Discrete(set)) => {
                for value in set.values() {
                    match self.children.entry(value.clone()) {
                        Entry::Occupied(mut child) => {
                            child.get_mut().insert(SharedSegment::clone(&segment));
                        }
                        Entry::Vacant(slot) => {
                            slot.insert(IndexNode::leaf(vec![SharedSegment::clone(&segment)]));
                        }
                    }
                }
            }
            Some(Constraint::Interval(_)) => {
                warn!(
                    dimension = %self.dimension,
                    "interval constraint on a hash split, routing to pass"
                );
                insert_into(&mut self.pass, segment);
            }
            None => insert_into(&mut self.pass, segment),
        }
    }
}
