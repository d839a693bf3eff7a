/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Conjunction node: exact AND-matching over per-dimension inverted indexes.
//!
//! Each indexed dimension maps query values to the list of segments whose
//! constraint accepts them. A query walks every dimension it carries and counts,
//! per segment, how many of its own constraints were hit. A segment is a
//! candidate once the count equals the number of constraints it declares;
//! dimensions it leaves unconstrained never need a hit.
//!
//! # Continuous postings
//!
//! Interval endpoints are collected into a sorted, deduplicated breakpoint
//! list. For every breakpoint and every open gap between two consecutive
//! breakpoints, the postings hold the segments covering it. Keeping breakpoints
//! separate from gaps resolves points sitting exactly on an endpoint and
//! degenerate `[v, v]` intervals.
//!
//! Candidates are checked against their full region before being reported,
//! which keeps the node exact even for values the postings cannot order.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

use crate::segment::SharedSegment;
use crate::{
    Constraint, DiscreteSet, Dimension, DimensionType, DimensionTypes, Interval, Measure, Point,
    Region,
};

/// Index of a segment within a [`ConjunctionNode`].
type SegmentId = u32;

#[derive(Debug, Default)]
struct IntervalPostings {
    breakpoints: Vec<Measure>,
    /// `at[k]`: segments whose interval contains `breakpoints[k]`.
    at: Vec<Vec<SegmentId>>,
    /// `between[k]`: segments covering the open gap `(breakpoints[k], breakpoints[k + 1])`.
    between: Vec<Vec<SegmentId>>,
}

impl IntervalPostings {
    fn build(entries: &[(SegmentId, &Interval)]) -> Self {
        let mut breakpoints: Vec<Measure> = entries
            .iter()
            .flat_map(|(_, interval)| [interval.lo().clone(), interval.hi().clone()])
            .collect();
        breakpoints.sort_by(Measure::total_cmp);
        breakpoints.dedup();

        let mut at = vec![Vec::new(); breakpoints.len()];
        let mut between = vec![Vec::new(); breakpoints.len().saturating_sub(1)];
        for &(id, interval) in entries {
            if interval.is_empty() {
                continue;
            }
            let first = Self::position(&breakpoints, interval.lo());
            let last = Self::position(&breakpoints, interval.hi());
            for postings in &mut at[first..=last] {
                postings.push(id);
            }
            for postings in &mut between[first..last] {
                postings.push(id);
            }
        }

        Self {
            breakpoints,
            at,
            between,
        }
    }

    fn position(breakpoints: &[Measure], value: &Measure) -> usize {
        breakpoints
            .binary_search_by(|probe| probe.total_cmp(value))
            .unwrap_or_else(|insert_at| insert_at)
    }

    fn lookup_point(&self, value: &Measure) -> &[SegmentId] {
        match self
            .breakpoints
            .binary_search_by(|probe| probe.total_cmp(value))
        {
            Ok(k) => self.at[k].as_slice(),
            Err(k) if k > 0 && k < self.breakpoints.len() => self.between[k - 1].as_slice(),
            Err(_) => &[],
        }
    }

    fn lookup_interval(&self, query: &Interval, hits: &mut Vec<SegmentId>) {
        if query.is_empty() || self.breakpoints.is_empty() {
            return;
        }
        let (lo, hi) = (query.lo(), query.hi());
        let bps = &self.breakpoints;

        let first_at = bps.partition_point(|b| b.total_cmp(lo) == Ordering::Less);
        let end_at = bps.partition_point(|b| b.total_cmp(hi) != Ordering::Greater);
        for postings in &self.at[first_at..end_at.max(first_at)] {
            hits.extend_from_slice(postings);
        }

        // Gap k overlaps the query iff bps[k + 1] > lo and bps[k] < hi.
        let first_gap = bps
            .partition_point(|b| b.total_cmp(lo) != Ordering::Greater)
            .saturating_sub(1);
        let end_gap = bps
            .partition_point(|b| b.total_cmp(hi) == Ordering::Less)
            .min(self.between.len());
        for postings in &self.between[first_gap.min(end_gap)..end_gap] {
            hits.extend_from_slice(postings);
        }
    }

    fn max_bucket(&self) -> usize {
        self.at
            .iter()
            .chain(&self.between)
            .map(Vec::len)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Default)]
struct ValuePostings {
    values: HashMap<Measure, Vec<SegmentId>>,
}

impl ValuePostings {
    fn build(entries: &[(SegmentId, &DiscreteSet)]) -> Self {
        let mut values: HashMap<Measure, Vec<SegmentId>> = HashMap::new();
        for &(id, set) in entries {
            for value in set.values() {
                values.entry(value.clone()).or_default().push(id);
            }
        }
        Self { values }
    }

    fn lookup_point(&self, value: &Measure) -> &[SegmentId] {
        self.values.get(value).map(Vec::as_slice).unwrap_or_default()
    }

    fn max_bucket(&self) -> usize {
        self.values.values().map(Vec::len).max().unwrap_or(0)
    }
}

#[derive(Debug)]
enum Postings {
    Continuous(IntervalPostings),
    Discrete(ValuePostings),
}

impl Postings {
    fn lookup_point(&self, value: &Measure) -> &[SegmentId] {
        match self {
            Self::Continuous(postings) => postings.lookup_point(value),
            Self::Discrete(postings) => postings.lookup_point(value),
        }
    }

    /// Segments hit by `constraint`, each reported once.
    fn lookup_constraint(&self, constraint: &Constraint) -> Vec<SegmentId> {
        let mut hits = Vec::new();
        match (self, constraint) {
            (Self::Continuous(postings), Constraint::Interval(interval)) => {
                postings.lookup_interval(interval, &mut hits);
            }
            (Self::Discrete(postings), Constraint::Interval(interval)) => {
                for (value, ids) in &postings.values {
                    if interval.contains(value) {
                        hits.extend_from_slice(ids);
                    }
                }
            }
            (_, Constraint::Discrete(set)) => {
                for value in set.values() {
                    hits.extend_from_slice(self.lookup_point(value));
                }
            }
        }
        hits.sort_unstable();
        hits.dedup();
        hits
    }

    fn max_bucket(&self) -> usize {
        match self {
            Self::Continuous(postings) => postings.max_bucket(),
            Self::Discrete(postings) => postings.max_bucket(),
        }
    }
}

/// Exact AND-matching fallback for segment sets that do not split well.
#[derive(Debug)]
pub struct ConjunctionNode<D> {
    level: usize,
    dimension_types: DimensionTypes,
    segments: Vec<SharedSegment<D>>,
    /// Number of indexed constraints each segment declares.
    required: Vec<u32>,
    /// Segments with no indexed constraint. They are candidates for every query.
    unconstrained: Vec<SegmentId>,
    postings: BTreeMap<Dimension, Postings>,
}

impl<D> ConjunctionNode<D> {
    /// Build the inverted indexes for `segments` over every declared dimension.
    pub fn new(
        segments: Vec<SharedSegment<D>>,
        dimension_types: &DimensionTypes,
        level: usize,
    ) -> Self {
        let mut node = Self {
            level,
            dimension_types: dimension_types.clone(),
            segments,
            required: Vec::new(),
            unconstrained: Vec::new(),
            postings: BTreeMap::new(),
        };
        node.reindex();
        node
    }

    fn reindex(&mut self) {
        let mut required = vec![0u32; self.segments.len()];
        let mut postings = BTreeMap::new();

        for (dimension, ty) in self.dimension_types.iter() {
            let dimension_postings = match ty {
                DimensionType::Continuous => {
                    let entries: Vec<(SegmentId, &Interval)> = self
                        .segments
                        .iter()
                        .enumerate()
                        .filter_map(|(id, segment)| match segment.region().get(dimension) {
                            Some(Constraint::Interval(interval)) => {
                                Some((id as SegmentId, interval))
                            }
                            _ => None,
                        })
                        .collect();
                    if entries.is_empty() {
                        continue;
                    }
                    for (id, _) in &entries {
                        required[*id as usize] += 1;
                    }
                    Postings::Continuous(IntervalPostings::build(&entries))
                }
                DimensionType::Discrete => {
                    let entries: Vec<(SegmentId, &DiscreteSet)> = self
                        .segments
                        .iter()
                        .enumerate()
                        .filter_map(|(id, segment)| match segment.region().get(dimension) {
                            Some(Constraint::Discrete(set)) => Some((id as SegmentId, set)),
                            _ => None,
                        })
                        .collect();
                    if entries.is_empty() {
                        continue;
                    }
                    for (id, _) in &entries {
                        required[*id as usize] += 1;
                    }
                    Postings::Discrete(ValuePostings::build(&entries))
                }
            };
            postings.insert(dimension.clone(), dimension_postings);
        }

        self.unconstrained = required
            .iter()
            .enumerate()
            .filter(|(_, count)| **count == 0)
            .map(|(id, _)| id as SegmentId)
            .collect();
        self.required = required;
        self.postings = postings;
    }

    pub const fn level(&self) -> usize {
        self.level
    }

    pub fn segments(&self) -> &[SharedSegment<D>] {
        &self.segments
    }

    /// Give the segments back, dropping the postings.
    pub fn into_segments(self) -> Vec<SharedSegment<D>> {
        self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of dimensions with an inverted index.
    pub fn indexed_dimensions(&self) -> usize {
        self.postings.len()
    }

    /// Estimated worst-case number of counter updates per query: the largest
    /// posting list of every dimension, plus the always-candidate segments.
    pub fn cost(&self) -> usize {
        self.postings.values().map(Postings::max_bucket).sum::<usize>() + self.unconstrained.len()
    }

    /// Candidates whose hit count reached the number of constraints they declare.
    fn candidates(
        &self,
        counts: HashMap<SegmentId, u32>,
    ) -> impl Iterator<Item = &SharedSegment<D>> {
        let counted = counts
            .into_iter()
            .filter(|(id, hits)| *hits == self.required[*id as usize])
            .map(|(id, _)| id);
        self.unconstrained
            .iter()
            .copied()
            .chain(counted)
            .map(|id| &self.segments[id as usize])
    }
}

impl<D: Clone + Eq + Hash> ConjunctionNode<D> {
    pub fn search(&self, point: &Point, out: &mut HashSet<D>) {
        let mut counts: HashMap<SegmentId, u32> = HashMap::new();
        for (dimension, postings) in &self.postings {
            let Some(value) = point.get(dimension) else {
                continue;
            };
            for &id in postings.lookup_point(value) {
                *counts.entry(id).or_default() += 1;
            }
        }

        for segment in self.candidates(counts) {
            if segment.matches_point(point) {
                out.extend(segment.payload().iter().cloned());
            }
        }
    }

    pub fn search_region(&self, region: &Region, out: &mut HashSet<D>) {
        let mut counts: HashMap<SegmentId, u32> = HashMap::new();
        for (dimension, postings) in &self.postings {
            let Some(constraint) = region.get(dimension) else {
                continue;
            };
            for id in postings.lookup_constraint(constraint) {
                *counts.entry(id).or_default() += 1;
            }
        }

        for segment in self.candidates(counts) {
            if segment.matches_region(region) {
                out.extend(segment.payload().iter().cloned());
            }
        }
    }

    /// Add a segment and rebuild the postings.
    pub fn insert(&mut self, segment: SharedSegment<D>) {
        match self
            .segments
            .iter_mut()
            .find(|existing| existing.region() == segment.region())
        {
            Some(existing) => Arc::make_mut(existing).absorb_shared(&segment),
            None => {
                self.segments.push(segment);
                self.reindex();
            }
        }
    }
}
