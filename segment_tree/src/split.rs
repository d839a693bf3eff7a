/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Split selection.
//!
//! Given a set of segments, the selector estimates for every declared
//! dimension how many segments a split on that dimension would remove from the
//! worst-case branch a point query has to visit, and picks the dimension with
//! the largest reduction.
//!
//! # Continuous dimensions
//!
//! A threshold `m` sends segments whose interval ends below `m` left and
//! segments whose interval starts at or above `m` right. Everything else
//! (straddling intervals, segments unconstrained on the dimension) lands in the
//! pass bucket, which every query visits. A point query visits the pass bucket
//! plus one side, so the reduction is `min(left, right)`.
//!
//! Only interval starts are useful thresholds: `right` only changes when `m`
//! crosses a start, and between two starts a larger `m` can only grow `left`.
//! Sorting starts and ends and walking both lists once finds the best one; the
//! walk stops as soon as `left` catches up with `right`, since `min(left, right)`
//! can only shrink afterwards.
//!
//! # Discrete dimensions
//!
//! Splitting creates one bucket per distinct value. A query visits the pass
//! bucket plus at most the bucket of its value, so the worst case is the pass
//! bucket plus the most frequent value, and the reduction is the number of
//! constrained segments minus that frequency.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::segment::SharedSegment;
use crate::{Constraint, Dimension, DimensionType, DimensionTypes, Measure};

/// How the selected dimension is split.
#[derive(Debug, Clone, PartialEq)]
pub enum SplitKind {
    /// Binary split at the given threshold.
    Threshold(Measure),
    /// One bucket per distinct value. Carries the most frequent value.
    Partition { hottest: Measure },
}

/// The outcome of a successful split selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitChoice {
    pub dimension: Dimension,
    pub kind: SplitKind,
    /// Segments removed from the worst-case branch.
    pub decrease: usize,
    /// `decrease` as a fraction of all segments.
    pub decrease_fraction: f64,
}

/// Picks the dimension to split a segment set on.
#[derive(Debug, Clone, Copy)]
pub struct SplitSelector<'a> {
    dimension_types: &'a DimensionTypes,
    decrease_min: f64,
}

impl<'a> SplitSelector<'a> {
    pub const fn new(dimension_types: &'a DimensionTypes, decrease_min: f64) -> Self {
        Self {
            dimension_types,
            decrease_min,
        }
    }

    /// Select the dimension with the largest decrease.
    ///
    /// Ties go to the dimension that sorts first. Returns `None` if no dimension
    /// removes at least one segment and at least `decrease_min` of the set.
    pub fn select<D>(&self, segments: &[SharedSegment<D>]) -> Option<SplitChoice> {
        if segments.is_empty() {
            return None;
        }

        let mut best: Option<(&Dimension, SplitKind, usize)> = None;
        for (dimension, ty) in self.dimension_types.iter() {
            let Some((kind, decrease)) = Self::evaluate(segments, dimension, ty) else {
                continue;
            };
            if decrease > best.as_ref().map_or(0, |(_, _, d)| *d) {
                best = Some((dimension, kind, decrease));
            }
        }

        let (dimension, kind, decrease) = best?;
        let decrease_fraction = decrease as f64 / segments.len() as f64;
        if decrease_fraction < self.decrease_min {
            return None;
        }

        Some(SplitChoice {
            dimension: dimension.clone(),
            kind,
            decrease,
            decrease_fraction,
        })
    }

    /// Evaluate a single dimension. Returns the split and its decrease, or
    /// `None` if no segment is constrained on it with the expected kind.
    pub fn evaluate<D>(
        segments: &[SharedSegment<D>],
        dimension: &Dimension,
        ty: DimensionType,
    ) -> Option<(SplitKind, usize)> {
        match ty {
            DimensionType::Continuous => best_threshold(segments, dimension)
                .map(|(threshold, decrease)| (SplitKind::Threshold(threshold), decrease)),
            DimensionType::Discrete => hottest_value(segments, dimension)
                .map(|(hottest, decrease)| (SplitKind::Partition { hottest }, decrease)),
        }
    }
}

/// Find the threshold maximizing `min(left, right)` on a continuous dimension.
pub fn best_threshold<D>(
    segments: &[SharedSegment<D>],
    dimension: &Dimension,
) -> Option<(Measure, usize)> {
    let mut starts = Vec::with_capacity(segments.len());
    let mut ends = Vec::with_capacity(segments.len());
    for segment in segments {
        if let Some(Constraint::Interval(interval)) = segment.region().get(dimension)
            && !interval.is_empty()
        {
            starts.push(interval.lo());
            ends.push(interval.hi());
        }
    }
    if starts.is_empty() {
        return None;
    }
    starts.sort_by(|a, b| a.total_cmp(b));
    ends.sort_by(|a, b| a.total_cmp(b));

    let total = starts.len();
    let mut ends_below = 0;
    let mut best: Option<(&Measure, usize)> = None;
    for (i, &start) in starts.iter().enumerate() {
        if i > 0 && starts[i - 1] == start {
            continue;
        }
        while ends_below < total && ends[ends_below].total_cmp(start) == Ordering::Less {
            ends_below += 1;
        }
        let (left, right) = (ends_below, total - i);
        let decrease = left.min(right);
        if decrease > best.map_or(0, |(_, d)| d) {
            best = Some((start, decrease));
        }
        if left >= right {
            break;
        }
    }

    best.map(|(threshold, decrease)| (threshold.clone(), decrease))
}

/// Find the most frequent value on a discrete dimension and the resulting decrease.
///
/// Ties resolve to the smallest value under [`Measure::total_cmp`].
pub fn hottest_value<D>(
    segments: &[SharedSegment<D>],
    dimension: &Dimension,
) -> Option<(Measure, usize)> {
    let mut constrained = 0usize;
    let mut frequency: HashMap<&Measure, usize> = HashMap::new();
    for segment in segments {
        if let Some(Constraint::Discrete(set)) = segment.region().get(dimension) {
            constrained += 1;
            for value in set.values() {
                *frequency.entry(value).or_default() += 1;
            }
        }
    }

    let (hottest, count) = frequency.into_iter().max_by(|(a, a_count), (b, b_count)| {
        a_count.cmp(b_count).then_with(|| b.total_cmp(a))
    })?;

    Some((hottest.clone(), constrained - count))
}
