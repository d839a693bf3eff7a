/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Threshold split on a continuous dimension.

use std::collections::HashSet;
use std::hash::Hash;

use tracing::warn;

use super::{IndexNode, insert_into};
use crate::segment::SharedSegment;
use crate::{Constraint, Dimension, Measure, Point, Region};

/// Where a segment lands relative to a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    /// The interval ends below the threshold.
    Left,
    /// The interval starts at or above the threshold.
    Right,
    /// Straddles the threshold, or is not routable on this dimension.
    Pass,
}

/// Route a segment's constraint on the split dimension.
pub(crate) fn route(constraint: Option<&Constraint>, mid: &Measure) -> Side {
    match constraint {
        Some(Constraint::Interval(interval)) if interval.is_below(mid) => Side::Left,
        Some(Constraint::Interval(interval)) if interval.is_at_or_above(mid) => Side::Right,
        _ => Side::Pass,
    }
}

/// A binary split on a continuous dimension.
///
/// Segments whose interval ends below `mid` live under `left`, segments whose
/// interval starts at or above `mid` live under `right`. A point value `v` is
/// routed left if `v < mid` and right if `v >= mid`; both rules agree, so a
/// point only ever needs one side plus the pass child.
#[derive(Debug)]
pub struct BinarySplitNode<D> {
    pub(crate) dimension: Dimension,
    pub(crate) mid: Measure,
    pub(crate) decrease: f64,
    pub(crate) level: usize,
    pub(crate) left: Option<Box<IndexNode<D>>>,
    pub(crate) right: Option<Box<IndexNode<D>>>,
    pub(crate) pass: Option<Box<IndexNode<D>>>,
}

impl<D> BinarySplitNode<D> {
    /// Create a split node with no children.
    pub const fn new(dimension: Dimension, mid: Measure, decrease: f64, level: usize) -> Self {
        Self {
            dimension,
            mid,
            decrease,
            level,
            left: None,
            right: None,
            pass: None,
        }
    }

    /// Split `segments` into `(left, right, pass)` around `mid`.
    pub fn partition(
        segments: Vec<SharedSegment<D>>,
        dimension: &Dimension,
        mid: &Measure,
    ) -> (Vec<SharedSegment<D>>, Vec<SharedSegment<D>>, Vec<SharedSegment<D>>) {
        let mut left = Vec::new();
        let mut right = Vec::new();
        let mut pass = Vec::new();
        for segment in segments {
            match route(segment.region().get(dimension), mid) {
                Side::Left => left.push(segment),
                Side::Right => right.push(segment),
                Side::Pass => pass.push(segment),
            }
        }
        (left, right, pass)
    }

    pub const fn dimension(&self) -> &Dimension {
        &self.dimension
    }

    /// The split threshold.
    pub const fn mid(&self) -> &Measure {
        &self.mid
    }

    /// The decrease fraction the split was chosen with.
    pub const fn decrease(&self) -> f64 {
        self.decrease
    }

    pub const fn level(&self) -> usize {
        self.level
    }

    pub fn left(&self) -> Option<&IndexNode<D>> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&IndexNode<D>> {
        self.right.as_deref()
    }

    pub fn pass(&self) -> Option<&IndexNode<D>> {
        self.pass.as_deref()
    }
}

impl<D: Clone + Eq + Hash> BinarySplitNode<D> {
    pub fn search(&self, point: &Point, out: &mut HashSet<D>) {
        // A value incomparable with `mid` cannot satisfy any routed interval,
        // so it only reaches the pass child.
        if let Some(value) = point.get(&self.dimension) {
            if value < &self.mid {
                search_child(&self.left, point, out);
            } else if value >= &self.mid {
                search_child(&self.right, point, out);
            }
        }
        search_child(&self.pass, point, out);
    }

    pub fn search_region(&self, region: &Region, out: &mut HashSet<D>) {
        let (visit_left, visit_right) = match region.get(&self.dimension) {
            Some(Constraint::Interval(interval)) if !interval.is_empty() => {
                (interval.lo() < &self.mid, interval.hi() >= &self.mid)
            }
            Some(Constraint::Discrete(set)) => (
                set.values().iter().any(|value| value < &self.mid),
                set.values().iter().any(|value| value >= &self.mid),
            ),
            _ => (false, false),
        };

        if visit_left {
            search_region_child(&self.left, region, out);
        }
        if visit_right {
            search_region_child(&self.right, region, out);
        }
        search_region_child(&self.pass, region, out);
    }

    pub fn insert(&mut self, segment: SharedSegment<D>) {
        let constraint = segment.region().get(&self.dimension);
        if let Some(Constraint::Discrete(_)) = constraint {
            warn!(
                dimension = %self.dimension,
                "discrete constraint on a binary split, routing to pass"
            );
        }
        let slot = match route(constraint, &self.mid) {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
            Side::Pass => &mut self.pass,
        };
        insert_into(slot, segment);
    }
}

fn search_child<D: Clone + Eq + Hash>(
    child: &Option<Box<IndexNode<D>>>,
    point: &Point,
    out: &mut HashSet<D>,
) {
    if let Some(child) = child {
        child.search(point, out);
    }
}

fn search_region_child<D: Clone + Eq + Hash>(
    child: &Option<Box<IndexNode<D>>>,
    region: &Region,
    out: &mut HashSet<D>,
) {
    if let Some(child) = child {
        child.search_region(region, out);
    }
}
