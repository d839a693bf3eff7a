/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Per-dimension constraints, regions and query points.
//!
//! A [`Region`] maps dimension names to at most one [`Constraint`] each. A
//! dimension missing from a region is unconstrained. A dimension missing from
//! a [`Point`] (or from a query region) carries no value, so it only matches
//! segments that leave that dimension unconstrained.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::Measure;

/// The name of a dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    /// A positional dimension.
    Id(u64),
    /// A named dimension.
    Name(String),
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl From<&str> for Dimension {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for Dimension {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<u64> for Dimension {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

impl From<u32> for Dimension {
    fn from(id: u32) -> Self {
        Self::Id(u64::from(id))
    }
}

impl From<usize> for Dimension {
    fn from(id: usize) -> Self {
        Self::Id(id as u64)
    }
}

/// An inclusive interval `[lo, hi]` over an ordered dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interval {
    lo: Measure,
    hi: Measure,
}

impl Interval {
    /// Create the interval `[lo, hi]`.
    pub fn new(lo: impl Into<Measure>, hi: impl Into<Measure>) -> Self {
        Self {
            lo: lo.into(),
            hi: hi.into(),
        }
    }

    /// The interval covering every measure.
    pub const fn unbounded() -> Self {
        Self {
            lo: Measure::NegativeInfinity,
            hi: Measure::PositiveInfinity,
        }
    }

    /// Lower bound (inclusive).
    pub const fn lo(&self) -> &Measure {
        &self.lo
    }

    /// Upper bound (inclusive).
    pub const fn hi(&self) -> &Measure {
        &self.hi
    }

    /// Returns true if no value can satisfy this interval: either `lo > hi`
    /// or the bounds are incomparable.
    pub fn is_empty(&self) -> bool {
        self.lo
            .partial_cmp(&self.hi)
            .is_none_or(|ordering| ordering == Ordering::Greater)
    }

    /// Returns true if `lo <= value <= hi`.
    pub fn contains(&self, value: &Measure) -> bool {
        &self.lo <= value && value <= &self.hi
    }

    /// Returns true if the two intervals share at least one value.
    pub fn overlaps(&self, other: &Interval) -> bool {
        !self.is_empty() && !other.is_empty() && self.lo <= other.hi && other.lo <= self.hi
    }

    /// Returns true if the interval lies entirely below `threshold`.
    pub fn is_below(&self, threshold: &Measure) -> bool {
        &self.hi < threshold
    }

    /// Returns true if the interval starts at or above `threshold`.
    pub fn is_at_or_above(&self, threshold: &Measure) -> bool {
        &self.lo >= threshold
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

/// A finite set of accepted measures. A value satisfies the set if it is a member.
///
/// Values are kept sorted by [`Measure::total_cmp`] and deduplicated, so two
/// sets with the same members are equal and render the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DiscreteSet {
    values: Vec<Measure>,
}

impl DiscreteSet {
    /// Create a set from any collection of measures.
    pub fn new<I, M>(values: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Measure>,
    {
        let mut values: Vec<Measure> = values.into_iter().map(Into::into).collect();
        values.sort_by(Measure::total_cmp);
        values.dedup();
        Self { values }
    }

    /// The members, in ascending order.
    pub fn values(&self) -> &[Measure] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns true if `value` is a member of the set.
    pub fn contains(&self, value: &Measure) -> bool {
        self.values
            .binary_search_by(|probe| probe.total_cmp(value))
            .is_ok()
    }

    /// Returns true if the sets share a member.
    pub fn intersects(&self, other: &DiscreteSet) -> bool {
        // Both sides are sorted, so a merge walk suffices.
        let (mut i, mut j) = (0, 0);
        while i < self.values.len() && j < other.values.len() {
            match self.values[i].total_cmp(&other.values[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => return true,
            }
        }
        false
    }

    /// Returns true if any member falls within `interval`.
    pub fn intersects_interval(&self, interval: &Interval) -> bool {
        self.values.iter().any(|value| interval.contains(value))
    }
}

impl fmt::Display for DiscreteSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.values.iter().join(","))
    }
}

impl<M: Into<Measure>> FromIterator<M> for DiscreteSet {
    fn from_iter<T: IntoIterator<Item = M>>(iter: T) -> Self {
        Self::new(iter)
    }
}

/// The two kinds of [`Constraint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    Interval,
    Discrete,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interval => f.write_str("interval"),
            Self::Discrete => f.write_str("discrete"),
        }
    }
}

/// A constraint on a single dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constraint {
    Interval(Interval),
    Discrete(DiscreteSet),
}

impl Constraint {
    /// Shorthand for an [`Interval`] constraint.
    pub fn interval(lo: impl Into<Measure>, hi: impl Into<Measure>) -> Self {
        Self::Interval(Interval::new(lo, hi))
    }

    /// Shorthand for a [`DiscreteSet`] constraint.
    pub fn discrete<I, M>(values: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Measure>,
    {
        Self::Discrete(DiscreteSet::new(values))
    }

    pub const fn kind(&self) -> ConstraintKind {
        match self {
            Self::Interval(_) => ConstraintKind::Interval,
            Self::Discrete(_) => ConstraintKind::Discrete,
        }
    }

    /// Returns true if the point value satisfies this constraint.
    pub fn contains(&self, value: &Measure) -> bool {
        match self {
            Self::Interval(interval) => interval.contains(value),
            Self::Discrete(set) => set.contains(value),
        }
    }

    /// Returns true if the two constraints admit a common value.
    pub fn overlaps(&self, other: &Constraint) -> bool {
        match (self, other) {
            (Self::Interval(a), Self::Interval(b)) => a.overlaps(b),
            (Self::Interval(interval), Self::Discrete(set))
            | (Self::Discrete(set), Self::Interval(interval)) => set.intersects_interval(interval),
            (Self::Discrete(a), Self::Discrete(b)) => a.intersects(b),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interval(interval) => interval.fmt(f),
            Self::Discrete(set) => set.fmt(f),
        }
    }
}

impl From<Interval> for Constraint {
    fn from(interval: Interval) -> Self {
        Self::Interval(interval)
    }
}

impl From<DiscreteSet> for Constraint {
    fn from(set: DiscreteSet) -> Self {
        Self::Discrete(set)
    }
}

/// A mapping from dimension to constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Region {
    constraints: BTreeMap<Dimension, Constraint>,
}

impl Region {
    /// An empty region, unconstrained on every dimension.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Region::insert`].
    #[must_use]
    pub fn with(
        mut self,
        dimension: impl Into<Dimension>,
        constraint: impl Into<Constraint>,
    ) -> Self {
        self.insert(dimension, constraint);
        self
    }

    /// Set the constraint on `dimension`, returning the previous one.
    pub fn insert(
        &mut self,
        dimension: impl Into<Dimension>,
        constraint: impl Into<Constraint>,
    ) -> Option<Constraint> {
        self.constraints.insert(dimension.into(), constraint.into())
    }

    pub fn get(&self, dimension: &Dimension) -> Option<&Constraint> {
        self.constraints.get(dimension)
    }

    /// Number of constrained dimensions.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Iterate constrained dimensions in ascending dimension order.
    pub fn iter(&self) -> btree_map::Iter<'_, Dimension, Constraint> {
        self.constraints.iter()
    }

    /// A canonical, human-readable rendering of the region.
    ///
    /// Equal regions render the same key. The rendering does not escape
    /// dimension names, so distinct regions may collide; compare regions
    /// directly to detect duplicates.
    pub fn key(&self) -> String {
        self.constraints
            .iter()
            .map(|(dimension, constraint)| format!("{dimension}={constraint}"))
            .join(":")
    }

    /// Returns true if every constrained dimension has a value in `point`
    /// that the constraint accepts.
    pub fn contains_point(&self, point: &Point) -> bool {
        self.constraints.iter().all(|(dimension, constraint)| {
            point
                .get(dimension)
                .is_some_and(|value| constraint.contains(value))
        })
    }

    /// Returns true if every constrained dimension is also constrained by
    /// `query` and the two constraints overlap.
    pub fn overlaps(&self, query: &Region) -> bool {
        self.constraints.iter().all(|(dimension, constraint)| {
            query
                .get(dimension)
                .is_some_and(|other| constraint.overlaps(other))
        })
    }
}

impl<D: Into<Dimension>, C: Into<Constraint>> FromIterator<(D, C)> for Region {
    fn from_iter<T: IntoIterator<Item = (D, C)>>(iter: T) -> Self {
        let mut region = Self::new();
        for (dimension, constraint) in iter {
            region.insert(dimension, constraint);
        }
        region
    }
}

impl<'a> IntoIterator for &'a Region {
    type Item = (&'a Dimension, &'a Constraint);
    type IntoIter = btree_map::Iter<'a, Dimension, Constraint>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A query point: one concrete measure per dimension.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Point {
    values: BTreeMap<Dimension, Measure>,
}

impl Point {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Point::insert`].
    #[must_use]
    pub fn with(mut self, dimension: impl Into<Dimension>, value: impl Into<Measure>) -> Self {
        self.insert(dimension, value);
        self
    }

    pub fn insert(
        &mut self,
        dimension: impl Into<Dimension>,
        value: impl Into<Measure>,
    ) -> Option<Measure> {
        self.values.insert(dimension.into(), value.into())
    }

    pub fn get(&self, dimension: &Dimension) -> Option<&Measure> {
        self.values.get(dimension)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Dimension, Measure> {
        self.values.iter()
    }
}

impl<D: Into<Dimension>, M: Into<Measure>> FromIterator<(D, M)> for Point {
    fn from_iter<T: IntoIterator<Item = (D, M)>>(iter: T) -> Self {
        let mut point = Self::new();
        for (dimension, value) in iter {
            point.insert(dimension, value);
        }
        point
    }
}
