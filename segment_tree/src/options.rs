/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Dimension declarations and build options.
//!
//! Both types deserialize with `serde`, so an index can be configured from
//! any self-describing format. Missing option fields fall back to defaults.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::region::ConstraintKind;
use crate::{Dimension, Region, SegmentTreeError};

/// How a dimension is split and which constraint kind it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionType {
    /// Ordered values, constrained by [`Interval`](crate::Interval)s and split by threshold.
    Continuous,
    /// Unordered values, constrained by [`DiscreteSet`](crate::DiscreteSet)s and split by value.
    Discrete,
}

impl DimensionType {
    /// The constraint kind this dimension accepts.
    pub const fn accepts(self) -> ConstraintKind {
        match self {
            Self::Continuous => ConstraintKind::Interval,
            Self::Discrete => ConstraintKind::Discrete,
        }
    }
}

impl fmt::Display for DimensionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continuous => f.write_str("continuous"),
            Self::Discrete => f.write_str("discrete"),
        }
    }
}

/// The declared type of every dimension an index knows about.
///
/// Iteration follows [`Dimension`] order, which keeps split selection
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionTypes {
    types: BTreeMap<Dimension, DimensionType>,
}

impl DimensionTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`DimensionTypes::insert`].
    #[must_use]
    pub fn with(mut self, dimension: impl Into<Dimension>, ty: DimensionType) -> Self {
        self.insert(dimension, ty);
        self
    }

    pub fn insert(&mut self, dimension: impl Into<Dimension>, ty: DimensionType) {
        self.types.insert(dimension.into(), ty);
    }

    pub fn get(&self, dimension: &Dimension) -> Option<DimensionType> {
        self.types.get(dimension).copied()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Dimension, DimensionType)> {
        self.types.iter().map(|(dimension, ty)| (dimension, *ty))
    }

    /// Check that every constraint in `region` is on a declared dimension and
    /// has the kind that dimension accepts, and that interval bounds are
    /// mutually comparable.
    pub fn validate(&self, region: &Region) -> Result<(), SegmentTreeError> {
        for (dimension, constraint) in region {
            let declared = self
                .get(dimension)
                .ok_or_else(|| SegmentTreeError::UnknownDimension(dimension.clone()))?;
            if declared.accepts() != constraint.kind() {
                return Err(SegmentTreeError::DimensionTypeMismatch {
                    dimension: dimension.clone(),
                    declared,
                    found: constraint.kind(),
                });
            }
            if let crate::Constraint::Interval(interval) = constraint
                && !interval.lo().is_comparable(interval.hi())
            {
                return Err(SegmentTreeError::IncomparableMeasure {
                    dimension: dimension.clone(),
                    lo: interval.lo().kind(),
                    hi: interval.hi().kind(),
                });
            }
        }
        Ok(())
    }
}

impl<D: Into<Dimension>> FromIterator<(D, DimensionType)> for DimensionTypes {
    fn from_iter<T: IntoIterator<Item = (D, DimensionType)>>(iter: T) -> Self {
        let mut types = Self::new();
        for (dimension, ty) in iter {
            types.insert(dimension, ty);
        }
        types
    }
}

impl<'a> IntoIterator for &'a DimensionTypes {
    type Item = (&'a Dimension, &'a DimensionType);
    type IntoIter = btree_map::Iter<'a, Dimension, DimensionType>;

    fn into_iter(self) -> Self::IntoIter {
        self.types.iter()
    }
}

/// Options controlling the shape of a built tree.
///
/// Tree shape only affects query cost, never query results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeOptions {
    /// Nodes at this level or deeper are always leaves. The root is level 1.
    pub level_max: usize,
    /// Segment sets of at most this size become leaves without splitting.
    #[serde(alias = "leaf_min")]
    pub leaf_max: usize,
    /// Minimum fraction of segments a split must remove from the worst-case
    /// branch for the split to be taken.
    pub branching_decrease_min: f64,
    /// When set, enables the conjunction fallback for segment sets that cannot
    /// be split productively. The conjunction's estimated cost must stay below
    /// this fraction of `segments * dimensions`.
    pub conjunction_target_rate_min: Option<f64>,
}

impl TreeOptions {
    pub const DEFAULT_LEVEL_MAX: usize = 16;

    pub const DEFAULT_LEAF_MAX: usize = 16;

    pub const DEFAULT_BRANCHING_DECREASE_MIN: f64 = 0.1;

    #[must_use]
    pub const fn with_level_max(mut self, level_max: usize) -> Self {
        self.level_max = level_max;
        self
    }

    #[must_use]
    pub const fn with_leaf_max(mut self, leaf_max: usize) -> Self {
        self.leaf_max = leaf_max;
        self
    }

    #[must_use]
    pub const fn with_branching_decrease_min(mut self, fraction: f64) -> Self {
        self.branching_decrease_min = fraction;
        self
    }

    #[must_use]
    pub const fn with_conjunction_target_rate_min(mut self, rate: f64) -> Self {
        self.conjunction_target_rate_min = Some(rate);
        self
    }

    /// Replace unset or out-of-range values with their defaults.
    ///
    /// Zero means "use the default" for the integer options. The decrease
    /// fraction must lie in `(0, 1]`; a conjunction rate must be positive and
    /// finite or it is dropped.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.level_max == 0 {
            self.level_max = Self::DEFAULT_LEVEL_MAX;
        }
        if self.leaf_max == 0 {
            self.leaf_max = Self::DEFAULT_LEAF_MAX;
        }
        if !(self.branching_decrease_min > 0.0 && self.branching_decrease_min <= 1.0) {
            self.branching_decrease_min = Self::DEFAULT_BRANCHING_DECREASE_MIN;
        }
        self.conjunction_target_rate_min = self
            .conjunction_target_rate_min
            .filter(|rate| rate.is_finite() && *rate > 0.0);
        self
    }
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            level_max: Self::DEFAULT_LEVEL_MAX,
            leaf_max: Self::DEFAULT_LEAF_MAX,
            branching_decrease_min: Self::DEFAULT_BRANCHING_DECREASE_MIN,
            conjunction_target_rate_min: None,
        }
    }
}
