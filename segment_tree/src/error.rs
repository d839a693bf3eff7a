/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

use thiserror::Error;

use crate::region::ConstraintKind;
use crate::{Dimension, DimensionType, MeasureKind};

/// Errors returned when a region is rejected by [`SegmentTree::add`](crate::SegmentTree::add)
/// or [`SegmentTree::insert`](crate::SegmentTree::insert).
///
/// Searches never fail: malformed data that slipped past validation degrades
/// to "no match".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentTreeError {
    /// A constraint kind does not match the dimension's declared type.
    #[error("dimension `{dimension}` is {declared} but got a {found} constraint")]
    DimensionTypeMismatch {
        dimension: Dimension,
        declared: DimensionType,
        found: ConstraintKind,
    },
    /// The region constrains a dimension the index does not declare.
    #[error("dimension `{0}` is not declared")]
    UnknownDimension(Dimension),
    /// An interval's bounds cannot be ordered against each other.
    #[error("interval on dimension `{dimension}` has incomparable bounds ({lo} and {hi})")]
    IncomparableMeasure {
        dimension: Dimension,
        lo: MeasureKind,
        hi: MeasureKind,
    },
}
