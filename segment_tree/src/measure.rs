/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Measure - the typed value stored at every dimension of a segment or point.
//!
//! Measures of the same concrete kind are totally ordered. The two sentinels,
//! [`Measure::NegativeInfinity`] and [`Measure::PositiveInfinity`], compare
//! below and above every other measure and are used for open-ended intervals.
//!
//! Measures of *different* concrete kinds (say a float and a string) are
//! incomparable: [`PartialOrd::partial_cmp`] returns `None`, which makes every
//! ordered comparison operator evaluate to `false`. A constraint evaluated
//! against an incomparable value therefore fails instead of panicking.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use ordered_float::OrderedFloat;

/// A concrete or sentinel value on one dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Measure {
    /// Below every other measure.
    NegativeInfinity,
    /// A floating point value. `NaN` sorts above every other float.
    Float(OrderedFloat<f64>),
    /// A string, ordered lexicographically by bytes.
    String(String),
    /// A UTC instant.
    Timestamp(DateTime<Utc>),
    /// Above every other measure.
    PositiveInfinity,
}

/// The kind of a [`Measure`], used in error messages and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MeasureKind {
    NegativeInfinity,
    Float,
    String,
    Timestamp,
    PositiveInfinity,
}

impl Measure {
    /// Shorthand for a [`Measure::Float`].
    pub const fn float(value: f64) -> Self {
        Self::Float(OrderedFloat(value))
    }

    /// The kind of this measure.
    pub const fn kind(&self) -> MeasureKind {
        match self {
            Self::NegativeInfinity => MeasureKind::NegativeInfinity,
            Self::Float(_) => MeasureKind::Float,
            Self::String(_) => MeasureKind::String,
            Self::Timestamp(_) => MeasureKind::Timestamp,
            Self::PositiveInfinity => MeasureKind::PositiveInfinity,
        }
    }

    /// Returns true for the two infinity sentinels.
    pub const fn is_sentinel(&self) -> bool {
        matches!(self, Self::NegativeInfinity | Self::PositiveInfinity)
    }

    /// Returns true if `self` and `other` can be ordered against each other.
    pub fn is_comparable(&self, other: &Self) -> bool {
        self.partial_cmp(other).is_some()
    }

    /// A total order over all measures, including incomparable ones.
    ///
    /// Concrete kinds are ranked `Float < String < Timestamp`, with the sentinels
    /// at the extremes. Restricted to comparable pairs this agrees with
    /// [`PartialOrd`], and `total_cmp(a, b) == Equal` iff `a == b`.
    ///
    /// Used for sorting, deduplication and deterministic tie-breaking during
    /// tree construction. Query-time constraint checks use [`PartialOrd`].
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Float(a), Self::Float(b)) => a.cmp(b),
            (Self::String(a), Self::String(b)) => a.cmp(b),
            (Self::Timestamp(a), Self::Timestamp(b)) => a.cmp(b),
            _ => self.kind().cmp(&other.kind()),
        }
    }
}

impl PartialOrd for Measure {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::NegativeInfinity, Self::NegativeInfinity)
            | (Self::PositiveInfinity, Self::PositiveInfinity) => Some(Ordering::Equal),
            (Self::NegativeInfinity, _) | (_, Self::PositiveInfinity) => Some(Ordering::Less),
            (_, Self::NegativeInfinity) | (Self::PositiveInfinity, _) => Some(Ordering::Greater),
            (Self::Float(a), Self::Float(b)) => Some(a.cmp(b)),
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Timestamp(a), Self::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeInfinity => f.write_str("-inf"),
            Self::Float(v) => write!(f, "{}", v.0),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Timestamp(t) => f.write_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::PositiveInfinity => f.write_str("+inf"),
        }
    }
}

impl fmt::Display for MeasureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NegativeInfinity => "-inf",
            Self::Float => "float",
            Self::String => "string",
            Self::Timestamp => "timestamp",
            Self::PositiveInfinity => "+inf",
        };
        f.write_str(name)
    }
}

impl From<f64> for Measure {
    fn from(value: f64) -> Self {
        Self::float(value)
    }
}

impl From<i32> for Measure {
    fn from(value: i32) -> Self {
        Self::float(f64::from(value))
    }
}

impl From<&str> for Measure {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Measure {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<DateTime<Utc>> for Measure {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}
