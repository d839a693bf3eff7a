/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! SegmentTree - an adaptive index for multi-dimensional rule matching.
//!
//! A segment is a [`Region`] (one [`Constraint`] per dimension it cares about)
//! carrying a set of payload values. Given a [`Point`] or a query [`Region`],
//! the tree returns the payloads of every matching segment without scanning
//! the full collection.
//!
//! # Overview
//!
//! Dimensions are declared up front as either continuous (constrained by an
//! [`Interval`]) or discrete (constrained by a [`DiscreteSet`]). Building the
//! tree recursively partitions the segment set:
//!
//! - a threshold split on a continuous dimension ([`BinarySplitNode`]),
//! - a per-value split on a discrete dimension ([`HashSplitNode`]),
//! - an inverted-index fallback when splitting stops paying off
//!   ([`ConjunctionNode`]), or
//! - a plain [`LeafNode`] scanned linearly.
//!
//! Segments that cannot be routed to one side of a split, such as those
//! unconstrained on the split dimension, go to the split's pass child, which
//! every query visits. Results are exact whatever shape the tree takes.
//!
//! # Example
//!
//! ```
//! use segment_tree::{
//!     Constraint, DimensionType, DimensionTypes, Point, Region, SegmentTree, TreeOptions,
//! };
//!
//! let types = DimensionTypes::new()
//!     .with("Field1", DimensionType::Discrete)
//!     .with("Field2", DimensionType::Continuous);
//! let tree = SegmentTree::new(types, TreeOptions::default());
//!
//! let region = Region::new()
//!     .with("Field1", Constraint::discrete(["one", "two", "three"]))
//!     .with("Field2", Constraint::interval(0.1, 2.0));
//! tree.add(region, "target1").unwrap();
//! tree.build();
//!
//! let hit = Point::new().with("Field1", "one").with("Field2", 0.3);
//! assert!(tree.search(&hit).contains("target1"));
//!
//! let miss = Point::new().with("Field1", "four").with("Field2", 0.3);
//! assert!(tree.search(&miss).is_empty());
//! ```

mod debug;
mod error;
mod iter;
mod measure;
mod node;
mod options;
mod region;
mod segment;
mod split;
mod tree;
mod unique_id;

pub use debug::TreeStats;
pub use error::SegmentTreeError;
pub use iter::{DepthPreOrderDfsIterator, PreOrderDfsIterator};
pub use measure::{Measure, MeasureKind};
pub use node::{
    BinarySplitNode, Branch, ConjunctionNode, HashSplitNode, IndexNode, LeafNode,
};
pub use options::{DimensionType, DimensionTypes, TreeOptions};
pub use region::{Constraint, ConstraintKind, Dimension, DiscreteSet, Interval, Point, Region};
pub use segment::{Segment, SharedSegment, merge_segments};
pub use split::{SplitChoice, SplitKind, SplitSelector, best_threshold, hottest_value};
pub use tree::SegmentTree;
pub use unique_id::TreeUniqueId;
