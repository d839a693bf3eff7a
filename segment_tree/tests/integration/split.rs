/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Tests for `SplitSelector`.

use std::sync::Arc;

use segment_tree::{
    Constraint, Dimension, DimensionType, DimensionTypes, Measure, Region, Segment,
    SharedSegment, SplitKind, SplitSelector, hottest_value,
};

fn shared(regions: Vec<Region>) -> Vec<SharedSegment<usize>> {
    regions
        .into_iter()
        .enumerate()
        .map(|(i, region)| Arc::new(Segment::new(region, i)))
        .collect()
}

fn types() -> DimensionTypes {
    DimensionTypes::new()
        .with("color", DimensionType::Discrete)
        .with("price", DimensionType::Continuous)
}

#[test]
fn picks_dimension_with_largest_decrease() {
    // `price` splits 3/3 at 13; `color` is red almost everywhere.
    let segments = shared(
        (0..6)
            .map(|i| {
                let lo = if i < 3 { f64::from(i) } else { 10.0 + f64::from(i) };
                Region::new()
                    .with("color", Constraint::discrete([if i == 0 { "blue" } else { "red" }]))
                    .with("price", Constraint::interval(lo, lo + 0.5))
            })
            .collect(),
    );

    let choice = SplitSelector::new(&types(), 0.1).select(&segments).unwrap();
    assert_eq!(choice.dimension, Dimension::from("price"));
    assert_eq!(choice.kind, SplitKind::Threshold(Measure::float(13.0)));
    assert_eq!(choice.decrease, 3);
    assert_eq!(choice.decrease_fraction, 0.5);
}

#[test]
fn discrete_decrease_ignores_unconstrained_segments() {
    let mut regions: Vec<Region> = (0..4)
        .map(|i| Region::new().with("color", Constraint::discrete([format!("c{i}")])))
        .collect();
    regions.extend((0..6).map(|_| Region::new()));
    let segments = shared(regions);

    let (hottest, decrease) = hottest_value(&segments, &Dimension::from("color")).unwrap();
    assert_eq!(hottest, Measure::from("c0"));
    assert_eq!(decrease, 3);

    let choice = SplitSelector::new(&types(), 0.1).select(&segments).unwrap();
    assert_eq!(choice.kind, SplitKind::Partition { hottest: Measure::from("c0") });
    assert_eq!(choice.decrease_fraction, 0.3);
}

#[test]
fn no_split_below_threshold() {
    let segments = shared(
        (0..10)
            .map(|i| {
                let mut region = Region::new().with("color", Constraint::discrete(["red"]));
                if i == 0 {
                    region.insert("color", Constraint::discrete(["red", "blue"]));
                }
                region
            })
            .collect(),
    );
    assert!(SplitSelector::new(&types(), 0.1).select(&segments).is_none());
}

#[test]
fn fraction_threshold_is_inclusive() {
    let segments = shared(vec![
        Region::new().with("price", Constraint::interval(0.0, 1.0)),
        Region::new().with("price", Constraint::interval(2.0, 3.0)),
        Region::new(),
        Region::new(),
    ]);
    // decrease 1 of 4 segments.
    assert!(SplitSelector::new(&types(), 0.25).select(&segments).is_some());
    assert!(SplitSelector::new(&types(), 0.26).select(&segments).is_none());
}

#[test]
fn ties_go_to_the_first_dimension() {
    let segments = shared(vec![
        Region::new()
            .with("a", Constraint::interval(0.0, 1.0))
            .with("b", Constraint::interval(0.0, 1.0)),
        Region::new()
            .with("a", Constraint::interval(2.0, 3.0))
            .with("b", Constraint::interval(2.0, 3.0)),
    ]);
    let types = DimensionTypes::new()
        .with("b", DimensionType::Continuous)
        .with("a", DimensionType::Continuous);
    let choice = SplitSelector::new(&types, 0.1).select(&segments).unwrap();
    assert_eq!(choice.dimension, Dimension::from("a"));
}

#[test]
fn empty_segment_set() {
    let segments: Vec<SharedSegment<usize>> = Vec::new();
    assert!(SplitSelector::new(&types(), 0.1).select(&segments).is_none());
}
