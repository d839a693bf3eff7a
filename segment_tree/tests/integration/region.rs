/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Tests for constraint, region and segment semantics.

use std::collections::HashSet;

use pretty_assertions::assert_eq;
use segment_tree::{
    Constraint, Dimension, DiscreteSet, Interval, Measure, Point, Region, Segment, merge_segments,
};

#[test]
fn interval_bounds_are_inclusive() {
    let interval = Interval::new(0.2, 1.0);
    assert!(interval.contains(&Measure::float(0.2)));
    assert!(interval.contains(&Measure::float(1.0)));
    assert!(!interval.contains(&Measure::float(1.000_001)));
}

#[test]
fn discrete_set_membership() {
    let set = Constraint::discrete(["a", "b"]);
    assert!(set.contains(&Measure::from("a")));
    assert!(!set.contains(&Measure::from("c")));
}

#[test]
fn unbounded_interval_overlaps_everything() {
    let unbounded = Constraint::Interval(Interval::unbounded());
    assert!(unbounded.contains(&Measure::float(-1e300)));
    assert!(unbounded.contains(&Measure::from("text")));
    assert!(unbounded.overlaps(&Constraint::interval(5.0, 6.0)));
    assert!(unbounded.overlaps(&Constraint::discrete(["x"])));
}

#[test]
fn empty_interval_matches_nothing() {
    let reversed = Interval::new(3.0, 1.0);
    assert!(reversed.is_empty());
    assert!(!reversed.contains(&Measure::float(2.0)));
    assert!(!reversed.overlaps(&Interval::unbounded()));
}

#[test]
fn constraint_overlap_across_kinds() {
    let interval = Constraint::interval(1.0, 5.0);
    assert!(interval.overlaps(&Constraint::discrete([0.0, 3.0])));
    assert!(!interval.overlaps(&Constraint::discrete([0.0, 6.0])));
    assert!(Constraint::discrete([2.0, 9.0]).overlaps(&interval));
    assert!(Constraint::discrete(["a", "b"]).overlaps(&Constraint::discrete(["b", "c"])));
    assert!(!Constraint::discrete(["a"]).overlaps(&Constraint::discrete(["b"])));
    assert!(interval.overlaps(&Constraint::interval(5.0, 8.0)));
    assert!(!interval.overlaps(&Constraint::interval(5.5, 8.0)));
}

#[test]
fn region_requires_every_constrained_dimension() {
    let region = Region::new()
        .with("a", Constraint::discrete(["x"]))
        .with("b", Constraint::interval(0.0, 1.0));

    assert!(region.contains_point(&Point::new().with("a", "x").with("b", 0.5).with("c", 9.0)));
    assert!(!region.contains_point(&Point::new().with("a", "x")));
    assert!(Region::new().contains_point(&Point::new()));

    let query = Region::new()
        .with("a", Constraint::discrete(["x", "y"]))
        .with("b", Constraint::interval(0.9, 3.0));
    assert!(region.overlaps(&query));
    assert!(!region.overlaps(&Region::new().with("a", Constraint::discrete(["x"]))));
}

#[test]
fn region_key_is_canonical() {
    let a = Region::new()
        .with("b", Constraint::interval(0.0, 1.5))
        .with("a", Constraint::discrete(["y", "x", "x"]));
    let b: Region = [
        ("a", Constraint::discrete(["x", "y"])),
        ("b", Constraint::interval(0.0, 1.5)),
    ]
    .into_iter()
    .collect();

    assert_eq!(a.key(), b.key());
    assert_eq!(a.key(), r#"a={"x","y"}:b=[0, 1.5]"#);
    assert_eq!(a, b);
}

#[test]
fn dimension_ids_and_names() {
    let region = Region::new()
        .with(3u64, Constraint::interval(0.0, 1.0))
        .with("name", Constraint::discrete(["v"]));
    assert!(region.get(&Dimension::Id(3)).is_some());
    assert!(region.get(&Dimension::from("name")).is_some());
    assert!(region.get(&Dimension::from("3")).is_none());
    assert_eq!(region.key(), r#"3=[0, 1]:name={"v"}"#);
}

#[test]
fn merge_unions_payloads_of_identical_regions() {
    let region = Region::new().with("a", Constraint::discrete(["x"]));
    let other = Region::new().with("a", Constraint::discrete(["y"]));
    let merged = merge_segments(vec![
        Segment::new(region.clone(), 1),
        Segment::new(other.clone(), 2),
        Segment::new(region.clone(), 3),
        Segment::new(region.clone(), 1),
    ]);

    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].region(), &region);
    assert_eq!(merged[0].payload(), &HashSet::from([1, 3]));
    assert_eq!(merged[1].region(), &other);
    assert_eq!(merged[1].payload(), &HashSet::from([2]));
}

#[test]
fn discrete_set_from_iterator() {
    let set: DiscreteSet = ["b", "a", "b"].into_iter().collect();
    assert_eq!(set.len(), 2);
    assert_eq!(set.values(), &[Measure::from("a"), Measure::from("b")]);
}

#[test]
fn merge_keeps_regions_with_colliding_renderings_apart() {
    let by_id = Region::new().with(1u64, Constraint::interval(0.0, 1.0));
    let by_name = Region::new().with("1", Constraint::interval(0.0, 1.0));
    assert_eq!(by_id.key(), by_name.key());
    assert_ne!(by_id, by_name);

    let merged = merge_segments(vec![
        Segment::new(by_id.clone(), 1),
        Segment::new(by_name.clone(), 2),
    ]);

    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].payload(), &HashSet::from([1]));
    assert_eq!(merged[1].payload(), &HashSet::from([2]));
}
