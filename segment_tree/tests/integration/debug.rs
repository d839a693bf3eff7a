/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Snapshot tests for `SegmentTree::dump` and `SegmentTree::stats`.

use pretty_assertions::assert_eq;
use segment_tree::{
    Constraint, DimensionType, DimensionTypes, Region, SegmentTree, TreeOptions, TreeStats,
};

fn one_per_leaf() -> TreeOptions {
    TreeOptions::default().with_leaf_max(1)
}

fn interval_tree() -> SegmentTree<u32> {
    let types = DimensionTypes::new().with("x", DimensionType::Continuous);
    let tree = SegmentTree::new(types, one_per_leaf());
    for (i, lo) in [0.0, 2.0, 4.0, 6.0].into_iter().enumerate() {
        tree.add(Region::new().with("x", Constraint::interval(lo, lo + 1.0)), i as u32)
            .unwrap();
    }
    tree.add(Region::new(), 4).unwrap();
    tree.build();
    tree
}

#[test]
fn dump_empty_tree() {
    let tree = SegmentTree::<u32>::new(DimensionTypes::new(), TreeOptions::default());
    insta::assert_snapshot!(tree.dump(), @"-empty");
}

#[test]
fn dump_binary_splits() {
    let tree = interval_tree();
    insta::assert_snapshot!(tree.dump(), @r"
    -bnode{dim:x, decrease:0.40, mid:4}
      left: -bnode{dim:x, decrease:0.50, mid:2}
        left: -leaf{size=1}
        right: -leaf{size=1}
      right: -bnode{dim:x, decrease:0.50, mid:6}
        left: -leaf{size=1}
        right: -leaf{size=1}
      pass: -leaf{size=1}
    ");
}

#[test]
fn dump_hash_split() {
    let types = DimensionTypes::new().with("color", DimensionType::Discrete);
    let tree = SegmentTree::new(types, one_per_leaf());
    tree.add(Region::new().with("color", Constraint::discrete(["red"])), 0)
        .unwrap();
    tree.add(Region::new().with("color", Constraint::discrete(["blue"])), 1)
        .unwrap();
    tree.add(Region::new().with("color", Constraint::discrete(["green"])), 2)
        .unwrap();
    tree.add(Region::new().with("color", Constraint::discrete(["red", "blue"])), 3)
        .unwrap();
    tree.build();

    insta::assert_snapshot!(tree.dump(), @r#"
    -hnode{dim:color, decrease:0.50, fan_out:3}
      "blue": -leaf{size=2}
      "green": -leaf{size=1}
      "red": -leaf{size=2}
    "#);
}

#[test]
fn dump_conjunction() {
    let types = DimensionTypes::new()
        .with("a", DimensionType::Discrete)
        .with("b", DimensionType::Discrete);
    let options = TreeOptions::default()
        .with_leaf_max(2)
        .with_branching_decrease_min(1.0)
        .with_conjunction_target_rate_min(1.0);
    let tree = SegmentTree::new(types, options);
    for i in 0..6u32 {
        let region = Region::new()
            .with("a", Constraint::discrete([format!("a{}", i % 3)]))
            .with("b", Constraint::discrete([format!("b{}", i % 2)]));
        tree.add(region, i).unwrap();
    }
    tree.build();

    // Buckets of size 2 on `a` and 3 on `b`.
    insta::assert_snapshot!(tree.dump(), @"-cnode{dims:2, size=6, cost=5}");
}

#[test]
fn stats_count_node_kinds() {
    let tree = interval_tree();
    assert_eq!(
        tree.stats(),
        TreeStats {
            nodes: 8,
            leaves: 5,
            binary_splits: 3,
            hash_splits: 0,
            conjunctions: 0,
            max_depth: 3,
            indexed_segments: 5,
        }
    );
}
