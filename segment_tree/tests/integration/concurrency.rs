/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Searches racing rebuilds and inserts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use rand::SeedableRng;
use rand::rngs::StdRng;
use segment_tree::{Constraint, Point, Region, TreeOptions};

use crate::helpers::{
    continuous_types, discrete_types, random_continuous_point, random_continuous_rules,
    random_discrete_point, random_discrete_rules,
};

#[test]
fn searches_see_complete_trees_during_rebuilds() {
    let oracle = random_discrete_rules(97, 400, 5);
    let tree = oracle.tree(&discrete_types(), TreeOptions::default().with_leaf_max(4));
    let done = AtomicBool::new(false);

    thread::scope(|scope| {
        for seed in 0..4u64 {
            let (tree, oracle, done) = (&tree, &oracle, &done);
            scope.spawn(move || {
                let mut rng = StdRng::seed_from_u64(seed);
                while !done.load(Ordering::Relaxed) {
                    let point = random_discrete_point(&mut rng);
                    // The rule set never changes, so every tree answers the same.
                    assert_eq!(tree.search(&point), oracle.search(&point));
                }
            });
        }

        for _ in 0..20 {
            tree.build();
        }
        done.store(true, Ordering::Relaxed);
    });

    assert_eq!(tree.revision(), 21);
}

#[test]
fn inserts_race_searches() {
    let oracle = random_continuous_rules(101, 200, 0.7);
    let tree = oracle.tree(&continuous_types(), TreeOptions::default().with_leaf_max(4));
    let done = AtomicBool::new(false);

    thread::scope(|scope| {
        let (tree_ref, oracle_ref, done_ref) = (&tree, &oracle, &done);
        scope.spawn(move || {
            let mut rng = StdRng::seed_from_u64(103);
            while !done_ref.load(Ordering::Relaxed) {
                let point = random_continuous_point(&mut rng);
                // Inserted rules only add matches.
                let found = tree_ref.search(&point);
                assert!(oracle_ref.search(&point).is_subset(&found));
            }
        });

        for value in 0..100u32 {
            let lo = f64::from(value);
            let region = Region::new().with("c0", Constraint::interval(lo, lo + 0.5));
            tree.insert(region, 10_000 + value).unwrap();
        }
        done.store(true, Ordering::Relaxed);
    });

    for value in 0..100u32 {
        let point = Point::new().with("c0", f64::from(value) + 0.25);
        assert!(tree.search(&point).contains(&(10_000 + value)));
    }
}
