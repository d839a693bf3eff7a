/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Shared test helpers: a brute-force oracle and seeded segment generators.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use segment_tree::{
    Constraint, DimensionType, DimensionTypes, Point, Region, SegmentTree, TreeOptions,
};
use tracing_subscriber::filter::LevelFilter;

/// Route `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(LevelFilter::DEBUG)
        .try_init();
}

/// A flat list of (region, payload) rules, the reference the tree is checked against.
#[derive(Debug, Clone, Default)]
pub struct Oracle {
    pub rules: Vec<(Region, u32)>,
}

impl Oracle {
    pub fn push(&mut self, region: Region, value: u32) {
        self.rules.push((region, value));
    }

    pub fn search(&self, point: &Point) -> HashSet<u32> {
        self.rules
            .iter()
            .filter(|(region, _)| region.contains_point(point))
            .map(|(_, value)| *value)
            .collect()
    }

    pub fn search_region(&self, query: &Region) -> HashSet<u32> {
        self.rules
            .iter()
            .filter(|(region, _)| region.overlaps(query))
            .map(|(_, value)| *value)
            .collect()
    }

    pub fn remove(&mut self, value: u32) {
        self.rules.retain(|(_, v)| *v != value);
    }

    /// Build a tree holding the same rules.
    pub fn tree(&self, types: &DimensionTypes, options: TreeOptions) -> SegmentTree<u32> {
        let tree = SegmentTree::new(types.clone(), options);
        for (region, value) in &self.rules {
            tree.add(region.clone(), *value).expect("generated regions are valid");
        }
        tree.build();
        tree
    }
}

pub const DISCRETE_DIMENSIONS: usize = 10;
pub const DISCRETE_VALUES: usize = 6;

pub fn discrete_dimension(i: usize) -> String {
    format!("d{i}")
}

pub fn discrete_value(i: usize) -> String {
    format!("v{i}")
}

pub fn discrete_types() -> DimensionTypes {
    (0..DISCRETE_DIMENSIONS)
        .map(|i| (discrete_dimension(i), DimensionType::Discrete))
        .collect()
}

/// `count` rules over [`DISCRETE_DIMENSIONS`] discrete dimensions, each
/// constraining `populated` of them with one to three values.
pub fn random_discrete_rules(seed: u64, count: usize, populated: usize) -> Oracle {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut oracle = Oracle::default();
    for value in 0..count {
        let mut region = Region::new();
        for dimension in rand::seq::index::sample(&mut rng, DISCRETE_DIMENSIONS, populated) {
            let size = rng.random_range(1..=3);
            let values: Vec<String> = rand::seq::index::sample(&mut rng, DISCRETE_VALUES, size)
                .into_iter()
                .map(discrete_value)
                .collect();
            region.insert(discrete_dimension(dimension), Constraint::discrete(values));
        }
        oracle.push(region, value as u32);
    }
    oracle
}

/// A point carrying a value on every discrete dimension.
pub fn random_discrete_point(rng: &mut StdRng) -> Point {
    (0..DISCRETE_DIMENSIONS)
        .map(|i| {
            (
                discrete_dimension(i),
                discrete_value(rng.random_range(0..DISCRETE_VALUES)),
            )
        })
        .collect()
}

pub const CONTINUOUS_DIMENSIONS: usize = 3;

pub fn continuous_dimension(i: usize) -> String {
    format!("c{i}")
}

pub fn continuous_types() -> DimensionTypes {
    (0..CONTINUOUS_DIMENSIONS)
        .map(|i| (continuous_dimension(i), DimensionType::Continuous))
        .collect()
}

/// `count` rules with integer-valued intervals in `[0, 100]`, each dimension
/// constrained with probability `density`.
pub fn random_continuous_rules(seed: u64, count: usize, density: f64) -> Oracle {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut oracle = Oracle::default();
    for value in 0..count {
        let mut region = Region::new();
        for i in 0..CONTINUOUS_DIMENSIONS {
            if rng.random_bool(density) {
                let lo = rng.random_range(0..100) as f64;
                let hi = lo + rng.random_range(0..20) as f64;
                region.insert(continuous_dimension(i), Constraint::interval(lo, hi));
            }
        }
        oracle.push(region, value as u32);
    }
    oracle
}

/// A point with integer-valued coordinates, so it often lands on interval bounds.
pub fn random_continuous_point(rng: &mut StdRng) -> Point {
    (0..CONTINUOUS_DIMENSIONS)
        .map(|i| (continuous_dimension(i), rng.random_range(-5..125) as f64))
        .collect()
}

/// Small options so even modest rule sets produce a deep tree.
pub fn small_options() -> TreeOptions {
    TreeOptions::default().with_leaf_max(2).with_level_max(12)
}
