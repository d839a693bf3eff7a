/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Debug and introspection utilities.
//!
//! The dump format is meant for humans and is not a stability contract.
//! Each node is printed on its own line, children indented below their
//! parent and labelled with the branch they hang from:
//!
//! ```text
//! -bnode{dim:price, decrease:0.40, mid:10}
//!   left: -leaf{size=2}
//!   right: -hnode{dim:color, decrease:0.50, fan_out:2}
//!     "blue": -leaf{size=1}
//!     "red": -leaf{size=1}
//!   pass: -leaf{size=1}
//! ```

use std::fmt::Write as _;

use crate::{Branch, IndexNode, SegmentTree};

/// Counts describing the shape of a built tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub nodes: usize,
    pub leaves: usize,
    pub binary_splits: usize,
    pub hash_splits: usize,
    pub conjunctions: usize,
    /// Depth of the deepest node. The root has depth 1.
    pub max_depth: usize,
    /// Segment references held by leaves and conjunction nodes. A segment
    /// replicated across hash buckets is counted once per bucket.
    pub indexed_segments: usize,
}

impl<D> SegmentTree<D> {
    /// Render the live tree, one node per line.
    pub fn dump(&self) -> String {
        self.with_root(|root| {
            let mut out = String::new();
            match root {
                Some(root) => dump_node(&mut out, root, 0),
                None => out.push_str("-empty\n"),
            }
            out
        })
    }
}

fn dump_node<D>(out: &mut String, node: &IndexNode<D>, indent: usize) {
    // Writing to a String cannot fail.
    let _ = match node {
        IndexNode::Leaf(leaf) => writeln!(out, "-leaf{{size={}}}", leaf.len()),
        IndexNode::BinarySplit(split) => writeln!(
            out,
            "-bnode{{dim:{}, decrease:{:.2}, mid:{}}}",
            split.dimension(),
            split.decrease(),
            split.mid()
        ),
        IndexNode::HashSplit(split) => writeln!(
            out,
            "-hnode{{dim:{}, decrease:{:.2}, fan_out:{}}}",
            split.dimension(),
            split.decrease(),
            split.fan_out()
        ),
        IndexNode::Conjunction(conjunction) => writeln!(
            out,
            "-cnode{{dims:{}, size={}, cost={}}}",
            conjunction.indexed_dimensions(),
            conjunction.len(),
            conjunction.cost()
        ),
    };

    for (branch, child) in node.children() {
        out.push_str(&"  ".repeat(indent + 1));
        let _ = match branch {
            Branch::Left => write!(out, "left: "),
            Branch::Right => write!(out, "right: "),
            Branch::Bucket(value) => write!(out, "{value}: "),
            Branch::Pass => write!(out, "pass: "),
        };
        dump_node(out, child, indent + 1);
    }
}
