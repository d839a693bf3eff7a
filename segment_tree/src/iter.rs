/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Depth-first traversal over index nodes.
//!
//! Used by [`SegmentTree::stats`](crate::SegmentTree::stats), the dump, and
//! the structural invariant checks.

use crate::IndexNode;

/// A pre-order depth-first traversal of a subtree.
///
/// The traversal uses an explicit stack, so deep trees cannot overflow the
/// call stack. Children are visited in [`IndexNode::children`] order.
#[derive(Debug)]
pub struct PreOrderDfsIterator<'a, D> {
    inner: DepthPreOrderDfsIterator<'a, D>,
}

impl<'a, D> PreOrderDfsIterator<'a, D> {
    pub fn new(root: &'a IndexNode<D>) -> Self {
        Self {
            inner: DepthPreOrderDfsIterator::new(root),
        }
    }
}

impl<'a, D> Iterator for PreOrderDfsIterator<'a, D> {
    type Item = &'a IndexNode<D>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, node)| node)
    }
}

/// Like [`PreOrderDfsIterator`], but yields each node with its depth.
///
/// The starting node has depth 1, matching the level the builder assigns
/// to a root.
#[derive(Debug)]
pub struct DepthPreOrderDfsIterator<'a, D> {
    /// Nodes still to visit. Children are pushed in reverse so the first
    /// child is popped first.
    stack: Vec<(usize, &'a IndexNode<D>)>,
}

impl<'a, D> DepthPreOrderDfsIterator<'a, D> {
    pub fn new(root: &'a IndexNode<D>) -> Self {
        let mut stack = Vec::with_capacity(8);
        stack.push((1, root));
        Self { stack }
    }
}

impl<'a, D> Iterator for DepthPreOrderDfsIterator<'a, D> {
    type Item = (usize, &'a IndexNode<D>);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack.extend(
            node.children()
                .into_iter()
                .rev()
                .map(|(_, child)| (depth + 1, child)),
        );
        Some((depth, node))
    }
}
