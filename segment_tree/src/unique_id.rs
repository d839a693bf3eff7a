/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Per-instance identifier for [`SegmentTree`](crate::SegmentTree).

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_TREE_ID: AtomicU32 = AtomicU32::new(0);

/// Identifies one [`SegmentTree`](crate::SegmentTree) in logs and dumps.
///
/// Distinct trees in a process get distinct ids until the counter wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct TreeUniqueId(u32);

impl TreeUniqueId {
    pub(crate) fn next() -> Self {
        Self(NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TreeUniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<TreeUniqueId> for u32 {
    fn from(id: TreeUniqueId) -> Self {
        id.0
    }
}
