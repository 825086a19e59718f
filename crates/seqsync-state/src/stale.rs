//! Stale value filtering
//!
//! A stale value is an assigned state slot whose identifier the current
//! specification no longer lists.

use seqsync_core::RecordId;

use crate::spec_contains;

/// Assigned values of `state` that `spec` does not list, in state order.
pub fn find_stale(state: &[RecordId], spec: &[RecordId]) -> Vec<RecordId> {
    state
        .iter()
        .copied()
        .filter(|&v| v.is_assigned() && !spec_contains(spec, v))
        .collect()
}
