//! Specification and state sequence helpers
//!
//! Positions handed out by this crate are 1-based, matching the way record
//! slots are numbered by the capture side. Internally everything indexes
//! with plain `usize` offsets.

use crate::{RecordId, SeqError, SeqResult};

/// Check that a specification is strictly ascending and free of placeholders.
pub fn validate_spec(spec: &[RecordId]) -> SeqResult<()> {
    let mut prev = RecordId::PLACEHOLDER;
    for (idx, &value) in spec.iter().enumerate() {
        if value.is_placeholder() || value <= prev {
            return Err(SeqError::InvalidSpecification {
                position: idx + 1,
                value,
            });
        }
        prev = value;
    }
    Ok(())
}

/// Positional match: same length, and every slot is a placeholder or the spec value at
/// the same index.
pub fn positionally_consistent(spec: &[RecordId], state: &[RecordId]) -> bool {
    spec.len() == state.len()
        && spec
            .iter()
            .zip(state)
            .all(|(s, w)| w.is_placeholder() || w == s)
}

/// Assigned values of a state sequence, in order.
pub fn assigned_values(state: &[RecordId]) -> impl Iterator<Item = RecordId> + '_ {
    state.iter().copied().filter(|v| v.is_assigned())
}

/// Whether the assigned values of `state` appear in strictly ascending order.
///
/// Once every assigned value is known to be listed in an ascending
/// specification, this is the same as saying they appear in spec order.
pub fn assignments_ordered(state: &[RecordId]) -> bool {
    let mut prev = RecordId::PLACEHOLDER;
    for value in assigned_values(state) {
        if value <= prev {
            return false;
        }
        prev = value;
    }
    true
}

/// A fresh state sequence: one placeholder per specification entry.
pub fn placeholders(len: usize) -> Vec<RecordId> {
    vec![RecordId::PLACEHOLDER; len]
}
