//! seqsync Hard Invariants
//!
//! These hold for every state sequence handed back by a successful
//! reconciliation. A result that breaks one of them is reported as an
//! error, never returned as converged.
//!
//! # The Three Invariants
//!
//! 1. **Positional Match** - same length, each slot empty or equal to the spec
//! 2. **Value Preservation** - assigned ids still in the spec survive
//! 3. **No Invention** - reconciliation never writes an assigned id
//!
//! # Usage
//!
//! ```rust
//! use seqsync_core::invariants::{check_all_invariants, Invariant};
//! use seqsync_core::records;
//!
//! let spec = records(&[1, 8, 9, 10]);
//! let before = records(&[0, 0, 8, 0]);
//! let after = records(&[0, 8, 0, 0]);
//!
//! let violations = check_all_invariants(&spec, &before, &after);
//! assert!(violations.is_empty());
//! ```

use std::collections::HashSet;
use std::fmt;

use crate::{positionally_consistent, RecordId};

/// The three hard invariants of a reconciled pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Invariant {
    /// I1: Positional Match
    ///
    /// `len(state) == len(spec)` and every state slot is either the
    /// placeholder or the spec identifier at the same index.
    PositionalMatch = 1,

    /// I2: Value Preservation
    ///
    /// Every identifier assigned before reconciliation that is still listed
    /// in the specification is still assigned afterward. Its position may
    /// move, its value may not.
    ValuePreservation = 2,

    /// I3: No Invention
    ///
    /// Reconciliation only inserts or removes placeholder slots and removes
    /// stale values. The assigned values afterward are a subset of the
    /// assigned values before, intersected with the specification.
    NoInvention = 3,
}

impl Invariant {
    /// Get the invariant code (e.g., "I1")
    pub fn code(&self) -> &'static str {
        match self {
            Invariant::PositionalMatch => "I1",
            Invariant::ValuePreservation => "I2",
            Invariant::NoInvention => "I3",
        }
    }

    /// Get the short name of the invariant
    pub fn name(&self) -> &'static str {
        match self {
            Invariant::PositionalMatch => "Positional Match",
            Invariant::ValuePreservation => "Value Preservation",
            Invariant::NoInvention => "No Invention",
        }
    }

    /// Get all invariants
    pub fn all() -> &'static [Invariant] {
        &[
            Invariant::PositionalMatch,
            Invariant::ValuePreservation,
            Invariant::NoInvention,
        ]
    }

    /// Check this invariant for a reconciled pair.
    ///
    /// `before` is the state sequence as it was handed to reconciliation,
    /// `after` the sequence it produced.
    pub fn check(
        &self,
        spec: &[RecordId],
        before: &[RecordId],
        after: &[RecordId],
    ) -> Result<(), InvariantViolation> {
        let context = match self {
            Invariant::PositionalMatch => positional_mismatch(spec, after),
            Invariant::ValuePreservation => lost_values(spec, before, after),
            Invariant::NoInvention => invented_values(spec, before, after),
        };

        match context {
            None => Ok(()),
            Some(context) => Err(InvariantViolation {
                invariant: *self,
                context,
            }),
        }
    }
}

impl fmt::Display for Invariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.name())
    }
}

/// Invariant violation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    pub invariant: Invariant,
    pub context: String,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "seqsync Invariant Violation: {} - {}",
            self.invariant, self.context
        )
    }
}

impl std::error::Error for InvariantViolation {}

fn positional_mismatch(spec: &[RecordId], state: &[RecordId]) -> Option<String> {
    if positionally_consistent(spec, state) {
        return None;
    }
    if spec.len() != state.len() {
        return Some(format!(
            "state has {} slots, spec has {}",
            state.len(),
            spec.len()
        ));
    }
    spec.iter()
        .zip(state)
        .position(|(s, w)| w.is_assigned() && w != s)
        .map(|idx| {
            format!(
                "slot {} holds {} but spec expects {}",
                idx + 1,
                state[idx],
                spec[idx]
            )
        })
}

fn lost_values(spec: &[RecordId], before: &[RecordId], after: &[RecordId]) -> Option<String> {
    let listed: HashSet<RecordId> = spec.iter().copied().collect();
    let kept: HashSet<RecordId> = after.iter().copied().filter(|v| v.is_assigned()).collect();
    before
        .iter()
        .filter(|v| v.is_assigned() && listed.contains(v) && !kept.contains(v))
        .map(|v| format!("assigned value {} was lost", v))
        .next()
}

fn invented_values(spec: &[RecordId], before: &[RecordId], after: &[RecordId]) -> Option<String> {
    let listed: HashSet<RecordId> = spec.iter().copied().collect();
    let prior: HashSet<RecordId> = before.iter().copied().filter(|v| v.is_assigned()).collect();
    after
        .iter()
        .filter(|v| v.is_assigned() && !(prior.contains(v) && listed.contains(v)))
        .map(|v| format!("value {} appeared without a prior assignment", v))
        .next()
}

/// Assert that an invariant is satisfied, panicking if violated.
///
/// Use this in tests and fuzz targets to catch violations early.
///
/// # Panics
///
/// Panics if the invariant does not hold for the pair.
#[track_caller]
pub fn assert_invariant(
    invariant: Invariant,
    spec: &[RecordId],
    before: &[RecordId],
    after: &[RecordId],
) {
    if let Err(violation) = invariant.check(spec, before, after) {
        panic!("{}", violation);
    }
}

/// Check all invariants for a reconciled pair.
///
/// Returns a list of violated invariants.
pub fn check_all_invariants(
    spec: &[RecordId],
    before: &[RecordId],
    after: &[RecordId],
) -> Vec<InvariantViolation> {
    Invariant::all()
        .iter()
        .filter_map(|inv| inv.check(spec, before, after).err())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records;

    #[test]
    fn test_invariant_codes() {
        assert_eq!(Invariant::PositionalMatch.code(), "I1");
        assert_eq!(Invariant::ValuePreservation.code(), "I2");
        assert_eq!(Invariant::NoInvention.code(), "I3");
    }

    #[test]
    fn test_all_invariants() {
        assert_eq!(Invariant::all().len(), 3);
    }

    #[test]
    fn test_positional_match_length() {
        let spec = records(&[3, 13, 23]);
        let err = Invariant::PositionalMatch
            .check(&spec, &[], &records(&[0, 0]))
            .unwrap_err();
        assert!(err.context.contains("2 slots"));
    }

    #[test]
    fn test_positional_match_slot() {
        let spec = records(&[1, 5, 10]);
        let err = Invariant::PositionalMatch
            .check(&spec, &[], &records(&[1, 10, 0]))
            .unwrap_err();
        assert!(err.context.contains("slot 2"));
    }

    #[test]
    fn test_value_preservation() {
        let spec = records(&[5, 10, 15]);
        let before = records(&[5, 0, 15]);
        assert!(Invariant::ValuePreservation
            .check(&spec, &before, &records(&[5, 0, 15]))
            .is_ok());
        assert!(Invariant::ValuePreservation
            .check(&spec, &before, &records(&[5, 0, 0]))
            .is_err());
    }

    #[test]
    fn test_stale_values_may_disappear() {
        let spec = records(&[5, 10]);
        let before = records(&[5, 6, 10]);
        assert!(Invariant::ValuePreservation
            .check(&spec, &before, &records(&[5, 10]))
            .is_ok());
    }

    #[test]
    fn test_no_invention() {
        let spec = records(&[5, 10]);
        let before = records(&[0, 10]);
        assert!(Invariant::NoInvention
            .check(&spec, &before, &records(&[0, 10]))
            .is_ok());
        let err = Invariant::NoInvention
            .check(&spec, &before, &records(&[5, 10]))
            .unwrap_err();
        assert_eq!(err.invariant, Invariant::NoInvention);
    }

    #[test]
    #[should_panic(expected = "seqsync Invariant Violation")]
    fn test_assert_invariant_panics() {
        let spec = records(&[1]);
        assert_invariant(Invariant::PositionalMatch, &spec, &[], &[]);
    }

    #[test]
    fn test_check_all_invariants() {
        let spec = records(&[1, 2]);
        let before = records(&[1, 0]);
        let violations = check_all_invariants(&spec, &before, &records(&[0, 2]));

        let codes: Vec<_> = violations.iter().map(|v| v.invariant.code()).collect();
        assert_eq!(codes, vec!["I2", "I3"]);
    }

    #[test]
    fn test_invariant_display() {
        let display = format!("{}", Invariant::NoInvention);
        assert!(display.contains("I3"));
        assert!(display.contains("No Invention"));
    }
}
