//! Gap analysis
//!
//! A not-found run is a maximal stretch of specification positions whose
//! identifiers appear nowhere in the state sequence. Runs are computed
//! fresh on every call and never cached.

use std::collections::HashSet;

use seqsync_core::{RecordId, RunKind};

use crate::{locate, locate_last};

/// Maximal run of spec identifiers absent from the state sequence.
/// Positions are 1-based and inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NotFoundRun {
    pub start: usize,
    pub end: usize,
}

impl NotFoundRun {
    /// Number of spec positions in the run, never zero
    #[allow(clippy::len_without_is_empty)]
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Whether the run covers every position of a spec of `spec_len`
    #[inline]
    pub fn spans(&self, spec_len: usize) -> bool {
        self.start == 1 && self.end == spec_len
    }

    pub fn classify(&self, spec_len: usize) -> RunKind {
        if self.start == 1 {
            RunKind::Leading
        } else if self.end == spec_len {
            RunKind::Trailing
        } else {
            RunKind::Sandwiched
        }
    }
}

/// Runs of spec identifiers that occur nowhere in `state`, ordered by start.
pub fn not_found_runs(spec: &[RecordId], state: &[RecordId]) -> Vec<NotFoundRun> {
    let present: HashSet<RecordId> = state.iter().copied().collect();
    let mut runs = Vec::new();
    let mut open: Option<usize> = None;

    for (idx, value) in spec.iter().enumerate() {
        let pos = idx + 1;
        match (present.contains(value), open) {
            (false, None) => open = Some(pos),
            (true, Some(start)) => {
                runs.push(NotFoundRun {
                    start,
                    end: pos - 1,
                });
                open = None;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        runs.push(NotFoundRun {
            start,
            end: spec.len(),
        });
    }

    runs
}

/// Whether `state` already reserves placeholders for every not-found run.
///
/// Leading runs need that many placeholders at the head, trailing runs at
/// the tail, and sandwiched runs need the gap between their anchors to be
/// at least as wide as in the spec. Surplus is allowed; this only answers
/// whether missing identifiers have somewhere to land.
pub fn has_placeholder_coverage(spec: &[RecordId], state: &[RecordId]) -> bool {
    not_found_runs(spec, state).iter().all(|run| {
        let len = run.len();
        if state.len() < len {
            return false;
        }
        match run.classify(spec.len()) {
            RunKind::Leading => state[..len].iter().all(|v| v.is_placeholder()),
            RunKind::Trailing => state[state.len() - len..].iter().all(|v| v.is_placeholder()),
            RunKind::Sandwiched => {
                let before = locate(spec[run.start - 2], state);
                let after = locate_last(spec[run.end], state);
                match (before, after) {
                    (Some(b), Some(a)) => a > b && a - b >= run.len() + 1,
                    _ => false,
                }
            }
        }
    })
}
