//! Trace event definitions
//!
//! Trace events describe what a reconciliation did, step by step. They are
//! purely informational: a sink can record or drop them, it never steers
//! the algorithm.

use std::fmt;

use crate::{EditKind, RecordId};

/// Reconciliation phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    RemoveStale,
    FixGaps,
    TrimSurplus,
    Converged,
    Failed,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::RemoveStale => "remove-stale",
            Phase::FixGaps => "fix-gaps",
            Phase::TrimSurplus => "trim-surplus",
            Phase::Converged => "converged",
            Phase::Failed => "failed",
        }
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Converged | Phase::Failed)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a not-found run sits relative to the specification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunKind {
    /// Starts at spec position 1
    Leading,
    /// Ends at the last spec position and does not start at 1
    Trailing,
    /// Bounded by found identifiers on both sides
    Sandwiched,
}

impl fmt::Display for RunKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunKind::Leading => write!(f, "leading"),
            RunKind::Trailing => write!(f, "trailing"),
            RunKind::Sandwiched => write!(f, "sandwiched"),
        }
    }
}

/// One observable reconciliation step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceEvent {
    /// A stale value was deleted from the state sequence
    StaleRemoved { value: RecordId, position: usize },
    /// A not-found run was examined by the planner
    RunDetected {
        start: usize,
        end: usize,
        kind: RunKind,
    },
    /// A placeholder edit was applied
    EditApplied { kind: EditKind, position: usize },
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::StaleRemoved { value, position } => {
                write!(f, "stale-removed({} @ {})", value, position)
            }
            TraceEvent::RunDetected { start, end, kind } => {
                write!(f, "run-detected({}..={}, {})", start, end, kind)
            }
            TraceEvent::EditApplied { kind, position } => {
                write!(f, "edit-applied({}, {})", kind, position)
            }
        }
    }
}

/// Receiver for trace events
pub trait TraceSink {
    fn record(&mut self, event: TraceEvent);
}

/// Sink that drops every event
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl TraceSink for NullSink {
    #[inline]
    fn record(&mut self, _event: TraceEvent) {}
}

impl TraceSink for Vec<TraceEvent> {
    fn record(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

impl<T: TraceSink + ?Sized> TraceSink for &mut T {
    fn record(&mut self, event: TraceEvent) {
        (**self).record(event);
    }
}
