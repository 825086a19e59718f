//! State reconciliation pipeline
//!
//! Phases run in a fixed order, each re-reading both sequences from
//! scratch:
//!
//! 1. RemoveStale - delete assigned values the spec no longer lists
//! 2. FixGaps     - apply planner edits until every not-found run fits
//! 3. TrimSurplus - drop placeholders while the state is too long
//!
//! Positional match is checked explicitly before a call reports convergence.

use seqsync_core::{
    assignments_ordered, invariants::Invariant, positionally_consistent, validate_spec, EditKind,
    NullSink, Phase, RecordId, SeqError, SeqResult, TraceEvent, TraceSink,
};
use tracing::{debug, warn};

use crate::{apply, delete_at, find_stale, gap_mismatch, locate, plan_fix_traced, surplus_position};

/// Reconciler configuration
#[derive(Clone, Debug)]
pub struct ReconcileConfig {
    /// Also check value preservation and no invention against a snapshot
    /// taken on entry. Positional match is always checked.
    pub verify_invariants: bool,
    /// Hard cap on edits per call. `None` derives a cap from the input
    /// lengths that a consistent pair can never reach.
    pub edit_budget: Option<usize>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        ReconcileConfig {
            verify_invariants: true,
            edit_budget: None,
        }
    }
}

impl ReconcileConfig {
    /// Skip the snapshot check
    pub fn fast() -> Self {
        ReconcileConfig {
            verify_invariants: false,
            edit_budget: None,
        }
    }

    /// Fixed edit budget, invariants verified
    pub fn with_budget(edit_budget: usize) -> Self {
        ReconcileConfig {
            verify_invariants: true,
            edit_budget: Some(edit_budget),
        }
    }

    fn budget_for(&self, spec_len: usize, state_len: usize) -> usize {
        self.edit_budget
            .unwrap_or(4 * (spec_len + state_len) + 8)
    }
}

/// Edit counts for one reconciliation call
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub stale_removed: u32,
    pub inserted: u32,
    pub deleted: u32,
}

impl ReconcileReport {
    /// Total number of edits applied
    pub fn edits(&self) -> u32 {
        self.stale_removed + self.inserted + self.deleted
    }

    #[inline]
    pub fn is_noop(&self) -> bool {
        self.edits() == 0
    }
}

/// Result of one reconciliation call
pub type ReconcileResult = SeqResult<ReconcileReport>;

/// Bookkeeping for a single call
struct Pass {
    phase: Phase,
    budget: usize,
    report: ReconcileReport,
}

impl Pass {
    fn enter(&mut self, phase: Phase) {
        debug!(from = %self.phase, to = %phase, "phase transition");
        self.phase = phase;
    }

    fn spend(&mut self) -> SeqResult<()> {
        if self.budget == 0 {
            return Err(SeqError::no_progress(self.phase, "edit budget exhausted"));
        }
        self.budget -= 1;
        Ok(())
    }

    fn count(&mut self, kind: EditKind) {
        match kind {
            EditKind::Insert => self.report.inserted += 1,
            EditKind::Delete => self.report.deleted += 1,
        }
    }
}

/// State reconciliation engine
pub struct Reconciler<S = NullSink> {
    config: ReconcileConfig,
    sink: S,
}

impl Reconciler<NullSink> {
    pub fn new(config: ReconcileConfig) -> Self {
        Reconciler {
            config,
            sink: NullSink,
        }
    }
}

impl Default for Reconciler<NullSink> {
    fn default() -> Self {
        Self::new(ReconcileConfig::default())
    }
}

impl<S: TraceSink> Reconciler<S> {
    /// Route trace events to `sink`
    pub fn with_sink<T: TraceSink>(self, sink: T) -> Reconciler<T> {
        Reconciler {
            config: self.config,
            sink,
        }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Get reference to the trace sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Patch `state` in place until it matches `spec` positionally.
    ///
    /// On failure `state` is left at its last intermediate form. Every edit
    /// made up to that point was a placeholder edit or a stale removal, so
    /// no still-valid assignment is lost.
    pub fn reconcile(&mut self, spec: &[RecordId], state: &mut Vec<RecordId>) -> ReconcileResult {
        validate_spec(spec)?;

        if positionally_consistent(spec, state) {
            debug!(len = spec.len(), "state already consistent");
            return Ok(ReconcileReport::default());
        }

        let snapshot = self.config.verify_invariants.then(|| state.clone());
        let mut pass = Pass {
            phase: Phase::RemoveStale,
            budget: self.config.budget_for(spec.len(), state.len()),
            report: ReconcileReport::default(),
        };

        let outcome = self
            .run_phases(spec, state, &mut pass)
            .and_then(|()| verify(spec, snapshot.as_deref(), state));

        match outcome {
            Ok(()) => {
                pass.enter(Phase::Converged);
                debug!(
                    stale_removed = pass.report.stale_removed,
                    inserted = pass.report.inserted,
                    deleted = pass.report.deleted,
                    "reconciled"
                );
                Ok(pass.report)
            }
            Err(err) => {
                warn!(phase = %pass.phase, error = %err, "reconciliation failed");
                pass.enter(Phase::Failed);
                Err(err)
            }
        }
    }

    fn run_phases(
        &mut self,
        spec: &[RecordId],
        state: &mut Vec<RecordId>,
        pass: &mut Pass,
    ) -> SeqResult<()> {
        self.remove_stale(spec, state, pass)?;
        pass.enter(Phase::FixGaps);
        self.fix_gaps(spec, state, pass)?;
        pass.enter(Phase::TrimSurplus);
        self.trim_surplus(spec, state, pass)
    }

    /// Stage 1: drop assigned values the spec no longer lists, first
    /// occurrence first. Each removal shifts everything after it, so the
    /// scan restarts every time.
    fn remove_stale(
        &mut self,
        spec: &[RecordId],
        state: &mut Vec<RecordId>,
        pass: &mut Pass,
    ) -> SeqResult<()> {
        loop {
            let Some(&value) = find_stale(state, spec).first() else {
                return Ok(());
            };
            let position = locate(value, state).ok_or(SeqError::StaleUnresolvable { value })?;

            pass.spend()?;
            delete_at(state, position)?;
            pass.report.stale_removed += 1;
            debug!(%value, position, "removed stale value");
            self.sink.record(TraceEvent::StaleRemoved { value, position });
        }
    }

    /// Stage 2: close every not-found run, one planner edit at a time.
    fn fix_gaps(
        &mut self,
        spec: &[RecordId],
        state: &mut Vec<RecordId>,
        pass: &mut Pass,
    ) -> SeqResult<()> {
        if !assignments_ordered(state) {
            return Err(SeqError::no_progress(
                Phase::FixGaps,
                "assigned values contradict the specification order",
            ));
        }

        let mut mismatch = gap_mismatch(spec, state)?;
        loop {
            let patch = plan_fix_traced(spec, state, &mut self.sink)?;
            let Some((kind, position)) = patch.edit() else {
                break;
            };

            pass.spend()?;
            apply(state, patch)?;
            pass.count(kind);
            debug!(%patch, len = state.len(), "applied gap edit");
            self.sink.record(TraceEvent::EditApplied { kind, position });

            let next = gap_mismatch(spec, state)?;
            if next >= mismatch {
                return Err(SeqError::no_progress(
                    Phase::FixGaps,
                    format!("{} left the gap mismatch at {}", patch, next),
                ));
            }
            mismatch = next;
        }

        if state.len() < spec.len() {
            return Err(SeqError::no_progress(
                Phase::FixGaps,
                format!(
                    "state is {} slots short with no gap edit left",
                    spec.len() - state.len()
                ),
            ));
        }
        Ok(())
    }

    /// Stage 3: trim placeholders while the state is longer than the spec.
    fn trim_surplus(
        &mut self,
        spec: &[RecordId],
        state: &mut Vec<RecordId>,
        pass: &mut Pass,
    ) -> SeqResult<()> {
        while state.len() > spec.len() {
            let position = surplus_position(spec, state).ok_or_else(|| {
                SeqError::no_progress(Phase::TrimSurplus, "no removable placeholder")
            })?;

            pass.spend()?;
            delete_at(state, position)?;
            pass.count(EditKind::Delete);
            debug!(position, len = state.len(), "trimmed surplus placeholder");
            self.sink.record(TraceEvent::EditApplied {
                kind: EditKind::Delete,
                position,
            });
        }
        Ok(())
    }
}

fn verify(spec: &[RecordId], snapshot: Option<&[RecordId]>, state: &[RecordId]) -> SeqResult<()> {
    Invariant::PositionalMatch.check(spec, snapshot.unwrap_or_default(), state)?;
    if let Some(before) = snapshot {
        Invariant::ValuePreservation.check(spec, before, state)?;
        Invariant::NoInvention.check(spec, before, state)?;
    }
    Ok(())
}

/// Reconcile with the default configuration and no trace sink.
pub fn reconcile(spec: &[RecordId], state: &mut Vec<RecordId>) -> ReconcileResult {
    Reconciler::default().reconcile(spec, state)
}
