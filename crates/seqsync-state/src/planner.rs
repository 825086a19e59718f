//! Patch planning
//!
//! Each not-found run is measured against its anchors: the found
//! identifiers directly before and after it in the spec. A run is satisfied
//! when the state sequence leaves exactly as many slots around it as the
//! spec does. The planner walks the runs in order and returns one edit for
//! the first unsatisfied run, so it is meant to be called repeatedly until
//! it answers [`Patch::NoEdit`].

use seqsync_core::{
    NullSink, Patch, Phase, RecordId, RunKind, SeqError, SeqResult, TraceEvent, TraceSink,
};
use tracing::trace;

use crate::{locate, locate_last, nearest_anchor_after, not_found_runs, NotFoundRun};

/// Required vs actual width of one not-found run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunAssessment {
    pub run: NotFoundRun,
    pub kind: RunKind,
    /// Width the spec asks for
    pub required: usize,
    /// Width the state sequence currently has
    pub actual: usize,
    /// Edit that widens the state side by one slot
    grow: Patch,
    /// Edit that narrows the state side by one slot
    shrink: Patch,
}

impl RunAssessment {
    #[inline]
    pub fn mismatch(&self) -> usize {
        self.required.abs_diff(self.actual)
    }

    #[inline]
    pub fn is_satisfied(&self) -> bool {
        self.required == self.actual
    }

    /// The single edit that moves this run toward satisfaction.
    pub fn patch(&self) -> Patch {
        if self.is_satisfied() {
            Patch::NoEdit
        } else if self.actual < self.required {
            self.grow
        } else {
            self.shrink
        }
    }
}

fn no_progress(detail: String) -> SeqError {
    SeqError::no_progress(Phase::FixGaps, detail)
}

fn state_position(value: RecordId, state: &[RecordId], from_tail: bool) -> SeqResult<usize> {
    let found = if from_tail {
        locate_last(value, state)
    } else {
        locate(value, state)
    };
    found.ok_or_else(|| no_progress(format!("anchor {} is missing from the state", value)))
}

/// Measure one run against its anchors.
pub fn assess_run(
    run: NotFoundRun,
    spec: &[RecordId],
    state: &[RecordId],
) -> SeqResult<RunAssessment> {
    let kind = run.classify(spec.len());
    let (required, actual, grow, shrink) = match kind {
        RunKind::Leading if run.spans(spec.len()) => (
            spec.len(),
            state.len(),
            Patch::InsertAt(0),
            Patch::DeleteAt(1),
        ),
        RunKind::Leading => {
            let after_in_spec = run.end + 1;
            let after_in_state = state_position(spec[run.end], state, false)?;
            (after_in_spec, after_in_state, Patch::InsertAt(0), Patch::DeleteAt(1))
        }
        RunKind::Trailing => {
            let before_in_spec = run.start - 1;
            let before_in_state = state_position(spec[run.start - 2], state, true)?;
            (
                spec.len() - before_in_spec,
                state.len() - before_in_state,
                Patch::InsertAt(state.len()),
                Patch::DeleteAt(state.len()),
            )
        }
        RunKind::Sandwiched => {
            let before_in_state = state_position(spec[run.start - 2], state, false)?;
            let after_in_state = state_position(spec[run.end], state, false)?;
            if after_in_state <= before_in_state {
                return Err(no_progress(format!(
                    "anchors {} and {} are out of order in the state",
                    spec[run.start - 2],
                    spec[run.end]
                )));
            }
            (
                run.len() + 1,
                after_in_state - before_in_state,
                Patch::InsertAt(before_in_state),
                Patch::DeleteAt(before_in_state + 1),
            )
        }
    };

    Ok(RunAssessment {
        run,
        kind,
        required,
        actual,
        grow,
        shrink,
    })
}

/// Plan the next gap edit, reporting every examined run to `sink`.
///
/// Call only once stale values are gone. A delete is only ever planned
/// for a placeholder slot; if the anchor arithmetic points at an assigned
/// value the pair is inconsistent and `NoProgress` is returned instead.
pub fn plan_fix_traced<S: TraceSink>(
    spec: &[RecordId],
    state: &[RecordId],
    sink: &mut S,
) -> SeqResult<Patch> {
    for run in not_found_runs(spec, state) {
        let assessment = assess_run(run, spec, state)?;
        trace!(
            start = run.start,
            end = run.end,
            kind = %assessment.kind,
            required = assessment.required,
            actual = assessment.actual,
            "assessed not-found run"
        );
        sink.record(TraceEvent::RunDetected {
            start: run.start,
            end: run.end,
            kind: assessment.kind,
        });

        let patch = assessment.patch();
        if let Patch::DeleteAt(position) = patch {
            let held = state[position - 1];
            if held.is_assigned() {
                return Err(no_progress(format!(
                    "narrowing {} run {}..={} would delete assigned value {}",
                    assessment.kind, run.start, run.end, held
                )));
            }
        }
        if patch.is_edit() {
            return Ok(patch);
        }
    }

    Ok(Patch::NoEdit)
}

/// Plan the next gap edit.
pub fn plan_fix(spec: &[RecordId], state: &[RecordId]) -> SeqResult<Patch> {
    plan_fix_traced(spec, state, &mut NullSink)
}

/// Sum of the width mismatches over all runs. Every planned edit lowers
/// this by exactly one on a consistent pair; zero means no gap edit is left.
pub fn gap_mismatch(spec: &[RecordId], state: &[RecordId]) -> SeqResult<usize> {
    not_found_runs(spec, state)
        .into_iter()
        .map(|run| assess_run(run, spec, state).map(|a| a.mismatch()))
        .sum()
}

/// 1-based position of a surplus placeholder to trim, once every run is
/// satisfied and the state is longer than the spec.
///
/// Walks the assigned values in order. The first one sitting further right
/// in the state than in the spec has a surplus slot directly before it.
/// When all of them are aligned, the surplus is at the tail.
pub fn surplus_position(spec: &[RecordId], state: &[RecordId]) -> Option<usize> {
    if state.len() <= spec.len() {
        return None;
    }

    let mut start = 0;
    while let Some(anchor) = nearest_anchor_after(start, spec, state) {
        match anchor.drift() {
            0 => start = anchor.pos_in_state,
            d if d > 0 => {
                let position = anchor.pos_in_state - 1;
                return state[position - 1].is_placeholder().then_some(position);
            }
            _ => return None,
        }
    }

    if state[start..].iter().any(|v| v.is_assigned()) {
        return None;
    }
    let last = state.len();
    state[last - 1].is_placeholder().then_some(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqsync_core::records;

    #[test]
    fn test_leading_surplus() {
        let spec = records(&[1, 8, 9, 10]);
        let state = records(&[0, 0, 8, 0]);
        assert_eq!(plan_fix(&spec, &state).unwrap(), Patch::DeleteAt(1));
    }

    #[test]
    fn test_trailing_shortfall() {
        let spec = records(&[1, 8, 9, 10]);
        let state = records(&[0, 8, 0]);
        assert_eq!(plan_fix(&spec, &state).unwrap(), Patch::InsertAt(3));
    }

    #[test]
    fn test_satisfied_runs() {
        let spec = records(&[1, 8, 9, 10]);
        assert_eq!(plan_fix(&spec, &records(&[0, 8, 0, 0])).unwrap(), Patch::NoEdit);
        assert_eq!(plan_fix(&[], &[]).unwrap(), Patch::NoEdit);
    }

    #[test]
    fn test_whole_spec_run() {
        let spec = records(&[3, 13, 23]);
        assert_eq!(plan_fix(&spec, &[]).unwrap(), Patch::InsertAt(0));
        assert_eq!(plan_fix(&spec, &records(&[0, 0, 0])).unwrap(), Patch::NoEdit);
        assert_eq!(
            plan_fix(&spec, &records(&[0, 0, 0, 0])).unwrap(),
            Patch::DeleteAt(1)
        );
    }

    #[test]
    fn test_sandwiched_shortfall() {
        let spec = records(&[1, 5, 10, 15, 17, 18]);
        let state = records(&[1, 5, 15, 17, 18]);
        assert_eq!(plan_fix(&spec, &state).unwrap(), Patch::InsertAt(2));
    }

    #[test]
    fn test_sandwiched_surplus() {
        let spec = records(&[5, 10, 15, 16, 20, 25]);
        let state = records(&[5, 10, 0, 0, 0, 16, 20, 25]);
        assert_eq!(plan_fix(&spec, &state).unwrap(), Patch::DeleteAt(3));
    }

    #[test]
    fn test_assess_sandwiched() {
        let spec = records(&[5, 10, 15, 16, 20, 25]);
        let state = records(&[0, 5, 10, 16, 20, 0, 25]);
        let run = not_found_runs(&spec, &state)[0];
        let assessment = assess_run(run, &spec, &state).unwrap();

        assert_eq!(assessment.kind, RunKind::Sandwiched);
        assert_eq!(assessment.required, 2);
        assert_eq!(assessment.actual, 1);
        assert_eq!(assessment.patch(), Patch::InsertAt(3));
        assert_eq!(gap_mismatch(&spec, &state).unwrap(), 1);
    }

    #[test]
    fn test_refuses_to_delete_assigned() {
        let spec = records(&[1, 8, 9]);
        let state = records(&[9, 0, 8]);
        let err = plan_fix(&spec, &state).unwrap_err();
        assert!(matches!(
            err,
            SeqError::NoProgress {
                phase: Phase::FixGaps,
                ..
            }
        ));
    }

    #[test]
    fn test_misordered_anchors() {
        let spec = records(&[5, 10, 15]);
        let state = records(&[15, 0, 5]);
        assert!(plan_fix(&spec, &state).is_err());
    }

    #[test]
    fn test_trace_reports_examined_runs() {
        let spec = records(&[1, 8, 9, 10]);
        let state = records(&[0, 8, 0]);
        let mut events: Vec<TraceEvent> = Vec::new();
        plan_fix_traced(&spec, &state, &mut events).unwrap();

        assert_eq!(
            events,
            vec![
                TraceEvent::RunDetected {
                    start: 1,
                    end: 1,
                    kind: RunKind::Leading
                },
                TraceEvent::RunDetected {
                    start: 3,
                    end: 4,
                    kind: RunKind::Trailing
                },
            ]
        );
    }

    #[test]
    fn test_surplus_position() {
        let spec = records(&[5, 10, 15, 16, 20, 25]);
        assert_eq!(
            surplus_position(&spec, &records(&[0, 5, 10, 0, 16, 20, 0, 25])),
            Some(1)
        );
        assert_eq!(
            surplus_position(&spec, &records(&[5, 10, 0, 16, 20, 0, 25])),
            Some(6)
        );
        assert_eq!(
            surplus_position(&spec, &records(&[5, 10, 15, 16, 20, 25, 0])),
            Some(7)
        );
        assert_eq!(surplus_position(&[], &records(&[0, 0])), Some(2));
        assert_eq!(surplus_position(&spec, &records(&[5, 10])), None);
    }
}
