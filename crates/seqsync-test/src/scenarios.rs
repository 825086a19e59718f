//! Scenario corpus
//!
//! Hand-written spec edits with known outcomes. Each scenario gives the
//! new spec, the state sequence as it was captured against an older spec,
//! and the state expected after reconciliation. Sequences are written in
//! the delimited form accepted by [`parse_sequence`].

use seqsync_core::{parse_sequence, parse_spec, raw_ids, SeqError};
use seqsync_state::{ReconcileConfig, ReconcileReport, Reconciler};
use thiserror::Error;

/// One replayable spec edit
#[derive(Clone, Copy, Debug)]
pub struct Scenario {
    pub name: &'static str,
    pub spec: &'static str,
    pub state: &'static str,
    pub expected: &'static str,
}

const fn scenario(
    name: &'static str,
    spec: &'static str,
    state: &'static str,
    expected: &'static str,
) -> Scenario {
    Scenario {
        name,
        spec,
        state,
        expected,
    }
}

/// Every scenario, in replay order
pub const SCENARIOS: &[Scenario] = &[
    scenario("trailing-pair-missing", "1,2,3", "1,0", "1,0,0"),
    scenario("leading-pair-missing", "1,2,3", "0,3", "0,0,3"),
    scenario("middle-missing", "1,2,3", "1,3", "1,0,3"),
    scenario("grow-placeholders", "5,10,15,20", "0,0", "0,0,0,0"),
    scenario("append-one", "5,10,15,20", "5,10,15", "5,10,15,0"),
    scenario("prepend-and-append", "5,10,15,20", "10,15", "0,10,15,0"),
    scenario("fill-middle-and-tail", "5,10,15,20", "5,15", "5,0,15,0"),
    scenario("stale-then-append", "5,10,15,20", "5,6,10", "5,10,0,0"),
    scenario("stale-tail", "5,10,15,20", "5,10,15,20,25", "5,10,15,20"),
    scenario("surplus-tail-placeholder", "5,10,15,20", "0,0,0,20,0", "0,0,0,20"),
    scenario("all-placeholders-surplus", "5,10,15,20", "0,0,0,0,0", "0,0,0,0"),
    scenario("trailing-surplus", "5,10,15,20", "0,10,15,0,0", "0,10,15,0"),
    scenario("trailing-surplus-after-head", "5,10,15,20", "5,0,0,0,0", "5,0,0,0"),
    scenario("stale-tail-value", "5,10,15,20", "5,0,0,0,40", "5,0,0,0"),
    scenario("stale-then-grow", "5,10,15,20", "5,0,0,40", "5,0,0,0"),
    scenario("stale-middle", "5,10,15,20", "5,6,15", "5,0,15,0"),
    scenario("two-stale-three-missing", "1,5,10,15,20", "5,6,15,17", "0,5,0,15,0"),
    scenario("shrunk-spec", "15,20", "5,6,15,17,0", "15,0"),
    scenario("shrunk-spec-placeholders", "15,20", "0,6,0,17,0", "0,0"),
    scenario("complete", "1,5,10,15,17,18", "1,5,10,15,17,18", "1,5,10,15,17,18"),
    scenario("replaced-id", "1,5,10,15,17,18", "1,5,11,15,17,18", "1,5,0,15,17,18"),
    scenario("one-pending", "1,5,10,15,17,18", "1,5,0,15,17,18", "1,5,0,15,17,18"),
    scenario("partly-captured", "1,5,10,15,17,18", "0,0,0,15,17,0", "0,0,0,15,17,0"),
    scenario("single", "18", "0", "0"),
    scenario("empty", "", "", ""),
    scenario("new-head-and-middle", "5,10,15,16,20,25", "10,15,20,25", "0,10,15,0,20,25"),
    scenario("new-head-pair", "5,10,15,16,20,25", "0,15,20,25", "0,0,15,0,20,25"),
    scenario("leading-surplus", "5,10,15,16,20,25", "0,5,10,15,16,20,25", "5,10,15,16,20,25"),
    scenario(
        "leading-surplus-stale-tail",
        "5,10,15,16,20,25",
        "0,5,10,15,16,20,25,29",
        "5,10,15,16,20,25",
    ),
    scenario("middle-surplus", "5,10,15,16,20,25", "5,10,15,0,0,16,20,25", "5,10,15,16,20,25"),
    scenario(
        "double-leading-surplus",
        "5,10,15,16,20,25",
        "0,0,5,10,15,16,20,25,29",
        "5,10,15,16,20,25",
    ),
    scenario("shifted-middle", "5,10,15,16,20,25", "0,5,10,16,20,0,25", "5,10,0,16,20,25"),
    scenario("shifted-tail", "5,10,15,16,20,25", "0,5,10,15,0,0", "5,10,15,0,0,0"),
    scenario("cleared-spec", "", "0,5,0", ""),
    scenario("fresh-state", "3,13,23", "", "0,0,0"),
];

/// Why a scenario did not produce its expected state
#[derive(Error, Debug)]
pub enum ScenarioFailure {
    #[error("reconciliation failed: {0}")]
    Reconcile(#[from] SeqError),

    #[error("expected {expected:?}, got {actual:?}")]
    Mismatch { expected: Vec<u64>, actual: Vec<u64> },
}

impl Scenario {
    /// Reconcile this scenario's pair and compare with the expected state.
    pub fn run(&self) -> Result<ReconcileReport, ScenarioFailure> {
        let spec = parse_spec(self.spec)?;
        let mut state = parse_sequence(self.state)?;
        let expected = raw_ids(&parse_sequence(self.expected)?);

        let report = Reconciler::new(ReconcileConfig::default()).reconcile(&spec, &mut state)?;
        let actual = raw_ids(&state);
        if actual != expected {
            return Err(ScenarioFailure::Mismatch { expected, actual });
        }
        Ok(report)
    }
}

/// Outcome of replaying a set of scenarios
#[derive(Debug, Default)]
pub struct CorpusSummary {
    pub passed: usize,
    pub edits: u64,
    pub failures: Vec<(&'static str, ScenarioFailure)>,
}

impl CorpusSummary {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Replay `scenarios`, collecting failures instead of stopping at the first.
pub fn run_corpus(scenarios: &[Scenario]) -> CorpusSummary {
    let mut summary = CorpusSummary::default();
    for scenario in scenarios {
        match scenario.run() {
            Ok(report) => {
                summary.passed += 1;
                summary.edits += u64::from(report.edits());
            }
            Err(failure) => summary.failures.push((scenario.name, failure)),
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_is_clean() {
        let summary = run_corpus(SCENARIOS);
        for (name, failure) in &summary.failures {
            eprintln!("{name}: {failure}");
        }
        assert!(summary.is_clean());
        assert_eq!(summary.passed, SCENARIOS.len());
    }

    #[test]
    fn test_names_unique() {
        let mut names: Vec<_> = SCENARIOS.iter().map(|s| s.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SCENARIOS.len());
    }

    #[test]
    fn test_mismatch_reported() {
        let wrong = scenario("wrong", "1,8,9,10", "0,0,8,0", "0,0,8,0");
        match wrong.run() {
            Err(ScenarioFailure::Mismatch { actual, .. }) => assert_eq!(actual, vec![0, 8, 0, 0]),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_inconsistent_pair_reported() {
        let swapped = scenario("swapped", "5,10,15", "15,0,5", "0,0,0");
        assert!(matches!(
            swapped.run(),
            Err(ScenarioFailure::Reconcile(SeqError::NoProgress { .. }))
        ));
    }

    #[test]
    fn test_noop_scenarios_make_no_edits() {
        for name in ["complete", "one-pending", "partly-captured", "single", "empty"] {
            let scenario = SCENARIOS.iter().find(|s| s.name == name).unwrap();
            assert_eq!(scenario.run().unwrap().edits(), 0, "{name}");
        }
    }
}
