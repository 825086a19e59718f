//! Reconciliation Fuzzer - seeded randomized testing for spec edits
//!
//! Each case replays the way a state sequence drifts in practice:
//! - a spec is generated and a state sequence aligned to it
//! - some slots get assigned
//! - the spec is edited (ids removed, ids added)
//! - optionally two assigned values are swapped to break ordering
//!
//! The reconciler must converge with every invariant intact, or reject
//! exactly those pairs whose assignments contradict the spec order.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use seqsync_core::{
    assignments_ordered, invariants::check_all_invariants, positionally_consistent, raw_ids,
    RecordId, SeqError,
};
use seqsync_state::{spec_contains, ReconcileConfig, Reconciler};

/// Fuzzer configuration
#[derive(Clone, Debug)]
pub struct FuzzerConfig {
    /// Number of cases to generate
    pub cases: usize,
    /// Upper bound on generated spec length
    pub max_spec_len: usize,
    /// Largest record id handed out
    pub max_id: u64,
    /// Probability that a slot is assigned before the edit
    pub assign_prob: f64,
    /// Probability that an id is dropped from the spec by the edit
    pub remove_prob: f64,
    /// Probability of swapping two assigned values after the edit
    pub scramble_prob: f64,
    /// Random seed
    pub seed: u64,
}

impl Default for FuzzerConfig {
    fn default() -> Self {
        FuzzerConfig {
            cases: 500,
            max_spec_len: 24,
            max_id: 100,
            assign_prob: 0.4,
            remove_prob: 0.2,
            scramble_prob: 0.1,
            seed: 42,
        }
    }
}

impl FuzzerConfig {
    /// Light fuzzing for quick tests
    pub fn light() -> Self {
        FuzzerConfig {
            cases: 100,
            max_spec_len: 8,
            max_id: 30,
            assign_prob: 0.3,
            remove_prob: 0.2,
            scramble_prob: 0.0,
            seed: 42,
        }
    }

    /// Heavy fuzzing for thorough testing
    pub fn heavy() -> Self {
        FuzzerConfig {
            cases: 5000,
            max_spec_len: 96,
            max_id: 400,
            assign_prob: 0.6,
            remove_prob: 0.3,
            scramble_prob: 0.2,
            seed: 42,
        }
    }
}

/// One generated reconciliation input
#[derive(Clone, Debug)]
pub struct FuzzCase {
    pub spec: Vec<RecordId>,
    pub state: Vec<RecordId>,
}

impl FuzzCase {
    /// Whether the reconciler is expected to converge on this case: the
    /// assigned values that survive stale removal must already be ordered.
    pub fn expect_convergence(&self) -> bool {
        let kept: Vec<RecordId> = self
            .state
            .iter()
            .copied()
            .filter(|&v| v.is_placeholder() || spec_contains(&self.spec, v))
            .collect();
        assignments_ordered(&kept)
    }
}

/// A case the reconciler got wrong
#[derive(Clone, Debug)]
pub struct FuzzFailure {
    pub case: usize,
    pub spec: Vec<u64>,
    pub state: Vec<u64>,
    pub reason: String,
}

/// Fuzzing result
#[derive(Debug, Default)]
pub struct FuzzReport {
    pub cases: usize,
    /// Cases that reconciled cleanly
    pub converged: usize,
    /// Misordered cases correctly refused
    pub rejected: usize,
    /// Total edits over all converged cases
    pub edits: u64,
    pub failures: Vec<FuzzFailure>,
}

impl FuzzReport {
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty() && self.converged + self.rejected == self.cases
    }
}

/// Spec-edit fuzzer
pub struct SpecFuzzer {
    config: FuzzerConfig,
    reconciler: Reconciler,
    rng: StdRng,
}

impl SpecFuzzer {
    /// Create a new fuzzer
    pub fn new(config: FuzzerConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        SpecFuzzer {
            config,
            reconciler: Reconciler::new(ReconcileConfig::default()),
            rng,
        }
    }

    fn random_ids(&mut self, count: usize) -> BTreeSet<u64> {
        let max_id = self.config.max_id.max(1);
        (0..count)
            .map(|_| self.rng.gen_range(1..=max_id))
            .collect()
    }

    /// Generate one case
    pub fn generate_case(&mut self) -> FuzzCase {
        let len = self.rng.gen_range(0..=self.config.max_spec_len);
        let old = self.random_ids(len);

        let mut state: Vec<RecordId> = old
            .iter()
            .map(|&id| {
                if self.rng.gen_bool(self.config.assign_prob) {
                    RecordId(id)
                } else {
                    RecordId::PLACEHOLDER
                }
            })
            .collect();

        let mut spec: BTreeSet<u64> = old
            .iter()
            .copied()
            .filter(|_| !self.rng.gen_bool(self.config.remove_prob))
            .collect();
        let added = self.rng.gen_range(0..=self.config.max_spec_len / 4);
        spec.extend(self.random_ids(added));

        if self.rng.gen_bool(self.config.scramble_prob) {
            self.scramble(&mut state);
        }

        FuzzCase {
            spec: spec.into_iter().map(RecordId).collect(),
            state,
        }
    }

    /// Swap two assigned values, if there are at least two.
    fn scramble(&mut self, state: &mut [RecordId]) {
        let assigned: Vec<usize> = state
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_assigned())
            .map(|(i, _)| i)
            .collect();
        if assigned.len() < 2 {
            return;
        }
        let a = self.rng.gen_range(0..assigned.len());
        let b = self.rng.gen_range(0..assigned.len());
        state.swap(assigned[a], assigned[b]);
    }

    /// Reconcile one case and judge the outcome.
    pub fn check_case(&mut self, case: &FuzzCase) -> Result<Option<u32>, String> {
        let mut state = case.state.clone();
        let expected = case.expect_convergence();

        match self.reconciler.reconcile(&case.spec, &mut state) {
            Ok(report) => {
                if !expected {
                    return Err("converged on a misordered pair".to_string());
                }
                if !positionally_consistent(&case.spec, &state) {
                    return Err(format!("result {:?} is not consistent", raw_ids(&state)));
                }
                let violations = check_all_invariants(&case.spec, &case.state, &state);
                if let Some(first) = violations.first() {
                    return Err(first.to_string());
                }
                Ok(Some(report.edits()))
            }
            Err(SeqError::NoProgress { .. }) if !expected => Ok(None),
            Err(err) => Err(err.to_string()),
        }
    }

    /// Run the fuzzer
    pub fn run(&mut self) -> FuzzReport {
        let mut report = FuzzReport::default();

        for index in 0..self.config.cases {
            let case = self.generate_case();
            report.cases += 1;
            match self.check_case(&case) {
                Ok(Some(edits)) => {
                    report.converged += 1;
                    report.edits += u64::from(edits);
                }
                Ok(None) => report.rejected += 1,
                Err(reason) => report.failures.push(FuzzFailure {
                    case: index,
                    spec: raw_ids(&case.spec),
                    state: raw_ids(&case.state),
                    reason,
                }),
            }
        }

        report
    }
}

/// Property-based test helpers
pub mod properties {
    use super::*;
    use seqsync_state::reconcile;

    /// Property: a second reconciliation changes nothing
    pub fn reconcile_idempotent(spec: &[RecordId], state: &[RecordId]) -> bool {
        let mut first = state.to_vec();
        if reconcile(spec, &mut first).is_err() {
            return true;
        }
        let mut second = first.clone();
        matches!(reconcile(spec, &mut second), Ok(r) if r.is_noop()) && second == first
    }

    /// Property: a consistent pair is never edited
    pub fn consistent_untouched(spec: &[RecordId], state: &[RecordId]) -> bool {
        if !positionally_consistent(spec, state) {
            return true;
        }
        let mut after = state.to_vec();
        matches!(reconcile(spec, &mut after), Ok(r) if r.is_noop()) && after == state
    }

    /// Property: a converged state has exactly the spec's length
    pub fn length_matches(spec: &[RecordId], state: &[RecordId]) -> bool {
        let mut after = state.to_vec();
        match reconcile(spec, &mut after) {
            Ok(_) => after.len() == spec.len(),
            Err(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqsync_core::records;

    fn assert_clean(report: &FuzzReport) {
        for failure in &report.failures {
            eprintln!(
                "case {}: spec {:?} state {:?}: {}",
                failure.case, failure.spec, failure.state, failure.reason
            );
        }
        assert!(report.is_valid());
    }

    #[test]
    fn test_fuzzer_light() {
        let mut fuzzer = SpecFuzzer::new(FuzzerConfig::light());
        let report = fuzzer.run();

        assert_eq!(report.cases, 100);
        assert_eq!(report.rejected, 0);
        assert_clean(&report);
    }

    #[test]
    fn test_fuzzer_default() {
        let mut fuzzer = SpecFuzzer::new(FuzzerConfig::default());
        assert_clean(&fuzzer.run());
    }

    #[test]
    fn test_seed_is_deterministic() {
        let a = SpecFuzzer::new(FuzzerConfig::default()).run();
        let b = SpecFuzzer::new(FuzzerConfig::default()).run();
        assert_eq!(a.converged, b.converged);
        assert_eq!(a.rejected, b.rejected);
        assert_eq!(a.edits, b.edits);
    }

    #[test]
    fn test_scrambled_pair_expectation() {
        let case = FuzzCase {
            spec: records(&[5, 10, 15]),
            state: records(&[15, 0, 5]),
        };
        assert!(!case.expect_convergence());

        let stale_swap = FuzzCase {
            spec: records(&[5, 15]),
            state: records(&[15, 0, 10]),
        };
        assert!(stale_swap.expect_convergence());
    }

    #[test]
    fn test_check_case_rejects_misordered() {
        let mut fuzzer = SpecFuzzer::new(FuzzerConfig::light());
        let case = FuzzCase {
            spec: records(&[5, 10, 15]),
            state: records(&[15, 0, 5]),
        };
        assert_eq!(fuzzer.check_case(&case), Ok(None));
    }

    #[test]
    fn test_properties() {
        let spec = records(&[5, 10, 15, 16, 20, 25]);
        let state = records(&[0, 5, 10, 16, 20, 0, 25]);
        assert!(properties::reconcile_idempotent(&spec, &state));
        assert!(properties::length_matches(&spec, &state));
        assert!(properties::consistent_untouched(
            &spec,
            &records(&[5, 0, 0, 16, 0, 25])
        ));
    }
}
