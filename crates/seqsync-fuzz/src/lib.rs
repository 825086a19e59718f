//! Fuzzing inputs for seqsync
//!
//! libFuzzer hands out raw bytes; [`FuzzPair`] turns them into a valid
//! spec and an arbitrary state sequence, and [`check_pair`] states what a
//! correct reconciliation must do with them.

use arbitrary::Arbitrary;
use seqsync_core::{
    assignments_ordered, invariants::check_all_invariants, positionally_consistent, RecordId,
    SeqError,
};
use seqsync_state::{reconcile, spec_contains};

/// Raw fuzzer input. Ids are kept small so spec and state overlap often.
#[derive(Arbitrary, Clone, Debug)]
pub struct FuzzPair {
    spec: Vec<u8>,
    state: Vec<u8>,
}

impl FuzzPair {
    /// Spec ids: zeros dropped, sorted, deduplicated.
    pub fn spec(&self) -> Vec<RecordId> {
        let mut ids: Vec<u64> = self
            .spec
            .iter()
            .filter(|&&b| b != 0)
            .map(|&b| u64::from(b))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids.into_iter().map(RecordId).collect()
    }

    /// State taken as-is, placeholders and repeats included.
    pub fn state(&self) -> Vec<RecordId> {
        self.state.iter().map(|&b| RecordId(u64::from(b))).collect()
    }
}

/// Reconcile `pair` and check the outcome.
///
/// The pair must converge with all invariants holding exactly when the
/// assigned values that survive stale removal are strictly ascending;
/// otherwise the reconciler must refuse with `NoProgress`.
pub fn check_pair(pair: &FuzzPair) -> Result<(), String> {
    let spec = pair.spec();
    let before = pair.state();
    let kept: Vec<RecordId> = before
        .iter()
        .copied()
        .filter(|&v| v.is_placeholder() || spec_contains(&spec, v))
        .collect();
    let ordered = assignments_ordered(&kept);

    let mut after = before.clone();
    match reconcile(&spec, &mut after) {
        Ok(_) if !ordered => Err(format!("converged on misordered state {:?}", before)),
        Ok(_) => {
            if !positionally_consistent(&spec, &after) {
                return Err(format!("{:?} does not match {:?}", after, spec));
            }
            match check_all_invariants(&spec, &before, &after).first() {
                Some(violation) => Err(violation.to_string()),
                None => Ok(()),
            }
        }
        Err(SeqError::NoProgress { .. }) if !ordered => Ok(()),
        Err(err) => Err(format!("{:?} -> {:?}: {}", before, spec, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbitrary::Unstructured;

    #[test]
    fn test_spec_normalized() {
        let pair = FuzzPair {
            spec: vec![9, 0, 3, 9, 1],
            state: vec![0, 3, 7],
        };
        assert_eq!(pair.spec(), vec![RecordId(1), RecordId(3), RecordId(9)]);
        assert_eq!(pair.state().len(), 3);
        assert!(check_pair(&pair).is_ok());
    }

    #[test]
    fn test_misordered_refused() {
        let pair = FuzzPair {
            spec: vec![5, 10, 15],
            state: vec![15, 0, 5],
        };
        assert!(check_pair(&pair).is_ok());
    }

    #[test]
    fn test_unstructured_inputs() {
        let mut seed = 0x2545_f491_4f6c_dd1d_u64;
        for _ in 0..200 {
            let bytes: Vec<u8> = (0..64)
                .map(|_| {
                    seed ^= seed << 13;
                    seed ^= seed >> 7;
                    seed ^= seed << 17;
                    (seed % 24) as u8
                })
                .collect();
            let pair = FuzzPair::arbitrary(&mut Unstructured::new(&bytes)).unwrap();
            assert_eq!(check_pair(&pair), Ok(()), "{:?}", pair);
        }
    }
}
