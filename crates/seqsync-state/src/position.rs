//! Position resolution
//!
//! All positions are 1-based. Identifiers are unique in a valid pair, so
//! the first match is the only match.

use seqsync_core::RecordId;

/// 1-based position of `value` in `seq`, scanning from the head.
pub fn locate(value: RecordId, seq: &[RecordId]) -> Option<usize> {
    seq.iter().position(|&v| v == value).map(|idx| idx + 1)
}

/// 1-based position of `value` in `seq`, scanning from the tail.
pub fn locate_last(value: RecordId, seq: &[RecordId]) -> Option<usize> {
    seq.iter().rposition(|&v| v == value).map(|idx| idx + 1)
}

/// Whether an ascending specification lists `value`.
#[inline]
pub fn spec_contains(spec: &[RecordId], value: RecordId) -> bool {
    spec.binary_search(&value).is_ok()
}

/// An identifier present in both sequences, with its position in each.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Anchor {
    pub value: RecordId,
    pub pos_in_spec: usize,
    pub pos_in_state: usize,
}

impl Anchor {
    /// Resolve `value` in both sequences.
    pub fn resolve(value: RecordId, spec: &[RecordId], state: &[RecordId]) -> Option<Anchor> {
        Some(Anchor {
            value,
            pos_in_spec: locate(value, spec)?,
            pos_in_state: locate(value, state)?,
        })
    }

    /// How many slots further right the value sits in the state sequence
    /// than in the spec. Negative when it sits further left.
    #[inline]
    pub fn drift(&self) -> isize {
        self.pos_in_state as isize - self.pos_in_spec as isize
    }
}

/// First assigned value at or after 0-based offset `start` of the state
/// sequence, together with its position in the spec.
///
/// `None` when no assigned value remains, which means everything from
/// `start` to the end of both sequences is unanchored. An assigned value
/// the spec does not list also yields `None`; callers run this only after
/// stale values are gone.
pub fn nearest_anchor_after(
    start: usize,
    spec: &[RecordId],
    state: &[RecordId],
) -> Option<Anchor> {
    let offset = state
        .iter()
        .skip(start)
        .position(|v| v.is_assigned())?;
    let idx = start + offset;
    let value = state[idx];

    Some(Anchor {
        value,
        pos_in_spec: locate(value, spec)?,
        pos_in_state: idx + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqsync_core::records;

    #[test]
    fn test_locate() {
        let seq = records(&[0, 5, 0, 10]);
        assert_eq!(locate(RecordId(5), &seq), Some(2));
        assert_eq!(locate(RecordId(10), &seq), Some(4));
        assert_eq!(locate(RecordId(7), &seq), None);
        assert_eq!(locate(RecordId::PLACEHOLDER, &seq), Some(1));
        assert_eq!(locate_last(RecordId::PLACEHOLDER, &seq), Some(3));
    }

    #[test]
    fn test_spec_contains() {
        let spec = records(&[1, 8, 9, 10]);
        assert!(spec_contains(&spec, RecordId(9)));
        assert!(!spec_contains(&spec, RecordId(4)));
        assert!(!spec_contains(&[], RecordId(4)));
    }

    #[test]
    fn test_anchor_resolve() {
        let spec = records(&[1, 8, 9, 10]);
        let state = records(&[0, 0, 8, 0]);
        let anchor = Anchor::resolve(RecordId(8), &spec, &state).unwrap();
        assert_eq!(anchor.pos_in_spec, 2);
        assert_eq!(anchor.pos_in_state, 3);
        assert_eq!(anchor.drift(), 1);
        assert!(Anchor::resolve(RecordId(9), &spec, &state).is_none());
    }

    #[test]
    fn test_nearest_anchor_after() {
        let spec = records(&[5, 10, 15, 16, 20, 25]);
        let state = records(&[0, 5, 10, 16, 20, 0, 25]);

        let first = nearest_anchor_after(0, &spec, &state).unwrap();
        assert_eq!(
            first,
            Anchor {
                value: RecordId(5),
                pos_in_spec: 1,
                pos_in_state: 2
            }
        );

        let next = nearest_anchor_after(first.pos_in_state, &spec, &state).unwrap();
        assert_eq!(next.value, RecordId(10));

        let last = nearest_anchor_after(5, &spec, &state).unwrap();
        assert_eq!(last.value, RecordId(25));
        assert_eq!(last.pos_in_state, 7);
        assert_eq!(last.pos_in_spec, 6);

        assert!(nearest_anchor_after(7, &spec, &state).is_none());
        assert!(nearest_anchor_after(0, &spec, &records(&[0, 0])).is_none());
        assert!(nearest_anchor_after(10, &spec, &state).is_none());
    }
}
