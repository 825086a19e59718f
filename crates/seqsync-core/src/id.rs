//! Identity types for seqsync
//!
//! A record identifier is a plain 64-bit number. The value zero is reserved
//! for the placeholder slot of a state sequence.

use std::fmt;

/// Record identity - names one captured data record
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RecordId(pub u64);

impl RecordId {
    /// Unassigned state slot
    pub const PLACEHOLDER: RecordId = RecordId(0);

    #[inline]
    pub fn new(id: u64) -> Self {
        RecordId(id)
    }

    #[inline]
    pub fn is_placeholder(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn is_assigned(self) -> bool {
        self.0 != 0
    }

    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for RecordId {
    #[inline]
    fn from(id: u64) -> Self {
        RecordId(id)
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_placeholder() {
            write!(f, "Record(_)")
        } else {
            write!(f, "Record({})", self.0)
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Build a sequence of record ids from raw numbers
pub fn records(raw: &[u64]) -> Vec<RecordId> {
    raw.iter().copied().map(RecordId).collect()
}

/// Raw numbers of a sequence, mostly for display and assertions
pub fn raw_ids(seq: &[RecordId]) -> Vec<u64> {
    seq.iter().map(|id| id.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder() {
        assert!(RecordId::PLACEHOLDER.is_placeholder());
        assert!(!RecordId::PLACEHOLDER.is_assigned());
        assert!(RecordId::new(7).is_assigned());
        assert_eq!(RecordId::default(), RecordId::PLACEHOLDER);
    }

    #[test]
    fn test_records_roundtrip() {
        let seq = records(&[0, 5, 10]);
        assert_eq!(seq[1], RecordId(5));
        assert_eq!(raw_ids(&seq), vec![0, 5, 10]);
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", RecordId(9)), "Record(9)");
        assert_eq!(format!("{:?}", RecordId::PLACEHOLDER), "Record(_)");
        assert_eq!(RecordId(42).to_string(), "42");
    }
}
