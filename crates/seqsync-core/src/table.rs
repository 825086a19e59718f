//! Side-by-side rendering of a specification / state pair

use std::fmt;

use crate::RecordId;

/// Two-column view of a spec and a state sequence, one row per position.
/// The shorter column is padded with blanks.
#[derive(Clone, Copy, Debug)]
pub struct SequenceTable<'a> {
    spec: &'a [RecordId],
    state: &'a [RecordId],
}

impl<'a> SequenceTable<'a> {
    pub fn new(spec: &'a [RecordId], state: &'a [RecordId]) -> Self {
        SequenceTable { spec, state }
    }

    /// Rows where the state slot contradicts the spec, 1-based
    pub fn mismatched_rows(&self) -> Vec<usize> {
        let rows = self.spec.len().max(self.state.len());
        (0..rows)
            .filter(|&i| match (self.spec.get(i), self.state.get(i)) {
                (Some(s), Some(w)) => w.is_assigned() && w != s,
                _ => true,
            })
            .map(|i| i + 1)
            .collect()
    }
}

impl fmt::Display for SequenceTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.spec.len().max(self.state.len());
        let mismatched = self.mismatched_rows();
        writeln!(f, "{:>4}  {:>10}  {:>10}", "#", "spec", "state")?;
        for i in 0..rows {
            let spec = self.spec.get(i).map(|v| v.to_string()).unwrap_or_default();
            let state = self.state.get(i).map(|v| v.to_string()).unwrap_or_default();
            let marker = if mismatched.contains(&(i + 1)) { " !" } else { "" };
            writeln!(f, "{:>4}  {:>10}  {:>10}{}", i + 1, spec, state, marker)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records;

    #[test]
    fn test_table_rows() {
        let spec = records(&[1, 8, 9, 10]);
        let state = records(&[0, 0, 8]);
        let rendered = SequenceTable::new(&spec, &state).to_string();

        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("spec"));
        assert!(lines[3].trim_end().ends_with("8 !"));
        assert!(lines[4].trim_end().ends_with("!"));
    }

    #[test]
    fn test_mismatched_rows() {
        let spec = records(&[1, 8, 9, 10]);
        let state = records(&[0, 8, 0, 0]);
        assert!(SequenceTable::new(&spec, &state).mismatched_rows().is_empty());

        let state = records(&[0, 0, 8]);
        assert_eq!(SequenceTable::new(&spec, &state).mismatched_rows(), vec![3, 4]);
    }

    #[test]
    fn test_empty_table() {
        let rendered = SequenceTable::new(&[], &[]).to_string();
        assert_eq!(rendered.lines().count(), 1);
    }
}
