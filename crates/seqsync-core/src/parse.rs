//! Delimited sequence loader
//!
//! Sequences are written as comma separated numbers, e.g. `1,8,9,10`.
//! Surrounding whitespace is ignored and an empty string is the empty
//! sequence. `0` is accepted here; whether it is allowed depends on which
//! side of the pair the sequence belongs to.

use crate::{validate_spec, RecordId, SeqError, SeqResult};

/// Parse a comma separated list of record ids.
pub fn parse_sequence(input: &str) -> SeqResult<Vec<RecordId>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    trimmed
        .split(',')
        .map(|token| {
            let token = token.trim();
            token
                .parse::<u64>()
                .map(RecordId)
                .map_err(|e| SeqError::Parse {
                    token: token.to_string(),
                    reason: e.to_string(),
                })
        })
        .collect()
}

/// Parse a specification sequence and check that it is strictly ascending
/// and non-zero.
pub fn parse_spec(input: &str) -> SeqResult<Vec<RecordId>> {
    let spec = parse_sequence(input)?;
    validate_spec(&spec)?;
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records;

    #[test]
    fn test_parse_sequence() {
        assert_eq!(parse_sequence("1,8,9,10").unwrap(), records(&[1, 8, 9, 10]));
        assert_eq!(parse_sequence(" 0, 5 ,0 ").unwrap(), records(&[0, 5, 0]));
        assert!(parse_sequence("").unwrap().is_empty());
        assert!(parse_sequence("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_sequence("1,x,3").unwrap_err();
        match err {
            SeqError::Parse { token, .. } => assert_eq!(token, "x"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(parse_sequence("1,,3").is_err());
        assert!(parse_sequence("-4").is_err());
    }

    #[test]
    fn test_parse_spec_validates_order() {
        assert!(parse_spec("5,10,15").is_ok());
        assert!(matches!(
            parse_spec("5,0,15"),
            Err(SeqError::InvalidSpecification { position: 2, .. })
        ));
    }
}
