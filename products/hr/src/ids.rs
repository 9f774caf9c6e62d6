//! Decoding of `1` / `1-2-3` style identifier tokens.

use crate::error::{HrError, HrResult};

pub const SEPARATOR: char = '-';

/// Splits a token into ids, keeping order and duplicates.
///
/// A token without a separator yields a single id.
pub fn decode_ids(token: &str) -> HrResult<Vec<i32>> {
    token
        .split(SEPARATOR)
        .map(|segment| parse_segment(segment).ok_or_else(|| malformed(token)))
        .collect()
}

fn parse_segment(segment: &str) -> Option<i32> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

fn malformed(token: &str) -> HrError {
    HrError::MalformedIdentifier {
        token: token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_and_batch_tokens() {
        assert_eq!(decode_ids("1").unwrap(), vec![1]);
        assert_eq!(decode_ids("1-2-3").unwrap(), vec![1, 2, 3]);
        assert_eq!(decode_ids("3-1-3").unwrap(), vec![3, 1, 3]);
        assert_eq!(decode_ids("007").unwrap(), vec![7]);
    }

    #[test]
    fn rejects_malformed_tokens() {
        for token in ["", "x", "1-", "-1", "1--2", "1-x-3", "+4", " 1", "99999999999"] {
            let err = decode_ids(token).unwrap_err();
            match err {
                HrError::MalformedIdentifier { token: reported } => assert_eq!(reported, token),
                other => panic!("unexpected error for {token:?}: {other:?}"),
            }
        }
    }
}
