use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::matching::align::{align_local, AlignError, AlignParams};

/// How the per-query normalisation baseline is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NullMode {
    /// Score of the query aligned against itself
    #[default]
    SelfAlignment,
    /// Reserved mode without a baseline; every null score is `NaN`
    Unsupported,
}

impl FromStr for NullMode {
    type Err = std::convert::Infallible;

    /// `"self"` selects self-alignment; any other name is a reserved mode.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "self" => Self::SelfAlignment,
            _ => Self::Unsupported,
        })
    }
}

impl fmt::Display for NullMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfAlignment => write!(f, "self"),
            Self::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// Null score of `query` under `mode`.
///
/// Unsupported modes yield `NaN`; since `NaN > cutoff` is always false, queries
/// without a baseline never produce hits.
///
/// # Errors
///
/// Returns `AlignError` if the self-alignment cannot be computed (empty query).
pub fn null_score(query: &[u8], mode: NullMode, params: &AlignParams) -> Result<f64, AlignError> {
    match mode {
        NullMode::SelfAlignment => {
            let alignment = align_local(query, query, params)?;
            Ok(f64::from(alignment.score))
        }
        NullMode::Unsupported => Ok(f64::NAN),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_null_score() {
        let score = null_score(b"ACGTTGCA", NullMode::SelfAlignment, &AlignParams::default()).unwrap();
        assert!((score - 32.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unsupported_mode_is_nan() {
        let score = null_score(b"ACGT", NullMode::Unsupported, &AlignParams::default()).unwrap();
        assert!(score.is_nan());
        // Any cutoff comparison against a NaN ratio is false
        assert!(!(16.0 / score > 0.0));
    }

    #[test]
    fn test_empty_query_fails() {
        assert!(null_score(b"", NullMode::SelfAlignment, &AlignParams::default()).is_err());
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!("self".parse::<NullMode>().unwrap(), NullMode::SelfAlignment);
        assert_eq!("random".parse::<NullMode>().unwrap(), NullMode::Unsupported);
    }
}
