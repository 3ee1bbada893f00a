//! Half-open candidate ranges over a reference sequence.
//!
//! A [`Range`] may be only partially specified: `NaN` bounds mean "sequence
//! start" / "sequence end" and negative bounds count back from the end of the
//! sequence. [`Range::resolve`] turns such a request into a concrete interval
//! for a given sequence length.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RangeParseError {
    #[error("Invalid range bound '{0}'")]
    InvalidBound(String),

    #[error("Range '{0}' is missing the ':' separator")]
    MissingSeparator(String),
}

/// A half-open interval `[start, end)` over a sequence.
///
/// Bounds are floating point so that unspecified (`NaN`) and end-relative
/// (negative) offsets can be carried until the sequence length is known.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Range {
    pub start: f64,
    pub end: f64,
}

impl Range {
    #[must_use]
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// The whole sequence, whatever its length.
    #[must_use]
    pub fn full() -> Self {
        Self::new(f64::NAN, f64::NAN)
    }

    /// Length of the range (`NaN` if either bound is unspecified).
    #[must_use]
    pub fn len(&self) -> f64 {
        self.end - self.start
    }

    /// True only for an explicitly empty interval (`start == end`).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0.0
    }

    /// Resolve the range against a sequence of length `seq_len`.
    ///
    /// - `start == end` is returned unchanged (explicit empty interval).
    /// - `NaN` start becomes 0, a negative start counts from the end; clamped to `>= 0`.
    /// - `NaN` end becomes `seq_len`, a negative end counts from the end; clamped to `<= seq_len`.
    /// - An inverted result falls back to the full sequence `[0, seq_len)`.
    ///
    /// Never fails and never mutates `self`.
    #[must_use]
    pub fn resolve(&self, seq_len: usize) -> Range {
        if self.start == self.end {
            return *self;
        }

        #[allow(clippy::cast_precision_loss)]
        let len = seq_len as f64;

        let mut start = if self.start.is_nan() {
            0.0
        } else if self.start < 0.0 {
            len + self.start
        } else {
            self.start
        };
        if start < 0.0 {
            start = 0.0;
        }

        let mut end = if self.end.is_nan() {
            len
        } else if self.end < 0.0 {
            len + self.end
        } else {
            self.end
        };
        if end > len {
            end = len;
        }

        if start > end {
            return Range::new(0.0, len);
        }

        Range::new(start, end)
    }

    /// Integer bounds of a resolved range, suitable for slicing.
    ///
    /// Only meaningful after [`Range::resolve`]; unresolved `NaN` bounds map to 0.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn bounds(&self) -> (usize, usize) {
        let start = if self.start.is_nan() { 0 } else { self.start.max(0.0) as usize };
        let end = if self.end.is_nan() { 0 } else { self.end.max(0.0) as usize };
        (start, end.max(start))
    }
}

impl PartialEq for Range {
    /// Bounds compare equal when both are `NaN` or numerically equal.
    fn eq(&self, other: &Self) -> bool {
        fn same(a: f64, b: f64) -> bool {
            (a.is_nan() && b.is_nan()) || a == b
        }
        same(self.start, other.start) && same(self.end, other.end)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |v: f64| if v.is_nan() { String::new() } else { format!("{v}") };
        write!(f, "{}:{}", bound(self.start), bound(self.end))
    }
}

impl FromStr for Range {
    type Err = RangeParseError;

    /// Parse `start:end`, where either side may be empty (unspecified) or negative.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (start, end) = s
            .split_once(':')
            .ok_or_else(|| RangeParseError::MissingSeparator(s.to_string()))?;
        Ok(Range::new(parse_bound(start)?, parse_bound(end)?))
    }
}

fn parse_bound(s: &str) -> Result<f64, RangeParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(f64::NAN);
    }
    s.parse::<i64>()
        .map(|v| {
            #[allow(clippy::cast_precision_loss)]
            {
                v as f64
            }
        })
        .map_err(|_| RangeParseError::InvalidBound(s.to_string()))
}

/// Parse a comma separated range list such as `":10,30:40,-20:"`.
///
/// An empty list yields a single full-sequence range.
///
/// # Errors
///
/// Returns `RangeParseError` if any element is not a valid `start:end` pair.
pub fn parse_range_list(s: &str) -> Result<Vec<Range>, RangeParseError> {
    let ranges: Vec<Range> = s
        .split(',')
        .filter(|p| !p.trim().is_empty())
        .map(str::parse)
        .collect::<Result<_, _>>()?;

    if ranges.is_empty() {
        Ok(vec![Range::full()])
    } else {
        Ok(ranges)
    }
}
