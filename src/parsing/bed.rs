//! BED interval parsing.
//!
//! Each feature becomes a 0-based half-open [`Range`] on its sequence, so BED
//! coordinates are used as they are.

use std::collections::BTreeMap;
use std::path::Path;

use crate::core::range::Range;
use crate::parsing::ParseError;

/// Candidate search ranges per sequence name, features in file order
pub type BedRanges = BTreeMap<String, Vec<Range>>;

/// One BED line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedFeature {
    pub chrom: String,
    /// 0-based start
    pub start: u64,
    /// Exclusive end
    pub end: u64,
    pub name: Option<String>,
    /// `+`, `-` or `.`
    pub strand: Option<char>,
}

impl BedFeature {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn range(&self) -> Range {
        Range::new(self.start as f64, self.end as f64)
    }
}

/// Parse a BED file into per-sequence ranges
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::InvalidFormat` for malformed coordinates or strands.
pub fn parse_bed_file(path: &Path) -> Result<BedRanges, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_bed_text(&content)
}

/// Parse BED text into per-sequence ranges
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` for malformed coordinates or strands.
pub fn parse_bed_text(text: &str) -> Result<BedRanges, ParseError> {
    let mut ranges = BedRanges::new();
    for feature in parse_bed_features(text)? {
        let range = feature.range();
        ranges.entry(feature.chrom).or_default().push(range);
    }
    Ok(ranges)
}

/// Parse BED text into features, in file order.
///
/// Blank lines, comments, `browser` and `track` lines, and lines with fewer
/// than three fields are skipped.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if start or end is not an integer,
/// `start >= end`, or the strand column is not one of `+`, `-`, `.`.
pub fn parse_bed_features(text: &str) -> Result<Vec<BedFeature>, ParseError> {
    let mut features = Vec::new();

    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() || line.starts_with('#') || line.starts_with("browser") || line.starts_with("track") {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 3 {
            continue;
        }

        let chrom = fields[0];
        let start: u64 = fields[1]
            .parse()
            .map_err(|_| ParseError::InvalidFormat(format!("{chrom}: bad start: {}", fields[1])))?;
        let end: u64 = fields[2]
            .parse()
            .map_err(|_| ParseError::InvalidFormat(format!("{chrom}: bad end: {}", fields[2])))?;
        if start >= end {
            return Err(ParseError::InvalidFormat(format!(
                "{chrom}: start ({start}) must be < end ({end})"
            )));
        }

        let strand = match fields.get(5).copied() {
            None => None,
            Some(s @ ("+" | "-" | ".")) => s.chars().next(),
            Some(s) => return Err(ParseError::InvalidFormat(format!("{chrom}: bad strand: {s}"))),
        };

        features.push(BedFeature {
            chrom: chrom.to_string(),
            start,
            end,
            name: fields.get(3).map(|s| (*s).to_string()),
            strand,
        });
    }

    Ok(features)
}
