use std::fmt;

use serde::Serialize;

use crate::core::query::Query;
use crate::core::reference::Reference;
use crate::matching::align::Alignment;
use crate::matching::metrics::HitMetrics;
use crate::matching::null_score::NullMode;

/// Column names of the tabular hit output, in output order
pub const HIT_FIELDS: [&str; 12] = [
    "Ref",
    "RefStart",
    "RefEnd",
    "Query",
    "QueryStart",
    "QueryEnd",
    "Strand",
    "MapQual",
    "RawScore",
    "Acc",
    "ClipAcc",
    "QueryCov",
];

/// Parameters a hit was accepted under
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DetectionContext {
    /// Minimum accepted `score / null_score`
    pub cutoff: f64,
    /// How query null scores were computed
    pub null_mode: NullMode,
}

/// One occurrence of a query inside a reference.
///
/// All coordinates are 0-based, half-open and absolute: reference coordinates
/// are positions in the full reference sequence, not in the searched range.
#[derive(Debug, Clone)]
pub struct AlignedSeq<'a> {
    pub reference: &'a Reference,
    pub query: &'a Query,
    pub ref_aln: String,
    pub query_aln: String,
    pub ref_start: usize,
    pub ref_end: usize,
    pub query_start: usize,
    pub query_end: usize,
    pub score: f64,
    /// Set on the top-ranked hit of a result batch by the best-hit selector
    pub is_best: bool,
    pub context: DetectionContext,
}

impl<'a> AlignedSeq<'a> {
    /// Build a hit from an alignment of `query` against
    /// `reference.sequence[offset..]`.
    pub(crate) fn from_alignment(
        reference: &'a Reference,
        query: &'a Query,
        alignment: Alignment,
        offset: usize,
        context: DetectionContext,
    ) -> Self {
        Self {
            reference,
            query,
            ref_start: alignment.ref_start + offset,
            ref_end: alignment.ref_end + offset,
            query_start: alignment.query_start,
            query_end: alignment.query_end,
            score: f64::from(alignment.score),
            ref_aln: alignment.ref_aln,
            query_aln: alignment.query_aln,
            is_best: false,
            context,
        }
    }

    /// Alignment score divided by the query's null score
    #[must_use]
    pub fn normalized_score(&self) -> f64 {
        self.score / self.query.null_score
    }

    #[must_use]
    pub fn metrics(&self) -> HitMetrics {
        HitMetrics::calculate(self)
    }

    /// Number of alignment columns (including gap columns)
    #[must_use]
    pub fn columns(&self) -> usize {
        self.ref_aln.len()
    }

    /// Whether two hits share at least one reference position
    #[must_use]
    pub fn overlaps(&self, other: &AlignedSeq<'_>) -> bool {
        self.ref_start < other.ref_end && other.ref_start < self.ref_end
    }

    /// Two-line dump of the gapped alignment, each line prefixed with `@`
    #[must_use]
    pub fn alignment_string(&self) -> String {
        format!(
            "@\t{}\t+\t{}\t{}\t{}\n@\t{}\t{}\t{}\t{}\t{}",
            self.ref_aln,
            self.ref_start,
            self.ref_end,
            self.reference.name,
            self.query_aln,
            self.query.strand,
            self.query_start,
            self.query_end,
            self.query.name,
        )
    }

    /// Owned, serializable snapshot of the hit and its metrics
    #[must_use]
    pub fn record(&self, with_alignment: bool) -> HitRecord {
        let metrics = self.metrics();
        HitRecord {
            reference: self.reference.name.clone(),
            ref_start: self.ref_start,
            ref_end: self.ref_end,
            query: self.query.name.clone(),
            query_start: self.query_start,
            query_end: self.query_end,
            strand: self.query.strand.to_string(),
            map_qual: metrics.mapping_quality,
            raw_score: self.score,
            acc: metrics.raw_accuracy,
            clip_acc: metrics.clipped_accuracy,
            query_cov: metrics.query_coverage,
            best: self.is_best,
            ref_aln: with_alignment.then(|| self.ref_aln.clone()),
            query_aln: with_alignment.then(|| self.query_aln.clone()),
        }
    }
}

/// Tab-separated row in [`HIT_FIELDS`] order
impl fmt::Display for AlignedSeq<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let metrics = self.metrics();
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.2}\t{:.0}\t{:.2}\t{:.2}\t{:.2}",
            self.reference.name,
            self.ref_start,
            self.ref_end,
            self.query.name,
            self.query_start,
            self.query_end,
            self.query.strand,
            metrics.mapping_quality,
            self.score,
            metrics.raw_accuracy,
            metrics.clipped_accuracy,
            metrics.query_coverage,
        )
    }
}

/// Header line matching the `Display` output of [`AlignedSeq`]
#[must_use]
pub fn header_line() -> String {
    HIT_FIELDS.join("\t")
}

/// A hit detached from its reference and query, for serialization
#[derive(Debug, Clone, Serialize)]
pub struct HitRecord {
    #[serde(rename = "ref")]
    pub reference: String,
    pub ref_start: usize,
    pub ref_end: usize,
    pub query: String,
    pub query_start: usize,
    pub query_end: usize,
    pub strand: String,
    pub map_qual: f64,
    pub raw_score: f64,
    pub acc: f64,
    pub clip_acc: f64,
    pub query_cov: f64,
    pub best: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_aln: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_aln: Option<String>,
}
