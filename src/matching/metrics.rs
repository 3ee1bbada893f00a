use serde::Serialize;

use crate::core::hit::AlignedSeq;

/// Mapping quality reported for a perfect hit (score equal to the null score)
pub const MAX_MAPPING_QUALITY: f64 = 60.0;

#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Reportable quality statistics of a hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HitMetrics {
    /// Phred-scaled `-10 * log10(1 - score / null_score)`, 60 for perfect hits
    pub mapping_quality: f64,

    /// Percent identical columns over the gapped alignment
    pub raw_accuracy: f64,

    /// Like `raw_accuracy`, but unaligned query flanks count as errors
    pub clipped_accuracy: f64,

    /// Percent of the query covered by the alignment
    pub query_coverage: f64,
}

impl HitMetrics {
    /// Derive metrics from a hit without modifying it
    #[must_use]
    pub fn calculate(hit: &AlignedSeq<'_>) -> Self {
        let columns = count_to_f64(hit.columns());
        let diff = count_to_f64(mismatch_count(&hit.ref_aln, &hit.query_aln));
        let query_len = hit.query.sequence.len();
        let unaligned_flanks = count_to_f64(query_len + hit.query_start - hit.query_end);

        Self {
            mapping_quality: mapping_quality(hit.score, hit.query.null_score),
            raw_accuracy: (columns - diff) * 100.0 / columns,
            clipped_accuracy: (columns - diff) * 100.0 / (columns + unaligned_flanks),
            query_coverage: count_to_f64(hit.query_end - hit.query_start) * 100.0
                / count_to_f64(query_len),
        }
    }
}

/// Phred-scaled confidence of a normalised score, capped at
/// [`MAX_MAPPING_QUALITY`] when the score reaches the null score
#[must_use]
pub fn mapping_quality(score: f64, null_score: f64) -> f64 {
    let mq = -10.0 * (1.0 - score / null_score).log10();
    if mq.is_infinite() && mq > 0.0 {
        MAX_MAPPING_QUALITY
    } else {
        mq
    }
}

/// Normalised score threshold equivalent to a minimum mapping quality:
/// `mapping_quality(s, n) > q` exactly when `s / n > cutoff_for_quality(q)`
#[must_use]
pub fn cutoff_for_quality(min_quality: f64) -> f64 {
    1.0 - 10f64.powf(-min_quality / 10.0)
}

/// Number of columns where the aligned strings differ (gap vs base included)
fn mismatch_count(ref_aln: &str, query_aln: &str) -> usize {
    ref_aln
        .bytes()
        .zip(query_aln.bytes())
        .filter(|(r, q)| r != q)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hit::DetectionContext;
    use crate::core::query::Query;
    use crate::core::reference::Reference;
    use crate::core::sequence::Strand;
    use crate::matching::align::Alignment;
    use crate::matching::null_score::NullMode;

    fn context() -> DetectionContext {
        DetectionContext {
            cutoff: 0.0,
            null_mode: NullMode::SelfAlignment,
        }
    }

    #[test]
    fn test_accuracy_with_two_mismatches() {
        let reference = Reference::new("r", b"ACGTACGTAC".to_vec());
        let query = Query::new("q", b"ACGTTCGTAA".to_vec(), Strand::Forward, 40.0).unwrap();
        let alignment = Alignment {
            ref_start: 0,
            ref_end: 10,
            query_start: 0,
            query_end: 10,
            score: 16,
            ref_aln: "ACGTACGTAC".to_string(),
            query_aln: "ACGTTCGTAA".to_string(),
        };
        let hit = AlignedSeq::from_alignment(&reference, &query, alignment, 0, context());
        let m = hit.metrics();
        assert!((m.raw_accuracy - 80.0).abs() < 1e-9);
        assert!((m.clipped_accuracy - 80.0).abs() < 1e-9);
        assert!((m.query_coverage - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_clipped_accuracy_penalises_flanks() {
        let reference = Reference::new("r", b"TTACGTTT".to_vec());
        // 4 of 8 query bases aligned: 2 clipped on each side
        let query = Query::new("q", b"GGACGTGG".to_vec(), Strand::Forward, 32.0).unwrap();
        let alignment = Alignment {
            ref_start: 2,
            ref_end: 6,
            query_start: 2,
            query_end: 6,
            score: 16,
            ref_aln: "ACGT".to_string(),
            query_aln: "ACGT".to_string(),
        };
        let hit = AlignedSeq::from_alignment(&reference, &query, alignment, 0, context());
        let m = hit.metrics();
        assert!((m.raw_accuracy - 100.0).abs() < 1e-9);
        assert!((m.clipped_accuracy - 50.0).abs() < 1e-9);
        assert!((m.query_coverage - 50.0).abs() < 1e-9);
        // 1 - 16/32 = 0.5 -> 3.01
        assert!((m.mapping_quality - 3.0103).abs() < 1e-3);
    }

    #[test]
    fn test_gap_counts_as_mismatch() {
        assert_eq!(mismatch_count("AC-T", "ACGT"), 1);
        assert_eq!(mismatch_count("ACGT", "ACGT"), 0);
    }

    #[test]
    fn test_mapping_quality_cap() {
        assert!((mapping_quality(40.0, 40.0) - MAX_MAPPING_QUALITY).abs() < f64::EPSILON);
        assert!((mapping_quality(36.0, 40.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_cutoff_inverts_mapping_quality() {
        let cutoff = cutoff_for_quality(10.0);
        assert!((cutoff - 0.9).abs() < 1e-12);
        assert!(mapping_quality(36.5, 40.0) > 10.0);
        assert!(36.5 / 40.0 > cutoff);
    }
}
