use crate::core::hit::AlignedSeq;

/// Rank hits by score and flag the top one.
///
/// Hits are stable-sorted by descending score, so equal scores keep their
/// input order. `is_best` is cleared everywhere and then set on the first hit
/// only. At most `limit` hits are returned; `None` keeps all of them.
#[must_use]
pub fn select_best(mut hits: Vec<AlignedSeq<'_>>, limit: Option<usize>) -> Vec<AlignedSeq<'_>> {
    // `sort_by` is stable
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));

    for hit in &mut hits {
        hit.is_best = false;
    }
    if let Some(first) = hits.first_mut() {
        first.is_best = true;
    }

    if let Some(n) = limit {
        hits.truncate(n);
    }
    hits
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

    fn hit<'a>(reference: &'a Reference, query: &'a Query, start: usize, score: i32) -> AlignedSeq<'a> {
        let alignment = Alignment {
            ref_start: start,
            ref_end: start + 4,
            query_start: 0,
            query_end: 4,
            score,
            ref_aln: "ACGT".to_string(),
            query_aln: "ACGT".to_string(),
        };
        let context = DetectionContext {
            cutoff: 0.0,
            null_mode: NullMode::SelfAlignment,
        };
        AlignedSeq::from_alignment(reference, query, alignment, 0, context)
    }

    #[test]
    fn test_sorted_descending_with_best_flag() {
        let reference = Reference::new("r", vec![b'A'; 40]);
        let query = Query::new("q", b"ACGT".to_vec(), Strand::Forward, 16.0).unwrap();
        let hits = vec![
            hit(&reference, &query, 0, 4),
            hit(&reference, &query, 10, 16),
            hit(&reference, &query, 20, 8),
        ];

        let ranked = select_best(hits, None);
        let scores: Vec<f64> = ranked.iter().map(|h| h.score).collect();
        assert_eq!(scores, vec![16.0, 8.0, 4.0]);
        assert!(ranked[0].is_best);
        assert!(ranked[1..].iter().all(|h| !h.is_best));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let reference = Reference::new("r", vec![b'A'; 40]);
        let query = Query::new("q", b"ACGT".to_vec(), Strand::Forward, 16.0).unwrap();
        let hits = vec![
            hit(&reference, &query, 20, 12),
            hit(&reference, &query, 0, 12),
            hit(&reference, &query, 10, 12),
        ];

        let best = select_best(hits, Some(1));
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].ref_start, 20);
        assert!(best[0].is_best);
    }

    #[test]
    fn test_reselection_leaves_single_best() {
        let reference = Reference::new("r", vec![b'A'; 40]);
        let query = Query::new("q", b"ACGT".to_vec(), Strand::Forward, 16.0).unwrap();
        let mut low = hit(&reference, &query, 0, 4);
        low.is_best = true;
        let hits = vec![low, hit(&reference, &query, 10, 16)];

        let ranked = select_best(hits, None);
        assert_eq!(ranked.iter().filter(|h| h.is_best).count(), 1);
        assert_eq!(ranked[0].ref_start, 10);
    }

    #[test]
    fn test_empty_and_oversized_limit() {
        assert!(select_best(Vec::new(), Some(1)).is_empty());
        assert!(select_best(Vec::new(), None).is_empty());

        let reference = Reference::new("r", vec![b'A'; 40]);
        let query = Query::new("q", b"ACGT".to_vec(), Strand::Forward, 16.0).unwrap();
        let hits = vec![hit(&reference, &query, 0, 4)];
        assert_eq!(select_best(hits, Some(5)).len(), 1);
    }
}
