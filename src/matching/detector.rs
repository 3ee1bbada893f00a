use thiserror::Error;
use tracing::debug;

use crate::core::hit::{AlignedSeq, DetectionContext};
use crate::core::query::{Query, QueryError};
use crate::core::range::Range;
use crate::core::reference::Reference;
use crate::core::sequence::{normalize, reverse_complement, Strand};
use crate::matching::align::{align_local, AlignError, AlignParams};
use crate::matching::metrics::cutoff_for_quality;
use crate::matching::null_score::{null_score, NullMode};
use crate::matching::selection::select_best;

/// Default minimum mapping quality of reported hits
pub const DEFAULT_MIN_QUAL: f64 = 5.0;

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Align(#[from] AlignError),
}

/// Configuration for the detector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    /// Hits must have `score / null_score` strictly above this value
    pub cutoff: f64,
    /// Search the forward strand of each query only
    pub stranded: bool,
    /// How null scores are computed
    pub null_mode: NullMode,
    /// Alignment scoring scheme
    pub params: AlignParams,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::from_min_qual(DEFAULT_MIN_QUAL)
    }
}

impl DetectorConfig {
    /// Configuration whose cutoff keeps exactly the hits with mapping quality
    /// above `min_qual`
    #[must_use]
    pub fn from_min_qual(min_qual: f64) -> Self {
        Self {
            cutoff: cutoff_for_quality(min_qual),
            stranded: false,
            null_mode: NullMode::default(),
            params: AlignParams::default(),
        }
    }

    #[must_use]
    pub fn context(&self) -> DetectionContext {
        DetectionContext {
            cutoff: self.cutoff,
            null_mode: self.null_mode,
        }
    }
}

#[inline]
fn position(pos: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        pos as f64
    }
}

/// Finds occurrences of a set of queries inside references.
///
/// The detector owns its queries; hits borrow them together with the searched
/// reference, so a `&Detector` can be shared between worker threads.
#[derive(Debug, Clone)]
pub struct Detector {
    queries: Vec<Query>,
    config: DetectorConfig,
    anonymous: usize,
}

impl Detector {
    /// Create a detector without queries
    #[must_use]
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            queries: Vec::new(),
            config,
            anonymous: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Registered queries, forward and reverse variants interleaved
    #[must_use]
    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Register a logical query.
    ///
    /// The sequence is upper-cased and its null score computed once. Unless the
    /// detector is stranded, the reverse complement is registered as well,
    /// sharing the same name and null score.
    ///
    /// # Errors
    ///
    /// Returns `DetectorError::Query` for an empty sequence, or
    /// `DetectorError::Align` if the null score cannot be computed.
    pub fn add_query(&mut self, name: impl Into<String>, sequence: &[u8]) -> Result<(), DetectorError> {
        let name = name.into();
        let sequence = normalize(sequence);
        if sequence.is_empty() {
            return Err(QueryError::EmptySequence(name).into());
        }

        let null = null_score(&sequence, self.config.null_mode, &self.config.params)?;
        debug!("Query {} ({} bp): null score {}", name, sequence.len(), null);

        let reverse = (!self.config.stranded).then(|| reverse_complement(&sequence));
        self.queries
            .push(Query::new(name.clone(), sequence, Strand::Forward, null)?);
        if let Some(reverse) = reverse {
            self.queries
                .push(Query::new(name, reverse, Strand::Reverse, null)?);
        }
        Ok(())
    }

    /// Register literal sequences as queries named `q0`, `q1`, ...
    ///
    /// Numbering continues across calls.
    ///
    /// # Errors
    ///
    /// Same as [`Detector::add_query`].
    pub fn add_anonymous_queries<S: AsRef<[u8]>>(&mut self, sequences: &[S]) -> Result<(), DetectorError> {
        for sequence in sequences {
            let name = format!("q{}", self.anonymous);
            self.anonymous += 1;
            self.add_query(name, sequence.as_ref())?;
        }
        Ok(())
    }

    /// Search every candidate range of `reference`.
    ///
    /// Each range is resolved against the reference length first. Results of
    /// the ranges are concatenated in range order; within a range hits are
    /// ordered by descending score with the top hit flagged best.
    ///
    /// # Errors
    ///
    /// Returns `AlignError` if an alignment fails. This aborts the search.
    pub fn detect<'a>(&'a self, reference: &'a Reference, recursive: bool) -> Result<Vec<AlignedSeq<'a>>, AlignError> {
        let mut hits = Vec::new();
        for range in &reference.ranges {
            let resolved = range.resolve(reference.len());
            debug!("{}: searching {} (resolved {})", reference.name, range, resolved);
            let found = if recursive {
                self.detect_rec(reference, resolved)?
            } else {
                self.detect_once(reference, resolved)?
            };
            hits.extend(found);
        }
        Ok(hits)
    }

    /// Align every query once against `range` and keep hits above the cutoff.
    ///
    /// A zero-length range yields no hits.
    ///
    /// # Errors
    ///
    /// Returns `AlignError` if an alignment fails.
    pub fn detect_once<'a>(&'a self, reference: &'a Reference, range: Range) -> Result<Vec<AlignedSeq<'a>>, AlignError> {
        let range = range.resolve(reference.len());
        if range.is_empty() {
            return Ok(Vec::new());
        }
        let hits = self.scan(reference, range)?;
        Ok(select_best(hits, None))
    }

    /// Find all non-overlapping hits above the cutoff within `range`.
    ///
    /// The best hit of the range is kept, then the parts of the range left and
    /// right of it are searched the same way. Every kept hit has a non-empty
    /// alignment, so both parts are strictly smaller than `range`.
    ///
    /// # Errors
    ///
    /// Returns `AlignError` if an alignment fails.
    pub fn detect_rec<'a>(&'a self, reference: &'a Reference, range: Range) -> Result<Vec<AlignedSeq<'a>>, AlignError> {
        let range = range.resolve(reference.len());
        if range.is_empty() {
            return Ok(Vec::new());
        }

        let hits = self.scan(reference, range)?;
        let Some(best) = select_best(hits, Some(1)).pop() else {
            return Ok(Vec::new());
        };
        debug!(
            "{}: best hit {} at {}-{}, recursing",
            reference.name, best.query.name, best.ref_start, best.ref_end
        );

        let left = Range::new(range.start, position(best.ref_start));
        let right = Range::new(position(best.ref_end), range.end);

        let mut merged = vec![best];
        merged.extend(self.detect_rec(reference, left)?);
        merged.extend(self.detect_rec(reference, right)?);
        debug_assert!(merged[1..].iter().all(|h| !h.overlaps(&merged[0])));
        Ok(select_best(merged, None))
    }

    /// Align all queries against one resolved, non-empty range
    fn scan<'a>(&'a self, reference: &'a Reference, range: Range) -> Result<Vec<AlignedSeq<'a>>, AlignError> {
        let (start, end) = range.bounds();
        let window = &reference.sequence[start..end];
        let context = self.config.context();

        let mut hits = Vec::new();
        for query in &self.queries {
            let alignment = align_local(window, &query.sequence, &self.config.params)?;
            if alignment.is_empty() {
                continue;
            }
            let hit = AlignedSeq::from_alignment(reference, query, alignment, start, context);
            if hit.normalized_score() > self.config.cutoff {
                hits.push(hit);
            }
        }
        debug!("{}: {} hit(s) in {}..{}", reference.name, hits.len(), start, end);
        Ok(hits)
    }
}
