use thiserror::Error;

use crate::core::sequence::Strand;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Query '{0}' has an empty sequence")]
    EmptySequence(String),
}

/// A short sequence to search for (adapter, barcode, motif, ...)
///
/// One logical query usually yields two `Query` values, the forward sequence
/// and its reverse complement, sharing the same name and null score.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Query name (FASTA id, or `q0`, `q1`, ... for literal sequences)
    pub name: String,

    /// Upper-case nucleotide sequence, already oriented for `strand`
    pub sequence: Vec<u8>,

    /// Orientation of `sequence` relative to the logical query
    pub strand: Strand,

    /// Normalisation baseline for alignment scores (`NaN` when unsupported)
    pub null_score: f64,
}

impl Query {
    /// # Errors
    ///
    /// Returns `QueryError::EmptySequence` if `sequence` is empty.
    pub fn new(
        name: impl Into<String>,
        sequence: Vec<u8>,
        strand: Strand,
        null_score: f64,
    ) -> Result<Self, QueryError> {
        let name = name.into();
        if sequence.is_empty() {
            return Err(QueryError::EmptySequence(name));
        }
        Ok(Self {
            name,
            sequence,
            strand,
            null_score,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}
