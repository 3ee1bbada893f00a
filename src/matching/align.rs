//! Affine-gap local pairwise alignment (Gotoh's variant of Smith-Waterman).
//!
//! Three dynamic-programming matrices of size `(ref_len + 1) x (query_len + 1)`
//! are filled:
//!
//! - `H[i][j]`: best local score ending at `(i, j)`, never below 0
//! - `E[i][j]`: best score ending with a gap in the reference (query base consumed)
//! - `F[i][j]`: best score ending with a gap in the query (reference base consumed)
//!
//! ```text
//! E[i][j] = max(H[i][j-1] + gap_open, E[i][j-1] + gap_extend)
//! F[i][j] = max(H[i-1][j] + gap_open, F[i-1][j] + gap_extend)
//! H[i][j] = max(0, H[i-1][j-1] + s(ref[i-1], query[j-1]), E[i][j], F[i][j])
//! ```
//!
//! Traceback starts at the first maximal `H` cell in row-major order and stops
//! at the first `H` cell equal to 0.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const NEG_INF: i32 = i32::MIN / 4;

/// Symbol used for gap columns in the aligned strings
pub const GAP: u8 = b'-';

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AlignError {
    #[error("Cannot align an empty {which} sequence")]
    EmptySequence { which: &'static str },

    #[error("Invalid alignment parameters '{0}': expected <match>,<mismatch>,<gap_open>,<gap_extend>")]
    InvalidParams(String),
}

/// Scoring scheme for the aligner.
///
/// All four values are added to the running score, so penalties are negative.
/// A gap of length `L` scores `gap_open + (L - 1) * gap_extend`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignParams {
    /// Score for identical bases
    pub match_score: i32,
    /// Score for differing bases
    pub mismatch: i32,
    /// Score for the first position of a gap
    pub gap_open: i32,
    /// Score for each further position of a gap
    pub gap_extend: i32,
}

impl Default for AlignParams {
    fn default() -> Self {
        Self {
            match_score: 4,
            mismatch: -4,
            gap_open: -2,
            gap_extend: -1,
        }
    }
}

impl AlignParams {
    #[inline]
    fn substitution(&self, a: u8, b: u8) -> i32 {
        if a == b {
            self.match_score
        } else {
            self.mismatch
        }
    }
}

impl FromStr for AlignParams {
    type Err = AlignError;

    /// Parse `"<match>,<mismatch>,<gap_open>,<gap_extend>"`, e.g. `"4,-4,-2,-1"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values: Vec<i32> = s
            .split(',')
            .map(|v| v.trim().parse::<i32>())
            .collect::<Result<_, _>>()
            .map_err(|_| AlignError::InvalidParams(s.to_string()))?;

        match values.as_slice() {
            [match_score, mismatch, gap_open, gap_extend] => Ok(Self {
                match_score: *match_score,
                mismatch: *mismatch,
                gap_open: *gap_open,
                gap_extend: *gap_extend,
            }),
            _ => Err(AlignError::InvalidParams(s.to_string())),
        }
    }
}

/// Result of a local alignment.
///
/// Coordinates are 0-based, half-open and relative to the sequences passed to
/// [`align_local`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub ref_start: usize,
    pub ref_end: usize,
    pub query_start: usize,
    pub query_end: usize,
    /// Value of `H` at the traceback start cell
    pub score: i32,
    /// Reference side of the alignment, `-` for gaps
    pub ref_aln: String,
    /// Query side of the alignment, `-` for gaps
    pub query_aln: String,
}

impl Alignment {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ref_end == self.ref_start
    }
}

#[derive(Clone, Copy)]
enum State {
    Best,
    GapInRef,
    GapInQuery,
}

/// Dense row-major score matrix
struct Matrix {
    cols: usize,
    cells: Vec<i32>,
}

impl Matrix {
    fn new(rows: usize, cols: usize, fill: i32) -> Self {
        Self {
            cols,
            cells: vec![fill; rows * cols],
        }
    }

    #[inline]
    fn get(&self, i: usize, j: usize) -> i32 {
        self.cells[i * self.cols + j]
    }

    #[inline]
    fn set(&mut self, i: usize, j: usize, v: i32) {
        self.cells[i * self.cols + j] = v;
    }
}

/// Locally align `query` against `reference`.
///
/// # Errors
///
/// Returns `AlignError::EmptySequence` if either sequence is empty.
pub fn align_local(
    reference: &[u8],
    query: &[u8],
    params: &AlignParams,
) -> Result<Alignment, AlignError> {
    if reference.is_empty() {
        return Err(AlignError::EmptySequence { which: "reference" });
    }
    if query.is_empty() {
        return Err(AlignError::EmptySequence { which: "query" });
    }

    let n = reference.len();
    let m = query.len();

    let mut h = Matrix::new(n + 1, m + 1, 0);
    let mut e = Matrix::new(n + 1, m + 1, NEG_INF);
    let mut f = Matrix::new(n + 1, m + 1, NEG_INF);

    let (mut max_i, mut max_j, mut max_score) = (0usize, 0usize, 0i32);

    for i in 1..=n {
        for j in 1..=m {
            let e_ij = (h.get(i, j - 1) + params.gap_open).max(e.get(i, j - 1) + params.gap_extend);
            let f_ij = (h.get(i - 1, j) + params.gap_open).max(f.get(i - 1, j) + params.gap_extend);
            let diag = h.get(i - 1, j - 1) + params.substitution(reference[i - 1], query[j - 1]);
            let h_ij = 0i32.max(diag).max(e_ij).max(f_ij);

            e.set(i, j, e_ij);
            f.set(i, j, f_ij);
            h.set(i, j, h_ij);

            // Strictly greater keeps the earliest row, then earliest column
            if h_ij > max_score {
                max_score = h_ij;
                max_i = i;
                max_j = j;
            }
        }
    }

    let (mut i, mut j) = (max_i, max_j);
    let mut ref_aln: Vec<u8> = Vec::new();
    let mut query_aln: Vec<u8> = Vec::new();
    let mut state = State::Best;

    loop {
        match state {
            State::Best => {
                let v = h.get(i, j);
                if v == 0 {
                    break;
                }
                let diag =
                    h.get(i - 1, j - 1) + params.substitution(reference[i - 1], query[j - 1]);
                if v == diag {
                    ref_aln.push(reference[i - 1]);
                    query_aln.push(query[j - 1]);
                    i -= 1;
                    j -= 1;
                } else if v == f.get(i, j) {
                    state = State::GapInQuery;
                } else {
                    state = State::GapInRef;
                }
            }
            State::GapInQuery => {
                ref_aln.push(reference[i - 1]);
                query_aln.push(GAP);
                let opened = f.get(i, j) == h.get(i - 1, j) + params.gap_open;
                i -= 1;
                if opened {
                    state = State::Best;
                }
            }
            State::GapInRef => {
                ref_aln.push(GAP);
                query_aln.push(query[j - 1]);
                let opened = e.get(i, j) == h.get(i, j - 1) + params.gap_open;
                j -= 1;
                if opened {
                    state = State::Best;
                }
            }
        }
    }

    ref_aln.reverse();
    query_aln.reverse();

    Ok(Alignment {
        ref_start: i,
        ref_end: max_i,
        query_start: j,
        query_end: max_j,
        score: max_score,
        ref_aln: String::from_utf8_lossy(&ref_aln).into_owned(),
        query_aln: String::from_utf8_lossy(&query_aln).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> AlignParams {
        AlignParams::default()
    }

    #[test]
    fn test_exact_substring() {
        let aln = align_local(b"TTTTACGTACGTTTTT", b"ACGTACG", &params()).unwrap();
        assert_eq!(aln.score, 7 * 4);
        assert_eq!((aln.ref_start, aln.ref_end), (4, 11));
        assert_eq!((aln.query_start, aln.query_end), (0, 7));
        assert_eq!(aln.ref_aln, "ACGTACG");
        assert_eq!(aln.query_aln, "ACGTACG");
    }

    #[test]
    fn test_self_alignment_score() {
        let q = b"GATTACAGATTACA";
        let aln = align_local(q, q, &params()).unwrap();
        assert_eq!(aln.score, 4 * 14);
        assert_eq!((aln.ref_start, aln.ref_end), (0, 14));
    }

    #[test]
    fn test_mismatch_inside() {
        // One mismatch in the middle: 9 matches, 1 mismatch
        let aln = align_local(b"CCCCACGTAGGTACCCCC", b"ACGTACGTAC", &params()).unwrap();
        assert_eq!(aln.score, 9 * 4 - 4);
        assert_eq!(aln.ref_aln.len(), aln.query_aln.len());
        assert_eq!(aln.ref_aln, "ACGTAGGTAC");
    }

    #[test]
    fn test_gap_in_reference() {
        // Query has one extra base relative to the reference
        let reference = b"GGGGACGTACGTTTGCAGGGG";
        let query = b"ACGTACGTATTGCA";
        let aln = align_local(reference, query, &params()).unwrap();
        assert_eq!(aln.ref_aln.len(), aln.query_aln.len());
        assert!(aln.ref_aln.contains('-'));
        assert!(!aln.query_aln.contains('-'));
        // 13 matches and a single gap opening
        assert_eq!(aln.score, 13 * 4 - 2);
        assert_eq!((aln.query_start, aln.query_end), (0, 14));
    }

    #[test]
    fn test_gap_in_query() {
        let reference = b"GGGGACGTACGTATTGCAGGGG";
        let query = b"ACGTACGTTTGCA";
        let aln = align_local(reference, query, &params()).unwrap();
        assert!(aln.query_aln.contains('-'));
        assert_eq!(aln.score, 13 * 4 - 2);
        assert_eq!((aln.ref_start, aln.ref_end), (4, 18));
    }

    #[test]
    fn test_no_positive_cell() {
        let aln = align_local(b"AAAA", b"CCCC", &params()).unwrap();
        assert_eq!(aln.score, 0);
        assert!(aln.is_empty());
        assert!(aln.ref_aln.is_empty());
    }

    #[test]
    fn test_traceback_prefers_diagonal_then_vertical() {
        // The extra reference T can be gapped at either of two columns
        let aln = align_local(b"GGACGTTGCAGG", b"ACGTGCA", &params()).unwrap();
        assert_eq!(aln.score, 26);
        assert_eq!(aln.ref_aln, "ACGTTGCA");
        assert_eq!(aln.query_aln, "ACG-TGCA");
        assert_eq!((aln.ref_start, aln.ref_end), (2, 10));
        assert_eq!(aln.ref_aln.len(), aln.query_aln.len());
    }

    #[test]
    fn test_traceback_long_gap() {
        // A three-base gap scores open + 2 * extend
        let aln = align_local(b"ACGTACGAAATGCATGCA", b"ACGTACGTGCATGCA", &params()).unwrap();
        assert_eq!(aln.score, 15 * 4 - 2 - 2);
        assert_eq!(aln.ref_aln, "ACGTACGAAATGCATGCA");
        assert_eq!(aln.query_aln, "ACGTACG---TGCATGCA");
    }

    #[test]
    fn test_ties_take_earliest_cell() {
        let aln = align_local(b"ACGTTTTTACGT", b"ACGT", &params()).unwrap();
        assert_eq!((aln.ref_start, aln.ref_end), (0, 4));
    }

    #[test]
    fn test_empty_input_fails() {
        assert_eq!(
            align_local(b"", b"ACGT", &params()),
            Err(AlignError::EmptySequence { which: "reference" })
        );
        assert_eq!(
            align_local(b"ACGT", b"", &params()),
            Err(AlignError::EmptySequence { which: "query" })
        );
    }

    #[test]
    fn test_parse_params() {
        let p: AlignParams = "4,-4,-2,-1".parse().unwrap();
        assert_eq!(p, AlignParams::default());
        let p: AlignParams = " 2, -3, -5, -2 ".parse().unwrap();
        assert_eq!(p.gap_open, -5);
        assert!("4,-4,-2".parse::<AlignParams>().is_err());
        assert!("a,b,c,d".parse::<AlignParams>().is_err());
    }
}
