//! Per-file sequence statistics.
//!
//! Each file is read once; record lengths feed a [`LengthStats`], and with
//! `all` enabled gap letters, GC content and FASTQ base qualities are counted
//! as well.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::parsing::fastx;
use crate::parsing::ParseError;
use crate::utils::format::round_to;

pub mod lengths;

pub use lengths::LengthStats;

/// Number of leading residues of the first record used to guess the sequence type
pub const TYPE_GUESS_LENGTH: usize = 10_000;

const DNA_LETTERS: &[u8] = b"ACGTRYSWKMBDHVN";
const RNA_LETTERS: &[u8] = b"ACGURYSWKMBDHVN";

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Invalid gap letters '{0}': must be a non-empty ASCII string")]
    InvalidGapLetters(String),

    #[error("Unknown FASTQ quality encoding '{0}'")]
    UnknownEncoding(String),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// FASTQ quality encoding, determining the ASCII offset of quality scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum QualityEncoding {
    #[default]
    Sanger,
    Solexa,
    Illumina13,
    Illumina15,
    Illumina18,
}

impl QualityEncoding {
    #[must_use]
    pub fn offset(self) -> u8 {
        match self {
            Self::Sanger | Self::Illumina18 => 33,
            Self::Solexa | Self::Illumina13 | Self::Illumina15 => 64,
        }
    }
}

impl FromStr for QualityEncoding {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sanger" => Ok(Self::Sanger),
            "solexa" => Ok(Self::Solexa),
            "illumina-1.3+" => Ok(Self::Illumina13),
            "illumina-1.5+" => Ok(Self::Illumina15),
            "illumina-1.8+" => Ok(Self::Illumina18),
            _ => Err(StatsError::UnknownEncoding(s.to_string())),
        }
    }
}

impl fmt::Display for QualityEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sanger => "sanger",
            Self::Solexa => "solexa",
            Self::Illumina13 => "illumina-1.3+",
            Self::Illumina15 => "illumina-1.5+",
            Self::Illumina18 => "illumina-1.8+",
        };
        write!(f, "{name}")
    }
}

/// Options shared by all files of one statistics run
#[derive(Debug, Clone)]
pub struct StatsOptions {
    /// Also compute quartiles, N50, gaps, quality and GC shares
    pub all: bool,
    gap_letters: Vec<u8>,
    pub encoding: QualityEncoding,
}

impl StatsOptions {
    /// # Errors
    ///
    /// Returns `StatsError::InvalidGapLetters` if `gap_letters` is empty or not ASCII.
    pub fn new(all: bool, gap_letters: &str, encoding: QualityEncoding) -> Result<Self, StatsError> {
        if gap_letters.is_empty() || !gap_letters.is_ascii() {
            return Err(StatsError::InvalidGapLetters(gap_letters.to_string()));
        }
        Ok(Self {
            all,
            gap_letters: gap_letters.as_bytes().to_vec(),
            encoding,
        })
    }

    #[must_use]
    pub fn gap_letters(&self) -> &[u8] {
        &self.gap_letters
    }
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            all: false,
            gap_letters: b"- .".to_vec(),
            encoding: QualityEncoding::default(),
        }
    }
}

/// Statistics of one sequence file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileStats {
    pub file: String,
    /// `FASTA`, `FASTQ`, or empty for a file without records
    pub format: String,
    /// `DNA`, `RNA`, `Protein`, or empty for a file without records
    #[serde(rename = "type")]
    pub seq_type: String,
    pub num_seqs: u64,
    pub sum_len: u64,
    pub min_len: u64,
    pub avg_len: f64,
    pub max_len: u64,
    #[serde(flatten)]
    pub extended: Option<ExtendedStats>,
}

/// Statistics only computed with `all`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtendedStats {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    pub sum_gap: u64,
    pub n50: u64,
    pub l50: usize,
    pub q20: f64,
    pub q30: f64,
    pub gc: f64,
}

/// Guess the alphabet of a sequence from its leading residues
#[must_use]
pub fn guess_seq_type(sequence: &[u8], gap_letters: &[u8]) -> &'static str {
    let residues = sequence
        .iter()
        .take(TYPE_GUESS_LENGTH)
        .map(u8::to_ascii_uppercase)
        .filter(|b| !gap_letters.contains(b) && *b != b'*');

    let (mut dna, mut rna) = (true, true);
    for b in residues {
        dna &= DNA_LETTERS.contains(&b);
        rna &= RNA_LETTERS.contains(&b);
        if !dna && !rna {
            break;
        }
    }

    if dna {
        "DNA"
    } else if rna {
        "RNA"
    } else {
        "Protein"
    }
}

fn percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let share = count as f64 / total as f64;
    round_to(share * 100.0, 2)
}

/// Compute statistics of one file, reported under `label`.
///
/// # Errors
///
/// Returns `StatsError::Parse` if the file cannot be opened or parsed.
pub fn stat_file(path: &Path, label: String, options: &StatsOptions) -> Result<FileStats, StatsError> {
    let reader = fastx::open(path)?;
    let format = reader.format();

    let mut lengths = LengthStats::new();
    let mut seq_type = "";
    let (mut gaps, mut gc, mut q20, mut q30) = (0u64, 0u64, 0u64, 0u64);
    let offset = i32::from(options.encoding.offset());

    for record in reader {
        let record = record?;
        if lengths.count() == 0 {
            seq_type = guess_seq_type(&record.sequence, options.gap_letters());
        }
        lengths.add(record.sequence.len() as u64);

        if options.all {
            for &b in &record.sequence {
                if options.gap_letters().contains(&b) {
                    gaps += 1;
                }
                if matches!(b, b'G' | b'C' | b'g' | b'c') {
                    gc += 1;
                }
            }
            if let Some(quality) = &record.quality {
                for &q in quality {
                    let score = i32::from(q) - offset;
                    if score >= 20 {
                        q20 += 1;
                    }
                    if score >= 30 {
                        q30 += 1;
                    }
                }
            }
        }
    }

    let extended = options.all.then(|| {
        let (q1, q2, q3) = lengths.quartiles();
        ExtendedStats {
            q1,
            q2,
            q3,
            sum_gap: gaps,
            n50: lengths.n50(),
            l50: lengths.l50(),
            q20: percent(q20, lengths.sum()),
            q30: percent(q30, lengths.sum()),
            gc: percent(gc, lengths.sum()),
        }
    });

    Ok(FileStats {
        file: label,
        format: format
            .filter(|_| lengths.count() > 0)
            .map(|f| f.to_string())
            .unwrap_or_default(),
        seq_type: seq_type.to_string(),
        num_seqs: lengths.count(),
        sum_len: lengths.sum(),
        min_len: lengths.min(),
        avg_len: round_to(lengths.mean(), 1),
        max_len: lengths.max(),
        extended,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(content: &[u8]) -> NamedTempFile {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(content).unwrap();
        temp.flush().unwrap();
        temp
    }

    #[test]
    fn test_quality_encoding() {
        assert_eq!("sanger".parse::<QualityEncoding>().unwrap().offset(), 33);
        assert_eq!("solexa".parse::<QualityEncoding>().unwrap().offset(), 64);
        assert_eq!("illumina-1.5+".parse::<QualityEncoding>().unwrap().offset(), 64);
        assert_eq!("Illumina-1.8+".parse::<QualityEncoding>().unwrap(), QualityEncoding::Illumina18);
        assert!(matches!(
            "phred99".parse::<QualityEncoding>(),
            Err(StatsError::UnknownEncoding(_))
        ));
        assert_eq!(QualityEncoding::Illumina13.to_string(), "illumina-1.3+");
    }

    #[test]
    fn test_invalid_gap_letters() {
        assert!(StatsOptions::new(true, "", QualityEncoding::Sanger).is_err());
        assert!(StatsOptions::new(true, "-é", QualityEncoding::Sanger).is_err());
        assert!(StatsOptions::new(true, "-", QualityEncoding::Sanger).is_ok());
    }

    #[test]
    fn test_guess_seq_type() {
        assert_eq!(guess_seq_type(b"ACGTNacgt", b"-"), "DNA");
        assert_eq!(guess_seq_type(b"ACGU-ACGU", b"-"), "RNA");
        assert_eq!(guess_seq_type(b"MKLVFFAE*", b"-"), "Protein");
    }

    #[test]
    fn test_stat_fasta() {
        let temp = temp_file(b">a\nACGT\n>b\nAC-GGG\n>c\nAA\n");
        let stats = stat_file(temp.path(), "f.fa".to_string(), &StatsOptions::default()).unwrap();

        assert_eq!(stats.file, "f.fa");
        assert_eq!(stats.format, "FASTA");
        assert_eq!(stats.seq_type, "DNA");
        assert_eq!(stats.num_seqs, 3);
        assert_eq!(stats.sum_len, 12);
        assert_eq!(stats.min_len, 2);
        assert_eq!(stats.max_len, 6);
        assert!((stats.avg_len - 4.0).abs() < f64::EPSILON);
        assert!(stats.extended.is_none());
    }

    #[test]
    fn test_stat_all() {
        let temp = temp_file(b">a\nACGT\n>b\nAC-GGG\n>c\nAA\n");
        let options = StatsOptions::new(true, "- .", QualityEncoding::Sanger).unwrap();
        let stats = stat_file(temp.path(), "f.fa".to_string(), &options).unwrap();

        let ext = stats.extended.unwrap();
        assert_eq!(ext.sum_gap, 1);
        assert_eq!((ext.q1, ext.q2, ext.q3), (2.0, 4.0, 6.0));
        assert_eq!(ext.n50, 6);
        assert_eq!(ext.l50, 1);
        // G/C: CG + CGGG = 6 of 12
        assert!((ext.gc - 50.0).abs() < 1e-9);
        assert!(ext.q20.abs() < f64::EPSILON);
    }

    #[test]
    fn test_stat_fastq_qualities() {
        // '5' = Q20, '?' = Q30, '#' = Q2 under sanger
        let temp = temp_file(b"@r1\nACGT\n+\n5?##\n");
        let options = StatsOptions::new(true, "-", QualityEncoding::Sanger).unwrap();
        let stats = stat_file(temp.path(), "r.fq".to_string(), &options).unwrap();

        assert_eq!(stats.format, "FASTQ");
        let ext = stats.extended.unwrap();
        assert!((ext.q20 - 50.0).abs() < 1e-9);
        assert!((ext.q30 - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_stat_empty_file() {
        let temp = temp_file(b"");
        let options = StatsOptions::new(true, "-", QualityEncoding::Sanger).unwrap();
        let stats = stat_file(temp.path(), "empty".to_string(), &options).unwrap();

        assert_eq!(stats.format, "");
        assert_eq!(stats.seq_type, "");
        assert_eq!(stats.num_seqs, 0);
        assert!(stats.avg_len.abs() < f64::EPSILON);
    }

    #[test]
    fn test_stat_json_fields() {
        let temp = temp_file(b">a\nACGT\n");
        let options = StatsOptions::new(true, "-", QualityEncoding::Sanger).unwrap();
        let stats = stat_file(temp.path(), "a.fa".to_string(), &options).unwrap();

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["type"], "DNA");
        assert_eq!(json["l50"], 1);
        assert_eq!(json["num_seqs"], 1);
    }
}
