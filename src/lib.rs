//! # seqfish
//!
//! A library for detecting short sequences (adapters, barcodes, motifs) inside
//! longer sequences such as sequencing reads.
//!
//! Reads coming off a sequencer often carry known flanking sequences that need
//! to be trimmed or used for classification. Their positions are not fixed and
//! the reads contain errors, so exact string search is not enough.
//!
//! `seqfish` aligns every query to candidate ranges of each read with an
//! affine-gap Smith-Waterman alignment and keeps the hits whose score is close
//! enough to the query's self-alignment score.
//!
//! ## Features
//!
//! - **Local alignment**: Gotoh's affine-gap Smith-Waterman with configurable scores
//! - **Normalised scoring**: Scores relative to each query's self-alignment
//! - **Both strands**: Reverse complements are searched unless stranded
//! - **Target ranges**: Restrict the search to read ends or BED intervals
//! - **Recursive search**: All non-overlapping hits instead of the best one
//! - **Hit metrics**: Mapping quality, accuracy, clipped accuracy and query coverage
//!
//! ## Example
//!
//! ```rust
//! use seqfish::{Detector, DetectorConfig, Range, Reference};
//!
//! let mut detector = Detector::new(DetectorConfig::from_min_qual(10.0));
//! detector.add_anonymous_queries(&["ACGGCGCCAGGCGACCGGAC"]).unwrap();
//!
//! // Search only the first 40 bases of the read
//! let read = Reference::new("read1", b"TTTTTACGGCGCCAGGCGACCGGACTTTTTTTTTTTTTTTTTTTT".to_vec())
//!     .with_ranges(vec![Range::new(f64::NAN, 40.0)]);
//!
//! for hit in detector.detect(&read, false).unwrap() {
//!     println!("{hit}");
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Core data types for ranges, queries, references and hits
//! - [`matching`]: Alignment engine, detector and hit metrics
//! - [`parsing`]: Parsers for FASTA/FASTQ and BED files
//! - [`stats`]: Per-file sequence statistics
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod stats;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::hit::{AlignedSeq, HitRecord};
pub use core::query::Query;
pub use core::range::Range;
pub use core::reference::Reference;
pub use core::sequence::Strand;
pub use matching::align::{align_local, AlignParams, Alignment};
pub use matching::detector::{Detector, DetectorConfig};
pub use matching::metrics::HitMetrics;
