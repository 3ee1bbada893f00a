//! Query detection engine and alignment scoring.
//!
//! This module provides the core detection functionality:
//!
//! - [`align_local`]: Affine-gap local alignment of a reference window and a query
//! - [`null_score`]: Per-query normalisation baseline
//! - [`select_best`]: Stable ranking of hits with a single best flag
//! - [`Detector`]: Query registry with single-pass and recursive search
//! - [`HitMetrics`]: Mapping quality, accuracy and coverage of a hit
//!
//! ## Detection Algorithm
//!
//! For every candidate range of a reference, each registered query is aligned
//! once against the range. A hit is kept when `score / null_score` is above the
//! cutoff. In recursive mode the best hit is kept and the search continues in
//! the parts of the range left and right of it, so all returned hits are
//! non-overlapping.
//!
//! ## Example
//!
//! ```rust
//! use seqfish::core::reference::Reference;
//! use seqfish::matching::detector::{Detector, DetectorConfig};
//!
//! let mut detector = Detector::new(DetectorConfig::from_min_qual(10.0));
//! detector.add_query("adapter", b"ACGGCGCCAGGCGACCGGAC").unwrap();
//!
//! let read = Reference::new("read1", b"TTTTTACGGCGCCAGGCGACCGGACTTTTT".to_vec());
//! let hits = detector.detect(&read, true).unwrap();
//!
//! assert_eq!(hits.len(), 1);
//! assert_eq!((hits[0].ref_start, hits[0].ref_end), (5, 25));
//! ```
//!
//! [`align_local`]: align::align_local
//! [`null_score`]: null_score::null_score
//! [`select_best`]: selection::select_best
//! [`Detector`]: detector::Detector
//! [`HitMetrics`]: metrics::HitMetrics

pub mod align;
pub mod detector;
pub mod metrics;
pub mod null_score;
pub mod selection;
