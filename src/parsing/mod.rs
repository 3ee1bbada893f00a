//! Parsers for sequence and interval files.
//!
//! This module provides parsers for:
//!
//! - **FASTA/FASTQ files**: Plain or gzip/bgzip compressed, or standard input
//! - **BED files**: Candidate search ranges per sequence
//!
//! ## Example
//!
//! ```rust,no_run
//! use seqfish::parsing::fastx;
//! use std::path::Path;
//!
//! for record in fastx::open(Path::new("reads.fq.gz")).unwrap() {
//!     let record = record.unwrap();
//!     println!("{}\t{}", record.id, record.sequence.len());
//! }
//! ```

use thiserror::Error;

pub mod bed;
pub mod fastx;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("noodles error: {0}")]
    Noodles(String),
}
