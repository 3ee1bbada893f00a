//! Command-line interface for seqfish.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **detect** (alias `fish`): Find adapters, barcodes or motifs in reads by local alignment
//! - **stats** (alias `stat`): Summary statistics of FASTA/FASTQ files
//!
//! ## Usage
//!
//! ```text
//! # Look for two literal sequences in the first and last 200 bases of each read
//! seqfish detect -F ACGGCGCCAGG,CCGAGGCGCGAC -r :200,-200: reads.fq.gz
//!
//! # All non-overlapping hits of the adapters in a FASTA file, with alignments
//! seqfish detect -q adapters.fa -a -g reads.fa
//!
//! # Keep only reads without a hit
//! seqfish detect -q adapters.fa -i -o clean.fq reads.fq
//!
//! # File statistics as JSON
//! seqfish stats -a reads.fq --format json
//! ```

use clap::{Parser, Subcommand};

pub mod detect;
pub mod stats;

#[derive(Parser)]
#[command(name = "seqfish")]
#[command(version)]
#[command(about = "Detect short sequences in reads by local alignment")]
#[command(
    long_about = "seqfish locates adapters, barcodes and other short query sequences inside longer reads.\n\nEach query is aligned to candidate ranges of every read with an affine-gap Smith-Waterman alignment. Hits are scored relative to the query's self-alignment and reported with:\n- Mapping quality, accuracy and query coverage\n- Optionally all non-overlapping hits per read\n- Optional pass-through or inverted filtering of the reads"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Number of worker threads (0 uses all cores)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    pub threads: usize,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look for short sequences in larger sequences using local alignment
    #[command(visible_alias = "fish")]
    Detect(detect::DetectArgs),

    /// Simple statistics of FASTA/FASTQ files
    #[command(visible_alias = "stat")]
    Stats(stats::StatsArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
