//! Stats command - simple statistics of FASTA/FASTQ files.

use std::path::{Path, PathBuf};

use clap::Args;
use rayon::prelude::*;
use tracing::warn;

use crate::cli::OutputFormat;
use crate::parsing::fastx::STDIN_PATH;
use crate::stats::{stat_file, FileStats, QualityEncoding, StatsOptions};
use crate::utils::format::{comma, commaf, render_table, Column};

#[derive(Args)]
pub struct StatsArgs {
    /// Sequence files (FASTA or FASTQ, optionally gzipped)
    /// Use '-' for stdin
    #[arg(default_value = STDIN_PATH)]
    pub files: Vec<PathBuf>,

    /// All statistics, including quartiles of lengths, N50, gaps, Q20/Q30 and GC content
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Output in machine-friendly tabular format
    #[arg(short = 'T', long)]
    pub tabular: bool,

    /// Gap letters
    #[arg(short = 'G', long, default_value = "- .")]
    pub gap_letters: String,

    /// Skip files that cannot be read or parsed, with a warning
    #[arg(short = 'e', long)]
    pub skip_err: bool,

    /// FASTQ quality encoding: sanger, solexa, illumina-1.3+, illumina-1.5+, illumina-1.8+
    #[arg(short = 'E', long, default_value = "sanger")]
    pub fq_encoding: QualityEncoding,

    /// Only output the base name of files
    #[arg(short = 'b', long)]
    pub basename: bool,

    /// Label for replacing the default "-" for stdin
    #[arg(short = 'i', long, default_value = STDIN_PATH)]
    pub stdin_label: String,
}

const BASIC_COLUMNS: [&str; 8] = [
    "file", "format", "type", "num_seqs", "sum_len", "min_len", "avg_len", "max_len",
];

const EXTENDED_COLUMNS: [&str; 8] = [
    "Q1", "Q2", "Q3", "sum_gap", "N50", "Q20(%)", "Q30(%)", "GC(%)",
];

/// Execute the stats command
///
/// # Errors
///
/// Returns an error for invalid options, or for the first unreadable file
/// unless `--skip-err` is set.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: StatsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let options = StatsOptions::new(args.all, &args.gap_letters, args.fq_encoding)?;
    if verbose {
        eprintln!(
            "Computing statistics of {} file(s) ({} encoding)",
            args.files.len(),
            options.encoding
        );
    }

    let results: Vec<Option<FileStats>> = args
        .files
        .par_iter()
        .map(|path| {
            let label = file_label(path, &args);
            match stat_file(path, label, &options) {
                Ok(stats) => Ok(Some(stats)),
                Err(e) if args.skip_err => {
                    warn!("{}: {}", path.display(), e);
                    Ok(None)
                }
                Err(e) => Err(anyhow::Error::new(e).context(format!("Failed to read {}", path.display()))),
            }
        })
        .collect::<anyhow::Result<_>>()?;
    let stats: Vec<FileStats> = results.into_iter().flatten().collect();

    if args.tabular || format == OutputFormat::Tsv {
        print_tsv(&stats, args.all);
    } else if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_table(&stats, args.all);
    }
    Ok(())
}

fn file_label(path: &Path, args: &StatsArgs) -> String {
    if path == Path::new(STDIN_PATH) {
        return args.stdin_label.clone();
    }
    if args.basename {
        if let Some(name) = path.file_name() {
            return name.to_string_lossy().into_owned();
        }
    }
    path.display().to_string()
}

fn print_tsv(stats: &[FileStats], all: bool) {
    let mut header = BASIC_COLUMNS.to_vec();
    if all {
        header.extend(EXTENDED_COLUMNS);
    }
    println!("{}", header.join("\t"));

    for s in stats {
        let mut line = format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{:.1}\t{}",
            s.file, s.format, s.seq_type, s.num_seqs, s.sum_len, s.min_len, s.avg_len, s.max_len
        );
        if all {
            if let Some(ext) = &s.extended {
                line.push_str(&format!(
                    "\t{:.1}\t{:.1}\t{:.1}\t{}\t{}\t{:.2}\t{:.2}\t{:.2}",
                    ext.q1, ext.q2, ext.q3, ext.sum_gap, ext.n50, ext.q20, ext.q30, ext.gc
                ));
            }
        }
        println!("{line}");
    }
}

fn print_table(stats: &[FileStats], all: bool) {
    let mut columns: Vec<Column<'_>> = BASIC_COLUMNS
        .iter()
        .enumerate()
        .map(|(i, h)| if i < 3 { Column::left(h) } else { Column::right(h) })
        .collect();
    if all {
        columns.extend(EXTENDED_COLUMNS.iter().map(|h| Column::right(h)));
    }

    let rows: Vec<Vec<String>> = stats
        .iter()
        .map(|s| {
            let mut row = vec![
                s.file.clone(),
                s.format.clone(),
                s.seq_type.clone(),
                comma(s.num_seqs),
                comma(s.sum_len),
                comma(s.min_len),
                commaf(s.avg_len),
                comma(s.max_len),
            ];
            if all {
                if let Some(ext) = &s.extended {
                    row.extend([
                        commaf(ext.q1),
                        commaf(ext.q2),
                        commaf(ext.q3),
                        comma(ext.sum_gap),
                        comma(ext.n50),
                        commaf(ext.q20),
                        commaf(ext.q30),
                        commaf(ext.gc),
                    ]);
                }
            }
            row
        })
        .collect();

    print!("{}", render_table(&columns, &rows));
}
