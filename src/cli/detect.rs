//! Detect command - find query sequences in reads by local alignment.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Args;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::cli::OutputFormat;
use crate::core::hit::{header_line, AlignedSeq, HitRecord};
use crate::core::range::{parse_range_list, Range};
use crate::core::reference::Reference;
use crate::core::sequence::normalize;
use crate::matching::align::AlignParams;
use crate::matching::detector::{Detector, DetectorConfig, DEFAULT_MIN_QUAL};
use crate::parsing::bed::{parse_bed_file, BedRanges};
use crate::parsing::fastx::{self, SeqRecord, STDIN_PATH};

/// Number of records detected in parallel at a time
const BATCH_SIZE: usize = 1024;

const STDOUT_PATH: &str = "-";

#[derive(Args)]
pub struct DetectArgs {
    /// Sequence files to search (FASTA or FASTQ, optionally gzipped)
    /// Use '-' for stdin
    #[arg(default_value = STDIN_PATH)]
    pub inputs: Vec<PathBuf>,

    /// FASTA/FASTQ file with the query sequences (repeatable)
    #[arg(short = 'q', long)]
    pub query_fasta: Vec<PathBuf>,

    /// Comma-separated literal query sequences, named q0, q1, ...
    #[arg(short = 'F', long, value_delimiter = ',')]
    pub query_sequences: Vec<String>,

    /// Target ranges, e.g. ":200,-200:" for both read ends (default: whole sequence)
    #[arg(short = 'r', long, default_value = "", allow_hyphen_values = true)]
    pub ranges: String,

    /// BED file with target ranges per sequence; overrides --ranges for listed sequences
    #[arg(short = 'b', long)]
    pub bed: Option<PathBuf>,

    /// Search recursively for all non-overlapping hits
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Search the forward strand of the queries only
    #[arg(short = 's', long)]
    pub stranded: bool,

    /// Minimum mapping quality of reported hits
    #[arg(short = 'm', long, default_value_t = DEFAULT_MIN_QUAL, allow_negative_numbers = true)]
    pub min_qual: f64,

    /// Alignment scores: match,mismatch,gap_open,gap_extend
    #[arg(short = 'p', long, default_value = "4,-4,-2,-1", allow_hyphen_values = true)]
    pub aln_params: AlignParams,

    /// Print the alignment after each hit
    #[arg(short = 'g', long)]
    pub print_aln: bool,

    /// Report sequences by their full header instead of their id
    #[arg(short = 'D', long)]
    pub print_desc: bool,

    /// Write sequences without hits to the output (hits go to stderr)
    #[arg(short = 'i', long)]
    pub invert: bool,

    /// Write every input sequence to the output (hits go to stderr)
    #[arg(short = 'x', long)]
    pub pass: bool,

    /// Output file, '-' for stdout
    #[arg(short = 'o', long, default_value = STDOUT_PATH)]
    pub out_file: PathBuf,
}

impl DetectArgs {
    fn passes_records(&self) -> bool {
        self.pass || self.invert
    }
}

/// Destinations of the hit table and of passed-through records
struct Outputs {
    out: Box<dyn Write>,
    stderr: io::Stderr,
    table_to_stderr: bool,
}

impl Outputs {
    fn table(&mut self) -> &mut dyn Write {
        if self.table_to_stderr {
            &mut self.stderr
        } else {
            &mut self.out
        }
    }

    fn records(&mut self) -> &mut dyn Write {
        &mut self.out
    }
}

#[derive(Debug, Default)]
struct Summary {
    references: usize,
    with_hits: usize,
    hits: usize,
}

/// Execute the detect command
///
/// # Errors
///
/// Returns an error if no queries are given, an input cannot be read or
/// parsed, or an alignment fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: DetectArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let ranges = parse_range_list(&args.ranges).context("Invalid --ranges")?;
    let bed = args
        .bed
        .as_deref()
        .map(|path| {
            parse_bed_file(path).with_context(|| format!("Failed to read BED file {}", path.display()))
        })
        .transpose()?;

    let detector = build_detector(&args)?;
    if verbose {
        let config = detector.config();
        eprintln!(
            "Loaded {} queries (cutoff {:.4}, null mode {})",
            detector.queries().len(),
            config.cutoff,
            config.null_mode,
        );
    }

    let mut outputs = Outputs {
        out: open_output(&args.out_file)?,
        stderr: io::stderr(),
        table_to_stderr: args.passes_records(),
    };

    if format != OutputFormat::Json {
        writeln!(outputs.table(), "{}", header_line())?;
    }

    let search = Search {
        detector: &detector,
        args: &args,
        ranges: &ranges,
        bed: bed.as_ref(),
        format,
    };
    let mut summary = Summary::default();
    let mut json_records = Vec::new();
    let mut batch = Vec::with_capacity(BATCH_SIZE);

    for input in &args.inputs {
        let reader =
            fastx::open(input).with_context(|| format!("Failed to open {}", input.display()))?;
        for record in reader {
            batch.push(record.with_context(|| format!("Failed to parse {}", input.display()))?);
            if batch.len() == BATCH_SIZE {
                search.process_batch(&batch, &mut outputs, &mut json_records, &mut summary)?;
                batch.clear();
            }
        }
    }
    search.process_batch(&batch, &mut outputs, &mut json_records, &mut summary)?;

    if format == OutputFormat::Json {
        writeln!(outputs.table(), "{}", serde_json::to_string_pretty(&json_records)?)?;
    }
    outputs.out.flush()?;
    outputs.stderr.flush()?;

    info!(
        "Searched {} sequences: {} with hits, {} hits reported",
        summary.references, summary.with_hits, summary.hits
    );
    Ok(())
}

fn build_detector(args: &DetectArgs) -> anyhow::Result<Detector> {
    let mut config = DetectorConfig::from_min_qual(args.min_qual);
    config.stranded = args.stranded;
    config.params = args.aln_params;
    let mut detector = Detector::new(config);

    for path in &args.query_fasta {
        let records = fastx::read_records(path)
            .with_context(|| format!("Failed to read queries from {}", path.display()))?;
        for record in records {
            detector
                .add_query(record.id.clone(), &record.sequence)
                .with_context(|| format!("Invalid query '{}' in {}", record.id, path.display()))?;
        }
    }
    detector
        .add_anonymous_queries(&args.query_sequences)
        .context("Invalid --query-sequences")?;

    if detector.is_empty() {
        bail!("No queries given: use --query-fasta and/or --query-sequences");
    }
    Ok(detector)
}

fn open_output(path: &Path) -> anyhow::Result<Box<dyn Write>> {
    if path == Path::new(STDOUT_PATH) {
        Ok(Box::new(BufWriter::new(io::stdout())))
    } else {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file {}", path.display()))?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

/// Everything needed to search one batch of records
struct Search<'a> {
    detector: &'a Detector,
    args: &'a DetectArgs,
    ranges: &'a [Range],
    bed: Option<&'a BedRanges>,
    format: OutputFormat,
}

impl Search<'_> {
    fn to_reference(&self, record: &SeqRecord) -> Reference {
        let name = if self.args.print_desc {
            record.full_name()
        } else {
            record.id.clone()
        };
        let ranges = self
            .bed
            .and_then(|bed| bed.get(&record.id))
            .map_or_else(|| self.ranges.to_vec(), Clone::clone);
        Reference::new(name, normalize(&record.sequence)).with_ranges(ranges)
    }

    /// Detect hits in a batch of records in parallel, then write them in input order
    fn process_batch(
        &self,
        records: &[SeqRecord],
        outputs: &mut Outputs,
        json_records: &mut Vec<HitRecord>,
        summary: &mut Summary,
    ) -> anyhow::Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let references: Vec<Reference> = records.iter().map(|r| self.to_reference(r)).collect();
        let results: Vec<Vec<AlignedSeq<'_>>> = references
            .par_iter()
            .map(|reference| self.detector.detect(reference, self.args.all))
            .collect::<Result<_, _>>()?;
        debug!("Searched a batch of {} sequences", references.len());

        for (record, hits) in records.iter().zip(&results) {
            summary.references += 1;
            summary.hits += hits.len();
            if !hits.is_empty() {
                summary.with_hits += 1;
            }

            for hit in hits {
                match self.format {
                    OutputFormat::Json => json_records.push(hit.record(self.args.print_aln)),
                    OutputFormat::Text | OutputFormat::Tsv => {
                        let table = outputs.table();
                        writeln!(table, "{hit}")?;
                        if self.args.print_aln {
                            writeln!(table, "{}", hit.alignment_string())?;
                        }
                    }
                }
            }

            if self.args.pass || (self.args.invert && hits.is_empty()) {
                fastx::write_record(outputs.records(), record)?;
            }
        }
        Ok(())
    }
}
