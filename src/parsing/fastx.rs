//! FASTA/FASTQ reading and writing using noodles.
//!
//! The format is sniffed from the first non-whitespace byte (`>` for FASTA,
//! `@` for FASTQ), so file extensions are not needed. Gzip and bgzip input is
//! recognised by its magic bytes. The path `-` reads standard input.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use noodles::{fasta, fastq};

use crate::parsing::ParseError;

/// Path that stands for standard input
pub const STDIN_PATH: &str = "-";

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

type Source = Box<dyn BufRead>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeqFormat {
    Fasta,
    Fastq,
}

impl fmt::Display for SeqFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fasta => write!(f, "FASTA"),
            Self::Fastq => write!(f, "FASTQ"),
        }
    }
}

/// One FASTA or FASTQ record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqRecord {
    /// Header up to the first whitespace
    pub id: String,

    /// Rest of the header line, if any
    pub description: Option<String>,

    /// Residues as read (case preserved, line breaks removed)
    pub sequence: Vec<u8>,

    /// Raw quality string for FASTQ records
    pub quality: Option<Vec<u8>>,
}

impl SeqRecord {
    /// Whole header line without the leading `>` or `@`
    #[must_use]
    pub fn full_name(&self) -> String {
        match &self.description {
            Some(description) => format!("{} {}", self.id, description),
            None => self.id.clone(),
        }
    }

    #[must_use]
    pub fn format(&self) -> SeqFormat {
        if self.quality.is_some() {
            SeqFormat::Fastq
        } else {
            SeqFormat::Fasta
        }
    }
}

enum Inner {
    Fasta(fasta::io::Reader<Source>),
    Fastq(fastq::io::Reader<Source>),
    Empty,
}

/// Iterator over the records of a FASTA or FASTQ stream
pub struct FastxReader {
    inner: Inner,
}

impl FastxReader {
    /// Format of the stream, `None` for an empty input
    #[must_use]
    pub fn format(&self) -> Option<SeqFormat> {
        match self.inner {
            Inner::Fasta(_) => Some(SeqFormat::Fasta),
            Inner::Fastq(_) => Some(SeqFormat::Fastq),
            Inner::Empty => None,
        }
    }

    fn sniff(mut source: Source) -> Result<Self, ParseError> {
        let first = loop {
            let buf = source.fill_buf()?;
            if buf.is_empty() {
                break None;
            }
            if let Some(i) = buf.iter().position(|b| !b.is_ascii_whitespace()) {
                let byte = buf[i];
                source.consume(i);
                break Some(byte);
            }
            let n = buf.len();
            source.consume(n);
        };

        let inner = match first {
            None => Inner::Empty,
            Some(b'>') => Inner::Fasta(fasta::io::Reader::new(source)),
            Some(b'@') => Inner::Fastq(fastq::io::Reader::new(source)),
            Some(byte) => {
                return Err(ParseError::InvalidFormat(format!(
                    "Expected '>' or '@' at the start of a sequence file, found '{}'",
                    char::from(byte).escape_default()
                )))
            }
        };
        Ok(Self { inner })
    }
}

impl Iterator for FastxReader {
    type Item = Result<SeqRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = match &mut self.inner {
            Inner::Fasta(reader) => read_fasta_record(reader),
            Inner::Fastq(reader) => read_fastq_record(reader),
            Inner::Empty => Ok(None),
        };
        result.transpose()
    }
}

/// Open a sequence file, or standard input for `-`.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened, or
/// `ParseError::InvalidFormat` if it is neither FASTA nor FASTQ.
pub fn open(path: &Path) -> Result<FastxReader, ParseError> {
    if path == Path::new(STDIN_PATH) {
        from_reader(io::stdin())
    } else {
        from_reader(File::open(path)?)
    }
}

/// Wrap any byte stream, decompressing it if it starts with the gzip magic.
///
/// # Errors
///
/// Returns `ParseError::Io` if the stream cannot be read, or
/// `ParseError::InvalidFormat` if it is neither FASTA nor FASTQ.
pub fn from_reader<R: Read + 'static>(reader: R) -> Result<FastxReader, ParseError> {
    let mut buffered = BufReader::new(reader);
    let source: Source = if buffered.fill_buf()?.starts_with(&GZIP_MAGIC) {
        Box::new(BufReader::new(MultiGzDecoder::new(buffered)))
    } else {
        Box::new(buffered)
    };
    FastxReader::sniff(source)
}

/// Read all records of a file into memory.
///
/// # Errors
///
/// Returns the first error met while opening or parsing the file.
pub fn read_records(path: &Path) -> Result<Vec<SeqRecord>, ParseError> {
    open(path)?.collect()
}

fn read_fasta_record(reader: &mut fasta::io::Reader<Source>) -> Result<Option<SeqRecord>, ParseError> {
    let mut definition = String::new();
    let n = reader
        .read_definition(&mut definition)
        .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))?;
    if n == 0 {
        return Ok(None);
    }

    let mut sequence = Vec::new();
    reader
        .read_sequence(&mut sequence)
        .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))?;

    let header = definition
        .trim_end()
        .strip_prefix('>')
        .ok_or_else(|| ParseError::InvalidFormat(format!("Invalid FASTA definition line: '{definition}'")))?;
    let (id, description) = split_header(header);

    Ok(Some(SeqRecord {
        id,
        description,
        sequence,
        quality: None,
    }))
}

fn read_fastq_record(reader: &mut fastq::io::Reader<Source>) -> Result<Option<SeqRecord>, ParseError> {
    let mut record = fastq::Record::default();
    let n = reader
        .read_record(&mut record)
        .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTQ record: {e}")))?;
    if n == 0 {
        return Ok(None);
    }

    let description = record.description();
    Ok(Some(SeqRecord {
        id: String::from_utf8_lossy(record.name()).into_owned(),
        description: (!description.is_empty()).then(|| String::from_utf8_lossy(description).into_owned()),
        sequence: record.sequence().to_vec(),
        quality: Some(record.quality_scores().to_vec()),
    }))
}

fn split_header(header: &str) -> (String, Option<String>) {
    match header.split_once(char::is_whitespace) {
        Some((id, rest)) => {
            let rest = rest.trim();
            (id.to_string(), (!rest.is_empty()).then(|| rest.to_string()))
        }
        None => (header.to_string(), None),
    }
}

/// Write a record in its own format, sequence on a single line.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_record<W: Write + ?Sized>(writer: &mut W, record: &SeqRecord) -> io::Result<()> {
    match &record.quality {
        Some(quality) => {
            writeln!(writer, "@{}", record.full_name())?;
            writer.write_all(&record.sequence)?;
            writer.write_all(b"\n+\n")?;
            writer.write_all(quality)?;
            writer.write_all(b"\n")
        }
        None => {
            writeln!(writer, ">{}", record.full_name())?;
            writer.write_all(&record.sequence)?;
            writer.write_all(b"\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::NamedTempFile;

    fn temp_file(content: &[u8]) -> NamedTempFile {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(content).unwrap();
        temp.flush().unwrap();
        temp
    }

    #[test]
    fn test_read_fasta() {
        let temp = temp_file(b">read1 sample=a\nACGTacgt\nACGT\n>read2\nGGGG\n");
        let reader = open(temp.path()).unwrap();
        assert_eq!(reader.format(), Some(SeqFormat::Fasta));

        let records: Vec<SeqRecord> = reader.collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "read1");
        assert_eq!(records[0].description.as_deref(), Some("sample=a"));
        assert_eq!(records[0].full_name(), "read1 sample=a");
        assert_eq!(records[0].sequence, b"ACGTacgtACGT");
        assert_eq!(records[0].quality, None);
        assert_eq!(records[1].full_name(), "read2");
        assert_eq!(records[1].sequence, b"GGGG");
    }

    #[test]
    fn test_read_fastq() {
        let temp = temp_file(b"@r1 desc\nACGT\n+\nIIII\n@r2\nGG\n+\n#5\n");
        let records = read_records(temp.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "r1");
        assert_eq!(records[0].full_name(), "r1 desc");
        assert_eq!(records[0].quality.as_deref(), Some(&b"IIII"[..]));
        assert_eq!(records[1].sequence, b"GG");
        assert_eq!(records[1].format(), SeqFormat::Fastq);
    }

    #[test]
    fn test_read_gzipped() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b">chr1\nACGT\n").unwrap();
        let temp = temp_file(&encoder.finish().unwrap());

        let records = read_records(temp.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sequence, b"ACGT");
    }

    #[test]
    fn test_empty_input() {
        let temp = temp_file(b"\n\n");
        let reader = open(temp.path()).unwrap();
        assert_eq!(reader.format(), None);
        assert_eq!(reader.count(), 0);
    }

    #[test]
    fn test_unknown_format() {
        let temp = temp_file(b"chr1\t100\n");
        assert!(matches!(open(temp.path()), Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            open(Path::new("/nonexistent/reads.fa")),
            Err(ParseError::Io(_))
        ));
    }

    #[test]
    fn test_write_record() {
        let fasta = SeqRecord {
            id: "r1".to_string(),
            description: Some("x=1".to_string()),
            sequence: b"ACGT".to_vec(),
            quality: None,
        };
        let fastq = SeqRecord {
            quality: Some(b"IIII".to_vec()),
            ..fasta.clone()
        };

        let mut out = Vec::new();
        write_record(&mut out, &fasta).unwrap();
        write_record(&mut out, &fastq).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            ">r1 x=1\nACGT\n@r1 x=1\nACGT\n+\nIIII\n"
        );
    }
}
