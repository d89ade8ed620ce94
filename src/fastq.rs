//! Functions for reading FASTQ records.
//!
//! Records are expected in the fixed 4-line layout: identifier, sequence,
//! separator and quality scores. Only the sequence and quality lines are
//! kept.
//!
//! Example of reading a whole FASTQ file into memory:
//!
//! ```no_run
//! # use anyhow::Result;
//! use genome_parse::fastq::parse_fastq;
//!
//! # fn main() -> Result<()> {
//! let reads = parse_fastq("reads.fq")?;
//! println!("Number of reads: {}", reads.len());
//! # Ok(())
//! # }
//! ```
//!
//! A single [`FastqRecord`](struct.FastqRecord.html) can be reused while
//! iterating over records to avoid the cost of creating new instances.
//!
//! ```
//! # use anyhow::Result;
//! use genome_parse::fastq::{FastqReader, FastqRecord};
//!
//! # fn main() -> Result<()> {
//! let fastq: &[u8] = b"@read1\nACGT\n+\n!!!!\n@read2\nGGC\n+\n###\n";
//! let mut reader = FastqReader::new(fastq);
//! let mut record = FastqRecord::new();
//!
//! let mut number_of_bases = 0;
//! while reader.read_next_into(&mut record)? {
//!     number_of_bases += record.seq.len();
//! }
//! assert_eq!(number_of_bases, 7);
//! # Ok(())
//! # }
//! ```

use crate::error::{ParseError, Result};
use crate::{append_line, read_raw_line};
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FastqRecord {
    pub seq: String,
    pub qual: String,
}

impl FastqRecord {
    pub fn new() -> FastqRecord {
        FastqRecord {
            seq: String::new(),
            qual: String::new(),
        }
    }

    pub fn with_capacity(sequence_capacity: usize) -> FastqRecord {
        FastqRecord {
            seq: String::with_capacity(sequence_capacity),
            qual: String::with_capacity(sequence_capacity),
        }
    }

    pub fn clear(&mut self) {
        self.seq.clear();
        self.qual.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    /// Checks the record is well formed. The reader does not call this;
    /// sequence and quality strings are returned exactly as found.
    pub fn check(&self) -> Result<()> {
        if !self.seq.is_ascii() {
            return Err(ParseError::InvalidRecord(
                "Sequence string contains non-ASCII character(s)",
            ));
        }

        if !self.qual.is_ascii() {
            return Err(ParseError::InvalidRecord(
                "Quality score string contains non-ASCII character(s)",
            ));
        }

        if self.seq.len() != self.qual.len() {
            return Err(ParseError::InvalidRecord(
                "Sequence and quality strings have different lengths",
            ));
        }

        Ok(())
    }
}

/// Sequence and quality strings for every record in a FASTQ file, index
/// aligned and in file order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reads {
    pub sequences: Vec<String>,
    pub qualities: Vec<String>,
}

impl Reads {
    pub fn new() -> Reads {
        Reads::default()
    }

    pub fn push(&mut self, record: FastqRecord) {
        self.sequences.push(record.seq);
        self.qualities.push(record.qual);
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn number_of_bases(&self) -> usize {
        self.sequences.iter().map(String::len).sum()
    }
}

pub struct FastqReader<R: BufRead> {
    reader: R,
    name: String,
    sequence_capacity: usize,
    line_buffer: Vec<u8>,
    line_count: u64,
}

impl<R: BufRead> FastqReader<R> {
    pub fn new(reader: R) -> Self {
        FastqReader::with_name(reader, "unnamed")
    }

    pub fn with_name(reader: R, name: &str) -> Self {
        FastqReader {
            reader,
            name: name.to_string(),
            sequence_capacity: 160,
            line_buffer: Vec::with_capacity(256),
            line_count: 0,
        }
    }

    /// Reads the next line, without its terminator, into the line buffer.
    /// Returns false at end of file.
    fn read_next_line(&mut self) -> Result<bool> {
        let found = read_raw_line(
            &mut self.reader,
            &mut self.line_buffer,
            self.line_count + 1,
            &self.name,
        )?;
        if found {
            self.line_count += 1;
        }
        Ok(found)
    }

    fn read_required_line(&mut self) -> Result<()> {
        if self.read_next_line()? {
            Ok(())
        } else {
            Err(ParseError::MalformedInput {
                line: self.line_count,
                name: self.name.clone(),
            })
        }
    }

    pub fn read_next(&mut self) -> Result<Option<FastqRecord>> {
        let mut record = FastqRecord::with_capacity(self.sequence_capacity);
        if self.read_next_into(&mut record)? {
            Ok(Some(record))
        } else {
            Ok(None)
        }
    }

    /// Reads the next 4-line record into the given record, returning false
    /// if the end of the file was reached at a record boundary.
    ///
    /// Empty lines before the identifier line are skipped. The identifier
    /// and separator lines are discarded without being decoded.
    pub fn read_next_into(&mut self, record: &mut FastqRecord) -> Result<bool> {
        record.clear();

        loop {
            if !self.read_next_line()? {
                return Ok(false);
            }
            if !self.line_buffer.is_empty() {
                break;
            }
        }

        self.read_required_line()?;
        append_line(&self.line_buffer, &mut record.seq, self.line_count, &self.name)?;

        self.read_required_line()?;

        self.read_required_line()?;
        append_line(&self.line_buffer, &mut record.qual, self.line_count, &self.name)?;

        Ok(true)
    }

    /// Reads all remaining records.
    pub fn read_all(&mut self) -> Result<Reads> {
        let mut reads = Reads::new();
        while let Some(record) = self.read_next()? {
            reads.push(record);
        }
        debug!("{} records read from {}", reads.len(), self.name);
        Ok(reads)
    }
}

impl FastqReader<BufReader<File>> {
    /// Opens a FASTQ file for reading. The file is closed when the reader
    /// is dropped.
    pub fn from_file<P: AsRef<Path>>(fastq_file: P) -> Result<Self> {
        let fastq_file = fastq_file.as_ref();
        let fastq_file_name = fastq_file.to_string_lossy().into_owned();
        debug!("Opening {}", fastq_file_name);

        let file = File::open(fastq_file).map_err(|source| ParseError::FileAccess {
            path: fastq_file_name.clone(),
            source,
        })?;

        let buffered_reader = BufReader::with_capacity(64 * 1024, file);
        Ok(FastqReader::with_name(buffered_reader, &fastq_file_name))
    }
}

/// Reads the sequence and quality strings of every record in a FASTQ file.
///
/// A file whose final record has fewer than 4 lines is rejected with
/// [`ParseError::MalformedInput`]; an empty sequence line within the file is
/// returned as an empty read.
pub fn parse_fastq<P: AsRef<Path>>(fastq_file: P) -> Result<Reads> {
    FastqReader::from_file(fastq_file)?.read_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SEQUENCE: &str = "TGTGACCCAAGAAGTTGTTAAAATTTCCGGAGGTAGCCATTATATACCAA";
    const QUALITIES: &str = "AAFFFJJJJJJJJJJJJJJJIJJJJJJJJJJJJJJJJJJJJJJJJJJJJJ";

    const EMPTY_RECORD: &[u8] = b"";

    const FASTQ_RECORD: &[u8] = b"@MDE123 a sample read for testing
TGTGACCCAAGAAGTTGTTAAAATTTCCGGAGGTAGCCATTATATACCAA
+
AAFFFJJJJJJJJJJJJJJJIJJJJJJJJJJJJJJJJJJJJJJJJJJJJJ
";

    const INCOMPLETE_RECORD: &[u8] = b"@MDE123 a sample read for testing
TGTGACCCAAGAAGTTGTTAAAATTTCCGGAGGTAGCCATTATATACCAA
+
";

    const TWO_RECORDS: &[u8] = b"@r1\nAC\n+\n##\n@r2\nGT\n+\n$$\n";

    fn write_temp_file(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Error creating temporary file");
        file.write_all(contents)
            .expect("Error writing temporary file");
        file.flush().expect("Error flushing temporary file");
        file
    }

    #[test]
    fn valid_record() {
        let record = FastqRecord {
            seq: SEQUENCE.to_string(),
            qual: QUALITIES.to_string(),
        };
        assert!(record.check().is_ok(), "Invalid record");
    }

    #[test]
    fn differing_sequence_and_quality_strings() {
        let record = FastqRecord {
            seq: SEQUENCE.to_string(),
            qual: "AAFFFJJJJJJJJJJJJJJJIJJJJJJJJJJJJJJJ".to_string(),
        };
        let error = record.check().unwrap_err();
        assert!(matches!(error, ParseError::InvalidRecord(_)));
        assert_eq!(
            error.to_string(),
            "Sequence and quality strings have different lengths"
        );
    }

    #[test]
    fn invalid_sequence() {
        let record = FastqRecord {
            seq: "TGTGACCCAAGAAGTTGTTAAAATéTCCGGAGGTAGCCATTATATACCAA".to_string(),
            qual: QUALITIES.to_string(),
        };
        let error = record.check().unwrap_err();
        assert_eq!(
            error.to_string(),
            "Sequence string contains non-ASCII character(s)"
        );
    }

    #[test]
    fn read_empty_record() {
        let mut reader = FastqReader::new(EMPTY_RECORD);
        let result = reader.read_next();
        assert!(result.is_ok(), "Error reading empty FASTQ record");
        assert!(result.unwrap().is_none(), "Record found when none expected");
    }

    #[test]
    fn read_single_record() {
        let mut reader = FastqReader::new(FASTQ_RECORD);
        let record = reader
            .read_next()
            .expect("Error reading FASTQ record")
            .expect("No record read");
        assert_eq!(record.seq, SEQUENCE);
        assert_eq!(record.qual, QUALITIES);
        assert!(record.check().is_ok(), "Invalid record");
        let record = reader.read_next().expect("Error reading FASTQ record");
        assert!(record.is_none(), "Record found when none expected");
    }

    #[test]
    fn read_into_record() {
        let mut reader = FastqReader::new(TWO_RECORDS);
        let mut record = FastqRecord::new();
        assert!(reader.read_next_into(&mut record).unwrap());
        assert_eq!(record.seq, "AC");
        assert_eq!(record.qual, "##");
        assert!(reader.read_next_into(&mut record).unwrap());
        assert_eq!(record.seq, "GT");
        assert_eq!(record.qual, "$$");
        assert!(!reader.read_next_into(&mut record).unwrap());
        assert!(record.is_empty());
    }

    #[test]
    fn read_incomplete_record() {
        let mut reader = FastqReader::new(INCOMPLETE_RECORD);
        let result = reader.read_next();
        match result {
            Err(ParseError::MalformedInput { line, .. }) => assert_eq!(line, 3),
            _ => panic!("Expecting error for incomplete record"),
        }
    }

    #[test]
    fn incomplete_second_record() {
        let mut contents = FASTQ_RECORD.to_vec();
        contents.extend_from_slice(b"@MDE124\nACGT\n");
        let mut reader = FastqReader::new(contents.as_slice());
        assert!(reader.read_next().unwrap().is_some());
        let error = reader.read_next().unwrap_err();
        assert_eq!(error.to_string(), "incomplete record at line 6, unnamed");
    }

    #[test]
    fn latin1_identifier_ignored() {
        let contents: &[u8] = b"@r1 caf\xe9\nACGT\n+r1 \xff\n!!!!\n";
        let reads = FastqReader::new(contents).read_all().unwrap();
        assert_eq!(reads.sequences, vec!["ACGT"]);
        assert_eq!(reads.qualities, vec!["!!!!"]);
    }

    #[test]
    fn blank_lines_between_records_skipped() {
        let contents = b"@r1\nAC\n+\n##\n\n@r2\nGT\n+\n$$\n\n";
        let reads = FastqReader::new(&contents[..]).read_all().unwrap();
        assert_eq!(reads.sequences, vec!["AC", "GT"]);
        assert_eq!(reads.qualities, vec!["##", "$$"]);
    }

    #[test]
    fn read_all_records() {
        let reads = FastqReader::new(TWO_RECORDS).read_all().unwrap();
        assert_eq!(reads.sequences, vec!["AC", "GT"]);
        assert_eq!(reads.qualities, vec!["##", "$$"]);
        assert_eq!(reads.number_of_bases(), 4);
    }

    #[test]
    fn empty_sequence_within_file() {
        let contents = b"@r1\n\n+\n\n@r2\nGT\n+\n$$\n";
        let reads = FastqReader::new(&contents[..]).read_all().unwrap();
        assert_eq!(reads.sequences, vec!["", "GT"]);
        assert_eq!(reads.qualities, vec!["", "$$"]);
    }

    #[test]
    fn only_line_terminators_removed() {
        let contents = b"@r1\r\nAC \r\n+\r\n## \r\n@r2\nGT\n+\n$$";
        let reads = FastqReader::new(&contents[..]).read_all().unwrap();
        assert_eq!(reads.sequences, vec!["AC ", "GT"]);
        assert_eq!(reads.qualities, vec!["## ", "$$"]);
    }

    #[test]
    fn record_count_is_a_quarter_of_line_count() {
        let mut contents = Vec::new();
        for i in 0..25 {
            contents.extend_from_slice(format!("@read{}\nACGTN\n+\nIIIII\n", i).as_bytes());
        }
        let line_count = contents.iter().filter(|&&c| c == b'\n').count();
        let reads = FastqReader::new(contents.as_slice()).read_all().unwrap();
        assert_eq!(reads.len(), line_count / 4);
        assert_eq!(reads.sequences.len(), reads.qualities.len());
        for (seq, qual) in reads.sequences.iter().zip(&reads.qualities) {
            assert_eq!(seq.len(), qual.len());
        }
    }

    #[test]
    fn parse_single_record_file() {
        let file = write_temp_file(b"@read1\nACGT\n+\n!!!!\n");
        let reads = parse_fastq(file.path()).unwrap();
        assert_eq!(reads.sequences, vec!["ACGT"]);
        assert_eq!(reads.qualities, vec!["!!!!"]);
    }

    #[test]
    fn parse_two_record_file_twice() {
        let file = write_temp_file(TWO_RECORDS);
        let first = parse_fastq(file.path()).unwrap();
        let second = parse_fastq(file.path()).unwrap();
        assert_eq!(first.sequences, vec!["AC", "GT"]);
        assert_eq!(first.qualities, vec!["##", "$$"]);
        assert_eq!(first, second);
    }

    #[test]
    fn parse_empty_file() {
        let file = write_temp_file(EMPTY_RECORD);
        let reads = parse_fastq(file.path()).unwrap();
        assert!(reads.sequences.is_empty());
        assert!(reads.qualities.is_empty());
    }

    #[test]
    fn parse_truncated_file() {
        let file = write_temp_file(INCOMPLETE_RECORD);
        let result = parse_fastq(file.path());
        assert!(matches!(result, Err(ParseError::MalformedInput { .. })));
    }

    #[test]
    fn parse_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = parse_fastq(dir.path().join("missing.fq"));
        match result {
            Err(ParseError::FileAccess { path, .. }) => assert!(path.ends_with("missing.fq")),
            _ => panic!("Expecting error for missing file"),
        }
    }

    #[test]
    fn non_utf8_content() {
        let contents: &[u8] = b"@r1\nAC\xff\n+\n##\n";
        let error = FastqReader::new(contents).read_all().unwrap_err();
        assert!(matches!(error, ParseError::Read { line: 2, .. }));
    }
}
