//! Functions for reading FASTA files.
//!
//! Every sequence line in the file is concatenated, in file order, into a
//! single genome string. Header lines starting with `>` are skipped, so a
//! multi-FASTA file yields one string with no record boundaries.

use crate::error::{ParseError, Result};
use crate::{append_line, read_raw_line};
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub struct FastaReader<R: BufRead> {
    reader: R,
    name: String,
    line_count: u64,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        FastaReader::with_name(reader, "unnamed")
    }

    pub fn with_name(reader: R, name: &str) -> Self {
        FastaReader {
            reader,
            name: name.to_string(),
            line_count: 0,
        }
    }

    /// Reads the remaining lines, returning the concatenated sequence.
    ///
    /// Lines without a preceding header are treated as sequence. Only the
    /// line terminator is removed; other whitespace is kept.
    pub fn read_genome(&mut self) -> Result<String> {
        let mut genome = String::new();
        let mut line = Vec::new();

        while read_raw_line(&mut self.reader, &mut line, self.line_count + 1, &self.name)? {
            self.line_count += 1;

            // headers are skipped without being decoded
            if line.starts_with(b">") {
                continue;
            }

            append_line(&line, &mut genome, self.line_count, &self.name)?;
        }

        debug!(
            "{} bases read from {} lines of {}",
            genome.len(),
            self.line_count,
            self.name
        );

        Ok(genome)
    }
}

impl FastaReader<BufReader<File>> {
    /// Opens a FASTA file for reading. The file is closed when the reader
    /// is dropped.
    pub fn from_file<P: AsRef<Path>>(fasta_file: P) -> Result<Self> {
        let fasta_file = fasta_file.as_ref();
        let fasta_file_name = fasta_file.to_string_lossy().into_owned();
        debug!("Opening {}", fasta_file_name);

        let file = File::open(fasta_file).map_err(|source| ParseError::FileAccess {
            path: fasta_file_name.clone(),
            source,
        })?;

        let buffered_reader = BufReader::with_capacity(64 * 1024, file);
        Ok(FastaReader::with_name(buffered_reader, &fasta_file_name))
    }
}

/// Reads a FASTA file and returns all of its sequence lines concatenated.
pub fn parse_fasta<P: AsRef<Path>>(fasta_file: P) -> Result<String> {
    FastaReader::from_file(fasta_file)?.read_genome()
}
