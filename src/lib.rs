// Copyright (c) 2021 CRUK Cambridge Institute - Bioinformatics Core
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! A Rust library providing functions for reading sequence data in FASTQ
//! and FASTA formats into memory.

pub mod error;
pub mod fasta;
pub mod fastq;

pub use error::ParseError;
pub use fasta::parse_fasta;
pub use fastq::{parse_fastq, Reads};

use error::Result;
use std::io::{self, BufRead};

/// Reads the next line into the buffer, replacing its contents and removing
/// a trailing `\n` or `\r\n`. Returns false at end of file.
pub(crate) fn read_raw_line<R: BufRead>(
    reader: &mut R,
    buffer: &mut Vec<u8>,
    line: u64,
    name: &str,
) -> Result<bool> {
    buffer.clear();
    let number_of_bytes = reader
        .read_until(b'\n', buffer)
        .map_err(|source| ParseError::Read {
            line,
            name: name.to_string(),
            source,
        })?;
    if number_of_bytes == 0 {
        return Ok(false);
    }
    if buffer.ends_with(b"\n") {
        buffer.pop();
        if buffer.ends_with(b"\r") {
            buffer.pop();
        }
    }
    Ok(true)
}

/// Appends a line that is kept to the given string; the line must be UTF-8.
pub(crate) fn append_line(
    buffer: &[u8],
    output: &mut String,
    line: u64,
    name: &str,
) -> Result<()> {
    let text = std::str::from_utf8(buffer).map_err(|error| ParseError::Read {
        line,
        name: name.to_string(),
        source: io::Error::new(io::ErrorKind::InvalidData, error),
    })?;
    output.push_str(text);
    Ok(())
}
