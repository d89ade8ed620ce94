//! Errors raised while reading FASTQ and FASTA files.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    /// The file could not be opened, e.g. it does not exist or permission
    /// was denied.
    #[error("Error opening file {path}")]
    FileAccess {
        path: String,
        #[source]
        source: io::Error,
    },

    /// An I/O failure, or invalid UTF-8, while reading a line.
    #[error("unexpected problem reading line {line}, {name}")]
    Read {
        line: u64,
        name: String,
        #[source]
        source: io::Error,
    },

    /// The file ended part way through a 4-line FASTQ record.
    #[error("incomplete record at line {line}, {name}")]
    MalformedInput { line: u64, name: String },

    /// A record failed [`FastqRecord::check`](../fastq/struct.FastqRecord.html#method.check).
    #[error("{0}")]
    InvalidRecord(&'static str),
}

pub type Result<T> = std::result::Result<T, ParseError>;
