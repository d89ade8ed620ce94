//! Read FASTQ or FASTA files into memory and report what was read.

use anyhow::{ensure, Context, Result};
use genome_parse::{parse_fasta, parse_fastq};
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use structopt::StructOpt;

/// Configuration parameters specified as command-line options.
#[derive(StructOpt)]
#[structopt(about = "Read sequences from FASTQ or FASTA files.")]
enum Config {
    /// Read sequence and quality strings from FASTQ files.
    Fastq {
        /// FASTQ files to read.
        #[structopt(parse(from_os_str))]
        fastq_files: Vec<PathBuf>,

        /// Summary of the numbers of records and bases read from each file.
        #[structopt(short, long)]
        summary_file: Option<PathBuf>,
    },

    /// Concatenate the sequence lines of a FASTA file into a single genome
    /// string.
    Fasta {
        /// FASTA file to read.
        #[structopt(parse(from_os_str))]
        fasta_file: PathBuf,

        /// File to which the genome string will be written (stdout if not
        /// specified).
        #[structopt(short, long)]
        output_file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    match Config::from_args() {
        Config::Fastq {
            fastq_files,
            summary_file,
        } => {
            ensure!(!fastq_files.is_empty(), "No input FASTQ files specified");
            let summaries = read_fastq_files(&fastq_files)?;
            if let Some(summary_file) = summary_file {
                write_summary(&summaries, &summary_file)?;
            }
        }
        Config::Fasta {
            fasta_file,
            output_file,
        } => {
            read_fasta_file(&fasta_file, &output_file)?;
        }
    }

    Ok(())
}

/// Numbers of records and bases read from a FASTQ file.
#[derive(Debug, Serialize)]
struct Summary {
    /// The FASTQ file.
    file: String,

    /// The number of FASTQ records read.
    records: usize,

    /// The total length of all sequences.
    bases: usize,
}

/// Read each FASTQ file in turn, returning a summary for each.
fn read_fastq_files(fastq_files: &[PathBuf]) -> Result<Vec<Summary>> {
    let mut summaries = Vec::new();
    let mut total = 0;

    for fastq_file in fastq_files {
        let filename = fastq_file.display().to_string();
        info!("Reading {}", filename);

        let reads = parse_fastq(fastq_file)
            .with_context(|| format!("Error reading FASTQ file {}", filename))?;

        info!("{} records read from {}", reads.len(), filename);
        total += reads.len();

        summaries.push(Summary {
            file: filename,
            records: reads.len(),
            bases: reads.number_of_bases(),
        });
    }

    info!("Total records read: {}", total);

    Ok(summaries)
}

/// Write the per-file summaries to a CSV file.
fn write_summary(summaries: &[Summary], summary_file: &Path) -> Result<()> {
    let summary_filename = summary_file.display();
    info!("Writing summary to {}", summary_filename);
    let mut summary_writer = csv::Writer::from_path(summary_file)
        .with_context(|| format!("Error creating summary file {}", summary_filename))?;
    for summary in summaries {
        summary_writer
            .serialize(summary)
            .with_context(|| format!("Error writing summary to {}", summary_filename))?;
    }
    summary_writer.flush().with_context(|| {
        format!(
            "Error writing summary file {} to completion",
            summary_filename
        )
    })?;

    Ok(())
}

/// Read a FASTA file and write the concatenated genome to a file or stdout.
fn read_fasta_file(fasta_file: &Path, output_file: &Option<PathBuf>) -> Result<()> {
    info!("Reading {}", fasta_file.display());

    let genome = parse_fasta(fasta_file)
        .with_context(|| format!("Error reading FASTA file {}", fasta_file.display()))?;

    info!("{} bases read from {}", genome.len(), fasta_file.display());

    let destination = match output_file {
        Some(output_file) => output_file.display().to_string(),
        None => String::from("stdout"),
    };
    info!("Writing genome to {}", destination);

    let writer: Box<dyn Write> = match output_file {
        Some(output_file) => {
            let file = File::create(output_file)
                .with_context(|| format!("Error creating file {}", destination))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let mut writer = BufWriter::new(writer);
    writer
        .write_all(genome.as_bytes())
        .and_then(|_| writer.write_all(b"\n"))
        .with_context(|| format!("Error writing genome to {}", destination))?;
    writer
        .flush()
        .with_context(|| format!("Error writing genome to {} to completion", destination))?;

    Ok(())
}
