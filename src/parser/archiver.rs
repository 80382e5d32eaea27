use crate::aggregate::{aggregate_by_mean, Sample};
use crate::error::ReportError;
use crate::parser::{capture, pattern, read_log};
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Whether an archiver run compressed or decompressed its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Operation {
    Compress,
    Decompress,
    Unknown,
}

impl Operation {
    /// Reads a `-C` / `-D` command-line flag.
    fn from_flag(token: &str) -> Option<Self> {
        match token {
            "-C" => Some(Operation::Compress),
            "-D" => Some(Operation::Decompress),
            _ => None,
        }
    }

    /// Reads the free-form `Operation` column.
    fn from_column(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "c" | "compress" | "compression" => Operation::Compress,
            "d" | "decompress" | "decompression" => Operation::Decompress,
            _ => Operation::Unknown,
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Operation::Compress => "C",
            Operation::Decompress => "D",
            Operation::Unknown => "-",
        }
    }
}

/// One run of the parallel archiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveRun {
    pub program: String,
    pub operation: Operation,
    pub input: String,
    pub threads: u32,
    pub time: f64,
}

impl Sample for ArchiveRun {
    fn time(&self) -> f64 {
        self.time
    }

    fn set_time(&mut self, time: f64) {
        self.time = time;
    }
}

/// Raw CSV record as written by the benchmark driver.
#[derive(Debug, Deserialize)]
struct ArchiverRecord {
    #[serde(rename = "Program")]
    program: String,
    #[serde(rename = "Operation", default)]
    operation: String,
    #[serde(rename = "Command")]
    command: String,
    #[serde(rename = "Threads", default, deserialize_with = "csv::invalid_option")]
    threads: Option<u32>,
    #[serde(rename = "Output")]
    output: String,
}

/// Removes shell escaping from a captured command token (`-C\` -> `-C`).
fn unescape_token(token: &str) -> &str {
    token.trim_matches(|c| c == '\\' || c == '"' || c == '\'')
}

/// Splits a captured command line into unescaped tokens.
fn command_tokens(command: &str) -> Vec<&str> {
    command
        .split_whitespace()
        .map(unescape_token)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Parses the archiver benchmark CSV (`Program, Operation, Command, Threads, Output`).
pub fn parse_archiver_results<P: AsRef<Path>>(path: P) -> Result<Vec<ArchiveRun>, ReportError> {
    let content = read_log(path)?;
    parse_archiver_str(&content)
}

/// Same as [`parse_archiver_results`] on in-memory CSV text.
pub fn parse_archiver_str(content: &str) -> Result<Vec<ArchiveRun>, ReportError> {
    let time_pattern = pattern(r"(\d+\.\d+)");
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    // Only an unreadable header is fatal, bad rows are skipped
    reader.headers()?;

    let mut runs = Vec::new();
    for result in reader.deserialize::<ArchiverRecord>() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or_default();
                log::debug!("Dropping malformed archiver row at line {}: {}", line, e);
                continue;
            }
        };

        // Time is the first decimal number printed by the program
        let Some(time) = capture::<f64>(&time_pattern, &record.output) else {
            log::debug!("Dropping archiver row without a time: {}", record.command);
            continue;
        };

        let tokens = command_tokens(&record.command);
        let operation = tokens
            .iter()
            .find_map(|t| Operation::from_flag(t))
            .unwrap_or_else(|| Operation::from_column(&record.operation));
        let input = tokens.last().map(|t| t.to_string()).unwrap_or_default();

        runs.push(ArchiveRun {
            program: record.program,
            operation,
            input,
            threads: record.threads.unwrap_or(1),
            time,
        });
    }

    log::info!("Parsed {} archiver runs", runs.len());
    Ok(runs)
}

/// Averages repeated runs per (program, operation, input, threads).
pub fn aggregate_archiver(runs: &[ArchiveRun]) -> Vec<ArchiveRun> {
    aggregate_by_mean(runs, |r| {
        (r.program.clone(), r.operation, r.input.clone(), r.threads)
    })
}
