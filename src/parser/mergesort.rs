use crate::aggregate::{aggregate_by_mean, Sample};
use crate::error::ReportError;
use crate::parser::{capture, parse_size, pattern, read_log, scale_size, TimePatterns};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Token that opens every run in the sequential log.
const SEQUENTIAL_BLOCK_MARKER: &str = "Esecuzione";

/// Prefix of the header line that opens a block in the distributed log.
const DISTRIBUTED_BLOCK_MARKER: &str = "Nodes:";

/// One run of the sequential mergesort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequentialSort {
    pub size: u64,
    pub payload: u32,
    pub time: f64,
}

/// One run of the shared-memory parallel mergesort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelSort {
    pub size: u64,
    pub payload: u32,
    pub threads: u32,
    pub time: f64,
}

/// One run of the distributed (MPI + threads) mergesort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributedSort {
    pub nodes: u32,
    pub size: u64,
    pub payload: u32,
    pub threads: u32,
    pub time: f64,
}

macro_rules! impl_sample {
    ($($row:ty),*) => {
        $(impl Sample for $row {
            fn time(&self) -> f64 {
                self.time
            }

            fn set_time(&mut self, time: f64) {
                self.time = time;
            }
        })*
    };
}

impl_sample!(SequentialSort, ParallelSort, DistributedSort);

// ================== sequential ==================

/// Parses the sequential log, split into blocks by `Esecuzione` markers.
pub fn parse_sequential_results<P: AsRef<Path>>(path: P) -> Result<Vec<SequentialSort>, ReportError> {
    let content = read_log(path)?;
    Ok(parse_sequential_str(&content))
}

/// Same as [`parse_sequential_results`] on in-memory text.
pub fn parse_sequential_str(content: &str) -> Vec<SequentialSort> {
    let size_pattern = pattern(r"Size:\s*(\d+)([KM])?");
    let range_pattern = pattern(r"Range:\s*(\d+)");
    let time = TimePatterns::new(&[r"# elapsed time \(sequential_mergesort\):\s*([\d.]+)s"]);

    let mut runs = Vec::new();
    for block in content.split(SEQUENTIAL_BLOCK_MARKER) {
        let size = size_pattern.captures(block).and_then(|c| {
            let value = c.get(1)?.as_str().parse::<u64>().ok()?;
            scale_size(value, c.get(2).map(|m| m.as_str()))
        });
        let payload = capture::<u32>(&range_pattern, block);
        let elapsed = block.lines().find_map(|line| time.find(line));

        // All three fields must be present in the block
        match (size, payload, elapsed) {
            (Some(size), Some(payload), Some(time)) => runs.push(SequentialSort { size, payload, time }),
            _ if block.trim().is_empty() => {}
            _ => log::debug!("Dropping incomplete sequential block"),
        }
    }

    log::info!("Parsed {} sequential mergesort runs", runs.len());
    runs
}

// ================== parallel ==================

/// Working fields of the parallel log scan.
#[derive(Debug, Default, Clone, PartialEq)]
struct ParallelBlock {
    size: Option<u64>,
    payload: Option<u32>,
    threads: Option<u32>,
}

/// Parses the parallel log: a `Running N=.., P=.., T=..` line opens a
/// configuration and every elapsed-time line closes one run of it.
pub fn parse_parallel_results<P: AsRef<Path>>(path: P) -> Result<Vec<ParallelSort>, ReportError> {
    let content = read_log(path)?;
    Ok(parse_parallel_str(&content))
}

/// Same as [`parse_parallel_results`] on in-memory text.
pub fn parse_parallel_str(content: &str) -> Vec<ParallelSort> {
    let run_pattern = pattern(r"Running N=(\d+[KM]?), P=\d+, T=(\d+)");
    let payload_pattern = pattern(r"Record payload:\s+(\d+)");
    let time = TimePatterns::new(&[r"# elapsed time .*?: ([\d.]+)s"]);

    let mut runs = Vec::new();
    let mut block = ParallelBlock::default();

    for line in content.lines().map(str::trim) {
        // Match size and threads, starting a new configuration
        if let Some(c) = run_pattern.captures(line) {
            block = ParallelBlock {
                size: parse_size(&c[1]),
                threads: c[2].parse().ok(),
                payload: None,
            };
            continue;
        }

        // Match record payload
        if let Some(payload) = capture::<u32>(&payload_pattern, line) {
            block.payload = Some(payload);
            continue;
        }

        // Match execution time
        if let Some(elapsed) = time.find(line) {
            match (block.size, block.payload, block.threads) {
                (Some(size), Some(payload), Some(threads)) => runs.push(ParallelSort {
                    size,
                    payload,
                    threads,
                    time: elapsed,
                }),
                _ => log::debug!("Dropping parallel time line outside a complete configuration"),
            }
        }
    }

    log::info!("Parsed {} parallel mergesort runs", runs.len());
    runs
}

// ================== distributed ==================

struct DistributedPatterns {
    payload: Regex,
    size: Regex,
    threads: Regex,
    nodes: Regex,
    time: TimePatterns,
}

impl DistributedPatterns {
    fn new() -> Self {
        DistributedPatterns {
            payload: pattern(r"^Record payload:\s*(\d+)"),
            size: pattern(r"^Array size:\s*(\d+[KM]?)"),
            threads: pattern(r"^N° cores according to FastFlow:\s*(\d+)"),
            nodes: pattern(r"^MPI numbero of nodes:\s*(\d+)"),
            time: TimePatterns::new(&[
                r"^Tempo totale \(escl\. init\):\s*([\d.]+)",
                r"^Total time \(without init\):\s*([\d.]+)",
                r"^# elapsed time.*?:\s*([\d.]+)s",
            ]),
        }
    }
}

/// Optional fields of the distributed block being scanned.
///
/// `nodes` defaults to 1 because single-node runs do not print it.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributedBlock {
    pub nodes: u32,
    pub size: Option<u64>,
    pub payload: Option<u32>,
    pub threads: Option<u32>,
}

impl Default for DistributedBlock {
    fn default() -> Self {
        DistributedBlock {
            nodes: 1,
            size: None,
            payload: None,
            threads: None,
        }
    }
}

impl DistributedBlock {
    pub fn reset(&mut self) {
        *self = DistributedBlock::default();
    }

    /// Builds a row with the given time if every required field is known.
    pub fn complete(&self, time: f64) -> Option<DistributedSort> {
        Some(DistributedSort {
            nodes: self.nodes,
            size: self.size?,
            payload: self.payload?,
            threads: self.threads?,
            time,
        })
    }

    /// Folds one trimmed line into the block, returning a row when the line
    /// closes a complete block.
    fn feed(&mut self, line: &str, patterns: &DistributedPatterns) -> Option<DistributedSort> {
        if line.starts_with(DISTRIBUTED_BLOCK_MARKER) {
            self.reset();
        }

        if let Some(payload) = capture(&patterns.payload, line) {
            self.payload = Some(payload);
        } else if let Some(size) = patterns.size.captures(line).and_then(|c| parse_size(&c[1])) {
            self.size = Some(size);
        } else if let Some(threads) = capture(&patterns.threads, line) {
            self.threads = Some(threads);
        } else if let Some(nodes) = capture(&patterns.nodes, line) {
            self.nodes = nodes;
        } else if let Some(time) = patterns.time.find(line) {
            // A time line always closes the block
            log::debug!("Distributed time {} read with pattern {:?}", time, patterns.time.which(line));
            let row = self.complete(time);
            if row.is_none() {
                log::debug!("Dropping incomplete distributed block: {:?}", self);
            }
            self.reset();
            return row;
        }
        None
    }
}

/// Parses the distributed log, one block per run.
pub fn parse_distributed_results<P: AsRef<Path>>(path: P) -> Result<Vec<DistributedSort>, ReportError> {
    let content = read_log(path)?;
    Ok(parse_distributed_str(&content))
}

/// Same as [`parse_distributed_results`] on in-memory text.
pub fn parse_distributed_str(content: &str) -> Vec<DistributedSort> {
    let patterns = DistributedPatterns::new();
    let mut block = DistributedBlock::default();

    let runs: Vec<DistributedSort> = content
        .lines()
        .filter_map(|line| block.feed(line.trim(), &patterns))
        .collect();

    log::info!("Parsed {} distributed mergesort runs", runs.len());
    runs
}

// ================== aggregation ==================

pub fn aggregate_sequential(runs: &[SequentialSort]) -> Vec<SequentialSort> {
    aggregate_by_mean(runs, |r| (r.size, r.payload))
}

pub fn aggregate_parallel(runs: &[ParallelSort]) -> Vec<ParallelSort> {
    aggregate_by_mean(runs, |r| (r.size, r.payload, r.threads))
}

pub fn aggregate_distributed(runs: &[DistributedSort]) -> Vec<DistributedSort> {
    aggregate_by_mean(runs, |r| (r.nodes, r.size, r.payload, r.threads))
}
