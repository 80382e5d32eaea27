use crate::aggregate::{aggregate_by_mean, Sample};
use crate::error::ReportError;
use crate::parser::{pattern, read_log, TimePatterns};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One run of the parallel Collatz counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollatzRun {
    pub dynamic: Option<bool>,
    pub num_thread: u32,
    pub chunk_size: u32,
    pub time: f64,
    pub range: String,
}

impl Sample for CollatzRun {
    fn time(&self) -> f64 {
        self.time
    }

    fn set_time(&mut self, time: f64) {
        self.time = time;
    }
}

/// Fields collected while scanning one blank-line-delimited entry.
#[derive(Debug, Default)]
struct CollatzEntry {
    dynamic: Option<bool>,
    num_thread: Option<u32>,
    chunk_size: Option<u32>,
    time: Option<f64>,
    ranges: Vec<String>,
    seen: bool,
}

impl CollatzEntry {
    /// Builds the row if every required field was found.
    fn finish(self) -> Option<CollatzRun> {
        Some(CollatzRun {
            dynamic: self.dynamic,
            num_thread: self.num_thread?,
            chunk_size: self.chunk_size?,
            time: self.time?,
            range: self.ranges.join(", "),
        })
    }
}

struct CollatzPatterns {
    range: Regex,
    time: TimePatterns,
}

impl CollatzPatterns {
    fn new() -> Self {
        CollatzPatterns {
            range: pattern(r"^\d+-\d+$"),
            time: TimePatterns::new(&[r"#\s*elapsed time[^:]*:\s*([\d.]+)s"]),
        }
    }

    /// Folds one trimmed line into `entry`.
    fn read_line(&self, line: &str, entry: &mut CollatzEntry) {
        if line.contains("Dynamic mode:") {
            entry.dynamic = Some(line.contains("ON"));
        } else if line.contains("Number of threads:") {
            entry.num_thread = value_after_colon(line);
        } else if line.contains("Number of tasks (chunk size):") {
            entry.chunk_size = value_after_colon(line);
        } else if line.contains("# elapsed time") {
            entry.time = self.time.find(line);
        } else if self.range.is_match(line) {
            entry.ranges.push(line.to_string());
        } else {
            return;
        }
        entry.seen = true;
    }
}

fn value_after_colon<T: std::str::FromStr>(line: &str) -> Option<T> {
    line.rsplit(": ").next()?.trim().parse().ok()
}

/// Parses Collatz benchmark output where each run is separated by a blank line.
pub fn parse_collatz_results<P: AsRef<Path>>(path: P) -> Result<Vec<CollatzRun>, ReportError> {
    let content = read_log(path)?;
    Ok(parse_collatz_str(&content))
}

/// Same as [`parse_collatz_results`] on in-memory text.
pub fn parse_collatz_str(content: &str) -> Vec<CollatzRun> {
    let patterns = CollatzPatterns::new();
    let mut runs = Vec::new();
    let mut entry = CollatzEntry::default();

    for line in content.lines().map(str::trim) {
        if line.is_empty() {
            // Blank line closes the current entry
            flush(&mut entry, &mut runs);
            continue;
        }
        patterns.read_line(line, &mut entry);
    }

    // The last entry may not be followed by a blank line
    flush(&mut entry, &mut runs);

    log::info!("Parsed {} Collatz runs", runs.len());
    runs
}

fn flush(entry: &mut CollatzEntry, runs: &mut Vec<CollatzRun>) {
    let finished = std::mem::take(entry);
    if !finished.seen {
        return;
    }
    match finished.finish() {
        Some(run) => runs.push(run),
        None => log::debug!("Dropping incomplete Collatz entry"),
    }
}

/// Averages repeated runs per (dynamic, threads, chunk size).
pub fn aggregate_collatz(runs: &[CollatzRun]) -> Vec<CollatzRun> {
    aggregate_by_mean(runs, |r| (r.dynamic, r.num_thread, r.chunk_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_single_block() {
        let text = "Number of threads: 4\nNumber of tasks (chunk size): 16\n# elapsed time (parallel): 2.50s\n1-1000000\n";
        let runs = parse_collatz_str(text);
        assert_eq!(
            runs,
            vec![CollatzRun {
                dynamic: None,
                num_thread: 4,
                chunk_size: 16,
                time: 2.50,
                range: "1-1000000".to_string(),
            }]
        );
    }

    #[test]
    fn splits_entries_on_blank_lines() {
        let text = "\
Dynamic mode: ON
Number of threads: 8
Number of tasks (chunk size): 4
Ranges:
1-1000
50000-100000
Range 1-1000: 178
# elapsed time (parallel_collatz): 1.25s

Dynamic mode: OFF
Number of threads: 2
Number of tasks (chunk size): 32
# elapsed time (parallel_collatz): 3.75s
";
        let runs = parse_collatz_str(text);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].dynamic, Some(true));
        assert_eq!(runs[0].num_thread, 8);
        assert_eq!(runs[0].range, "1-1000, 50000-100000");
        assert_eq!(runs[0].time, 1.25);
        assert_eq!(runs[1].dynamic, Some(false));
        assert_eq!(runs[1].chunk_size, 32);
        assert_eq!(runs[1].range, "");
    }

    #[test]
    fn drops_entries_without_time() {
        let text = "Number of threads: 4\nNumber of tasks (chunk size): 16\n\n\nNumber of threads: 2\nNumber of tasks (chunk size): 16\n# elapsed time (parallel): 5.0s\n";
        let runs = parse_collatz_str(text);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].num_thread, 2);
    }

    #[test]
    fn averages_repeated_configurations() {
        let text = "\
Dynamic mode: ON
Number of threads: 4
Number of tasks (chunk size): 16
# elapsed time (parallel): 2.0s

Dynamic mode: ON
Number of threads: 4
Number of tasks (chunk size): 16
# elapsed time (parallel): 4.0s
";
        let aggregated = aggregate_collatz(&parse_collatz_str(text));
        assert_eq!(aggregated.len(), 1);
        assert_eq!(aggregated[0].time, 3.0);
    }
}
