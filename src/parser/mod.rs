pub mod archiver;
pub mod collatz;
pub mod mergesort;

use crate::error::ReportError;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Reads a whole log file into memory.
///
/// Failing to open the file is the only fatal condition of the parsers.
pub fn read_log<P: AsRef<Path>>(path: P) -> Result<String, ReportError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
    log::info!("Loaded {} ({} bytes)", path.display(), content.len());
    Ok(content)
}

/// Compiles one of the built-in label patterns.
pub(crate) fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("built-in pattern must compile")
}

/// Expands a count written with an optional `K`/`M` suffix (`10K` -> 10_000).
///
/// `None` when the expanded count does not fit in a `u64`.
pub fn scale_size(value: u64, unit: Option<&str>) -> Option<u64> {
    match unit {
        Some("K") | Some("k") => value.checked_mul(1_000),
        Some("M") | Some("m") => value.checked_mul(1_000_000),
        _ => Some(value),
    }
}

/// Parses `10K`, `2M` or `1000` into an element count.
pub fn parse_size(text: &str) -> Option<u64> {
    let text = text.trim();
    let split = text.find(|c: char| !c.is_ascii_digit()).unwrap_or(text.len());
    let (digits, unit) = text.split_at(split);
    let value = digits.parse::<u64>().ok()?;
    match unit {
        "" => Some(value),
        "K" | "k" | "M" | "m" => scale_size(value, Some(unit)),
        _ => None,
    }
}

/// Returns the first capture group of `re` in `line`, parsed as `T`.
pub(crate) fn capture<T: std::str::FromStr>(re: &Regex, line: &str) -> Option<T> {
    re.captures(line)?.get(1)?.as_str().parse().ok()
}

/// Ordered list of patterns that may carry the elapsed time of a run.
///
/// Candidates are tried in insertion order and the first one that matches
/// wins, so a log printing several timing lines is read consistently.
#[derive(Debug, Clone)]
pub struct TimePatterns {
    candidates: Vec<Regex>,
}

impl TimePatterns {
    pub fn new(patterns: &[&str]) -> Self {
        TimePatterns {
            candidates: patterns.iter().map(|p| pattern(p)).collect(),
        }
    }

    /// Extracts the time in seconds from `line`, if any candidate matches.
    pub fn find(&self, line: &str) -> Option<f64> {
        self.candidates.iter().find_map(|re| capture::<f64>(re, line))
    }

    /// Index of the candidate that matches `line`.
    pub(crate) fn which(&self, line: &str) -> Option<usize> {
        self.candidates.iter().position(|re| re.is_match(line))
    }
}
