use crate::chart::{Figure, Panel, Reference, Series};
use crate::error::ReportError;
use crate::metrics::speedup_curve;
use crate::parser::collatz::CollatzRun;

const X_LABEL: &str = "Number of Threads";

/// A titled table of aggregated Collatz runs (one panel each).
#[derive(Debug, Clone, Copy)]
pub struct RunSet<'a> {
    pub title: &'a str,
    pub runs: &'a [CollatzRun],
}

/// `(threads, time)` points of one chunk size, ascending by thread count.
fn chunk_points(runs: &[CollatzRun], chunk_size: u32) -> Vec<(u32, f64)> {
    let mut points: Vec<(u32, f64)> = runs
        .iter()
        .filter(|r| r.chunk_size == chunk_size)
        .map(|r| (r.num_thread, r.time))
        .collect();
    points.sort_by_key(|&(threads, _)| threads);
    points
}

/// Average time against thread count, one series per chunk size, with an
/// optional sequential-time reference line.
pub fn time_vs_threads(sets: &[RunSet<'_>], chunk_sizes: &[u32], seq_time: Option<f64>) -> Figure {
    let panels = sets
        .iter()
        .map(|set| {
            let mut panel = Panel::new(set.title, X_LABEL, "Average Time (s)");
            for &chunk_size in chunk_sizes {
                let points = chunk_points(set.runs, chunk_size);
                if points.is_empty() {
                    log::warn!("No data for chunk size {} in '{}'", chunk_size, set.title);
                    continue;
                }
                panel.series.push(Series::new(format!("Chunk size {}", chunk_size), &points));
            }
            if let Some(seq_time) = seq_time {
                panel.references.push(Reference::Horizontal {
                    y: seq_time,
                    label: "Sequential Time".to_string(),
                });
            }
            panel
        })
        .collect();
    Figure { panels }
}

/// Speedup (`seq_time / time`) against thread count, one series per chunk
/// size, with the ideal `speedup == threads` line.
pub fn speedup_vs_threads(sets: &[RunSet<'_>], chunk_sizes: &[u32], seq_time: Option<f64>) -> Result<Figure, ReportError> {
    let seq_time = seq_time.ok_or(ReportError::MissingBaseline("speedup"))?;

    let panels = sets
        .iter()
        .map(|set| {
            let mut panel = Panel::new(set.title, X_LABEL, "Speedup");
            for &chunk_size in chunk_sizes {
                let points = chunk_points(set.runs, chunk_size);
                if points.is_empty() {
                    log::warn!("No data for chunk size {} in '{}'", chunk_size, set.title);
                    continue;
                }
                let curve = speedup_curve(seq_time, &points);
                panel.series.push(Series::new(format!("Chunk size {}", chunk_size), &curve));
            }

            // Ideal line over every thread count of the table
            let threads = set.runs.iter().map(|r| r.num_thread);
            if let (Some(min), Some(max)) = (threads.clone().min(), threads.max()) {
                panel.references.push(Reference::Identity {
                    from: min as f64,
                    to: max as f64,
                    label: "Ideal Speedup (x=y)".to_string(),
                });
            }
            panel
        })
        .collect();
    Ok(Figure { panels })
}
