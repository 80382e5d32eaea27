use crate::chart::{Figure, Panel, Reference, Series};
use crate::metrics::speedup_curve;
use crate::parser::archiver::{ArchiveRun, Operation};
use serde::Deserialize;

/// Names of the parallel program and of its sequential baseline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Programs {
    pub parallel: String,
    pub sequential: String,
}

impl Default for Programs {
    fn default() -> Self {
        Programs {
            parallel: "minizpar".to_string(),
            sequential: "minizseq".to_string(),
        }
    }
}

/// Compression runs of `program` on `input`.
fn compress_runs<'a>(runs: &'a [ArchiveRun], program: &'a str, input: &'a str) -> impl Iterator<Item = &'a ArchiveRun> + 'a {
    runs.iter()
        .filter(move |r| r.program == program && r.operation == Operation::Compress && r.input == input)
}

/// Parallel `(threads, time)` points and the sequential time for one input.
fn input_data(runs: &[ArchiveRun], programs: &Programs, input: &str) -> Option<(Vec<(u32, f64)>, f64)> {
    let mut parallel: Vec<(u32, f64)> = compress_runs(runs, &programs.parallel, input)
        .map(|r| (r.threads, r.time))
        .collect();
    let sequential = compress_runs(runs, &programs.sequential, input).next().map(|r| r.time);

    match sequential {
        Some(seq_time) if !parallel.is_empty() => {
            parallel.sort_by_key(|&(threads, _)| threads);
            Some((parallel, seq_time))
        }
        _ => {
            log::warn!(
                "No data for input '{}' in either {} or {}",
                input, programs.parallel, programs.sequential
            );
            None
        }
    }
}

/// One panel per input: compression speedup of the parallel program over the
/// sequential one, with the ideal line.
pub fn speedup_by_input(runs: &[ArchiveRun], inputs: &[String], programs: &Programs) -> Figure {
    let panels = inputs
        .iter()
        .filter_map(|input| {
            let (points, seq_time) = input_data(runs, programs, input)?;
            let curve = speedup_curve(seq_time, &points);

            let mut panel = Panel::new(format!("{} Speedup vs Threads", input), "Number of Threads", "Speedup");
            let (min, max) = (points[0].0, points[points.len() - 1].0);
            panel.series.push(Series::new(format!("{} Speedup", input), &curve));
            panel.references.push(Reference::Identity {
                from: min as f64,
                to: max as f64,
                label: "Ideal Speedup (x=y)".to_string(),
            });
            Some(panel)
        })
        .collect();
    Figure { panels }
}

/// One panel per input: compression time of the parallel program against
/// thread count, with the sequential time as reference.
pub fn execution_time_by_input(runs: &[ArchiveRun], inputs: &[String], programs: &Programs) -> Figure {
    let panels = inputs
        .iter()
        .filter_map(|input| {
            let (points, seq_time) = input_data(runs, programs, input)?;

            let mut panel = Panel::new(
                format!("{} Execution Time vs Threads", input),
                "Number of Threads",
                "Execution Time (seconds)",
            );
            panel.series.push(Series::new(format!("{} Execution Time", input), &points));
            panel.references.push(Reference::Horizontal {
                y: seq_time,
                label: "Sequential Time".to_string(),
            });
            Some(panel)
        })
        .collect();
    Figure { panels }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(program: &str, operation: Operation, input: &str, threads: u32, time: f64) -> ArchiveRun {
        ArchiveRun {
            program: program.to_string(),
            operation,
            input: input.to_string(),
            threads,
            time,
        }
    }

    fn sample_runs() -> Vec<ArchiveRun> {
        vec![
            run("minizseq", Operation::Compress, "big_files", 1, 12.0),
            run("minizpar", Operation::Compress, "big_files", 4, 4.0),
            run("minizpar", Operation::Compress, "big_files", 2, 6.0),
            run("minizpar", Operation::Decompress, "big_files", 2, 1.0),
            run("minizpar", Operation::Compress, "small_files", 2, 1.0),
        ]
    }

    #[test]
    fn speedup_panels_skip_inputs_without_baseline() {
        let inputs = vec!["big_files".to_string(), "small_files".to_string()];
        let figure = speedup_by_input(&sample_runs(), &inputs, &Programs::default());

        assert_eq!(figure.panels.len(), 1);
        let panel = &figure.panels[0];
        assert_eq!(panel.title, "big_files Speedup vs Threads");
        assert_eq!(panel.series[0].points, vec![(2.0, 2.0), (4.0, 3.0)]);
    }

    #[test]
    fn execution_time_uses_sequential_reference() {
        let inputs = vec!["big_files".to_string()];
        let figure = execution_time_by_input(&sample_runs(), &inputs, &Programs::default());
        let panel = &figure.panels[0];
        assert_eq!(panel.series[0].points, vec![(2.0, 6.0), (4.0, 4.0)]);
        assert_eq!(
            panel.references[0],
            Reference::Horizontal { y: 12.0, label: "Sequential Time".to_string() }
        );
    }
}
