use crate::chart::ChartOptions;
use crate::error::ReportError;
use crate::parser::read_log;
use crate::report::archiver::Programs;
use serde::Deserialize;
use std::path::Path;

/// A list of charts to produce for one benchmark family, read from JSON:
///
/// ```json
/// { "charts": [ { "kind": "parallel_speedup", "size": 10000000,
///                 "log_x": true, "grid": true,
///                 "save": true, "save_path": "parallel_speedup10M.png" } ] }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Plan<C> {
    pub charts: Vec<ChartRequest<C>>,
}

/// One chart: what to draw plus how to draw it.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartRequest<C> {
    #[serde(flatten)]
    pub chart: C,
    /// Overrides the default title of single-panel charts.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(flatten)]
    pub options: ChartOptions,
}

impl<C> ChartRequest<C> {
    fn new(chart: C, title: Option<&str>, options: ChartOptions) -> Self {
        ChartRequest {
            chart,
            title: title.map(str::to_string),
            options,
        }
    }

    /// Options with the save path resolved against `output_dir`.
    ///
    /// With `no_save` the chart is only displayed.
    pub fn resolved_options(&self, output_dir: &Path, no_save: bool) -> ChartOptions {
        let mut options = self.options.clone();
        if no_save {
            options.save = false;
        } else if let Some(path) = options.save_path.as_ref().filter(|p| p.is_relative()) {
            options.save_path = Some(output_dir.join(path));
        }
        options
    }
}

impl<C: for<'de> Deserialize<'de>> Plan<C> {
    /// Loads a plan from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ReportError> {
        let content = read_log(path)?;
        let plan: Plan<C> = serde_json::from_str(&content)?;
        Ok(plan)
    }
}

/// Loads the plan at `path`, or falls back to `default`.
pub fn load_or_default<C: for<'de> Deserialize<'de>>(path: Option<&Path>, default: Plan<C>) -> Result<Plan<C>, ReportError> {
    match path {
        Some(path) => Plan::load(path),
        None => Ok(default),
    }
}

// ================== Collatz ==================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CollatzChart {
    TimeVsThreads {
        chunk_sizes: Vec<u32>,
        #[serde(default)]
        seq_time: Option<f64>,
    },
    SpeedupVsThreads {
        chunk_sizes: Vec<u32>,
        #[serde(default)]
        seq_time: Option<f64>,
    },
}

impl Default for Plan<CollatzChart> {
    fn default() -> Self {
        let options = ChartOptions {
            log_x: true,
            log_y: true,
            grid: true,
            ..ChartOptions::default()
        };
        Plan {
            charts: vec![
                ChartRequest::new(
                    CollatzChart::TimeVsThreads { chunk_sizes: vec![4, 16, 32], seq_time: Some(18.0) },
                    None,
                    options.clone().saved_to("strong_scaling.png"),
                ),
                ChartRequest::new(
                    CollatzChart::SpeedupVsThreads { chunk_sizes: vec![4, 16, 64], seq_time: Some(18.4) },
                    None,
                    options.saved_to("speedup_comparison.png"),
                ),
            ],
        }
    }
}

// ================== Archiver ==================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArchiverChart {
    Speedup {
        inputs: Vec<String>,
        #[serde(default)]
        programs: Programs,
    },
    ExecutionTime {
        inputs: Vec<String>,
        #[serde(default)]
        programs: Programs,
    },
}

impl Default for Plan<ArchiverChart> {
    fn default() -> Self {
        let inputs: Vec<String> = ["big_files", "small_files", "nested_files"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        Plan {
            charts: vec![
                ChartRequest::new(
                    ArchiverChart::Speedup { inputs: inputs.clone(), programs: Programs::default() },
                    None,
                    ChartOptions { log_x: true, grid: true, width: 600, height: 500, ..ChartOptions::default() }
                        .saved_to("speedup_plot.png"),
                ),
                ChartRequest::new(
                    ArchiverChart::ExecutionTime { inputs, programs: Programs::default() },
                    None,
                    ChartOptions { log_y: true, grid: true, width: 600, height: 500, ..ChartOptions::default() }
                        .saved_to("execution_time_plot.png"),
                ),
            ],
        }
    }
}

// ================== Mergesort ==================

fn default_threads() -> u32 {
    16
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MergesortChart {
    ParallelSpeedup {
        size: u64,
        #[serde(default)]
        ideal: bool,
    },
    ParallelEfficiency {
        size: u64,
    },
    StrongScalability {
        size: u64,
        #[serde(default = "default_threads")]
        threads: u32,
        #[serde(default)]
        ideal: bool,
    },
    WeakScalability {
        base_size: u64,
        #[serde(default = "default_threads")]
        threads: u32,
        #[serde(default)]
        ideal: bool,
    },
}

impl Default for Plan<MergesortChart> {
    fn default() -> Self {
        let options = ChartOptions {
            grid: true,
            width: 800,
            height: 500,
            ..ChartOptions::default()
        };
        let log_x = ChartOptions { log_x: true, ..options.clone() };

        Plan {
            charts: vec![
                ChartRequest::new(
                    MergesortChart::ParallelSpeedup { size: 10_000_000, ideal: false },
                    Some("Parallel Speedup over Sequential (Size: 10M)"),
                    log_x.clone().saved_to("parallel_speedup10M.png"),
                ),
                ChartRequest::new(
                    MergesortChart::ParallelSpeedup { size: 100_000_000, ideal: false },
                    Some("Parallel Speedup over Sequential (Size: 100M)"),
                    log_x.clone().saved_to("parallel_speedup100M.png"),
                ),
                ChartRequest::new(
                    MergesortChart::ParallelEfficiency { size: 100_000_000 },
                    Some("Parallel Efficiency over Sequential (Size: 100M)"),
                    options.saved_to("parallel_efficiency.png"),
                ),
                ChartRequest::new(
                    MergesortChart::StrongScalability { size: 10_000_000, threads: 16, ideal: false },
                    Some("Distributed Strong Scalability (Size: 10M, Threads: 16)"),
                    log_x.clone().saved_to("distributed_strong_scalability10M.png"),
                ),
                ChartRequest::new(
                    MergesortChart::StrongScalability { size: 100_000_000, threads: 16, ideal: false },
                    Some("Distributed Strong Scalability (Size: 100M, Threads: 16)"),
                    log_x.clone().saved_to("distributed_strong_scalability100M.png"),
                ),
                ChartRequest::new(
                    MergesortChart::WeakScalability { base_size: 1_000_000, threads: 16, ideal: false },
                    Some("Distributed Weak Scalability (Base Size: 1M, Threads: 16)"),
                    log_x.saved_to("distributed_weak_scalability.png"),
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn reads_tagged_charts_with_flattened_options() {
        let json = r#"{
            "charts": [
                { "kind": "weak_scalability", "base_size": 1000000, "ideal": true,
                  "log_x": true, "save": true, "save_path": "weak.png" },
                { "kind": "parallel_efficiency", "size": 100, "title": "Efficiency" }
            ]
        }"#;
        let plan: Plan<MergesortChart> = serde_json::from_str(json).unwrap();

        assert_eq!(
            plan.charts[0].chart,
            MergesortChart::WeakScalability { base_size: 1_000_000, threads: 16, ideal: true }
        );
        assert!(plan.charts[0].options.log_x);
        assert!(plan.charts[0].options.legend);
        assert_eq!(plan.charts[0].options.save_path, Some(PathBuf::from("weak.png")));
        assert_eq!(plan.charts[1].title.as_deref(), Some("Efficiency"));
        assert!(!plan.charts[1].options.save);
    }

    #[test]
    fn relative_save_paths_land_in_output_dir() {
        let plan = Plan::<CollatzChart>::default();
        let options = plan.charts[0].resolved_options(Path::new("Figures"), false);
        assert_eq!(options.save_path, Some(PathBuf::from("Figures/strong_scaling.png")));
        assert!(options.save);

        let displayed = plan.charts[0].resolved_options(Path::new("Figures"), true);
        assert!(!displayed.save);
    }

    #[test]
    fn archiver_programs_default_when_omitted() {
        let json = r#"{ "charts": [ { "kind": "speedup", "inputs": ["big_files"] } ] }"#;
        let plan: Plan<ArchiverChart> = serde_json::from_str(json).unwrap();
        match &plan.charts[0].chart {
            ArchiverChart::Speedup { programs, .. } => assert_eq!(programs, &Programs::default()),
            other => panic!("unexpected chart {:?}", other),
        }
    }

    #[test]
    fn unreadable_plan_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = Plan::<CollatzChart>::load(&path).unwrap_err();
        assert!(matches!(err, ReportError::Json(_)));
    }
}
