use benchmark_report_rs::chart::{publish, ChartOptions, Figure, Panel, Reference, Series};
use benchmark_report_rs::parser::archiver::{aggregate_archiver, parse_archiver_results};
use benchmark_report_rs::parser::collatz::{aggregate_collatz, parse_collatz_results};
use benchmark_report_rs::parser::mergesort::*;
use benchmark_report_rs::plan::{ArchiverChart, MergesortChart, Plan};
use benchmark_report_rs::report::archiver::{speedup_by_input, Programs};
use benchmark_report_rs::report::collatz::{time_vs_threads, RunSet};
use benchmark_report_rs::report::mergesort::{strong_scalability_by_payload, weak_scalability_by_payload};
use benchmark_report_rs::ReportError;
use std::fs;
use std::path::Path;

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn displayed() -> ChartOptions {
    ChartOptions { log_x: true, grid: true, ..ChartOptions::default() }
}

#[test]
fn collatz_log_to_displayed_figure() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "dynamic.txt",
        "\
Dynamic mode: ON
Number of threads: 1
Number of tasks (chunk size): 4
# elapsed time (parallel_collatz): 18.0s

Dynamic mode: ON
Number of threads: 2
Number of tasks (chunk size): 4
# elapsed time (parallel_collatz): 9.5s

Dynamic mode: ON
Number of threads: 2
Number of tasks (chunk size): 4
# elapsed time (parallel_collatz): 8.5s
",
    );

    let runs = aggregate_collatz(&parse_collatz_results(&path).unwrap());
    assert_eq!(runs.len(), 2);

    let sets = [RunSet { title: "Dynamic Scheduling Strong Scaling", runs: &runs }];
    let figure = time_vs_threads(&sets, &[4], Some(18.0));
    assert_eq!(figure.panels[0].series[0].points, vec![(1.0, 18.0), (2.0, 9.0)]);
    publish(&figure, &displayed()).unwrap();
}

#[test]
fn archiver_csv_to_speedup_panels() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "results.csv",
        "\
Program,Operation,Command,Threads,Output
minizseq,,\"./minizseq -r 1 -C\\ big_files\",1,\"Elapsed time: 12.00 s\"
minizpar,,\"./minizpar -r 1 -C\\ big_files\",2,\"Elapsed time: 6.00 s\"
minizpar,,\"./minizpar -r 1 -C\\ big_files\",4,\"Elapsed time: 3.50 s\"
minizpar,,\"./minizpar -r 1 -C\\ big_files\",4,\"Elapsed time: 2.50 s\"
",
    );

    let runs = aggregate_archiver(&parse_archiver_results(&path).unwrap());
    let inputs = vec!["big_files".to_string(), "small_files".to_string()];
    let figure = speedup_by_input(&runs, &inputs, &Programs::default());

    assert_eq!(figure.panels.len(), 1);
    assert_eq!(figure.panels[0].series[0].points, vec![(2.0, 2.0), (4.0, 4.0)]);
    publish(&figure, &displayed()).unwrap();
}

#[test]
fn distributed_log_to_scalability_figures() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "mpi_result.txt",
        "\
Nodes: 1
Record payload: 64
Array size: 1000000
N° cores according to FastFlow: 16
Tempo totale (escl. init): 10.0
Nodes: 2
Record payload: 64
Array size: 2000000
N° cores according to FastFlow: 16
MPI numbero of nodes: 2
Tempo totale (escl. init): 11.0
Nodes: 4
Record payload: 64
Array size: 4000000
N° cores according to FastFlow: 16
MPI numbero of nodes: 4
Tempo totale (escl. init): 12.5
",
    );

    let runs = aggregate_distributed(&parse_distributed_results(&path).unwrap());
    assert_eq!(runs.len(), 3);

    let weak = weak_scalability_by_payload(&runs, 1_000_000, 16, true);
    let points = &weak.panels[0].series[0].points;
    assert!((points[2].1 - 1.25).abs() < 1e-9);
    publish(&weak, &displayed()).unwrap();

    // No size has a 1-node run and more nodes at once
    let strong = strong_scalability_by_payload(&runs, 2_000_000, 16, false);
    assert!(strong.panels[0].series.is_empty());
}

#[test]
fn missing_log_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = parse_sequential_results(dir.path().join("seq_result.txt")).unwrap_err();
    assert!(matches!(err, ReportError::Io { .. }));
}

#[test]
fn default_plans_save_under_output_dir() {
    let dir = tempfile::tempdir().unwrap();

    let plan = Plan::<MergesortChart>::default();
    assert_eq!(plan.charts.len(), 6);
    for request in &plan.charts {
        let options = request.resolved_options(dir.path(), false);
        let destination = options.destination().unwrap().unwrap();
        assert!(destination.starts_with(dir.path()));
    }

    let plan = Plan::<ArchiverChart>::default();
    let options = plan.charts[1].resolved_options(dir.path(), true);
    assert_eq!(options.destination().unwrap(), None);
}

#[test]
fn multi_panel_log_figure_is_written_as_png() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sub").join("out.png");

    let mut speedup = Panel::new("Dynamic Scheduling Speedup", "Number of Threads", "Speedup");
    speedup.series.push(Series::new("Chunk size 4", &[(1u32, 0.9), (2u32, 1.8), (8u32, 6.5)]));
    speedup.references.push(Reference::Identity { from: 1.0, to: 8.0, label: "Ideal Speedup (x=y)".to_string() });
    let mut time = Panel::new("Static Scheduling Strong Scaling", "Number of Threads", "Average Time (s)");
    time.series.push(Series::new("Chunk size 16", &[(1u32, 18.0), (4u32, 5.0)]));
    time.references.push(Reference::Horizontal { y: 18.4, label: "Sequential Time".to_string() });
    let figure = Figure { panels: vec![speedup, time, Panel::new("Empty", "x", "y")] };

    let options = ChartOptions { log_x: true, log_y: true, grid: true, ..ChartOptions::default() }.saved_to(&path);
    publish(&figure, &options).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']));
}
