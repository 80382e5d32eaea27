use benchmark_report_rs::chart::{publish, Figure};
use benchmark_report_rs::cli::{init_logging, OutputArgs};
use benchmark_report_rs::parser::collatz::{aggregate_collatz, parse_collatz_results, CollatzRun};
use benchmark_report_rs::plan::{load_or_default, CollatzChart, Plan};
use benchmark_report_rs::report::collatz::{speedup_vs_threads, time_vs_threads, RunSet};
use benchmark_report_rs::table::print_table;
use benchmark_report_rs::ReportError;
use clap::Parser;
use std::error::Error;
use std::path::PathBuf;

/// Plots strong scaling and speedup of the parallel Collatz counter.
#[derive(Debug, Parser)]
struct Args {
    /// Log of the dynamic-scheduling runs
    #[arg(long, default_value = "Results/dynamic_strong_scaling.txt")]
    dynamic: PathBuf,

    /// Log of the static-scheduling runs
    #[arg(long = "static", default_value = "Results/static_strong_scaling.txt")]
    static_log: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

/// Builds one chart with a panel per scheduling mode.
fn draw(chart: &CollatzChart, dynamic: &[CollatzRun], static_runs: &[CollatzRun]) -> Result<Figure, ReportError> {
    let suffix = match chart {
        CollatzChart::TimeVsThreads { .. } => "Strong Scaling",
        CollatzChart::SpeedupVsThreads { .. } => "Speedup",
    };
    let dynamic_title = format!("Dynamic Scheduling {}", suffix);
    let static_title = format!("Static Scheduling {}", suffix);
    let sets = [
        RunSet { title: &dynamic_title, runs: dynamic },
        RunSet { title: &static_title, runs: static_runs },
    ];

    match chart {
        CollatzChart::TimeVsThreads { chunk_sizes, seq_time } => Ok(time_vs_threads(&sets, chunk_sizes, *seq_time)),
        CollatzChart::SpeedupVsThreads { chunk_sizes, seq_time } => speedup_vs_threads(&sets, chunk_sizes, *seq_time),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    let args = Args::parse();

    // Parse and aggregate both scheduling modes
    let dynamic = aggregate_collatz(&parse_collatz_results(&args.dynamic)?);
    let static_runs = aggregate_collatz(&parse_collatz_results(&args.static_log)?);

    if args.output.show_tables {
        print_table("Dynamic scheduling", &dynamic);
        print_table("Static scheduling", &static_runs);
    }

    // Render every chart of the plan
    let plan = load_or_default(args.output.plan.as_deref(), Plan::<CollatzChart>::default())?;
    for request in &plan.charts {
        let options = request.resolved_options(&args.output.output_dir, args.output.no_save);
        let figure = draw(&request.chart, &dynamic, &static_runs)?;
        publish(&figure.with_title(request.title.as_deref()), &options)?;
    }

    Ok(())
}
