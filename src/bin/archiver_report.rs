use benchmark_report_rs::chart::publish;
use benchmark_report_rs::cli::{init_logging, OutputArgs};
use benchmark_report_rs::parser::archiver::{aggregate_archiver, parse_archiver_results};
use benchmark_report_rs::plan::{load_or_default, ArchiverChart, Plan};
use benchmark_report_rs::report::archiver::{execution_time_by_input, speedup_by_input};
use benchmark_report_rs::table::print_table;
use clap::Parser;
use std::error::Error;
use std::path::PathBuf;

/// Plots speedup and execution time of the parallel archiver.
#[derive(Debug, Parser)]
struct Args {
    /// CSV with columns Program, Operation, Command, Threads, Output
    #[arg(long, default_value = "results.csv")]
    results: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    let args = Args::parse();

    // Group by program, operation, input and threads
    let runs = aggregate_archiver(&parse_archiver_results(&args.results)?);
    if args.output.show_tables {
        print_table("Archiver runs", &runs);
    }

    let plan = load_or_default(args.output.plan.as_deref(), Plan::<ArchiverChart>::default())?;
    for request in &plan.charts {
        let options = request.resolved_options(&args.output.output_dir, args.output.no_save);
        let figure = match &request.chart {
            ArchiverChart::Speedup { inputs, programs } => speedup_by_input(&runs, inputs, programs),
            ArchiverChart::ExecutionTime { inputs, programs } => execution_time_by_input(&runs, inputs, programs),
        };
        publish(&figure.with_title(request.title.as_deref()), &options)?;
    }

    Ok(())
}
