use benchmark_report_rs::chart::publish;
use benchmark_report_rs::cli::{init_logging, OutputArgs};
use benchmark_report_rs::parser::mergesort::*;
use benchmark_report_rs::plan::{load_or_default, MergesortChart, Plan};
use benchmark_report_rs::report::mergesort::*;
use benchmark_report_rs::table::print_table;
use clap::Parser;
use std::error::Error;
use std::path::PathBuf;

/// Plots parallel and distributed mergesort scalability.
#[derive(Debug, Parser)]
struct Args {
    /// Log of the sequential runs
    #[arg(long, default_value = "Results/seq_result.txt")]
    sequential: PathBuf,

    /// Log of the shared-memory parallel runs
    #[arg(long, default_value = "Results/par_result.txt")]
    parallel: PathBuf,

    /// Log of the distributed runs
    #[arg(long, default_value = "Results/mpi_result.txt")]
    distributed: PathBuf,

    #[command(flatten)]
    output: OutputArgs,
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    let args = Args::parse();

    // Parse the results from the text files and aggregate by mean
    let sequential = aggregate_sequential(&parse_sequential_results(&args.sequential)?);
    let parallel = aggregate_parallel(&parse_parallel_results(&args.parallel)?);
    let distributed = aggregate_distributed(&parse_distributed_results(&args.distributed)?);

    if args.output.show_tables {
        print_table("Sequential", &sequential);
        print_table("Parallel", &parallel);
        print_table("Distributed", &distributed);
    }

    let plan = load_or_default(args.output.plan.as_deref(), Plan::<MergesortChart>::default())?;
    for request in &plan.charts {
        let options = request.resolved_options(&args.output.output_dir, args.output.no_save);
        let figure = match request.chart {
            MergesortChart::ParallelSpeedup { size, ideal } => {
                parallel_speedup_by_payload(&parallel, &sequential, size, ideal)
            }
            MergesortChart::ParallelEfficiency { size } => parallel_efficiency_by_payload(&parallel, &sequential, size),
            MergesortChart::StrongScalability { size, threads, ideal } => {
                strong_scalability_by_payload(&distributed, size, threads, ideal)
            }
            MergesortChart::WeakScalability { base_size, threads, ideal } => {
                weak_scalability_by_payload(&distributed, base_size, threads, ideal)
            }
        };
        publish(&figure.with_title(request.title.as_deref()), &options)?;
    }

    Ok(())
}
