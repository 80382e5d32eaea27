use clap::Args;
use std::path::PathBuf;

/// Output options shared by every report binary.
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Directory where relative figure paths are written
    #[arg(long, default_value = "Figures")]
    pub output_dir: PathBuf,

    /// JSON chart plan replacing the built-in one
    #[arg(long)]
    pub plan: Option<PathBuf>,

    /// Print the figures instead of writing images
    #[arg(long)]
    pub no_save: bool,

    /// Print the aggregated tables
    #[arg(long)]
    pub show_tables: bool,
}

/// Initialises logging on stdout, `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .init();
}
