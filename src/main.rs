//! telesim CLI - beam telescope resolution estimation.

use std::process::ExitCode;

use telesim::cli::{run_cli, Args};

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbosity.as_deref());
    run_cli(args)
}

/// Install the global subscriber. `-v <level>` wins over `RUST_LOG`.
fn init_logging(verbosity: Option<&str>) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
