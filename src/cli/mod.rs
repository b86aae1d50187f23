//! CLI for telesim.
//!
//! All CLI logic lives here rather than in main.rs so it is fully testable:
//! the entry point parses arguments and hands them to [`run_cli`].

mod args;
mod commands;
mod output;

pub use args::{Args, Command, RunOptions};
pub use commands::{run_cli, run_monte_carlo, run_scan};
pub use output::{
    print_help, print_mode_list, print_scan_result, print_summary, print_version,
    write_artifact, MonteCarloArtifact, ScanArtifact,
};
