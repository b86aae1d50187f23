//! CLI command handlers.
//!
//! Execution logic for each command, extracted from the entry point so the
//! behavior is testable. The mode number is validated before any
//! configuration, sampler, or output state is created; an invalid mode can
//! never leave half-initialized state behind.

use std::process::ExitCode;

use tracing::info;

use crate::config::RunConfig;
use crate::driver::{MaterialScan, MonteCarloDriver};
use crate::engine::rng::SimRng;
use crate::error::TelResult;
use crate::oracle::AnalyticOracle;
use crate::scenarios::Mode;
use crate::stats::summary::summarize_with_histogram;

use super::args::{Args, Command, RunOptions};
use super::output::{
    print_help, print_mode_list, print_scan_result, print_summary, print_version,
    write_artifact, MonteCarloArtifact, ScanArtifact,
};

/// Main CLI entry point, dispatching on the parsed command.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    match args.command {
        Command::MonteCarlo { mode, options } => run_monte_carlo(mode, &options),
        Command::Scan { mode, options } => run_scan(mode, &options),
        Command::ListModes => {
            print_mode_list();
            ExitCode::SUCCESS
        }
        Command::Help => {
            print_help();
            ExitCode::SUCCESS
        }
        Command::Version => {
            print_version();
            ExitCode::SUCCESS
        }
    }
}

/// Run Monte Carlo error propagation for one mode.
#[must_use]
pub fn run_monte_carlo(mode_number: i32, options: &RunOptions) -> ExitCode {
    // Mode validation comes first; nothing else exists yet.
    let mode = match Mode::try_from(mode_number) {
        Ok(mode) => mode,
        Err(err) => {
            eprintln!("Error: {err}");
            print_mode_list();
            return ExitCode::FAILURE;
        }
    };

    match execute_monte_carlo(mode, options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn execute_monte_carlo(mode: Mode, options: &RunOptions) -> TelResult<()> {
    let config = resolve_run_config(options)?;
    let telescope = mode.configuration()?;
    let oracle = AnalyticOracle::new();
    let driver = MonteCarloDriver::with_iterations(config.monte_carlo.iterations);

    let master_seed = config
        .reproducibility
        .seed
        .unwrap_or_else(|| SimRng::from_entropy().master_seed());
    info!(mode = mode.number(), seed = master_seed, "configured run");

    let dist = if config.monte_carlo.workers > 1 {
        driver.run_parallel(&telescope, &oracle, master_seed, config.monte_carlo.workers)?
    } else {
        let mut rng = SimRng::new(master_seed);
        driver.run(&telescope, &oracle, &mut rng)?
    };

    let (summary, histogram) = summarize_with_histogram(&dist, config.summary.bins)?;

    let artifact = MonteCarloArtifact {
        title: mode.title().to_string(),
        mode: mode.number(),
        seed: master_seed,
        iterations: dist.len(),
        histogram,
        summary,
    };
    write_artifact(std::path::Path::new(&config.output.directory), mode, &artifact)?;

    print_summary(mode, &summary);
    Ok(())
}

/// Run a deterministic material-budget scan for one mode.
#[must_use]
pub fn run_scan(mode_number: i32, options: &RunOptions) -> ExitCode {
    let mode = match Mode::try_from(mode_number) {
        Ok(mode) => mode,
        Err(err) => {
            eprintln!("Error: {err}");
            print_mode_list();
            return ExitCode::FAILURE;
        }
    };

    match execute_scan(mode, options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn execute_scan(mode: Mode, options: &RunOptions) -> TelResult<()> {
    let config = resolve_run_config(options)?;
    let telescope = mode.configuration()?;
    let oracle = AnalyticOracle::new();

    let (from, to, step) = mode.default_scan_range();
    let scan = MaterialScan::new(&telescope, &oracle, from, to, step)?;
    let points = scan.collect::<TelResult<Vec<_>>>()?;
    info!(mode = mode.number(), points = points.len(), "scan complete");

    let artifact = ScanArtifact {
        title: mode.title().to_string(),
        mode: mode.number(),
        from,
        to,
        step,
        points,
    };
    write_artifact(std::path::Path::new(&config.output.directory), mode, &artifact)?;

    print_scan_result(mode, &artifact.points);
    Ok(())
}

/// Resolve the effective run configuration: YAML file if given, defaults
/// otherwise, with command-line overrides applied on top.
fn resolve_run_config(options: &RunOptions) -> TelResult<RunConfig> {
    let mut config = match &options.config_path {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };

    if let Some(seed) = options.seed {
        config.reproducibility.seed = Some(seed);
    }
    if let Some(iterations) = options.iterations {
        config.monte_carlo.iterations = iterations;
    }
    if let Some(workers) = options.workers {
        config.monte_carlo.workers = workers;
    }
    if let Some(output) = &options.output {
        config.output.directory.clone_from(output);
    }

    Ok(config)
}
