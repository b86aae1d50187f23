//! CLI argument parsing.
//!
//! Extracted from the entry point to enable testing of the parsing logic;
//! `parse_from` accepts any iterator of strings, not just `std::env::args()`.

use std::path::PathBuf;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// Logging verbosity (`-v <level>`), a tracing filter directive.
    pub verbosity: Option<String>,
    /// The command to execute.
    pub command: Command,
}

/// Knobs shared by both run commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Optional YAML configuration file.
    pub config_path: Option<PathBuf>,
    /// Seed override.
    pub seed: Option<u64>,
    /// Iteration count override.
    pub iterations: Option<usize>,
    /// Worker count override.
    pub workers: Option<usize>,
    /// Output directory override.
    pub output: Option<String>,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Monte Carlo error propagation for one bench mode.
    MonteCarlo {
        /// Raw mode number; validated before anything else runs.
        mode: i32,
        /// Shared run options.
        options: RunOptions,
    },
    /// Deterministic material-budget scan for one bench mode.
    Scan {
        /// Raw mode number; validated before anything else runs.
        mode: i32,
        /// Shared run options.
        options: RunOptions,
    },
    /// List the available bench modes.
    ListModes,
    /// Show help.
    Help,
    /// Show version.
    Version,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    fn parse_from_vec(args: &[String]) -> Self {
        let mut verbosity = None;
        let mut rest = Vec::with_capacity(args.len());

        // Global `-v <level>` may appear anywhere, as in the original tool.
        let mut i = 1;
        while i < args.len() {
            if args[i] == "-v" && i + 1 < args.len() {
                verbosity = Some(args[i + 1].clone());
                i += 2;
            } else {
                rest.push(args[i].clone());
                i += 1;
            }
        }

        if rest.is_empty() {
            return Self {
                verbosity,
                command: Command::Help,
            };
        }

        let command = match rest[0].as_str() {
            "mc" => Self::parse_run_command(&rest, true),
            "scan" => Self::parse_run_command(&rest, false),
            "modes" | "list-modes" => Command::ListModes,
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            unknown => {
                eprintln!("Unknown command: {unknown}");
                Command::Help
            }
        };

        Self { verbosity, command }
    }

    /// Parse `mc <mode>` or `scan <mode>` and their options.
    fn parse_run_command(rest: &[String], monte_carlo: bool) -> Command {
        let Some(mode_arg) = rest.get(1) else {
            eprintln!("Error: a mode number is required (0 lists the modes)");
            return Command::Help;
        };
        let Ok(mode) = mode_arg.parse::<i32>() else {
            eprintln!("Error: mode must be a number, got '{mode_arg}'");
            return Command::Help;
        };

        // Mode 0 asks for the menu, matching the original tool.
        if mode == 0 {
            return Command::ListModes;
        }

        let mut options = RunOptions::default();
        let mut i = 2;
        while i < rest.len() {
            match rest[i].as_str() {
                "--config" => {
                    if let Some(value) = rest.get(i + 1) {
                        options.config_path = Some(PathBuf::from(value));
                        i += 2;
                    } else {
                        i += 1;
                    }
                }
                "--seed" => {
                    if let Some(seed) = rest.get(i + 1).and_then(|v| v.parse().ok()) {
                        options.seed = Some(seed);
                    }
                    i += 2;
                }
                "--iterations" => {
                    if let Some(n) = rest.get(i + 1).and_then(|v| v.parse().ok()) {
                        options.iterations = Some(n);
                    }
                    i += 2;
                }
                "--workers" => {
                    if let Some(n) = rest.get(i + 1).and_then(|v| v.parse().ok()) {
                        options.workers = Some(n);
                    }
                    i += 2;
                }
                "--out" => {
                    if let Some(value) = rest.get(i + 1) {
                        options.output = Some(value.clone());
                        i += 2;
                    } else {
                        i += 1;
                    }
                }
                _ => i += 1,
            }
        }

        if monte_carlo {
            Command::MonteCarlo { mode, options }
        } else {
            Command::Scan { mode, options }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_args_shows_help() {
        let args = Args::parse_from(["telesim"]);
        assert_eq!(args.command, Command::Help);
    }

    #[test]
    fn test_mc_with_mode() {
        let args = Args::parse_from(["telesim", "mc", "1"]);
        assert_eq!(
            args.command,
            Command::MonteCarlo {
                mode: 1,
                options: RunOptions::default()
            }
        );
    }

    #[test]
    fn test_mode_zero_lists_modes() {
        let args = Args::parse_from(["telesim", "mc", "0"]);
        assert_eq!(args.command, Command::ListModes);
        let args = Args::parse_from(["telesim", "scan", "0"]);
        assert_eq!(args.command, Command::ListModes);
    }

    #[test]
    fn test_missing_mode_shows_help() {
        let args = Args::parse_from(["telesim", "mc"]);
        assert_eq!(args.command, Command::Help);
    }

    #[test]
    fn test_invalid_mode_is_not_validated_here() {
        // Range validation happens in the command handler, not the parser.
        let args = Args::parse_from(["telesim", "mc", "99"]);
        assert!(matches!(args.command, Command::MonteCarlo { mode: 99, .. }));
    }

    #[test]
    fn test_run_options() {
        let args = Args::parse_from([
            "telesim",
            "mc",
            "3",
            "--seed",
            "42",
            "--iterations",
            "5000",
            "--workers",
            "4",
            "--out",
            "results",
        ]);
        match args.command {
            Command::MonteCarlo { mode, options } => {
                assert_eq!(mode, 3);
                assert_eq!(options.seed, Some(42));
                assert_eq!(options.iterations, Some(5000));
                assert_eq!(options.workers, Some(4));
                assert_eq!(options.output.as_deref(), Some("results"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_verbosity_flag() {
        let args = Args::parse_from(["telesim", "-v", "debug", "scan", "2"]);
        assert_eq!(args.verbosity.as_deref(), Some("debug"));
        assert!(matches!(args.command, Command::Scan { mode: 2, .. }));
    }

    #[test]
    fn test_config_path() {
        let args = Args::parse_from(["telesim", "mc", "1", "--config", "run.yaml"]);
        match args.command {
            Command::MonteCarlo { options, .. } => {
                assert_eq!(options.config_path, Some(PathBuf::from("run.yaml")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_version_aliases() {
        for alias in ["version", "--version", "-V"] {
            let args = Args::parse_from(["telesim", alias]);
            assert_eq!(args.command, Command::Version);
        }
    }
}
