//! CLI output formatting and result artifacts.
//!
//! Printing and artifact writing live here, away from the command handlers,
//! so both can be tested directly. Artifacts are JSON files, one per mode,
//! created fresh on every run.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::driver::ScanPoint;
use crate::error::TelResult;
use crate::scenarios::Mode;
use crate::stats::distribution::Histogram;
use crate::stats::summary::{Estimate, ResolutionSummary};

/// Result artifact of a Monte Carlo run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloArtifact {
    /// Human-readable title of the bench.
    pub title: String,
    /// Mode number.
    pub mode: i32,
    /// Master seed actually used (recorded for replay).
    pub seed: u64,
    /// Number of iterations.
    pub iterations: usize,
    /// The fitted window histogram.
    pub histogram: Histogram,
    /// Extracted centre and width.
    pub summary: ResolutionSummary,
}

/// Result artifact of a material-budget scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanArtifact {
    /// Human-readable title of the bench.
    pub title: String,
    /// Mode number.
    pub mode: i32,
    /// Swept budget range, half-open.
    pub from: f64,
    /// Exclusive upper bound of the sweep.
    pub to: f64,
    /// Sweep step.
    pub step: f64,
    /// The resolution curve.
    pub points: Vec<ScanPoint>,
}

/// Write an artifact as pretty JSON under `directory/<stem>.json`.
///
/// The file is created fresh (truncated) each run; the directory is created
/// if missing.
///
/// # Errors
///
/// Returns an error on I/O or serialization failure.
pub fn write_artifact<T: Serialize>(
    directory: &Path,
    mode: Mode,
    artifact: &T,
) -> TelResult<PathBuf> {
    std::fs::create_dir_all(directory)?;
    let path = directory.join(format!("{}.json", mode.artifact_stem()));
    let file = std::fs::File::create(&path)?;
    serde_json::to_writer_pretty(file, artifact)?;
    info!(path = %path.display(), "artifact written");
    Ok(path)
}

/// Version line, including the git hash captured by the build script when
/// the build ran inside a checkout.
fn version_line() -> String {
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => {
            format!("telesim {} ({hash})", env!("CARGO_PKG_VERSION"))
        }
        _ => format!("telesim {}", env!("CARGO_PKG_VERSION")),
    }
}

/// Print version information.
pub fn print_version() {
    println!("{}", version_line());
}

/// Print help message.
pub fn print_help() {
    println!(
        r"telesim - beam telescope resolution estimation

USAGE:
    telesim [-v <level>] <COMMAND> <MODE> [OPTIONS]

COMMANDS:
    mc <mode>       Monte Carlo error propagation for one bench mode
    scan <mode>     Deterministic material-budget scan for one bench mode
    modes           List the available bench modes (mode 0 does the same)

OPTIONS:
    --config <file.yaml>    Load run configuration from YAML
    --seed <N>              Master seed (default: from entropy, logged)
    --iterations <N>        Monte Carlo iterations (default: 10000)
    --workers <N>           Worker threads (default: 1)
    --out <dir>             Artifact directory (default: output)
    -v <level>              Log level (error, warn, info, debug, trace)

EXAMPLES:
    telesim mc 1 --seed 42
    telesim scan 3 --out results
    telesim mc 0
"
    );
}

/// Print the bench mode menu.
pub fn print_mode_list() {
    println!("Please choose your mode:");
    for mode in Mode::ALL {
        println!("\t{mode}");
    }
}

/// Print a Monte Carlo summary in the units the benches are quoted in.
pub fn print_summary(mode: Mode, summary: &ResolutionSummary) {
    println!("{}", mode.title());
    // Internal unit is mm; resolutions are conventionally quoted in um.
    println!(
        "  resolution at DUT: {:.3} +/- {:.3} um ({} samples)",
        summary.center * 1000.0,
        summary.width * 1000.0,
        summary.samples
    );
    if summary.estimate == Estimate::RawMoments {
        println!("  note: Gaussian fit did not converge, raw moments reported");
    }
}

/// Print a scan curve summary.
pub fn print_scan_result(mode: Mode, points: &[ScanPoint]) {
    println!("{}", mode.title());
    println!("  {} scan points", points.len());
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        println!(
            "  budget {:.4}% X0 -> {:.3} um",
            first.budget * 100.0,
            first.resolution * 1000.0
        );
        println!(
            "  budget {:.4}% X0 -> {:.3} um",
            last.budget * 100.0,
            last.resolution * 1000.0
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_line_carries_package_version() {
        let line = version_line();
        assert!(line.starts_with("telesim "));
        assert!(line.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_artifact_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = ScanArtifact {
            title: Mode::SpsApx7.title().to_string(),
            mode: 1,
            from: 0.9e-2,
            to: 1.1e-2,
            step: 1.0e-4,
            points: vec![ScanPoint {
                budget: 0.9e-2,
                resolution: 2.1e-3,
            }],
        };

        let path = write_artifact(dir.path(), Mode::SpsApx7, &artifact).unwrap();
        assert!(path.ends_with("sps-resolution-nov2018_apx_7planes.json"));

        let content = std::fs::read_to_string(&path).unwrap();
        let back: ScanArtifact = serde_json::from_str(&content).unwrap();
        assert_eq!(back.points.len(), 1);
        assert!((back.points[0].budget - 0.9e-2).abs() < 1e-15);
    }

    #[test]
    fn test_artifact_is_truncated_on_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let mut artifact = ScanArtifact {
            title: String::new(),
            mode: 2,
            from: 0.0,
            to: 1.0,
            step: 0.5,
            points: vec![
                ScanPoint {
                    budget: 0.0,
                    resolution: 1.0,
                },
                ScanPoint {
                    budget: 0.5,
                    resolution: 2.0,
                },
            ],
        };
        write_artifact(dir.path(), Mode::SpsApx6, &artifact).unwrap();

        artifact.points.truncate(1);
        let path = write_artifact(dir.path(), Mode::SpsApx6, &artifact).unwrap();

        let back: ScanArtifact =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.points.len(), 1);
    }

    #[test]
    fn test_nested_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let artifact = ScanArtifact {
            title: String::new(),
            mode: 3,
            from: 0.0,
            to: 0.0,
            step: 1.0,
            points: vec![],
        };
        let path = write_artifact(&nested, Mode::SpsCp27, &artifact).unwrap();
        assert!(path.exists());
    }
}
