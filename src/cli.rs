use clap::Parser;
use std::path::PathBuf;

use license_curator::application::dto::OutputFormat;

/// License decision and curation engine for ORT/ScanCode results
#[derive(Parser, Debug, Default)]
#[command(name = "license-curator")]
#[command(version)]
#[command(
    about = "Classify dependency licenses against a company policy, track license changes and suggest curations",
    long_about = None
)]
pub struct Args {
    /// Company license policy (YAML)
    #[arg(short, long, value_name = "FILE")]
    pub policy: Option<PathBuf>,

    /// ORT analyzer result (analyzer-result.yml)
    #[arg(long = "ort-results", alias = "analyzer-result", value_name = "FILE")]
    pub ort_results: Option<PathBuf>,

    /// Registry evidence JSON with declared licenses per package
    #[arg(long = "registry-evidence", alias = "pypi-json", value_name = "FILE")]
    pub registry_evidence: Option<PathBuf>,

    /// Directory containing one ScanCode JSON result per package
    #[arg(long = "scancode-dir", alias = "scan-dir", value_name = "DIR")]
    pub scancode_dir: Option<PathBuf>,

    /// License history file [default: .ort/license-history.json]
    #[arg(long, value_name = "FILE")]
    pub history: Option<PathBuf>,

    /// Do not read or update the license history
    #[arg(long, conflicts_with = "history")]
    pub no_history: bool,

    /// Output format: json or curations
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Exit with code 1 when forbidden or incompatible packages are found
    #[arg(long)]
    pub fail_on_forbidden: bool,

    /// Exit with code 1 when a critical license change is detected
    #[arg(long, alias = "fail-on-critical")]
    pub fail_on_critical_change: bool,

    /// Ignore scanner matches scoring below this value (0-100)
    #[arg(long, value_name = "SCORE", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub min_scan_score: Option<u8>,

    /// Config file path [default: ./license-curator.config.yml if present]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log per-package decisions to stderr
    #[arg(short, long)]
    pub verbose: bool,
}
