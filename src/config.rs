//! Configuration file support for license-curator.
//!
//! Provides YAML-based configuration through `license-curator.config.yml` files
//! and the merge of file values with command-line arguments.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::cli::Args;
use license_curator::adapters::outbound::filesystem::DEFAULT_HISTORY_PATH;
use license_curator::application::dto::{CurationRequest, OutputFormat, DEFAULT_MIN_SCAN_SCORE};
use license_curator::shared::Result;

pub const CONFIG_FILENAME: &str = "license-curator.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub policy: Option<PathBuf>,
    #[serde(alias = "ort_results")]
    pub analyzer_result: Option<PathBuf>,
    pub registry_evidence: Option<PathBuf>,
    #[serde(alias = "scancode_dir")]
    pub scan_dir: Option<PathBuf>,
    pub history: Option<PathBuf>,
    pub track_history: Option<bool>,
    pub format: Option<String>,
    pub min_scan_score: Option<u8>,
    pub fail_on_forbidden: Option<bool>,
    pub fail_on_critical_change: Option<bool>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    eprintln!("📄 Auto-discovered config file: {}", config_path.display());
    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(score) = config.min_scan_score {
        if score > 100 {
            bail!(
                "Invalid config: min_scan_score must be between 0 and 100, got {}.\n\n\
                 💡 Hint: ScanCode match scores are percentages.",
                score
            );
        }
    }
    if let Some(ref format) = config.format {
        if let Err(e) = format.parse::<OutputFormat>() {
            bail!("Invalid config: {}", e);
        }
    }
    Ok(())
}

fn warn_unknown_fields(config: &ConfigFile) {
    let mut keys: Vec<_> = config.unknown_fields.keys().collect();
    keys.sort();
    for key in keys {
        tracing::warn!(field = %key, "unknown config field");
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}

/// Effective settings for one run, command-line values taking precedence
#[derive(Debug)]
pub struct Settings {
    pub request: CurationRequest,
    pub history_path: PathBuf,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub fail_on_forbidden: bool,
    pub fail_on_critical_change: bool,
}

impl Settings {
    pub fn resolve(args: Args, config: Option<ConfigFile>) -> Result<Self> {
        let config = config.unwrap_or_default();

        let Some(policy) = args.policy.or(config.policy) else {
            bail!(
                "No license policy given.\n\n\
                 💡 Hint: Pass --policy <FILE> or set 'policy' in {}.",
                CONFIG_FILENAME
            );
        };
        let Some(ort_results) = args.ort_results.or(config.analyzer_result) else {
            bail!(
                "No analyzer result given.\n\n\
                 💡 Hint: Pass --ort-results <FILE> or set 'analyzer_result' in {}.",
                CONFIG_FILENAME
            );
        };

        let format = match args.format {
            Some(format) => format,
            None => match config.format {
                Some(ref raw) => raw.parse().map_err(anyhow::Error::msg)?,
                None => OutputFormat::default(),
            },
        };

        let track_history = !args.no_history && config.track_history.unwrap_or(true);
        let history_path = args
            .history
            .or(config.history)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_PATH));
        let min_scan_score = args
            .min_scan_score
            .or(config.min_scan_score)
            .unwrap_or(DEFAULT_MIN_SCAN_SCORE);

        let request = CurationRequest::new(policy, ort_results)
            .with_registry_evidence(args.registry_evidence.or(config.registry_evidence))
            .with_scan_dir(args.scancode_dir.or(config.scan_dir))
            .with_history(track_history)
            .with_min_scan_score(min_scan_score);

        Ok(Self {
            request,
            history_path,
            format,
            output: args.output,
            fail_on_forbidden: args.fail_on_forbidden
                || config.fail_on_forbidden.unwrap_or(false),
            fail_on_critical_change: args.fail_on_critical_change
                || config.fail_on_critical_change.unwrap_or(false),
        })
    }
}
