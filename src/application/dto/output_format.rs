/// Output format enumeration for curation runs
///
/// Both the CLI (inbound adapter) and the formatters (outbound adapters)
/// need to understand this, so it lives in the application layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Full JSON run report (default)
    #[default]
    Json,
    /// ORT curations.yml with the auto-apply suggestions only
    Curations,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "curations" | "ort" => Ok(OutputFormat::Curations),
            _ => Err(format!(
                "Invalid format: {}. Please specify 'json' or 'curations'",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Curations => write!(f, "curations"),
        }
    }
}
