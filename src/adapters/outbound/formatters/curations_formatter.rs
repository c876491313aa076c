use crate::application::dto::CurationResponse;
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct PackageCuration {
    id: String,
    curations: CurationData,
}

#[derive(Debug, Serialize)]
struct CurationData {
    concluded_license: String,
    comment: String,
}

/// CurationsFormatter adapter for an ORT `curations.yml`
///
/// Only auto-apply suggestions are written; manual-review suggestions
/// need a human decision first.
pub struct CurationsFormatter;

impl CurationsFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CurationsFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for CurationsFormatter {
    fn format(&self, response: &CurationResponse) -> Result<String> {
        let curations: Vec<PackageCuration> = response
            .auto_apply()
            .map(|suggestion| PackageCuration {
                id: suggestion.id.to_string(),
                curations: CurationData {
                    concluded_license: suggestion.suggested_license.to_string(),
                    comment: format!(
                        "{} (confidence {}%, run {})",
                        suggestion.comment, suggestion.confidence, response.metadata.run_id
                    ),
                },
            })
            .collect();

        serde_yaml_ng::to_string(&curations)
            .map_err(|e| anyhow::anyhow!("Failed to serialize curations: {}", e))
    }
}
