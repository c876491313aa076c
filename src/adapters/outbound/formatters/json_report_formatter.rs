use crate::application::dto::CurationResponse;
use crate::license_engine::domain::{
    ChangeEvent, CurationSuggestion, PolicyCheckResult, RunMetadata, RunSummary, RunWarning,
};
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    metadata: &'a RunMetadata,
    summary: &'a RunSummary,
    results: &'a [PolicyCheckResult],
    history: HistorySection<'a>,
    curations: CurationSection<'a>,
    warnings: &'a [RunWarning],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HistorySection<'a> {
    initialized: bool,
    critical_change_detected: bool,
    changes: &'a [ChangeEvent],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CurationSection<'a> {
    auto_apply: Vec<&'a CurationSuggestion>,
    manual_review: Vec<&'a CurationSuggestion>,
}

/// JsonReportFormatter adapter for the full machine-readable run report
pub struct JsonReportFormatter;

impl JsonReportFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonReportFormatter {
    fn format(&self, response: &CurationResponse) -> Result<String> {
        let report = Report {
            metadata: &response.metadata,
            summary: &response.summary,
            results: &response.results,
            history: HistorySection {
                initialized: response.history_initialized,
                critical_change_detected: response.critical_change_detected,
                changes: &response.changes,
            },
            curations: CurationSection {
                auto_apply: response.auto_apply().collect(),
                manual_review: response.manual_review().collect(),
            },
            warnings: &response.warnings,
        };

        serde_json::to_string_pretty(&report)
            .map_err(|e| anyhow::anyhow!("Failed to serialize run report: {}", e))
    }
}
