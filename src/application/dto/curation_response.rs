use crate::license_engine::domain::{
    ChangeEvent, CurationSuggestion, PolicyCheckResult, RunMetadata, RunSummary, RunWarning,
};

/// CurationResponse - Internal response DTO from the curation use case
///
/// Carries everything a formatter needs; formatters decide what to render.
#[derive(Debug, Clone)]
pub struct CurationResponse {
    pub metadata: RunMetadata,
    pub summary: RunSummary,
    /// One result per analyzed package, in analyzer order
    pub results: Vec<PolicyCheckResult>,
    /// License changes against the stored history (empty on the first run)
    pub changes: Vec<ChangeEvent>,
    /// True when this run created the history instead of diffing against it
    pub history_initialized: bool,
    pub critical_change_detected: bool,
    /// Suggestions for packages whose verdict is neither approved nor forbidden
    pub suggestions: Vec<CurationSuggestion>,
    pub warnings: Vec<RunWarning>,
}

impl CurationResponse {
    pub fn auto_apply(&self) -> impl Iterator<Item = &CurationSuggestion> {
        self.suggestions.iter().filter(|s| s.is_auto_apply())
    }

    pub fn manual_review(&self) -> impl Iterator<Item = &CurationSuggestion> {
        self.suggestions.iter().filter(|s| !s.is_auto_apply())
    }

    /// Forbidden or incompatible packages are present
    pub fn has_blocking_packages(&self) -> bool {
        self.summary.has_blocking_packages()
    }
}
