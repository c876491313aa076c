use serde::Serialize;

/// Count of packages per risk level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskBreakdown {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Project-wide outcome of a classification pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total_packages: usize,
    pub approved_count: usize,
    pub conditional_count: usize,
    pub forbidden_count: usize,
    pub unknown_count: usize,
    pub incompatible_count: usize,
    /// `100 * approved / total` truncated to an integer (2 of 3 is 66),
    /// 0 for an empty run
    pub compliance_score: u8,
    pub risk_breakdown: RiskBreakdown,
}

impl RunSummary {
    /// Forbidden or incompatible packages are present.
    pub fn has_blocking_packages(&self) -> bool {
        self.forbidden_count + self.incompatible_count > 0
    }
}

/// Identifies one engine invocation in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    pub run_id: String,
    pub generated_at: String,
    pub tool_name: String,
    pub tool_version: String,
}

impl RunMetadata {
    pub fn new(run_id: String, generated_at: String, tool_name: String, tool_version: String) -> Self {
        Self {
            run_id,
            generated_at,
            tool_name,
            tool_version,
        }
    }
}
