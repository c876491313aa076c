use crate::license_engine::domain::{PolicyCheckResult, PolicyVerdict, RiskLevel, RunSummary};

/// Rolls per-package results up into the project-wide summary.
pub struct ComplianceScorer;

impl ComplianceScorer {
    /// `100 * approved / total`, truncated toward zero rather than rounded
    /// (2 of 3 approved scores 66). An empty run scores 0.
    pub fn compliance_score(approved: usize, total: usize) -> u8 {
        if total == 0 {
            return 0;
        }
        let score = approved.min(total) * 100 / total;
        score as u8
    }

    pub fn summarize(results: &[PolicyCheckResult]) -> RunSummary {
        let mut summary = RunSummary {
            total_packages: results.len(),
            ..RunSummary::default()
        };

        for result in results {
            match result.verdict {
                PolicyVerdict::Approved => summary.approved_count += 1,
                PolicyVerdict::Conditional => summary.conditional_count += 1,
                PolicyVerdict::Forbidden => summary.forbidden_count += 1,
                PolicyVerdict::Unknown => summary.unknown_count += 1,
                PolicyVerdict::Incompatible => summary.incompatible_count += 1,
            }
            match result.risk_level {
                RiskLevel::Critical => summary.risk_breakdown.critical += 1,
                RiskLevel::High => summary.risk_breakdown.high += 1,
                RiskLevel::Medium => summary.risk_breakdown.medium += 1,
                RiskLevel::Low => summary.risk_breakdown.low += 1,
            }
        }

        summary.compliance_score =
            Self::compliance_score(summary.approved_count, summary.total_packages);
        summary
    }
}
