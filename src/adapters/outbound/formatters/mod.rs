/// Formatter adapters for the run report and the ORT curations file
mod curations_formatter;
mod json_report_formatter;

pub use curations_formatter::CurationsFormatter;
pub use json_report_formatter::JsonReportFormatter;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::application::dto::CurationResponse;
    use crate::license_engine::domain::{
        ChangeEvent, ChangeSeverity, CurationSuggestion, CurationTier, EvidenceSourceKind,
        LicenseExpression, PackageIdentifier, PolicyCheckResult, PolicyVerdict, RunMetadata,
        RunSummary, RunWarning, WarningKind,
    };
    use chrono::{TimeZone, Utc};

    pub fn id(s: &str) -> PackageIdentifier {
        PackageIdentifier::parse(s).unwrap()
    }

    fn result(package: &str, license: &str, verdict: PolicyVerdict) -> PolicyCheckResult {
        PolicyCheckResult {
            id: id(package),
            detected_license: license.to_string(),
            resolved_expression: LicenseExpression::spdx(license),
            verdict,
            risk_level: verdict.risk_level(),
            category: None,
            required_approvers: Vec::new(),
            conditions: Vec::new(),
            reason: String::new(),
            compatibility_issues: Vec::new(),
            alternative_needed: verdict.needs_alternative(),
            expression_error: None,
        }
    }

    fn suggestion(package: &str, license: &str, confidence: u8) -> CurationSuggestion {
        let tier = if confidence >= 70 {
            CurationTier::AutoApply
        } else {
            CurationTier::ManualReview
        };
        CurationSuggestion {
            id: id(package),
            suggested_license: LicenseExpression::spdx(license),
            confidence,
            tier,
            evidence_sources: vec![EvidenceSourceKind::Registry, EvidenceSourceKind::DeepScan],
            candidates: Vec::new(),
            comment: format!("License {} detected from registry, deep_scan.", license),
        }
    }

    /// Two results, one change, one suggestion per tier and one warning
    pub fn sample_response() -> CurationResponse {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        CurationResponse {
            metadata: RunMetadata::new(
                "9b6f3d1e-0000-4000-8000-000000000000".to_string(),
                now.to_rfc3339(),
                "license-curator".to_string(),
                "0.4.0".to_string(),
            ),
            summary: RunSummary {
                total_packages: 2,
                approved_count: 1,
                unknown_count: 1,
                compliance_score: 50,
                ..RunSummary::default()
            },
            results: vec![
                result("PyPI::requests:2.31.0", "Apache-2.0", PolicyVerdict::Approved),
                result("PyPI::mystery:0.1.0", "LicenseRef-unverified-custom", PolicyVerdict::Unknown),
            ],
            changes: vec![ChangeEvent {
                id: id("PyPI::requests:2.31.0"),
                previous_license: Some("MIT".to_string()),
                current_license: "Apache-2.0".to_string(),
                severity: ChangeSeverity::Low,
                is_new: false,
                requires_action: false,
                risk_assessment: "Minor".to_string(),
                recommended_actions: Vec::new(),
                first_seen: now,
                detected_at: now,
            }],
            history_initialized: false,
            critical_change_detected: false,
            suggestions: vec![
                suggestion("PyPI::mystery:0.1.0", "MIT", 100),
                suggestion("PyPI::other:2.0.0", "GPL-2.0-only", 40),
            ],
            warnings: vec![RunWarning::new(WarningKind::MissingEvidenceSource, "registry evidence is empty")
                .from_source("registry.json")],
        }
    }
}
