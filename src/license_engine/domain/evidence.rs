use super::{LicenseExpression, PackageIdentifier, PolicyVerdict, NOASSERTION};
use serde::Serialize;
use std::fmt;

/// Package as reported by the primary dependency analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerPackage {
    pub id: PackageIdentifier,
    /// Declared license text, `NOASSERTION` when nothing was declared
    pub declared_license: String,
    /// License concluded by a previous curation, if any
    pub concluded_license: Option<String>,
}

impl AnalyzerPackage {
    pub fn new(
        id: PackageIdentifier,
        declared_license: impl Into<String>,
        concluded_license: Option<String>,
    ) -> Self {
        Self {
            id,
            declared_license: declared_license.into(),
            concluded_license,
        }
    }

    /// The raw license that gets classified: a concluded license overrides
    /// the declared one unless it is itself a placeholder.
    pub fn effective_license(&self) -> &str {
        match self.concluded_license.as_deref() {
            Some(concluded)
                if !concluded.trim().is_empty() && !concluded.trim().eq_ignore_ascii_case(NOASSERTION) =>
            {
                concluded
            }
            _ => &self.declared_license,
        }
    }
}

/// Raw detection from a source-level scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDetection {
    pub license: String,
    /// Match score in `[0, 100]`
    pub score: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceSourceKind {
    /// License as resolved for policy classification
    Policy,
    /// License declared in the package registry
    Registry,
    /// Highest-confidence source scan detection
    DeepScan,
}

impl fmt::Display for EvidenceSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvidenceSourceKind::Policy => write!(f, "policy"),
            EvidenceSourceKind::Registry => write!(f, "registry"),
            EvidenceSourceKind::DeepScan => write!(f, "deep_scan"),
        }
    }
}

/// Canonicalized scanner detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepScanDetection {
    pub license: LicenseExpression,
    pub confidence: u8,
}

/// Independently sourced license claims for one package.
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceBundle {
    pub policy_verdict: PolicyVerdict,
    pub policy_license: LicenseExpression,
    pub registry_declared: Option<LicenseExpression>,
    pub deep_scan: Vec<DeepScanDetection>,
}

impl EvidenceBundle {
    pub fn new(policy_verdict: PolicyVerdict, policy_license: LicenseExpression) -> Self {
        Self {
            policy_verdict,
            policy_license,
            registry_declared: None,
            deep_scan: Vec::new(),
        }
    }

    pub fn with_registry(mut self, license: Option<LicenseExpression>) -> Self {
        self.registry_declared = license;
        self
    }

    pub fn with_deep_scan(mut self, detections: Vec<DeepScanDetection>) -> Self {
        self.deep_scan = detections;
        self
    }

    /// Highest-confidence detection; ties go to the smaller license id.
    pub fn best_detection(&self) -> Option<&DeepScanDetection> {
        self.deep_scan
            .iter()
            .filter(|d| !d.license.contains_unknown())
            .min_by(|a, b| {
                b.confidence
                    .cmp(&a.confidence)
                    .then_with(|| a.license.to_string().cmp(&b.license.to_string()))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CurationTier {
    AutoApply,
    ManualReview,
}

impl fmt::Display for CurationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurationTier::AutoApply => write!(f, "auto_apply"),
            CurationTier::ManualReview => write!(f, "manual_review"),
        }
    }
}

/// A license some evidence sources agree on, listed for reviewers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseCandidate {
    pub license: String,
    pub sources: Vec<EvidenceSourceKind>,
    pub approved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurationSuggestion {
    pub id: PackageIdentifier,
    pub suggested_license: LicenseExpression,
    pub confidence: u8,
    pub tier: CurationTier,
    /// Sources backing the suggested license
    pub evidence_sources: Vec<EvidenceSourceKind>,
    pub candidates: Vec<LicenseCandidate>,
    pub comment: String,
}

impl CurationSuggestion {
    pub fn is_auto_apply(&self) -> bool {
        self.tier == CurationTier::AutoApply
    }
}
