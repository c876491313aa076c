use super::{LicenseExpression, PackageIdentifier};
use serde::Serialize;
use std::fmt;

/// Policy verdict for one package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyVerdict {
    Approved,
    Conditional,
    Forbidden,
    Unknown,
    /// An `AND` combination contains a pair marked incompatible; stronger than Forbidden
    Incompatible,
}

impl PolicyVerdict {
    /// Fixed verdict → risk mapping.
    pub fn risk_level(self) -> RiskLevel {
        match self {
            PolicyVerdict::Forbidden | PolicyVerdict::Incompatible => RiskLevel::Critical,
            PolicyVerdict::Unknown => RiskLevel::High,
            PolicyVerdict::Conditional => RiskLevel::Medium,
            PolicyVerdict::Approved => RiskLevel::Low,
        }
    }

    /// Preference order when choosing among dual-license options
    /// (lower is more permissive).
    pub(crate) fn permissiveness_rank(self) -> u8 {
        match self {
            PolicyVerdict::Approved => 0,
            PolicyVerdict::Conditional => 1,
            PolicyVerdict::Unknown => 2,
            PolicyVerdict::Forbidden => 3,
            PolicyVerdict::Incompatible => 4,
        }
    }

    /// Forbidden or incompatible packages need a replacement, not a curation.
    pub fn needs_alternative(self) -> bool {
        matches!(self, PolicyVerdict::Forbidden | PolicyVerdict::Incompatible)
    }
}

impl fmt::Display for PolicyVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyVerdict::Approved => write!(f, "approved"),
            PolicyVerdict::Conditional => write!(f, "conditional"),
            PolicyVerdict::Forbidden => write!(f, "forbidden"),
            PolicyVerdict::Unknown => write!(f, "unknown"),
            PolicyVerdict::Incompatible => write!(f, "incompatible"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
            RiskLevel::Critical => write!(f, "critical"),
        }
    }
}

/// A pair of licenses in an `AND` expression that the compatibility matrix rejects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityIssue {
    pub first: String,
    pub second: String,
    pub reason: String,
}

/// Per-package outcome of the policy classifier. Derived state, rebuilt every run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyCheckResult {
    pub id: PackageIdentifier,
    /// License string exactly as the analyzer reported it
    pub detected_license: String,
    /// Canonical expression after alias resolution and dual-license choice
    pub resolved_expression: LicenseExpression,
    pub verdict: PolicyVerdict,
    pub risk_level: RiskLevel,
    pub category: Option<String>,
    pub required_approvers: Vec<String>,
    pub conditions: Vec<String>,
    pub reason: String,
    pub compatibility_issues: Vec<CompatibilityIssue>,
    pub alternative_needed: bool,
    /// Set when the raw license could not be parsed (ambiguous or malformed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_error: Option<String>,
}
