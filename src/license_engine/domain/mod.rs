pub mod change_event;
pub mod evidence;
pub mod expression_error;
pub mod history;
pub mod license_expression;
pub mod package_id;
pub mod policy_check;
pub mod policy_rule_set;
pub mod summary;
pub mod warning;

pub use change_event::{ChangeEvent, ChangeSeverity};
pub use evidence::{
    AnalyzerPackage, CurationSuggestion, CurationTier, DeepScanDetection, EvidenceBundle,
    EvidenceSourceKind, LicenseCandidate, RawDetection,
};
pub use expression_error::ExpressionError;
pub use history::{snapshot_hash, HistoryRecord, LicenseHistory, LicenseSnapshot};
pub use license_expression::{
    LicenseAtom, LicenseExpression, UnknownReason, NOASSERTION, UNVERIFIED_PREFIX,
};
pub use package_id::PackageIdentifier;
pub use policy_check::{CompatibilityIssue, PolicyCheckResult, PolicyVerdict, RiskLevel};
pub use policy_rule_set::{
    CategoryDetails, ChangeSeverityRules, CompatibilityMatrix, CompatibilityRule,
    DualLicenseStrategy, LicenseRule, PolicyPartition, PolicyRuleSet, PolicyRuleSetBuilder,
};
pub use summary::{RiskBreakdown, RunMetadata, RunSummary};
pub use warning::{RunWarning, WarningKind};
