pub mod caching_classifier;
pub mod change_detector;
pub mod compliance_scorer;
pub mod evidence_aggregator;
pub mod expression_resolver;
pub mod policy_classifier;

pub use caching_classifier::CachingPolicyClassifier;
pub use change_detector::{ChangeDetection, ChangeDetector, ObservedLicense, ANALYZER_SOURCE};
pub use compliance_scorer::ComplianceScorer;
pub use evidence_aggregator::{needs_curation, EvidenceAggregator, AUTO_APPLY_THRESHOLD};
pub use expression_resolver::ExpressionResolver;
pub use policy_classifier::{Classification, LicenseClassifier, PolicyClassifier};
