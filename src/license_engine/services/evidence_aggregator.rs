use super::LicenseClassifier;
use crate::license_engine::domain::{
    CurationSuggestion, CurationTier, EvidenceBundle, EvidenceSourceKind, LicenseCandidate,
    LicenseExpression, PackageIdentifier, PolicyVerdict,
};

/// Confidence at or above which a suggestion is applied without review
pub const AUTO_APPLY_THRESHOLD: u8 = 70;

const ALL_SOURCES_AGREE: u8 = 90;
const TWO_SOURCES_AGREE: u8 = 70;
const SINGLE_SOURCE: u8 = 40;
const NO_SOURCES: u8 = 10;
const APPROVED_BONUS: u8 = 10;
const MAX_CONFIDENCE: u8 = 100;

/// Approved packages are already resolved and forbidden ones need an
/// alternative package, so neither gets a curation.
pub fn needs_curation(verdict: PolicyVerdict) -> bool {
    !matches!(verdict, PolicyVerdict::Approved | PolicyVerdict::Forbidden)
}

/// Fuses independent license claims into one scored curation suggestion.
///
/// Base confidence comes from how many sources agree on the same canonical
/// license; a policy-approved agreement earns a flat bonus. A split with no
/// majority suggests Unknown and always goes to manual review.
pub struct EvidenceAggregator<'a, C: LicenseClassifier> {
    classifier: &'a C,
}

impl<'a, C: LicenseClassifier> EvidenceAggregator<'a, C> {
    pub fn new(classifier: &'a C) -> Self {
        Self { classifier }
    }

    pub fn aggregate(&self, id: &PackageIdentifier, bundle: &EvidenceBundle) -> CurationSuggestion {
        let claims = Self::claims(bundle);
        let candidates = self.rank_candidates(&claims);

        let Some(top) = candidates.first() else {
            return self.suggestion(
                id,
                LicenseExpression::unknown(),
                NO_SOURCES,
                CurationTier::ManualReview,
                Vec::new(),
                candidates,
            );
        };

        let agreeing = top.sources.len();
        let is_split = claims.len() >= 2 && agreeing < 2;
        if is_split {
            return self.suggestion(
                id,
                LicenseExpression::unknown(),
                SINGLE_SOURCE,
                CurationTier::ManualReview,
                Vec::new(),
                candidates,
            );
        }

        let base = match agreeing {
            3.. => ALL_SOURCES_AGREE,
            2 => TWO_SOURCES_AGREE,
            _ => SINGLE_SOURCE,
        };
        let bonus = if top.approved { APPROVED_BONUS } else { 0 };
        let confidence = base.saturating_add(bonus).min(MAX_CONFIDENCE);
        let tier = if confidence >= AUTO_APPLY_THRESHOLD {
            CurationTier::AutoApply
        } else {
            CurationTier::ManualReview
        };

        let suggested = claims
            .iter()
            .find(|(_, expression)| expression.to_string() == top.license)
            .map(|(_, expression)| expression.clone())
            .unwrap_or_else(LicenseExpression::unknown);
        let sources = top.sources.clone();

        self.suggestion(id, suggested, confidence, tier, sources, candidates)
    }

    /// Known licenses claimed by each source; unknown evidence is no evidence.
    fn claims(bundle: &EvidenceBundle) -> Vec<(EvidenceSourceKind, LicenseExpression)> {
        let mut claims = Vec::new();
        if !bundle.policy_license.contains_unknown() {
            claims.push((EvidenceSourceKind::Policy, bundle.policy_license.clone()));
        }
        if let Some(registry) = &bundle.registry_declared {
            if !registry.contains_unknown() {
                claims.push((EvidenceSourceKind::Registry, registry.clone()));
            }
        }
        if let Some(detection) = bundle.best_detection() {
            claims.push((EvidenceSourceKind::DeepScan, detection.license.clone()));
        }
        claims
    }

    /// Groups claims by license: most sources first, then policy-approved,
    /// then the lexicographically smaller id.
    fn rank_candidates(
        &self,
        claims: &[(EvidenceSourceKind, LicenseExpression)],
    ) -> Vec<LicenseCandidate> {
        let mut candidates: Vec<LicenseCandidate> = Vec::new();
        for (source, expression) in claims {
            let license = expression.to_string();
            match candidates.iter_mut().find(|c| c.license == license) {
                Some(candidate) => candidate.sources.push(*source),
                None => candidates.push(LicenseCandidate {
                    approved: self.is_approved(&license),
                    license,
                    sources: vec![*source],
                }),
            }
        }

        candidates.sort_by(|a, b| {
            b.sources
                .len()
                .cmp(&a.sources.len())
                .then_with(|| b.approved.cmp(&a.approved))
                .then_with(|| a.license.cmp(&b.license))
        });
        candidates
    }

    fn is_approved(&self, license: &str) -> bool {
        self.classifier.classify_license(license).verdict == PolicyVerdict::Approved
    }

    fn suggestion(
        &self,
        id: &PackageIdentifier,
        suggested_license: LicenseExpression,
        confidence: u8,
        tier: CurationTier,
        evidence_sources: Vec<EvidenceSourceKind>,
        candidates: Vec<LicenseCandidate>,
    ) -> CurationSuggestion {
        let comment = Self::comment(
            &suggested_license,
            confidence,
            tier,
            &evidence_sources,
            &candidates,
        );
        CurationSuggestion {
            id: id.clone(),
            suggested_license,
            confidence,
            tier,
            evidence_sources,
            candidates,
            comment,
        }
    }

    fn comment(
        suggested: &LicenseExpression,
        confidence: u8,
        tier: CurationTier,
        sources: &[EvidenceSourceKind],
        candidates: &[LicenseCandidate],
    ) -> String {
        if sources.is_empty() {
            return if candidates.is_empty() {
                format!(
                    "No usable license evidence. Confidence: {}%. Requires manual verification.",
                    confidence
                )
            } else {
                let listed: Vec<&str> = candidates.iter().map(|c| c.license.as_str()).collect();
                format!(
                    "Evidence sources disagree ({}). Confidence: {}%. Requires manual verification.",
                    listed.join(" vs "),
                    confidence
                )
            };
        }

        let names: Vec<String> = sources.iter().map(|s| s.to_string()).collect();
        let approved = candidates.first().is_some_and(|c| c.approved);
        let verdict = match (tier, approved) {
            (CurationTier::ManualReview, _) => "Requires manual verification.",
            (CurationTier::AutoApply, true) => "Approved by company policy.",
            (CurationTier::AutoApply, false) => "Check policy compliance before applying.",
        };
        format!(
            "License {} detected from {}. Confidence: {}%. {}",
            suggested,
            names.join(", "),
            confidence,
            verdict
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license_engine::domain::{
        CategoryDetails, DeepScanDetection, PolicyPartition, PolicyRuleSet,
    };
    use crate::license_engine::services::PolicyClassifier;

    fn classifier() -> PolicyClassifier {
        let rules = PolicyRuleSet::builder()
            .category(
                PolicyPartition::Approved,
                "permissive",
                vec!["MIT".to_string(), "Apache-2.0".to_string()],
                CategoryDetails::default(),
            )
            .category(
                PolicyPartition::Conditional,
                "weak_copyleft",
                vec!["MPL-2.0".to_string()],
                CategoryDetails::default(),
            )
            .build()
            .unwrap();
        PolicyClassifier::new(rules)
    }

    fn id() -> PackageIdentifier {
        PackageIdentifier::parse("PyPI::example:1.0.0").unwrap()
    }

    fn scan(license: &str, confidence: u8) -> DeepScanDetection {
        DeepScanDetection {
            license: LicenseExpression::spdx(license),
            confidence,
        }
    }

    #[test]
    fn test_all_sources_agree_on_approved_license() {
        let c = classifier();
        let aggregator = EvidenceAggregator::new(&c);
        let bundle = EvidenceBundle::new(PolicyVerdict::Approved, LicenseExpression::spdx("MIT"))
            .with_registry(Some(LicenseExpression::spdx("MIT")))
            .with_deep_scan(vec![scan("MIT", 95)]);

        let suggestion = aggregator.aggregate(&id(), &bundle);
        assert_eq!(suggestion.confidence, 100);
        assert_eq!(suggestion.tier, CurationTier::AutoApply);
        assert_eq!(suggestion.suggested_license, LicenseExpression::spdx("MIT"));
        assert_eq!(suggestion.evidence_sources.len(), 3);
    }

    #[test]
    fn test_split_evidence_goes_to_manual_review() {
        let c = classifier();
        let aggregator = EvidenceAggregator::new(&c);
        let bundle = EvidenceBundle::new(PolicyVerdict::Unknown, LicenseExpression::unknown())
            .with_registry(Some(LicenseExpression::spdx("MIT")))
            .with_deep_scan(vec![scan("Apache-2.0", 99)]);

        let suggestion = aggregator.aggregate(&id(), &bundle);
        assert_eq!(suggestion.tier, CurationTier::ManualReview);
        assert!(suggestion.suggested_license.is_unknown());
        assert_eq!(suggestion.candidates.len(), 2);
        // equal support and both approved: smaller id first
        assert_eq!(suggestion.candidates[0].license, "Apache-2.0");
        assert!(suggestion.comment.contains("disagree"));
    }

    #[test]
    fn test_split_prefers_approved_candidate_in_listing() {
        let c = classifier();
        let aggregator = EvidenceAggregator::new(&c);
        let bundle = EvidenceBundle::new(PolicyVerdict::Conditional, LicenseExpression::spdx("MPL-2.0"))
            .with_registry(Some(LicenseExpression::spdx("MIT")));

        let suggestion = aggregator.aggregate(&id(), &bundle);
        assert_eq!(suggestion.tier, CurationTier::ManualReview);
        assert_eq!(suggestion.candidates[0].license, "MIT");
        assert!(suggestion.candidates[0].approved);
    }

    #[test]
    fn test_two_sources_agree_with_bonus() {
        let c = classifier();
        let aggregator = EvidenceAggregator::new(&c);
        let bundle = EvidenceBundle::new(PolicyVerdict::Unknown, LicenseExpression::unknown())
            .with_registry(Some(LicenseExpression::spdx("MIT")))
            .with_deep_scan(vec![scan("MIT", 88)]);

        let suggestion = aggregator.aggregate(&id(), &bundle);
        assert_eq!(suggestion.confidence, 80);
        assert_eq!(suggestion.tier, CurationTier::AutoApply);
        assert_eq!(
            suggestion.evidence_sources,
            vec![EvidenceSourceKind::Registry, EvidenceSourceKind::DeepScan]
        );
    }

    #[test]
    fn test_two_sources_agree_without_bonus() {
        let c = classifier();
        let aggregator = EvidenceAggregator::new(&c);
        let bundle = EvidenceBundle::new(PolicyVerdict::Conditional, LicenseExpression::spdx("MPL-2.0"))
            .with_deep_scan(vec![scan("MPL-2.0", 90)]);

        let suggestion = aggregator.aggregate(&id(), &bundle);
        assert_eq!(suggestion.confidence, 70);
        assert_eq!(suggestion.tier, CurationTier::AutoApply);
        assert!(suggestion.comment.contains("Check policy compliance"));
    }

    #[test]
    fn test_majority_of_three() {
        let c = classifier();
        let aggregator = EvidenceAggregator::new(&c);
        let bundle = EvidenceBundle::new(PolicyVerdict::Conditional, LicenseExpression::spdx("MPL-2.0"))
            .with_registry(Some(LicenseExpression::spdx("MIT")))
            .with_deep_scan(vec![scan("MIT", 90)]);

        let suggestion = aggregator.aggregate(&id(), &bundle);
        assert_eq!(suggestion.suggested_license, LicenseExpression::spdx("MIT"));
        assert_eq!(suggestion.confidence, 80);
    }

    #[test]
    fn test_single_source() {
        let c = classifier();
        let aggregator = EvidenceAggregator::new(&c);
        let bundle = EvidenceBundle::new(PolicyVerdict::Unknown, LicenseExpression::unknown())
            .with_registry(Some(LicenseExpression::spdx("MIT")));

        let suggestion = aggregator.aggregate(&id(), &bundle);
        assert_eq!(suggestion.confidence, 50);
        assert_eq!(suggestion.tier, CurationTier::ManualReview);
    }

    #[test]
    fn test_no_sources() {
        let c = classifier();
        let aggregator = EvidenceAggregator::new(&c);
        let bundle = EvidenceBundle::new(PolicyVerdict::Unknown, LicenseExpression::unknown());

        let suggestion = aggregator.aggregate(&id(), &bundle);
        assert_eq!(suggestion.confidence, 10);
        assert!(suggestion.suggested_license.is_unknown());
        assert_eq!(suggestion.tier, CurationTier::ManualReview);
        assert!(suggestion.candidates.is_empty());
    }

    #[test]
    fn test_best_scan_detection_is_used() {
        let c = classifier();
        let aggregator = EvidenceAggregator::new(&c);
        let bundle = EvidenceBundle::new(PolicyVerdict::Unknown, LicenseExpression::unknown())
            .with_registry(Some(LicenseExpression::spdx("MIT")))
            .with_deep_scan(vec![scan("Apache-2.0", 81), scan("MIT", 97)]);

        let suggestion = aggregator.aggregate(&id(), &bundle);
        assert_eq!(suggestion.suggested_license, LicenseExpression::spdx("MIT"));
        assert_eq!(suggestion.confidence, 80);
    }

    #[test]
    fn test_needs_curation() {
        assert!(!needs_curation(PolicyVerdict::Approved));
        assert!(!needs_curation(PolicyVerdict::Forbidden));
        assert!(needs_curation(PolicyVerdict::Unknown));
        assert!(needs_curation(PolicyVerdict::Conditional));
        assert!(needs_curation(PolicyVerdict::Incompatible));
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let c = classifier();
        let aggregator = EvidenceAggregator::new(&c);
        let bundle = EvidenceBundle::new(PolicyVerdict::Unknown, LicenseExpression::unknown())
            .with_registry(Some(LicenseExpression::spdx("Apache-2.0")))
            .with_deep_scan(vec![scan("MIT", 90)]);
        assert_eq!(
            aggregator.aggregate(&id(), &bundle),
            aggregator.aggregate(&id(), &bundle)
        );
    }
}
