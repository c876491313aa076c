use super::license_expression::{LicenseAtom, NOASSERTION};
use super::{ChangeSeverity, PolicyVerdict};
use crate::shared::error::CurationError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// One of the three disjoint license partitions of a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyPartition {
    Approved,
    Conditional,
    Forbidden,
}

impl PolicyPartition {
    pub fn verdict(self) -> PolicyVerdict {
        match self {
            PolicyPartition::Approved => PolicyVerdict::Approved,
            PolicyPartition::Conditional => PolicyVerdict::Conditional,
            PolicyPartition::Forbidden => PolicyVerdict::Forbidden,
        }
    }
}

impl fmt::Display for PolicyPartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyPartition::Approved => write!(f, "approved"),
            PolicyPartition::Conditional => write!(f, "conditional"),
            PolicyPartition::Forbidden => write!(f, "forbidden"),
        }
    }
}

/// How a pure `OR` (dual license) expression is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DualLicenseStrategy {
    /// Pick the most permissive option, first in declaration order on ties
    #[default]
    ChooseMostPermissive,
    /// Always Conditional so that a human picks the license
    ManualReview,
}

impl FromStr for DualLicenseStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "choose_most_permissive" => Ok(DualLicenseStrategy::ChooseMostPermissive),
            "manual_review" => Ok(DualLicenseStrategy::ManualReview),
            other => Err(format!(
                "Unknown dual_license_strategy '{}'. Expected 'choose_most_permissive' or 'manual_review'",
                other
            )),
        }
    }
}

/// Severities for the license change classes a policy may regrade.
///
/// Other change classes (version bumps, fallback) are always Medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeSeverityRules {
    pub permissive_to_copyleft: ChangeSeverity,
    pub copyleft_to_permissive: ChangeSeverity,
    pub permissive_to_permissive: ChangeSeverity,
}

impl Default for ChangeSeverityRules {
    fn default() -> Self {
        Self {
            permissive_to_copyleft: ChangeSeverity::Critical,
            copyleft_to_permissive: ChangeSeverity::High,
            permissive_to_permissive: ChangeSeverity::Low,
        }
    }
}

/// Optional metadata attached to a policy category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDetails {
    pub approvers: Vec<String>,
    pub conditions: Vec<String>,
    pub reason: Option<String>,
}

/// What the policy says about one license.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseRule {
    pub partition: PolicyPartition,
    pub category: String,
    pub approvers: Vec<String>,
    pub conditions: Vec<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityRule {
    pub compatible: bool,
    pub reason: String,
}

/// Unordered license pair → compatibility. Pairs not listed are compatible.
#[derive(Debug, Clone, Default)]
pub struct CompatibilityMatrix {
    entries: HashMap<(String, String), CompatibilityRule>,
}

impl CompatibilityMatrix {
    fn key(a: &str, b: &str) -> (String, String) {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }

    pub fn lookup(&self, a: &str, b: &str) -> Option<&CompatibilityRule> {
        self.entries.get(&Self::key(a, b))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Strongly typed, validated license policy.
///
/// Only constructible through [`PolicyRuleSetBuilder::build`], which rejects
/// overlapping partitions and malformed compatibility entries.
#[derive(Debug, Clone)]
pub struct PolicyRuleSet {
    company_name: Option<String>,
    policy_version: Option<String>,
    rules: BTreeMap<String, LicenseRule>,
    compatibility: CompatibilityMatrix,
    dual_license_strategy: DualLicenseStrategy,
    manual_review_approvers: Vec<String>,
    unknown_license_action: String,
    change_severity: ChangeSeverityRules,
}

impl PolicyRuleSet {
    pub fn builder() -> PolicyRuleSetBuilder {
        PolicyRuleSetBuilder::default()
    }

    /// Looks up a canonical license id (or a full `X WITH Y` string).
    pub fn lookup(&self, license: &str) -> Option<&LicenseRule> {
        self.rules.get(license)
    }

    /// Unknown atoms never match any partition.
    pub fn lookup_atom(&self, atom: &LicenseAtom) -> Option<&LicenseRule> {
        if atom.is_unknown() {
            return None;
        }
        self.lookup(&atom.id())
    }

    pub fn is_approved(&self, license: &str) -> bool {
        matches!(
            self.lookup(license),
            Some(rule) if rule.partition == PolicyPartition::Approved
        )
    }

    /// Every license named in any partition, in sorted order.
    pub fn licenses(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn compatibility(&self) -> &CompatibilityMatrix {
        &self.compatibility
    }

    pub fn dual_license_strategy(&self) -> DualLicenseStrategy {
        self.dual_license_strategy
    }

    pub fn manual_review_approvers(&self) -> &[String] {
        &self.manual_review_approvers
    }

    pub fn unknown_license_action(&self) -> &str {
        &self.unknown_license_action
    }

    pub fn change_severity(&self) -> ChangeSeverityRules {
        self.change_severity
    }

    pub fn company_name(&self) -> Option<&str> {
        self.company_name.as_deref()
    }

    pub fn policy_version(&self) -> Option<&str> {
        self.policy_version.as_deref()
    }
}

struct CategoryDeclaration {
    partition: PolicyPartition,
    name: String,
    licenses: Vec<String>,
    details: CategoryDetails,
}

struct CompatibilityDeclaration {
    combination: String,
    compatible: bool,
    reason: String,
}

/// Collects raw policy declarations; all validation happens in [`build`](Self::build).
#[derive(Default)]
pub struct PolicyRuleSetBuilder {
    company_name: Option<String>,
    policy_version: Option<String>,
    categories: Vec<CategoryDeclaration>,
    compatibility: Vec<CompatibilityDeclaration>,
    dual_license_strategy: DualLicenseStrategy,
    manual_review_approvers: Vec<String>,
    unknown_license_action: Option<String>,
    change_severity: ChangeSeverityRules,
}

impl PolicyRuleSetBuilder {
    pub fn company(mut self, name: Option<String>, version: Option<String>) -> Self {
        self.company_name = name;
        self.policy_version = version;
        self
    }

    pub fn category(
        mut self,
        partition: PolicyPartition,
        name: impl Into<String>,
        licenses: Vec<String>,
        details: CategoryDetails,
    ) -> Self {
        self.categories.push(CategoryDeclaration {
            partition,
            name: name.into(),
            licenses,
            details,
        });
        self
    }

    pub fn compatibility(
        mut self,
        combination: impl Into<String>,
        compatible: bool,
        reason: impl Into<String>,
    ) -> Self {
        self.compatibility.push(CompatibilityDeclaration {
            combination: combination.into(),
            compatible,
            reason: reason.into(),
        });
        self
    }

    pub fn dual_license_strategy(mut self, strategy: DualLicenseStrategy) -> Self {
        self.dual_license_strategy = strategy;
        self
    }

    pub fn manual_review_approvers(mut self, approvers: Vec<String>) -> Self {
        self.manual_review_approvers = approvers;
        self
    }

    pub fn unknown_license_action(mut self, action: impl Into<String>) -> Self {
        self.unknown_license_action = Some(action.into());
        self
    }

    pub fn change_severity(mut self, rules: ChangeSeverityRules) -> Self {
        self.change_severity = rules;
        self
    }

    pub fn build(self) -> Result<PolicyRuleSet, CurationError> {
        let mut rules: BTreeMap<String, LicenseRule> = BTreeMap::new();
        // lowercase id → spelling stored in `rules`
        let mut spellings: HashMap<String, String> = HashMap::new();

        for declaration in self.categories {
            for license in declaration.licenses {
                let license = license.trim().to_string();
                if license.is_empty() {
                    return Err(CurationError::InvalidPolicy {
                        details: format!(
                            "empty license id in {} category '{}'",
                            declaration.partition, declaration.name
                        ),
                    });
                }
                if is_placeholder(&license) {
                    return Err(CurationError::InvalidPolicy {
                        details: format!(
                            "'{}' in {} category '{}' is an unknown-license placeholder and cannot be classified",
                            license, declaration.partition, declaration.name
                        ),
                    });
                }

                let existing = spellings
                    .get(&license.to_lowercase())
                    .and_then(|stored| rules.get(stored));
                match existing {
                    Some(existing) if existing.partition != declaration.partition => {
                        return Err(CurationError::PartitionConflict {
                            license,
                            first: existing.partition.to_string(),
                            second: declaration.partition.to_string(),
                        });
                    }
                    // Same partition listed twice, in any casing: first spelling wins
                    Some(_) => {}
                    None => {
                        spellings.insert(license.to_lowercase(), license.clone());
                        rules.insert(
                            license,
                            LicenseRule {
                                partition: declaration.partition,
                                category: declaration.name.clone(),
                                approvers: declaration.details.approvers.clone(),
                                conditions: declaration.details.conditions.clone(),
                                reason: declaration.details.reason.clone(),
                            },
                        );
                    }
                }
            }
        }

        let mut matrix = CompatibilityMatrix::default();
        for (index, declaration) in self.compatibility.into_iter().enumerate() {
            let (first, second) = parse_combination(&declaration.combination)
                .map_err(|details| CurationError::InvalidCompatibilityEntry { index, details })?;

            let key = CompatibilityMatrix::key(&first, &second);
            if let Some(existing) = matrix.entries.get(&key) {
                if existing.compatible != declaration.compatible {
                    return Err(CurationError::InvalidCompatibilityEntry {
                        index,
                        details: format!(
                            "'{} AND {}' conflicts with an earlier entry for the same pair",
                            first, second
                        ),
                    });
                }
                continue;
            }
            matrix.entries.insert(
                key,
                CompatibilityRule {
                    compatible: declaration.compatible,
                    reason: declaration.reason,
                },
            );
        }

        Ok(PolicyRuleSet {
            company_name: self.company_name,
            policy_version: self.policy_version,
            rules,
            compatibility: matrix,
            dual_license_strategy: self.dual_license_strategy,
            manual_review_approvers: self.manual_review_approvers,
            unknown_license_action: self
                .unknown_license_action
                .unwrap_or_else(|| "manual_review".to_string()),
            change_severity: self.change_severity,
        })
    }
}

fn is_placeholder(license: &str) -> bool {
    [NOASSERTION, "UNKNOWN", "NONE"]
        .iter()
        .any(|p| license.eq_ignore_ascii_case(p))
}

/// Splits `"A AND B"` into its two distinct, non-empty license ids.
fn parse_combination(combination: &str) -> Result<(String, String), String> {
    let parts: Vec<&str> = combination.split(" AND ").map(str::trim).collect();
    if parts.len() != 2 {
        return Err(format!(
            "'{}' must name exactly two licenses joined by AND",
            combination
        ));
    }
    let (first, second) = (parts[0], parts[1]);
    if first.is_empty() || second.is_empty() {
        return Err(format!("'{}' has an empty license operand", combination));
    }
    if first.contains(char::is_whitespace) || second.contains(char::is_whitespace) {
        return Err(format!(
            "'{}' operands must be single license ids",
            combination
        ));
    }
    if first == second {
        return Err(format!(
            "'{}' pairs a license with itself",
            combination
        ));
    }
    Ok((first.to_string(), second.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn licenses(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_build_and_lookup() {
        let rules = PolicyRuleSet::builder()
            .category(
                PolicyPartition::Approved,
                "permissive",
                licenses(&["MIT", "Apache-2.0"]),
                CategoryDetails::default(),
            )
            .category(
                PolicyPartition::Conditional,
                "weak_copyleft",
                licenses(&["LGPL-2.1-only"]),
                CategoryDetails {
                    approvers: vec!["legal".to_string()],
                    ..Default::default()
                },
            )
            .build()
            .unwrap();

        assert_eq!(
            rules.lookup("MIT").unwrap().partition,
            PolicyPartition::Approved
        );
        let lgpl = rules.lookup("LGPL-2.1-only").unwrap();
        assert_eq!(lgpl.category, "weak_copyleft");
        assert_eq!(lgpl.approvers, vec!["legal".to_string()]);
        assert!(rules.lookup("GPL-3.0-only").is_none());
        assert!(rules.is_approved("Apache-2.0"));
    }

    #[test]
    fn test_partition_overlap_is_rejected() {
        let result = PolicyRuleSet::builder()
            .category(
                PolicyPartition::Approved,
                "permissive",
                licenses(&["MIT", "MPL-2.0"]),
                CategoryDetails::default(),
            )
            .category(
                PolicyPartition::Conditional,
                "weak_copyleft",
                licenses(&["MPL-2.0"]),
                CategoryDetails::default(),
            )
            .build();

        match result {
            Err(CurationError::PartitionConflict {
                license,
                first,
                second,
            }) => {
                assert_eq!(license, "MPL-2.0");
                assert_eq!(first, "approved");
                assert_eq!(second, "conditional");
            }
            other => panic!("expected PartitionConflict, got {:?}", other),
        }
    }

    #[test]
    fn test_same_partition_duplicate_is_tolerated() {
        let rules = PolicyRuleSet::builder()
            .category(
                PolicyPartition::Approved,
                "permissive",
                licenses(&["MIT"]),
                CategoryDetails::default(),
            )
            .category(
                PolicyPartition::Approved,
                "public_domain_like",
                licenses(&["MIT"]),
                CategoryDetails::default(),
            )
            .build()
            .unwrap();
        assert_eq!(rules.lookup("MIT").unwrap().category, "permissive");
    }

    #[test]
    fn test_partition_overlap_ignores_case() {
        let result = PolicyRuleSet::builder()
            .category(
                PolicyPartition::Approved,
                "permissive",
                licenses(&["mit"]),
                CategoryDetails::default(),
            )
            .category(
                PolicyPartition::Forbidden,
                "banned",
                licenses(&["MIT"]),
                CategoryDetails::default(),
            )
            .build();

        match result {
            Err(CurationError::PartitionConflict {
                license,
                first,
                second,
            }) => {
                assert_eq!(license, "MIT");
                assert_eq!(first, "approved");
                assert_eq!(second, "forbidden");
            }
            other => panic!("expected PartitionConflict, got {:?}", other),
        }
    }

    #[test]
    fn test_same_partition_case_variants_keep_first_spelling() {
        let rules = PolicyRuleSet::builder()
            .category(
                PolicyPartition::Approved,
                "permissive",
                licenses(&["Apache-2.0", "apache-2.0", "MIT"]),
                CategoryDetails::default(),
            )
            .build()
            .unwrap();
        assert_eq!(rules.licenses().collect::<Vec<_>>(), vec!["Apache-2.0", "MIT"]);
        assert!(rules.lookup("apache-2.0").is_none());
    }

    #[test]
    fn test_placeholder_license_is_rejected() {
        let result = PolicyRuleSet::builder()
            .category(
                PolicyPartition::Conditional,
                "unknown",
                licenses(&["NOASSERTION"]),
                CategoryDetails::default(),
            )
            .build();
        assert!(matches!(result, Err(CurationError::InvalidPolicy { .. })));
    }

    #[test]
    fn test_unknown_atom_never_matches() {
        let rules = PolicyRuleSet::builder()
            .category(
                PolicyPartition::Approved,
                "permissive",
                licenses(&["MIT"]),
                CategoryDetails::default(),
            )
            .build()
            .unwrap();
        assert!(rules.lookup_atom(&LicenseAtom::no_assertion()).is_none());
        assert!(rules.lookup_atom(&LicenseAtom::spdx("MIT")).is_some());
    }

    #[test]
    fn test_compatibility_lookup_is_order_insensitive() {
        let rules = PolicyRuleSet::builder()
            .compatibility("Apache-2.0 AND GPL-2.0-only", false, "patent clause")
            .build()
            .unwrap();

        let rule = rules
            .compatibility()
            .lookup("GPL-2.0-only", "Apache-2.0")
            .unwrap();
        assert!(!rule.compatible);
        assert_eq!(rule.reason, "patent clause");
        assert!(rules.compatibility().lookup("MIT", "Apache-2.0").is_none());
    }

    #[test]
    fn test_malformed_compatibility_entries() {
        for combination in [
            "Apache-2.0",
            "A AND B AND C",
            "Apache-2.0 AND ",
            "MIT AND MIT",
            "Apache License AND MIT",
        ] {
            let result = PolicyRuleSet::builder()
                .compatibility(combination, false, "")
                .build();
            assert!(
                matches!(
                    result,
                    Err(CurationError::InvalidCompatibilityEntry { index: 0, .. })
                ),
                "combination '{}' should be rejected",
                combination
            );
        }
    }

    #[test]
    fn test_conflicting_compatibility_entries() {
        let result = PolicyRuleSet::builder()
            .compatibility("Apache-2.0 AND GPL-2.0-only", false, "")
            .compatibility("GPL-2.0-only AND Apache-2.0", true, "")
            .build();
        assert!(matches!(
            result,
            Err(CurationError::InvalidCompatibilityEntry { index: 1, .. })
        ));
    }

    #[test]
    fn test_dual_license_strategy_from_str() {
        assert_eq!(
            "choose_most_permissive".parse::<DualLicenseStrategy>().unwrap(),
            DualLicenseStrategy::ChooseMostPermissive
        );
        assert_eq!(
            "MANUAL_REVIEW".parse::<DualLicenseStrategy>().unwrap(),
            DualLicenseStrategy::ManualReview
        );
        assert!("coin_flip".parse::<DualLicenseStrategy>().is_err());
    }

    #[test]
    fn test_defaults() {
        let rules = PolicyRuleSet::builder().build().unwrap();
        assert_eq!(
            rules.dual_license_strategy(),
            DualLicenseStrategy::ChooseMostPermissive
        );
        assert_eq!(rules.unknown_license_action(), "manual_review");
        assert!(rules.compatibility().is_empty());
        assert_eq!(
            rules.change_severity().permissive_to_copyleft,
            ChangeSeverity::Critical
        );
    }
}
