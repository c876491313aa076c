use crate::license_engine::domain::{
    CategoryDetails, ChangeSeverity, ChangeSeverityRules, DualLicenseStrategy, PolicyPartition,
    PolicyRuleSet,
};
use crate::ports::outbound::PolicyReader;
use crate::shared::error::CurationError;
use crate::shared::security::read_regular_file;
use crate::shared::Result;
use serde::Deserialize;
use serde_yaml_ng::{Mapping, Value};
use std::path::Path;

/// YamlPolicyReader adapter for the company license policy
///
/// Reads the `company_license_policy` document and hands every declaration
/// to `PolicyRuleSetBuilder`, which performs the consistency checks.
/// Category order inside a partition follows the document.
pub struct YamlPolicyReader;

impl YamlPolicyReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for YamlPolicyReader {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct PolicyDocument {
    company_license_policy: RawPolicy,
}

#[derive(Debug, Default, Deserialize)]
struct RawPolicy {
    company_name: Option<String>,
    policy_version: Option<Value>,
    #[serde(default)]
    approved_licenses: Mapping,
    #[serde(default)]
    conditional_licenses: Mapping,
    #[serde(default)]
    forbidden_licenses: Mapping,
    #[serde(default)]
    license_compatibility: Vec<Value>,
    #[serde(default)]
    special_rules: RawSpecialRules,
}

#[derive(Debug, Default, Deserialize)]
struct RawCategory {
    #[serde(default)]
    licenses: Vec<String>,
    #[serde(default)]
    approvers: Vec<String>,
    #[serde(default)]
    conditions: Vec<String>,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCompatibility {
    combination: String,
    compatible: bool,
    #[serde(default)]
    reason: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawSpecialRules {
    dual_license_strategy: Option<String>,
    unknown_license_action: Option<String>,
    #[serde(default)]
    manual_review_approvers: Vec<String>,
    #[serde(default)]
    license_change_severity: RawChangeSeverity,
}

/// Unset entries keep the built-in severity.
#[derive(Debug, Default, Deserialize)]
struct RawChangeSeverity {
    permissive_to_copyleft: Option<String>,
    copyleft_to_permissive: Option<String>,
    permissive_to_permissive: Option<String>,
}

impl PolicyReader for YamlPolicyReader {
    fn read_policy(&self, path: &Path) -> Result<PolicyRuleSet> {
        if !path.exists() {
            return Err(CurationError::PolicyFileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = read_regular_file(path, "policy file").map_err(|e| {
            CurationError::FileReadError {
                path: path.to_path_buf(),
                details: e.to_string(),
            }
        })?;

        let configuration_error = |details: String| CurationError::ConfigurationError {
            path: path.to_path_buf(),
            details,
        };

        let document: PolicyDocument = serde_yaml_ng::from_str(&content)
            .map_err(|e| configuration_error(e.to_string()))?;
        let raw = document.company_license_policy;

        let mut builder = PolicyRuleSet::builder().company(
            raw.company_name,
            raw.policy_version.as_ref().and_then(scalar_to_string),
        );

        for (partition, categories) in [
            (PolicyPartition::Approved, &raw.approved_licenses),
            (PolicyPartition::Conditional, &raw.conditional_licenses),
            (PolicyPartition::Forbidden, &raw.forbidden_licenses),
        ] {
            for (name, value) in categories {
                let name = scalar_to_string(name).ok_or_else(|| {
                    configuration_error(format!("{} category name must be a string", partition))
                })?;
                let category: RawCategory = serde_yaml_ng::from_value(value.clone())
                    .map_err(|e| {
                        configuration_error(format!("{} category '{}': {}", partition, name, e))
                    })?;
                builder = builder.category(
                    partition,
                    name,
                    category.licenses,
                    CategoryDetails {
                        approvers: category.approvers,
                        conditions: category.conditions,
                        reason: category.reason,
                    },
                );
            }
        }

        for (index, value) in raw.license_compatibility.into_iter().enumerate() {
            let entry: RawCompatibility = serde_yaml_ng::from_value(value).map_err(|e| {
                CurationError::InvalidCompatibilityEntry {
                    index,
                    details: e.to_string(),
                }
            })?;
            builder = builder.compatibility(entry.combination, entry.compatible, entry.reason);
        }

        let rules = raw.special_rules;
        if let Some(strategy) = rules.dual_license_strategy {
            let strategy: DualLicenseStrategy = strategy.parse().map_err(configuration_error)?;
            builder = builder.dual_license_strategy(strategy);
        }
        if let Some(action) = rules.unknown_license_action {
            builder = builder.unknown_license_action(action);
        }
        builder = builder.manual_review_approvers(rules.manual_review_approvers);

        let mut severities = ChangeSeverityRules::default();
        for (value, slot) in [
            (
                rules.license_change_severity.permissive_to_copyleft,
                &mut severities.permissive_to_copyleft,
            ),
            (
                rules.license_change_severity.copyleft_to_permissive,
                &mut severities.copyleft_to_permissive,
            ),
            (
                rules.license_change_severity.permissive_to_permissive,
                &mut severities.permissive_to_permissive,
            ),
        ] {
            if let Some(value) = value {
                *slot = value.parse::<ChangeSeverity>().map_err(|e| {
                    configuration_error(format!("special_rules.license_change_severity: {}", e))
                })?;
            }
        }
        builder = builder.change_severity(severities);

        let policy = builder.build()?;
        tracing::debug!(
            path = %path.display(),
            licenses = policy.licenses().count(),
            compatibility_entries = policy.compatibility().len(),
            "policy loaded"
        );
        Ok(policy)
    }
}

/// Stringifies YAML scalars so that `policy_version: 1.0` and `"1.0"` read alike
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license_engine::domain::PolicyVerdict;
    use std::fs;
    use tempfile::TempDir;

    const POLICY: &str = r#"
company_license_policy:
  company_name: Example Corp
  policy_version: 1.2
  approved_licenses:
    permissive:
      licenses: [MIT, Apache-2.0, BSD-3-Clause]
      description: Low-risk licenses
  conditional_licenses:
    weak_copyleft:
      licenses: [LGPL-2.1-only, MPL-2.0]
      approvers: [legal-team]
      conditions: [Dynamic linking only]
  forbidden_licenses:
    strong_copyleft:
      licenses: [GPL-3.0-only, AGPL-3.0-only]
      reason: Copyleft obligations
      action: reject
  license_compatibility:
    - combination: "Apache-2.0 AND GPL-2.0-only"
      compatible: false
      reason: Patent clause conflict
  special_rules:
    dual_license_strategy: choose_most_permissive
    unknown_license_action: manual_review
    manual_review_approvers: [legal-team, cto]
"#;

    fn write_policy(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("policy.yml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_full_policy() {
        let dir = TempDir::new().unwrap();
        let path = write_policy(&dir, POLICY);

        let policy = YamlPolicyReader::new().read_policy(&path).unwrap();

        assert_eq!(policy.company_name(), Some("Example Corp"));
        assert_eq!(policy.policy_version(), Some("1.2"));
        assert!(policy.is_approved("MIT"));
        let rule = policy.lookup("MPL-2.0").unwrap();
        assert_eq!(rule.partition.verdict(), PolicyVerdict::Conditional);
        assert_eq!(rule.category, "weak_copyleft");
        assert_eq!(rule.approvers, vec!["legal-team".to_string()]);
        let forbidden = policy.lookup("GPL-3.0-only").unwrap();
        assert_eq!(forbidden.reason.as_deref(), Some("Copyleft obligations"));
        assert!(policy
            .compatibility()
            .lookup("GPL-2.0-only", "Apache-2.0")
            .is_some_and(|rule| !rule.compatible));
        assert_eq!(
            policy.dual_license_strategy(),
            DualLicenseStrategy::ChooseMostPermissive
        );
        assert_eq!(policy.manual_review_approvers().len(), 2);
    }

    #[test]
    fn test_missing_policy_file() {
        let dir = TempDir::new().unwrap();
        let err = YamlPolicyReader::new()
            .read_policy(&dir.path().join("absent.yml"))
            .unwrap_err();
        let err = err.downcast_ref::<CurationError>().unwrap();
        assert!(matches!(err, CurationError::PolicyFileNotFound { .. }));
    }

    #[test]
    fn test_missing_root_key_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        let path = write_policy(&dir, "approved_licenses: {}\n");
        let err = YamlPolicyReader::new().read_policy(&path).unwrap_err();
        let err = err.downcast_ref::<CurationError>().unwrap();
        assert!(matches!(err, CurationError::ConfigurationError { .. }));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_license_in_two_partitions_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_policy(
            &dir,
            r#"
company_license_policy:
  approved_licenses:
    permissive: { licenses: [MIT, LGPL-2.1-only] }
  conditional_licenses:
    weak_copyleft: { licenses: [LGPL-2.1-only] }
"#,
        );
        let err = YamlPolicyReader::new().read_policy(&path).unwrap_err();
        match err.downcast_ref::<CurationError>() {
            Some(CurationError::PartitionConflict { license, .. }) => {
                assert_eq!(license, "LGPL-2.1-only")
            }
            other => panic!("expected PartitionConflict, got {:?}", other),
        }
    }

    #[test]
    fn test_compatibility_entry_without_flag_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_policy(
            &dir,
            r#"
company_license_policy:
  approved_licenses:
    permissive: { licenses: [MIT] }
  license_compatibility:
    - combination: "MIT AND Apache-2.0"
      compatible: true
    - combination: "MIT AND GPL-2.0-only"
"#,
        );
        let err = YamlPolicyReader::new().read_policy(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CurationError>(),
            Some(CurationError::InvalidCompatibilityEntry { index: 1, .. })
        ));
    }

    #[test]
    fn test_unknown_dual_license_strategy_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_policy(
            &dir,
            r#"
company_license_policy:
  approved_licenses:
    permissive: { licenses: [MIT] }
  special_rules:
    dual_license_strategy: coin_flip
"#,
        );
        let err = YamlPolicyReader::new().read_policy(&path).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("coin_flip"));
        assert!(matches!(
            err.downcast_ref::<CurationError>(),
            Some(CurationError::ConfigurationError { .. })
        ));
    }

    #[test]
    fn test_manual_review_strategy() {
        let dir = TempDir::new().unwrap();
        let path = write_policy(
            &dir,
            r#"
company_license_policy:
  approved_licenses:
    permissive: { licenses: [MIT] }
  special_rules:
    dual_license_strategy: manual_review
"#,
        );
        let policy = YamlPolicyReader::new().read_policy(&path).unwrap();
        assert_eq!(policy.dual_license_strategy(), DualLicenseStrategy::ManualReview);
    }

    #[test]
    fn test_change_severity_overrides() {
        let dir = TempDir::new().unwrap();
        let path = write_policy(
            &dir,
            r#"
company_license_policy:
  approved_licenses:
    permissive: { licenses: [MIT] }
  special_rules:
    license_change_severity:
      permissive_to_copyleft: HIGH
      permissive_to_permissive: medium
"#,
        );
        let policy = YamlPolicyReader::new().read_policy(&path).unwrap();
        let severities = policy.change_severity();
        assert_eq!(severities.permissive_to_copyleft, ChangeSeverity::High);
        assert_eq!(severities.copyleft_to_permissive, ChangeSeverity::High);
        assert_eq!(severities.permissive_to_permissive, ChangeSeverity::Medium);
    }

    #[test]
    fn test_invalid_change_severity_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_policy(
            &dir,
            r#"
company_license_policy:
  approved_licenses:
    permissive: { licenses: [MIT] }
  special_rules:
    license_change_severity:
      copyleft_to_permissive: severe
"#,
        );
        let err = YamlPolicyReader::new().read_policy(&path).unwrap_err();
        assert!(err.to_string().contains("severe"));
        assert!(matches!(
            err.downcast_ref::<CurationError>(),
            Some(CurationError::ConfigurationError { .. })
        ));
    }
}
