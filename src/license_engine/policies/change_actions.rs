use crate::license_engine::domain::ChangeSeverity;

/// Fixed follow-up guidance per change severity.
pub struct ChangeActions;

const CRITICAL_ACTIONS: &[&str] = &[
    "⛔ Immediate action required",
    "Stop shipping this package version",
    "Review the legal implications with the compliance team",
    "Revert to the previous version or replace the package",
    "Pin the dependency to a version with the previous license",
];

const HIGH_ACTIONS: &[&str] = &[
    "⚠️ Urgent review required",
    "Confirm the change is intentional and not a metadata error",
    "Check announcements from the package maintainers",
    "Review the new license terms for compatibility",
];

const MEDIUM_ACTIONS: &[&str] = &[
    "📋 Review recommended",
    "Read the new license terms",
    "Check the new license against company policy",
    "Update internal license documentation",
];

const LOW_ACTIONS: &[&str] = &[
    "ℹ️ Awareness only",
    "Record the change in license documentation",
];

const NEW_PACKAGE_ACTIONS: &[&str] = &["Package is tracked for the first time"];

const VERIFICATION_ACTIONS: &[&str] = &[
    "Verify the license in the package registry",
    "Check the upstream repository for LICENSE file changes",
];

impl ChangeActions {
    pub fn recommended_actions(severity: ChangeSeverity) -> Vec<String> {
        let actions = match severity {
            ChangeSeverity::Critical => CRITICAL_ACTIONS,
            ChangeSeverity::High => HIGH_ACTIONS,
            ChangeSeverity::Medium => MEDIUM_ACTIONS,
            ChangeSeverity::Low => LOW_ACTIONS,
            ChangeSeverity::None => return Self::to_owned(NEW_PACKAGE_ACTIONS),
        };
        let mut owned = Self::to_owned(actions);
        owned.extend(Self::to_owned(VERIFICATION_ACTIONS));
        owned
    }

    pub fn risk_assessment(severity: ChangeSeverity) -> &'static str {
        match severity {
            ChangeSeverity::Critical => {
                "Critical risk: the license became copyleft and may require releasing derivative works"
            }
            ChangeSeverity::High => {
                "High risk: unusual relaxation of the license, verify the maintainers' intent"
            }
            ChangeSeverity::Medium => "Medium risk: license terms changed, review the new terms",
            ChangeSeverity::Low => "Low risk: change between permissive licenses",
            ChangeSeverity::None => "No risk assessment: package seen for the first time",
        }
    }

    fn to_owned(actions: &[&str]) -> Vec<String> {
        actions.iter().map(|a| a.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_critical_actions_include_verification() {
        let actions = ChangeActions::recommended_actions(ChangeSeverity::Critical);
        assert!(actions[0].contains("Immediate action"));
        assert!(actions
            .iter()
            .any(|a| a.contains("package registry")));
    }

    #[test]
    fn test_new_package_actions() {
        let actions = ChangeActions::recommended_actions(ChangeSeverity::None);
        assert_eq!(actions.len(), 1);
    }

    #[test]
    fn test_table_is_static() {
        assert_eq!(
            ChangeActions::recommended_actions(ChangeSeverity::Medium),
            ChangeActions::recommended_actions(ChangeSeverity::Medium)
        );
        assert!(ChangeActions::risk_assessment(ChangeSeverity::Low).starts_with("Low risk"));
    }
}
