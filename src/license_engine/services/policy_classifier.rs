use super::ExpressionResolver;
use crate::license_engine::domain::{
    ChangeSeverityRules, CompatibilityIssue, DualLicenseStrategy, ExpressionError, LicenseAtom, LicenseExpression,
    LicenseRule, PackageIdentifier, PolicyCheckResult, PolicyPartition, PolicyRuleSet,
    PolicyVerdict,
};

/// Outcome of classifying one license string, independent of any package.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub resolved_expression: LicenseExpression,
    pub verdict: PolicyVerdict,
    pub category: Option<String>,
    pub required_approvers: Vec<String>,
    pub conditions: Vec<String>,
    pub reason: String,
    pub compatibility_issues: Vec<CompatibilityIssue>,
    pub expression_error: Option<ExpressionError>,
}

impl Classification {
    fn unknown(expression: LicenseExpression, reason: String, approvers: &[String]) -> Self {
        Self {
            resolved_expression: expression,
            verdict: PolicyVerdict::Unknown,
            category: None,
            required_approvers: approvers.to_vec(),
            conditions: Vec::new(),
            reason,
            compatibility_issues: Vec::new(),
            expression_error: None,
        }
    }

    fn from_rule(expression: LicenseExpression, rule: &LicenseRule) -> Self {
        let reason = rule.reason.clone().unwrap_or_else(|| match rule.partition {
            PolicyPartition::Approved => format!(
                "{} is approved under policy category '{}'",
                expression, rule.category
            ),
            PolicyPartition::Conditional => format!(
                "{} is conditionally allowed under policy category '{}' and needs approval",
                expression, rule.category
            ),
            PolicyPartition::Forbidden => format!(
                "{} is forbidden by policy category '{}'",
                expression, rule.category
            ),
        });

        Self {
            resolved_expression: expression,
            verdict: rule.partition.verdict(),
            category: Some(rule.category.clone()),
            required_approvers: rule.approvers.clone(),
            conditions: rule.conditions.clone(),
            reason,
            compatibility_issues: Vec::new(),
            expression_error: None,
        }
    }

    /// Attaches package identity to produce the per-package result.
    pub fn into_check_result(self, id: PackageIdentifier, detected_license: &str) -> PolicyCheckResult {
        PolicyCheckResult {
            id,
            detected_license: detected_license.to_string(),
            risk_level: self.verdict.risk_level(),
            alternative_needed: self.verdict.needs_alternative(),
            resolved_expression: self.resolved_expression,
            verdict: self.verdict,
            category: self.category,
            required_approvers: self.required_approvers,
            conditions: self.conditions,
            reason: self.reason,
            compatibility_issues: self.compatibility_issues,
            expression_error: self.expression_error.map(|e| e.to_string()),
        }
    }
}

/// Classifies raw license strings against a policy.
///
/// Implementations must be pure: the same input always yields the same
/// [`Classification`]. `Send + Sync` so one instance can serve the
/// per-package fan-out.
pub trait LicenseClassifier: Send + Sync {
    fn classify_license(&self, raw_license: &str) -> Classification;

    /// Resolver configured with the policy's license ids.
    fn resolver(&self) -> &ExpressionResolver;

    /// Severities the policy assigns to license change classes.
    fn change_severity(&self) -> ChangeSeverityRules {
        ChangeSeverityRules::default()
    }

    fn check_package(&self, id: &PackageIdentifier, raw_license: &str) -> PolicyCheckResult {
        self.classify_license(raw_license)
            .into_check_result(id.clone(), raw_license)
    }
}

/// Decision tree over expression shape:
///
/// * atom: partition lookup, absent or unknown → Unknown
/// * `X WITH Y`: the full string first, then `X`
/// * `OR`: the configured dual-license strategy
/// * `AND`: compatibility matrix first, then Forbidden > Conditional > Approved
pub struct PolicyClassifier {
    rules: PolicyRuleSet,
    resolver: ExpressionResolver,
}

impl PolicyClassifier {
    pub fn new(rules: PolicyRuleSet) -> Self {
        let resolver = ExpressionResolver::with_known_ids(rules.licenses());
        Self { rules, resolver }
    }

    pub fn rules(&self) -> &PolicyRuleSet {
        &self.rules
    }

    /// Classifies an already resolved expression.
    pub fn classify(&self, expression: &LicenseExpression) -> Classification {
        match expression {
            LicenseExpression::Atom(atom) => self.classify_atom(atom),
            LicenseExpression::With { license, .. } => {
                let full = expression.to_string();
                match self
                    .rules
                    .lookup(&full)
                    .or_else(|| self.rules.lookup_atom(license))
                {
                    Some(rule) => Classification::from_rule(expression.clone(), rule),
                    None => {
                        let mut classification = self.classify_atom(license);
                        classification.resolved_expression = expression.clone();
                        classification
                    }
                }
            }
            LicenseExpression::Or(options) => self.classify_dual(expression, options),
            LicenseExpression::And(parts) => self.classify_combination(parts),
        }
    }

    fn classify_atom(&self, atom: &LicenseAtom) -> Classification {
        let expression = LicenseExpression::atom(atom.clone());
        if atom.is_unknown() {
            return Classification::unknown(
                expression,
                format!(
                    "License could not be determined (unknown_license_action: {})",
                    self.rules.unknown_license_action()
                ),
                self.rules.manual_review_approvers(),
            );
        }

        match self.rules.lookup_atom(atom) {
            Some(rule) => Classification::from_rule(expression, rule),
            None => Classification::unknown(
                expression,
                format!("{} is not covered by the company license policy", atom),
                self.rules.manual_review_approvers(),
            ),
        }
    }

    fn classify_dual(
        &self,
        expression: &LicenseExpression,
        options: &[LicenseExpression],
    ) -> Classification {
        if self.rules.dual_license_strategy() == DualLicenseStrategy::ManualReview {
            return Classification {
                resolved_expression: expression.clone(),
                verdict: PolicyVerdict::Conditional,
                category: None,
                required_approvers: self.rules.manual_review_approvers().to_vec(),
                conditions: Vec::new(),
                reason: format!(
                    "Dual license {} requires a manual license choice",
                    expression
                ),
                compatibility_issues: Vec::new(),
                expression_error: None,
            };
        }

        let chosen = options
            .iter()
            .map(|option| self.classify(option))
            .enumerate()
            .min_by_key(|(idx, c)| (c.verdict.permissiveness_rank(), *idx))
            .map(|(_, c)| c);

        match chosen {
            Some(mut classification) => {
                classification.reason = format!(
                    "Dual license {}: selected {}. {}",
                    expression, classification.resolved_expression, classification.reason
                );
                classification
            }
            None => self.classify_atom(&LicenseAtom::no_assertion()),
        }
    }

    fn classify_combination(&self, parts: &[LicenseExpression]) -> Classification {
        let children: Vec<Classification> = parts.iter().map(|p| self.classify(p)).collect();

        let mut resolved_parts = Vec::with_capacity(children.len());
        for child in &children {
            match &child.resolved_expression {
                LicenseExpression::And(inner) => resolved_parts.extend(inner.iter().cloned()),
                other => resolved_parts.push(other.clone()),
            }
        }
        let resolved_expression = LicenseExpression::And(resolved_parts);

        let mut issues: Vec<CompatibilityIssue> = children
            .iter()
            .flat_map(|c| c.compatibility_issues.iter().cloned())
            .collect();
        issues.extend(self.incompatible_pairs(&resolved_expression));
        issues.dedup();

        let verdict = if !issues.is_empty() {
            PolicyVerdict::Incompatible
        } else if children.iter().any(|c| c.verdict == PolicyVerdict::Forbidden) {
            PolicyVerdict::Forbidden
        } else if children.iter().all(|c| c.verdict == PolicyVerdict::Approved) {
            PolicyVerdict::Approved
        } else {
            PolicyVerdict::Conditional
        };

        let reason = match verdict {
            PolicyVerdict::Incompatible => {
                let pairs: Vec<String> = issues
                    .iter()
                    .map(|i| format!("{} + {} ({})", i.first, i.second, i.reason))
                    .collect();
                format!("Incompatible license combination: {}", pairs.join("; "))
            }
            PolicyVerdict::Forbidden => {
                let forbidden: Vec<String> = children
                    .iter()
                    .filter(|c| c.verdict == PolicyVerdict::Forbidden)
                    .map(|c| c.resolved_expression.to_string())
                    .collect();
                format!("Combination contains forbidden license(s): {}", forbidden.join(", "))
            }
            PolicyVerdict::Approved => {
                format!("All licenses in {} are approved", resolved_expression)
            }
            _ => {
                let pending: Vec<String> = children
                    .iter()
                    .filter(|c| c.verdict != PolicyVerdict::Approved)
                    .map(|c| format!("{} ({})", c.resolved_expression, c.verdict))
                    .collect();
                format!("Combination requires review of: {}", pending.join(", "))
            }
        };

        let category = if verdict == PolicyVerdict::Forbidden {
            children
                .iter()
                .find(|c| c.verdict == PolicyVerdict::Forbidden)
                .and_then(|c| c.category.clone())
        } else {
            shared_category(&children)
        };

        Classification {
            resolved_expression,
            verdict,
            category,
            required_approvers: union(children.iter().map(|c| &c.required_approvers)),
            conditions: union(children.iter().map(|c| &c.conditions)),
            reason,
            compatibility_issues: issues,
            expression_error: None,
        }
    }

    /// Every leaf pair of an `AND` that the matrix marks incompatible.
    fn incompatible_pairs(&self, expression: &LicenseExpression) -> Vec<CompatibilityIssue> {
        let mut ids: Vec<String> = Vec::new();
        for leaf in expression.leaves() {
            if leaf.is_unknown() {
                continue;
            }
            let id = leaf.id();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }

        let mut issues = Vec::new();
        for (i, first) in ids.iter().enumerate() {
            for second in &ids[i + 1..] {
                if let Some(rule) = self.rules.compatibility().lookup(first, second) {
                    if !rule.compatible {
                        issues.push(CompatibilityIssue {
                            first: first.clone(),
                            second: second.clone(),
                            reason: rule.reason.clone(),
                        });
                    }
                }
            }
        }
        issues
    }
}

impl LicenseClassifier for PolicyClassifier {
    fn classify_license(&self, raw_license: &str) -> Classification {
        match self.resolver.resolve(raw_license) {
            Ok(expression) => self.classify(&expression),
            Err(error) => {
                let mut classification = Classification::unknown(
                    LicenseExpression::unknown(),
                    error.to_string(),
                    self.rules.manual_review_approvers(),
                );
                classification.expression_error = Some(error);
                classification
            }
        }
    }

    fn resolver(&self) -> &ExpressionResolver {
        &self.resolver
    }

    fn change_severity(&self) -> ChangeSeverityRules {
        self.rules.change_severity()
    }
}

fn shared_category(children: &[Classification]) -> Option<String> {
    let first = children.first()?.category.as_ref()?;
    children
        .iter()
        .all(|c| c.category.as_ref() == Some(first))
        .then(|| first.clone())
}

fn union<'a>(lists: impl Iterator<Item = &'a Vec<String>>) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for item in lists.flatten() {
        if !merged.contains(item) {
            merged.push(item.clone());
        }
    }
    merged
}
