use super::LicenseClassifier;
use crate::license_engine::domain::{
    ChangeEvent, ChangeSeverity, ChangeSeverityRules, HistoryRecord, LicenseExpression, LicenseHistory,
    PackageIdentifier, PolicyVerdict,
};
use crate::license_engine::policies::{license_version, ChangeActions, LicenseFamily};
use chrono::{DateTime, Utc};

/// Snapshot source label written to the history store
pub const ANALYZER_SOURCE: &str = "analyzer";

/// Canonical license of a package in the current scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedLicense {
    pub id: PackageIdentifier,
    pub license: String,
}

impl ObservedLicense {
    pub fn new(id: PackageIdentifier, license: impl Into<String>) -> Self {
        Self {
            id,
            license: license.into(),
        }
    }
}

/// Result of diffing one scan against the stored history.
#[derive(Debug, Clone)]
pub struct ChangeDetection {
    pub events: Vec<ChangeEvent>,
    /// Updated store, to be written back as one batch
    pub history: LicenseHistory,
    /// True when the store was empty and this run only recorded state
    pub initialized: bool,
}

impl ChangeDetection {
    pub fn has_critical_change(&self) -> bool {
        self.events.iter().any(ChangeEvent::is_critical)
    }
}

/// What the severity rules need to know about one license.
#[derive(Debug, Clone)]
struct LicenseProfile {
    verdict: PolicyVerdict,
    family: LicenseFamily,
    /// `(lineage, version)` for versioned ids such as `GPL-3.0-only`
    version: Option<(String, String)>,
}

impl LicenseProfile {
    fn is_version_change_of(&self, other: &LicenseProfile) -> bool {
        match (&self.version, &other.version) {
            (Some((lineage, version)), Some((other_lineage, other_version))) => {
                lineage == other_lineage && version != other_version
            }
            _ => false,
        }
    }

    fn is_permissive(&self) -> bool {
        self.family == LicenseFamily::Permissive
            || (self.family == LicenseFamily::Unclassified
                && self.verdict == PolicyVerdict::Approved)
    }

    fn is_copyleft(&self) -> bool {
        self.family == LicenseFamily::StrongCopyleft
            || (self.family != LicenseFamily::Permissive && self.verdict.needs_alternative())
    }
}

/// Stateless diff between stored license history and the current scan.
///
/// Never touches storage itself: callers load the history, run
/// [`detect`](Self::detect) and persist [`ChangeDetection::history`].
pub struct ChangeDetector<'a, C: LicenseClassifier> {
    classifier: &'a C,
    severities: ChangeSeverityRules,
}

impl<'a, C: LicenseClassifier> ChangeDetector<'a, C> {
    /// Grades changes with the severities configured on the classifier's policy.
    pub fn new(classifier: &'a C) -> Self {
        Self {
            severities: classifier.change_severity(),
            classifier,
        }
    }

    pub fn detect(
        &self,
        stored: Option<LicenseHistory>,
        current: &[ObservedLicense],
        now: DateTime<Utc>,
    ) -> ChangeDetection {
        let mut history = stored.unwrap_or_else(|| LicenseHistory::new(now));

        if history.is_empty() {
            for observed in current {
                history.insert(
                    &observed.id,
                    HistoryRecord::new(&observed.id, &observed.license, now, ANALYZER_SOURCE),
                );
            }
            history.total_scans = 1;
            history.last_updated = now;
            tracing::debug!(packages = current.len(), "initialized license history");
            return ChangeDetection {
                events: Vec::new(),
                history,
                initialized: true,
            };
        }

        let mut events = Vec::new();
        for observed in current {
            match history.get_mut(&observed.id) {
                None => {
                    history.insert(
                        &observed.id,
                        HistoryRecord::new(&observed.id, &observed.license, now, ANALYZER_SOURCE),
                    );
                    events.push(self.new_package_event(observed, now));
                }
                Some(record) if record.current_license == observed.license => {
                    record.touch(now);
                }
                Some(record) => {
                    let previous = record.current_license.clone();
                    let first_seen = record.first_seen;
                    record.record_change(&observed.id, &observed.license, now, ANALYZER_SOURCE);

                    let severity = self.assess_severity(&previous, &observed.license);
                    tracing::debug!(
                        package = %observed.id,
                        previous = %previous,
                        current = %observed.license,
                        %severity,
                        "license change detected"
                    );
                    events.push(ChangeEvent {
                        id: observed.id.clone(),
                        previous_license: Some(previous),
                        current_license: observed.license.clone(),
                        severity,
                        is_new: false,
                        requires_action: severity.requires_action(),
                        risk_assessment: ChangeActions::risk_assessment(severity).to_string(),
                        recommended_actions: ChangeActions::recommended_actions(severity),
                        first_seen,
                        detected_at: now,
                    });
                }
            }
        }

        history.total_scans += 1;
        if now > history.last_updated {
            history.last_updated = now;
        }

        ChangeDetection {
            events,
            history,
            initialized: false,
        }
    }

    /// Ordered rules, first match wins:
    /// permissive → copyleft (default Critical), copyleft → permissive
    /// (default High), a version change within one license (`GPL-2.0-only` →
    /// `GPL-3.0-only`) is Medium, permissive → permissive (default Low),
    /// else Medium.
    pub fn assess_severity(&self, previous: &str, current: &str) -> ChangeSeverity {
        let before = self.profile(previous);
        let after = self.profile(current);

        if before.is_permissive() && after.is_copyleft() {
            return self.severities.permissive_to_copyleft;
        }
        if before.is_copyleft() && after.is_permissive() {
            return self.severities.copyleft_to_permissive;
        }
        if before.is_version_change_of(&after) {
            return ChangeSeverity::Medium;
        }
        if before.is_permissive() && after.is_permissive() {
            return self.severities.permissive_to_permissive;
        }
        ChangeSeverity::Medium
    }

    fn profile(&self, license: &str) -> LicenseProfile {
        let classification = self.classifier.classify_license(license);
        let id = match &classification.resolved_expression {
            LicenseExpression::Atom(atom) if !atom.is_unknown() => Some(atom.id()),
            LicenseExpression::With { license, .. } if !license.is_unknown() => {
                Some(license.id())
            }
            _ => None,
        };

        LicenseProfile {
            verdict: classification.verdict,
            family: id
                .as_deref()
                .map(LicenseFamily::of)
                .unwrap_or(LicenseFamily::Unclassified),
            version: id.as_deref().and_then(license_version),
        }
    }

    fn new_package_event(&self, observed: &ObservedLicense, now: DateTime<Utc>) -> ChangeEvent {
        let severity = ChangeSeverity::None;
        ChangeEvent {
            id: observed.id.clone(),
            previous_license: None,
            current_license: observed.license.clone(),
            severity,
            is_new: true,
            requires_action: false,
            risk_assessment: ChangeActions::risk_assessment(severity).to_string(),
            recommended_actions: ChangeActions::recommended_actions(severity),
            first_seen: now,
            detected_at: now,
        }
    }
}
