/// Integration tests for the application layer
mod test_utilities;

use license_curator::license_engine::domain::{ChangeSeverity, CurationTier};
use license_curator::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use test_utilities::mocks::*;

const POLICY: &str = r#"
company_license_policy:
  company_name: Example Corp
  policy_version: "2.0"
  approved_licenses:
    permissive:
      licenses: [MIT, Apache-2.0, BSD-3-Clause]
  conditional_licenses:
    weak_copyleft:
      licenses: [LGPL-2.1-only]
      approvers: [legal-team]
      conditions: [Dynamic linking only]
  forbidden_licenses:
    strong_copyleft:
      licenses: [GPL-3.0-only, AGPL-3.0-only]
      reason: Copyleft obligations
  license_compatibility:
    - combination: "Apache-2.0 AND GPL-2.0-only"
      compatible: false
      reason: Patent clause conflict
  special_rules:
    unknown_license_action: manual_review
    manual_review_approvers: [legal-team]
"#;

fn write_policy(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("company-license-policy.yml");
    fs::write(&path, POLICY).unwrap();
    path
}

fn request(policy: PathBuf) -> CurationRequest {
    CurationRequest::new(policy, PathBuf::from("analyzer-result.yml"))
        .with_registry_evidence(Some(PathBuf::from("registry.json")))
        .with_scan_dir(Some(PathBuf::from("scans")))
}

fn evidence() -> MockEvidenceReader {
    MockEvidenceReader::new()
        .with_package("PyPI::requests:2.31.0", "Apache-2.0")
        .with_package("PyPI::chardet:5.2.0", "LGPL-2.1-only")
        .with_package("NPM::leftpad:1.0.0", "GPL-3.0-only")
        .with_package("PyPI::mystery:1.0", "NOASSERTION")
        .with_registry("PyPI::mystery:1.0", "MIT")
        .with_scan("PyPI::mystery:1.0", "MIT", 95)
}

#[test]
fn test_run_curation_happy_path() {
    let dir = TempDir::new().unwrap();
    let policy = write_policy(&dir);
    let store = MockHistoryStore::new();

    let use_case = RunCurationUseCase::new(
        YamlPolicyReader::new(),
        evidence(),
        Some(store.clone()),
        MockProgressReporter::new(),
    );
    let response = use_case.execute(request(policy)).unwrap();

    assert_eq!(response.results.len(), 4);
    let verdicts: Vec<_> = response.results.iter().map(|r| r.verdict).collect();
    assert_eq!(
        verdicts,
        vec![
            PolicyVerdict::Approved,
            PolicyVerdict::Conditional,
            PolicyVerdict::Forbidden,
            PolicyVerdict::Unknown,
        ]
    );
    assert_eq!(response.summary.total_packages, 4);
    assert_eq!(response.summary.compliance_score, 25);
    assert!(response.has_blocking_packages());

    let conditional = &response.results[1];
    assert_eq!(conditional.required_approvers, vec!["legal-team".to_string()]);

    // Approved and forbidden packages never get a curation
    let suggested: Vec<_> = response
        .suggestions
        .iter()
        .map(|s| s.id.to_string())
        .collect();
    assert_eq!(suggested, vec!["PyPI::chardet:5.2.0", "PyPI::mystery:1.0"]);

    let mystery = &response.suggestions[1];
    assert_eq!(mystery.tier, CurationTier::AutoApply);
    assert_eq!(mystery.confidence, 80);
    assert_eq!(mystery.suggested_license.to_string(), "MIT");
    assert_eq!(response.auto_apply().count(), 1);
    assert_eq!(response.manual_review().count(), 1);

    assert!(response.history_initialized);
    assert!(response.changes.is_empty());
    assert_eq!(store.saves(), 1);
    assert_eq!(store.current().unwrap().len(), 4);
}

#[test]
fn test_license_change_between_runs_is_critical() {
    let dir = TempDir::new().unwrap();
    let policy = write_policy(&dir);
    let store = MockHistoryStore::new();

    let first = RunCurationUseCase::new(
        YamlPolicyReader::new(),
        evidence(),
        Some(store.clone()),
        MockProgressReporter::new(),
    )
    .execute(request(policy.clone()))
    .unwrap();
    assert!(first.history_initialized);

    let second = RunCurationUseCase::new(
        YamlPolicyReader::new(),
        evidence().relicense("PyPI::requests:2.31.0", "GPL-3.0-only"),
        Some(store.clone()),
        MockProgressReporter::new(),
    )
    .execute(request(policy))
    .unwrap();

    assert!(!second.history_initialized);
    assert!(second.critical_change_detected);
    assert_eq!(second.changes.len(), 1);
    let change = &second.changes[0];
    assert_eq!(change.id.to_string(), "PyPI::requests:2.31.0");
    assert_eq!(change.severity, ChangeSeverity::Critical);
    assert_eq!(change.previous_license.as_deref(), Some("Apache-2.0"));
    assert!(change.requires_action);

    let history = store.current().unwrap();
    assert_eq!(history.total_scans, 2);
    assert_eq!(store.saves(), 2);
}

#[test]
fn test_scan_below_minimum_score_is_ignored() {
    let dir = TempDir::new().unwrap();
    let policy = write_policy(&dir);
    let reader = MockEvidenceReader::new()
        .with_package("PyPI::mystery:1.0", "NOASSERTION")
        .with_registry("PyPI::mystery:1.0", "MIT")
        .with_scan("PyPI::mystery:1.0", "MIT", 75);

    let use_case: RunCurationUseCase<_, _, MockHistoryStore, _> = RunCurationUseCase::new(
        YamlPolicyReader::new(),
        reader,
        None,
        MockProgressReporter::new(),
    );

    let strict = use_case.execute(request(policy.clone())).unwrap();
    assert_eq!(strict.suggestions[0].tier, CurationTier::ManualReview);
    assert_eq!(strict.suggestions[0].confidence, 50);

    let lenient = use_case
        .execute(request(policy).with_min_scan_score(70))
        .unwrap();
    assert_eq!(lenient.suggestions[0].tier, CurationTier::AutoApply);
    assert_eq!(lenient.suggestions[0].confidence, 80);
}

#[test]
fn test_missing_policy_fails_the_run() {
    let dir = TempDir::new().unwrap();
    let progress = MockProgressReporter::new();
    let use_case: RunCurationUseCase<_, _, MockHistoryStore, _> = RunCurationUseCase::new(
        YamlPolicyReader::new(),
        evidence(),
        None,
        progress.clone(),
    );

    let result = use_case.execute(request(dir.path().join("missing.yml")));
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("missing.yml"));
    assert!(!progress
        .get_messages()
        .iter()
        .any(|m| m.contains("Loading analyzer result")));
}

#[test]
fn test_curations_output_from_run() {
    let dir = TempDir::new().unwrap();
    let policy = write_policy(&dir);
    let use_case: RunCurationUseCase<_, _, MockHistoryStore, _> = RunCurationUseCase::new(
        YamlPolicyReader::new(),
        evidence(),
        None,
        MockProgressReporter::new(),
    );
    let response = use_case.run_curation(request(policy)).unwrap();

    let curations = CurationsFormatter::new().format(&response).unwrap();
    assert!(curations.contains("PyPI::mystery:1.0"));
    assert!(curations.contains("concluded_license"));
    assert!(!curations.contains("PyPI::chardet:5.2.0"));

    let report = JsonReportFormatter::new().format(&response).unwrap();
    let json: serde_json::Value = serde_json::from_str(&report).unwrap();
    assert_eq!(json["summary"]["totalPackages"], 4);
    assert_eq!(json["results"][2]["verdict"], "forbidden");
}

#[test]
fn test_progress_messages() {
    let dir = TempDir::new().unwrap();
    let policy = write_policy(&dir);
    let progress = MockProgressReporter::new();
    let use_case: RunCurationUseCase<_, _, MockHistoryStore, _> = RunCurationUseCase::new(
        YamlPolicyReader::new(),
        evidence(),
        None,
        progress.clone(),
    );
    use_case.execute(request(policy)).unwrap();

    let messages = progress.get_messages();
    assert!(messages.iter().any(|m| m.contains("Loading license policy")));
    assert!(messages.iter().any(|m| m.starts_with("Progress: 4/4")));
    assert!(messages
        .iter()
        .any(|m| m.starts_with("Completed:") && m.contains("4 package(s)")));
}
