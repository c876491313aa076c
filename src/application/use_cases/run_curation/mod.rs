use crate::application::dto::{CurationRequest, CurationResponse};
use crate::license_engine::domain::{
    AnalyzerPackage, CurationSuggestion, DeepScanDetection, EvidenceBundle, ExpressionError,
    PackageIdentifier, PolicyCheckResult, RunMetadata, RunWarning, WarningKind,
};
use crate::license_engine::services::{
    needs_curation, CachingPolicyClassifier, ChangeDetection, ChangeDetector, ComplianceScorer,
    EvidenceAggregator, LicenseClassifier, ObservedLicense, PolicyClassifier, ANALYZER_SOURCE,
};
use crate::ports::inbound::LicenseCurationPort;
use crate::ports::outbound::{EvidenceReader, HistoryStore, PolicyReader, ProgressReporter};
use crate::shared::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;
use uuid::Uuid;

/// How often the calling thread refreshes progress while workers run
const PROGRESS_POLL_MS: u64 = 50;

/// Evidence shared read-only by every package worker
struct EvidenceContext {
    registry: HashMap<PackageIdentifier, String>,
    scan_dir: Option<PathBuf>,
    min_scan_score: u8,
}

/// Everything produced for one package by the fan-out
struct PackageOutcome {
    result: PolicyCheckResult,
    suggestion: Option<CurationSuggestion>,
    warnings: Vec<RunWarning>,
}

/// RunCurationUseCase - Core use case for a license curation run
///
/// Orchestrates the run using generic dependency injection for all
/// infrastructure dependencies:
/// load policy → classify every package (fan-out) → detect changes against
/// the history → aggregate evidence into curation suggestions.
///
/// # Type Parameters
/// * `PR` - PolicyReader implementation
/// * `ER` - EvidenceReader implementation
/// * `HS` - HistoryStore implementation (optional)
/// * `REP` - ProgressReporter implementation
pub struct RunCurationUseCase<PR, ER, HS, REP> {
    policy_reader: PR,
    evidence_reader: ER,
    history_store: Option<HS>,
    progress_reporter: REP,
}

impl<PR, ER, HS, REP> RunCurationUseCase<PR, ER, HS, REP>
where
    PR: PolicyReader,
    ER: EvidenceReader,
    HS: HistoryStore,
    REP: ProgressReporter,
{
    /// Creates a new RunCurationUseCase with injected dependencies
    pub fn new(
        policy_reader: PR,
        evidence_reader: ER,
        history_store: Option<HS>,
        progress_reporter: REP,
    ) -> Self {
        Self {
            policy_reader,
            evidence_reader,
            history_store,
            progress_reporter,
        }
    }

    /// Executes the curation run
    pub fn execute(&self, request: CurationRequest) -> Result<CurationResponse> {
        self.execute_at(request, Utc::now())
    }

    /// Executes the curation run with an explicit clock reading
    pub fn execute_at(
        &self,
        request: CurationRequest,
        now: DateTime<Utc>,
    ) -> Result<CurationResponse> {
        // Step 1: Load and validate the policy; nothing runs on a broken policy
        let classifier = self.load_classifier(&request)?;

        // Step 2: Hold the history lock for the whole read-diff-write sequence
        let _history_lock = match (&self.history_store, request.track_history) {
            (Some(store), true) => Some(store.lock()?),
            _ => None,
        };

        // Step 3: Load evidence; problems only degrade into warnings
        let mut warnings = Vec::new();
        let packages = self.load_packages(&request, &mut warnings);
        let context = self.load_evidence_context(&request, &mut warnings);

        // Step 4: Classify and aggregate per package
        let outcomes = self.evaluate_packages(&classifier, &packages, &context)?;

        let mut results = Vec::with_capacity(outcomes.len());
        let mut suggestions = Vec::new();
        for outcome in outcomes {
            results.push(outcome.result);
            suggestions.extend(outcome.suggestion);
            warnings.extend(outcome.warnings);
        }

        // Step 5: Summarize
        let summary = ComplianceScorer::summarize(&results);
        if summary.total_packages == 0 {
            warnings.push(RunWarning::new(
                WarningKind::DivisionDegenerate,
                "No packages were evaluated; compliance score is 0",
            ));
        }

        // Step 6: Diff against the stored history and write it back once
        let detection = match (&self.history_store, request.track_history) {
            (Some(store), true) => {
                Some(self.track_history(store, &classifier, &results, now, &mut warnings)?)
            }
            _ => None,
        };

        // Step 7: Build and return response
        let warnings = dedup_warnings(warnings);
        for warning in &warnings {
            tracing::warn!(kind = %warning.kind, "{}", warning);
            self.progress_reporter
                .report_error(&format!("⚠️  Warning: {}", warning));
        }

        let (changes, history_initialized, critical_change_detected) = match detection {
            Some(detection) => {
                let critical = detection.has_critical_change();
                (detection.events, detection.initialized, critical)
            }
            None => (Vec::new(), false, false),
        };

        self.progress_reporter.report_completion(&format!(
            "✅ Curation complete: {} package(s), compliance score {}%",
            summary.total_packages, summary.compliance_score
        ));

        Ok(CurationResponse {
            metadata: RunMetadata::new(
                Uuid::new_v4().to_string(),
                now.to_rfc3339(),
                env!("CARGO_PKG_NAME").to_string(),
                env!("CARGO_PKG_VERSION").to_string(),
            ),
            summary,
            results,
            changes,
            history_initialized,
            critical_change_detected,
            suggestions,
            warnings,
        })
    }

    fn load_classifier(
        &self,
        request: &CurationRequest,
    ) -> Result<CachingPolicyClassifier<PolicyClassifier>> {
        self.progress_reporter.report(&format!(
            "📖 Loading license policy from: {}",
            request.policy_path.display()
        ));

        let policy = self.policy_reader.read_policy(&request.policy_path)?;

        self.progress_reporter.report(&format!(
            "✅ Policy loaded: {} license(s), {} compatibility rule(s)",
            policy.licenses().count(),
            policy.compatibility().len()
        ));

        Ok(CachingPolicyClassifier::new(PolicyClassifier::new(policy)))
    }

    fn load_packages(
        &self,
        request: &CurationRequest,
        warnings: &mut Vec<RunWarning>,
    ) -> Vec<AnalyzerPackage> {
        self.progress_reporter.report(&format!(
            "📦 Loading analyzer result from: {}",
            request.analyzer_result_path.display()
        ));

        let load = self
            .evidence_reader
            .read_analyzer_packages(&request.analyzer_result_path);
        warnings.extend(load.warnings);

        self.progress_reporter
            .report(&format!("✅ Detected {} package(s)", load.value.len()));
        load.value
    }

    fn load_evidence_context(
        &self,
        request: &CurationRequest,
        warnings: &mut Vec<RunWarning>,
    ) -> EvidenceContext {
        let registry = match &request.registry_evidence_path {
            Some(path) => {
                self.progress_reporter.report(&format!(
                    "🔍 Loading registry evidence from: {}",
                    path.display()
                ));
                let load = self.evidence_reader.read_registry_licenses(path);
                warnings.extend(load.warnings);
                load.value
            }
            None => HashMap::new(),
        };

        EvidenceContext {
            registry,
            scan_dir: request.scan_dir.clone(),
            min_scan_score: request.min_scan_score,
        }
    }

    /// Fans the package list out over scoped worker threads.
    ///
    /// Results come back in input order. The calling thread polls a shared
    /// counter and feeds the progress reporter while the workers run.
    fn evaluate_packages<C: LicenseClassifier>(
        &self,
        classifier: &C,
        packages: &[AnalyzerPackage],
        context: &EvidenceContext,
    ) -> Result<Vec<PackageOutcome>> {
        let total = packages.len();
        if total == 0 {
            return Ok(Vec::new());
        }

        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .clamp(1, total);
        let chunk_size = total.div_ceil(workers);
        let processed = AtomicUsize::new(0);
        let reader = &self.evidence_reader;

        let chunks = thread::scope(|scope| {
            let handles: Vec<_> = packages
                .chunks(chunk_size)
                .map(|chunk| {
                    let processed = &processed;
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|package| {
                                let outcome =
                                    evaluate_package(classifier, reader, context, package);
                                processed.fetch_add(1, Ordering::Relaxed);
                                outcome
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            while !handles.iter().all(|handle| handle.is_finished()) {
                self.progress_reporter.report_progress(
                    processed.load(Ordering::Relaxed),
                    total,
                    Some("Evaluating packages..."),
                );
                thread::sleep(Duration::from_millis(PROGRESS_POLL_MS));
            }
            self.progress_reporter
                .report_progress(total, total, Some("Evaluating packages..."));

            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<Vec<_>>()
        });

        let mut outcomes = Vec::with_capacity(total);
        for chunk in chunks {
            let chunk = chunk.map_err(|_| anyhow::anyhow!("Package evaluation worker panicked"))?;
            outcomes.extend(chunk);
        }
        Ok(outcomes)
    }

    fn track_history<C: LicenseClassifier>(
        &self,
        store: &HS,
        classifier: &C,
        results: &[PolicyCheckResult],
        now: DateTime<Utc>,
        warnings: &mut Vec<RunWarning>,
    ) -> Result<ChangeDetection> {
        self.progress_reporter
            .report("🗂  Comparing licenses against the stored history...");

        let stored = match store.load() {
            Ok(stored) => stored,
            Err(e) => {
                warnings.push(
                    RunWarning::new(
                        WarningKind::HistoryCorrupted,
                        format!("{}; history reinitialized", e),
                    )
                    .from_source("history"),
                );
                None
            }
        };

        let observed: Vec<ObservedLicense> = results
            .iter()
            .map(|r| ObservedLicense::new(r.id.clone(), r.resolved_expression.to_string()))
            .collect();

        let detection = ChangeDetector::new(classifier).detect(stored, &observed, now);
        store.save_all(&detection.history)?;

        if detection.initialized {
            self.progress_reporter.report(&format!(
                "✅ License history initialized with {} package(s)",
                detection.history.len()
            ));
        } else {
            self.progress_reporter.report(&format!(
                "✅ {} license change event(s) detected",
                detection.events.len()
            ));
        }
        Ok(detection)
    }
}

impl<PR, ER, HS, REP> LicenseCurationPort for RunCurationUseCase<PR, ER, HS, REP>
where
    PR: PolicyReader,
    ER: EvidenceReader,
    HS: HistoryStore,
    REP: ProgressReporter,
{
    fn run_curation(&self, request: CurationRequest) -> Result<CurationResponse> {
        self.execute(request)
    }
}

/// Classifies one package and, when its verdict is open, scores a curation.
fn evaluate_package<C: LicenseClassifier, ER: EvidenceReader>(
    classifier: &C,
    reader: &ER,
    context: &EvidenceContext,
    package: &AnalyzerPackage,
) -> PackageOutcome {
    let raw = package.effective_license();
    let classification = classifier.classify_license(raw);
    let mut warnings = Vec::new();

    if let Some(error) = &classification.expression_error {
        let kind = match error {
            ExpressionError::Ambiguous { .. } => WarningKind::AmbiguousExpression,
            ExpressionError::Malformed { .. } => WarningKind::MalformedExpression,
        };
        warnings.push(
            RunWarning::new(kind, error.to_string())
                .for_package(&package.id)
                .from_source(ANALYZER_SOURCE),
        );
    }

    let result = classification.into_check_result(package.id.clone(), raw);
    tracing::debug!(
        package = %result.id,
        license = %result.resolved_expression,
        verdict = %result.verdict,
        "package classified"
    );

    let mut suggestion = None;
    if needs_curation(result.verdict) {
        let resolver = classifier.resolver();
        let registry = context
            .registry
            .get(&package.id)
            .map(|declared| resolver.resolve_lenient(declared));

        let mut deep_scan = Vec::new();
        if let Some(scan_dir) = &context.scan_dir {
            let load = reader.read_deep_scan(scan_dir, &package.id, context.min_scan_score);
            warnings.extend(load.warnings);
            deep_scan = load
                .value
                .into_iter()
                .map(|detection| DeepScanDetection {
                    license: resolver.resolve_lenient(&detection.license),
                    confidence: detection.score,
                })
                .collect();
        }

        let bundle = EvidenceBundle::new(result.verdict, result.resolved_expression.clone())
            .with_registry(registry)
            .with_deep_scan(deep_scan);
        suggestion = Some(EvidenceAggregator::new(classifier).aggregate(&package.id, &bundle));
    }

    PackageOutcome {
        result,
        suggestion,
        warnings,
    }
}

/// Drops repeated warnings, keeping first occurrence order
fn dedup_warnings(warnings: Vec<RunWarning>) -> Vec<RunWarning> {
    let mut unique: Vec<RunWarning> = Vec::with_capacity(warnings.len());
    for warning in warnings {
        if !unique.contains(&warning) {
            unique.push(warning);
        }
    }
    unique
}
