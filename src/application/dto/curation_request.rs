use std::path::PathBuf;

/// Scanner matches below this score are ignored unless configured otherwise
pub const DEFAULT_MIN_SCAN_SCORE: u8 = 80;

/// CurationRequest - Internal request DTO for the curation use case
///
/// Only the policy and the analyzer result are mandatory. Every other
/// evidence source, and the history store, is optional.
#[derive(Debug, Clone)]
pub struct CurationRequest {
    /// Company license policy (YAML)
    pub policy_path: PathBuf,
    /// ORT analyzer result listing the packages to evaluate
    pub analyzer_result_path: PathBuf,
    /// Registry-declared licenses (JSON)
    pub registry_evidence_path: Option<PathBuf>,
    /// Directory of per-package ScanCode results
    pub scan_dir: Option<PathBuf>,
    /// Whether license changes are tracked against the history store
    pub track_history: bool,
    /// Minimum scanner score for a detection to count as evidence
    pub min_scan_score: u8,
}

impl CurationRequest {
    pub fn new(policy_path: PathBuf, analyzer_result_path: PathBuf) -> Self {
        Self {
            policy_path,
            analyzer_result_path,
            registry_evidence_path: None,
            scan_dir: None,
            track_history: true,
            min_scan_score: DEFAULT_MIN_SCAN_SCORE,
        }
    }

    pub fn with_registry_evidence(mut self, path: Option<PathBuf>) -> Self {
        self.registry_evidence_path = path;
        self
    }

    pub fn with_scan_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.scan_dir = dir;
        self
    }

    pub fn with_history(mut self, track_history: bool) -> Self {
        self.track_history = track_history;
        self
    }

    /// Scores above 100 are clamped
    pub fn with_min_scan_score(mut self, score: u8) -> Self {
        self.min_scan_score = score.min(100);
        self
    }
}
