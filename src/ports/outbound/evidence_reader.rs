use crate::license_engine::domain::{AnalyzerPackage, PackageIdentifier, RawDetection, RunWarning};
use std::collections::HashMap;
use std::path::Path;

/// Evidence read from one collaborator, plus whatever went wrong reading it.
///
/// Evidence readers never fail: an absent, empty or malformed source yields
/// an empty value and a warning naming the source.
#[derive(Debug, Clone)]
pub struct EvidenceLoad<T> {
    pub value: T,
    pub warnings: Vec<RunWarning>,
}

impl<T> EvidenceLoad<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn degraded(value: T, warning: RunWarning) -> Self {
        Self {
            value,
            warnings: vec![warning],
        }
    }
}

/// EvidenceReader port for the analyzer, registry and deep-scan inputs
///
/// Implementations must be `Send + Sync`: deep-scan evidence is read per
/// package from the fan-out workers.
pub trait EvidenceReader: Send + Sync {
    /// Packages and their declared/concluded licenses from the dependency analyzer
    fn read_analyzer_packages(&self, path: &Path) -> EvidenceLoad<Vec<AnalyzerPackage>>;

    /// Registry-declared license per package
    fn read_registry_licenses(&self, path: &Path)
        -> EvidenceLoad<HashMap<PackageIdentifier, String>>;

    /// Source-scanner detections for one package, at or above `min_score`
    fn read_deep_scan(
        &self,
        scan_dir: &Path,
        package: &PackageIdentifier,
        min_score: u8,
    ) -> EvidenceLoad<Vec<RawDetection>>;
}
