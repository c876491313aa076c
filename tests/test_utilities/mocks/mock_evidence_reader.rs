use license_curator::license_engine::domain::{AnalyzerPackage, RawDetection};
use license_curator::ports::outbound::EvidenceLoad;
use license_curator::prelude::*;
use std::collections::HashMap;
use std::path::Path;

/// Mock EvidenceReader serving fixed analyzer, registry and scan evidence
#[derive(Default, Clone)]
pub struct MockEvidenceReader {
    packages: Vec<AnalyzerPackage>,
    registry: HashMap<PackageIdentifier, String>,
    scans: HashMap<PackageIdentifier, Vec<RawDetection>>,
}

impl MockEvidenceReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(mut self, id: &str, declared: &str) -> Self {
        let id = PackageIdentifier::parse(id).unwrap();
        self.packages
            .push(AnalyzerPackage::new(id, declared.to_string(), None));
        self
    }

    pub fn with_registry(mut self, id: &str, license: &str) -> Self {
        let id = PackageIdentifier::parse(id).unwrap();
        self.registry.insert(id, license.to_string());
        self
    }

    pub fn with_scan(mut self, id: &str, license: &str, score: u8) -> Self {
        let id = PackageIdentifier::parse(id).unwrap();
        self.scans.entry(id).or_default().push(RawDetection {
            license: license.to_string(),
            score,
        });
        self
    }

    /// Replaces the declared license of an already added package
    pub fn relicense(mut self, id: &str, declared: &str) -> Self {
        let id = PackageIdentifier::parse(id).unwrap();
        for package in self.packages.iter_mut().filter(|p| p.id == id) {
            package.declared_license = declared.to_string();
        }
        self
    }
}

impl EvidenceReader for MockEvidenceReader {
    fn read_analyzer_packages(&self, _path: &Path) -> EvidenceLoad<Vec<AnalyzerPackage>> {
        EvidenceLoad::new(self.packages.clone())
    }

    fn read_registry_licenses(
        &self,
        _path: &Path,
    ) -> EvidenceLoad<HashMap<PackageIdentifier, String>> {
        EvidenceLoad::new(self.registry.clone())
    }

    fn read_deep_scan(
        &self,
        _scan_dir: &Path,
        package: &PackageIdentifier,
        min_score: u8,
    ) -> EvidenceLoad<Vec<RawDetection>> {
        let detections = self
            .scans
            .get(package)
            .map(|d| d.iter().filter(|d| d.score >= min_score).cloned().collect())
            .unwrap_or_default();
        EvidenceLoad::new(detections)
    }
}
