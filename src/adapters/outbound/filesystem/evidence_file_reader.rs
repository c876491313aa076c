use crate::license_engine::domain::{
    AnalyzerPackage, PackageIdentifier, RawDetection, RunWarning, WarningKind, NOASSERTION,
};
use crate::ports::outbound::{EvidenceLoad, EvidenceReader};
use crate::shared::security::read_regular_file;
use crate::shared::Result;
use serde_json::Value as JsonValue;
use serde_yaml_ng::Value as YamlValue;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// FileSystemEvidenceReader adapter for collaborator outputs on disk
///
/// - ORT `analyzer-result.yml` for the package list
/// - a registry JSON document with declared licenses
/// - a directory of ScanCode JSON results, one file per package
///
/// Every problem degrades into a `MissingEvidenceSource` warning.
pub struct FileSystemEvidenceReader;

impl FileSystemEvidenceReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemEvidenceReader {
    fn default() -> Self {
        Self::new()
    }
}

fn missing_source(path: &Path, message: impl Into<String>) -> RunWarning {
    RunWarning::new(WarningKind::MissingEvidenceSource, message)
        .from_source(path.display().to_string())
}

fn read_non_empty(path: &Path, description: &str) -> std::result::Result<String, RunWarning> {
    let content = read_regular_file(path, description)
        .map_err(|e| missing_source(path, format!("{}: {}", description, e)))?;
    if content.trim().is_empty() {
        return Err(missing_source(path, format!("{} is empty", description)));
    }
    Ok(content)
}

impl EvidenceReader for FileSystemEvidenceReader {
    fn read_analyzer_packages(&self, path: &Path) -> EvidenceLoad<Vec<AnalyzerPackage>> {
        let content = match read_non_empty(path, "analyzer result") {
            Ok(content) => content,
            Err(warning) => return EvidenceLoad::degraded(Vec::new(), warning),
        };
        let document: YamlValue = match serde_yaml_ng::from_str(&content) {
            Ok(document) => document,
            Err(e) => {
                return EvidenceLoad::degraded(
                    Vec::new(),
                    missing_source(path, format!("analyzer result is not valid YAML: {}", e)),
                )
            }
        };

        let Some(entries) = document
            .get("analyzer")
            .and_then(|a| a.get("result"))
            .and_then(|r| r.get("packages"))
            .and_then(YamlValue::as_sequence)
        else {
            return EvidenceLoad::degraded(
                Vec::new(),
                missing_source(path, "analyzer result has no analyzer.result.packages list"),
            );
        };

        let mut load = EvidenceLoad::new(Vec::with_capacity(entries.len()));
        for (index, entry) in entries.iter().enumerate() {
            // Older ORT versions wrap each package as `{ package: {...}, curations: [...] }`
            let package = entry.get("package").unwrap_or(entry);
            match parse_analyzer_package(package) {
                Ok(package) => load.value.push(package),
                Err(e) => load
                    .warnings
                    .push(missing_source(path, format!("package #{} skipped: {}", index, e))),
            }
        }

        tracing::debug!(
            path = %path.display(),
            packages = load.value.len(),
            "analyzer result loaded"
        );
        load
    }

    fn read_registry_licenses(
        &self,
        path: &Path,
    ) -> EvidenceLoad<HashMap<PackageIdentifier, String>> {
        let content = match read_non_empty(path, "registry evidence") {
            Ok(content) => content,
            Err(warning) => return EvidenceLoad::degraded(HashMap::new(), warning),
        };
        let document: JsonValue = match serde_json::from_str(&content) {
            Ok(document) => document,
            Err(e) => {
                return EvidenceLoad::degraded(
                    HashMap::new(),
                    missing_source(path, format!("registry evidence is not valid JSON: {}", e)),
                )
            }
        };
        let Some(entries) = document.get("packages").and_then(JsonValue::as_array) else {
            return EvidenceLoad::degraded(
                HashMap::new(),
                missing_source(path, "registry evidence has no packages list"),
            );
        };

        let mut licenses = HashMap::new();
        for entry in entries {
            let id = entry
                .get("id")
                .and_then(JsonValue::as_str)
                .and_then(|id| PackageIdentifier::parse(id).ok());
            let license = registry_license(entry);
            match (id, license) {
                (Some(id), Some(license)) => {
                    licenses.insert(id, license);
                }
                _ => tracing::debug!(entry = %entry, "registry entry without usable id or license skipped"),
            }
        }
        EvidenceLoad::new(licenses)
    }

    fn read_deep_scan(
        &self,
        scan_dir: &Path,
        package: &PackageIdentifier,
        min_score: u8,
    ) -> EvidenceLoad<Vec<RawDetection>> {
        let file = match find_scan_file(scan_dir, package) {
            Ok(Some(file)) => file,
            Ok(None) => {
                tracing::debug!(package = %package, "no deep-scan result");
                return EvidenceLoad::new(Vec::new());
            }
            Err(e) => {
                return EvidenceLoad::degraded(
                    Vec::new(),
                    missing_source(scan_dir, format!("scan directory unreadable: {}", e)),
                )
            }
        };

        let detections = read_non_empty(&file, "deep-scan result").and_then(|content| {
            serde_json::from_str::<JsonValue>(&content).map_err(|e| {
                missing_source(&file, format!("deep-scan result is not valid JSON: {}", e))
            })
        });

        match detections {
            Ok(document) => EvidenceLoad::new(scan_detections(&document, min_score)),
            Err(warning) => EvidenceLoad::degraded(Vec::new(), warning.for_package(package)),
        }
    }
}

fn parse_analyzer_package(package: &YamlValue) -> Result<AnalyzerPackage> {
    let id = package
        .get("id")
        .and_then(YamlValue::as_str)
        .ok_or_else(|| anyhow::anyhow!("missing id"))?;
    let id = PackageIdentifier::parse(id)?;

    let processed = package
        .get("declared_licenses_processed")
        .and_then(|p| p.get("spdx_expression"))
        .and_then(YamlValue::as_str)
        .map(str::trim)
        .filter(|expr| !expr.is_empty() && !expr.eq_ignore_ascii_case(NOASSERTION));

    let declared = match processed {
        Some(expression) => expression.to_string(),
        None => {
            let declared: Vec<&str> = package
                .get("declared_licenses")
                .and_then(YamlValue::as_sequence)
                .map(|list| {
                    list.iter()
                        .filter_map(YamlValue::as_str)
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default();
            if declared.is_empty() {
                NOASSERTION.to_string()
            } else {
                declared.join(", ")
            }
        }
    };

    let concluded = package
        .get("concluded_license")
        .and_then(YamlValue::as_str)
        .map(str::to_string);

    Ok(AnalyzerPackage::new(id, declared, concluded))
}

fn registry_license(entry: &JsonValue) -> Option<String> {
    entry
        .get("declared_license")
        .and_then(JsonValue::as_str)
        .or_else(|| entry.get("license_from_pypi").and_then(JsonValue::as_str))
        .or_else(|| {
            entry
                .get("fetched_license")
                .and_then(|f| f.get("license"))
                .and_then(JsonValue::as_str)
        })
        .map(str::trim)
        .filter(|license| !license.is_empty())
        .map(str::to_string)
}

/// Scan file whose stem is `name` or `name-version`, compared case-insensitively.
fn find_scan_file(scan_dir: &Path, package: &PackageIdentifier) -> Result<Option<PathBuf>> {
    let name = package.name().to_lowercase();
    let name_version = format!("{}-{}", name, package.version().to_lowercase());

    let mut by_name = None;
    for entry in fs::read_dir(scan_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let stem = stem.to_lowercase();
        if stem == name_version {
            return Ok(Some(path));
        }
        if stem == name {
            by_name = Some(path);
        }
    }
    Ok(by_name)
}

/// Best score per license across all files of a ScanCode result.
///
/// Reads the classic `files[].licenses[]` layout and the newer
/// `files[].license_detections[]` layout.
fn scan_detections(document: &JsonValue, min_score: u8) -> Vec<RawDetection> {
    let mut best: BTreeMap<String, u8> = BTreeMap::new();
    let mut record = |license: &str, score: Option<f64>| {
        let license = license.trim();
        let Some(score) = score else { return };
        if license.is_empty() {
            return;
        }
        let score = score.clamp(0.0, 100.0).round() as u8;
        if score < min_score {
            return;
        }
        let entry = best.entry(license.to_string()).or_insert(0);
        *entry = (*entry).max(score);
    };

    let files = document
        .get("files")
        .and_then(JsonValue::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for file in files {
        for license in file
            .get("licenses")
            .and_then(JsonValue::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
        {
            let key = license
                .get("spdx_license_key")
                .and_then(JsonValue::as_str)
                .or_else(|| license.get("key").and_then(JsonValue::as_str));
            if let Some(key) = key {
                record(key, license.get("score").and_then(JsonValue::as_f64));
            }
        }

        for detection in file
            .get("license_detections")
            .and_then(JsonValue::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
        {
            let Some(expression) = detection
                .get("license_expression_spdx")
                .and_then(JsonValue::as_str)
            else {
                continue;
            };
            let score = detection
                .get("matches")
                .and_then(JsonValue::as_array)
                .and_then(|matches| {
                    matches
                        .iter()
                        .filter_map(|m| m.get("score").and_then(JsonValue::as_f64))
                        .reduce(f64::max)
                });
            record(expression, score);
        }
    }

    best.into_iter()
        .map(|(license, score)| RawDetection { license, score })
        .collect()
}
