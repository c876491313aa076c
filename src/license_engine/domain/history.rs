use super::PackageIdentifier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Number of hex characters kept from the snapshot digest
const HASH_PREFIX_LEN: usize = 16;

/// One observed license state of a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseSnapshot {
    pub date: DateTime<Utc>,
    pub license: String,
    pub version: String,
    pub source: String,
    pub hash: String,
    #[serde(default)]
    pub change_detected: bool,
}

impl LicenseSnapshot {
    pub fn new(
        id: &PackageIdentifier,
        license: &str,
        date: DateTime<Utc>,
        source: &str,
        change_detected: bool,
    ) -> Self {
        Self {
            date,
            license: license.to_string(),
            version: id.version().to_string(),
            source: source.to_string(),
            hash: snapshot_hash(id.name(), id.version(), license),
            change_detected,
        }
    }
}

/// Stable fingerprint of `name:version:license`.
pub fn snapshot_hash(name: &str, version: &str, license: &str) -> String {
    let digest = Sha256::digest(format!("{}:{}:{}", name, version, license).as_bytes());
    let mut hex = format!("{:x}", digest);
    hex.truncate(HASH_PREFIX_LEN);
    hex
}

/// Persisted license history of a single package.
///
/// `license_history` is append-only; `current_license` always mirrors its
/// last entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub package_name: String,
    pub package_type: String,
    pub first_seen: DateTime<Utc>,
    pub last_verified: DateTime<Utc>,
    pub current_license: String,
    pub current_version: String,
    #[serde(default)]
    pub change_count: u32,
    #[serde(default)]
    pub license_history: Vec<LicenseSnapshot>,
}

impl HistoryRecord {
    pub fn new(id: &PackageIdentifier, license: &str, now: DateTime<Utc>, source: &str) -> Self {
        Self {
            package_name: id.name().to_string(),
            package_type: id.ecosystem().to_string(),
            first_seen: now,
            last_verified: now,
            current_license: license.to_string(),
            current_version: id.version().to_string(),
            change_count: 0,
            license_history: vec![LicenseSnapshot::new(id, license, now, source, false)],
        }
    }

    /// Marks the record as re-observed. Never moves `last_verified` backwards.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.last_verified {
            self.last_verified = now;
        }
    }

    /// Appends a changed license state.
    pub fn record_change(
        &mut self,
        id: &PackageIdentifier,
        license: &str,
        now: DateTime<Utc>,
        source: &str,
    ) {
        self.license_history
            .push(LicenseSnapshot::new(id, license, now, source, true));
        self.current_license = license.to_string();
        self.current_version = id.version().to_string();
        self.change_count += 1;
        self.touch(now);
    }
}

/// The whole persisted store, keyed by canonical package id string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseHistory {
    pub tracking_started: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub total_scans: u64,
    #[serde(default)]
    pub packages: BTreeMap<String, HistoryRecord>,
}

impl LicenseHistory {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            tracking_started: now,
            last_updated: now,
            total_scans: 0,
            packages: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn get(&self, id: &PackageIdentifier) -> Option<&HistoryRecord> {
        self.packages.get(&id.to_string())
    }

    pub fn get_mut(&mut self, id: &PackageIdentifier) -> Option<&mut HistoryRecord> {
        self.packages.get_mut(&id.to_string())
    }

    pub fn insert(&mut self, id: &PackageIdentifier, record: HistoryRecord) {
        self.packages.insert(id.to_string(), record);
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }
}
