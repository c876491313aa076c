use super::LicenseCatalog;

/// Coarse license family used when grading license changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseFamily {
    Permissive,
    WeakCopyleft,
    StrongCopyleft,
    Unclassified,
}

const PERMISSIVE: &[&str] = &[
    "0BSD",
    "Apache-1.1",
    "Apache-2.0",
    "BlueOak-1.0.0",
    "BSD-1-Clause",
    "BSD-2-Clause",
    "BSD-3-Clause",
    "BSD-3-Clause-Clear",
    "BSL-1.0",
    "CC0-1.0",
    "HPND",
    "ISC",
    "MIT",
    "MIT-0",
    "NCSA",
    "PostgreSQL",
    "PSF-2.0",
    "Python-2.0",
    "Unlicense",
    "UPL-1.0",
    "X11",
    "Zlib",
];

const WEAK_COPYLEFT: &[&str] = &[
    "CDDL-1.0",
    "CDDL-1.1",
    "EPL-1.0",
    "EPL-2.0",
    "LGPL-2.0-only",
    "LGPL-2.0-or-later",
    "LGPL-2.1-only",
    "LGPL-2.1-or-later",
    "LGPL-3.0-only",
    "LGPL-3.0-or-later",
    "MPL-1.1",
    "MPL-2.0",
];

const STRONG_COPYLEFT: &[&str] = &[
    "AGPL-3.0-only",
    "AGPL-3.0-or-later",
    "EUPL-1.2",
    "GPL-2.0-only",
    "GPL-2.0-or-later",
    "GPL-3.0-only",
    "GPL-3.0-or-later",
    "OSL-3.0",
    "SSPL-1.0",
];

impl LicenseFamily {
    /// Family of an SPDX id. Deprecated spellings (`GPL-3.0`) are looked up
    /// through the alias table.
    pub fn of(license_id: &str) -> Self {
        match Self::lookup(license_id) {
            LicenseFamily::Unclassified => LicenseCatalog::alias(license_id)
                .flatten()
                .map(Self::lookup)
                .unwrap_or(LicenseFamily::Unclassified),
            family => family,
        }
    }

    fn lookup(license_id: &str) -> Self {
        if PERMISSIVE.contains(&license_id) {
            LicenseFamily::Permissive
        } else if WEAK_COPYLEFT.contains(&license_id) {
            LicenseFamily::WeakCopyleft
        } else if STRONG_COPYLEFT.contains(&license_id) {
            LicenseFamily::StrongCopyleft
        } else {
            LicenseFamily::Unclassified
        }
    }
}

/// Splits a versioned id into lineage and version, e.g.
/// `GPL-3.0-or-later` → `("GPL", "3.0")`.
///
/// Only a trailing version segment counts: `BSD-3-Clause` and `MIT` have
/// none and return `None`.
pub fn license_version(license_id: &str) -> Option<(String, String)> {
    let base = license_id
        .trim_end_matches('+')
        .trim_end_matches("-only")
        .trim_end_matches("-or-later");

    let (lineage, version) = base.rsplit_once('-')?;
    if lineage.is_empty() || !version.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    Some((lineage.to_string(), version.to_string()))
}
