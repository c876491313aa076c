/// Static SPDX catalog and free-text alias table.
///
/// Every mapping lives in one of the tables below so it can be audited.
/// Phrases whose intended license cannot be determined (`BSD License`,
/// `GPL`, ...) map to `None` and resolve to an unknown atom.
pub struct LicenseCatalog;

/// Canonical SPDX license identifiers recognized without policy help.
const SPDX_LICENSE_IDS: &[&str] = &[
    "0BSD",
    "AFL-3.0",
    "AGPL-3.0-only",
    "AGPL-3.0-or-later",
    "Apache-1.1",
    "Apache-2.0",
    "Artistic-2.0",
    "BlueOak-1.0.0",
    "BSD-1-Clause",
    "BSD-2-Clause",
    "BSD-3-Clause",
    "BSD-3-Clause-Clear",
    "BSL-1.0",
    "CC-BY-4.0",
    "CC-BY-SA-4.0",
    "CC0-1.0",
    "CDDL-1.0",
    "CDDL-1.1",
    "EPL-1.0",
    "EPL-2.0",
    "EUPL-1.2",
    "GPL-2.0-only",
    "GPL-2.0-or-later",
    "GPL-3.0-only",
    "GPL-3.0-or-later",
    "HPND",
    "ISC",
    "LGPL-2.0-only",
    "LGPL-2.0-or-later",
    "LGPL-2.1-only",
    "LGPL-2.1-or-later",
    "LGPL-3.0-only",
    "LGPL-3.0-or-later",
    "MIT",
    "MIT-0",
    "MPL-1.1",
    "MPL-2.0",
    "MS-PL",
    "NCSA",
    "OpenSSL",
    "OSL-3.0",
    "PostgreSQL",
    "PSF-2.0",
    "Python-2.0",
    "SSPL-1.0",
    "Unicode-3.0",
    "Unicode-DFS-2016",
    "Unlicense",
    "UPL-1.0",
    "WTFPL",
    "X11",
    "Zlib",
];

/// SPDX license exception identifiers accepted after `WITH`.
const SPDX_EXCEPTION_IDS: &[&str] = &[
    "Autoconf-exception-3.0",
    "Bison-exception-2.2",
    "Classpath-exception-2.0",
    "Font-exception-2.0",
    "GCC-exception-3.1",
    "LLVM-exception",
    "OpenJDK-assembly-exception-1.0",
    "Qt-LGPL-exception-1.1",
];

/// Free text (compared case-insensitively, whitespace collapsed) to SPDX id.
const ALIASES: &[(&str, Option<&str>)] = &[
    // Deprecated SPDX short forms
    ("GPL-2.0", Some("GPL-2.0-only")),
    ("GPL-2.0+", Some("GPL-2.0-or-later")),
    ("GPL-3.0", Some("GPL-3.0-only")),
    ("GPL-3.0+", Some("GPL-3.0-or-later")),
    ("LGPL-2.0", Some("LGPL-2.0-only")),
    ("LGPL-2.0+", Some("LGPL-2.0-or-later")),
    ("LGPL-2.1", Some("LGPL-2.1-only")),
    ("LGPL-2.1+", Some("LGPL-2.1-or-later")),
    ("LGPL-3.0", Some("LGPL-3.0-only")),
    ("LGPL-3.0+", Some("LGPL-3.0-or-later")),
    ("AGPL-3.0", Some("AGPL-3.0-only")),
    // Registry and classifier phrases
    ("MIT License", Some("MIT")),
    ("The MIT License", Some("MIT")),
    ("MIT license (MIT)", Some("MIT")),
    ("Expat", Some("MIT")),
    ("Apache 2.0", Some("Apache-2.0")),
    ("Apache 2", Some("Apache-2.0")),
    ("Apache-2", Some("Apache-2.0")),
    ("Apache License 2.0", Some("Apache-2.0")),
    ("Apache License Version 2.0", Some("Apache-2.0")),
    ("Apache License, Version 2.0", Some("Apache-2.0")),
    ("Apache Software License", Some("Apache-2.0")),
    ("Apache Software License 2.0", Some("Apache-2.0")),
    ("ASL 2.0", Some("Apache-2.0")),
    ("New BSD License", Some("BSD-3-Clause")),
    ("Modified BSD License", Some("BSD-3-Clause")),
    ("BSD 3-Clause", Some("BSD-3-Clause")),
    ("BSD-3", Some("BSD-3-Clause")),
    ("3-Clause BSD License", Some("BSD-3-Clause")),
    ("Simplified BSD License", Some("BSD-2-Clause")),
    ("FreeBSD License", Some("BSD-2-Clause")),
    ("BSD 2-Clause", Some("BSD-2-Clause")),
    ("BSD-2", Some("BSD-2-Clause")),
    ("2-Clause BSD License", Some("BSD-2-Clause")),
    ("ISC License", Some("ISC")),
    ("ISC License (ISCL)", Some("ISC")),
    ("GPLv2", Some("GPL-2.0-only")),
    ("GPLv2+", Some("GPL-2.0-or-later")),
    ("GPLv3", Some("GPL-3.0-only")),
    ("GPLv3+", Some("GPL-3.0-or-later")),
    ("LGPLv2.1", Some("LGPL-2.1-only")),
    ("LGPLv2+", Some("LGPL-2.0-or-later")),
    ("LGPLv3", Some("LGPL-3.0-only")),
    ("LGPLv3+", Some("LGPL-3.0-or-later")),
    ("AGPLv3", Some("AGPL-3.0-only")),
    ("AGPLv3+", Some("AGPL-3.0-or-later")),
    ("MPL 2.0", Some("MPL-2.0")),
    ("MPL2", Some("MPL-2.0")),
    ("Mozilla Public License 2.0", Some("MPL-2.0")),
    ("Mozilla Public License 2.0 (MPL 2.0)", Some("MPL-2.0")),
    ("EPL 2.0", Some("EPL-2.0")),
    ("Eclipse Public License 2.0", Some("EPL-2.0")),
    ("Python Software Foundation License", Some("PSF-2.0")),
    ("PSF License", Some("PSF-2.0")),
    ("PSF", Some("PSF-2.0")),
    ("The Unlicense", Some("Unlicense")),
    ("The Unlicense (Unlicense)", Some("Unlicense")),
    ("zlib License", Some("Zlib")),
    ("zlib/libpng", Some("Zlib")),
    ("CC0", Some("CC0-1.0")),
    ("CC0 1.0 Universal", Some("CC0-1.0")),
    ("Boost Software License 1.0", Some("BSL-1.0")),
    ("Historical Permission Notice and Disclaimer (HPND)", Some("HPND")),
    // Ambiguous: family known, exact license not
    ("BSD License", None),
    ("BSD", None),
    ("GPL", None),
    ("GNU GPL", None),
    ("GNU General Public License", None),
    ("LGPL", None),
    ("GNU Lesser General Public License", None),
    ("GNU Library or Lesser General Public License (LGPL)", None),
    ("Public Domain", None),
    ("Dual License", None),
    ("Other/Proprietary License", None),
];

impl LicenseCatalog {
    /// Canonical-case SPDX id for a case-insensitive match.
    pub fn canonical_license_id(candidate: &str) -> Option<&'static str> {
        SPDX_LICENSE_IDS
            .iter()
            .copied()
            .find(|id| id.eq_ignore_ascii_case(candidate))
    }

    /// Canonical-case exception id for a case-insensitive match.
    pub fn canonical_exception_id(candidate: &str) -> Option<&'static str> {
        SPDX_EXCEPTION_IDS
            .iter()
            .copied()
            .find(|id| id.eq_ignore_ascii_case(candidate))
    }

    /// Looks up a free-text phrase.
    ///
    /// * `None` - phrase is not in the table
    /// * `Some(None)` - phrase is known but ambiguous
    /// * `Some(Some(id))` - phrase maps to `id`
    pub fn alias(phrase: &str) -> Option<Option<&'static str>> {
        let normalized = collapse_whitespace(phrase);
        ALIASES
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(&normalized))
            .map(|(_, target)| *target)
    }

    pub fn license_ids() -> &'static [&'static str] {
        SPDX_LICENSE_IDS
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
