use serde::{Serialize, Serializer};
use std::fmt;

/// Rendering of the distinguished unknown atom
pub const NOASSERTION: &str = "NOASSERTION";

/// Prefix used when unmapped free text is carried as an unverified placeholder
pub const UNVERIFIED_PREFIX: &str = "LicenseRef-unverified-";

/// Why a license atom is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UnknownReason {
    /// `NOASSERTION`, `UNKNOWN`, `NONE` or blank input
    NoAssertion,
    /// Free text that is not in the alias table; keeps a slug of the original
    Unverified(String),
}

/// Leaf of a license expression.
///
/// Never an empty string: blanks and placeholders collapse into
/// [`LicenseAtom::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LicenseAtom {
    /// Known SPDX identifier in canonical case
    Spdx(String),
    /// Explicit `LicenseRef-*` placeholder, kept verbatim
    LicenseRef(String),
    Unknown(UnknownReason),
}

impl LicenseAtom {
    pub fn spdx(id: impl Into<String>) -> Self {
        LicenseAtom::Spdx(id.into())
    }

    pub fn no_assertion() -> Self {
        LicenseAtom::Unknown(UnknownReason::NoAssertion)
    }

    /// Wraps free text as an unverified unknown, keeping a slug for audit.
    pub fn unverified(raw: &str) -> Self {
        let slug = slugify(raw);
        if slug.is_empty() {
            Self::no_assertion()
        } else {
            LicenseAtom::Unknown(UnknownReason::Unverified(slug))
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, LicenseAtom::Unknown(_))
    }

    /// Canonical identifier used for policy lookups and comparisons.
    pub fn id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LicenseAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LicenseAtom::Spdx(id) | LicenseAtom::LicenseRef(id) => write!(f, "{}", id),
            LicenseAtom::Unknown(UnknownReason::NoAssertion) => write!(f, "{}", NOASSERTION),
            LicenseAtom::Unknown(UnknownReason::Unverified(slug)) => {
                write!(f, "{}{}", UNVERIFIED_PREFIX, slug)
            }
        }
    }
}

/// Canonical license expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LicenseExpression {
    Atom(LicenseAtom),
    /// `license WITH exception`
    With {
        license: LicenseAtom,
        exception: String,
    },
    /// Every operand applies
    And(Vec<LicenseExpression>),
    /// Dual/multi license, licensee picks one operand
    Or(Vec<LicenseExpression>),
}

impl LicenseExpression {
    pub fn atom(atom: LicenseAtom) -> Self {
        LicenseExpression::Atom(atom)
    }

    pub fn spdx(id: impl Into<String>) -> Self {
        LicenseExpression::Atom(LicenseAtom::spdx(id))
    }

    pub fn unknown() -> Self {
        LicenseExpression::Atom(LicenseAtom::no_assertion())
    }

    /// True only for a bare unknown atom.
    pub fn is_unknown(&self) -> bool {
        matches!(self, LicenseExpression::Atom(atom) if atom.is_unknown())
    }

    /// True if any leaf is unknown.
    pub fn contains_unknown(&self) -> bool {
        self.leaves().iter().any(|atom| atom.is_unknown())
    }

    /// Leaf atoms in declaration order. `WITH` contributes its base license.
    pub fn leaves(&self) -> Vec<&LicenseAtom> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a LicenseAtom>) {
        match self {
            LicenseExpression::Atom(atom) => out.push(atom),
            LicenseExpression::With { license, .. } => out.push(license),
            LicenseExpression::And(children) | LicenseExpression::Or(children) => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }

    /// The single atom this expression consists of, if it is not compound.
    pub fn as_atom(&self) -> Option<&LicenseAtom> {
        match self {
            LicenseExpression::Atom(atom) => Some(atom),
            _ => None,
        }
    }

    fn is_compound(&self) -> bool {
        matches!(self, LicenseExpression::And(_) | LicenseExpression::Or(_))
    }

    fn fmt_operands(
        f: &mut fmt::Formatter<'_>,
        children: &[LicenseExpression],
        operator: &str,
    ) -> fmt::Result {
        for (idx, child) in children.iter().enumerate() {
            if idx > 0 {
                write!(f, " {} ", operator)?;
            }
            if child.is_compound() {
                write!(f, "({})", child)?;
            } else {
                write!(f, "{}", child)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for LicenseExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LicenseExpression::Atom(atom) => write!(f, "{}", atom),
            LicenseExpression::With { license, exception } => {
                write!(f, "{} WITH {}", license, exception)
            }
            LicenseExpression::And(children) => Self::fmt_operands(f, children, "AND"),
            LicenseExpression::Or(children) => Self::fmt_operands(f, children, "OR"),
        }
    }
}

impl Serialize for LicenseExpression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Lowercase, alphanumerics and dots kept, everything else collapsed to `-`.
fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut pending_dash = false;
    for c in raw.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '.' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug.truncate(64);
    slug.trim_end_matches('-').to_string()
}
