use super::PackageIdentifier;
use serde::Serialize;
use std::fmt;

/// Non-fatal degradations recorded during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Unparenthesized mixed AND/OR; the package is classified Unknown
    AmbiguousExpression,
    /// Unbalanced parentheses or dangling operators
    MalformedExpression,
    /// An evidence input is absent, empty or malformed
    MissingEvidenceSource,
    /// The history store could not be read and was reinitialized
    HistoryCorrupted,
    /// Zero packages were classified
    DivisionDegenerate,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WarningKind::AmbiguousExpression => "ambiguous expression",
            WarningKind::MalformedExpression => "malformed expression",
            WarningKind::MissingEvidenceSource => "missing evidence source",
            WarningKind::HistoryCorrupted => "history corrupted",
            WarningKind::DivisionDegenerate => "no packages",
        };
        write!(f, "{}", label)
    }
}

/// Structured warning attached to the run response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunWarning {
    pub kind: WarningKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<PackageIdentifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub message: String,
}

impl RunWarning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            package: None,
            source: None,
            message: message.into(),
        }
    }

    pub fn for_package(mut self, id: &PackageIdentifier) -> Self {
        self.package = Some(id.clone());
        self
    }

    pub fn from_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl fmt::Display for RunWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.kind)?;
        if let Some(package) = &self.package {
            write!(f, " {}", package)?;
        }
        if let Some(source) = &self.source {
            write!(f, " ({})", source)?;
        }
        write!(f, ": {}", self.message)
    }
}
