use crate::shared::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a single identifier component (security limit)
const MAX_COMPONENT_LENGTH: usize = 255;

/// PackageIdentifier value object: `(ecosystem, namespace?, name, version)`.
///
/// Serialized in ORT form `Type:namespace:name:version`, e.g.
/// `PyPI::requests:2.28.0` (empty namespace). This string is the join key
/// across every evidence source and the key of the history store.
/// Comparison is exact and case-sensitive on every component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageIdentifier {
    ecosystem: String,
    namespace: Option<String>,
    name: String,
    version: String,
}

impl PackageIdentifier {
    pub fn new(
        ecosystem: impl Into<String>,
        namespace: Option<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<Self> {
        let ecosystem = ecosystem.into();
        let name = name.into();
        let version = version.into();

        validate_component("ecosystem", &ecosystem)?;
        validate_component("name", &name)?;
        validate_component("version", &version)?;

        let namespace = match namespace {
            Some(ns) if ns.is_empty() => None,
            Some(ns) => {
                validate_component("namespace", &ns)?;
                Some(ns)
            }
            None => None,
        };

        Ok(Self {
            ecosystem,
            namespace,
            name,
            version,
        })
    }

    /// Parses the canonical `Type:namespace:name:version` form.
    ///
    /// The version is the remainder after the third separator, so versions
    /// carrying an epoch (`1:2.0`) survive intact.
    pub fn parse(id: &str) -> Result<Self> {
        let parts: Vec<&str> = id.trim().splitn(4, ':').collect();
        if parts.len() != 4 {
            anyhow::bail!(
                "Invalid package identifier '{}': expected 'Type:namespace:name:version'",
                id
            );
        }

        let namespace = (!parts[1].is_empty()).then(|| parts[1].to_string());
        Self::new(parts[0], namespace, parts[2], parts[3])
    }

    pub fn ecosystem(&self) -> &str {
        &self.ecosystem
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

fn validate_component(label: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("Package {} cannot be empty", label);
    }
    if value.len() > MAX_COMPONENT_LENGTH {
        anyhow::bail!(
            "Package {} is too long ({} bytes). Maximum allowed: {} bytes",
            label,
            value.len(),
            MAX_COMPONENT_LENGTH
        );
    }
    if value.chars().any(|c| c.is_control()) {
        anyhow::bail!("Package {} contains control characters", label);
    }
    Ok(())
}

impl fmt::Display for PackageIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.ecosystem,
            self.namespace.as_deref().unwrap_or(""),
            self.name,
            self.version
        )
    }
}

impl TryFrom<String> for PackageIdentifier {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<PackageIdentifier> for String {
    fn from(id: PackageIdentifier) -> Self {
        id.to_string()
    }
}
