use super::PackageIdentifier;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeSeverity {
    /// Informational, used for newly seen packages
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl ChangeSeverity {
    pub fn requires_action(self) -> bool {
        matches!(self, ChangeSeverity::Critical | ChangeSeverity::High)
    }
}

impl fmt::Display for ChangeSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeSeverity::None => write!(f, "none"),
            ChangeSeverity::Low => write!(f, "low"),
            ChangeSeverity::Medium => write!(f, "medium"),
            ChangeSeverity::High => write!(f, "high"),
            ChangeSeverity::Critical => write!(f, "critical"),
        }
    }
}

impl FromStr for ChangeSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(ChangeSeverity::None),
            "low" => Ok(ChangeSeverity::Low),
            "medium" => Ok(ChangeSeverity::Medium),
            "high" => Ok(ChangeSeverity::High),
            "critical" => Ok(ChangeSeverity::Critical),
            other => Err(format!(
                "Unknown change severity '{}'. Expected one of: critical, high, medium, low, none",
                other
            )),
        }
    }
}

/// A license difference between the stored history and the current scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub id: PackageIdentifier,
    pub previous_license: Option<String>,
    pub current_license: String,
    pub severity: ChangeSeverity,
    pub is_new: bool,
    pub requires_action: bool,
    pub risk_assessment: String,
    pub recommended_actions: Vec<String>,
    pub first_seen: DateTime<Utc>,
    pub detected_at: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn is_critical(&self) -> bool {
        self.severity == ChangeSeverity::Critical
    }
}
