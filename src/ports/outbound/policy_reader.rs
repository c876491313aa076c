use crate::license_engine::domain::PolicyRuleSet;
use crate::shared::Result;
use std::path::Path;

/// PolicyReader port for loading the company license policy
///
/// Implementations must validate the whole document before returning:
/// a returned `PolicyRuleSet` is always internally consistent.
pub trait PolicyReader {
    /// Reads and validates the policy document at `path`
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file does not exist or cannot be read
    /// - The document is not valid YAML or lacks `company_license_policy`
    /// - A license appears in more than one partition
    /// - A compatibility entry is malformed
    fn read_policy(&self, path: &Path) -> Result<PolicyRuleSet>;
}
