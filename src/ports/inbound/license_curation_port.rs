use crate::application::dto::{CurationRequest, CurationResponse};
use crate::shared::Result;

/// LicenseCurationPort - Inbound port for a curation run
///
/// This port defines the interface that external adapters (CLI, CI
/// integrations) use to evaluate a dependency set against the company
/// policy. It represents the application's public API.
pub trait LicenseCurationPort {
    /// Classifies every package, detects license changes against the stored
    /// history and produces curation suggestions
    ///
    /// # Errors
    /// Returns an error only for fatal problems:
    /// - The policy file is missing or invalid
    /// - The history store is locked by another run or cannot be written
    ///
    /// Missing or malformed evidence is reported as warnings on the response.
    fn run_curation(&self, request: CurationRequest) -> Result<CurationResponse>;
}
