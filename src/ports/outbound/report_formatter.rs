use crate::application::dto::CurationResponse;
use crate::shared::Result;

/// ReportFormatter port for rendering a curation run
///
/// Implementations turn the run response into a document for a specific
/// consumer (a JSON report, an ORT curations file).
pub trait ReportFormatter {
    /// Renders the run response
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format(&self, response: &CurationResponse) -> Result<String>;
}
