/// Data Transfer Objects for application layer
///
/// DTOs are used to transfer data between the application layer
/// and adapters, keeping the domain layer isolated.
mod curation_request;
mod curation_response;
mod output_format;

pub use curation_request::{CurationRequest, DEFAULT_MIN_SCAN_SCORE};
pub use curation_response::CurationResponse;
pub use output_format::OutputFormat;
