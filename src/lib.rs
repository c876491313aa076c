//! license-curator - license decision and curation engine
//!
//! This library classifies the licenses of third-party packages reported by an
//! ORT analyzer run against a company license policy, tracks license changes
//! between runs and turns registry and ScanCode evidence into ORT curation
//! suggestions. It follows hexagonal architecture and Domain-Driven Design
//! principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`license_engine`): expressions, policy rules, classification,
//!   change detection and evidence aggregation
//! - **Application Layer** (`application`): Use cases, DTOs and factories
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use license_curator::prelude::*;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<()> {
//! let use_case = RunCurationUseCase::new(
//!     YamlPolicyReader::new(),
//!     FileSystemEvidenceReader::new(),
//!     Some(JsonHistoryStore::new(PathBuf::from(DEFAULT_HISTORY_PATH))),
//!     StderrProgressReporter::new(),
//! );
//!
//! let request = CurationRequest::new(
//!     PathBuf::from("policy/company-license-policy.yml"),
//!     PathBuf::from("ort-results/analyzer-result.yml"),
//! )
//! .with_scan_dir(Some(PathBuf::from("scancode-results")));
//! let response = use_case.execute(request)?;
//!
//! let output = CurationsFormatter::new().format(&response)?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod license_engine;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::{StderrProgressReporter, SummaryPrinter};
    pub use crate::adapters::outbound::filesystem::{
        FileSystemEvidenceReader, FileSystemWriter, JsonHistoryStore, StdoutPresenter,
        YamlPolicyReader, DEFAULT_HISTORY_PATH,
    };
    pub use crate::adapters::outbound::formatters::{CurationsFormatter, JsonReportFormatter};
    pub use crate::application::dto::{CurationRequest, CurationResponse, OutputFormat};
    pub use crate::application::use_cases::RunCurationUseCase;
    pub use crate::license_engine::domain::{
        ChangeEvent, CurationSuggestion, LicenseHistory, PackageIdentifier, PolicyCheckResult,
        PolicyVerdict, RunSummary, RunWarning,
    };
    pub use crate::license_engine::services::{
        ChangeDetector, EvidenceAggregator, LicenseClassifier, PolicyClassifier,
    };
    pub use crate::ports::inbound::LicenseCurationPort;
    pub use crate::ports::outbound::{
        EvidenceReader, HistoryStore, OutputPresenter, PolicyReader, ProgressReporter,
        ReportFormatter,
    };
    pub use crate::shared::Result;
}
