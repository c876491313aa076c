/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (policy files, evidence files,
/// the history store, the console).
pub mod evidence_reader;
pub mod history_store;
pub mod output_presenter;
pub mod policy_reader;
pub mod progress_reporter;
pub mod report_formatter;

pub use evidence_reader::{EvidenceLoad, EvidenceReader};
pub use history_store::HistoryStore;
pub use output_presenter::OutputPresenter;
pub use policy_reader::PolicyReader;
pub use progress_reporter::ProgressReporter;
pub use report_formatter::ReportFormatter;
