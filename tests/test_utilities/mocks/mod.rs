/// Mock implementations for testing
mod mock_evidence_reader;
mod mock_history_store;
mod mock_progress_reporter;

pub use mock_evidence_reader::MockEvidenceReader;
pub use mock_history_store::MockHistoryStore;
pub use mock_progress_reporter::MockProgressReporter;
