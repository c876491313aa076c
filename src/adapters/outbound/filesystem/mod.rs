/// Filesystem adapters: policy, evidence and history files, report output
mod evidence_file_reader;
mod file_writer;
mod json_history_store;
mod policy_file_reader;

pub use evidence_file_reader::FileSystemEvidenceReader;
pub use file_writer::{FileSystemWriter, StdoutPresenter};
pub use json_history_store::{HistoryLockGuard, JsonHistoryStore, DEFAULT_HISTORY_PATH};
pub use policy_file_reader::YamlPolicyReader;
