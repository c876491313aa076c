use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// CI pipelines use these to tell a blocking compliance finding apart from
/// a broken invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Run completed and nothing blocking was found (or blocking was not requested)
    Success = 0,
    /// Forbidden/incompatible packages or critical license changes were found
    /// and the run was configured to fail on them
    BlockingIssuesDetected = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (configuration error, unreadable policy, file I/O error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::BlockingIssuesDetected => write!(f, "Blocking Issues Detected (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for a curation run.
///
/// Configuration errors are fatal: they stop the run before any package is
/// classified. Evidence problems never surface here; they degrade into
/// run warnings instead.
#[derive(Debug, Error)]
pub enum CurationError {
    #[error("Policy file not found: {path}\n\n💡 Hint: Pass the company policy with --policy or set `policy` in license-curator.config.yml")]
    PolicyFileNotFound { path: PathBuf },

    #[error("Invalid policy configuration: {path}\nDetails: {details}\n\n💡 Hint: The policy must contain a `company_license_policy` document with approved, conditional and forbidden partitions")]
    ConfigurationError { path: PathBuf, details: String },

    #[error("Invalid policy: {details}\n\n💡 Hint: Review the license partitions and special_rules in the policy file")]
    InvalidPolicy { details: String },

    #[error("License '{license}' is listed in both the {first} and {second} partitions\n\n💡 Hint: Every license may belong to at most one of approved/conditional/forbidden")]
    PartitionConflict {
        license: String,
        first: String,
        second: String,
    },

    #[error("Invalid license_compatibility entry #{index}: {details}\n\n💡 Hint: Each entry needs `combination: \"<license> AND <license>\"` and a boolean `compatible`")]
    InvalidCompatibilityEntry { index: usize, details: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("License history is locked by another run: {path}\n\n💡 Hint: Wait for the other run against the same history file to finish")]
    HistoryLocked { path: PathBuf },

    /// Validation error for builder patterns
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },
}

impl CurationError {
    /// Whether this error means the policy itself cannot be trusted.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            CurationError::PolicyFileNotFound { .. }
                | CurationError::ConfigurationError { .. }
                | CurationError::InvalidPolicy { .. }
                | CurationError::PartitionConflict { .. }
                | CurationError::InvalidCompatibilityEntry { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::BlockingIssuesDetected.as_i32(), 1);
        assert_eq!(ExitCode::InvalidArguments.as_i32(), 2);
        assert_eq!(ExitCode::ApplicationError.as_i32(), 3);
    }

    #[test]
    fn test_exit_code_display() {
        assert_eq!(format!("{}", ExitCode::Success), "Success (0)");
        assert_eq!(
            format!("{}", ExitCode::BlockingIssuesDetected),
            "Blocking Issues Detected (1)"
        );
        assert_eq!(
            format!("{}", ExitCode::ApplicationError),
            "Application Error (3)"
        );
    }

    #[test]
    fn test_partition_conflict_display() {
        let error = CurationError::PartitionConflict {
            license: "MPL-2.0".to_string(),
            first: "approved".to_string(),
            second: "conditional".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("MPL-2.0"));
        assert!(display.contains("approved"));
        assert!(display.contains("conditional"));
        assert!(display.contains("💡 Hint:"));
    }

    #[test]
    fn test_history_locked_display() {
        let error = CurationError::HistoryLocked {
            path: PathBuf::from("/tmp/.ort/license-history.json.lock"),
        };
        let display = format!("{}", error);
        assert!(display.contains("locked by another run"));
        assert!(display.contains("license-history.json.lock"));
    }

    #[test]
    fn test_configuration_error_classification() {
        let config = CurationError::ConfigurationError {
            path: PathBuf::from("policy.yml"),
            details: "missing key".to_string(),
        };
        let io = CurationError::FileWriteError {
            path: PathBuf::from("out.json"),
            details: "denied".to_string(),
        };
        assert!(config.is_configuration_error());
        assert!(!io.is_configuration_error());
    }

    #[test]
    fn test_compatibility_entry_display() {
        let error = CurationError::InvalidCompatibilityEntry {
            index: 2,
            details: "expected two licenses".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("#2"));
        assert!(display.contains("expected two licenses"));
    }
}
