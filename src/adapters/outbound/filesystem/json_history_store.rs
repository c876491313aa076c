use crate::license_engine::domain::LicenseHistory;
use crate::ports::outbound::HistoryStore;
use crate::shared::error::CurationError;
use crate::shared::security::{ensure_not_symlink, read_regular_file};
use crate::shared::Result;
use std::fs::{self, File, OpenOptions, TryLockError};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Default location of the history file, relative to the working directory
pub const DEFAULT_HISTORY_PATH: &str = ".ort/license-history.json";

/// JsonHistoryStore adapter persisting the license history as one JSON file
///
/// Exclusive access is an OS advisory lock on a sibling `<file>.lock`. The
/// lock dies with the process, so a crashed run never blocks the next one.
/// Saves go through a temporary file in the same directory that is renamed
/// over the target, so an interrupted run leaves the previous history intact.
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if parent != Path::new("") => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn write_error(&self, details: impl ToString) -> CurationError {
        CurationError::FileWriteError {
            path: self.path.clone(),
            details: details.to_string(),
        }
    }
}

/// Holds the advisory lock until dropped.
///
/// The lock file itself is left in place: deleting it would let a waiting
/// run lock an unlinked inode while a newer run locks a fresh file.
#[derive(Debug)]
pub struct HistoryLockGuard {
    file: File,
}

impl Drop for HistoryLockGuard {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            tracing::warn!(error = %e, "failed to release history lock");
        }
    }
}

impl HistoryStore for JsonHistoryStore {
    type Lock = HistoryLockGuard;

    fn lock(&self) -> Result<HistoryLockGuard> {
        let parent = self.parent_dir();
        fs::create_dir_all(&parent).map_err(|e| self.write_error(e))?;

        let lock_path = self.lock_path();
        ensure_not_symlink(&lock_path)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| self.write_error(e))?;

        match file.try_lock() {
            Ok(()) => {}
            Err(TryLockError::WouldBlock) => {
                return Err(CurationError::HistoryLocked { path: lock_path }.into());
            }
            Err(TryLockError::Error(e)) => return Err(self.write_error(e).into()),
        }

        // Best effort: the pid only tells a human which run holds the lock
        let _ = file
            .set_len(0)
            .and_then(|_| writeln!(file, "{}", std::process::id()));
        tracing::debug!(path = %lock_path.display(), "history lock acquired");
        Ok(HistoryLockGuard { file })
    }

    fn load(&self) -> Result<Option<LicenseHistory>> {
        if fs::symlink_metadata(&self.path).is_err() {
            return Ok(None);
        }
        let content = read_regular_file(&self.path, "license history")?;
        let history = serde_json::from_str(&content).map_err(|e| {
            anyhow::anyhow!("License history {} is not valid: {}", self.path.display(), e)
        })?;
        Ok(Some(history))
    }

    fn save_all(&self, history: &LicenseHistory) -> Result<()> {
        ensure_not_symlink(&self.path)?;

        let parent = self.parent_dir();
        fs::create_dir_all(&parent).map_err(|e| self.write_error(e))?;

        let content = serde_json::to_string_pretty(history)?;
        let mut temp = NamedTempFile::new_in(&parent).map_err(|e| self.write_error(e))?;
        temp.write_all(content.as_bytes())
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| self.write_error(e))?;
        temp.persist(&self.path)
            .map_err(|e| self.write_error(e.error))?;

        tracing::debug!(
            path = %self.path.display(),
            packages = history.len(),
            "license history saved"
        );
        Ok(())
    }
}
