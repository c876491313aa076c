use crate::license_engine::domain::LicenseHistory;
use crate::shared::Result;

/// HistoryStore port for the persisted license history
///
/// A run takes the lock, loads once, diffs in memory and saves once.
/// The lock is released when the returned guard is dropped.
pub trait HistoryStore {
    /// Exclusive-access guard held for the read-diff-write sequence
    type Lock;

    /// Acquires exclusive access to the store
    ///
    /// # Errors
    /// Returns an error if another run already holds the lock
    fn lock(&self) -> Result<Self::Lock>;

    /// Loads the stored history
    ///
    /// # Returns
    /// `None` when nothing has been stored yet
    ///
    /// # Errors
    /// Returns an error if the stored data cannot be read or decoded.
    /// Callers treat this as a corrupted history.
    fn load(&self) -> Result<Option<LicenseHistory>>;

    /// Replaces the stored history with `history` in a single write
    fn save_all(&self, history: &LicenseHistory) -> Result<()>;
}
