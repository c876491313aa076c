/// ProgressReporter port for reporting progress during a run
///
/// This port abstracts progress reporting (e.g., to stderr)
/// to provide user feedback while packages are evaluated.
pub trait ProgressReporter {
    /// Reports a progress message
    fn report(&self, message: &str);

    /// Reports progress through the package list
    ///
    /// # Arguments
    /// * `current` - Packages processed so far
    /// * `total` - Total number of packages
    /// * `message` - Optional message to include
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports a warning or error message
    fn report_error(&self, message: &str);

    /// Reports completion of the run
    fn report_completion(&self, message: &str);
}
