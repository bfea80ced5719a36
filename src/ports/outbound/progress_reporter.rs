/// ProgressReporter port for user-facing progress output
///
/// Diagnostics go through `tracing`; this port carries the short messages a
/// user watches while a batch runs.
pub trait ProgressReporter {
    /// Reports a progress message
    fn report(&self, message: &str);

    /// Reports progress with a position
    ///
    /// # Arguments
    /// * `current` - Components processed so far
    /// * `total` - Components in the batch
    /// * `message` - Optional message to include
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports a soft problem that does not fail the batch
    fn report_warning(&self, message: &str);

    /// Reports a hard per-component failure
    fn report_error(&self, message: &str);

    /// Reports completion of a pass
    fn report_completion(&self, message: &str);
}
