/// Trait for reporting sweep progress.
///
/// The CLI implements it with indicatif; tests use [`SilentReporter`].
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_scan_start(&self) {}
    fn on_scan_progress(&self, _files_found: usize) {}
    fn on_scan_complete(&self, _total_files: usize, _duration_secs: f64) {}
    fn on_fingerprint_start(&self, _total_files: usize) {}
    fn on_fingerprint_progress(&self, _files_hashed: usize, _total_files: usize) {}
    fn on_fingerprint_complete(&self, _exact_sets: usize, _duration_secs: f64) {}
    fn on_removal_start(&self, _total_files: usize) {}
    fn on_removal_progress(&self, _path: &str, _succeeded: bool) {}
    fn on_removal_complete(&self, _removed: usize, _failed: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
