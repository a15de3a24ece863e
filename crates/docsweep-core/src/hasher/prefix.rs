use crate::error::Error;
use crate::model::{ContentFingerprint, FileRecord};
use crate::progress::ProgressReporter;
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::warn;

pub const DEFAULT_PREFIX_LENGTH: usize = 8 * 1024; // 8KB

/// Hashes only the first `prefix_bytes` of a file.
///
/// Large PDFs are mostly told apart by size already, so the prefix digest is
/// a cheap second signal rather than a full content comparison.
#[derive(Debug, Clone, Copy)]
pub struct Fingerprinter {
    prefix_bytes: usize,
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX_LENGTH)
    }
}

impl Fingerprinter {
    pub fn new(prefix_bytes: usize) -> Self {
        Self { prefix_bytes }
    }

    pub fn prefix_bytes(&self) -> usize {
        self.prefix_bytes
    }

    pub fn fingerprint(&self, file: &Path) -> Result<ContentFingerprint, Error> {
        let data = read_portion(file, self.prefix_bytes).map_err(|e| Error::unreadable(file, e))?;
        Ok(ContentFingerprint::of(&data))
    }

    /// Fingerprints `records` in parallel. Results keep the input order;
    /// unreadable files are logged and returned as errors.
    pub fn fingerprint_all<'a>(
        &self,
        records: &[&'a FileRecord],
        reporter: &dyn ProgressReporter,
    ) -> Vec<(&'a FileRecord, Result<ContentFingerprint, Error>)> {
        let total = records.len();
        let done = AtomicUsize::new(0);

        records
            .par_iter()
            .map(|record| {
                let result = self.fingerprint(record.path());
                if let Err(e) = &result {
                    warn!("Skipping fingerprint: {}", e);
                }
                let hashed = done.fetch_add(1, Ordering::Relaxed) + 1;
                reporter.on_fingerprint_progress(hashed, total);
                (*record, result)
            })
            .collect()
    }
}

fn read_portion(file: &Path, length: usize) -> io::Result<Vec<u8>> {
    let f = File::open(file)?;
    let mut buffer = Vec::with_capacity(length);
    f.take(length as u64).read_to_end(&mut buffer)?;
    Ok(buffer)
}
