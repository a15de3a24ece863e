use crate::config::AppConfig;
use crate::error::Error;
use crate::model::{FileRecord, SkippedFile};
use crate::progress::ProgressReporter;
use glob::Pattern;
use std::path::Path;
use tracing::{error, warn};
use walkdir::WalkDir;

const PROGRESS_INTERVAL: usize = 1000;

/// Documents found under a root, in discovery order.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub records: Vec<FileRecord>,
    pub skipped: Vec<SkippedFile>,
}

impl ScanOutcome {
    pub fn total_bytes(&self) -> u64 {
        self.records.iter().map(|r| r.size_bytes).sum()
    }
}

/// Walk `config.root_dir()` and collect every document with a recognized
/// extension, including empty ones.
///
/// Entries are visited sorted by file name so discovery order is stable
/// across runs on an unchanged tree. Symlinks and paths matching an ignore
/// pattern are skipped. Files whose metadata cannot be read are listed in
/// `skipped` instead of aborting the walk.
pub fn scan_documents(config: &AppConfig, reporter: &dyn ProgressReporter) -> Result<ScanOutcome, Error> {
    let root = config.root_dir();
    if !root.is_dir() {
        error!("Directory not found: {}", root.display());
        return Err(Error::DirectoryNotFound(root));
    }

    let ignore_patterns = compile_ignore_patterns(&config.ignore_patterns);
    let mut outcome = ScanOutcome::default();

    let walker = WalkDir::new(&root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_ignored(entry.path(), &ignore_patterns));

    for entry_result in walker {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
                warn!("Error reading entry under {}: {}", path.display(), err);
                outcome.skipped.push(SkippedFile {
                    path,
                    reason: err.to_string(),
                });
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_dir() || file_type.is_symlink() || !config.is_document(entry.path()) {
            continue;
        }

        match entry.metadata() {
            Ok(metadata) => {
                outcome
                    .records
                    .push(FileRecord::new(entry.path().to_path_buf(), metadata.len()));
                if outcome.records.len() % PROGRESS_INTERVAL == 0 {
                    reporter.on_scan_progress(outcome.records.len());
                }
            }
            Err(err) => {
                let err = Error::unreadable(entry.path(), err.into());
                warn!("{}", err);
                outcome.skipped.push(SkippedFile::from_error(entry.path(), &err));
            }
        }
    }

    Ok(outcome)
}

fn compile_ignore_patterns(globs: &[String]) -> Vec<Pattern> {
    globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(p) => Some(p),
            Err(e) => {
                error!("Invalid glob pattern '{}': {}", glob, e);
                None
            }
        })
        .collect()
}

fn is_ignored(path: &Path, patterns: &[Pattern]) -> bool {
    patterns.iter().any(|pattern| pattern.matches_path(path))
}
