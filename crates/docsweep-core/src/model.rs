use crate::analysis::cleanup::CleanupMode;
use crate::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

/// A document discovered during scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub absolute_path: PathBuf,
    pub display_name: String,
    pub size_bytes: u64,
}

impl FileRecord {
    pub fn new(absolute_path: impl Into<PathBuf>, size_bytes: u64) -> Self {
        let absolute_path = absolute_path.into();
        let display_name = absolute_path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            absolute_path,
            display_name,
            size_bytes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.absolute_path
    }
}

/// Grouping identity derived from a display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for CanonicalKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// BLAKE3 digest of a bounded file prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentFingerprint(blake3::Hash);

impl ContentFingerprint {
    pub fn of(prefix: &[u8]) -> Self {
        Self(blake3::hash(prefix))
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex().to_string()
    }
}

impl fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

/// Files sharing a canonical key, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub key: CanonicalKey,
    pub members: Vec<FileRecord>,
}

impl DuplicateGroup {
    pub fn total_bytes(&self) -> u64 {
        self.members.iter().map(|m| m.size_bytes).sum()
    }

    /// Members ordered largest first, discovery order kept among equal sizes.
    pub fn members_by_size(&self) -> Vec<&FileRecord> {
        let mut sorted: Vec<&FileRecord> = self.members.iter().collect();
        sorted.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));
        sorted
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub group: DuplicateGroup,
    pub survivor: FileRecord,
    pub removed: Vec<FileRecord>,
}

impl Resolution {
    pub fn reclaimable_bytes(&self) -> u64 {
        self.removed.iter().map(|r| r.size_bytes).sum()
    }
}

/// Members of one group that share size and prefix fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactDuplicateSet {
    pub key: CanonicalKey,
    pub size_bytes: u64,
    pub fingerprint: ContentFingerprint,
    pub members: Vec<FileRecord>,
}

/// A file left out of some computation because it could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

impl SkippedFile {
    pub fn from_error(path: impl Into<PathBuf>, err: &Error) -> Self {
        Self {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalKind {
    Empty,
    Duplicate,
}

#[derive(Debug)]
pub struct RemovalOutcome {
    pub kind: RemovalKind,
    pub record: FileRecord,
    pub result: Result<(), Error>,
}

impl RemovalOutcome {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// What a cleanup run is about to do, shown before the top-level confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupPlan {
    pub mode: CleanupMode,
    pub empty_files: usize,
    pub groups: usize,
    pub files_to_remove: usize,
    pub bytes_to_reclaim: u64,
}

#[derive(Debug, Default)]
pub struct CleanupReport {
    pub mode: CleanupMode,
    pub confirmed: bool,
    pub empty_removed: usize,
    pub duplicates_removed: usize,
    pub removal_failures: usize,
    pub groups_applied: usize,
    pub groups_skipped: usize,
    pub groups_not_reached: usize,
    /// Approved groups left untouched because their survivor was gone at removal time.
    pub groups_survivor_missing: usize,
    pub large_files_detected: usize,
    pub large_files: Vec<FileRecord>,
    pub total_files: usize,
    pub total_bytes: u64,
    pub unreadable: usize,
    pub outcomes: Vec<RemovalOutcome>,
}

impl CleanupReport {
    pub fn failed_outcomes(&self) -> impl Iterator<Item = &RemovalOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }
}
