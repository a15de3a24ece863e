use crate::analysis::canonical::Canonicalizer;
use crate::analysis::cleanup::{CleanupExecutor, CleanupMode};
use crate::analysis::grouping::{self, FingerprintView};
use crate::analysis::resolution;
use crate::config::AppConfig;
use crate::decision::DecisionProvider;
use crate::error::Error;
use crate::hasher::Fingerprinter;
use crate::index::{self, SizeIndex};
use crate::model::{CleanupReport, ExactDuplicateSet, FileRecord, Resolution, SkippedFile};
use crate::progress::ProgressReporter;
use crate::scanner;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub struct SweepEngine {
    config: AppConfig,
    canonicalizer: Canonicalizer,
    fingerprinter: Fingerprinter,
}

/// One duplicate group with its resolution and exact-duplicate sets.
#[derive(Debug, Clone)]
pub struct GroupReport {
    pub resolution: Resolution,
    pub exact_sets: Vec<ExactDuplicateSet>,
}

impl GroupReport {
    /// True when every member is a prefix-identical copy of the others.
    pub fn is_exact(&self) -> bool {
        matches!(self.exact_sets.as_slice(), [set] if set.members.len() == self.resolution.group.members.len())
    }
}

/// Everything learned about the tree in one pass. Nothing is carried over
/// between runs.
#[derive(Debug)]
pub struct Analysis {
    pub records: Vec<FileRecord>,
    pub empty_files: Vec<FileRecord>,
    pub groups: Vec<GroupReport>,
    pub fingerprints: FingerprintView,
    pub large_files: Vec<FileRecord>,
    pub unreadable: Vec<SkippedFile>,
    pub total_files: usize,
    pub total_bytes: u64,
    pub scan_duration: Duration,
    pub fingerprint_duration: Duration,
}

impl Analysis {
    pub fn resolutions(&self) -> Vec<Resolution> {
        self.groups.iter().map(|g| g.resolution.clone()).collect()
    }

    pub fn exact_sets(&self) -> impl Iterator<Item = &ExactDuplicateSet> {
        self.groups.iter().flat_map(|g| g.exact_sets.iter())
    }

    pub fn duplicate_files(&self) -> usize {
        self.groups.iter().map(|g| g.resolution.removed.len()).sum()
    }

    pub fn reclaimable_bytes(&self) -> u64 {
        self.groups.iter().map(|g| g.resolution.reclaimable_bytes()).sum()
    }
}

impl SweepEngine {
    pub fn new(config: AppConfig) -> Self {
        let fingerprinter = Fingerprinter::new(config.fingerprint_prefix_bytes);
        Self {
            config,
            canonicalizer: Canonicalizer::default(),
            fingerprinter,
        }
    }

    pub fn with_canonicalizer(mut self, canonicalizer: Canonicalizer) -> Self {
        self.canonicalizer = canonicalizer;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the read-only part of the pipeline:
    /// 1. Scan the tree for documents
    /// 2. Group by canonical key and resolve every group
    /// 3. Fingerprint same-size candidates for the exact-duplicate report
    pub fn analyze(&self, reporter: &dyn ProgressReporter) -> Result<Analysis, Error> {
        info!("Scanning {}...", self.config.root_dir().display());
        reporter.on_scan_start();
        let scan_start = Instant::now();
        let scan = scanner::scan_documents(&self.config, reporter)?;
        let scan_duration = scan_start.elapsed();
        reporter.on_scan_complete(scan.records.len(), scan_duration.as_secs_f64());

        let total_files = scan.records.len();
        let total_bytes = scan.total_bytes();
        debug!(
            "Scan completed in {:.2}s — {} files, {} bytes total, {} unreadable",
            scan_duration.as_secs_f64(),
            total_files,
            total_bytes,
            scan.skipped.len(),
        );

        let empty_files: Vec<FileRecord> = scan.records.iter().filter(|r| r.size_bytes == 0).cloned().collect();
        let large_files: Vec<FileRecord> = scan
            .records
            .iter()
            .filter(|r| r.size_bytes > self.config.large_file_bytes)
            .cloned()
            .collect();

        // Grouping needs the complete record set before any survivor is chosen.
        let groups = grouping::group_with(&scan.records, &self.canonicalizer);

        info!("Fingerprinting duplicate candidates...");
        let candidate_count = grouping::fingerprint_candidates(&groups).len();
        reporter.on_fingerprint_start(candidate_count);
        let fingerprint_start = Instant::now();
        let fingerprints = grouping::group_by_fingerprint_in(&groups, &self.fingerprinter, reporter);

        let group_reports: Vec<GroupReport> = groups
            .iter()
            .filter_map(|group| {
                Some(GroupReport {
                    resolution: resolution::resolve(group)?,
                    exact_sets: grouping::exact_duplicates(group, &fingerprints),
                })
            })
            .collect();
        let fingerprint_duration = fingerprint_start.elapsed();
        let exact_count: usize = group_reports.iter().map(|g| g.exact_sets.len()).sum();
        reporter.on_fingerprint_complete(exact_count, fingerprint_duration.as_secs_f64());
        debug!(
            "Fingerprinting completed in {:.2}s — {} files hashed, {} exact sets",
            fingerprint_duration.as_secs_f64(),
            fingerprints.fingerprinted(),
            exact_count,
        );

        let mut unreadable = scan.skipped;
        unreadable.extend(fingerprints.unreadable.iter().cloned());

        info!(
            "{} files, {} empty, {} name-family groups, {} exact sets",
            total_files,
            empty_files.len(),
            group_reports.len(),
            exact_count
        );

        Ok(Analysis {
            records: scan.records,
            empty_files,
            groups: group_reports,
            fingerprints,
            large_files,
            unreadable,
            total_files,
            total_bytes,
            scan_duration,
            fingerprint_duration,
        })
    }

    /// Apply or preview the decisions of `analysis`.
    pub fn clean(
        &self,
        analysis: &Analysis,
        mode: CleanupMode,
        decider: &dyn DecisionProvider,
        reporter: &dyn ProgressReporter,
    ) -> Result<CleanupReport, Error> {
        let resolutions = analysis.resolutions();
        CleanupExecutor::new(&self.config, mode).execute(&analysis.empty_files, &resolutions, decider, reporter)
    }

    /// Scan the tree and build the size index.
    pub fn build_index(&self, reporter: &dyn ProgressReporter) -> Result<SizeIndex, Error> {
        reporter.on_scan_start();
        let start = Instant::now();
        let scan = scanner::scan_documents(&self.config, reporter)?;
        reporter.on_scan_complete(scan.records.len(), start.elapsed().as_secs_f64());
        Ok(index::build_size_index(&self.config.root_dir(), &scan.records, &self.config))
    }
}
