use crate::config::AppConfig;
use crate::decision::{DecisionProvider, GroupDecision};
use crate::error::Error;
use crate::model::{CleanupPlan, CleanupReport, FileRecord, RemovalKind, RemovalOutcome, Resolution};
use crate::progress::ProgressReporter;
use crate::scanner;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupMode {
    /// Report what would be removed without touching the filesystem.
    #[default]
    Preview,
    /// Remove files after the decision provider confirms.
    Apply,
}

/// Applies or previews resolutions and the empty-file pass.
pub struct CleanupExecutor<'a> {
    config: &'a AppConfig,
    mode: CleanupMode,
    workers: usize,
}

impl<'a> CleanupExecutor<'a> {
    pub fn new(config: &'a AppConfig, mode: CleanupMode) -> Self {
        Self {
            config,
            mode,
            workers: config.removal_workers.max(1),
        }
    }

    /// Number of groups removed concurrently. Members of one group are always
    /// removed sequentially.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn mode(&self) -> CleanupMode {
        self.mode
    }

    pub fn plan(&self, empty: &[FileRecord], resolutions: &[Resolution]) -> CleanupPlan {
        CleanupPlan {
            mode: self.mode,
            empty_files: empty.len(),
            groups: resolutions.len(),
            files_to_remove: empty.len() + resolutions.iter().map(|r| r.removed.len()).sum::<usize>(),
            bytes_to_reclaim: resolutions.iter().map(Resolution::reclaimable_bytes).sum(),
        }
    }

    /// Run the empty-file pass and every approved resolution, then re-scan
    /// the tree for the final totals.
    ///
    /// In `Apply` mode nothing is removed unless `decider` confirms the plan.
    /// A failed removal is recorded and counted; it never stops the remaining
    /// members or groups. Survivors are never touched, and a group whose
    /// survivor has vanished since analysis is left alone entirely. Empty
    /// files are re-checked and kept if they gained content.
    pub fn execute(
        &self,
        empty: &[FileRecord],
        resolutions: &[Resolution],
        decider: &dyn DecisionProvider,
        reporter: &dyn ProgressReporter,
    ) -> Result<CleanupReport, Error> {
        let plan = self.plan(empty, resolutions);
        let mut report = CleanupReport {
            mode: self.mode,
            ..CleanupReport::default()
        };

        if self.mode == CleanupMode::Apply {
            if !decider.confirm_cleanup(&plan) {
                info!("Cleanup declined, no files were touched");
                report.groups_not_reached = resolutions.len();
                self.finish(&mut report, &HashSet::new(), reporter)?;
                return Ok(report);
            }
            report.confirmed = true;
        }

        let approved = self.collect_decisions(resolutions, decider, &mut report);
        let start = Instant::now();
        reporter.on_removal_start(empty.len() + approved.iter().map(|r| r.removed.len()).sum::<usize>());

        info!("Removing {} empty files...", empty.len());
        for record in empty {
            let outcome = self.remove(RemovalKind::Empty, record);
            reporter.on_removal_progress(&record.absolute_path.to_string_lossy(), outcome.succeeded());
            report.outcomes.push(outcome);
        }

        info!("Resolving {} duplicate groups...", approved.len());
        let group_outcomes = self.remove_groups(&approved, reporter)?;
        for outcomes in group_outcomes {
            match outcomes {
                Some(outcomes) => {
                    report.groups_applied += 1;
                    report.outcomes.extend(outcomes);
                }
                None => report.groups_survivor_missing += 1,
            }
        }

        for outcome in &report.outcomes {
            match (&outcome.result, outcome.kind) {
                (Ok(()), RemovalKind::Empty) => report.empty_removed += 1,
                (Ok(()), RemovalKind::Duplicate) => report.duplicates_removed += 1,
                (Err(_), _) => report.removal_failures += 1,
            }
        }

        let removed_paths: HashSet<PathBuf> = report
            .outcomes
            .iter()
            .filter(|o| o.succeeded())
            .map(|o| o.record.absolute_path.clone())
            .collect();

        reporter.on_removal_complete(
            report.empty_removed + report.duplicates_removed,
            report.removal_failures,
            start.elapsed().as_secs_f64(),
        );
        info!(
            "Cleanup ({:?}): {} empty and {} duplicate files removed, {} failed",
            self.mode, report.empty_removed, report.duplicates_removed, report.removal_failures
        );

        self.finish(&mut report, &removed_paths, reporter)?;
        Ok(report)
    }

    fn collect_decisions<'r>(
        &self,
        resolutions: &'r [Resolution],
        decider: &dyn DecisionProvider,
        report: &mut CleanupReport,
    ) -> Vec<&'r Resolution> {
        if self.mode == CleanupMode::Preview {
            return resolutions.iter().collect();
        }

        let mut approved = Vec::new();
        for (idx, resolution) in resolutions.iter().enumerate() {
            match decider.decide_group(resolution) {
                GroupDecision::Apply => approved.push(resolution),
                GroupDecision::Skip => {
                    debug!("Skipped group '{}'", resolution.group.key);
                    report.groups_skipped += 1;
                }
                GroupDecision::Abort => {
                    report.groups_not_reached = resolutions.len() - idx;
                    info!("Cleanup stopped, {} groups left untouched", report.groups_not_reached);
                    break;
                }
            }
        }
        approved
    }

    fn remove_groups(
        &self,
        approved: &[&Resolution],
        reporter: &dyn ProgressReporter,
    ) -> Result<Vec<Option<Vec<RemovalOutcome>>>, Error> {
        let remove_group = |resolution: &&Resolution| -> Option<Vec<RemovalOutcome>> {
            // Never remove the last copies of a document.
            if !resolution.survivor.path().is_file() {
                warn!(
                    "Group '{}' left untouched: survivor {} is gone",
                    resolution.group.key,
                    resolution.survivor.absolute_path.display()
                );
                return None;
            }
            debug!(
                "Group '{}': keeping {}",
                resolution.group.key,
                resolution.survivor.absolute_path.display()
            );
            let outcomes = resolution
                .removed
                .iter()
                .filter(|r| r.absolute_path != resolution.survivor.absolute_path)
                .map(|record| {
                    let outcome = self.remove(RemovalKind::Duplicate, record);
                    reporter.on_removal_progress(&record.absolute_path.to_string_lossy(), outcome.succeeded());
                    outcome
                })
                .collect();
            Some(outcomes)
        };

        if self.workers <= 1 {
            return Ok(approved.iter().map(remove_group).collect());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| Error::Other(format!("Failed to build removal pool: {}", e)))?;
        Ok(pool.install(|| approved.par_iter().map(remove_group).collect()))
    }

    fn remove(&self, kind: RemovalKind, record: &FileRecord) -> RemovalOutcome {
        let result = match self.mode {
            CleanupMode::Preview => Ok(()),
            CleanupMode::Apply => match kind {
                RemovalKind::Empty => still_empty(record.path()).and_then(|()| {
                    fs::remove_file(record.path()).map_err(|e| Error::removal_failed(record.path(), e))
                }),
                RemovalKind::Duplicate => fs::remove_file(record.path())
                    .map_err(|e| Error::removal_failed(record.path(), e)),
            },
        };

        match &result {
            Ok(()) => debug!("{:?} removed: {}", kind, record.absolute_path.display()),
            Err(e) => warn!("{}", e),
        }

        RemovalOutcome {
            kind,
            record: record.clone(),
            result,
        }
    }

    /// Totals come from a fresh scan. In preview mode the files that would
    /// have been removed are subtracted from it.
    fn finish(
        &self,
        report: &mut CleanupReport,
        removed_paths: &HashSet<PathBuf>,
        reporter: &dyn ProgressReporter,
    ) -> Result<(), Error> {
        let scan = scanner::scan_documents(self.config, reporter)?;
        let remaining: Vec<FileRecord> = scan
            .records
            .into_iter()
            .filter(|r| self.mode == CleanupMode::Apply || !removed_paths.contains(&r.absolute_path))
            .collect();

        report.total_files = remaining.len();
        report.total_bytes = remaining.iter().map(|r| r.size_bytes).sum();
        report.large_files = remaining
            .into_iter()
            .filter(|r| r.size_bytes > self.config.advisory_file_bytes)
            .collect();
        report.large_files_detected = report.large_files.len();
        report.unreadable = scan.skipped.len();
        Ok(())
    }
}

/// Sizes recorded during analysis may be stale by the time the empty pass runs.
fn still_empty(path: &Path) -> Result<(), Error> {
    let metadata = fs::metadata(path).map_err(|e| Error::unreadable(path, e))?;
    if metadata.len() != 0 {
        let err = io::Error::new(
            io::ErrorKind::Other,
            format!("no longer empty ({} bytes)", metadata.len()),
        );
        return Err(Error::removal_failed(path, err));
    }
    Ok(())
}
