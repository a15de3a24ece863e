use std::fs;
use std::path::Path;
use tempfile::tempdir;

use docsweep_core::{
    AppConfig, AutoApprove, CleanupMode, DeclineAll, Error, GroupDecision, RemovalKind, ScriptedDecisions, SilentReporter,
    SweepEngine,
};

fn write_file(dir: &Path, name: &str, size: usize) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(name), vec![b'x'; size]).unwrap();
}

/// Three name families, each with a larger original and a smaller copy.
fn create_families(root: &Path) {
    for family in ["A", "B", "C"] {
        write_file(root, &format!("{}.pdf", family), 200);
        write_file(root, &format!("{} 1.pdf", family), 100);
    }
}

#[test]
fn test_failed_removal_does_not_stop_the_group() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("library");
    write_file(&root, "Note.pdf", 300);
    write_file(&root, "Note 1.pdf", 100);
    write_file(&root, "Note 2.pdf", 100);

    let engine = SweepEngine::new(AppConfig::for_root(&root));
    let analysis = engine.analyze(&SilentReporter).unwrap();
    assert_eq!(analysis.groups[0].resolution.removed.len(), 2);

    // Vanishes between analysis and cleanup.
    fs::remove_file(root.join("Note 1.pdf")).unwrap();

    let decider = ScriptedDecisions::new(true, [GroupDecision::Apply]);
    let report = engine
        .clean(&analysis, CleanupMode::Apply, &decider, &SilentReporter)
        .unwrap();

    assert_eq!(report.removal_failures, 1);
    assert_eq!(report.duplicates_removed, 1);
    let failed: Vec<_> = report.failed_outcomes().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].record.display_name, "Note 1.pdf");
    assert_eq!(failed[0].kind, RemovalKind::Duplicate);
    assert!(matches!(failed[0].result, Err(Error::RemovalFailed { .. })));

    assert!(!root.join("Note 2.pdf").exists());
    assert!(root.join("Note.pdf").exists());
    assert_eq!(report.total_files, 1);
}

#[test]
fn test_group_with_vanished_survivor_is_left_alone() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("library");
    write_file(&root, "Doc.pdf", 300);
    write_file(&root, "Doc 1.pdf", 100);
    write_file(&root, "Other.pdf", 200);
    write_file(&root, "Other 1.pdf", 50);

    let engine = SweepEngine::new(AppConfig::for_root(&root));
    let analysis = engine.analyze(&SilentReporter).unwrap();
    assert_eq!(analysis.groups.len(), 2);

    fs::remove_file(root.join("Doc.pdf")).unwrap();

    let report = engine
        .clean(&analysis, CleanupMode::Apply, &AutoApprove, &SilentReporter)
        .unwrap();

    assert_eq!(report.groups_survivor_missing, 1);
    assert_eq!(report.groups_applied, 1);
    assert_eq!(report.duplicates_removed, 1);
    assert_eq!(report.removal_failures, 0);
    assert!(root.join("Doc 1.pdf").exists());
    assert!(!root.join("Other 1.pdf").exists());
    assert_eq!(report.total_files, 2);
}

#[test]
fn test_declined_confirmation_touches_nothing() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("library");
    create_families(&root);
    write_file(&root, "Empty.pdf", 0);

    let engine = SweepEngine::new(AppConfig::for_root(&root));
    let analysis = engine.analyze(&SilentReporter).unwrap();
    let report = engine
        .clean(&analysis, CleanupMode::Apply, &DeclineAll, &SilentReporter)
        .unwrap();

    assert!(!report.confirmed);
    assert_eq!(report.empty_removed, 0);
    assert_eq!(report.duplicates_removed, 0);
    assert!(report.outcomes.is_empty());
    assert_eq!(report.groups_not_reached, 3);
    assert_eq!(report.total_files, 7);
    assert!(root.join("Empty.pdf").exists());
    assert!(root.join("A 1.pdf").exists());
}

#[test]
fn test_skip_and_abort_leave_groups_untouched() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("library");
    create_families(&root);

    let engine = SweepEngine::new(AppConfig::for_root(&root));
    let analysis = engine.analyze(&SilentReporter).unwrap();
    let keys: Vec<&str> = analysis
        .groups
        .iter()
        .map(|g| g.resolution.group.key.as_str())
        .collect();
    assert_eq!(keys, vec!["A", "B", "C"]);

    let decider = ScriptedDecisions::new(true, [GroupDecision::Skip, GroupDecision::Apply])
        .with_fallback(GroupDecision::Abort);
    let report = engine
        .clean(&analysis, CleanupMode::Apply, &decider, &SilentReporter)
        .unwrap();

    assert_eq!(report.groups_skipped, 1);
    assert_eq!(report.groups_applied, 1);
    assert_eq!(report.groups_not_reached, 1);
    assert_eq!(report.duplicates_removed, 1);
    assert!(root.join("A 1.pdf").exists());
    assert!(!root.join("B 1.pdf").exists());
    assert!(root.join("C 1.pdf").exists());
}

#[test]
fn test_preview_predicts_without_removing() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("library");
    create_families(&root);
    write_file(&root, "Empty.pdf", 0);

    let engine = SweepEngine::new(AppConfig::for_root(&root));
    let analysis = engine.analyze(&SilentReporter).unwrap();
    let report = engine
        .clean(&analysis, CleanupMode::Preview, &DeclineAll, &SilentReporter)
        .unwrap();

    assert_eq!(report.mode, CleanupMode::Preview);
    assert_eq!(report.empty_removed, 1);
    assert_eq!(report.duplicates_removed, 3);
    assert_eq!(report.removal_failures, 0);
    assert_eq!(report.total_files, 3);
    assert_eq!(report.total_bytes, 600);
    assert!(root.join("Empty.pdf").exists());
    assert!(root.join("A 1.pdf").exists());
    assert!(root.join("B 1.pdf").exists());
}

#[test]
fn test_parallel_workers_remove_every_group() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("library");
    for family in 0..12 {
        write_file(&root, &format!("Doc{} (1).pdf", family), 10);
        write_file(&root, &format!("Doc{}.pdf", family), 20);
        write_file(&root, &format!("Doc{}_2.pdf", family), 5);
    }

    let config = AppConfig {
        removal_workers: 4,
        ..AppConfig::for_root(&root)
    };
    let engine = SweepEngine::new(config);
    let analysis = engine.analyze(&SilentReporter).unwrap();
    assert_eq!(analysis.groups.len(), 12);

    let decider = ScriptedDecisions::new(true, Vec::<GroupDecision>::new()).with_fallback(GroupDecision::Apply);
    let report = engine
        .clean(&analysis, CleanupMode::Apply, &decider, &SilentReporter)
        .unwrap();

    assert_eq!(report.duplicates_removed, 24);
    assert_eq!(report.removal_failures, 0);
    assert_eq!(report.groups_applied, 12);
    assert_eq!(report.total_files, 12);
    for family in 0..12 {
        assert!(root.join(format!("Doc{}.pdf", family)).exists());
    }
    // Outcomes keep group order.
    assert!(report.outcomes[0].record.display_name.starts_with("Doc0"));
}
