use crate::analysis::canonical::Canonicalizer;
use crate::hasher::Fingerprinter;
use crate::model::{CanonicalKey, ContentFingerprint, DuplicateGroup, ExactDuplicateSet, FileRecord, SkippedFile};
use crate::progress::{ProgressReporter, SilentReporter};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// Group records by canonical key under the built-in suffix rules.
pub fn group(records: &[FileRecord]) -> Vec<DuplicateGroup> {
    group_with(records, &Canonicalizer::default())
}

/// Single pass over `records`, bucketing non-empty files by canonical key.
/// Only keys shared by more than one record are returned, in the order their
/// first member was discovered; members keep discovery order.
pub fn group_with(records: &[FileRecord], canonicalizer: &Canonicalizer) -> Vec<DuplicateGroup> {
    let mut key_order: Vec<CanonicalKey> = Vec::new();
    let mut members_by_key: HashMap<CanonicalKey, Vec<FileRecord>> = HashMap::new();

    for record in records.iter().filter(|r| r.size_bytes > 0) {
        let key = canonicalizer.canonicalize(&record.display_name);
        let members = members_by_key.entry(key.clone()).or_insert_with(|| {
            key_order.push(key);
            Vec::new()
        });
        members.push(record.clone());
    }

    let groups: Vec<DuplicateGroup> = key_order
        .into_iter()
        .filter_map(|key| {
            let members = members_by_key.remove(&key)?;
            (members.len() > 1).then_some(DuplicateGroup { key, members })
        })
        .collect();

    debug!("{} name-family groups from {} records", groups.len(), records.len());
    groups
}

/// Fingerprints of the records that share both canonical key and size with
/// another record.
#[derive(Debug, Default, Clone)]
pub struct FingerprintView {
    buckets: Vec<(ContentFingerprint, Vec<FileRecord>)>,
    bucket_index: HashMap<ContentFingerprint, usize>,
    by_path: HashMap<PathBuf, ContentFingerprint>,
    pub unreadable: Vec<SkippedFile>,
}

impl FingerprintView {
    /// Buckets in the order their first record was fingerprinted.
    pub fn buckets(&self) -> &[(ContentFingerprint, Vec<FileRecord>)] {
        &self.buckets
    }

    pub fn get(&self, fingerprint: &ContentFingerprint) -> Option<&[FileRecord]> {
        let idx = *self.bucket_index.get(fingerprint)?;
        Some(self.buckets[idx].1.as_slice())
    }

    fn insert(&mut self, record: &FileRecord, fingerprint: ContentFingerprint) {
        self.by_path.insert(record.absolute_path.clone(), fingerprint);
        match self.bucket_index.get(&fingerprint) {
            Some(&idx) => self.buckets[idx].1.push(record.clone()),
            None => {
                self.bucket_index.insert(fingerprint, self.buckets.len());
                self.buckets.push((fingerprint, vec![record.clone()]));
            }
        }
    }

    pub fn fingerprint_of(&self, record: &FileRecord) -> Option<&ContentFingerprint> {
        self.by_path.get(&record.absolute_path)
    }

    pub fn fingerprinted(&self) -> usize {
        self.by_path.len()
    }
}

/// Members of `groups` worth fingerprinting: those whose size occurs more
/// than once inside their own group.
pub fn fingerprint_candidates(groups: &[DuplicateGroup]) -> Vec<&FileRecord> {
    let mut candidates = Vec::new();
    for group in groups {
        let mut size_counts: HashMap<u64, usize> = HashMap::new();
        for member in &group.members {
            *size_counts.entry(member.size_bytes).or_default() += 1;
        }
        candidates.extend(
            group
                .members
                .iter()
                .filter(|m| size_counts.get(&m.size_bytes).copied().unwrap_or(0) > 1),
        );
    }
    candidates
}

/// Fingerprint view over `records` under the built-in suffix rules.
pub fn group_by_fingerprint(records: &[FileRecord], fingerprinter: &Fingerprinter) -> FingerprintView {
    let groups = group(records);
    group_by_fingerprint_in(&groups, fingerprinter, &SilentReporter)
}

/// Fingerprint the candidates of already-formed groups and bucket them by
/// digest. Unreadable files are listed instead of bucketed.
pub fn group_by_fingerprint_in(
    groups: &[DuplicateGroup],
    fingerprinter: &Fingerprinter,
    reporter: &dyn ProgressReporter,
) -> FingerprintView {
    let candidates = fingerprint_candidates(groups);
    let mut view = FingerprintView::default();

    for (record, result) in fingerprinter.fingerprint_all(&candidates, reporter) {
        match result {
            Ok(fingerprint) => view.insert(record, fingerprint),
            Err(e) => view.unreadable.push(SkippedFile::from_error(record.path(), &e)),
        }
    }

    view
}

/// Sets of members in `group` that share size and prefix fingerprint.
/// Members without a fingerprint in `view` are left out.
pub fn exact_duplicates(group: &DuplicateGroup, view: &FingerprintView) -> Vec<ExactDuplicateSet> {
    let mut sets: Vec<ExactDuplicateSet> = Vec::new();

    for member in &group.members {
        let Some(fingerprint) = view.fingerprint_of(member) else {
            continue;
        };
        match sets
            .iter_mut()
            .find(|s| s.size_bytes == member.size_bytes && s.fingerprint == *fingerprint)
        {
            Some(set) => set.members.push(member.clone()),
            None => sets.push(ExactDuplicateSet {
                key: group.key.clone(),
                size_bytes: member.size_bytes,
                fingerprint: *fingerprint,
                members: vec![member.clone()],
            }),
        }
    }

    sets.retain(|s| s.members.len() > 1);
    sets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(entries: &[(&str, u64)]) -> Vec<FileRecord> {
        entries
            .iter()
            .map(|(name, size)| FileRecord::new(format!("/lib/{}", name), *size))
            .collect()
    }

    #[test]
    fn test_groups_by_canonical_key() {
        let recs = records(&[("Doc 1.pdf", 100), ("Doc 2.pdf", 250), ("Doc.pdf", 80)]);
        let groups = group(&recs);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "Doc");
        assert_eq!(groups[0].members, recs);
    }

    #[test]
    fn test_singletons_and_empty_files_are_not_grouped() {
        let recs = records(&[("Alpha.pdf", 10), ("Beta.pdf", 10), ("Beta 2.pdf", 0)]);
        assert!(group(&recs).is_empty());
    }

    #[test]
    fn test_groups_keep_discovery_order() {
        let recs = records(&[
            ("b 1.pdf", 1),
            ("a.pdf", 1),
            ("b.pdf", 1),
            ("a (2).pdf", 1),
            ("c.pdf", 1),
        ]);
        let groups = group(&recs);
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(groups[0].members[0].display_name, "b 1.pdf");
        assert_eq!(groups[1].members[1].display_name, "a (2).pdf");
    }

    #[test]
    fn test_no_record_in_two_groups() {
        let recs = records(&[
            ("x.pdf", 1),
            ("x 1.pdf", 2),
            ("y_3.pdf", 3),
            ("y.pdf", 4),
            ("x_2.pdf", 5),
        ]);
        let groups = group(&recs);
        let mut seen = std::collections::HashSet::new();
        for g in &groups {
            assert!(g.members.len() >= 2);
            for m in &g.members {
                assert_eq!(Canonicalizer::default().canonicalize(&m.display_name), g.key);
                assert!(seen.insert(m.absolute_path.clone()));
            }
        }
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn test_candidates_need_matching_size() {
        let recs = records(&[("Doc.pdf", 5), ("Doc 1.pdf", 5), ("Doc 2.pdf", 9)]);
        let groups = group(&recs);
        let names: Vec<&str> = fingerprint_candidates(&groups)
            .iter()
            .map(|r| r.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["Doc.pdf", "Doc 1.pdf"]);
    }

    #[test]
    fn test_view_buckets_by_fingerprint() {
        let recs = records(&[("a.pdf", 1), ("b.pdf", 1), ("c.pdf", 1), ("d.pdf", 1)]);
        let first = ContentFingerprint::of(b"first");
        let second = ContentFingerprint::of(b"second");
        let mut view = FingerprintView::default();
        view.insert(&recs[0], first);
        view.insert(&recs[1], second);
        view.insert(&recs[2], first);
        view.insert(&recs[3], second);

        assert_eq!(view.buckets().len(), 2);
        assert_eq!(view.buckets()[0].0, first);
        assert_eq!(view.get(&first).unwrap(), &[recs[0].clone(), recs[2].clone()]);
        assert_eq!(view.get(&second).unwrap(), &[recs[1].clone(), recs[3].clone()]);
        assert!(view.get(&ContentFingerprint::of(b"third")).is_none());
        assert_eq!(view.fingerprint_of(&recs[3]), Some(&second));
        assert_eq!(view.fingerprinted(), 4);
    }
}
