//! JSON index of document sizes, used to plan around large files.

use crate::config::AppConfig;
use crate::error::Error;
use crate::model::FileRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

const MIB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeTier {
    Large,
    VeryLarge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSizeEntry {
    pub size: u64,
    pub size_mb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LargeFileEntry {
    pub size: u64,
    pub size_mb: f64,
    pub category: SizeTier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeIndex {
    pub generated_at: String,
    pub root: String,
    pub total_files: usize,
    pub large_files_count: usize,
    pub files: BTreeMap<String, FileSizeEntry>,
    pub large_files: BTreeMap<String, LargeFileEntry>,
}

impl SizeIndex {
    /// Up to `limit` large files, biggest first.
    pub fn largest(&self, limit: usize) -> Vec<(&str, &LargeFileEntry)> {
        let mut entries: Vec<(&str, &LargeFileEntry)> =
            self.large_files.iter().map(|(path, entry)| (path.as_str(), entry)).collect();
        entries.sort_by(|a, b| b.1.size.cmp(&a.1.size).then_with(|| a.0.cmp(b.0)));
        entries.truncate(limit);
        entries
    }
}

/// Build the index for `records`, keyed by path relative to `root`.
pub fn build_size_index(root: &Path, records: &[FileRecord], config: &AppConfig) -> SizeIndex {
    let mut files = BTreeMap::new();
    let mut large_files = BTreeMap::new();

    for record in records {
        let relative = record
            .absolute_path
            .strip_prefix(root)
            .unwrap_or(&record.absolute_path)
            .to_string_lossy()
            .into_owned();
        let size_mb = size_in_mb(record.size_bytes);

        if record.size_bytes > config.large_file_bytes {
            let category = if record.size_bytes > config.very_large_file_bytes {
                SizeTier::VeryLarge
            } else {
                SizeTier::Large
            };
            large_files.insert(
                relative.clone(),
                LargeFileEntry {
                    size: record.size_bytes,
                    size_mb,
                    category,
                },
            );
        }

        files.insert(
            relative,
            FileSizeEntry {
                size: record.size_bytes,
                size_mb,
            },
        );
    }

    SizeIndex {
        generated_at: chrono::Utc::now().to_rfc3339(),
        root: root.to_string_lossy().into_owned(),
        total_files: files.len(),
        large_files_count: large_files.len(),
        files,
        large_files,
    }
}

pub fn write_size_index(index: &SizeIndex, output: &Path) -> Result<(), Error> {
    let mut writer = BufWriter::new(File::create(output)?);
    serde_json::to_writer_pretty(&mut writer, index)?;
    writer.flush()?;
    info!(
        "Size index written to {} ({} files, {} large)",
        output.display(),
        index.total_files,
        index.large_files_count
    );
    Ok(())
}

pub fn read_size_index(input: &Path) -> Result<SizeIndex, Error> {
    let reader = BufReader::new(File::open(input)?);
    Ok(serde_json::from_reader(reader)?)
}

fn size_in_mb(bytes: u64) -> f64 {
    (bytes as f64 / MIB * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: u64 = 1024 * 1024;

    fn sample_records() -> Vec<FileRecord> {
        vec![
            FileRecord::new("/lib/a/small.pdf", 3 * MB / 2),
            FileRecord::new("/lib/b/large.pdf", 60 * MB),
            FileRecord::new("/lib/huge.pdf", 120 * MB),
        ]
    }

    #[test]
    fn test_tiers_follow_thresholds() {
        let index = build_size_index(Path::new("/lib"), &sample_records(), &AppConfig::default());
        assert_eq!(index.total_files, 3);
        assert_eq!(index.large_files_count, 2);
        assert_eq!(index.files["a/small.pdf"].size_mb, 1.5);
        assert_eq!(index.large_files["b/large.pdf"].category, SizeTier::Large);
        assert_eq!(index.large_files["huge.pdf"].category, SizeTier::VeryLarge);
        assert!(!index.large_files.contains_key("a/small.pdf"));
    }

    #[test]
    fn test_largest_sorts_by_size() {
        let index = build_size_index(Path::new("/lib"), &sample_records(), &AppConfig::default());
        let top: Vec<&str> = index.largest(10).into_iter().map(|(p, _)| p).collect();
        assert_eq!(top, vec!["huge.pdf", "b/large.pdf"]);
        assert_eq!(index.largest(1).len(), 1);
    }

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&SizeTier::VeryLarge).unwrap();
        assert_eq!(json, "\"very_large\"");
    }
}
