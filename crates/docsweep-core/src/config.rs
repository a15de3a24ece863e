use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MIB: u64 = 1024 * 1024;

/// Library location used when nothing else is configured, relative to the home directory.
pub const DEFAULT_LIBRARY_DIR: &str = "Documentos/Zotero Biblioteca";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Root of the document tree. A leading `~/` is expanded to the home directory.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Recognized document extensions, matched case-insensitively and without the dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    #[serde(default = "default_fingerprint_prefix_bytes")]
    pub fingerprint_prefix_bytes: usize,
    /// Files above this size are reported as large in the analysis and the size index.
    #[serde(default = "default_large_file_bytes")]
    pub large_file_bytes: u64,
    /// Files above this size are listed in the post-cleanup advisory.
    #[serde(default = "default_advisory_file_bytes")]
    pub advisory_file_bytes: u64,
    /// Files above this size get the `very_large` tier in the size index.
    #[serde(default = "default_very_large_file_bytes")]
    pub very_large_file_bytes: u64,
    #[serde(default = "default_removal_workers")]
    pub removal_workers: usize,
    #[serde(default = "default_index_path")]
    pub index_path: String,
    /// Plain-text log written next to the console output.
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            extensions: default_extensions(),
            ignore_patterns: Vec::new(),
            fingerprint_prefix_bytes: default_fingerprint_prefix_bytes(),
            large_file_bytes: default_large_file_bytes(),
            advisory_file_bytes: default_advisory_file_bytes(),
            very_large_file_bytes: default_very_large_file_bytes(),
            removal_workers: default_removal_workers(),
            index_path: default_index_path(),
            log_file: default_log_file(),
        }
    }
}

impl AppConfig {
    /// Configuration rooted at `root`, everything else at its default.
    pub fn for_root(root: impl AsRef<Path>) -> Self {
        Self {
            root_path: root.as_ref().to_string_lossy().into_owned(),
            ..Self::default()
        }
    }

    pub fn root_dir(&self) -> PathBuf {
        expand_home(&self.root_path)
    }

    /// True when `path` carries one of the configured document extensions.
    pub fn is_document(&self, path: &Path) -> bool {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => self
                .extensions
                .iter()
                .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext)),
            None => false,
        }
    }
}

pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(
            Environment::with_prefix("DOCSWEEP")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("extensions")
                .with_list_parse_key("ignore_patterns"),
        )
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

fn default_root_path() -> String {
    format!("~/{}", DEFAULT_LIBRARY_DIR)
}

fn default_extensions() -> Vec<String> {
    vec!["pdf".to_string()]
}

fn default_fingerprint_prefix_bytes() -> usize {
    8 * 1024
}

fn default_large_file_bytes() -> u64 {
    50 * MIB
}

fn default_advisory_file_bytes() -> u64 {
    90 * MIB
}

fn default_very_large_file_bytes() -> u64 {
    100 * MIB
}

fn default_removal_workers() -> usize {
    1
}

fn default_index_path() -> String {
    "file-size-index.json".to_string()
}

fn default_log_file() -> String {
    "logs/docsweep.log".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_defaults_match_library_conventions() {
        let config = AppConfig::default();
        assert_eq!(config.extensions, vec!["pdf".to_string()]);
        assert_eq!(config.fingerprint_prefix_bytes, 8192);
        assert_eq!(config.large_file_bytes, 50 * 1024 * 1024);
        assert_eq!(config.advisory_file_bytes, 90 * 1024 * 1024);
        assert_eq!(config.very_large_file_bytes, 100 * 1024 * 1024);
        assert_eq!(config.removal_workers, 1);
        assert!(config.root_path.ends_with(DEFAULT_LIBRARY_DIR));
    }

    #[test]
    fn test_is_document_ignores_case() {
        let config = AppConfig::default();
        assert!(config.is_document(Path::new("/lib/Paper.PDF")));
        assert!(config.is_document(Path::new("/lib/paper.pdf")));
        assert!(!config.is_document(Path::new("/lib/paper.txt")));
        assert!(!config.is_document(Path::new("/lib/pdf")));
    }

    #[test]
    fn test_is_document_accepts_dotted_extensions() {
        let config = AppConfig {
            extensions: vec![".epub".to_string()],
            ..AppConfig::default()
        };
        assert!(config.is_document(Path::new("book.EPUB")));
    }

    #[test]
    fn test_root_dir_keeps_absolute_paths() {
        let config = AppConfig::for_root("/var/library");
        assert_eq!(config.root_dir(), PathBuf::from("/var/library"));
    }

    #[test]
    fn test_root_dir_expands_home() {
        let config = AppConfig::default();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(config.root_dir(), home.join(DEFAULT_LIBRARY_DIR));
        }
    }

    #[test]
    fn test_load_configuration_reads_lists_from_env() {
        env::set_var("DOCSWEEP_EXTENSIONS", "pdf,epub");
        env::set_var("DOCSWEEP_IGNORE_PATTERNS", "*/tmp/*,*.part");
        env::set_var("DOCSWEEP_REMOVAL_WORKERS", "4");
        let loaded = load_configuration();
        env::remove_var("DOCSWEEP_EXTENSIONS");
        env::remove_var("DOCSWEEP_IGNORE_PATTERNS");
        env::remove_var("DOCSWEEP_REMOVAL_WORKERS");

        let config = loaded.unwrap();
        assert_eq!(config.extensions, vec!["pdf".to_string(), "epub".to_string()]);
        assert_eq!(config.ignore_patterns, vec!["*/tmp/*".to_string(), "*.part".to_string()]);
        assert_eq!(config.removal_workers, 4);
        assert_eq!(config.fingerprint_prefix_bytes, 8192);
    }
}
