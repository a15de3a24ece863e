use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LEVEL: &str = "info";
const DEFAULT_LOG_FILE_NAME: &str = "docsweep.log";

/// `--verbose` wins over `TRACING_LEVEL`, which wins over `info`.
fn level_filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::new(env::var("TRACING_LEVEL").unwrap_or_else(|_| DEFAULT_LEVEL.to_string()))
}

/// Directory and file name the appender writes to. A bare file name lands in
/// the working directory.
fn split_log_path(log_file: &Path) -> (PathBuf, OsString) {
    let directory = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = log_file
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| OsString::from(DEFAULT_LOG_FILE_NAME));
    (directory, file_name)
}

/// Pretty console output plus a plain copy of every event in `log_file`.
///
/// Keep the returned guard alive until exit so the file writer is flushed.
/// When the log directory cannot be created only the console is used.
pub fn init_logger(log_file: &Path, verbose: bool) -> Option<WorkerGuard> {
    let (directory, file_name) = split_log_path(log_file);
    let directory_ready = fs::create_dir_all(&directory);

    let (file_layer, guard) = match &directory_ready {
        Ok(()) => {
            let appender = tracing_appender::rolling::never(&directory, &file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .pretty()
                .with_file(false)
                .without_time()
                .with_ansi(true),
        )
        .with(file_layer)
        .with(level_filter(verbose))
        .init();

    match directory_ready {
        Ok(()) => debug!("Logging to {}", directory.join(&file_name).display()),
        Err(e) => warn!("File logging disabled, cannot create {}: {}", directory.display(), e),
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_log_path_keeps_directory() {
        let (dir, name) = split_log_path(Path::new("logs/run/docsweep.log"));
        assert_eq!(dir, PathBuf::from("logs/run"));
        assert_eq!(name, OsString::from("docsweep.log"));
    }

    #[test]
    fn test_bare_file_name_goes_to_working_directory() {
        let (dir, name) = split_log_path(Path::new("sweep.log"));
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, OsString::from("sweep.log"));
    }
}
