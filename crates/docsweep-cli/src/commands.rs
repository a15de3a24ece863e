use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "docsweep")]
#[command(about = "Find and clean empty and duplicate documents in a library", long_about = None)]
pub struct Cli {
    /// Library root, overrides the configured one
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Log file, overrides the configured one
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Log debug events
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Report statistics, name-family groups and exact duplicates
    Analyze {
        /// List every group instead of the first ten
        #[arg(short, long)]
        list: bool,
    },
    /// Remove empty files and non-survivor duplicates
    Clean {
        /// Show what would be removed without touching any file
        #[arg(short = 'n', long)]
        dry_run: bool,
        /// Approve the run and every group without asking
        #[arg(short, long)]
        yes: bool,
        /// Number of groups removed concurrently
        #[arg(short, long)]
        workers: Option<usize>,
    },
    /// Write the JSON file size index
    Index {
        /// Output file, overrides the configured one
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print configuration values
    PrintConfig,
}
