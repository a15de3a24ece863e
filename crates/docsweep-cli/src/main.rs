mod commands;
mod logging;
mod progress;
mod prompt;

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands};
use docsweep_core::index;
use docsweep_core::{
    Analysis, AppConfig, AutoApprove, CleanupMode, CleanupReport, DecisionProvider, SweepEngine,
};
use dotenv::dotenv;
use indicatif::HumanBytes;
use progress::CliReporter;
use prompt::InteractiveDecider;
use tracing::{error, info};

const GROUPS_SHOWN: usize = 10;
const LARGEST_SHOWN: usize = 10;

fn main() {
    dotenv().ok();
    let args = Cli::parse();

    let mut config = match docsweep_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{} loading configuration: {}", "Error".red(), err);
            process::exit(1);
        }
    };
    if let Some(root) = &args.root {
        config.root_path = root.to_string_lossy().into_owned();
    }

    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.log_file));
    let _guard = logging::init_logger(&log_file, args.verbose);

    let result = match args.command {
        Some(Commands::Analyze { list }) => run_analyze(config, list),
        Some(Commands::Clean {
            dry_run,
            yes,
            workers,
        }) => {
            if let Some(workers) = workers {
                config.removal_workers = workers;
            }
            run_clean(config, dry_run, yes)
        }
        Some(Commands::Index { output }) => run_index(config, output),
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:#?}", config);
            Ok(())
        }
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    if let Err(err) = result {
        error!("Error: {:#}", err);
        process::exit(1);
    }
}

fn run_analyze(config: AppConfig, list_all: bool) -> anyhow::Result<()> {
    let engine = SweepEngine::new(config);
    let analysis = engine.analyze(&CliReporter::new())?;

    print_statistics(&engine, &analysis);
    print_groups(&analysis, if list_all { usize::MAX } else { GROUPS_SHOWN });
    print_exact_duplicates(&analysis);
    Ok(())
}

fn run_clean(config: AppConfig, dry_run: bool, yes: bool) -> anyhow::Result<()> {
    let engine = SweepEngine::new(config);
    let reporter = CliReporter::new();
    let analysis = engine.analyze(&reporter)?;
    print_statistics(&engine, &analysis);

    let mode = if dry_run {
        CleanupMode::Preview
    } else {
        CleanupMode::Apply
    };
    let decider: Box<dyn DecisionProvider> = if yes || dry_run {
        Box::new(AutoApprove)
    } else {
        Box::new(InteractiveDecider)
    };

    let report = engine.clean(&analysis, mode, decider.as_ref(), &reporter)?;
    if mode == CleanupMode::Apply && !report.confirmed {
        println!("Operation cancelled");
        return Ok(());
    }
    print_report(&report);
    Ok(())
}

fn run_index(config: AppConfig, output: Option<PathBuf>) -> anyhow::Result<()> {
    let output = output.unwrap_or_else(|| PathBuf::from(&config.index_path));
    let engine = SweepEngine::new(config);
    let size_index = engine.build_index(&CliReporter::new())?;
    index::write_size_index(&size_index, &output)
        .with_context(|| format!("writing {}", output.display()))?;

    info!(
        "{} files, {} above {}",
        size_index.total_files,
        format!("{}", size_index.large_files_count).yellow(),
        HumanBytes(engine.config().large_file_bytes),
    );
    let largest = size_index.largest(LARGEST_SHOWN);
    if !largest.is_empty() {
        println!("\n{}", "Largest files:".blue());
        for (idx, (path, entry)) in largest.into_iter().enumerate() {
            println!("  {}. {} ({:.2}MB, {:?})", idx + 1, path, entry.size_mb, entry.category);
        }
    }
    Ok(())
}

fn print_statistics(engine: &SweepEngine, analysis: &Analysis) {
    println!();
    info!(
        "{} documents, {} total, {} empty, {} above {}",
        format!("{}", analysis.total_files).green(),
        HumanBytes(analysis.total_bytes),
        format!("{}", analysis.empty_files.len()).red(),
        format!("{}", analysis.large_files.len()).yellow(),
        HumanBytes(engine.config().large_file_bytes),
    );
    info!(
        "{} name-family groups, {} exact duplicate sets, {} files reclaimable ({})",
        format!("{}", analysis.groups.len()).red(),
        format!("{}", analysis.exact_sets().count()).red(),
        analysis.duplicate_files(),
        HumanBytes(analysis.reclaimable_bytes()),
    );
    if !analysis.unreadable.is_empty() {
        info!(
            "{} files could not be read",
            format!("{}", analysis.unreadable.len()).red()
        );
    }
}

fn print_groups(analysis: &Analysis, limit: usize) {
    if analysis.groups.is_empty() {
        println!("{}", "No duplicates found".green());
        return;
    }

    let mut sorted: Vec<_> = analysis.groups.iter().collect();
    sorted.sort_by(|a, b| a.resolution.group.key.cmp(&b.resolution.group.key));

    println!("\n{}", "Duplicates by name:".yellow());
    for group in sorted.iter().take(limit) {
        println!("\n{} {}", "Group:".red(), group.resolution.group.key);
        for member in group.resolution.group.members_by_size() {
            println!("  - {} ({})", member.display_name, HumanBytes(member.size_bytes));
        }
    }
    if sorted.len() > limit {
        println!("  ... and {} more groups", sorted.len() - limit);
    }
}

fn print_exact_duplicates(analysis: &Analysis) {
    let mut sets = analysis.exact_sets().peekable();
    if sets.peek().is_none() {
        return;
    }

    println!("\n{}", "Identical files:".red());
    for set in sets {
        println!("\n{} ({})", set.key, HumanBytes(set.size_bytes));
        for member in &set.members {
            println!("  - {}", member.absolute_path.display());
        }
    }
}

fn print_report(report: &CleanupReport) {
    let verb = match report.mode {
        CleanupMode::Preview => "would be removed",
        CleanupMode::Apply => "removed",
    };

    println!();
    info!(
        "Empty files {}: {}, duplicates {}: {}, errors: {}",
        verb,
        format!("{}", report.empty_removed).red(),
        verb,
        format!("{}", report.duplicates_removed).red(),
        format!("{}", report.removal_failures).yellow(),
    );
    info!(
        "Groups applied: {}, skipped: {}, not reached: {}",
        report.groups_applied, report.groups_skipped, report.groups_not_reached
    );
    if report.groups_survivor_missing > 0 {
        println!(
            "  {} {} groups kept because their survivor disappeared",
            "Warning:".yellow(),
            report.groups_survivor_missing
        );
    }
    for outcome in report.failed_outcomes() {
        if let Err(e) = &outcome.result {
            println!("  {} {}", "Error:".red(), e);
        }
    }

    if !report.large_files.is_empty() {
        println!("\n{}", "Very large files:".yellow());
        for record in &report.large_files {
            println!("  - {} ({})", record.display_name, HumanBytes(record.size_bytes));
        }
    }

    info!(
        "Remaining: {} documents, {}{}",
        format!("{}", report.total_files).green(),
        HumanBytes(report.total_bytes),
        if report.unreadable > 0 {
            format!(", {} unreadable", report.unreadable)
        } else {
            String::new()
        }
    );
}
