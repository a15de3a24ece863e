use colored::*;
use docsweep_core::{CleanupPlan, DecisionProvider, GroupDecision, Resolution};
use indicatif::HumanBytes;
use std::io::{self, Write};
use tracing::error;

/// Asks on the terminal before the run and before every group.
pub struct InteractiveDecider;

impl DecisionProvider for InteractiveDecider {
    fn confirm_cleanup(&self, plan: &CleanupPlan) -> bool {
        println!(
            "\n{}",
            "WARNING: this permanently deletes files".red().bold()
        );
        println!(
            "  {} empty files, {} groups, up to {} files ({})",
            plan.empty_files,
            plan.groups,
            plan.files_to_remove,
            HumanBytes(plan.bytes_to_reclaim)
        );
        match prompt_confirm("Are you sure?", Some(false)) {
            Ok(answer) => answer,
            Err(e) => {
                error!("Error reading confirmation: {}", e);
                false
            }
        }
    }

    fn decide_group(&self, resolution: &Resolution) -> GroupDecision {
        println!("\n{} {}", "Group:".blue(), resolution.group.key);
        for (idx, member) in resolution.group.members_by_size().into_iter().enumerate() {
            let mark = if member.absolute_path == resolution.survivor.absolute_path {
                "KEEP".green()
            } else {
                "REMOVE".red()
            };
            println!(
                "  {}. {} ({}) {}",
                idx + 1,
                member.display_name,
                HumanBytes(member.size_bytes),
                mark
            );
        }

        match prompt_line("Clean this group? (y/n/s=skip): ") {
            Ok(answer) => match answer.as_str() {
                "y" => GroupDecision::Apply,
                "s" => {
                    println!("  Skipped");
                    GroupDecision::Skip
                }
                _ => {
                    println!("  Cancelled");
                    GroupDecision::Abort
                }
            },
            Err(e) => {
                error!("Error reading answer: {}", e);
                GroupDecision::Abort
            }
        }
    }
}

pub fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    loop {
        let suffix = match default {
            Some(true) => "(Y/n): ",
            Some(false) | None => "(y/N): ",
        };

        match prompt_line(&format!("{} {}", prompt, suffix))?.to_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}

fn prompt_line(prompt: &str) -> io::Result<String> {
    let mut input = String::new();
    print!("{}", prompt);
    io::stdout().flush()?;
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_lowercase())
}
