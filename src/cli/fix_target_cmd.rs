//! `dktool fix-target` — register missing DungeonKitTests sources.
//!
//! Runs the manifest patcher against the fixed test-file list and reports
//! per-entry outcomes the way the one-shot repair script did.

use crate::cli::output::{self, Styled};
use crate::pbxproj::{self, RegisterOutcome};
use anyhow::Result;
use serde_json::json;
use std::path::Path;

/// Run the fix-target command.
pub async fn run(project: &Path) -> Result<()> {
    let quiet = output::is_quiet();
    let json_mode = output::is_json();
    let s = Styled::new();

    let reports = pbxproj::run(project, pbxproj::TEST_FILES)?;

    if json_mode {
        output::print_json(&json!({
            "project": project.display().to_string(),
            "files": reports
                .iter()
                .map(|r| {
                    json!({
                        "file": r.file_name,
                        "outcome": match r.outcome {
                            RegisterOutcome::Added => "added",
                            RegisterOutcome::AlreadyPresent => "already_present",
                            RegisterOutcome::SourceMissing => "source_missing",
                        },
                    })
                })
                .collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    if !quiet {
        println!();
        for r in &reports {
            match r.outcome {
                RegisterOutcome::Added => {
                    println!("  {} {:<28} added", s.ok_sym(), r.file_name);
                }
                RegisterOutcome::AlreadyPresent => {
                    println!("  {} {:<28} already in project", s.skip_sym(), r.file_name);
                }
                RegisterOutcome::SourceMissing => {
                    println!(
                        "  {} {:<28} source file missing, skipped",
                        s.warn_sym(),
                        r.file_name
                    );
                }
            }
        }
        println!();
        println!("  {} Project file updated.", s.ok_sym());
        println!("  Run 'xcodebuild clean' to ensure changes take effect.");
    }

    Ok(())
}
