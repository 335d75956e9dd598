// Copyright 2026 HealerKit Contributors
// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code, unused_imports)]

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

mod cli;
mod pbxproj;
mod renderer;
mod scrape;

#[derive(Parser)]
#[command(
    name = "dktool",
    about = "dktool — maintenance tools for the HealerKit project",
    version,
    after_help = "Run 'dktool <command> --help' for details on each command."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register missing DungeonKitTests sources in the Xcode project manifest
    FixTarget {
        /// Path to the project manifest
        #[arg(long, default_value = pbxproj::DEFAULT_PROJECT_FILE)]
        project: PathBuf,
    },
    /// Scrape current-season dungeon names and links from known sources
    Scrape {
        /// Per-source navigation timeout in milliseconds
        #[arg(long, default_value_t = scrape::DEFAULT_TIMEOUT_MS)]
        timeout: u64,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global flags via environment variables so all modules can check them
    if cli.json {
        std::env::set_var("DKTOOL_JSON", "1");
    }
    if cli.quiet {
        std::env::set_var("DKTOOL_QUIET", "1");
    }
    if cli.verbose {
        std::env::set_var("DKTOOL_VERBOSE", "1");
    }
    if cli.no_color {
        std::env::set_var("DKTOOL_NO_COLOR", "1");
    }

    let level = if cli.verbose { "dktool=debug" } else { "dktool=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(level.parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::FixTarget { project } => cli::fix_target_cmd::run(&project).await,
        Commands::Scrape { timeout } => cli::scrape_cmd::run(timeout).await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "dktool", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if !cli::output::is_quiet() && !cli::output::is_json() {
            eprintln!("  Error: {e:#}");
        }
        if cli::output::is_json() {
            cli::output::print_json(&serde_json::json!({
                "error": true,
                "message": format!("{e:#}"),
            }));
        }
        std::process::exit(1);
    }

    result
}
