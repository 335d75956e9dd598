//! `dktool scrape` — discover current-season dungeon links.
//!
//! Launches headless Chromium, walks the fixed source list, and prints
//! the resulting mapping.

use crate::cli::output::{self, Styled};
use crate::renderer::chromium::ChromiumRenderer;
use crate::renderer::Renderer;
use crate::scrape;
use anyhow::Result;

/// Run the scrape command.
pub async fn run(timeout_ms: u64) -> Result<()> {
    let quiet = output::is_quiet();
    let json_mode = output::is_json();
    let s = Styled::new();

    let renderer = ChromiumRenderer::new().await?;
    let result = scrape::run_with_renderer(&renderer, scrape::SOURCES, timeout_ms).await;
    renderer.shutdown().await?;
    let records = result?;

    if json_mode {
        output::print_json(&serde_json::to_value(&records)?);
        return Ok(());
    }

    if !quiet {
        println!();
        println!("=== SCRAPED DUNGEON DATA ===");
        println!("{}", serde_json::to_string_pretty(&records)?);
        if records.is_empty() {
            println!();
            println!(
                "  {} No dungeons found across {} sources.",
                s.warn_sym(),
                scrape::SOURCES.len()
            );
        }
    }

    Ok(())
}
