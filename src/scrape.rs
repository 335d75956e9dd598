// Copyright 2026 HealerKit Contributors
// SPDX-License-Identifier: Apache-2.0

//! Best-effort discovery of current-season dungeon names and links.
//!
//! Drives one browser page through a fixed, ordered list of candidate
//! sources. The first source whose rendered HTML carries a season marker
//! AND yields at least one qualifying anchor wins; later sources are never
//! visited. Every per-source error is non-fatal: it is logged and the loop
//! advances. Exhausting the list is a normal empty-result outcome.
//!
//! Extraction itself is synchronous — the `scraper` crate's types are
//! `!Send`, so the parsed document must never be held across an await
//! point.

use crate::renderer::{RenderContext, Renderer};
use anyhow::Result;
use scraper::{Html, Selector};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{info, warn};

/// Candidate source pages, tried in order until one yields matches.
pub const SOURCES: &[&str] = &[
    "https://www.wowhead.com/guides/dungeons",
    "https://www.icy-veins.com/wow/",
    "https://wowpedia.fandom.com/wiki/Dungeon",
];

/// Default per-source navigation timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Markers that indicate a page covers the current content season.
const SEASON_MARKERS: &[&str] = &["War Within", "Season 3"];

/// Name fragments of the current-season dungeon rotation.
const DUNGEON_NAMES: &[&str] = &[
    "Ara-Kara",
    "Dawnbreaker",
    "Eco-Dome",
    "Operation",
    "Priory",
    "Tazavesh",
];

/// Only the first few matching anchors are considered per page.
const ANCHOR_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Navigation failure, timeout, or DOM read failure for one source.
    /// Always non-fatal; the scraper advances to the next source.
    #[error("source {url} unavailable: {reason}")]
    SourceUnavailable { url: String, reason: String },
}

/// A discovered dungeon link, keyed in the result map by the anchor's
/// visible text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DungeonRecord {
    /// The anchor's href, as written on the page (may be relative).
    pub url: String,
    /// The source page the anchor was found on.
    pub source: String,
}

/// Result mapping: visible anchor text to its record. BTreeMap for a
/// deterministic print order.
pub type DungeonMap = BTreeMap<String, DungeonRecord>;

/// True when the page's HTML carries any of the season markers.
pub fn page_is_relevant(html: &str) -> bool {
    SEASON_MARKERS.iter().any(|m| html.contains(m))
}

/// Extract dungeon records from rendered HTML.
///
/// Considers only the first [`ANCHOR_LIMIT`] anchors whose `href` contains
/// `dungeon`, then keeps those whose visible text contains one of the
/// known name fragments. A later anchor with the same visible text
/// overwrites the earlier record.
pub fn extract_records(html: &str, source_url: &str) -> DungeonMap {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse(r#"a[href*="dungeon"]"#).expect("dungeon anchor selector is valid");

    let mut records = DungeonMap::new();
    for link in document.select(&selector).take(ANCHOR_LIMIT) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let text = element_text(&link);
        if DUNGEON_NAMES.iter().any(|name| text.contains(name)) {
            records.insert(
                text,
                DungeonRecord {
                    url: href.to_string(),
                    source: source_url.to_string(),
                },
            );
        }
    }
    records
}

/// Run the scraper against `sources` using the given renderer.
///
/// One context is used for the whole run and closed before returning.
/// Exhaustion without a match returns an empty map, not an error.
pub async fn run_with_renderer(
    renderer: &dyn Renderer,
    sources: &[&str],
    timeout_ms: u64,
) -> Result<DungeonMap> {
    let mut ctx = renderer.new_context().await?;

    let mut records = DungeonMap::new();
    for url in sources {
        info!("trying {url}...");
        match visit(ctx.as_mut(), url, timeout_ms).await {
            Ok(found) if !found.is_empty() => {
                info!("found {} dungeons from {url}", found.len());
                records = found;
                break;
            }
            Ok(_) => {
                info!("no dungeons found at {url}");
            }
            Err(e) => {
                warn!("{e}");
            }
        }
    }

    ctx.close().await?;
    Ok(records)
}

/// Visit one source: navigate, read the HTML, gate on the season markers,
/// extract. Any failure along the way maps to `SourceUnavailable`.
async fn visit(
    ctx: &mut dyn RenderContext,
    url: &str,
    timeout_ms: u64,
) -> Result<DungeonMap, ScrapeError> {
    visit_inner(ctx, url, timeout_ms)
        .await
        .map_err(|e| ScrapeError::SourceUnavailable {
            url: url.to_string(),
            reason: format!("{e:#}"),
        })
}

async fn visit_inner(ctx: &mut dyn RenderContext, url: &str, timeout_ms: u64) -> Result<DungeonMap> {
    ctx.navigate(url, timeout_ms).await?;
    let html = ctx.html().await?;

    if !page_is_relevant(&html) {
        return Ok(DungeonMap::new());
    }
    Ok(extract_records(&html, url))
}

/// Collect an element's visible text, trimmed and whitespace-collapsed.
fn element_text(el: &scraper::ElementRef<'_>) -> String {
    el.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    const SEASON_PAGE: &str = r#"<html><body>
        <h1>Season 3 Dungeon Guides</h1>
        <a href="/guide/dungeons/ara-kara">Ara-Kara, City of Echoes</a>
        <a href="/guide/dungeons/dawnbreaker">The Dawnbreaker</a>
        <a href="/news/dungeon-roundup">Weekly Roundup</a>
        <a href="/guide/dungeons/priory">Priory of the Sacred Flame</a>
        <a href="/guide/dungeons/tazavesh">Tazavesh, the Veiled Market</a>
        <a href="/guide/dungeons/eco-dome">Eco-Dome Al'dani</a>
        <a href="/guide/dungeons/operation">Operation: Floodgate</a>
    </body></html>"#;

    /// Stub renderer serving canned HTML (or an error) per URL, recording
    /// the order of visits.
    struct StubRenderer {
        pages: HashMap<String, Result<String, String>>,
        visited: Arc<Mutex<Vec<String>>>,
    }

    impl StubRenderer {
        fn new(pages: Vec<(&str, Result<&str, &str>)>) -> Self {
            Self {
                pages: pages
                    .into_iter()
                    .map(|(url, page)| {
                        (
                            url.to_string(),
                            page.map(str::to_string).map_err(str::to_string),
                        )
                    })
                    .collect(),
                visited: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn visited(&self) -> Vec<String> {
            self.visited.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Renderer for StubRenderer {
        async fn new_context(&self) -> anyhow::Result<Box<dyn RenderContext>> {
            Ok(Box::new(StubContext {
                pages: self.pages.clone(),
                visited: Arc::clone(&self.visited),
                current: None,
            }))
        }

        async fn shutdown(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct StubContext {
        pages: HashMap<String, Result<String, String>>,
        visited: Arc<Mutex<Vec<String>>>,
        current: Option<String>,
    }

    #[async_trait]
    impl RenderContext for StubContext {
        async fn navigate(&mut self, url: &str, _timeout_ms: u64) -> anyhow::Result<()> {
            self.visited.lock().unwrap().push(url.to_string());
            match self.pages.get(url) {
                Some(Ok(html)) => {
                    self.current = Some(html.clone());
                    Ok(())
                }
                Some(Err(reason)) => anyhow::bail!("navigation failed: {reason}"),
                None => anyhow::bail!("navigation failed: unknown url"),
            }
        }

        async fn html(&self) -> anyhow::Result<String> {
            self.current
                .clone()
                .ok_or_else(|| anyhow::anyhow!("no page loaded"))
        }

        async fn close(self: Box<Self>) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn extract_keeps_only_named_dungeons_within_anchor_limit() {
        let records = extract_records(SEASON_PAGE, "https://example.test/guides");

        // Seven anchors with dungeon hrefs; only the first five are
        // considered. Of those, "Weekly Roundup" fails the name filter and
        // the last two anchors are never looked at.
        assert_eq!(records.len(), 4);
        assert!(records.contains_key("Ara-Kara, City of Echoes"));
        assert!(records.contains_key("The Dawnbreaker"));
        assert!(records.contains_key("Priory of the Sacred Flame"));
        assert!(records.contains_key("Tazavesh, the Veiled Market"));
        assert!(!records.contains_key("Eco-Dome Al'dani"));
        assert!(!records.contains_key("Operation: Floodgate"));

        let rec = &records["The Dawnbreaker"];
        assert_eq!(rec.url, "/guide/dungeons/dawnbreaker");
        assert_eq!(rec.source, "https://example.test/guides");
    }

    #[test]
    fn relevance_gate_requires_season_markers() {
        assert!(page_is_relevant("<p>Season 3 loot table</p>"));
        assert!(page_is_relevant("<p>The War Within dungeons</p>"));
        assert!(!page_is_relevant("<p>Classic dungeon rankings</p>"));
    }

    #[test]
    fn extract_collapses_whitespace_in_anchor_text() {
        let html = r#"<a href="/dungeon/x">  The
            Dawnbreaker  </a>"#;
        let records = extract_records(html, "src");
        assert!(records.contains_key("The Dawnbreaker"));
    }

    #[tokio::test]
    async fn first_successful_source_wins() {
        let empty = "<html><body><p>Season 3</p></body></html>";
        let renderer = StubRenderer::new(vec![
            ("https://a.test/", Ok(empty)),
            ("https://b.test/", Ok(SEASON_PAGE)),
            ("https://c.test/", Ok(SEASON_PAGE)),
        ]);
        let sources = ["https://a.test/", "https://b.test/", "https://c.test/"];

        let records = run_with_renderer(&renderer, &sources, 1_000)
            .await
            .unwrap();

        assert_eq!(records.len(), 4);
        assert!(records.values().all(|r| r.source == "https://b.test/"));
        // Third source never visited once the second yields records.
        assert_eq!(renderer.visited(), vec!["https://a.test/", "https://b.test/"]);
    }

    #[tokio::test]
    async fn navigation_errors_advance_to_the_next_source() {
        let renderer = StubRenderer::new(vec![
            ("https://a.test/", Err("connection refused")),
            ("https://b.test/", Ok(SEASON_PAGE)),
        ]);
        let sources = ["https://a.test/", "https://b.test/"];

        let records = run_with_renderer(&renderer, &sources, 1_000)
            .await
            .unwrap();

        assert_eq!(records.len(), 4);
        assert!(records.values().all(|r| r.source == "https://b.test/"));
    }

    #[tokio::test]
    async fn exhausted_sources_yield_empty_map_not_error() {
        let renderer = StubRenderer::new(vec![
            ("https://a.test/", Err("timeout")),
            ("https://b.test/", Ok("<p>Classic dungeons</p>")),
            ("https://c.test/", Err("dns failure")),
        ]);
        let sources = ["https://a.test/", "https://b.test/", "https://c.test/"];

        let records = run_with_renderer(&renderer, &sources, 1_000)
            .await
            .unwrap();

        assert!(records.is_empty());
        assert_eq!(renderer.visited().len(), 3);
    }
}
