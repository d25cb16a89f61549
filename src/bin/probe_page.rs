//! Probe: raw dashboard snapshot
//!
//! Opens the configured page once and prints what the extractor would see:
//! - Counter tooltips with their group ids
//! - The first history rows (date, time, result image, badges)
//! - The interpreted per-game counters and multiplier records

use std::path::Path;

use anyhow::Result;
use wheelwatch::config::{AppConfig, CONFIG_PATH};
use wheelwatch::extract::{SpinState, extract_counters, extract_history};
use wheelwatch::page::load_snapshot;
use wheelwatch::types::{GameVariant, format_multiplier};
use wheelwatch::webdriver::WebDriverPage;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load_or_default(Path::new(CONFIG_PATH))?;

    println!("=== Probe: dashboard snapshot ===");
    println!("Page: {}", config.page.url);
    println!();

    let mut page = WebDriverPage::open(&config.page).await?;
    let collected = load_snapshot(&mut page, config.settings.history_rows).await;
    page.close().await;
    let snapshot = collected?;

    println!("--- Raw snapshot ---");
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    println!();

    println!("--- Counters ---");
    let spins = SpinState::from_observations(&extract_counters(&snapshot.counters));
    for game in GameVariant::ALL {
        println!("{game}: {} ({:?})", spins.display_text(game), spins.count(game));
    }
    println!();

    println!("--- History ---");
    let now = chrono::Utc::now().to_rfc3339();
    for obs in extract_history(&snapshot.rows, config.settings.history_rows, &now) {
        match obs.record() {
            Some(r) => println!("{} x{} at {}", r.game, format_multiplier(r.value), r.observed_at),
            None => println!("numbered at {}", obs.observed_at),
        }
    }

    Ok(())
}
