use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use wheelwatch::config::{AppConfig, CONFIG_PATH};
use wheelwatch::cycle::run_cycle;
use wheelwatch::notify::{Notifier, TelegramNotifier};
use wheelwatch::state::RecordWatermark;
use wheelwatch::types::format_multiplier;
use wheelwatch::webdriver::WebDriverPage;

#[derive(Parser)]
#[command(name = "wheelwatch", about = "Wheel show bonus drought and record multiplier monitor")]
struct Args {
    /// Path to the TOML config file (defaults apply if it does not exist)
    #[arg(long, default_value = CONFIG_PATH)]
    config: PathBuf,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            warn!("Failed to read .env: {e}");
        }
    }

    let mut config = AppConfig::load_or_default(&args.config)?;
    config.apply_env()?;
    info!("Loaded config from {}", args.config.display());

    let settings = config.settings.clone();
    if settings.alert_threshold == 0 {
        warn!("alert_threshold is 0: every known counter will alert");
    }

    let notifier = match config.telegram.credentials() {
        Some((token, chat_id)) => Some(TelegramNotifier::new(token, chat_id)?),
        None => {
            warn!(
                "Telegram not configured (set BOT_TOKEN and CHAT_ID); reports will only be printed"
            );
            None
        }
    };

    info!(
        "Starting wheelwatch — url={} threshold={} rows={} poll={}s",
        config.page.url,
        settings.alert_threshold,
        settings.history_rows,
        settings.poll_interval_secs,
    );

    let mut page = WebDriverPage::open(&config.page).await?;
    info!("WebDriver session open at {}", config.page.webdriver_url);

    let mut watermark = RecordWatermark::new();
    let poll_duration = settings.poll_interval();

    loop {
        info!("Running cycle at {}", chrono::Local::now().format("%a %b %e %H:%M:%S %Y"));
        match run_cycle(
            &mut page,
            notifier.as_ref().map(|n| n as &dyn Notifier),
            &mut watermark,
            &settings,
        )
        .await
        {
            Ok(outcome) => {
                if outcome.new_record {
                    info!(
                        "Record watermark raised to x{}",
                        format_multiplier(watermark.highest_value)
                    );
                }
            }
            Err(e) => {
                warn!("Cycle error: {e:#}");
                if let Err(e) = page.reconnect().await {
                    warn!("WebDriver reconnect failed: {e:#}");
                }
            }
        }

        if args.once {
            break;
        }

        info!("Sleeping for {}s...", poll_duration.as_secs());
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
            _ = tokio::time::sleep(poll_duration) => {}
        }
    }

    page.close().await;
    Ok(())
}
