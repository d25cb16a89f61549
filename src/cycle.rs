use anyhow::Result;
use tracing::{info, warn};

use crate::config::SettingsConfig;
use crate::engine::{compute_alerts, compute_probabilities};
use crate::extract::{PageSnapshot, SpinState, extract_counters, extract_history};
use crate::notify::Notifier;
use crate::page::{PageSource, load_snapshot};
use crate::reporter::{self, Report};
use crate::state::RecordWatermark;
use crate::types::format_multiplier;

/// What became of the composed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Sent { status: u16 },
    NotConfigured,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CycleOutcome {
    pub message: String,
    pub new_record: bool,
    pub delivery: Delivery,
}

/// Fold one snapshot into the watermark and build the report.
///
/// History rows are considered in page order against the running watermark,
/// so a later row in the same cycle can still beat an earlier one.
pub fn evaluate(
    snapshot: &PageSnapshot,
    watermark: &mut RecordWatermark,
    settings: &SettingsConfig,
    cycle_timestamp: &str,
) -> (Report, bool) {
    let counters = extract_counters(&snapshot.counters);
    let spins = SpinState::from_observations(&counters);

    let mut new_record = false;
    for obs in extract_history(&snapshot.rows, settings.history_rows, cycle_timestamp) {
        if let Some(record) = obs.record()
            && watermark.consider_record(&record)
        {
            info!(
                "New record: {} x{} at {}",
                record.game,
                format_multiplier(record.value),
                record.observed_at
            );
            new_record = true;
        }
    }

    let alerts = compute_alerts(&spins, settings.alert_threshold);
    let probabilities = settings
        .show_probabilities
        .then(|| compute_probabilities(&spins));
    let report = Report::compose(&spins, alerts, watermark.summary_line(), probabilities);
    (report, new_record)
}

/// One polling cycle: load, read, evaluate, print, deliver.
///
/// Page errors abort the cycle before the watermark is touched. Delivery
/// errors are logged and reported in the outcome; the watermark keeps any
/// update made this cycle either way.
pub async fn run_cycle(
    page: &mut dyn PageSource,
    notifier: Option<&dyn Notifier>,
    watermark: &mut RecordWatermark,
    settings: &SettingsConfig,
) -> Result<CycleOutcome> {
    let snapshot = load_snapshot(page, settings.history_rows).await?;

    let timestamp = chrono::Utc::now().to_rfc3339();
    let (report, new_record) = evaluate(&snapshot, watermark, settings, &timestamp);
    if !report.alerts.is_empty() {
        info!("{} drought alert(s) this cycle", report.alerts.len());
    }

    let message = report.render();
    reporter::print_report(&message);

    let delivery = match notifier {
        None => {
            warn!("Telegram not configured (BOT_TOKEN / CHAT_ID missing); skipping delivery");
            Delivery::NotConfigured
        }
        Some(n) => match n.send(&message).await {
            Ok(status) => {
                info!("Telegram response: {status}");
                Delivery::Sent { status }
            }
            Err(e) => {
                warn!("Telegram error: {e:#}");
                Delivery::Failed(format!("{e:#}"))
            }
        },
    };

    Ok(CycleOutcome {
        message,
        new_record,
        delivery,
    })
}
