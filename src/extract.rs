use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::{classify_counter_id, classify_image_src};
use crate::multiplier::aggregate_multiplier;
use crate::parse::normalize_spins;
use crate::types::{GameVariant, MultiplierRecord, SpinCount, SpinOutcome};

/// Counter tooltips carry a title, a landings line and the spins line.
const MIN_COUNTER_LINES: usize = 3;

/// Raw text of one counter tooltip and the id of its enclosing group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CounterFragment {
    pub group_id: Option<String>,
    pub text: String,
}

/// Raw cell values of one spin-history row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowFragment {
    pub date_parts: Vec<String>,
    pub time_text: Option<String>,
    pub image_src: Option<String>,
    pub badges: Vec<String>,
}

/// Everything read from the page in one cycle, before interpretation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub counters: Vec<CounterFragment>,
    pub rows: Vec<RowFragment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CounterObservation {
    pub game: GameVariant,
    pub spins_since_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryObservation {
    pub outcome: SpinOutcome,
    pub observed_at: String,
    pub multiplier_tokens: Vec<String>,
}

impl HistoryObservation {
    /// The multiplier event for this row, if it was a bonus game.
    pub fn record(&self) -> Option<MultiplierRecord> {
        let game = self.outcome.game()?;
        Some(MultiplierRecord {
            game,
            value: aggregate_multiplier(game, &self.multiplier_tokens),
            observed_at: self.observed_at.clone(),
        })
    }
}

/// Counters with a recognised group id and a complete tooltip.
pub fn extract_counters(fragments: &[CounterFragment]) -> Vec<CounterObservation> {
    fragments
        .iter()
        .filter_map(|frag| {
            let id = frag.group_id.as_deref()?;
            let SpinOutcome::Bonus(game) = classify_counter_id(id) else {
                debug!("Ignoring counter group {id:?}");
                return None;
            };
            let lines: Vec<&str> = frag
                .text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect();
            if lines.len() < MIN_COUNTER_LINES {
                debug!("Incomplete tooltip for {game}: {} line(s)", lines.len());
                return None;
            }
            Some(CounterObservation {
                game,
                spins_since_text: lines[lines.len() - 1].to_string(),
            })
        })
        .collect()
}

/// The first `limit` history rows, newest first as the page lists them.
///
/// Rows without a readable date/time are stamped with `fallback_timestamp`.
pub fn extract_history(
    rows: &[RowFragment],
    limit: usize,
    fallback_timestamp: &str,
) -> Vec<HistoryObservation> {
    rows.iter()
        .take(limit)
        .map(|row| {
            let stamp = row
                .date_parts
                .iter()
                .map(|s| s.trim())
                .chain(row.time_text.as_deref().map(str::trim))
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            let observed_at = if stamp.is_empty() {
                fallback_timestamp.to_string()
            } else {
                stamp
            };
            let outcome = row
                .image_src
                .as_deref()
                .map_or(SpinOutcome::Numbered, classify_image_src);
            HistoryObservation {
                outcome,
                observed_at,
                multiplier_tokens: row.badges.iter().map(|b| b.trim().to_string()).collect(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
struct SpinEntry {
    text: String,
    count: SpinCount,
}

/// Per-game drought, rebuilt from scratch every cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpinState {
    entries: HashMap<GameVariant, SpinEntry>,
}

impl SpinState {
    /// Build from counter observations; a later observation for the same game wins.
    pub fn from_observations(observations: &[CounterObservation]) -> Self {
        let mut state = Self::default();
        for obs in observations {
            state.set(obs.game, obs.spins_since_text.clone());
        }
        state
    }

    pub fn set(&mut self, game: GameVariant, text: String) {
        let count = normalize_spins(&text);
        self.entries.insert(game, SpinEntry { text, count });
    }

    pub fn count(&self, game: GameVariant) -> SpinCount {
        self.entries
            .get(&game)
            .map_or(SpinCount::Unknown, |e| e.count)
    }

    /// The counter line as shown on the page, or `Unknown` if absent.
    pub fn display_text(&self, game: GameVariant) -> &str {
        self.entries.get(&game).map_or("Unknown", |e| e.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(id: &str, text: &str) -> CounterFragment {
        CounterFragment {
            group_id: Some(id.to_string()),
            text: text.to_string(),
        }
    }

    fn row(src: &str, badges: &[&str]) -> RowFragment {
        RowFragment {
            date_parts: vec!["14".to_string(), "Oct".to_string()],
            time_text: Some("12:34".to_string()),
            image_src: Some(src.to_string()),
            badges: badges.iter().map(|b| b.to_string()).collect(),
        }
    }

    // ── extract_counters ───────────────────────────────────────────

    #[test]
    fn counters_take_last_line() {
        let frags = vec![counter(
            "tooltip-CrazyBonus",
            "Crazy Time\n\n  Lands 1 in 54 \n 250 spins since \n",
        )];
        let obs = extract_counters(&frags);
        assert_eq!(
            obs,
            vec![CounterObservation {
                game: GameVariant::CrazyTime,
                spins_since_text: "250 spins since".to_string(),
            }]
        );
    }

    #[test]
    fn counters_drop_unknown_and_incomplete() {
        let frags = vec![
            counter("tooltip-Number1", "1\nLands\n3 spins since"),
            counter("tooltip-CashHunt", "Cash Hunt\n12 spins since"),
            CounterFragment {
                group_id: None,
                text: "Pachinko\nLands\n3 spins since".to_string(),
            },
        ];
        assert!(extract_counters(&frags).is_empty());
    }

    // ── extract_history ────────────────────────────────────────────

    #[test]
    fn history_respects_limit_and_classifies() {
        let rows: Vec<_> = (0..15).map(|_| row("/img/number-2.png", &["2X"])).collect();
        let obs = extract_history(&rows, 10, "now");
        assert_eq!(obs.len(), 10);
        assert!(obs.iter().all(|o| o.outcome == SpinOutcome::Numbered));
        assert!(obs.iter().all(|o| o.record().is_none()));
    }

    #[test]
    fn history_timestamp_and_record() {
        let obs = extract_history(&[row("/img/cash-hunt.png", &[" 5X -- 100X "])], 10, "now");
        assert_eq!(obs[0].observed_at, "14 Oct 12:34");
        let record = obs[0].record().expect("bonus row");
        assert_eq!(record.game, GameVariant::CashHunt);
        assert_eq!(record.value, 52.5);
    }

    #[test]
    fn history_falls_back_to_cycle_time() {
        let bare = RowFragment {
            image_src: Some("coin-flip.png".to_string()),
            badges: vec!["4X".to_string()],
            ..RowFragment::default()
        };
        let obs = extract_history(&[bare], 10, "2026-10-14T10:00:00+00:00");
        assert_eq!(obs[0].observed_at, "2026-10-14T10:00:00+00:00");
    }

    #[test]
    fn history_missing_image_is_numbered() {
        let bare = RowFragment::default();
        let obs = extract_history(&[bare], 10, "now");
        assert_eq!(obs[0].outcome, SpinOutcome::Numbered);
    }

    // ── SpinState ──────────────────────────────────────────────────

    #[test]
    fn spin_state_later_observation_wins() {
        let obs = vec![
            CounterObservation {
                game: GameVariant::Pachinko,
                spins_since_text: "10 spins since".to_string(),
            },
            CounterObservation {
                game: GameVariant::Pachinko,
                spins_since_text: "Latest Spin".to_string(),
            },
        ];
        let s = SpinState::from_observations(&obs);
        assert_eq!(s.count(GameVariant::Pachinko), SpinCount::Unknown);
        assert_eq!(s.display_text(GameVariant::Pachinko), "Latest Spin");
        assert_eq!(s.display_text(GameVariant::CoinFlip), "Unknown");
    }
}
