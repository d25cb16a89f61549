use crate::types::{GameVariant, MultiplierRecord, SpinOutcome, format_multiplier};

/// Highest multiplier seen since the process started.
///
/// Owned by the supervisor and handed to each cycle by `&mut`. The value never
/// decreases; a tie keeps the earlier game and timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordWatermark {
    pub highest_value: f64,
    pub game: Option<GameVariant>,
    pub timestamp: Option<String>,
}

impl RecordWatermark {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the record if `outcome` is a bonus game and `value` beats it.
    ///
    /// Returns `true` when the watermark moved.
    pub fn consider(&mut self, outcome: SpinOutcome, value: f64, timestamp: &str) -> bool {
        let SpinOutcome::Bonus(game) = outcome else {
            return false;
        };
        if value > self.highest_value {
            self.highest_value = value;
            self.game = Some(game);
            self.timestamp = Some(timestamp.to_string());
            true
        } else {
            false
        }
    }

    pub fn consider_record(&mut self, record: &MultiplierRecord) -> bool {
        self.consider(SpinOutcome::Bonus(record.game), record.value, &record.observed_at)
    }

    /// The "highest so far" line, present once anything above zero was seen.
    pub fn summary_line(&self) -> Option<String> {
        if self.highest_value <= 0.0 {
            return None;
        }
        let game = self.game.map_or("Unknown", GameVariant::display_name);
        let at = self.timestamp.as_deref().unwrap_or("unknown time");
        Some(format!(
            "🏆 HIGHEST MULTIPLIER so far: {game} x{} at {at}",
            format_multiplier(self.highest_value)
        ))
    }
}
