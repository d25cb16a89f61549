use crate::extract::SpinState;
use crate::types::{GameVariant, SpinCount};

/// A game that has gone at least `threshold` spins without hitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alert {
    pub game: GameVariant,
    pub spins: u32,
}

impl Alert {
    pub fn line(&self) -> String {
        format!("⚠️ {} not appeared for {} spins!", self.game, self.spins)
    }
}

/// Drought-adjusted chance of a game landing on the next spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilityEstimate {
    pub game: GameVariant,
    pub base: f64,
    pub adjusted: f64,
    pub spins: SpinCount,
}

impl ProbabilityEstimate {
    pub fn line(&self) -> String {
        let pct = self.adjusted * 100.0;
        match self.spins {
            SpinCount::Known(n) => format!("{}: {pct:.2}% ({n} spins since)", self.game),
            SpinCount::Unknown => format!("{}: {pct:.2}% (base, last seen Unknown)", self.game),
        }
    }
}

/// Games whose known drought has reached `threshold`, in report order.
pub fn compute_alerts(spins: &SpinState, threshold: u32) -> Vec<Alert> {
    GameVariant::ALL
        .iter()
        .filter_map(|&game| match spins.count(game) {
            SpinCount::Known(n) if n >= threshold => Some(Alert { game, spins: n }),
            _ => None,
        })
        .collect()
}

/// `base * (1 + spins / 100)` per game, or `base` when the drought is unknown.
///
/// This is a heuristic boost, not a distribution: the adjusted values are not
/// renormalised and generally do not sum to anything meaningful.
pub fn compute_probabilities(spins: &SpinState) -> Vec<ProbabilityEstimate> {
    GameVariant::ALL
        .iter()
        .map(|&game| {
            let base = game.base_probability();
            let count = spins.count(game);
            let adjusted = match count {
                SpinCount::Known(n) => base * (1.0 + f64::from(n) / 100.0),
                SpinCount::Unknown => base,
            };
            ProbabilityEstimate {
                game,
                base,
                adjusted,
                spins: count,
            }
        })
        .collect()
}
