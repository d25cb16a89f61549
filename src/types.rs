use std::fmt;

/// Number of segments on the wheel.
pub const WHEEL_SEGMENTS: u32 = 54;

/// The four bonus games on the wheel. Numbered segments make up the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameVariant {
    CrazyTime,
    CashHunt,
    Pachinko,
    CoinFlip,
}

impl GameVariant {
    /// All variants in report order.
    pub const ALL: [GameVariant; 4] = [
        GameVariant::CrazyTime,
        GameVariant::CashHunt,
        GameVariant::Pachinko,
        GameVariant::CoinFlip,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            GameVariant::CrazyTime => "Crazy Time",
            GameVariant::CashHunt => "Cash Hunt",
            GameVariant::Pachinko => "Pachinko",
            GameVariant::CoinFlip => "Coin Flip",
        }
    }

    /// Segments of the wheel occupied by this game.
    pub fn segments(self) -> u32 {
        match self {
            GameVariant::CrazyTime => 1,
            GameVariant::CashHunt => 2,
            GameVariant::Pachinko => 2,
            GameVariant::CoinFlip => 4,
        }
    }

    /// A-priori chance of landing on this game on a single spin.
    pub fn base_probability(self) -> f64 {
        f64::from(self.segments()) / f64::from(WHEEL_SEGMENTS)
    }
}

impl fmt::Display for GameVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Result of classifying one spin or counter.
///
/// `Numbered` is the fallback for anything the classifier does not recognise;
/// such spins never contribute to multiplier tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpinOutcome {
    Bonus(GameVariant),
    Numbered,
}

impl SpinOutcome {
    pub fn game(self) -> Option<GameVariant> {
        match self {
            SpinOutcome::Bonus(game) => Some(game),
            SpinOutcome::Numbered => None,
        }
    }
}

/// Spins elapsed since a game last hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinCount {
    Known(u32),
    Unknown,
}

impl SpinCount {
    pub fn known(self) -> Option<u32> {
        match self {
            SpinCount::Known(n) => Some(n),
            SpinCount::Unknown => None,
        }
    }
}

/// One parsed multiplier event from the spin history.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiplierRecord {
    pub game: GameVariant,
    pub value: f64,
    pub observed_at: String,
}

/// Render a multiplier the way the dashboard does: `20`, `52.5`.
pub fn format_multiplier(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}
