use crate::types::{GameVariant, SpinOutcome};

/// Counter element id fragments, matched case-sensitively in order.
const COUNTER_ID_PATTERNS: &[(&str, GameVariant)] = &[
    ("Crazy", GameVariant::CrazyTime),
    ("Cash", GameVariant::CashHunt),
    ("Pachinko", GameVariant::Pachinko),
    ("CoinFlip", GameVariant::CoinFlip),
];

/// Result image filename fragments, matched case-insensitively in order.
/// The dashboard spells the Pachinko asset `pachiko`.
const IMAGE_SRC_PATTERNS: &[(&str, GameVariant)] = &[
    ("pachiko", GameVariant::Pachinko),
    ("pachinko", GameVariant::Pachinko),
    ("crazy-time", GameVariant::CrazyTime),
    ("cash-hunt", GameVariant::CashHunt),
    ("coin-flip", GameVariant::CoinFlip),
];

/// Classify a counter by the id of its enclosing group (e.g. `tooltip-CrazyBonus`).
pub fn classify_counter_id(id: &str) -> SpinOutcome {
    first_match(COUNTER_ID_PATTERNS, id)
}

/// Classify a history row by its result image source.
pub fn classify_image_src(src: &str) -> SpinOutcome {
    first_match(IMAGE_SRC_PATTERNS, &src.to_lowercase())
}

fn first_match(table: &[(&str, GameVariant)], haystack: &str) -> SpinOutcome {
    table
        .iter()
        .find(|(pattern, _)| haystack.contains(pattern))
        .map_or(SpinOutcome::Numbered, |&(_, game)| SpinOutcome::Bonus(game))
}
