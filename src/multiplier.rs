use tracing::debug;

use crate::parse::{ParseFailure, is_range, parse_range_mean, parse_single};
use crate::types::GameVariant;

/// Reduce a history row's badge texts to a single multiplier for `game`.
///
/// - Crazy Time: the largest single badge.
/// - Cash Hunt: each token is tried as a range (midpoint) first, then as a
///   single badge; every accepted token overwrites the previous value.
/// - Pachinko / Coin Flip: the first single badge that parses.
///
/// Unreadable tokens are skipped. Returns 0 when nothing parses.
pub fn aggregate_multiplier<S: AsRef<str>>(game: GameVariant, tokens: &[S]) -> f64 {
    match game {
        GameVariant::CrazyTime => tokens
            .iter()
            .filter_map(|t| accept_single(t.as_ref()))
            .max()
            .map_or(0.0, |v| v as f64),
        GameVariant::CashHunt => {
            let mut value = 0.0;
            for token in tokens {
                let token = token.as_ref();
                let accepted = if is_range(token) {
                    accept(parse_range_mean(token))
                } else {
                    accept_single(token).map(|v| v as f64)
                };
                if let Some(v) = accepted {
                    value = v;
                }
            }
            value
        }
        GameVariant::Pachinko | GameVariant::CoinFlip => tokens
            .iter()
            .find_map(|t| accept_single(t.as_ref()))
            .map_or(0.0, |v| v as f64),
    }
}

fn accept_single(token: &str) -> Option<u64> {
    accept(parse_single(token))
}

fn accept<T>(parsed: Result<T, ParseFailure>) -> Option<T> {
    parsed.map_err(|e| debug!("Skipping badge: {e}")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // ── Crazy Time ──────────────────────────────────────────────────

    #[test]
    fn crazy_time_takes_max() {
        assert!(approx_eq(
            aggregate_multiplier(GameVariant::CrazyTime, &["5X", "20X", "3X"]),
            20.0
        ));
    }

    #[test]
    fn crazy_time_skips_garbage() {
        assert!(approx_eq(
            aggregate_multiplier(GameVariant::CrazyTime, &["Top Slot", "2x", "oops", "50x"]),
            50.0
        ));
        assert!(approx_eq(
            aggregate_multiplier(GameVariant::CrazyTime, &["nope"]),
            0.0
        ));
        let empty: [&str; 0] = [];
        assert!(approx_eq(aggregate_multiplier(GameVariant::CrazyTime, &empty), 0.0));
    }

    #[test]
    fn crazy_time_keeps_large_badges() {
        assert!(approx_eq(
            aggregate_multiplier(GameVariant::CrazyTime, &["5000000000X", "3X"]),
            5_000_000_000.0
        ));
    }

    // ── Cash Hunt ───────────────────────────────────────────────────

    #[test]
    fn cash_hunt_range_mean() {
        assert!(approx_eq(
            aggregate_multiplier(GameVariant::CashHunt, &["5X -- 100X"]),
            52.5
        ));
    }

    #[test]
    fn cash_hunt_later_tokens_overwrite() {
        // Single after range overwrites the range.
        assert!(approx_eq(
            aggregate_multiplier(GameVariant::CashHunt, &["5X -- 100X", "7X"]),
            7.0
        ));
        // Range after single overwrites the single.
        assert!(approx_eq(
            aggregate_multiplier(GameVariant::CashHunt, &["7X", "10X -- 20X"]),
            15.0
        ));
        // A broken range does not fall back to the single-value rule.
        assert!(approx_eq(
            aggregate_multiplier(GameVariant::CashHunt, &["7X", "10X -- ?"]),
            7.0
        ));
    }

    #[test]
    fn cash_hunt_nothing_parses() {
        assert!(approx_eq(
            aggregate_multiplier(GameVariant::CashHunt, &["Cash Hunt"]),
            0.0
        ));
    }

    // ── Pachinko / Coin Flip ────────────────────────────────────────

    #[test]
    fn pachinko_first_valid_wins() {
        assert!(approx_eq(
            aggregate_multiplier(GameVariant::Pachinko, &["bad", "15X", "99X"]),
            15.0
        ));
    }

    #[test]
    fn coin_flip_first_valid_wins() {
        assert!(approx_eq(
            aggregate_multiplier(GameVariant::CoinFlip, &["3X -- 9X", "4x", "10x"]),
            4.0
        ));
        assert!(approx_eq(
            aggregate_multiplier(GameVariant::CoinFlip, &["", "?"]),
            0.0
        ));
    }

    #[test]
    fn accepts_owned_tokens() {
        let tokens = vec!["8X".to_string(), "12X".to_string()];
        assert!(approx_eq(aggregate_multiplier(GameVariant::CrazyTime, &tokens), 12.0));
    }
}
