use thiserror::Error;
use tracing::debug;

use crate::types::SpinCount;

/// Marker that identifies a counter line as a drought count.
const SPINS_SINCE_MARKER: &str = "spins since";

/// Separator between the bounds of a range badge (`5X -- 100X`).
const RANGE_SEPARATOR: &str = "--";

/// Why a piece of page text could not be read as a number.
///
/// These are expected on a live page and are recovered where they occur: a
/// failed spin line becomes `SpinCount::Unknown`, a failed badge is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("no \"spins since\" marker in {0:?}")]
    MissingSpinsMarker(String),
    #[error("invalid count {0:?}")]
    InvalidCount(String),
    #[error("no multiplier suffix in {0:?}")]
    MissingSuffix(String),
    #[error("not a range: {0:?}")]
    NotARange(String),
}

/// Parse a counter line shaped like `"123 spins since"`.
pub fn parse_spins_since(text: &str) -> Result<u32, ParseFailure> {
    if !text.contains(SPINS_SINCE_MARKER) {
        return Err(ParseFailure::MissingSpinsMarker(text.to_string()));
    }
    let token = text.split_whitespace().next().unwrap_or_default();
    token
        .parse::<u32>()
        .map_err(|_| ParseFailure::InvalidCount(token.to_string()))
}

/// Spin normalizer: never fails, unreadable lines become `Unknown`.
pub fn normalize_spins(text: &str) -> SpinCount {
    match parse_spins_since(text) {
        Ok(n) => SpinCount::Known(n),
        Err(e) => {
            debug!("Spin count unavailable: {e}");
            SpinCount::Unknown
        }
    }
}

/// Parse a single badge like `20X` or `7x`.
pub fn parse_single(token: &str) -> Result<u64, ParseFailure> {
    let lower = token.to_lowercase();
    if !lower.contains('x') {
        return Err(ParseFailure::MissingSuffix(token.to_string()));
    }
    parse_count(&lower.replace('x', ""))
}

pub fn is_range(token: &str) -> bool {
    token.contains(RANGE_SEPARATOR)
}

/// Parse a range badge like `5X -- 100X` into its midpoint.
pub fn parse_range_mean(token: &str) -> Result<f64, ParseFailure> {
    if !is_range(token) {
        return Err(ParseFailure::NotARange(token.to_string()));
    }
    let stripped = token.to_lowercase().replace('x', "");
    let mut bounds = stripped.split(RANGE_SEPARATOR);
    let low = parse_count(bounds.next().unwrap_or_default())?;
    let high = parse_count(bounds.next().unwrap_or_default())?;
    Ok((low as f64 + high as f64) / 2.0)
}

fn parse_count(raw: &str) -> Result<u64, ParseFailure> {
    let trimmed = raw.trim();
    trimmed
        .parse::<u64>()
        .map_err(|_| ParseFailure::InvalidCount(trimmed.to_string()))
}
