pub mod classify;
pub mod config;
pub mod cycle;
pub mod engine;
pub mod extract;
pub mod multiplier;
pub mod notify;
pub mod page;
pub mod parse;
pub mod reporter;
pub mod state;
pub mod types;
pub mod webdriver;

/// Live statistics dashboard for the wheel show.
pub const DASHBOARD_URL: &str = "https://casinoscores.com/crazy-time/";

/// Telegram Bot API base URL.
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
