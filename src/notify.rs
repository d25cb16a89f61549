use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use crate::TELEGRAM_API_BASE;

/// Per-request timeout for the Bot API.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum retry attempts for transient errors.
const MAX_RETRIES: u32 = 3;

/// Base backoff delay for retries (doubles each attempt).
const BASE_BACKOFF: Duration = Duration::from_millis(500);

/// Outbound message channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `text`, returning the HTTP status of the final attempt.
    async fn send(&self, text: &str) -> Result<u16>;
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Telegram Bot API `sendMessage` client.
pub struct TelegramNotifier {
    client: reqwest::Client,
    endpoint: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(bot_token: &str, chat_id: &str) -> Result<Self> {
        Self::with_base(TELEGRAM_API_BASE, bot_token, chat_id)
    }

    pub fn with_base(api_base: &str, bot_token: &str, chat_id: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoint: format!("{}/bot{bot_token}/sendMessage", api_base.trim_end_matches('/')),
            chat_id: chat_id.to_string(),
        })
    }

    async fn post_once(&self, text: &str) -> reqwest::Result<reqwest::StatusCode> {
        let body = SendMessage {
            chat_id: &self.chat_id,
            text,
        };
        let resp = self.client.post(&self.endpoint).json(&body).send().await?;
        Ok(resp.status())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<u16> {
        let mut attempt = 0;
        loop {
            let outcome = self.post_once(text).await;
            let retryable = match &outcome {
                Ok(status) => is_transient_status(status.as_u16()),
                Err(e) => e.is_timeout() || e.is_connect(),
            };
            if retryable && attempt < MAX_RETRIES {
                let delay = BASE_BACKOFF * 2u32.pow(attempt);
                attempt += 1;
                match &outcome {
                    Ok(status) => warn!(
                        "Telegram returned {status}, retry {attempt}/{MAX_RETRIES} in {delay:?}"
                    ),
                    Err(e) => warn!(
                        "Telegram send failed: {e}, retry {attempt}/{MAX_RETRIES} in {delay:?}"
                    ),
                }
                tokio::time::sleep(delay).await;
                continue;
            }
            let status = outcome.context("Telegram sendMessage failed")?;
            if !status.is_success() {
                warn!("Telegram rejected message: {status}");
            }
            return Ok(status.as_u16());
        }
    }
}

/// Rate limiting and server-side errors are worth another attempt.
fn is_transient_status(status: u16) -> bool {
    status == 429 || (500..=599).contains(&status)
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use super::*;

    /// Local HTTP server answering successive requests with `statuses`.
    ///
    /// Returns the base URL and a counter of accepted requests.
    async fn canned_server(statuses: Vec<u16>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        tokio::spawn(async move {
            for status in statuses {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                read_request(&mut socket).await;
                counter.fetch_add(1, Ordering::SeqCst);
                let reply = format!(
                    "HTTP/1.1 {status} Canned\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
                );
                let _ = socket.write_all(reply.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        (format!("http://{addr}"), hits)
    }

    /// Drain one request (headers plus `content-length` body).
    async fn read_request(socket: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let Ok(n) = socket.read(&mut chunk).await else {
                return;
            };
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let body_len = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (name, value) = l.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + body_len {
                    return;
                }
            }
        }
    }

    // ── send retries ───────────────────────────────────────────────

    #[tokio::test]
    async fn transient_replies_are_retried_until_success() {
        let (base, hits) = canned_server(vec![500, 429, 200]).await;
        let n = TelegramNotifier::with_base(&base, "123:abc", "-1").unwrap();
        let status = n.send("hello").await.unwrap();
        assert_eq!(status, 200);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retries_stop_after_limit() {
        let (base, hits) = canned_server(vec![503; 5]).await;
        let n = TelegramNotifier::with_base(&base, "123:abc", "-1").unwrap();
        let status = n.send("hello").await.unwrap();
        assert_eq!(status, 503);
        assert_eq!(hits.load(Ordering::SeqCst), 1 + MAX_RETRIES as usize);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let (base, hits) = canned_server(vec![400, 200]).await;
        let n = TelegramNotifier::with_base(&base, "123:abc", "-1").unwrap();
        let status = n.send("hello").await.unwrap();
        assert_eq!(status, 400);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    // ── request shape ──────────────────────────────────────────────

    #[test]
    fn transient_statuses() {
        assert!(is_transient_status(429));
        assert!(is_transient_status(500));
        assert!(is_transient_status(503));
        assert!(!is_transient_status(200));
        assert!(!is_transient_status(400));
        assert!(!is_transient_status(401));
    }

    #[test]
    fn endpoint_layout() {
        let n = TelegramNotifier::with_base("https://api.example/", "123:abc", "-1").unwrap();
        assert_eq!(n.endpoint, "https://api.example/bot123:abc/sendMessage");
        assert_eq!(n.chat_id, "-1");
    }

    #[test]
    fn body_shape() {
        let body = SendMessage {
            chat_id: "-1",
            text: "hi",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"chat_id": "-1", "text": "hi"})
        );
    }
}
