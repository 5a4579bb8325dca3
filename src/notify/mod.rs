// src/notify/mod.rs
//! Text-push channels. The engine only composes text; these deliver it.

pub mod slack;
pub mod telegram;

use anyhow::Result;
use metrics::counter;
use std::sync::Mutex;

use crate::bulletin::anon_hash;

pub use crate::notify::slack::SlackNotifier;
pub use crate::notify::telegram::TelegramNotifier;

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send_text(&self, text: &str) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Fallback channel: writes the message to the log only. The text itself is
/// only emitted at `debug`; `info` carries its hash.
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn send_text(&self, text: &str) -> Result<()> {
        tracing::info!(
            target: "notify",
            text_id = %anon_hash(text),
            chars = text.chars().count(),
            "message (log channel)"
        );
        tracing::debug!(target: "notify", "\n{text}");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Fan-out over every configured channel. A failing channel never stops the others.
pub struct NotifierMux {
    channels: Vec<Box<dyn Notifier>>,
}

impl NotifierMux {
    pub fn new(channels: Vec<Box<dyn Notifier>>) -> Self {
        Self { channels }
    }

    /// Telegram when `TELEGRAM_TOKEN` + `CHAT_ID` are set, Slack when
    /// `SLACK_WEBHOOK_URL` is set, log-only otherwise.
    pub fn from_env() -> Self {
        let mut channels: Vec<Box<dyn Notifier>> = Vec::new();
        if let Some(tg) = TelegramNotifier::from_env() {
            channels.push(Box::new(tg));
        }
        if let Some(slack) = SlackNotifier::from_env() {
            channels.push(Box::new(slack));
        }
        if channels.is_empty() {
            tracing::warn!(target: "notify", "no push channel configured, messages go to the log");
            channels.push(Box::new(LogNotifier));
        }
        Self { channels }
    }

    pub fn channel_names(&self) -> Vec<&'static str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    /// Returns how many channels accepted the message.
    pub async fn notify(&self, text: &str) -> usize {
        let mut delivered = 0usize;
        for ch in &self.channels {
            match ch.send_text(text).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!(target: "notify", channel = ch.name(), "send failed: {e:#}");
                    counter!("notify_errors_total").increment(1);
                }
            }
        }
        delivered
    }
}

// --- Test helper ---

/// Keeps every message in memory; optionally fails every send.
#[derive(Default)]
pub struct MemoryNotifier {
    pub sent: Mutex<Vec<String>>,
    pub fail: bool,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl Notifier for MemoryNotifier {
    async fn send_text(&self, text: &str) -> Result<()> {
        if self.fail {
            anyhow::bail!("memory notifier configured to fail");
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(text.to_string());
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[async_trait::async_trait]
impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    async fn send_text(&self, text: &str) -> Result<()> {
        (**self).send_text(text).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
