// src/poller.rs
//! Outer loop: poll the feed, process new bulletins, push them, remember them.
//!
//! One cycle at a time: a tick never starts while the previous cycle is still
//! awaiting its requests.

use anyhow::Result;
use chrono::Utc;
use metrics::counter;
use std::path::Path;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};

use crate::bulletin::BulletinEngine;
use crate::config::{AppConfig, FeedConfig};
use crate::feed::fetch_latest_entry;
use crate::fetch::Fetcher;
use crate::notify::NotifierMux;
use crate::state::{read_state, write_state};

pub const STARTUP_MESSAGE: &str =
    "✅ PTWC bot active. TEX/TEXT first, CAP only when needed. Bulletins + PTIME/ETA.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The feed parsed but carried no entry.
    EmptyFeed,
    /// Newest entry was already processed.
    Unchanged { entry_id: String },
    /// A new entry was resolved and pushed.
    Notified {
        entry_id: String,
        source_url: Option<String>,
        delivered: usize,
    },
}

pub struct Poller<F: Fetcher> {
    feed: FeedConfig,
    engine: BulletinEngine,
    fetcher: F,
    notifier: NotifierMux,
}

impl<F: Fetcher> Poller<F> {
    pub fn new(cfg: &AppConfig, fetcher: F, notifier: NotifierMux) -> Self {
        crate::metrics::ensure_described();
        Self {
            feed: cfg.feed.clone(),
            engine: BulletinEngine::new(cfg.engine.clone()),
            fetcher,
            notifier,
        }
    }

    pub fn state_path(&self) -> &Path {
        &self.feed.state_path
    }

    /// One poll cycle. Feed fetch/parse failures are returned; everything below
    /// the feed (candidates, extraction) degrades instead of failing.
    pub async fn run_cycle(&self) -> Result<CycleOutcome> {
        counter!("poller_cycles_total").increment(1);

        let Some(entry) = fetch_latest_entry(&self.fetcher, &self.feed.url).await? else {
            tracing::debug!(target: "poller", "feed has no entries");
            return Ok(CycleOutcome::EmptyFeed);
        };

        let mut state = read_state(&self.feed.state_path).await;
        if !state.is_new(&entry) {
            tracing::trace!(target: "poller", entry = %entry.id, "no change");
            return Ok(CycleOutcome::Unchanged { entry_id: entry.id });
        }

        tracing::info!(target: "poller", entry = %entry.id, title = %entry.title, "new bulletin");
        let processed = self.engine.process(&self.fetcher, &entry).await;
        let delivered = self.notifier.notify(&processed.message).await;

        // Persist even if no channel accepted it: delivery is best-effort.
        let source_url = processed.resolution.source_url;
        state.record(&entry, source_url.as_deref(), Utc::now());
        if let Err(e) = write_state(&self.feed.state_path, &state).await {
            tracing::warn!(target: "state", "could not persist state: {e:#}");
        }

        Ok(CycleOutcome::Notified {
            entry_id: entry.id,
            source_url,
            delivered,
        })
    }

    /// Announce (optional), then run cycles every `poll_secs` forever.
    pub async fn run_forever(&self) -> Result<()> {
        if self.feed.announce_startup {
            self.notifier.notify(STARTUP_MESSAGE).await;
        }

        let mut ticker = time::interval(Duration::from_secs(self.feed.poll_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match self.run_cycle().await {
                Ok(outcome) => {
                    tracing::debug!(target: "poller", ?outcome, "cycle done");
                }
                Err(e) => {
                    counter!("poller_errors_total").increment(1);
                    tracing::warn!(target: "poller", "poll cycle failed: {e:#}");
                    if self.feed.notify_errors {
                        self.notifier.notify(&format!("PTWC error: {e:#}")).await;
                    }
                }
            }
        }
    }
}
