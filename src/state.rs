// src/state.rs
//! Last-seen bulletin, persisted as JSON between runs of the poller.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

use crate::bulletin::FeedEntry;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BulletinState {
    pub last_entry_id: Option<String>,
    pub last_updated: Option<String>,
    #[serde(default)]
    pub last_source_url: Option<String>,
    #[serde(default)]
    pub notified_at: Option<DateTime<Utc>>,
}

impl BulletinState {
    /// True when `entry` differs from the last processed one (id or timestamp).
    pub fn is_new(&self, entry: &FeedEntry) -> bool {
        self.last_entry_id.as_deref() != Some(entry.id.as_str())
            || self.last_updated.as_deref() != Some(entry.updated.as_str())
    }

    pub fn record(&mut self, entry: &FeedEntry, source_url: Option<&str>, now: DateTime<Utc>) {
        self.last_entry_id = Some(entry.id.clone());
        self.last_updated = Some(entry.updated.clone());
        self.last_source_url = source_url.map(str::to_string);
        self.notified_at = Some(now);
    }
}

/// Missing or unreadable state counts as "nothing seen yet".
pub async fn read_state(path: &Path) -> BulletinState {
    match fs::read_to_string(path).await {
        Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
            tracing::warn!(target: "state", path = %path.display(), "corrupt state file, starting fresh: {e}");
            BulletinState::default()
        }),
        Err(_) => BulletinState::default(),
    }
}

pub async fn write_state(path: &Path, state: &BulletinState) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .await
            .with_context(|| format!("creating state dir {}", dir.display()))?;
    }
    let body = serde_json::to_vec_pretty(state).context("serializing state")?;
    fs::write(path, body)
        .await
        .with_context(|| format!("writing state to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, updated: &str) -> FeedEntry {
        FeedEntry {
            id: id.into(),
            updated: updated.into(),
            ..FeedEntry::default()
        }
    }

    #[test]
    fn fresh_state_treats_everything_as_new() {
        assert!(BulletinState::default().is_new(&entry("a", "t1")));
    }

    #[test]
    fn recorded_entry_is_not_new_until_updated() {
        let mut s = BulletinState::default();
        s.record(&entry("a", "t1"), Some("https://x"), Utc::now());
        assert!(!s.is_new(&entry("a", "t1")));
        assert!(s.is_new(&entry("a", "t2")));
        assert!(s.is_new(&entry("b", "t1")));
    }

    #[tokio::test]
    async fn roundtrip_through_disk_and_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/state.json");

        assert_eq!(read_state(&path).await, BulletinState::default());

        let mut s = BulletinState::default();
        s.record(&entry("a", "t1"), None, Utc::now());
        write_state(&path, &s).await.unwrap();
        assert_eq!(read_state(&path).await, s);

        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(read_state(&path).await, BulletinState::default());
    }

    #[test]
    fn legacy_state_without_optional_fields_parses() {
        let s: BulletinState =
            serde_json::from_str(r#"{"last_entry_id": "a", "last_updated": null}"#).unwrap();
        assert_eq!(s.last_entry_id.as_deref(), Some("a"));
        assert_eq!(s.notified_at, None);
    }
}
