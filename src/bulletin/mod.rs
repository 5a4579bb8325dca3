// src/bulletin/mod.rs
//! Bulletin resolution & extraction engine.
//!
//! Order of a run:
//! 1) rank the entry's alternate links (`rank`)
//! 2) fetch + extract until one is readable (`resolve`, via `xml_text` / `cap` / `garbage`)
//! 3) pull the ETA section out of the prose (`section`)
//! 4) format the notification (`compose`)

pub mod cap;
pub mod compose;
pub mod garbage;
pub mod rank;
pub mod resolve;
pub mod section;
pub mod types;
pub mod xml_text;

pub use crate::bulletin::cap::extract_cap_text;
pub use crate::bulletin::compose::{compose_message, compose_message_at};
pub use crate::bulletin::garbage::looks_like_garbage;
pub use crate::bulletin::rank::rank_candidates;
pub use crate::bulletin::resolve::resolve;
pub use crate::bulletin::section::extract_section;
pub use crate::bulletin::types::{
    BulletinSection, DocumentShape, ExtractionResult, FeedEntry,
};
pub use crate::bulletin::xml_text::extract_text;

use crate::config::EngineConfig;
use crate::fetch::Fetcher;

/// Everything derived from one feed entry.
#[derive(Debug, Clone)]
pub struct ProcessedBulletin {
    pub candidates: Vec<String>,
    pub resolution: ExtractionResult,
    pub section: Option<BulletinSection>,
    pub message: String,
}

/// Engine entry point. Holds the immutable configuration; the fetcher is
/// supplied per call so the same engine works against HTTP or fixtures.
#[derive(Debug, Clone, Default)]
pub struct BulletinEngine {
    cfg: EngineConfig,
}

impl BulletinEngine {
    pub fn new(cfg: EngineConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    pub async fn process(&self, fetcher: &dyn Fetcher, entry: &FeedEntry) -> ProcessedBulletin {
        let candidates = rank_candidates(&entry.links);
        let resolution = resolve(fetcher, &candidates).await;
        let section = extract_section(&resolution.text, &self.cfg);
        let message = compose_message(
            entry,
            section.as_ref(),
            &resolution.text,
            resolution.source_url.as_deref(),
            &self.cfg,
        );

        // Never log raw bulletin text.
        tracing::info!(
            target: "bulletin",
            entry = %entry.id,
            text_id = %anon_hash(&resolution.text),
            accepted = resolution.accepted,
            candidates = candidates.len(),
            section_lines = section.as_ref().map(|s| s.len()).unwrap_or(0),
            filtered = section.as_ref().is_some_and(|s| s.filtered),
            "bulletin processed"
        );

        ProcessedBulletin {
            candidates,
            resolution,
            section,
            message,
        }
    }
}

/// Short, stable identifier of a text for logs.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anon_hash_is_short_and_stable() {
        let a = anon_hash("bulletin");
        assert_eq!(a.len(), 12);
        assert_eq!(a, anon_hash("bulletin"));
        assert_ne!(a, anon_hash("other"));
    }
}
