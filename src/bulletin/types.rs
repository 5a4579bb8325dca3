// src/bulletin/types.rs
use serde::{Deserialize, Serialize};

/// Newest entry of the bulletin feed. Built once per poll cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FeedEntry {
    pub id: String,
    pub title: String,
    pub updated: String,    // feed timestamp as published (RFC 3339 in practice)
    pub links: Vec<String>, // alternate document URLs, feed order
}

/// Which extractor a candidate document goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentShape {
    /// Common Alerting Protocol markup (`...CAP.xml`).
    Cap,
    /// TEX / TEXT bulletins and any other XML wrapper.
    Generic,
}

impl DocumentShape {
    pub fn of_url(url: &str) -> Self {
        if url.to_ascii_lowercase().contains("cap.xml") {
            Self::Cap
        } else {
            Self::Generic
        }
    }
}

/// Outcome of resolving a candidate list.
///
/// `accepted == false` means every candidate failed or looked like garbage; the
/// last attempted text/url pair is still carried so callers can decide what to do.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractionResult {
    pub text: String,
    pub source_url: Option<String>,
    pub accepted: bool,
}

impl ExtractionResult {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Forecast (PTIME / ETA) lines pulled out of a bulletin.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BulletinSection {
    pub lines: Vec<String>,
    /// True when the locality filter actually narrowed the lines.
    pub filtered: bool,
}

impl BulletinSection {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn to_text(&self) -> String {
        self.lines.join("\n").trim().to_string()
    }
}
