// src/bulletin/compose.rs
//! Plain-text notification formatting. No I/O.

use chrono::{DateTime, SecondsFormat, Utc};

use super::section::split_lines;
use super::types::{BulletinSection, FeedEntry};
use crate::config::EngineConfig;

/// Compose the notification for `entry`, stamped with the current time when
/// the feed did not carry one.
pub fn compose_message(
    entry: &FeedEntry,
    section: Option<&BulletinSection>,
    bulletin_text: &str,
    source_url: Option<&str>,
    cfg: &EngineConfig,
) -> String {
    compose_message_at(entry, section, bulletin_text, source_url, cfg, Utc::now())
}

pub fn compose_message_at(
    entry: &FeedEntry,
    section: Option<&BulletinSection>,
    bulletin_text: &str,
    source_url: Option<&str>,
    cfg: &EngineConfig,
    now: DateTime<Utc>,
) -> String {
    let updated = if entry.updated.trim().is_empty() {
        now.to_rfc3339_opts(SecondsFormat::Secs, true)
    } else {
        entry.updated.trim().to_string()
    };

    let mut msg = match section.filter(|s| !s.is_empty()) {
        Some(section) => format!(
            "🚨 PTWC NEW BULLETIN\n📰 {}\n🕒 {}\n\n⏱️ PTIME / ETA:\n{}",
            entry.title,
            updated,
            section.to_text()
        ),
        None => format!(
            "🌊 PTWC: {}\n🕒 {}\n\n{}",
            entry.title,
            updated,
            excerpt(bulletin_text, cfg.excerpt_lines).join("\n")
        ),
    };

    if let Some(url) = source_url.filter(|u| !u.is_empty()) {
        msg.push_str("\n\nSource: ");
        msg.push_str(url);
    }

    truncate_chars(&msg, cfg.message_limit)
}

/// First `max` non-blank lines, trimmed.
pub fn excerpt(text: &str, max: usize) -> Vec<&str> {
    split_lines(text)
        .into_iter()
        .map(str::trim)
        .filter(|ln| !ln.is_empty())
        .take(max)
        .collect()
}

/// Cut to at most `max` characters (never splits a code point).
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(updated: &str) -> FeedEntry {
        FeedEntry {
            id: "urn:uuid:1".into(),
            title: "Tsunami Information Statement Number 1".into(),
            updated: updated.into(),
            links: vec![],
        }
    }

    #[test]
    fn section_message_layout() {
        let section = BulletinSection {
            lines: vec!["ARICA CHILE 0312Z".into(), "IQUIQUE CHILE 0320Z".into()],
            filtered: true,
        };
        let msg = compose_message(
            &entry("2025-07-30T00:00:00Z"),
            Some(&section),
            "ignored",
            Some("https://x/PHEBTEX.xml"),
            &EngineConfig::default(),
        );
        assert_eq!(
            msg,
            "🚨 PTWC NEW BULLETIN\n📰 Tsunami Information Statement Number 1\n🕒 2025-07-30T00:00:00Z\n\n⏱️ PTIME / ETA:\nARICA CHILE 0312Z\nIQUIQUE CHILE 0320Z\n\nSource: https://x/PHEBTEX.xml"
        );
    }

    #[test]
    fn excerpt_fallback_skips_blank_lines() {
        let text = "\n  LINE 1  \n\nLINE 2\n";
        let msg = compose_message(
            &entry("T"),
            None,
            text,
            None,
            &EngineConfig::default(),
        );
        assert_eq!(
            msg,
            "🌊 PTWC: Tsunami Information Statement Number 1\n🕒 T\n\nLINE 1\nLINE 2"
        );
    }

    #[test]
    fn excerpt_splits_carriage_return_only_text() {
        assert_eq!(excerpt("LINE 1\r\rLINE 2\rLINE 3", 2), vec!["LINE 1", "LINE 2"]);
    }

    #[test]
    fn excerpt_is_limited() {
        let text = (0..40).map(|i| format!("L{i}")).collect::<Vec<_>>().join("\n");
        assert_eq!(excerpt(&text, 18).len(), 18);
    }

    #[test]
    fn empty_bulletin_gives_header_only() {
        let msg = compose_message(&entry("T"), None, "", None, &EngineConfig::default());
        assert_eq!(msg, "🌊 PTWC: Tsunami Information Statement Number 1\n🕒 T\n\n");
    }

    #[test]
    fn missing_timestamp_uses_now() {
        let now = Utc.with_ymd_and_hms(2025, 7, 30, 1, 2, 3).unwrap();
        let msg = compose_message_at(&entry(""), None, "x", None, &EngineConfig::default(), now);
        assert!(msg.contains("🕒 2025-07-30T01:02:03Z"), "{msg}");
    }

    #[test]
    fn message_is_capped_on_char_boundary() {
        let cfg = EngineConfig {
            message_limit: 5,
            ..EngineConfig::default()
        };
        let msg = compose_message(&entry("T"), None, "x", None, &cfg);
        assert_eq!(msg.chars().count(), 5);
        assert_eq!(truncate_chars("ñañaña", 3), "ñañ");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
