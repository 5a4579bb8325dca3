// src/bulletin/section.rs
//! Locates the arrival-time (PTIME / ETA) table inside bulletin prose.

use super::types::BulletinSection;
use crate::config::EngineConfig;

const BOM: char = '\u{feff}';

/// Collect the forecast section starting at the first header line.
///
/// Returns `None` when no header phrase occurs. The scan stops at two
/// consecutive blank lines once something has been collected; a single blank
/// line inside the table is skipped. With the locality filter on, only lines
/// naming a configured locality are kept, unless none do.
pub fn extract_section(text: &str, cfg: &EngineConfig) -> Option<BulletinSection> {
    let lines: Vec<&str> = split_lines(text).into_iter().map(str::trim_end).collect();
    let headers: Vec<String> = cfg
        .section_headers
        .iter()
        .map(|h| h.to_uppercase())
        .collect();

    let start = lines.iter().position(|ln| {
        let up = ln.to_uppercase();
        headers.iter().any(|h| up.contains(h.as_str()))
    })?;

    let mut collected: Vec<String> = Vec::new();
    let mut blank_streak = 0usize;
    for raw in lines.iter().skip(start).take(cfg.section_window) {
        let ln = raw.trim_matches(BOM).trim_end();
        if ln.is_empty() {
            blank_streak += 1;
            if !collected.is_empty() && blank_streak >= 2 {
                break;
            }
            continue;
        }
        blank_streak = 0;
        collected.push(ln.to_string());
    }

    if collected.is_empty() {
        return None;
    }

    let mut filtered = false;
    if cfg.locality_filter {
        let matches = filter_localities(&collected, &cfg.locality_keywords);
        if !matches.is_empty() {
            filtered = matches.len() < collected.len();
            collected = matches;
        }
    }

    collected.truncate(cfg.max_section_lines);
    Some(BulletinSection {
        lines: collected,
        filtered,
    })
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split on every line boundary (`\r\n` counts once, a lone `\r` too).
/// No trailing empty piece, like `str::lines`.
pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0usize;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        out.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r' && matches!(chars.peek(), Some(&(_, '\n'))) {
            chars.next();
            start += 1;
        }
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

/// Lines containing any keyword (case-insensitive substring).
pub fn filter_localities(lines: &[String], keywords: &[String]) -> Vec<String> {
    let keys: Vec<String> = keywords.iter().map(|k| k.to_uppercase()).collect();
    lines
        .iter()
        .filter(|ln| {
            let up = ln.to_uppercase();
            keys.iter().any(|k| up.contains(k.as_str()))
        })
        .cloned()
        .collect()
}
