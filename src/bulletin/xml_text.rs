// src/bulletin/xml_text.rs
//! Generic XML → bulletin prose recovery.
//!
//! The TEX/TEXT bulletin variants are XML wrappers around plain text, but they are
//! not consistent: some carry the whole bulletin in one element, others scatter it.
//! Two tiers:
//! 1) strict parse, pick the longest element text that reads like prose;
//! 2) otherwise strip every tag and keep whatever text is left.

use anyhow::{anyhow, bail, Result};
use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;

/// Element text must be longer than this (in chars, after trim) to be a candidate.
pub const MIN_PROSE_CHARS: usize = 120;

static RE_PROSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z].*\s+.*[A-Za-z]").expect("prose regex"));
static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("tag regex"));
static RE_BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("blank-run regex"));

/// Leading text of one element, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ElementText {
    /// Local name (namespace prefix removed), as written in the document.
    pub local_name: String,
    /// Text (and CDATA) that appears before the first child element.
    pub text: String,
}

impl ElementText {
    pub(crate) fn name_ends_with(&self, suffix: &str) -> bool {
        self.local_name.to_ascii_lowercase().ends_with(suffix)
    }
}

struct Frame {
    slot: usize,
    leading: bool,
}

/// Walk the whole document and return every element's leading text (pre-order).
///
/// Fails on anything a strict XML parser would reject: mismatched or unclosed
/// tags, undefined entities, no root, or content after the root element.
pub(crate) fn element_texts(xml: &str) -> Result<Vec<ElementText>> {
    let xml = xml.trim_start_matches('\u{feff}');
    let mut reader = Reader::from_str(xml);

    let mut out: Vec<ElementText> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut roots = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let slot = open_element(&mut out, &mut stack, &mut roots, e.local_name().as_ref())?;
                stack.push(Frame {
                    slot,
                    leading: true,
                });
            }
            Event::Empty(e) => {
                open_element(&mut out, &mut stack, &mut roots, e.local_name().as_ref())?;
            }
            Event::End(_) => {
                stack
                    .pop()
                    .ok_or_else(|| anyhow!("closing tag without an open element"))?;
            }
            Event::Text(t) => {
                let text = t.unescape()?;
                push_text(&mut out, &stack, &text)?;
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c);
                push_text(&mut out, &stack, &text)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if roots == 0 {
        bail!("no root element");
    }
    if !stack.is_empty() {
        bail!("unexpected end of document: {} unclosed element(s)", stack.len());
    }
    Ok(out)
}

fn open_element(
    out: &mut Vec<ElementText>,
    stack: &mut [Frame],
    roots: &mut usize,
    raw_name: &[u8],
) -> Result<usize> {
    match stack.last_mut() {
        Some(parent) => parent.leading = false,
        None => {
            *roots += 1;
            if *roots > 1 {
                bail!("junk after document element");
            }
        }
    }
    out.push(ElementText {
        local_name: String::from_utf8_lossy(raw_name).into_owned(),
        text: String::new(),
    });
    Ok(out.len() - 1)
}

fn push_text(out: &mut [ElementText], stack: &[Frame], text: &str) -> Result<()> {
    match stack.last() {
        Some(frame) if frame.leading => out[frame.slot].text.push_str(text),
        Some(_) => {} // tail text after a child element
        None if text.trim().is_empty() => {}
        None => bail!("text outside the root element"),
    }
    Ok(())
}

/// "Looks like prose": a letter, whitespace, then another letter on the same run.
pub fn looks_like_prose(text: &str) -> bool {
    RE_PROSE.is_match(text)
}

pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Longest string by char count; the first one wins on ties.
pub(crate) fn longest<'a, I>(items: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, usize)> = None;
    for s in items {
        let len = char_len(s);
        match best {
            Some((_, best_len)) if best_len >= len => {}
            _ => best = Some((s, len)),
        }
    }
    best.map(|(s, _)| s)
}

/// Replace every tag by a newline, squeeze blank runs, trim.
pub fn strip_tags(xml: &str) -> String {
    let cleaned = RE_TAGS.replace_all(xml, "\n");
    let cleaned = RE_BLANK_RUN.replace_all(&cleaned, "\n\n");
    cleaned.trim().to_string()
}

/// Best-effort bulletin text from a loosely structured XML document. Never fails.
pub fn extract_text(xml: &str) -> String {
    if let Ok(elements) = element_texts(xml) {
        let best = longest(
            elements
                .iter()
                .map(|el| el.text.trim())
                .filter(|t| char_len(t) > MIN_PROSE_CHARS && looks_like_prose(t)),
        );
        if let Some(best) = best {
            return best.to_string();
        }
    }
    strip_tags(xml)
}
