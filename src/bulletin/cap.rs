// src/bulletin/cap.rs
//! CAP (Common Alerting Protocol) → bulletin prose.
//!
//! Upstream CAP documents are inconsistent about namespaces, so elements are
//! matched by local name only (case-insensitive). Strategies, first hit wins:
//! 1) longest `*description` with more than 80 chars;
//! 2) first `*derefUri` whose base64 payload decodes to prose;
//! 3) the generic extractor on the raw input.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

use super::xml_text::{self, char_len, element_texts, longest, looks_like_prose, MIN_PROSE_CHARS};

const MIN_DESCRIPTION_CHARS: usize = 80;
const DATA_URI_MARKER: &str = "base64,";

/// Padding optional, trailing bits tolerated: payloads are often hand-assembled.
const LENIENT_B64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Best-effort bulletin text from a CAP document. Never fails.
pub fn extract_cap_text(xml: &str) -> String {
    let Ok(elements) = element_texts(xml) else {
        return xml_text::extract_text(xml);
    };

    let description = longest(
        elements
            .iter()
            .filter(|el| el.name_ends_with("description"))
            .map(|el| el.text.trim())
            .filter(|t| char_len(t) > MIN_DESCRIPTION_CHARS),
    );
    if let Some(d) = description {
        return d.to_string();
    }

    let decoded = elements
        .iter()
        .filter(|el| el.name_ends_with("derefuri"))
        .map(|el| el.text.trim())
        .filter(|v| !v.is_empty())
        .filter_map(decode_payload)
        .find(|txt| looks_like_prose(txt) && char_len(txt) > MIN_PROSE_CHARS);
    if let Some(txt) = decoded {
        return txt.trim().to_string();
    }

    tracing::debug!(target: "bulletin", "cap document without usable description/derefUri");
    xml_text::extract_text(xml)
}

/// Decode a `derefUri` value: either a `data:...;base64,` URI or bare base64.
/// Returns `None` when the payload is not decodable.
pub fn decode_payload(value: &str) -> Option<String> {
    let b64 = match value.split_once(DATA_URI_MARKER) {
        Some((_, rest)) => rest.trim(),
        None => value,
    };

    // Line breaks and stray characters are common inside the element.
    let cleaned: String = b64
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
        .collect();

    let raw = LENIENT_B64.decode(cleaned.as_bytes()).ok()?;
    // Invalid sequences become U+FFFD; the rest of the payload stays intact.
    Some(String::from_utf8_lossy(&raw).into_owned())
}
