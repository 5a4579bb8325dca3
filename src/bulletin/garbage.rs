// src/bulletin/garbage.rs
//! Cheap guard against undecoded base64 / binary payloads leaking through as "text".

const SAMPLE_CHARS: usize = 500;
const MIN_SPACES: usize = 3;
const MAX_B64_SYMBOLS: usize = 30;

/// Returns true when `text` should be rejected as a bulletin.
///
/// Empty text is garbage. Otherwise the first 500 characters are sampled: almost
/// no spaces together with lots of `/`, `+`, `=` is the signature of base64.
pub fn looks_like_garbage(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return true;
    }

    let mut spaces = 0usize;
    let mut symbols = 0usize;
    for c in trimmed.chars().take(SAMPLE_CHARS) {
        match c {
            ' ' => spaces += 1,
            '/' | '+' | '=' => symbols += 1,
            _ => {}
        }
    }
    spaces < MIN_SPACES && symbols > MAX_B64_SYMBOLS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_blank_are_garbage() {
        assert!(looks_like_garbage(""));
        assert!(looks_like_garbage("   \n\t"));
    }

    #[test]
    fn base64_blob_is_garbage() {
        // 500 chars, no spaces, 40 base64 symbols
        let mut s = "QUJD".repeat(115);
        s.push_str(&"/+=/".repeat(10));
        assert_eq!(s.chars().count(), 500);
        assert!(looks_like_garbage(&s));
    }

    #[test]
    fn prose_of_same_length_is_accepted() {
        let para = "THE PACIFIC TSUNAMI WARNING CENTER ISSUES THIS MESSAGE FOR INFORMATION ONLY. ";
        let s: String = para.repeat(10).chars().take(500).collect();
        assert!(!looks_like_garbage(&s));
    }

    #[test]
    fn symbols_beyond_sample_window_are_ignored() {
        let mut s = "A".repeat(500);
        s.push_str(&"/".repeat(100));
        assert!(!looks_like_garbage(&s));
    }

    #[test]
    fn few_symbols_without_spaces_is_not_garbage() {
        assert!(!looks_like_garbage("PHEB/TEX/2025=ok"));
    }
}
