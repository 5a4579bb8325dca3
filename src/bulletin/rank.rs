// src/bulletin/rank.rs
//! Orders a feed entry's alternate links by how likely they are to yield readable text.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_PHEB_CAP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)PHEBCAP\.xml").expect("pheb cap regex"));
static RE_CAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)CAP\.xml").expect("cap regex"));

struct Candidates(Vec<String>);

impl Candidates {
    fn add(&mut self, url: &str) {
        if !url.is_empty() && !self.0.iter().any(|u| u == url) {
            self.0.push(url.to_string());
        }
    }
}

/// Rank candidate URLs, best first, without duplicates.
///
/// 1. short-form text bulletins (`TEX.xml`)
/// 2. long-form text bulletins (`TEXT.xml`)
/// 3. any other `.xml` that is not CAP
/// 4. CAP links, each followed by guessed TEXT/TEX siblings. The guesses may not
///    exist on the server; fetching them is allowed to fail.
pub fn rank_candidates<S: AsRef<str>>(links: &[S]) -> Vec<String> {
    let links: Vec<&str> = links.iter().map(|l| l.as_ref()).collect();
    let mut out = Candidates(Vec::with_capacity(links.len() * 2));

    for &link in &links {
        if link.to_ascii_uppercase().contains("TEX.XML") {
            out.add(link);
        }
    }

    for &link in &links {
        if link.to_ascii_uppercase().contains("TEXT.XML") {
            out.add(link);
        }
    }

    for &link in &links {
        let lower = link.to_ascii_lowercase();
        if lower.ends_with(".xml") && !lower.contains("cap.xml") {
            out.add(link);
        }
    }

    for &link in &links {
        if !link.to_ascii_lowercase().contains("cap.xml") {
            continue;
        }
        out.add(link);
        out.add(&RE_PHEB_CAP.replace_all(link, "PHEBTEXT.xml"));
        out.add(&RE_PHEB_CAP.replace_all(link, "TEX.xml"));
        out.add(&RE_CAP.replace_all(link, "TEXT.xml"));
        out.add(&RE_CAP.replace_all(link, "TEX.xml"));
    }

    out.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_gives_empty_list() {
        let links: Vec<String> = vec![];
        assert!(rank_candidates(&links).is_empty());
    }

    #[test]
    fn empty_links_are_ignored() {
        assert_eq!(
            rank_candidates(&["", "https://x/a/PHEBTEX.xml"]),
            vec!["https://x/a/PHEBTEX.xml".to_string()]
        );
    }

    #[test]
    fn cap_link_expands_into_guesses() {
        let out = rank_candidates(&["https://x/a/PHEBCAP.xml"]);
        assert_eq!(
            out,
            vec![
                "https://x/a/PHEBCAP.xml".to_string(),
                "https://x/a/PHEBTEXT.xml".to_string(),
                "https://x/a/TEX.xml".to_string(),
                "https://x/a/PHEBTEX.xml".to_string(),
            ]
        );
    }

    #[test]
    fn non_pheb_cap_only_gets_generic_guesses() {
        let out = rank_candidates(&["https://x/a/WEAK53cap.xml"]);
        assert_eq!(
            out,
            vec![
                "https://x/a/WEAK53cap.xml".to_string(),
                "https://x/a/WEAK53TEXT.xml".to_string(),
                "https://x/a/WEAK53TEX.xml".to_string(),
            ]
        );
    }

    #[test]
    fn html_links_are_dropped() {
        let out = rank_candidates(&["https://x/a/index.html", "https://x/a/PHEBTEXT.xml"]);
        assert_eq!(out, vec!["https://x/a/PHEBTEXT.xml".to_string()]);
    }
}
