// src/bulletin/resolve.rs
use metrics::{counter, histogram};

use super::cap::extract_cap_text;
use super::garbage::looks_like_garbage;
use super::types::{DocumentShape, ExtractionResult};
use super::xml_text::extract_text;
use crate::fetch::Fetcher;

/// Fetch candidates in ranked order and return the first readable bulletin.
///
/// Transport errors skip to the next candidate. When nothing passes the garbage
/// check, the last text/url that could be fetched is returned with
/// `accepted == false` (empty text and no url if every fetch failed).
pub async fn resolve(fetcher: &dyn Fetcher, candidates: &[String]) -> ExtractionResult {
    crate::metrics::ensure_described();
    let t0 = std::time::Instant::now();

    let mut last = ExtractionResult::default();

    for url in candidates {
        counter!("bulletin_candidates_total").increment(1);

        let body = match fetcher.fetch(url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(target: "bulletin", %url, error = %format!("{e:#}"), "candidate fetch failed");
                counter!("bulletin_fetch_errors_total").increment(1);
                continue;
            }
        };

        let shape = DocumentShape::of_url(url);
        let text = match shape {
            DocumentShape::Cap => extract_cap_text(&body),
            DocumentShape::Generic => extract_text(&body),
        };

        if !looks_like_garbage(&text) {
            tracing::info!(target: "bulletin", %url, ?shape, chars = text.chars().count(), "bulletin resolved");
            counter!("bulletin_resolved_total").increment(1);
            histogram!("bulletin_resolve_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
            return ExtractionResult {
                text,
                source_url: Some(url.clone()),
                accepted: true,
            };
        }

        tracing::debug!(target: "bulletin", %url, ?shape, "candidate looks like garbage");
        counter!("bulletin_garbage_total").increment(1);
        last = ExtractionResult {
            text,
            source_url: Some(url.clone()),
            accepted: false,
        };
    }

    tracing::warn!(
        target: "bulletin",
        candidates = candidates.len(),
        last_url = ?last.source_url,
        "no readable bulletin among candidates"
    );
    counter!("bulletin_degraded_total").increment(1);
    histogram!("bulletin_resolve_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
    last
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::StaticFetcher;

    #[tokio::test]
    async fn empty_candidate_list_is_degraded_and_empty() {
        let f = StaticFetcher::new();
        let r = resolve(&f, &[]).await;
        assert!(!r.accepted);
        assert!(r.text.is_empty());
        assert_eq!(r.source_url, None);
    }

    #[tokio::test]
    async fn cap_urls_go_through_the_cap_extractor() {
        let desc = "A TSUNAMI THREAT EXISTS FOR SOME COASTS OF CHILE. ".repeat(3);
        let cap = format!(
            "<alert xmlns=\"urn:oasis:names:tc:emergency:cap:1.2\"><info><description>{desc}</description></info></alert>"
        );
        let f = StaticFetcher::new().with_body("https://x/PHEBCAP.xml", &cap);
        let r = resolve(&f, &["https://x/PHEBCAP.xml".to_string()]).await;
        assert!(r.accepted);
        assert_eq!(r.text, desc.trim());
    }
}
