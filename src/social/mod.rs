// src/social/mod.rs
//! Keyword alerts from a social account, read through public RSS mirrors.
//!
//! Mirrors come and go (rate limits, Cloudflare pages, empty bodies), so each
//! one is tried in order until a body actually looks like a feed. Only the
//! newest item is checked against the alert keywords.

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use quick_xml::de::from_str;
use regex::Regex;
use serde::Deserialize;

use crate::config::SocialConfig;
use crate::fetch::Fetcher;
use crate::notify::NotifierMux;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Option<Channel>,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialItem {
    pub text: String,
    pub link: String,
    pub published: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocialOutcome {
    FeedUnavailable(String),
    NoItems,
    NotAlert,
    Alerted { delivered: usize },
}

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<[^>]+>").expect("tag regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("ws regex"));

/// HTML description → one line of text.
pub fn clean_description(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);
    let out = RE_TAGS.replace_all(&decoded, " ");
    let out = RE_WS.replace_all(&out, " ");
    out.trim().to_string()
}

fn looks_like_feed(body: &str) -> Result<()> {
    let low = body.to_ascii_lowercase();
    if low.contains("<html") || low.contains("<!doctype html") {
        return Err(anyhow!("returned HTML (blocked)"));
    }
    if !low.contains("<rss") && !low.contains("<feed") {
        return Err(anyhow!("does not look like RSS/Atom"));
    }
    Ok(())
}

/// First mirror that answers with something feed-shaped: `(xml, used_url)`.
pub async fn fetch_feed(fetcher: &dyn Fetcher, mirrors: &[String]) -> Result<(String, String)> {
    let mut last_err: Option<anyhow::Error> = None;
    for url in mirrors {
        let body = match fetcher.fetch(url).await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!(target: "social", %url, "mirror failed: {e:#}");
                last_err = Some(e);
                continue;
            }
        };
        let body = body.trim();
        if body.is_empty() {
            last_err = Some(anyhow!("{url} -> empty response"));
            continue;
        }
        if let Err(e) = looks_like_feed(body) {
            last_err = Some(e.context(url.clone()));
            continue;
        }
        return Ok((body.to_string(), url.clone()));
    }
    Err(last_err.unwrap_or_else(|| anyhow!("no RSS mirror could be read")))
}

/// RSS items in feed order. A feed without `<channel>` yields no items.
pub fn parse_items(xml: &str) -> Result<Vec<SocialItem>> {
    let rss: Rss = from_str(xml).context("parsing social rss xml")?;
    let Some(channel) = rss.channel else {
        return Ok(Vec::new());
    };

    Ok(channel
        .item
        .into_iter()
        .map(|it| {
            let title = it.title.as_deref().unwrap_or_default().trim().to_string();
            let desc = clean_description(it.description.as_deref().unwrap_or_default());
            let text = if desc.chars().count() > title.chars().count() {
                desc
            } else {
                title
            };
            SocialItem {
                text,
                link: it.link.unwrap_or_default().trim().to_string(),
                published: it.pub_date.unwrap_or_default().trim().to_string(),
            }
        })
        .collect())
}

/// Case-insensitive keyword hit.
pub fn looks_like_alert(text: &str, keywords: &[String]) -> bool {
    let up = text.to_uppercase();
    keywords.iter().any(|k| up.contains(&k.to_uppercase()))
}

pub fn compose_alert(user: &str, item: &SocialItem, used_url: &str) -> String {
    let source = if item.link.is_empty() {
        used_url
    } else {
        item.link.as_str()
    };
    format!(
        "🚨 @{user} ALERT\n🕒 {}\n\n{}\n\nSource: {source}",
        item.published, item.text
    )
}

/// Check the newest item once. Feed problems are reported, never raised.
pub async fn run_once(
    fetcher: &dyn Fetcher,
    notifier: &NotifierMux,
    cfg: &SocialConfig,
) -> SocialOutcome {
    let (xml, used) = match fetch_feed(fetcher, &cfg.mirror_urls()).await {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(target: "social", "rss unavailable: {e:#}");
            return SocialOutcome::FeedUnavailable(format!("{e:#}"));
        }
    };

    let items = match parse_items(&xml) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(target: "social", url = %used, "parse error: {e:#}");
            return SocialOutcome::FeedUnavailable(format!("{e:#}"));
        }
    };

    let Some(latest) = items.first() else {
        tracing::info!(target: "social", url = %used, "no items in rss");
        return SocialOutcome::NoItems;
    };

    if !looks_like_alert(&latest.text, &cfg.keywords) {
        tracing::info!(target: "social", "latest post is not an alert");
        return SocialOutcome::NotAlert;
    }

    let delivered = notifier
        .notify(&compose_alert(&cfg.user, latest, &used))
        .await;
    SocialOutcome::Alerted { delivered }
}
