// src/feed/mod.rs
//! PTWC Atom feed → newest `FeedEntry`.

use anyhow::{Context, Result};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::bulletin::FeedEntry;
use crate::fetch::Fetcher;

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    id: TextNode,
    #[serde(default)]
    title: TextNode,
    #[serde(default)]
    updated: TextNode,
    #[serde(rename = "link", default)]
    links: Vec<Link>,
}

/// Element text, ignoring attributes such as `type="text"`.
#[derive(Debug, Default, Deserialize)]
struct TextNode {
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct Link {
    #[serde(rename = "@href", default)]
    href: String,
}

/// Parse the feed and return its first entry, `None` when the feed is empty.
pub fn parse_latest_entry(atom_xml: &str) -> Result<Option<FeedEntry>> {
    let feed: Feed = from_str(atom_xml).context("parsing atom feed")?;
    let Some(e) = feed.entries.into_iter().next() else {
        return Ok(None);
    };

    let links = e
        .links
        .into_iter()
        .map(|l| l.href.trim().to_string())
        .filter(|h| !h.is_empty())
        .collect();

    Ok(Some(FeedEntry {
        id: e.id.value.trim().to_string(),
        title: e.title.value.trim().to_string(),
        updated: e.updated.value.trim().to_string(),
        links,
    }))
}

/// Fetch `url` and parse the newest entry.
pub async fn fetch_latest_entry(fetcher: &dyn Fetcher, url: &str) -> Result<Option<FeedEntry>> {
    let body = fetcher.fetch(url).await.context("fetching atom feed")?;
    parse_latest_entry(&body)
}
