// src/config.rs
//! Runtime configuration: TOML file + environment overrides.
//!
//! Resolution order:
//! 1) $PTWC_CONFIG_PATH (must exist)
//! 2) config/ptwc.toml
//! 3) built-in defaults
//!
//! then `PTWC_FEED_URL`, `PTWC_POLL_SECS`, `PTWC_STATE_PATH` and
//! `PTWC_LOCALITY_FILTER` are applied on top.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/ptwc.toml";

pub const ENV_CONFIG_PATH: &str = "PTWC_CONFIG_PATH";
pub const ENV_FEED_URL: &str = "PTWC_FEED_URL";
pub const ENV_POLL_SECS: &str = "PTWC_POLL_SECS";
pub const ENV_STATE_PATH: &str = "PTWC_STATE_PATH";
pub const ENV_LOCALITY_FILTER: &str = "PTWC_LOCALITY_FILTER";

const MIN_POLL_SECS: u64 = 5;

fn default_locality_keywords() -> Vec<String> {
    [
        "CHILE",
        "ARICA",
        "IQUIQUE",
        "ANTOFAGASTA",
        "COQUIMBO",
        "VALPARAISO",
        "SAN ANTONIO",
        "TALCAHUANO",
        "CONCEPCION",
        "PUERTO MONTT",
        "CHAITEN",
        "CASTRO",
        "QUELLON",
        "PUNTA ARENAS",
        "MAGALLANES",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_section_headers() -> Vec<String> {
    [
        "ESTIMATED TIMES OF ARRIVAL",
        "ESTIMATED TSUNAMI ARRIVAL",
        "TSUNAMI ARRIVAL TIMES",
        "ARRIVAL TIMES",
        "FORECAST TSUNAMI ARRIVAL",
        "FORECASTS OF TSUNAMI ARRIVAL",
        "ETA",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_social_keywords() -> Vec<String> {
    [
        "ALERTA",
        "TSUNAMI",
        "EVACU",
        "EVACUACION",
        "SISMO",
        "TERREMOTO",
        "MAREMOTO",
        "EMERGENCIA",
        "SHOA",
        "SENAPRED",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_social_mirrors() -> Vec<String> {
    [
        "https://nitter.net/{user}/rss",
        "https://nitter.privacydev.net/{user}/rss",
        "https://nitter.poast.org/{user}/rss",
        "https://nitter.1d4.us/{user}/rss",
        "https://nitter.fdn.fr/{user}/rss",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Knobs of the bulletin extraction engine. Passed explicitly, never global.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Locality keywords used to narrow the ETA table (matched uppercase).
    pub locality_keywords: Vec<String>,
    /// Header phrases that open the forecast section (matched uppercase).
    pub section_headers: Vec<String>,
    /// Keep only lines mentioning a locality keyword.
    pub locality_filter: bool,
    /// How many lines from the header on are scanned.
    pub section_window: usize,
    pub max_section_lines: usize,
    /// Non-blank lines used as excerpt when no section is found.
    pub excerpt_lines: usize,
    /// Hard cap (chars) of the composed message.
    pub message_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            locality_keywords: default_locality_keywords(),
            section_headers: default_section_headers(),
            locality_filter: true,
            section_window: 180,
            max_section_lines: 50,
            excerpt_lines: 18,
            message_limit: 3900,
        }
    }
}

impl EngineConfig {
    fn sanitize(&mut self) {
        self.section_window = self.section_window.max(1);
        self.max_section_lines = self.max_section_lines.max(1);
        self.excerpt_lines = self.excerpt_lines.max(1);
        self.message_limit = self.message_limit.max(1);
        self.locality_keywords = clean_list(std::mem::take(&mut self.locality_keywords));
        self.section_headers = clean_list(std::mem::take(&mut self.section_headers));
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedConfig {
    pub url: String,
    pub poll_secs: u64,
    pub state_path: PathBuf,
    /// Push a short "bot active" message on startup.
    pub announce_startup: bool,
    /// Push poll-cycle errors to the text channels as well as logging them.
    pub notify_errors: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: "https://www.tsunami.gov/events/xml/PHEBAtom.xml".to_string(),
            poll_secs: 45,
            state_path: PathBuf::from("state/ptwc_state.json"),
            announce_startup: true,
            notify_errors: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub accept: String,
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "PTWC-Telegram-Notifier/2.0 (local-script)".to_string(),
            accept: "application/atom+xml,application/xml,text/xml,text/plain,*/*".to_string(),
            timeout_secs: 25,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct SocialConfig {
    /// Account watched through the RSS mirrors.
    pub user: String,
    /// Mirror URL templates; `{user}` is substituted.
    pub mirrors: Vec<String>,
    pub keywords: Vec<String>,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            user: "xancura".to_string(),
            mirrors: default_social_mirrors(),
            keywords: default_social_keywords(),
            user_agent: "Mozilla/5.0 (XancuraRSSBot/2.0)".to_string(),
            timeout_secs: 25,
        }
    }
}

impl SocialConfig {
    /// Mirror URLs with the account substituted.
    pub fn mirror_urls(&self) -> Vec<String> {
        self.mirrors
            .iter()
            .map(|m| m.replace("{user}", &self.user))
            .collect()
    }

    pub fn http(&self) -> HttpConfig {
        HttpConfig {
            user_agent: self.user_agent.clone(),
            timeout_secs: self.timeout_secs,
            ..HttpConfig::default()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub http: HttpConfig,
    pub engine: EngineConfig,
    pub social: SocialConfig,
}

impl AppConfig {
    /// Load using env var + fallbacks, then apply env overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = match std::env::var(ENV_CONFIG_PATH) {
            Ok(p) => {
                let pb = PathBuf::from(p);
                if !pb.exists() {
                    return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
                }
                Self::load_from(&pb)?
            }
            Err(_) => {
                let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
                if default_p.exists() {
                    Self::load_from(&default_p)?
                } else {
                    tracing::info!(target: "config", "no config file, using built-in defaults");
                    Self::default()
                }
            }
        };
        cfg.apply_env();
        cfg.sanitize();
        Ok(cfg)
    }

    /// Load from an explicit path (no env overrides).
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut cfg: AppConfig = toml::from_str(s)?;
        cfg.sanitize();
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(ENV_FEED_URL) {
            if !url.trim().is_empty() {
                self.feed.url = url.trim().to_string();
            }
        }
        if let Some(secs) = std::env::var(ENV_POLL_SECS)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            self.feed.poll_secs = secs;
        }
        if let Ok(p) = std::env::var(ENV_STATE_PATH) {
            if !p.trim().is_empty() {
                self.feed.state_path = PathBuf::from(p.trim());
            }
        }
        if let Some(on) = parse_bool_env(std::env::var(ENV_LOCALITY_FILTER).ok()) {
            self.engine.locality_filter = on;
        }
    }

    fn sanitize(&mut self) {
        self.feed.poll_secs = self.feed.poll_secs.max(MIN_POLL_SECS);
        self.http.timeout_secs = self.http.timeout_secs.max(1);
        self.social.timeout_secs = self.social.timeout_secs.max(1);
        self.social.keywords = clean_list(std::mem::take(&mut self.social.keywords));
        self.engine.sanitize();
    }
}

fn parse_bool_env(raw: Option<String>) -> Option<bool> {
    match raw?.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Trim, drop empties, dedup (first occurrence wins, order kept).
fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim();
        if !t.is_empty() && !out.iter().any(|o| o == t) {
            out.push(t.to_string());
        }
    }
    out
}
