//! PTWC notifier binary entrypoint.
//! Loads configuration, wires the HTTP fetcher and push channels, then polls forever.

use anyhow::Context;
use ptwc_notifier::{logging, AppConfig, HttpFetcher, NotifierMux, Poller};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    logging::init_tracing();

    let cfg = AppConfig::load().context("loading configuration")?;
    ptwc_notifier::metrics::install_from_env()?;

    let fetcher = HttpFetcher::new(&cfg.http)?;
    let notifier = NotifierMux::from_env();

    tracing::info!(
        target: "poller",
        feed = %cfg.feed.url,
        poll_secs = cfg.feed.poll_secs,
        locality_filter = cfg.engine.locality_filter,
        channels = ?notifier.channel_names(),
        "ptwc notifier starting"
    );

    Poller::new(&cfg, fetcher, notifier).run_forever().await
}
