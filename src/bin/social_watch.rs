//! One-shot social-feed keyword check (meant for cron / CI schedules).
//! Always exits 0 on feed problems so a flaky mirror never marks the run red.

use anyhow::Context;
use ptwc_notifier::social::{run_once, SocialOutcome};
use ptwc_notifier::{logging, AppConfig, HttpFetcher, NotifierMux};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    logging::init_tracing();

    let cfg = AppConfig::load().context("loading configuration")?;
    let fetcher = HttpFetcher::new(&cfg.social.http())?;
    let notifier = NotifierMux::from_env();

    match run_once(&fetcher, &notifier, &cfg.social).await {
        SocialOutcome::Alerted { delivered } => {
            tracing::info!(target: "social", delivered, "alert pushed")
        }
        other => tracing::info!(target: "social", outcome = ?other, "nothing to push"),
    }
    Ok(())
}
