// src/logging.rs
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// Events are emitted under short targets (`bulletin`, `poller`, ...), not module paths.
const DEFAULT_FILTER: &str =
    "ptwc_notifier=info,bulletin=info,poller=info,notify=info,social=info,state=info,config=info,metrics=info,warn";

/// Install the global subscriber.
/// - filter from `RUST_LOG`, default: info for this crate's targets, warn elsewhere
/// - `LOG_FORMAT=json` switches to JSON lines
///
/// Safe to call more than once (later calls are ignored).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    let res = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
    if res.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
