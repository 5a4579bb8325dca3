// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod bulletin;
pub mod config;
pub mod feed;
pub mod fetch;
pub mod logging;
pub mod metrics;
pub mod notify;
pub mod poller;
pub mod social;
pub mod state;

// ---- Re-exports for stable public API ----
pub use crate::bulletin::{
    BulletinEngine, BulletinSection, DocumentShape, ExtractionResult, FeedEntry,
    ProcessedBulletin,
};
pub use crate::config::{AppConfig, EngineConfig};
pub use crate::fetch::{Fetcher, HttpFetcher};
pub use crate::notify::{Notifier, NotifierMux};
pub use crate::poller::{CycleOutcome, Poller};
