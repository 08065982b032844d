//! Sync orchestrator
//!
//! Chooses between the source and the cache for each run, drives the
//! corrections, normalization and store, and hands the resulting countries to
//! the caller while the cache refresh continues in the background.

mod error;
mod orchestrator;
pub mod probe;

pub use error::SyncError;
pub use orchestrator::{CacheRefresh, SyncMode, SyncOrchestrator, SyncOutcome};
#[cfg(feature = "api-backend")]
pub use probe::HttpProbe;
pub use probe::{ReachabilityProbe, StaticProbe};
