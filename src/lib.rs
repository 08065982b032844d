//! Country Sync - offline-capable country reference data
//!
//! Provides:
//! - The country entity model with identity-based equality
//! - A source gateway for the remote country list, plus declarative corrections
//! - A normalizer extracting shared languages, currencies and regional blocs
//! - A relational cache in an embedded DuckDB file (destructive replace)
//! - A sync orchestrator choosing between source and cache on each run
//! - Coarse progress reporting for long-running saves and loads

pub mod config;
pub mod models;
pub mod normalize;
pub mod progress;
pub mod source;
pub mod store;
pub mod sync;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used types
pub use config::{ConfigError, ProbeConfig, SourceConfig, SyncConfig};
pub use models::{
    Country, Currency, Identity, Language, RegionalBloc, StructuralEq, Translations,
};
pub use normalize::{NormalizedEntities, intern, normalize};
pub use progress::{ChannelSink, NoProgress, ProgressReport, ProgressSink, ProgressStage};
#[cfg(feature = "api-backend")]
pub use source::RestCountriesSource;
pub use source::{AbsentSource, CorrectionTable, CountrySource, SourceError, parse_countries};
pub use store::{CountryDb, SaveSummary, StoreError, SyncInfo};
#[cfg(feature = "api-backend")]
pub use sync::HttpProbe;
pub use sync::{
    CacheRefresh, ReachabilityProbe, StaticProbe, SyncError, SyncMode, SyncOrchestrator,
    SyncOutcome,
};
