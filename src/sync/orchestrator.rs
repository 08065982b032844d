//! Synchronization run

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::task::JoinHandle;
use tracing::{Instrument, Span, debug, info, info_span, warn};
use uuid::Uuid;

use super::error::SyncError;
use super::probe::ReachabilityProbe;
use crate::models::Country;
use crate::normalize::{intern, normalize};
use crate::progress::{NoProgress, ProgressSink};
use crate::source::{CorrectionTable, CountrySource, SourceError};
use crate::store::{CountryDb, SaveSummary, StoreError};

/// Which path a run took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    UsingSource,
    UsingCache,
}

/// Result of a synchronization run
#[derive(Debug)]
pub enum SyncOutcome {
    /// Countries came from the source; the cache is being refreshed
    Fresh {
        countries: Vec<Country>,
        refresh: CacheRefresh,
    },
    /// The source was unreachable and the cache had data
    Cached { countries: Vec<Country> },
    /// The source was unreachable and the cache has never been written
    NoDataYet,
}

impl SyncOutcome {
    pub fn mode(&self) -> SyncMode {
        match self {
            SyncOutcome::Fresh { .. } => SyncMode::UsingSource,
            SyncOutcome::Cached { .. } | SyncOutcome::NoDataYet => SyncMode::UsingCache,
        }
    }

    /// Countries handed to the caller (empty for `NoDataYet`)
    pub fn countries(&self) -> &[Country] {
        match self {
            SyncOutcome::Fresh { countries, .. } | SyncOutcome::Cached { countries } => countries,
            SyncOutcome::NoDataYet => &[],
        }
    }
}

/// Handle on the background cache refresh of a `Fresh` run.
///
/// The refresh holds the store until it finishes; a failure is logged and
/// also returned by [`CacheRefresh::wait`]. Dropping the handle detaches the
/// write, which still runs to completion.
#[derive(Debug)]
pub struct CacheRefresh {
    handle: JoinHandle<Result<SaveSummary, StoreError>>,
}

impl CacheRefresh {
    fn spawn(
        mut store: OwnedMutexGuard<CountryDb>,
        countries: Vec<Country>,
        progress: Arc<dyn ProgressSink>,
    ) -> Self {
        let span = Span::current();
        let handle = tokio::task::spawn_blocking(move || {
            let _entered = span.enter();
            let result = store.save(&countries, progress.as_ref());
            if let Err(e) = &result {
                warn!(error = %e, "Cache refresh failed; fetched data was still returned");
            }
            result
        });
        Self { handle }
    }

    /// Whether the write has completed
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the cache write to finish
    pub async fn wait(self) -> Result<SaveSummary, StoreError> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Cache refresh task did not complete");
                Err(StoreError::Background(e.to_string()))
            }
        }
    }
}

/// Drives synchronization runs against one source and one cache.
///
/// Runs are serialized on the store: a run started while another run or its
/// cache refresh holds the store fails with [`SyncError::AlreadyRunning`].
pub struct SyncOrchestrator {
    source: Arc<dyn CountrySource>,
    probe: Arc<dyn ReachabilityProbe>,
    store: Arc<Mutex<CountryDb>>,
    corrections: CorrectionTable,
    progress: Arc<dyn ProgressSink>,
}

impl SyncOrchestrator {
    /// Create an orchestrator with the default corrections and no progress sink
    pub fn new(
        source: Arc<dyn CountrySource>,
        probe: Arc<dyn ReachabilityProbe>,
        store: CountryDb,
    ) -> Self {
        Self {
            source,
            probe,
            store: Arc::new(Mutex::new(store)),
            corrections: CorrectionTable::default(),
            progress: Arc::new(NoProgress),
        }
    }

    /// Build the HTTP source, probe and cache described by `config`
    #[cfg(feature = "api-backend")]
    pub fn from_config(config: &crate::config::SyncConfig) -> Result<Self, SyncError> {
        use crate::config::ConfigError;
        use crate::source::RestCountriesSource;
        use super::probe::HttpProbe;

        config.validate()?;

        let source = RestCountriesSource::new(
            config.source.base_url.clone(),
            config.source.resource_path.clone(),
            config.source.timeout(),
        )
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        let probe = HttpProbe::new(config.probe.url.clone(), config.probe.timeout())
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        let store = CountryDb::open(&config.database)?;

        Ok(Self::new(Arc::new(source), Arc::new(probe), store)
            .with_corrections(config.corrections.clone()))
    }

    /// Set the corrections applied to fetched records
    pub fn with_corrections(mut self, corrections: CorrectionTable) -> Self {
        self.corrections = corrections;
        self
    }

    /// Set the sink receiving fetch, save and load progress
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Shared handle on the cache, for read access between runs
    pub fn store(&self) -> Arc<Mutex<CountryDb>> {
        Arc::clone(&self.store)
    }

    /// Run one synchronization.
    ///
    /// A reachable source yields [`SyncOutcome::Fresh`] as soon as the
    /// records are fetched and corrected; the cache write continues in the
    /// background. An unreachable source, or a failed fetch, falls back to
    /// the cache.
    pub async fn run(&self) -> Result<SyncOutcome, SyncError> {
        let guard = Arc::clone(&self.store)
            .try_lock_owned()
            .map_err(|_| SyncError::AlreadyRunning)?;

        let run_id = Uuid::new_v4();
        let span = info_span!("sync_run", run_id = %run_id);
        self.run_locked(guard).instrument(span).await
    }

    async fn run_locked(&self, guard: OwnedMutexGuard<CountryDb>) -> Result<SyncOutcome, SyncError> {
        let start = Instant::now();

        if self.probe.is_reachable().await {
            match self.source.fetch(self.progress.as_ref()).await {
                Ok(countries) => {
                    let countries = self.prepare(countries);
                    info!(
                        countries = countries.len(),
                        duration_ms = start.elapsed().as_millis() as u64,
                        "Data retrieved from source"
                    );
                    let refresh =
                        CacheRefresh::spawn(guard, countries.clone(), Arc::clone(&self.progress));
                    return Ok(SyncOutcome::Fresh { countries, refresh });
                }
                Err(SourceError::Unavailable(msg)) => {
                    warn!(source = %self.source.describe(), error = %msg, "Fetch failed, using cache");
                }
                Err(SourceError::Deserialization(msg)) => {
                    return Err(SyncError::Deserialization(msg));
                }
            }
        } else {
            info!("Source unreachable, using cache");
        }

        let progress = Arc::clone(&self.progress);
        let countries = tokio::task::spawn_blocking(move || guard.load(progress.as_ref()))
            .await
            .map_err(|e| StoreError::Background(e.to_string()))??;

        if countries.is_empty() {
            info!("Cache is empty");
            return Ok(SyncOutcome::NoDataYet);
        }

        info!(
            countries = countries.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Data retrieved from cache"
        );
        Ok(SyncOutcome::Cached { countries })
    }

    /// Apply corrections and share one handle per distinct entity
    fn prepare(&self, mut countries: Vec<Country>) -> Vec<Country> {
        let report = self.corrections.apply(&mut countries);
        debug!(
            dropped = report.dropped,
            overridden = report.overridden,
            "Applied corrections"
        );

        let entities = normalize(&countries);
        intern(&mut countries, &entities);
        countries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Currency;
    use crate::source::AbsentSource;
    use crate::sync::StaticProbe;
    use async_trait::async_trait;

    struct FixedSource(Vec<Country>);

    #[async_trait]
    impl CountrySource for FixedSource {
        async fn fetch(&self, _progress: &dyn ProgressSink) -> Result<Vec<Country>, SourceError> {
            Ok(self.0.clone())
        }

        fn describe(&self) -> String {
            "fixed".to_string()
        }
    }

    fn orchestrator(source: Arc<dyn CountrySource>, reachable: bool) -> SyncOrchestrator {
        SyncOrchestrator::new(source, Arc::new(StaticProbe(reachable)), CountryDb::memory().unwrap())
    }

    #[tokio::test]
    async fn test_unreachable_empty_cache_is_no_data_yet() {
        let sync = orchestrator(Arc::new(AbsentSource), false);
        let outcome = sync.run().await.unwrap();

        assert!(matches!(outcome, SyncOutcome::NoDataYet));
        assert_eq!(outcome.mode(), SyncMode::UsingCache);
        assert!(outcome.countries().is_empty());
    }

    #[tokio::test]
    async fn test_fresh_run_applies_corrections_and_refreshes_cache() {
        let countries = vec![
            Country::new("USA", "United States")
                .with_currency(Currency::new("USD", "United States dollar", "$")),
        ];
        let sync = orchestrator(Arc::new(FixedSource(countries)), true);

        let outcome = sync.run().await.unwrap();
        assert_eq!(outcome.mode(), SyncMode::UsingSource);
        assert_eq!(
            outcome.countries()[0].currencies[0].name.as_deref(),
            Some("United States Dollar")
        );

        let SyncOutcome::Fresh { refresh, .. } = outcome else {
            panic!("expected a fresh outcome");
        };
        while !refresh.is_finished() {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        let summary = refresh.wait().await.unwrap();
        assert_eq!(summary.countries, 1);

        let store = sync.store();
        let db = store.lock().await;
        assert_eq!(db.country_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_run_rejected_while_store_is_held() {
        let sync = orchestrator(Arc::new(AbsentSource), false);
        let store = sync.store();
        let _held = store.lock().await;

        assert!(matches!(sync.run().await, Err(SyncError::AlreadyRunning)));
    }
}
