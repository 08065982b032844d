//! Progress reporting for long-running synchronization steps
//!
//! Progress is coarse: one report when a fetch completes, one after each
//! normalized group is written, and one after each country is fully written
//! or read. Reports are delivered through a [`ProgressSink`], which can be a
//! closure, a tokio channel ([`ChannelSink`]), or [`NoProgress`].

use crate::models::Country;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

/// Step that produced a progress report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStage {
    /// The remote source delivered its full record set
    Fetched,
    /// The distinct regional blocs were written
    RegionalBlocs,
    /// The distinct languages were written
    Languages,
    /// The distinct currencies were written
    Currencies,
    /// A country and its child rows were written
    CountrySaved,
    /// A country was rebuilt from the cache
    CountryLoaded,
}

/// A single progress update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    /// 0 to 100
    pub percentage_complete: u8,
    pub stage: ProgressStage,
    /// Countries available so far, when the step has a meaningful snapshot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countries: Option<Vec<Country>>,
}

impl ProgressReport {
    pub fn new(stage: ProgressStage, percentage_complete: u8) -> Self {
        Self {
            percentage_complete,
            stage,
            countries: None,
        }
    }

    pub fn with_countries(mut self, countries: Vec<Country>) -> Self {
        self.countries = Some(countries);
        self
    }
}

/// Integer percentage of `done` over `total`, clamped to 100.
///
/// An empty workload counts as complete.
pub fn percentage(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (done.saturating_mul(100) / total).min(100) as u8
}

/// Receiver of progress reports
pub trait ProgressSink: Send + Sync {
    fn report(&self, report: ProgressReport);
}

/// Discards every report
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _report: ProgressReport) {}
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressReport) + Send + Sync,
{
    fn report(&self, report: ProgressReport) {
        self(report)
    }
}

/// Forwards reports into a tokio channel
#[derive(Debug, Clone)]
pub struct ChannelSink(pub UnboundedSender<ProgressReport>);

impl ProgressSink for ChannelSink {
    fn report(&self, report: ProgressReport) {
        // A dropped receiver only means nobody is watching anymore
        let _ = self.0.send(report);
    }
}
