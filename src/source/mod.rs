//! Source gateway
//!
//! Defines the [`CountrySource`] trait and its implementations:
//! - `RestCountriesSource`: HTTP endpoint returning a JSON array of countries
//! - [`AbsentSource`]: a source that is never available (network down)
//!
//! Known upstream data problems are fixed afterwards by a
//! [`CorrectionTable`], before the records are normalized.

use crate::models::Country;
use crate::progress::{ProgressReport, ProgressSink, ProgressStage, percentage};
use async_trait::async_trait;

pub mod corrections;
mod error;

#[cfg(feature = "api-backend")]
pub mod api;

#[cfg(feature = "api-backend")]
pub use api::RestCountriesSource;
pub use corrections::{CorrectionReport, CorrectionTable, CurrencyDrop, CurrencyOverride};
pub use error::SourceError;

/// A provider of the full country record set
#[async_trait]
pub trait CountrySource: Send + Sync {
    /// Fetch every country record.
    ///
    /// Reports a single completion event through `progress` once the full set
    /// has been received. The event carries no snapshot: the records are not
    /// corrected yet.
    async fn fetch(&self, progress: &dyn ProgressSink) -> Result<Vec<Country>, SourceError>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

/// A source that is never reachable
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsentSource;

#[async_trait]
impl CountrySource for AbsentSource {
    async fn fetch(&self, _progress: &dyn ProgressSink) -> Result<Vec<Country>, SourceError> {
        Err(SourceError::Unavailable("No source configured".to_string()))
    }

    fn describe(&self) -> String {
        "absent".to_string()
    }
}

/// Decode a JSON array of country records.
///
/// Missing or `null` fields decode to their empty value; only a payload that
/// is not an array of objects is rejected.
pub fn parse_countries(payload: &str) -> Result<Vec<Country>, SourceError> {
    serde_json::from_str(payload)
        .map_err(|e| SourceError::Deserialization(format!("Failed to parse countries: {}", e)))
}

/// Report the coarse "fetch complete" milestone
pub(crate) fn report_fetched(progress: &dyn ProgressSink, received: usize) {
    progress.report(ProgressReport::new(
        ProgressStage::Fetched,
        percentage(received, received),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;

    #[test]
    fn test_parse_countries() {
        let payload = r#"[
            {"alpha3Code": "AND", "name": "Andorra", "gini": null},
            {"alpha3Code": "AGO", "name": "Angola", "area": 1246700.0}
        ]"#;
        let countries = parse_countries(payload).unwrap();

        assert_eq!(countries.len(), 2);
        assert_eq!(countries[0].gini, None);
        assert_eq!(countries[1].area, Some(1_246_700.0));
    }

    #[test]
    fn test_parse_rejects_malformed_payload() {
        let result = parse_countries(r#"{"status": 404}"#);
        assert!(matches!(result, Err(SourceError::Deserialization(_))));

        let result = parse_countries("[{\"alpha3Code\": ");
        assert!(matches!(result, Err(SourceError::Deserialization(_))));
    }

    #[tokio::test]
    async fn test_absent_source_is_unavailable() {
        let result = AbsentSource.fetch(&NoProgress).await;
        assert!(matches!(result, Err(SourceError::Unavailable(_))));
    }
}
