//! HTTP source
//!
//! Fetches the country list with a single GET to `base_url + resource_path`.
//!
//! ## Security
//!
//! The resource path is validated before use: it must be an absolute path
//! without traversal segments, query strings or fragments.

use super::{CountrySource, SourceError, parse_countries, report_fetched};
use crate::models::Country;
use crate::progress::ProgressSink;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

/// Maximum number of body bytes quoted in an error message
const MAX_ERROR_BODY: usize = 200;

/// Validate a resource path for safe concatenation onto the base URL.
fn validate_resource_path(path: &str) -> Result<(), SourceError> {
    if !path.starts_with('/') {
        return Err(SourceError::Unavailable(format!(
            "Resource path must start with '/': {}",
            path
        )));
    }

    if path.split('/').any(|segment| segment == "..") {
        return Err(SourceError::Unavailable(
            "Resource path cannot contain '..' segments".to_string(),
        ));
    }

    if path.contains(['?', '#']) || path.chars().any(char::is_whitespace) {
        return Err(SourceError::Unavailable(
            "Resource path contains invalid characters".to_string(),
        ));
    }

    Ok(())
}

/// Country source backed by a REST endpoint
pub struct RestCountriesSource {
    base_url: String,
    resource_path: String,
    client: reqwest::Client,
}

impl RestCountriesSource {
    /// Create a new HTTP source
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the service (e.g., "https://restcountries.com")
    /// * `resource_path` - Path of the full country list (e.g., "/v2/all")
    /// * `timeout` - Timeout for the whole request
    ///
    /// # Example
    ///
    /// ```rust
    /// use country_sync::source::RestCountriesSource;
    /// use std::time::Duration;
    ///
    /// let source = RestCountriesSource::new(
    ///     "https://restcountries.com",
    ///     "/v2/all",
    ///     Duration::from_secs(30),
    /// )
    /// .unwrap();
    /// assert_eq!(source.url(), "https://restcountries.com/v2/all");
    /// ```
    pub fn new(
        base_url: impl Into<String>,
        resource_path: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let resource_path = resource_path.into();
        validate_resource_path(&resource_path)?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Unavailable(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            resource_path,
            client,
        })
    }

    /// Full URL of the country list
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, self.resource_path)
    }
}

#[async_trait]
impl CountrySource for RestCountriesSource {
    async fn fetch(&self, progress: &dyn ProgressSink) -> Result<Vec<Country>, SourceError> {
        let url = self.url();
        debug!(url = %url, "Requesting country list");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(format!("Failed to reach {}: {}", url, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Unavailable(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let excerpt: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(SourceError::Unavailable(format!(
                "Country list request failed: {} {}",
                status, excerpt
            )));
        }

        let countries = parse_countries(&body)?;
        info!(url = %url, countries = countries.len(), "Fetched country list");

        report_fetched(progress, countries.len());
        Ok(countries)
    }

    fn describe(&self) -> String {
        self.url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_resource_path() {
        assert!(validate_resource_path("/v2/all").is_ok());
        assert!(validate_resource_path("v2/all").is_err());
        assert!(validate_resource_path("/v2/../admin").is_err());
        assert!(validate_resource_path("/v2/all?fields=name").is_err());
        assert!(validate_resource_path("/v2/ all").is_err());
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let source =
            RestCountriesSource::new("http://localhost:8080/", "/rest/v2/all", Duration::from_secs(1))
                .unwrap();
        assert_eq!(source.url(), "http://localhost:8080/rest/v2/all");
        assert_eq!(source.describe(), source.url());
    }
}
