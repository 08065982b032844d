//! Connectivity checks run before fetching

use async_trait::async_trait;
#[cfg(feature = "api-backend")]
use std::time::Duration;
#[cfg(feature = "api-backend")]
use tracing::debug;

#[cfg(feature = "api-backend")]
use crate::source::SourceError;

/// Decides whether a run should use the source or the cache
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    async fn is_reachable(&self) -> bool;
}

/// A probe with a fixed answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticProbe(pub bool);

#[async_trait]
impl ReachabilityProbe for StaticProbe {
    async fn is_reachable(&self) -> bool {
        self.0
    }
}

/// Probe that issues a GET and treats any success status as reachable
#[cfg(feature = "api-backend")]
pub struct HttpProbe {
    url: String,
    client: reqwest::Client,
}

#[cfg(feature = "api-backend")]
impl HttpProbe {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Unavailable(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(feature = "api-backend")]
#[async_trait]
impl ReachabilityProbe for HttpProbe {
    async fn is_reachable(&self) -> bool {
        match self.client.get(&self.url).send().await {
            Ok(response) => {
                let reachable = response.status().is_success();
                debug!(url = %self.url, status = %response.status(), reachable, "Probe answered");
                reachable
            }
            Err(e) => {
                debug!(url = %self.url, error = %e, "Probe failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_probe() {
        assert!(StaticProbe(true).is_reachable().await);
        assert!(!StaticProbe(false).is_reachable().await);
    }

    #[cfg(feature = "api-backend")]
    #[tokio::test]
    async fn test_http_probe_unreachable() {
        // Port 9 (discard) is closed on loopback
        let probe = HttpProbe::new("http://127.0.0.1:9/", Duration::from_secs(2)).unwrap();
        assert!(!probe.is_reachable().await);
        assert_eq!(probe.url(), "http://127.0.0.1:9/");
    }
}
