//! # pmis-master-client — Typed Client for the PMIS Master-Data Backend
//!
//! Provides typed access to the master-data REST endpoints that feed the
//! cascading hierarchy selectors: zones, circles, divisions, districts,
//! tehsils, work sectors, and the rest of the reference collections.
//!
//! ## Architecture
//!
//! This crate is the only path through which the selection stack touches
//! master-data HTTP endpoints. It exposes:
//!
//! - [`MasterDataClient`] — the live HTTP implementation (reqwest, bearer
//!   auth, transport retry, response normalization, fallback path).
//! - [`OptionSource`] — the trait the cascade controller is written
//!   against, implemented by both the live client and the test mock.
//! - [`MockOptionSource`] — a programmable in-memory source for tests.
//!
//! ## Endpoint Convention
//!
//! All collections hang directly off the configured base URL:
//! `{base_url}/{collection}/`, with nested child listings at
//! `{base_url}/{parentCollection}/{parentId}/{childCollection}/`.

pub mod config;
pub mod decode;
pub mod error;
pub mod mock;
pub mod options;
pub mod retry;
pub mod source;

pub use config::MasterDataConfig;
pub use error::MasterDataError;
pub use mock::{MockOptionSource, RecordedFetch};
pub use retry::RetryPolicy;
pub use source::OptionSource;

use std::time::Duration;

/// Live HTTP client for the master-data backend.
///
/// Cheap to clone; the underlying `reqwest::Client` is an `Arc` internally.
#[derive(Debug, Clone)]
pub struct MasterDataClient {
    http: reqwest::Client,
    base_url: url::Url,
    retry: RetryPolicy,
}

impl MasterDataClient {
    /// Create a new master-data client from configuration.
    pub fn new(config: MasterDataConfig) -> Result<Self, MasterDataError> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(token) = &config.api_token {
            let value = reqwest::header::HeaderValue::from_str(&format!(
                "Bearer {}",
                token.as_str()
            ))
            .map_err(|_| MasterDataError::Config(config::ConfigError::InvalidToken))?;
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| MasterDataError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            base_url: config.base_url,
            retry: config.retry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds_without_token() {
        let config = MasterDataConfig::local_mock(9100).unwrap();
        assert!(MasterDataClient::new(config).is_ok());
    }

    #[test]
    fn client_builds_with_token() {
        let mut config = MasterDataConfig::local_mock(9100).unwrap();
        config.api_token = Some(zeroize::Zeroizing::new("test-token".into()));
        assert!(MasterDataClient::new(config).is_ok());
    }

    #[test]
    fn client_rejects_token_with_control_characters() {
        let mut config = MasterDataConfig::local_mock(9100).unwrap();
        config.api_token = Some(zeroize::Zeroizing::new("bad\ntoken".into()));
        let result = MasterDataClient::new(config);
        assert!(matches!(
            result.unwrap_err(),
            MasterDataError::Config(config::ConfigError::InvalidToken)
        ));
    }
}
