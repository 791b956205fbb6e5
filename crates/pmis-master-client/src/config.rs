//! Master-data client configuration.
//!
//! Configures the base URL of the PMIS master-data backend. There is no
//! meaningful default — each deployment runs its own backend — so the URL
//! is required, via environment variable or explicit construction.

use url::Url;
use zeroize::Zeroizing;

use crate::retry::RetryPolicy;

/// Configuration for connecting to the PMIS master-data backend.
///
/// Custom `Debug` implementation redacts the `api_token` field to prevent
/// credential leakage in log output.
#[derive(Clone)]
pub struct MasterDataConfig {
    /// Base URL of the master-data REST API
    /// (e.g. `https://pmis.example.gov/api/masters/`). A missing trailing
    /// slash is added on construction — collection paths are joined onto
    /// this value, and `https://host/api` would otherwise yield
    /// `https://host/apizones/`.
    pub base_url: Url,
    /// Optional bearer token for API authentication. Master-data reads are
    /// unauthenticated in some deployments.
    pub api_token: Option<Zeroizing<String>>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Backoff policy for transient transport failures.
    pub retry: RetryPolicy,
}

impl std::fmt::Debug for MasterDataConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterDataConfig")
            .field("base_url", &self.base_url)
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .field("retry", &self.retry)
            .finish()
    }
}

impl MasterDataConfig {
    /// Configuration with the given base URL, no token, default timeout
    /// and retry policy.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url: ensure_trailing_slash(base_url),
            api_token: None,
            timeout_secs: 30,
            retry: RetryPolicy::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PMIS_MASTER_URL` (required)
    /// - `PMIS_API_TOKEN` (optional)
    /// - `PMIS_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var("PMIS_MASTER_URL").map_err(|_| ConfigError::MissingBaseUrl)?;
        let base_url = Url::parse(&raw)
            .map_err(|e| ConfigError::InvalidUrl("PMIS_MASTER_URL".to_string(), e.to_string()))?;

        Ok(Self {
            base_url: ensure_trailing_slash(base_url),
            api_token: std::env::var("PMIS_API_TOKEN").ok().map(Zeroizing::new),
            timeout_secs: std::env::var("PMIS_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            retry: RetryPolicy::default(),
        })
    }

    /// Create a configuration pointing to a local mock server (for
    /// testing). Retries are disabled — against a local mock a transport
    /// failure is a test bug, not a blip worth waiting out.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the localhost URL cannot be
    /// parsed (should not occur for valid port numbers, but avoids
    /// `expect()`).
    pub fn local_mock(port: u16) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&format!("http://127.0.0.1:{port}"))
            .map_err(|e| ConfigError::InvalidUrl("localhost".to_string(), e.to_string()))?;
        Ok(Self {
            base_url,
            api_token: None,
            timeout_secs: 5,
            retry: RetryPolicy::none(),
        })
    }
}

/// Append the trailing slash the path-join convention relies on.
fn ensure_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PMIS_MASTER_URL environment variable is required")]
    MissingBaseUrl,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("api token contains characters not permitted in an HTTP header")]
    InvalidToken,
}
