//! Master-data client error types.

/// Errors from master-data API calls.
#[derive(Debug, thiserror::Error)]
pub enum MasterDataError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The backend returned a non-2xx status.
    #[error("master-data API {endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// The response body was not readable as JSON.
    #[error("failed to decode response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_includes_context() {
        let err = MasterDataError::Api {
            endpoint: "GET /zones/".into(),
            status: 503,
            body: "maintenance window".into(),
        };
        let rendered = format!("{err}");
        assert!(rendered.contains("GET /zones/"));
        assert!(rendered.contains("503"));
        assert!(rendered.contains("maintenance window"));
    }

    #[test]
    fn config_error_converts() {
        let err: MasterDataError = super::super::config::ConfigError::MissingBaseUrl.into();
        assert!(matches!(err, MasterDataError::Config(_)));
    }
}
