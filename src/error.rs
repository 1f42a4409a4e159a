use thiserror::Error;

/// Why a single geolocation provider didn't produce a location.
///
/// These never leave the resolver; they exist so the log says what went wrong.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Connection failure, TLS failure, or the per-request timeout elapsed.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    #[error("response body is not JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// The body decoded but latitude or longitude was absent or zero.
    #[error("response has no usable coordinates")]
    MissingCoordinates,
}
