use thiserror::Error;

/// Errors returned by the IdP client and the service modules built on it.
///
/// Variants pass the underlying failure through untouched; no variant is
/// retried or reclassified by the SDK.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The client configuration is incomplete or malformed
    #[error("Invalid client configuration: {0}")]
    Config(String),

    /// The application key is not a valid hex string
    #[error("Invalid application key: {0}")]
    InvalidAppKey(#[from] hex::FromHexError),

    /// The HTTP request could not be assembled
    #[error("Failed to build request: {0}")]
    RequestBuild(#[from] http::Error),

    /// The request could not be signed
    #[error("Failed to sign request: {0}")]
    Signing(String),

    /// Network or TLS failure while talking to the IdP
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Failure inside the HTTP middleware stack
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// Request serialization or response deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The mock transport was called more times than it had replies queued
    #[cfg(any(test, feature = "test-utils"))]
    #[error("Mock transport has no reply queued for {0}")]
    Mock(String),
}

/// Result type for client operations
pub type ClientResult<T, E = ClientError> = Result<T, E>;
