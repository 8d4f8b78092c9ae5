//! Core error type for the gateway

use crate::llm::provider_types::ProviderName;
use thiserror::Error;

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Main error type for the gateway
///
/// Adapter-level variants carry the provider that produced them so the
/// orchestrator can log and aggregate without string matching.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// Required credential absent; no network call was made
    #[error("{provider}: credentials not configured")]
    AuthMissing { provider: ProviderName },

    /// Upstream answered HTTP 429
    #[error("{provider} rate limit: {message}")]
    RateLimited {
        provider: ProviderName,
        retry_after_ms: Option<u64>,
        message: String,
    },

    /// Per-attempt deadline exceeded on every attempt
    #[error("{provider} timeout after {attempts} attempts")]
    Timeout { provider: ProviderName, attempts: u32 },

    /// Upstream answered HTTP 5xx
    #[error("{provider} API error: {status} {message}")]
    UpstreamServerError {
        provider: ProviderName,
        status: u16,
        message: String,
    },

    /// 2xx response without usable completion text
    #[error("{provider}: empty response")]
    EmptyResponse { provider: ProviderName },

    /// Any other non-2xx status
    #[error("{provider} API error: {status} {message}")]
    UpstreamRejected {
        provider: ProviderName,
        status: u16,
        message: String,
    },

    /// Transport-level failure (connect, reset, body read)
    #[error("{provider} request failed: {message}")]
    Http {
        provider: ProviderName,
        message: String,
    },

    /// Response body could not be decoded
    #[error("failed to parse {provider} response: {message}")]
    Parse {
        provider: ProviderName,
        message: String,
    },

    /// Request rejected before any adapter ran
    #[error("Invalid request: {message}")]
    InvalidRequest {
        message: String,
        field: Option<String>,
    },

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// Every adapter in the selected order failed
    #[error("All providers failed. Last error: {message}")]
    TotalFailure { message: String },

    /// The caller cancelled the call
    #[error("Generation was cancelled")]
    Cancelled,
}
