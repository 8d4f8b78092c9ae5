//! Constructor methods for GatewayError

use super::types::GatewayError;
use crate::llm::provider_types::ProviderName;

impl GatewayError {
    /// Create a missing-credentials error
    pub fn auth_missing(provider: ProviderName) -> Self {
        Self::AuthMissing { provider }
    }

    /// Create a rate limit error
    pub fn rate_limited(
        provider: ProviderName,
        retry_after_ms: Option<u64>,
        message: impl Into<String>,
    ) -> Self {
        Self::RateLimited {
            provider,
            retry_after_ms,
            message: message.into(),
        }
    }

    /// Create a timeout error naming the number of attempts exhausted
    pub fn timeout(provider: ProviderName, attempts: u32) -> Self {
        Self::Timeout { provider, attempts }
    }

    /// Create an upstream 5xx error
    pub fn server_error(provider: ProviderName, status: u16, message: impl Into<String>) -> Self {
        Self::UpstreamServerError {
            provider,
            status,
            message: message.into(),
        }
    }

    /// Create an empty-response error
    pub fn empty_response(provider: ProviderName) -> Self {
        Self::EmptyResponse { provider }
    }

    /// Create an error for a non-retryable non-2xx status
    pub fn rejected(provider: ProviderName, status: u16, message: impl Into<String>) -> Self {
        Self::UpstreamRejected {
            provider,
            status,
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn http(provider: ProviderName, message: impl Into<String>) -> Self {
        Self::Http {
            provider,
            message: message.into(),
        }
    }

    /// Create a body decoding error
    pub fn parse(provider: ProviderName, message: impl Into<String>) -> Self {
        Self::Parse {
            provider,
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
            field: None,
        }
    }

    /// Create an invalid request error naming the offending field
    pub fn invalid_request_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create the aggregated error raised when the cascade is exhausted
    pub fn total_failure(message: impl Into<String>) -> Self {
        Self::TotalFailure {
            message: message.into(),
        }
    }
}
