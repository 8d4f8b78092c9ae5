//! Error classification for retry and attempt bookkeeping

use super::types::GatewayError;
use crate::llm::attempts::CallOutcome;
use crate::llm::provider_types::ProviderName;

impl GatewayError {
    /// Check if an error is a transient upstream fault worth retrying.
    ///
    /// Rate limits, timeouts, 5xx responses, empty bodies and transport
    /// failures are retryable. Rejections, decode failures and anything raised
    /// before or after the adapter layer are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. }
                | Self::Timeout { .. }
                | Self::UpstreamServerError { .. }
                | Self::EmptyResponse { .. }
                | Self::Http { .. }
        )
    }

    /// Map the error onto the attempt outcome recorded for it
    pub fn outcome(&self) -> CallOutcome {
        match self {
            Self::AuthMissing { .. } => CallOutcome::AuthMissing,
            Self::RateLimited { .. } => CallOutcome::RateLimited,
            Self::Timeout { .. } => CallOutcome::Timeout,
            Self::UpstreamServerError { .. } => CallOutcome::ServerError,
            Self::EmptyResponse { .. } => CallOutcome::EmptyResponse,
            Self::UpstreamRejected { .. } => CallOutcome::ClientError,
            Self::Http { .. } | Self::Parse { .. } => CallOutcome::TransportError,
            Self::Cancelled => CallOutcome::Cancelled,
            Self::InvalidRequest { .. } | Self::Config { .. } | Self::TotalFailure { .. } => {
                CallOutcome::ClientError
            }
        }
    }

    /// Provider the error originated from, if it came from an adapter
    pub fn provider(&self) -> Option<ProviderName> {
        match self {
            Self::AuthMissing { provider }
            | Self::RateLimited { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::UpstreamServerError { provider, .. }
            | Self::EmptyResponse { provider }
            | Self::UpstreamRejected { provider, .. }
            | Self::Http { provider, .. }
            | Self::Parse { provider, .. } => Some(*provider),
            _ => None,
        }
    }

    /// Whether the error is a "model not found" class rejection
    pub fn is_model_not_found(&self) -> bool {
        matches!(self, Self::UpstreamRejected { status: 404, .. })
    }

    /// Whether the caller cancelled the call
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
