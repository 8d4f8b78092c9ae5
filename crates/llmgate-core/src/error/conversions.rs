//! Conversions from library errors into GatewayError

use super::types::GatewayError;
use crate::llm::provider_types::ProviderName;
use crate::llm::providers::error_utils::redact_inline_secrets;

impl GatewayError {
    /// Convert a reqwest failure raised while talking to `provider`.
    ///
    /// reqwest errors carry no provider, so a plain `From` impl cannot be used.
    /// The request URL is dropped from the message since Secondary-Chat sends
    /// its credential as a query parameter.
    pub fn from_reqwest(provider: ProviderName, error: reqwest::Error) -> Self {
        let status = error.status();
        let is_decode = error.is_decode();
        let message = redact_inline_secrets(&error.without_url().to_string());

        if is_decode {
            return Self::parse(provider, message);
        }
        match status {
            Some(status) if status.as_u16() == 429 => Self::rate_limited(provider, None, message),
            Some(status) if status.is_server_error() => {
                Self::server_error(provider, status.as_u16(), message)
            }
            Some(status) if !status.is_success() => {
                Self::rejected(provider, status.as_u16(), message)
            }
            _ => Self::http(provider, message),
        }
    }
}

impl From<dotenvy::Error> for GatewayError {
    fn from(error: dotenvy::Error) -> Self {
        Self::config_with_context(error.to_string(), "Loading dotenv file")
    }
}
