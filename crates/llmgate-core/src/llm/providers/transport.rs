//! One bounded JSON-over-HTTP exchange, classified into gateway errors

use crate::error::{GatewayError, GatewayResult};
use crate::llm::attempts::{CallContext, Interrupted};
use crate::llm::provider_types::ProviderName;
use crate::llm::providers::error_utils::{parse_retry_after, sanitize_error_body};
use reqwest::RequestBuilder;
use reqwest::header::RETRY_AFTER;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Send `request` and decode a JSON body, all within `deadline`.
///
/// The status line, headers and body are read inside the same deadline so a
/// slow body cannot outlive it. Status mapping:
/// - 429 → [`GatewayError::RateLimited`] with the parsed `Retry-After`
/// - 5xx → [`GatewayError::UpstreamServerError`]
/// - other non-2xx → [`GatewayError::UpstreamRejected`]
/// - deadline → [`GatewayError::Timeout`] (one attempt)
/// - caller cancellation → [`GatewayError::Cancelled`]
pub(crate) async fn send_json(
    ctx: &CallContext,
    provider: ProviderName,
    deadline: Duration,
    request: RequestBuilder,
) -> GatewayResult<Value> {
    let exchange = async {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::from_reqwest(provider, e))?;
        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after);
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::from_reqwest(provider, e))?;
        Ok::<_, GatewayError>((status, retry_after, body))
    };

    let (status, retry_after, body) = match ctx.bounded(deadline, exchange).await {
        Ok(result) => result?,
        Err(Interrupted::TimedOut) => return Err(GatewayError::timeout(provider, 1)),
        Err(Interrupted::Cancelled) => return Err(GatewayError::Cancelled),
    };

    if status.as_u16() == 429 {
        return Err(GatewayError::rate_limited(
            provider,
            retry_after.map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
            sanitize_error_body(&body),
        ));
    }
    if status.is_server_error() {
        return Err(GatewayError::server_error(
            provider,
            status.as_u16(),
            sanitize_error_body(&body),
        ));
    }
    if !status.is_success() {
        return Err(GatewayError::rejected(
            provider,
            status.as_u16(),
            sanitize_error_body(&body),
        ));
    }

    debug!(provider = %provider, status = status.as_u16(), bytes = body.len(), "upstream response received");

    serde_json::from_str(&body).map_err(|e| GatewayError::parse(provider, e.to_string()))
}
