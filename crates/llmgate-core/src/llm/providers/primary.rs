//! Primary-Chat: OpenAI-compatible chat completions with bounded retries

use crate::config::PrimaryConfig;
use crate::config::timeouts;
use crate::error::{GatewayError, GatewayResult};
use crate::llm::attempts::{CallAttempt, CallContext, CallOutcome};
use crate::llm::messages::GenerationRequest;
use crate::llm::provider_types::{ProviderDescriptor, ProviderName};
use crate::llm::providers::provider_trait::{ProviderAdapter, StreamingAdapter, TokenStream};
use crate::llm::providers::request_builder::{build_openai_request_body, extract_openai_text};
use crate::llm::providers::transport::send_json;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

const PROVIDER: ProviderName = ProviderName::Primary;

/// Hard-fail adapter over the primary hosted chat API
pub struct PrimaryChatAdapter {
    config: PrimaryConfig,
    http_client: Client,
}

impl PrimaryChatAdapter {
    /// Create a new Primary-Chat adapter
    pub fn new(config: PrimaryConfig, http_client: Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn max_attempts(&self) -> u32 {
        self.config.max_retries + 1
    }

    /// Wait for a 429: the server's hint, else the configured default
    fn rate_limit_wait(&self, retry_after_ms: Option<u64>) -> Duration {
        Duration::from_millis(retry_after_ms.unwrap_or(self.config.rate_limit_wait_ms))
    }

    fn rate_limit_budget(&self) -> Duration {
        Duration::from_millis(self.config.rate_limit_budget_ms)
    }

    fn missing_key(&self, ctx: &CallContext) -> GatewayError {
        let model = self.config.models.first().map(String::as_str).unwrap_or("");
        ctx.record(CallAttempt::skipped(PROVIDER, model, CallOutcome::AuthMissing));
        GatewayError::auth_missing(PROVIDER)
    }

    /// One request/response exchange, recorded on `ctx`
    async fn attempt(
        &self,
        ctx: &CallContext,
        api_key: &str,
        model: &str,
        attempt: u32,
        body: &Value,
    ) -> GatewayResult<String> {
        let started = Instant::now();
        let request = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(body);

        let result = send_json(ctx, PROVIDER, self.config.timeout(), request)
            .await
            .and_then(|response| {
                extract_openai_text(&response).ok_or_else(|| GatewayError::empty_response(PROVIDER))
            });

        let outcome = match &result {
            Ok(_) => CallOutcome::Success,
            Err(e) => e.outcome(),
        };
        ctx.record(CallAttempt::finished(PROVIDER, model, attempt, outcome, started));
        result
    }
}

#[async_trait]
impl ProviderAdapter for PrimaryChatAdapter {
    fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor::new(PROVIDER)
            .with_enabled(self.config.enabled())
            .with_priority(0)
            .with_timeout(self.config.timeout())
            .with_max_retries(self.config.max_retries)
            .hard_fail()
    }

    /// Try each configured model up to `max_retries + 1` times.
    ///
    /// 429s wait out `Retry-After` within the rate-limit budget, 5xx and empty
    /// bodies back off linearly, timeouts retry immediately and any other
    /// non-2xx is returned at once. Exhaustion returns the last error seen.
    #[instrument(skip(self, ctx, request), fields(provider = "primary"))]
    async fn call(&self, ctx: &CallContext, request: &GenerationRequest) -> GatewayResult<String> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(self.missing_key(ctx));
        };

        let max_attempts = self.max_attempts();
        let max_tokens = request
            .options
            .max_tokens
            .unwrap_or(timeouts::primary::DEFAULT_MAX_TOKENS);
        let mut last_error = None;

        for model in &self.config.models {
            let body = build_openai_request_body(model, request, Some(max_tokens));

            for attempt in 1..=max_attempts {
                ctx.ensure_active()?;

                let error = match self.attempt(ctx, api_key, model, attempt, &body).await {
                    Ok(text) => {
                        if attempt > 1 {
                            debug!(model = %model, attempt, "request succeeded after retry");
                        }
                        return Ok(text);
                    }
                    Err(error) => error,
                };
                let attempts_remain = attempt < max_attempts;

                match error {
                    GatewayError::RateLimited { retry_after_ms, .. } => {
                        let budget = self.rate_limit_budget();
                        if !attempts_remain || ctx.rate_limit_remaining(budget).is_zero() {
                            last_error = Some(error);
                            break;
                        }
                        let wait = ctx
                            .reserve_rate_limit_wait(self.rate_limit_wait(retry_after_ms), budget);
                        warn!(
                            model = %model,
                            attempt,
                            max_attempts,
                            wait_ms = wait.as_millis() as u64,
                            "rate limited, waiting before retry"
                        );
                        last_error = Some(error);
                        ctx.sleep(wait).await?;
                    }
                    GatewayError::UpstreamServerError { .. }
                    | GatewayError::EmptyResponse { .. }
                    | GatewayError::Http { .. }
                    | GatewayError::Parse { .. } => {
                        last_error = Some(error);
                        if !attempts_remain {
                            break;
                        }
                        let delay = Duration::from_millis(self.config.backoff_ms * attempt as u64);
                        warn!(
                            model = %model,
                            attempt,
                            max_attempts,
                            delay_ms = delay.as_millis() as u64,
                            "transient failure, retrying"
                        );
                        ctx.sleep(delay).await?;
                    }
                    GatewayError::Timeout { .. } => {
                        if !attempts_remain {
                            last_error = Some(GatewayError::timeout(PROVIDER, max_attempts));
                            break;
                        }
                        warn!(model = %model, attempt, max_attempts, "attempt timed out, retrying");
                        last_error = Some(error);
                    }
                    _ => return Err(error),
                }
            }
        }

        Err(last_error.unwrap_or_else(|| GatewayError::empty_response(PROVIDER)))
    }

    async fn is_available(&self, _ctx: &CallContext) -> bool {
        self.config.enabled()
    }
}

#[async_trait]
impl StreamingAdapter for PrimaryChatAdapter {
    fn name(&self) -> ProviderName {
        PROVIDER
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled()
    }

    /// Fetch the whole completion and hand it out as a single fragment.
    ///
    /// Uses the first configured model and the caller's `max_tokens` only.
    /// Failures other than 429 back off by `stream_backoff_ms × attempt`.
    #[instrument(skip(self, ctx, request), fields(provider = "primary", streaming = true))]
    async fn call_stream(
        &self,
        ctx: &CallContext,
        request: &GenerationRequest,
    ) -> GatewayResult<TokenStream> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(self.missing_key(ctx));
        };
        let Some(model) = self.config.models.first() else {
            return Err(GatewayError::config("no primary model configured"));
        };

        let max_attempts = self.max_attempts();
        let body = build_openai_request_body(model, request, request.options.max_tokens);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            ctx.ensure_active()?;

            let error = match self.attempt(ctx, api_key, model, attempt, &body).await {
                Ok(text) => {
                    let stream = futures::stream::iter(vec![Ok(text)]);
                    return Ok(Box::pin(stream));
                }
                Err(GatewayError::Cancelled) => return Err(GatewayError::Cancelled),
                Err(error) => error,
            };

            if attempt < max_attempts {
                let delay = match &error {
                    GatewayError::RateLimited { retry_after_ms, .. } => ctx
                        .reserve_rate_limit_wait(
                            self.rate_limit_wait(*retry_after_ms),
                            self.rate_limit_budget(),
                        ),
                    _ => Duration::from_millis(self.config.stream_backoff_ms * attempt as u64),
                };
                debug!(attempt, max_attempts, delay_ms = delay.as_millis() as u64, error = %error, "streaming attempt failed, retrying");
                ctx.sleep(delay).await?;
            }
            last_error = Some(error);
        }

        Err(last_error.unwrap_or_else(|| GatewayError::empty_response(PROVIDER)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_is_recorded_and_raised() {
        let adapter = PrimaryChatAdapter::new(PrimaryConfig::default(), Client::new());
        let ctx = CallContext::detached();

        let err = adapter
            .call(&ctx, &GenerationRequest::new("hi"))
            .await
            .unwrap_err();

        assert_eq!(err, GatewayError::auth_missing(ProviderName::Primary));
        let attempts = ctx.attempts();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].outcome, CallOutcome::AuthMissing);
        assert_eq!(attempts[0].model_id, "grok-beta");
    }

    #[test]
    fn test_descriptor_is_hard_fail() {
        let config = PrimaryConfig {
            api_key: Some("xai-key".into()),
            ..Default::default()
        };
        let descriptor = PrimaryChatAdapter::new(config, Client::new()).descriptor();
        assert!(descriptor.enabled);
        assert!(!descriptor.soft_fail);
        assert_eq!(descriptor.max_attempts(), 3);
        assert_eq!(descriptor.timeout, Duration::from_secs(20));
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let config = PrimaryConfig {
            base_url: "http://127.0.0.1:9999/v1/".into(),
            ..Default::default()
        };
        let adapter = PrimaryChatAdapter::new(config, Client::new());
        assert_eq!(adapter.endpoint(), "http://127.0.0.1:9999/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_cancelled_context_makes_no_request() {
        let config = PrimaryConfig {
            api_key: Some("xai-key".into()),
            base_url: "http://127.0.0.1:1".into(),
            ..Default::default()
        };
        let adapter = PrimaryChatAdapter::new(config, Client::new());
        let ctx = CallContext::detached();
        ctx.cancellation().cancel();

        let err = adapter
            .call(&ctx, &GenerationRequest::new("hi"))
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert!(ctx.attempts().is_empty());
    }
}
