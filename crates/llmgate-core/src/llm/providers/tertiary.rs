//! Tertiary-Chat: single-shot OpenAI-compatible probe

use crate::config::TertiaryConfig;
use crate::config::timeouts;
use crate::error::{GatewayError, GatewayResult};
use crate::llm::attempts::{CallAttempt, CallContext, CallOutcome};
use crate::llm::messages::GenerationRequest;
use crate::llm::provider_types::{ProviderDescriptor, ProviderName};
use crate::llm::providers::provider_trait::ProviderAdapter;
use crate::llm::providers::request_builder::{build_openai_request_body, extract_openai_text};
use crate::llm::providers::transport::send_json;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, instrument};

const PROVIDER: ProviderName = ProviderName::Tertiary;

/// Soft-fail adapter over the tertiary hosted chat API
pub struct TertiaryChatAdapter {
    config: TertiaryConfig,
    http_client: Client,
}

impl TertiaryChatAdapter {
    /// Create a new Tertiary-Chat adapter
    pub fn new(config: TertiaryConfig, http_client: Client) -> Self {
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
}

#[async_trait]
impl ProviderAdapter for TertiaryChatAdapter {
    fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor::new(PROVIDER)
            .with_enabled(self.config.enabled())
            .with_priority(3)
            .with_timeout(timeouts::probe::request_timeout())
    }

    #[instrument(skip(self, ctx, request), fields(provider = "tertiary", model = %self.config.model))]
    async fn call(&self, ctx: &CallContext, request: &GenerationRequest) -> GatewayResult<String> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            ctx.record(CallAttempt::skipped(
                PROVIDER,
                &self.config.model,
                CallOutcome::AuthMissing,
            ));
            return Ok(String::new());
        };
        if ctx.is_cancelled() {
            return Ok(String::new());
        }

        let started = Instant::now();
        let body = build_openai_request_body(&self.config.model, request, request.options.max_tokens);
        let http_request = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body);

        let result = send_json(ctx, PROVIDER, timeouts::probe::request_timeout(), http_request)
            .await
            .and_then(|response| {
                extract_openai_text(&response).ok_or_else(|| GatewayError::empty_response(PROVIDER))
            });

        let outcome = match &result {
            Ok(_) => CallOutcome::Success,
            Err(e) => e.outcome(),
        };
        ctx.record(CallAttempt::finished(
            PROVIDER,
            &self.config.model,
            1,
            outcome,
            started,
        ));

        Ok(result.unwrap_or_else(|error| {
            debug!(error = %error, "tertiary probe failed");
            String::new()
        }))
    }

    async fn is_available(&self, _ctx: &CallContext) -> bool {
        self.config.enabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_host_soft_fails() {
        let config = TertiaryConfig {
            api_key: Some("together-key".into()),
            base_url: "http://127.0.0.1:1".into(),
            ..Default::default()
        };
        let adapter = TertiaryChatAdapter::new(config, Client::new());
        let ctx = CallContext::detached();

        let text = adapter
            .call(&ctx, &GenerationRequest::new("hi"))
            .await
            .unwrap();

        assert!(text.is_empty());
        assert_eq!(ctx.attempts()[0].outcome, CallOutcome::TransportError);
    }
}
