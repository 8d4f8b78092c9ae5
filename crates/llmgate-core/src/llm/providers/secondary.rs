//! Secondary-Chat: single-shot `generateContent` probe

use crate::config::SecondaryConfig;
use crate::config::timeouts;
use crate::error::{GatewayError, GatewayResult};
use crate::llm::attempts::{CallAttempt, CallContext, CallOutcome};
use crate::llm::messages::GenerationRequest;
use crate::llm::provider_types::{ProviderDescriptor, ProviderName};
use crate::llm::providers::provider_trait::ProviderAdapter;
use crate::llm::providers::request_builder::{build_google_request_body, extract_google_text};
use crate::llm::providers::transport::send_json;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, instrument};

const PROVIDER: ProviderName = ProviderName::Secondary;

/// Soft-fail adapter over the `generateContent` API
pub struct SecondaryChatAdapter {
    config: SecondaryConfig,
    http_client: Client,
}

impl SecondaryChatAdapter {
    /// Create a new Secondary-Chat adapter
    pub fn new(config: SecondaryConfig, http_client: Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl ProviderAdapter for SecondaryChatAdapter {
    fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor::new(PROVIDER)
            .with_enabled(self.config.enabled())
            .with_priority(1)
            .with_timeout(timeouts::probe::request_timeout())
    }

    /// One request; every failure collapses to empty content
    #[instrument(skip(self, ctx, request), fields(provider = "secondary", model = %self.config.model))]
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
        let http_request = self
            .http_client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&build_google_request_body(request));

        let result = send_json(ctx, PROVIDER, timeouts::probe::request_timeout(), http_request)
            .await
            .and_then(|response| {
                extract_google_text(&response).ok_or_else(|| GatewayError::empty_response(PROVIDER))
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

        match result {
            Ok(text) => Ok(text),
            Err(error) => {
                debug!(error = %error, "secondary probe failed");
                Ok(String::new())
            }
        }
    }

    async fn is_available(&self, _ctx: &CallContext) -> bool {
        self.config.enabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_soft_fails_without_io() {
        let adapter = SecondaryChatAdapter::new(SecondaryConfig::default(), Client::new());
        let ctx = CallContext::detached();

        let text = adapter
            .call(&ctx, &GenerationRequest::new("hi"))
            .await
            .unwrap();

        assert!(text.is_empty());
        let attempts = ctx.attempts();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].outcome, CallOutcome::AuthMissing);
        assert!(!adapter.descriptor().enabled);
    }

    #[test]
    fn test_endpoint_names_model() {
        let config = SecondaryConfig {
            base_url: "http://127.0.0.1:8080/".into(),
            ..Default::default()
        };
        let adapter = SecondaryChatAdapter::new(config, Client::new());
        assert_eq!(
            adapter.endpoint(),
            "http://127.0.0.1:8080/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }
}
