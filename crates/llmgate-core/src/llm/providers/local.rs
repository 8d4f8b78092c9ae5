//! Local-Chat: dual-model local inference host

use crate::config::LocalConfig;
use crate::config::timeouts;
use crate::error::{GatewayError, GatewayResult};
use crate::llm::attempts::{CallAttempt, CallContext, CallOutcome};
use crate::llm::messages::GenerationRequest;
use crate::llm::provider_types::{ProviderDescriptor, ProviderName};
use crate::llm::providers::provider_trait::ProviderAdapter;
use crate::llm::providers::request_builder::{build_local_request_body, extract_local_text};
use crate::llm::providers::transport::send_json;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, info, instrument};

const PROVIDER: ProviderName = ProviderName::Local;

/// Soft-fail adapter over a local `/api/chat` host
pub struct LocalChatAdapter {
    config: LocalConfig,
    http_client: Client,
}

impl LocalChatAdapter {
    /// Create a new Local-Chat adapter
    pub fn new(config: LocalConfig, http_client: Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// Models to try for `request`: the primary one, then the fallback when allowed
    fn candidate_models<'a>(&'a self, request: &GenerationRequest) -> Vec<&'a str> {
        let mut models = vec![self.config.model.as_str()];
        if request.options.use_fallback.unwrap_or(true) {
            if let Some(fallback) = self.config.fallback_model.as_deref() {
                if fallback != self.config.model {
                    models.push(fallback);
                }
            }
        }
        models
    }

    async fn chat_once(
        &self,
        ctx: &CallContext,
        model: &str,
        request: &GenerationRequest,
    ) -> GatewayResult<String> {
        let http_request = self
            .http_client
            .post(format!("{}/api/chat", self.base_url()))
            .json(&build_local_request_body(model, request));

        let response = send_json(ctx, PROVIDER, request.local_timeout(), http_request).await?;
        extract_local_text(&response).ok_or_else(|| GatewayError::empty_response(PROVIDER))
    }
}

#[async_trait]
impl ProviderAdapter for LocalChatAdapter {
    fn descriptor(&self) -> ProviderDescriptor {
        ProviderDescriptor::new(PROVIDER)
            .with_enabled(self.config.enabled)
            .with_priority(2)
            .with_timeout(timeouts::local::interactive_timeout())
    }

    /// Try the primary local model, then the fallback model.
    ///
    /// Never raises: both models failing yields empty content.
    #[instrument(skip(self, ctx, request), fields(provider = "local", training = request.options.is_training))]
    async fn call(&self, ctx: &CallContext, request: &GenerationRequest) -> GatewayResult<String> {
        if !self.config.enabled {
            ctx.record(CallAttempt::skipped(
                PROVIDER,
                &self.config.model,
                CallOutcome::AuthMissing,
            ));
            return Ok(String::new());
        }

        for (index, model) in self.candidate_models(request).into_iter().enumerate() {
            if ctx.is_cancelled() {
                return Ok(String::new());
            }

            let started = Instant::now();
            let result = self.chat_once(ctx, model, request).await;
            let outcome = match &result {
                Ok(_) => CallOutcome::Success,
                Err(e) => e.outcome(),
            };
            ctx.record(CallAttempt::finished(
                PROVIDER,
                model,
                index as u32 + 1,
                outcome,
                started,
            ));

            match result {
                Ok(text) => {
                    if index > 0 {
                        info!(model, "local fallback model answered");
                    }
                    return Ok(text);
                }
                Err(error) if error.is_model_not_found() => {
                    debug!(model, "local model not installed");
                }
                Err(error) => {
                    debug!(model, error = %error, "local model failed");
                }
            }
        }

        Ok(String::new())
    }

    /// `GET /api/tags` within the short probe deadline
    async fn is_available(&self, ctx: &CallContext) -> bool {
        if !self.config.enabled {
            return false;
        }

        let probe = self
            .http_client
            .get(format!("{}/api/tags", self.base_url()))
            .send();

        match ctx
            .bounded(timeouts::local::availability_probe_timeout(), probe)
            .await
        {
            Ok(Ok(response)) => response.status().is_success(),
            Ok(Err(error)) => {
                debug!(error = %error, "local host unreachable");
                false
            }
            Err(interrupted) => {
                debug!(?interrupted, "local availability probe interrupted");
                false
            }
        }
    }
}
