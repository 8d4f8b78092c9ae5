//! Streaming emulator

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use rand::Rng;
use tracing::{debug, instrument, warn};

use super::tokens::split_tokens;
use crate::config::EmulationConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::llm::attempts::CallContext;
use crate::llm::messages::GenerationRequest;
use crate::llm::orchestrator::FallbackOrchestrator;
use crate::llm::providers::{StreamingAdapter, TokenStream};

/// Text streamed to the caller when every provider failed
pub fn degraded_notice(prompt: &str) -> String {
    format!(
        "Sorry, I'm having trouble reaching the AI services right now. Your question was: \"{}\". \
         The system is running in degraded mode; please try again in a few moments.",
        prompt
    )
}

/// Token-callback front end over the fallback orchestrator
pub struct StreamEmulator {
    orchestrator: Arc<FallbackOrchestrator>,
    streaming_adapter: Option<Arc<dyn StreamingAdapter>>,
    pacing: EmulationConfig,
}

impl StreamEmulator {
    /// Create an emulator that only uses orchestrator resolution
    pub fn new(orchestrator: Arc<FallbackOrchestrator>, pacing: EmulationConfig) -> Self {
        Self {
            orchestrator,
            streaming_adapter: None,
            pacing,
        }
    }

    /// Try `adapter` before falling back to orchestrator resolution
    pub fn with_streaming_adapter(mut self, adapter: Arc<dyn StreamingAdapter>) -> Self {
        self.streaming_adapter = Some(adapter);
        self
    }

    /// Resolve `request` and deliver it through `on_token(fragment, accumulated)`.
    ///
    /// Outside training mode an enabled streaming adapter is tried first; any
    /// failure there degrades to full orchestrator resolution. When every
    /// provider fails the degraded notice is streamed and returned instead of
    /// an error. Only cancellation and invalid requests are returned as `Err`.
    #[instrument(skip(self, ctx, request, on_token), fields(training = request.options.is_training))]
    pub async fn call_stream<F>(
        &self,
        ctx: &CallContext,
        request: &GenerationRequest,
        mut on_token: F,
    ) -> GatewayResult<String>
    where
        F: FnMut(&str, &str) + Send,
    {
        request.validate()?;
        ctx.ensure_active()?;

        if !request.options.is_training {
            if let Some(adapter) = self.streaming_adapter.as_ref().filter(|a| a.is_enabled()) {
                match self
                    .stream_from_adapter(ctx, adapter.as_ref(), request, &mut on_token)
                    .await
                {
                    Ok(text) => return Ok(text),
                    Err(GatewayError::Cancelled) => return Err(GatewayError::Cancelled),
                    Err(error) => {
                        warn!(provider = %adapter.name(), error = %error, "real streaming failed, degrading to fallback resolution");
                    }
                }
            }
        }

        let text = match self.orchestrator.resolve(ctx, request).await {
            Ok(result) => result.content,
            Err(error @ GatewayError::TotalFailure { .. }) => {
                warn!(error = %error, "streaming degraded notice");
                degraded_notice(&request.prompt)
            }
            Err(error) => return Err(error),
        };

        self.emit(ctx, &text, &mut on_token).await?;
        Ok(text)
    }

    async fn stream_from_adapter<F>(
        &self,
        ctx: &CallContext,
        adapter: &dyn StreamingAdapter,
        request: &GenerationRequest,
        on_token: &mut F,
    ) -> GatewayResult<String>
    where
        F: FnMut(&str, &str) + Send,
    {
        let mut stream = adapter.call_stream(ctx, request).await?;
        let mut accumulated = String::new();

        if adapter.is_incremental() {
            while let Some(item) = next_fragment(ctx, &mut stream).await? {
                match item {
                    Ok(fragment) if fragment.is_empty() => {}
                    Ok(fragment) => {
                        accumulated.push_str(&fragment);
                        on_token(&fragment, &accumulated);
                    }
                    // Fragments already delivered cannot be retracted
                    Err(error) if !accumulated.is_empty() => {
                        warn!(error = %error, delivered = accumulated.len(), "stream interrupted, keeping partial text");
                        return Ok(accumulated);
                    }
                    Err(error) => return Err(error),
                }
            }
        } else {
            while let Some(item) = next_fragment(ctx, &mut stream).await? {
                accumulated.push_str(&item?);
            }
            if !accumulated.is_empty() {
                self.emit(ctx, &accumulated, on_token).await?;
            }
        }

        if accumulated.is_empty() {
            return Err(GatewayError::empty_response(adapter.name()));
        }
        debug!(provider = %adapter.name(), chars = accumulated.len(), "streamed completion");
        Ok(accumulated)
    }

    /// Pace `text` out fragment by fragment
    async fn emit<F>(&self, ctx: &CallContext, text: &str, on_token: &mut F) -> GatewayResult<()>
    where
        F: FnMut(&str, &str) + Send,
    {
        let mut accumulated = String::with_capacity(text.len());
        for fragment in split_tokens(text) {
            let delay = self.next_delay();
            if delay.is_zero() {
                ctx.ensure_active()?;
            } else {
                ctx.sleep(delay).await?;
            }
            accumulated.push_str(fragment);
            on_token(fragment, &accumulated);
        }
        Ok(())
    }

    fn next_delay(&self) -> Duration {
        let min = self.pacing.min_delay_ms;
        let max = self.pacing.max_delay_ms;
        if max <= min {
            return Duration::from_millis(min);
        }
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

/// Next stream item, or `Cancelled` as soon as the caller aborts
async fn next_fragment(
    ctx: &CallContext,
    stream: &mut TokenStream,
) -> GatewayResult<Option<GatewayResult<String>>> {
    tokio::select! {
        _ = ctx.cancellation().cancelled() => Err(GatewayError::Cancelled),
        item = stream.next() => Ok(item),
    }
}

impl std::fmt::Debug for StreamEmulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamEmulator")
            .field("orchestrator", &self.orchestrator)
            .field(
                "streaming_adapter",
                &self.streaming_adapter.as_ref().map(|a| a.name()),
            )
            .field("pacing", &self.pacing)
            .finish()
    }
}
