//! Public call surface of the gateway

use std::sync::Arc;

use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::config::{GatewayConfig, load_from_env, timeouts};
use crate::error::{GatewayError, GatewayResult};
use crate::llm::attempts::CallContext;
use crate::llm::messages::{GenerationRequest, GenerationResult};
use crate::llm::observer::{AttemptObserver, TracingObserver};
use crate::llm::orchestrator::FallbackOrchestrator;
use crate::llm::provider_types::ProviderName;
use crate::llm::providers::{
    LocalChatAdapter, PrimaryChatAdapter, SecondaryChatAdapter, StreamingAdapter,
    TertiaryChatAdapter,
};
use crate::llm::streaming::StreamEmulator;

/// Multi-provider text-generation gateway.
///
/// Holds the immutable configuration, the registered adapter table and the
/// streaming emulator. One `Gateway` serves any number of concurrent calls;
/// each call gets its own [`CallContext`].
///
/// # Examples
///
/// ```no_run
/// use llmgate_core::{Gateway, GenerationRequest};
///
/// # async fn example() -> llmgate_core::GatewayResult<()> {
/// let gateway = Gateway::from_env()?;
/// let answer = gateway
///     .generate(GenerationRequest::new("2+2=?").with_temperature(0.0))
///     .await?;
/// println!("{}", answer);
/// # Ok(())
/// # }
/// ```
pub struct Gateway {
    config: Arc<GatewayConfig>,
    orchestrator: Arc<FallbackOrchestrator>,
    emulator: StreamEmulator,
    observer: Arc<dyn AttemptObserver>,
}

impl Gateway {
    /// Build the adapter table from `config`.
    ///
    /// All four adapters are registered; disabled ones skip without network
    /// I/O and show up in the attempt log as `auth_missing`.
    pub fn from_config(config: GatewayConfig) -> GatewayResult<Self> {
        let http_client = Client::builder()
            .connect_timeout(timeouts::http::connect_timeout())
            .user_agent(concat!("llmgate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                GatewayError::config_with_context(
                    format!("Failed to create HTTP client: {}", e),
                    "Building the shared HTTP client",
                )
            })?;

        let primary = Arc::new(PrimaryChatAdapter::new(
            config.primary.clone(),
            http_client.clone(),
        ));
        let orchestrator = FallbackOrchestrator::new(config.prefer_local_for_training)
            .with_adapter(primary.clone())
            .with_adapter(Arc::new(SecondaryChatAdapter::new(
                config.secondary.clone(),
                http_client.clone(),
            )))
            .with_adapter(Arc::new(LocalChatAdapter::new(
                config.local.clone(),
                http_client.clone(),
            )))
            .with_adapter(Arc::new(TertiaryChatAdapter::new(
                config.tertiary.clone(),
                http_client,
            )));

        for provider in ProviderName::ALL {
            info!(provider = %provider, enabled = config.is_enabled(provider), "registered provider adapter");
        }
        debug!(
            provider_priority = %config.provider_priority,
            "PROVIDER_PRIORITY is not consulted; provider order is fixed per mode"
        );

        let streaming: Arc<dyn StreamingAdapter> = primary;
        Ok(Self::from_parts(config, orchestrator, Some(streaming)))
    }

    /// Load configuration from the environment and build the gateway
    pub fn from_env() -> GatewayResult<Self> {
        Self::from_config(load_from_env()?)
    }

    /// Assemble a gateway around a custom adapter table
    pub fn from_parts(
        config: GatewayConfig,
        orchestrator: FallbackOrchestrator,
        streaming_adapter: Option<Arc<dyn StreamingAdapter>>,
    ) -> Self {
        let orchestrator = Arc::new(orchestrator);
        let mut emulator = StreamEmulator::new(orchestrator.clone(), config.emulation);
        if let Some(adapter) = streaming_adapter {
            emulator = emulator.with_streaming_adapter(adapter);
        }

        Self {
            config: Arc::new(config),
            orchestrator,
            emulator,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replace the attempt observer used for subsequent calls
    pub fn with_observer(mut self, observer: Arc<dyn AttemptObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn context(&self, cancel: CancellationToken) -> CallContext {
        CallContext::new(cancel, self.observer.clone())
    }

    /// Generate text, failing only when every provider in the order failed
    pub async fn generate(&self, request: GenerationRequest) -> GatewayResult<String> {
        Ok(self.generate_detailed(request).await?.content)
    }

    /// Generate text and report the serving provider and every attempt made
    pub async fn generate_detailed(
        &self,
        request: GenerationRequest,
    ) -> GatewayResult<GenerationResult> {
        self.generate_with_cancel(request, CancellationToken::new())
            .await
    }

    /// [`generate_detailed`](Self::generate_detailed) bound to a caller token.
    ///
    /// Cancelling `cancel` aborts the in-flight request or backoff sleep and
    /// ends the call with [`GatewayError::Cancelled`].
    #[instrument(skip(self, request, cancel), fields(training = request.options.is_training))]
    pub async fn generate_with_cancel(
        &self,
        request: GenerationRequest,
        cancel: CancellationToken,
    ) -> GatewayResult<GenerationResult> {
        let ctx = self.context(cancel);
        self.orchestrator.resolve(&ctx, &request).await
    }

    /// Generate text through `on_token(fragment, accumulated)`.
    ///
    /// Never fails because providers are down: the degraded notice is streamed
    /// and returned instead.
    pub async fn generate_streaming<F>(
        &self,
        request: GenerationRequest,
        on_token: F,
    ) -> GatewayResult<String>
    where
        F: FnMut(&str, &str) + Send,
    {
        self.generate_streaming_with_cancel(request, CancellationToken::new(), on_token)
            .await
    }

    /// [`generate_streaming`](Self::generate_streaming) bound to a caller token
    pub async fn generate_streaming_with_cancel<F>(
        &self,
        request: GenerationRequest,
        cancel: CancellationToken,
        on_token: F,
    ) -> GatewayResult<String>
    where
        F: FnMut(&str, &str) + Send,
    {
        let ctx = self.context(cancel);
        self.emulator.call_stream(&ctx, &request, on_token).await
    }

    /// Interactive generation with no system prompt and the default temperature
    pub async fn simple_generate(&self, prompt: impl Into<String>) -> GatewayResult<String> {
        self.generate(GenerationRequest::new(prompt)).await
    }

    /// Short reachability probe of the local inference host
    pub async fn check_local_availability(&self) -> bool {
        let ctx = self.context(CancellationToken::new());
        self.orchestrator.check_local_availability(&ctx).await
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("orchestrator", &self.orchestrator)
            .field("emulator", &self.emulator)
            .finish_non_exhaustive()
    }
}
