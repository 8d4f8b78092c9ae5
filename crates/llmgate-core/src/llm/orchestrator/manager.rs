//! Fallback orchestrator

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::ordering::{CallMode, select_order};
use crate::error::{GatewayError, GatewayResult};
use crate::llm::attempts::CallContext;
use crate::llm::messages::{GenerationRequest, GenerationResult};
use crate::llm::provider_types::ProviderName;
use crate::llm::providers::ProviderAdapter;

/// Sequential fallback over a registered adapter table
#[derive(Default)]
pub struct FallbackOrchestrator {
    adapters: HashMap<ProviderName, Arc<dyn ProviderAdapter>>,
    /// Default for `prefer_local` when a training request leaves it unset
    prefer_local_for_training: bool,
}

impl FallbackOrchestrator {
    /// Create an orchestrator with an empty adapter table
    pub fn new(prefer_local_for_training: bool) -> Self {
        Self {
            adapters: HashMap::new(),
            prefer_local_for_training,
        }
    }

    /// Register an adapter under its descriptor name, replacing any previous one
    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) {
        let name = adapter.descriptor().name;
        self.adapters.insert(name, adapter);
    }

    /// Builder form of [`register`](Self::register)
    pub fn with_adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.register(adapter);
        self
    }

    /// Look up a registered adapter
    pub fn adapter(&self, name: ProviderName) -> Option<&Arc<dyn ProviderAdapter>> {
        self.adapters.get(&name)
    }

    fn local_enabled(&self) -> bool {
        self.adapter(ProviderName::Local)
            .map(|adapter| adapter.descriptor().enabled)
            .unwrap_or(false)
    }

    /// Probe the local host; false when no local adapter is registered
    pub async fn check_local_availability(&self, ctx: &CallContext) -> bool {
        match self.adapter(ProviderName::Local) {
            Some(adapter) => adapter.is_available(ctx).await,
            None => false,
        }
    }

    /// Provider order for `request`.
    ///
    /// Training mode only places Local-Chat first when the local host answers
    /// its availability probe. Both values of `prefer_local` lead to the same
    /// order: local first when usable, then Secondary-Chat and Tertiary-Chat.
    pub async fn plan(&self, ctx: &CallContext, request: &GenerationRequest) -> Vec<ProviderName> {
        let mode = CallMode::of(request);
        let local_usable = match mode {
            CallMode::Interactive => self.local_enabled(),
            CallMode::Training => {
                let prefer_local = request
                    .options
                    .prefer_local
                    .unwrap_or(self.prefer_local_for_training);
                let usable = self.local_enabled() && self.check_local_availability(ctx).await;
                debug!(prefer_local, local_usable = usable, "training mode skips primary");
                usable
            }
        };
        select_order(mode, local_usable)
    }

    /// Resolve `request` against the selected provider order.
    ///
    /// The first non-empty completion wins. Empty content, soft failures and
    /// hard failures of any adapter move on to the next provider; once the
    /// order is exhausted a [`GatewayError::TotalFailure`] carries the last
    /// underlying error message. Cancellation ends the call at once.
    #[instrument(skip(self, ctx, request), fields(mode = %CallMode::of(request)))]
    pub async fn resolve(
        &self,
        ctx: &CallContext,
        request: &GenerationRequest,
    ) -> GatewayResult<GenerationResult> {
        request.validate()?;
        ctx.ensure_active()?;

        let order = self.plan(ctx, request).await;
        debug!(order = ?order, "provider order selected");

        let mut failures: Vec<String> = Vec::new();
        let mut last_error: Option<GatewayError> = None;

        for (position, provider) in order.iter().copied().enumerate() {
            ctx.ensure_active()?;

            let Some(adapter) = self.adapters.get(&provider) else {
                debug!(provider = %provider, "no adapter registered");
                failures.push(format!("{}: not configured", provider));
                continue;
            };

            let outcome = adapter.call(ctx, request).await;
            ctx.ensure_active()?;

            match outcome {
                Ok(content) if !content.is_empty() => {
                    let degraded = position > 0;
                    if degraded {
                        info!(provider = %provider, position, "served by fallback provider");
                    }
                    return Ok(GenerationResult {
                        content,
                        provider_used: provider,
                        attempts: ctx.take_attempts(),
                        degraded,
                    });
                }
                Ok(_) => {
                    debug!(provider = %provider, "provider returned no content");
                    failures.push(format!("{}: no content", provider));
                }
                Err(GatewayError::Cancelled) => return Err(GatewayError::Cancelled),
                Err(error) => {
                    warn!(
                        provider = %provider,
                        error = %error,
                        last = position + 1 == order.len(),
                        "provider failed, falling back"
                    );
                    failures.push(format!("{}: {}", provider, error));
                    last_error = Some(error);
                }
            }
        }

        let message = match last_error {
            Some(error) => error.to_string(),
            None if failures.is_empty() => "no provider available for this mode".to_string(),
            None => failures.join("; "),
        };
        warn!(failures = ?failures, "all providers failed");
        Err(GatewayError::total_failure(message))
    }
}

impl std::fmt::Debug for FallbackOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut registered: Vec<_> = self.adapters.keys().copied().collect();
        registered.sort_by_key(|name| name.name());
        f.debug_struct("FallbackOrchestrator")
            .field("adapters", &registered)
            .field("prefer_local_for_training", &self.prefer_local_for_training)
            .finish()
    }
}
