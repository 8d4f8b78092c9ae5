//! Adapter traits shared by every provider

use crate::error::GatewayResult;
use crate::llm::attempts::CallContext;
use crate::llm::messages::GenerationRequest;
use crate::llm::provider_types::{ProviderDescriptor, ProviderName};
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// Stream of text fragments produced by a streaming adapter
pub type TokenStream = Pin<Box<dyn Stream<Item = GatewayResult<String>> + Send>>;

/// Uniform "prompt in, text out" contract over one upstream provider.
///
/// Soft-fail adapters return `Ok(String::new())` on every failure; the
/// orchestrator treats empty text as "this provider failed". Hard-fail
/// adapters return the classified error instead.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Static description of the adapter
    fn descriptor(&self) -> ProviderDescriptor;

    /// Produce a completion for `request`, recording each attempt on `ctx`
    async fn call(&self, ctx: &CallContext, request: &GenerationRequest) -> GatewayResult<String>;

    /// Cheap reachability check; hosted adapters just report whether they are enabled
    async fn is_available(&self, ctx: &CallContext) -> bool;
}

/// Adapter able to hand out text as a fragment stream
#[async_trait]
pub trait StreamingAdapter: Send + Sync {
    fn name(&self) -> ProviderName;

    fn is_enabled(&self) -> bool;

    /// Whether fragments arrive as the upstream produces them.
    ///
    /// Non-incremental adapters yield the whole completion as one fragment and
    /// the caller paces it out itself.
    fn is_incremental(&self) -> bool {
        false
    }

    async fn call_stream(
        &self,
        ctx: &CallContext,
        request: &GenerationRequest,
    ) -> GatewayResult<TokenStream>;
}
