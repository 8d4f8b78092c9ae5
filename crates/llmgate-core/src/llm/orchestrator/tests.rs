//! Orchestrator tests over mocked adapters

use std::sync::Arc;

use super::FallbackOrchestrator;
use crate::error::GatewayError;
use crate::llm::attempts::{CallAttempt, CallContext, CallOutcome};
use crate::llm::messages::GenerationRequest;
use crate::llm::provider_types::{ProviderDescriptor, ProviderName};
use crate::llm::providers::MockProviderAdapter;

fn mock(name: ProviderName, enabled: bool) -> MockProviderAdapter {
    let mut adapter = MockProviderAdapter::new();
    adapter
        .expect_descriptor()
        .return_const(ProviderDescriptor::new(name).with_enabled(enabled));
    adapter
}

fn answering(name: ProviderName, text: &'static str) -> MockProviderAdapter {
    let mut adapter = mock(name, true);
    adapter.expect_call().times(1).returning(move |ctx, _| {
        ctx.record(CallAttempt::skipped(name, "m", CallOutcome::Success));
        Ok(text.to_string())
    });
    adapter
}

fn silent(name: ProviderName) -> MockProviderAdapter {
    let mut adapter = mock(name, true);
    adapter
        .expect_call()
        .times(1)
        .returning(|_, _| Ok(String::new()));
    adapter
}

fn untouched(name: ProviderName, enabled: bool) -> MockProviderAdapter {
    let mut adapter = mock(name, enabled);
    adapter.expect_call().never();
    adapter
}

fn orchestrator(adapters: Vec<MockProviderAdapter>) -> FallbackOrchestrator {
    adapters
        .into_iter()
        .fold(FallbackOrchestrator::new(true), |orch, adapter| {
            orch.with_adapter(Arc::new(adapter))
        })
}

#[tokio::test]
async fn test_first_success_short_circuits() {
    let orch = orchestrator(vec![
        answering(ProviderName::Primary, "4"),
        untouched(ProviderName::Secondary, true),
        untouched(ProviderName::Local, true),
        untouched(ProviderName::Tertiary, true),
    ]);
    let ctx = CallContext::detached();

    let result = orch
        .resolve(&ctx, &GenerationRequest::new("2+2=?"))
        .await
        .unwrap();

    assert_eq!(result.content, "4");
    assert_eq!(result.provider_used, ProviderName::Primary);
    assert!(!result.degraded);
    assert_eq!(result.attempts.len(), 1);
}

#[tokio::test]
async fn test_training_with_healthy_local_skips_hosted_providers() {
    let mut local = answering(ProviderName::Local, "local answer");
    local.expect_is_available().times(1).returning(|_| true);

    let orch = orchestrator(vec![
        untouched(ProviderName::Primary, true),
        untouched(ProviderName::Secondary, true),
        local,
        untouched(ProviderName::Tertiary, true),
    ]);
    let ctx = CallContext::detached();
    let request = GenerationRequest::new("summarize").training().with_prefer_local(true);

    let result = orch.resolve(&ctx, &request).await.unwrap();

    assert_eq!(result.provider_used, ProviderName::Local);
    assert!(!result.degraded);
}

#[tokio::test]
async fn test_training_with_unreachable_local_starts_at_secondary() {
    let mut local = untouched(ProviderName::Local, true);
    local.expect_is_available().times(1).returning(|_| false);

    let orch = orchestrator(vec![
        untouched(ProviderName::Primary, true),
        answering(ProviderName::Secondary, "from secondary"),
        local,
        untouched(ProviderName::Tertiary, true),
    ]);
    let ctx = CallContext::detached();

    let result = orch
        .resolve(&ctx, &GenerationRequest::new("q").training())
        .await
        .unwrap();

    assert_eq!(result.provider_used, ProviderName::Secondary);
    assert!(!result.degraded);
}

#[tokio::test]
async fn test_soft_failure_moves_to_next_provider() {
    let mut secondary = mock(ProviderName::Secondary, true);
    secondary
        .expect_call()
        .times(1)
        .returning(|_, _| Err(GatewayError::http(ProviderName::Secondary, "connection reset")));

    let mut local = answering(ProviderName::Local, "ok");
    local.expect_is_available().never();

    let orch = orchestrator(vec![
        silent(ProviderName::Primary),
        secondary,
        local,
        untouched(ProviderName::Tertiary, true),
    ]);
    let ctx = CallContext::detached();

    let result = orch
        .resolve(&ctx, &GenerationRequest::new("q"))
        .await
        .unwrap();

    assert_eq!(result.content, "ok");
    assert_eq!(result.provider_used, ProviderName::Local);
    assert!(result.degraded);
}

#[tokio::test]
async fn test_hard_failure_of_non_terminal_adapter_is_absorbed() {
    let mut primary = mock(ProviderName::Primary, true);
    primary
        .expect_call()
        .times(1)
        .returning(|_, _| Err(GatewayError::timeout(ProviderName::Primary, 3)));

    let orch = orchestrator(vec![
        primary,
        answering(ProviderName::Secondary, "fallback"),
        untouched(ProviderName::Local, false),
    ]);
    let ctx = CallContext::detached();

    let result = orch
        .resolve(&ctx, &GenerationRequest::new("q"))
        .await
        .unwrap();

    assert_eq!(result.provider_used, ProviderName::Secondary);
    assert!(result.degraded);
}

#[tokio::test]
async fn test_total_failure_carries_last_error() {
    let mut primary = mock(ProviderName::Primary, true);
    primary.expect_call().times(1).returning(|_, _| {
        Err(GatewayError::server_error(ProviderName::Primary, 503, "overloaded"))
    });

    let orch = orchestrator(vec![
        primary,
        silent(ProviderName::Secondary),
        untouched(ProviderName::Local, false),
    ]);
    let ctx = CallContext::detached();

    let err = orch
        .resolve(&ctx, &GenerationRequest::new("q"))
        .await
        .unwrap_err();

    match err {
        GatewayError::TotalFailure { message } => assert!(message.contains("overloaded")),
        other => panic!("expected total failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_total_failure_without_errors_lists_providers() {
    let mut local = silent(ProviderName::Local);
    local.expect_is_available().returning(|_| true);

    let orch = orchestrator(vec![
        local,
        silent(ProviderName::Secondary),
        silent(ProviderName::Tertiary),
    ]);
    let ctx = CallContext::detached();

    let err = orch
        .resolve(&ctx, &GenerationRequest::new("q").training())
        .await
        .unwrap_err();

    let text = err.to_string();
    assert!(text.starts_with("All providers failed"));
    assert!(text.contains("local: no content"));
    assert!(text.contains("tertiary: no content"));
}

#[tokio::test]
async fn test_empty_prompt_never_reaches_adapters() {
    let orch = orchestrator(vec![
        untouched(ProviderName::Primary, true),
        untouched(ProviderName::Secondary, true),
    ]);
    let ctx = CallContext::detached();

    let err = orch
        .resolve(&ctx, &GenerationRequest::new("  "))
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::InvalidRequest { .. }));
}

#[tokio::test]
async fn test_cancellation_during_adapter_stops_the_cascade() {
    let mut primary = mock(ProviderName::Primary, true);
    primary.expect_call().times(1).returning(|ctx, _| {
        ctx.cancellation().cancel();
        Ok(String::new())
    });

    let orch = orchestrator(vec![primary, untouched(ProviderName::Secondary, true)]);
    let ctx = CallContext::detached();

    let err = orch
        .resolve(&ctx, &GenerationRequest::new("q"))
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
}

#[tokio::test]
async fn test_unregistered_provider_is_skipped() {
    let orch = orchestrator(vec![answering(ProviderName::Secondary, "only me")]);
    let ctx = CallContext::detached();

    let result = orch
        .resolve(&ctx, &GenerationRequest::new("q"))
        .await
        .unwrap();

    assert_eq!(result.provider_used, ProviderName::Secondary);
    assert!(result.degraded);
}
