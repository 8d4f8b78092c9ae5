//! Primary-Chat retry behaviour against a mock upstream

mod common;

use std::time::{Duration, Instant};

use common::{PRIMARY_KEY, chat_completion, quiet_config, with_primary};
use llmgate_core::{CallOutcome, Gateway, GatewayError, GenerationRequest, ProviderName};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_first_try_success_returns_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", format!("Bearer {}", PRIMARY_KEY).as_str()))
        .and(body_partial_json(json!({
            "model": "grok-beta",
            "max_tokens": 4000,
            "messages": [{ "role": "user", "content": "2+2=?" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion("4")))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = Gateway::from_config(with_primary(quiet_config(), &server)).unwrap();
    let result = gateway
        .generate_detailed(GenerationRequest::new("2+2=?"))
        .await
        .unwrap();

    assert_eq!(result.content, "4");
    assert_eq!(result.provider_used, ProviderName::Primary);
    assert!(!result.degraded);
    assert_eq!(result.attempts.len(), 1);
    assert_eq!(result.attempts[0].outcome, CallOutcome::Success);
}

#[tokio::test]
async fn test_server_errors_are_retried_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion("third time lucky")))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = Gateway::from_config(with_primary(quiet_config(), &server)).unwrap();
    let result = gateway
        .generate_detailed(GenerationRequest::new("try hard"))
        .await
        .unwrap();

    assert_eq!(result.content, "third time lucky");
    let outcomes: Vec<_> = result.attempts.iter().map(|a| a.outcome).collect();
    assert_eq!(
        outcomes,
        vec![
            CallOutcome::ServerError,
            CallOutcome::ServerError,
            CallOutcome::Success
        ]
    );
    let indices: Vec<_> = result.attempts.iter().map(|a| a.attempt_index).collect();
    assert_eq!(indices, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_rate_limit_is_retried_max_retries_plus_one_times() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "1")
                .set_body_json(json!({ "error": { "message": "slow down" } })),
        )
        .expect(3)
        .mount(&server)
        .await;

    let gateway = Gateway::from_config(with_primary(quiet_config(), &server)).unwrap();
    let started = Instant::now();
    let err = gateway
        .generate(GenerationRequest::new("hello"))
        .await
        .unwrap_err();

    assert!(started.elapsed() >= Duration::from_secs(2));
    match err {
        GatewayError::TotalFailure { message } => assert!(message.contains("slow down")),
        other => panic!("expected total failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rate_limit_wait_is_capped_by_budget() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
        .expect(2)
        .mount(&server)
        .await;

    let mut config = with_primary(quiet_config(), &server);
    config.primary.rate_limit_budget_ms = 300;
    let gateway = Gateway::from_config(config).unwrap();

    let started = Instant::now();
    let err = gateway
        .generate(GenerationRequest::new("hello"))
        .await
        .unwrap_err();

    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(300));
    assert!(elapsed < Duration::from_secs(10));
    assert!(matches!(err, GatewayError::TotalFailure { .. }));
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Incorrect API key provided", "api_key": "test-primary-key" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = Gateway::from_config(with_primary(quiet_config(), &server)).unwrap();
    let err = gateway
        .generate(GenerationRequest::new("hello"))
        .await
        .unwrap_err();

    let text = err.to_string();
    assert!(text.contains("Incorrect API key provided"));
    assert!(!text.contains(PRIMARY_KEY));
}

#[tokio::test]
async fn test_empty_completion_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion("")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion("filled")))
        .mount(&server)
        .await;

    let gateway = Gateway::from_config(with_primary(quiet_config(), &server)).unwrap();
    let result = gateway
        .generate_detailed(GenerationRequest::new("hello"))
        .await
        .unwrap();

    assert_eq!(result.content, "filled");
    assert_eq!(result.attempts[0].outcome, CallOutcome::EmptyResponse);
}

#[tokio::test]
async fn test_timeouts_exhaust_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_completion("too late"))
                .set_delay(Duration::from_secs(2)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let mut config = with_primary(quiet_config(), &server);
    config.primary.timeout_ms = 100;
    config.primary.max_retries = 1;
    let gateway = Gateway::from_config(config).unwrap();

    let err = gateway
        .generate_detailed(GenerationRequest::new("hello"))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("primary timeout after 2 attempts"));
}

#[tokio::test]
async fn test_each_model_is_tried_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "model": "grok-2" })))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({ "model": "grok-beta" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion("from beta")))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = with_primary(quiet_config(), &server);
    config.primary.models = vec!["grok-2".into(), "grok-beta".into()];
    config.primary.max_retries = 1;
    let gateway = Gateway::from_config(config).unwrap();

    let result = gateway
        .generate_detailed(GenerationRequest::new("hello"))
        .await
        .unwrap();

    assert_eq!(result.content, "from beta");
    let models: Vec<_> = result.attempts.iter().map(|a| a.model_id.as_str()).collect();
    assert_eq!(models, vec!["grok-2", "grok-2", "grok-beta"]);
}

#[tokio::test]
async fn test_oversized_retry_after_is_bounded_by_budget() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "1e20"))
        .expect(2..)
        .mount(&server)
        .await;

    let mut config = with_primary(quiet_config(), &server);
    config.primary.rate_limit_budget_ms = 100;
    let gateway = Gateway::from_config(config).unwrap();

    let started = Instant::now();
    let err = gateway
        .generate(GenerationRequest::new("hello"))
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::TotalFailure { .. }));
    assert!(started.elapsed() < Duration::from_secs(10));

    let text = gateway
        .generate_streaming(GenerationRequest::new("hello"), |_: &str, _: &str| {})
        .await
        .unwrap();
    assert!(text.contains("degraded mode"));
}
