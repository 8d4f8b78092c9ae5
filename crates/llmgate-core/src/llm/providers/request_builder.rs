//! Request bodies and response extraction for the three wire protocols
//!
//! - OpenAI-compatible chat completions (Primary-Chat, Tertiary-Chat)
//! - `generateContent` (Secondary-Chat)
//! - local `/api/chat` (Local-Chat)

use crate::config::timeouts;
use crate::llm::messages::GenerationRequest;
use serde_json::{Value, json};

/// Build an OpenAI-compatible chat completion body.
///
/// `max_tokens` is only sent when given; the primary adapter passes its
/// default, the tertiary probe passes the caller's value if any.
pub fn build_openai_request_body(
    model: &str,
    request: &GenerationRequest,
    max_tokens: Option<u32>,
) -> Value {
    let mut body = json!({
        "model": model,
        "temperature": request.temperature,
        "messages": request.messages(),
    });

    if let Some(max_tokens) = max_tokens {
        body["max_tokens"] = json!(max_tokens);
    }

    body
}

/// Build a `generateContent` body.
///
/// The protocol is used here without a separate system channel: the system
/// prompt is folded into the single user turn.
pub fn build_google_request_body(request: &GenerationRequest) -> Value {
    let text = if request.system_prompt.is_empty() {
        request.prompt.clone()
    } else {
        format!("{}\n\n{}", request.system_prompt, request.prompt)
    };

    let mut generation_config = json!({ "temperature": request.temperature });
    if let Some(max_tokens) = request.options.max_tokens {
        generation_config["maxOutputTokens"] = json!(max_tokens);
    }

    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": text }],
        }],
        "generationConfig": generation_config,
    })
}

/// Build a local `/api/chat` body with the request's token cap
pub fn build_local_request_body(model: &str, request: &GenerationRequest) -> Value {
    json!({
        "model": model,
        "messages": request.messages(),
        "options": {
            "temperature": request.temperature,
            "num_predict": request.local_max_tokens(),
            "num_ctx": timeouts::local::CONTEXT_WINDOW,
        },
        "stream": false,
    })
}

/// `choices[0].message.content`
pub fn extract_openai_text(response: &Value) -> Option<String> {
    non_empty(&response["choices"][0]["message"]["content"])
}

/// `candidates[0].content.parts[0].text`
pub fn extract_google_text(response: &Value) -> Option<String> {
    non_empty(&response["candidates"][0]["content"]["parts"][0]["text"])
}

/// `message.content`
pub fn extract_local_text(response: &Value) -> Option<String> {
    non_empty(&response["message"]["content"])
}

fn non_empty(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}
