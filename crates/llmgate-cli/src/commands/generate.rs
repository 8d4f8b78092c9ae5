//! One-shot generation

use std::io::{self, Write};

use llmgate_core::{Gateway, GenerationRequest};

use crate::console::CliConsole;
use crate::signal_handler::SignalHandler;

/// Run one request through the fallback cascade and print the text
pub async fn run(
    gateway: &Gateway,
    request: GenerationRequest,
    details: bool,
    console: &CliConsole,
) -> anyhow::Result<()> {
    let signals = SignalHandler::start()?;
    let outcome = gateway
        .generate_with_cancel(request, signals.token())
        .await;
    signals.stop();

    let result = outcome?;
    console.info(&format!(
        "{} answered after {} attempt(s)",
        result.provider_used,
        result.attempts.len()
    ));
    if result.degraded {
        console.warn(&format!("served by fallback provider {}", result.provider_used));
    }

    let mut stdout = io::stdout().lock();
    if details {
        serde_json::to_writer_pretty(&mut stdout, &result)?;
        writeln!(stdout)?;
    } else {
        writeln!(stdout, "{}", result.content)?;
    }
    Ok(())
}
