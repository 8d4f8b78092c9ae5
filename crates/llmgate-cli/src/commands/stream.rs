//! Streaming generation

use std::io::{self, Write};

use llmgate_core::{CancellationToken, Gateway, GenerationRequest};

use crate::signal_handler::SignalHandler;

/// Print fragments as the emulator delivers them
pub async fn run(gateway: &Gateway, request: GenerationRequest) -> anyhow::Result<()> {
    let signals = SignalHandler::start()?;
    let cancel = signals.token();
    let mut write_error = None;

    let outcome = gateway
        .generate_streaming_with_cancel(request, signals.token(), |fragment: &str, _: &str| {
            forward_fragment(&mut io::stdout().lock(), fragment, &cancel, &mut write_error);
        })
        .await;
    signals.stop();

    match write_error {
        Some(e) if e.kind() == io::ErrorKind::BrokenPipe => return Ok(()),
        Some(e) => return Err(e.into()),
        None => {}
    }

    outcome?;
    println!();
    Ok(())
}

/// Write one fragment; the first write failure cancels the call
fn forward_fragment<W: Write>(
    out: &mut W,
    fragment: &str,
    cancel: &CancellationToken,
    write_error: &mut Option<io::Error>,
) {
    if write_error.is_some() {
        return;
    }
    if let Err(e) = out.write_all(fragment.as_bytes()).and_then(|_| out.flush()) {
        *write_error = Some(e);
        cancel.cancel();
    }
}
