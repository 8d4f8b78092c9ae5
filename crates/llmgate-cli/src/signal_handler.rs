//! Ctrl+C handling for in-flight gateway calls

use futures::stream::StreamExt;
use llmgate_core::CancellationToken;
use signal_hook::consts::SIGINT;
use signal_hook_tokio::{Handle, Signals};
use tokio::task::JoinHandle;

/// Cancels a token on the first SIGINT while a call is running
pub struct SignalHandler {
    token: CancellationToken,
    handle: Handle,
    task: JoinHandle<()>,
}

impl SignalHandler {
    /// Install the handler
    pub fn start() -> anyhow::Result<Self> {
        let mut signals = Signals::new([SIGINT])?;
        let handle = signals.handle();
        let token = CancellationToken::new();
        let trigger = token.clone();

        let task = tokio::spawn(async move {
            if signals.next().await.is_some() {
                tracing::info!("interrupt received, cancelling");
                trigger.cancel();
            }
        });

        Ok(Self {
            token,
            handle,
            task,
        })
    }

    /// Token to pass to the gateway call
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Stop listening for SIGINT and end the listener task.
    ///
    /// The process-wide disposition installed by signal-hook stays in place, so
    /// later Ctrl+C presses are ignored rather than terminating the process.
    pub fn stop(self) {
        self.handle.close();
        self.task.abort();
    }
}
