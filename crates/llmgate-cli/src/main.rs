//! llmgate command-line front end
//!
//! Thin wrapper over [`llmgate_core::Gateway`]. Provider credentials and
//! endpoints come from the environment (or `env.local` / `.env`).
//!
//! ```bash
//! llmgate generate "2+2=?" --temperature 0
//! llmgate generate "label this" --training --prefer-local --details
//! llmgate stream "tell me a story"
//! llmgate check-local
//! llmgate config
//! ```
//!
//! Logs go to stderr; `RUST_LOG` overrides the default filter.

mod args;
mod commands;
mod console;
mod router;
mod signal_handler;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);
    router::route(cli).await
}

fn init_logging(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
