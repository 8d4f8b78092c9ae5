//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use llmgate_core::{GenerationOptions, GenerationRequest};

#[derive(Parser)]
#[command(name = "llmgate")]
#[command(about = "Multi-provider text generation with retries, fallback and emulated streaming")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a completion and print it
    Generate {
        #[command(flatten)]
        request: RequestArgs,

        /// Print the serving provider and every attempt as JSON
        #[arg(long)]
        details: bool,
    },

    /// Generate a completion and print fragments as they arrive
    Stream {
        #[command(flatten)]
        request: RequestArgs,
    },

    /// Probe the local inference host
    CheckLocal,

    /// Show the effective configuration with credentials redacted
    Config,
}

/// Flags shared by `generate` and `stream`
#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// The user prompt
    pub prompt: String,

    /// System prompt
    #[arg(long, short)]
    pub system: Option<String>,

    /// Sampling temperature
    #[arg(long, short, default_value_t = GenerationRequest::DEFAULT_TEMPERATURE)]
    pub temperature: f32,

    /// Use the cost-saving training ordering
    #[arg(long)]
    pub training: bool,

    /// Try the local host first in training mode
    #[arg(long)]
    pub prefer_local: bool,

    /// Completion token cap
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Local host request timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Do not retry the local fallback model
    #[arg(long)]
    pub no_local_fallback: bool,
}

impl RequestArgs {
    pub fn to_request(&self) -> GenerationRequest {
        let options = GenerationOptions {
            max_tokens: self.max_tokens,
            timeout_ms: self.timeout_ms,
            is_training: self.training,
            use_fallback: self.no_local_fallback.then_some(false),
            prefer_local: self.prefer_local.then_some(true),
        };

        GenerationRequest::new(self.prompt.clone())
            .with_system_prompt(self.system.clone().unwrap_or_default())
            .with_temperature(self.temperature)
            .with_options(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_defaults() {
        let cli = Cli::try_parse_from(["llmgate", "generate", "2+2=?"]).unwrap();
        let Commands::Generate { request, details } = cli.command else {
            panic!("expected generate");
        };
        assert!(!details);

        let request = request.to_request();
        assert_eq!(request.prompt, "2+2=?");
        assert_eq!(request.system_prompt, "");
        assert_eq!(request.temperature, GenerationRequest::DEFAULT_TEMPERATURE);
        assert_eq!(request.options, GenerationOptions::default());
    }

    #[test]
    fn test_training_flags_map_to_options() {
        let cli = Cli::try_parse_from([
            "llmgate",
            "stream",
            "label this",
            "--system",
            "be terse",
            "--temperature",
            "0.1",
            "--training",
            "--prefer-local",
            "--max-tokens",
            "64",
            "--timeout-ms",
            "5000",
            "--no-local-fallback",
        ])
        .unwrap();
        let Commands::Stream { request } = cli.command else {
            panic!("expected stream");
        };

        let request = request.to_request();
        assert_eq!(request.system_prompt, "be terse");
        assert_eq!(request.temperature, 0.1);
        assert!(request.options.is_training);
        assert_eq!(request.options.prefer_local, Some(true));
        assert_eq!(request.options.max_tokens, Some(64));
        assert_eq!(request.options.timeout_ms, Some(5000));
        assert_eq!(request.options.use_fallback, Some(false));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["llmgate", "check-local", "--verbose", "--log-json"]).unwrap();
        assert!(cli.verbose);
        assert!(cli.log_json);
        assert!(matches!(cli.command, Commands::CheckLocal));
    }

    #[test]
    fn test_prompt_is_required() {
        assert!(Cli::try_parse_from(["llmgate", "generate"]).is_err());
    }
}
