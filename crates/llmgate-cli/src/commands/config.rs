//! Configuration display

use llmgate_core::GatewayConfig;

use crate::console::CliConsole;

/// Print the effective configuration with credentials masked
pub fn show(config: &GatewayConfig, console: &CliConsole) {
    console.print_header("Configuration");
    println!("{}", config.redacted_summary());
}
