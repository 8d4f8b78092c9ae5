//! Local inference host probe

use llmgate_core::Gateway;

use crate::console::CliConsole;

/// Report whether the local host answers its model listing
pub async fn check(gateway: &Gateway, console: &CliConsole) -> anyhow::Result<()> {
    let local = &gateway.config().local;
    if !local.enabled {
        anyhow::bail!("local host is disabled (set LOCAL_ENABLED=true)");
    }

    if !gateway.check_local_availability().await {
        anyhow::bail!("local host not reachable at {}", local.base_url);
    }

    console.success(&format!("Local host reachable at {}", local.base_url));
    Ok(())
}
