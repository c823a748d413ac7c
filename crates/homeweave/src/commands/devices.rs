//! Device command handlers.

use tabled::Tabled;

use homeweave_core::{NormalizedDevice, Provider};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Capabilities")]
    capabilities: String,
}

impl From<&NormalizedDevice> for DeviceRow {
    fn from(d: &NormalizedDevice) -> Self {
        Self {
            id: d.id.clone(),
            name: d.name.clone(),
            kind: d.kind.to_string(),
            capabilities: d.capabilities.names().join(", "),
        }
    }
}

fn detail(d: &NormalizedDevice) -> String {
    let caps = d.capabilities.names();
    let mut lines = vec![
        format!("ID:           {}", d.id),
        format!("Name:         {}", d.name),
        format!("Kind:         {}", d.kind),
        format!("Provider:     {}", d.command_mapping.provider_type),
        format!(
            "Capabilities: {}",
            if caps.is_empty() { "-".into() } else { caps.join(", ") }
        ),
    ];
    if d.command_mapping.commands.is_empty() {
        lines.push("Commands:     -".into());
    } else {
        lines.push("Commands:".into());
        for (capability, command_id) in d.command_mapping.commands.iter() {
            lines.push(format!("  {:<12} {command_id}", capability.as_ref()));
        }
    }
    lines.join("\n")
}

pub async fn handle(
    provider: &dyn Provider,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List => {
            let devices = provider.list_devices().await;
            let out = output::render_list(
                &global.output,
                &devices,
                |d| DeviceRow::from(d),
                |d| d.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Get { device } => {
            let found = provider
                .list_devices()
                .await
                .into_iter()
                .find(|d| d.id == device)
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "device".into(),
                    identifier: device.clone(),
                    list_command: "devices list".into(),
                })?;
            let out = output::render_single(&global.output, &found, detail, |d| d.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
