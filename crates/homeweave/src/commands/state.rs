//! Canonical state reads, one device or many.

use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;

use homeweave_core::{DeviceRef, DeviceState, Provider, read_group_state};

use crate::cli::{GlobalOpts, StateArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct StateEntry {
    device: DeviceRef,
    #[serde(flatten)]
    state: DeviceState,
}

#[derive(Tabled)]
struct StateRow {
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "State")]
    on: String,
    #[tabled(rename = "Raw")]
    raw: String,
    #[tabled(rename = "Source")]
    source: String,
}

pub async fn handle(
    provider: &Arc<dyn Provider>,
    args: &StateArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (lookup, devices) = util::adhoc_devices(provider.as_ref(), &args.devices).await;
    let result = read_group_state(provider, &lookup, &devices).await;

    let color = output::should_color(&global.color);
    let entries: Vec<StateEntry> = result
        .states
        .into_iter()
        .map(|(device, state)| StateEntry { device, state })
        .collect();

    let out = output::render_list(
        &global.output,
        &entries,
        |e| StateRow {
            device: e.device.to_string(),
            on: output::paint_on(e.state.on, color),
            raw: e.state.raw.as_ref().map_or_else(|| "-".into(), ToString::to_string),
            source: e
                .state
                .source
                .map_or_else(|| "-".into(), |s| s.to_string()),
        },
        |e| match e.state.on {
            Some(true) => "on".into(),
            Some(false) => "off".into(),
            None => "unknown".into(),
        },
    )?;
    output::print_output(&out, global.quiet);

    for failure in &result.failed {
        eprintln!("{}: {}", failure.device, failure.error);
    }
    if result.failed.is_empty() {
        Ok(())
    } else {
        Err(CliError::PartialFailure {
            failed: result.failed.len(),
            total: args.devices.len(),
        })
    }
}
