//! Capability execution, one device or a concurrent fan-out.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;

use homeweave_core::{Capability, CapabilityParams, Invocation, Provider, execute_on_group};

use crate::cli::{ExecArgs, GlobalOpts, Switch};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct ExecReport<'a> {
    device: &'a str,
    #[serde(flatten)]
    invocation: Invocation,
}

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Result")]
    result: String,
    #[tabled(rename = "Error")]
    error: String,
}

#[derive(Serialize)]
struct Outcome {
    device: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Translate the flags into the engine's loose parameter bag.
pub fn params_from_args(args: &ExecArgs) -> CapabilityParams {
    let (r, g, b) = match args.rgb.as_deref() {
        Some([r, g, b]) => (Some(*r), Some(*g), Some(*b)),
        _ => (None, None, None),
    };
    CapabilityParams {
        value: args.value.map(Value::from),
        desired_state: args.state.map(|s| matches!(s, Switch::On)),
        hue: args.hue.map(Value::from),
        hex: args.hex.clone(),
        color: None,
        r,
        g,
        b,
    }
}

fn detail(report: &ExecReport<'_>) -> String {
    let inv = &report.invocation;
    let mut line = format!(
        "{} on {}: command {}",
        inv.capability, report.device, inv.command_id
    );
    if let Some(slider) = inv.slider {
        line.push_str(&format!(" (slider {slider})"));
    }
    if let Some(ref color) = inv.color {
        line.push_str(&format!(" (color {color})"));
    }
    if let Some(kelvin) = inv.kelvin {
        line.push_str(&format!(" (~{kelvin} K)"));
    }
    line
}

pub async fn handle(
    provider: &Arc<dyn Provider>,
    args: &ExecArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let capability = Capability::from(args.capability);
    let params = params_from_args(args);

    if let [device] = args.devices.as_slice() {
        let invocation = provider
            .execute_capability(device, capability, &params)
            .await?;
        let report = ExecReport {
            device,
            invocation,
        };
        let out = output::render_single(&global.output, &report, detail, |r| {
            r.invocation.command_id.clone()
        })?;
        output::print_output(&out, global.quiet);
        return Ok(());
    }

    let (lookup, devices) = util::adhoc_devices(provider.as_ref(), &args.devices).await;
    let result = execute_on_group(provider, &lookup, &devices, capability, &params).await;

    // Back to input order across both lists.
    let outcomes: Vec<Outcome> = devices
        .iter()
        .map(|device| {
            let error = result
                .failed
                .iter()
                .find(|f| &f.device == device)
                .map(|f| f.error.clone());
            Outcome {
                device: device.to_string(),
                ok: error.is_none(),
                error,
            }
        })
        .collect();

    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &outcomes,
        |o| OutcomeRow {
            device: o.device.clone(),
            result: output::paint_outcome(o.ok, color),
            error: o.error.clone().unwrap_or_default(),
        },
        |o| format!("{} {}", o.device, if o.ok { "ok" } else { "failed" }),
    )?;
    output::print_output(&out, global.quiet);

    if result.success() {
        Ok(())
    } else {
        Err(CliError::PartialFailure {
            failed: result.failed.len(),
            total: devices.len(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;

    fn exec_args(args: &[&str]) -> ExecArgs {
        let mut argv = vec!["homeweave", "exec"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Exec(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn dim_value_becomes_numeric_param() {
        let params = params_from_args(&exec_args(&["dim", "13", "--value", "40"]));
        assert_eq!(params.value, Some(Value::from(40.0)));
        assert_eq!(params.desired_state, None);
    }

    #[test]
    fn toggle_state_sets_desired_state() {
        let params = params_from_args(&exec_args(&["toggle", "13", "14", "--state", "off"]));
        assert_eq!(params.desired_state, Some(false));
    }

    #[test]
    fn rgb_is_split_into_channels() {
        let params = params_from_args(&exec_args(&["color", "13", "--rgb", "255,128,0"]));
        assert_eq!((params.r, params.g, params.b), (Some(255), Some(128), Some(0)));
        assert_eq!(params.hue, None);
    }
}
