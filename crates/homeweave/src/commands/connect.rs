//! Controller reachability check.

use homeweave_core::Provider;
use serde::Serialize;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct ConnectReport<'a> {
    controller: &'a str,
    provider: String,
    reachable: bool,
}

pub async fn handle(provider: &dyn Provider, url: &str, global: &GlobalOpts) -> Result<(), CliError> {
    if !provider.connect().await {
        return Err(CliError::Unreachable { url: url.into() });
    }

    let report = ConnectReport {
        controller: url,
        provider: provider.kind().to_string(),
        reachable: true,
    };
    let out = output::render_single(
        &global.output,
        &report,
        |r| format!("Connected to {} ({})", r.controller, r.provider),
        |r| r.controller.to_owned(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
