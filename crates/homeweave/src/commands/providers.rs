//! Provider catalogue.

use tabled::Tabled;

use homeweave_core::{ProviderDescriptor, ProviderRegistry};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct ProviderRow {
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&ProviderDescriptor> for ProviderRow {
    fn from(p: &ProviderDescriptor) -> Self {
        Self {
            kind: p.kind.to_string(),
            name: p.name.clone(),
            description: p.description.clone(),
        }
    }
}

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let types = ProviderRegistry::available_types();
    let out = output::render_list(
        &global.output,
        &types,
        |p| ProviderRow::from(p),
        |p| p.kind.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
