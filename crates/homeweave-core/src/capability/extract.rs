// ── Capability extractor ──

use crate::catalogue::{COLOR_TAGS, DIM_TAGS, OFF_TAGS, ON_TAGS, TEMPERATURE_TAGS, TOGGLE_TAGS};
use crate::model::{CapabilitySet, NativeCommand};

/// Derive the supported-capability set from tagged commands.
///
/// Toggle is supported natively or through an on/off pair. Order of the
/// command list does not matter.
pub fn extract(commands: &[NativeCommand]) -> CapabilitySet {
    let any = |tags: &[&str]| commands.iter().any(|c| c.has_tag(tags));

    CapabilitySet {
        toggle: any(TOGGLE_TAGS) || (any(ON_TAGS) && any(OFF_TAGS)),
        dim: any(DIM_TAGS),
        color: any(COLOR_TAGS),
        temperature: any(TEMPERATURE_TAGS),
    }
}
