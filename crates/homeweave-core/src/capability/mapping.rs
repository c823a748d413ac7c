// ── Command mapper ──

use strum::IntoEnumIterator;
use tracing::debug;

use crate::catalogue::{tags_for, verb_for};
use crate::model::{Capability, CommandMapping, NativeCommand};

/// Build the capability → command id table.
///
/// Each capability takes the first command carrying one of its category
/// tags. Toggle, on and off fall back to the first action command whose
/// name equals the verb, ignoring case.
pub fn map(commands: &[NativeCommand]) -> CommandMapping {
    let mut mapping = CommandMapping::default();

    for capability in Capability::iter() {
        let tags = tags_for(capability);
        let by_tag = commands.iter().find(|c| c.has_tag(tags));
        let by_name = || {
            verb_for(capability).and_then(|verb| {
                commands
                    .iter()
                    .find(|c| c.is_action() && c.name.trim().eq_ignore_ascii_case(verb))
            })
        };

        if let Some(cmd) = by_tag.or_else(by_name) {
            mapping.insert_first(capability, &cmd.id);
        }
    }

    debug!(?mapping, "command mapping built");
    mapping
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bounds, CommandDirection};

    fn cmd(id: &str, name: &str, direction: CommandDirection, tag: Option<&str>) -> NativeCommand {
        NativeCommand {
            id: id.into(),
            name: name.into(),
            direction,
            subtype: None,
            generic_type: tag.map(str::to_owned),
            logical_id: None,
            bounds: Bounds::default(),
            cached_state: None,
        }
    }

    #[test]
    fn tags_win_over_names() {
        let mapping = map(&[
            cmd("1", "On", CommandDirection::Action, None),
            cmd("2", "Allumer", CommandDirection::Action, Some("LIGHT_ON")),
        ]);
        assert_eq!(mapping.get(Capability::On), Some("2"));
    }

    #[test]
    fn name_fallback_is_case_insensitive_and_action_only() {
        let mapping = map(&[
            cmd("1", "TOGGLE", CommandDirection::Info, None),
            cmd("2", "Toggle", CommandDirection::Action, None),
            cmd("3", "OFF", CommandDirection::Action, None),
        ]);
        assert_eq!(mapping.get(Capability::Toggle), Some("2"));
        assert_eq!(mapping.get(Capability::Off), Some("3"));
        assert_eq!(mapping.get(Capability::On), None);
    }

    #[test]
    fn first_match_kept() {
        let mapping = map(&[
            cmd("7", "Slider A", CommandDirection::Action, Some("LIGHT_SLIDER")),
            cmd("8", "Slider B", CommandDirection::Action, Some("LIGHT_SLIDER")),
        ]);
        assert_eq!(mapping.get(Capability::Dim), Some("7"));
    }

    #[test]
    fn no_name_fallback_for_dim() {
        let mapping = map(&[cmd("7", "dim", CommandDirection::Action, None)]);
        assert!(mapping.is_empty());
    }
}
