// ── Numeric range rescaling ──
//
// Dashboards speak percentages; controllers expose sliders over arbitrary
// native ranges. Inputs in [0, 100] are read as percentages unless the
// native range itself is exactly [0, 100], in which case they are already
// native. Anything else is clamped.

use crate::catalogue::{KELVIN_COOL, KELVIN_WARM};
use crate::model::Bounds;

/// Map `input` into the command's native range.
///
/// Declared bounds win; missing ends come from `fallback`. A range that is
/// still incomplete or empty (`max <= min`) leaves the input unscaled.
pub fn rescale(input: f64, declared: Bounds, fallback: Bounds) -> i64 {
    let min = declared.min.or(fallback.min);
    let max = declared.max.or(fallback.max);

    let scaled = match (min, max) {
        (Some(min), Some(max)) if max > min => {
            if (0.0..=100.0).contains(&input) && !is_percent_range(min, max) {
                min + (input / 100.0) * (max - min)
            } else {
                input.clamp(min, max)
            }
        }
        _ => input,
    };
    to_integer(scaled)
}

/// Result of re-targeting a colour request at a temperature command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HueFallback {
    /// 0-100 intensity sent through the temperature slider.
    pub value: i64,
    /// Kelvin estimate, reported for observability.
    pub kelvin: i64,
}

/// Fold a hue angle onto the warm/cool axis.
///
/// `value = round((1 - |((hue mod 360) - 180)| / 180) * 100)`, so 180° is
/// fully cool and 0°/360° fully warm. A missing hue lands on the mid-point.
pub fn hue_fallback(hue: Option<f64>) -> HueFallback {
    let distance = hue.map_or(0.5, |h| ((h.rem_euclid(360.0) - 180.0) / 180.0).abs());
    let value = to_integer((1.0 - distance) * 100.0);
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    let fraction = value as f64 / 100.0;
    let kelvin = to_integer(KELVIN_WARM + fraction * (KELVIN_COOL - KELVIN_WARM));
    HueFallback { value, kelvin }
}

fn is_percent_range(min: f64, max: f64) -> bool {
    min.abs() < f64::EPSILON && (max - 100.0).abs() < f64::EPSILON
}

#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn to_integer(value: f64) -> i64 {
    value.round() as i64
}
