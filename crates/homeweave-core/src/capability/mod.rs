// ── Capability inference and resolution ──
//
// Pure functions over a device's command directory: which capabilities it
// supports, which native command serves each one, and how numeric inputs
// are rescaled into a command's native range.

pub mod extract;
pub mod mapping;
pub mod scale;

pub use extract::extract;
pub use mapping::map;
pub use scale::{HueFallback, hue_fallback, rescale};
