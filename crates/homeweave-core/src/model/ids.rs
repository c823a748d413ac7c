// ── Persistence-layer references ──
//
// Opaque identifiers handed to the engine by the surrounding application:
// stored device records, widget groupings and controller connections. They
// are not controller-native ids; `DeviceLookup` translates a `DeviceRef`
// into the controller's own device identifier.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! reference_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

reference_type!(
    /// A stored device record.
    DeviceRef
);
reference_type!(
    /// A widget-to-device grouping.
    GroupRef
);
reference_type!(
    /// A stored controller connection.
    ControllerRef
);
