//! Output type classification and its wire mapping.
//!
//! The display concept `Material` travels as `"INGREDIENT"`. The mapping is
//! kept in an explicit table so the backend name can diverge from the
//! variant name without renaming the enum.

use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// What a workflow process produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum OutputType {
    /// Finished product
    #[default]
    Product,
    /// Accessory item
    Accessory,
    /// Raw material, stored by the backend as `INGREDIENT`
    Material,
}

/// Bidirectional mapping between variants and wire values, indexed by
/// discriminant.
const WIRE_TABLE: [(OutputType, &str); 3] = [
    (OutputType::Product, "PRODUCT"),
    (OutputType::Accessory, "ACCESSORY"),
    (OutputType::Material, "INGREDIENT"),
];

impl OutputType {
    /// All output types in display order.
    pub const ALL: [OutputType; 3] = [
        OutputType::Product,
        OutputType::Accessory,
        OutputType::Material,
    ];

    /// Value sent to and received from the backend.
    pub fn as_wire(self) -> &'static str {
        WIRE_TABLE[self as usize].1
    }

    /// Parse a backend value. Matching is exact, as on the wire.
    pub fn from_wire(value: &str) -> Option<Self> {
        WIRE_TABLE
            .iter()
            .find(|(_, wire)| *wire == value)
            .map(|(output_type, _)| *output_type)
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            OutputType::Product => "Product",
            OutputType::Accessory => "Accessory",
            OutputType::Material => "Material",
        }
    }
}

impl FromStr for OutputType {
    type Err = String;

    /// Accepts display labels and wire values, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        if let Some(output_type) = Self::from_wire(&upper) {
            return Ok(output_type);
        }
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Invalid output type: {s}"))
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for OutputType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for OutputType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::from_wire(&value).ok_or_else(|| {
            de::Error::unknown_variant(&value, &["PRODUCT", "ACCESSORY", "INGREDIENT"])
        })
    }
}
