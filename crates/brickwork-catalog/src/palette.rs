use brickwork_core::HexColor;
use serde::{Deserialize, Serialize};

/// One swatch of the builtin color palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub name: String,
    pub hex: HexColor,
    #[serde(default)]
    pub metalness: Option<f32>,
    #[serde(default)]
    pub roughness: Option<f32>,
}

impl PaletteEntry {
    pub fn is_translucent(&self) -> bool {
        self.hex.is_translucent()
    }
}

/// Find the swatch with the given hex code (case-insensitive).
pub fn find_by_hex<'a>(palette: &'a [PaletteEntry], hex: &str) -> Option<&'a PaletteEntry> {
    palette
        .iter()
        .find(|entry| entry.hex.as_str().eq_ignore_ascii_case(hex))
}
