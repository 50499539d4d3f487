use serde::{Deserialize, Serialize};

/// CSS-style hex color, `#RRGGBB` or `#RRGGBBAA`.
///
/// Stored verbatim so that saved projects round-trip byte for byte;
/// parsing happens on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HexColor(pub String);

impl HexColor {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// RGBA channels in `[0, 1]`. Returns None for anything but 6 or 8 hex digits.
    pub fn rgba(&self) -> Option<[f32; 4]> {
        let digits = self.0.strip_prefix('#')?;
        if !digits.is_ascii() || (digits.len() != 6 && digits.len() != 8) {
            return None;
        }
        let channel = |i: usize| -> Option<f32> {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .ok()
                .map(|v| v as f32 / 255.0)
        };
        let alpha = if digits.len() == 8 { channel(6)? } else { 1.0 };
        Some([channel(0)?, channel(2)?, channel(4)?, alpha])
    }

    pub fn is_valid(&self) -> bool {
        self.rgba().is_some()
    }

    /// Whether the color carries an alpha channel below fully opaque.
    pub fn is_translucent(&self) -> bool {
        self.rgba().is_some_and(|c| c[3] < 1.0)
    }
}

impl From<&str> for HexColor {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_color() {
        let c = HexColor::new("#FF0000");
        assert_eq!(c.rgba(), Some([1.0, 0.0, 0.0, 1.0]));
        assert!(!c.is_translucent());
    }

    #[test]
    fn test_alpha_channel() {
        let c = HexColor::new("#4488ff99");
        let rgba = c.rgba().expect("valid");
        assert!((rgba[3] - 0x99 as f32 / 255.0).abs() < 1e-6);
        assert!(c.is_translucent());
    }

    #[test]
    fn test_malformed_colors() {
        for raw in ["FF0000", "#FFF", "#GG0000", "#12345", "#ééé"] {
            assert!(!HexColor::new(raw).is_valid(), "{raw} should be rejected");
        }
    }
}
