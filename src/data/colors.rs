//! Color parsing and conversion
//!
//! Colors are configured as hex strings (`#RRGGBB`) in operator properties and
//! carried through the figure model as [`Rgba`] so the renderer can apply the
//! per-layer opacity.

use plotters::style::RGBAColor;
use tracing::warn;

/// An 8-bit RGB color with a floating point opacity in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f64,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1.0 }
    }

    /// Build from channel fractions in [0, 1]
    pub fn from_fractions(r: f64, g: f64, b: f64) -> Self {
        let to_u8 = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgb(to_u8(r), to_u8(g), to_u8(b))
    }

    /// Same color with a different opacity
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.alpha <= 0.0
    }

    pub fn to_plotters(self) -> RGBAColor {
        RGBAColor(self.r, self.g, self.b, self.alpha)
    }
}

/// Parse a hex color string to RGB array
///
/// Supports formats:
/// - `#RRGGBB` (6 hex digits)
/// - `#RRGGBBAA` (8 hex digits, alpha ignored)
/// - `RRGGBB` (without #)
pub fn parse_hex_color(hex: &str) -> Option<[u8; 3]> {
    let hex = hex.trim().trim_start_matches('#');

    if !hex.is_ascii() {
        warn!("Invalid hex color '{}': non-ASCII characters", hex);
        return None;
    }

    if hex.len() != 6 && hex.len() != 8 {
        warn!("Invalid hex color length '{}': {}", hex, hex.len());
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some([r, g, b])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#99CC33"), Some([153, 204, 51]));
        assert_eq!(parse_hex_color("800000"), Some([128, 0, 0]));
        assert_eq!(parse_hex_color("#CCCCCCFF"), Some([204, 204, 204]));

        assert_eq!(parse_hex_color("#FFF"), None);
        assert_eq!(parse_hex_color("GGGGGG"), None);
    }

    #[test]
    fn test_parse_hex_color_rejects_non_ascii() {
        // Six bytes but not six characters
        assert_eq!(parse_hex_color("#aéééb"), None);
        assert_eq!(parse_hex_color("ééé"), None);
    }

    #[test]
    fn test_from_fractions_matches_hex() {
        let scatter = Rgba::from_fractions(0.6, 0.8, 0.2);
        assert_eq!([scatter.r, scatter.g, scatter.b], [153, 204, 51]);

        let grid = Rgba::from_fractions(0.8, 0.8, 0.8);
        assert_eq!([grid.r, grid.g, grid.b], [204, 204, 204]);
    }

    #[test]
    fn test_alpha_is_clamped() {
        let c = Rgba::BLACK.with_alpha(1.7);
        assert_eq!(c.alpha, 1.0);
        assert!(Rgba::WHITE.with_alpha(0.0).is_transparent());
    }
}
