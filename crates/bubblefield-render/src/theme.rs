//! Color handling: lenient hex parsing, blending, and brightness.

use bubblefield_core::FieldConfig;
use peniko::Color;

/// An 8-bit RGBA color, the unit the widget theme works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    /// Parse `#rgb`, `#rrggbb`, or `#rrggbbaa`. Invalid digits fall back to
    /// zero per channel; unrecognized shapes return `None`.
    pub fn parse(color: &str) -> Option<Self> {
        let hex = color.strip_prefix('#')?.trim();
        // Slicing below is byte-indexed; non-ASCII input is never a valid
        // hex color, so reject it before it can split a char boundary.
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).unwrap_or(0) * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).unwrap_or(0) * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).unwrap_or(0) * 17;
                Some(Self::new(r, g, b, 255))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                Some(Self::new(r, g, b, 255))
            }
            8 => {
                let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                let a = u8::from_str_radix(&hex[6..8], 16).unwrap_or(255);
                Some(Self::new(r, g, b, a))
            }
            _ => None,
        }
    }

    /// Parse with a logged fallback; theme colors never fail hard.
    pub fn parse_or(color: &str, fallback: Self) -> Self {
        Self::parse(color).unwrap_or_else(|| {
            log::warn!("unparseable color '{color}', using fallback");
            fallback
        })
    }

    /// Linear blend toward `other`, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    /// Perceived brightness in `[0, 1]` (ITU-R BT.601 weights).
    pub fn luminance(self) -> f64 {
        (0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64) / 255.0
    }

    pub fn to_peniko(self) -> Color {
        Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

/// Resolved widget colors, parsed once from the field configuration.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Rgba,
    pub base: Rgba,
    pub selected: Rgba,
    pub text: Rgba,
}

impl Theme {
    /// Parse the configuration's hex strings, falling back per channel to
    /// a dark background, blue base, orange selection, and white text.
    pub fn from_config(config: &FieldConfig) -> Self {
        Self {
            background: Rgba::parse_or(&config.background, Rgba::new(18, 20, 28, 255)),
            base: Rgba::parse_or(&config.bubble_base_color, Rgba::new(59, 130, 196, 255)),
            selected: Rgba::parse_or(&config.bubble_selected_color, Rgba::new(242, 159, 63, 255)),
            text: Rgba::parse_or(&config.text_color, Rgba::new(255, 255, 255, 255)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_hex() {
        assert_eq!(Rgba::parse("#fff"), Some(Rgba::new(255, 255, 255, 255)));
        assert_eq!(Rgba::parse("#f00"), Some(Rgba::new(255, 0, 0, 255)));
    }

    #[test]
    fn test_parse_long_hex() {
        assert_eq!(Rgba::parse("#3b82c4"), Some(Rgba::new(59, 130, 196, 255)));
        assert_eq!(
            Rgba::parse("#11223380"),
            Some(Rgba::new(17, 34, 51, 128))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Rgba::parse("red"), None);
        assert_eq!(Rgba::parse("#12"), None);
        assert_eq!(Rgba::parse(""), None);
        assert_eq!(Rgba::parse_or("nope", Rgba::black()), Rgba::black());
    }

    #[test]
    fn test_parse_rejects_multibyte_strings() {
        // Byte lengths match the 3/6/8 arms, but char boundaries do not.
        assert_eq!(Rgba::parse("#\u{20ac}"), None);
        assert_eq!(Rgba::parse("#a\u{ff}\u{ff}b"), None);
        assert_eq!(Rgba::parse("#\u{20ac}\u{20ac}ab"), None);
        assert_eq!(Rgba::parse_or("#\u{20ac}", Rgba::black()), Rgba::black());
    }

    #[test]
    fn test_invalid_digits_zero_the_channel() {
        // Bad digits fall back to zero instead of rejecting the string.
        assert_eq!(Rgba::parse("#zf0"), Some(Rgba::new(0, 255, 0, 255)));
        assert_eq!(Rgba::parse("#zzff00"), Some(Rgba::new(0, 255, 0, 255)));
    }

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        let a = Rgba::new(0, 0, 0, 255);
        let b = Rgba::new(200, 100, 50, 255);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        let mid = a.lerp(b, 0.5);
        assert_eq!(mid.r, 100);
        assert_eq!(mid.g, 50);
        assert_eq!(mid.b, 25);
        // Out-of-range t clamps.
        assert_eq!(a.lerp(b, 2.0), b);
    }

    #[test]
    fn test_luminance_extremes() {
        assert!(Rgba::black().luminance() < 0.01);
        assert!(Rgba::new(255, 255, 255, 255).luminance() > 0.99);
        // Green dominates perceived brightness.
        assert!(Rgba::new(0, 255, 0, 255).luminance() > Rgba::new(255, 0, 0, 255).luminance());
    }
}
