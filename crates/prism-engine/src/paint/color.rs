use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// RGBA color with normalized components, used as a clear value.
///
/// Components are straight (not premultiplied) and expected in `[0, 1]`.
/// Stored as `f64` to match the precision of GPU clear values.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    #[inline]
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    #[inline]
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Creates a color from 8-bit channels (`0`–`255`).
    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f64 / 255.0,
            g as f64 / 255.0,
            b as f64 / 255.0,
            a as f64 / 255.0,
        )
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    /// True when every component lies in `[0, 1]`.
    #[inline]
    pub fn is_normalized(self) -> bool {
        [self.r, self.g, self.b, self.a]
            .iter()
            .all(|c| (0.0..=1.0).contains(c))
    }

    /// Clamps all channels to `[0, 1]`. NaN becomes 0.
    #[inline]
    pub fn clamped(self) -> Self {
        let c = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self::new(c(self.r), c(self.g), c(self.b), c(self.a))
    }
}

impl From<Color> for wgpu::Color {
    fn from(c: Color) -> Self {
        wgpu::Color {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

impl From<[f64; 4]> for Color {
    fn from([r, g, b, a]: [f64; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("expected 3 or 4 comma-separated components, got {0}")]
    ComponentCount(usize),

    #[error("invalid component `{0}`")]
    InvalidComponent(String),

    #[error("component `{0}` is outside [0, 1]")]
    OutOfRange(String),

    #[error("invalid hex color `{0}`; expected #rrggbb or #rrggbbaa")]
    InvalidHex(String),
}

/// Parses `r,g,b[,a]` with normalized components, or `#rrggbb[aa]`.
///
/// A missing alpha means opaque.
impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorParseError::InvalidHex(s.to_string()));
        }

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return Err(ColorParseError::ComponentCount(parts.len()));
        }

        let mut c = [1.0; 4];
        for (slot, part) in c.iter_mut().zip(&parts) {
            let v: f64 = part
                .parse()
                .map_err(|_| ColorParseError::InvalidComponent(part.to_string()))?;
            if !(0.0..=1.0).contains(&v) {
                return Err(ColorParseError::OutOfRange(part.to_string()));
            }
            *slot = v;
        }

        Ok(Color::from(c))
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let a = if hex.len() == 8 { byte(6)? } else { 255 };
    Some(Color::from_u8(byte(0)?, byte(2)?, byte(4)?, a))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── parsing ───────────────────────────────────────────────────────────

    #[test]
    fn parses_four_components() {
        let c: Color = "0,0.5,0.7,1".parse().unwrap();
        assert_eq!(c, Color::new(0.0, 0.5, 0.7, 1.0));
    }

    #[test]
    fn missing_alpha_is_opaque() {
        let c: Color = "0.1, 0.2, 0.3".parse().unwrap();
        assert_eq!(c, Color::rgb(0.1, 0.2, 0.3));
    }

    #[test]
    fn parses_hex() {
        let c: Color = "#ff0000".parse().unwrap();
        assert_eq!(c, Color::rgb(1.0, 0.0, 0.0));

        let c: Color = "#00000000".parse().unwrap();
        assert_eq!(c, Color::TRANSPARENT);
    }

    #[test]
    fn rejects_bad_hex() {
        assert!(matches!("#12345".parse::<Color>(), Err(ColorParseError::InvalidHex(_))));
        assert!(matches!("#gg0000".parse::<Color>(), Err(ColorParseError::InvalidHex(_))));
    }

    #[test]
    fn rejects_wrong_component_count() {
        assert_eq!("1,1".parse::<Color>(), Err(ColorParseError::ComponentCount(2)));
        assert_eq!("1,1,1,1,1".parse::<Color>(), Err(ColorParseError::ComponentCount(5)));
    }

    #[test]
    fn rejects_out_of_range_and_garbage() {
        assert_eq!(
            "0,1.5,0".parse::<Color>(),
            Err(ColorParseError::OutOfRange("1.5".to_string()))
        );
        assert_eq!(
            "0,x,0".parse::<Color>(),
            Err(ColorParseError::InvalidComponent("x".to_string()))
        );
    }

    // ── conversion ────────────────────────────────────────────────────────

    #[test]
    fn converts_to_wgpu_exactly() {
        let w: wgpu::Color = Color::new(0.0, 0.5, 0.7, 1.0).into();
        assert_eq!(w, wgpu::Color { r: 0.0, g: 0.5, b: 0.7, a: 1.0 });
    }

    #[test]
    fn clamped_limits_channels() {
        let c = Color::new(-1.0, 2.0, f64::NAN, 0.5).clamped();
        assert_eq!(c, Color::new(0.0, 1.0, 0.0, 0.5));
        assert!(c.is_normalized());
    }
}
