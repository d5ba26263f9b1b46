//! Color handling for progress bars.
//!
//! Terminals have no alpha channel, so translucent colors such as the default
//! `#00adb981` gradient stop are flattened here: first over the color they sit
//! on (the empty track), then toward the terminal backdrop according to the
//! widget's opacity. Named colors and ANSI indices are passed through to
//! lipgloss untouched.

use crate::error::{Error, Result};
use lipgloss_extras::lipgloss;
use lipgloss_extras::lipgloss::blending::blend_1d;
use lipgloss_extras::prelude::*;

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, 255 is opaque.
    pub a: u8,
}

/// Color everything fades toward when opacity drops below 1.
pub const BACKDROP: Rgba = Rgba::opaque(0, 0, 0);

impl Rgba {
    /// Creates an opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parses `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#')?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let short = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
        let long = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => Some(Self::opaque(short(0)?, short(1)?, short(2)?)),
            4 => Some(Self {
                r: short(0)?,
                g: short(1)?,
                b: short(2)?,
                a: short(3)?,
            }),
            6 => Some(Self::opaque(long(0)?, long(2)?, long(4)?)),
            8 => Some(Self {
                r: long(0)?,
                g: long(2)?,
                b: long(4)?,
                a: long(6)?,
            }),
            _ => None,
        }
    }

    /// Formats as `#rrggbb`, dropping alpha.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Composites `self` over `under`, producing an opaque color.
    pub fn over(self, under: Rgba) -> Rgba {
        let alpha = f64::from(self.a) / 255.0;
        Rgba::opaque(
            mix(self.r, under.r, alpha),
            mix(self.g, under.g, alpha),
            mix(self.b, under.b, alpha),
        )
    }

    /// Blends toward [`BACKDROP`]; `opacity` of 1 leaves the color unchanged.
    pub fn faded(self, opacity: f64) -> Rgba {
        let t = opacity.clamp(0.0, 1.0);
        Rgba::opaque(
            mix(self.r, BACKDROP.r, t),
            mix(self.g, BACKDROP.g, t),
            mix(self.b, BACKDROP.b, t),
        )
    }
}

fn mix(top: u8, bottom: u8, t: f64) -> u8 {
    (f64::from(top) * t + f64::from(bottom) * (1.0 - t)).round() as u8
}

/// Checks that `color` is something lipgloss can render.
///
/// Hex strings must parse; anything else must be a bare word or ANSI index
/// such as `red` or `212`.
pub fn validate(what: &'static str, color: &str) -> Result<()> {
    let trimmed = color.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid(what, "empty color"));
    }
    if trimmed.starts_with('#') {
        return match Rgba::parse_hex(trimmed) {
            Some(_) => Ok(()),
            None => Err(Error::invalid(what, format!("{color:?} is not a hex color"))),
        };
    }
    if trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(Error::invalid(what, format!("{color:?} is not a color")))
    }
}

/// Flattens `color` over `under` and fades it by `opacity`.
pub(crate) fn flatten(color: &str, under: Rgba, opacity: f64) -> lipgloss::Color {
    match Rgba::parse_hex(color) {
        Some(rgba) => Color::from(rgba.over(under).faded(opacity).to_hex().as_str()),
        None => Color::from(color.trim()),
    }
}

/// Builds `steps` colors blended across every stop of `stops`.
pub(crate) fn ramp(stops: &[String], steps: usize, under: Rgba, opacity: f64) -> Vec<lipgloss::Color> {
    let steps = steps.max(2);
    let flattened: Vec<lipgloss::Color> = stops
        .iter()
        .map(|stop| flatten(stop, under, opacity))
        .collect();
    blend_1d(steps, flattened)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(Rgba::parse_hex("#fff"), Some(Rgba::opaque(255, 255, 255)));
        assert_eq!(Rgba::parse_hex("#00adb9"), Some(Rgba::opaque(0, 0xad, 0xb9)));
        assert_eq!(
            Rgba::parse_hex("#00adb981"),
            Some(Rgba {
                r: 0,
                g: 0xad,
                b: 0xb9,
                a: 0x81
            })
        );
        assert_eq!(Rgba::parse_hex("#f008").map(|c| c.a), Some(0x88));
        assert_eq!(Rgba::parse_hex("00adb9"), None);
        assert_eq!(Rgba::parse_hex("#12345"), None);
        assert_eq!(Rgba::parse_hex("#000000, #FFFFFF"), None);
    }

    #[test]
    fn test_over_and_faded() {
        let half_white = Rgba {
            r: 255,
            g: 255,
            b: 255,
            a: 128,
        };
        let flat = half_white.over(Rgba::opaque(0, 0, 0));
        assert_eq!(flat.a, 255);
        assert_eq!(flat.r, 128);

        let white = Rgba::opaque(255, 255, 255);
        assert_eq!(white.faded(1.0), white);
        assert_eq!(white.faded(0.0), BACKDROP);
        assert_eq!(white.faded(0.5).to_hex(), "#808080");
    }

    #[test]
    fn test_validate() {
        assert!(validate("fontColor", "#FFFFFF").is_ok());
        assert!(validate("fontColor", "red").is_ok());
        assert!(validate("fontColor", "212").is_ok());
        assert!(validate("fontColor", "").is_err());
        assert!(validate("fontColor", "#GGGGGG").is_err());
        assert!(validate("gradient", "#000000, #FFFFFF").is_err());
    }

    #[test]
    fn test_ramp_length() {
        let stops = vec!["#ff0000".to_string(), "#00ff00".to_string(), "#0000ff".to_string()];
        assert_eq!(ramp(&stops, 10, BACKDROP, 1.0).len(), 10);
        assert_eq!(ramp(&stops, 1, BACKDROP, 1.0).len(), 2);
    }
}
