//! Visual configuration of a progress bar.
//!
//! Sizes are given the way a web page would give them, as pixels or as a
//! percentage of the containing width, and are converted to terminal cells
//! with [`CellMetrics`] at render time. [`BarStyle`] validates every value
//! before storing it, so a rejected setter never leaves a half-applied style.

use crate::color;
use crate::error::{ensure_number, Error, Result};
use crate::label::format_number;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::fmt;

/// Default fill gradient: two translucent teal tones.
pub static DEFAULT_GRADIENT: Lazy<Vec<String>> =
    Lazy::new(|| vec!["#00adb981".to_string(), "#00eeffec".to_string()]);

/// Default height in pixels.
pub const DEFAULT_HEIGHT_PX: f64 = 30.0;
/// Default width in pixels.
pub const DEFAULT_WIDTH_PX: f64 = 300.0;
/// Color of the unfilled track.
pub const DEFAULT_EMPTY_COLOR: &str = "#606060";
/// Label color when no font color is configured.
pub const DEFAULT_FONT_COLOR: &str = "#ffffff";
/// Font sizes at or above this many pixels render the label in bold.
pub const BOLD_FONT_PX: f64 = 20.0;

/// A size as supplied by a caller: a bare number of pixels or a CSS-like
/// string such as `"100%"`, `"42px"` or `"42"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Length {
    /// Pixels.
    Number(f64),
    /// Text to parse.
    Text(String),
}

impl From<f64> for Length {
    fn from(value: f64) -> Self {
        Length::Number(value)
    }
}

impl From<i32> for Length {
    fn from(value: i32) -> Self {
        Length::Number(f64::from(value))
    }
}

impl From<u32> for Length {
    fn from(value: u32) -> Self {
        Length::Number(f64::from(value))
    }
}

impl From<u16> for Length {
    fn from(value: u16) -> Self {
        Length::Number(f64::from(value))
    }
}

impl From<&str> for Length {
    fn from(value: &str) -> Self {
        Length::Text(value.to_string())
    }
}

impl From<String> for Length {
    fn from(value: String) -> Self {
        Length::Text(value)
    }
}

/// A validated size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    /// Absolute size in pixels.
    Pixels(f64),
    /// Share of the containing width (or height).
    Percent(f64),
}

impl Dimension {
    /// Validates a caller-supplied length.
    pub fn from_length(what: &'static str, length: Length) -> Result<Self> {
        match length {
            Length::Number(px) => {
                let px = ensure_number(what, px)?;
                if px < 0.0 {
                    return Err(Error::invalid(what, format!("{px} is negative")));
                }
                Ok(Dimension::Pixels(px))
            }
            Length::Text(text) => Self::parse(what, &text),
        }
    }

    fn parse(what: &'static str, text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let (number, percent) = match trimmed.strip_suffix('%') {
            Some(rest) => (rest, true),
            None => (trimmed.strip_suffix("px").unwrap_or(trimmed), false),
        };
        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| Error::invalid(what, format!("{text:?} is not a size")))?;
        let value = ensure_number(what, value)?;
        if value < 0.0 {
            return Err(Error::invalid(what, format!("{text:?} is negative")));
        }
        Ok(if percent {
            Dimension::Percent(value)
        } else {
            Dimension::Pixels(value)
        })
    }

    /// Converts to a number of cells, never less than one.
    ///
    /// `container` is the size of the enclosing area in cells and `cell_px`
    /// the pixel size of one cell along the same axis.
    pub fn to_cells(self, container: u16, cell_px: f64) -> u16 {
        let cells = match self {
            Dimension::Pixels(px) => px / cell_px,
            Dimension::Percent(p) => f64::from(container) * p / 100.0,
        };
        cells.round().clamp(1.0, f64::from(u16::MAX)) as u16
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Pixels(px) => write!(f, "{}px", format_number(*px)),
            Dimension::Percent(p) => write!(f, "{}%", format_number(*p)),
        }
    }
}

/// Pixel size of one terminal cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    /// Width of a cell in pixels.
    pub width_px: f64,
    /// Height of a cell in pixels.
    pub height_px: f64,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            width_px: 8.0,
            height_px: 16.0,
        }
    }
}

/// Text art tiled across the filled region in place of the fill color.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundImage {
    source: String,
    left_shift: f64,
    up_shift: f64,
    rows: Vec<Vec<char>>,
}

impl BackgroundImage {
    /// Reads art from the file at `source`.
    pub fn load(source: impl Into<String>, left_shift: f64, up_shift: f64) -> Result<Self> {
        let source = source.into();
        let art = std::fs::read_to_string(&source).map_err(|e| Error::Image {
            path: source.clone(),
            source: e,
        })?;
        Self::from_art(source, &art, left_shift, up_shift)
    }

    /// Uses `art` directly; `source` only names it.
    pub fn from_art(
        source: impl Into<String>,
        art: &str,
        left_shift: f64,
        up_shift: f64,
    ) -> Result<Self> {
        let left_shift = ensure_number("image.leftShift", left_shift)?;
        let up_shift = ensure_number("image.upShift", up_shift)?;
        let rows: Vec<Vec<char>> = art.lines().map(|line| line.chars().collect()).collect();
        if rows.iter().all(|row| row.is_empty()) {
            return Err(Error::invalid("image", "background art is empty"));
        }
        Ok(Self {
            source: source.into(),
            left_shift,
            up_shift,
            rows,
        })
    }

    /// Where the art came from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Horizontal offset into the art, in pixels.
    pub fn left_shift(&self) -> f64 {
        self.left_shift
    }

    /// Vertical offset into the art, in pixels.
    pub fn up_shift(&self) -> f64 {
        self.up_shift
    }

    /// The glyph covering cell (`row`, `col`) of the filled region, if any.
    /// The art repeats in both directions.
    pub(crate) fn glyph(&self, row: usize, col: usize, metrics: CellMetrics) -> Option<char> {
        let up = (self.up_shift / metrics.height_px).round() as i64;
        let left = (self.left_shift / metrics.width_px).round() as i64;
        let line = &self.rows[(row as i64 + up).rem_euclid(self.rows.len() as i64) as usize];
        if line.is_empty() {
            return None;
        }
        let ch = line[(col as i64 + left).rem_euclid(line.len() as i64) as usize];
        (!ch.is_whitespace()).then_some(ch)
    }
}

/// The declarative look of a bar.
#[derive(Debug, Clone, PartialEq)]
pub struct BarStyle {
    height: Dimension,
    width: Dimension,
    font_size: Option<Dimension>,
    font_color: Option<String>,
    opacity: f64,
    gradient: Vec<String>,
    image: Option<BackgroundImage>,
}

impl Default for BarStyle {
    fn default() -> Self {
        Self {
            height: Dimension::Pixels(DEFAULT_HEIGHT_PX),
            width: Dimension::Pixels(DEFAULT_WIDTH_PX),
            font_size: None,
            font_color: None,
            opacity: 1.0,
            gradient: DEFAULT_GRADIENT.clone(),
            image: None,
        }
    }
}

impl BarStyle {
    /// Height of the bar.
    pub fn height(&self) -> Dimension {
        self.height
    }

    /// Width of the bar.
    pub fn width(&self) -> Dimension {
        self.width
    }

    /// Label font size, if set.
    pub fn font_size(&self) -> Option<Dimension> {
        self.font_size
    }

    /// Label color, if set.
    pub fn font_color(&self) -> Option<&str> {
        self.font_color.as_deref()
    }

    /// Opacity as configured (rendering clamps it to `0..=1`).
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Gradient stops, left to right.
    pub fn gradient(&self) -> &[String] {
        &self.gradient
    }

    /// Background art, if set.
    pub fn image(&self) -> Option<&BackgroundImage> {
        self.image.as_ref()
    }

    /// Sets the height.
    pub fn set_height(&mut self, height: impl Into<Length>) -> Result<()> {
        self.height = Dimension::from_length("height", height.into())?;
        Ok(())
    }

    /// Sets the width.
    pub fn set_width(&mut self, width: impl Into<Length>) -> Result<()> {
        self.width = Dimension::from_length("width", width.into())?;
        Ok(())
    }

    /// Sets the label font size.
    pub fn set_font_size(&mut self, size: impl Into<Length>) -> Result<()> {
        self.font_size = Some(Dimension::from_length("fontSize", size.into())?);
        Ok(())
    }

    /// Sets the label color.
    pub fn set_font_color(&mut self, color: &str) -> Result<()> {
        color::validate("fontColor", color)?;
        self.font_color = Some(color.trim().to_string());
        Ok(())
    }

    /// Sets the opacity.
    pub fn set_opacity(&mut self, opacity: f64) -> Result<()> {
        self.opacity = ensure_number("opacity", opacity)?;
        Ok(())
    }

    /// Sets the fill gradient. At least two stops are required.
    pub fn set_gradient<S: AsRef<str>>(&mut self, stops: &[S]) -> Result<()> {
        if stops.len() < 2 {
            return Err(Error::invalid(
                "gradient",
                format!("needs at least 2 colors, got {}", stops.len()),
            ));
        }
        for stop in stops {
            color::validate("gradient", stop.as_ref())?;
        }
        self.gradient = stops.iter().map(|s| s.as_ref().trim().to_string()).collect();
        Ok(())
    }

    /// Sets or clears the background art.
    pub fn set_image(&mut self, image: Option<BackgroundImage>) {
        self.image = image;
    }

    /// Whether the font size calls for a bold label.
    pub(crate) fn bold_label(&self) -> bool {
        matches!(self.font_size, Some(Dimension::Pixels(px)) if px >= BOLD_FONT_PX)
    }

    /// Label color, falling back to the default.
    pub(crate) fn label_color(&self) -> &str {
        self.font_color.as_deref().unwrap_or(DEFAULT_FONT_COLOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let style = BarStyle::default();
        assert_eq!(style.height(), Dimension::Pixels(30.0));
        assert_eq!(style.width(), Dimension::Pixels(300.0));
        assert_eq!(style.opacity(), 1.0);
        assert_eq!(style.gradient(), &["#00adb981", "#00eeffec"]);
        assert!(style.font_size().is_none());
        assert!(style.image().is_none());
    }

    #[test]
    fn test_dimension_parsing() {
        assert_eq!(
            Dimension::from_length("width", "100%".into()).unwrap(),
            Dimension::Percent(100.0)
        );
        assert_eq!(
            Dimension::from_length("width", "42px".into()).unwrap(),
            Dimension::Pixels(42.0)
        );
        assert_eq!(
            Dimension::from_length("width", " 12 ".into()).unwrap(),
            Dimension::Pixels(12.0)
        );
        assert!(Dimension::from_length("width", "wide".into()).is_err());
        assert!(Dimension::from_length("width", "-3px".into()).is_err());
        assert!(Dimension::from_length("width", f64::NAN.into()).is_err());
    }

    #[test]
    fn test_dimension_display() {
        assert_eq!(Dimension::Pixels(30.0).to_string(), "30px");
        assert_eq!(Dimension::Percent(100.0).to_string(), "100%");
    }

    #[test]
    fn test_to_cells() {
        let metrics = CellMetrics::default();
        assert_eq!(Dimension::Pixels(300.0).to_cells(80, metrics.width_px), 38);
        assert_eq!(Dimension::Pixels(30.0).to_cells(1, metrics.height_px), 2);
        assert_eq!(Dimension::Percent(50.0).to_cells(80, metrics.width_px), 40);
        assert_eq!(Dimension::Pixels(0.0).to_cells(80, metrics.width_px), 1);
    }

    #[test]
    fn test_failed_setter_leaves_style_untouched() {
        let mut style = BarStyle::default();
        assert!(style.set_height("tall").is_err());
        assert_eq!(style.height(), Dimension::Pixels(30.0));

        assert!(style.set_gradient(&["#000000, #FFFFFF"]).is_err());
        assert_eq!(style.gradient(), DEFAULT_GRADIENT.as_slice());

        assert!(style.set_gradient(&["#000000", "nope!"]).is_err());
        assert_eq!(style.gradient(), DEFAULT_GRADIENT.as_slice());

        assert!(style.set_opacity(f64::NAN).is_err());
        assert_eq!(style.opacity(), 1.0);
    }

    #[test]
    fn test_bold_label_threshold() {
        let mut style = BarStyle::default();
        assert!(!style.bold_label());
        style.set_font_size(25).unwrap();
        assert!(style.bold_label());
        style.set_font_size("12px").unwrap();
        assert!(!style.bold_label());
    }

    #[test]
    fn test_background_image_tiles() {
        let metrics = CellMetrics::default();
        let image = BackgroundImage::from_art("stars", "*.\n.*", 0.0, 0.0).unwrap();
        assert_eq!(image.glyph(0, 0, metrics), Some('*'));
        assert_eq!(image.glyph(0, 1, metrics), Some('.'));
        assert_eq!(image.glyph(1, 1, metrics), Some('*'));
        assert_eq!(image.glyph(2, 2, metrics), Some('*'));

        let shifted = BackgroundImage::from_art("stars", "*.\n.*", 8.0, 0.0).unwrap();
        assert_eq!(shifted.glyph(0, 0, metrics), Some('.'));
    }

    #[test]
    fn test_background_image_rejects_empty_art() {
        assert!(BackgroundImage::from_art("blank", "", 0.0, 0.0).is_err());
        assert!(matches!(
            BackgroundImage::load("/definitely/not/here.txt", 0.0, 0.0),
            Err(Error::Image { .. })
        ));
    }
}
