//! Declarative configuration for progress bars.
//!
//! [`Options`] mirrors the options object a web page would pass to the bar:
//! every field is optional, keys are camelCase, and sizes may be numbers or
//! strings. It can be deserialized from JSON (or anything else serde reads)
//! and turned into a [`crate::progress::Model`].
//!
//! ```rust
//! use funloader_widgets::options::Options;
//!
//! let opts = Options::from_json(r#"{ "height": 50, "width": "100%" }"#).unwrap();
//! let bar = opts.build().unwrap();
//! assert_eq!(bar.style().height().to_string(), "50px");
//! assert_eq!(bar.style().width().to_string(), "100%");
//! assert_eq!(bar.style().opacity(), 1.0);
//! ```

use crate::clicker::Purchase;
use crate::error::Result;
use crate::progress::{self, Model, ProgressOption};
use crate::style::{BackgroundImage, Length};
use serde::Deserialize;

/// Background art settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImageOptions {
    /// Path of the text art file.
    pub source: String,
    /// Horizontal offset into the art, in pixels.
    #[serde(default)]
    pub left_shift: f64,
    /// Vertical offset into the art, in pixels.
    #[serde(default)]
    pub up_shift: f64,
}

/// Options for constructing a bar. Unset fields keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Options {
    /// Height in pixels or as a CSS-like string.
    pub height: Option<Length>,
    /// Width in pixels or as a CSS-like string.
    pub width: Option<Length>,
    /// Label font size.
    pub font_size: Option<Length>,
    /// Label color.
    pub font_color: Option<String>,
    /// Whether the bar can be dragged.
    pub draggable: Option<bool>,
    /// Whether the numeric label starts hidden.
    pub hide_percent: Option<bool>,
    /// Whether the bar fades out once complete. Defaults to true.
    pub remove_when_done: Option<bool>,
    /// Opacity between 0 and 1.
    pub opacity: Option<f64>,
    /// Fill gradient stops.
    pub gradient: Option<Vec<String>>,
    /// Whether the percentage may exceed 100.
    pub overflow: Option<bool>,
    /// Background art.
    pub image: Option<ImageOptions>,
    /// Label shown on completion.
    pub finished_message: Option<String>,
    /// Purchases offered by a clicker bar. Setting this builds a clicker.
    pub click_purchases: Option<Vec<Purchase>>,
}

impl Options {
    /// Parses options from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Translates the record into builder options, reading background art
    /// from disk if an image is configured.
    pub fn to_progress_options(&self) -> Result<Vec<ProgressOption>> {
        let mut opts = Vec::new();
        if let Some(height) = &self.height {
            opts.push(progress::with_height(height.clone()));
        }
        if let Some(width) = &self.width {
            opts.push(progress::with_width(width.clone()));
        }
        if let Some(size) = &self.font_size {
            opts.push(progress::with_font_size(size.clone()));
        }
        if let Some(color) = &self.font_color {
            opts.push(progress::with_font_color(color.clone()));
        }
        if self.draggable == Some(true) {
            opts.push(progress::draggable());
        }
        if self.hide_percent == Some(true) {
            opts.push(progress::without_percentage());
        }
        if self.remove_when_done == Some(false) {
            opts.push(progress::keep_when_done());
        }
        if let Some(opacity) = self.opacity {
            opts.push(progress::with_opacity(opacity));
        }
        if let Some(gradient) = &self.gradient {
            opts.push(progress::with_gradient(gradient.iter().cloned()));
        }
        if self.overflow == Some(true) {
            opts.push(progress::with_overflow());
        }
        if let Some(image) = &self.image {
            let art = BackgroundImage::load(image.source.clone(), image.left_shift, image.up_shift)?;
            opts.push(progress::with_image(art));
        }
        if let Some(message) = &self.finished_message {
            opts.push(progress::with_finished_message(message.clone()));
        }
        if let Some(purchases) = &self.click_purchases {
            opts.push(progress::with_clicker(purchases.clone()));
        }
        Ok(opts)
    }

    /// Builds a bar; a clicker game if `clickPurchases` is set.
    pub fn build(&self) -> Result<Model> {
        progress::new(&self.to_progress_options()?)
    }

    /// Builds a clicker game bar even without purchases.
    pub fn build_clicker(&self) -> Result<Model> {
        let mut opts = self.to_progress_options()?;
        if self.click_purchases.is_none() {
            opts.push(progress::with_clicker(Vec::new()));
        }
        progress::new(&opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_empty_record_builds_defaults() {
        let bar = Options::from_json("{}").unwrap().build().unwrap();
        assert_eq!(bar.style().height().to_string(), "30px");
        assert_eq!(bar.style().width().to_string(), "300px");
        assert!(bar.removes_when_done());
        assert!(!bar.overflow());
        assert!(bar.clicker().is_none());
    }

    #[test]
    fn test_full_record() {
        let json = r##"{
            "height": "75",
            "width": 600,
            "fontSize": 30,
            "fontColor": "#FFFFFF",
            "draggable": true,
            "hidePercent": true,
            "removeWhenDone": false,
            "opacity": 0.5,
            "gradient": ["#000000", "#FFFFFF"],
            "overflow": true,
            "finishedMessage": "Select From Below"
        }"##;
        let bar = Options::from_json(json).unwrap().build().unwrap();
        assert_eq!(bar.style().height().to_string(), "75px");
        assert_eq!(bar.style().width().to_string(), "600px");
        assert_eq!(bar.style().font_size().map(|d| d.to_string()), Some("30px".to_string()));
        assert_eq!(bar.style().font_color(), Some("#FFFFFF"));
        assert!(bar.is_draggable());
        assert!(bar.is_percent_hidden());
        assert!(!bar.removes_when_done());
        assert_eq!(bar.style().opacity(), 0.5);
        assert_eq!(bar.style().gradient(), &["#000000", "#FFFFFF"]);
        assert!(bar.overflow());
        assert_eq!(bar.finished_message(), Some("Select From Below"));
    }

    #[test]
    fn test_click_purchases_build_a_clicker() {
        let json = r#"{
            "draggable": true,
            "clickPurchases": [
                { "name": "God", "cost": 3, "rate": 300 },
                { "name": "UofT", "cost": 300, "rate": -300 }
            ]
        }"#;
        let bar = Options::from_json(json).unwrap().build().unwrap();
        let game = bar.clicker().expect("clicker");
        assert_eq!(game.purchases().len(), 2);
        assert_eq!(game.purchases()[1].rate, -300.0);

        let plain = Options::default().build_clicker().unwrap();
        assert!(plain.clicker().is_some());
    }

    #[test]
    fn test_wrong_types_are_rejected() {
        assert!(matches!(
            Options::from_json(r#"{ "height": true }"#),
            Err(Error::Options(_))
        ));
        assert!(matches!(
            Options::from_json(r#"{ "colour": "red" }"#),
            Err(Error::Options(_))
        ));
        let bad_size = Options::from_json(r#"{ "width": "wide" }"#).unwrap();
        assert!(matches!(bad_size.build(), Err(Error::InvalidArgument { .. })));
    }

    #[test]
    fn test_missing_image_file_fails() {
        let json = r#"{ "image": { "source": "/no/such/art.txt", "leftShift": 200, "upShift": 45 } }"#;
        let opts = Options::from_json(json).unwrap();
        assert_eq!(opts.image.as_ref().map(|i| i.left_shift), Some(200.0));
        assert!(matches!(opts.build(), Err(Error::Image { .. })));
    }
}
