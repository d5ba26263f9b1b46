#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/funloader-widgets/")]

//! # funloader-widgets
//!
//! Animated progress bars for terminal applications built with
//! [bubbletea-rs](https://github.com/joshka/bubbletea-rs).
//!
//! ## Overview
//!
//! The centerpiece is the [`progress`] component: a bar that tracks a
//! percentage, places its label inside or next to the filled region, and by
//! default fades out and removes itself once it reaches 100%. The same
//! component can run a small clicker game instead. Around it sit a
//! [`registry`] that owns the bars an application shows and a [`drag`]
//! controller that lets the mouse move them.
//!
//! Like every bubbletea-rs component, a bar follows the Elm Architecture
//! pattern with `init()`, `update()`, and `view()` methods.
//!
//! ## Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | `ProgressBar` | Percentage bar with labels, gradient fill and fade-out |
//! | `ClickerGame` | Click counter with purchases, hosted by a bar |
//! | `Registry` | Owns live bars, routes messages, drops finished ones |
//! | `DragController` | Moves draggable bars with the mouse |
//! | `Options` | Declarative, serde-friendly bar configuration |
//!
//! ## Quick Start
//!
//! ```rust
//! use funloader_widgets::prelude::*;
//!
//! let mut registry = Registry::new();
//! let bar = progress_new(&[with_width("100%"), with_finished_message("Done!")]).unwrap();
//! let id = registry.register(bar);
//!
//! let bar = registry.get_mut(id).unwrap();
//! bar.add_progress(50.0).unwrap();
//! assert_eq!(bar.label().outer, "50%");
//! ```
//!
//! ## Integration with bubbletea-rs
//!
//! ```rust
//! use funloader_widgets::prelude::*;
//! use bubbletea_rs::{Model, Cmd, Msg};
//!
//! struct App {
//!     bars: Registry,
//! }
//!
//! impl Model for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut bars = Registry::new();
//!         let game = progress_new_clicker(vec![Purchase::new("Intern", 10.0, 1.0)], &[]).unwrap();
//!         let (_, tick) = bars.spawn(game);
//!         (Self { bars }, tick)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         self.bars.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.bars.view()
//!     }
//! }
//! ```

pub mod clicker;
pub mod color;
pub mod drag;
pub mod error;
pub mod key;
pub mod label;
pub mod options;
pub mod progress;
pub mod registry;
pub mod style;

use bubbletea_rs::Cmd;

/// Focus management for components that react to the keyboard.
///
/// A focused clicker bar turns key presses into clicks and purchases; a
/// blurred one ignores them.
///
/// ```rust
/// use funloader_widgets::prelude::*;
///
/// let mut game = progress_new_clicker(vec![], &[]).unwrap();
/// assert!(!game.focused());
///
/// game.focus();
/// assert!(game.focused());
///
/// game.blur();
/// assert!(!game.focused());
/// ```
pub trait Component {
    /// Sets the component to focused state. May return a command to run.
    fn focus(&mut self) -> Option<Cmd>;

    /// Sets the component to blurred state.
    fn blur(&mut self);

    /// Returns the current focus state of the component.
    fn focused(&self) -> bool;
}

pub use clicker::{ClickTickMsg, ClickerGame, Purchase};
pub use drag::{DragController, DragSession};
pub use error::{Error, Result};
pub use key::{Binding, ClickerKeyMap};
pub use label::{Label, Slot};
pub use options::{ImageOptions, Options};
pub use progress::{
    new as progress_new, new_clicker as progress_new_clicker, Bounds, FadeMsg, Mode,
    Model as ProgressBar, Phase, Position, ProgressOption,
};
pub use registry::Registry;
pub use style::{BackgroundImage, BarStyle, CellMetrics, Dimension, Length};

/// Prelude module for convenient imports.
///
/// ```rust
/// use funloader_widgets::prelude::*;
/// ```
pub mod prelude {
    pub use crate::clicker::{ClickerGame, Purchase};
    pub use crate::drag::DragController;
    pub use crate::error::Error;
    pub use crate::options::Options;
    pub use crate::progress::{
        draggable, keep_when_done, new as progress_new, new_clicker as progress_new_clicker,
        with_clicker, with_fade_delay, with_finished_message, with_font_color, with_font_size,
        with_gradient, with_height, with_image, with_opacity, with_overflow, with_width,
        without_percentage, Model as ProgressBar, Phase, ProgressOption,
    };
    pub use crate::registry::Registry;
    pub use crate::style::BackgroundImage;
    pub use crate::Component;
}
