//! Progress bar component for Bubble Tea applications.
//!
//! A progress bar accumulates a percentage, shows it as a label inside or next
//! to the filled region, and by default fades out and removes itself once it
//! reaches 100%. The same component doubles as a small clicker game when
//! built with [`with_clicker`].
//!
//! # Basic Usage
//!
//! ```rust
//! use funloader_widgets::progress::{new, with_height, with_width, Phase};
//!
//! let mut bar = new(&[with_height(50), with_width("100%")]).unwrap();
//!
//! // Nothing to schedule until the bar completes.
//! assert!(bar.add_progress(40.0).unwrap().is_none());
//! assert_eq!(bar.label().outer, "40%");
//!
//! // Reaching 100% starts the fade; the returned command delivers the
//! // removal message after the fade delay.
//! let fade = bar.add_progress(60.0).unwrap();
//! assert!(fade.is_some());
//! assert_eq!(bar.phase(), Phase::Finishing);
//! ```
//!
//! # Lifecycle
//!
//! A bar moves through [`Phase::Active`], [`Phase::Finishing`] and
//! [`Phase::Removed`]. Finishing is entered at most once. The removal at the
//! end of the fade is carried by a [`FadeMsg`]; [`Model::cancel_bar`]
//! invalidates any fade already in flight.

use crate::clicker::{ClickTickMsg, ClickerGame, Purchase};
use crate::color::{self, Rgba, BACKDROP};
use crate::error::{ensure_number, Error, Result};
use crate::label::{self, Label, LabelInput, Slot};
use crate::style::{
    BackgroundImage, BarStyle, CellMetrics, Length, DEFAULT_EMPTY_COLOR,
};
use crate::Component;
use bubbletea_rs::{tick as bubbletea_tick, Cmd, KeyMsg, Model as BubbleTeaModel, Msg};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

// Internal ID management for progress instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Time between reaching 100% and removal.
pub const DEFAULT_FADE_DELAY: Duration = Duration::from_millis(2000);
/// Width, in cells, that percentage widths are measured against.
pub const DEFAULT_CONTAINER_WIDTH: u16 = 80;
/// Height, in cells, that percentage heights are measured against.
pub const DEFAULT_CONTAINER_HEIGHT: u16 = 24;

/// Configuration options for a progress bar.
///
/// Options are applied in order by [`new`]; each one goes through the same
/// validation as the matching setter on [`Model`].
#[derive(Debug, Clone)]
pub enum ProgressOption {
    /// Height in pixels or as a CSS-like string.
    WithHeight(Length),
    /// Width in pixels or as a CSS-like string.
    WithWidth(Length),
    /// Label font size.
    WithFontSize(Length),
    /// Label color.
    WithFontColor(String),
    /// Lets the bar be moved with the mouse.
    Draggable,
    /// Hides the numeric label.
    WithoutPercentage,
    /// Keeps the bar on screen after it completes.
    KeepWhenDone,
    /// Opacity between 0 and 1.
    WithOpacity(f64),
    /// Fill gradient, at least two colors.
    WithGradient(Vec<String>),
    /// Lets the stored percentage exceed 100.
    WithOverflow,
    /// Text art drawn over the filled region.
    WithImage(BackgroundImage),
    /// Replaces the label once the bar reaches 100%.
    WithFinishedMessage(String),
    /// Turns the bar into a clicker game with these purchases.
    WithClicker(Vec<Purchase>),
    /// Time between completion and removal.
    WithFadeDelay(Duration),
    /// Pixel size of a terminal cell.
    WithCellMetrics(CellMetrics),
    /// Size of the area percentage dimensions refer to.
    WithContainerSize(u16, u16),
}

impl ProgressOption {
    fn apply(&self, m: &mut Model) -> Result<()> {
        match self {
            ProgressOption::WithHeight(h) => m.style.set_height(h.clone())?,
            ProgressOption::WithWidth(w) => m.style.set_width(w.clone())?,
            ProgressOption::WithFontSize(s) => m.style.set_font_size(s.clone())?,
            ProgressOption::WithFontColor(c) => m.style.set_font_color(c)?,
            ProgressOption::Draggable => m.draggable = true,
            ProgressOption::WithoutPercentage => m.percent_hidden = true,
            ProgressOption::KeepWhenDone => m.remove_when_done = false,
            ProgressOption::WithOpacity(o) => m.style.set_opacity(*o)?,
            ProgressOption::WithGradient(stops) => m.style.set_gradient(stops.as_slice())?,
            ProgressOption::WithOverflow => m.overflow = true,
            ProgressOption::WithImage(image) => m.style.set_image(Some(image.clone())),
            ProgressOption::WithFinishedMessage(msg) => m.finished_message = Some(msg.clone()),
            ProgressOption::WithClicker(purchases) => {
                m.mode = Mode::Clicker(ClickerGame::new(purchases.clone()));
            }
            ProgressOption::WithFadeDelay(delay) => m.fade_delay = *delay,
            ProgressOption::WithCellMetrics(metrics) => m.set_cell_metrics(*metrics)?,
            ProgressOption::WithContainerSize(width, height) => {
                m.set_container_size(*width, *height)
            }
        }
        Ok(())
    }
}

/// Sets the height: a number of pixels, `"42px"` or `"50%"`.
pub fn with_height(height: impl Into<Length>) -> ProgressOption {
    ProgressOption::WithHeight(height.into())
}

/// Sets the width: a number of pixels, `"300px"` or `"100%"`.
///
/// ```rust
/// use funloader_widgets::progress::{new, with_width};
/// use funloader_widgets::style::Dimension;
///
/// let bar = new(&[with_width("100%")]).unwrap();
/// assert_eq!(bar.style().width(), Dimension::Percent(100.0));
/// ```
pub fn with_width(width: impl Into<Length>) -> ProgressOption {
    ProgressOption::WithWidth(width.into())
}

/// Sets the label font size. Sizes of 20px and up render bold.
pub fn with_font_size(size: impl Into<Length>) -> ProgressOption {
    ProgressOption::WithFontSize(size.into())
}

/// Sets the label color.
pub fn with_font_color(color: impl Into<String>) -> ProgressOption {
    ProgressOption::WithFontColor(color.into())
}

/// Makes the bar draggable.
pub fn draggable() -> ProgressOption {
    ProgressOption::Draggable
}

/// Hides the numeric label.
pub fn without_percentage() -> ProgressOption {
    ProgressOption::WithoutPercentage
}

/// Keeps the bar after it reaches 100% instead of fading it out.
pub fn keep_when_done() -> ProgressOption {
    ProgressOption::KeepWhenDone
}

/// Sets the opacity.
pub fn with_opacity(opacity: f64) -> ProgressOption {
    ProgressOption::WithOpacity(opacity)
}

/// Sets the fill gradient.
///
/// ```rust
/// use funloader_widgets::progress::{new, with_gradient};
///
/// assert!(new(&[with_gradient(["#000000", "#FFFFFF"])]).is_ok());
/// // A single stop is not a gradient.
/// assert!(new(&[with_gradient(["#000000, #FFFFFF"])]).is_err());
/// ```
pub fn with_gradient<I, S>(stops: I) -> ProgressOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ProgressOption::WithGradient(stops.into_iter().map(Into::into).collect())
}

/// Allows the percentage to go past 100.
pub fn with_overflow() -> ProgressOption {
    ProgressOption::WithOverflow
}

/// Draws text art over the filled region.
pub fn with_image(image: BackgroundImage) -> ProgressOption {
    ProgressOption::WithImage(image)
}

/// Shows `message` instead of `100%` on completion.
pub fn with_finished_message(message: impl Into<String>) -> ProgressOption {
    ProgressOption::WithFinishedMessage(message.into())
}

/// Turns the bar into a clicker game.
pub fn with_clicker(purchases: Vec<Purchase>) -> ProgressOption {
    ProgressOption::WithClicker(purchases)
}

/// Overrides the fade delay.
pub fn with_fade_delay(delay: Duration) -> ProgressOption {
    ProgressOption::WithFadeDelay(delay)
}

/// Overrides the pixel size of a terminal cell.
pub fn with_cell_metrics(width_px: f64, height_px: f64) -> ProgressOption {
    ProgressOption::WithCellMetrics(CellMetrics {
        width_px,
        height_px,
    })
}

/// Sets the area, in cells, that percentage sizes refer to.
pub fn with_container_size(width: u16, height: u16) -> ProgressOption {
    ProgressOption::WithContainerSize(width, height)
}

/// Delivered after the fade delay to remove a finishing bar.
#[derive(Debug, Clone)]
pub struct FadeMsg {
    /// Id of the bar to remove.
    pub id: i64,
    /// Fade generation; stale generations are ignored.
    tag: i64,
}

/// Lifecycle phase of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Accepting progress.
    Active,
    /// Completed and fading out.
    Finishing,
    /// Gone. Renders nothing.
    Removed,
}

/// What drives the label and completion.
#[derive(Debug, Clone)]
pub enum Mode {
    /// Percentage label; completes at 100%.
    Percentage,
    /// Click-count label; completes only through [`Model::finish_game`].
    Clicker(ClickerGame),
}

/// Top-left corner of a bar on screen, in cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
}

/// Screen area covered by a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Left column.
    pub x: u16,
    /// Top row.
    pub y: u16,
    /// Width in cells.
    pub width: u16,
    /// Height in rows.
    pub height: u16,
}

impl Bounds {
    /// Whether the cell (`x`, `y`) lies inside.
    pub fn contains(&self, x: u16, y: u16) -> bool {
        let (x, y) = (u32::from(x), u32::from(y));
        x >= u32::from(self.x)
            && x < u32::from(self.x) + u32::from(self.width)
            && y >= u32::from(self.y)
            && y < u32::from(self.y) + u32::from(self.height)
    }
}

/// A progress bar (or clicker game) and everything needed to render it.
#[derive(Debug, Clone)]
pub struct Model {
    /// An identifier to keep us from receiving messages intended for other
    /// progress bars.
    id: i64,

    /// Fade generation, bumped whenever a pending fade must be ignored.
    tag: i64,

    percentage: f64,
    style: BarStyle,
    percent_hidden: bool,
    remove_when_done: bool,
    overflow: bool,
    finished_message: Option<String>,
    draggable: bool,
    position: Position,
    fade_delay: Duration,
    phase: Phase,
    label: Label,
    mode: Mode,
    focus: bool,

    // area percentage sizes refer to, in cells
    container_width: u16,
    container_height: u16,
    cell_metrics: CellMetrics,
}

impl Default for Model {
    fn default() -> Self {
        let mut m = Model {
            id: next_id(),
            tag: 0,
            percentage: 0.0,
            style: BarStyle::default(),
            percent_hidden: false,
            remove_when_done: true,
            overflow: false,
            finished_message: None,
            draggable: false,
            position: Position::default(),
            fade_delay: DEFAULT_FADE_DELAY,
            phase: Phase::Active,
            label: Label::empty(),
            mode: Mode::Percentage,
            focus: false,
            container_width: DEFAULT_CONTAINER_WIDTH,
            container_height: DEFAULT_CONTAINER_HEIGHT,
            cell_metrics: CellMetrics::default(),
        };
        m.refresh_label();
        m
    }
}

/// Creates a progress bar with the given options applied in order.
///
/// Fails with the first option that does not validate.
pub fn new(opts: &[ProgressOption]) -> Result<Model> {
    let mut m = Model::default();
    for opt in opts {
        opt.apply(&mut m)?;
    }
    m.refresh_label();
    tracing::debug!(id = m.id, clicker = m.clicker().is_some(), "progress bar created");
    Ok(m)
}

/// Creates a clicker game bar. Remember to run the command from
/// [`Model::init`] to start the income tick.
pub fn new_clicker(purchases: Vec<Purchase>, opts: &[ProgressOption]) -> Result<Model> {
    let mut all = Vec::with_capacity(opts.len() + 1);
    all.push(with_clicker(purchases));
    all.extend(opts.iter().cloned());
    new(&all)
}

impl Model {
    /// Unique id of this bar.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Stored percentage. May exceed 100 when overflow is enabled.
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    /// Percentage as shown in the label.
    pub fn display_percent(&self) -> f64 {
        label::display_percent(self.percentage, self.overflow)
    }

    /// Share of the bar that is filled, never above 100.
    pub fn fill_percent(&self) -> f64 {
        match self.phase {
            Phase::Active => self.percentage.clamp(0.0, 100.0),
            Phase::Finishing | Phase::Removed => 100.0,
        }
    }

    /// Current label.
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the bar has not been removed yet.
    pub fn is_alive(&self) -> bool {
        self.phase != Phase::Removed
    }

    /// Visual configuration.
    pub fn style(&self) -> &BarStyle {
        &self.style
    }

    /// Whether numeric labels are hidden.
    pub fn is_percent_hidden(&self) -> bool {
        self.percent_hidden
    }

    /// Whether the bar fades out once complete.
    pub fn removes_when_done(&self) -> bool {
        self.remove_when_done
    }

    /// Whether the percentage may exceed 100.
    pub fn overflow(&self) -> bool {
        self.overflow
    }

    /// Completion message, if any.
    pub fn finished_message(&self) -> Option<&str> {
        self.finished_message.as_deref()
    }

    /// Time between completion and removal.
    pub fn fade_delay(&self) -> Duration {
        self.fade_delay
    }

    /// Label and completion policy.
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Clicker state, if this bar is a clicker game.
    pub fn clicker(&self) -> Option<&ClickerGame> {
        match &self.mode {
            Mode::Clicker(game) => Some(game),
            Mode::Percentage => None,
        }
    }

    /// Starts the clicker income tick. Percentage bars need no command.
    pub fn init(&self) -> Option<Cmd> {
        match &self.mode {
            Mode::Clicker(game) if game.running() && self.phase == Phase::Active => {
                Some(game.tick(self.id))
            }
            _ => None,
        }
    }

    /// Advances the bar by `amount` percent.
    ///
    /// Returns the fade command when this call completes the bar. Without
    /// overflow the stored percentage stops at 100.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for NaN or infinite amounts and
    /// [`Error::OutOfRange`] if the result would be negative. The bar is left
    /// unchanged in both cases.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use funloader_widgets::progress::{new, Phase};
    ///
    /// let mut bar = new(&[]).unwrap();
    /// bar.add_progress(33.333).unwrap();
    /// assert_eq!(bar.label().outer, "33.33%");
    ///
    /// bar.add_progress(33.333).unwrap();
    /// assert_eq!(bar.label().inner, "66.67%");
    ///
    /// assert!(bar.add_progress(f64::NAN).is_err());
    /// assert!(bar.add_progress(-80.0).is_err());
    ///
    /// let fade = bar.add_progress(50.0).unwrap();
    /// assert!(fade.is_some());
    /// assert_eq!(bar.phase(), Phase::Finishing);
    /// ```
    pub fn add_progress(&mut self, amount: f64) -> Result<Option<Cmd>> {
        let amount = ensure_number("progress amount", amount)?;
        let mut next = self.percentage + amount;
        if next < 0.0 {
            return Err(Error::out_of_range("progress", next));
        }
        if self.phase != Phase::Active {
            return Ok(None);
        }
        if !self.overflow {
            next = next.min(100.0);
        }
        self.percentage = next;
        Ok(self.after_progress_change())
    }

    /// Sets the bar to `amount` percent.
    ///
    /// Without overflow, values above 100 are rejected rather than clamped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use funloader_widgets::error::Error;
    /// use funloader_widgets::progress::{new, with_overflow, keep_when_done};
    ///
    /// let mut bar = new(&[]).unwrap();
    /// assert!(matches!(bar.set_progress(120.0), Err(Error::OutOfRange { .. })));
    /// assert_eq!(bar.percentage(), 0.0);
    ///
    /// let mut big = new(&[with_overflow(), keep_when_done()]).unwrap();
    /// big.set_progress(120.0).unwrap();
    /// assert_eq!(big.label().inner, "120%");
    /// assert_eq!(big.fill_percent(), 100.0);
    /// ```
    pub fn set_progress(&mut self, amount: f64) -> Result<Option<Cmd>> {
        let amount = ensure_number("progress amount", amount)?;
        if amount < 0.0 || (amount > 100.0 && !self.overflow) {
            return Err(Error::out_of_range("progress", amount));
        }
        if self.phase != Phase::Active {
            return Ok(None);
        }
        self.percentage = amount;
        Ok(self.after_progress_change())
    }

    fn after_progress_change(&mut self) -> Option<Cmd> {
        self.refresh_label();
        if self.completes() {
            Some(self.begin_finishing())
        } else {
            None
        }
    }

    fn completes(&self) -> bool {
        matches!(self.mode, Mode::Percentage)
            && self.remove_when_done
            && self.phase == Phase::Active
            && self.display_percent() == 100.0
    }

    /// Starts the fade-out immediately, whatever the current percentage.
    /// Does nothing unless the bar is active.
    pub fn finish_bar(&mut self) -> Option<Cmd> {
        if self.phase != Phase::Active {
            return None;
        }
        Some(self.begin_finishing())
    }

    fn begin_finishing(&mut self) -> Cmd {
        self.phase = Phase::Finishing;
        self.tag += 1;
        self.refresh_label();
        tracing::debug!(id = self.id, delay_ms = self.fade_delay.as_millis() as u64, "progress bar finishing");
        self.fade()
    }

    fn fade(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(self.fade_delay, move |_| Box::new(FadeMsg { id, tag }) as Msg)
    }

    /// Removes the bar right away, skipping the fade. Any fade already
    /// scheduled is ignored when it arrives.
    ///
    /// ```rust
    /// use funloader_widgets::progress::{new, Phase};
    ///
    /// let mut bar = new(&[]).unwrap();
    /// let _fade = bar.set_progress(100.0).unwrap();
    /// bar.cancel_bar();
    /// assert_eq!(bar.phase(), Phase::Removed);
    /// assert!(bar.view().is_empty());
    /// ```
    pub fn cancel_bar(&mut self) {
        if self.phase == Phase::Removed {
            return;
        }
        self.phase = Phase::Removed;
        self.tag += 1;
        if let Mode::Clicker(game) = &mut self.mode {
            game.stop();
        }
        self.label = Label::empty();
        tracing::debug!(id = self.id, "progress bar cancelled");
    }

    /// Sets the height.
    pub fn set_height(&mut self, height: impl Into<Length>) -> Result<()> {
        self.style.set_height(height)
    }

    /// Sets the width.
    pub fn set_width(&mut self, width: impl Into<Length>) -> Result<()> {
        self.style.set_width(width)
    }

    /// Sets the opacity.
    pub fn set_opacity(&mut self, opacity: f64) -> Result<()> {
        self.style.set_opacity(opacity)
    }

    /// Sets the label font size.
    pub fn set_font_size(&mut self, size: impl Into<Length>) -> Result<()> {
        self.style.set_font_size(size)
    }

    /// Sets the label color.
    pub fn set_font_color(&mut self, color: &str) -> Result<()> {
        self.style.set_font_color(color)
    }

    /// Sets the fill gradient.
    pub fn set_progress_gradient<S: AsRef<str>>(&mut self, stops: &[S]) -> Result<()> {
        self.style.set_gradient(stops)
    }

    /// Draws `image` over the filled region.
    pub fn set_background_image(&mut self, image: BackgroundImage) {
        self.style.set_image(Some(image));
    }

    /// Goes back to the plain gradient fill.
    pub fn clear_background_image(&mut self) {
        self.style.set_image(None);
    }

    /// Hides the numeric label.
    pub fn hide_percent(&mut self) {
        self.percent_hidden = true;
        self.refresh_label();
    }

    /// Shows the numeric label.
    pub fn unhide_percent(&mut self) {
        self.percent_hidden = false;
        self.refresh_label();
    }

    /// Flips label visibility.
    pub fn toggle_hide_percent(&mut self) {
        self.percent_hidden = !self.percent_hidden;
        self.refresh_label();
    }

    /// Keeps the bar on screen after completion.
    pub fn keep_when_done(&mut self) {
        self.remove_when_done = false;
    }

    /// Removes the bar after completion again. If it is already complete the
    /// fade starts now and its command is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use funloader_widgets::progress::{keep_when_done, new, Phase};
    ///
    /// let mut bar = new(&[keep_when_done()]).unwrap();
    /// assert!(bar.set_progress(100.0).unwrap().is_none());
    /// assert_eq!(bar.phase(), Phase::Active);
    ///
    /// assert!(bar.unkeep_when_done().is_some());
    /// assert_eq!(bar.phase(), Phase::Finishing);
    /// ```
    pub fn unkeep_when_done(&mut self) -> Option<Cmd> {
        self.remove_when_done = true;
        if self.completes() {
            Some(self.begin_finishing())
        } else {
            None
        }
    }

    /// Lets the bar be moved with the mouse.
    pub fn make_draggable(&mut self) {
        self.draggable = true;
    }

    /// Whether the bar can be dragged.
    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    /// Top-left corner on screen.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Moves the top-left corner to (`x`, `y`).
    pub fn set_position(&mut self, x: u16, y: u16) {
        self.position = Position { x, y };
    }

    /// Moves by a delta, stopping at the screen edge.
    pub fn move_by(&mut self, dx: i32, dy: i32) {
        let shift = |v: u16, d: i32| (i32::from(v) + d).clamp(0, i32::from(u16::MAX)) as u16;
        self.position = Position {
            x: shift(self.position.x, dx),
            y: shift(self.position.y, dy),
        };
    }

    /// Size, in cells, of the area percentage dimensions refer to.
    pub fn container_size(&self) -> (u16, u16) {
        (self.container_width, self.container_height)
    }

    /// Sets the area percentage dimensions refer to, usually from a
    /// `WindowSizeMsg`.
    pub fn set_container_size(&mut self, width: u16, height: u16) {
        self.container_width = width;
        self.container_height = height;
    }

    /// Pixel size of one terminal cell.
    pub fn cell_metrics(&self) -> CellMetrics {
        self.cell_metrics
    }

    /// Sets the pixel size of one terminal cell. Both sides must be positive
    /// finite numbers.
    ///
    /// ```rust
    /// use funloader_widgets::progress::new;
    /// use funloader_widgets::style::CellMetrics;
    ///
    /// let mut bar = new(&[]).unwrap();
    /// assert!(bar.set_cell_metrics(CellMetrics { width_px: 8.0, height_px: 0.0 }).is_err());
    /// assert_eq!(bar.cell_metrics(), CellMetrics::default());
    /// ```
    pub fn set_cell_metrics(&mut self, metrics: CellMetrics) -> Result<()> {
        let width = ensure_number("cell width", metrics.width_px)?;
        let height = ensure_number("cell height", metrics.height_px)?;
        if width <= 0.0 || height <= 0.0 {
            return Err(Error::invalid("cell metrics", "cell size must be positive"));
        }
        self.cell_metrics = metrics;
        Ok(())
    }

    fn bar_size(&self) -> (u16, u16) {
        let cols = self
            .style
            .width()
            .to_cells(self.container_width, self.cell_metrics.width_px);
        let rows = self
            .style
            .height()
            .to_cells(self.container_height, self.cell_metrics.height_px);
        (cols, rows)
    }

    /// Screen area covered by the rendered bar, purchase buttons included.
    pub fn bounds(&self) -> Bounds {
        let (mut width, mut height) = self.bar_size();
        if let Some(game) = self.clicker() {
            if !game.purchases().is_empty() {
                let buttons = lipgloss::width_visible(&game.purchases_view());
                width = width.max(buttons.min(usize::from(u16::MAX)) as u16);
                height = height.saturating_add(1);
            }
        }
        Bounds {
            x: self.position.x,
            y: self.position.y,
            width,
            height,
        }
    }

    /// Adds `amount` clicks to a clicker bar.
    pub fn increment_clicks(&mut self, amount: f64) -> Result<()> {
        let Mode::Clicker(game) = &mut self.mode else {
            return Err(Error::invalid("clicks", "not a clicker bar"));
        };
        if self.phase != Phase::Active {
            ensure_number("clicks", amount)?;
            return Ok(());
        }
        game.increment_clicks(amount)?;
        self.refresh_label();
        Ok(())
    }

    /// One manual click.
    pub fn click(&mut self) -> Result<()> {
        self.increment_clicks(1.0)
    }

    /// Spends `cost` clicks for `rate` more clicks per second. Returns
    /// `false`, changing nothing, if the bar cannot afford it.
    pub fn buy(&mut self, cost: f64, rate: f64) -> bool {
        if self.phase != Phase::Active {
            return false;
        }
        let bought = match &mut self.mode {
            Mode::Clicker(game) => game.buy(cost, rate),
            Mode::Percentage => false,
        };
        if bought {
            self.refresh_label();
        }
        bought
    }

    /// Buys the configured purchase at `index`.
    pub fn buy_purchase(&mut self, index: usize) -> bool {
        match self.clicker().and_then(|g| g.purchases().get(index)) {
            Some(purchase) => {
                let (cost, rate) = (purchase.cost, purchase.rate);
                self.buy(cost, rate)
            }
            None => false,
        }
    }

    /// Ends the clicker game: stops the income tick and starts the fade.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use funloader_widgets::clicker::Purchase;
    /// use funloader_widgets::progress::{new_clicker, Phase};
    ///
    /// let mut game = new_clicker(vec![Purchase::new("Intern", 10.0, 1.0)], &[]).unwrap();
    /// game.increment_clicks(12.0).unwrap();
    /// assert!(game.buy_purchase(0));
    ///
    /// // Reaching 100% does not end a clicker game.
    /// assert!(game.set_progress(100.0).unwrap().is_none());
    ///
    /// assert!(game.finish_game().is_some());
    /// assert_eq!(game.phase(), Phase::Finishing);
    /// assert!(!game.clicker().unwrap().running());
    /// assert!(game.finish_game().is_none());
    /// ```
    pub fn finish_game(&mut self) -> Option<Cmd> {
        if let Mode::Clicker(game) = &mut self.mode {
            if game.stop() {
                tracing::debug!(id = self.id, clicks = game.clicks(), "clicker game finished");
            }
        }
        self.finish_bar()
    }

    fn refresh_label(&mut self) {
        self.label = match self.phase {
            Phase::Removed => Label::empty(),
            Phase::Finishing if self.percent_hidden => Label::empty(),
            Phase::Finishing => Label::in_slot(
                Slot::Inner,
                self.finished_message.as_deref().unwrap_or("100%"),
            ),
            Phase::Active => match &self.mode {
                Mode::Percentage => label::format_label(LabelInput {
                    percentage: self.percentage,
                    hidden: self.percent_hidden,
                    overflow: self.overflow,
                    finished_message: self.finished_message.as_deref(),
                }),
                Mode::Clicker(_) if self.percent_hidden => Label::empty(),
                Mode::Clicker(game) => {
                    Label::in_slot(label::slot_for(self.percentage), game.label_text())
                }
            },
        };
    }

    /// Processes fade, clicker tick and key messages addressed to this bar.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.handle(&msg)
    }

    pub(crate) fn handle(&mut self, msg: &Msg) -> Option<Cmd> {
        if let Some(fade) = msg.downcast_ref::<FadeMsg>() {
            if fade.id != self.id || fade.tag != self.tag || self.phase != Phase::Finishing {
                return None;
            }
            self.phase = Phase::Removed;
            self.label = Label::empty();
            tracing::debug!(id = self.id, "progress bar removed");
            return None;
        }

        if let Some(tick) = msg.downcast_ref::<ClickTickMsg>() {
            if tick.id != self.id || self.phase != Phase::Active {
                return None;
            }
            let Mode::Clicker(game) = &mut self.mode else {
                return None;
            };
            if !game.on_tick(tick) {
                return None;
            }
            let next = game.tick(self.id);
            self.refresh_label();
            return Some(next);
        }

        if let Some(key) = msg.downcast_ref::<KeyMsg>() {
            if self.focus && self.phase == Phase::Active {
                self.handle_key(key);
            }
        }

        None
    }

    fn handle_key(&mut self, key: &KeyMsg) {
        let Mode::Clicker(game) = &self.mode else {
            return;
        };
        if game.keymap.click.matches(key) {
            if let Err(err) = self.click() {
                tracing::warn!(id = self.id, %err, "click rejected");
            }
        } else if let Some(index) = game.keymap.purchase_index(key) {
            self.buy_purchase(index);
        }
    }

    /// Renders the bar. A removed bar renders as an empty string.
    pub fn view(&self) -> String {
        if self.phase == Phase::Removed {
            return String::new();
        }

        let (cols, rows) = self.bar_size();
        let cols = usize::from(cols);
        let filled = ((cols as f64) * self.fill_percent() / 100.0).round() as usize;
        let filled = filled.min(cols);

        let opacity = self.style.opacity().clamp(0.0, 1.0);
        let track = Rgba::parse_hex(DEFAULT_EMPTY_COLOR).unwrap_or(BACKDROP);
        let empty_color = color::flatten(DEFAULT_EMPTY_COLOR, BACKDROP, opacity);
        let ramp = color::ramp(self.style.gradient(), filled, track, opacity);
        let font_color = color::flatten(self.style.label_color(), track, opacity);

        let mut base = Style::new()
            .foreground(font_color)
            .bold(self.style.bold_label());
        if self.phase == Phase::Finishing {
            base = base.faint(true);
        }

        let middle = usize::from(rows) / 2;
        let mut lines = Vec::with_capacity(usize::from(rows) + 1);
        for row in 0..usize::from(rows) {
            let mut cells: Vec<Option<char>> = (0..cols)
                .map(|col| {
                    let glyph = if col < filled {
                        self.style
                            .image()
                            .and_then(|image| image.glyph(row, col, self.cell_metrics))
                    } else {
                        None
                    };
                    Some(glyph.unwrap_or(' '))
                })
                .collect();

            if row == middle {
                overlay(&mut cells, 0, filled, &self.label.inner);
                overlay(&mut cells, filled, cols - filled, &self.label.outer);
            }

            let mut line = String::new();
            for (col, cell) in cells.iter().enumerate() {
                // wide glyphs leave a continuation cell behind them
                let Some(ch) = cell else { continue };
                let background = if col < filled {
                    ramp[col.min(ramp.len() - 1)].clone()
                } else {
                    empty_color.clone()
                };
                line.push_str(&base.clone().background(background).render(&ch.to_string()));
            }
            lines.push(line);
        }

        if let Some(game) = self.clicker() {
            if !game.purchases().is_empty() {
                lines.push(game.purchases_view());
            }
        }

        lines.join("\n")
    }
}

/// Writes `text` centered into `cells[start..start + len]`. Text wider than
/// the region starts at the region (pulled left if needed) and is clipped at
/// the end of the bar.
fn overlay(cells: &mut [Option<char>], start: usize, len: usize, text: &str) {
    if text.is_empty() || cells.is_empty() {
        return;
    }
    let text_width = UnicodeWidthStr::width(text);
    let mut col = if text_width <= len {
        start + (len - text_width) / 2
    } else {
        start.min(cells.len().saturating_sub(text_width))
    };
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if w == 0 {
            continue;
        }
        if col + w > cells.len() {
            break;
        }
        cells[col] = Some(ch);
        for cont in cells.iter_mut().skip(col + 1).take(w - 1) {
            *cont = None;
        }
        col += w;
    }
}

impl Component for Model {
    fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        None
    }

    fn blur(&mut self) {
        self.focus = false;
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, std::option::Option<Cmd>) {
        let model = Model::default();
        (model, std::option::Option::None)
    }

    fn update(&mut self, msg: Msg) -> std::option::Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}
