//! Clicker game payload for progress bars.
//!
//! A clicker bar ignores completion by percentage. Instead it keeps a click
//! balance that grows by one per manual click and by `click_rate` on every
//! tick, and offers purchases that trade clicks for a higher rate. The game
//! only ends when [`crate::progress::Model::finish_game`] is called.
//!
//! ```rust
//! use funloader_widgets::clicker::{ClickerGame, Purchase};
//!
//! let mut game = ClickerGame::new(vec![Purchase::new("Intern", 10.0, 1.0)]);
//! game.increment_clicks(10.0).unwrap();
//! assert!(game.is_affordable(0));
//!
//! assert!(game.buy_purchase(0));
//! assert_eq!(game.clicks(), 0.0);
//! assert_eq!(game.click_rate(), 1.0);
//!
//! // Not enough clicks: nothing happens.
//! assert!(!game.buy_purchase(0));
//! ```

use crate::error::{ensure_number, Error, Result};
use crate::key::ClickerKeyMap;
use crate::label::format_number;
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use lipgloss_extras::prelude::*;
use serde::Deserialize;
use std::time::Duration;

/// Time between automatic income ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Something the player can buy: spends `cost` clicks, adds `rate` clicks per
/// second. Purchases can be bought again as long as they stay affordable.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Purchase {
    /// Button caption.
    pub name: String,
    /// Clicks spent.
    pub cost: f64,
    /// Change in clicks per second. May be negative.
    pub rate: f64,
}

impl Purchase {
    /// Creates a purchase.
    pub fn new(name: impl Into<String>, cost: f64, rate: f64) -> Self {
        Self {
            name: name.into(),
            cost,
            rate,
        }
    }
}

/// Automatic income tick for the clicker bar with the given id.
#[derive(Debug, Clone)]
pub struct ClickTickMsg {
    /// Id of the bar the tick belongs to.
    pub id: i64,
    tag: i64,
}

impl ClickTickMsg {
    /// The tick `game` is currently waiting for.
    #[cfg(test)]
    pub(crate) fn pending(id: i64, game: &ClickerGame) -> Self {
        Self { id, tag: game.tag }
    }
}

/// State of one clicker game.
#[derive(Debug, Clone)]
pub struct ClickerGame {
    clicks: f64,
    click_rate: f64,
    purchases: Vec<Purchase>,
    affordable: Vec<bool>,
    interval: Duration,
    tag: i64,
    running: bool,
    /// Keys used while the bar is focused.
    pub keymap: ClickerKeyMap,
}

impl Default for ClickerGame {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ClickerGame {
    /// Starts a game with no clicks and no income.
    pub fn new(purchases: Vec<Purchase>) -> Self {
        let mut game = Self {
            clicks: 0.0,
            click_rate: 0.0,
            affordable: vec![false; purchases.len()],
            purchases,
            interval: TICK_INTERVAL,
            tag: 0,
            running: true,
            keymap: ClickerKeyMap::default(),
        };
        game.refresh_affordability();
        game
    }

    /// Changes the time between income ticks.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Current click balance.
    pub fn clicks(&self) -> f64 {
        self.clicks
    }

    /// Clicks earned per tick.
    pub fn click_rate(&self) -> f64 {
        self.click_rate
    }

    /// Configured purchases.
    pub fn purchases(&self) -> &[Purchase] {
        &self.purchases
    }

    /// Whether purchase `index` can be bought right now.
    pub fn is_affordable(&self, index: usize) -> bool {
        self.affordable.get(index).copied().unwrap_or(false)
    }

    /// Whether the income tick is still scheduled.
    pub fn running(&self) -> bool {
        self.running
    }

    /// Adds `amount` clicks.
    pub fn increment_clicks(&mut self, amount: f64) -> Result<()> {
        let amount = ensure_number("clicks", amount)?;
        let next = self.clicks + amount;
        if next < 0.0 {
            return Err(Error::out_of_range("clicks", next));
        }
        self.clicks = next;
        self.refresh_affordability();
        Ok(())
    }

    /// Spends `cost` clicks to raise the rate by `rate`.
    ///
    /// Returns `false` without changing anything when the balance is too
    /// small; that is an ordinary outcome, not an error.
    pub fn buy(&mut self, cost: f64, rate: f64) -> bool {
        if !rate.is_finite() || !(self.clicks >= cost) {
            return false;
        }
        self.clicks -= cost;
        self.click_rate += rate;
        self.refresh_affordability();
        tracing::debug!(cost, rate, clicks = self.clicks, click_rate = self.click_rate, "purchase made");
        true
    }

    /// Buys the configured purchase at `index`.
    pub fn buy_purchase(&mut self, index: usize) -> bool {
        match self.purchases.get(index) {
            Some(purchase) => {
                let (cost, rate) = (purchase.cost, purchase.rate);
                self.buy(cost, rate)
            }
            None => false,
        }
    }

    /// Text shown in the bar's label slot.
    pub fn label_text(&self) -> String {
        format!(
            "Clicks: {} (+{}c/s)",
            format_number(self.clicks),
            format_number(self.click_rate)
        )
    }

    fn refresh_affordability(&mut self) {
        let clicks = self.clicks;
        self.affordable = self.purchases.iter().map(|p| clicks >= p.cost).collect();
    }

    pub(crate) fn tick(&self, owner: i64) -> Cmd {
        let tag = self.tag;
        bubbletea_tick(self.interval, move |_| {
            Box::new(ClickTickMsg { id: owner, tag }) as Msg
        })
    }

    /// Applies one income tick. Returns `false` for stale or stopped ticks.
    pub(crate) fn on_tick(&mut self, msg: &ClickTickMsg) -> bool {
        if !self.running || msg.tag != self.tag {
            return false;
        }
        // negative rates can drain the balance but never below zero
        self.clicks = (self.clicks + self.click_rate).max(0.0);
        self.refresh_affordability();
        tracing::trace!(clicks = self.clicks, "clicker tick");
        true
    }

    /// Cancels the income tick. Returns `true` only the first time.
    pub(crate) fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        self.tag += 1;
        true
    }

    /// Renders the purchase buttons, dimming the ones that cannot be bought.
    pub(crate) fn purchases_view(&self) -> String {
        self.purchases
            .iter()
            .enumerate()
            .map(|(i, purchase)| {
                let caption = format!(
                    "[{}] {} ({})",
                    i + 1,
                    purchase.name,
                    format_number(purchase.cost)
                );
                let style = if self.is_affordable(i) {
                    Style::new().foreground(Color::from("#00eeff")).bold(true)
                } else {
                    Style::new().foreground(Color::from("#606060")).faint(true)
                };
                style.render(&caption)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick_msg(game: &ClickerGame) -> ClickTickMsg {
        ClickTickMsg { id: 1, tag: game.tag }
    }

    #[test]
    fn test_buy_succeeds_then_noops() {
        let mut game = ClickerGame::default();
        game.increment_clicks(10.0).unwrap();

        assert!(game.buy(10.0, 1.0));
        assert_eq!(game.clicks(), 0.0);
        assert_eq!(game.click_rate(), 1.0);

        assert!(!game.buy(10.0, 1.0));
        assert_eq!(game.clicks(), 0.0);
        assert_eq!(game.click_rate(), 1.0);
    }

    #[test]
    fn test_affordability_tracks_clicks() {
        let mut game = ClickerGame::new(vec![
            Purchase::new("God", 3.0, 300.0),
            Purchase::new("UofT", 300.0, -300.0),
        ]);
        assert!(!game.is_affordable(0));
        assert!(!game.is_affordable(1));

        game.increment_clicks(3.0).unwrap();
        assert!(game.is_affordable(0));
        assert!(!game.is_affordable(1));

        assert!(game.buy_purchase(0));
        assert!(!game.is_affordable(0));
        assert!(!game.is_affordable(5));
        assert!(!game.buy_purchase(5));
    }

    #[test]
    fn test_increment_validation() {
        let mut game = ClickerGame::default();
        assert!(matches!(
            game.increment_clicks(f64::NAN),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            game.increment_clicks(-1.0),
            Err(Error::OutOfRange { .. })
        ));
        assert_eq!(game.clicks(), 0.0);

        game.increment_clicks(0.5).unwrap();
        assert_eq!(game.clicks(), 0.5);
    }

    #[test]
    fn test_tick_adds_rate_and_floors_at_zero() {
        let mut game = ClickerGame::default();
        game.increment_clicks(5.0).unwrap();
        assert!(game.buy(5.0, 2.0));

        assert!(game.on_tick(&tick_msg(&game)));
        assert_eq!(game.clicks(), 2.0);

        assert!(game.buy(0.0, -10.0));
        assert!(game.on_tick(&tick_msg(&game)));
        assert_eq!(game.clicks(), 0.0);
    }

    #[test]
    fn test_stop_cancels_exactly_once() {
        let mut game = ClickerGame::default();
        game.increment_clicks(1.0).unwrap();
        assert!(game.buy(1.0, 1.0));
        let stale = tick_msg(&game);

        assert!(game.stop());
        assert!(!game.stop());
        assert!(!game.running());

        assert!(!game.on_tick(&stale));
        assert!(!game.on_tick(&tick_msg(&game)));
        assert_eq!(game.clicks(), 0.0);
    }

    #[test]
    fn test_label_text() {
        let mut game = ClickerGame::default();
        game.increment_clicks(12.5).unwrap();
        assert_eq!(game.label_text(), "Clicks: 12.5 (+0c/s)");
    }

    #[test]
    fn test_purchases_view_lists_every_purchase() {
        let game = ClickerGame::new(vec![
            Purchase::new("God", 3.0, 300.0),
            Purchase::new("UofT", 300.0, -300.0),
        ]);
        let view = lipgloss_extras::lipgloss::strip_ansi(&game.purchases_view());
        assert!(view.contains("[1] God (3)"));
        assert!(view.contains("[2] UofT (300)"));
    }
}
