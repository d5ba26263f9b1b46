//! Registry of live progress bars.
//!
//! A [`Registry`] owns every bar an application shows, routes messages to
//! them, and drops bars once their fade-out completes. It is an ordinary
//! value: keep one in your application model and pass it where it is needed.
//!
//! ```rust
//! use funloader_widgets::progress;
//! use funloader_widgets::registry::Registry;
//!
//! let mut registry = Registry::new();
//! let id = registry.register(progress::new(&[]).unwrap());
//!
//! registry.hide_all();
//! assert!(registry.get(id).unwrap().is_percent_hidden());
//!
//! registry.cancel_bar(id);
//! assert!(registry.is_empty());
//! ```

use crate::progress::Model;
use bubbletea_rs::{batch, Cmd, Msg};

/// Owns a set of progress bars, ordered by registration. Later bars are
/// drawn on top of earlier ones.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    widgets: Vec<Model>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a bar and returns its id. Bars that were already removed are not
    /// kept.
    pub fn register(&mut self, bar: Model) -> i64 {
        let id = bar.id();
        if !bar.is_alive() {
            tracing::warn!(id, "refusing to register a removed progress bar");
            return id;
        }
        tracing::debug!(id, "progress bar registered");
        self.widgets.push(bar);
        id
    }

    /// Adds a bar and returns its id along with the command from
    /// [`Model::init`], which starts a clicker bar's income tick.
    pub fn spawn(&mut self, bar: Model) -> (i64, Option<Cmd>) {
        let cmd = bar.init();
        (self.register(bar), cmd)
    }

    /// Takes a bar out of the registry.
    pub fn unregister(&mut self, id: i64) -> Option<Model> {
        let index = self.widgets.iter().position(|w| w.id() == id)?;
        tracing::debug!(id, "progress bar unregistered");
        Some(self.widgets.remove(index))
    }

    /// The live bar with this id.
    pub fn get(&self, id: i64) -> Option<&Model> {
        self.widgets.iter().find(|w| w.id() == id && w.is_alive())
    }

    /// The live bar with this id, mutably.
    pub fn get_mut(&mut self, id: i64) -> Option<&mut Model> {
        self.widgets
            .iter_mut()
            .find(|w| w.id() == id && w.is_alive())
    }

    /// Every live bar, in registration order.
    pub fn all(&self) -> impl Iterator<Item = &Model> {
        self.widgets.iter().filter(|w| w.is_alive())
    }

    /// Ids of every live bar, in registration order.
    pub fn ids(&self) -> Vec<i64> {
        self.all().map(Model::id).collect()
    }

    /// Number of live bars.
    pub fn len(&self) -> usize {
        self.all().count()
    }

    /// Whether no live bar is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes a bar right away, skipping its fade.
    pub fn cancel_bar(&mut self, id: i64) -> Option<Model> {
        let mut bar = self.unregister(id)?;
        bar.cancel_bar();
        Some(bar)
    }

    /// Hides the numeric label of every bar.
    pub fn hide_all(&mut self) {
        self.widgets.iter_mut().for_each(Model::hide_percent);
    }

    /// Shows the numeric label of every bar.
    pub fn unhide_all(&mut self) {
        self.widgets.iter_mut().for_each(Model::unhide_percent);
    }

    /// Flips the label visibility of every bar.
    pub fn toggle_hide_percent_all(&mut self) {
        self.widgets.iter_mut().for_each(Model::toggle_hide_percent);
    }

    /// Routes a message to the bars and drops any bar it removed.
    ///
    /// Fade and tick messages carry the id of a single bar; key messages
    /// reach every bar and only focused ones react. Commands returned by the
    /// bars are batched into one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bubbletea_rs::{KeyMsg, Msg};
    /// use crossterm::event::{KeyCode, KeyModifiers};
    /// use funloader_widgets::progress;
    /// use funloader_widgets::registry::Registry;
    /// use funloader_widgets::Component;
    ///
    /// let mut registry = Registry::new();
    /// let mut game = progress::new_clicker(vec![], &[]).unwrap();
    /// game.focus();
    /// let id = registry.register(game);
    ///
    /// let space = Box::new(KeyMsg { key: KeyCode::Char(' '), modifiers: KeyModifiers::NONE }) as Msg;
    /// registry.update(space);
    /// assert_eq!(registry.get(id).unwrap().clicker().unwrap().clicks(), 1.0);
    /// ```
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        let cmds: Vec<Cmd> = self
            .widgets
            .iter_mut()
            .filter_map(|w| w.handle(&msg))
            .collect();
        self.prune();
        match cmds.len() {
            0 => None,
            1 => cmds.into_iter().next(),
            _ => Some(batch(cmds)),
        }
    }

    /// Drops bars that have been removed.
    pub fn prune(&mut self) {
        self.widgets.retain(|w| {
            if !w.is_alive() {
                tracing::debug!(id = w.id(), "progress bar dropped");
            }
            w.is_alive()
        });
    }

    /// The topmost live bar covering the cell (`x`, `y`).
    pub fn widget_at(&self, x: u16, y: u16) -> Option<i64> {
        self.widgets
            .iter()
            .rev()
            .find(|w| w.is_alive() && w.bounds().contains(x, y))
            .map(Model::id)
    }

    /// Renders every live bar, one below the other.
    pub fn view(&self) -> String {
        self.all()
            .map(Model::view)
            .filter(|v| !v.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clicker::Purchase;
    use crate::progress::{self, with_width, Phase};
    use crate::Component;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::time::Duration;

    fn bar() -> Model {
        progress::new(&[]).unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = Registry::new();
        let a = registry.register(bar());
        let b = registry.register(bar());

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.ids(), vec![a, b]);
        assert_eq!(registry.get(a).map(Model::id), Some(a));
        assert!(registry.get(a + b + 100).is_none());

        assert!(registry.unregister(a).is_some());
        assert!(registry.unregister(a).is_none());
        assert_eq!(registry.ids(), vec![b]);
    }

    #[test]
    fn test_removed_bars_are_not_registered() {
        let mut registry = Registry::new();
        let mut gone = bar();
        gone.cancel_bar();
        registry.register(gone);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_bulk_label_visibility() {
        let mut registry = Registry::new();
        let a = registry.register(bar());
        let b = registry.register(progress::new(&[progress::without_percentage()]).unwrap());

        registry.toggle_hide_percent_all();
        assert!(registry.get(a).unwrap().is_percent_hidden());
        assert!(!registry.get(b).unwrap().is_percent_hidden());

        registry.unhide_all();
        assert!(registry.all().all(|w| !w.is_percent_hidden()));

        registry.hide_all();
        assert!(registry.all().all(|w| w.is_percent_hidden()));
    }

    #[test]
    fn test_cancel_bar_removes_from_all() {
        let mut registry = Registry::new();
        let a = registry.register(bar());
        let b = registry.register(bar());

        let cancelled = registry.cancel_bar(a).unwrap();
        assert_eq!(cancelled.phase(), Phase::Removed);
        assert_eq!(registry.ids(), vec![b]);
        assert!(registry.cancel_bar(a).is_none());
    }

    #[test]
    fn test_finishing_bar_stays_until_faded() {
        let mut registry = Registry::new();
        let id = registry.register(bar());
        assert!(registry.get_mut(id).unwrap().set_progress(100.0).unwrap().is_some());

        // still visible while fading
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(id).unwrap().phase(), Phase::Finishing);
    }

    #[test]
    fn test_key_messages_reach_focused_clicker() {
        let mut registry = Registry::new();
        let mut game = progress::new_clicker(vec![Purchase::new("God", 3.0, 300.0)], &[]).unwrap();
        game.focus();
        let id = registry.register(game);
        registry.register(bar());

        let msg = Box::new(bubbletea_rs::KeyMsg {
            key: KeyCode::Char(' '),
            modifiers: KeyModifiers::NONE,
        }) as Msg;
        assert!(registry.update(msg).is_none());
        assert_eq!(registry.get(id).unwrap().clicker().unwrap().clicks(), 1.0);
    }

    #[test]
    fn test_widget_at_prefers_topmost() {
        let mut registry = Registry::new();
        let below = registry.register(bar());
        let mut top = progress::new(&[with_width(80)]).unwrap();
        top.set_position(5, 0);
        let above = registry.register(top);

        assert_eq!(registry.widget_at(6, 1), Some(above));
        assert_eq!(registry.widget_at(1, 1), Some(below));
        assert_eq!(registry.widget_at(200, 1), None);
    }

    #[test]
    fn test_view_stacks_live_bars() {
        let mut registry = Registry::new();
        let a = registry.register(progress::new(&[progress::with_height(16)]).unwrap());
        registry.register(progress::new(&[progress::with_height(16)]).unwrap());
        assert_eq!(registry.view().lines().count(), 2);

        registry.cancel_bar(a);
        assert_eq!(registry.view().lines().count(), 1);
    }

    #[tokio::test]
    async fn test_update_drops_faded_bar() {
        let mut registry = Registry::new();
        let id = registry.register(
            progress::new(&[progress::with_fade_delay(Duration::from_millis(1))]).unwrap(),
        );
        let cmd = registry
            .get_mut(id)
            .unwrap()
            .add_progress(100.0)
            .unwrap()
            .expect("fade command");

        let msg = cmd.await.expect("fade message");
        assert!(registry.update(msg).is_none());
        assert!(registry.get(id).is_none());
        assert!(registry.is_empty());
    }
}
