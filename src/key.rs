//! Key bindings for interactive widgets.

use bubbletea_rs::KeyMsg;
use crossterm::event::KeyCode;

/// A set of keys that trigger the same action, plus help text.
#[derive(Debug, Clone)]
pub struct Binding {
    /// Keys that trigger the action.
    pub keys: Vec<KeyCode>,
    /// Short key label, e.g. `"space"`.
    pub help: String,
    /// What the action does.
    pub description: String,
}

impl Binding {
    /// Creates a binding for `keys` with no help text.
    pub fn new(keys: Vec<KeyCode>) -> Self {
        Self {
            keys,
            help: String::new(),
            description: String::new(),
        }
    }

    /// Sets the short key label.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether the key message triggers this binding.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        self.keys.contains(&msg.key)
    }
}

/// Keys understood by the clicker game.
#[derive(Debug, Clone)]
pub struct ClickerKeyMap {
    /// Earns one click.
    pub click: Binding,
    /// Buys purchase `n` with digit key `n` (1-based).
    pub buy: Binding,
}

impl Default for ClickerKeyMap {
    fn default() -> Self {
        Self {
            click: Binding::new(vec![KeyCode::Char(' '), KeyCode::Enter])
                .with_help("space")
                .with_description("click"),
            buy: Binding::new(('1'..='9').map(KeyCode::Char).collect())
                .with_help("1-9")
                .with_description("buy"),
        }
    }
}

impl ClickerKeyMap {
    /// Index of the purchase a digit key selects, if `msg` is a buy key.
    pub fn purchase_index(&self, msg: &KeyMsg) -> Option<usize> {
        if !self.buy.matches(msg) {
            return None;
        }
        match msg.key {
            KeyCode::Char(c) => c.to_digit(10).and_then(|d| (d as usize).checked_sub(1)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyMsg {
        KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_click_binding() {
        let keys = ClickerKeyMap::default();
        assert!(keys.click.matches(&key(KeyCode::Char(' '))));
        assert!(keys.click.matches(&key(KeyCode::Enter)));
        assert!(!keys.click.matches(&key(KeyCode::Char('x'))));
    }

    #[test]
    fn test_purchase_index() {
        let keys = ClickerKeyMap::default();
        assert_eq!(keys.purchase_index(&key(KeyCode::Char('1'))), Some(0));
        assert_eq!(keys.purchase_index(&key(KeyCode::Char('9'))), Some(8));
        assert_eq!(keys.purchase_index(&key(KeyCode::Char('0'))), None);
        assert_eq!(keys.purchase_index(&key(KeyCode::Char(' '))), None);
    }

    #[test]
    fn test_zero_key_selects_nothing() {
        let mut keys = ClickerKeyMap::default();
        keys.buy.keys.push(KeyCode::Char('0'));
        assert!(keys.buy.matches(&key(KeyCode::Char('0'))));
        assert_eq!(keys.purchase_index(&key(KeyCode::Char('0'))), None);
    }
}
