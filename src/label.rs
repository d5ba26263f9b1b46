//! Label placement for progress bars.
//!
//! A bar has two label slots: `inner`, drawn inside the filled region, and
//! `outer`, drawn over the empty track. Once more than half the bar is filled
//! the label moves inside, so it never has to squeeze into a narrow fill.

/// Which label slot carries text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Inside the filled region.
    Inner,
    /// Over the empty track.
    Outer,
}

/// The text of both label slots. At most one of them is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Label {
    /// Text drawn inside the filled region.
    pub inner: String,
    /// Text drawn over the empty track.
    pub outer: String,
}

impl Label {
    /// A label with both slots cleared.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Puts `text` in `slot` and clears the other one.
    pub fn in_slot(slot: Slot, text: impl Into<String>) -> Self {
        match slot {
            Slot::Inner => Self {
                inner: text.into(),
                outer: String::new(),
            },
            Slot::Outer => Self {
                inner: String::new(),
                outer: text.into(),
            },
        }
    }

    /// Returns the slot that carries text, if any.
    pub fn slot(&self) -> Option<Slot> {
        if !self.inner.is_empty() {
            Some(Slot::Inner)
        } else if !self.outer.is_empty() {
            Some(Slot::Outer)
        } else {
            None
        }
    }

    /// Returns whichever slot carries text.
    pub fn text(&self) -> &str {
        if self.inner.is_empty() {
            &self.outer
        } else {
            &self.inner
        }
    }
}

/// Rounds to two decimals and, unless overflow is allowed, caps at 100.
pub fn display_percent(percentage: f64, overflow: bool) -> f64 {
    let rounded = (percentage * 100.0).round() / 100.0;
    if !overflow && rounded >= 100.0 {
        100.0
    } else {
        rounded
    }
}

/// The slot used at `percentage`. Exactly 50 still uses the outer slot.
pub fn slot_for(percentage: f64) -> Slot {
    if percentage > 50.0 {
        Slot::Inner
    } else {
        Slot::Outer
    }
}

/// Shortest decimal form with at most two fractional digits: `100`, `33.33`, `50.5`.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    // avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}")
}

/// Label state inputs.
#[derive(Debug, Clone, Copy)]
pub struct LabelInput<'a> {
    /// Stored percentage, possibly above 100 when overflowing.
    pub percentage: f64,
    /// Whether numeric labels are hidden.
    pub hidden: bool,
    /// Whether the bar may overflow 100.
    pub overflow: bool,
    /// Text that replaces the numeric label at completion.
    pub finished_message: Option<&'a str>,
}

/// Computes the label for a percentage-driven bar.
pub fn format_label(input: LabelInput<'_>) -> Label {
    let shown = display_percent(input.percentage, input.overflow);

    if shown == 100.0 {
        if let Some(message) = input.finished_message {
            return Label::in_slot(Slot::Inner, message);
        }
    }

    if input.hidden {
        return Label::empty();
    }

    Label::in_slot(slot_for(input.percentage), format!("{}%", format_number(shown)))
}
