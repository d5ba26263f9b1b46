//! Mouse dragging for progress bars.
//!
//! [`DragController`] tracks at most one drag at a time. Pressing the left
//! button over a draggable bar starts a session, moving the mouse with the
//! button held moves that bar by the same number of cells, and releasing the
//! button ends the session.
//!
//! Feed it the messages your model's `update` receives; anything that is not
//! a [`MouseMsg`] is ignored, so it can sit next to [`Registry::update`]:
//!
//! ```rust
//! use bubbletea_rs::{MouseMsg, Msg};
//! use crossterm::event::{KeyModifiers, MouseButton, MouseEventKind};
//! use funloader_widgets::drag::DragController;
//! use funloader_widgets::progress::{self, draggable};
//! use funloader_widgets::registry::Registry;
//!
//! let mut registry = Registry::new();
//! let id = registry.register(progress::new(&[draggable()]).unwrap());
//! let mut drag = DragController::new();
//!
//! let mouse = |button, x, y| {
//!     Box::new(MouseMsg { x, y, button, modifiers: KeyModifiers::NONE }) as Msg
//! };
//! drag.handle_msg(&mut registry, &mouse(MouseEventKind::Down(MouseButton::Left), 1, 0));
//! drag.handle_msg(&mut registry, &mouse(MouseEventKind::Drag(MouseButton::Left), 4, 2));
//! drag.handle_msg(&mut registry, &mouse(MouseEventKind::Up(MouseButton::Left), 4, 2));
//!
//! let position = registry.get(id).unwrap().position();
//! assert_eq!((position.x, position.y), (3, 2));
//! assert!(!drag.is_dragging());
//! ```
//!
//! Applications that read crossterm events themselves can use
//! [`DragController::handle_mouse`] instead.

use crate::registry::Registry;
use bubbletea_rs::{MouseMsg, Msg};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

/// An ongoing drag: which bar is held and where the pointer was last seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    /// Id of the bar being dragged.
    pub widget: i64,
    /// Last pointer column.
    pub last_x: u16,
    /// Last pointer row.
    pub last_y: u16,
}

/// Turns mouse events into bar movement.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    /// Creates a controller with no drag in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// The drag in progress, if any.
    pub fn session(&self) -> Option<DragSession> {
        self.session
    }

    /// Whether a bar is being dragged.
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Handles a message from the bubbletea-rs runtime. Returns `true` if a
    /// bar was picked up, moved or dropped; non-mouse messages return `false`.
    pub fn handle_msg(&mut self, registry: &mut Registry, msg: &Msg) -> bool {
        match msg.downcast_ref::<MouseMsg>() {
            Some(mouse) => self.handle_mouse_msg(registry, mouse),
            None => false,
        }
    }

    /// Handles one mouse message.
    pub fn handle_mouse_msg(&mut self, registry: &mut Registry, mouse: &MouseMsg) -> bool {
        self.handle_kind(registry, mouse.button, mouse.x, mouse.y)
    }

    /// Handles a raw crossterm mouse event.
    pub fn handle_mouse(&mut self, registry: &mut Registry, event: &MouseEvent) -> bool {
        self.handle_kind(registry, event.kind, event.column, event.row)
    }

    fn handle_kind(&mut self, registry: &mut Registry, kind: MouseEventKind, x: u16, y: u16) -> bool {
        match kind {
            MouseEventKind::Down(MouseButton::Left) => self.begin(registry, x, y),
            MouseEventKind::Drag(MouseButton::Left) => self.drag_to(registry, x, y),
            MouseEventKind::Up(MouseButton::Left) => self.end(),
            _ => false,
        }
    }

    /// Picks up the topmost draggable bar under (`x`, `y`). Ignored while
    /// another drag is in progress.
    pub fn begin(&mut self, registry: &Registry, x: u16, y: u16) -> bool {
        if self.session.is_some() {
            return false;
        }
        let Some(widget) = registry
            .all()
            .filter(|w| w.is_draggable() && w.bounds().contains(x, y))
            .last()
            .map(|w| w.id())
        else {
            return false;
        };
        tracing::debug!(widget, x, y, "drag started");
        self.session = Some(DragSession {
            widget,
            last_x: x,
            last_y: y,
        });
        true
    }

    /// Moves the held bar by the pointer's movement since the last event.
    pub fn drag_to(&mut self, registry: &mut Registry, x: u16, y: u16) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let Some(bar) = registry.get_mut(session.widget) else {
            tracing::debug!(widget = session.widget, "dragged bar is gone");
            self.session = None;
            return false;
        };
        let dx = i32::from(x) - i32::from(session.last_x);
        let dy = i32::from(y) - i32::from(session.last_y);
        bar.move_by(dx, dy);
        session.last_x = x;
        session.last_y = y;
        true
    }

    /// Drops the held bar.
    pub fn end(&mut self) -> bool {
        match self.session.take() {
            Some(session) => {
                tracing::debug!(widget = session.widget, "drag ended");
                true
            }
            None => false,
        }
    }
}
