/// Input collector.
///
/// Drains every pending terminal event once per frame and splits it into:
///   - Key presses (Release events are dropped; Repeat counts as a press so
///     holding Backspace or an arrow keeps working)
///   - Left-button pointer events in terminal cell coordinates
///
/// Requires mouse capture (see `Renderer::init`) for pointer events.

use std::time::Duration;

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

/// Pointer action at a terminal cell (`x` = column, `y` = row).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Pointer {
    Down { x: u16, y: u16 },
    Drag { x: u16, y: u16 },
    Up { x: u16, y: u16 },
    Move { x: u16, y: u16 },
}

pub struct InputState {
    /// Key events seen during the most recent drain_events() call.
    pub keys: Vec<KeyEvent>,

    /// Pointer events, in arrival order.
    pub pointer: Vec<Pointer>,

    /// Terminal was resized; the renderer must redraw everything.
    pub resized: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            keys: Vec::with_capacity(8),
            pointer: Vec::with_capacity(16),
            resized: false,
        }
    }

    /// Drain all pending terminal events without blocking.
    /// Call this once per frame, before the game is updated.
    pub fn drain_events(&mut self) {
        self.keys.clear();
        self.pointer.clear();
        self.resized = false;

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                    self.keys.push(key);
                }
                Ok(Event::Mouse(m)) => {
                    if let Some(p) = pointer_from(m) {
                        self.pointer.push(p);
                    }
                }
                Ok(Event::Resize(_, _)) => self.resized = true,
                _ => {}
            }
        }
    }

    /// Check if any key event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.keys.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}

/// Map a crossterm mouse event to a pointer action. Only the left button
/// selects; plain motion is kept for hover.
pub fn pointer_from(m: MouseEvent) -> Option<Pointer> {
    let (x, y) = (m.column, m.row);
    match m.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Pointer::Down { x, y }),
        MouseEventKind::Drag(MouseButton::Left) => Some(Pointer::Drag { x, y }),
        MouseEventKind::Up(MouseButton::Left) => Some(Pointer::Up { x, y }),
        MouseEventKind::Moved => Some(Pointer::Move { x, y }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent { kind, column, row, modifiers: KeyModifiers::NONE }
    }

    #[test]
    fn left_button_maps_to_pointer() {
        assert_eq!(
            pointer_from(mouse(MouseEventKind::Down(MouseButton::Left), 7, 3)),
            Some(Pointer::Down { x: 7, y: 3 })
        );
        assert_eq!(
            pointer_from(mouse(MouseEventKind::Drag(MouseButton::Left), 9, 3)),
            Some(Pointer::Drag { x: 9, y: 3 })
        );
        assert_eq!(
            pointer_from(mouse(MouseEventKind::Up(MouseButton::Left), 11, 3)),
            Some(Pointer::Up { x: 11, y: 3 })
        );
        assert_eq!(
            pointer_from(mouse(MouseEventKind::Moved, 1, 1)),
            Some(Pointer::Move { x: 1, y: 1 })
        );
    }

    #[test]
    fn other_buttons_and_scroll_are_ignored() {
        assert_eq!(pointer_from(mouse(MouseEventKind::Down(MouseButton::Right), 0, 0)), None);
        assert_eq!(pointer_from(mouse(MouseEventKind::ScrollUp, 0, 0)), None);
    }

    #[test]
    fn ctrl_c_is_detected() {
        let mut input = InputState::new();
        input.keys.push(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(input.ctrl_c_pressed());
    }

    #[test]
    fn plain_c_is_not_ctrl_c() {
        let mut input = InputState::new();
        input.keys.push(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE));
        input.keys.push(KeyEvent::new(KeyCode::Enter, KeyModifiers::CONTROL));
        assert!(!input.ctrl_c_pressed());
    }
}
