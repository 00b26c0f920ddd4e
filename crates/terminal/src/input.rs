use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use portal_core::Point;

use crate::layout::ScreenMap;

/// Touch emulation: the left mouse button is the finger.
///
/// A press or drag inside the screen area reports a point until the button
/// is released, like a resistive panel that is sampled every tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TouchInput {
    pressed: Option<Point>,
    quit:    bool,
}

impl TouchInput {
    /// Fold one terminal event into the touch state.
    pub fn apply(&mut self, event: &Event, map: &ScreenMap) {
        match event {
            Event::Mouse(m) => match m.kind {
                MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => {
                    self.pressed = map.cell_to_point(m.column, m.row);
                }
                MouseEventKind::Up(MouseButton::Left) => self.pressed = None,
                _ => {}
            },
            Event::Key(key) if is_quit(key) => self.quit = true,
            // Focus loss would otherwise leave the finger down forever.
            Event::FocusLost => self.pressed = None,
            _ => {}
        }
    }

    pub fn pressed(&self) -> Option<Point> {
        self.pressed
    }

    pub fn quit(&self) -> bool {
        self.quit
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::MouseEvent;
    use ratatui::layout::Rect;

    fn map() -> ScreenMap {
        ScreenMap::new(240, 320, Rect::new(0, 0, 60, 40))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn press_drag_release() {
        let mut input = TouchInput::default();
        let m = map();

        input.apply(&mouse(MouseEventKind::Down(MouseButton::Left), 0, 0), &m);
        assert_eq!(input.pressed(), Some(Point::new(2, 4)));

        input.apply(&mouse(MouseEventKind::Drag(MouseButton::Left), 30, 5), &m);
        assert_eq!(input.pressed(), Some(Point::new(122, 44)));

        input.apply(&mouse(MouseEventKind::Up(MouseButton::Left), 30, 5), &m);
        assert_eq!(input.pressed(), None);
    }

    #[test]
    fn other_buttons_and_moves_are_ignored() {
        let mut input = TouchInput::default();
        let m = map();
        input.apply(&mouse(MouseEventKind::Down(MouseButton::Right), 0, 0), &m);
        input.apply(&mouse(MouseEventKind::Moved, 0, 0), &m);
        assert_eq!(input.pressed(), None);
    }

    #[test]
    fn quit_keys() {
        let m = map();
        for key in [
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE),
            KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            let mut input = TouchInput::default();
            input.apply(&Event::Key(key), &m);
            assert!(input.quit(), "{key:?}");
        }

        let mut input = TouchInput::default();
        input.apply(&Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)), &m);
        assert!(!input.quit());
    }
}
