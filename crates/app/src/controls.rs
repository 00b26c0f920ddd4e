use portal_core::{Bounds, Button, HistorySource, HistoryWindow, Point, TouchLatch};

/// What a press on the chart controls asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    Window(HistoryWindow),
    Source(HistorySource),
}

/// Window and source buttons shown at the bottom-left of the chart view.
///
/// Layout, in sixths of the width and eighths of the height:
///
/// ```text
/// row 6/8:  [ Feed ][ Log ]
/// row 7/8:  [ 24h  ][ 72h ]
/// ```
///
/// Each pair behaves like a radio group: exactly one of the two is selected.
#[derive(Debug, Clone)]
pub struct HistoryControls {
    /// Order: short, long, remote, local.
    buttons: [Button; 4],
    latch:   TouchLatch,
}

const SHORT: usize = 0;
const LONG: usize = 1;
const REMOTE: usize = 2;
const LOCAL: usize = 3;

impl HistoryControls {
    pub fn new(
        width: u16,
        height: u16,
        short_hours: u32,
        long_hours: u32,
        window: HistoryWindow,
        source: HistorySource,
    ) -> Self {
        let w = width / 6;
        let h = height / 8;
        let source_row = height / 8 * 6;
        let window_row = height / 8 * 7;

        let mut controls = Self {
            buttons: [
                Button::new(format!("{short_hours}h"), Bounds::new(0, window_row, w, h)),
                Button::new(format!("{long_hours}h"), Bounds::new(w, window_row, w, h)),
                Button::new("Feed", Bounds::new(0, source_row, w, h)),
                Button::new("Log", Bounds::new(w, source_row, w, h)),
            ],
            latch: TouchLatch::default(),
        };
        controls.select_window(window);
        controls.select_source(source);
        controls
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    /// Feed one touch sample.  A press on a control fires once and latches
    /// until the panel is released.  Pressing the already-selected button
    /// fires again, which reloads the same history.
    pub fn handle_touch(&mut self, point: Option<Point>) -> Option<ControlAction> {
        let p = self.latch.sample(point)?;
        let hit = self.buttons.iter().position(|b| b.contains(p))?;
        self.latch.latch();

        let action = match hit {
            SHORT  => ControlAction::Window(HistoryWindow::Short),
            LONG   => ControlAction::Window(HistoryWindow::Long),
            REMOTE => ControlAction::Source(HistorySource::Remote),
            _      => ControlAction::Source(HistorySource::Local),
        };
        match action {
            ControlAction::Window(w) => self.select_window(w),
            ControlAction::Source(s) => self.select_source(s),
        }
        Some(action)
    }

    /// Release the latch, e.g. when the chart view is hidden mid-press.
    pub fn reset(&mut self) {
        self.latch.sample(None);
    }

    fn select_window(&mut self, window: HistoryWindow) {
        self.buttons[SHORT].selected = window == HistoryWindow::Short;
        self.buttons[LONG].selected = window == HistoryWindow::Long;
    }

    fn select_source(&mut self, source: HistorySource) {
        self.buttons[REMOTE].selected = source == HistorySource::Remote;
        self.buttons[LOCAL].selected = source == HistorySource::Local;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controls() -> HistoryControls {
        HistoryControls::new(240, 320, 24, 72, HistoryWindow::Short, HistorySource::Remote)
    }

    fn selected(c: &HistoryControls) -> Vec<&str> {
        c.buttons()
            .iter()
            .filter(|b| b.selected)
            .map(|b| b.label.as_str())
            .collect()
    }

    #[test]
    fn layout_matches_bottom_rows() {
        let c = controls();
        let b = c.buttons();
        assert_eq!(b[SHORT].bounds, Bounds::new(0, 280, 40, 40));
        assert_eq!(b[LONG].bounds, Bounds::new(40, 280, 40, 40));
        assert_eq!(b[REMOTE].bounds, Bounds::new(0, 240, 40, 40));
        assert_eq!(b[LOCAL].bounds, Bounds::new(40, 240, 40, 40));
        assert_eq!(b[SHORT].label, "24h");
        assert_eq!(b[LONG].label, "72h");
    }

    #[test]
    fn initial_selection() {
        assert_eq!(selected(&controls()), vec!["24h", "Feed"]);
    }

    #[test]
    fn press_selects_and_deselects_sibling() {
        let mut c = controls();
        assert_eq!(
            c.handle_touch(Some(Point::new(50, 290))),
            Some(ControlAction::Window(HistoryWindow::Long))
        );
        assert_eq!(selected(&c), vec!["72h", "Feed"]);

        c.handle_touch(None);
        assert_eq!(
            c.handle_touch(Some(Point::new(50, 250))),
            Some(ControlAction::Source(HistorySource::Local))
        );
        assert_eq!(selected(&c), vec!["72h", "Log"]);
    }

    #[test]
    fn held_press_fires_once() {
        let mut c = controls();
        assert!(c.handle_touch(Some(Point::new(10, 290))).is_some());
        assert!(c.handle_touch(Some(Point::new(10, 290))).is_none());
        assert!(c.handle_touch(Some(Point::new(50, 290))).is_none());
        c.handle_touch(None);
        assert!(c.handle_touch(Some(Point::new(50, 290))).is_some());
    }

    #[test]
    fn miss_does_not_latch() {
        let mut c = controls();
        assert!(c.handle_touch(Some(Point::new(200, 100))).is_none());
        assert!(c.handle_touch(Some(Point::new(10, 290))).is_some());
    }
}
