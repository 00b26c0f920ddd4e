//! Terminal stand-in for the touchscreen panel.
//!
//! Renders the panel with `ratatui` and emulates touch with the mouse: hold
//! the left button to touch, release to lift the finger.  `q`, `Esc` or
//! `Ctrl-C` quits.

pub mod input;
pub mod layout;
pub mod render;
pub mod theme;

pub use input::TouchInput;
pub use layout::ScreenMap;
pub use theme::Palette;

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use portal_app::chart_bounds;
use portal_config::PortalConfig;
use portal_core::{Bounds, Chart, Display, Point, PortalError, Result, Scene, TouchPanel};
use ratatui::layout::Rect;
use ratatui::DefaultTerminal;
use render::ChartFrame;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, warn};

/// Scrolling series with deferred refresh.
///
/// Edits land in `pending`; the drawn copy is updated when refresh is
/// resumed, so a frame never shows half of an update.
#[derive(Debug, Clone)]
struct SeriesState {
    pending:   VecDeque<f32>,
    range:     (f32, f32),
    capacity:  usize,
    suspended: u32,
    shown:     ChartFrame,
}

impl SeriesState {
    fn new(capacity: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            range: (0.0, 0.0),
            capacity,
            suspended: 0,
            shown: ChartFrame::default(),
        }
    }

    fn push(&mut self, value: f32) {
        if self.capacity == 0 {
            return;
        }
        if self.pending.len() == self.capacity {
            self.pending.pop_front();
        }
        self.pending.push_back(value);
        self.publish();
    }

    fn publish(&mut self) {
        if self.suspended == 0 {
            self.shown = ChartFrame {
                points: self.pending.iter().copied().collect(),
                range:  self.range,
            };
        }
    }
}

pub struct TerminalPanel {
    terminal:   DefaultTerminal,
    width:      u16,
    height:     u16,
    chart_area: Bounds,
    palette:    Palette,
    brightness: f32,
    input:      TouchInput,
    /// Area of the last frame, used to map mouse cells to pixels.
    area:       Rect,
    series:     SeriesState,
}

impl TerminalPanel {
    /// Take over the terminal: raw mode, alternate screen, mouse capture.
    pub fn open(cfg: &PortalConfig) -> Result<Self> {
        let terminal =
            ratatui::try_init().map_err(|e| PortalError::Display(format!("terminal init: {e}")))?;
        if let Err(e) = execute!(std::io::stdout(), EnableMouseCapture) {
            ratatui::restore();
            return Err(PortalError::Display(format!("mouse capture: {e}")));
        }

        let area = terminal
            .size()
            .map(|s| Rect::new(0, 0, s.width, s.height))
            .unwrap_or_default();

        Ok(Self {
            terminal,
            width: cfg.display.width,
            height: cfg.display.height,
            chart_area: chart_bounds(cfg),
            palette: Palette::from_config(&cfg.theme),
            brightness: 1.0,
            input: TouchInput::default(),
            area,
            series: SeriesState::new(cfg.chart.capacity),
        })
    }

    fn map(&self) -> ScreenMap {
        ScreenMap::new(self.width, self.height, self.area)
    }

    /// Drain pending terminal events without blocking.
    fn pump_events(&mut self) {
        loop {
            match event::poll(Duration::ZERO) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        let map = self.map();
                        self.input.apply(&ev, &map);
                    }
                    Err(e) => {
                        warn!("Terminal read failed: {e}");
                        break;
                    }
                },
                Ok(false) => break,
                Err(e) => {
                    warn!("Terminal poll failed: {e}");
                    break;
                }
            }
        }
    }
}

impl TouchPanel for TerminalPanel {
    fn poll_touch(&mut self) -> Option<Point> {
        self.pump_events();
        self.input.pressed()
    }
}

impl Chart for TerminalPanel {
    fn add_point(&mut self, value: f32) {
        self.series.push(value);
    }

    fn clear(&mut self) {
        self.series.pending.clear();
        self.series.publish();
    }

    fn set_range(&mut self, min: f32, max: f32) {
        self.series.range = (min, max);
        self.series.publish();
    }

    fn suspend_refresh(&mut self) {
        self.series.suspended += 1;
    }

    fn resume_refresh(&mut self) {
        self.series.suspended = self.series.suspended.saturating_sub(1);
        self.series.publish();
    }
}

impl Display for TerminalPanel {
    fn set_brightness(&mut self, level: f32) {
        debug!("Brightness {level:.1}");
        self.brightness = level.clamp(0.0, 1.0);
    }

    fn present(&mut self, scene: &Scene<'_>) -> Result<()> {
        let palette = self.palette.at_brightness(self.brightness);
        let (width, height, chart_area) = (self.width, self.height, self.chart_area);
        let chart = &self.series.shown;
        let mut area = self.area;

        self.terminal
            .draw(|frame| {
                area = frame.area();
                let map = ScreenMap::new(width, height, area);
                render::draw(frame, scene, chart, palette, &map, chart_area);
            })
            .map_err(|e| PortalError::Display(format!("draw: {e}")))?;

        self.area = area;
        Ok(())
    }

    fn quit_requested(&self) -> bool {
        self.input.quit()
    }
}

impl Drop for TerminalPanel {
    fn drop(&mut self) {
        if let Err(e) = execute!(std::io::stdout(), DisableMouseCapture) {
            warn!("Failed to release mouse capture: {e}");
        }
        ratatui::restore();
    }
}
