//! Collaborator seams between the polling loop and the hardware.
//!
//! A panel bundles the display, its touch layer and the chart widget, the
//! way a single board exposes them.  The loop only talks to these traits, so
//! the terminal simulator and test doubles are interchangeable.

use crate::error::Result;
use crate::geometry::{Button, Point};
use crate::state::AppState;
use crate::view::ViewController;

/// Touch layer.  Non-blocking: one sample per call.
pub trait TouchPanel {
    /// Current touch point, `None` when nothing touches the screen.
    fn poll_touch(&mut self) -> Option<Point>;
}

/// Scrolling line chart.
///
/// Mutations happen between [`Chart::suspend_refresh`] and
/// [`Chart::resume_refresh`] so a frame never shows a half-applied update.
pub trait Chart {
    fn add_point(&mut self, value: f32);
    fn clear(&mut self);
    fn set_range(&mut self, min: f32, max: f32);
    fn suspend_refresh(&mut self);
    fn resume_refresh(&mut self);
}

/// Everything the display needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub state:    &'a AppState,
    pub views:    &'a ViewController,
    /// Chart view controls (window and source buttons).
    pub controls: &'a [Button],
}

pub trait Display {
    /// Backlight level in `[0, 1]`.
    fn set_brightness(&mut self, level: f32);

    /// Audible feedback after a tab switch.
    fn play_cue(&mut self) {}

    fn present(&mut self, scene: &Scene<'_>) -> Result<()>;

    /// `true` once the operator asked the panel to shut down.
    fn quit_requested(&self) -> bool {
        false
    }
}

/// A complete panel: display, touch and chart in one device.
pub trait Panel: TouchPanel + Chart + Display {}

impl<T: TouchPanel + Chart + Display> Panel for T {}
