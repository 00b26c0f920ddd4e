use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Central application state.  The display reads this snapshot every frame.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Latest temperature reading (°C), `None` until the sensor answers.
    pub temperature:    Option<f32>,
    /// Host CPU temperature shown on the info view, if available.
    pub cpu_temp:       Option<f32>,
    /// Latest payload received on the subscribed feed.
    pub feed_value:     Option<String>,
    /// Where the last touch landed.
    pub last_touch:     Option<Point>,
    /// Time of the current tick.
    pub time:           DateTime<Utc>,
    /// History window shown on the chart.
    pub window:         HistoryWindow,
    /// Where history replays come from.
    pub source:         HistorySource,
    /// `false` once the idle timeout switched the backlight off.
    pub backlight_on:   bool,
    /// `false` while the sensor is failing.
    pub sensor_ok:      bool,
    /// Number of samples the last history reload produced.
    pub last_reload:    Option<usize>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            temperature:  None,
            cpu_temp:     None,
            feed_value:   None,
            last_touch:   None,
            time:         Utc::now(),
            window:       HistoryWindow::default(),
            source:       HistorySource::default(),
            backlight_on: true,
            sensor_ok:    true,
            last_reload:  None,
        }
    }
}

/// How far back a history reload reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HistoryWindow {
    #[default]
    Short,
    Long,
}

/// Backing store for history reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HistorySource {
    /// The cloud feed the readings are published to.
    #[default]
    Remote,
    /// The on-device reading log.
    Local,
}
