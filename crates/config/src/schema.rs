use portal_core::{Bounds, HistorySource, HistoryWindow, ViewKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure parsed from `portal.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Screen geometry, tick rate and backlight.
    pub display: DisplayConfig,
    /// Tabs in the main button bar, left to right.  Ids are assigned from 1.
    pub views:   Vec<ViewConfig>,
    /// View shown at startup (1-based).
    pub default_view: u8,
    pub chart:   ChartConfig,
    pub sensor:  SensorConfig,
    pub feed:    FeedConfig,
    pub log:     LogConfig,
    pub history: HistoryConfig,
    pub theme:   ThemeConfig,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            views: vec![
                ViewConfig::new("Feed", ViewKind::Feed),
                ViewConfig::new("Graph", ViewKind::Chart),
                ViewConfig::new("Info", ViewKind::Info),
            ],
            default_view: 1,
            chart:   ChartConfig::default(),
            sensor:  SensorConfig::default(),
            feed:    FeedConfig::default(),
            log:     LogConfig::default(),
            history: HistoryConfig::default(),
            theme:   ThemeConfig::default(),
        }
    }
}

impl PortalConfig {
    /// Tab bounds for every configured view: equal-width tabs across the
    /// top of the screen.  The last tab absorbs the rounding remainder.
    pub fn tab_bounds(&self) -> Vec<Bounds> {
        let n = self.views.len().max(1) as u16;
        let w = self.display.width / n;
        (0..self.views.len() as u16)
            .map(|i| {
                let x = i * w;
                let width = if i + 1 == n { self.display.width - x } else { w };
                Bounds::new(x, 0, width, self.display.tab_height)
            })
            .collect()
    }
}

/// Screen and loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Logical screen width in pixels (portrait PyPortal: 240).
    pub width:      u16,
    /// Logical screen height in pixels.
    pub height:     u16,
    /// Height of the tab bar.
    pub tab_height: u16,
    /// Loop tick in milliseconds.
    pub tick_ms:    u64,
    /// Switch the backlight off after this many idle seconds (0 = never).
    pub backlight_timeout_secs: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width:      240,
            height:     320,
            tab_height: 50,
            tick_ms:    100,
            backlight_timeout_secs: 30,
        }
    }
}

/// One tab.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    pub label: String,
    #[serde(default)]
    pub kind:  ViewKind,
}

impl ViewConfig {
    pub fn new(label: impl Into<String>, kind: ViewKind) -> Self {
        Self {
            label: label.into(),
            kind,
        }
    }
}

/// Sparkline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Maximum number of points on the chart.
    pub capacity: usize,
    pub y_min:    Option<f32>,
    pub y_max:    Option<f32>,
    /// Follow the data instead of `y_min`/`y_max`.
    pub auto_range: bool,
    /// Seconds between live samples added to the chart.
    pub sample_interval_secs: u64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            capacity: 144,
            y_min:    Some(0.0),
            y_max:    Some(40.0),
            auto_range: false,
            sample_interval_secs: 1,
        }
    }
}

impl ChartConfig {
    /// Fixed y bounds in effect; `None` edges follow the data.
    pub fn bounds(&self) -> (Option<f32>, Option<f32>) {
        if self.auto_range {
            (None, None)
        } else {
            (self.y_min, self.y_max)
        }
    }
}

/// Temperature sensor selection.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SensorConfig {
    /// sysfs hwmon input in millidegrees, e.g.
    /// `/sys/class/hwmon/hwmon1/temp1_input`.  When unset or unreadable the
    /// host CPU temperature is used instead.
    pub hwmon_path: Option<PathBuf>,
}

/// Cloud feed (Adafruit IO style) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Disable to run fully offline.
    pub enabled:        bool,
    /// REST API root, without trailing slash.
    pub base_url:       String,
    pub username:       String,
    /// API key.  `PORTAL_AIO_KEY` overrides this when set.
    pub key:            String,
    /// Feed readings are published to (and remote history is read from).
    pub publish_feed:   String,
    /// Feed whose values are shown on the feed view.
    pub subscribe_feed: String,
    /// MQTT broker host.  Empty disables the subscription.
    pub broker:         String,
    pub port:           u16,
    /// Maximum points requested per history reload.
    pub fetch_limit:    usize,
    /// HTTP timeout in seconds.
    pub timeout_secs:   u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled:        false,
            base_url:       "https://io.adafruit.com/api/v2".to_string(),
            username:       String::new(),
            key:            String::new(),
            publish_feed:   "temperature".to_string(),
            subscribe_feed: "voltage".to_string(),
            broker:         "io.adafruit.com".to_string(),
            port:           1883,
            fetch_limit:    72,
            timeout_secs:   10,
        }
    }
}

impl FeedConfig {
    /// API key with the environment override applied.
    pub fn resolved_key(&self) -> String {
        std::env::var("PORTAL_AIO_KEY").unwrap_or_else(|_| self.key.clone())
    }
}

/// On-device reading log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub path: PathBuf,
    /// Seconds between records written to the log and the cloud feed.
    pub record_interval_secs: u64,
    /// Truncate the log once it holds this many records (0 = unbounded).
    pub max_entries: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("temperature.txt"),
            record_interval_secs: 60,
            max_entries: 72 * 60,
        }
    }
}

impl LogConfig {
    /// Records written per hour, never less than one.
    pub fn records_per_hour(&self) -> usize {
        (3600 / self.record_interval_secs.max(1)).max(1) as usize
    }
}

/// History replay windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub short_hours: u32,
    pub long_hours:  u32,
    pub window:      HistoryWindow,
    pub source:      HistorySource,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            short_hours: 24,
            long_hours:  72,
            window:      HistoryWindow::Short,
            source:      HistorySource::Remote,
        }
    }
}

impl HistoryConfig {
    pub fn hours(&self, window: HistoryWindow) -> u32 {
        match window {
            HistoryWindow::Short => self.short_hours,
            HistoryWindow::Long  => self.long_hours,
        }
    }
}

/// Colors used by the panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Screen background (hex, e.g. `"#202020"`).
    pub background:   String,
    /// Text and chart line.
    pub foreground:   String,
    /// Current tab and selected controls.
    pub accent:       String,
    /// Inactive tab fill.
    pub tab_fill:     String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background: "#202020".to_string(),
            foreground: "#ffffff".to_string(),
            accent:     "#1a1a1a".to_string(),
            tab_fill:   "#979697".to_string(),
        }
    }
}
