use chrono::{DateTime, Duration, Utc};
use portal_config::{HistoryConfig, PortalConfig};
use portal_core::{
    AppState, Bounds, Button, HistoryBuffer, HistorySource, Panel, Point,
    PortalError, Result, Scene, View, ViewController, ViewId, ViewKind,
};
use portal_core::timestamp::hours_before;
use portal_feed::RemoteFeed;
use portal_sensor::TemperatureSensor;
use portal_store::LocalLog;
use tracing::{debug, info, warn};

use crate::controls::{ControlAction, HistoryControls};

/// Incoming feed messages handled per tick; the rest wait for the next one.
const MAX_MESSAGES_PER_TICK: usize = 16;

// ── Settings ──────────────────────────────────────────────────────────────────

/// The part of the config that may change while running.
#[derive(Debug, Clone)]
struct Settings {
    sample_interval:    Duration,
    record_interval:    Duration,
    /// `None` keeps the backlight on.
    backlight_timeout:  Option<Duration>,
    fetch_limit:        usize,
    history:            HistoryConfig,
    records_per_hour:   usize,
}

impl Settings {
    fn from_config(cfg: &PortalConfig) -> Self {
        let secs = |s: u64| {
            Duration::seconds(i64::try_from(s).unwrap_or(i64::MAX).min(i64::MAX / 1000))
        };
        Self {
            sample_interval:   secs(cfg.chart.sample_interval_secs),
            record_interval:   secs(cfg.log.record_interval_secs),
            backlight_timeout: (cfg.display.backlight_timeout_secs > 0)
                .then(|| secs(cfg.display.backlight_timeout_secs)),
            fetch_limit:       cfg.feed.fetch_limit,
            history:           cfg.history.clone(),
            records_per_hour:  cfg.log.records_per_hour(),
        }
    }
}

/// Whether a timer last fired at `last` is due again at `now`.
fn due(last: Option<DateTime<Utc>>, now: DateTime<Utc>, every: Duration) -> bool {
    last.map_or(true, |t| now - t >= every)
}

/// Build the tab bar from the configured views.  Ids run from 1 in config
/// order.
fn build_views(cfg: &PortalConfig) -> Result<ViewController> {
    let views = cfg
        .views
        .iter()
        .zip(cfg.tab_bounds())
        .enumerate()
        .map(|(i, (v, bounds))| {
            let id = u8::try_from(i + 1)
                .map_err(|_| PortalError::Config("too many views".into()))?;
            Ok(View::new(ViewId(id), v.kind, Button::new(v.label.clone(), bounds)))
        })
        .collect::<Result<Vec<_>>>()?;
    ViewController::new(views, ViewId(cfg.default_view))
}

// ── App ───────────────────────────────────────────────────────────────────────

/// The polling loop's state and collaborators.
///
/// Everything the panel shows lives here; [`App::tick`] advances it by one
/// step and draws a frame.
pub struct App<P: Panel> {
    panel:    P,
    views:    ViewController,
    history:  HistoryBuffer,
    controls: HistoryControls,
    state:    AppState,
    settings: Settings,
    /// Feed keys are bound to the open connection and fixed at startup.
    publish_feed:   String,
    subscribe_feed: String,

    sensor: Box<dyn TemperatureSensor>,
    /// Host CPU temperature for the info view.
    host:   Option<Box<dyn TemperatureSensor>>,
    feed:   Option<Box<dyn RemoteFeed>>,
    log:    LocalLog,

    /// Latest good reading not yet recorded.  Cleared when the sensor fails.
    unrecorded:  Option<f32>,
    last_sample: Option<DateTime<Utc>>,
    last_record: Option<DateTime<Utc>>,
    idle_since:  DateTime<Utc>,
}

impl<P: Panel> App<P> {
    pub fn new(
        cfg: &PortalConfig,
        panel: P,
        sensor: Box<dyn TemperatureSensor>,
        host: Option<Box<dyn TemperatureSensor>>,
        feed: Option<Box<dyn RemoteFeed>>,
        log: LocalLog,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let views = build_views(cfg)?;
        let (y_min, y_max) = cfg.chart.bounds();
        let history = HistoryBuffer::with_bounds(cfg.chart.capacity, y_min, y_max);
        let controls = HistoryControls::new(
            cfg.display.width,
            cfg.display.height,
            cfg.history.short_hours,
            cfg.history.long_hours,
            cfg.history.window,
            cfg.history.source,
        );
        let state = AppState {
            time: now,
            window: cfg.history.window,
            source: cfg.history.source,
            ..AppState::default()
        };

        let mut app = Self {
            panel,
            views,
            history,
            controls,
            state,
            settings: Settings::from_config(cfg),
            publish_feed: cfg.feed.publish_feed.clone(),
            subscribe_feed: cfg.feed.subscribe_feed.clone(),
            sensor,
            host,
            feed,
            log,
            unrecorded: None,
            last_sample: None,
            last_record: None,
            idle_since: now,
        };
        app.panel.set_brightness(1.0);
        app.redraw_chart();
        Ok(app)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn views(&self) -> &ViewController {
        &self.views
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    /// Buttons shown on the chart view.
    pub fn controls(&self) -> &[Button] {
        self.controls.buttons()
    }

    /// Advance the panel by one step and draw a frame.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.state.time = now;

        self.drain_incoming();

        if due(self.last_sample, now, self.settings.sample_interval) {
            self.last_sample = Some(now);
            self.sample();
        }

        if due(self.last_record, now, self.settings.record_interval) {
            if let Some(t) = self.unrecorded.take() {
                self.last_record = Some(now);
                self.record(t);
            }
        }

        let touch = self.panel.poll_touch();
        self.handle_touch(touch, now);

        self.update_backlight(now);

        let scene = Scene {
            state:    &self.state,
            views:    &self.views,
            controls: self.controls.buttons(),
        };
        self.panel.present(&scene)
    }

    /// Replace the chart with the selected history window from the selected
    /// source.  Failures leave an empty chart.  Returns the number of points
    /// loaded.
    pub fn reload_history(&mut self, now: DateTime<Utc>) -> usize {
        let hours = self.settings.history.hours(self.state.window);

        let loaded = match self.state.source {
            HistorySource::Remote => match self.feed.as_mut() {
                Some(feed) => {
                    let start = hours_before(now.naive_utc(), hours);
                    feed.fetch_range(start, self.settings.fetch_limit)
                }
                None => Err(PortalError::Transport("cloud feed is disabled".into())),
            },
            HistorySource::Local => {
                let n = (hours as usize).saturating_mul(self.settings.records_per_hour);
                self.log.read_last_n(n)
            }
        };

        let values = loaded.unwrap_or_else(|e| {
            warn!("History reload failed: {e}");
            Vec::new()
        });

        self.history.replace_all(values);
        self.redraw_chart();

        let n = self.history.len();
        self.state.last_reload = Some(n);
        info!(
            "Loaded {n} points ({hours}h from {:?} history)",
            self.state.source
        );
        n
    }

    /// Apply a reloaded config.  Views, theme, chart capacity and feed keys
    /// stay as they were at startup.
    pub fn apply_config(&mut self, cfg: &PortalConfig) {
        self.settings = Settings::from_config(cfg);
        if cfg.feed.publish_feed != self.publish_feed
            || cfg.feed.subscribe_feed != self.subscribe_feed
        {
            warn!("Feed keys changed; restart to use them");
        }
        let (y_min, y_max) = cfg.chart.bounds();
        self.history.set_bounds(y_min, y_max);

        if cfg.log.path != self.log.path() {
            info!("Reading log moved to {}", cfg.log.path.display());
        }
        self.log = LocalLog::new(cfg.log.path.clone(), cfg.log.max_entries);

        self.redraw_chart();
        info!("Config applied");
    }

    // ── Tick steps ────────────────────────────────────────────────────────────

    fn drain_incoming(&mut self) {
        let Some(feed) = self.feed.as_mut() else {
            return;
        };
        for _ in 0..MAX_MESSAGES_PER_TICK {
            let Some(msg) = feed.poll_incoming() else {
                break;
            };
            if msg.feed == self.subscribe_feed {
                debug!("Feed {} = {}", msg.feed, msg.payload);
                self.state.feed_value = Some(msg.payload);
            } else {
                debug!("Ignoring message on feed {}", msg.feed);
            }
        }
    }

    fn sample(&mut self) {
        match self.sensor.read_temperature() {
            Ok(t) if t.is_finite() => {
                if !self.state.sensor_ok {
                    info!("{} sensor reading again", self.sensor.name());
                }
                self.state.sensor_ok = true;
                self.state.temperature = Some(t);
                self.unrecorded = Some(t);

                self.history.append(t);
                let (lo, hi) = self.history.y_range();
                self.panel.suspend_refresh();
                self.panel.add_point(t);
                self.panel.set_range(lo, hi);
                self.panel.resume_refresh();
            }
            Ok(t) => debug!("Discarding non-finite reading {t}"),
            Err(e) => {
                if self.state.sensor_ok {
                    warn!("Temperature unavailable: {e}");
                }
                self.state.sensor_ok = false;
                self.state.temperature = None;
                self.unrecorded = None;
            }
        }

        if let Some(host) = self.host.as_mut() {
            self.state.cpu_temp = host.read_temperature().ok();
        }
    }

    fn record(&mut self, t: f32) {
        if let Err(e) = self.log.append_line(t) {
            warn!("Failed to log reading: {e}");
        }
        if let Some(feed) = self.feed.as_mut() {
            if let Err(e) = feed.send_value(&self.publish_feed, t) {
                warn!("Failed to publish reading: {e}");
            }
        }
    }

    fn handle_touch(&mut self, touch: Option<Point>, now: DateTime<Utc>) {
        if let Some(p) = touch {
            self.state.last_touch = Some(p);
            self.idle_since = now;
            if !self.state.backlight_on {
                debug!("Backlight on");
                self.state.backlight_on = true;
                self.panel.set_brightness(1.0);
            }
        }

        if let Some(id) = self.views.handle_touch(touch) {
            debug!("Switched to view {id}");
            self.panel.play_cue();
            return;
        }

        if self.views.shows(ViewKind::Chart) {
            if let Some(action) = self.controls.handle_touch(touch) {
                match action {
                    ControlAction::Window(w) => self.state.window = w,
                    ControlAction::Source(s) => self.state.source = s,
                }
                self.reload_history(now);
            }
        } else if touch.is_none() {
            self.controls.reset();
        }
    }

    fn update_backlight(&mut self, now: DateTime<Utc>) {
        let Some(timeout) = self.settings.backlight_timeout else {
            return;
        };
        if self.state.backlight_on && now - self.idle_since >= timeout {
            debug!("Backlight off after {}s idle", timeout.num_seconds());
            self.state.backlight_on = false;
            self.panel.set_brightness(0.0);
        }
    }

    /// Clear the chart and replay the whole buffer with refresh suspended.
    fn redraw_chart(&mut self) {
        let (lo, hi) = self.history.y_range();
        self.panel.suspend_refresh();
        self.panel.clear();
        for v in self.history.iter() {
            self.panel.add_point(v);
        }
        self.panel.set_range(lo, hi);
        self.panel.resume_refresh();
    }
}

/// Chart area of the screen: between the tab bar and the controls.
pub fn chart_bounds(cfg: &PortalConfig) -> Bounds {
    let top = cfg.display.tab_height;
    let bottom = cfg.display.height / 8 * 6;
    Bounds::new(0, top, cfg.display.width, bottom.saturating_sub(top))
}
