//! Polling loop for the panel.
//!
//! One thread, one loop: drain the cloud feed, sample the sensor, record,
//! route touches, draw.  Collaborators are reached only through the traits in
//! `portal-core`, `portal-sensor` and `portal-feed`, so any [`Panel`] can be
//! driven.

pub mod app;
pub mod controls;

pub use app::{chart_bounds, App};
pub use controls::{ControlAction, HistoryControls};

use chrono::Utc;
use portal_config::{load as load_config, ConfigWatcher, PortalConfig};
use portal_core::{Panel, Result};
use portal_feed::{open_feed, RemoteFeed};
use portal_sensor::{open_sensor, CpuSensor, TemperatureSensor};
use portal_store::LocalLog;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Run the panel until it asks to quit.  `config_path` is watched and
/// re-applied on change.
pub fn run<P: Panel>(config: PortalConfig, config_path: &Path, panel: P) -> Result<()> {
    let now = Utc::now();

    let sensor: Box<dyn TemperatureSensor> = Box::new(open_sensor(&config.sensor));
    let host: Option<Box<dyn TemperatureSensor>> = Some(Box::new(CpuSensor::new()));
    let feed = open_feed(&config.feed).map(|f| Box::new(f) as Box<dyn RemoteFeed>);
    let log = LocalLog::new(config.log.path.clone(), config.log.max_entries);

    let mut app = App::new(&config, panel, sensor, host, feed, log, now)?;
    app.reload_history(now);

    let mut watcher = ConfigWatcher::spawn(config_path);
    let mut interval = tick_interval(&config);
    info!("Panel running; tick every {}ms", interval.as_millis());

    while !app.panel().quit_requested() {
        if watcher.changed() {
            match load_config(watcher.path()) {
                Ok(next) => {
                    interval = tick_interval(&next);
                    app.apply_config(&next);
                }
                Err(e) => warn!("Config reload failed, keeping the current one: {e}"),
            }
        }

        app.tick(Utc::now())?;
        std::thread::sleep(interval);
    }

    info!("Quit requested; shutting down");
    Ok(())
}

fn tick_interval(config: &PortalConfig) -> Duration {
    Duration::from_millis(config.display.tick_ms.max(1))
}
