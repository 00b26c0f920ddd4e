pub mod schema;
pub mod watcher;

pub use schema::{
    ChartConfig, DisplayConfig, FeedConfig, HistoryConfig, LogConfig, PortalConfig,
    SensorConfig, ThemeConfig, ViewConfig,
};
pub use watcher::ConfigWatcher;

/// Largest chart history accepted from a config file.
pub const MAX_CHART_CAPACITY: usize = 10_000;

use portal_core::{PortalError, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file.  Returns `PortalConfig::default()` if
/// the file doesn't exist so the panel always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<PortalConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(PortalConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| PortalError::Config(format!("cannot read '{}': {e}", path.display())))?;

    parse(&raw)
}

/// Parse and validate a TOML document.
pub fn parse(raw: &str) -> Result<PortalConfig> {
    let config: PortalConfig =
        toml::from_str(raw).map_err(|e| PortalError::Config(format!("TOML parse error: {e}")))?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &PortalConfig) -> Result<()> {
    if config.views.is_empty() {
        return Err(PortalError::Config("at least one [[views]] entry is required".into()));
    }
    if config.views.len() > usize::from(u8::MAX) {
        return Err(PortalError::Config("too many views".into()));
    }
    if config.default_view == 0 || usize::from(config.default_view) > config.views.len() {
        return Err(PortalError::Config(format!(
            "default_view {} is not one of the {} configured views",
            config.default_view,
            config.views.len()
        )));
    }
    if config.display.tab_height >= config.display.height {
        return Err(PortalError::Config("tab_height must be smaller than the screen".into()));
    }
    if config.chart.capacity > MAX_CHART_CAPACITY {
        return Err(PortalError::Config(format!(
            "chart capacity {} exceeds {MAX_CHART_CAPACITY}",
            config.chart.capacity
        )));
    }
    if let (Some(lo), Some(hi)) = config.chart.bounds() {
        if lo >= hi {
            return Err(PortalError::Config(format!("chart y_min {lo} >= y_max {hi}")));
        }
    }
    Ok(())
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    config_dir().join("portal.toml")
}

/// Directory holding the config file (and the panel's own log output).
pub fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("portal")
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::{Bounds, HistorySource, ViewKind};

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load(dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg.views.len(), 3);
        assert_eq!(cfg.default_view, 1);
        assert_eq!(cfg.chart.capacity, 144);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = parse(
            r#"
            [chart]
            capacity = 40
            y_min = 20.0

            [history]
            source = "local"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.chart.capacity, 40);
        assert_eq!(cfg.chart.y_min, Some(20.0));
        assert_eq!(cfg.chart.y_max, Some(40.0));
        assert_eq!(cfg.history.source, HistorySource::Local);
        assert_eq!(cfg.display.width, 240);
    }

    #[test]
    fn views_parse_in_order() {
        let cfg = parse(
            r#"
            default_view = 2

            [[views]]
            label = "Graph"
            kind = "chart"

            [[views]]
            label = "Info"
            kind = "info"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.views.len(), 2);
        assert_eq!(cfg.views[0].kind, ViewKind::Chart);
        assert_eq!(cfg.views[1].label, "Info");
    }

    #[test]
    fn rejects_bad_default_view() {
        assert!(parse("default_view = 4").is_err());
        assert!(parse("default_view = 0").is_err());
    }

    #[test]
    fn rejects_inverted_chart_range() {
        assert!(parse("[chart]\ny_min = 50.0\ny_max = 10.0").is_err());
    }

    #[test]
    fn rejects_oversized_chart() {
        assert!(parse(&format!("[chart]\ncapacity = {MAX_CHART_CAPACITY}")).is_ok());
        assert!(matches!(
            parse("[chart]\ncapacity = 100000000000"),
            Err(PortalError::Config(_))
        ));
    }

    #[test]
    fn auto_range_clears_fixed_bounds() {
        let cfg = parse("[chart]\nauto_range = true\ny_min = 50.0\ny_max = 10.0").unwrap();
        assert_eq!(cfg.chart.bounds(), (None, None));
        assert_eq!(PortalConfig::default().chart.bounds(), (Some(0.0), Some(40.0)));
    }

    #[test]
    fn rejects_invalid_toml() {
        assert!(matches!(parse("[chart"), Err(PortalError::Config(_))));
    }

    #[test]
    fn tab_bounds_cover_the_width() {
        let mut cfg = PortalConfig::default();
        cfg.display.width = 241;
        let tabs = cfg.tab_bounds();
        assert_eq!(tabs[0], Bounds::new(0, 0, 80, 50));
        assert_eq!(tabs[1], Bounds::new(80, 0, 80, 50));
        assert_eq!(tabs[2], Bounds::new(160, 0, 81, 50));
    }

    #[test]
    fn records_per_hour_never_zero() {
        let mut log = LogConfig::default();
        assert_eq!(log.records_per_hour(), 60);
        log.record_interval_secs = 7200;
        assert_eq!(log.records_per_hour(), 1);
        log.record_interval_secs = 0;
        assert_eq!(log.records_per_hour(), 3600);
    }
}
