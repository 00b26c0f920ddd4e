pub mod cpu;
pub mod hwmon;

pub use cpu::CpuSensor;
pub use hwmon::HwmonSensor;

use portal_config::SensorConfig;
use portal_core::Result;
use tracing::{info, warn};

/// A source of temperature readings in °C.
pub trait TemperatureSensor {
    /// Short name for logs, e.g. `"hwmon"`.
    fn name(&self) -> &str;

    /// Take one reading.  Fails with `HardwareAbsent` when the device is gone.
    fn read_temperature(&mut self) -> Result<f32>;
}

/// Reads the primary sensor, switching to the fallback whenever the primary
/// fails.  The primary is retried on every read.
pub struct FallbackSensor {
    primary:  Option<Box<dyn TemperatureSensor>>,
    fallback: Box<dyn TemperatureSensor>,
    /// Whether the last read came from the fallback.
    on_fallback: bool,
}

impl FallbackSensor {
    pub fn new(
        primary: Option<Box<dyn TemperatureSensor>>,
        fallback: Box<dyn TemperatureSensor>,
    ) -> Self {
        Self {
            primary,
            fallback,
            on_fallback: false,
        }
    }

    #[must_use]
    pub fn on_fallback(&self) -> bool {
        self.on_fallback
    }
}

impl TemperatureSensor for FallbackSensor {
    fn name(&self) -> &str {
        match &self.primary {
            Some(p) if !self.on_fallback => p.name(),
            _ => self.fallback.name(),
        }
    }

    fn read_temperature(&mut self) -> Result<f32> {
        if let Some(primary) = self.primary.as_mut() {
            match primary.read_temperature() {
                Ok(t) => {
                    if self.on_fallback {
                        info!("{} sensor is back", primary.name());
                        self.on_fallback = false;
                    }
                    return Ok(t);
                }
                Err(e) => {
                    if !self.on_fallback {
                        warn!(
                            "{} sensor failed ({e}); using {} temperature",
                            primary.name(),
                            self.fallback.name()
                        );
                    }
                }
            }
        }
        self.on_fallback = self.primary.is_some();
        self.fallback.read_temperature()
    }
}

/// Build the configured sensor: the hwmon input when one is configured and
/// readable, with the host CPU temperature as fallback.
pub fn open_sensor(cfg: &SensorConfig) -> FallbackSensor {
    let primary = cfg.hwmon_path.as_ref().and_then(|path| match HwmonSensor::open(path) {
        Ok(s) => {
            info!("Temperature sensor: {}", path.display());
            Some(Box::new(s) as Box<dyn TemperatureSensor>)
        }
        Err(e) => {
            warn!("Temperature sensor not found ({e}); using CPU temperature");
            None
        }
    });

    FallbackSensor::new(primary, Box::new(CpuSensor::new()))
}
