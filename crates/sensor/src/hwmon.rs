use portal_core::{PortalError, Result};
use std::path::{Path, PathBuf};

use crate::TemperatureSensor;

/// Temperature from a Linux sysfs hwmon input (`temp*_input`), which reports
/// millidegrees Celsius as a decimal integer.
#[derive(Debug, Clone)]
pub struct HwmonSensor {
    path: PathBuf,
}

impl HwmonSensor {
    /// Open the sensor, failing with `HardwareAbsent` when the file cannot
    /// be read once.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut sensor = Self {
            path: path.as_ref().to_path_buf(),
        };
        sensor.read_temperature()?;
        Ok(sensor)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TemperatureSensor for HwmonSensor {
    fn name(&self) -> &str {
        "hwmon"
    }

    fn read_temperature(&mut self) -> Result<f32> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            PortalError::HardwareAbsent(format!("{}: {e}", self.path.display()))
        })?;
        parse_millidegrees(&raw)
    }
}

/// Parse a sysfs millidegree value, e.g. `"41250\n"` → `41.25`.
pub fn parse_millidegrees(raw: &str) -> Result<f32> {
    let milli = raw
        .trim()
        .parse::<i32>()
        .map_err(|_| PortalError::Malformed(format!("hwmon value '{}'", raw.trim())))?;
    Ok(milli as f32 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_millidegrees_values() {
        assert_eq!(parse_millidegrees("41250\n").unwrap(), 41.25);
        assert_eq!(parse_millidegrees("-5000").unwrap(), -5.0);
        assert!(parse_millidegrees("hot").is_err());
    }

    #[test]
    fn reads_sysfs_style_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "23500").unwrap();

        let mut sensor = HwmonSensor::open(file.path()).unwrap();
        assert_eq!(sensor.read_temperature().unwrap(), 23.5);
    }

    #[test]
    fn missing_file_is_hardware_absent() {
        let dir = tempfile::tempdir().unwrap();
        let err = HwmonSensor::open(dir.path().join("temp1_input")).unwrap_err();
        assert!(matches!(err, PortalError::HardwareAbsent(_)));
    }
}
