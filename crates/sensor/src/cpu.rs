use portal_core::{PortalError, Result};
use sysinfo::Components;

use crate::TemperatureSensor;

/// Host CPU temperature read through `sysinfo`.
///
/// Picks the hottest component whose label looks like a CPU package or core;
/// falls back to the hottest component of any kind.
pub struct CpuSensor {
    components: Components,
}

impl CpuSensor {
    pub fn new() -> Self {
        Self {
            components: Components::new_with_refreshed_list(),
        }
    }
}

impl Default for CpuSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CpuSensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSensor")
            .field("components", &self.components.list().len())
            .finish()
    }
}

impl TemperatureSensor for CpuSensor {
    fn name(&self) -> &str {
        "cpu"
    }

    fn read_temperature(&mut self) -> Result<f32> {
        self.components.refresh(true);

        let readings: Vec<(String, f32)> = self
            .components
            .list()
            .iter()
            .filter_map(|c| c.temperature().map(|t| (c.label().to_lowercase(), t)))
            .filter(|(_, t)| t.is_finite())
            .collect();

        pick_cpu_reading(&readings)
            .ok_or_else(|| PortalError::HardwareAbsent("no temperature components".into()))
    }
}

fn is_cpu_label(label: &str) -> bool {
    ["cpu", "package", "core", "tctl", "tdie", "k10temp", "coretemp"]
        .iter()
        .any(|k| label.contains(k))
}

/// Hottest CPU-like reading, else hottest reading of any kind.
fn pick_cpu_reading(readings: &[(String, f32)]) -> Option<f32> {
    hottest(readings.iter().filter(|(l, _)| is_cpu_label(l)).map(|(_, t)| *t))
        .or_else(|| hottest(readings.iter().map(|(_, t)| *t)))
}

fn hottest(it: impl Iterator<Item = f32>) -> Option<f32> {
    it.reduce(f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(label: &str, t: f32) -> (String, f32) {
        (label.to_string(), t)
    }

    #[test]
    fn prefers_cpu_components() {
        let readings = [r("nvme composite", 60.0), r("coretemp package id 0", 48.0), r("core 1", 51.0)];
        assert_eq!(pick_cpu_reading(&readings), Some(51.0));
    }

    #[test]
    fn falls_back_to_any_component() {
        let readings = [r("acpitz", 35.0), r("nvme composite", 41.0)];
        assert_eq!(pick_cpu_reading(&readings), Some(41.0));
    }

    #[test]
    fn nothing_to_read() {
        assert_eq!(pick_cpu_reading(&[]), None);
    }
}
