//! Stat snapshot types shared between the device layer and its provider
//! plugins.
//!
//! Providers compute these from one or more bridge calls; the device layer
//! treats them as opaque results and never re-derives their fields.

use serde::{Deserialize, Serialize};

/// Battery state snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatterySnapshot {
    /// Charge level in percent (0-100).
    pub level: u8,
    /// Charging over AC power.
    pub ac_powered: bool,
    /// Charging over USB.
    pub usb_powered: bool,
    /// Charging wirelessly.
    pub wireless_powered: bool,
    /// Reported battery health string (e.g. `good`).
    pub health: String,
    /// Battery temperature in tenths of a degree Celsius, as reported.
    pub temperature: Option<i32>,
}

impl BatterySnapshot {
    /// Whether the device is being powered in any way.
    pub fn powered(&self) -> bool {
        self.ac_powered || self.usb_powered || self.wireless_powered
    }
}

/// Memory usage snapshot, all values in kilobytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    pub total_kb: u64,
    pub free_kb: u64,
    pub used_kb: u64,
}

/// Usage of a single mounted filesystem, sizes in kilobytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskUsage {
    pub filesystem: String,
    pub size_kb: u64,
    pub used_kb: u64,
    pub available_kb: u64,
    pub mounted_on: String,
}

/// Disk usage snapshot across the device's mounted filesystems.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskSnapshot {
    pub mounts: Vec<DiskUsage>,
}

impl DiskSnapshot {
    /// Usage of the user-data partition, if mounted.
    pub fn data_partition(&self) -> Option<&DiskUsage> {
        self.mounts.iter().find(|m| m.mounted_on == "/data")
    }
}

/// Audio routing snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSnapshot {
    /// Whether the loudspeaker is the active output.
    pub speaker_on: bool,
    /// Whether the master stream is muted.
    pub muted: bool,
    /// Reported master volume step, if present.
    pub volume: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battery_powered_is_any_source() {
        let mut battery = BatterySnapshot::default();
        assert!(!battery.powered());

        battery.usb_powered = true;
        assert!(battery.powered());
    }

    #[test]
    fn test_disk_data_partition() {
        let snapshot = DiskSnapshot {
            mounts: vec![
                DiskUsage {
                    filesystem: "/dev/block/dm-0".to_string(),
                    size_kb: 10240,
                    used_kb: 2048,
                    available_kb: 8192,
                    mounted_on: "/system".to_string(),
                },
                DiskUsage {
                    filesystem: "/dev/block/dm-1".to_string(),
                    size_kb: 524288,
                    used_kb: 131072,
                    available_kb: 393216,
                    mounted_on: "/data".to_string(),
                },
            ],
        };
        assert_eq!(snapshot.data_partition().unwrap().size_kb, 524288);
    }
}
