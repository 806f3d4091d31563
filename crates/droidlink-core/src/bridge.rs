//! Bridge client contract.
//!
//! The bridge is the external command-and-control tool (ADB or compatible)
//! that mediates all device communication. This module specifies the contract
//! the device layer consumes; process invocation and the wire protocol live
//! outside this workspace.
//!
//! Commands are strongly typed rather than stringly typed: [`BridgeAction`]
//! enumerates the narrow set of operations the device layer may issue, so a
//! malformed command cannot be constructed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One row of the bridge's attached-device listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEntry {
    /// Opaque identifier addressing the device (serial, or `host:port`).
    pub qualifier: String,
    /// State string exactly as the bridge reported it.
    pub raw_state: String,
}

impl DeviceEntry {
    pub fn new(qualifier: impl Into<String>, raw_state: impl Into<String>) -> Self {
        Self {
            qualifier: qualifier.into(),
            raw_state: raw_state.into(),
        }
    }
}

/// Swipe gesture endpoints in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwipeGesture {
    pub x_from: u32,
    pub y_from: u32,
    pub x_to: u32,
    pub y_to: u32,
}

/// Actions the device layer can ask the bridge to run on a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeAction {
    /// Install the archive at the given host path.
    Install { path: String },
    /// Uninstall a package by name.
    Uninstall { package: String },
    /// Send a key event code (`input keyevent <code>`).
    KeyEvent(u32),
    /// Type literal text (`input text <text>`).
    InputText(String),
    /// Perform a swipe gesture.
    Swipe(SwipeGesture),
    /// Destructively block a package (pre-Lollipop strategy).
    BlockPackage { package: String },
    /// Reversibly hide a package (Lollipop-and-later strategy).
    HidePackage { package: String },
    /// Capture the screen to the given on-device path.
    Screencap { path: String },
    /// Run the UI exerciser for a number of events.
    Monkey { events: u32, package: Option<String> },
    /// Reboot the device.
    Reboot,
    /// Start an activity-manager intent command.
    Intent { command: String },
    /// List installed packages.
    ListPackages,
    /// Read the device uptime.
    Uptime,
    /// Report filesystem usage (kilobyte blocks).
    DiskFree,
    /// Dump the configuration of a network interface.
    NetworkInterface { name: String },
    /// Read the Wi-Fi MAC address.
    WifiMacAddress,
    /// Read the physical display density.
    DisplayDensity,
}

impl BridgeAction {
    /// Short action name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Install { .. } => "install",
            Self::Uninstall { .. } => "uninstall",
            Self::KeyEvent(_) => "keyevent",
            Self::InputText(_) => "input-text",
            Self::Swipe(_) => "swipe",
            Self::BlockPackage { .. } => "block-package",
            Self::HidePackage { .. } => "hide-package",
            Self::Screencap { .. } => "screencap",
            Self::Monkey { .. } => "monkey",
            Self::Reboot => "reboot",
            Self::Intent { .. } => "intent",
            Self::ListPackages => "list-packages",
            Self::Uptime => "uptime",
            Self::DiskFree => "disk-free",
            Self::NetworkInterface { .. } => "network-interface",
            Self::WifiMacAddress => "wifi-mac-address",
            Self::DisplayDensity => "display-density",
        }
    }
}

/// Errors reported by the bridge collaborator.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The qualifier does not match any attached device.
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    /// The device is attached but currently unreachable.
    #[error("device offline: {0}")]
    DeviceOffline(String),

    /// The qualifier is not a valid remote `host:port` address.
    #[error("invalid remote address: {0}")]
    InvalidAddress(String),

    /// The bridge ran but the command itself failed.
    #[error("bridge command failed: {0}")]
    Command(String),

    /// The bridge tool could not be executed at all.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Contract of the external bridge tool.
///
/// Implementations issue one blocking invocation per call and surface the
/// first failure; no retries happen at this seam.
pub trait Bridge: Send + Sync {
    /// List currently attached devices with their raw state strings.
    fn list(&self) -> Result<Vec<DeviceEntry>, BridgeError>;

    /// Read the full system property table of a device.
    fn get_properties(&self, qualifier: &str) -> Result<HashMap<String, String>, BridgeError>;

    /// Read the key/value digest of the device's display state dump.
    fn get_dumpsys(&self, qualifier: &str) -> Result<HashMap<String, String>, BridgeError>;

    /// Dump a single system service without any key/value digestion.
    fn raw_dumpsys(&self, qualifier: &str, service: &str) -> Result<String, BridgeError>;

    /// Read the key/value digest of the device's power-manager state.
    fn get_powerinfo(&self, qualifier: &str) -> Result<HashMap<String, String>, BridgeError>;

    /// Read the key/value digest of the device's telephony state.
    fn get_phoneinfo(&self, qualifier: &str) -> Result<HashMap<String, String>, BridgeError>;

    /// Run an action against a device, returning the raw text result.
    fn run_action(&self, qualifier: &str, action: &BridgeAction) -> Result<String, BridgeError>;

    /// Check whether a qualifier is a valid, reachable remote address.
    ///
    /// Success implies the device is network-attached; any failure means the
    /// qualifier addresses a local device.
    fn validate_remote_address(&self, qualifier: &str) -> Result<(), BridgeError>;

    /// Connect to a network-attached device.
    fn connect(&self, host: &str, port: u16) -> Result<(), BridgeError>;

    /// Disconnect from a network-attached device.
    fn disconnect(&self, host: &str, port: u16) -> Result<(), BridgeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_names() {
        let action = BridgeAction::Install {
            path: "/tmp/app.apk".to_string(),
        };
        assert_eq!(action.name(), "install");
        assert_eq!(BridgeAction::Reboot.name(), "reboot");
    }

    #[test]
    fn test_device_entry_serializes() {
        let entry = DeviceEntry::new("01498A0004005015", "device");
        let json = serde_json::to_string(&entry).unwrap();
        let back: DeviceEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
