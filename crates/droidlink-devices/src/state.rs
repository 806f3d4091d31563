//! Device state as reported by the bridge, and its normalized status.

use serde::{Deserialize, Serialize};

/// Connection state exactly as the bridge reports it at discovery time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceState {
    Device,
    NoDevice,
    Offline,
    Unauthorized,
    NoPermissions,
    Unknown,
}

impl DeviceState {
    /// Parse a raw bridge state string.
    ///
    /// The mapping is total: anything unrecognized collapses to `Unknown`
    /// rather than failing, since new bridge versions may grow new states.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim() {
            "device" => Self::Device,
            "no device" => Self::NoDevice,
            "offline" => Self::Offline,
            "unauthorized" => Self::Unauthorized,
            "no permissions" => Self::NoPermissions,
            _ => Self::Unknown,
        }
    }

    /// Normalize to the platform-independent status.
    pub fn status(self) -> DeviceStatus {
        match self {
            Self::Device => DeviceStatus::Ok,
            Self::NoDevice => DeviceStatus::Dead,
            Self::Offline => DeviceStatus::Offline,
            Self::Unauthorized => DeviceStatus::Unauthorized,
            Self::NoPermissions => DeviceStatus::NoPermissions,
            Self::Unknown => DeviceStatus::Unknown,
        }
    }

    /// States during which property queries are unreliable, so the variant
    /// probe must be skipped.
    pub fn unreliable_for_probe(self) -> bool {
        matches!(self, Self::Unauthorized | Self::Offline | Self::Unknown)
    }
}

impl std::fmt::Display for DeviceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Device => write!(f, "device"),
            Self::NoDevice => write!(f, "no device"),
            Self::Offline => write!(f, "offline"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::NoPermissions => write!(f, "no permissions"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Normalized device status, consistent across platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    Ok,
    Dead,
    Offline,
    Unauthorized,
    NoPermissions,
    Unknown,
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Dead => write!(f, "dead"),
            Self::Offline => write!(f, "offline"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::NoPermissions => write!(f, "no_permissions"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}
