//! Device layer: discovery, variants, and the device query/action surface.
//!
//! This crate turns the raw bridge contract from `droidlink-core` into a
//! typed device model. [`Discovery`] lists and resolves devices, picking a
//! manufacturer [`variant`](crate::variant) per device; [`Device`] exposes
//! the blocking query and action surface with per-instance caching of the
//! three bridge fetch groups.
//!
//! All calls block until the underlying bridge invocation completes. There
//! is no retry logic anywhere in this crate; the first failure surfaces.

pub mod cache;
pub mod device;
pub mod discovery;
pub mod model;
pub mod plugins;
pub mod release;
pub mod state;
pub mod testing;
pub mod variant;
pub mod variants;

pub use device::{Device, DeviceOptions, Orientation, RemoteEndpoint, WifiStatus};
pub use discovery::Discovery;
pub use state::{DeviceState, DeviceStatus};
pub use variant::{DeviceKind, VariantBehavior, VariantTag};

pub use droidlink_core::{Bridge, BridgeAction, BridgeError, DeviceError};

/// Crate version, taken from the build manifest.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
