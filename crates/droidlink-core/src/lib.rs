//! Core contracts for the droidlink device-automation layer.
//!
//! This crate defines the seams between the device abstraction and its
//! external collaborators:
//! - [`Bridge`]: the command-and-control tool mediating all device
//!   communication (USB or network-attached)
//! - [`PackageInspector`]: metadata extraction from installable archives
//! - stat snapshot types shared with the provider plugins
//! - the error taxonomy surfaced by the device layer
//!
//! Everything here is synchronous and blocking by design: each call maps to
//! one invocation of the external tool, there is no event loop, and retry
//! policy belongs to the caller.

pub mod bridge;
pub mod config;
pub mod error;
pub mod inspector;
pub mod stats;

pub use bridge::{Bridge, BridgeAction, BridgeError, DeviceEntry, SwipeGesture};
pub use error::DeviceError;
pub use inspector::{InspectorError, PackageInspector, PackageMetadata};
pub use stats::{AudioSnapshot, BatterySnapshot, DiskSnapshot, DiskUsage, MemorySnapshot};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
