//! Device discovery and qualifier resolution.
//!
//! Discovery lists attached devices through the bridge, decides remoteness
//! per qualifier, probes the manufacturer to pick a variant, and hands back
//! fully constructed [`Device`] values. The probe is best-effort: devices in
//! states where queries are unreliable, and devices whose probe fails
//! outright, get the default variant rather than an error.

use std::sync::Arc;

use tracing::{debug, warn};

use droidlink_core::{Bridge, DeviceError, PackageInspector};

use crate::device::{Device, DeviceOptions};
use crate::state::DeviceState;
use crate::variant::{self, VariantTag};

/// Enumerates attached devices and resolves individual qualifiers.
pub struct Discovery {
    bridge: Arc<dyn Bridge>,
    inspector: Arc<dyn PackageInspector>,
}

impl Discovery {
    pub fn new(bridge: Arc<dyn Bridge>, inspector: Arc<dyn PackageInspector>) -> Self {
        Self { bridge, inspector }
    }

    /// All currently attached devices.
    ///
    /// Qualifiers containing `?` are transient artifacts of a half-attached
    /// device and are dropped from the listing.
    pub fn list_devices(&self) -> Result<Vec<Device>, DeviceError> {
        let mut devices = Vec::new();
        for entry in self.bridge.list()? {
            if entry.qualifier.contains('?') {
                debug!(qualifier = %entry.qualifier, "skipping transient qualifier");
                continue;
            }
            let state = DeviceState::from_raw(&entry.raw_state);
            devices.push(self.build_device(&entry.qualifier, state)?);
        }
        Ok(devices)
    }

    /// Resolve a single qualifier against a fresh listing.
    ///
    /// A qualifier absent from the listing still resolves, with `Unknown`
    /// state, so that callers can address devices the bridge has not yet
    /// picked up.
    pub fn resolve(&self, qualifier: &str) -> Result<Device, DeviceError> {
        if qualifier.is_empty() {
            return Err(DeviceError::BadQualifier(qualifier.to_string()));
        }
        let state = self
            .bridge
            .list()?
            .into_iter()
            .find(|entry| entry.qualifier == qualifier)
            .map(|entry| DeviceState::from_raw(&entry.raw_state))
            .unwrap_or(DeviceState::Unknown);
        self.build_device(qualifier, state)
    }

    fn build_device(&self, qualifier: &str, state: DeviceState) -> Result<Device, DeviceError> {
        let remote = self.bridge.validate_remote_address(qualifier).is_ok();
        let tag = self.variant_for(qualifier, state);
        debug!(%qualifier, %state, %tag, remote, "constructing device");
        Device::new(
            DeviceOptions::new(qualifier, state).remote(remote),
            variant::behavior_for(tag),
            self.bridge.clone(),
            self.inspector.clone(),
        )
    }

    /// Probe the manufacturer to pick the variant tag.
    ///
    /// The probe reads properties through a provisional default-variant
    /// device. States where property reads are unreliable skip the probe
    /// entirely, and a failed probe degrades to the default tag.
    fn variant_for(&self, qualifier: &str, state: DeviceState) -> VariantTag {
        if state.unreliable_for_probe() {
            return VariantTag::Default;
        }
        let probe = Device::new(
            DeviceOptions::new(qualifier, state),
            variant::behavior_for(VariantTag::Default),
            self.bridge.clone(),
            self.inspector.clone(),
        );
        match probe.and_then(|device| device.manufacturer()) {
            Ok(manufacturer) => VariantTag::from_manufacturer(&manufacturer),
            Err(err) => {
                warn!(%qualifier, error = %err, "manufacturer probe failed, using default variant");
                VariantTag::Default
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedBridge, ScriptedInspector};

    fn discovery(bridge: Arc<ScriptedBridge>) -> Discovery {
        Discovery::new(bridge, ScriptedInspector::new().into_shared())
    }

    #[test]
    fn test_list_assigns_variants_by_manufacturer() {
        let bridge = ScriptedBridge::new()
            .with_entry("kindle1", "device")
            .with_property("kindle1", "ro.product.manufacturer", "Amazon")
            .with_entry("galaxy1", "device")
            .with_property("galaxy1", "ro.product.manufacturer", "samsung")
            .with_entry("pixel1", "device")
            .with_property("pixel1", "ro.product.manufacturer", "Google")
            .into_shared();

        let devices = discovery(bridge).list_devices().unwrap();
        let tags: Vec<_> = devices.iter().map(Device::variant).collect();
        assert_eq!(
            tags,
            vec![VariantTag::Kindle, VariantTag::Samsung, VariantTag::Default]
        );
    }

    #[test]
    fn test_transient_qualifiers_are_dropped() {
        let bridge = ScriptedBridge::new()
            .with_entry("????????", "no permissions")
            .with_entry("serial1", "device")
            .into_shared();

        let devices = discovery(bridge).list_devices().unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].qualifier(), "serial1");
    }

    #[test]
    fn test_unreliable_states_are_never_probed() {
        let bridge = ScriptedBridge::new()
            .with_entry("locked1", "unauthorized")
            .with_entry("gone1", "offline")
            .into_shared();

        let devices = discovery(bridge.clone()).list_devices().unwrap();
        assert_eq!(devices.len(), 2);
        for device in &devices {
            assert_eq!(device.variant(), VariantTag::Default);
        }
        assert_eq!(bridge.count_calls("get_properties"), 0);
    }

    #[test]
    fn test_probe_failure_falls_back_to_default() {
        // Listed but unplugged before the probe, so property reads fail.
        let bridge = ScriptedBridge::new()
            .with_unscripted_entry("vanished", "device")
            .into_shared();

        let devices = discovery(bridge).list_devices().unwrap();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].variant(), VariantTag::Default);
    }

    #[test]
    fn test_remote_qualifiers_build_remote_devices() {
        let qualifier = "192.168.1.34:5555";
        let bridge = ScriptedBridge::new()
            .with_entry(qualifier, "device")
            .with_remote(qualifier)
            .with_property(qualifier, "ro.product.manufacturer", "Google")
            .with_property(qualifier, "ro.serialno", "01498A0004005015")
            .with_entry("serial1", "device")
            .into_shared();

        let devices = discovery(bridge).list_devices().unwrap();
        assert!(devices[0].is_remote());
        assert_eq!(devices[0].serial(), "01498A0004005015");
        assert!(!devices[1].is_remote());
    }

    #[test]
    fn test_resolve_empty_qualifier_is_rejected() {
        let bridge = ScriptedBridge::new().into_shared();
        assert!(matches!(
            discovery(bridge).resolve(""),
            Err(DeviceError::BadQualifier(_))
        ));
    }

    #[test]
    fn test_resolve_listed_and_unlisted() {
        let bridge = ScriptedBridge::new()
            .with_entry("serial1", "device")
            .with_property("serial1", "ro.product.manufacturer", "samsung")
            .into_shared();
        let discovery = discovery(bridge);

        let listed = discovery.resolve("serial1").unwrap();
        assert_eq!(listed.state(), DeviceState::Device);
        assert_eq!(listed.variant(), VariantTag::Samsung);

        let unlisted = discovery.resolve("not-plugged-in").unwrap();
        assert_eq!(unlisted.state(), DeviceState::Unknown);
        assert_eq!(unlisted.variant(), VariantTag::Default);
    }
}
