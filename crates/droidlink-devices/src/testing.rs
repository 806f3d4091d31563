//! Test support: scripted collaborator fakes.
//!
//! [`ScriptedBridge`] plays back canned bridge responses and records every
//! call it receives, so tests can assert both results and the exact
//! round-trips issued. Not intended for production use.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use droidlink_core::{
    Bridge, BridgeAction, BridgeError, DeviceEntry, InspectorError, PackageInspector,
    PackageMetadata,
};

/// Canned per-device state served by [`ScriptedBridge`].
#[derive(Debug, Clone, Default)]
struct ScriptedDevice {
    properties: HashMap<String, String>,
    dumpsys: HashMap<String, String>,
    powerinfo: HashMap<String, String>,
    phoneinfo: HashMap<String, String>,
    service_dumps: HashMap<String, String>,
}

/// Bridge fake with builder-style scripting and call recording.
#[derive(Default)]
pub struct ScriptedBridge {
    entries: Vec<DeviceEntry>,
    remote: HashSet<String>,
    devices: HashMap<String, ScriptedDevice>,
    action_results: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
    actions: Mutex<Vec<BridgeAction>>,
}

impl ScriptedBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attached-device listing entry (and its scripted state slot).
    pub fn with_entry(mut self, qualifier: &str, raw_state: &str) -> Self {
        self.entries.push(DeviceEntry::new(qualifier, raw_state));
        self.devices.entry(qualifier.to_string()).or_default();
        self
    }

    /// Add a listing entry without any scripted state, so state queries
    /// against it fail with `DeviceNotFound`.
    pub fn with_unscripted_entry(mut self, qualifier: &str, raw_state: &str) -> Self {
        self.entries.push(DeviceEntry::new(qualifier, raw_state));
        self
    }

    /// Mark a qualifier as a valid remote address.
    pub fn with_remote(mut self, qualifier: &str) -> Self {
        self.remote.insert(qualifier.to_string());
        self
    }

    pub fn with_property(mut self, qualifier: &str, key: &str, value: &str) -> Self {
        self.device_mut(qualifier)
            .properties
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_dumpsys(mut self, qualifier: &str, key: &str, value: &str) -> Self {
        self.device_mut(qualifier)
            .dumpsys
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_powerinfo(mut self, qualifier: &str, key: &str, value: &str) -> Self {
        self.device_mut(qualifier)
            .powerinfo
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_phoneinfo(mut self, qualifier: &str, key: &str, value: &str) -> Self {
        self.device_mut(qualifier)
            .phoneinfo
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Script the raw dump of a system service.
    pub fn with_service_dump(mut self, qualifier: &str, service: &str, text: &str) -> Self {
        self.device_mut(qualifier)
            .service_dumps
            .insert(service.to_string(), text.to_string());
        self
    }

    /// Script the raw output of an action, keyed by its short name.
    pub fn with_action_result(mut self, action_name: &str, output: &str) -> Self {
        self.action_results
            .insert(action_name.to_string(), output.to_string());
        self
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Every call received so far, as `"<method> <qualifier>"` strings.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Number of recorded calls starting with `prefix`.
    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    /// Every action run so far, in order.
    pub fn actions(&self) -> Vec<BridgeAction> {
        self.actions.lock().clone()
    }

    fn device_mut(&mut self, qualifier: &str) -> &mut ScriptedDevice {
        self.devices.entry(qualifier.to_string()).or_default()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }

    fn device(&self, qualifier: &str) -> Result<&ScriptedDevice, BridgeError> {
        self.devices
            .get(qualifier)
            .ok_or_else(|| BridgeError::DeviceNotFound(qualifier.to_string()))
    }
}

impl Bridge for ScriptedBridge {
    fn list(&self) -> Result<Vec<DeviceEntry>, BridgeError> {
        self.record("list".to_string());
        Ok(self.entries.clone())
    }

    fn get_properties(&self, qualifier: &str) -> Result<HashMap<String, String>, BridgeError> {
        self.record(format!("get_properties {qualifier}"));
        Ok(self.device(qualifier)?.properties.clone())
    }

    fn get_dumpsys(&self, qualifier: &str) -> Result<HashMap<String, String>, BridgeError> {
        self.record(format!("get_dumpsys {qualifier}"));
        Ok(self.device(qualifier)?.dumpsys.clone())
    }

    fn raw_dumpsys(&self, qualifier: &str, service: &str) -> Result<String, BridgeError> {
        self.record(format!("raw_dumpsys {qualifier} {service}"));
        Ok(self
            .device(qualifier)?
            .service_dumps
            .get(service)
            .cloned()
            .unwrap_or_default())
    }

    fn get_powerinfo(&self, qualifier: &str) -> Result<HashMap<String, String>, BridgeError> {
        self.record(format!("get_powerinfo {qualifier}"));
        Ok(self.device(qualifier)?.powerinfo.clone())
    }

    fn get_phoneinfo(&self, qualifier: &str) -> Result<HashMap<String, String>, BridgeError> {
        self.record(format!("get_phoneinfo {qualifier}"));
        Ok(self.device(qualifier)?.phoneinfo.clone())
    }

    fn run_action(&self, qualifier: &str, action: &BridgeAction) -> Result<String, BridgeError> {
        self.record(format!("run_action {} {qualifier}", action.name()));
        self.actions.lock().push(action.clone());
        Ok(self
            .action_results
            .get(action.name())
            .cloned()
            .unwrap_or_default())
    }

    fn validate_remote_address(&self, qualifier: &str) -> Result<(), BridgeError> {
        self.record(format!("validate_remote_address {qualifier}"));
        if self.remote.contains(qualifier) {
            Ok(())
        } else {
            Err(BridgeError::InvalidAddress(qualifier.to_string()))
        }
    }

    fn connect(&self, host: &str, port: u16) -> Result<(), BridgeError> {
        self.record(format!("connect {host}:{port}"));
        Ok(())
    }

    fn disconnect(&self, host: &str, port: u16) -> Result<(), BridgeError> {
        self.record(format!("disconnect {host}:{port}"));
        Ok(())
    }
}

/// Package inspector fake serving canned metadata per archive path.
#[derive(Default)]
pub struct ScriptedInspector {
    metadata: HashMap<PathBuf, PackageMetadata>,
}

impl ScriptedInspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(mut self, path: &str, fields: &[(&str, &str)]) -> Self {
        let metadata = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.metadata.insert(PathBuf::from(path), metadata);
        self
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl PackageInspector for ScriptedInspector {
    fn metadata(&self, path: &Path) -> Result<PackageMetadata, InspectorError> {
        self.metadata
            .get(path)
            .cloned()
            .ok_or_else(|| InspectorError::Unreadable {
                path: path.display().to_string(),
                reason: "not scripted".to_string(),
            })
    }
}
