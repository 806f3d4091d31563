//! The device entity and its query/action surface.
//!
//! A `Device` is constructed per discovery or resolution call and holds no
//! open resources: every query issues a fresh, blocking bridge call, with
//! results cached per fetch group for the lifetime of the instance. The
//! initial discovery state snapshot is the only state the device itself
//! keeps; later queries reflect bridge reality at call time.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use droidlink_core::config;
use droidlink_core::{
    AudioSnapshot, BatterySnapshot, Bridge, BridgeAction, DeviceError, DiskSnapshot,
    MemorySnapshot, PackageInspector, PackageMetadata,
};

use crate::cache::{FetchGroup, PropertyCache};
use crate::model;
use crate::plugins::{AudioProvider, BatteryProvider, DiskProvider, MemoryProvider};
use crate::release;
use crate::state::{DeviceState, DeviceStatus};
use crate::variant::{DeviceKind, VariantBehavior};

const SUCCESS_MARKER: &str = "Success";

const KEYCODE_ENDCALL: u32 = 6;
const KEYCODE_POWER: u32 = 26;
const KEYCODE_ENTER: u32 = 66;

/// Screen orientation derived from the display-state dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Wi-Fi status and access point, as far as the device reports them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiStatus {
    pub status: String,
    pub access_point: Option<String>,
}

/// Host/port pair of a network-attached device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEndpoint {
    pub host: String,
    pub port: u16,
}

impl RemoteEndpoint {
    /// Split a `host:port` qualifier. Remote devices must always carry a
    /// valid pair, so failure here is a construction error.
    fn parse(qualifier: &str) -> Result<Self, DeviceError> {
        let (host, port) = qualifier
            .rsplit_once(':')
            .ok_or_else(|| DeviceError::BadQualifier(qualifier.to_string()))?;
        if host.is_empty() {
            return Err(DeviceError::BadQualifier(qualifier.to_string()));
        }
        let port = port
            .parse()
            .map_err(|_| DeviceError::BadQualifier(qualifier.to_string()))?;
        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

/// Construction parameters for a [`Device`].
#[derive(Debug, Clone)]
pub struct DeviceOptions {
    qualifier: String,
    state: DeviceState,
    serial: Option<String>,
    remote: bool,
    pin: Option<String>,
}

impl DeviceOptions {
    pub fn new(qualifier: impl Into<String>, state: DeviceState) -> Self {
        Self {
            qualifier: qualifier.into(),
            state,
            serial: None,
            remote: false,
            pin: None,
        }
    }

    /// Override the serial (defaults to the qualifier for local devices).
    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = Some(serial.into());
        self
    }

    /// Mark the device as network-attached; its qualifier must then parse
    /// as `host:port`.
    pub fn remote(mut self, remote: bool) -> Self {
        self.remote = remote;
        self
    }

    /// Set the unlock PIN explicitly instead of reading `DEVICE_PIN`.
    pub fn with_pin(mut self, pin: impl Into<String>) -> Self {
        self.pin = Some(pin.into());
        self
    }
}

/// A handset reachable through the bridge.
pub struct Device {
    qualifier: String,
    serial: String,
    state: DeviceState,
    remote: Option<RemoteEndpoint>,
    pin: Option<String>,
    behavior: Box<dyn VariantBehavior>,
    bridge: Arc<dyn Bridge>,
    inspector: Arc<dyn PackageInspector>,
    cache: Mutex<PropertyCache>,
    metadata_cache: Mutex<Option<(PathBuf, PackageMetadata)>>,
    battery: OnceCell<BatteryProvider>,
    memory: OnceCell<MemoryProvider>,
    disk: OnceCell<DiskProvider>,
    audio: OnceCell<AudioProvider>,
}

impl Device {
    /// Construct a device.
    ///
    /// Remote qualifiers are split into host and port immediately. For a
    /// remote device whose state is neither `unknown` nor `offline`, the
    /// hardware serial is fetched eagerly so it replaces the
    /// connection-string placeholder.
    pub fn new(
        options: DeviceOptions,
        behavior: Box<dyn VariantBehavior>,
        bridge: Arc<dyn Bridge>,
        inspector: Arc<dyn PackageInspector>,
    ) -> Result<Self, DeviceError> {
        let remote = if options.remote {
            Some(RemoteEndpoint::parse(&options.qualifier)?)
        } else {
            None
        };
        let serial = options.serial.unwrap_or_else(|| options.qualifier.clone());

        let device = Self {
            qualifier: options.qualifier,
            serial,
            state: options.state,
            remote,
            pin: options.pin,
            behavior,
            bridge,
            inspector,
            cache: Mutex::new(PropertyCache::new()),
            metadata_cache: Mutex::new(None),
            battery: OnceCell::new(),
            memory: OnceCell::new(),
            disk: OnceCell::new(),
            audio: OnceCell::new(),
        };

        if device.remote.is_some()
            && !matches!(device.state, DeviceState::Unknown | DeviceState::Offline)
        {
            let serial = device.serial_no()?;
            if !serial.is_empty() {
                return Ok(Self { serial, ..device });
            }
        }
        Ok(device)
    }

    // ========== Identity ==========

    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// State as reported at discovery time; not updated afterwards.
    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Normalized status of the discovery-time state.
    pub fn status(&self) -> DeviceStatus {
        self.state.status()
    }

    pub fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn remote_endpoint(&self) -> Option<&RemoteEndpoint> {
        self.remote.as_ref()
    }

    pub fn variant(&self) -> crate::variant::VariantTag {
        self.behavior.tag()
    }

    // ========== Property reads ==========

    /// Hardware serial number.
    pub fn serial_no(&self) -> Result<String, DeviceError> {
        self.get_prop("ro.serialno")
    }

    /// Build characteristics string (tablet, phone, ...).
    pub fn device_class(&self) -> Result<String, DeviceError> {
        self.get_prop("ro.build.characteristics")
    }

    /// Internal product/device code.
    pub fn product_device(&self) -> Result<String, DeviceError> {
        self.get_prop("ro.product.device")
    }

    /// Model name used by the manufacturer.
    pub fn manufacturer_model(&self) -> Result<String, DeviceError> {
        self.get_prop("ro.product.model")
    }

    pub fn manufacturer(&self) -> Result<String, DeviceError> {
        self.get_prop("ro.product.manufacturer")
    }

    /// Reported OS release string.
    pub fn os_version(&self) -> Result<String, DeviceError> {
        self.get_prop("ro.build.version.release")
    }

    /// Marketing name of the device, or the raw model when the pair is not
    /// on record.
    pub fn display_name(&self) -> Result<String, DeviceError> {
        Ok(model::search(
            &self.manufacturer()?,
            &self.manufacturer_model()?,
        ))
    }

    /// Device range string: the product code, suffixed with the marketing
    /// name when they differ.
    pub fn range(&self) -> Result<String, DeviceError> {
        let device = self.product_device()?;
        let name = self.display_name()?;
        if device == name {
            Ok(device)
        } else {
            Ok(format!("{device}_{name}"))
        }
    }

    /// Canonical OS release name (variant-specific for Amazon hardware).
    pub fn os_name(&self) -> Result<String, DeviceError> {
        Ok(self.behavior.os_name(&self.os_version()?))
    }

    /// Tablet or mobile, per the variant's reading of the device class.
    pub fn device_kind(&self) -> Result<DeviceKind, DeviceError> {
        Ok(self.behavior.device_kind(&self.device_class()?))
    }

    // ========== Display ==========

    /// Current screen orientation.
    pub fn orientation(&self) -> Result<Orientation, DeviceError> {
        let raw = self.dumpsys_value("SurfaceOrientation")?;
        match raw.as_deref() {
            Some("0") | Some("2") => Ok(Orientation::Portrait),
            Some("1") | Some("3") => Ok(Orientation::Landscape),
            other => Err(DeviceError::OrientationUnreadable(
                other.map(str::to_string),
            )),
        }
    }

    /// Screen resolution in pixels, `(width, height)`.
    pub fn resolution(&self) -> Result<(u32, u32), DeviceError> {
        let dump = self.bridge.raw_dumpsys(&self.qualifier, "window")?;
        for line in dump.lines() {
            if !line.contains("mUnrestrictedScreen") {
                continue;
            }
            if let Some((width, height)) = line
                .split_whitespace()
                .last()
                .and_then(|token| token.split_once('x'))
            {
                if let (Ok(width), Ok(height)) = (width.parse(), height.parse()) {
                    return Ok((width, height));
                }
            }
        }
        Err(DeviceError::UnparsableOutput {
            context: "resolution",
            output: dump,
        })
    }

    /// Physical display density.
    pub fn dpi(&self) -> Result<u32, DeviceError> {
        let output = self.run(BridgeAction::DisplayDensity)?;
        let token = output.rsplit(':').next().unwrap_or(&output).trim();
        token.parse().map_err(|_| DeviceError::UnparsableOutput {
            context: "display density",
            output: output.clone(),
        })
    }

    // ========== Package lifecycle ==========

    /// Install the archive at `apk_path` on the device.
    pub fn install(&self, apk_path: &str) -> Result<(), DeviceError> {
        if apk_path.is_empty() {
            return Err(DeviceError::EmptyArgument("apk path"));
        }
        self.expect_success(BridgeAction::Install {
            path: apk_path.to_string(),
        })
    }

    /// Uninstall a package by name.
    pub fn uninstall(&self, package: &str) -> Result<(), DeviceError> {
        if package.is_empty() {
            return Err(DeviceError::EmptyArgument("package name"));
        }
        self.expect_success(BridgeAction::Uninstall {
            package: package.to_string(),
        })
    }

    /// Block a package. Pre-5 platforms only support a destructive block;
    /// 5-and-later use the reversible hide action instead.
    pub fn block_package(&self, package: &str) -> Result<(), DeviceError> {
        let package = package.to_string();
        let action = if release::lollipop_or_later(&self.os_version()?) {
            BridgeAction::HidePackage { package }
        } else {
            BridgeAction::BlockPackage { package }
        };
        self.run(action)?;
        Ok(())
    }

    /// Package name declared by the archive at `apk_path`.
    pub fn package_name(&self, apk_path: &str) -> Result<String, DeviceError> {
        if apk_path.is_empty() {
            return Err(DeviceError::EmptyArgument("apk path"));
        }
        self.metadata(Path::new(apk_path))?
            .package_name()
            .map(str::to_string)
            .ok_or(DeviceError::MetadataNotFound {
                field: "name".to_string(),
            })
    }

    /// Version name declared by the archive at `apk_path`.
    pub fn app_version(&self, apk_path: &str) -> Result<String, DeviceError> {
        if apk_path.is_empty() {
            return Err(DeviceError::EmptyArgument("apk path"));
        }
        self.metadata(Path::new(apk_path))?
            .version_name()
            .map(str::to_string)
            .ok_or(DeviceError::MetadataNotFound {
                field: "versionName".to_string(),
            })
    }

    /// Names of the packages installed on the device.
    pub fn list_installed_packages(&self) -> Result<Vec<String>, DeviceError> {
        let output = self.run(BridgeAction::ListPackages)?;
        Ok(output
            .lines()
            .filter_map(|line| line.strip_prefix("package:"))
            .map(str::to_string)
            .collect())
    }

    // ========== Power and lock state ==========

    /// Whether the screen is currently on.
    pub fn screen_on(&self) -> Result<bool, DeviceError> {
        let screen = self.powerinfo_value("mScreenOn")?;
        let display = self.powerinfo_value("Display Power: state")?;
        Ok(screen.eq_ignore_ascii_case("true") || display.eq_ignore_ascii_case("ON"))
    }

    /// Whether the screen is on and unlocked.
    ///
    /// Unlock requires the screen plus all three lock-release indicators
    /// simultaneously; no single signal is trusted on its own.
    pub fn screen_unlocked(&self) -> Result<bool, DeviceError> {
        let wake_lock = self.powerinfo_value("mHoldingWakeLockSuspendBlocker")?;
        let display_lock = self.powerinfo_value("mHoldingDisplaySuspendBlocker")?;
        let user_activity =
            self.powerinfo_value("mUserActivityTimeoutOverrideFromWindowManager")?;

        Ok(self.screen_on()?
            && wake_lock.eq_ignore_ascii_case("true")
            && display_lock.eq_ignore_ascii_case("true")
            && user_activity == "-1")
    }

    /// Lock the device if the screen is on.
    pub fn lock(&self) -> Result<(), DeviceError> {
        if self.screen_on()? {
            self.keyevent(KEYCODE_ENDCALL)?;
        }
        Ok(())
    }

    /// Unlock the device: wake if needed, swipe if still locked, then type
    /// the configured PIN and confirm. Each step is skipped once a prior
    /// step already unlocked the screen.
    pub fn unlock(&self) -> Result<(), DeviceError> {
        let pin = self.pin.clone().or_else(config::device_pin);

        if !self.screen_on()? {
            self.keyevent(KEYCODE_POWER)?;
        }
        if !self.screen_unlocked()? {
            let gesture = self
                .behavior
                .swipe_coords(&self.os_version()?, self.resolution()?);
            self.run(BridgeAction::Swipe(gesture))?;
        }

        let Some(pin) = pin else {
            return Ok(());
        };
        if !self.screen_unlocked()? {
            self.run(BridgeAction::InputText(pin))?;
        }
        if !self.screen_unlocked()? {
            self.keyevent(KEYCODE_ENTER)?;
        }
        Ok(())
    }

    // ========== Stats ==========

    /// Battery snapshot, computed once per device instance.
    pub fn battery(&self) -> Result<BatterySnapshot, DeviceError> {
        self.battery
            .get_or_init(|| BatteryProvider::new(self.qualifier.clone(), self.bridge.clone()))
            .snapshot()
    }

    /// Battery charge level in percent.
    pub fn battery_level(&self) -> Result<u8, DeviceError> {
        Ok(self.battery()?.level)
    }

    /// Whether the device is being powered in some way.
    pub fn powered(&self) -> Result<bool, DeviceError> {
        Ok(self.battery()?.powered())
    }

    /// Memory snapshot, computed once per device instance.
    pub fn memory(&self) -> Result<MemorySnapshot, DeviceError> {
        self.memory
            .get_or_init(|| MemoryProvider::new(self.qualifier.clone(), self.bridge.clone()))
            .snapshot()
    }

    /// Disk usage snapshot, computed once per device instance.
    pub fn diskstat(&self) -> Result<DiskSnapshot, DeviceError> {
        self.disk
            .get_or_init(|| DiskProvider::new(self.qualifier.clone(), self.bridge.clone()))
            .snapshot()
    }

    /// Audio routing snapshot, computed once per device instance.
    pub fn audio(&self) -> Result<AudioSnapshot, DeviceError> {
        self.audio
            .get_or_init(|| AudioProvider::new(self.qualifier.clone(), self.bridge.clone()))
            .snapshot()
    }

    // ========== Telephony and network ==========

    /// IMEI of the device, empty when the bridge omits it.
    pub fn imei(&self) -> Result<String, DeviceError> {
        let info = self.bridge.get_phoneinfo(&self.qualifier)?;
        Ok(info.get("Device ID").cloned().unwrap_or_default())
    }

    /// Wi-Fi IP address, when an interface is configured.
    pub fn ip_address(&self) -> Result<Option<String>, DeviceError> {
        let output = self.run(BridgeAction::NetworkInterface {
            name: "wlan0".to_string(),
        })?;
        Ok(parse_interface_address(&output))
    }

    /// Wi-Fi MAC address.
    pub fn wifi_mac_address(&self) -> Result<String, DeviceError> {
        Ok(self.run(BridgeAction::WifiMacAddress)?.trim().to_string())
    }

    /// Wi-Fi enablement status and access point name.
    pub fn wifi_status(&self) -> Result<WifiStatus, DeviceError> {
        let dump = self.bridge.raw_dumpsys(&self.qualifier, "wifi")?;
        let mut status = String::new();
        let mut access_point = None;

        for line in dump.lines() {
            let trimmed = line.trim();
            if let Some(rest) = trimmed.strip_prefix("Wi-Fi is ") {
                status = rest.trim().to_string();
            } else if access_point.is_none() {
                if let Some(idx) = trimmed.find("SSID: ") {
                    let value = trimmed[idx + "SSID: ".len()..]
                        .split(',')
                        .next()
                        .unwrap_or("")
                        .trim()
                        .trim_matches('"');
                    if !value.is_empty() && value != "<unknown ssid>" {
                        access_point = Some(value.to_string());
                    }
                }
            }
        }
        Ok(WifiStatus {
            status,
            access_point,
        })
    }

    // ========== Actions ==========

    /// Capture the screen to an on-device path.
    pub fn screenshot(&self, path: &str) -> Result<(), DeviceError> {
        if path.is_empty() {
            return Err(DeviceError::EmptyArgument("screenshot path"));
        }
        self.run(BridgeAction::Screencap {
            path: path.to_string(),
        })?;
        Ok(())
    }

    /// Run the UI exerciser.
    pub fn monkey(&self, events: u32, package: Option<&str>) -> Result<String, DeviceError> {
        self.run(BridgeAction::Monkey {
            events,
            package: package.map(str::to_string),
        })
    }

    /// Start an activity-manager intent; returns its stdout.
    pub fn intent(&self, command: &str) -> Result<String, DeviceError> {
        self.run(BridgeAction::Intent {
            command: command.to_string(),
        })
    }

    /// Reboot the device.
    pub fn reboot(&self) -> Result<(), DeviceError> {
        self.run(BridgeAction::Reboot)?;
        Ok(())
    }

    /// Device uptime in seconds.
    pub fn uptime(&self) -> Result<f64, DeviceError> {
        let output = self.run(BridgeAction::Uptime)?;
        output
            .split_whitespace()
            .next()
            .and_then(|token| token.parse().ok())
            .ok_or(DeviceError::UnparsableOutput {
                context: "uptime",
                output,
            })
    }

    // ========== Connection ==========

    /// Whether the bridge currently lists this device as attached.
    pub fn is_connected(&self) -> Result<bool, DeviceError> {
        Ok(self
            .bridge
            .list()?
            .iter()
            .any(|entry| entry.qualifier == self.qualifier))
    }

    /// Connect to a network-attached device.
    pub fn connect(&self) -> Result<(), DeviceError> {
        let endpoint = self.require_remote()?;
        Ok(self.bridge.connect(&endpoint.host, endpoint.port)?)
    }

    /// Disconnect from a network-attached device. Fails before touching the
    /// bridge when the device is local.
    pub fn disconnect(&self) -> Result<(), DeviceError> {
        let endpoint = self.require_remote()?;
        Ok(self.bridge.disconnect(&endpoint.host, endpoint.port)?)
    }

    fn require_remote(&self) -> Result<&RemoteEndpoint, DeviceError> {
        self.remote
            .as_ref()
            .ok_or_else(|| DeviceError::NotRemoteDevice(self.qualifier.clone()))
    }

    // ========== Internals ==========

    fn get_prop(&self, key: &str) -> Result<String, DeviceError> {
        let value = self.cache.lock().lookup(FetchGroup::Properties, key, || {
            self.bridge.get_properties(&self.qualifier)
        })?;
        Ok(value.unwrap_or_default())
    }

    fn dumpsys_value(&self, key: &str) -> Result<Option<String>, DeviceError> {
        Ok(self.cache.lock().lookup(FetchGroup::Dumpsys, key, || {
            self.bridge.get_dumpsys(&self.qualifier)
        })?)
    }

    fn powerinfo_value(&self, key: &str) -> Result<String, DeviceError> {
        let value = self.cache.lock().lookup(FetchGroup::PowerInfo, key, || {
            self.bridge.get_powerinfo(&self.qualifier)
        })?;
        Ok(value.unwrap_or_default())
    }

    fn metadata(&self, path: &Path) -> Result<PackageMetadata, DeviceError> {
        let mut cache = self.metadata_cache.lock();
        if let Some((cached_path, metadata)) = cache.as_ref() {
            if cached_path == path {
                return Ok(metadata.clone());
            }
        }
        let metadata = self.inspector.metadata(path)?;
        *cache = Some((path.to_path_buf(), metadata.clone()));
        Ok(metadata)
    }

    fn run(&self, action: BridgeAction) -> Result<String, DeviceError> {
        Ok(self.bridge.run_action(&self.qualifier, &action)?)
    }

    fn keyevent(&self, code: u32) -> Result<(), DeviceError> {
        self.run(BridgeAction::KeyEvent(code))?;
        Ok(())
    }

    fn expect_success(&self, action: BridgeAction) -> Result<(), DeviceError> {
        let output = self.bridge.run_action(&self.qualifier, &action)?;
        if output.trim() == SUCCESS_MARKER {
            Ok(())
        } else {
            Err(DeviceError::CommandFailed {
                action: action.name().to_string(),
                output,
            })
        }
    }
}

fn parse_interface_address(output: &str) -> Option<String> {
    // "wlan0: ip 192.168.1.34 mask 255.255.255.0 flags [up broadcast]"
    if let Some(idx) = output.find(" ip ") {
        let rest = &output[idx + " ip ".len()..];
        if let Some(address) = rest.split(" mask").next() {
            if rest.contains(" mask") && !address.trim().is_empty() {
                return Some(address.trim().to_string());
            }
        }
    }
    // "inet addr:192.168.1.34  Bcast:192.168.1.255  Mask:255.255.255.0"
    if let Some(idx) = output.find("inet addr:") {
        let rest = &output[idx + "inet addr:".len()..];
        if let Some(bcast) = rest.find("Bcast") {
            return Some(rest[..bcast].trim().to_string());
        }
    }
    None
}
