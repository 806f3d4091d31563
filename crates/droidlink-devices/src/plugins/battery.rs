//! Battery stat provider.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use droidlink_core::{BatterySnapshot, Bridge, DeviceError};

/// Parses the battery service dump:
///
/// ```text
/// Current Battery Service state:
///   AC powered: false
///   USB powered: true
///   Wireless powered: false
///   level: 94
///   health: 2
///   temperature: 280
/// ```
pub struct BatteryProvider {
    qualifier: String,
    bridge: Arc<dyn Bridge>,
    snapshot: OnceCell<BatterySnapshot>,
}

impl BatteryProvider {
    pub fn new(qualifier: impl Into<String>, bridge: Arc<dyn Bridge>) -> Self {
        Self {
            qualifier: qualifier.into(),
            bridge,
            snapshot: OnceCell::new(),
        }
    }

    /// Snapshot of the battery state, fetched once per provider lifetime.
    pub fn snapshot(&self) -> Result<BatterySnapshot, DeviceError> {
        self.snapshot
            .get_or_try_init(|| {
                let dump = self.bridge.raw_dumpsys(&self.qualifier, "battery")?;
                Ok(parse(&dump))
            })
            .cloned()
    }
}

fn parse(dump: &str) -> BatterySnapshot {
    let mut snapshot = BatterySnapshot::default();
    for line in dump.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "level" => snapshot.level = value.parse().unwrap_or(0),
            "AC powered" => snapshot.ac_powered = value.eq_ignore_ascii_case("true"),
            "USB powered" => snapshot.usb_powered = value.eq_ignore_ascii_case("true"),
            "Wireless powered" => snapshot.wireless_powered = value.eq_ignore_ascii_case("true"),
            "health" => snapshot.health = health_name(value),
            "temperature" => snapshot.temperature = value.parse().ok(),
            _ => {}
        }
    }
    snapshot
}

/// The battery service reports health as a numeric constant.
fn health_name(raw: &str) -> String {
    match raw {
        "1" => "unknown",
        "2" => "good",
        "3" => "overheat",
        "4" => "dead",
        "5" => "over voltage",
        "6" => "unspecified failure",
        "7" => "cold",
        other => other,
    }
    .to_string()
}
