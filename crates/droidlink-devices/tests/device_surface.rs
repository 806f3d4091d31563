//! End-to-end exercise of discovery and the device surface against a
//! scripted bridge.

use std::sync::Arc;

use anyhow::Result;

use droidlink_devices::testing::{ScriptedBridge, ScriptedInspector};
use droidlink_devices::{DeviceState, DeviceStatus, Discovery, Orientation, VariantTag};

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn fleet_bridge() -> Arc<ScriptedBridge> {
    ScriptedBridge::new()
        .with_entry("01498A0004005015", "device")
        .with_property("01498A0004005015", "ro.serialno", "01498A0004005015")
        .with_property("01498A0004005015", "ro.product.manufacturer", "samsung")
        .with_property("01498A0004005015", "ro.product.model", "SM-G920V")
        .with_property("01498A0004005015", "ro.product.device", "zeroflte")
        .with_property("01498A0004005015", "ro.build.version.release", "7.0")
        .with_property("01498A0004005015", "ro.build.characteristics", "phone")
        .with_dumpsys("01498A0004005015", "SurfaceOrientation", "0")
        .with_service_dump(
            "01498A0004005015",
            "battery",
            "Current Battery Service state:\n  USB powered: true\n  level: 87\n  health: 2\n  temperature: 271\n",
        )
        .with_entry("D025A0A024R2", "unauthorized")
        .into_shared()
}

#[test]
fn discovery_builds_a_usable_fleet() -> Result<()> {
    init_tracing();
    let bridge = fleet_bridge();
    let discovery = Discovery::new(bridge, ScriptedInspector::new().into_shared());

    let devices = discovery.list_devices()?;
    assert_eq!(devices.len(), 2);

    let galaxy = &devices[0];
    assert_eq!(galaxy.variant(), VariantTag::Samsung);
    assert_eq!(galaxy.status(), DeviceStatus::Ok);
    assert_eq!(galaxy.display_name()?, "Galaxy S6");
    assert_eq!(galaxy.os_name()?, "Nougat");
    assert_eq!(galaxy.orientation()?, Orientation::Portrait);
    assert_eq!(galaxy.battery_level()?, 87);
    assert!(galaxy.powered()?);

    let unauthorized = &devices[1];
    assert_eq!(unauthorized.state(), DeviceState::Unauthorized);
    assert_eq!(unauthorized.variant(), VariantTag::Default);
    Ok(())
}

#[test]
fn resolve_then_query_round_trip() -> Result<()> {
    init_tracing();
    let bridge = fleet_bridge();
    let discovery = Discovery::new(bridge.clone(), ScriptedInspector::new().into_shared());

    let device = discovery.resolve("01498A0004005015")?;
    assert!(device.is_connected()?);
    assert_eq!(device.range()?, "zeroflte_Galaxy S6");

    // Identity queries share one property fetch per device instance.
    let before = bridge.count_calls("get_properties 01498A0004005015");
    let _ = device.manufacturer_model()?;
    let _ = device.os_version()?;
    assert_eq!(
        bridge.count_calls("get_properties 01498A0004005015"),
        before
    );
    Ok(())
}

#[test]
fn device_listing_serializes_for_reporting() -> Result<()> {
    init_tracing();
    let bridge = fleet_bridge();
    let discovery = Discovery::new(bridge, ScriptedInspector::new().into_shared());

    let report: Vec<serde_json::Value> = discovery
        .list_devices()?
        .iter()
        .map(|device| {
            serde_json::json!({
                "qualifier": device.qualifier(),
                "status": device.status().to_string(),
                "variant": device.variant().to_string(),
            })
        })
        .collect();

    let encoded = serde_json::to_string(&report)?;
    assert!(encoded.contains("\"variant\":\"samsung\""));
    assert!(encoded.contains("\"status\":\"unauthorized\""));
    Ok(())
}
