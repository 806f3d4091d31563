//! Disk stat provider.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use droidlink_core::{Bridge, BridgeAction, DeviceError, DiskSnapshot, DiskUsage};

/// Parses kilobyte-block filesystem usage output:
///
/// ```text
/// Filesystem     1K-blocks    Used Available Use% Mounted on
/// /dev/block/dm-0  2064208 1562096    502112  76% /system
/// /dev/block/dm-1 25819372 8125184  17694188  32% /data
/// ```
pub struct DiskProvider {
    qualifier: String,
    bridge: Arc<dyn Bridge>,
    snapshot: OnceCell<DiskSnapshot>,
}

impl DiskProvider {
    pub fn new(qualifier: impl Into<String>, bridge: Arc<dyn Bridge>) -> Self {
        Self {
            qualifier: qualifier.into(),
            bridge,
            snapshot: OnceCell::new(),
        }
    }

    /// Snapshot of filesystem usage, fetched once per provider lifetime.
    pub fn snapshot(&self) -> Result<DiskSnapshot, DeviceError> {
        self.snapshot
            .get_or_try_init(|| {
                let output = self
                    .bridge
                    .run_action(&self.qualifier, &BridgeAction::DiskFree)?;
                Ok(parse(&output))
            })
            .cloned()
    }
}

fn parse(output: &str) -> DiskSnapshot {
    let mounts = output
        .lines()
        .skip(1) // header
        .filter_map(parse_row)
        .collect();
    DiskSnapshot { mounts }
}

fn parse_row(line: &str) -> Option<DiskUsage> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 6 {
        return None;
    }
    Some(DiskUsage {
        filesystem: fields[0].to_string(),
        size_kb: fields[1].parse().ok()?,
        used_kb: fields[2].parse().ok()?,
        available_kb: fields[3].parse().ok()?,
        mounted_on: fields[5].to_string(),
    })
}
