//! Memory stat provider.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use droidlink_core::{Bridge, DeviceError, MemorySnapshot};

/// Parses the `Total RAM` / `Free RAM` summary lines of the memory service
/// dump, e.g. `Total RAM: 1,917,896K (status normal)`.
pub struct MemoryProvider {
    qualifier: String,
    bridge: Arc<dyn Bridge>,
    snapshot: OnceCell<MemorySnapshot>,
}

impl MemoryProvider {
    pub fn new(qualifier: impl Into<String>, bridge: Arc<dyn Bridge>) -> Self {
        Self {
            qualifier: qualifier.into(),
            bridge,
            snapshot: OnceCell::new(),
        }
    }

    /// Snapshot of memory usage, fetched once per provider lifetime.
    pub fn snapshot(&self) -> Result<MemorySnapshot, DeviceError> {
        self.snapshot
            .get_or_try_init(|| {
                let dump = self.bridge.raw_dumpsys(&self.qualifier, "meminfo")?;
                Ok(parse(&dump))
            })
            .copied()
    }
}

fn parse(dump: &str) -> MemorySnapshot {
    let mut snapshot = MemorySnapshot::default();
    for line in dump.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("Total RAM:") {
            snapshot.total_kb = parse_kilobytes(rest);
        } else if let Some(rest) = line.strip_prefix("Free RAM:") {
            snapshot.free_kb = parse_kilobytes(rest);
        }
    }
    snapshot.used_kb = snapshot.total_kb.saturating_sub(snapshot.free_kb);
    snapshot
}

/// First token like `1,917,896K`, thousands separators and the unit suffix
/// stripped.
fn parse_kilobytes(rest: &str) -> u64 {
    let token = rest.split_whitespace().next().unwrap_or("");
    token
        .trim_end_matches(['K', 'k', 'B'])
        .replace(',', "")
        .parse()
        .unwrap_or(0)
}
