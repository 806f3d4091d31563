//! Audio stat provider.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use droidlink_core::{AudioSnapshot, Bridge, DeviceError};

/// Parses the media-stream section of the audio service dump:
///
/// ```text
/// - STREAM_MUSIC:
///    Muted: false
///    Min: 0
///    Max: 15
///    Current: 2 (speaker): 11, 4 (headset): 7
///    Devices: speaker
/// ```
pub struct AudioProvider {
    qualifier: String,
    bridge: Arc<dyn Bridge>,
    snapshot: OnceCell<AudioSnapshot>,
}

impl AudioProvider {
    pub fn new(qualifier: impl Into<String>, bridge: Arc<dyn Bridge>) -> Self {
        Self {
            qualifier: qualifier.into(),
            bridge,
            snapshot: OnceCell::new(),
        }
    }

    /// Snapshot of audio routing, fetched once per provider lifetime.
    pub fn snapshot(&self) -> Result<AudioSnapshot, DeviceError> {
        self.snapshot
            .get_or_try_init(|| {
                let dump = self.bridge.raw_dumpsys(&self.qualifier, "audio")?;
                Ok(parse(&dump))
            })
            .cloned()
    }
}

fn parse(dump: &str) -> AudioSnapshot {
    let mut snapshot = AudioSnapshot::default();
    let mut in_music_stream = false;

    for line in dump.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("- STREAM_") {
            in_music_stream = trimmed.starts_with("- STREAM_MUSIC");
            continue;
        }
        if !in_music_stream {
            continue;
        }
        if let Some(value) = trimmed.strip_prefix("Muted:") {
            snapshot.muted = value.trim().eq_ignore_ascii_case("true");
        } else if let Some(devices) = trimmed.strip_prefix("Devices:") {
            snapshot.speaker_on = devices
                .split(',')
                .any(|device| device.trim().eq_ignore_ascii_case("speaker"));
        } else if let Some(current) = trimmed.strip_prefix("Current:") {
            snapshot.volume = speaker_volume(current);
        }
    }
    snapshot
}

/// The `Current:` line lists per-route volumes; take the speaker entry.
fn speaker_volume(current: &str) -> Option<u32> {
    current.split(',').find_map(|entry| {
        let (route, volume) = entry.rsplit_once(':')?;
        if route.contains("speaker") {
            volume.trim().parse().ok()
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = "- STREAM_RING:\n   Muted: true\n   Devices: headset\n- STREAM_MUSIC:\n   Muted: false\n   Min: 0\n   Max: 15\n   Current: 2 (speaker): 11, 4 (headset): 7\n   Devices: speaker\n";

    #[test]
    fn test_parse_music_stream_only() {
        let snapshot = parse(DUMP);
        assert!(!snapshot.muted);
        assert!(snapshot.speaker_on);
        assert_eq!(snapshot.volume, Some(11));
    }

    #[test]
    fn test_parse_empty_dump() {
        let snapshot = parse("");
        assert_eq!(snapshot, AudioSnapshot::default());
    }
}
