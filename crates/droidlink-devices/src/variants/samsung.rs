//! Samsung behavior.

use crate::variant::{DeviceKind, VariantBehavior, VariantTag};

/// Samsung builds report `ro.build.characteristics` as a comma-separated
/// list (`"tablet,nosdcard"`), so classification checks each segment
/// instead of the whole string.
#[derive(Debug, Default)]
pub struct SamsungVariant;

impl VariantBehavior for SamsungVariant {
    fn tag(&self) -> VariantTag {
        VariantTag::Samsung
    }

    fn device_kind(&self, device_class: &str) -> DeviceKind {
        let is_tablet = device_class
            .split(',')
            .any(|segment| segment.trim().eq_ignore_ascii_case("tablet"));
        if is_tablet {
            DeviceKind::Tablet
        } else {
            DeviceKind::Mobile
        }
    }
}
