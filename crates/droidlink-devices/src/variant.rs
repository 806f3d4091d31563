//! Manufacturer variant dispatch.
//!
//! A device's variant is resolved once, at discovery, from its reported
//! manufacturer string and never changes afterwards. Variants register a
//! constructor against their tag in a process-wide table; resolution of an
//! unregistered tag returns `None` and callers fall back to the default
//! behavior, never an error.

use std::collections::HashMap;
use std::sync::Once;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use droidlink_core::SwipeGesture;

use crate::release;
use crate::variants;

/// Manufacturer variant tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantTag {
    Default,
    Kindle,
    Samsung,
}

impl VariantTag {
    /// Map a reported manufacturer string to a tag.
    ///
    /// Case-insensitive exact match against the fixed set; anything
    /// unmatched (including the empty string) is `Default`.
    pub fn from_manufacturer(manufacturer: &str) -> Self {
        match manufacturer.trim().to_lowercase().as_str() {
            "amazon" => Self::Kindle,
            "samsung" => Self::Samsung,
            _ => Self::Default,
        }
    }
}

impl std::fmt::Display for VariantTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Kindle => write!(f, "kindle"),
            Self::Samsung => write!(f, "samsung"),
        }
    }
}

/// Coarse device classification derived from the build characteristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Tablet,
    Mobile,
}

/// Manufacturer-specific behavior hooks.
///
/// The default implementations carry the generic platform semantics;
/// variants override only what their hardware actually does differently.
pub trait VariantBehavior: Send + Sync {
    fn tag(&self) -> VariantTag;

    /// Canonical OS release name for this manufacturer.
    fn os_name(&self, version: &str) -> String {
        release::os_name(version).to_string()
    }

    /// Classify tablet vs mobile from the build characteristics string.
    fn device_kind(&self, device_class: &str) -> DeviceKind {
        if device_class.eq_ignore_ascii_case("tablet") {
            DeviceKind::Tablet
        } else {
            DeviceKind::Mobile
        }
    }

    /// Unlock gesture for the given OS version and screen resolution.
    ///
    /// Pre-5 platforms unlock with a horizontal swipe from the right edge;
    /// 5-and-later use a vertical swipe from the bottom. The direction
    /// differs by platform generation, so the per-branch formulas must stay
    /// intact.
    fn swipe_coords(&self, version: &str, resolution: (u32, u32)) -> SwipeGesture {
        let (x, y) = resolution;
        if release::lollipop_or_later(version) {
            SwipeGesture {
                x_from: x / 2,
                y_from: y.saturating_sub(100),
                x_to: x / 2,
                y_to: y / 6,
            }
        } else {
            SwipeGesture {
                x_from: x.saturating_sub(100),
                y_from: y / 2,
                x_to: x / 6,
                y_to: y / 2,
            }
        }
    }
}

/// Constructor registered against a variant tag.
pub type VariantConstructor = fn() -> Box<dyn VariantBehavior>;

static REGISTRY: Lazy<RwLock<HashMap<VariantTag, VariantConstructor>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

static BUILTINS: Once = Once::new();

fn ensure_builtins() {
    BUILTINS.call_once(variants::register_builtins);
}

/// Insert without the built-in guard; used by the built-in registration
/// itself to avoid re-entering the `Once`.
pub(crate) fn insert(tag: VariantTag, constructor: VariantConstructor) {
    REGISTRY.write().insert(tag, constructor);
}

/// Register a variant constructor. Registration before discovery runs is
/// enough; re-registering a tag replaces the previous constructor.
pub fn register(tag: VariantTag, constructor: VariantConstructor) {
    ensure_builtins();
    insert(tag, constructor);
}

/// Resolve the constructor for a tag, or `None` if nothing is registered.
pub fn resolve(tag: VariantTag) -> Option<VariantConstructor> {
    ensure_builtins();
    REGISTRY.read().get(&tag).copied()
}

/// Behavior for a tag, falling back to the default variant for
/// unregistered tags.
pub fn behavior_for(tag: VariantTag) -> Box<dyn VariantBehavior> {
    match resolve(tag) {
        Some(constructor) => constructor(),
        None => Box::new(variants::DefaultVariant),
    }
}
