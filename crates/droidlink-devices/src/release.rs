//! OS release parsing and version-gated behavior selection.
//!
//! Devices report their OS release as a dotted string (`"4.4.2"`, `"6.0"`,
//! sometimes just `"8"`). Behavior branches compare parsed versions, never
//! raw strings, so `"10"` sorts after `"9"` rather than before it.

use semver::Version;

/// Ordered OS release name table. Both bounds of each `(major, minor)`
/// range are inclusive.
const RELEASE_NAMES: &[((u64, u64), (u64, u64), &str)] = &[
    ((1, 5), (1, 5), "Cupcake"),
    ((1, 6), (1, 6), "Donut"),
    ((2, 0), (2, 1), "Eclair"),
    ((2, 2), (2, 2), "Froyo"),
    ((2, 3), (2, 3), "Gingerbread"),
    ((3, 0), (3, 2), "Honeycomb"),
    ((4, 0), (4, 0), "Ice Cream Sandwich"),
    ((4, 1), (4, 3), "Jelly Bean"),
    ((4, 4), (4, 4), "KitKat"),
    ((5, 0), (5, 1), "Lollipop"),
    ((6, 0), (6, 0), "Marshmallow"),
    ((7, 0), (7, 1), "Nougat"),
    ((8, 0), (8, 1), "Oreo"),
];

/// Parse a reported release string leniently into a full version.
///
/// Missing minor/patch components are padded with zeros, so `"6"` parses as
/// `6.0.0`. Returns `None` for empty or non-numeric input.
pub fn parse_release(raw: &str) -> Option<Version> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut components = trimmed.split('.');
    let major = components.next()?.parse().ok()?;
    let minor = components.next().map_or(Some(0), |c| c.parse().ok())?;
    let patch = components.next().map_or(Some(0), |c| c.parse().ok())?;
    Some(Version::new(major, minor, patch))
}

/// Canonical OS release name for a reported version string.
///
/// Total over all inputs: versions outside every known range, and strings
/// that do not parse at all, resolve to `"Unknown"`.
pub fn os_name(raw: &str) -> &'static str {
    let Some(version) = parse_release(raw) else {
        return "Unknown";
    };
    let key = (version.major, version.minor);

    RELEASE_NAMES
        .iter()
        .find(|(lo, hi, _)| key >= *lo && key <= *hi)
        .map(|(_, _, name)| *name)
        .unwrap_or("Unknown")
}

/// Whether the device runs the 5.0-or-later platform generation.
///
/// Gates gesture geometry and the package-blocking strategy. Unparsable
/// versions fall into the legacy branch, matching the behavior of a device
/// that reports nothing useful.
pub fn lollipop_or_later(raw: &str) -> bool {
    parse_release(raw).is_some_and(|v| v >= Version::new(5, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pads_missing_components() {
        assert_eq!(parse_release("6"), Some(Version::new(6, 0, 0)));
        assert_eq!(parse_release("5.1"), Some(Version::new(5, 1, 0)));
        assert_eq!(parse_release("4.4.2"), Some(Version::new(4, 4, 2)));
        assert_eq!(parse_release(""), None);
        assert_eq!(parse_release("lollipop"), None);
    }

    #[test]
    fn test_os_names() {
        assert_eq!(os_name("4.4"), "KitKat");
        assert_eq!(os_name("4.4.2"), "KitKat");
        assert_eq!(os_name("5.0"), "Lollipop");
        assert_eq!(os_name("5.1.1"), "Lollipop");
        assert_eq!(os_name("7.1"), "Nougat");
        assert_eq!(os_name("8.1"), "Oreo");
    }

    #[test]
    fn test_os_name_is_total() {
        // Out-of-range and garbage inputs resolve, never error.
        assert_eq!(os_name("9.0"), "Unknown");
        assert_eq!(os_name("1.0"), "Unknown");
        assert_eq!(os_name(""), "Unknown");
        assert_eq!(os_name("not-a-version"), "Unknown");
    }

    #[test]
    fn test_generation_gate() {
        assert!(!lollipop_or_later("4.4"));
        assert!(!lollipop_or_later("4.4.4"));
        assert!(lollipop_or_later("5.0"));
        assert!(lollipop_or_later("6.0"));
        // Numeric, not lexical: "10" is later than "5.0.0".
        assert!(lollipop_or_later("10"));
        assert!(!lollipop_or_later(""));
    }
}
