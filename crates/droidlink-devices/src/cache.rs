//! Per-device property cache.
//!
//! Bridge round-trips are expensive, so query results are cached per fetch
//! group: general properties, the display-state digest, and the
//! power-manager digest are three independent groups. A group is (re)fetched
//! only when a requested key is absent from its currently cached table, so
//! within one device lifetime at most one fetch happens per group until a
//! miss. Stale data between fetches is an accepted trade-off.

use std::collections::HashMap;

use droidlink_core::BridgeError;

/// The three independently cached fetch groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchGroup {
    /// General system properties.
    Properties,
    /// Display-state dump digest.
    Dumpsys,
    /// Power-manager dump digest.
    PowerInfo,
}

impl FetchGroup {
    fn name(self) -> &'static str {
        match self {
            Self::Properties => "properties",
            Self::Dumpsys => "dumpsys",
            Self::PowerInfo => "powerinfo",
        }
    }
}

/// Lazily populated key/value cache, one slot per fetch group.
#[derive(Debug, Default)]
pub struct PropertyCache {
    properties: Option<HashMap<String, String>>,
    dumpsys: Option<HashMap<String, String>>,
    powerinfo: Option<HashMap<String, String>>,
}

impl PropertyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `key` in the group, fetching the whole group first when the
    /// key is absent from the cached table (or nothing is cached yet).
    ///
    /// Returns `None` when the key is still absent after a fresh fetch; the
    /// bridge may legitimately omit a property.
    pub fn lookup<F>(
        &mut self,
        group: FetchGroup,
        key: &str,
        fetch: F,
    ) -> Result<Option<String>, BridgeError>
    where
        F: FnOnce() -> Result<HashMap<String, String>, BridgeError>,
    {
        let slot = self.slot_mut(group);
        let miss = slot.as_ref().map_or(true, |table| !table.contains_key(key));
        if miss {
            tracing::debug!(group = group.name(), key, "cache miss, fetching group");
            *slot = Some(fetch()?);
        }
        Ok(slot.as_ref().and_then(|table| table.get(key)).cloned())
    }

    fn slot_mut(&mut self, group: FetchGroup) -> &mut Option<HashMap<String, String>> {
        match group {
            FetchGroup::Properties => &mut self.properties,
            FetchGroup::Dumpsys => &mut self.dumpsys,
            FetchGroup::PowerInfo => &mut self.powerinfo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_single_fetch_until_miss() {
        let mut cache = PropertyCache::new();
        let mut fetches = 0;

        for _ in 0..3 {
            let value = cache
                .lookup(FetchGroup::Properties, "ro.serialno", || {
                    fetches += 1;
                    Ok(fixed(&[("ro.serialno", "01498A0004005015")]))
                })
                .unwrap();
            assert_eq!(value.as_deref(), Some("01498A0004005015"));
        }
        assert_eq!(fetches, 1);
    }

    #[test]
    fn test_missing_key_refetches_group() {
        let mut cache = PropertyCache::new();
        let mut fetches = 0;

        // First lookup populates the group without the second key.
        cache
            .lookup(FetchGroup::Properties, "ro.serialno", || {
                fetches += 1;
                Ok(fixed(&[("ro.serialno", "abc")]))
            })
            .unwrap();

        // Absent key triggers a full group refetch, then resolves.
        let value = cache
            .lookup(FetchGroup::Properties, "ro.product.model", || {
                fetches += 1;
                Ok(fixed(&[("ro.serialno", "abc"), ("ro.product.model", "SM-G920V")]))
            })
            .unwrap();
        assert_eq!(value.as_deref(), Some("SM-G920V"));
        assert_eq!(fetches, 2);
    }

    #[test]
    fn test_key_absent_after_refetch_is_none() {
        let mut cache = PropertyCache::new();
        let value = cache
            .lookup(FetchGroup::Properties, "ro.not.there", || Ok(fixed(&[])))
            .unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_groups_are_independent() {
        let mut cache = PropertyCache::new();
        let mut prop_fetches = 0;
        let mut power_fetches = 0;

        cache
            .lookup(FetchGroup::Properties, "ro.serialno", || {
                prop_fetches += 1;
                Ok(fixed(&[("ro.serialno", "abc")]))
            })
            .unwrap();
        cache
            .lookup(FetchGroup::PowerInfo, "mScreenOn", || {
                power_fetches += 1;
                Ok(fixed(&[("mScreenOn", "true")]))
            })
            .unwrap();
        // A power-info fetch must not disturb the properties group.
        cache
            .lookup(FetchGroup::Properties, "ro.serialno", || {
                prop_fetches += 1;
                Ok(fixed(&[]))
            })
            .unwrap();

        assert_eq!(prop_fetches, 1);
        assert_eq!(power_fetches, 1);
    }

    #[test]
    fn test_fetch_error_propagates() {
        let mut cache = PropertyCache::new();
        let result = cache.lookup(FetchGroup::Dumpsys, "SurfaceOrientation", || {
            Err(BridgeError::DeviceOffline("abc".to_string()))
        });
        assert!(result.is_err());
    }
}
