//! Marketing-name registry.
//!
//! Maps a `(manufacturer, model)` pair to the consumer-facing product name
//! (`("Samsung", "SM-G920V")` → `"Galaxy S6"`). The reference dataset is
//! embedded at compile time and loaded into a lookup table at most once per
//! process; the table is read-only afterwards.

use std::collections::HashMap;
use std::sync::OnceLock;

#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

/// Reference dataset: `manufacturer,marketing_name,device_codename,model`
/// with a header row.
const DATASET: &str = include_str!("data/devices.csv");

static TABLE: OnceLock<HashMap<String, String>> = OnceLock::new();

#[cfg(test)]
static LOAD_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Look up the marketing name for a manufacturer/model pair.
///
/// Returns the model string unchanged when either argument is empty or the
/// pair is not on record. Lookups are case- and whitespace-insensitive.
pub fn search(manufacturer: &str, model: &str) -> String {
    if manufacturer.is_empty() || model.is_empty() {
        return model.to_string();
    }

    table()
        .get(&lookup_key(manufacturer, model))
        .cloned()
        .unwrap_or_else(|| model.to_string())
}

/// Lookup key: trim, spaces to underscores, lowercase, then concatenate the
/// manufacturer and model with no separator. `display_name` resolution
/// depends on this exact normalization.
pub(crate) fn lookup_key(manufacturer: &str, model: &str) -> String {
    let mut key = normalize(manufacturer);
    key.push_str(&normalize(model));
    key
}

fn normalize(field: &str) -> String {
    field.trim().replace(' ', "_").to_lowercase()
}

fn table() -> &'static HashMap<String, String> {
    TABLE.get_or_init(load)
}

fn load() -> HashMap<String, String> {
    #[cfg(test)]
    LOAD_COUNT.fetch_add(1, Ordering::SeqCst);

    let mut table = HashMap::new();
    // Skip the header row exactly once.
    for line in DATASET.lines().skip(1) {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 4 {
            continue;
        }
        let (manufacturer, marketing_name, model) = (fields[0], fields[1], fields[3]);
        if manufacturer.is_empty() || model.is_empty() {
            continue;
        }
        // Rows without a marketing name fall back to the raw model string.
        let name = if marketing_name.is_empty() {
            model
        } else {
            marketing_name
        };
        table.insert(lookup_key(manufacturer, model), name.to_string());
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_pair_resolves() {
        assert_eq!(search("Samsung", "SM-A7000"), "Galaxy A7");
        assert_eq!(search("Samsung", "SM-G920V"), "Galaxy S6");
    }

    #[test]
    fn test_lookup_is_case_and_whitespace_insensitive() {
        assert_eq!(search("samsung", "sm-a7000"), "Galaxy A7");
        assert_eq!(search("SAMSUNG", "SM-a7000"), "Galaxy A7");
        assert_eq!(search("  Samsung  ", " SM-A7000 "), "Galaxy A7");
        // Internal spaces normalize identically on both sides of the table.
        assert_eq!(search("Asus", "Nexus 7"), "Nexus 7");
    }

    #[test]
    fn test_row_without_marketing_name_echoes_model() {
        assert_eq!(search("Acer", "E330"), "E330");
    }

    #[test]
    fn test_unknown_pair_echoes_model() {
        assert_eq!(search("Some", "Model"), "Model");
        assert_eq!(search("", "SM-A7000"), "SM-A7000");
        assert_eq!(search("Samsung", ""), "");
    }

    #[test]
    fn test_dataset_loads_at_most_once() {
        search("Samsung", "SM-A7000");
        search("Acer", "E330");
        search("Sony", "D6603");
        assert_eq!(LOAD_COUNT.load(Ordering::SeqCst), 1);
    }
}
