//! Amazon Kindle/Fire behavior.

use crate::release;
use crate::variant::{VariantBehavior, VariantTag};

/// Amazon devices report a stock Android release string but market their
/// firmware as Fire OS generations.
#[derive(Debug, Default)]
pub struct KindleVariant;

impl VariantBehavior for KindleVariant {
    fn tag(&self) -> VariantTag {
        VariantTag::Kindle
    }

    fn os_name(&self, version: &str) -> String {
        let Some(parsed) = release::parse_release(version) else {
            return "Fire OS".to_string();
        };
        // Fire OS generations track the underlying Android release.
        let generation = match (parsed.major, parsed.minor) {
            (4, 0..=3) => Some(3),
            (4, _) => Some(4),
            (5, _) => Some(5),
            (7, _) => Some(6),
            (9, _) => Some(7),
            _ => None,
        };
        match generation {
            Some(generation) => format!("Fire OS {generation}"),
            None => "Fire OS".to_string(),
        }
    }
}
