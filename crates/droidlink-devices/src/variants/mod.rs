//! Built-in manufacturer variants.

mod kindle;
mod samsung;

pub use kindle::KindleVariant;
pub use samsung::SamsungVariant;

use crate::variant::{self, VariantBehavior, VariantTag};

/// Baseline behavior used for every manufacturer without a specialization.
#[derive(Debug, Default)]
pub struct DefaultVariant;

impl VariantBehavior for DefaultVariant {
    fn tag(&self) -> VariantTag {
        VariantTag::Default
    }
}

/// Register the built-in variants. Runs once, before the first resolution.
pub(crate) fn register_builtins() {
    variant::insert(VariantTag::Default, || Box::new(DefaultVariant));
    variant::insert(VariantTag::Kindle, || Box::new(KindleVariant));
    variant::insert(VariantTag::Samsung, || Box::new(SamsungVariant));
}
