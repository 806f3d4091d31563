//! Environment-variable configuration surface.

/// Names of the environment variables this layer reads.
pub mod env_vars {
    /// PIN typed during `unlock` when the lock screen is password protected.
    /// When unset, unlock falls back to swipe only.
    pub const DEVICE_PIN: &str = "DEVICE_PIN";
}

/// Read the configured device PIN, if any.
///
/// An empty value counts as unset.
pub fn device_pin() -> Option<String> {
    std::env::var(env_vars::DEVICE_PIN)
        .ok()
        .filter(|pin| !pin.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the variable is mutated from one thread only.
    #[test]
    fn test_device_pin_reads_environment() {
        std::env::remove_var(env_vars::DEVICE_PIN);
        assert_eq!(device_pin(), None);

        std::env::set_var(env_vars::DEVICE_PIN, "8492");
        assert_eq!(device_pin(), Some("8492".to_string()));

        // Empty counts as unset.
        std::env::set_var(env_vars::DEVICE_PIN, "");
        assert_eq!(device_pin(), None);

        std::env::remove_var(env_vars::DEVICE_PIN);
    }
}
