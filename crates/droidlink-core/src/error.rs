//! Errors surfaced by the device layer.

use crate::bridge::BridgeError;
use crate::inspector::InspectorError;

/// Errors that can occur during device operations.
///
/// Every condition here propagates unrecovered to the caller; the only place
/// errors are deliberately swallowed is the manufacturer probe during
/// variant resolution, which falls back to the default variant instead.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// Resolution requested with an empty or missing qualifier.
    #[error("bad device qualifier: '{0}'")]
    BadQualifier(String),

    /// A remote-only operation was invoked on a local device.
    #[error("device {0} is not a remote device")]
    NotRemoteDevice(String),

    /// The display-status query returned no output or an unrecognized code.
    ///
    /// No output usually means no device is attached at all, so this is a
    /// hard error rather than an empty-but-valid reading.
    #[error("device orientation not returned, got: {0:?}")]
    OrientationUnreadable(Option<String>),

    /// An action's result did not match its success marker.
    #[error("{action} failed: {output}")]
    CommandFailed { action: String, output: String },

    /// A requested package metadata field is absent.
    #[error("package metadata field not found: {field}")]
    MetadataNotFound { field: String },

    /// An action was invoked with an empty required argument.
    #[error("empty argument: {0}")]
    EmptyArgument(&'static str),

    /// Bridge collaborator failure.
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// Package inspector collaborator failure.
    #[error(transparent)]
    Inspector(#[from] InspectorError),

    /// The bridge returned output this layer could not make sense of.
    #[error("unparsable bridge output for {context}: {output}")]
    UnparsableOutput { context: &'static str, output: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DeviceError::BadQualifier(String::new());
        assert_eq!(err.to_string(), "bad device qualifier: ''");

        let err = DeviceError::CommandFailed {
            action: "install".to_string(),
            output: "INSTALL_FAILED_INVALID_APK".to_string(),
        };
        assert!(err.to_string().contains("INSTALL_FAILED_INVALID_APK"));
    }

    #[test]
    fn test_bridge_error_converts() {
        fn fails() -> Result<(), DeviceError> {
            Err(BridgeError::DeviceNotFound("abc123".to_string()))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(DeviceError::Bridge(_))));
    }
}
