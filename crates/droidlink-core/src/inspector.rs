//! Package-metadata inspector contract.
//!
//! Extraction from installable archives (AAPT or compatible) is an external
//! collaborator; the device layer only consumes the parsed field map.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Parsed metadata of an installable archive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    fields: HashMap<String, String>,
}

impl PackageMetadata {
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    /// Look up a metadata field by name.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// The archive's package name, if present.
    pub fn package_name(&self) -> Option<&str> {
        self.get("name")
    }

    /// The archive's version name, if present.
    pub fn version_name(&self) -> Option<&str> {
        self.get("versionName")
    }
}

impl FromIterator<(String, String)> for PackageMetadata {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Errors reported by the inspector collaborator.
#[derive(Debug, thiserror::Error)]
pub enum InspectorError {
    /// The archive could not be read at all.
    #[error("cannot read archive {path}: {reason}")]
    Unreadable { path: String, reason: String },

    /// The inspector tool could not be executed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Contract of the external package-metadata tool.
pub trait PackageInspector: Send + Sync {
    /// Extract the metadata field map from the archive at `path`.
    fn metadata(&self, path: &Path) -> Result<PackageMetadata, InspectorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_accessors() {
        let meta: PackageMetadata = [
            ("name".to_string(), "com.example.app".to_string()),
            ("versionName".to_string(), "2.1.0".to_string()),
        ]
        .into_iter()
        .collect();

        assert_eq!(meta.package_name(), Some("com.example.app"));
        assert_eq!(meta.version_name(), Some("2.1.0"));
        assert_eq!(meta.get("versionCode"), None);
    }
}
