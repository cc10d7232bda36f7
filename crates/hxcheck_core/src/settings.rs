//! Editor-provided settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default capacity of the code-similarity ring buffer.
pub const DEFAULT_SIMILARITY_BUFFER_SIZE: usize = 100;

/// Settings read from the editor's configuration store.
///
/// These are re-read for every invocation; nothing here is cached between
/// checks, so a settings change takes effect on the next save or open.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckSettings {
    /// Path to an override config, absolute or relative to the resolved root.
    pub configuration_file: Option<String>,

    /// Additional in-scope path fragments, merged with the built-in list.
    pub source_folders: Vec<String>,

    /// Absolute paths recognized as roots outside the workspace.
    pub external_source_roots: Vec<PathBuf>,

    /// Capacity of the similarity ring buffer.
    pub code_similarity_buffer_size: Option<usize>,
}

impl CheckSettings {
    /// Parses settings from a JSON value, falling back to defaults when the
    /// value does not have the expected shape.
    pub fn from_value(value: serde_json::Value) -> Self {
        match serde_json::from_value(value) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring malformed settings: {}", e);
                Self::default()
            }
        }
    }

    /// Returns the configured ring-buffer capacity.
    pub fn buffer_capacity(&self) -> usize {
        self.code_similarity_buffer_size
            .unwrap_or(DEFAULT_SIMILARITY_BUFFER_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_settings_from_value() {
        let settings = CheckSettings::from_value(serde_json::json!({
            "configurationFile": "cfg/custom.json",
            "sourceFolders": ["src", "test"],
            "externalSourceRoots": ["/opt/haxe/std"],
            "codeSimilarityBufferSize": 50
        }));

        assert_eq!(settings.configuration_file.as_deref(), Some("cfg/custom.json"));
        assert_eq!(settings.source_folders, vec!["src", "test"]);
        assert_eq!(
            settings.external_source_roots,
            vec![PathBuf::from("/opt/haxe/std")]
        );
        assert_eq!(settings.buffer_capacity(), 50);
    }

    #[test]
    fn test_settings_defaults() {
        let settings = CheckSettings::default();
        assert!(settings.configuration_file.is_none());
        assert!(settings.source_folders.is_empty());
        assert!(settings.external_source_roots.is_empty());
        assert_eq!(settings.buffer_capacity(), DEFAULT_SIMILARITY_BUFFER_SIZE);
    }

    #[test]
    fn test_settings_malformed_falls_back_to_defaults() {
        let settings = CheckSettings::from_value(serde_json::json!({
            "sourceFolders": "not-a-list"
        }));
        assert_eq!(settings, CheckSettings::default());
    }

    #[test]
    fn test_settings_unknown_keys_ignored() {
        let settings = CheckSettings::from_value(serde_json::json!({
            "somethingElse": true,
            "codeSimilarityBufferSize": 7
        }));
        assert_eq!(settings.buffer_capacity(), 7);
    }
}
