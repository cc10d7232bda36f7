//! Checkstyle configuration loading and validation.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use jsonc_parser::ParseOptions;
use jsonschema::Validator;
use serde::{Deserialize, Serialize};

use crate::CheckError;
use crate::checker::{KNOWN_CHECKS, Severity, default_props};

// Embed the schema
const SCHEMA_JSON: &str = include_str!("../schemas/config.json");
static CONFIG_SCHEMA: OnceLock<Validator> = OnceLock::new();

const BUNDLED_DEFAULT_JSON: &str = include_str!("../resources/default-checkstyle.json");

/// Parsed rule configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckstyleConfig {
    /// Severity applied to checks that do not set one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_severity: Option<Severity>,

    /// Checks to run.
    #[serde(default)]
    pub checks: Vec<CheckConfig>,

    /// Directory containing the configuration file, when loaded from disk.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// Configuration of a single check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckConfig {
    /// Check name; must be one of the known checks.
    #[serde(rename = "type")]
    pub check_type: String,

    /// Check-specific properties.
    #[serde(default = "empty_props")]
    pub props: serde_json::Value,
}

fn empty_props() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl CheckstyleConfig {
    /// Primary config filename searched for by the directory locator.
    pub const CONFIG_FILE: &'static str = "checkstyle.json";

    /// Loads configuration from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CheckError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let mut config = Self::from_json(&content)?;
        if let Some(parent) = path.parent() {
            config.base_dir = Some(parent.to_path_buf());
        }

        Ok(config)
    }

    /// Parses configuration from a JSON(C) string with schema validation.
    pub fn from_json(json: &str) -> Result<Self, CheckError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| CheckError::config(format!("Invalid JSON: {}", e)))?
            .ok_or_else(|| CheckError::config("Empty config file"))?;

        let schema = CONFIG_SCHEMA.get_or_init(|| {
            let schema_json: serde_json::Value =
                serde_json::from_str(SCHEMA_JSON).expect("Invalid embedded config schema");
            Validator::new(&schema_json).expect("Invalid config schema compilation")
        });

        if let Err(e) = schema.validate(&value) {
            return Err(CheckError::config(format!(
                "Config validation failed: {} at {}",
                e,
                e.instance_path()
            )));
        }

        let config: Self = serde_json::from_value(value)
            .map_err(|e| CheckError::config(format!("Invalid config: {}", e)))?;

        for check in &config.checks {
            if !KNOWN_CHECKS.contains(&check.check_type.as_str()) {
                return Err(CheckError::config(format!(
                    "Unknown check '{}'",
                    check.check_type
                )));
            }
        }

        Ok(config)
    }

    /// Loads the config bundled with the tool, validated against `root`.
    pub fn bundled_default(root: &Path) -> Result<Self, CheckError> {
        let mut config = Self::from_json(BUNDLED_DEFAULT_JSON)?;
        config.base_dir = Some(root.to_path_buf());
        Ok(config)
    }

    /// Returns a configuration with every known check enabled with default
    /// parameters. Used as the terminal fallback; never fails.
    pub fn all_checks_enabled() -> Self {
        Self {
            default_severity: Some(Severity::Info),
            checks: KNOWN_CHECKS
                .iter()
                .map(|name| CheckConfig {
                    check_type: (*name).to_string(),
                    props: default_props(name),
                })
                .collect(),
            base_dir: None,
        }
    }
}

/// Parsed exclude list: check name (or `"all"`) to path fragments.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ExcludeConfig {
    pub patterns: HashMap<String, Vec<String>>,
}

impl ExcludeConfig {
    /// Exclude filename expected next to the primary config.
    pub const EXCLUDE_FILE: &'static str = "checkstyle-excludes.json";

    /// Loads an exclude list from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CheckError> {
        let content = fs::read_to_string(path.as_ref())?;

        let value = jsonc_parser::parse_to_serde_value(&content, &ParseOptions::default())
            .map_err(|e| CheckError::config(format!("Invalid JSON: {}", e)))?
            .ok_or_else(|| CheckError::config("Empty exclude file"))?;

        serde_json::from_value(value)
            .map_err(|e| CheckError::config(format!("Invalid exclude config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_config_from_json() {
        let config = CheckstyleConfig::from_json(
            r#"{
                "defaultSeverity": "WARNING",
                "checks": [
                    { "type": "LineLength", "props": { "maxLength": 120 } },
                    { "type": "TrailingWhitespace" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.default_severity, Some(Severity::Warning));
        assert_eq!(config.checks.len(), 2);
        assert_eq!(config.checks[0].props["maxLength"], 120);
        assert_eq!(config.checks[1].props, empty_props());
    }

    #[test]
    fn test_config_tolerates_comments() {
        let config = CheckstyleConfig::from_json(
            r#"{
                // line length for generated code
                "checks": [{ "type": "LineLength" }]
            }"#,
        )
        .unwrap();
        assert_eq!(config.checks.len(), 1);
    }

    #[rstest]
    #[case::unknown_property(r#"{ "checkz": [] }"#, "Config validation failed")]
    #[case::type_mismatch(r#"{ "checks": { "type": "LineLength" } }"#, "Config validation failed")]
    #[case::bad_severity(r#"{ "defaultSeverity": "LOUD" }"#, "Config validation failed")]
    #[case::missing_type(r#"{ "checks": [{ "props": {} }] }"#, "Config validation failed")]
    #[case::unknown_check(r#"{ "checks": [{ "type": "NoSuchCheck" }] }"#, "Unknown check")]
    #[case::not_json(r#"not json"#, "Invalid JSON")]
    fn test_config_errors(#[case] json: &str, #[case] expected_part: &str) {
        let err = CheckstyleConfig::from_json(json).unwrap_err();
        assert!(
            err.to_string().contains(expected_part),
            "error '{}' should contain '{}'",
            err,
            expected_part
        );
    }

    #[test]
    fn test_bundled_default_is_valid() {
        let config = CheckstyleConfig::bundled_default(Path::new("/ws")).unwrap();
        assert!(!config.checks.is_empty());
        assert_eq!(config.base_dir.as_deref(), Some(Path::new("/ws")));
    }

    #[test]
    fn test_all_checks_enabled_covers_every_known_check() {
        let config = CheckstyleConfig::all_checks_enabled();
        let names: Vec<&str> = config.checks.iter().map(|c| c.check_type.as_str()).collect();
        assert_eq!(names, KNOWN_CHECKS);
    }

    #[test]
    fn test_exclude_config_from_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(ExcludeConfig::EXCLUDE_FILE);
        std::fs::write(
            &path,
            r#"{ "all": ["gen"], "LineLength": ["src/legacy"] }"#,
        )
        .unwrap();

        let excludes = ExcludeConfig::from_file(&path).unwrap();
        assert_eq!(excludes.patterns["all"], vec!["gen"]);
        assert_eq!(excludes.patterns["LineLength"], vec!["src/legacy"]);
    }

    #[test]
    fn test_exclude_config_rejects_malformed() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(ExcludeConfig::EXCLUDE_FILE);
        std::fs::write(&path, r#"{ "all": "gen" }"#).unwrap();

        assert!(ExcludeConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_from_file_missing_path_is_io_error() {
        let temp = tempfile::tempdir().unwrap();
        let err = CheckstyleConfig::from_file(temp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, crate::CheckError::Io(_)));
    }

    #[test]
    fn test_from_file_sets_base_dir() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(CheckstyleConfig::CONFIG_FILE);
        std::fs::write(&path, r#"{ "checks": [] }"#).unwrap();

        let config = CheckstyleConfig::from_file(&path).unwrap();
        assert_eq!(config.base_dir.as_deref(), Some(temp.path()));
    }
}
