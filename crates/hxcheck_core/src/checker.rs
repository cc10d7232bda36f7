//! The style-checker boundary and the built-in line-level checker.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chain::ResolvedConfig;
use crate::state::SharedCheckState;

/// Every check the engine knows about. "Enable every known check" (the
/// terminal config fallback) means one [`crate::config::CheckConfig`] per
/// entry here, with [`default_props`].
pub const KNOWN_CHECKS: &[&str] = &[
    "LineLength",
    "TrailingWhitespace",
    "IndentationCharacter",
    "FileLength",
    "CodeSimilarity",
];

/// Default properties for a known check.
pub fn default_props(check: &str) -> serde_json::Value {
    match check {
        "LineLength" => serde_json::json!({ "maxLength": 160 }),
        "IndentationCharacter" => serde_json::json!({ "character": "tab" }),
        "FileLength" => serde_json::json!({ "maxLines": 2000 }),
        _ => serde_json::json!({}),
    }
}

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// One reported style issue.
///
/// Diagnostics are keyed externally by the absolute path of the originating
/// file; each publish fully replaces the previous set for that file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Name of the check that produced this issue.
    pub check: String,
    pub severity: Severity,
    pub message: String,
    /// 1-based line number.
    pub line: u32,
    /// 0-based column.
    pub column: u32,
}

/// The external checking engine.
///
/// Receives the resolved config and the in-scope file, returns diagnostics.
/// Implementations may mutate [`SharedCheckState`] (registering excludes,
/// recording similarity fingerprints); the reset step guarantees a clean
/// registry and a capacity-bounded buffer on entry.
pub trait StyleChecker: Send {
    fn run(
        &self,
        config: &ResolvedConfig,
        path: &Path,
        content: &str,
        state: &mut SharedCheckState,
    ) -> Vec<Diagnostic>;
}

/// Built-in line-level checker.
#[derive(Debug, Default)]
pub struct LineChecker;

impl LineChecker {
    pub fn new() -> Self {
        Self
    }

    /// Content fingerprint used by the `CodeSimilarity` check. Whitespace
    /// differences do not affect the digest.
    pub fn fingerprint(content: &str) -> String {
        let mut hasher = blake3::Hasher::new();
        for line in content.lines() {
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                hasher.update(trimmed.as_bytes());
                hasher.update(b"\n");
            }
        }
        hasher.finalize().to_hex().to_string()
    }

    fn prop_u64(props: &serde_json::Value, key: &str, fallback: u64) -> u64 {
        props.get(key).and_then(|v| v.as_u64()).unwrap_or(fallback)
    }

    /// Saturating conversion for line/column positions derived from
    /// configured limits, which are u64-valued props.
    fn position(value: u64) -> u32 {
        u32::try_from(value).unwrap_or(u32::MAX)
    }

    fn prop_str<'a>(props: &'a serde_json::Value, key: &str, fallback: &'a str) -> &'a str {
        props.get(key).and_then(|v| v.as_str()).unwrap_or(fallback)
    }
}

impl StyleChecker for LineChecker {
    fn run(
        &self,
        config: &ResolvedConfig,
        path: &Path,
        content: &str,
        state: &mut SharedCheckState,
    ) -> Vec<Diagnostic> {
        // Excludes resolved alongside the config land in the shared
        // registry, where all checks of this invocation consult them.
        if let Some(excludes) = &config.excludes {
            let base = config
                .config
                .base_dir
                .clone()
                .or_else(|| path.parent().map(|p| p.to_path_buf()))
                .unwrap_or_default();
            for (check, fragments) in &excludes.patterns {
                for fragment in fragments {
                    state.excludes.register(check, &base, fragment);
                }
            }
        }

        let severity = config.config.default_severity.unwrap_or(Severity::Info);
        let mut diagnostics = Vec::new();

        for check in &config.config.checks {
            if state.excludes.is_excluded(&check.check_type, path) {
                debug!("{} excluded for {}", check.check_type, path.display());
                continue;
            }

            match check.check_type.as_str() {
                "LineLength" => {
                    let max = Self::prop_u64(&check.props, "maxLength", 160);
                    for (i, line) in content.lines().enumerate() {
                        let length = line.chars().count() as u64;
                        if length > max {
                            diagnostics.push(Diagnostic {
                                check: check.check_type.clone(),
                                severity,
                                message: format!("Line is too long ({} > {})", length, max),
                                line: i as u32 + 1,
                                column: Self::position(max),
                            });
                        }
                    }
                }
                "TrailingWhitespace" => {
                    for (i, line) in content.lines().enumerate() {
                        let trimmed = line.trim_end();
                        if trimmed.len() < line.len() {
                            diagnostics.push(Diagnostic {
                                check: check.check_type.clone(),
                                severity,
                                message: "Trailing whitespace".to_string(),
                                line: i as u32 + 1,
                                column: trimmed.chars().count() as u32,
                            });
                        }
                    }
                }
                "IndentationCharacter" => {
                    let expected = Self::prop_str(&check.props, "character", "tab");
                    let offender = if expected == "tab" { ' ' } else { '\t' };
                    for (i, line) in content.lines().enumerate() {
                        let leading: Vec<char> = line
                            .chars()
                            .take_while(|c| *c == ' ' || *c == '\t')
                            .collect();
                        if let Some(col) = leading.iter().position(|c| *c == offender) {
                            diagnostics.push(Diagnostic {
                                check: check.check_type.clone(),
                                severity,
                                message: format!(
                                    "Wrong indentation character (expected {})",
                                    expected
                                ),
                                line: i as u32 + 1,
                                column: col as u32,
                            });
                        }
                    }
                }
                "FileLength" => {
                    let max = Self::prop_u64(&check.props, "maxLines", 2000);
                    let lines = content.lines().count() as u64;
                    if lines > max {
                        diagnostics.push(Diagnostic {
                            check: check.check_type.clone(),
                            severity,
                            message: format!("File is too long ({} lines > {})", lines, max),
                            line: Self::position(max).saturating_add(1),
                            column: 0,
                        });
                    }
                }
                "CodeSimilarity" => {
                    let digest = Self::fingerprint(content);
                    if let Some(entry) = state.similarity.find_match(&digest, path) {
                        diagnostics.push(Diagnostic {
                            check: check.check_type.clone(),
                            severity,
                            message: format!("Code is similar to {}", entry.path.display()),
                            line: 1,
                            column: 0,
                        });
                    }
                    state.similarity.record(path, digest);
                }
                other => {
                    // Config validation rejects unknown checks; reaching
                    // this arm means a new check name was added to
                    // KNOWN_CHECKS without an implementation.
                    debug!("Check '{}' has no implementation", other);
                }
            }
        }

        diagnostics
    }
}
