//! Source-path scoping.

use std::path::Path;

use tracing::debug;

use crate::paths::PathNormalizer;
use crate::settings::CheckSettings;

/// Source folders the engine itself declares in scope.
pub const DEFAULT_SOURCE_FOLDERS: &[&str] = &["src", "Source"];

/// Ordered collection of source-path fragments relative to a root.
///
/// Built fresh for each invocation by appending the settings-provided list
/// to the engine's own declared folders. Duplicates are irrelevant; order is
/// preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcePathSet {
    fragments: Vec<String>,
}

impl SourcePathSet {
    /// Merges the built-in folders with the settings-provided list.
    pub fn build(settings: &CheckSettings) -> Self {
        let mut fragments: Vec<String> = DEFAULT_SOURCE_FOLDERS
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        fragments.extend(settings.source_folders.iter().cloned());
        Self { fragments }
    }

    /// A set with exactly the given fragments, no built-ins.
    pub fn from_fragments(fragments: Vec<String>) -> Self {
        Self { fragments }
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(|s| s.as_str())
    }
}

/// Decides whether a file lies under any configured source path.
///
/// Runs before config resolution: an out-of-scope file never triggers
/// config loading or shared-state mutation.
#[derive(Debug, Clone, Copy)]
pub struct SourceScopeFilter {
    normalizer: PathNormalizer,
}

impl SourceScopeFilter {
    pub fn new(normalizer: PathNormalizer) -> Self {
        Self { normalizer }
    }

    /// Returns true on the first fragment whose `root`-joined form is a
    /// prefix of `file`; false when nothing matches or the set is empty.
    pub fn in_scope(&self, file: &Path, root: &Path, paths: &SourcePathSet) -> bool {
        for fragment in paths.iter() {
            if self.normalizer.is_prefix(&root.join(fragment), file) {
                return true;
            }
        }

        debug!("{} is outside all configured source paths", file.display());
        false
    }
}
