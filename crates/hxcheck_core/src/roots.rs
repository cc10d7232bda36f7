//! Workspace root resolution.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::paths::PathNormalizer;

/// Maps a file path to the workspace or external root that contains it.
///
/// Roots may overlap; the first prefix match in enumeration order wins,
/// workspace roots before external roots. A file with no matching root is
/// out of scope and its check is skipped silently.
#[derive(Debug, Clone)]
pub struct RootFolderResolver {
    workspace_roots: Vec<PathBuf>,
    external_roots: Vec<PathBuf>,
    normalizer: PathNormalizer,
}

impl RootFolderResolver {
    /// Creates a resolver over the given workspace and external roots.
    pub fn new(
        workspace_roots: Vec<PathBuf>,
        external_roots: Vec<PathBuf>,
        normalizer: PathNormalizer,
    ) -> Self {
        Self {
            workspace_roots,
            external_roots,
            normalizer,
        }
    }

    /// Returns the first root containing `file`, or `None` if no root does.
    pub fn resolve(&self, file: &Path) -> Option<&Path> {
        for root in self.workspace_roots.iter().chain(self.external_roots.iter()) {
            if self.normalizer.is_prefix(root, file) {
                return Some(root.as_path());
            }
        }

        debug!("No root folder contains {}", file.display());
        None
    }
}
