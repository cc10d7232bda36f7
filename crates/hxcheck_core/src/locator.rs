//! Nearest-config directory search.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::CheckstyleConfig;

/// Walks upward from the file's directory looking for the primary config.
///
/// Nearest wins: the first directory containing `checkstyle.json` shadows
/// any config further up the tree. The climb stops once the candidate path
/// string is shorter than the root path string, so the root itself is still
/// checked but nothing above it is.
///
/// NOTE for maintainers: the boundary is a raw path-length comparison, not a
/// true ancestor test. It behaves correctly as long as the root was produced
/// by `RootFolderResolver` for this same file; it is kept as-is because
/// existing setups may rely on the exact cut-off.
pub fn locate_config_dir(file: &Path, root: &Path) -> Option<PathBuf> {
    let root_len = root.as_os_str().len();
    let mut dir = file.parent()?.to_path_buf();

    loop {
        if dir.as_os_str().len() < root_len {
            debug!(
                "No {} between {} and {}",
                CheckstyleConfig::CONFIG_FILE,
                file.display(),
                root.display()
            );
            return None;
        }

        if dir.join(CheckstyleConfig::CONFIG_FILE).is_file() {
            return Some(dir);
        }

        match dir.parent() {
            Some(parent) => dir = parent.to_path_buf(),
            None => return None,
        }
    }
}
