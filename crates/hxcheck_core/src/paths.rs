//! Path canonicalization for prefix comparison.

use std::path::Path;
use std::sync::OnceLock;

/// Cached once-per-process detection of filesystem case handling.
static PLATFORM_CASE_INSENSITIVE: OnceLock<bool> = OnceLock::new();

/// Canonicalizes absolute paths into a form suitable for prefix comparison.
///
/// Separators are normalized to `/`, redundant segments are removed, and in
/// case-insensitive mode the result is additionally lower-cased. This is a
/// purely textual transformation; it never touches the filesystem.
#[derive(Debug, Clone, Copy)]
pub struct PathNormalizer {
    case_insensitive: bool,
}

impl PathNormalizer {
    /// Creates a normalizer with the case mode of the current platform.
    ///
    /// Detection runs once per process and is cached.
    pub fn platform() -> Self {
        let case_insensitive = *PLATFORM_CASE_INSENSITIVE.get_or_init(|| cfg!(windows));
        Self { case_insensitive }
    }

    /// Creates a normalizer with an explicit case mode.
    pub fn with_case_insensitive(case_insensitive: bool) -> Self {
        Self { case_insensitive }
    }

    /// Returns whether this normalizer folds case.
    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Returns the canonical string form of `path`.
    ///
    /// Backslashes are treated as separators, `.` segments and duplicate
    /// separators are dropped, and `..` segments are resolved textually.
    pub fn normalize(&self, path: &Path) -> String {
        let raw = path.to_string_lossy().replace('\\', "/");
        let absolute = raw.starts_with('/');

        let mut parts: Vec<&str> = Vec::new();
        for segment in raw.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    parts.pop();
                }
                other => parts.push(other),
            }
        }

        let mut out = String::new();
        if absolute {
            out.push('/');
        }
        out.push_str(&parts.join("/"));

        if self.case_insensitive {
            out.to_lowercase()
        } else {
            out
        }
    }

    /// Tests whether `prefix` is a path-prefix of `path`.
    ///
    /// The match must end at a component boundary: `/ws` is a prefix of
    /// `/ws/src/Main.hx` but not of `/ws2/Main.hx`.
    pub fn is_prefix(&self, prefix: &Path, path: &Path) -> bool {
        let p = self.normalize(prefix);
        if p.is_empty() {
            return false;
        }
        let f = self.normalize(path);
        if f == p {
            return true;
        }

        let boundary = if p.ends_with('/') {
            p
        } else {
            format!("{}/", p)
        };
        f.starts_with(&boundary)
    }
}
