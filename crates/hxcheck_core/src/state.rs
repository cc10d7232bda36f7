//! Shared state that spans check invocations.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use crate::paths::PathNormalizer;

/// Fingerprint of a previously checked file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileFingerprint {
    pub path: PathBuf,
    pub digest: String,
}

/// Bounded ring buffer of file fingerprints for cross-file similarity
/// detection. Entries survive across invocations; capacity is enforced by
/// [`SimilarityBuffer::trim`], which the per-invocation reset runs with the
/// currently configured capacity.
#[derive(Debug, Default)]
pub struct SimilarityBuffer {
    entries: VecDeque<FileFingerprint>,
}

impl SimilarityBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records a fingerprint for `path`.
    pub fn record(&mut self, path: impl Into<PathBuf>, digest: impl Into<String>) {
        self.entries.push_back(FileFingerprint {
            path: path.into(),
            digest: digest.into(),
        });
    }

    /// Returns a buffered fingerprint with the same digest belonging to a
    /// different file, if any.
    pub fn find_match(&self, digest: &str, except: &Path) -> Option<&FileFingerprint> {
        self.entries
            .iter()
            .find(|entry| entry.digest == digest && entry.path != except)
    }

    /// Evicts oldest entries until the buffer holds at most `capacity`.
    pub fn trim(&mut self, capacity: usize) {
        while self.entries.len() > capacity {
            self.entries.pop_front();
        }
    }

    /// Removes all entries attributable to `path`.
    pub fn purge_file(&mut self, path: &Path) {
        self.entries.retain(|entry| entry.path != path);
    }
}

#[derive(Debug, Clone)]
struct ExcludePattern {
    /// Normalized absolute prefix the pattern resolves to.
    prefix: String,
    /// The raw fragment, matched against file stems.
    fragment: String,
}

/// Per-invocation exclude registry, keyed by check name (`"all"` applies to
/// every check). Cleared unconditionally before each check and repopulated
/// by the checker from the resolved exclude list.
#[derive(Debug)]
pub struct ExcludeRegistry {
    normalizer: PathNormalizer,
    by_check: HashMap<String, Vec<ExcludePattern>>,
}

impl ExcludeRegistry {
    /// Key whose patterns apply to every check.
    pub const ALL: &'static str = "all";

    pub fn new(normalizer: PathNormalizer) -> Self {
        Self {
            normalizer,
            by_check: HashMap::new(),
        }
    }

    pub fn clear(&mut self) {
        self.by_check.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.by_check.is_empty()
    }

    /// Registers `fragment` as an exclude for `check`, resolved against
    /// `base` when relative.
    pub fn register(&mut self, check: &str, base: &Path, fragment: &str) {
        let joined = if Path::new(fragment).is_absolute() {
            PathBuf::from(fragment)
        } else {
            base.join(fragment)
        };

        self.by_check
            .entry(check.to_string())
            .or_default()
            .push(ExcludePattern {
                prefix: self.normalizer.normalize(&joined),
                fragment: fragment.to_string(),
            });
    }

    /// Returns whether `file` is excluded for `check`, either by a
    /// check-specific pattern or an `"all"` pattern.
    pub fn is_excluded(&self, check: &str, file: &Path) -> bool {
        self.matches(Self::ALL, file) || self.matches(check, file)
    }

    fn matches(&self, key: &str, file: &Path) -> bool {
        let Some(patterns) = self.by_check.get(key) else {
            return false;
        };

        let normalized = self.normalizer.normalize(file);
        let stem = file.file_stem().map(|s| s.to_string_lossy().into_owned());

        patterns.iter().any(|pattern| {
            normalized == pattern.prefix
                || normalized.starts_with(&format!("{}/", pattern.prefix))
                || stem.as_deref() == Some(pattern.fragment.as_str())
        })
    }
}

/// Process-wide mutable state shared by all invocations: the exclude
/// registry and the similarity ring buffer.
///
/// Mutated only by the per-invocation reset and by the checker during its
/// run; correctness relies on invocations not overlapping, which the session
/// owner enforces by requiring `&mut` access.
#[derive(Debug)]
pub struct SharedCheckState {
    pub excludes: ExcludeRegistry,
    pub similarity: SimilarityBuffer,
}

impl SharedCheckState {
    pub fn new(normalizer: PathNormalizer) -> Self {
        Self {
            excludes: ExcludeRegistry::new(normalizer),
            similarity: SimilarityBuffer::new(),
        }
    }

    /// Runs once per in-scope check, before the checker is invoked: clears
    /// the exclude registry, trims the similarity buffer to `capacity`
    /// (which may have changed since the last invocation), and purges
    /// entries for the file about to be re-checked so it cannot match
    /// against its own previous fingerprint.
    pub fn reset_for_invocation(&mut self, file: &Path, capacity: usize) {
        self.excludes.clear();
        self.similarity.trim(capacity);
        self.similarity.purge_file(file);
    }
}
