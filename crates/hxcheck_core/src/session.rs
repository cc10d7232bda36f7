//! The per-process check session.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::chain::ConfigResolutionChain;
use crate::checker::{Diagnostic, StyleChecker};
use crate::paths::PathNormalizer;
use crate::roots::RootFolderResolver;
use crate::scope::{SourcePathSet, SourceScopeFilter};
use crate::settings::CheckSettings;
use crate::state::SharedCheckState;

/// Why an invocation produced no diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No workspace or external root contains the file.
    NoRoot,
    /// The file lies outside every configured source path.
    OutOfScope,
    /// The file could not be read.
    Unreadable,
}

/// Result of one file-triggered invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    Checked(Vec<Diagnostic>),
    Skipped(SkipReason),
}

/// Holds everything that outlives a single invocation: workspace roots, the
/// current settings, the shared exclude/similarity state, the checker, and
/// the per-file diagnostics store.
///
/// One session exists per process; invocations take `&mut self`, which makes
/// the single-flight assumption explicit. Each call to [`check_file`] or
/// [`check_content`] runs the full pipeline: root resolution, scope
/// filtering, state reset, config resolution, check, publish.
///
/// [`check_file`]: CheckSession::check_file
/// [`check_content`]: CheckSession::check_content
pub struct CheckSession {
    workspace_roots: Vec<PathBuf>,
    settings: CheckSettings,
    normalizer: PathNormalizer,
    state: SharedCheckState,
    checker: Box<dyn StyleChecker>,
    diagnostics: HashMap<PathBuf, Vec<Diagnostic>>,
}

impl CheckSession {
    /// Creates a session with the platform path normalizer.
    pub fn new(checker: Box<dyn StyleChecker>) -> Self {
        Self::with_normalizer(checker, PathNormalizer::platform())
    }

    /// Creates a session with an explicit normalizer (used by tests to pin
    /// the case mode).
    pub fn with_normalizer(checker: Box<dyn StyleChecker>, normalizer: PathNormalizer) -> Self {
        Self {
            workspace_roots: Vec::new(),
            settings: CheckSettings::default(),
            normalizer,
            state: SharedCheckState::new(normalizer),
            checker,
            diagnostics: HashMap::new(),
        }
    }

    /// Replaces the workspace roots (e.g. on workspace-folder changes).
    pub fn set_workspace_roots(&mut self, roots: Vec<PathBuf>) {
        self.workspace_roots = roots;
    }

    /// Replaces the settings; takes effect on the next invocation.
    pub fn update_settings(&mut self, settings: CheckSettings) {
        self.settings = settings;
    }

    pub fn settings(&self) -> &CheckSettings {
        &self.settings
    }

    /// Checks a file, reading its content from disk.
    pub fn check_file(&mut self, file: &Path) -> CheckOutcome {
        let Some(root) = self.resolve_root(file) else {
            return CheckOutcome::Skipped(SkipReason::NoRoot);
        };
        if !self.in_scope(file, &root) {
            return CheckOutcome::Skipped(SkipReason::OutOfScope);
        }

        // Read before the reset so an unreadable file leaves shared state
        // untouched.
        let content = match fs::read_to_string(file) {
            Ok(content) => content,
            Err(e) => {
                debug!("Cannot read {}: {}", file.display(), e);
                return CheckOutcome::Skipped(SkipReason::Unreadable);
            }
        };

        self.run_check(file, &root, &content)
    }

    /// Checks a file using editor-supplied content (unsaved buffers).
    pub fn check_content(&mut self, file: &Path, content: &str) -> CheckOutcome {
        let Some(root) = self.resolve_root(file) else {
            return CheckOutcome::Skipped(SkipReason::NoRoot);
        };
        if !self.in_scope(file, &root) {
            return CheckOutcome::Skipped(SkipReason::OutOfScope);
        }

        self.run_check(file, &root, content)
    }

    /// Returns the current diagnostics for a file, if it has been checked.
    pub fn diagnostics_for(&self, file: &Path) -> Option<&[Diagnostic]> {
        self.diagnostics.get(file).map(|d| d.as_slice())
    }

    /// Drops stored diagnostics for a file (e.g. when the editor closes it).
    pub fn clear_diagnostics(&mut self, file: &Path) {
        self.diagnostics.remove(file);
    }

    fn resolve_root(&self, file: &Path) -> Option<PathBuf> {
        let resolver = RootFolderResolver::new(
            self.workspace_roots.clone(),
            self.settings.external_source_roots.clone(),
            self.normalizer,
        );
        let root = resolver.resolve(file)?;
        Some(root.to_path_buf())
    }

    fn in_scope(&self, file: &Path, root: &Path) -> bool {
        let paths = SourcePathSet::build(&self.settings);
        SourceScopeFilter::new(self.normalizer).in_scope(file, root, &paths)
    }

    fn run_check(&mut self, file: &Path, root: &Path, content: &str) -> CheckOutcome {
        self.state
            .reset_for_invocation(file, self.settings.buffer_capacity());

        let resolved = ConfigResolutionChain::new(&self.settings).resolve(file, root);
        debug!("Resolved {:?} for {}", resolved.source, file.display());

        let diagnostics = self.checker.run(&resolved, file, content, &mut self.state);

        // Full replacement: old diagnostics for this file are superseded.
        self.diagnostics
            .insert(file.to_path_buf(), diagnostics.clone());

        CheckOutcome::Checked(diagnostics)
    }
}
