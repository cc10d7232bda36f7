//! LSP backend state management.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use hxcheck_core::{CheckSession, LineChecker};

/// Shared backend state.
///
/// The session is behind a `Mutex`: checks are file-triggered and the core
/// assumes they never overlap, so the lock is the explicit form of that
/// single-flight contract rather than a throughput concern.
pub(crate) struct BackendState {
    pub session: Mutex<CheckSession>,
    /// Current workspace folders, tracked here because folder-change
    /// notifications carry deltas rather than the full list.
    pub workspace_roots: Mutex<Vec<PathBuf>>,
}

impl fmt::Debug for BackendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendState")
            .field("session", &"<Mutex<CheckSession>>")
            .field("workspace_roots", &self.workspace_roots)
            .finish()
    }
}

impl BackendState {
    /// Creates a state with the built-in line checker.
    pub fn new() -> Self {
        Self {
            session: Mutex::new(CheckSession::new(Box::new(LineChecker::new()))),
            workspace_roots: Mutex::new(Vec::new()),
        }
    }
}

impl Default for BackendState {
    fn default() -> Self {
        Self::new()
    }
}

/// Type alias for shared state.
pub(crate) type SharedState = Arc<BackendState>;
