//! # hxcheck_core
//!
//! Configuration resolution and invocation-scoping engine for hxcheck.
//!
//! Given a file-triggered event (editor save/open, or a CLI walk), this
//! crate decides which checkstyle configuration applies and whether the
//! file is in scope at all, resets the shared cross-invocation state, and
//! invokes the style checker:
//!
//! - [`PathNormalizer`]: canonical paths for prefix comparison
//! - [`RootFolderResolver`]: file path to containing root
//! - [`locate_config_dir`]: nearest-wins upward config search
//! - [`ConfigResolutionChain`]: project config, settings config, bundled
//!   default, in that order; never fails
//! - [`SourceScopeFilter`]: source-path membership, checked before any
//!   config loading
//! - [`SharedCheckState`]: exclude registry and similarity ring buffer,
//!   reset per invocation
//! - [`CheckSession`]: the per-process object tying it all together
//!
//! ## Example
//!
//! ```rust,ignore
//! use hxcheck_core::{CheckSession, LineChecker};
//!
//! let mut session = CheckSession::new(Box::new(LineChecker::new()));
//! session.set_workspace_roots(vec!["/ws".into()]);
//! let outcome = session.check_file("/ws/src/Main.hx".as_ref());
//! ```

mod chain;
mod checker;
mod config;
mod error;
mod locator;
mod paths;
mod roots;
mod scope;
mod session;
mod settings;
mod state;

pub use chain::{ConfigResolutionChain, ConfigSource, ResolvedConfig};
pub use checker::{Diagnostic, KNOWN_CHECKS, LineChecker, Severity, StyleChecker, default_props};
pub use config::{CheckConfig, CheckstyleConfig, ExcludeConfig};
pub use error::CheckError;
pub use locator::locate_config_dir;
pub use paths::PathNormalizer;
pub use roots::RootFolderResolver;
pub use scope::{DEFAULT_SOURCE_FOLDERS, SourcePathSet, SourceScopeFilter};
pub use session::{CheckOutcome, CheckSession, SkipReason};
pub use settings::{CheckSettings, DEFAULT_SIMILARITY_BUFFER_SIZE};
pub use state::{ExcludeRegistry, FileFingerprint, SharedCheckState, SimilarityBuffer};
