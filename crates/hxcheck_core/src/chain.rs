//! The three-tier configuration fallback chain.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::CheckError;
use crate::config::{CheckstyleConfig, ExcludeConfig};
use crate::locator::locate_config_dir;
use crate::settings::CheckSettings;

/// Which tier of the fallback chain produced the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Config discovered next to the checked file by the directory locator.
    ProjectConfig { folder: PathBuf },
    /// Config path supplied via settings.
    SettingsConfig { path: PathBuf },
    /// Config bundled with the tool.
    BundledDefault,
}

/// The validated configuration selected for one invocation, plus an
/// optional exclude list. Owned by the invocation and never mutated after
/// construction.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub source: ConfigSource,
    pub config: CheckstyleConfig,
    pub excludes: Option<ExcludeConfig>,
}

/// Tries project config, then settings config, then the bundled default.
///
/// Resolution never blocks a check from running: every failure falls
/// through to the next tier, and the last tier degrades to "every known
/// check enabled" rather than failing. A valid user-specified config
/// (project or settings) always shadows the bundled default.
#[derive(Debug)]
pub struct ConfigResolutionChain<'a> {
    settings: &'a CheckSettings,
}

impl<'a> ConfigResolutionChain<'a> {
    pub fn new(settings: &'a CheckSettings) -> Self {
        Self { settings }
    }

    /// Resolves the configuration for `file` under `root`.
    pub fn resolve(&self, file: &Path, root: &Path) -> ResolvedConfig {
        if let Some(resolved) = self.try_project_config(file, root) {
            return resolved;
        }
        if let Some(resolved) = self.try_settings_config(root) {
            return resolved;
        }
        Self::terminal_fallback(root, CheckstyleConfig::bundled_default(root))
    }

    fn try_project_config(&self, file: &Path, root: &Path) -> Option<ResolvedConfig> {
        let folder = locate_config_dir(file, root)?;

        let config = match CheckstyleConfig::from_file(folder.join(CheckstyleConfig::CONFIG_FILE)) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load {} in {}: {}",
                    CheckstyleConfig::CONFIG_FILE,
                    folder.display(),
                    e
                );
                return None;
            }
        };

        // A broken exclude file never takes the primary config down.
        let exclude_path = folder.join(ExcludeConfig::EXCLUDE_FILE);
        let excludes = if exclude_path.is_file() {
            match ExcludeConfig::from_file(&exclude_path) {
                Ok(excludes) => Some(excludes),
                Err(e) => {
                    warn!("Failed to load {}: {}", exclude_path.display(), e);
                    None
                }
            }
        } else {
            None
        };

        debug!("Using project config from {}", folder.display());
        Some(ResolvedConfig {
            source: ConfigSource::ProjectConfig { folder },
            config,
            excludes,
        })
    }

    fn try_settings_config(&self, root: &Path) -> Option<ResolvedConfig> {
        let raw = self
            .settings
            .configuration_file
            .as_deref()
            .filter(|s| !s.is_empty())?;

        let candidate = Path::new(raw);
        let path = if candidate.is_absolute() && candidate.is_file() {
            candidate.to_path_buf()
        } else {
            root.join(raw)
        };

        match CheckstyleConfig::from_file(&path) {
            Ok(config) => {
                debug!("Using settings config {}", path.display());
                Some(ResolvedConfig {
                    source: ConfigSource::SettingsConfig { path },
                    config,
                    excludes: None,
                })
            }
            Err(e) => {
                warn!("Failed to load settings config {}: {}", path.display(), e);
                None
            }
        }
    }

    fn terminal_fallback(
        root: &Path,
        loaded: Result<CheckstyleConfig, CheckError>,
    ) -> ResolvedConfig {
        let config = match loaded {
            Ok(config) => config,
            Err(e) => {
                info!(
                    "Bundled default config failed validation for {}: {}; enabling every known check",
                    root.display(),
                    e
                );
                CheckstyleConfig::all_checks_enabled()
            }
        };

        ResolvedConfig {
            source: ConfigSource::BundledDefault,
            config,
            excludes: None,
        }
    }
}
