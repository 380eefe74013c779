//! Configuration file support for glowtrack.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/glowtrack/config.toml` (lowest priority)
//! - Project-local: `.glowtrack.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use glowtrack_core::domain::{MAX_BLUR_STRENGTH, MIN_BLUR_STRENGTH};
use serde::Deserialize;
use tracing::{debug, info};

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General options.
    pub general: GeneralConfig,
    /// Redaction defaults for new captures.
    pub privacy: PrivacyConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// General configuration options.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory holding the persisted records.
    pub data_dir: Option<PathBuf>,
    /// Device descriptor recorded with captures.
    pub device: Option<String>,
}

/// Redaction configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct PrivacyConfig {
    pub blur_eyes: Option<bool>,
    pub blur_hair: Option<bool>,
    pub blur_background: Option<bool>,
    /// Blur strength (5-50).
    pub blur_strength: Option<u8>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/glowtrack/config.toml`
    /// 2. Project-local: `.glowtrack.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
        }

        config
    }

    /// Validate configuration values are within acceptable ranges.
    fn validate(&self) -> Result<(), String> {
        if let Some(s) = self.privacy.blur_strength {
            if !(MIN_BLUR_STRENGTH..=MAX_BLUR_STRENGTH).contains(&s) {
                return Err(format!(
                    "privacy.blur_strength must be {MIN_BLUR_STRENGTH}-{MAX_BLUR_STRENGTH}, got {s}"
                ));
            }
        }

        if let Some(ref f) = self.output.format {
            if f != "json" && f != "jsonl" {
                return Err(format!(
                    "output.format must be 'json' or 'jsonl', got '{f}'"
                ));
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        self.general.data_dir = other.general.data_dir.or_else(|| self.general.data_dir.take());
        self.general.device = other.general.device.or_else(|| self.general.device.take());

        self.privacy.blur_eyes = other.privacy.blur_eyes.or(self.privacy.blur_eyes);
        self.privacy.blur_hair = other.privacy.blur_hair.or(self.privacy.blur_hair);
        self.privacy.blur_background = other
            .privacy
            .blur_background
            .or(self.privacy.blur_background);
        self.privacy.blur_strength = other.privacy.blur_strength.or(self.privacy.blur_strength);

        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("glowtrack").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.glowtrack.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(".glowtrack.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
