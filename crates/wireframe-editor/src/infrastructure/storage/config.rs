//! TOML-based configuration for the editor.
//!
//! Reads and writes [`EditorConfig`] to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\WireframeEditor\config.toml`
//! - Linux:    `~/.config/wireframe-editor/config.toml`
//! - macOS:    `~/Library/Application Support/WireframeEditor/config.toml`
//!
//! ```toml
//! [editor]
//! history_limit = 20
//! snap_threshold = 1.0
//! log_level = "info"
//!
//! [canvas]
//! default_aspect_ratio = "4:5"
//! default_template = "news"
//!
//! [autosave]
//! debounce_ms = 2000
//! ```
//!
//! Every field has a `#[serde(default = "...")]`, so a missing file, a missing
//! section or a missing key all fall back to the built-in values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wireframe_core::{AspectRatio, LayoutType};

use crate::application::session::SessionSettings;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level editor configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EditorConfig {
    #[serde(default)]
    pub editor: EditorSection,
    #[serde(default)]
    pub canvas: CanvasSection,
    #[serde(default)]
    pub autosave: AutosaveSection,
}

/// Interaction tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditorSection {
    /// Maximum number of undo steps.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Snap distance in percent of the canvas.
    #[serde(default = "default_snap_threshold")]
    pub snap_threshold: f64,
    #[serde(default = "default_nudge_step")]
    pub nudge_step: f64,
    /// Nudge distance with Shift held.
    #[serde(default = "default_nudge_step_large")]
    pub nudge_step_large: f64,
    #[serde(default = "default_paste_offset")]
    pub paste_offset: f64,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Defaults for new layouts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanvasSection {
    #[serde(default)]
    pub default_aspect_ratio: AspectRatio,
    #[serde(default)]
    pub default_template: LayoutType,
    #[serde(default)]
    pub snap_to_grid: bool,
    /// Grid pitch in percent.
    #[serde(default = "default_grid_size")]
    pub grid_size: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AutosaveSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Quiet period before a burst of edits is saved.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_history_limit() -> usize {
    20
}
fn default_snap_threshold() -> f64 {
    1.0
}
fn default_nudge_step() -> f64 {
    1.0
}
fn default_nudge_step_large() -> f64 {
    10.0
}
fn default_paste_offset() -> f64 {
    5.0
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_grid_size() -> f64 {
    5.0
}
fn default_true() -> bool {
    true
}
fn default_debounce_ms() -> u64 {
    2000
}

impl Default for EditorSection {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            snap_threshold: default_snap_threshold(),
            nudge_step: default_nudge_step(),
            nudge_step_large: default_nudge_step_large(),
            paste_offset: default_paste_offset(),
            log_level: default_log_level(),
        }
    }
}

impl Default for CanvasSection {
    fn default() -> Self {
        Self {
            default_aspect_ratio: AspectRatio::default(),
            default_template: LayoutType::default(),
            snap_to_grid: false,
            grid_size: default_grid_size(),
        }
    }
}

impl Default for AutosaveSection {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl EditorConfig {
    /// Runtime settings for an [`EditorSession`](crate::application::session::EditorSession).
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            history_limit: self.editor.history_limit.max(1),
            snap_threshold: self.editor.snap_threshold,
            nudge_step: self.editor.nudge_step,
            nudge_step_large: self.editor.nudge_step_large,
            paste_offset: self.editor.paste_offset,
        }
    }

    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave.debounce_ms)
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads the config from the platform location, or defaults if the file does
/// not exist yet.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config() -> Result<EditorConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads the config from an explicit path, or defaults if it does not exist.
pub fn load_config_from(path: &Path) -> Result<EditorConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(EditorConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(config: &EditorConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Resolves the platform config directory including the editor subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("WireframeEditor"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("wireframe-editor"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("WireframeEditor")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
