//! Persistent reader settings.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable that overrides [`Settings::data_root`].
pub const DATA_ENV: &str = "ALEMBIC_SCENE_DATA";

/// Settings shared by the session, the playback clock and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory relative archive paths are resolved against.
    pub data_root: Option<PathBuf>,
    /// Playback speed multiplier.
    pub playback_speed: f64,
    /// Wrap playback at the end of the archive's time range.
    pub loop_playback: bool,
    /// Log the flattened name table after every successful open.
    pub dump_on_open: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_root: None,
            playback_speed: 1.0,
            loop_playback: true,
            dump_on_open: false,
        }
    }
}

impl Settings {
    /// Default settings file location.
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("alembic-scene");
            p.push("settings.json");
            p
        })
    }

    /// Load settings from the default location, falling back to defaults.
    pub fn load() -> Self {
        match Self::path() {
            Some(path) => Self::load_from(path),
            None => Self::default().with_env(),
        }
    }

    /// Load settings from `path`, falling back to defaults.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let settings = match std::fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring malformed settings");
                Self::default()
            }),
            Err(_) => {
                debug!(path = %path.display(), "no settings file, using defaults");
                Self::default()
            }
        };
        settings.with_env()
    }

    /// Apply environment overrides.
    pub fn with_env(mut self) -> Self {
        if let Some(root) = std::env::var_os(DATA_ENV) {
            if !root.is_empty() {
                self.data_root = Some(PathBuf::from(root));
            }
        }
        self
    }

    /// Write settings to `path`, creating parent directories.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Resolve an archive path; relative paths land under `data_root`.
    pub fn data_path<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        let path = path.as_ref();
        match &self.data_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}
