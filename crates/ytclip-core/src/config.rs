//! Configuration management for ytclip

use crate::error::ConfigError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    pub output: OutputConfig,
    pub temp: TempConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Path to yt-dlp binary (auto-detected if not set)
    pub yt_dlp: Option<PathBuf>,
    /// Path to FFmpeg binary (auto-detected if not set)
    pub ffmpeg: Option<PathBuf>,
    /// Path to ffplay binary (auto-detected if not set)
    pub ffplay: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory that relative output paths are resolved against
    pub default_directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TempConfig {
    /// Remove scratch and download files when a session ends
    pub cleanup: bool,
    /// Custom temp root (uses system temp if not set)
    pub directory: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            output: OutputConfig {
                default_directory: PathBuf::from("."),
            },
            temp: TempConfig {
                cleanup: true,
                directory: None,
            },
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Load from default config directory
        if let Some(path) = Self::default_path() {
            if path.exists() {
                figment = figment.merge(Toml::file(&path));
            }
        }

        // Load from specified config file
        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ConfigError::LoadError(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment, e.g. YTCLIP_PATHS__FFMPEG
        figment = figment.merge(Env::prefixed("YTCLIP_").split("__"));

        figment.extract().map_err(|e| ConfigError::LoadError(e.to_string()))
    }

    /// `<config_dir>/ytclip/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("ytclip/config.toml"))
    }

    /// Get yt-dlp path, auto-detecting if not configured
    pub fn yt_dlp_path(&self) -> Result<PathBuf, ConfigError> {
        resolve_tool(self.paths.yt_dlp.as_ref(), "yt-dlp")
    }

    /// Get FFmpeg path, auto-detecting if not configured
    pub fn ffmpeg_path(&self) -> Result<PathBuf, ConfigError> {
        resolve_tool(self.paths.ffmpeg.as_ref(), "ffmpeg")
    }

    /// Get ffplay path, auto-detecting if not configured
    pub fn ffplay_path(&self) -> Result<PathBuf, ConfigError> {
        resolve_tool(self.paths.ffplay.as_ref(), "ffplay")
    }

    /// Root for scratch directories and downloads
    pub fn temp_dir(&self) -> PathBuf {
        self.temp
            .directory
            .clone()
            .unwrap_or_else(std::env::temp_dir)
            .join("ytclip")
    }

    /// Resolve a relative output path against the default directory
    pub fn output_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.output.default_directory.join(path)
        }
    }

    /// Render as TOML, as it would appear in a config file
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }
}

fn resolve_tool(configured: Option<&PathBuf>, name: &str) -> Result<PathBuf, ConfigError> {
    match configured {
        Some(path) => Ok(path.clone()),
        None => which::which(name)
            .map_err(|_| ConfigError::InvalidValue(format!("{} not found in PATH", name))),
    }
}
