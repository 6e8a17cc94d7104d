// Fbswap Config Parser - TOML with Serde
// Parses configuration from TOML files

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::output::Framebuffer;

/// Poll timeout used when the config does not set one
pub const DEFAULT_POLL_TIMEOUT_MS: i32 = 100;

const MAX_POLL_TIMEOUT_MS: u64 = 10_000;

/// Configuration parser errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Root TOML table
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigToml {
    #[serde(default)]
    pub general: Option<GeneralConfig>,

    #[serde(default)]
    pub devices: Option<DevicesConfig>,

    #[serde(default)]
    pub framebuffer: Option<FramebufferConfig>,
}

/// General settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Timeout passed to the evdev poll loop
    pub poll_timeout_ms: Option<u64>,
}

/// Keyboard device selection
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DevicesConfig {
    /// Explicit device names/paths to use
    #[serde(default)]
    pub only: Vec<String>,

    /// Grab the devices exclusively while listening
    #[serde(default)]
    pub grab: bool,
}

/// Framebuffer target, either a device path or an fbN index
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FramebufferConfig {
    pub device: Option<PathBuf>,
    pub index: Option<u32>,
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Framebuffer device to switch
    pub framebuffer: PathBuf,
    /// Device name/path filter (empty = autodetect keyboards)
    pub device_filter: Vec<String>,
    /// Grab keyboard devices while listening
    pub grab: bool,
    /// Event poll timeout in milliseconds
    pub poll_timeout_ms: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            framebuffer: PathBuf::from("/dev/fb0"),
            device_filter: vec![],
            grab: false,
            poll_timeout_ms: DEFAULT_POLL_TIMEOUT_MS,
        }
    }
}

impl Config {
    /// Parse a TOML configuration file
    pub fn from_toml_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let toml_config: ConfigToml =
            toml::from_str(content).map_err(|e| ConfigError::TomlParse(e.to_string()))?;

        toml_config.to_config()
    }

    /// Default config location (~/.config/fbswap/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("fbswap").join("config.toml"))
    }

    /// Load from the default location, falling back to defaults if the file
    /// does not exist
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                log::debug!("loading config from {}", path.display());
                return Self::from_toml_path(path);
            }
        }
        Ok(Self::default())
    }
}

impl ConfigToml {
    /// Validate and resolve into a `Config`
    pub fn to_config(&self) -> Result<Config, ConfigError> {
        let mut config = Config::default();

        if let Some(general) = &self.general {
            if let Some(timeout) = general.poll_timeout_ms {
                if !(1..=MAX_POLL_TIMEOUT_MS).contains(&timeout) {
                    return Err(ConfigError::InvalidValue(format!(
                        "poll_timeout_ms must be between 1 and {}, got {}",
                        MAX_POLL_TIMEOUT_MS, timeout
                    )));
                }
                config.poll_timeout_ms = timeout as i32;
            }
        }

        if let Some(devices) = &self.devices {
            config.device_filter = devices.only.clone();
            config.grab = devices.grab;
        }

        if let Some(framebuffer) = &self.framebuffer {
            config.framebuffer = match (&framebuffer.device, framebuffer.index) {
                (Some(_), Some(_)) => {
                    return Err(ConfigError::InvalidValue(
                        "framebuffer.device and framebuffer.index are mutually exclusive"
                            .to_string(),
                    ))
                }
                (Some(device), None) => device.clone(),
                (None, Some(index)) => Framebuffer::path_for_index(index)
                    .map_err(|e| ConfigError::InvalidValue(e.to_string()))?,
                (None, None) => config.framebuffer.clone(),
            };
        }

        Ok(config)
    }
}

/// Create default config content for a new installation
pub fn default_config_content() -> &'static str {
    r#"# Fbswap configuration
# Place this file at: ~/.config/fbswap/config.toml

[framebuffer]
# Either a device path or an fbN index
device = "/dev/fb0"
# index = 0

[devices]
# Listen only to these devices (names or /dev/input paths); empty = all keyboards
only = []
# Grab the devices so no other reader sees their events
grab = false

[general]
poll_timeout_ms = 100
"#
}
