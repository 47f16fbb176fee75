//! TOML-based configuration persistence for the host.
//!
//! Reads and writes [`HostConfig`] to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\CamTrig\config.toml`
//! - Linux:    `~/.config/camtrig/config.toml`
//! - macOS:    `~/Library/Application Support/CamTrig/config.toml`
//!
//! Every field carries a `#[serde(default = ...)]` helper, so the host works
//! on first run (no file yet) and keeps working when an older file is missing
//! newer fields.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

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

/// Top-level host configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HostConfig {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub response: ResponseConfig,
    #[serde(default)]
    pub wire: WireConfig,
}

/// Target device settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceConfig {
    /// Advertised local name of the board to attach to.
    #[serde(default = "default_device_name")]
    pub name: String,
    /// Interval between connection checks while waiting for the link.
    #[serde(default = "default_connect_poll_ms")]
    pub connect_poll_ms: u64,
}

/// Facet synchronization settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncConfig {
    /// Tolerance when confirming a staged float against a reported status.
    #[serde(default = "default_sync_epsilon")]
    pub epsilon: f32,
}

/// Parameter RPC response budget.
///
/// The budget is `attempts * poll_ms` in total; with the defaults a silent
/// board fails a call after five seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseConfig {
    #[serde(default = "default_response_attempts")]
    pub attempts: u32,
    #[serde(default = "default_response_poll_ms")]
    pub poll_ms: u64,
}

/// Wire-level diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct WireConfig {
    /// When set, every transmitted and received frame is hex-dumped at
    /// `trace` level.
    #[serde(default)]
    pub debug: bool,
}

impl DeviceConfig {
    /// Polling interval as a [`Duration`].
    pub fn connect_poll(&self) -> Duration {
        Duration::from_millis(self.connect_poll_ms)
    }
}

impl ResponseConfig {
    /// Total time a parameter RPC waits before timing out.
    pub fn budget(&self) -> Duration {
        Duration::from_millis(u64::from(self.attempts) * self.poll_ms)
    }
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_device_name() -> String {
    "camera-trigger-01".to_string()
}
fn default_connect_poll_ms() -> u64 {
    10
}
fn default_sync_epsilon() -> f32 {
    1e-6
}
fn default_response_attempts() -> u32 {
    500
}
fn default_response_poll_ms() -> u64 {
    10
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: default_device_name(),
            connect_poll_ms: default_connect_poll_ms(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            epsilon: default_sync_epsilon(),
        }
    }
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            attempts: default_response_attempts(),
            poll_ms: default_response_poll_ms(),
        }
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
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot
/// be determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads [`HostConfig`] from disk, returning `HostConfig::default()` if the
/// file does not yet exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config() -> Result<HostConfig, ConfigError> {
    let path = config_file_path()?;

    match std::fs::read_to_string(&path) {
        Ok(content) => {
            let cfg: HostConfig = toml::from_str(&content)?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HostConfig::default()),
        Err(e) => Err(ConfigError::Io { path, source: e }),
    }
}

/// Persists `config` to disk.
///
/// Creates the config directory and file if they do not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(config: &HostConfig) -> Result<(), ConfigError> {
    let path = config_file_path()?;

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(&path, content).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(())
}

/// Resolves the platform config base directory including the app subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("CamTrig"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("camtrig"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("CamTrig")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Defaults ──────────────────────────────────────────────────────────────

    #[test]
    fn test_host_config_default_matches_board_budget() {
        // Arrange / Act
        let cfg = HostConfig::default();

        // Assert
        assert_eq!(cfg.response.attempts, 500);
        assert_eq!(cfg.response.poll_ms, 10);
        assert_eq!(cfg.response.budget(), Duration::from_secs(5));
    }

    #[test]
    fn test_host_config_default_epsilon_and_polling() {
        let cfg = HostConfig::default();
        assert_eq!(cfg.sync.epsilon, 1e-6);
        assert_eq!(cfg.device.connect_poll(), Duration::from_millis(10));
    }

    #[test]
    fn test_host_config_default_wire_debug_is_off() {
        let cfg = HostConfig::default();
        assert!(!cfg.wire.debug);
    }

    // ── TOML round-trip ───────────────────────────────────────────────────────

    #[test]
    fn test_host_config_serializes_and_deserializes_round_trip() {
        // Arrange
        let mut cfg = HostConfig::default();
        cfg.device.name = "camera-trigger-barn".to_string();
        cfg.response.attempts = 50;
        cfg.wire.debug = true;

        // Act
        let toml_str = toml::to_string_pretty(&cfg).expect("serialize");
        let restored: HostConfig = toml::from_str(&toml_str).expect("deserialize");

        // Assert
        assert_eq!(cfg, restored);
    }

    #[test]
    fn test_deserialize_empty_toml_uses_defaults() {
        let cfg: HostConfig = toml::from_str("").expect("deserialize empty");
        assert_eq!(cfg, HostConfig::default());
    }

    #[test]
    fn test_deserialize_partial_device_section_overrides_defaults() {
        // Arrange
        let toml_str = r#"
[device]
name = "camera-trigger-shed"
"#;

        // Act
        let cfg: HostConfig = toml::from_str(toml_str).expect("deserialize partial");

        // Assert
        assert_eq!(cfg.device.name, "camera-trigger-shed");
        // Unspecified fields keep their defaults
        assert_eq!(cfg.device.connect_poll_ms, 10);
        assert_eq!(cfg.response.attempts, 500);
    }

    #[test]
    fn test_deserialize_invalid_toml_returns_parse_error() {
        let bad_toml = "[[[ not valid toml";
        let result: Result<HostConfig, toml::de::Error> = toml::from_str(bad_toml);
        assert!(result.is_err());
    }

    // ── File persistence ──────────────────────────────────────────────────────

    #[test]
    fn test_save_and_load_config_round_trip_via_temp_dir() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("camtrig_cfg_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let mut cfg = HostConfig::default();
        cfg.device.name = "camera-trigger-field".to_string();
        cfg.sync.epsilon = 1e-3;

        // Act: serialize and write manually (mirrors save_config logic)
        let content = toml::to_string_pretty(&cfg).unwrap();
        std::fs::write(&path, &content).unwrap();
        let loaded: HostConfig =
            toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        // Assert
        assert_eq!(loaded, cfg);

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_config_file_path_ends_with_config_toml() {
        if let Ok(path) = config_file_path() {
            assert!(
                path.ends_with("config.toml"),
                "config file must be named config.toml, got {path:?}"
            );
        }
        // NoPlatformConfigDir in a stripped environment is also acceptable.
    }
}
