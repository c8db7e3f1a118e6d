//! TOML-based configuration persistence for the lockdown agent.
//!
//! Reads and writes `AgentConfig` to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\KioskLockdown\config.toml`
//! - Linux:    `~/.config/kiosklockdown/config.toml`
//! - macOS:    `~/Library/Application Support/KioskLockdown/config.toml`
//!
//! Every field carries a serde default, so the agent works correctly on
//! first run (before a config file exists) and when upgrading from an older
//! file that is missing newer fields.

use std::path::PathBuf;

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

/// Top-level agent configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentConfig {
    pub agent: GeneralConfig,
    pub shell: ShellConfig,
    pub monitor: MonitorConfig,
}

/// General agent behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// Schema version string – bump when breaking changes are introduced.
    #[serde(default = "default_version")]
    pub version: String,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Shell visibility settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShellConfig {
    /// Window class of the taskbar surface.
    #[serde(default = "default_shell_class")]
    pub window_class: String,
}

/// Escape-process monitor settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonitorConfig {
    /// Watcher polling interval in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Window class of the escape process to close.
    #[serde(default = "default_escape_class")]
    pub escape_window_class: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_version() -> String {
    "1.0".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_shell_class() -> String {
    "Shell_TrayWnd".to_string()
}
fn default_poll_interval_ms() -> u64 {
    1000
}
fn default_escape_class() -> String {
    "TaskManagerWindow".to_string()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            agent: GeneralConfig::default(),
            shell: ShellConfig::default(),
            monitor: MonitorConfig::default(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            window_class: default_shell_class(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            escape_window_class: default_escape_class(),
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

/// Loads `AgentConfig` from disk, returning `AgentConfig::default()` if the
/// file does not yet exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config() -> Result<AgentConfig, ConfigError> {
    let path = config_file_path()?;

    match std::fs::read_to_string(&path) {
        Ok(content) => {
            let cfg: AgentConfig = toml::from_str(&content)?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AgentConfig::default()),
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
pub fn save_config(config: &AgentConfig) -> Result<(), ConfigError> {
    let path = config_file_path()?;

    // Ensure directory exists before writing.
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

/// Resolves the platform config base directory plus the app subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("KioskLockdown"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("kiosklockdown"))
    }

    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/KioskLockdown
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("KioskLockdown")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        // Fallback for unsupported platforms.
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── AgentConfig defaults ──────────────────────────────────────────────────

    #[test]
    fn test_agent_config_default_values() {
        // Arrange / Act
        let cfg = AgentConfig::default();

        // Assert
        assert_eq!(cfg.monitor.poll_interval_ms, 1000);
        assert_eq!(cfg.monitor.escape_window_class, "TaskManagerWindow");
        assert_eq!(cfg.shell.window_class, "Shell_TrayWnd");
    }

    #[test]
    fn test_general_config_default_log_level_is_info() {
        let cfg = GeneralConfig::default();
        assert_eq!(cfg.log_level, "info");
    }

    // ── TOML round-trip ───────────────────────────────────────────────────────

    #[test]
    fn test_agent_config_serializes_and_deserializes_round_trip() {
        // Arrange
        let mut cfg = AgentConfig::default();
        cfg.monitor.poll_interval_ms = 250;
        cfg.agent.log_level = "debug".to_string();

        // Act
        let toml_str = toml::to_string_pretty(&cfg).expect("serialize");
        let restored: AgentConfig = toml::from_str(&toml_str).expect("deserialize");

        // Assert
        assert_eq!(cfg, restored);
    }

    #[test]
    fn test_deserialize_minimal_toml_uses_defaults() {
        // Arrange: minimal TOML with only required sections
        let toml_str = r#"
[agent]
[shell]
[monitor]
"#;

        // Act
        let cfg: AgentConfig = toml::from_str(toml_str).expect("deserialize minimal");

        // Assert
        assert_eq!(cfg, AgentConfig::default());
    }

    #[test]
    fn test_deserialize_partial_monitor_overrides_defaults() {
        // Arrange
        let toml_str = r#"
[agent]
[shell]
[monitor]
poll_interval_ms = 500
"#;

        // Act
        let cfg: AgentConfig = toml::from_str(toml_str).expect("deserialize partial");

        // Assert
        assert_eq!(cfg.monitor.poll_interval_ms, 500);
        // Unspecified fields keep their defaults
        assert_eq!(cfg.monitor.escape_window_class, "TaskManagerWindow");
    }

    #[test]
    fn test_deserialize_invalid_toml_returns_parse_error() {
        // Arrange
        let bad_toml = "[[[ not valid toml";

        // Act
        let result: Result<AgentConfig, toml::de::Error> = toml::from_str(bad_toml);

        // Assert
        assert!(result.is_err());
    }

    // ── Save / load through the platform config path ──────────────────────────

    #[test]
    #[cfg(any(target_os = "windows", target_os = "linux", target_os = "macos"))]
    fn test_save_config_creates_directory_and_loads_back() {
        // Arrange: redirect the platform config base to a fresh temp dir.
        let base = std::env::temp_dir().join(format!(
            "kiosk_test_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        #[cfg(target_os = "windows")]
        let var = "APPDATA";
        #[cfg(target_os = "linux")]
        let var = "XDG_CONFIG_HOME";
        #[cfg(target_os = "macos")]
        let var = "HOME";
        let previous = std::env::var_os(var);
        std::env::set_var(var, &base);

        let mut cfg = AgentConfig::default();
        cfg.monitor.poll_interval_ms = 750;
        cfg.agent.log_level = "trace".to_string();

        // Act – the config directory does not exist yet; save must create it.
        let saved = save_config(&cfg);
        let loaded = load_config();

        // Restore the environment before asserting.
        match previous {
            Some(v) => std::env::set_var(var, v),
            None => std::env::remove_var(var),
        }
        std::fs::remove_dir_all(&base).ok();

        // Assert
        saved.expect("save_config must create the directory and write");
        assert_eq!(loaded.expect("load_config"), cfg);
    }

    // ── config_dir path formation ─────────────────────────────────────────────

    #[test]
    fn test_config_file_path_ends_with_config_toml() {
        let path_result = config_file_path();
        if let Ok(path) = path_result {
            assert!(
                path.ends_with("config.toml"),
                "config file must be named config.toml, got {path:?}"
            );
        }
        // NoPlatformConfigDir (e.g. in a stripped CI env) is also acceptable.
    }
}
