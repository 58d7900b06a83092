//! Configuration management module.

use chrono::{FixedOffset, Offset, Utc};
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend: BackendConfig,
    #[serde(default)]
    pub registration: RegistrationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Hosted auth/REST backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    pub url: String,
    /// Public (anon) API key sent with every request.
    pub anon_key: String,
    /// Per-request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Registration flow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationConfig {
    /// Offset of the registry timezone used for audit timestamps.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
    /// Where credentials files are written. Empty means the Downloads folder.
    #[serde(default)]
    pub credentials_dir: String,
}

fn default_utc_offset_hours() -> i32 {
    // Asia/Manila
    8
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Also write a daily rolling log file in the data directory.
    #[serde(default = "default_log_file")]
    pub file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> bool {
    true
}

/// Per-user application directories.
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "LibraryLink", "library-link-admin")
}

/// Directory containing the running executable.
fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl AppConfig {
    /// Get config file path (per-user config dir, else next to the executable).
    pub fn default_path() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(exe_dir)
            .join("config.toml")
    }

    /// Directory for the stored session and log files.
    pub fn data_dir() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(exe_dir)
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => ConfigLoadResult::Loaded(config),
                    Err(e) => ConfigLoadResult::Invalid(e),
                },
                Err(e) => ConfigLoadResult::Invalid(ConfigError::Parse(e)),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.backend.validate()?;
        if !(-12..=14).contains(&self.registration.utc_offset_hours) {
            return Err(ConfigError::Validation(
                "UTC offset must be between -12 and +14 hours".to_string(),
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Validation("Log level cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Save configuration to file, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl BackendConfig {
    /// Validate backend connection values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::Validation("Backend URL cannot be empty".to_string()));
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "Backend URL must start with http:// or https://".to_string(),
            ));
        }
        if self.anon_key.trim().is_empty() {
            return Err(ConfigError::Validation("API key cannot be empty".to_string()));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ConfigError::Validation(
                "Timeout must be between 1 and 300 seconds".to_string(),
            ));
        }
        Ok(())
    }

    /// Project URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.url.trim().trim_end_matches('/')
    }
}

impl RegistrationConfig {
    /// Registry timezone as a fixed offset.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix())
    }

    /// Directory credentials files are written to.
    pub fn credentials_dir(&self) -> PathBuf {
        if !self.credentials_dir.trim().is_empty() {
            return PathBuf::from(self.credentials_dir.trim());
        }
        UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(|d| d.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "https://your-project.supabase.co".to_string(),
            anon_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
            credentials_dir: String::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.backend.anon_key = "anon-key".to_string();
        config
    }

    #[test]
    fn test_default_config_requires_key() {
        let config = AppConfig::default();
        assert!(config.validate().is_err());
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_url() {
        let mut config = valid_config();
        config.backend.url = "ftp://invalid".to_string();
        assert!(config.validate().is_err());

        config.backend.url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_timeout_bounds() {
        let mut config = valid_config();

        config.backend.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.backend.timeout_secs = 301;
        assert!(config.validate().is_err());

        config.backend.timeout_secs = 30;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_offset_bounds() {
        let mut config = valid_config();
        config.registration.utc_offset_hours = 15;
        assert!(config.validate().is_err());

        config.registration.utc_offset_hours = -12;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let mut config = valid_config();
        config.backend.url = "https://abc.supabase.co/".to_string();
        assert_eq!(config.backend.base_url(), "https://abc.supabase.co");
    }

    #[test]
    fn test_registry_offset_default_is_manila() {
        let reg = RegistrationConfig::default();
        assert_eq!(reg.offset().local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn test_explicit_credentials_dir() {
        let reg = RegistrationConfig {
            credentials_dir: "/tmp/creds".to_string(),
            ..Default::default()
        };
        assert_eq!(reg.credentials_dir(), PathBuf::from("/tmp/creds"));
    }

    #[test]
    fn test_minimal_file_uses_defaults() {
        let content = r#"
            [backend]
            url = "https://abc.supabase.co"
            anon_key = "key"
        "#;
        let config: AppConfig = toml::from_str(content).unwrap();
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.registration.utc_offset_hours, 8);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("lla-config-test-{}", std::process::id()));
        let path = dir.join("nested").join("config.toml");
        let config = valid_config();
        config.save(&path).unwrap();

        match AppConfig::try_load(&path) {
            ConfigLoadResult::Loaded(loaded) => assert_eq!(loaded.backend.anon_key, "anon-key"),
            other => panic!("unexpected load result: {other:?}"),
        }

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("lla-definitely-missing").join("config.toml");
        assert!(matches!(AppConfig::try_load(&path), ConfigLoadResult::Missing));
    }
}
