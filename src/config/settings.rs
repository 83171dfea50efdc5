//! Application settings configuration
//!
//! Defines the check options (port, timeouts, warning window, concurrency)
//! and how they are loaded from TOML.

use crate::utils::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Options for a batch of certificate checks
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CheckOptions {
    pub port: u16,
    pub timeout_secs: u64,
    pub warning_window_days: i64,
    /// Maximum number of checks in flight at once
    pub concurrency: usize,
    /// Complete the presented chain with a matching `webpki-roots` anchor
    pub use_trust_anchors: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            port: 443,
            timeout_secs: 10,
            warning_window_days: 30,
            concurrency: 8,
            use_trust_anchors: true,
        }
    }
}

impl CheckOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn policy(&self) -> PolicySettings {
        PolicySettings {
            warning_window_days: self.warning_window_days,
            ..PolicySettings::default()
        }
    }

    /// Reject values the checks cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timeout_secs".to_string(),
                message: "must be at least 1 second".to_string(),
            });
        }
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                key: "concurrency".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.warning_window_days < 0 {
            return Err(ConfigError::InvalidValue {
                key: "warning_window_days".to_string(),
                message: "must not be negative".to_string(),
            });
        }
        Ok(())
    }
}

/// Thresholds used by the policy evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicySettings {
    /// Days before expiry at which a warning is raised
    pub warning_window_days: i64,
    /// Days before expiry at which the finding becomes critical
    pub critical_window_days: i64,
    /// RSA keys below this size get a warning
    pub rsa_warning_bits: u32,
    /// RSA keys at or below this size are critical
    pub rsa_critical_bits: u32,
    /// Any key below this size is critical
    pub minimum_key_bits: u32,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            warning_window_days: 30,
            critical_window_days: 7,
            rsa_warning_bits: 2048,
            rsa_critical_bits: 1024,
            minimum_key_bits: 160,
        }
    }
}

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub check: CheckOptions,
}

impl Settings {
    /// Load settings from the default config file
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_path = Path::new("config/default.toml");
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load settings from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        Self::from_toml(&content)
    }

    /// Parse and validate settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        settings.check.validate()?;
        Ok(settings)
    }
}
