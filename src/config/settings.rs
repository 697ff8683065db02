use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub limits: LimitsConfig,
    pub shell: ShellConfig,
    pub http: HttpConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_file_bytes: u64,
    pub max_delay_seconds: f64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 1024 * 1024,
            max_delay_seconds: 300.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub default_timeout_seconds: u64,
    pub max_timeout_seconds: u64,
    pub allowed_commands: Option<Vec<String>>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            default_timeout_seconds: 30,
            max_timeout_seconds: 300,
            allowed_commands: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub default_timeout_seconds: u64,
    pub max_timeout_seconds: u64,
    pub allowed_domains: Option<Vec<String>>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            default_timeout_seconds: 30,
            max_timeout_seconds: 120,
            allowed_domains: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Where file-backed stores live; falls back to the platform data
    /// directory, then to a dot directory under the working directory.
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .map(|dir| dir.join("deskpilot"))
            .unwrap_or_else(|| PathBuf::from(".deskpilot"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_env = env::var("CONFIG_ENV").unwrap_or_else(|_| "default".to_string());

        let config = Config::builder()
            .add_source(File::with_name(&format!("config/{}", config_env)).required(false))
            .add_source(Environment::with_prefix("DESKPILOT").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let settings = Settings::default();
        assert_eq!(settings.limits.max_file_bytes, 1024 * 1024);
        assert_eq!(settings.shell.default_timeout_seconds, 30);
        assert!(settings.shell.max_timeout_seconds >= settings.shell.default_timeout_seconds);
        assert_eq!(settings.logging.level, "info");
        assert!(settings.shell.allowed_commands.is_none());
    }

    #[test]
    fn test_resolve_data_dir_override() {
        let storage = StorageConfig {
            data_dir: Some(PathBuf::from("/tmp/deskpilot-test")),
        };
        assert_eq!(storage.resolve_data_dir(), PathBuf::from("/tmp/deskpilot-test"));
    }
}
