use crate::error::{EditorError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const PORT_ENV: &str = "SITE_EDITOR_PORT";
pub const DATA_FILE_ENV: &str = "SITE_EDITOR_DATA_FILE";

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub ftp: FtpSettings,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON snapshot of profiles, projects and assignments.
    pub data_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data/site-editor.json"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FtpSettings {
    pub timeout_seconds: u64,
}

impl Default for FtpSettings {
    fn default() -> Self {
        Self { timeout_seconds: 30 }
    }
}

impl FtpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.max(1))
    }
}

impl Config {
    /// Read `path` (defaults apply when the file is absent), then apply
    /// environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                EditorError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
            })?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(port) = std::env::var(PORT_ENV) {
            self.server.port = port
                .parse()
                .map_err(|_| EditorError::Config(format!("{PORT_ENV} is not a valid port: {port}")))?;
        }
        if let Ok(data_file) = std::env::var(DATA_FILE_ENV) {
            self.storage.data_file = PathBuf::from(data_file);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = Config::from_toml("[server]\nport = 8080\n\n[ftp]\ntimeout_seconds = 5\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.ftp.timeout(), Duration::from_secs(5));
        assert_eq!(config.logging.dir, PathBuf::from("logs"));
        assert_eq!(config.storage.data_file, PathBuf::from("data/site-editor.json"));
    }

    #[test]
    fn invalid_toml_is_reported() {
        assert!(matches!(Config::from_toml("[server"), Err(EditorError::Toml(_))));
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.ftp.timeout_seconds, 30);
    }
}
