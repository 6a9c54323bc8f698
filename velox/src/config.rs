use std::time::Duration;

use serde::Deserialize;

use crate::{dir::VeloxDirectory, navigator::LANDING_ROUTE};

pub const CONFIG_FILENAME: &str = "velox.toml";
pub const API_URL_ENV: &str = "VELOX_API_URL";

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Reading config file: {0}")]
    ReadingFile(std::io::Error),
    #[error("Parsing config file: {0}")]
    Parsing(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base url of the authentication service.
    pub api_url: String,
    /// Route opened once the account is created.
    pub landing_route: String,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            landing_route: LANDING_ROUTE.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Loads `velox.toml` from the data directory, falling back to defaults if it does
    /// not exist. The `VELOX_API_URL` environment variable takes precedence over the file.
    pub fn load(datadir: &VeloxDirectory) -> Result<Self, ConfigError> {
        let path = datadir.file(CONFIG_FILENAME);
        let config = match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_toml(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config file at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => return Err(ConfigError::ReadingFile(e)),
        };
        Ok(config.with_api_url_override(std::env::var(API_URL_ENV).ok()))
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_api_url_override(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.is_empty()) {
            self.api_url = url;
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let config = Config::from_toml("api_url = \"https://api.velox.chat\"").unwrap();
        assert_eq!(config.api_url, "https://api.velox.chat");
        assert_eq!(config.landing_route, "/chat");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn invalid_config_is_an_error() {
        assert!(matches!(
            Config::from_toml("request_timeout_secs = \"soon\""),
            Err(ConfigError::Parsing(_))
        ));
    }

    #[test]
    fn env_override() {
        let config = Config::default().with_api_url_override(Some("http://10.0.0.1".into()));
        assert_eq!(config.api_url, "http://10.0.0.1");

        let config = Config::default().with_api_url_override(Some(String::new()));
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn load_from_datadir() {
        let tmp = tempfile::tempdir().unwrap();
        let datadir = VeloxDirectory::new(tmp.path().to_path_buf());
        std::fs::write(
            datadir.file(CONFIG_FILENAME),
            "landing_route = \"/home\"\nrequest_timeout_secs = 5\n",
        )
        .unwrap();

        let config = Config::load(&datadir).unwrap();
        assert_eq!(config.landing_route, "/home");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }
}
