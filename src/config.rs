use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

use crate::constants::{
    DEFAULT_ALLOWED_ORIGINS, DEFAULT_APPOINTMENTS_PATH, DEFAULT_ENVIRONMENT, DEFAULT_MOCK_PASSWORD,
    DEFAULT_MOCK_USERNAME, DEFAULT_OPENAPI_PATH, DEFAULT_PORT, DEFAULT_UPSTREAM_TIMEOUT_SECS,
};
use crate::error::{Result, SyncError};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub mock_api: MockApiConfig,
    pub docs: DocsConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub allowed_origins: Vec<String>,
    /// Reported by `/health`
    pub environment: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub mode: UpstreamMode,
    /// Base URL of the scheduling system; defaults to this service's own port
    pub base_url: Option<String>,
    pub timeout_seconds: u64,
}

/// Credentials the mock upstream accepts, and what the client sends
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MockApiConfig {
    pub username: String,
    pub password: String,
    pub appointments_path: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    pub openapi_path: String,
}

/// How the public API reaches the upstream scheduling system
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamMode {
    /// Over HTTP with Basic auth, like a real third party
    #[default]
    Http,
    /// In-process call into the emulator
    Local,
}

impl FromStr for UpstreamMode {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(UpstreamMode::Http),
            "local" => Ok(UpstreamMode::Local),
            other => Err(SyncError::Config(format!("Unknown upstream mode '{}'", other))),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            mode: UpstreamMode::default(),
            base_url: None,
            timeout_seconds: DEFAULT_UPSTREAM_TIMEOUT_SECS,
        }
    }
}

impl Default for MockApiConfig {
    fn default() -> Self {
        Self {
            username: DEFAULT_MOCK_USERNAME.to_string(),
            password: DEFAULT_MOCK_PASSWORD.to_string(),
            appointments_path: DEFAULT_APPOINTMENTS_PATH.to_string(),
        }
    }
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            openapi_path: DEFAULT_OPENAPI_PATH.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from `path` (or `config.toml`), then applies
    /// environment overrides.
    ///
    /// A missing default file yields the built-in defaults; a missing file
    /// that was asked for explicitly is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?,
            None => {
                info!("No {} found, using defaults", DEFAULT_CONFIG_PATH);
                Self::default()
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SyncError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Applies overrides from `lookup` (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|e| SyncError::Config(format!("Invalid PORT '{}': {}", port, e)))?;
        }
        if let Some(origins) = lookup("ALLOWED_ORIGINS") {
            self.server.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(env) = lookup("APP_ENV") {
            self.server.environment = env;
        }
        if let Some(mode) = lookup("UPSTREAM_MODE") {
            self.upstream.mode = mode.parse()?;
        }
        if let Some(url) = lookup("UPSTREAM_URL") {
            self.upstream.base_url = Some(url);
        }
        if let Some(username) = lookup("MOCK_API_EMAIL") {
            self.mock_api.username = username;
        }
        if let Some(password) = lookup("MOCK_API_PASSWORD") {
            self.mock_api.password = password;
        }
        if let Some(path) = lookup("APPOINTMENTS_PATH") {
            self.mock_api.appointments_path = path;
        }

        if self.server.allowed_origins.is_empty() {
            warn!("No CORS origins configured; browser requests with an Origin header will be refused");
        }
        Ok(())
    }

    /// Where the HTTP client finds the upstream scheduling system
    pub fn upstream_base_url(&self) -> String {
        match &self.upstream.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://127.0.0.1:{}", self.server.port),
        }
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream.timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(
            config.server.allowed_origins,
            vec!["http://localhost:3000", "http://localhost:3001"]
        );
        assert_eq!(config.upstream.mode, UpstreamMode::Http);
        assert_eq!(config.mock_api.username, "admin@example.com");
        assert_eq!(config.upstream_base_url(), "http://127.0.0.1:3000");
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
[server]
port = 8080

[upstream]
mode = "local"
"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, "development");
        assert_eq!(config.upstream.mode, UpstreamMode::Local);
        assert_eq!(config.upstream.timeout_seconds, 10);
        assert_eq!(config.docs.openapi_path, "docs/openapi.json");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(lookup_from(&[
                ("PORT", "4100"),
                ("ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
                ("APP_ENV", "test"),
                ("UPSTREAM_MODE", "LOCAL"),
                ("UPSTREAM_URL", "http://pms.internal:9000/"),
                ("MOCK_API_EMAIL", "ops@example.com"),
                ("MOCK_API_PASSWORD", "s3cret"),
            ]))
            .unwrap();

        assert_eq!(config.server.port, 4100);
        assert_eq!(
            config.server.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.server.environment, "test");
        assert_eq!(config.upstream.mode, UpstreamMode::Local);
        assert_eq!(config.upstream_base_url(), "http://pms.internal:9000");
        assert_eq!(config.mock_api.username, "ops@example.com");
        assert_eq!(config.mock_api.password, "s3cret");
    }

    #[test]
    fn test_invalid_port_is_a_config_error() {
        let mut config = Config::default();
        let err = config.apply_overrides(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, SyncError::Config(_)));
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        assert!("carrier-pigeon".parse::<UpstreamMode>().is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/slot_sync.toml"))).unwrap_err();
        assert!(matches!(err, SyncError::Config(_)));
    }
}
