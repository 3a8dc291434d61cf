use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use url::Url;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub rates: RatesConfig,

    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub client: ClientConfig,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_listen_addr() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            log_format: LogFormat::Text,
        }
    }
}

/// How a source's payload is normalized before validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SourceTransform {
    /// Add a 1.0 self-rate for the base currency when the payload omits it
    #[default]
    InjectBaseRate,
    /// Pass `base` and `rates` through untouched
    Identity,
}

/// One upstream exchange-rate endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSourceConfig {
    pub name: String,
    pub url: String,
    /// Base currency the endpoint quotes against
    #[serde(default = "default_base_currency")]
    pub base: String,
    #[serde(default)]
    pub transform: SourceTransform,
}

fn default_base_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests allowed per identifier per window
    pub max_requests: u32,
    /// Window length in milliseconds
    pub window_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window_ms: 60_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatesConfig {
    /// Per-source request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sources tried in order; the first success wins
    #[serde(default = "default_rate_sources")]
    pub sources: Vec<RateSourceConfig>,

    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

fn default_rate_sources() -> Vec<RateSourceConfig> {
    vec![RateSourceConfig {
        name: "frankfurter.app".to_string(),
        url: "https://api.frankfurter.app/latest?from=USD".to_string(),
        base: default_base_currency(),
        transform: SourceTransform::InjectBaseRate,
    }]
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            sources: default_rate_sources(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Weather provider API root
    #[serde(default = "default_weather_api")]
    pub api_base_url: String,

    /// How long places and forecasts stay cached, in seconds
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_weather_api() -> String {
    "https://api.meteo.lt/v1".to_string()
}

fn default_cache_ttl() -> u64 {
    3600
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_weather_api(),
            cache_ttl_secs: default_cache_ttl(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the local key-value files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("meteofx")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of a running meteofx server
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
        }
    }
}

impl Config {
    /// Load configuration from the user config directory, creating a default
    /// file if none exists. Environment overrides are applied afterwards.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            tracing::info!("Created default config at {:?}", config_path);
            config
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns an error if validation fails with critical errors; warnings
    /// are handed back to the caller.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = match path {
            Some(p) => {
                let mut config = Self::load_from(p)?;
                config.apply_env_overrides();
                config
            }
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        Ok((config, validation))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(addr) = std::env::var("METEOFX_LISTEN_ADDR") {
            self.server.listen_addr = addr;
        }
        if let Ok(url) = std::env::var("METEOFX_API_URL") {
            self.client.api_url = url;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.server.listen_addr.parse::<SocketAddr>().is_err() {
            result.add_error(
                "server.listen_addr",
                format!("Not a socket address: {}", self.server.listen_addr),
            );
        }

        if self.rates.sources.is_empty() {
            result.add_warning(
                "rates.sources",
                "No rate sources configured - mock rates will always be served",
            );
        }
        for (i, source) in self.rates.sources.iter().enumerate() {
            self.validate_url(&source.url, &format!("rates.sources[{}].url", i), &mut result);
            if source.base.len() != 3 || !source.base.chars().all(|c| c.is_ascii_uppercase()) {
                result.add_error(
                    format!("rates.sources[{}].base", i),
                    format!("Base currency must be 3 uppercase letters, got: {}", source.base),
                );
            }
        }

        if self.rates.timeout_secs == 0 {
            result.add_error("rates.timeout_secs", "Timeout must be greater than 0");
        }

        if self.rates.rate_limit.max_requests == 0 {
            result.add_error(
                "rates.rate_limit.max_requests",
                "Rate limit must allow at least one request",
            );
        }
        if self.rates.rate_limit.window_ms == 0 {
            result.add_error("rates.rate_limit.window_ms", "Window must be greater than 0");
        }

        self.validate_url(&self.weather.api_base_url, "weather.api_base_url", &mut result);
        if self.weather.cache_ttl_secs == 0 {
            result.add_warning("weather.cache_ttl_secs", "Weather caching disabled (0 seconds)");
        }
        if self.weather.timeout_secs == 0 {
            result.add_error("weather.timeout_secs", "Timeout must be greater than 0");
        }

        self.validate_url(&self.client.api_url, "client.api_url", &mut result);

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to a file, creating parent directories
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("meteofx");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_default_rate_source() {
        let config = Config::default();
        assert_eq!(config.rates.sources.len(), 1);
        assert_eq!(config.rates.sources[0].base, "USD");
        assert_eq!(config.rates.sources[0].transform, SourceTransform::InjectBaseRate);
        assert_eq!(config.rates.timeout_secs, 10);
        assert_eq!(config.rates.rate_limit.max_requests, 100);
        assert_eq!(config.rates.rate_limit.window_ms, 60_000);
    }

    #[test]
    fn test_invalid_source_url_scheme() {
        let mut config = Config::default();
        config.rates.sources[0].url = "ftp://localhost:8080".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_invalid_listen_addr() {
        let mut config = Config::default();
        config.server.listen_addr = "localhost".to_string();
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "server.listen_addr"));
    }

    #[test]
    fn test_empty_sources_is_warning() {
        let mut config = Config::default();
        config.rates.sources.clear();
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "rates.sources"));
    }

    #[test]
    fn test_zero_rate_limit_is_error() {
        let mut config = Config::default();
        config.rates.rate_limit.max_requests = 0;
        let result = config.validate();
        assert!(!result.is_valid());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            listen_addr = "0.0.0.0:8080"
            log_format = "json"

            [[rates.sources]]
            name = "backup"
            url = "https://example.com/rates"
            transform = "identity"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.rates.sources.len(), 1);
        assert_eq!(config.rates.sources[0].base, "USD");
        assert_eq!(config.rates.sources[0].transform, SourceTransform::Identity);
        assert_eq!(config.rates.timeout_secs, 10);
        assert_eq!(config.weather.cache_ttl_secs, 3600);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.weather.cache_ttl_secs = 60;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.weather.cache_ttl_secs, 60);
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
