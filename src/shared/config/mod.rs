//! Application configuration module
//!
//! Configuration is layered. Built-in defaults come first, then an optional
//! TOML file named by `BEANS_CONFIG`, then `.env`, then the process
//! environment. `AppConfig::builder()` skips the file and environment
//! layers, which is what tests use.
//!
//! ```toml
//! host = "0.0.0.0"
//! port = 3200
//! data_path = "/var/lib/beans/data.json"
//! jwt_secret = "change-me"
//!
//! [smtp]
//! host = "smtp.example.com"
//! username = "beans"
//! password = "secret"
//! from = "Beans <no-reply@example.com>"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3200;
const DEFAULT_JWT_SECRET: &str = "beans-development-secret";
const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;
const DEFAULT_TICK_INTERVAL_MS: u64 = 250;

/// SMTP relay used to deliver password reset codes
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    /// Sender mailbox, e.g. `Beans <no-reply@example.com>`
    pub from: String,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Public origin used to build profile image URLs
    pub base_url: String,
    /// JSON file mirroring the store; `None` keeps everything in memory
    pub data_path: Option<PathBuf>,
    /// Directory holding profile images, served under `/imgurl`
    pub image_dir: PathBuf,
    /// HMAC secret for session tokens
    pub jwt_secret: String,
    /// Session token lifetime
    pub token_ttl_secs: u64,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// Scheduler period for delayed messages and standups
    pub tick_interval_ms: u64,
    pub smtp: Option<SmtpConfig>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load configuration from defaults, `BEANS_CONFIG`, `.env` and the environment
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let mut builder = AppConfigBuilder::with_local_defaults();
        if let Ok(path) = std::env::var("BEANS_CONFIG") {
            builder = builder.merge_file(FileConfig::read(Path::new(&path))?);
        }
        let builder = builder.merge_env(|key| std::env::var(key).ok())?;

        if builder.jwt_secret.is_none() {
            tracing::warn!("JWT_SECRET not set. Using the development secret.");
        }
        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingValue("jwt_secret"));
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                key: "bcrypt_cost",
                value: self.bcrypt_cost.to_string(),
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "tick_interval_ms",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

/// Shape of the optional TOML configuration file
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub base_url: Option<String>,
    pub data_path: Option<PathBuf>,
    pub image_dir: Option<PathBuf>,
    pub jwt_secret: Option<String>,
    pub token_ttl_secs: Option<u64>,
    pub bcrypt_cost: Option<u32>,
    pub tick_interval_ms: Option<u64>,
    pub smtp: Option<SmtpConfig>,
}

impl FileConfig {
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    base_url: Option<String>,
    data_path: Option<PathBuf>,
    image_dir: Option<PathBuf>,
    jwt_secret: Option<String>,
    token_ttl_secs: Option<u64>,
    bcrypt_cost: Option<u32>,
    tick_interval_ms: Option<u64>,
    smtp: Option<SmtpConfig>,
}

impl AppConfigBuilder {
    /// Defaults for a locally installed server: data under the user's data dir
    fn with_local_defaults() -> Self {
        let root = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("beans");
        Self {
            data_path: Some(root.join("data.json")),
            image_dir: Some(root.join("images")),
            ..Self::default()
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    pub fn image_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.image_dir = Some(path.into());
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = Some(secret.into());
        self
    }

    pub fn token_ttl_secs(mut self, ttl: u64) -> Self {
        self.token_ttl_secs = Some(ttl);
        self
    }

    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = Some(cost);
        self
    }

    pub fn tick_interval_ms(mut self, interval: u64) -> Self {
        self.tick_interval_ms = Some(interval);
        self
    }

    pub fn smtp(mut self, smtp: SmtpConfig) -> Self {
        self.smtp = Some(smtp);
        self
    }

    /// Overlay values from a TOML file
    pub fn merge_file(mut self, file: FileConfig) -> Self {
        self.host = file.host.or(self.host);
        self.port = file.port.or(self.port);
        self.base_url = file.base_url.or(self.base_url);
        self.data_path = file.data_path.or(self.data_path);
        self.image_dir = file.image_dir.or(self.image_dir);
        self.jwt_secret = file.jwt_secret.or(self.jwt_secret);
        self.token_ttl_secs = file.token_ttl_secs.or(self.token_ttl_secs);
        self.bcrypt_cost = file.bcrypt_cost.or(self.bcrypt_cost);
        self.tick_interval_ms = file.tick_interval_ms.or(self.tick_interval_ms);
        self.smtp = file.smtp.or(self.smtp);
        self
    }

    /// Overlay values from environment variables, read through `lookup`
    pub fn merge_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("BEANS_HOST") {
            self.host = Some(host);
        }
        if let Some(port) = lookup("BEANS_PORT") {
            self.port = Some(parse_value("BEANS_PORT", &port)?);
        }
        if let Some(url) = lookup("BEANS_BASE_URL") {
            self.base_url = Some(url);
        }
        if let Some(path) = lookup("BEANS_DATA_PATH") {
            self.data_path = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup("BEANS_IMAGE_DIR") {
            self.image_dir = Some(PathBuf::from(path));
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.jwt_secret = Some(secret);
        }
        if let Some(ttl) = lookup("BEANS_TOKEN_TTL_SECS") {
            self.token_ttl_secs = Some(parse_value("BEANS_TOKEN_TTL_SECS", &ttl)?);
        }
        if let Some(cost) = lookup("BEANS_BCRYPT_COST") {
            self.bcrypt_cost = Some(parse_value("BEANS_BCRYPT_COST", &cost)?);
        }
        if let Some(interval) = lookup("BEANS_TICK_INTERVAL_MS") {
            self.tick_interval_ms = Some(parse_value("BEANS_TICK_INTERVAL_MS", &interval)?);
        }
        if let Some(host) = lookup("SMTP_HOST") {
            let smtp = SmtpConfig {
                host,
                username: lookup("SMTP_USERNAME").ok_or(ConfigError::MissingValue("SMTP_USERNAME"))?,
                password: lookup("SMTP_PASSWORD").ok_or(ConfigError::MissingValue("SMTP_PASSWORD"))?,
                from: lookup("SMTP_FROM").ok_or(ConfigError::MissingValue("SMTP_FROM"))?,
            };
            self.smtp = Some(smtp);
        }
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let port = self.port.unwrap_or(DEFAULT_PORT);
        let config = AppConfig {
            host: self.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            base_url: self
                .base_url
                .unwrap_or_else(|| format!("http://localhost:{}", port))
                .trim_end_matches('/')
                .to_string(),
            data_path: self.data_path,
            image_dir: self
                .image_dir
                .unwrap_or_else(|| std::env::temp_dir().join("beans-images")),
            jwt_secret: self
                .jwt_secret
                .unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string()),
            token_ttl_secs: self.token_ttl_secs.unwrap_or(DEFAULT_TOKEN_TTL_SECS),
            bcrypt_cost: self.bcrypt_cost.unwrap_or(bcrypt::DEFAULT_COST),
            tick_interval_ms: self.tick_interval_ms.unwrap_or(DEFAULT_TICK_INTERVAL_MS),
            smtp: self.smtp,
        };
        config.validate()?;
        Ok(config)
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}
