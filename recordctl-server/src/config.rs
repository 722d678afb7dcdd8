//! Configuration - YAML file plus environment overrides
//!
//! Layering, later wins:
//! 1. Built-in defaults
//! 2. YAML file (path given by the caller, e.g. `--config` / `RECORDCTL_CONFIG`)
//! 3. Environment variables:
//!    - `RECORDCTL_HOST`, `RECORDCTL_PORT`, `RECORDCTL_COLLECTION`
//!    - `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`,
//!      `DB_SSLMODE`, `DB_MAX_CONNECTIONS`
//!    - `DATABASE_URL` (takes precedence over the discrete `DB_*` fields)

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub database: DbConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    /// Path segment the record routes are mounted under
    pub collection: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            collection: "records".to_string(),
        }
    }
}

/// PostgreSQL connection settings
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub dbname: String,
    pub sslmode: String,
    pub max_connections: u32,
    /// Full connection string; overrides the discrete fields when set
    pub url: Option<String>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            username: "postgres".to_string(),
            password: String::new(),
            dbname: "postgres".to_string(),
            sslmode: "disable".to_string(),
            max_connections: 5,
            url: None,
        }
    }
}

// Hand-written so the password never reaches logs.
impl std::fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("dbname", &self.dbname)
            .field("sslmode", &self.sslmode)
            .field("max_connections", &self.max_connections)
            .field("url", &self.url.as_ref().map(|_| "***"))
            .finish()
    }
}

impl DbConfig {
    /// Build sqlx connect options from these settings.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if let Some(url) = &self.url {
            return Ok(PgConnectOptions::from_str(url)?);
        }

        let ssl_mode = PgSslMode::from_str(&self.sslmode).map_err(|_| {
            ConfigError::InvalidValue {
                key: "database.sslmode",
                value: self.sslmode.clone(),
            }
        })?;

        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .database(&self.dbname)
            .ssl_mode(ssl_mode);

        if !self.password.is_empty() {
            options = options.password(&self.password);
        }

        Ok(options)
    }
}

impl AppConfig {
    /// Load configuration from an optional YAML file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_with(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse YAML. Missing keys fall back to defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("RECORDCTL_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("RECORDCTL_PORT") {
            self.server.port = parse_value("RECORDCTL_PORT", v)?;
        }
        if let Some(v) = lookup("RECORDCTL_COLLECTION") {
            self.server.collection = v;
        }

        let db = &mut self.database;
        if let Some(v) = lookup("DB_HOST") {
            db.host = v;
        }
        if let Some(v) = lookup("DB_PORT") {
            db.port = parse_value("DB_PORT", v)?;
        }
        if let Some(v) = lookup("DB_USER") {
            db.username = v;
        }
        if let Some(v) = lookup("DB_PASSWORD") {
            db.password = v;
        }
        if let Some(v) = lookup("DB_NAME") {
            db.dbname = v;
        }
        if let Some(v) = lookup("DB_SSLMODE") {
            db.sslmode = v;
        }
        if let Some(v) = lookup("DB_MAX_CONNECTIONS") {
            db.max_connections = parse_value("DB_MAX_CONNECTIONS", v)?;
        }
        if let Some(v) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            db.url = Some(v);
        }

        Ok(())
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let collection = &self.server.collection;
        if !is_valid_collection(collection) {
            return Err(ConfigError::InvalidValue {
                key: "server.collection",
                value: collection.clone(),
            });
        }

        self.bind_addr()?;

        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                key: "database.max_connections",
                value: "0".to_string(),
            });
        }

        if self.database.url.is_none() && PgSslMode::from_str(&self.database.sslmode).is_err() {
            return Err(ConfigError::InvalidValue {
                key: "database.sslmode",
                value: self.database.sslmode.clone(),
            });
        }

        Ok(())
    }

    /// Socket address the HTTP server binds to. `server.host` must be an IP.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: "server.host",
                value: self.server.host.clone(),
            })?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    match value.trim().parse() {
        Ok(parsed) => Ok(parsed),
        Err(_) => Err(ConfigError::InvalidValue { key, value }),
    }
}

/// Path segments already routed by the server.
const RESERVED_COLLECTIONS: &[&str] = &["health"];

/// A collection is one literal path segment: `[A-Za-z0-9_.-]+`, not reserved.
fn is_valid_collection(name: &str) -> bool {
    !name.is_empty()
        && !RESERVED_COLLECTIONS.contains(&name)
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}
