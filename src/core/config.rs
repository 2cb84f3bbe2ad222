//! Configuration management

use clap::Parser;
use config::builder::{ConfigBuilder as Builder, DefaultState};
use config::{Config as ConfigBuilder, ConfigError as BuilderError, Environment, File, Map};
use jsonwebtoken::Algorithm;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Prefix for structured environment overrides, e.g. `AUTH_SERVER__PORT=8080`
const ENV_PREFIX: &str = "AUTH";

/// Flat variable names used by earlier deployments, mapped to `SECTION__KEY`
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("MONGO_URL", "DATABASE__URL"),
    ("DATABASE_NAME", "DATABASE__NAME"),
    ("SECRET_KEY", "SECURITY__SECRET_KEY"),
    ("ALGORITHM", "SECURITY__ALGORITHM"),
    ("ACCESS_TOKEN_EXPIRE_MINUTES", "SECURITY__ACCESS_TOKEN_EXPIRE_MINUTES"),
];

/// Work factor bounds accepted by bcrypt
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid server configuration: {0}")]
    InvalidServer(String),

    #[error("Invalid database configuration: {0}")]
    InvalidDatabase(String),

    #[error("Invalid logging configuration: {0}")]
    InvalidLogging(String),

    #[error("Invalid security configuration: {0}")]
    InvalidSecurity(String),

    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

impl From<BuilderError> for ConfigError {
    fn from(err: BuilderError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// Process-wide configuration, built once at startup and never mutated
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration with precedence:
    /// CLI args > `AUTH_*` env vars > legacy env vars > config file > defaults
    pub fn load() -> Result<Self, ConfigError> {
        // Missing .env is fine; real environment variables still apply
        dotenvy::dotenv().ok();
        Self::load_with(CliArgs::parse(), std::env::vars().collect())
    }

    /// Load configuration from already parsed CLI args and a snapshot of the
    /// environment. Nothing outside `env` is consulted.
    pub fn load_with(cli_args: CliArgs, env: Map<String, String>) -> Result<Self, ConfigError> {
        let mut builder = with_defaults(ConfigBuilder::builder())?;

        if let Some(config_path) = &cli_args.config {
            if !config_path.exists() {
                return Err(ConfigError::FileNotFound(config_path.display().to_string()));
            }
            builder = builder.add_source(File::from(config_path.as_path()));
        }

        let legacy: Map<String, String> = LEGACY_ENV_KEYS
            .iter()
            .filter_map(|(var, key)| env.get(*var).map(|value| (key.to_string(), value.clone())))
            .collect();

        builder = builder
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(legacy)),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(env)),
            );

        if let Some(host) = &cli_args.host {
            builder = builder.set_override("server.host", host.clone())?;
        }
        if let Some(port) = cli_args.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(url) = &cli_args.database_url {
            builder = builder.set_override("database.url", url.clone())?;
        }
        if let Some(log_level) = &cli_args.log_level {
            builder = builder.set_override("logging.level", log_level.clone())?;
        }

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path on top of the defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let config: Config = with_defaults(ConfigBuilder::builder())?
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.security.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Defaults for everything except the values an operator must supply
/// (database location, signing secret, algorithm, token lifetime).
fn with_defaults(
    builder: Builder<DefaultState>,
) -> Result<Builder<DefaultState>, ConfigError> {
    Ok(builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8000)?
        .set_default("server.request_timeout", 30)?
        .set_default("server.allowed_origins", vec!["*"])?
        .set_default("database.connection_pool_size", 10)?
        .set_default("database.busy_timeout", 5000)?
        .set_default("security.bcrypt_cost", bcrypt::DEFAULT_COST as i64)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stdout")?
        .set_default("logging.rotation", "never")?)
}

/// Command-line arguments for configuration override
#[derive(Debug, Default, Parser)]
#[command(name = "interview-auth")]
#[command(about = "User authentication backend", long_about = None)]
pub struct CliArgs {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Server host address
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Database location (directory holding the SQLite file)
    #[arg(long, value_name = "URL")]
    pub database_url: Option<String>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout: u64, // seconds
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::InvalidServer("host cannot be empty".to_string()));
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidServer("port must be greater than 0".to_string()));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::InvalidServer(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.allowed_origins.is_empty() {
            return Err(ConfigError::InvalidServer("allowed_origins cannot be empty".to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub name: String,
    pub connection_pool_size: u32,
    pub busy_timeout: u64, // milliseconds
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::InvalidDatabase("url cannot be empty".to_string()));
        }

        if self.name.trim().is_empty() {
            return Err(ConfigError::InvalidDatabase("name cannot be empty".to_string()));
        }

        if self.name.contains(['/', '\\']) {
            return Err(ConfigError::InvalidDatabase(
                "name must not contain path separators".to_string(),
            ));
        }

        if self.connection_pool_size == 0 {
            return Err(ConfigError::InvalidDatabase(
                "connection_pool_size must be greater than 0".to_string(),
            ));
        }

        if self.busy_timeout == 0 {
            return Err(ConfigError::InvalidDatabase(
                "busy_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// SQLite file backing the user store: `<url>/<name>.db`
    pub fn database_path(&self) -> PathBuf {
        let dir = self.url.strip_prefix("sqlite://").unwrap_or(&self.url);
        Path::new(dir).join(format!("{}.db", self.name))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub secret_key: String,
    pub algorithm: String,
    pub access_token_expire_minutes: i64,
    pub bcrypt_cost: u32,
}

impl SecurityConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret_key.is_empty() {
            return Err(ConfigError::InvalidSecurity("secret_key cannot be empty".to_string()));
        }

        self.jwt_algorithm()?;

        if self.access_token_expire_minutes <= 0 {
            return Err(ConfigError::InvalidSecurity(
                "access_token_expire_minutes must be greater than 0".to_string(),
            ));
        }

        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidSecurity(format!(
                "bcrypt_cost must be between {} and {}",
                MIN_BCRYPT_COST, MAX_BCRYPT_COST
            )));
        }

        Ok(())
    }

    /// Signing algorithm; only the HMAC family works with a shared secret
    pub fn jwt_algorithm(&self) -> Result<Algorithm, ConfigError> {
        let algorithm = Algorithm::from_str(&self.algorithm).map_err(|_| {
            ConfigError::InvalidSecurity(format!("unknown algorithm: {}", self.algorithm))
        })?;

        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
            _ => Err(ConfigError::InvalidSecurity(format!(
                "algorithm must be one of HS256, HS384, HS512 (got {})",
                self.algorithm
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
    pub log_file: Option<PathBuf>,
    pub rotation: String,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.as_str()) {
            return Err(ConfigError::InvalidLogging(format!(
                "level must be one of: {:?}",
                valid_levels
            )));
        }

        let valid_formats = ["json", "text"];
        if !valid_formats.contains(&self.format.as_str()) {
            return Err(ConfigError::InvalidLogging(format!(
                "format must be one of: {:?}",
                valid_formats
            )));
        }

        let valid_outputs = ["stdout", "file"];
        if !valid_outputs.contains(&self.output.as_str()) {
            return Err(ConfigError::InvalidLogging(format!(
                "output must be one of: {:?}",
                valid_outputs
            )));
        }

        if self.output == "file" && self.log_file.is_none() {
            return Err(ConfigError::InvalidLogging(
                "log_file must be specified when output is 'file'".to_string(),
            ));
        }

        let valid_rotations = ["never", "hourly", "daily"];
        if !valid_rotations.contains(&self.rotation.as_str()) {
            return Err(ConfigError::InvalidLogging(format!(
                "rotation must be one of: {:?}",
                valid_rotations
            )));
        }

        Ok(())
    }
}
