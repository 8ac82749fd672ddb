use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use tracing::info;
use validator::Validate;

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";

/// Workshop identity printed on quotations and inspection reports.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct WorkshopConfig {
    #[validate(length(min = 1))]
    pub name: String,
    pub city: String,
    pub phone: String,
    pub email: String,
    /// Workshop's own Tax Registration Number
    pub trn: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub bank_name: String,
    pub bank_iban: String,
    pub bank_account_name: String,
}

fn default_currency() -> String {
    "AED".to_string()
}

impl Default for WorkshopConfig {
    fn default() -> Self {
        Self {
            name: "Garage Works Auto Care LLC".to_string(),
            city: "Dubai, UAE".to_string(),
            phone: "+97140000000".to_string(),
            email: "service@garageworks.example".to_string(),
            trn: "100000000000000".to_string(),
            currency: default_currency(),
            bank_name: "Example Commercial Bank".to_string(),
            bank_iban: "AE000000000000000000000".to_string(),
            bank_account_name: "GARAGE WORKS AUTO CARE LLC".to_string(),
        }
    }
}

/// Application configuration with validation.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct AppConfig {
    /// Database connection URL
    #[validate(length(min = 1, message = "database_url must be set"))]
    pub database_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment ("development" or "production")
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Run pending migrations on startup
    #[serde(default = "default_auto_migrate")]
    pub auto_migrate: bool,

    /// Comma-separated list of allowed CORS origins; empty means
    /// permissive in development and closed in production
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Identity block for printed documents
    #[serde(default)]
    #[validate]
    pub workshop: WorkshopConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_auto_migrate() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    30
}

impl AppConfig {
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}

/// Loads configuration from `config/default.toml`, an environment-specific
/// overlay, and `APP__*` environment variables (highest precedence).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let run_env = std::env::var("RUN_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string());

    let mut builder = Config::builder()
        .set_default("environment", run_env.clone())?
        .add_source(File::from(Path::new(CONFIG_DIR).join("default.toml")).required(false))
        .add_source(File::from(Path::new(CONFIG_DIR).join(format!("{run_env}.toml"))).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"));

    // DATABASE_URL without the APP__ prefix is honored for convenience
    if let Ok(url) = std::env::var("DATABASE_URL") {
        builder = builder.set_override("database_url", url)?;
    }

    let config: AppConfig = builder.build()?.try_deserialize()?;

    config
        .validate()
        .map_err(|e| ConfigError::Message(format!("invalid configuration: {e}")))?;

    info!(
        environment = %config.environment,
        port = config.port,
        "Configuration loaded"
    );

    Ok(config)
}

/// Installs the global tracing subscriber. `RUST_LOG` wins over the
/// configured level when set.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workshop_defaults_are_complete() {
        let workshop = WorkshopConfig::default();
        assert!(!workshop.name.is_empty());
        assert_eq!(workshop.currency, "AED");
    }

    #[test]
    fn empty_database_url_fails_validation() {
        let config = AppConfig {
            database_url: String::new(),
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            log_level: default_log_level(),
            log_json: false,
            auto_migrate: true,
            cors_allowed_origins: None,
            request_timeout_secs: 30,
            workshop: WorkshopConfig::default(),
        };
        assert!(config.validate().is_err());
    }
}
