//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_pool_size: usize,
    /// Connect over TLS (managed Postgres providers require it)
    pub use_tls: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            database: "legis".to_string(),
            max_pool_size: 10,
            use_tls: false,
        }
    }
}

/// Amendment document download settings
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("legis-tracker/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Knobs for the temperature reports
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Number of weekly samples fed to the trend estimator
    pub trend_window: usize,
    /// Weekly decay factor applied to the accumulated temperature
    pub temperature_decay: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            trend_window: 6,
            temperature_decay: 0.5,
        }
    }
}

/// Complete application settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub documents: DocumentConfig,
    pub reports: ReportConfig,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();

        // Try to load DATABASE_URL first, fall back to individual vars
        let database = if let Ok(database_url) = std::env::var("DATABASE_URL") {
            Self::parse_database_url(&database_url)?
        } else {
            let defaults = DatabaseConfig::default();
            DatabaseConfig {
                host: std::env::var("DB_HOST").unwrap_or(defaults.host),
                port: parse_var("DB_PORT")?.unwrap_or(defaults.port),
                user: std::env::var("DB_USER").unwrap_or(defaults.user),
                password: std::env::var("DB_PASSWORD").unwrap_or_default(),
                database: std::env::var("DB_NAME").unwrap_or(defaults.database),
                max_pool_size: parse_var("DB_MAX_CONNECTIONS")?.unwrap_or(defaults.max_pool_size),
                use_tls: parse_var("DB_TLS")?.unwrap_or(false),
            }
        };

        let document_defaults = DocumentConfig::default();
        let documents = DocumentConfig {
            timeout_secs: parse_var("DOCUMENT_FETCH_TIMEOUT_SECS")?
                .unwrap_or(document_defaults.timeout_secs),
            user_agent: std::env::var("DOCUMENT_USER_AGENT")
                .unwrap_or(document_defaults.user_agent),
        };

        let report_defaults = ReportConfig::default();
        let reports = ReportConfig {
            trend_window: parse_var("TREND_WINDOW")?.unwrap_or(report_defaults.trend_window),
            temperature_decay: parse_var("TEMPERATURE_DECAY")?
                .unwrap_or(report_defaults.temperature_decay),
        };

        let settings = Self {
            database,
            documents,
            reports,
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.documents.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "DOCUMENT_FETCH_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }
        if self.reports.trend_window < 2 {
            return Err(ConfigError::InvalidValue(
                "TREND_WINDOW needs at least two samples".to_string(),
            ));
        }
        let decay = self.reports.temperature_decay;
        if !(decay > 0.0 && decay <= 1.0) {
            return Err(ConfigError::InvalidValue(format!(
                "TEMPERATURE_DECAY must be in (0, 1], got {}",
                decay
            )));
        }
        Ok(())
    }

    /// Parse a DATABASE_URL connection string (postgresql://...)
    fn parse_database_url(url: &str) -> Result<DatabaseConfig, ConfigError> {
        let parsed = url::Url::parse(url).map_err(|_| {
            ConfigError::InvalidValue(
                "Invalid DATABASE_URL format (expected postgresql://...)".to_string(),
            )
        })?;

        let host = parsed
            .host_str()
            .ok_or_else(|| ConfigError::InvalidValue("Missing host in DATABASE_URL".to_string()))?
            .to_string();

        let database = parsed.path().trim_start_matches('/').to_string();
        if database.is_empty() {
            return Err(ConfigError::MissingVar(
                "database name in DATABASE_URL".to_string(),
            ));
        }

        let use_tls = parsed
            .query_pairs()
            .any(|(k, v)| k == "sslmode" && v == "require")
            || host.contains("neon.tech");

        Ok(DatabaseConfig {
            host,
            port: parsed.port().unwrap_or(5432),
            user: parsed.username().to_string(),
            password: parsed.password().map(|p| p.to_string()).unwrap_or_default(),
            database,
            max_pool_size: parse_var("DB_MAX_CONNECTIONS")?.unwrap_or(10),
            use_tls,
        })
    }
}

/// Read an optional environment variable and parse it, rejecting garbage
fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(format!("{}={}", name, raw))),
        Err(_) => Ok(None),
    }
}
