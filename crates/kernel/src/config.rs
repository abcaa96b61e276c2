//! Configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::models::Locale;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// Per-statement timeout applied to every pooled connection (default: 5000 ms).
    pub database_statement_timeout: Duration,

    /// Locale used when a request names none or an unsupported one (default: bg).
    pub default_locale: Locale,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,

    /// Upper bound on handling a single request (default: 30 s).
    pub request_timeout: Duration,

    /// How long category and tag listings stay cached (default: 60 s, 0 disables).
    pub catalog_cache_ttl: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let statement_timeout_ms: u64 = env::var("DATABASE_STATEMENT_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .context("DATABASE_STATEMENT_TIMEOUT_MS must be a valid u64")?;

        let default_locale = env::var("DEFAULT_LOCALE")
            .unwrap_or_else(|_| "bg".to_string())
            .parse()
            .context("DEFAULT_LOCALE must be one of: en, bg")?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| vec!["*".to_string()]);

        let request_timeout_secs: u64 = env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .context("REQUEST_TIMEOUT_SECS must be a valid u64")?;

        let catalog_cache_ttl_secs: u64 = env::var("CATALOG_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .context("CATALOG_CACHE_TTL_SECS must be a valid u64")?;

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            database_statement_timeout: Duration::from_millis(statement_timeout_ms),
            default_locale,
            cors_allowed_origins,
            request_timeout: Duration::from_secs(request_timeout_secs),
            catalog_cache_ttl: Duration::from_secs(catalog_cache_ttl_secs),
        })
    }

    /// Whether every origin is allowed.
    pub fn cors_allows_any(&self) -> bool {
        self.cors_allowed_origins.is_empty()
            || (self.cors_allowed_origins.len() == 1 && self.cors_allowed_origins[0] == "*")
    }
}
