//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod session;
pub mod share;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::auth::AuthConfig;
pub use self::database::{DatabaseConfig, StoreProvider};
pub use self::logging::LoggingConfig;
pub use self::session::{MAX_TTL_HOURS, SessionConfig};
pub use self::share::ShareConfig;

use crate::error::AppError;

/// Environment variable prefix for configuration overrides.
const ENV_PREFIX: &str = "NOTABOOK";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (base file + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Persistent store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Credential and token settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Session lifetime settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Public share link settings.
    #[serde(default)]
    pub share: ShareConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// The file at `path` is merged with an optional `config/{env}.toml`
    /// overlay and with environment variables such as
    /// `NOTABOOK__DATABASE__URL`.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let env = std::env::var("NOTABOOK_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let app: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        app.validate()?;
        Ok(app)
    }

    /// Reject combinations that cannot start a server.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.database.provider == StoreProvider::Postgres && self.database.url.is_empty() {
            return Err(AppError::configuration(
                "database.url is required when database.provider = \"postgres\"",
            ));
        }
        if self.auth.jwt_secret.len() < 16 {
            return Err(AppError::configuration(
                "auth.jwt_secret must be at least 16 characters",
            ));
        }
        if !(1..=MAX_TTL_HOURS).contains(&self.session.ttl_hours) {
            return Err(AppError::configuration(format!(
                "session.ttl_hours must be between 1 and {MAX_TTL_HOURS}"
            )));
        }
        Ok(())
    }

    /// A configuration suitable for tests and local demos: in-memory store,
    /// fixed secret.
    pub fn in_memory() -> Self {
        let mut config = Self::default();
        config.database.provider = StoreProvider::Memory;
        config.auth.jwt_secret = "test-secret-with-enough-length".to_string();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_postgres_requires_url() {
        let config = AppConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_in_memory_is_valid() {
        let config = AppConfig::in_memory();
        assert!(config.validate().is_ok());
        assert_eq!(config.database.provider, StoreProvider::Memory);
    }

    #[test]
    fn test_session_ttl_range() {
        let mut config = AppConfig::in_memory();
        config.session.ttl_hours = 0;
        assert!(config.validate().is_err());

        config.session.ttl_hours = u64::MAX;
        assert!(config.validate().is_err());

        config.session.ttl_hours = MAX_TTL_HOURS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sections_deserialize_with_defaults() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "database": { "url": "postgres://localhost/notabook" }
        }))
        .expect("deserialize");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.session.ttl_hours, 12);
    }
}
