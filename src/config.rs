//! Application configuration
//!
//! Loaded from a TOML file. Every section and every field has a default, so a
//! missing file or a partial file is fine.
//!
//! ```toml
//! [server]
//! api_port = 8080
//!
//! [booking]
//! reservation_prefix = "PARK"
//! cancellation_window_days = 10
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::{AdminBootstrap, BookingPolicy};
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::DatabaseConfig;

/// Environment variable that points at an alternative config file.
pub const CONFIG_ENV: &str = "PARK_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// `~/.config/park-service/config.toml`, or `$PARK_CONFIG` when set.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("park-service")
        .join("config.toml")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub security: SecuritySection,
    pub admin: AdminSection,
    pub logging: LoggingSection,
    pub booking: BookingSection,
    pub retention: RetentionSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub api_host: String,
    pub api_port: u16,
    /// Grace period for in-flight requests, in seconds
    pub shutdown_timeout: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        let db = DatabaseConfig::default();
        Self {
            url: db.url,
            max_connections: db.max_connections,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySection {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
}

impl Default for SecuritySection {
    fn default() -> Self {
        let jwt = JwtConfig::default();
        Self {
            jwt_secret: jwt.secret,
            jwt_expiration_hours: jwt.expiration_hours,
        }
    }
}

/// Administrator created on first start when none exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSection {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Default for AdminSection {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            email: "admin@park.local".to_string(),
            password: "admin12345".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// `RUST_LOG` takes precedence when set
    pub level: String,
    /// `plain` or `json`
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "plain".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingSection {
    pub reservation_prefix: String,
    pub cancellation_window_days: i64,
}

impl Default for BookingSection {
    fn default() -> Self {
        let policy = BookingPolicy::default();
        Self {
            reservation_prefix: policy.reservation_prefix,
            cancellation_window_days: policy.cancellation_window_days,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionSection {
    /// Cancelled reservations older than this are deleted. 0 disables the job.
    pub cancelled_days: i64,
    pub check_interval_secs: u64,
}

impl Default for RetentionSection {
    fn default() -> Self {
        Self {
            cancelled_days: 90,
            check_interval_secs: 3600,
        }
    }
}

impl AppConfig {
    /// Read `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("security.jwt_secret is empty".into()));
        }
        if self.security.jwt_expiration_hours < 1 {
            return Err(ConfigError::Invalid(
                "security.jwt_expiration_hours must be at least 1".into(),
            ));
        }
        if self.booking.reservation_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "booking.reservation_prefix is empty".into(),
            ));
        }
        if self.booking.cancellation_window_days < 0 {
            return Err(ConfigError::Invalid(
                "booking.cancellation_window_days cannot be negative".into(),
            ));
        }
        if self.retention.check_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "retention.check_interval_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn api_address(&self) -> String {
        format!("{}:{}", self.server.api_host, self.server.api_port)
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
        }
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig::new(
            self.security.jwt_secret.clone(),
            self.security.jwt_expiration_hours,
        )
    }

    pub fn booking_policy(&self) -> BookingPolicy {
        BookingPolicy {
            reservation_prefix: self.booking.reservation_prefix.clone(),
            cancellation_window_days: self.booking.cancellation_window_days,
        }
    }

    pub fn admin_bootstrap(&self) -> AdminBootstrap {
        AdminBootstrap {
            username: self.admin.username.clone(),
            email: self.admin.email.clone(),
            password: self.admin.password.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.server.api_port, 8080);
        assert_eq!(config.booking.cancellation_window_days, 10);
        assert_eq!(config.booking.reservation_prefix, "PARK");
        assert_eq!(config.logging.format, "plain");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            api_port = 9090

            [booking]
            cancellation_window_days = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.server.api_port, 9090);
        assert_eq!(config.server.api_host, "0.0.0.0");
        assert_eq!(config.booking_policy().cancellation_window_days, 3);
        assert_eq!(config.booking_policy().reservation_prefix, "PARK");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(AppConfig::from_toml("[security]\njwt_secret = \"\"").is_err());
        assert!(AppConfig::from_toml("[retention]\ncheck_interval_secs = 0").is_err());
        assert!(AppConfig::from_toml("[server]\napi_port = \"nope\"").is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AppConfig::load(Path::new("/nonexistent/park-service.toml")).unwrap();
        assert_eq!(config.api_address(), "0.0.0.0:8080");
    }
}
