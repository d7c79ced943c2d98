use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::{env, time::Duration};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Longest accepted session lifetime: one year
pub const MAX_TTL_HOURS: u64 = 24 * 365;

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// HMAC signing secret, never defaulted
    pub secret: String,
    pub ttl_hours: u64,
    pub issuer: String,
    /// Mark the session cookie `Secure` (enable behind HTTPS)
    #[serde(default)]
    pub secure_cookie: bool,
}

impl JwtConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_hours.saturating_mul(60 * 60))
    }
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy environment variables (JWT_SECRET, DATABASE_URL)
    /// 2. Environment variables (STOREFRONT__JWT__SECRET, etc.)
    /// 3. Config file specified by path
    /// 4. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "sqlite:storefront.db")?
            .set_default("database.max_connections", 5)?
            .set_default("jwt.ttl_hours", 72)?
            .set_default("jwt.issuer", "storefront")?
            .set_default("jwt.secure_cookie", false)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Optional: a missing file falls through to defaults and environment
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("STOREFRONT")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }
        if let Ok(jwt_secret) = env::var("JWT_SECRET") {
            builder = builder.set_override("jwt.secret", jwt_secret)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt.secret.len() < 32 {
            return Err("JWT secret must be at least 32 characters long".to_string());
        }
        if self.jwt.ttl_hours == 0 {
            return Err("JWT ttl_hours must be at least 1".to_string());
        }
        if self.jwt.ttl_hours > MAX_TTL_HOURS {
            return Err(format!("JWT ttl_hours must be at most {MAX_TTL_HOURS}"));
        }
        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_string());
        }
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: "sqlite:test.db".to_string(),
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: "test_secret_key_minimum_32_characters_long".to_string(),
                ttl_hours: 72,
                issuer: "storefront".to_string(),
                secure_cookie: false,
            },
            observability: ObservabilityConfig::default(),
        }
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validation_short_secret() {
        let mut config = valid_config();
        config.jwt.secret = "short".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_ttl() {
        let mut config = valid_config();
        config.jwt.ttl_hours = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_ttl_upper_bound() {
        let mut config = valid_config();
        config.jwt.ttl_hours = MAX_TTL_HOURS;
        assert!(config.validate().is_ok());

        config.jwt.ttl_hours = MAX_TTL_HOURS + 1;
        assert!(config.validate().is_err());

        config.jwt.ttl_hours = u64::MAX / 1000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ttl_does_not_overflow() {
        let mut config = valid_config();
        config.jwt.ttl_hours = u64::MAX / 1000;

        assert_eq!(config.jwt.ttl(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_validation_zero_port() {
        let mut config = valid_config();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_connections() {
        let mut config = valid_config();
        config.database.max_connections = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ttl_defaults_to_three_days() {
        assert_eq!(
            valid_config().jwt.ttl(),
            Duration::from_secs(72 * 60 * 60)
        );
    }

    #[test]
    fn test_load_reads_file() {
        let dir = temp_dir::TempDir::new().unwrap();
        let path = dir.child("storefront.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 8080

[jwt]
secret = "file_secret_key_minimum_32_characters_long"
ttl_hours = 24
"#,
        )
        .unwrap();

        let config = Config::load(Some(path.to_string_lossy().into_owned())).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.jwt.ttl_hours, 24);
        assert_eq!(config.jwt.issuer, "storefront");
        assert!(!config.jwt.secure_cookie);
        assert_eq!(config.observability.log_level, "info");
    }
}
