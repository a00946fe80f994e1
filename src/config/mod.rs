use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub location: LocationConfig,
    pub channel: ChannelConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string; read from DATABASE_URL.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout_secs: u64,
}

/// Options handed to the geolocation sensor when a watch is registered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    pub high_accuracy: bool,
    /// Zero means a cached fix is never reused.
    pub maximum_age_ms: u64,
    /// Per-fix acquisition timeout.
    pub fix_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Suffix appended to a table name to form its notify channel.
    pub suffix: String,
    /// Capacity for queued change signals on a subscription.
    pub buffer: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        // Load .env if present so embedders pick up DATABASE_URL etc.
        let _ = dotenvy::dotenv();

        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout_secs =
                v.parse().unwrap_or(self.database.connection_timeout_secs);
        }

        if let Ok(v) = env::var("LOCATION_HIGH_ACCURACY") {
            self.location.high_accuracy = v.parse().unwrap_or(self.location.high_accuracy);
        }
        if let Ok(v) = env::var("LOCATION_MAXIMUM_AGE_MS") {
            self.location.maximum_age_ms = v.parse().unwrap_or(self.location.maximum_age_ms);
        }
        if let Ok(v) = env::var("LOCATION_FIX_TIMEOUT_MS") {
            self.location.fix_timeout_ms = v.parse().unwrap_or(self.location.fix_timeout_ms);
        }

        if let Ok(v) = env::var("CHANNEL_SUFFIX") {
            self.channel.suffix = v;
        }
        if let Ok(v) = env::var("CHANNEL_BUFFER") {
            self.channel.buffer = v.parse().unwrap_or(self.channel.buffer);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout_secs: 30,
            },
            location: LocationConfig {
                high_accuracy: true,
                maximum_age_ms: 0,
                fix_timeout_ms: 5_000,
            },
            channel: ChannelConfig {
                suffix: "_changed".to_string(),
                buffer: 16,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout_secs: 10,
            },
            ..Self::development()
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout_secs: 5,
            },
            ..Self::development()
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults_match_sensor_contract() {
        let config = AppConfig::development();
        assert!(config.location.high_accuracy);
        assert_eq!(config.location.maximum_age_ms, 0);
        assert_eq!(config.location.fix_timeout_ms, 5_000);
    }

    #[test]
    fn production_tightens_database_limits() {
        let config = AppConfig::production();
        assert_eq!(config.database.max_connections, 50);
        assert_eq!(config.database.connection_timeout_secs, 5);
        assert_eq!(config.channel.suffix, "_changed");
    }

    #[test]
    fn env_overrides_apply_over_profile_defaults() {
        env::set_var("LOCATION_FIX_TIMEOUT_MS", "9000");
        env::set_var("CHANNEL_BUFFER", "not-a-number");

        let config = AppConfig::development().with_env_overrides();
        assert_eq!(config.location.fix_timeout_ms, 9_000);
        // Unparseable overrides fall back to the profile default.
        assert_eq!(config.channel.buffer, 16);

        env::remove_var("LOCATION_FIX_TIMEOUT_MS");
        env::remove_var("CHANNEL_BUFFER");
    }
}
