//! Runtime settings loaded from the environment.

use crate::error::ConfigError;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Production,
    Development,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" => Ok(Environment::Development),
            _ => Err(ConfigError::InvalidValue {
                key: "APP_ENV",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// SQLite URL, e.g. `sqlite://database/rpghero.db` or `sqlite::memory:`.
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    /// Directory served at `/`.
    pub static_dir: String,
    /// Requests allowed per client per window on /heroes and /quests.
    pub rate_limit_max: u32,
    pub rate_limit_window_secs: u64,
    pub body_limit_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: "sqlite://database/rpghero.db".to_string(),
            database_max_connections: 5,
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: Environment::Production,
            static_dir: "public".to_string(),
            rate_limit_max: 100,
            rate_limit_window_secs: 15 * 60,
            body_limit_bytes: 1024 * 1024,
        }
    }
}

fn parsed<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}

impl Settings {
    /// Settings from process environment variables. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Settings from any key lookup; missing keys use defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let d = Settings::default();
        let text = |key: &str, default: String| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };
        Ok(Settings {
            database_url: text("DATABASE_URL", d.database_url),
            database_max_connections: parsed(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                d.database_max_connections,
            )?,
            host: text("HOST", d.host),
            port: parsed(&lookup, "PORT", d.port)?,
            environment: parsed(&lookup, "APP_ENV", d.environment)?,
            static_dir: text("STATIC_DIR", d.static_dir),
            rate_limit_max: parsed(&lookup, "RATE_LIMIT_MAX", d.rate_limit_max)?,
            rate_limit_window_secs: parsed(
                &lookup,
                "RATE_LIMIT_WINDOW_SECS",
                d.rate_limit_window_secs,
            )?,
            body_limit_bytes: parsed(&lookup, "BODY_LIMIT_BYTES", d.body_limit_bytes)?,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse()
            .map_err(|_| ConfigError::InvalidValue { key: "HOST", value: raw })
    }
}
