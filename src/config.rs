//! Runtime configuration read from the environment (and `.env` via dotenvy).

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::store::validate;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://./finance_dashboard.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_CURRENCY: &str = "TND";
pub const MAX_SESSION_TTL_HOURS: u64 = 24 * 365 * 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// HMAC key for session tokens. `None` when `SESSION_SECRET` is unset.
    pub session_secret: Option<Vec<u8>>,
    pub session_ttl: Duration,
    pub default_currency: String,
    pub change_feed_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            session_secret: None,
            session_ttl: Duration::from_secs(24 * 60 * 60),
            default_currency: DEFAULT_CURRENCY.to_string(),
            change_feed_capacity: 256,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. `from_env` uses the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = match get("BIND_ADDR") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|e| AppError::Config(format!("BIND_ADDR {v:?}: {e}")))?,
            None => defaults.bind_addr,
        };

        let session_ttl = match get("SESSION_TTL_HOURS") {
            Some(v) => {
                let hours: u64 = v
                    .trim()
                    .parse()
                    .map_err(|e| AppError::Config(format!("SESSION_TTL_HOURS {v:?}: {e}")))?;
                if hours == 0 {
                    return Err(AppError::Config("SESSION_TTL_HOURS must be positive".into()));
                }
                if hours > MAX_SESSION_TTL_HOURS {
                    return Err(AppError::Config(format!(
                        "SESSION_TTL_HOURS must be at most {MAX_SESSION_TTL_HOURS}"
                    )));
                }
                let secs = hours
                    .checked_mul(60 * 60)
                    .ok_or_else(|| AppError::Config(format!("SESSION_TTL_HOURS {v:?} is too large")))?;
                Duration::from_secs(secs)
            }
            None => defaults.session_ttl,
        };

        let change_feed_capacity = match get("CHANGE_FEED_CAPACITY") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| AppError::Config(format!("CHANGE_FEED_CAPACITY {v:?}")))?,
            None => defaults.change_feed_capacity,
        };

        let default_currency = match get("DEFAULT_CURRENCY") {
            Some(v) => {
                let code = v.trim().to_ascii_uppercase();
                validate::currency(&code).map_err(|_| {
                    AppError::Config(format!("DEFAULT_CURRENCY {v:?} must be a three-letter code"))
                })?;
                code
            }
            None => defaults.default_currency,
        };

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr,
            session_secret: get("SESSION_SECRET").map(String::into_bytes),
            session_ttl,
            default_currency,
            change_feed_capacity,
        })
    }

    /// The session secret, or an error if the server is started without one.
    pub fn require_session_secret(&self) -> AppResult<Vec<u8>> {
        self.session_secret
            .clone()
            .ok_or_else(|| AppError::Config("SESSION_SECRET must be set".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppResult<AppConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.default_currency, "TND");
        assert_eq!(config.session_ttl, Duration::from_secs(86_400));
        assert!(config.session_secret.is_none());
        assert!(config.require_session_secret().is_err());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("SESSION_SECRET", "s3cret"),
            ("SESSION_TTL_HOURS", "2"),
            ("DEFAULT_CURRENCY", "eur"),
            ("CHANGE_FEED_CAPACITY", "16"),
        ])
        .unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.require_session_secret().unwrap(), b"s3cret".to_vec());
        assert_eq!(config.session_ttl, Duration::from_secs(7200));
        assert_eq!(config.default_currency, "EUR");
        assert_eq!(config.change_feed_capacity, 16);
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(matches!(
            config_from(&[("SESSION_TTL_HOURS", "soon")]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("SESSION_TTL_HOURS", "0")]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("CHANGE_FEED_CAPACITY", "0")]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("BIND_ADDR", "localhost")]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("SESSION_TTL_HOURS", "18446744073709551615")]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("SESSION_TTL_HOURS", "1000000000000")]),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn default_currency_must_be_a_code() {
        assert!(matches!(
            config_from(&[("DEFAULT_CURRENCY", "EURO")]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("DEFAULT_CURRENCY", "E1R")]),
            Err(AppError::Config(_))
        ));
        assert_eq!(config_from(&[("DEFAULT_CURRENCY", " usd ")]).unwrap().default_currency, "USD");
    }
}
