use std::{env, str::FromStr, time::Duration};

use crate::error::ConfigError;

/// Where alerts and watches live. `Memory` forgets everything on restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub store_backend: StoreBackend,
    pub mongodb_uri: String,
    pub mongodb_db: String,
    pub host: String,
    pub port: u16,

    pub telegram_bot_token: String,
    pub telegram_api_base: String,

    pub opensea_api_key: String,
    pub opensea_api_base: String,

    pub alert_check_interval: Duration,
    pub alert_first_run_delay: Duration,
    pub alert_fetch_concurrency: usize,

    pub http_connect_timeout: Duration,
    pub http_timeout: Duration,
}

pub fn load() -> Result<Settings, ConfigError> {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    from_lookup(|key| env::var(key).ok())
}

/// Builds settings from any key lookup, so tests don't have to touch the
/// process environment.
pub fn from_lookup<F>(lookup: F) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

    let telegram_bot_token = lookup("TELEGRAM_BOT_TOKEN")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?;

    let store_backend = match get("STORE_BACKEND", "mongo").trim().to_lowercase().as_str() {
        "mongo" | "mongodb" => StoreBackend::Mongo,
        "memory" => StoreBackend::Memory,
        _ => {
            return Err(ConfigError::Invalid {
                var: "STORE_BACKEND",
                value: get("STORE_BACKEND", ""),
            })
        }
    };

    let settings = Settings {
        store_backend,
        mongodb_uri: get("MONGODB_URI", "mongodb://localhost:27017"),
        mongodb_db: get("MONGODB_DB", "floorwatch"),
        host: get("HOST", "127.0.0.1"),
        port: parse_or(&lookup, "PORT", 3000)?,

        telegram_bot_token,
        telegram_api_base: get("TELEGRAM_API_BASE", "https://api.telegram.org"),

        opensea_api_key: get("OPENSEA_API_KEY", ""),
        opensea_api_base: get("OPENSEA_API_BASE", "https://api.opensea.io/api/v2"),

        alert_check_interval: Duration::from_secs(parse_or(&lookup, "ALERT_CHECK_INTERVAL_SECS", 300)?),
        alert_first_run_delay: Duration::from_secs(parse_or(&lookup, "ALERT_FIRST_RUN_DELAY_SECS", 60)?),
        alert_fetch_concurrency: parse_or(&lookup, "ALERT_FETCH_CONCURRENCY", 4)?,

        http_connect_timeout: Duration::from_secs(parse_or(&lookup, "HTTP_CONNECT_TIMEOUT_SECS", 5)?),
        http_timeout: Duration::from_secs(parse_or(&lookup, "HTTP_TIMEOUT_SECS", 10)?),
    };

    if settings.alert_check_interval.is_zero() {
        return Err(ConfigError::Invalid {
            var: "ALERT_CHECK_INTERVAL_SECS",
            value: "0".to_string(),
        });
    }

    if settings.alert_fetch_concurrency == 0 {
        return Err(ConfigError::Invalid {
            var: "ALERT_FETCH_CONCURRENCY",
            value: "0".to_string(),
        });
    }

    // A single request must never outlive a pass interval.
    if settings.http_timeout >= settings.alert_check_interval {
        return Err(ConfigError::Invalid {
            var: "HTTP_TIMEOUT_SECS",
            value: settings.http_timeout.as_secs().to_string(),
        });
    }

    Ok(settings)
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
    }
}
