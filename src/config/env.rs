//! Process configuration from environment (and `.env` via dotenvy).

use crate::config::ListDefaults;
use crate::error::ConfigError;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Unset means the in-memory store is used.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub auto_migrate: bool,
    pub body_limit_bytes: usize,
    pub list: ListDefaults,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ListDefaults::default();
        let list = ListDefaults {
            limit: parse_or(&lookup, "LIST_DEFAULT_LIMIT", defaults.limit)?,
            page: defaults.page,
            sort: parse_or(&lookup, "LIST_DEFAULT_SORT", defaults.sort)?,
            max_limit: parse_or(&lookup, "LIST_MAX_LIMIT", defaults.max_limit)?,
        };
        if list.limit == 0 {
            return Err(ConfigError::Invalid {
                key: "LIST_DEFAULT_LIMIT",
                value: "0".into(),
            });
        }
        if list.max_limit < list.limit {
            return Err(ConfigError::Invalid {
                key: "LIST_MAX_LIMIT",
                value: list.max_limit.to_string(),
            });
        }
        Ok(AppConfig {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into()),
            database_url: lookup("DATABASE_URL").filter(|s| !s.trim().is_empty()),
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            auto_migrate: parse_bool_or(&lookup, "AUTO_MIGRATE", true)?,
            body_limit_bytes: parse_or(&lookup, "BODY_LIMIT_BYTES", 64 * 1024)?,
            list,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

fn parse_bool_or<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).as_deref().map(str::trim) {
        None => Ok(default),
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => Ok(false),
        Some(v) => Err(ConfigError::Invalid {
            key,
            value: v.to_string(),
        }),
    }
}
