use anyhow::{anyhow, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::net::SocketAddr;
use std::str::FromStr;
use url::Url;

const DEFAULT_PUSH_GATEWAY_URL: &str = "https://fcm.googleapis.com/fcm/send";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub http_addr: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_connect_timeout_seconds: u64,
    pub db_idle_timeout_seconds: u64,
    pub db_max_lifetime_seconds: u64,
    pub paseto_access_key: [u8; 32],
    pub access_ttl_minutes: u64,
    pub push: PushConfig,
    pub notify: NotifyConfig,
}

/// Push gateway transport settings. A missing `server_key` soft-disables delivery.
#[derive(Clone, Debug)]
pub struct PushConfig {
    pub gateway_url: Url,
    pub server_key: Option<String>,
    pub timeout_seconds: u64,
}

/// Fan-out limits for one activity dispatch.
#[derive(Clone, Debug)]
pub struct NotifyConfig {
    pub max_concurrency: usize,
    pub budget_seconds: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            budget_seconds: 15,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let http_addr = env_or("HTTP_ADDR", "0.0.0.0:8080");
        let _parsed_http_addr = SocketAddr::from_str(&http_addr)
            .map_err(|err| anyhow!("invalid HTTP_ADDR: {}", err))?;

        Ok(Self {
            http_addr,
            database_url: env_or_err("DATABASE_URL")?,
            db_max_connections: env_or_parse("DB_MAX_CONNECTIONS", "25")?,
            db_connect_timeout_seconds: env_or_parse("DB_CONNECT_TIMEOUT_SECONDS", "5")?,
            db_idle_timeout_seconds: env_or_parse("DB_IDLE_TIMEOUT_SECONDS", "300")?,
            db_max_lifetime_seconds: env_or_parse("DB_MAX_LIFETIME_SECONDS", "1800")?,
            paseto_access_key: env_key_32("PASETO_ACCESS_KEY")?,
            access_ttl_minutes: env_or_parse("ACCESS_TTL_MINUTES", "15")?,
            push: PushConfig::from_env()?,
            notify: NotifyConfig::from_env()?,
        })
    }
}

impl PushConfig {
    pub fn from_env() -> Result<Self> {
        let gateway_url = env_or("PUSH_GATEWAY_URL", DEFAULT_PUSH_GATEWAY_URL);
        let gateway_url = Url::parse(&gateway_url)
            .map_err(|err| anyhow!("invalid PUSH_GATEWAY_URL: {}", err))?;

        Ok(Self {
            gateway_url,
            server_key: env_opt("PUSH_GATEWAY_KEY"),
            timeout_seconds: env_or_parse("PUSH_TIMEOUT_SECONDS", "5")?,
        })
    }
}

impl NotifyConfig {
    pub fn from_env() -> Result<Self> {
        let max_concurrency: usize = env_or_parse("NOTIFY_MAX_CONCURRENCY", "8")?;
        Ok(Self {
            max_concurrency: max_concurrency.max(1),
            budget_seconds: env_or_parse("NOTIFY_BUDGET_SECONDS", "15")?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_err(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| anyhow!("missing required env var: {}", key))
}

/// Unset and blank values are both treated as absent.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_or_parse<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    let value = std::env::var(key).unwrap_or_else(|_| default.to_string());
    value
        .parse::<T>()
        .map_err(|err| anyhow!("invalid {}: {}", key, err))
}

fn env_key_32(key: &str) -> Result<[u8; 32]> {
    let value = env_or_err(key)?;
    decode_key_32(key, &value)
}

fn decode_key_32(key: &str, value: &str) -> Result<[u8; 32]> {
    let decoded = STANDARD
        .decode(value.as_bytes())
        .map_err(|err| anyhow!("invalid {}: {}", key, err))?;
    if decoded.len() != 32 {
        return Err(anyhow!("invalid {}: expected 32 bytes", key));
    }
    let mut key_bytes = [0u8; 32];
    key_bytes.copy_from_slice(&decoded);
    Ok(key_bytes)
}
