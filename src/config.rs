use std::{env, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{Context, Result, anyhow};
use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub backend_url: String,
    /// Unset means no durable storage: the session lives in memory only.
    pub storage_dir: Option<PathBuf>,
    pub log_dir: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_admin_per_min: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let backend_url = lookup("BACKEND_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("BACKEND_URL must be set"))?;

        Ok(Self {
            server_addr: lookup("SERVER_ADDR").unwrap_or_else(|| "127.0.0.1:3000".to_string()),
            backend_url,
            storage_dir: lookup("STORAGE_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            request_timeout: Duration::from_secs(parse_var(
                "REQUEST_TIMEOUT_SECS",
                &raw("REQUEST_TIMEOUT_SECS", "30"),
            )?),
            connect_timeout: Duration::from_secs(parse_var(
                "CONNECT_TIMEOUT_SECS",
                &raw("CONNECT_TIMEOUT_SECS", "10"),
            )?),
            rate_login_per_min: parse_var("RATE_LOGIN_PER_MIN", &raw("RATE_LOGIN_PER_MIN", "60"))?,
            rate_admin_per_min: parse_var("RATE_ADMIN_PER_MIN", &raw("RATE_ADMIN_PER_MIN", "30"))?,
        })
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("{key} has an invalid value: {raw:?}"))
}
