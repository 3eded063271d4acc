use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::ranking::paginator::PAGE_SIZE_OPTIONS;

/// Application configuration loaded from environment variables.
/// Startup fails if `HR_API_BASE` is missing or a numeric variable does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the external HR backend, e.g. `https://hr.example.com/api`.
    pub hr_api_base: String,
    pub port: u16,
    pub rust_log: String,
    /// Fixed timeout for the CV upload path. No other backend call has one.
    pub upload_timeout: Duration,
    pub default_page_size: usize,
    /// Where `POST /api/v1/ranking/export/save` writes reports. Saving is disabled when unset.
    pub export_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let default_page_size = parse_env("DEFAULT_PAGE_SIZE", 10usize)?;
        if !PAGE_SIZE_OPTIONS.contains(&default_page_size) {
            bail!("DEFAULT_PAGE_SIZE must be one of {PAGE_SIZE_OPTIONS:?}, got {default_page_size}");
        }

        Ok(Config {
            hr_api_base: require_env("HR_API_BASE")?
                .trim_end_matches('/')
                .to_string(),
            port: parse_env("PORT", 8080u16)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            upload_timeout: Duration::from_secs(parse_env("UPLOAD_TIMEOUT_SECS", 30u64)?),
            default_page_size,
            export_dir: std::env::var("EXPORT_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
