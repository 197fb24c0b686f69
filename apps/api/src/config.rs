use anyhow::{Context, Result};

use crate::llm_client::ApiKey;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Optional credential seed. Without it the session starts locked until a key is
    /// supplied through the API.
    pub anthropic_api_key: Option<ApiKey>,
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
    /// Transport-level limit on a single Gateway round trip.
    pub llm_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let max_upload_bytes = upload_limit_bytes(parse_env("MAX_UPLOAD_MB", 25)?)?;

        Ok(Config {
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY").ok().and_then(ApiKey::new),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_upload_bytes,
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            anthropic_api_key: None,
            port: 8080,
            rust_log: "info".to_string(),
            max_upload_bytes: 25 * 1024 * 1024,
            llm_timeout_secs: 120,
        }
    }
}

fn upload_limit_bytes(megabytes: usize) -> Result<usize> {
    megabytes
        .checked_mul(1024 * 1024)
        .with_context(|| format!("MAX_UPLOAD_MB is too large: {megabytes}"))
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_falls_back_to_default_when_unset() {
        let value: u16 = parse_env("LCAT_ANALYST_TEST_UNSET_VAR", 8080).unwrap();
        assert_eq!(value, 8080);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("LCAT_ANALYST_TEST_BAD_PORT", "eighty");
        let result: Result<u16> = parse_env("LCAT_ANALYST_TEST_BAD_PORT", 8080);
        assert!(result.is_err());
    }

    #[test]
    fn test_upload_limit_converts_megabytes() {
        assert_eq!(upload_limit_bytes(25).unwrap(), 25 * 1024 * 1024);
    }

    #[test]
    fn test_upload_limit_rejects_overflow() {
        assert!(upload_limit_bytes(usize::MAX).is_err());
    }

    #[test]
    fn test_default_config_has_no_credential() {
        let config = Config::default();
        assert!(config.anthropic_api_key.is_none());
        assert_eq!(config.max_upload_bytes, 25 * 1024 * 1024);
    }
}
