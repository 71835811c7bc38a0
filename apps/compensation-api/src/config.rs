use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::compensation::models::DEFAULT_BASE_SALARY;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Base salary used when an estimate request omits `base_salary`.
    pub default_base_salary: f64,
    /// Exact origin for CORS. `None` keeps CORS permissive.
    pub cors_allowed_origin: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            default_base_salary: DEFAULT_BASE_SALARY,
            cors_allowed_origin: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        let default_base_salary: f64 =
            env_or("DEFAULT_BASE_SALARY", defaults.default_base_salary)?;
        if !default_base_salary.is_finite() {
            bail!("DEFAULT_BASE_SALARY must be a finite number");
        }

        Ok(Config {
            port: env_or("PORT", defaults.port).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            default_base_salary,
            cors_allowed_origin: std::env::var("CORS_ALLOWED_ORIGIN")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_uses_default_when_unset() {
        let port: u16 = env_or("COMPENSATION_API_TEST_UNSET_PORT", 9090).unwrap();
        assert_eq!(port, 9090);
    }

    #[test]
    fn test_env_or_rejects_garbage() {
        std::env::set_var("COMPENSATION_API_TEST_BAD_PORT", "eighty");
        let result: Result<u16> = env_or("COMPENSATION_API_TEST_BAD_PORT", 8080);
        assert!(result.is_err());
    }

    #[test]
    fn test_env_or_parses_float() {
        std::env::set_var("COMPENSATION_API_TEST_SALARY", " 120000.5 ");
        let salary: f64 = env_or("COMPENSATION_API_TEST_SALARY", 0.0).unwrap();
        assert_eq!(salary, 120_000.5);
    }

    #[test]
    fn test_from_env_rejects_non_finite_default_base_salary() {
        std::env::set_var("DEFAULT_BASE_SALARY", "inf");
        let result = Config::from_env();
        std::env::remove_var("DEFAULT_BASE_SALARY");

        let err = result.unwrap_err();
        assert!(err.to_string().contains("DEFAULT_BASE_SALARY"));
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_base_salary, 100_000.0);
        assert!(config.cors_allowed_origin.is_none());
    }
}
