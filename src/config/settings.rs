use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{DEFAULT_API_TIMEOUT_SECS, DEFAULT_API_URL};
use crate::error::AppError;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppSettings {
    pub app: AppConfig,
    pub api: ApiConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub environment: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Backend root, always ending in `/` so endpoint paths join beneath it.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, AppError> {
        if timeout_secs == 0 {
            return Err(AppError::ConfigError(
                "CATALOG_API_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            timeout_secs,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
        }
    }
}

impl AppSettings {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // App config
        let app_name = lookup("APP_NAME").unwrap_or_else(|| "catalog-console".to_string());
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        // Backend config
        let base_url = lookup("CATALOG_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let timeout_secs = lookup("CATALOG_API_TIMEOUT_SECS")
            .unwrap_or_else(|| DEFAULT_API_TIMEOUT_SECS.to_string())
            .trim()
            .parse::<u64>()
            .map_err(|_| {
                AppError::ConfigError(
                    "CATALOG_API_TIMEOUT_SECS must be a valid number of seconds".to_string(),
                )
            })?;

        Ok(Self {
            app: AppConfig {
                name: app_name,
                environment,
            },
            api: ApiConfig::new(&base_url, timeout_secs)?,
        })
    }
}

fn normalize_base_url(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed)
        .map_err(|e| AppError::ConfigError(format!("CATALOG_API_URL is not a valid URL: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::ConfigError(format!(
            "CATALOG_API_URL must use http or https, got '{}'",
            url.scheme()
        )));
    }

    let mut normalized = url.to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Ok(normalized)
}
