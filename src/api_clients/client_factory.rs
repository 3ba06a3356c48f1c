use log::debug;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};

/// Build the HTTP client shared by every backend call.
///
/// JSON is the default content type; multipart requests override it per call.
pub fn create_http_client(config: &ApiConfig) -> AppResult<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    debug!(
        "Creating HTTP client for {} with {}s timeout",
        config.base_url, config.timeout_secs
    );

    Client::builder()
        .timeout(config.timeout())
        .default_headers(headers)
        .build()
        .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))
}
