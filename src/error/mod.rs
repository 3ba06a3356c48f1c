use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Serialize, Clone, PartialEq)]
pub enum AppError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    /// Transport and backend failures, the ones views reduce to a generic notification.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            AppError::NetworkError(_) | AppError::ExternalServiceError(_) | AppError::InvalidResponse(_)
        )
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::IoError(_) => "IO_ERROR",
            AppError::ConfigError(_) => "CONFIG_ERROR",
            AppError::NetworkError(_) => "NETWORK_ERROR",
            AppError::ExternalServiceError(_) => "EXTERNAL_SERVICE_ERROR",
            AppError::InvalidResponse(_) => "INVALID_RESPONSE_ERROR",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::InvalidArgument(_) => "INVALID_ARGUMENT_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidResponse(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::InvalidResponse(err.to_string())
        } else if let Some(status) = err.status() {
            AppError::ExternalServiceError(format!("HTTP {}: {}", status.as_u16(), err))
        } else if err.is_builder() {
            AppError::InternalError(format!("Failed to build request: {}", err))
        } else {
            AppError::NetworkError(err.to_string())
        }
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::ConfigError(format!("Invalid URL: {}", err))
    }
}

// A serializable version of AppError for machine-readable CLI output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializableError {
    pub code: String,
    pub message: String,
}

impl From<&AppError> for SerializableError {
    fn from(error: &AppError) -> Self {
        SerializableError {
            code: error.code().to_string(),
            message: error.to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
