use log::debug;
use serde_json::Value;

use crate::error::AppError;

/// Map a non-2xx backend response to an AppError.
///
/// The backend sometimes answers with `{ "message": ... }` or `{ "error": ... }`;
/// that text is used when present, the raw body otherwise.
pub fn map_backend_error(status_code: u16, response_text: &str) -> AppError {
    debug!("Mapping backend error: status={}, response={}", status_code, response_text);

    let detail = serde_json::from_str::<Value>(response_text)
        .ok()
        .and_then(|json| {
            json["message"]
                .as_str()
                .or_else(|| json["error"]["message"].as_str())
                .or_else(|| json["error"].as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| response_text.trim().to_string());

    let detail = if detail.is_empty() {
        "no response body".to_string()
    } else {
        detail
    };

    match status_code {
        400 => AppError::ExternalServiceError(format!("Bad request: {}", detail)),
        401 | 403 => AppError::ExternalServiceError(format!("Access denied: {}", detail)),
        404 => AppError::ExternalServiceError(format!("Endpoint not found: {}", detail)),
        500..=599 => AppError::ExternalServiceError(format!("Server error ({}): {}", status_code, detail)),
        _ => AppError::ExternalServiceError(format!("Unexpected status ({}): {}", status_code, detail)),
    }
}
