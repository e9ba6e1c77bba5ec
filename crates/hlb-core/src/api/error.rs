use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized: {}", .0.as_deref().unwrap_or("credentials rejected"))]
    Unauthorized(Option<String>),

    #[error("Access denied: {}", .0.as_deref().unwrap_or("forbidden"))]
    AccessDenied(Option<String>),

    #[error("Resource not found: {}", .0.as_deref().unwrap_or("not found"))]
    NotFound(Option<String>),

    #[error("Request rejected (status {}): {}", .status, .detail.as_deref().unwrap_or("no detail"))]
    Rejected { status: u16, detail: Option<String> },

    #[error("Rate limited: {}", .0.as_deref().unwrap_or("please wait before retrying"))]
    RateLimited(Option<String>),

    /// `message` is the detail when the server sent one, else the (truncated) body.
    #[error("Server error (status {status}): {message}")]
    ServerError {
        status: u16,
        detail: Option<String>,
        message: String,
    },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::InvalidResponse(err.to_string())
        } else {
            ApiError::NetworkError(err.to_string())
        }
    }
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    /// Pull the human-readable `detail` out of an error body.
    ///
    /// The API answers with `{"detail": "..."}` for handled errors and with
    /// `{"detail": [{"msg": "...", ...}, ...]}` for request validation
    /// failures. Anything else yields `None`.
    pub fn parse_detail(body: &str) -> Option<String> {
        let value: Value = serde_json::from_str(body).ok()?;
        match value.get("detail")? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Array(items) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(messages.join("; "))
                }
            }
            _ => None,
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let detail = Self::parse_detail(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized(detail),
            403 => ApiError::AccessDenied(detail),
            404 => ApiError::NotFound(detail),
            429 => ApiError::RateLimited(detail),
            code @ 400..=499 => ApiError::Rejected { status: code, detail },
            code @ 500..=599 => ApiError::ServerError {
                status: code,
                message: detail.clone().unwrap_or_else(|| Self::truncate_body(body)),
                detail,
            },
            _ => ApiError::InvalidResponse(format!(
                "Status {}: {}",
                status,
                Self::truncate_body(body)
            )),
        }
    }

    /// The server-supplied explanation, if the server sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized(detail)
            | ApiError::AccessDenied(detail)
            | ApiError::NotFound(detail)
            | ApiError::RateLimited(detail)
            | ApiError::Rejected { detail, .. }
            | ApiError::ServerError { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// True when the request never produced an HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::NetworkError(_))
    }

    /// Message to show the user: the server's detail when present, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }
}
