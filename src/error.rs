// Client-side API error types
use std::collections::HashMap;

/// Normalized error for every vault API interaction, with client-friendly messages
#[derive(Debug, Clone)]
pub enum ApiError {
    // Schema validation failed locally; no network call was made
    Validation {
        message: String,
        field_errors: HashMap<String, String>,
    },

    // Non-2xx response received from the API
    Http { status: u16, message: String },

    // 401 while holding a session; handled globally by the session-expired hook
    SessionExpired,

    // No response received at all
    Network(String),
}

impl ApiError {
    /// HTTP status that produced this error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Validation { .. } => None,
            ApiError::Http { status, .. } => Some(*status),
            ApiError::SessionExpired => Some(401),
            ApiError::Network(_) => None,
        }
    }

    /// User-facing error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation { message, .. } => message,
            ApiError::Http { message, .. } => message,
            ApiError::SessionExpired => "Unauthorized: Please log in again.",
            ApiError::Network(message) => message,
        }
    }

    /// Stable error code for programmatic handling and JSON CLI output
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::Http { status, .. } => match status {
                400 => "BAD_REQUEST",
                403 => "FORBIDDEN",
                404 => "NOT_FOUND",
                409 => "CONFLICT",
                500 => "SERVER_ERROR",
                _ => "HTTP_ERROR",
            },
            ApiError::SessionExpired => "SESSION_EXPIRED",
            ApiError::Network(_) => "NETWORK_ERROR",
        }
    }

    /// Per-field messages from a failed validation, if this is one
    pub fn field_errors(&self) -> Option<&HashMap<String, String>> {
        match self {
            ApiError::Validation { field_errors, .. } => Some(field_errors),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation { .. })
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired)
    }
}

// Static constructor methods
impl ApiError {
    pub fn validation(message: impl Into<String>, field_errors: HashMap<String, String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            field_errors,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        ApiError::Network(message.into())
    }

    /// The one status-to-message mapping for the whole client.
    ///
    /// Every resource call funnels its non-2xx response through here: a
    /// server-supplied message wins, otherwise the status template, otherwise
    /// a generic per-action fallback. 401 becomes `SessionExpired` so the
    /// transport can route it to the global hook instead of an inline toast.
    pub fn from_status(status: u16, server_message: Option<String>, action: &str) -> Self {
        if status == 401 {
            return ApiError::SessionExpired;
        }

        let message = match status {
            400 => server_message.unwrap_or_else(|| "Bad request".to_string()),
            403 => "Forbidden: You're not supposed to be here".to_string(),
            404 => server_message
                .unwrap_or_else(|| "Not found: The requested resource could not be found.".to_string()),
            409 => server_message
                .unwrap_or_else(|| "Conflict: Duplicate or invalid data.".to_string()),
            500 => "Server error: Please try again later.".to_string(),
            _ => server_message
                .unwrap_or_else(|| format!("An error occurred during {}.", action)),
        };

        ApiError::Http { status, message }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() || err.is_request() {
            ApiError::Network("Network error: Unable to reach the server.".to_string())
        } else {
            ApiError::Network(format!("Network error: {}", err))
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_templates() {
        let err = ApiError::from_status(403, None, "deleting departments");
        assert_eq!(err.message(), "Forbidden: You're not supposed to be here");
        assert_eq!(err.error_code(), "FORBIDDEN");

        let err = ApiError::from_status(500, Some("boom".to_string()), "fetching users");
        // 500 never leaks the server message
        assert_eq!(err.message(), "Server error: Please try again later.");
    }

    #[test]
    fn test_server_message_wins_on_conflict() {
        let err = ApiError::from_status(409, Some("email already registered".to_string()), "adding users");
        assert_eq!(err.message(), "email already registered");
        assert_eq!(err.status_code(), Some(409));
    }

    #[test]
    fn test_unknown_status_uses_action_label() {
        let err = ApiError::from_status(418, None, "fetching stats");
        assert_eq!(err.message(), "An error occurred during fetching stats.");
    }

    #[test]
    fn test_401_is_session_expired() {
        let err = ApiError::from_status(401, Some("ignored".to_string()), "anything");
        assert!(err.is_session_expired());
        assert_eq!(err.status_code(), Some(401));
    }
}
