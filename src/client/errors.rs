use thiserror::Error;

/// Every failure the console can surface. Nothing here is fatal: each variant
/// resolves to a message and a return to an interactive state.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),
    /// Client-side check failed; no request was sent.
    #[error("{0}")]
    Validation(String),
    /// The same action set is already in flight.
    #[error("{0}")]
    Busy(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {}", .message.as_deref().unwrap_or(.detail.as_str()))]
    Http {
        status: u16,
        /// `message` from the JSON error envelope, shown verbatim when present.
        message: Option<String>,
        /// Sanitized raw body, for logs and diagnostics only.
        detail: String,
    },
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
}

impl AppError {
    /// HTTP status when the failure came from a server response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Server-provided message from the error envelope, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Http {
                message: Some(message),
                ..
            } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Text to show the operator: the server message verbatim, the local
    /// validation text, or `fallback` for everything else.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(message) | Self::Busy(message) => message.clone(),
            _ => self
                .server_message()
                .map_or_else(|| fallback.to_string(), str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn user_message_prefers_server_message() {
        let err = AppError::Http {
            status: 409,
            message: Some("Role name already exists".to_string()),
            detail: "{\"message\":\"Role name already exists\"}".to_string(),
        };
        assert_eq!(
            err.user_message("Failed to create role"),
            "Role name already exists"
        );
    }

    #[test]
    fn user_message_falls_back_without_envelope() {
        let err = AppError::Http {
            status: 502,
            message: None,
            detail: "Bad Gateway".to_string(),
        };
        assert_eq!(err.user_message("Failed to load users"), "Failed to load users");
        assert_eq!(
            AppError::Network("connection refused".to_string()).user_message("fallback"),
            "fallback"
        );
    }

    #[test]
    fn user_message_keeps_validation_text() {
        let err = AppError::Validation("Priority must be between 1 and 100.".to_string());
        assert_eq!(
            err.user_message("Failed to create role"),
            "Priority must be between 1 and 100."
        );
    }

    #[test]
    fn http_display_uses_message_then_detail() {
        let with_message = AppError::Http {
            status: 400,
            message: Some("Invalid verification code".to_string()),
            detail: String::new(),
        };
        assert_eq!(
            with_message.to_string(),
            "Request failed (400): Invalid verification code"
        );

        let without = AppError::Http {
            status: 500,
            message: None,
            detail: "Request failed.".to_string(),
        };
        assert_eq!(without.to_string(), "Request failed (500): Request failed.");
        assert_eq!(without.status(), Some(500));
    }
}
