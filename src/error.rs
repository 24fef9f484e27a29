//! Error type shared by the configuration loader, the HTTP client and the
//! tool dispatcher.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MealieError {
    /// Missing or malformed configuration. Fatal at startup.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A tool argument failed local shape validation; no request was sent.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Request timeout for {method} {path}")]
    Timeout { method: String, path: String },

    #[error("Connection error for {method} {path}: {source}")]
    Network {
        method: String,
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// Mealie answered with a non-success status.
    #[error("API error for {method} {path}: {detail} (Status Code: {status})")]
    Api {
        method: String,
        path: String,
        status: u16,
        detail: String,
    },

    #[error("Invalid response from Mealie: {0}")]
    Decode(#[from] serde_json::Error),
}

impl MealieError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Remote HTTP status, present only for [`MealieError::Api`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short machine-readable tag used in tool error replies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::Timeout { .. } => "timeout",
            Self::Network { .. } => "network",
            Self::Api { .. } => "api",
            Self::Decode(_) => "decode",
        }
    }
}

pub type Result<T> = std::result::Result<T, MealieError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_exposes_status_and_message() {
        let err = MealieError::Api {
            method: "GET".to_string(),
            path: "/api/recipes/missing".to_string(),
            status: 404,
            detail: "Recipe not found".to_string(),
        };

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.kind(), "api");
        assert_eq!(
            err.to_string(),
            "API error for GET /api/recipes/missing: Recipe not found (Status Code: 404)"
        );
    }

    #[test]
    fn non_api_errors_have_no_status() {
        let err = MealieError::Timeout {
            method: "GET".to_string(),
            path: "/api/foods".to_string(),
        };
        assert_eq!(err.status(), None);
        assert_eq!(err.kind(), "timeout");
        assert_eq!(MealieError::config("x").kind(), "config");
        assert_eq!(MealieError::invalid_argument("x").kind(), "invalid_argument");
    }
}
