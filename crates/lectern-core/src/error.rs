//! Error types for lectern

use thiserror::Error;

/// Result type alias using LecternError
pub type Result<T> = std::result::Result<T, LecternError>;

/// Error type alias for convenience
pub type Error = LecternError;

/// Failure classes for generation backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendFault {
    /// Rejected credentials or missing API key
    Auth,
    /// Connectivity problem or timed-out request
    Network,
    /// Wrong base URL or unknown model
    NotFound,
    /// Quota or request-rate limit reached
    RateLimited,
    /// The service reported an internal error
    Server,
    /// Anything the classifier does not recognize
    Other,
}

impl BackendFault {
    /// Classify a backend failure from its error text.
    ///
    /// Substring matching over the lowercased message, checked in
    /// precedence order: auth before network before not-found before
    /// rate limit before server errors.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("unauthorized")
            || lower.contains("401")
            || lower.contains("api key")
            || lower.contains("api_key")
            || lower.contains("authentication")
        {
            Self::Auth
        } else if lower.contains("connection")
            || lower.contains("timeout")
            || lower.contains("timed out")
            || lower.contains("network")
        {
            Self::Network
        } else if lower.contains("404") || lower.contains("not found") {
            Self::NotFound
        } else if lower.contains("429") || lower.contains("quota") || lower.contains("rate limit") {
            Self::RateLimited
        } else if lower.contains("500") {
            Self::Server
        } else {
            Self::Other
        }
    }

    /// Remediation hint for this failure class, when one is known
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Auth => Some("check that the API key is valid and has access to the model"),
            Self::Network => Some("network connectivity problem or the service timed out"),
            Self::NotFound => Some("check the base URL and model name"),
            Self::RateLimited => Some("request quota or rate limit reached, retry later"),
            Self::Server => Some("the service reported an internal error"),
            Self::Other => None,
        }
    }
}

/// Main error type for lectern
#[derive(Debug, Error)]
pub enum LecternError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Generation request failed: {message}")]
    Generation {
        kind: BackendFault,
        message: String,
    },

    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl LecternError {
    /// Build a classified generation error, annotating the message with
    /// the remediation hint for its fault class.
    pub fn generation(message: impl Into<String>) -> Self {
        let message = message.into();
        let kind = BackendFault::classify(&message);
        let message = match kind.hint() {
            Some(hint) => format!("{} (hint: {})", message, hint),
            None => message,
        };
        Self::Generation { kind, message }
    }

    /// Fault class when this is a generation error
    pub fn backend_fault(&self) -> Option<BackendFault> {
        match self {
            Self::Generation { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_auth() {
        assert_eq!(
            BackendFault::classify("HTTP 401 Unauthorized"),
            BackendFault::Auth
        );
        assert_eq!(
            BackendFault::classify("invalid API key provided"),
            BackendFault::Auth
        );
    }

    #[test]
    fn test_classify_network() {
        assert_eq!(
            BackendFault::classify("connection refused"),
            BackendFault::Network
        );
        assert_eq!(
            BackendFault::classify("operation timed out"),
            BackendFault::Network
        );
    }

    #[test]
    fn test_classify_not_found_and_rate_limit() {
        assert_eq!(
            BackendFault::classify("model not found"),
            BackendFault::NotFound
        );
        assert_eq!(
            BackendFault::classify("HTTP 429 Too Many Requests"),
            BackendFault::RateLimited
        );
        assert_eq!(
            BackendFault::classify("quota exceeded for project"),
            BackendFault::RateLimited
        );
    }

    #[test]
    fn test_classify_precedence_auth_over_server() {
        // A 401 with a verbose body must not be mistaken for a server error
        assert_eq!(
            BackendFault::classify("401 returned; internal trace id 500123"),
            BackendFault::Auth
        );
    }

    #[test]
    fn test_classify_unrecognized() {
        assert_eq!(
            BackendFault::classify("something odd happened"),
            BackendFault::Other
        );
        assert!(BackendFault::Other.hint().is_none());
    }

    #[test]
    fn test_generation_error_carries_hint() {
        let err = LecternError::generation("HTTP 429 Too Many Requests");
        assert_eq!(err.backend_fault(), Some(BackendFault::RateLimited));
        assert!(err.to_string().contains("hint:"));
        assert!(err.to_string().contains("rate limit"));
    }

    #[test]
    fn test_generation_error_without_hint() {
        let err = LecternError::generation("something odd happened");
        assert_eq!(err.backend_fault(), Some(BackendFault::Other));
        assert!(!err.to_string().contains("hint:"));
    }
}
