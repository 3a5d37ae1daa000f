//! Error types for movie-browser
//!
//! Covers the movie API client, the persisted state file and configuration.

use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for movie-browser operations
#[derive(Error, Debug)]
pub enum MovieError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Server returned {status} for {url}")]
    Http {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Persisted state is malformed: {0}")]
    MalformedPersistedState(String),

    #[error("Invalid external id '{0}' (expected tt followed by digits)")]
    InvalidExternalId(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias for movie-browser operations
pub type Result<T> = std::result::Result<T, MovieError>;

impl MovieError {
    /// The requested movie or page does not exist on the server
    pub fn is_not_found(&self) -> bool {
        matches!(self, MovieError::NotFound(_))
    }

    /// The request never produced an HTTP response (connection, timeout, ...)
    pub fn is_transport(&self) -> bool {
        matches!(self, MovieError::Transport { .. })
    }

    /// Short text suitable for the one-line status bar
    pub fn status_text(&self) -> String {
        match self {
            MovieError::Transport { .. } => "Network error, showing previous results".to_string(),
            MovieError::Http { status, .. } => format!("Server error ({})", status.as_u16()),
            MovieError::NotFound(what) => format!("Not found: {}", what),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        let err = MovieError::NotFound("tt9999999".to_string());
        assert!(err.is_not_found());
        assert!(!err.is_transport());
        assert_eq!(err.status_text(), "Not found: tt9999999");
    }

    #[test]
    fn test_http_status_text() {
        let err = MovieError::Http {
            status: reqwest::StatusCode::BAD_GATEWAY,
            url: "http://localhost/movies/search".to_string(),
        };
        assert_eq!(err.status_text(), "Server error (502)");
        assert!(err.to_string().contains("502"));
    }
}
