//! Error types for DiagnOIA
//!
//! Only collaborator failures live here. Conditions the assistant classifies
//! itself (unknown patient, ambiguous name, ...) are ordinary replies, see
//! [`crate::composer::ReplyKind`].

use thiserror::Error;

/// Result type alias using DiagnOIA's Error
pub type Result<T> = std::result::Result<T, Error>;

/// DiagnOIA error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Graph store errors (E100-E199)
    #[error("Graph query failed: {0}")]
    GraphQuery(String),

    #[error("Graph store unavailable ({status}): {body}. Check `diagnoia config get graph.uri`.")]
    GraphUnavailable { status: u16, body: String },

    // Model errors (E200-E299)
    #[error("Language model error: {0}. Check that Ollama is running with `diagnoia doctor`.")]
    LLMError(String),

    // Network errors (E300-E399)
    #[error("Network error: {0}. Check that the service is reachable.")]
    NetworkError(#[from] reqwest::Error),

    // Config errors (E600-E699)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Input errors (E800-E899)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::GraphQuery(_) => "E100",
            Self::GraphUnavailable { .. } => "E101",
            Self::LLMError(_) => "E200",
            Self::NetworkError(_) => "E300",
            Self::ConfigError(_) => "E600",
            Self::InvalidInput(_) => "E800",
            Self::Json(_) => "E801",
            Self::Other(_) | Self::Io(_) => "E9999",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::GraphUnavailable { status: 401, .. } => {
                Some("Set DIAGNOIA_NEO4J_PASSWORD or NEO4J_PASSWORD".to_string())
            }
            Self::GraphUnavailable { .. } | Self::GraphQuery(_) => {
                Some("diagnoia config get graph.uri".to_string())
            }
            Self::LLMError(_) => Some("diagnoia doctor".to_string()),
            Self::NetworkError(_) => Some("diagnoia doctor".to_string()),
            Self::ConfigError(_) => Some("diagnoia config list".to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::GraphQuery("x".into()).code(), "E100");
        assert_eq!(
            Error::GraphUnavailable {
                status: 503,
                body: String::new()
            }
            .code(),
            "E101"
        );
        assert_eq!(Error::LLMError("x".into()).code(), "E200");
        assert_eq!(Error::InvalidInput("x".into()).code(), "E800");
        assert_eq!(Error::Other("x".into()).code(), "E9999");
    }

    #[test]
    fn test_unauthorized_graph_suggests_password() {
        let err = Error::GraphUnavailable {
            status: 401,
            body: "unauthorized".into(),
        };
        assert!(err.suggestion().unwrap().contains("NEO4J_PASSWORD"));
    }

    #[test]
    fn test_error_display() {
        let err = Error::GraphQuery("Neo.ClientError.Statement.SyntaxError".into());
        assert!(err.to_string().contains("SyntaxError"));
        assert!(Error::InvalidInput("empty".into()).suggestion().is_none());
    }
}
