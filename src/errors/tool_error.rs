use serde::Serialize;
use thiserror::Error;

use super::{NetworkFailure, OllamaError, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    InvalidParams,
    NotFound,
    Timeout,
    Unavailable,
    Upstream,
    ResponseShape,
    Internal,
}

/// Any failure of a single tool invocation, from routing to response shaping.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Ollama(#[from] OllamaError),

    #[error("Unknown tool: {name}")]
    UnknownTool {
        name: String,
        suggestions: Vec<String>,
    },

    #[error("Image file not found: {path}")]
    ImageNotFound { path: String },

    #[error("Failed to read image file: {path}")]
    ImageUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Internal(String),
}

impl ToolError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn kind(&self) -> ToolErrorKind {
        match self {
            ToolError::Validation(_)
            | ToolError::UnknownTool { .. }
            | ToolError::ImageNotFound { .. }
            | ToolError::ImageUnreadable { .. } => ToolErrorKind::InvalidParams,
            ToolError::Ollama(OllamaError::Api { status, .. }) => match status {
                404 => ToolErrorKind::NotFound,
                503 => ToolErrorKind::Unavailable,
                _ => ToolErrorKind::Upstream,
            },
            ToolError::Ollama(OllamaError::Network { failure, .. }) => match failure {
                NetworkFailure::TimedOut => ToolErrorKind::Timeout,
                NetworkFailure::ConnectionFailed => ToolErrorKind::Unavailable,
            },
            ToolError::Ollama(OllamaError::ResponseShape { .. }) => ToolErrorKind::ResponseShape,
            ToolError::Internal(_) => ToolErrorKind::Internal,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ToolError::Validation(_) => "VALIDATION",
            ToolError::Ollama(OllamaError::Api { .. }) => "OLLAMA_API",
            ToolError::Ollama(OllamaError::Network {
                failure: NetworkFailure::TimedOut,
                ..
            }) => "TIMEOUT",
            ToolError::Ollama(OllamaError::Network { .. }) => "CONNECTION",
            ToolError::Ollama(OllamaError::ResponseShape { .. }) => "RESPONSE_SHAPE",
            ToolError::UnknownTool { .. } => "UNKNOWN_TOOL",
            ToolError::ImageNotFound { .. } | ToolError::ImageUnreadable { .. } => "IMAGE",
            ToolError::Internal(_) => "INTERNAL",
        }
    }
}
