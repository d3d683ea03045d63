use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkFailure {
    TimedOut,
    ConnectionFailed,
}

/// Failures raised by the HTTP execution engine.
///
/// Every variant keeps enough context for the operator log (status and body,
/// the underlying transport error, the schema diagnostic). None of that context
/// is meant for the caller; see `utils::tool_errors::format_tool_error`.
#[derive(Debug, Error)]
pub enum OllamaError {
    #[error("Ollama API error: {status}")]
    Api { status: u16, body: String },

    #[error("{message}")]
    Network {
        failure: NetworkFailure,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("{message}")]
    ResponseShape { message: String, detail: String },
}

impl OllamaError {
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    pub fn timed_out(after: Duration) -> Self {
        Self::Network {
            failure: NetworkFailure::TimedOut,
            message: format!("Request timed out after {} ms", after.as_millis()),
            source: None,
        }
    }

    pub fn connection_failed(source: reqwest::Error) -> Self {
        Self::Network {
            failure: NetworkFailure::ConnectionFailed,
            message: "Failed to connect to Ollama".to_string(),
            source: Some(source),
        }
    }

    /// Classifies a transport error that escaped the tier timer.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Network {
                failure: NetworkFailure::TimedOut,
                message: "Request timed out".to_string(),
                source: Some(err),
            };
        }
        Self::connection_failed(err)
    }

    pub fn response_shape(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::ResponseShape {
            message: message.into(),
            detail: detail.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Network {
                failure: NetworkFailure::TimedOut,
                ..
            }
        )
    }
}
