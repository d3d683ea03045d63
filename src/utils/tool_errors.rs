use serde_json::{json, Value};
use std::error::Error as StdError;

use crate::constants::limits::LOG_BODY_MAX_BYTES;
use crate::errors::{NetworkFailure, OllamaError, ToolError};
use crate::utils::redact::redact_text;
use crate::utils::suggest::suggest;

const UNEXPECTED: &str = "Unexpected error";

pub fn unknown_tool_error(name: &str, known: &[String]) -> ToolError {
    let suggestions = if name.trim().is_empty() {
        Vec::new()
    } else {
        suggest(name, known, 3)
    };
    ToolError::UnknownTool {
        name: name.to_string(),
        suggestions,
    }
}

/// Caller-facing message for any tool failure.
///
/// Never empty and never echoes backend bodies, transport errors or schema
/// diagnostics; those go to the operator log through [`error_details`].
pub fn format_tool_error(error: &ToolError) -> String {
    match error {
        ToolError::Validation(validation) => validation.to_string(),
        ToolError::Ollama(ollama) => format_ollama_error(ollama),
        ToolError::UnknownTool { name, suggestions } => {
            let mut out = format!("Unknown tool: {}", name);
            if !suggestions.is_empty() {
                out.push_str(&format!(". Did you mean: {}?", suggestions.join(", ")));
            }
            out
        }
        other => {
            let message = other.to_string();
            if message.trim().is_empty() {
                UNEXPECTED.to_string()
            } else {
                message
            }
        }
    }
}

fn format_ollama_error(error: &OllamaError) -> String {
    match error {
        OllamaError::Api { status, .. } => match status {
            404 => "Model not found. Use ollama_list to see available models.".to_string(),
            400 => "Bad request. Please check your input parameters.".to_string(),
            500 => "Ollama server error. Please check if the model is loaded correctly.".to_string(),
            503 => "Ollama service unavailable. Please try again later.".to_string(),
            other => format!("Ollama API error (status: {})", other),
        },
        OllamaError::Network {
            failure: NetworkFailure::TimedOut,
            ..
        } => "Request timed out. The operation may take longer than expected.".to_string(),
        OllamaError::Network {
            failure: NetworkFailure::ConnectionFailed,
            ..
        } => "Connection error: could not reach the Ollama server. Check that it is running and OLLAMA_BASE_URL is correct."
            .to_string(),
        OllamaError::ResponseShape { .. } => {
            "Unexpected response from Ollama. The API may have changed.".to_string()
        }
    }
}

fn source_chain(error: &dyn StdError) -> Vec<String> {
    let mut chain = Vec::new();
    let mut current = error.source();
    while let Some(cause) = current {
        chain.push(redact_text(&cause.to_string(), LOG_BODY_MAX_BYTES));
        current = cause.source();
    }
    chain
}

/// Operator-log view of a failure: code, kind and the context the caller
/// never sees, with credentials masked and bodies clipped.
pub fn error_details(error: &ToolError) -> Value {
    let mut details = json!({
        "code": error.code(),
        "kind": error.kind(),
        "message": redact_text(&error.to_string(), LOG_BODY_MAX_BYTES),
    });
    if let ToolError::Ollama(ollama) = error {
        if let Some(status) = ollama.status() {
            details["status"] = json!(status);
        }
        if ollama.is_timeout() {
            details["timed_out"] = json!(true);
        }
    }
    match error {
        ToolError::Ollama(OllamaError::Api { body, .. }) => {
            details["body"] = json!(redact_text(body, LOG_BODY_MAX_BYTES));
        }
        ToolError::Ollama(OllamaError::ResponseShape { detail, .. }) => {
            details["detail"] = json!(redact_text(detail, LOG_BODY_MAX_BYTES));
        }
        ToolError::Validation(validation) => {
            details["fields"] = json!(validation.fields());
        }
        ToolError::UnknownTool { suggestions, .. } => {
            details["did_you_mean"] = json!(suggestions);
        }
        _ => {}
    }
    let chain = source_chain(error);
    if !chain.is_empty() {
        details["causes"] = json!(chain);
    }
    details
}
