mod config_error;
mod mcp_error;
mod ollama_error;
mod tool_error;
mod validation_error;

pub use config_error::{ConfigError, ServerError};
pub use mcp_error::{ErrorCode, McpError};
pub use ollama_error::{NetworkFailure, OllamaError};
pub use tool_error::{ToolError, ToolErrorKind};
pub use validation_error::{FieldIssue, IssueReason, ModelNameViolation, ValidationError};
