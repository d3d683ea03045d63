use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::errors::ToolError;
use crate::mcp::catalog::catalog_tool_names;
use crate::services::endpoint::Operation;
use crate::services::logger::{with_trace, Logger};
use crate::utils::tool_errors::{error_details, format_tool_error, unknown_tool_error};

/// Implemented by each manager. `args` is the raw, unvalidated `arguments`
/// object; handlers validate before any request is built.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn handle(&self, operation: Operation, args: Value) -> Result<String, ToolError>;
}

/// Text returned to the protocol layer for one `tools/call`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallOutcome {
    pub text: String,
    pub is_error: bool,
}

#[derive(Clone)]
pub struct ToolExecutor {
    logger: Logger,
    handlers: Arc<HashMap<Operation, Arc<dyn ToolHandler>>>,
}

impl ToolExecutor {
    pub fn new(logger: Logger, handlers: HashMap<Operation, Arc<dyn ToolHandler>>) -> Self {
        Self {
            logger: logger.child("executor"),
            handlers: Arc::new(handlers),
        }
    }

    pub fn has_handler(&self, operation: Operation) -> bool {
        self.handlers.contains_key(&operation)
    }

    /// Routes by tool name. Unknown names fail before any handler runs.
    pub async fn execute(&self, tool: &str, args: Value) -> Result<String, ToolError> {
        let Some(operation) = Operation::from_tool_name(tool) else {
            return Err(unknown_tool_error(tool, &catalog_tool_names()));
        };
        let Some(handler) = self.handlers.get(&operation) else {
            return Err(ToolError::internal(format!(
                "No handler registered for {}",
                operation.tool_name()
            )));
        };
        handler.handle(operation, args).await
    }

    /// Executes and renders a call, logging full failure context for the
    /// operator while the caller gets only the formatted message.
    pub async fn call(&self, tool: &str, args: Value) -> ToolCallOutcome {
        let trace_id = uuid::Uuid::new_v4().to_string();
        with_trace(trace_id.clone(), self.traced_call(tool, args, trace_id)).await
    }

    async fn traced_call(&self, tool: &str, args: Value, trace_id: String) -> ToolCallOutcome {
        let started = Instant::now();
        self.logger.debug("call", Some(&json!({"tool": tool})));

        match self.execute(tool, args).await {
            Ok(text) => {
                self.logger.info(
                    "ok",
                    Some(&json!({
                        "tool": tool,
                        "duration_ms": started.elapsed().as_millis() as u64,
                    })),
                );
                ToolCallOutcome {
                    text,
                    is_error: false,
                }
            }
            Err(err) => {
                let mut meta = error_details(&err);
                meta["tool"] = json!(tool);
                meta["trace_id"] = json!(trace_id);
                meta["duration_ms"] = json!(started.elapsed().as_millis() as u64);
                match &err {
                    ToolError::Validation(_) | ToolError::UnknownTool { .. } => {
                        self.logger.warn("rejected", Some(&meta))
                    }
                    _ => self.logger.error("failed", Some(&meta)),
                }
                ToolCallOutcome {
                    text: format!("Error: {}", format_tool_error(&err)),
                    is_error: true,
                }
            }
        }
    }
}
