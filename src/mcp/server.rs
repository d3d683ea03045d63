use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::mpsc;

use crate::app::App;
use crate::constants::server::{PROTOCOL_VERSION, SERVER_NAME, SERVER_VERSION};
use crate::errors::{McpError, ServerError};
use crate::mcp::catalog::list_tools;
use crate::mcp::protocol::{JsonRpcRequest, JsonRpcResponse};
use crate::services::logger::Logger;

const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC dispatcher for the MCP stdio transport.
///
/// Cheap to clone; every request line is handled on its own task so a slow
/// pull never blocks a concurrent `tools/list`.
#[derive(Clone)]
pub struct McpServer {
    app: Arc<App>,
    logger: Logger,
}

impl McpServer {
    pub fn new(app: Arc<App>) -> Self {
        let logger = app.logger.child("mcp");
        Self { app, logger }
    }

    pub fn from_env() -> Result<Self, ServerError> {
        Ok(Self::new(Arc::new(App::initialize()?)))
    }

    fn handle_initialize(&self, params: &Value) -> Value {
        if let Some(client) = params.get("clientInfo") {
            self.logger.info("initialize", Some(client));
        }
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {"tools": {}},
            "serverInfo": {"name": SERVER_NAME, "version": SERVER_VERSION},
        })
    }

    async fn handle_tools_call(&self, params: &Value) -> Result<Value, McpError> {
        let name = params
            .get("name")
            .and_then(|v| v.as_str())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;
        let args = params.get("arguments").cloned().unwrap_or(Value::Null);
        let outcome = self.app.tool_executor.call(name, args).await;
        let mut result = json!({
            "content": [{"type": "text", "text": outcome.text}],
        });
        if outcome.is_error {
            result["isError"] = Value::Bool(true);
        }
        Ok(result)
    }

    /// `None` for notifications and for anything else that must not be answered.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.clone() else {
            if !request.method.starts_with("notifications/") {
                self.logger.debug(
                    "ignoring request without id",
                    Some(&json!({"method": request.method})),
                );
            }
            return None;
        };
        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::failure(id, McpError::invalid_request()));
        }
        let result = match request.method.as_str() {
            "initialize" => Ok(self.handle_initialize(&request.params)),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(list_tools()),
            "tools/call" => self.handle_tools_call(&request.params).await,
            other => Err(McpError::method_not_found(other)),
        };
        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(err) => JsonRpcResponse::failure(id, err),
        })
    }

    /// Handles one raw line and returns the serialized response, if any.
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        let response = match serde_json::from_str::<Value>(trimmed) {
            Err(_) => Some(JsonRpcResponse::failure(Value::Null, McpError::parse_error())),
            Ok(parsed) => {
                let id = parsed.get("id").cloned().unwrap_or(Value::Null);
                match serde_json::from_value::<JsonRpcRequest>(parsed) {
                    Ok(request) => self.handle_request(request).await,
                    Err(_) => Some(JsonRpcResponse::failure(id, McpError::invalid_request())),
                }
            }
        };
        self.serialize(response?)
    }

    /// Entry point for raw stdin lines. Bytes that are not UTF-8 are a parse
    /// error for that line only.
    pub async fn handle_bytes(&self, raw: &[u8]) -> Option<String> {
        match std::str::from_utf8(raw) {
            Ok(line) => self.handle_line(line).await,
            Err(err) => {
                self.logger.warn(
                    "line is not valid UTF-8",
                    Some(&json!({"bytes": raw.len(), "valid_up_to": err.valid_up_to()})),
                );
                self.serialize(JsonRpcResponse::failure(Value::Null, McpError::parse_error()))
            }
        }
    }

    fn serialize(&self, response: JsonRpcResponse) -> Option<String> {
        match serde_json::to_string(&response) {
            Ok(payload) => Some(payload),
            Err(err) => {
                self.logger.error(
                    "failed to serialize response",
                    Some(&json!({"error": err.to_string()})),
                );
                None
            }
        }
    }

    /// Serves stdin/stdout until stdin closes, then waits for in-flight calls.
    pub async fn run_stdio(&self) -> Result<(), ServerError> {
        let mut reader = BufReader::new(tokio::io::stdin());
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        let writer = tokio::spawn(async move {
            let mut out = BufWriter::new(tokio::io::stdout());
            while let Some(payload) = rx.recv().await {
                out.write_all(payload.as_bytes()).await?;
                out.write_all(b"\n").await?;
                out.flush().await?;
            }
            Ok::<(), std::io::Error>(())
        });

        self.logger.info(
            "listening on stdio",
            Some(&json!({"backend": self.app.backend().redacted_base_url()})),
        );

        loop {
            let mut line = Vec::new();
            if reader.read_until(b'\n', &mut line).await? == 0 {
                break;
            }
            let server = self.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(payload) = server.handle_bytes(&line).await {
                    let _ = tx.send(payload);
                }
            });
        }
        drop(tx);

        match writer.await {
            Ok(result) => result?,
            Err(err) => {
                self.logger
                    .error("writer task failed", Some(&json!({"error": err.to_string()})));
            }
        }
        self.logger.info("stdin closed, shutting down", None);
        Ok(())
    }
}

pub async fn run_stdio() -> Result<(), ServerError> {
    let server = McpServer::from_env()?;
    server.run_stdio().await
}
