use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::errors::ToolError;

/// The six operations exposed as tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Generate,
    Chat,
    List,
    Show,
    Pull,
    Embeddings,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::Generate,
        Operation::Chat,
        Operation::List,
        Operation::Show,
        Operation::Pull,
        Operation::Embeddings,
    ];

    pub fn tool_name(self) -> &'static str {
        match self {
            Operation::Generate => "ollama_generate",
            Operation::Chat => "ollama_chat",
            Operation::List => "ollama_list",
            Operation::Show => "ollama_show",
            Operation::Pull => "ollama_pull",
            Operation::Embeddings => "ollama_embeddings",
        }
    }

    pub fn from_tool_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.tool_name() == name)
    }

    pub fn tool_names() -> Vec<String> {
        Self::ALL.iter().map(|op| op.tool_name().to_string()).collect()
    }

    pub fn method(self) -> Method {
        match self {
            Operation::List => Method::GET,
            _ => Method::POST,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Operation::Generate => "/api/generate",
            Operation::Chat => "/api/chat",
            Operation::List => "/api/tags",
            Operation::Show => "/api/show",
            Operation::Pull => "/api/pull",
            Operation::Embeddings => "/api/embed",
        }
    }

    pub fn tier(self) -> TimeoutTier {
        match self {
            Operation::Generate | Operation::Chat => TimeoutTier::Inference,
            Operation::Pull => TimeoutTier::LongRunning,
            Operation::List | Operation::Show | Operation::Embeddings => TimeoutTier::Standard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutTier {
    Standard,
    Inference,
    LongRunning,
}

impl TimeoutTier {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeoutTier::Standard => "standard",
            TimeoutTier::Inference => "inference",
            TimeoutTier::LongRunning => "long_running",
        }
    }
}

/// One outbound backend request. Method, path and tier always come from the
/// operation's static table; only the body varies per invocation.
#[derive(Debug, Clone)]
pub struct EndpointCall {
    operation: Operation,
    body: Option<Value>,
}

impl EndpointCall {
    pub fn new(operation: Operation, body: Option<Value>) -> Self {
        Self { operation, body }
    }

    pub fn with_json<T: Serialize>(operation: Operation, body: &T) -> Result<Self, ToolError> {
        let value = serde_json::to_value(body).map_err(|err| {
            ToolError::internal(format!(
                "Failed to encode {} request: {}",
                operation.tool_name(),
                err
            ))
        })?;
        Ok(Self::new(operation, Some(value)))
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn method(&self) -> Method {
        self.operation.method()
    }

    pub fn path(&self) -> &'static str {
        self.operation.path()
    }

    pub fn tier(&self) -> TimeoutTier {
        self.operation.tier()
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}
