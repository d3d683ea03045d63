use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::ServerError;
use crate::managers::{EmbeddingsManager, InferenceManager, ModelsManager};
use crate::mcp::catalog::{tool_by_name, tool_catalog};
use crate::services::config::BackendConfig;
use crate::services::endpoint::Operation;
use crate::services::logger::Logger;
use crate::services::ollama_client::OllamaClient;
use crate::services::tool_executor::{ToolExecutor, ToolHandler};

pub struct App {
    pub logger: Logger,
    pub tool_executor: Arc<ToolExecutor>,
    backend: Arc<BackendConfig>,
}

impl App {
    fn validate_tool_wiring(
        handlers: &HashMap<Operation, Arc<dyn ToolHandler>>,
    ) -> Result<(), ServerError> {
        let mut missing: Vec<String> = tool_catalog()
            .iter()
            .filter(|tool| {
                Operation::from_tool_name(&tool.name)
                    .map(|op| !handlers.contains_key(&op))
                    .unwrap_or(true)
            })
            .map(|tool| tool.name.clone())
            .collect();
        for op in Operation::ALL {
            let wired = handlers.contains_key(&op) && tool_by_name(op.tool_name()).is_some();
            if !wired && !missing.iter().any(|name| name == op.tool_name()) {
                missing.push(op.tool_name().to_string());
            }
        }
        if missing.is_empty() {
            return Ok(());
        }
        missing.sort();
        Err(ServerError::Wiring { missing })
    }

    /// Reads `OLLAMA_BASE_URL` and wires every tool.
    pub fn initialize() -> Result<Self, ServerError> {
        Self::with_config(BackendConfig::from_env()?)
    }

    pub fn with_config(config: BackendConfig) -> Result<Self, ServerError> {
        let logger = Logger::new("ollama-mcp");
        let backend = Arc::new(config);
        let client = OllamaClient::new(backend.clone(), logger.clone())?;

        let inference = Arc::new(InferenceManager::new(logger.clone(), client.clone()));
        let models = Arc::new(ModelsManager::new(logger.clone(), client.clone()));
        let embeddings = Arc::new(EmbeddingsManager::new(logger.clone(), client));

        let mut handlers: HashMap<Operation, Arc<dyn ToolHandler>> = HashMap::new();
        handlers.insert(Operation::Generate, inference.clone());
        handlers.insert(Operation::Chat, inference);
        handlers.insert(Operation::List, models.clone());
        handlers.insert(Operation::Show, models.clone());
        handlers.insert(Operation::Pull, models);
        handlers.insert(Operation::Embeddings, embeddings);

        Self::validate_tool_wiring(&handlers)?;
        logger.debug(
            "configured",
            Some(&serde_json::json!({
                "backend": backend.redacted_base_url(),
                "tools": handlers.len(),
            })),
        );

        Ok(Self {
            tool_executor: Arc::new(ToolExecutor::new(logger.clone(), handlers)),
            logger,
            backend,
        })
    }

    pub fn backend(&self) -> &BackendConfig {
        &self.backend
    }
}
