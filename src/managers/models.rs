use serde_json::Value;

use crate::constants::limits::BYTES_PER_GB;
use crate::errors::ToolError;
use crate::ollama::args::{ListArgs, ModelArgs};
use crate::ollama::payloads::{
    ListResponse, ModelEntry, PullRequest, PullResponse, ShowRequest, ShowResponse,
};
use crate::services::endpoint::{EndpointCall, Operation};
use crate::services::logger::Logger;
use crate::services::ollama_client::OllamaClient;

const NO_MODELS: &str = "No models found. Use ollama_pull to download a model.";

/// Renders installed models in backend order, sizes in GB with two decimals.
pub fn format_model_list(models: &[ModelEntry]) -> String {
    if models.is_empty() {
        return NO_MODELS.to_string();
    }
    let mut out = String::from("Available models:");
    for model in models {
        out.push_str(&format!(
            "\n- {} ({:.2} GB)",
            model.name,
            model.size as f64 / BYTES_PER_GB
        ));
    }
    out
}

#[derive(Clone)]
pub struct ModelsManager {
    logger: Logger,
    client: OllamaClient,
}

impl ModelsManager {
    pub fn new(logger: Logger, client: OllamaClient) -> Self {
        Self {
            logger: logger.child("models"),
            client,
        }
    }

    pub async fn list(&self, args: Value) -> Result<String, ToolError> {
        ListArgs::parse(&args)?;
        let call = EndpointCall::new(Operation::List, None);
        let response: ListResponse = self.client.execute_typed(&call).await?;
        Ok(format_model_list(&response.models))
    }

    pub async fn show(&self, args: Value) -> Result<String, ToolError> {
        let args = ModelArgs::parse(&args)?;
        let call = EndpointCall::with_json(Operation::Show, &ShowRequest { model: &args.model })?;
        let response: ShowResponse = self.client.execute_typed(&call).await?;
        serde_json::to_string_pretty(&response)
            .map_err(|err| ToolError::internal(format!("Failed to render model details: {}", err)))
    }

    pub async fn pull(&self, args: Value) -> Result<String, ToolError> {
        let args = ModelArgs::parse(&args)?;
        let call = EndpointCall::with_json(
            Operation::Pull,
            &PullRequest {
                model: &args.model,
                stream: false,
            },
        )?;
        let response: PullResponse = self.client.execute_typed(&call).await?;
        self.logger.info(
            "pull finished",
            Some(&serde_json::json!({
                "model": args.model.as_str(),
                "status": response.status,
            })),
        );
        Ok(format!("Successfully pulled model: {}", args.model))
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for ModelsManager {
    async fn handle(&self, operation: Operation, args: Value) -> Result<String, ToolError> {
        match operation {
            Operation::List => self.list(args).await,
            Operation::Show => self.show(args).await,
            Operation::Pull => self.pull(args).await,
            other => Err(ToolError::internal(format!(
                "{} is not a model management tool",
                other.tool_name()
            ))),
        }
    }
}
