use serde::Serialize;
use serde_json::Value;

use crate::errors::ToolError;
use crate::ollama::args::EmbeddingsArgs;
use crate::ollama::payloads::{EmbedRequest, EmbedResponse};
use crate::services::endpoint::{EndpointCall, Operation};
use crate::services::logger::Logger;
use crate::services::ollama_client::OllamaClient;

#[derive(Debug, Serialize)]
struct EmbeddingsReport<'a> {
    model: &'a str,
    dimensions: usize,
    embeddings: &'a [Vec<f64>],
}

/// Pretty JSON with the vectors exactly as returned. `dimensions` is the
/// length of the first vector, 0 when the backend returned none.
pub fn render_embeddings(model: &str, embeddings: &[Vec<f64>]) -> Result<String, ToolError> {
    let report = EmbeddingsReport {
        model,
        dimensions: embeddings.first().map(Vec::len).unwrap_or(0),
        embeddings,
    };
    serde_json::to_string_pretty(&report)
        .map_err(|err| ToolError::internal(format!("Failed to render embeddings: {}", err)))
}

#[derive(Clone)]
pub struct EmbeddingsManager {
    logger: Logger,
    client: OllamaClient,
}

impl EmbeddingsManager {
    pub fn new(logger: Logger, client: OllamaClient) -> Self {
        Self {
            logger: logger.child("embeddings"),
            client,
        }
    }

    pub async fn embed(&self, args: Value) -> Result<String, ToolError> {
        let args = EmbeddingsArgs::parse(&args)?;
        let call = EndpointCall::with_json(
            Operation::Embeddings,
            &EmbedRequest {
                model: &args.model,
                input: &args.input,
            },
        )?;
        let response: EmbedResponse = self.client.execute_typed(&call).await?;
        self.logger.debug(
            "embeddings done",
            Some(&serde_json::json!({"vectors": response.embeddings.len()})),
        );
        render_embeddings(args.model.as_str(), &response.embeddings)
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for EmbeddingsManager {
    async fn handle(&self, operation: Operation, args: Value) -> Result<String, ToolError> {
        match operation {
            Operation::Embeddings => self.embed(args).await,
            other => Err(ToolError::internal(format!(
                "{} is not an embeddings tool",
                other.tool_name()
            ))),
        }
    }
}
