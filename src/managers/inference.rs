use serde_json::Value;

use crate::errors::ToolError;
use crate::ollama::args::{ChatArgs, GenerateArgs};
use crate::ollama::payloads::{
    ChatMessagePayload, ChatRequest, ChatResponse, GenerateRequest, GenerateResponse,
    GenerationOptions,
};
use crate::services::endpoint::{EndpointCall, Operation};
use crate::services::logger::Logger;
use crate::services::ollama_client::OllamaClient;
use crate::utils::images::encode_images;

/// `ollama_generate` and `ollama_chat`, both on the inference tier.
#[derive(Clone)]
pub struct InferenceManager {
    logger: Logger,
    client: OllamaClient,
}

impl InferenceManager {
    pub fn new(logger: Logger, client: OllamaClient) -> Self {
        Self {
            logger: logger.child("inference"),
            client,
        }
    }

    pub async fn generate(&self, args: Value) -> Result<String, ToolError> {
        let args = GenerateArgs::parse(&args)?;
        let images = encode_images(args.images.as_deref()).await?;
        let body = GenerateRequest {
            model: &args.model,
            prompt: &args.prompt,
            system: args.system.as_deref(),
            images,
            stream: false,
            options: GenerationOptions {
                temperature: args.temperature,
                num_predict: args.max_tokens,
            }
            .non_empty(),
        };
        let call = EndpointCall::with_json(Operation::Generate, &body)?;
        let response: GenerateResponse = self.client.execute_typed(&call).await?;
        self.logger.debug(
            "generate done",
            Some(&serde_json::json!({
                "model": args.model.as_str(),
                "eval_count": response.eval_count,
            })),
        );
        Ok(response.response)
    }

    pub async fn chat(&self, args: Value) -> Result<String, ToolError> {
        let args = ChatArgs::parse(&args)?;
        let mut messages = Vec::with_capacity(args.messages.len());
        for message in &args.messages {
            messages.push(ChatMessagePayload {
                role: message.role,
                content: &message.content,
                images: encode_images(message.images.as_deref()).await?,
            });
        }
        let body = ChatRequest {
            model: &args.model,
            messages,
            stream: false,
            options: GenerationOptions {
                temperature: args.temperature,
                num_predict: None,
            }
            .non_empty(),
        };
        let call = EndpointCall::with_json(Operation::Chat, &body)?;
        let response: ChatResponse = self.client.execute_typed(&call).await?;
        Ok(response.message.content)
    }
}

#[async_trait::async_trait]
impl crate::services::tool_executor::ToolHandler for InferenceManager {
    async fn handle(&self, operation: Operation, args: Value) -> Result<String, ToolError> {
        match operation {
            Operation::Generate => self.generate(args).await,
            Operation::Chat => self.chat(args).await,
            other => Err(ToolError::internal(format!(
                "{} is not an inference tool",
                other.tool_name()
            ))),
        }
    }
}
