//! Wire records for the Ollama HTTP API.
//!
//! Requests always set `stream: false`; responses mirror the shapes enforced
//! by `ollama::schemas`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::args::{EmbedInput, Role};
use super::ModelName;

#[derive(Debug, Default, Serialize)]
pub struct GenerationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u64>,
}

impl GenerationOptions {
    /// `None` when no option is set, so the request omits `options` entirely.
    pub fn non_empty(self) -> Option<Self> {
        if self.temperature.is_none() && self.num_predict.is_none() {
            None
        } else {
            Some(self)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a ModelName,
    pub prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<GenerationOptions>,
}

#[derive(Debug, Serialize)]
pub struct ChatMessagePayload<'a> {
    pub role: Role,
    pub content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a ModelName,
    pub messages: Vec<ChatMessagePayload<'a>>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<GenerationOptions>,
}

#[derive(Debug, Serialize)]
pub struct ShowRequest<'a> {
    pub model: &'a ModelName,
}

#[derive(Debug, Serialize)]
pub struct PullRequest<'a> {
    pub model: &'a ModelName,
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub struct EmbedRequest<'a> {
    pub model: &'a ModelName,
    pub input: &'a EmbedInput,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
    pub done: bool,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub eval_count: Option<u64>,
    #[serde(default)]
    pub total_duration: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub message: ResponseMessage,
    pub done: bool,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelDetails {
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub parameter_size: Option<String>,
    #[serde(default)]
    pub quantization_level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelEntry {
    pub name: String,
    pub size: u64,
    pub digest: String,
    pub modified_at: String,
    #[serde(default)]
    pub details: Option<ModelDetails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse {
    pub models: Vec<ModelEntry>,
}

/// Only the documented members survive parsing; unknown members are dropped
/// before the response is rendered back to the caller.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShowResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modelfile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_info: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullResponse {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbedResponse {
    pub embeddings: Vec<Vec<f64>>,
    #[serde(default)]
    pub model: Option<String>,
}
