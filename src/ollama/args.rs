use serde::Serialize;
use serde_json::Value;

use crate::constants::limits::{MAX_TOKENS_CAP, TEMPERATURE_MAX, TEMPERATURE_MIN};
use crate::errors::{IssueReason, ValidationError};
use crate::services::validation::ArgsReader;

use super::ModelName;

pub const ROLE_NAMES: &[&str] = &["system", "user", "assistant"];

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateArgs {
    pub model: ModelName,
    pub prompt: String,
    pub system: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u64>,
    pub images: Option<Vec<String>>,
}

impl GenerateArgs {
    pub fn parse(raw: &Value) -> Result<Self, ValidationError> {
        let mut reader = ArgsReader::new(raw);
        let model = reader.model("model");
        let prompt = reader.required_string("prompt");
        let system = reader.optional_string("system");
        let temperature = read_temperature(&mut reader);
        let max_tokens = reader.optional_integer_in("max_tokens", 1, MAX_TOKENS_CAP);
        let images = reader.optional_string_array("images");
        reader.finish(|| {
            Some(Self {
                model: model?,
                prompt: prompt?,
                system,
                temperature,
                max_tokens,
                images,
            })
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "system" => Some(Role::System),
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatArgs {
    pub model: ModelName,
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f64>,
}

impl ChatArgs {
    pub fn parse(raw: &Value) -> Result<Self, ValidationError> {
        let mut reader = ArgsReader::new(raw);
        let model = reader.model("model");
        let mut messages = Vec::new();
        if let Some(items) = reader.required_array("messages", 1) {
            for (idx, item) in items.iter().enumerate() {
                let mut nested = reader.nested(format!("messages.{}", idx), item);
                let role = nested
                    .required_one_of("role", ROLE_NAMES)
                    .and_then(Role::from_name);
                let content = nested.required_text("content");
                let images = nested.optional_string_array("images");
                if let (Some(role), Some(content)) = (role, content) {
                    messages.push(ChatMessage {
                        role,
                        content,
                        images,
                    });
                }
                reader.absorb(nested);
            }
        }
        let temperature = read_temperature(&mut reader);
        reader.finish(|| {
            Some(Self {
                model: model?,
                messages,
                temperature,
            })
        })
    }
}

/// `ollama_list` takes no arguments; anything object-shaped is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListArgs;

impl ListArgs {
    pub fn parse(raw: &Value) -> Result<Self, ValidationError> {
        ArgsReader::new(raw).finish(|| Some(ListArgs))
    }
}

/// Arguments of the tools that only name a model (`ollama_show`, `ollama_pull`).
#[derive(Debug, Clone, PartialEq)]
pub struct ModelArgs {
    pub model: ModelName,
}

impl ModelArgs {
    pub fn parse(raw: &Value) -> Result<Self, ValidationError> {
        let mut reader = ArgsReader::new(raw);
        let model = reader.model("model");
        reader.finish(|| Some(Self { model: model? }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EmbedInput {
    Single(String),
    Batch(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingsArgs {
    pub model: ModelName,
    pub input: EmbedInput,
}

impl EmbeddingsArgs {
    pub fn parse(raw: &Value) -> Result<Self, ValidationError> {
        let mut reader = ArgsReader::new(raw);
        let model = reader.model("model");
        let input = read_embed_input(&mut reader);
        reader.finish(|| {
            Some(Self {
                model: model?,
                input: input?,
            })
        })
    }
}

fn read_temperature(reader: &mut ArgsReader<'_>) -> Option<f64> {
    reader.optional_number_in("temperature", TEMPERATURE_MIN, TEMPERATURE_MAX)
}

fn read_embed_input(reader: &mut ArgsReader<'_>) -> Option<EmbedInput> {
    let Some(value) = reader.raw("input") else {
        reader.reject("input", IssueReason::Required);
        return None;
    };
    if value.is_string() {
        return reader.required_string("input").map(EmbedInput::Single);
    }
    let Some(items) = value.as_array() else {
        reader.reject(
            "input",
            IssueReason::WrongType {
                expected: "string or array of strings",
            },
        );
        return None;
    };
    if items.is_empty() {
        reader.reject("input", IssueReason::TooFewItems { min: 1 });
        return None;
    }
    let mut batch = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let field = format!("input.{}", idx);
        match item.as_str() {
            Some("") => reader.reject(&field, IssueReason::Empty),
            Some(text) => batch.push(text.to_string()),
            None => reader.reject(&field, IssueReason::WrongType { expected: "string" }),
        }
    }
    (batch.len() == items.len()).then_some(EmbedInput::Batch(batch))
}
