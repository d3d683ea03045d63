use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::constants::limits::SHAPE_DIAGNOSTICS_MAX;
use crate::services::endpoint::Operation;

/// A compiled JSON schema for one backend response.
pub struct ResponseSchema {
    name: &'static str,
    compiled: JSONSchema,
}

impl ResponseSchema {
    fn compile(name: &'static str, schema: Value) -> Self {
        let compiled = JSONSchema::compile(&schema).expect("response schema must compile");
        Self { name, compiled }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns a diagnostic listing the first few violations on mismatch.
    pub fn check(&self, instance: &Value) -> Result<(), String> {
        let Err(errors) = self.compiled.validate(instance) else {
            return Ok(());
        };
        let rendered: Vec<String> = errors
            .take(SHAPE_DIAGNOSTICS_MAX)
            .map(|err| {
                let path = err.instance_path.to_string();
                let at = if path.is_empty() {
                    "(root)".to_string()
                } else {
                    path
                };
                format!("{}: {}", at, err)
            })
            .collect();
        Err(format!("{}: {}", self.name, rendered.join("; ")))
    }
}

fn string() -> Value {
    json!({"type": "string"})
}

fn number() -> Value {
    json!({"type": "number"})
}

fn count() -> Value {
    json!({"type": "integer", "minimum": 0})
}

static RESPONSE_SCHEMAS: Lazy<HashMap<Operation, ResponseSchema>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert(
        Operation::Generate,
        ResponseSchema::compile(
            "generate",
            json!({
                "type": "object",
                "required": ["response", "done"],
                "properties": {
                    "response": string(),
                    "done": {"type": "boolean"},
                    "model": string(),
                    "created_at": string(),
                    "total_duration": count(),
                    "load_duration": count(),
                    "prompt_eval_count": count(),
                    "eval_count": count(),
                    "eval_duration": count()
                }
            }),
        ),
    );
    map.insert(
        Operation::Chat,
        ResponseSchema::compile(
            "chat",
            json!({
                "type": "object",
                "required": ["message", "done"],
                "properties": {
                    "message": {
                        "type": "object",
                        "required": ["role", "content"],
                        "properties": {"role": string(), "content": string()}
                    },
                    "done": {"type": "boolean"},
                    "model": string(),
                    "created_at": string(),
                    "total_duration": count()
                }
            }),
        ),
    );
    map.insert(
        Operation::List,
        ResponseSchema::compile(
            "list",
            json!({
                "type": "object",
                "required": ["models"],
                "properties": {
                    "models": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "required": ["name", "size", "digest", "modified_at"],
                            "properties": {
                                "name": string(),
                                "size": {"type": "integer", "minimum": 0},
                                "digest": string(),
                                "modified_at": string(),
                                "details": {
                                    "type": "object",
                                    "properties": {
                                        "format": string(),
                                        "family": string(),
                                        "parameter_size": string(),
                                        "quantization_level": string()
                                    }
                                }
                            }
                        }
                    }
                }
            }),
        ),
    );
    map.insert(
        Operation::Show,
        ResponseSchema::compile(
            "show",
            json!({
                "type": "object",
                "properties": {
                    "modelfile": string(),
                    "parameters": string(),
                    "template": string(),
                    "details": {"type": "object"},
                    "model_info": {"type": "object"}
                }
            }),
        ),
    );
    map.insert(
        Operation::Pull,
        ResponseSchema::compile(
            "pull",
            json!({
                "type": "object",
                "properties": {"status": string()}
            }),
        ),
    );
    map.insert(
        Operation::Embeddings,
        ResponseSchema::compile(
            "embeddings",
            json!({
                "type": "object",
                "required": ["embeddings"],
                "properties": {
                    "embeddings": {
                        "type": "array",
                        "items": {"type": "array", "items": number()}
                    },
                    "model": string()
                }
            }),
        ),
    );
    map
});

pub fn response_schema(operation: Operation) -> &'static ResponseSchema {
    // Every operation is inserted above; the map is total over `Operation::ALL`.
    &RESPONSE_SCHEMAS[&operation]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_operation_has_a_schema() {
        for op in Operation::ALL {
            let _ = response_schema(op).name();
        }
    }

    #[test]
    fn generate_requires_response_text() {
        let schema = response_schema(Operation::Generate);
        assert!(schema.check(&json!({"response": "hi", "done": true})).is_ok());
        let detail = schema.check(&json!({"done": true})).unwrap_err();
        assert!(detail.starts_with("generate: "));
        assert!(detail.contains("response"));
    }

    #[test]
    fn embeddings_reject_non_numeric_vectors() {
        let schema = response_schema(Operation::Embeddings);
        assert!(schema.check(&json!({"embeddings": [[0.1, 0.2]]})).is_ok());
        assert!(schema.check(&json!({"embeddings": [["x"]]})).is_err());
        assert!(schema.check(&json!({"embeddings": []})).is_ok());
    }

    #[test]
    fn list_entries_need_name_and_integer_size() {
        let schema = response_schema(Operation::List);
        let ok = json!({"models": [{"name": "a", "size": 1, "digest": "d", "modified_at": "t"}]});
        assert!(schema.check(&ok).is_ok());
        let bad = json!({"models": [{"name": "a", "size": "big", "digest": "d", "modified_at": "t"}]});
        let detail = schema.check(&bad).unwrap_err();
        assert!(detail.contains("/models/0/size"), "{}", detail);
    }

    #[test]
    fn generate_counters_must_be_whole_numbers() {
        let schema = response_schema(Operation::Generate);
        let ok = json!({"response": "hi", "done": true, "eval_count": 6, "total_duration": 120});
        assert!(schema.check(&ok).is_ok());
        let fractional = json!({"response": "hi", "done": true, "eval_count": 6.5});
        let detail = schema.check(&fractional).unwrap_err();
        assert!(detail.contains("/eval_count"), "{}", detail);
        let negative = json!({"response": "hi", "done": true, "total_duration": -1});
        assert!(schema.check(&negative).is_err());
    }
}
