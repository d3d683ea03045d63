use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;

use crate::errors::{ConfigError, OllamaError};
use crate::ollama::schemas::{response_schema, ResponseSchema};
use crate::services::config::BackendConfig;
use crate::services::endpoint::EndpointCall;
use crate::services::logger::Logger;

const SHAPE_MESSAGE: &str = "Unexpected response shape from Ollama";

/// Executes endpoint calls against the configured backend.
///
/// Exactly one outbound request per call. The tier budget wraps connect,
/// send and the full body read; nothing is retried.
#[derive(Clone)]
pub struct OllamaClient {
    config: Arc<BackendConfig>,
    http: Client,
    logger: Logger,
}

impl OllamaClient {
    pub fn new(config: Arc<BackendConfig>, logger: Logger) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = Client::builder()
            .user_agent(concat!("ollama-mcp/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(ConfigError::HttpClient)?;
        Ok(Self {
            config,
            http,
            logger: logger.child("ollama"),
        })
    }

    async fn send(&self, call: &EndpointCall) -> Result<(StatusCode, String), OllamaError> {
        let url = self.config.endpoint_url(call.path());
        let mut request = self.http.request(call.method(), url);
        if let Some(body) = call.body() {
            request = request.json(body);
        }
        let response = request.send().await.map_err(OllamaError::from_transport)?;
        let status = response.status();
        let text = response.text().await.map_err(OllamaError::from_transport)?;
        Ok((status, text))
    }

    /// Runs the call. With a schema the decoded body must match it; without
    /// one any JSON value is returned as-is.
    pub async fn execute(
        &self,
        call: &EndpointCall,
        schema: Option<&ResponseSchema>,
    ) -> Result<Value, OllamaError> {
        let operation = call.operation();
        let budget = self.config.timeout_for(call.tier());
        let started = Instant::now();
        self.logger.debug(
            "request",
            Some(&json!({
                "method": call.method().as_str(),
                "path": call.path(),
                "tier": call.tier().as_str(),
                "timeout_ms": budget.as_millis() as u64,
                "backend": self.config.redacted_base_url(),
            })),
        );

        let (status, text) = tokio::time::timeout(budget, self.send(call))
            .await
            .map_err(|_| OllamaError::timed_out(budget))??;

        self.logger.debug(
            "response",
            Some(&json!({
                "path": call.path(),
                "status": status.as_u16(),
                "bytes": text.len(),
                "duration_ms": started.elapsed().as_millis() as u64,
            })),
        );

        if !status.is_success() {
            return Err(OllamaError::api(status.as_u16(), text));
        }

        let parsed: Value = serde_json::from_str(&text).map_err(|err| {
            OllamaError::response_shape(
                SHAPE_MESSAGE,
                format!("{}: body is not valid JSON: {}", operation.tool_name(), err),
            )
        })?;
        if let Some(schema) = schema {
            if let Err(detail) = schema.check(&parsed) {
                self.logger.warn(
                    "response does not match schema",
                    Some(&json!({"schema": schema.name(), "path": call.path()})),
                );
                return Err(OllamaError::response_shape(SHAPE_MESSAGE, detail));
            }
        }
        Ok(parsed)
    }

    /// Validates against the operation's schema, then decodes into `T`.
    pub async fn execute_typed<T: DeserializeOwned>(
        &self,
        call: &EndpointCall,
    ) -> Result<T, OllamaError> {
        let schema = response_schema(call.operation());
        let value = self.execute(call, Some(schema)).await?;
        serde_json::from_value(value).map_err(|err| {
            OllamaError::response_shape(
                SHAPE_MESSAGE,
                format!("{}: {}", call.operation().tool_name(), err),
            )
        })
    }
}
