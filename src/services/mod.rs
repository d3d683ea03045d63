pub mod config;
pub mod endpoint;
pub mod logger;
pub mod ollama_client;
pub mod tool_executor;
pub mod validation;
