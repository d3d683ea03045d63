pub mod network {
    pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
    pub const TIMEOUT_STANDARD_MS: u64 = 15_000;
    pub const TIMEOUT_INFERENCE_MS: u64 = 300_000;
    pub const TIMEOUT_LONG_RUNNING_MS: u64 = 600_000;
}

pub mod env {
    pub const OLLAMA_BASE_URL: &str = "OLLAMA_BASE_URL";
    pub const LOG_LEVEL: &str = "OLLAMA_MCP_LOG_LEVEL";
    pub const LOG_LEVEL_FALLBACK: &str = "LOG_LEVEL";
}

pub mod limits {
    pub const MODEL_NAME_MAX_LEN: usize = 256;
    pub const MAX_TOKENS_CAP: u64 = 131_072;
    pub const TEMPERATURE_MIN: f64 = 0.0;
    pub const TEMPERATURE_MAX: f64 = 2.0;
    /// Strings shorter than this are always treated as file paths.
    pub const BASE64_MIN_LEN: usize = 100;
    pub const LOG_BODY_MAX_BYTES: usize = 2_048;
    pub const SHAPE_DIAGNOSTICS_MAX: usize = 5;
    pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;
}

pub mod protocols {
    pub const ALLOWED_HTTP: &[&str] = &["http", "https"];
}

pub mod server {
    pub const PROTOCOL_VERSION: &str = "2025-06-18";
    pub const SERVER_NAME: &str = "ollama-mcp-server";
    pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
}
