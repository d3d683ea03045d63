use thiserror::Error;

/// Startup configuration failures. Messages never include the raw configured
/// value because a base URL may embed credentials.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid OLLAMA_BASE_URL configuration")]
    InvalidBaseUrl,
    #[error("Failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Tool wiring is incomplete; missing handlers for: {}", missing.join(", "))]
    Wiring { missing: Vec<String> },
    #[error("stdio transport failed: {0}")]
    Io(#[from] std::io::Error),
}
