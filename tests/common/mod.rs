#![allow(dead_code)]

use once_cell::sync::Lazy;
use std::time::Duration;
use tokio::sync::Mutex;

use ollama_mcp::app::App;
use ollama_mcp::services::config::{BackendConfig, TierTimeouts};

pub static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub fn restore_env(key: &str, previous: Option<String>) {
    match previous {
        Some(value) => std::env::set_var(key, value),
        None => std::env::remove_var(key),
    }
}

/// Short budgets so timeout tests finish in well under a second per tier.
pub fn fast_timeouts() -> TierTimeouts {
    TierTimeouts {
        standard: Duration::from_millis(250),
        inference: Duration::from_secs(1),
        long_running: Duration::from_secs(5),
    }
}

pub fn app_for(base_url: &str) -> App {
    let config = BackendConfig::parse(base_url)
        .expect("backend url")
        .with_timeouts(fast_timeouts());
    App::with_config(config).expect("app wiring")
}

pub async fn request_count(server: &wiremock::MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or(0)
}
