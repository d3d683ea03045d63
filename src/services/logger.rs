use serde_json::Value;
use std::future::Future;

use crate::constants::env;

tokio::task_local! {
    static TRACE_ID: String;
}

/// Runs `fut` with `trace_id` attached to every log line it emits.
pub async fn with_trace<F: Future>(trace_id: String, fut: F) -> F::Output {
    TRACE_ID.scope(trace_id, fut).await
}

pub fn current_trace_id() -> Option<String> {
    TRACE_ID.try_with(|id| id.clone()).ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }

    /// `OLLAMA_MCP_LOG_LEVEL` wins over the generic `LOG_LEVEL`; unknown
    /// values fall back to `info`.
    fn from_env() -> Self {
        [env::LOG_LEVEL, env::LOG_LEVEL_FALLBACK]
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .find_map(|raw| Self::parse(&raw))
            .unwrap_or(LogLevel::Info)
    }

    fn label(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// Line-oriented logger writing to stderr. Stdout carries the JSON-RPC
/// stream and must never receive log output.
#[derive(Debug, Clone)]
pub struct Logger {
    context: String,
    level: LogLevel,
}

impl Logger {
    pub fn new(context: &str) -> Self {
        Self {
            context: context.to_string(),
            level: LogLevel::from_env(),
        }
    }

    pub fn child(&self, suffix: &str) -> Self {
        let context = if suffix.is_empty() {
            self.context.clone()
        } else {
            format!("{}:{}", self.context, suffix)
        };
        Self {
            context,
            level: self.level,
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.level
    }

    fn render(&self, level: LogLevel, message: &str, meta: Option<&Value>) -> String {
        let meta_suffix = meta
            .filter(|m| !m.is_null())
            .map(|m| format!(" {}", m))
            .unwrap_or_default();
        let trace = current_trace_id()
            .map(|id| format!(" trace={}", id))
            .unwrap_or_default();
        format!(
            "[{}] {} [{}]{} {}{}",
            chrono::Utc::now().to_rfc3339(),
            level.label(),
            self.context,
            trace,
            message,
            meta_suffix
        )
    }

    fn log(&self, level: LogLevel, message: &str, meta: Option<&Value>) {
        if self.enabled(level) {
            eprintln!("{}", self.render(level, message, meta));
        }
    }

    pub fn error(&self, message: &str, meta: Option<&Value>) {
        self.log(LogLevel::Error, message, meta);
    }

    pub fn warn(&self, message: &str, meta: Option<&Value>) {
        self.log(LogLevel::Warn, message, meta);
    }

    pub fn info(&self, message: &str, meta: Option<&Value>) {
        self.log(LogLevel::Info, message, meta);
    }

    pub fn debug(&self, message: &str, meta: Option<&Value>) {
        self.log(LogLevel::Debug, message, meta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_accepts_common_spellings() {
        assert_eq!(LogLevel::parse("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse(" warning "), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("verbose"), None);
    }

    #[test]
    fn levels_filter_by_rank() {
        let logger = Logger::new("test").with_level(LogLevel::Warn);
        assert!(logger.enabled(LogLevel::Error));
        assert!(logger.enabled(LogLevel::Warn));
        assert!(!logger.enabled(LogLevel::Info));
        assert!(!logger.enabled(LogLevel::Debug));
    }

    #[test]
    fn child_contexts_nest_and_keep_level() {
        let logger = Logger::new("ollama-mcp").with_level(LogLevel::Debug);
        let child = logger.child("client");
        assert_eq!(child.level(), LogLevel::Debug);
        let line = child.render(LogLevel::Info, "ready", Some(&json!({"tier": "standard"})));
        assert!(line.contains("INFO [ollama-mcp:client] ready {\"tier\":\"standard\"}"), "{}", line);
    }

    #[tokio::test]
    async fn trace_scope_tags_lines() {
        let logger = Logger::new("x");
        let line = with_trace("abc-123".to_string(), async {
            logger.render(LogLevel::Info, "inside", None)
        })
        .await;
        assert!(line.contains("[x] trace=abc-123 inside"), "{}", line);
        assert!(current_trace_id().is_none());
    }

    #[test]
    fn null_meta_is_omitted() {
        let logger = Logger::new("x");
        let line = logger.render(LogLevel::Error, "boom", Some(&Value::Null));
        assert!(line.ends_with("[x] boom"), "{}", line);
    }
}
