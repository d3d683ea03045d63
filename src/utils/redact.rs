use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::text::clip_for_log;

static INLINE_SECRET_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"\b(Bearer|Basic)\s+[A-Za-z0-9._~+/=-]{8,}").expect("inline redaction regex"),
            "$1 ***REDACTED***",
        ),
        (
            Regex::new(r"\bsk-[A-Za-z0-9_-]{10,}\b").expect("inline redaction regex"),
            "sk-***REDACTED***",
        ),
        (
            Regex::new(r"(?i)\b(password|token|api[_-]?key|secret)\b\s*([:=])\s*[^\s,;&]+")
                .expect("inline redaction regex"),
            "$1$2***REDACTED***",
        ),
        (
            Regex::new(r"(?i)\b(https?://)[^/\s:@]+(:[^/\s@]*)?@").expect("inline redaction regex"),
            "$1***@",
        ),
    ]
});

/// Masks credential-looking fragments and clips the result for logging.
pub fn redact_text(value: &str, max_bytes: usize) -> String {
    let mut out = value.to_string();
    for (pattern, replacement) in INLINE_SECRET_PATTERNS.iter() {
        if pattern.is_match(&out) {
            out = pattern.replace_all(&out, *replacement).into_owned();
        }
    }
    clip_for_log(&out, max_bytes)
}

/// Scheme, host and port only. Userinfo is masked; path and query are dropped.
pub fn redact_url(url: &Url) -> String {
    let credentials = if !url.username().is_empty() || url.password().is_some() {
        "***@"
    } else {
        ""
    };
    let host = url.host_str().unwrap_or("");
    match url.port() {
        Some(port) => format!("{}://{}{}:{}", url.scheme(), credentials, host, port),
        None => format!("{}://{}{}", url.scheme(), credentials, host),
    }
}
