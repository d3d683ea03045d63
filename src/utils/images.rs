use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::ErrorKind;

use crate::constants::limits::BASE64_MIN_LEN;
use crate::errors::ToolError;

const DATA_URL_MARKER: &str = ";base64,";

static PADDED_BASE64: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=)?$")
        .expect("base64 regex")
});

/// Short strings are treated as paths even when they happen to be valid
/// base64; a caller with a tiny inline image must use a data URL.
pub fn looks_like_base64(value: &str) -> bool {
    value.len() >= BASE64_MIN_LEN && PADDED_BASE64.is_match(value)
}

fn data_url_payload(value: &str) -> Option<&str> {
    if !value.starts_with("data:") {
        return None;
    }
    value
        .find(DATA_URL_MARKER)
        .map(|idx| &value[idx + DATA_URL_MARKER.len()..])
}

/// Turns a file path, data URL or raw base64 string into raw base64.
pub async fn to_base64(image: &str) -> Result<String, ToolError> {
    if let Some(payload) = data_url_payload(image) {
        return Ok(payload.to_string());
    }
    if looks_like_base64(image) {
        return Ok(image.to_string());
    }
    match tokio::fs::read(image).await {
        Ok(bytes) => Ok(base64::engine::general_purpose::STANDARD.encode(bytes)),
        Err(err) if err.kind() == ErrorKind::NotFound => Err(ToolError::ImageNotFound {
            path: image.to_string(),
        }),
        Err(err) => Err(ToolError::ImageUnreadable {
            path: image.to_string(),
            source: err,
        }),
    }
}

/// `None` for absent or empty lists so the request omits `images`.
pub async fn encode_images(images: Option<&[String]>) -> Result<Option<Vec<String>>, ToolError> {
    let Some(images) = images.filter(|list| !list.is_empty()) else {
        return Ok(None);
    };
    let mut encoded = Vec::with_capacity(images.len());
    for image in images {
        encoded.push(to_base64(image).await?);
    }
    Ok(Some(encoded))
}
