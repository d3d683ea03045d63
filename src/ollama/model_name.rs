use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

use crate::constants::limits::MODEL_NAME_MAX_LEN;
use crate::errors::ModelNameViolation;

// Tags such as "llama3.2:7b" need the colon.
static MODEL_NAME_CHARSET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._:-]+$").expect("model name regex"));

/// A model identifier that is safe to interpolate into outbound requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ModelName(String);

impl ModelName {
    pub fn parse(raw: &str) -> Result<Self, ModelNameViolation> {
        if raw.is_empty() {
            return Err(ModelNameViolation::Empty);
        }
        if raw.chars().count() > MODEL_NAME_MAX_LEN {
            return Err(ModelNameViolation::TooLong);
        }
        if raw.contains("..") || raw.starts_with('/') || raw.starts_with('\\') {
            return Err(ModelNameViolation::PathTraversal);
        }
        if !MODEL_NAME_CHARSET.is_match(raw) {
            return Err(ModelNameViolation::IllegalCharacters);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
