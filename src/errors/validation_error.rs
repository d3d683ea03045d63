use std::fmt;
use thiserror::Error;

use crate::constants::limits::MODEL_NAME_MAX_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ModelNameViolation {
    #[error("model name is required")]
    Empty,
    #[error("model name is too long (max {} characters)", MODEL_NAME_MAX_LEN)]
    TooLong,
    #[error("only letters, digits, dots, hyphens, underscores and colons are allowed")]
    IllegalCharacters,
    #[error("path traversal is not allowed")]
    PathTraversal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IssueReason {
    Required,
    Empty,
    WrongType { expected: &'static str },
    OutOfRange { min: f64, max: f64 },
    NotAnInteger,
    NotOneOf { allowed: &'static [&'static str] },
    TooFewItems { min: usize },
    InvalidModelName(ModelNameViolation),
}

impl fmt::Display for IssueReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueReason::Required => write!(f, "is required"),
            IssueReason::Empty => write!(f, "must not be empty"),
            IssueReason::WrongType { expected } => write!(f, "expected {}", expected),
            IssueReason::OutOfRange { min, max } => {
                write!(f, "must be between {} and {}", min, max)
            }
            IssueReason::NotAnInteger => write!(f, "must be an integer"),
            IssueReason::NotOneOf { allowed } => {
                write!(f, "expected one of {}", allowed.join(", "))
            }
            IssueReason::TooFewItems { min } => {
                write!(f, "must contain at least {} item(s)", min)
            }
            IssueReason::InvalidModelName(violation) => write!(f, "{}", violation),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldIssue {
    pub field: String,
    pub reason: IssueReason,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, reason: IssueReason) -> Self {
        Self {
            field: field.into(),
            reason,
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Every field-level violation found in one argument payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn new(issues: Vec<FieldIssue>) -> Self {
        Self { issues }
    }

    pub fn single(field: impl Into<String>, reason: IssueReason) -> Self {
        Self::new(vec![FieldIssue::new(field, reason)])
    }

    pub fn fields(&self) -> Vec<&str> {
        self.issues.iter().map(|issue| issue.field.as_str()).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.issues.iter().map(|issue| issue.to_string()).collect();
        write!(f, "Validation error: {}", rendered.join(", "))
    }
}

impl std::error::Error for ValidationError {}
