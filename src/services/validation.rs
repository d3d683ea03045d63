use crate::errors::{FieldIssue, IssueReason, ValidationError};
use crate::ollama::ModelName;
use serde_json::{Map, Value};

const ROOT_FIELD: &str = "(root)";

/// Reads fields out of an untrusted argument object, recording every
/// violation instead of stopping at the first one.
///
/// Accessors return `None` both for absent optional fields and for fields that
/// failed a check; `finish` is what decides whether the record may be built.
pub struct ArgsReader<'a> {
    args: Option<&'a Map<String, Value>>,
    prefix: String,
    issues: Vec<FieldIssue>,
}

impl<'a> ArgsReader<'a> {
    /// `null` is read as an empty object so argument-less tools accept a
    /// missing `arguments` member.
    pub fn new(raw: &'a Value) -> Self {
        Self::scoped(String::new(), raw)
    }

    fn scoped(prefix: String, raw: &'a Value) -> Self {
        let mut reader = Self {
            args: None,
            prefix,
            issues: Vec::new(),
        };
        match raw {
            Value::Object(map) => reader.args = Some(map),
            Value::Null => {}
            _ => {
                let field = if reader.prefix.is_empty() {
                    ROOT_FIELD.to_string()
                } else {
                    reader.prefix.clone()
                };
                reader.issues.push(FieldIssue::new(
                    field,
                    IssueReason::WrongType { expected: "object" },
                ));
            }
        }
        reader
    }

    /// A reader for an element nested under this one, e.g. `messages.0`.
    pub fn nested(&self, segment: impl AsRef<str>, raw: &'a Value) -> ArgsReader<'a> {
        Self::scoped(self.path(segment.as_ref()), raw)
    }

    /// Moves a nested reader's issues into this one.
    pub fn absorb(&mut self, nested: ArgsReader<'_>) {
        self.issues.extend(nested.issues);
    }

    fn path(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.prefix, name)
        }
    }

    pub fn reject(&mut self, name: &str, reason: IssueReason) {
        let field = self.path(name);
        self.issues.push(FieldIssue::new(field, reason));
    }

    /// The raw value of a field; JSON `null` counts as absent.
    pub fn raw(&self, name: &str) -> Option<&'a Value> {
        self.args
            .and_then(|map| map.get(name))
            .filter(|value| !value.is_null())
    }

    fn present(&mut self, name: &str) -> Option<&'a Value> {
        let value = self.raw(name);
        if value.is_none() {
            self.reject(name, IssueReason::Required);
        }
        value
    }

    fn string_value(&mut self, name: &str, value: &'a Value, allow_empty: bool) -> Option<String> {
        let Some(text) = value.as_str() else {
            self.reject(name, IssueReason::WrongType { expected: "string" });
            return None;
        };
        if !allow_empty && text.is_empty() {
            self.reject(name, IssueReason::Empty);
            return None;
        }
        Some(text.to_string())
    }

    pub fn required_string(&mut self, name: &str) -> Option<String> {
        let value = self.present(name)?;
        self.string_value(name, value, false)
    }

    /// Like `required_string`, but an empty string is a valid value.
    pub fn required_text(&mut self, name: &str) -> Option<String> {
        let value = self.present(name)?;
        self.string_value(name, value, true)
    }

    pub fn optional_string(&mut self, name: &str) -> Option<String> {
        let value = self.raw(name)?;
        self.string_value(name, value, true)
    }

    pub fn model(&mut self, name: &str) -> Option<ModelName> {
        let value = self.present(name)?;
        let Some(text) = value.as_str() else {
            self.reject(name, IssueReason::WrongType { expected: "string" });
            return None;
        };
        match ModelName::parse(text) {
            Ok(model) => Some(model),
            Err(violation) => {
                self.reject(name, IssueReason::InvalidModelName(violation));
                None
            }
        }
    }

    pub fn required_one_of(
        &mut self,
        name: &str,
        allowed: &'static [&'static str],
    ) -> Option<&'static str> {
        let value = self.present(name)?;
        let matched = value
            .as_str()
            .and_then(|text| allowed.iter().copied().find(|candidate| *candidate == text));
        if matched.is_none() {
            self.reject(name, IssueReason::NotOneOf { allowed });
        }
        matched
    }

    pub fn optional_number_in(&mut self, name: &str, min: f64, max: f64) -> Option<f64> {
        let value = self.raw(name)?;
        let Some(number) = value.as_f64() else {
            self.reject(name, IssueReason::WrongType { expected: "number" });
            return None;
        };
        if number < min || number > max {
            self.reject(name, IssueReason::OutOfRange { min, max });
            return None;
        }
        Some(number)
    }

    pub fn optional_integer_in(&mut self, name: &str, min: u64, max: u64) -> Option<u64> {
        let value = self.raw(name)?;
        let Some(number) = value.as_f64() else {
            self.reject(name, IssueReason::WrongType { expected: "number" });
            return None;
        };
        if number.fract() != 0.0 {
            self.reject(name, IssueReason::NotAnInteger);
            return None;
        }
        if number < min as f64 || number > max as f64 {
            self.reject(
                name,
                IssueReason::OutOfRange {
                    min: min as f64,
                    max: max as f64,
                },
            );
            return None;
        }
        Some(number as u64)
    }

    pub fn optional_string_array(&mut self, name: &str) -> Option<Vec<String>> {
        let value = self.raw(name)?;
        let Some(items) = value.as_array() else {
            self.reject(name, IssueReason::WrongType { expected: "array" });
            return None;
        };
        let mut out = Vec::with_capacity(items.len());
        let mut valid = true;
        for (idx, item) in items.iter().enumerate() {
            match item.as_str() {
                Some(text) => out.push(text.to_string()),
                None => {
                    valid = false;
                    self.reject(
                        &format!("{}.{}", name, idx),
                        IssueReason::WrongType { expected: "string" },
                    );
                }
            }
        }
        valid.then_some(out)
    }

    pub fn required_array(&mut self, name: &str, min_items: usize) -> Option<&'a Vec<Value>> {
        let value = self.present(name)?;
        let Some(items) = value.as_array() else {
            self.reject(name, IssueReason::WrongType { expected: "array" });
            return None;
        };
        if items.len() < min_items {
            self.reject(name, IssueReason::TooFewItems { min: min_items });
            return None;
        }
        Some(items)
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Builds the record when no issue was recorded.
    pub fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T, ValidationError> {
        if !self.issues.is_empty() {
            return Err(ValidationError::new(self.issues));
        }
        build().ok_or_else(|| {
            ValidationError::single(ROOT_FIELD, IssueReason::WrongType { expected: "object" })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ModelNameViolation;
    use serde_json::json;

    #[test]
    fn null_arguments_read_as_empty_object() {
        let raw = Value::Null;
        let reader = ArgsReader::new(&raw);
        assert!(!reader.has_issues());
        assert_eq!(reader.finish(|| Some(())), Ok(()));
    }

    #[test]
    fn non_object_arguments_fail_at_root() {
        let raw = json!("llama3");
        let err = ArgsReader::new(&raw).finish(|| Some(())).unwrap_err();
        assert_eq!(err.fields(), vec!["(root)"]);
    }

    #[test]
    fn collects_every_issue() {
        let raw = json!({"model": "../x", "temperature": 3, "max_tokens": 1.5});
        let mut reader = ArgsReader::new(&raw);
        assert!(reader.model("model").is_none());
        assert!(reader.required_string("prompt").is_none());
        assert!(reader.optional_number_in("temperature", 0.0, 2.0).is_none());
        assert!(reader.optional_integer_in("max_tokens", 1, 10).is_none());
        let err = reader.finish(|| Some(())).unwrap_err();
        assert_eq!(
            err.issues,
            vec![
                FieldIssue::new(
                    "model",
                    IssueReason::InvalidModelName(ModelNameViolation::PathTraversal)
                ),
                FieldIssue::new("prompt", IssueReason::Required),
                FieldIssue::new(
                    "temperature",
                    IssueReason::OutOfRange { min: 0.0, max: 2.0 }
                ),
                FieldIssue::new("max_tokens", IssueReason::NotAnInteger),
            ]
        );
    }

    #[test]
    fn nested_readers_prefix_field_paths() {
        let raw = json!({"messages": [{"role": "robot"}]});
        let mut reader = ArgsReader::new(&raw);
        let items = reader.required_array("messages", 1).expect("array");
        let mut nested = reader.nested("messages.0", &items[0]);
        nested.required_one_of("role", &["user"]);
        nested.required_text("content");
        reader.absorb(nested);
        let err = reader.finish(|| Some(())).unwrap_err();
        assert_eq!(err.fields(), vec!["messages.0.role", "messages.0.content"]);
    }

    #[test]
    fn string_array_reports_bad_elements_by_index() {
        let raw = json!({"images": ["a.png", 7]});
        let mut reader = ArgsReader::new(&raw);
        assert!(reader.optional_string_array("images").is_none());
        let err = reader.finish(|| Some(())).unwrap_err();
        assert_eq!(err.fields(), vec!["images.1"]);
    }
}
