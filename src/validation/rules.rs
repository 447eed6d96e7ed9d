use std::borrow::Cow;
use std::fmt;

use regex::Regex;
use serde_json::{Map, Value, json};

use crate::form::{FormValue, ImageSource, parse_number};

use super::custom::CustomCheck;

/// Validation rule synthesized for one field.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub(crate) label: String,
    pub(crate) required: bool,
    pub(crate) kind: RuleKind,
    pub(crate) messages: RuleMessages,
}

#[derive(Debug, Clone)]
pub(crate) enum RuleKind {
    Text(TextRule),
    Number,
    Record,
    Keywords,
    Image,
    Passthrough,
}

#[derive(Clone, Default)]
pub(crate) struct TextRule {
    pub(crate) min_length: Option<usize>,
    pub(crate) max_length: Option<usize>,
    pub(crate) pattern: Option<Regex>,
    pub(crate) url: bool,
    pub(crate) custom: Option<(String, CustomCheck)>,
}

impl fmt::Debug for TextRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextRule")
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("url", &self.url)
            .field("custom", &self.custom.as_ref().map(|(name, _)| name))
            .finish()
    }
}

/// Fully rendered failure messages, resolved once at synthesis time.
#[derive(Debug, Clone, Default)]
pub(crate) struct RuleMessages {
    pub(crate) required: String,
    pub(crate) min_length: String,
    pub(crate) max_length: String,
    pub(crate) pattern: String,
    pub(crate) url: String,
    pub(crate) not_a_number: String,
    pub(crate) negative: String,
    pub(crate) wrong_type: String,
}

impl FieldRule {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self.kind, RuleKind::Passthrough)
    }

    /// Whether an empty value fails this rule.
    pub(crate) fn rejects_empty(&self) -> bool {
        self.required || matches!(self.kind, RuleKind::Image)
    }

    pub fn check(&self, value: &FormValue) -> Result<(), String> {
        match &self.kind {
            RuleKind::Text(rule) => self.check_text(rule, value),
            RuleKind::Number => self.check_number(value),
            RuleKind::Record => match value {
                FormValue::Empty => self.require_presence(),
                FormValue::Record(map) if map.is_empty() => self.require_presence(),
                FormValue::Record(_) => Ok(()),
                _ => Err(self.messages.wrong_type.clone()),
            },
            RuleKind::Keywords => match value {
                FormValue::Empty => self.require_presence(),
                FormValue::Keywords(items) if items.is_empty() => self.require_presence(),
                FormValue::Keywords(_) => Ok(()),
                _ => Err(self.messages.wrong_type.clone()),
            },
            RuleKind::Image => self.check_image(value),
            RuleKind::Passthrough => Ok(()),
        }
    }

    fn require_presence(&self) -> Result<(), String> {
        if self.required {
            Err(self.messages.required.clone())
        } else {
            Ok(())
        }
    }

    fn check_text(&self, rule: &TextRule, value: &FormValue) -> Result<(), String> {
        let text: Cow<'_, str> = match value {
            FormValue::Empty => Cow::Borrowed(""),
            FormValue::Text(text) => Cow::Borrowed(text.as_str()),
            FormValue::Number(number) => Cow::Owned(number.to_string()),
            _ => return Err(self.messages.wrong_type.clone()),
        };

        if text.trim().is_empty() {
            return self.require_presence();
        }

        let length = text.chars().count();
        if let Some(min) = rule.min_length
            && length < min
        {
            return Err(self.messages.min_length.clone());
        }
        if let Some(max) = rule.max_length
            && length > max
        {
            return Err(self.messages.max_length.clone());
        }
        if let Some(pattern) = &rule.pattern
            && !pattern.is_match(&text)
        {
            return Err(self.messages.pattern.clone());
        }
        if rule.url && url::Url::parse(text.trim()).is_err() {
            return Err(self.messages.url.clone());
        }
        if let Some((_, check)) = &rule.custom
            && !check(&text)
        {
            return Err(self.messages.pattern.clone());
        }
        Ok(())
    }

    fn check_number(&self, value: &FormValue) -> Result<(), String> {
        let number = match value {
            FormValue::Empty => return self.require_presence(),
            FormValue::Text(text) if text.trim().is_empty() => return self.require_presence(),
            FormValue::Text(text) => {
                parse_number(text).ok_or_else(|| self.messages.not_a_number.clone())?
            }
            FormValue::Number(number) => *number,
            _ => return Err(self.messages.not_a_number.clone()),
        };
        if !number.is_finite() {
            return Err(self.messages.not_a_number.clone());
        }
        if number < 0.0 {
            return Err(self.messages.negative.clone());
        }
        Ok(())
    }

    /// An image always needs a picked file or an existing URL, required or not.
    fn check_image(&self, value: &FormValue) -> Result<(), String> {
        let present = match value {
            FormValue::Image(ImageSource::File(_)) => true,
            FormValue::Image(ImageSource::Url(url)) => !url.trim().is_empty(),
            FormValue::Text(text) => !text.trim().is_empty(),
            _ => false,
        };
        if present {
            Ok(())
        } else {
            Err(self.messages.required.clone())
        }
    }

    /// Structural JSON Schema fragment equivalent to this rule.
    pub(crate) fn json_schema(&self) -> Value {
        match &self.kind {
            RuleKind::Text(rule) => {
                let mut schema = Map::new();
                let ty = if self.required {
                    json!("string")
                } else {
                    json!(["string", "null"])
                };
                schema.insert("type".into(), ty);
                let min = rule
                    .min_length
                    .unwrap_or(0)
                    .max(usize::from(self.required));
                if min > 0 {
                    schema.insert("minLength".into(), json!(min));
                }
                if let Some(max) = rule.max_length {
                    schema.insert("maxLength".into(), json!(max));
                }
                if let Some(pattern) = &rule.pattern {
                    schema.insert("pattern".into(), json!(pattern.as_str()));
                }
                if rule.url {
                    schema.insert("format".into(), json!("uri"));
                }
                Value::Object(schema)
            }
            RuleKind::Number => json!({"type": ["number", "null"], "minimum": 0}),
            RuleKind::Record => {
                let mut schema = json!({"type": ["object", "null"]});
                if self.required {
                    schema = json!({"type": "object", "minProperties": 1});
                }
                schema
            }
            RuleKind::Keywords => {
                let mut schema = json!({"type": "array", "items": {"type": "string"}});
                if self.required {
                    schema["minItems"] = json!(1);
                }
                schema
            }
            RuleKind::Image => json!({
                "anyOf": [
                    {"type": "string", "pattern": "\\S"},
                    {"type": "object", "required": ["path"]},
                ]
            }),
            RuleKind::Passthrough => json!({}),
        }
    }
}
