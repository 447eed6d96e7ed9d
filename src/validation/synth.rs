use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::domain::{FieldDescriptor, FieldType};
use crate::form::FormValues;
use crate::i18n::Translator;

use super::custom::RuleRegistry;
use super::rules::{FieldRule, RuleKind, RuleMessages, TextRule};

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("field '{field}' has an invalid pattern: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },
    #[error("field '{field}' references unknown custom rule '{rule}'")]
    UnknownCustomRule { field: String, rule: String },
    #[error("duplicate field name '{0}'")]
    DuplicateField(String),
}

/// Per-field failures from a full validation pass, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: IndexMap<String, String>,
}

impl ValidationErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lines = self
            .errors
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>();
        f.write_str(&lines.join("\n"))
    }
}

impl std::error::Error for ValidationErrors {}

/// Rule set built from a field-descriptor list, one rule per field.
#[derive(Debug, Clone, Default)]
pub struct FormValidator {
    rules: IndexMap<String, FieldRule>,
}

impl FormValidator {
    pub fn synthesize(
        fields: &[FieldDescriptor],
        registry: &RuleRegistry,
        translator: &Translator,
    ) -> Result<Self, SynthesisError> {
        let mut rules = IndexMap::with_capacity(fields.len());
        for field in fields {
            let rule = synthesize_rule(field, registry, translator)?;
            if rules.insert(field.name.clone(), rule).is_some() {
                return Err(SynthesisError::DuplicateField(field.name.clone()));
            }
        }
        Ok(Self { rules })
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.rules.get(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Validate every field; the first failure of each field is reported.
    pub fn validate(&self, values: &FormValues) -> Result<(), ValidationErrors> {
        let mut errors = IndexMap::new();
        for (name, rule) in &self.rules {
            if let Err(message) = rule.check(values.get_or_empty(name)) {
                errors.insert(name.clone(), message);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors { errors })
        }
    }

    /// Validate a single field. Unknown fields always pass.
    pub fn validate_field(&self, name: &str, values: &FormValues) -> Result<(), String> {
        match self.rules.get(name) {
            Some(rule) => rule.check(values.get_or_empty(name)),
            None => Ok(()),
        }
    }

    /// Export the rule set as a JSON Schema object describing `FormValues::to_json`.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for (name, rule) in &self.rules {
            properties.insert(name.clone(), rule.json_schema());
            if rule.rejects_empty() && !rule.is_passthrough() {
                required.push(Value::String(name.clone()));
            }
        }
        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

fn synthesize_rule(
    field: &FieldDescriptor,
    registry: &RuleRegistry,
    translator: &Translator,
) -> Result<FieldRule, SynthesisError> {
    let validation = field.validation.clone().unwrap_or_default();
    let label = translator.t(&field.label).into_owned();
    let messages = messages_for(field, &label, translator);

    let kind = match field.kind {
        FieldType::Text | FieldType::AltText | FieldType::Textarea => {
            let pattern = validation
                .pattern
                .as_deref()
                .map(Regex::new)
                .transpose()
                .map_err(|source| SynthesisError::InvalidPattern {
                    field: field.name.clone(),
                    source,
                })?;
            let custom = match validation.custom.as_deref() {
                Some(name) => {
                    let check =
                        registry
                            .get(name)
                            .ok_or_else(|| SynthesisError::UnknownCustomRule {
                                field: field.name.clone(),
                                rule: name.to_string(),
                            })?;
                    Some((name.to_string(), check))
                }
                None => None,
            };
            RuleKind::Text(TextRule {
                min_length: validation.min_length,
                max_length: validation.max_length,
                pattern,
                url: validation.url,
                custom,
            })
        }
        FieldType::Number => RuleKind::Number,
        FieldType::Record => RuleKind::Record,
        FieldType::Keywords => RuleKind::Keywords,
        FieldType::Image | FieldType::SectionImage => RuleKind::Image,
        FieldType::Select | FieldType::Checkbox | FieldType::MultiImage => RuleKind::Passthrough,
    };

    Ok(FieldRule {
        label,
        required: field.required,
        kind,
        messages,
    })
}

fn messages_for(field: &FieldDescriptor, label: &str, translator: &Translator) -> RuleMessages {
    if let Some(message) = field.custom_message() {
        let message = translator.t(message).into_owned();
        return RuleMessages {
            required: message.clone(),
            min_length: message.clone(),
            max_length: message.clone(),
            pattern: message.clone(),
            url: message.clone(),
            not_a_number: message.clone(),
            negative: message.clone(),
            wrong_type: message,
        };
    }

    let validation = field.validation.clone().unwrap_or_default();
    let min = validation.min_length.unwrap_or(0).to_string();
    let max = validation.max_length.unwrap_or(0).to_string();
    let with_label = |key: &str| translator.format(key, &[("label", label)]);
    let required = if field.kind.is_image() {
        with_label("{label} is required.")
    } else {
        with_label("{label} is required")
    };
    let wrong_type = match field.kind {
        FieldType::Record => with_label("{label} must be a record"),
        FieldType::Keywords => with_label("{label} must be a list"),
        _ => with_label("{label} must be text"),
    };

    RuleMessages {
        required,
        min_length: translator.format(
            "{label} must be at least {min} characters",
            &[("label", label), ("min", &min)],
        ),
        max_length: translator.format(
            "{label} must be at most {max} characters",
            &[("label", label), ("max", &max)],
        ),
        pattern: with_label("{label} has an invalid format"),
        url: with_label("{label} must be a valid URL"),
        not_a_number: with_label("{label} must be a number"),
        negative: with_label("{label} must be greater than or equal to 0"),
        wrong_type,
    }
}
