use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::i18n::Language;

/// A parsed form definition: the entity it edits plus its ordered fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FormDefinition {
    /// Entity name, also used as the REST collection path (e.g. `blogs`).
    pub entity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub fields: Vec<FieldDescriptor>,
}

impl FormDefinition {
    pub fn fields_for(&self, tab: Tab) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(move |field| field.tab == tab)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn display_title(&self) -> String {
        self.title.clone().unwrap_or_else(|| self.entity.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Textarea,
    Image,
    Number,
    SectionImage,
    MultiImage,
    Keywords,
    Record,
    Checkbox,
    Select,
    AltText,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Image => "image",
            FieldType::Number => "number",
            FieldType::SectionImage => "section_image",
            FieldType::MultiImage => "multi_image",
            FieldType::Keywords => "keywords",
            FieldType::Record => "record",
            FieldType::Checkbox => "checkbox",
            FieldType::Select => "select",
            FieldType::AltText => "alt_text",
        }
    }

    pub fn is_textual(self) -> bool {
        matches!(self, FieldType::Text | FieldType::Textarea | FieldType::AltText)
    }

    pub fn is_image(self) -> bool {
        matches!(self, FieldType::Image | FieldType::SectionImage)
    }
}

/// Language tab a field is authored under.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum Tab {
    #[default]
    English,
    Arabic,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::English, Tab::Arabic];

    pub fn title(self) -> &'static str {
        match self {
            Tab::English => "English",
            Tab::Arabic => "Arabic",
        }
    }

    pub fn language(self) -> Language {
        match self {
            Tab::English => Language::English,
            Tab::Arabic => Language::Arabic,
        }
    }
}

/// Optional constraints attached to a descriptor. Only consumed while
/// synthesizing the validator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ValidationConstraint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub url: bool,
    /// Name of a rule registered in the `RuleRegistry`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One entry of a select field. The whole option is kept in form state; only
/// `id` reaches the submitted payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SelectOption {
    pub id: Value,
    pub label: String,
}

impl SelectOption {
    pub fn new(id: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// Read an option out of loose JSON: an object with `id` and one of
    /// `label`/`name`/`title`, or a bare scalar used as both id and label.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => {
                let id = map.get("id").cloned().unwrap_or(Value::Null);
                let label = ["label", "name", "title"]
                    .iter()
                    .find_map(|key| map.get(*key).and_then(Value::as_str))
                    .map(str::to_string)
                    .unwrap_or_else(|| scalar_label(&id));
                Self { id, label }
            }
            other => Self {
                id: other.clone(),
                label: scalar_label(other),
            },
        }
    }
}

fn scalar_label(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: FieldType,
    #[serde(default)]
    pub tab: Tab,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationConstraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Remote endpoint queried for select options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Visible rows for textarea fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u16>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            tab: Tab::English,
            options: None,
            required: false,
            validation: None,
            placeholder: None,
            source: None,
            rows: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn on_tab(mut self, tab: Tab) -> Self {
        self.tab = tab;
        self
    }

    pub fn with_validation(mut self, validation: ValidationConstraint) -> Self {
        self.validation = Some(validation);
        self
    }

    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn display_label(&self) -> String {
        if self.label.eq_ignore_ascii_case(&self.name) {
            self.label.clone()
        } else {
            format!("{} ({})", self.label, self.name)
        }
    }

    pub fn custom_message(&self) -> Option<&str> {
        self.validation
            .as_ref()
            .and_then(|validation| validation.message.as_deref())
    }
}
