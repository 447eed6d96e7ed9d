use serde_json::{Map, Value};

use crate::form::{FileHandle, FormValue, FormValues, ImageSource};

use super::controller::Operation;

/// One part of a multipart body.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadPart {
    Text { name: String, value: String },
    File { name: String, file: FileHandle },
}

impl PayloadPart {
    pub fn name(&self) -> &str {
        match self {
            PayloadPart::Text { name, .. } | PayloadPart::File { name, .. } => name,
        }
    }
}

/// Request body handed to an [`EntityStore`](super::EntityStore).
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Multipart(Vec<PayloadPart>),
}

impl Payload {
    /// Multipart when any value carries a local file, JSON otherwise. Select
    /// choices submit their `id`. A create leaves empty values out; an update
    /// sends them so cleared fields are cleared on the backend too.
    pub fn from_values(values: &FormValues, operation: Operation) -> Self {
        let keep_empty = operation == Operation::Update;
        let entries = values
            .iter()
            .filter(move |(_, value)| keep_empty || !value.is_empty());
        if values.has_files() {
            let parts = entries
                .flat_map(|(name, value)| {
                    if value.is_empty() {
                        vec![text_part(name, "")]
                    } else {
                        multipart_parts(name, value)
                    }
                })
                .collect();
            Payload::Multipart(parts)
        } else {
            let object = entries
                .map(|(name, value)| (name.clone(), json_value(value)))
                .collect::<Map<_, _>>();
            Payload::Json(Value::Object(object))
        }
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self, Payload::Multipart(_))
    }

    /// JSON rendering used for logging and the echo store. Files appear as
    /// `{"file": name, "size": bytes}`; repeated multipart names become arrays.
    pub fn preview(&self) -> Value {
        match self {
            Payload::Json(value) => value.clone(),
            Payload::Multipart(parts) => {
                let mut object = Map::new();
                for part in parts {
                    let value = match part {
                        PayloadPart::Text { value, .. } => Value::String(value.clone()),
                        PayloadPart::File { file, .. } => serde_json::json!({
                            "file": file.file_name,
                            "size": file.size,
                        }),
                    };
                    match object.get_mut(part.name()) {
                        Some(Value::Array(items)) => items.push(value),
                        Some(existing) => {
                            let first = existing.take();
                            *existing = Value::Array(vec![first, value]);
                        }
                        None => {
                            object.insert(part.name().to_string(), value);
                        }
                    }
                }
                Value::Object(object)
            }
        }
    }
}

fn json_value(value: &FormValue) -> Value {
    match value {
        FormValue::Choice(option) => option.id.clone(),
        other => other.to_json(),
    }
}

fn text_part(name: &str, value: impl Into<String>) -> PayloadPart {
    PayloadPart::Text {
        name: name.to_string(),
        value: value.into(),
    }
}

fn image_part(name: &str, source: &ImageSource) -> PayloadPart {
    match source {
        ImageSource::File(file) => PayloadPart::File {
            name: name.to_string(),
            file: file.clone(),
        },
        ImageSource::Url(url) => text_part(name, url.clone()),
    }
}

fn multipart_parts(name: &str, value: &FormValue) -> Vec<PayloadPart> {
    match value {
        FormValue::Empty => Vec::new(),
        FormValue::Text(text) => vec![text_part(name, text.clone())],
        FormValue::Bool(flag) => vec![text_part(name, flag.to_string())],
        FormValue::Image(source) => vec![image_part(name, source)],
        FormValue::Images(sources) => sources
            .iter()
            .map(|source| image_part(name, source))
            .collect(),
        FormValue::Number(number) => vec![text_part(name, number.to_string())],
        FormValue::Choice(option) => vec![text_part(name, scalar_text(&option.id))],
        FormValue::Keywords(_) | FormValue::Record(_) => {
            vec![text_part(name, scalar_text(&value.to_json()))]
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
