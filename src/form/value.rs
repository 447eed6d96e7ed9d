use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::domain::{FieldDescriptor, FieldType, SelectOption};

/// A local file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
}

impl FileHandle {
    /// Returns `None` when the path does not point at a regular file.
    pub fn open(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).ok()?;
        if !metadata.is_file() {
            return None;
        }
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Some(Self {
            path: path.to_path_buf(),
            file_name,
            size: metadata.len(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    File(FileHandle),
    Url(String),
}

impl ImageSource {
    pub fn label(&self) -> String {
        match self {
            ImageSource::File(file) => format!("file:{}", file.file_name),
            ImageSource::Url(url) => url.clone(),
        }
    }
}

/// Value stored under one record key.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    Text(String),
    List(Vec<String>),
    Object(Map<String, Value>),
}

impl RecordValue {
    pub fn to_json(&self) -> Value {
        match self {
            RecordValue::Text(text) => Value::String(text.clone()),
            RecordValue::List(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            RecordValue::Object(map) => Value::Object(map.clone()),
        }
    }

    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(text) => RecordValue::Text(text.clone()),
            Value::Array(items) => RecordValue::List(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(text) => text.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            Value::Object(map) => RecordValue::Object(map.clone()),
            other => RecordValue::Text(other.to_string()),
        }
    }
}

pub type RecordMap = IndexMap<String, RecordValue>;

/// Current value of a single form field.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FormValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Image(ImageSource),
    Images(Vec<ImageSource>),
    Keywords(Vec<String>),
    Record(RecordMap),
    Choice(SelectOption),
}

impl FormValue {
    pub fn text(value: impl Into<String>) -> Self {
        FormValue::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FormValue::Empty => true,
            FormValue::Text(text) => text.is_empty(),
            FormValue::Images(items) => items.is_empty(),
            FormValue::Keywords(items) => items.is_empty(),
            FormValue::Record(map) => map.is_empty(),
            _ => false,
        }
    }

    pub fn has_file(&self) -> bool {
        match self {
            FormValue::Image(ImageSource::File(_)) => true,
            FormValue::Images(items) => items
                .iter()
                .any(|item| matches!(item, ImageSource::File(_))),
            _ => false,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FormValue::Empty => Value::Null,
            FormValue::Text(text) => Value::String(text.clone()),
            FormValue::Number(number) => serde_json::Number::from_f64(*number)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FormValue::Bool(flag) => Value::Bool(*flag),
            FormValue::Image(source) => image_json(source),
            FormValue::Images(items) => Value::Array(items.iter().map(image_json).collect()),
            FormValue::Keywords(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            FormValue::Record(map) => Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            FormValue::Choice(option) => serde_json::to_value(option).unwrap_or(Value::Null),
        }
    }

    /// Interpret raw JSON (e.g. the entity's current data) for a field type.
    pub fn from_json(kind: FieldType, value: &Value) -> Self {
        match (kind, value) {
            (_, Value::Null) => FormValue::Empty,
            (FieldType::Number, Value::Number(number)) => {
                number.as_f64().map(FormValue::Number).unwrap_or_default()
            }
            (FieldType::Number, Value::String(text)) => parse_number(text)
                .map(FormValue::Number)
                .unwrap_or_else(|| FormValue::Text(text.clone())),
            (FieldType::Checkbox, Value::Bool(flag)) => FormValue::Bool(*flag),
            (FieldType::Checkbox, Value::String(text)) => FormValue::Bool(text == "true"),
            (FieldType::Keywords, Value::Array(items)) => FormValue::Keywords(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
            ),
            (FieldType::Record, Value::Object(map)) => FormValue::Record(
                map.iter()
                    .map(|(key, value)| (key.clone(), RecordValue::from_json(value)))
                    .collect(),
            ),
            (FieldType::Image | FieldType::SectionImage, Value::String(url)) => {
                FormValue::Image(ImageSource::Url(url.clone()))
            }
            (FieldType::MultiImage, Value::Array(items)) => FormValue::Images(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|url| ImageSource::Url(url.to_string()))
                    .collect(),
            ),
            (FieldType::Select, other) => FormValue::Choice(SelectOption::from_value(other)),
            (_, Value::String(text)) => FormValue::Text(text.clone()),
            (_, Value::Bool(flag)) => FormValue::Bool(*flag),
            (_, Value::Number(number)) => FormValue::Text(number.to_string()),
            (_, other) => FormValue::Text(other.to_string()),
        }
    }
}

/// Trimmed finite decimal. `inf`, `NaN` and overflowing literals are not numbers.
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

fn image_json(source: &ImageSource) -> Value {
    match source {
        ImageSource::Url(url) => Value::String(url.clone()),
        ImageSource::File(file) => serde_json::json!({
            "path": file.path.to_string_lossy(),
            "name": file.file_name,
            "size": file.size,
        }),
    }
}

impl Serialize for FormValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Flat, ordered mapping from field name to current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues {
    entries: IndexMap<String, FormValue>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: FormValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FormValue) -> Option<FormValue> {
        self.entries.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.entries.get(name)
    }

    /// Missing fields read as `FormValue::Empty`.
    pub fn get_or_empty(&self, name: &str) -> &FormValue {
        static EMPTY: FormValue = FormValue::Empty;
        self.entries.get(name).unwrap_or(&EMPTY)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FormValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_files(&self) -> bool {
        self.entries.values().any(FormValue::has_file)
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect(),
        )
    }

    /// Build values for `fields` out of a JSON object, ignoring unknown keys.
    pub fn from_json(fields: &[FieldDescriptor], value: &Value) -> Self {
        let mut values = FormValues::new();
        let Some(object) = value.as_object() else {
            return values;
        };
        for field in fields {
            if let Some(raw) = object.get(&field.name) {
                values.insert(field.name.clone(), FormValue::from_json(field.kind, raw));
            }
        }
        values
    }
}

impl Serialize for FormValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl FromIterator<(String, FormValue)> for FormValues {
    fn from_iter<T: IntoIterator<Item = (String, FormValue)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
