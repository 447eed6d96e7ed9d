use serde_json::Value;
use thiserror::Error;

use super::value::{RecordMap, RecordValue};

/// Value shape chosen while editing a record entry. Only the resulting shape
/// is stored; the tag itself is not persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordValueKind {
    #[default]
    String,
    Array,
    Object,
}

impl RecordValueKind {
    pub const ALL: [RecordValueKind; 3] = [
        RecordValueKind::String,
        RecordValueKind::Array,
        RecordValueKind::Object,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordValueKind::String => "string",
            RecordValueKind::Array => "array",
            RecordValueKind::Object => "object",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "string" => Some(RecordValueKind::String),
            "array" => Some(RecordValueKind::Array),
            "object" => Some(RecordValueKind::Object),
            _ => None,
        }
    }

    fn of(value: &RecordValue) -> Self {
        match value {
            RecordValue::Text(_) => RecordValueKind::String,
            RecordValue::List(_) => RecordValueKind::Array,
            RecordValue::Object(_) => RecordValueKind::Object,
        }
    }
}

/// Uncommitted input of the record editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDraft {
    pub key: String,
    pub kind: RecordValueKind,
    pub raw: String,
}

impl RecordDraft {
    pub fn new(key: impl Into<String>, kind: RecordValueKind, raw: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind,
            raw: raw.into(),
        }
    }

    fn parse_value(&self) -> Result<RecordValue, RecordEditError> {
        match self.kind {
            RecordValueKind::String => Ok(RecordValue::Text(self.raw.trim().to_string())),
            RecordValueKind::Array => {
                let items: Vec<String> = self
                    .raw
                    .split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect();
                if items.is_empty() {
                    return Err(RecordEditError::EmptyArray);
                }
                Ok(RecordValue::List(items))
            }
            RecordValueKind::Object => {
                let parsed: Value = serde_json::from_str(self.raw.trim())
                    .map_err(|err| RecordEditError::InvalidJson(err.to_string()))?;
                match parsed {
                    Value::Object(map) => Ok(RecordValue::Object(map)),
                    _ => Err(RecordEditError::NotAnObject),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordEditError {
    #[error("key cannot be empty")]
    EmptyKey,
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    #[error("value must be a JSON object")]
    NotAnObject,
    #[error("entry '{0}' no longer exists")]
    MissingEntry(String),
    #[error("entry '{0}' is not an array")]
    NotAnArray(String),
    #[error("array needs at least one item")]
    EmptyArray,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditMode {
    #[default]
    Idle,
    Editing {
        key: String,
        index: Option<usize>,
    },
}

/// One visible row of the record panel: a top-level entry or one array element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRow {
    pub key: String,
    pub index: Option<usize>,
    pub summary: String,
}

/// Record editor: `Idle -> Editing(key, index?) -> Idle` on commit or cancel.
#[derive(Debug, Clone, Default)]
pub struct RecordEditor {
    entries: RecordMap,
    mode: EditMode,
}

impl RecordEditor {
    pub fn new(entries: RecordMap) -> Self {
        Self {
            entries,
            mode: EditMode::Idle,
        }
    }

    pub fn entries(&self) -> &RecordMap {
        &self.entries
    }

    pub fn replace_entries(&mut self, entries: RecordMap) {
        self.entries = entries;
        self.mode = EditMode::Idle;
    }

    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, EditMode::Editing { .. })
    }

    /// Enter edit mode for a key (or one of its array elements) and return
    /// the draft prefilled from the stored value.
    pub fn begin_edit(&mut self, key: &str, index: Option<usize>) -> Option<RecordDraft> {
        let value = self.entries.get(key)?;
        let draft = match (value, index) {
            (RecordValue::List(items), Some(idx)) => {
                RecordDraft::new(key, RecordValueKind::String, items.get(idx)?.clone())
            }
            (_, Some(_)) => return None,
            (value, None) => RecordDraft::new(key, RecordValueKind::of(value), draft_text(value)),
        };
        self.mode = EditMode::Editing {
            key: key.to_string(),
            index,
        };
        Some(draft)
    }

    pub fn cancel(&mut self) {
        self.mode = EditMode::Idle;
    }

    /// Apply a draft. On error the entries and the edit mode stay untouched.
    pub fn commit(&mut self, draft: &RecordDraft) -> Result<(), RecordEditError> {
        let value = draft.parse_value()?;
        match self.mode.clone() {
            EditMode::Idle => {
                let key = draft.key.trim();
                if key.is_empty() {
                    return Err(RecordEditError::EmptyKey);
                }
                self.entries.insert(key.to_string(), value);
            }
            EditMode::Editing {
                key,
                index: Some(index),
            } => {
                let element = match value {
                    RecordValue::Text(text) => text,
                    RecordValue::List(items) => items.join(", "),
                    RecordValue::Object(map) => Value::Object(map).to_string(),
                };
                match self.entries.get_mut(&key) {
                    Some(RecordValue::List(items)) => match items.get_mut(index) {
                        Some(slot) => *slot = element,
                        None => return Err(RecordEditError::MissingEntry(key)),
                    },
                    Some(_) => return Err(RecordEditError::NotAnArray(key)),
                    None => return Err(RecordEditError::MissingEntry(key)),
                }
            }
            EditMode::Editing { key, index: None } => {
                let new_key = draft.key.trim();
                if new_key.is_empty() {
                    return Err(RecordEditError::EmptyKey);
                }
                let Some(position) = self.entries.get_index_of(&key) else {
                    return Err(RecordEditError::MissingEntry(key));
                };
                if new_key == key {
                    self.entries.insert(key, value);
                } else {
                    self.entries.shift_remove_index(position);
                    if let Some(existing) = self.entries.get_index_of(new_key) {
                        self.entries.shift_remove_index(existing);
                    }
                    let position = position.min(self.entries.len());
                    self.entries.shift_insert(position, new_key.to_string(), value);
                }
            }
        }
        self.mode = EditMode::Idle;
        Ok(())
    }

    /// Remove a key, or one element of an array value. An array left empty
    /// takes its key with it.
    pub fn remove(&mut self, key: &str, index: Option<usize>) -> bool {
        let removed = match index {
            None => self.entries.shift_remove(key).is_some(),
            Some(idx) => {
                let Some(RecordValue::List(items)) = self.entries.get_mut(key) else {
                    return false;
                };
                if idx >= items.len() {
                    return false;
                }
                items.remove(idx);
                if items.is_empty() {
                    self.entries.shift_remove(key);
                }
                true
            }
        };
        if removed
            && let EditMode::Editing { key: editing, .. } = &self.mode
            && !self.entries.contains_key(editing)
        {
            self.mode = EditMode::Idle;
        }
        removed
    }

    /// Flattened rows: array values expand into one row per element.
    pub fn rows(&self) -> Vec<RecordRow> {
        let mut rows = Vec::new();
        for (key, value) in &self.entries {
            match value {
                RecordValue::List(items) => {
                    for (idx, item) in items.iter().enumerate() {
                        rows.push(RecordRow {
                            key: key.clone(),
                            index: Some(idx),
                            summary: format!("{key}[{idx}] = {}", summarize(item)),
                        });
                    }
                }
                RecordValue::Text(text) => rows.push(RecordRow {
                    key: key.clone(),
                    index: None,
                    summary: format!("{key} = {}", summarize(text)),
                }),
                RecordValue::Object(map) => rows.push(RecordRow {
                    key: key.clone(),
                    index: None,
                    summary: format!("{key} = object({})", map.len()),
                }),
            }
        }
        rows
    }
}

fn draft_text(value: &RecordValue) -> String {
    match value {
        RecordValue::Text(text) => text.clone(),
        RecordValue::List(items) => items.join(", "),
        RecordValue::Object(map) => {
            serde_json::to_string_pretty(&Value::Object(map.clone())).unwrap_or_default()
        }
    }
}

fn summarize(text: &str) -> String {
    const LIMIT: usize = 24;
    if text.chars().count() > LIMIT {
        let truncated: String = text.chars().take(LIMIT).collect();
        format!("\"{truncated}…\"")
    } else {
        format!("\"{text}\"")
    }
}
