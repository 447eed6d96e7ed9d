use crossterm::event::{KeyCode, KeyEvent};

use crate::form::value::FormValue;

use super::helpers::handle_text_edit;
use super::{ComponentKind, FieldComponent};

/// Text input for `text`, `alt_text` and (multi-line) `textarea` fields.
#[derive(Debug, Clone, Default)]
pub struct TextComponent {
    buffer: String,
    rows: Option<u16>,
}

impl TextComponent {
    pub fn single_line() -> Self {
        Self::default()
    }

    pub fn multi_line(rows: u16) -> Self {
        Self {
            buffer: String::new(),
            rows: Some(rows.max(1)),
        }
    }
}

impl FieldComponent for TextComponent {
    fn kind(&self) -> ComponentKind {
        if self.rows.is_some() {
            ComponentKind::Textarea
        } else {
            ComponentKind::Text
        }
    }

    fn display_value(&self) -> String {
        self.buffer.clone()
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if self.rows.is_some() && key.code == KeyCode::Enter {
            self.buffer.push('\n');
            return true;
        }
        handle_text_edit(&mut self.buffer, key)
    }

    fn seed(&mut self, value: &FormValue) {
        self.buffer = match value {
            FormValue::Empty => String::new(),
            FormValue::Text(text) => text.clone(),
            FormValue::Number(number) => number.to_string(),
            other => other.to_json().to_string(),
        };
    }

    fn value(&self) -> FormValue {
        if self.buffer.is_empty() {
            FormValue::Empty
        } else {
            FormValue::Text(self.buffer.clone())
        }
    }

    fn visible_rows(&self) -> u16 {
        self.rows.unwrap_or(1)
    }
}
