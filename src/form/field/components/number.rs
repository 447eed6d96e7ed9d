use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::form::value::{FormValue, parse_number};

use super::helpers::handle_text_edit;
use super::palette::ComponentPalette;
use super::{ComponentKind, FieldComponent};

#[derive(Debug, Clone)]
pub struct NumberComponent {
    buffer: String,
    palette: Arc<ComponentPalette>,
}

impl NumberComponent {
    pub fn new(palette: Arc<ComponentPalette>) -> Self {
        Self {
            buffer: String::new(),
            palette,
        }
    }

    fn step(&mut self, direction: f64, fast: bool) -> bool {
        let current = if self.buffer.trim().is_empty() {
            0.0
        } else {
            match parse_number(&self.buffer) {
                Some(value) => value,
                None => return false,
            }
        };
        let next = current + direction * self.palette.numeric.step(fast);
        self.buffer = format_number(next);
        true
    }
}

impl FieldComponent for NumberComponent {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Number
    }

    fn display_value(&self) -> String {
        self.buffer.clone()
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let fast = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Left => self.step(-1.0, fast),
            KeyCode::Right => self.step(1.0, fast),
            _ => handle_text_edit(&mut self.buffer, key),
        }
    }

    fn seed(&mut self, value: &FormValue) {
        self.buffer = match value {
            FormValue::Number(number) => format_number(*number),
            FormValue::Text(text) => text.clone(),
            _ => String::new(),
        };
    }

    /// Unparseable input is kept as text so validation can report it.
    fn value(&self) -> FormValue {
        let trimmed = self.buffer.trim();
        if trimmed.is_empty() {
            return FormValue::Empty;
        }
        match parse_number(trimmed) {
            Some(number) => FormValue::Number(number),
            None => FormValue::Text(self.buffer.clone()),
        }
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
